//! Vertex layout descriptors
//!
//! A [`VertexLayoutDescriptor`] states once how a vertex record is laid out in
//! memory: which attribute slot each field feeds, how many float components it
//! has, and where it starts. Buffer binding code walks the slots to issue
//! attribute-pointer calls; the descriptor itself never touches GL.
//!
//! Components are always 32-bit floats. The stride is derived from the slots
//! and cannot be supplied separately, so it never drifts from the attributes.

use std::collections::HashSet;
use std::mem::size_of;
use std::sync::OnceLock;

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

/// Largest component count a single GL vertex attribute accepts
pub const MAX_COMPONENTS: u32 = 4;

const FLOAT_SIZE: u32 = size_of::<f32>() as u32;

/// Errors raised while building a vertex layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("attribute slot {slot} is declared more than once (\"{first}\" and \"{second}\")")]
    DuplicateSlot {
        slot: u32,
        first: String,
        second: String,
    },

    #[error("attribute \"{name}\" has zero components")]
    ZeroComponents { name: String },

    #[error("attribute \"{name}\" has {count} components; at most 4 are allowed")]
    TooManyComponents { name: String, count: u32 },

    #[error("attribute \"{name}\" ends at byte {end} but the vertex stride is {stride}")]
    OutOfBounds { name: String, end: u32, stride: u32 },
}

/// One float attribute of a vertex record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttributeSlot {
    name: String,
    slot_index: u32,
    component_count: u32,
    byte_offset: u32,
}

impl VertexAttributeSlot {
    /// Describe an attribute; checked when the owning descriptor is built
    pub fn new(name: impl Into<String>, slot_index: u32, component_count: u32, byte_offset: u32) -> Self {
        Self {
            name: name.into(),
            slot_index,
            component_count,
            byte_offset,
        }
    }

    /// Name used for diagnostics and shader cross-checks
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binding location (`layout(location = N)` in the shader)
    pub const fn slot_index(&self) -> u32 {
        self.slot_index
    }

    /// Number of float components
    pub const fn component_count(&self) -> u32 {
        self.component_count
    }

    /// Offset of the first component within one vertex record
    pub const fn byte_offset(&self) -> u32 {
        self.byte_offset
    }

    /// Size of this attribute in bytes
    pub const fn size_bytes(&self) -> u32 {
        self.component_count * FLOAT_SIZE
    }
}

/// Immutable description of one vertex record shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayoutDescriptor {
    slots: Vec<VertexAttributeSlot>,
    stride_bytes: u32,
}

impl VertexLayoutDescriptor {
    /// Build a descriptor from an ordered slot list.
    ///
    /// Fails when a slot index repeats, when a component count is outside
    /// `1..=4`, or when an attribute would extend past the end of the record.
    pub fn new(slots: Vec<VertexAttributeSlot>) -> Result<Self, LayoutError> {
        let mut seen: HashSet<u32> = HashSet::with_capacity(slots.len());
        for (i, slot) in slots.iter().enumerate() {
            if !seen.insert(slot.slot_index) {
                let first = slots[..i]
                    .iter()
                    .find(|s| s.slot_index == slot.slot_index)
                    .map(|s| s.name.clone())
                    .unwrap_or_default();
                return Err(LayoutError::DuplicateSlot {
                    slot: slot.slot_index,
                    first,
                    second: slot.name.clone(),
                });
            }
            if slot.component_count == 0 {
                return Err(LayoutError::ZeroComponents { name: slot.name.clone() });
            }
            if slot.component_count > MAX_COMPONENTS {
                return Err(LayoutError::TooManyComponents {
                    name: slot.name.clone(),
                    count: slot.component_count,
                });
            }
        }

        let stride_bytes = slots.iter().map(VertexAttributeSlot::size_bytes).sum();

        for slot in &slots {
            let end = slot.byte_offset.checked_add(slot.size_bytes());
            if end.map_or(true, |end| end > stride_bytes) {
                return Err(LayoutError::OutOfBounds {
                    name: slot.name.clone(),
                    end: end.unwrap_or(u32::MAX),
                    stride: stride_bytes,
                });
            }
        }

        Ok(Self { slots, stride_bytes })
    }

    /// Attribute slots in declaration order
    pub fn slots(&self) -> &[VertexAttributeSlot] {
        &self.slots
    }

    /// Byte distance between consecutive vertex records
    pub const fn stride_bytes(&self) -> u32 {
        self.stride_bytes
    }

    /// Slot declared at `slot_index`, if any
    pub fn slot(&self, slot_index: u32) -> Option<&VertexAttributeSlot> {
        self.slots.iter().find(|s| s.slot_index == slot_index)
    }

    /// Slot declared under `name`, if any
    pub fn slot_named(&self, name: &str) -> Option<&VertexAttributeSlot> {
        self.slots.iter().find(|s| s.name == name)
    }
}

/// A plain-old-data vertex record with a fixed layout
pub trait Vertex: Pod {
    /// The shared layout of every buffer holding this vertex type
    fn layout() -> &'static VertexLayoutDescriptor;
}

/// 2D position plus RGBA colour
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexPositionColor {
    /// Position in pixels
    pub position: [f32; 2],
    /// Linear RGBA colour
    pub color: [f32; 4],
}

impl VertexPositionColor {
    /// Create a vertex
    pub const fn new(position: [f32; 2], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

impl Vertex for VertexPositionColor {
    fn layout() -> &'static VertexLayoutDescriptor {
        static LAYOUT: OnceLock<VertexLayoutDescriptor> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            VertexLayoutDescriptor::new(vec![
                VertexAttributeSlot::new("Position", 0, 2, 0),
                VertexAttributeSlot::new("Color", 1, 4, 2 * FLOAT_SIZE),
            ])
            .expect("position/color layout is well formed")
        })
    }
}

/// 2D position plus texture coordinate
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexPositionTexture {
    /// Position in pixels
    pub position: [f32; 2],
    /// Texture coordinate
    pub tex_coord: [f32; 2],
}

impl VertexPositionTexture {
    /// Create a vertex
    pub const fn new(position: [f32; 2], tex_coord: [f32; 2]) -> Self {
        Self { position, tex_coord }
    }
}

impl Vertex for VertexPositionTexture {
    fn layout() -> &'static VertexLayoutDescriptor {
        static LAYOUT: OnceLock<VertexLayoutDescriptor> = OnceLock::new();
        LAYOUT.get_or_init(|| {
            VertexLayoutDescriptor::new(vec![
                VertexAttributeSlot::new("Position", 0, 2, 0),
                VertexAttributeSlot::new("TexCoord", 1, 2, 2 * FLOAT_SIZE),
            ])
            .expect("position/texture layout is well formed")
        })
    }
}
