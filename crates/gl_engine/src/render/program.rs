//! Linked shader programs with a reflected uniform/attribute cache
//!
//! A [`GpuProgram`] goes through three states:
//!
//! ```text
//! Uninitialized --initialize--> Ready --release--> Released
//! ```
//!
//! A failed `initialize` leaves the program `Uninitialized` with no native
//! object alive. `release` is idempotent and also runs on drop.
//!
//! Reflection happens exactly once, right after linking. Uniform lookups then
//! resolve against the cached table instead of querying the driver per call.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, trace};

use crate::render::error::{ProgramError, ProgramResult};
use crate::render::gl::{GlApi, ProgramHandle, UniformLocation};
use crate::render::shader::{compile_stage, link_program, ShaderStage};
use crate::render::uniform::{GlslType, UniformValue};
use crate::render::vertex_layout::VertexLayoutDescriptor;

/// One active uniform of a linked program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderUniformInfo {
    /// Name without any `[0]` array suffix
    pub name: String,
    /// Location, `None` when the driver reports -1 (e.g. uniform block members)
    pub location: Option<UniformLocation>,
    /// Declared type
    pub declared_type: GlslType,
    /// Array length, 1 for non-arrays
    pub array_len: u32,
}

/// One active vertex attribute of a linked program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderAttributeInfo {
    /// Name without any `[0]` array suffix
    pub name: String,
    /// Binding location, `None` for built-ins such as `gl_VertexID`
    pub location: Option<u32>,
    /// Declared type
    pub declared_type: GlslType,
    /// Array length, 1 for non-arrays
    pub array_len: u32,
}

struct LinkedProgram {
    handle: ProgramHandle,
    uniforms: HashMap<String, ShaderUniformInfo>,
    attributes: HashMap<String, ShaderAttributeInfo>,
}

enum ProgramState {
    Uninitialized,
    Ready(LinkedProgram),
    Released,
}

/// A vertex + fragment shader program owned by one GL context
pub struct GpuProgram<G: GlApi> {
    gl: Rc<G>,
    state: ProgramState,
}

fn strip_array_suffix(name: &str) -> &str {
    name.strip_suffix("[0]").unwrap_or(name)
}

#[allow(clippy::cast_sign_loss)]
fn array_len(size: i32) -> u32 {
    size.max(1) as u32
}

impl<G: GlApi> GpuProgram<G> {
    /// Create an empty program; nothing is allocated until [`initialize`](Self::initialize)
    pub const fn new(gl: Rc<G>) -> Self {
        Self {
            gl,
            state: ProgramState::Uninitialized,
        }
    }

    /// Build and initialize in one step
    pub fn from_source(gl: Rc<G>, vertex_source: &str, fragment_source: &str) -> ProgramResult<Self> {
        let mut program = Self::new(gl);
        program.initialize(vertex_source, fragment_source)?;
        Ok(program)
    }

    /// Compile both stages, link them, and reflect the active uniforms and
    /// attributes.
    ///
    /// On any failure no native object survives and the program stays
    /// uninitialized.
    pub fn initialize(&mut self, vertex_source: &str, fragment_source: &str) -> ProgramResult<()> {
        match self.state {
            ProgramState::Uninitialized => {}
            ProgramState::Ready(_) => return Err(ProgramError::AlreadyInitialized),
            ProgramState::Released => return Err(ProgramError::UseAfterRelease),
        }

        let gl = self.gl.as_ref();
        let handle = {
            let vertex = compile_stage(gl, vertex_source, ShaderStage::Vertex)?;
            let fragment = compile_stage(gl, fragment_source, ShaderStage::Fragment)?;
            link_program(gl, &vertex, &fragment)?
            // stage objects are deleted here
        };

        let uniforms = Self::reflect_uniforms(gl, handle);
        let attributes = Self::reflect_attributes(gl, handle);
        debug!(
            "Initialized {}: {} active uniforms, {} active attributes",
            handle,
            uniforms.len(),
            attributes.len()
        );

        self.state = ProgramState::Ready(LinkedProgram {
            handle,
            uniforms,
            attributes,
        });
        Ok(())
    }

    fn reflect_uniforms(gl: &G, handle: ProgramHandle) -> HashMap<String, ShaderUniformInfo> {
        let count = gl.active_uniform_count(handle);
        let mut uniforms = HashMap::with_capacity(count as usize);
        for index in 0..count {
            let Some(active) = gl.active_uniform(handle, index) else {
                continue;
            };
            let info = ShaderUniformInfo {
                name: strip_array_suffix(&active.name).to_string(),
                location: gl.uniform_location(handle, &active.name),
                declared_type: GlslType::from_gl(active.gl_type),
                array_len: array_len(active.size),
            };
            trace!("  uniform {} {} at {:?}", info.declared_type, info.name, info.location);
            uniforms.insert(info.name.clone(), info);
        }
        uniforms
    }

    fn reflect_attributes(gl: &G, handle: ProgramHandle) -> HashMap<String, ShaderAttributeInfo> {
        let count = gl.active_attribute_count(handle);
        let mut attributes = HashMap::with_capacity(count as usize);
        for index in 0..count {
            let Some(active) = gl.active_attribute(handle, index) else {
                continue;
            };
            let info = ShaderAttributeInfo {
                name: strip_array_suffix(&active.name).to_string(),
                location: gl.attribute_location(handle, &active.name),
                declared_type: GlslType::from_gl(active.gl_type),
                array_len: array_len(active.size),
            };
            trace!("  attribute {} {} at {:?}", info.declared_type, info.name, info.location);
            attributes.insert(info.name.clone(), info);
        }
        attributes
    }

    fn linked(&self) -> ProgramResult<Option<&LinkedProgram>> {
        match &self.state {
            ProgramState::Uninitialized => Ok(None),
            ProgramState::Ready(linked) => Ok(Some(linked)),
            ProgramState::Released => Err(ProgramError::UseAfterRelease),
        }
    }

    /// Whether `initialize` has succeeded and `release` has not run
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, ProgramState::Ready(_))
    }

    /// Whether `release` has run
    pub const fn is_released(&self) -> bool {
        matches!(self.state, ProgramState::Released)
    }

    /// Native program handle, available while ready
    pub fn handle(&self) -> Option<ProgramHandle> {
        match &self.state {
            ProgramState::Ready(linked) => Some(linked.handle),
            _ => None,
        }
    }

    /// Copy of the reflected uniform table, sorted by name
    pub fn uniforms(&self) -> Vec<ShaderUniformInfo> {
        let mut list: Vec<_> = match &self.state {
            ProgramState::Ready(linked) => linked.uniforms.values().cloned().collect(),
            _ => Vec::new(),
        };
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    /// Copy of the reflected attribute table, sorted by name
    pub fn attributes(&self) -> Vec<ShaderAttributeInfo> {
        let mut list: Vec<_> = match &self.state {
            ProgramState::Ready(linked) => linked.attributes.values().cloned().collect(),
            _ => Vec::new(),
        };
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    /// Look up one reflected uniform (case-sensitive)
    pub fn uniform(&self, name: &str) -> Option<&ShaderUniformInfo> {
        match &self.state {
            ProgramState::Ready(linked) => linked.uniforms.get(name),
            _ => None,
        }
    }

    /// Look up one reflected attribute (case-sensitive)
    pub fn attribute(&self, name: &str) -> Option<&ShaderAttributeInfo> {
        match &self.state {
            ProgramState::Ready(linked) => linked.attributes.get(name),
            _ => None,
        }
    }

    /// Write a uniform.
    ///
    /// The name and value type are validated against the reflected table
    /// before any GL call. On success the program is bound, the value is
    /// written, and the program binding is cleared again.
    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) -> ProgramResult<()> {
        let value = value.into();
        let unknown = || ProgramError::UnknownUniform { name: name.to_string() };

        let linked = self.linked()?.ok_or_else(unknown)?;
        let info = linked.uniforms.get(name).ok_or_else(unknown)?;
        let location = info.location.ok_or_else(unknown)?;

        if !value.is_compatible_with(info.declared_type) {
            return Err(ProgramError::UniformTypeMismatch {
                name: name.to_string(),
                expected: info.declared_type,
                actual: value.glsl_type(),
            });
        }

        let gl = self.gl.as_ref();
        gl.use_program(Some(linked.handle));
        match value {
            UniformValue::Float(x) => gl.uniform_1_f32(location, x),
            UniformValue::Vec2([x, y]) => gl.uniform_2_f32(location, x, y),
            UniformValue::Vec3([x, y, z]) => gl.uniform_3_f32(location, x, y, z),
            UniformValue::Vec4([x, y, z, w]) => gl.uniform_4_f32(location, x, y, z, w),
            UniformValue::Int(x) => gl.uniform_1_i32(location, x),
            UniformValue::Mat4(m) => gl.uniform_matrix_4_f32(location, &m),
        }
        gl.use_program(None);
        Ok(())
    }

    /// Set a `float` uniform
    pub fn set_uniform_1f(&self, name: &str, x: f32) -> ProgramResult<()> {
        self.set_uniform(name, UniformValue::Float(x))
    }

    /// Set a `vec2` uniform
    pub fn set_uniform_2f(&self, name: &str, x: f32, y: f32) -> ProgramResult<()> {
        self.set_uniform(name, UniformValue::Vec2([x, y]))
    }

    /// Make this program current for subsequent draw calls
    pub fn bind(&self) -> ProgramResult<()> {
        match self.linked()? {
            Some(linked) => {
                self.gl.use_program(Some(linked.handle));
                Ok(())
            }
            None => Err(ProgramError::NotInitialized),
        }
    }

    /// Clear the current program binding
    pub fn unbind(&self) {
        self.gl.use_program(None);
    }

    /// Check the reflected attribute locations against a vertex layout.
    ///
    /// Every active attribute with a location must read a slot the layout
    /// provides, and an attribute whose name matches a layout slot must sit
    /// at that slot's index. Fails with `NotInitialized` before a successful
    /// `initialize`.
    pub fn validate_layout(&self, layout: &VertexLayoutDescriptor) -> ProgramResult<()> {
        let Some(linked) = self.linked()? else {
            return Err(ProgramError::NotInitialized);
        };

        let mut attributes: Vec<&ShaderAttributeInfo> = linked.attributes.values().collect();
        attributes.sort_by_key(|a| a.location);

        for attribute in attributes {
            let Some(location) = attribute.location else {
                continue;
            };
            if let Some(slot) = layout.slot_named(&attribute.name) {
                if slot.slot_index() != location {
                    return Err(ProgramError::AttributeSlotMismatch {
                        name: attribute.name.clone(),
                        shader_location: location,
                        layout_slot: slot.slot_index(),
                    });
                }
            }
            if layout.slot(location).is_none() {
                return Err(ProgramError::MissingAttributeSlot {
                    name: attribute.name.clone(),
                    shader_location: location,
                });
            }
        }
        Ok(())
    }

    /// Delete the native program. Safe to call any number of times, in any state.
    pub fn release(&mut self) {
        if let ProgramState::Ready(linked) = std::mem::replace(&mut self.state, ProgramState::Released) {
            self.gl.use_program(None);
            self.gl.delete_program(linked.handle);
            debug!("Released {}", linked.handle);
        }
    }
}

impl<G: GlApi> Drop for GpuProgram<G> {
    fn drop(&mut self) {
        self.release();
    }
}
