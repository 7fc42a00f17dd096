//! Vertex and index buffers
//!
//! Buffers are allocated once with a fixed capacity and filled with
//! `set_data`. Uploads bind the buffer, write, then clear the binding so the
//! caller's steady-state bindings are not disturbed.

use std::marker::PhantomData;
use std::mem::size_of;
use std::rc::Rc;

use log::debug;
use thiserror::Error;

use crate::render::gl::{BufferHandle, BufferTarget, BufferUsage, GlApi};
use crate::render::vertex_layout::Vertex;

/// Buffer management errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("failed to create {object}: {reason}")]
    Creation { object: &'static str, reason: String },

    #[error("{requested} elements do not fit in a buffer of {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error("{capacity} elements of {element_size} bytes exceed the largest GL buffer")]
    TooLarge { capacity: usize, element_size: usize },

    #[error("vertex type is {size} bytes but its layout declares a stride of {stride}")]
    StrideMismatch { size: usize, stride: u32 },

    #[error("indexed draw on a vertex array without an index buffer")]
    MissingIndexBuffer,

    #[error("buffer used after release")]
    UseAfterRelease,
}

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Byte size of `capacity` elements of `element_size`, as GL's signed size
fn allocation_size(capacity: usize, element_size: usize) -> BufferResult<i32> {
    capacity
        .checked_mul(element_size)
        .and_then(|bytes| i32::try_from(bytes).ok())
        .ok_or(BufferError::TooLarge { capacity, element_size })
}

/// A GPU buffer of `V` vertices laid out by `V::layout()`
pub struct VertexBuffer<G: GlApi, V: Vertex> {
    gl: Rc<G>,
    handle: Option<BufferHandle>,
    capacity: usize,
    len: usize,
    _vertex: PhantomData<V>,
}

impl<G: GlApi, V: Vertex> VertexBuffer<G, V> {
    /// Allocate room for `capacity` vertices
    pub fn new(gl: Rc<G>, capacity: usize, usage: BufferUsage) -> BufferResult<Self> {
        let stride = V::layout().stride_bytes();
        if stride as usize != size_of::<V>() {
            return Err(BufferError::StrideMismatch {
                size: size_of::<V>(),
                stride,
            });
        }
        let size = allocation_size(capacity, size_of::<V>())?;

        let handle = gl.create_buffer().map_err(|reason| BufferError::Creation {
            object: "vertex buffer",
            reason,
        })?;
        gl.bind_buffer(BufferTarget::Array, Some(handle));
        gl.buffer_data_size(BufferTarget::Array, size, usage);
        gl.bind_buffer(BufferTarget::Array, None);

        debug!("Created vertex buffer: {} x {} bytes", capacity, size_of::<V>());

        Ok(Self {
            gl,
            handle: Some(handle),
            capacity,
            len: 0,
            _vertex: PhantomData,
        })
    }

    /// Upload `vertices` to the start of the buffer
    pub fn set_data(&mut self, vertices: &[V]) -> BufferResult<()> {
        let handle = self.handle.ok_or(BufferError::UseAfterRelease)?;
        if vertices.len() > self.capacity {
            return Err(BufferError::CapacityExceeded {
                requested: vertices.len(),
                capacity: self.capacity,
            });
        }

        self.gl.bind_buffer(BufferTarget::Array, Some(handle));
        self.gl.buffer_sub_data(BufferTarget::Array, 0, bytemuck::cast_slice(vertices));
        self.gl.bind_buffer(BufferTarget::Array, None);

        self.len = vertices.len();
        Ok(())
    }

    /// Native handle, `None` after release
    pub const fn handle(&self) -> Option<BufferHandle> {
        self.handle
    }

    /// Maximum number of vertices
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of vertices uploaded by the last `set_data`
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been uploaded
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn gl(&self) -> &Rc<G> {
        &self.gl
    }

    /// Delete the native buffer; idempotent
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.gl.delete_buffer(handle);
        }
    }
}

impl<G: GlApi, V: Vertex> Drop for VertexBuffer<G, V> {
    fn drop(&mut self) {
        self.release();
    }
}

/// A GPU buffer of `u32` indices
pub struct IndexBuffer<G: GlApi> {
    gl: Rc<G>,
    handle: Option<BufferHandle>,
    capacity: usize,
    len: usize,
}

impl<G: GlApi> IndexBuffer<G> {
    /// Allocate room for `capacity` indices
    pub fn new(gl: Rc<G>, capacity: usize, usage: BufferUsage) -> BufferResult<Self> {
        let size = allocation_size(capacity, size_of::<u32>())?;
        let handle = gl.create_buffer().map_err(|reason| BufferError::Creation {
            object: "index buffer",
            reason,
        })?;
        gl.bind_buffer(BufferTarget::ElementArray, Some(handle));
        gl.buffer_data_size(BufferTarget::ElementArray, size, usage);
        gl.bind_buffer(BufferTarget::ElementArray, None);

        Ok(Self {
            gl,
            handle: Some(handle),
            capacity,
            len: 0,
        })
    }

    /// Upload `indices` to the start of the buffer
    pub fn set_data(&mut self, indices: &[u32]) -> BufferResult<()> {
        let handle = self.handle.ok_or(BufferError::UseAfterRelease)?;
        if indices.len() > self.capacity {
            return Err(BufferError::CapacityExceeded {
                requested: indices.len(),
                capacity: self.capacity,
            });
        }

        self.gl.bind_buffer(BufferTarget::ElementArray, Some(handle));
        self.gl.buffer_sub_data(BufferTarget::ElementArray, 0, bytemuck::cast_slice(indices));
        self.gl.bind_buffer(BufferTarget::ElementArray, None);

        self.len = indices.len();
        Ok(())
    }

    /// Native handle, `None` after release
    pub const fn handle(&self) -> Option<BufferHandle> {
        self.handle
    }

    /// Maximum number of indices
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of indices uploaded by the last `set_data`
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been uploaded
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Delete the native buffer; idempotent
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.gl.delete_buffer(handle);
        }
    }
}

impl<G: GlApi> Drop for IndexBuffer<G> {
    fn drop(&mut self) {
        self.release();
    }
}
