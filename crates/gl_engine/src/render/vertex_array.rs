//! Vertex array objects
//!
//! A [`VertexArray`] captures the attribute-pointer setup for one vertex
//! buffer, derived from the buffer's [`VertexLayoutDescriptor`], plus an
//! optional index buffer. Drawing binds the array, issues the draw and clears
//! the binding again.
//!
//! [`VertexLayoutDescriptor`]: crate::render::vertex_layout::VertexLayoutDescriptor

use std::rc::Rc;

use log::debug;

use crate::render::buffer::{BufferError, BufferResult, IndexBuffer, VertexBuffer};
use crate::render::gl::{BufferTarget, GlApi, PrimitiveMode, VertexArrayHandle};
use crate::render::vertex_layout::Vertex;

/// Attribute bindings for one vertex buffer
pub struct VertexArray<G: GlApi> {
    gl: Rc<G>,
    handle: Option<VertexArrayHandle>,
    has_indices: bool,
}

impl<G: GlApi> VertexArray<G> {
    /// Record one attribute pointer per layout slot of `vertices`
    pub fn new<V: Vertex>(vertices: &VertexBuffer<G, V>) -> BufferResult<Self> {
        let buffer = vertices.handle().ok_or(BufferError::UseAfterRelease)?;
        let gl = Rc::clone(vertices.gl());
        let handle = gl.create_vertex_array().map_err(|reason| BufferError::Creation {
            object: "vertex array",
            reason,
        })?;

        let layout = V::layout();
        gl.bind_vertex_array(Some(handle));
        gl.bind_buffer(BufferTarget::Array, Some(buffer));
        for slot in layout.slots() {
            gl.vertex_attrib_pointer_f32(
                slot.slot_index(),
                slot.component_count(),
                layout.stride_bytes(),
                slot.byte_offset(),
            );
            gl.enable_vertex_attrib_array(slot.slot_index());
        }
        gl.bind_vertex_array(None);
        gl.bind_buffer(BufferTarget::Array, None);

        debug!("Created vertex array with {} attribute slots", layout.slots().len());

        Ok(Self {
            gl,
            handle: Some(handle),
            has_indices: false,
        })
    }

    /// Attach an index buffer for [`draw_indexed`](Self::draw_indexed)
    pub fn set_index_buffer(&mut self, indices: &IndexBuffer<G>) -> BufferResult<()> {
        let handle = self.handle.ok_or(BufferError::UseAfterRelease)?;
        let buffer = indices.handle().ok_or(BufferError::UseAfterRelease)?;

        // The element binding is vertex array state, so it stays bound
        self.gl.bind_vertex_array(Some(handle));
        self.gl.bind_buffer(BufferTarget::ElementArray, Some(buffer));
        self.gl.bind_vertex_array(None);

        self.has_indices = true;
        Ok(())
    }

    /// Whether an index buffer is attached
    pub const fn has_indices(&self) -> bool {
        self.has_indices
    }

    /// Native handle, `None` after release
    pub const fn handle(&self) -> Option<VertexArrayHandle> {
        self.handle
    }

    /// Draw `count` vertices starting at `first`
    pub fn draw_arrays(&self, mode: PrimitiveMode, first: u32, count: u32) -> BufferResult<()> {
        let handle = self.handle.ok_or(BufferError::UseAfterRelease)?;
        self.gl.bind_vertex_array(Some(handle));
        self.gl.draw_arrays(mode, first, count);
        self.gl.bind_vertex_array(None);
        Ok(())
    }

    /// Draw `count` indices from the attached index buffer
    pub fn draw_indexed(&self, mode: PrimitiveMode, count: u32) -> BufferResult<()> {
        let handle = self.handle.ok_or(BufferError::UseAfterRelease)?;
        if !self.has_indices {
            return Err(BufferError::MissingIndexBuffer);
        }
        self.gl.bind_vertex_array(Some(handle));
        self.gl.draw_elements_u32(mode, count, 0);
        self.gl.bind_vertex_array(None);
        Ok(())
    }

    /// Delete the native vertex array; idempotent
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.gl.delete_vertex_array(handle);
        }
    }
}

impl<G: GlApi> Drop for VertexArray<G> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::gl::mock::{GlCall, MockGl};
    use crate::render::gl::BufferUsage;
    use crate::render::vertex_layout::VertexPositionColor;

    fn vertex_buffer(gl: &Rc<MockGl>) -> VertexBuffer<MockGl, VertexPositionColor> {
        VertexBuffer::new(Rc::clone(gl), 4, BufferUsage::Static).unwrap()
    }

    #[test]
    fn test_attribute_pointers_follow_layout() {
        let gl = Rc::new(MockGl::new());
        let vertices = vertex_buffer(&gl);
        gl.clear_calls();

        let vao = VertexArray::new(&vertices).unwrap();

        assert_eq!(
            gl.calls(),
            vec![
                GlCall::CreateVertexArray,
                GlCall::BindVertexArray(vao.handle()),
                GlCall::BindBuffer(BufferTarget::Array, vertices.handle()),
                GlCall::VertexAttribPointer { index: 0, components: 2, stride: 24, offset: 0 },
                GlCall::EnableVertexAttribArray(0),
                GlCall::VertexAttribPointer { index: 1, components: 4, stride: 24, offset: 8 },
                GlCall::EnableVertexAttribArray(1),
                GlCall::BindVertexArray(None),
                GlCall::BindBuffer(BufferTarget::Array, None),
            ]
        );
    }

    #[test]
    fn test_draw_arrays_binds_and_unbinds() {
        let gl = Rc::new(MockGl::new());
        let vertices = vertex_buffer(&gl);
        let vao = VertexArray::new(&vertices).unwrap();
        gl.clear_calls();

        vao.draw_arrays(PrimitiveMode::Triangles, 0, 3).unwrap();

        assert_eq!(
            gl.calls(),
            vec![
                GlCall::BindVertexArray(vao.handle()),
                GlCall::DrawArrays(PrimitiveMode::Triangles, 0, 3),
                GlCall::BindVertexArray(None),
            ]
        );
    }

    #[test]
    fn test_draw_indexed_requires_index_buffer() {
        let gl = Rc::new(MockGl::new());
        let vertices = vertex_buffer(&gl);
        let mut vao = VertexArray::new(&vertices).unwrap();
        assert_eq!(
            vao.draw_indexed(PrimitiveMode::Triangles, 6),
            Err(BufferError::MissingIndexBuffer)
        );

        let indices = IndexBuffer::new(Rc::clone(&gl), 6, BufferUsage::Static).unwrap();
        vao.set_index_buffer(&indices).unwrap();
        assert!(vao.has_indices());
        gl.clear_calls();

        vao.draw_indexed(PrimitiveMode::Triangles, 6).unwrap();
        assert!(gl.calls().contains(&GlCall::DrawElements(PrimitiveMode::Triangles, 6, 0)));
    }

    #[test]
    fn test_index_binding_is_kept_in_vertex_array() {
        let gl = Rc::new(MockGl::new());
        let vertices = vertex_buffer(&gl);
        let indices = IndexBuffer::new(Rc::clone(&gl), 6, BufferUsage::Static).unwrap();
        let mut vao = VertexArray::new(&vertices).unwrap();
        gl.clear_calls();

        vao.set_index_buffer(&indices).unwrap();

        assert!(!gl.calls().contains(&GlCall::BindBuffer(BufferTarget::ElementArray, None)));
    }

    #[test]
    fn test_released_buffer_rejected() {
        let gl = Rc::new(MockGl::new());
        let mut vertices = vertex_buffer(&gl);
        vertices.release();
        assert!(matches!(VertexArray::new(&vertices), Err(BufferError::UseAfterRelease)));
    }

    #[test]
    fn test_release_on_drop() {
        let gl = Rc::new(MockGl::new());
        let vertices = vertex_buffer(&gl);
        {
            let mut vao = VertexArray::new(&vertices).unwrap();
            assert_eq!(gl.live_vertex_array_count(), 1);
            vao.release();
            vao.release();
            assert_eq!(vao.draw_arrays(PrimitiveMode::Points, 0, 1), Err(BufferError::UseAfterRelease));
        }
        assert_eq!(gl.live_vertex_array_count(), 0);
        assert_eq!(gl.live_buffer_count(), 1);
    }
}
