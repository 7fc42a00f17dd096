//! OpenGL driver seam
//!
//! Every GL entry point used by the resource layer goes through [`GlApi`].
//! The production implementation forwards to a `glow::Context`; tests use an
//! in-crate fake driver that records calls and reflects shader source.
//!
//! Handles are crate-owned newtypes rather than raw integers so a buffer can
//! never be passed where a program is expected. They are only ever produced
//! by a `GlApi` implementation.

mod glow_backend;

#[cfg(test)]
pub(crate) mod mock;

pub use glow_backend::load_context;

/// The production context type
pub type GlContext = glow::Context;

use std::fmt;
use std::num::NonZeroU32;

use crate::render::shader::ShaderStage;

/// Native shader stage object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub NonZeroU32);

/// Native program object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub NonZeroU32);

/// Native buffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub NonZeroU32);

/// Native vertex array object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub NonZeroU32);

/// Location of an active uniform inside a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

impl fmt::Display for ProgramHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "program#{}", self.0)
    }
}

/// One row of a program's active uniform or attribute table, as reported
/// by the driver before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVariable {
    /// Name as reported; arrays carry a `[0]` suffix
    pub name: String,
    /// Raw GL type enum (`GL_FLOAT`, `GL_FLOAT_VEC2`, ...)
    pub gl_type: u32,
    /// Array length, 1 for non-arrays
    pub size: i32,
}

/// Buffer binding points used by this layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// `GL_ARRAY_BUFFER`
    Array,
    /// `GL_ELEMENT_ARRAY_BUFFER`
    ElementArray,
}

impl BufferTarget {
    /// Raw GL enum
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Array => glow::ARRAY_BUFFER,
            Self::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// Expected update frequency of a buffer's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Written once, drawn many times
    #[default]
    Static,
    /// Rewritten occasionally
    Dynamic,
    /// Rewritten every frame
    Stream,
}

impl BufferUsage {
    /// Raw GL enum
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Static => glow::STATIC_DRAW,
            Self::Dynamic => glow::DYNAMIC_DRAW,
            Self::Stream => glow::STREAM_DRAW,
        }
    }
}

/// Primitive assembly mode for draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveMode {
    /// Independent triangles
    #[default]
    Triangles,
    /// Triangle strip
    TriangleStrip,
    /// Independent line segments
    Lines,
    /// Points
    Points,
}

impl PrimitiveMode {
    /// Raw GL enum
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Triangles => glow::TRIANGLES,
            Self::TriangleStrip => glow::TRIANGLE_STRIP,
            Self::Lines => glow::LINES,
            Self::Points => glow::POINTS,
        }
    }
}

/// The subset of OpenGL this layer drives.
///
/// All methods must be called on the thread that owns the current context.
/// Implementations are expected to be cheap forwarding shims; validation
/// lives in the resource types, not here.
pub trait GlApi {
    // Shader stages
    /// Create an empty shader object for `stage`
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, String>;
    /// Replace the source text of `shader`
    fn shader_source(&self, shader: ShaderHandle, source: &str);
    /// Compile the current source of `shader`
    fn compile_shader(&self, shader: ShaderHandle);
    /// `GL_COMPILE_STATUS`
    fn shader_compile_status(&self, shader: ShaderHandle) -> bool;
    /// Compiler diagnostics for `shader`, possibly empty
    fn shader_info_log(&self, shader: ShaderHandle) -> String;
    /// Delete a shader object
    fn delete_shader(&self, shader: ShaderHandle);

    // Programs
    /// Create an empty program object
    fn create_program(&self) -> Result<ProgramHandle, String>;
    /// Attach a compiled stage
    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    /// Detach a stage
    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    /// Link attached stages
    fn link_program(&self, program: ProgramHandle);
    /// `GL_LINK_STATUS`
    fn program_link_status(&self, program: ProgramHandle) -> bool;
    /// Linker diagnostics, possibly empty
    fn program_info_log(&self, program: ProgramHandle) -> String;
    /// Delete a program object
    fn delete_program(&self, program: ProgramHandle);
    /// Make `program` current, or clear the binding with `None`
    fn use_program(&self, program: Option<ProgramHandle>);

    // Reflection
    /// `GL_ACTIVE_UNIFORMS`
    fn active_uniform_count(&self, program: ProgramHandle) -> u32;
    /// Row `index` of the active uniform table
    fn active_uniform(&self, program: ProgramHandle, index: u32) -> Option<ActiveVariable>;
    /// Location of a uniform, `None` when the driver reports -1
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;
    /// `GL_ACTIVE_ATTRIBUTES`
    fn active_attribute_count(&self, program: ProgramHandle) -> u32;
    /// Row `index` of the active attribute table
    fn active_attribute(&self, program: ProgramHandle, index: u32) -> Option<ActiveVariable>;
    /// Location of an attribute, `None` when the driver reports -1
    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32>;

    // Uniform setters; they act on the currently bound program
    /// `glUniform1f`
    fn uniform_1_f32(&self, location: UniformLocation, x: f32);
    /// `glUniform2f`
    fn uniform_2_f32(&self, location: UniformLocation, x: f32, y: f32);
    /// `glUniform3f`
    fn uniform_3_f32(&self, location: UniformLocation, x: f32, y: f32, z: f32);
    /// `glUniform4f`
    fn uniform_4_f32(&self, location: UniformLocation, x: f32, y: f32, z: f32, w: f32);
    /// `glUniform1i`
    fn uniform_1_i32(&self, location: UniformLocation, x: i32);
    /// `glUniformMatrix4fv` with a single column-major matrix
    fn uniform_matrix_4_f32(&self, location: UniformLocation, matrix: &[f32; 16]);

    // Buffers
    /// Create an unbound buffer object
    fn create_buffer(&self) -> Result<BufferHandle, String>;
    /// Bind `buffer` to `target`, or clear the target with `None`
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>);
    /// Allocate `size` uninitialised bytes for the buffer bound to `target`
    fn buffer_data_size(&self, target: BufferTarget, size: i32, usage: BufferUsage);
    /// Overwrite bytes of the buffer bound to `target`, starting at `offset`
    fn buffer_sub_data(&self, target: BufferTarget, offset: i32, data: &[u8]);
    /// Delete a buffer object
    fn delete_buffer(&self, buffer: BufferHandle);

    // Vertex arrays
    /// Create a vertex array object
    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String>;
    /// Bind a vertex array, or clear the binding with `None`
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>);
    /// Describe a float attribute of the bound array buffer
    fn vertex_attrib_pointer_f32(&self, index: u32, components: u32, stride: u32, offset: u32);
    /// Enable attribute slot `index` on the bound vertex array
    fn enable_vertex_attrib_array(&self, index: u32);
    /// Delete a vertex array object
    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle);

    // Frame
    /// `glViewport`
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    /// `glClearColor`
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    /// Clear the colour buffer
    fn clear_color_buffer(&self);
    /// `glDrawArrays`
    fn draw_arrays(&self, mode: PrimitiveMode, first: u32, count: u32);
    /// `glDrawElements` with `u32` indices from the bound element buffer
    fn draw_elements_u32(&self, mode: PrimitiveMode, count: u32, offset: usize);
}
