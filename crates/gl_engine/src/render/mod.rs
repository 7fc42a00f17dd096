//! # Rendering System
//!
//! GPU resource layer over OpenGL 3.3 core.
//!
//! ## Architecture
//!
//! - **GL seam**: [`gl::GlApi`] is the only way resources talk to the driver;
//!   it is implemented for `glow::Context`
//! - **Programs**: [`GpuProgram`] compiles, links and reflects a vertex and a
//!   fragment stage, and owns the resulting program object
//! - **Vertex data**: [`VertexLayoutDescriptor`] describes a vertex record;
//!   [`VertexBuffer`], [`IndexBuffer`] and [`VertexArray`] move it to the GPU
//! - **Window**: [`GlWindow`] owns the GLFW window and its context
//!
//! ## Threading
//!
//! Every resource holds an `Rc` of the context it was created from, so none
//! of them can leave the thread that owns the context.

pub mod buffer;
pub mod error;
pub mod gl;
pub mod program;
pub mod shader;
pub mod uniform;
pub mod vertex_array;
pub mod vertex_layout;
pub mod window;

pub use buffer::{BufferError, BufferResult, IndexBuffer, VertexBuffer};
pub use error::{ProgramError, ProgramResult};
pub use gl::{BufferUsage, GlApi, GlContext, PrimitiveMode};
pub use program::{GpuProgram, ShaderAttributeInfo, ShaderUniformInfo};
pub use shader::ShaderStage;
pub use uniform::{GlslType, UniformValue};
pub use vertex_array::VertexArray;
pub use vertex_layout::{
    LayoutError, Vertex, VertexAttributeSlot, VertexLayoutDescriptor, VertexPositionColor,
    VertexPositionTexture,
};
pub use window::{GlWindow, WindowError, WindowResult};
