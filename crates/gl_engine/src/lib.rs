//! # GL Engine
//!
//! OpenGL shader programs and vertex data as owned Rust resources.
//!
//! ## Features
//!
//! - **Shader Programs**: compile and link GLSL 330 stages with the driver's
//!   diagnostics surfaced as typed errors
//! - **Reflection**: active uniforms and attributes are read once at link
//!   time; uniform writes are checked against the declared type
//! - **Vertex Layouts**: one descriptor per vertex type drives attribute setup
//! - **RAII**: every GPU object is released exactly once, on `release` or drop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gl_engine::prelude::*;
//!
//! const VERTEX: &str = "#version 330 core
//! layout (location = 0) in vec2 Position;
//! void main() { gl_Position = vec4(Position, 0.0, 1.0); }";
//!
//! const FRAGMENT: &str = "#version 330 core
//! uniform float ColorFactor;
//! out vec4 FragColor;
//! void main() { FragColor = vec4(ColorFactor); }";
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     init_logging(&config.logging);
//!
//!     let window = GlWindow::new(&config.window)?;
//!     let program = GpuProgram::from_source(window.gl(), VERTEX, FRAGMENT)?;
//!     program.set_uniform("ColorFactor", 0.5_f32)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{ApplicationConfig, Config, LoggingConfig, WindowConfig},
        foundation::logging::init_logging,
        render::{
            BufferUsage, GlApi, GlWindow, GpuProgram, IndexBuffer, PrimitiveMode, ProgramError,
            ShaderStage, UniformValue, Vertex, VertexArray, VertexBuffer, VertexLayoutDescriptor,
            VertexPositionColor,
        },
    };
}
