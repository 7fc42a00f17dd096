//! Shader program error taxonomy

use thiserror::Error;

use crate::render::shader::ShaderStage;
use crate::render::uniform::GlslType;

/// Errors raised while building or using a [`GpuProgram`](crate::render::GpuProgram)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgramError {
    /// The driver rejected a stage; `log` is the compiler output
    #[error("{stage} shader failed to compile:\n{log}")]
    ShaderCompile {
        /// Stage that failed
        stage: ShaderStage,
        /// Compiler diagnostics
        log: String,
    },

    /// Both stages compiled but the program did not link
    #[error("shader program failed to link:\n{log}")]
    ShaderLink {
        /// Linker diagnostics
        log: String,
    },

    /// No active uniform with this name exists in the program
    #[error("uniform \"{name}\" is not active in this program")]
    UnknownUniform {
        /// Requested uniform name
        name: String,
    },

    /// The uniform exists but was declared with a different type
    #[error("uniform \"{name}\" is declared as {expected} but was set with a {actual} value")]
    UniformTypeMismatch {
        /// Uniform name
        name: String,
        /// Type declared in the shader
        expected: GlslType,
        /// Type of the value supplied
        actual: GlslType,
    },

    /// The program has been released
    #[error("shader program used after release")]
    UseAfterRelease,

    /// The program has not been initialized yet
    #[error("shader program is not initialized")]
    NotInitialized,

    /// `initialize` was called on a program that is already linked
    #[error("shader program is already initialized")]
    AlreadyInitialized,

    /// The driver refused to create a GL object
    #[error("failed to create {object}: {reason}")]
    ObjectCreation {
        /// Kind of object
        object: &'static str,
        /// Driver message
        reason: String,
    },

    /// A shader attribute is bound to a different slot than the vertex layout declares
    #[error("attribute \"{name}\" is at location {shader_location} in the shader but the vertex layout expects slot {layout_slot}")]
    AttributeSlotMismatch {
        /// Attribute name in the shader
        name: String,
        /// Location reported by the driver
        shader_location: u32,
        /// Slot the layout declares under the same name
        layout_slot: u32,
    },

    /// A shader attribute reads a location the vertex layout does not feed
    #[error("attribute \"{name}\" reads location {shader_location}, which the vertex layout does not provide")]
    MissingAttributeSlot {
        /// Attribute name in the shader
        name: String,
        /// Location reported by the driver
        shader_location: u32,
    },
}

/// Result type for shader program operations
pub type ProgramResult<T> = Result<T, ProgramError>;
