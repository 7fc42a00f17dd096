//! Shader stage compilation and program linking
//!
//! Stage objects only live long enough to be linked. [`CompiledStage`] owns
//! one and deletes it when dropped, so every exit path out of program
//! construction (success, compile failure, link failure) releases them.

use std::fmt;

use log::{debug, warn};

use crate::render::error::{ProgramError, ProgramResult};
use crate::render::gl::{GlApi, ProgramHandle, ShaderHandle};

/// Pipeline step a shader stage is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Per-vertex stage
    Vertex,
    /// Per-fragment stage
    Fragment,
}

impl ShaderStage {
    /// Raw GL enum
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

/// A successfully compiled stage object, deleted on drop
pub struct CompiledStage<'gl, G: GlApi + ?Sized> {
    gl: &'gl G,
    handle: ShaderHandle,
    stage: ShaderStage,
    info_log: String,
}

impl<'gl, G: GlApi + ?Sized> CompiledStage<'gl, G> {
    /// Native handle
    pub const fn handle(&self) -> ShaderHandle {
        self.handle
    }

    /// Stage kind
    pub const fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Compiler output of a successful compile; usually empty, otherwise warnings
    pub fn info_log(&self) -> &str {
        &self.info_log
    }
}

impl<G: GlApi + ?Sized> Drop for CompiledStage<'_, G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.handle);
    }
}

/// Compile `source` as a `stage` shader.
///
/// The compile status decides success. On failure the compiler log is
/// returned in [`ProgramError::ShaderCompile`] and the stage object is
/// deleted before returning.
pub fn compile_stage<'gl, G: GlApi + ?Sized>(
    gl: &'gl G,
    source: &str,
    stage: ShaderStage,
) -> ProgramResult<CompiledStage<'gl, G>> {
    let handle = gl
        .create_shader(stage)
        .map_err(|reason| ProgramError::ObjectCreation { object: "shader", reason })?;

    gl.shader_source(handle, source);
    gl.compile_shader(handle);

    let compiled = gl.shader_compile_status(handle);
    let info_log = gl.shader_info_log(handle).trim_end().to_string();

    // Guard first so a failed compile still deletes the object
    let stage_object = CompiledStage { gl, handle, stage, info_log };

    if !compiled {
        let log = if stage_object.info_log.is_empty() {
            "compiler reported failure without diagnostics".to_string()
        } else {
            stage_object.info_log.clone()
        };
        return Err(ProgramError::ShaderCompile { stage, log });
    }

    if !stage_object.info_log.is_empty() {
        warn!("{} shader compiled with diagnostics:\n{}", stage, stage_object.info_log);
    }
    debug!("Compiled {} shader ({} bytes of source)", stage, source.len());

    Ok(stage_object)
}

/// Link a vertex and a fragment stage into a new program.
///
/// Both stages are detached after linking; the caller drops them once this
/// returns. The link status is checked explicitly and a failed program is
/// deleted before [`ProgramError::ShaderLink`] is returned.
pub fn link_program<G: GlApi + ?Sized>(
    gl: &G,
    vertex: &CompiledStage<'_, G>,
    fragment: &CompiledStage<'_, G>,
) -> ProgramResult<ProgramHandle> {
    debug_assert_eq!(vertex.stage(), ShaderStage::Vertex);
    debug_assert_eq!(fragment.stage(), ShaderStage::Fragment);

    let program = gl
        .create_program()
        .map_err(|reason| ProgramError::ObjectCreation { object: "program", reason })?;

    gl.attach_shader(program, vertex.handle());
    gl.attach_shader(program, fragment.handle());

    gl.link_program(program);

    gl.detach_shader(program, vertex.handle());
    gl.detach_shader(program, fragment.handle());

    if !gl.program_link_status(program) {
        let log = gl.program_info_log(program).trim_end().to_string();
        gl.delete_program(program);
        let log = if log.is_empty() {
            "linker reported failure without diagnostics".to_string()
        } else {
            log
        };
        return Err(ProgramError::ShaderLink { log });
    }

    let log = gl.program_info_log(program);
    if !log.trim().is_empty() {
        warn!("{} linked with diagnostics:\n{}", program, log.trim_end());
    }
    debug!("Linked {}", program);

    Ok(program)
}
