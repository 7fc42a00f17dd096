//! `GlApi` for `glow::Context`
//!
//! All unsafe GL calls in the crate live here. Each call is sound as long as
//! the context is current on the calling thread and the handles were created
//! by this same context, which the resource types guarantee by holding the
//! context they were created from.

#![allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]

use glow::HasContext;

use super::{
    ActiveVariable, BufferHandle, BufferTarget, BufferUsage, GlApi, PrimitiveMode, ProgramHandle,
    ShaderHandle, UniformLocation, VertexArrayHandle,
};
use crate::render::shader::ShaderStage;

const fn shader(handle: ShaderHandle) -> glow::NativeShader {
    glow::NativeShader(handle.0)
}

const fn program(handle: ProgramHandle) -> glow::NativeProgram {
    glow::NativeProgram(handle.0)
}

const fn buffer(handle: BufferHandle) -> glow::NativeBuffer {
    glow::NativeBuffer(handle.0)
}

const fn vertex_array(handle: VertexArrayHandle) -> glow::NativeVertexArray {
    glow::NativeVertexArray(handle.0)
}

const fn location(location: UniformLocation) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(location.0)
}

/// Build a context from a window system's symbol loader.
///
/// The context the loader resolves against must be current on this thread
/// and stay current for as long as the returned `glow::Context` is used.
pub fn load_context<F>(loader: F) -> glow::Context
where
    F: FnMut(&str) -> *const std::ffi::c_void,
{
    unsafe { glow::Context::from_loader_function(loader) }
}

impl GlApi for glow::Context {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, String> {
        unsafe { HasContext::create_shader(self, stage.gl_enum()) }.map(|s| ShaderHandle(s.0))
    }

    fn shader_source(&self, handle: ShaderHandle, source: &str) {
        unsafe { HasContext::shader_source(self, shader(handle), source) }
    }

    fn compile_shader(&self, handle: ShaderHandle) {
        unsafe { HasContext::compile_shader(self, shader(handle)) }
    }

    fn shader_compile_status(&self, handle: ShaderHandle) -> bool {
        unsafe { self.get_shader_compile_status(shader(handle)) }
    }

    fn shader_info_log(&self, handle: ShaderHandle) -> String {
        unsafe { self.get_shader_info_log(shader(handle)) }
    }

    fn delete_shader(&self, handle: ShaderHandle) {
        unsafe { HasContext::delete_shader(self, shader(handle)) }
    }

    fn create_program(&self) -> Result<ProgramHandle, String> {
        unsafe { HasContext::create_program(self) }.map(|p| ProgramHandle(p.0))
    }

    fn attach_shader(&self, prog: ProgramHandle, handle: ShaderHandle) {
        unsafe { HasContext::attach_shader(self, program(prog), shader(handle)) }
    }

    fn detach_shader(&self, prog: ProgramHandle, handle: ShaderHandle) {
        unsafe { HasContext::detach_shader(self, program(prog), shader(handle)) }
    }

    fn link_program(&self, prog: ProgramHandle) {
        unsafe { HasContext::link_program(self, program(prog)) }
    }

    fn program_link_status(&self, prog: ProgramHandle) -> bool {
        unsafe { self.get_program_link_status(program(prog)) }
    }

    fn program_info_log(&self, prog: ProgramHandle) -> String {
        unsafe { self.get_program_info_log(program(prog)) }
    }

    fn delete_program(&self, prog: ProgramHandle) {
        unsafe { HasContext::delete_program(self, program(prog)) }
    }

    fn use_program(&self, prog: Option<ProgramHandle>) {
        unsafe { HasContext::use_program(self, prog.map(program)) }
    }

    fn active_uniform_count(&self, prog: ProgramHandle) -> u32 {
        unsafe { self.get_active_uniforms(program(prog)) }
    }

    fn active_uniform(&self, prog: ProgramHandle, index: u32) -> Option<ActiveVariable> {
        unsafe { self.get_active_uniform(program(prog), index) }.map(|u| ActiveVariable {
            name: u.name,
            gl_type: u.utype,
            size: u.size,
        })
    }

    fn uniform_location(&self, prog: ProgramHandle, name: &str) -> Option<UniformLocation> {
        unsafe { self.get_uniform_location(program(prog), name) }.map(|l| UniformLocation(l.0))
    }

    fn active_attribute_count(&self, prog: ProgramHandle) -> u32 {
        unsafe { self.get_active_attributes(program(prog)) }
    }

    fn active_attribute(&self, prog: ProgramHandle, index: u32) -> Option<ActiveVariable> {
        unsafe { self.get_active_attribute(program(prog), index) }.map(|a| ActiveVariable {
            name: a.name,
            gl_type: a.atype,
            size: a.size,
        })
    }

    fn attribute_location(&self, prog: ProgramHandle, name: &str) -> Option<u32> {
        unsafe { self.get_attrib_location(program(prog), name) }
    }

    fn uniform_1_f32(&self, loc: UniformLocation, x: f32) {
        unsafe { HasContext::uniform_1_f32(self, Some(&location(loc)), x) }
    }

    fn uniform_2_f32(&self, loc: UniformLocation, x: f32, y: f32) {
        unsafe { HasContext::uniform_2_f32(self, Some(&location(loc)), x, y) }
    }

    fn uniform_3_f32(&self, loc: UniformLocation, x: f32, y: f32, z: f32) {
        unsafe { HasContext::uniform_3_f32(self, Some(&location(loc)), x, y, z) }
    }

    fn uniform_4_f32(&self, loc: UniformLocation, x: f32, y: f32, z: f32, w: f32) {
        unsafe { HasContext::uniform_4_f32(self, Some(&location(loc)), x, y, z, w) }
    }

    fn uniform_1_i32(&self, loc: UniformLocation, x: i32) {
        unsafe { HasContext::uniform_1_i32(self, Some(&location(loc)), x) }
    }

    fn uniform_matrix_4_f32(&self, loc: UniformLocation, matrix: &[f32; 16]) {
        unsafe { self.uniform_matrix_4_f32_slice(Some(&location(loc)), false, matrix) }
    }

    fn create_buffer(&self) -> Result<BufferHandle, String> {
        unsafe { HasContext::create_buffer(self) }.map(|b| BufferHandle(b.0))
    }

    fn bind_buffer(&self, target: BufferTarget, handle: Option<BufferHandle>) {
        unsafe { HasContext::bind_buffer(self, target.gl_enum(), handle.map(buffer)) }
    }

    fn buffer_data_size(&self, target: BufferTarget, size: i32, usage: BufferUsage) {
        unsafe { HasContext::buffer_data_size(self, target.gl_enum(), size, usage.gl_enum()) }
    }

    fn buffer_sub_data(&self, target: BufferTarget, offset: i32, data: &[u8]) {
        unsafe { self.buffer_sub_data_u8_slice(target.gl_enum(), offset, data) }
    }

    fn delete_buffer(&self, handle: BufferHandle) {
        unsafe { HasContext::delete_buffer(self, buffer(handle)) }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        unsafe { HasContext::create_vertex_array(self) }.map(|v| VertexArrayHandle(v.0))
    }

    fn bind_vertex_array(&self, handle: Option<VertexArrayHandle>) {
        unsafe { HasContext::bind_vertex_array(self, handle.map(vertex_array)) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, components: u32, stride: u32, offset: u32) {
        unsafe {
            HasContext::vertex_attrib_pointer_f32(
                self,
                index,
                components as i32,
                glow::FLOAT,
                false,
                stride as i32,
                offset as i32,
            );
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) }
    }

    fn delete_vertex_array(&self, handle: VertexArrayHandle) {
        unsafe { HasContext::delete_vertex_array(self, vertex_array(handle)) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { HasContext::clear_color(self, r, g, b, a) }
    }

    fn clear_color_buffer(&self) {
        unsafe { self.clear(glow::COLOR_BUFFER_BIT) }
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: u32, count: u32) {
        unsafe { HasContext::draw_arrays(self, mode.gl_enum(), first as i32, count as i32) }
    }

    fn draw_elements_u32(&self, mode: PrimitiveMode, count: u32, offset: usize) {
        unsafe {
            self.draw_elements(mode.gl_enum(), count as i32, glow::UNSIGNED_INT, offset as i32);
        }
    }
}
