//! Fake GL driver for unit tests
//!
//! `MockGl` models just enough of a GLSL 330 driver to exercise the resource
//! layer without a context:
//!
//! - compilation fails when the source has no `#version` line or when an
//!   assignment or declaration line is missing its semicolon
//! - linking fails when a fragment input has no matching vertex output
//! - reflection reads `uniform` and `layout (location = N) in` declarations
//!   and drops uniforms that are never referenced outside their declaration,
//!   the way real drivers optimise them out
//!
//! Every state-changing call is recorded so tests can assert on ordering.

use std::cell::RefCell;
use std::collections::HashMap;
use std::num::NonZeroU32;

use super::{
    ActiveVariable, BufferHandle, BufferTarget, BufferUsage, GlApi, PrimitiveMode, ProgramHandle,
    ShaderHandle, UniformLocation, VertexArrayHandle,
};
use crate::render::shader::ShaderStage;
use crate::render::uniform::UniformValue;

/// A recorded state-changing call
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateShader(ShaderStage),
    CompileShader(ShaderHandle),
    DeleteShader(ShaderHandle),
    CreateProgram,
    AttachShader(ProgramHandle, ShaderHandle),
    DetachShader(ProgramHandle, ShaderHandle),
    LinkProgram(ProgramHandle),
    DeleteProgram(ProgramHandle),
    UseProgram(Option<ProgramHandle>),
    Uniform(UniformLocation, UniformValue),
    CreateBuffer,
    BindBuffer(BufferTarget, Option<BufferHandle>),
    BufferDataSize(BufferTarget, i32, BufferUsage),
    BufferSubData(BufferTarget, i32, usize),
    DeleteBuffer(BufferHandle),
    CreateVertexArray,
    BindVertexArray(Option<VertexArrayHandle>),
    VertexAttribPointer { index: u32, components: u32, stride: u32, offset: u32 },
    EnableVertexAttribArray(u32),
    DeleteVertexArray(VertexArrayHandle),
    Viewport(i32, i32, i32, i32),
    ClearColor,
    Clear,
    DrawArrays(PrimitiveMode, u32, u32),
    DrawElements(PrimitiveMode, u32, usize),
}

struct MockShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Clone)]
struct MockVariable {
    name: String,
    gl_type: u32,
    size: i32,
    location: u32,
}

#[derive(Default)]
struct MockProgram {
    attached: Vec<ShaderHandle>,
    linked: bool,
    log: String,
    uniforms: Vec<MockVariable>,
    attributes: Vec<MockVariable>,
}

#[derive(Default)]
struct MockState {
    next_id: u32,
    shaders: HashMap<ShaderHandle, MockShader>,
    programs: HashMap<ProgramHandle, MockProgram>,
    buffers: Vec<BufferHandle>,
    vertex_arrays: Vec<VertexArrayHandle>,
    bound_buffers: HashMap<BufferTarget, Option<BufferHandle>>,
    buffer_sizes: HashMap<BufferHandle, i32>,
    current_program: Option<ProgramHandle>,
    calls: Vec<GlCall>,
    compile_failures: HashMap<ShaderStage, String>,
    compile_warnings: HashMap<ShaderStage, String>,
    link_failure: Option<String>,
    refuse_creation: bool,
}

impl MockState {
    fn next(&mut self) -> NonZeroU32 {
        self.next_id += 1;
        NonZeroU32::new(self.next_id).unwrap()
    }
}

/// In-memory stand-in for a GL context
#[derive(Default)]
pub struct MockGl {
    state: RefCell<MockState>,
}

impl MockGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next compile of `stage` fail with `log`
    pub fn script_compile_failure(&self, stage: ShaderStage, log: &str) {
        self.state.borrow_mut().compile_failures.insert(stage, log.to_string());
    }

    /// Make the next compile of `stage` succeed with `log` as a warning
    pub fn script_compile_warning(&self, stage: ShaderStage, log: &str) {
        self.state.borrow_mut().compile_warnings.insert(stage, log.to_string());
    }

    /// Make the next link fail with `log`
    pub fn script_link_failure(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    /// Make every `create_*` call fail
    pub fn refuse_object_creation(&self) {
        self.state.borrow_mut().refuse_creation = true;
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn live_shader_count(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_program_count(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_buffer_count(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_vertex_array_count(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub fn current_program(&self) -> Option<ProgramHandle> {
        self.state.borrow().current_program
    }

    fn record(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }

    fn refuse(&self) -> Result<(), String> {
        if self.state.borrow().refuse_creation {
            Err("GL_OUT_OF_MEMORY".to_string())
        } else {
            Ok(())
        }
    }
}

/// Split GLSL source into identifier tokens
fn identifiers(source: &str) -> impl Iterator<Item = &str> {
    source
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
}

/// `name[4]` -> (`name`, 4); `name` -> (`name`, 1)
fn split_array(declarator: &str) -> (&str, i32) {
    match declarator.split_once('[') {
        Some((base, rest)) => {
            let len = rest.trim_end_matches(']').parse().unwrap_or(1);
            (base, len)
        }
        None => (declarator, 1),
    }
}

fn gl_type_of(glsl: &str) -> u32 {
    match glsl {
        "float" => glow::FLOAT,
        "vec2" => glow::FLOAT_VEC2,
        "vec3" => glow::FLOAT_VEC3,
        "vec4" => glow::FLOAT_VEC4,
        "int" => glow::INT,
        "ivec2" => glow::INT_VEC2,
        "uint" => glow::UNSIGNED_INT,
        "bool" => glow::BOOL,
        "mat3" => glow::FLOAT_MAT3,
        "mat4" => glow::FLOAT_MAT4,
        "sampler2D" => glow::SAMPLER_2D,
        _ => 0,
    }
}

/// Crude GLSL front end: missing `#version`, or a declaration/assignment line
/// without a trailing semicolon, is a syntax error.
fn check_syntax(source: &str) -> Result<(), String> {
    if !source.trim_start().starts_with("#version") {
        return Err("0:1(1): error: syntax error, missing #version directive".to_string());
    }
    for (number, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        let is_statement = line.contains('=')
            || ["uniform ", "in ", "out ", "layout"].iter().any(|p| line.starts_with(p));
        if is_statement && !line.ends_with(';') {
            return Err(format!(
                "0:{}(1): error: syntax error, unexpected end of statement, expecting ';'",
                number + 2
            ));
        }
    }
    Ok(())
}

/// (type, declarator) pairs of `<qualifier> <type> <name>;` lines
fn declarations<'a>(source: &'a str, qualifier: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    source.lines().filter_map(move |line| {
        let line = line.trim().trim_end_matches(';');
        let line = match line.split_once(')') {
            Some((head, tail)) if head.trim_start().starts_with("layout") => tail.trim(),
            _ => line,
        };
        let mut tokens = line.split_whitespace();
        if tokens.next()? != qualifier {
            return None;
        }
        Some((tokens.next()?, tokens.next()?))
    })
}

/// Explicit `layout (location = N)` of the declaration of `name`, if any
fn explicit_location(source: &str, name: &str) -> Option<u32> {
    source.lines().find_map(|line| {
        let (head, tail) = line.trim().split_once(')')?;
        let compact: String = head.chars().filter(|c| !c.is_whitespace()).collect();
        let number = compact.strip_prefix("layout(location=")?;
        if identifiers(tail).last()? == name {
            number.parse().ok()
        } else {
            None
        }
    })
}

fn is_referenced(name: &str, sources: &[&str]) -> bool {
    sources
        .iter()
        .map(|source| identifiers(source).filter(|token| *token == name).count())
        .sum::<usize>()
        > 1
}

fn reflect(vertex: &str, fragment: &str) -> (Vec<MockVariable>, Vec<MockVariable>) {
    let sources = [vertex, fragment];

    let mut uniforms: Vec<MockVariable> = Vec::new();
    for source in sources {
        for (glsl, declarator) in declarations(source, "uniform") {
            let (base, size) = split_array(declarator);
            if !is_referenced(base, &sources) || uniforms.iter().any(|u| split_array(&u.name).0 == base) {
                continue;
            }
            let name = if size > 1 { format!("{base}[0]") } else { base.to_string() };
            let location = uniforms.len() as u32;
            uniforms.push(MockVariable { name, gl_type: gl_type_of(glsl), size, location });
        }
    }

    let mut attributes: Vec<MockVariable> = Vec::new();
    let mut next_free = 0;
    for (glsl, declarator) in declarations(vertex, "in") {
        let (base, size) = split_array(declarator);
        if !is_referenced(base, &[vertex]) {
            continue;
        }
        let location = explicit_location(vertex, base).unwrap_or_else(|| {
            while attributes.iter().any(|a| a.location == next_free) {
                next_free += 1;
            }
            next_free
        });
        attributes.push(MockVariable { name: base.to_string(), gl_type: gl_type_of(glsl), size, location });
    }

    (uniforms, attributes)
}

impl GlApi for MockGl {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, String> {
        self.refuse()?;
        self.record(GlCall::CreateShader(stage));
        let mut state = self.state.borrow_mut();
        let handle = ShaderHandle(state.next());
        state.shaders.insert(
            handle,
            MockShader { stage, source: String::new(), compiled: false, log: String::new() },
        );
        Ok(handle)
    }

    fn shader_source(&self, shader: ShaderHandle, source: &str) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        self.record(GlCall::CompileShader(shader));
        let mut state = self.state.borrow_mut();
        let Some(stage) = state.shaders.get(&shader).map(|s| s.stage) else {
            return;
        };
        let scripted_failure = state.compile_failures.remove(&stage);
        let warning = state.compile_warnings.remove(&stage);
        let Some(s) = state.shaders.get_mut(&shader) else {
            return;
        };
        let result = match scripted_failure {
            Some(log) => Err(log),
            None => check_syntax(&s.source),
        };
        match result {
            Ok(()) => {
                s.compiled = true;
                s.log = warning.unwrap_or_default();
            }
            Err(log) => {
                s.compiled = false;
                s.log = log;
            }
        }
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        self.state.borrow().shaders.get(&shader).is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        self.state.borrow().shaders.get(&shader).map(|s| s.log.clone()).unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        self.record(GlCall::DeleteShader(shader));
        self.state.borrow_mut().shaders.remove(&shader);
    }

    fn create_program(&self) -> Result<ProgramHandle, String> {
        self.refuse()?;
        self.record(GlCall::CreateProgram);
        let mut state = self.state.borrow_mut();
        let handle = ProgramHandle(state.next());
        state.programs.insert(handle, MockProgram::default());
        Ok(handle)
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        self.record(GlCall::AttachShader(program, shader));
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        self.record(GlCall::DetachShader(program, shader));
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.retain(|s| *s != shader);
        }
    }

    fn link_program(&self, program: ProgramHandle) {
        self.record(GlCall::LinkProgram(program));
        let mut state = self.state.borrow_mut();
        let scripted = state.link_failure.take();

        let Some(attached) = state.programs.get(&program).map(|p| p.attached.clone()) else {
            return;
        };
        let source_of = |stage: ShaderStage| {
            attached
                .iter()
                .filter_map(|h| state.shaders.get(h))
                .find(|s| s.stage == stage && s.compiled)
                .map(|s| s.source.clone())
        };
        let vertex = source_of(ShaderStage::Vertex);
        let fragment = source_of(ShaderStage::Fragment);

        let outcome = match (scripted, vertex, fragment) {
            (Some(log), _, _) => Err(log),
            (None, Some(vs), Some(fs)) => {
                let outputs: Vec<&str> = declarations(&vs, "out").map(|(_, name)| name).collect();
                match declarations(&fs, "in").find(|(_, name)| !outputs.contains(name)) {
                    Some((_, name)) => Err(format!(
                        "error: fragment shader input `{name}` has no matching vertex shader output"
                    )),
                    None => Ok(reflect(&vs, &fs)),
                }
            }
            _ => Err("error: program lacks a compiled vertex or fragment stage".to_string()),
        };

        let Some(p) = state.programs.get_mut(&program) else {
            return;
        };
        match outcome {
            Ok((uniforms, attributes)) => {
                p.linked = true;
                p.log.clear();
                p.uniforms = uniforms;
                p.attributes = attributes;
            }
            Err(log) => {
                p.linked = false;
                p.log = log;
                p.uniforms.clear();
                p.attributes.clear();
            }
        }
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        self.state.borrow().programs.get(&program).is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        self.state.borrow().programs.get(&program).map(|p| p.log.clone()).unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramHandle) {
        self.record(GlCall::DeleteProgram(program));
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        if state.current_program == Some(program) {
            state.current_program = None;
        }
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        self.record(GlCall::UseProgram(program));
        self.state.borrow_mut().current_program = program;
    }

    fn active_uniform_count(&self, program: ProgramHandle) -> u32 {
        self.state.borrow().programs.get(&program).map_or(0, |p| p.uniforms.len() as u32)
    }

    fn active_uniform(&self, program: ProgramHandle, index: u32) -> Option<ActiveVariable> {
        let state = self.state.borrow();
        let u = state.programs.get(&program)?.uniforms.get(index as usize)?;
        Some(ActiveVariable { name: u.name.clone(), gl_type: u.gl_type, size: u.size })
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let state = self.state.borrow();
        let base = split_array(name).0;
        state
            .programs
            .get(&program)?
            .uniforms
            .iter()
            .find(|u| split_array(&u.name).0 == base)
            .map(|u| UniformLocation(u.location))
    }

    fn active_attribute_count(&self, program: ProgramHandle) -> u32 {
        self.state.borrow().programs.get(&program).map_or(0, |p| p.attributes.len() as u32)
    }

    fn active_attribute(&self, program: ProgramHandle, index: u32) -> Option<ActiveVariable> {
        let state = self.state.borrow();
        let a = state.programs.get(&program)?.attributes.get(index as usize)?;
        Some(ActiveVariable { name: a.name.clone(), gl_type: a.gl_type, size: a.size })
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        state.programs.get(&program)?.attributes.iter().find(|a| a.name == name).map(|a| a.location)
    }

    fn uniform_1_f32(&self, location: UniformLocation, x: f32) {
        self.record(GlCall::Uniform(location, UniformValue::Float(x)));
    }

    fn uniform_2_f32(&self, location: UniformLocation, x: f32, y: f32) {
        self.record(GlCall::Uniform(location, UniformValue::Vec2([x, y])));
    }

    fn uniform_3_f32(&self, location: UniformLocation, x: f32, y: f32, z: f32) {
        self.record(GlCall::Uniform(location, UniformValue::Vec3([x, y, z])));
    }

    fn uniform_4_f32(&self, location: UniformLocation, x: f32, y: f32, z: f32, w: f32) {
        self.record(GlCall::Uniform(location, UniformValue::Vec4([x, y, z, w])));
    }

    fn uniform_1_i32(&self, location: UniformLocation, x: i32) {
        self.record(GlCall::Uniform(location, UniformValue::Int(x)));
    }

    fn uniform_matrix_4_f32(&self, location: UniformLocation, matrix: &[f32; 16]) {
        self.record(GlCall::Uniform(location, UniformValue::Mat4(*matrix)));
    }

    fn create_buffer(&self) -> Result<BufferHandle, String> {
        self.refuse()?;
        self.record(GlCall::CreateBuffer);
        let mut state = self.state.borrow_mut();
        let handle = BufferHandle(state.next());
        state.buffers.push(handle);
        Ok(handle)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>) {
        self.record(GlCall::BindBuffer(target, buffer));
        self.state.borrow_mut().bound_buffers.insert(target, buffer);
    }

    fn buffer_data_size(&self, target: BufferTarget, size: i32, usage: BufferUsage) {
        assert!(size >= 0, "GL_INVALID_VALUE: negative buffer size");
        self.record(GlCall::BufferDataSize(target, size, usage));
        let mut state = self.state.borrow_mut();
        if let Some(Some(buffer)) = state.bound_buffers.get(&target).copied() {
            state.buffer_sizes.insert(buffer, size);
        }
    }

    fn buffer_sub_data(&self, target: BufferTarget, offset: i32, data: &[u8]) {
        self.record(GlCall::BufferSubData(target, offset, data.len()));
        let state = self.state.borrow();
        if let Some(Some(buffer)) = state.bound_buffers.get(&target) {
            let size = state.buffer_sizes.get(buffer).copied().unwrap_or(0);
            let end = i64::from(offset) + data.len() as i64;
            assert!(offset >= 0 && end <= i64::from(size), "GL_INVALID_VALUE: sub data past buffer end");
        } else {
            panic!("GL_INVALID_OPERATION: no buffer bound to {target:?}");
        }
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        self.record(GlCall::DeleteBuffer(buffer));
        self.state.borrow_mut().buffers.retain(|b| *b != buffer);
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        self.refuse()?;
        self.record(GlCall::CreateVertexArray);
        let mut state = self.state.borrow_mut();
        let handle = VertexArrayHandle(state.next());
        state.vertex_arrays.push(handle);
        Ok(handle)
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        self.record(GlCall::BindVertexArray(vertex_array));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, components: u32, stride: u32, offset: u32) {
        self.record(GlCall::VertexAttribPointer { index, components, stride, offset });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::EnableVertexAttribArray(index));
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        self.record(GlCall::DeleteVertexArray(vertex_array));
        self.state.borrow_mut().vertex_arrays.retain(|v| *v != vertex_array);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport(x, y, width, height));
    }

    fn clear_color(&self, _r: f32, _g: f32, _b: f32, _a: f32) {
        self.record(GlCall::ClearColor);
    }

    fn clear_color_buffer(&self) {
        self.record(GlCall::Clear);
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: u32, count: u32) {
        self.record(GlCall::DrawArrays(mode, first, count));
    }

    fn draw_elements_u32(&self, mode: PrimitiveMode, count: u32, offset: usize) {
        self.record(GlCall::DrawElements(mode, count, offset));
    }
}
