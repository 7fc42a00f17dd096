//! Star demo
//!
//! A textured-vertex quad whose fragment stage cuts a star out of UV space.

use std::rc::Rc;

use demo_app::geometry::{quad_indices, textured_quad};
use demo_app::shaders::{POSITION_TEXTURE_VERTEX, STAR_FRAGMENT};
use demo_app::{run_scene, DemoResult, Scene};
use gl_engine::core::config::{ApplicationConfig, WindowConfig};
use gl_engine::render::{
    BufferUsage, GlApi, GlContext, GpuProgram, IndexBuffer, PrimitiveMode, Vertex, VertexArray, VertexBuffer,
    VertexPositionTexture,
};

struct StarScene<G: GlApi> {
    vertex_array: VertexArray<G>,
    _index_buffer: IndexBuffer<G>,
    _vertex_buffer: VertexBuffer<G, VertexPositionTexture>,
    program: GpuProgram<G>,
}

impl<G: GlApi> Scene<G> for StarScene<G> {
    fn load(gl: Rc<G>, viewport: (u32, u32)) -> DemoResult<Self> {
        let vertices = textured_quad(540.0, 284.0, 300.0, 300.0);
        let indices = quad_indices(0);

        let mut vertex_buffer = VertexBuffer::new(Rc::clone(&gl), vertices.len(), BufferUsage::Static)?;
        vertex_buffer.set_data(&vertices)?;
        let mut index_buffer = IndexBuffer::new(Rc::clone(&gl), indices.len(), BufferUsage::Static)?;
        index_buffer.set_data(&indices)?;

        let mut vertex_array = VertexArray::new(&vertex_buffer)?;
        vertex_array.set_index_buffer(&index_buffer)?;

        let program = GpuProgram::from_source(gl, POSITION_TEXTURE_VERTEX, STAR_FRAGMENT)?;
        program.validate_layout(VertexPositionTexture::layout())?;
        program.set_uniform("StarColor", [0.0_f32, 1.0, 0.0, 1.0])?;

        let mut scene = Self {
            vertex_array,
            _index_buffer: index_buffer,
            _vertex_buffer: vertex_buffer,
            program,
        };
        scene.resize(viewport.0, viewport.1)?;
        Ok(scene)
    }

    #[allow(clippy::cast_precision_loss)]
    fn resize(&mut self, width: u32, height: u32) -> DemoResult<()> {
        self.program.set_uniform_2f("ViewportSize", width as f32, height as f32)?;
        Ok(())
    }

    fn render(&self) -> DemoResult<()> {
        self.program.bind()?;
        self.vertex_array.draw_indexed(PrimitiveMode::Triangles, 6)?;
        self.program.unbind();
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let defaults = ApplicationConfig::default().with_window(
        WindowConfig::new("Star")
            .with_size(1280, 768)
            .with_clear_color([0.3, 0.4, 0.5, 1.0]),
    );
    run_scene::<StarScene<GlContext>>(defaults, "star.toml")?;
    Ok(())
}
