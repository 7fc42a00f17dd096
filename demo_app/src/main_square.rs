//! Square demo
//!
//! A four-colour quad drawn from an index buffer.

use std::rc::Rc;

use demo_app::geometry::{quad_corners, quad_indices};
use demo_app::shaders::{POSITION_COLOR_FRAGMENT, POSITION_COLOR_VERTEX};
use demo_app::{run_scene, DemoResult, Scene};
use gl_engine::core::config::{ApplicationConfig, WindowConfig};
use gl_engine::render::{
    BufferUsage, GlApi, GlContext, GpuProgram, IndexBuffer, PrimitiveMode, Vertex, VertexArray, VertexBuffer,
    VertexPositionColor,
};

const CORNER_COLORS: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
];

struct SquareScene<G: GlApi> {
    vertex_array: VertexArray<G>,
    _index_buffer: IndexBuffer<G>,
    _vertex_buffer: VertexBuffer<G, VertexPositionColor>,
    program: GpuProgram<G>,
    index_count: u32,
}

impl<G: GlApi> Scene<G> for SquareScene<G> {
    fn load(gl: Rc<G>, viewport: (u32, u32)) -> DemoResult<Self> {
        let corners = quad_corners(384.0, 400.0, 512.0, 256.0);
        let vertices: Vec<_> = corners
            .into_iter()
            .zip(CORNER_COLORS)
            .map(|(position, color)| VertexPositionColor::new(position, color))
            .collect();
        let indices = quad_indices(0);

        let mut vertex_buffer = VertexBuffer::new(Rc::clone(&gl), vertices.len(), BufferUsage::Static)?;
        vertex_buffer.set_data(&vertices)?;
        let mut index_buffer = IndexBuffer::new(Rc::clone(&gl), indices.len(), BufferUsage::Static)?;
        index_buffer.set_data(&indices)?;

        let mut vertex_array = VertexArray::new(&vertex_buffer)?;
        vertex_array.set_index_buffer(&index_buffer)?;

        let program = GpuProgram::from_source(gl, POSITION_COLOR_VERTEX, POSITION_COLOR_FRAGMENT)?;
        program.validate_layout(VertexPositionColor::layout())?;
        program.set_uniform_1f("ColorFactor", 1.0)?;

        let mut scene = Self {
            vertex_array,
            _index_buffer: index_buffer,
            _vertex_buffer: vertex_buffer,
            program,
            index_count: 6,
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
        self.vertex_array.draw_indexed(PrimitiveMode::Triangles, self.index_count)?;
        self.program.unbind();
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let defaults = ApplicationConfig::default().with_window(
        WindowConfig::new("Square")
            .with_size(1280, 768)
            .with_clear_color([0.3, 0.4, 0.5, 1.0]),
    );
    run_scene::<SquareScene<GlContext>>(defaults, "square.toml")?;
    Ok(())
}
