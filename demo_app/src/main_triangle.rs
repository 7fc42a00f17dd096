//! Triangle demo
//!
//! One vertex-coloured triangle drawn with `glDrawArrays`.

use std::rc::Rc;

use demo_app::shaders::{POSITION_COLOR_FRAGMENT, POSITION_COLOR_VERTEX};
use demo_app::{run_scene, DemoResult, Scene};
use gl_engine::core::config::{ApplicationConfig, WindowConfig};
use gl_engine::render::{
    BufferUsage, GlApi, GlContext, GpuProgram, PrimitiveMode, Vertex, VertexArray, VertexBuffer, VertexPositionColor,
};

struct TriangleScene<G: GlApi> {
    // Field order is drop order: the array goes before the buffer it reads
    vertex_array: VertexArray<G>,
    _vertex_buffer: VertexBuffer<G, VertexPositionColor>,
    program: GpuProgram<G>,
}

impl<G: GlApi> Scene<G> for TriangleScene<G> {
    fn load(gl: Rc<G>, viewport: (u32, u32)) -> DemoResult<Self> {
        let (x, y) = (1280.0 / 2.0, 768.0 / 2.0);
        let vertices = [
            VertexPositionColor::new([x + 200.0, y], [1.0, 0.0, 0.0, 1.0]),
            VertexPositionColor::new([x - 200.0, y], [0.0, 1.0, 0.0, 1.0]),
            VertexPositionColor::new([x, y + 200.0], [0.0, 0.0, 1.0, 1.0]),
        ];

        let mut vertex_buffer = VertexBuffer::new(Rc::clone(&gl), vertices.len(), BufferUsage::Static)?;
        vertex_buffer.set_data(&vertices)?;
        let vertex_array = VertexArray::new(&vertex_buffer)?;

        let program = GpuProgram::from_source(gl, POSITION_COLOR_VERTEX, POSITION_COLOR_FRAGMENT)?;
        program.validate_layout(VertexPositionColor::layout())?;
        program.set_uniform_1f("ColorFactor", 1.0)?;

        let mut scene = Self {
            vertex_array,
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
        self.vertex_array.draw_arrays(PrimitiveMode::Triangles, 0, 3)?;
        self.program.unbind();
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let defaults = ApplicationConfig::default().with_window(
        WindowConfig::new("Triangle")
            .with_size(1280, 768)
            .with_clear_color([0.3, 0.4, 0.5, 1.0]),
    );
    run_scene::<TriangleScene<GlContext>>(defaults, "triangle.toml")?;
    Ok(())
}
