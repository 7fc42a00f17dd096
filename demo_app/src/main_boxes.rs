//! Boxes demo
//!
//! A hundred random rectangles in one indexed draw, with their brightness
//! pulsing through the `ColorFactor` uniform.

use std::rc::Rc;

use log::info;

use demo_app::geometry::{random_boxes, ColorPulse};
use demo_app::shaders::{POSITION_COLOR_FRAGMENT, POSITION_COLOR_VERTEX};
use demo_app::{run_scene, DemoResult, FrameTime, Scene};
use gl_engine::core::config::{ApplicationConfig, WindowConfig};
use gl_engine::render::{
    BufferUsage, GlApi, GlContext, GpuProgram, IndexBuffer, PrimitiveMode, Vertex, VertexArray, VertexBuffer,
    VertexPositionColor,
};

const BOX_COUNT: u32 = 100;

/// Updates for the colour factor to fall from 1 to 0
const PULSE_FRAMES: u32 = 240;

struct BoxesScene<G: GlApi> {
    vertex_array: VertexArray<G>,
    _index_buffer: IndexBuffer<G>,
    _vertex_buffer: VertexBuffer<G, VertexPositionColor>,
    program: GpuProgram<G>,
    index_count: u32,
    pulse: ColorPulse,
}

impl<G: GlApi> Scene<G> for BoxesScene<G> {
    fn load(gl: Rc<G>, viewport: (u32, u32)) -> DemoResult<Self> {
        let (vertices, indices) = random_boxes(&mut rand::thread_rng(), BOX_COUNT, viewport.0, viewport.1);
        info!("Generated {} boxes ({} vertices)", BOX_COUNT, vertices.len());

        let mut vertex_buffer = VertexBuffer::new(Rc::clone(&gl), vertices.len(), BufferUsage::Static)?;
        vertex_buffer.set_data(&vertices)?;
        let mut index_buffer = IndexBuffer::new(Rc::clone(&gl), indices.len(), BufferUsage::Static)?;
        index_buffer.set_data(&indices)?;

        let mut vertex_array = VertexArray::new(&vertex_buffer)?;
        vertex_array.set_index_buffer(&index_buffer)?;

        let program = GpuProgram::from_source(gl, POSITION_COLOR_VERTEX, POSITION_COLOR_FRAGMENT)?;
        program.validate_layout(VertexPositionColor::layout())?;

        let pulse = ColorPulse::new(PULSE_FRAMES);
        program.set_uniform_1f("ColorFactor", pulse.factor())?;

        let mut scene = Self {
            vertex_array,
            _index_buffer: index_buffer,
            _vertex_buffer: vertex_buffer,
            program,
            index_count: BOX_COUNT * 6,
            pulse,
        };
        scene.resize(viewport.0, viewport.1)?;
        Ok(scene)
    }

    #[allow(clippy::cast_precision_loss)]
    fn resize(&mut self, width: u32, height: u32) -> DemoResult<()> {
        self.program.set_uniform_2f("ViewportSize", width as f32, height as f32)?;
        Ok(())
    }

    fn update(&mut self, _time: FrameTime) -> DemoResult<()> {
        let factor = self.pulse.advance();
        self.program.set_uniform_1f("ColorFactor", factor)?;
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
        WindowConfig::new("Boxes")
            .with_size(1280, 768)
            .with_vsync(true)
            .with_clear_color([0.8, 0.8, 0.8, 1.0]),
    );
    run_scene::<BoxesScene<GlContext>>(defaults, "boxes.toml")?;
    Ok(())
}
