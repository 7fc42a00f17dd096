//! Scene trait and the frame loop that drives it

use std::rc::Rc;

use glfw::{Action, Key, WindowEvent};
use log::{error, info};
use thiserror::Error;

use gl_engine::core::config::{ApplicationConfig, ConfigError};
use gl_engine::foundation::logging::init_logging;
use gl_engine::render::{BufferError, GlApi, GlContext, GlWindow, LayoutError, ProgramError, WindowError};

/// Demo failures
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("window: {0}")]
    Window(#[from] WindowError),

    #[error("shader program: {0}")]
    Program(#[from] ProgramError),

    #[error("buffer: {0}")]
    Buffer(#[from] BufferError),

    #[error("vertex layout: {0}")]
    Layout(#[from] LayoutError),
}

/// Result type for demo code
pub type DemoResult<T> = Result<T, DemoError>;

/// Timing for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame
    pub elapsed: f64,
    /// Seconds since the window was created
    pub total: f64,
}

/// A self-contained demo: GPU resources plus per-frame logic
pub trait Scene<G: GlApi>: Sized {
    /// Create every GPU resource the scene needs
    fn load(gl: Rc<G>, viewport: (u32, u32)) -> DemoResult<Self>;

    /// The framebuffer changed size
    fn resize(&mut self, width: u32, height: u32) -> DemoResult<()>;

    /// Advance per-frame state
    fn update(&mut self, _time: FrameTime) -> DemoResult<()> {
        Ok(())
    }

    /// Issue draw calls; the frame is already cleared
    fn render(&self) -> DemoResult<()>;
}

/// Open a window, run `S` until the window closes, then tear down.
///
/// `config_path` is loaded over `defaults` when the file exists.
pub fn run_scene<S: Scene<GlContext>>(defaults: ApplicationConfig, config_path: &str) -> DemoResult<()> {
    let config = defaults.load_or(config_path)?;
    init_logging(&config.logging);
    info!("Starting {} demo", config.window.title);

    let result = frame_loop::<S>(&config);
    match &result {
        Ok(()) => info!("{} demo finished", config.window.title),
        Err(e) => error!("{} demo failed: {}", config.window.title, e),
    }
    result
}

fn frame_loop<S: Scene<GlContext>>(config: &ApplicationConfig) -> DemoResult<()> {
    let mut window = GlWindow::new(&config.window)?;
    // Declared after the window so its resources drop while the context is alive
    let mut scene = S::load(window.gl(), window.framebuffer_size())?;

    let mut last = window.time();
    while !window.should_close() {
        for event in window.poll_events() {
            match event {
                WindowEvent::Key(Key::Escape, _, Action::Press, _) | WindowEvent::Close => {
                    window.set_should_close(true);
                }
                WindowEvent::FramebufferSize(width, height) => {
                    if let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) {
                        if width > 0 && height > 0 {
                            scene.resize(width, height)?;
                        }
                    }
                }
                _ => {}
            }
        }

        let now = window.time();
        scene.update(FrameTime { elapsed: now - last, total: now })?;
        last = now;

        window.clear();
        scene.render()?;
        window.swap_buffers();
    }

    Ok(())
}
