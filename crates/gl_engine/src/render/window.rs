//! Window management using GLFW
//!
//! Opens a window with a core-profile OpenGL context, makes it current on the
//! calling thread and loads a `glow::Context` from it.

use std::rc::Rc;

use glfw::Context as _;
use log::info;
use thiserror::Error;

use crate::core::config::WindowConfig;
use crate::render::gl::{load_context, GlApi, GlContext};

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Window creation failed for a {major}.{minor} core context")]
    CreationFailed { major: u32, minor: u32 },

    #[error("Invalid window configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// GLFW window owning the current GL context
pub struct GlWindow {
    // Dropped before the window so the context outlives it
    gl: Rc<GlContext>,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    glfw: glfw::Glfw,
    clear_color: [f32; 4],
}

impl GlWindow {
    /// Create the window and make its context current
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        config.validate().map_err(WindowError::InvalidConfig)?;

        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| WindowError::InitializationFailed(e.to_string()))?;

        let (major, minor) = config.gl_version;
        glfw.window_hint(glfw::WindowHint::ContextVersion(major, minor));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed { major, minor })?;

        window.make_current();
        glfw.set_swap_interval(if config.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);

        let gl = Rc::new(load_context(|symbol| window.get_proc_address(symbol) as *const _));

        info!(
            "Created {}x{} window \"{}\" with an OpenGL {}.{} core context",
            config.width, config.height, config.title, major, minor
        );

        let window = Self {
            gl,
            window,
            events,
            glfw,
            clear_color: config.clear_color,
        };
        let (width, height) = window.window.get_framebuffer_size();
        window.gl.viewport(0, 0, width, height);
        Ok(window)
    }

    /// Shared handle to the context, for creating GPU resources
    pub fn gl(&self) -> Rc<GlContext> {
        Rc::clone(&self.gl)
    }

    /// Whether the user asked to close the window
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Set whether the window should close
    pub fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    /// Poll GLFW and return the events received since the last call.
    ///
    /// Framebuffer resizes update the viewport before being returned.
    pub fn poll_events(&mut self) -> Vec<glfw::WindowEvent> {
        self.glfw.poll_events();
        let events: Vec<_> = glfw::flush_messages(&self.events).map(|(_, event)| event).collect();
        for event in &events {
            if let glfw::WindowEvent::FramebufferSize(width, height) = event {
                self.gl.viewport(0, 0, *width, *height);
            }
        }
        events
    }

    /// Clear the colour buffer to the configured clear colour
    pub fn clear(&self) {
        let [r, g, b, a] = self.clear_color;
        self.gl.clear_color(r, g, b, a);
        self.gl.clear_color_buffer();
    }

    /// Present the back buffer
    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    /// Framebuffer size in pixels
    #[allow(clippy::cast_sign_loss)]
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    /// Seconds since GLFW was initialized
    pub fn time(&self) -> f64 {
        self.glfw.get_time()
    }
}
