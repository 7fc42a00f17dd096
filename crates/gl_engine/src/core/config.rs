//! # Application Configuration
//!
//! Window and logging settings for applications built on the GL layer.
//! Every section has sensible defaults, `with_*` builders and a `validate`
//! step, and the whole tree round-trips through TOML or RON via [`Config`].

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Oldest context version the shader layer targets (`#version 330`)
pub const MIN_GL_VERSION: (u32, u32) = (3, 3);

/// # Window Configuration
///
/// Size, title and context parameters for the GLFW window that owns the
/// GL context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial client width in screen coordinates
    pub width: u32,
    /// Initial client height in screen coordinates
    pub height: u32,
    /// Requested core-profile context version (major, minor)
    pub gl_version: (u32, u32),
    /// Whether buffer swaps wait for vertical sync
    pub vsync: bool,
    /// RGBA colour the frame is cleared to
    pub clear_color: [f32; 4],
}

impl WindowConfig {
    /// Create a window configuration with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: 1280,
            height: 768,
            gl_version: MIN_GL_VERSION,
            vsync: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Set the initial window size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Request a specific context version
    pub fn with_gl_version(mut self, major: u32, minor: u32) -> Self {
        self.gl_version = (major, minor);
        self
    }

    /// Enable or disable vsync
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.vsync = enabled;
        self
    }

    /// Set the clear colour
    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("Window size must be non-zero, got {}x{}", self.width, self.height));
        }
        if self.gl_version < MIN_GL_VERSION {
            return Err(format!(
                "OpenGL {}.{} is too old; at least {}.{} is required",
                self.gl_version.0, self.gl_version.1, MIN_GL_VERSION.0, MIN_GL_VERSION.1
            ));
        }
        if self.clear_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err("Clear colour components must be within 0.0..=1.0".to_string());
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("GL Engine Application")
    }
}

/// # Logging Configuration
///
/// Passed to [`init_logging`](crate::foundation::logging::init_logging).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter (`error`, `warn`, `info`, `debug`, `trace`), or a full
    /// `env_logger` directive string such as `gl_engine=debug,info`
    pub level: String,
    /// Whether `RUST_LOG` overrides `level` when set
    pub respect_env: bool,
}

impl LoggingConfig {
    /// Create a logging configuration with the given default filter
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            respect_env: true,
        }
    }

    /// Let `RUST_LOG` override the configured filter
    pub fn with_env_override(mut self, enabled: bool) -> Self {
        self.respect_env = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(if cfg!(debug_assertions) { "debug" } else { "info" })
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration applications load at startup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Window and context settings
    pub window: WindowConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl ApplicationConfig {
    /// Create a configuration whose window carries `title`
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            window: WindowConfig::new(title),
            logging: LoggingConfig::default(),
        }
    }

    /// Replace the window section
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Replace the logging section
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Load `path` if it exists, otherwise keep `self`.
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn load_or(self, path: &str) -> Result<Self, ConfigError> {
        if !std::path::Path::new(path).exists() {
            return Ok(self);
        }
        let config = Self::load_from_file(path)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        self.window.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl Config for ApplicationConfig {}
