//! # Core Module
//!
//! Shared configuration types used by the renderer and by applications.
//!
//! ## Organization
//!
//! - **Config**: window and logging configuration with file loading
//! - **Foundation**: logging setup (re-exported)

pub mod config;

pub use crate::foundation;

pub use config::{ApplicationConfig, Config, ConfigError, LoggingConfig, WindowConfig};
