//! Foundation module - Core utilities
//!
//! Currently this is the logging setup shared by the library and the demo
//! binaries.

pub mod logging;
