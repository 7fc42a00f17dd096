//! Shared host for the demo binaries
//!
//! Each binary implements [`Scene`] and hands it to [`run_scene`], which owns
//! the window, the frame loop and teardown order.

pub mod geometry;
pub mod scene;
pub mod shaders;

pub use scene::{run_scene, DemoError, DemoResult, FrameTime, Scene};
