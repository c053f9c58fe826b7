//! Fractal engine crate.
//!
//! Platform + GPU runtime for the fractal viewer: window and event loop,
//! input, frame timing, logging, and the render components (full-screen
//! quad, shader programs, overlay).

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod time;
pub mod window;

pub mod coords;
pub mod render;
pub mod text;
