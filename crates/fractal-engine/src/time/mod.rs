//! Time subsystem.
//!
//! Wall-clock frame timing, decoupled from the runtime so it can be tested.
//! Call `FrameClock::tick()` once per presented frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
