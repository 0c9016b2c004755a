//! Platform abstraction layer
//!
//! Turns host events into what the simulation consumes:
//! - Key events into frame-coherent input snapshots
//! - Frame timestamps into capped deltas

pub mod input;
pub mod time;

pub use input::{Action, InputTracker, KeyBindings};
pub use time::FrameClock;
