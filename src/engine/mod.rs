//! Core stepping engine.
//!
//! Implements the deterministic step loop with:
//! - Append-only simulation state derived purely from the step records
//! - A step sequencer that is the only writer of that state
//! - A playback controller (Idle / Manual / Auto) over the sequencer
//! - A frame clock pacing automatic playback

pub mod clock;
pub mod playback;
pub mod sequencer;
pub mod state;

pub use clock::{FrameClock, DEFAULT_INTERVAL_MS};
pub use playback::{PlaybackController, PlaybackMode};
pub use sequencer::{Advance, StepSequencer};
pub use state::{DerivedValues, SimulationState, StepRecord, Value};
