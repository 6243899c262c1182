//! # microsim
//!
//! Deterministic step engine for interactive teaching widgets.
//!
//! A widget is a [`Scenario`](scenarios::Scenario) (data plus a pure
//! per-step computation) driven by:
//! - A step sequencer that owns the append-only simulation state
//! - A playback controller with Idle / Manual / Auto modes
//! - A frame clock that paces automatic playback by wall-clock interval
//! - A pure projection of state into platform-agnostic render commands
//!
//! ## Example
//!
//! ```rust
//! use microsim::prelude::*;
//!
//! let mut controller =
//!     PlaybackController::new(BinarySearch::classroom(), FrameClock::new(500)).unwrap();
//!
//! controller.step();
//! let frame = controller.render(&LayoutContext::default());
//! assert_eq!(frame.title, "Binary Search Visualization");
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::needless_range_loop,   // Sometimes range loops are clearer
)]

pub mod config;
pub mod engine;
pub mod error;
pub mod render;
pub mod scenarios;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{MicrosimConfig, MicrosimConfigBuilder};
    pub use crate::engine::{
        Advance, FrameClock, PlaybackController, PlaybackMode, SimulationState, StepRecord,
        StepSequencer, Value,
    };
    pub use crate::error::{SimError, SimResult};
    pub use crate::render::{LayoutContext, Project, RenderCommand, RenderFrame, Role};
    pub use crate::scenarios::{
        BinarySearch, FactorialTrace, LinearSearch, Scenario, ScenarioKind, SlidingWindow,
        SortAlgorithm, SortTrace, StepOutcome,
    };
}

/// Re-export for public API
pub use error::{SimError, SimResult};
