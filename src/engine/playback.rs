//! Playback controller: play / pause / step / reset over a sequencer.
//!
//! ```text
//!            play             frame fires, run terminal
//!   Idle ──────────▶ Auto ─────────────────────────────▶ Idle
//!    ▲  \   step     │ ▲ \
//!    │   ▼           │ │  \ pause
//!    │  Manual ◀─────┘ │   ▼
//!    │     │  play     └─ Manual
//!    └─────┴── reset (from any mode)
//! ```
//!
//! The controller holds no simulation data: only the mode, the sequencer it
//! drives and the clock that paces automatic playback.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::clock::FrameClock;
use crate::engine::sequencer::{Advance, StepSequencer};
use crate::error::SimResult;
use crate::render::{LayoutContext, Project, RenderFrame};
use crate::scenarios::Scenario;

/// Playback mode; exactly one is active per controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    /// Not advancing; freshly loaded, reset, or auto-stopped.
    #[default]
    Idle,
    /// User is stepping by hand.
    Manual,
    /// Advancing on every clock fire.
    Auto,
}

/// Mediates user intent and the step sequencer.
#[derive(Debug, Clone)]
pub struct PlaybackController<S: Scenario> {
    mode: PlaybackMode,
    sequencer: StepSequencer<S>,
    clock: FrameClock,
    /// Replaces the scenario's own title when set.
    title: Option<String>,
    layout: LayoutContext,
}

impl<S: Scenario> PlaybackController<S> {
    /// Create an idle controller for a scenario.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidScenario` if the scenario is rejected.
    pub fn new(scenario: S, clock: FrameClock) -> SimResult<Self> {
        Ok(Self::with_sequencer(StepSequencer::new(scenario)?, clock))
    }

    /// Wrap an existing sequencer.
    #[must_use]
    pub fn with_sequencer(sequencer: StepSequencer<S>, clock: FrameClock) -> Self {
        Self {
            mode: PlaybackMode::Idle,
            sequencer,
            clock,
            title: None,
            layout: LayoutContext::default(),
        }
    }

    /// Show `title` instead of the scenario's own title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Use `layout` for [`frame`](Self::frame).
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutContext) -> Self {
        self.layout = layout;
        self
    }

    /// Title override, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Layout used by [`frame`](Self::frame).
    #[must_use]
    pub const fn layout(&self) -> &LayoutContext {
        &self.layout
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// The driven sequencer.
    #[must_use]
    pub const fn sequencer(&self) -> &StepSequencer<S> {
        &self.sequencer
    }

    /// The pacing clock.
    #[must_use]
    pub const fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Start automatic playback (Idle or Manual → Auto).
    pub fn play(&mut self) {
        if self.mode == PlaybackMode::Auto {
            return;
        }
        self.transition(PlaybackMode::Auto, "play");
        self.clock.rearm();
    }

    /// Suspend automatic playback (Auto → Manual).
    pub fn pause(&mut self) {
        if self.mode == PlaybackMode::Auto {
            self.transition(PlaybackMode::Manual, "pause");
        }
    }

    /// Toggle between Auto and the paused state, like a single play button.
    pub fn toggle(&mut self) {
        if self.mode == PlaybackMode::Auto {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advance exactly once by hand.
    ///
    /// A terminal run returns [`Advance::Done`] and leaves the mode alone.
    pub fn step(&mut self) -> Advance {
        if self.sequencer.is_terminal() {
            return Advance::Done;
        }
        self.transition(PlaybackMode::Manual, "step");
        self.sequencer.advance()
    }

    /// Clear the run and go Idle, keeping the scenario.
    pub fn reset(&mut self) {
        self.transition(PlaybackMode::Idle, "reset");
        self.sequencer.rewind();
        self.clock.rearm();
    }

    /// Load a new scenario and go Idle.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidScenario` if the scenario is rejected; the
    /// controller is left unchanged in that case.
    pub fn load(&mut self, scenario: S) -> SimResult<()> {
        self.sequencer.reset(scenario)?;
        self.transition(PlaybackMode::Idle, "load");
        self.clock.rearm();
        Ok(())
    }

    /// Change the auto-advance interval.
    pub fn set_speed(&mut self, interval_ms: u64) {
        debug!(interval_ms, "speed changed");
        self.clock.set_interval(interval_ms);
    }

    /// Frame callback: at most one advance, and only in Auto.
    ///
    /// Returns the advance performed on this frame, if any. Auto playback
    /// stops on the same frame that makes the run terminal.
    pub fn on_frame(&mut self, now_ms: u64) -> Option<Advance> {
        if self.mode != PlaybackMode::Auto || !self.clock.tick(now_ms) {
            return None;
        }

        let advance = self.sequencer.advance();
        if advance.is_done() || self.sequencer.is_terminal() {
            self.transition(PlaybackMode::Idle, "auto-stop");
        }
        Some(advance)
    }

    fn transition(&mut self, to: PlaybackMode, cause: &'static str) {
        if self.mode != to {
            debug!(from = ?self.mode, to = ?to, cause, "playback transition");
        }
        self.mode = to;
    }
}

impl<S: Scenario + Project> PlaybackController<S> {
    /// Project the current state into a drawable frame.
    #[must_use]
    pub fn render(&self, layout: &LayoutContext) -> RenderFrame {
        let mut frame = self
            .sequencer
            .scenario()
            .project(self.sequencer.current_state(), layout);
        if let Some(title) = &self.title {
            frame.retitle(title.clone());
        }
        frame
    }

    /// Project with the controller's own layout.
    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        self.render(&self.layout)
    }
}
