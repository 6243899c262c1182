//! Step sequencer: the only mutation entry point for simulation state.
//!
//! `advance` is total. After the run is terminal it returns
//! [`Advance::Done`] without touching state, which keeps automatic playback
//! a simple poll.

use tracing::{info, trace, warn};

use crate::engine::state::{SimulationState, StepRecord};
use crate::error::SimResult;
use crate::scenarios::Scenario;

/// Result of a single `advance` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// A new record was appended.
    Step(StepRecord),
    /// The run was already terminal; nothing changed.
    Done,
}

impl Advance {
    /// Whether this is [`Advance::Done`].
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The produced record, if any.
    #[must_use]
    pub const fn record(&self) -> Option<&StepRecord> {
        match self {
            Self::Step(record) => Some(record),
            Self::Done => None,
        }
    }
}

/// Owns a scenario and the state of its current run.
#[derive(Debug, Clone)]
pub struct StepSequencer<S: Scenario> {
    scenario: S,
    state: SimulationState,
}

impl<S: Scenario> StepSequencer<S> {
    /// Create a sequencer for a validated scenario.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidScenario` if the scenario is rejected.
    pub fn new(scenario: S) -> SimResult<Self> {
        if let Err(err) = scenario.validate() {
            warn!(scenario = scenario.name(), error = %err, "scenario rejected");
            return Err(err);
        }
        info!(scenario = scenario.name(), length = scenario.length(), "scenario loaded");
        Ok(Self {
            scenario,
            state: SimulationState::new(),
        })
    }

    /// Compute, append and return the next record.
    pub fn advance(&mut self) -> Advance {
        if self.state.is_terminal() {
            return Advance::Done;
        }

        let index = self.state.steps_taken();
        let outcome = self.scenario.step_at(index, &self.state);
        let terminal = outcome.is_stop() || index + 1 >= self.scenario.length();
        let record = outcome.into_record(index);

        trace!(
            scenario = self.scenario.name(),
            index,
            terminal,
            description = record.description(),
            "advance"
        );

        self.state.push(record.clone(), terminal);
        Advance::Step(record)
    }

    /// Replace the scenario and start over.
    ///
    /// The new scenario is validated first; on failure the current scenario
    /// and state are left exactly as they were.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidScenario` if the new scenario is rejected.
    pub fn reset(&mut self, scenario: S) -> SimResult<()> {
        if let Err(err) = scenario.validate() {
            warn!(
                scenario = scenario.name(),
                error = %err,
                "scenario rejected, keeping current run"
            );
            return Err(err);
        }
        info!(scenario = scenario.name(), length = scenario.length(), "scenario loaded");
        self.scenario = scenario;
        self.state = SimulationState::new();
        Ok(())
    }

    /// Clear the run, keeping the current scenario.
    pub fn rewind(&mut self) {
        trace!(scenario = self.scenario.name(), "rewind");
        self.state.clear();
    }

    /// Read-only view of the current run.
    #[must_use]
    pub const fn current_state(&self) -> &SimulationState {
        &self.state
    }

    /// Owned copy of the current run.
    #[must_use]
    pub fn snapshot(&self) -> SimulationState {
        self.state.clone()
    }

    /// The loaded scenario.
    #[must_use]
    pub const fn scenario(&self) -> &S {
        &self.scenario
    }

    /// Whether no further steps remain.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Run to completion, returning the records produced by this call.
    pub fn run_to_end(&mut self) -> Vec<StepRecord> {
        let mut produced = Vec::new();
        while let Advance::Step(record) = self.advance() {
            produced.push(record);
        }
        produced
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine::state::Value;
    use crate::error::SimError;
    use crate::scenarios::StepOutcome;

    /// Counts up to `len`, optionally stopping early at `stop_at`.
    #[derive(Debug, Clone)]
    struct Counter {
        len: usize,
        stop_at: Option<usize>,
    }

    impl Scenario for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn length(&self) -> usize {
            self.len
        }

        fn step_at(&self, index: usize, state: &SimulationState) -> StepOutcome {
            let previous = state.last_record().and_then(|r| r.int("total")).unwrap_or(0);
            #[allow(clippy::cast_possible_wrap)]
            let total = previous + index as i64;
            let outcome = StepOutcome::new(format!("count {index}"))
                .with("total", Value::Int(total));
            if self.stop_at == Some(index) {
                outcome.stop()
            } else {
                outcome
            }
        }
    }

    fn counter(len: usize) -> Counter {
        Counter { len, stop_at: None }
    }

    #[test]
    fn test_advance_appends_in_order() {
        let mut seq = StepSequencer::new(counter(3)).unwrap();
        assert_eq!(seq.current_state().position(), -1);

        let first = seq.advance();
        assert_eq!(first.record().map(StepRecord::index), Some(0));
        assert_eq!(seq.current_state().position(), 0);
        assert!(!seq.is_terminal());

        seq.advance();
        let last = seq.advance();
        assert_eq!(last.record().and_then(|r| r.int("total")), Some(3));
        assert!(seq.is_terminal());
        assert_eq!(seq.current_state().position(), 2);
    }

    #[test]
    fn test_advance_after_terminal_is_noop() {
        let mut seq = StepSequencer::new(counter(1)).unwrap();
        assert!(!seq.advance().is_done());
        let before = seq.snapshot();

        for _ in 0..5 {
            assert_eq!(seq.advance(), Advance::Done);
        }
        assert_eq!(seq.snapshot(), before);
    }

    #[test]
    fn test_stop_condition_ends_run_early() {
        let mut seq = StepSequencer::new(Counter {
            len: 10,
            stop_at: Some(2),
        })
        .unwrap();

        let records = seq.run_to_end();
        assert_eq!(records.len(), 3);
        assert!(seq.is_terminal());
        assert_eq!(seq.current_state().position(), 2);
    }

    #[test]
    fn test_empty_scenario_rejected() {
        let err = StepSequencer::new(counter(0)).unwrap_err();
        assert!(matches!(err, SimError::InvalidScenario { .. }));
    }

    #[test]
    fn test_reset_is_all_or_nothing() {
        let mut seq = StepSequencer::new(counter(4)).unwrap();
        seq.advance();
        seq.advance();
        let before = seq.snapshot();

        assert!(seq.reset(counter(0)).is_err());
        assert_eq!(seq.snapshot(), before);
        assert_eq!(seq.scenario().length(), 4);

        seq.reset(counter(2)).unwrap();
        assert_eq!(seq.current_state().position(), -1);
        assert!(seq.current_state().records().is_empty());
        assert_eq!(seq.scenario().length(), 2);
    }

    #[test]
    fn test_rewind_keeps_scenario() {
        let mut seq = StepSequencer::new(counter(2)).unwrap();
        seq.run_to_end();
        seq.rewind();
        assert_eq!(seq.current_state().position(), -1);
        assert!(!seq.is_terminal());
        assert_eq!(seq.run_to_end().len(), 2);
    }

    #[test]
    fn test_records_indexed_without_gaps() {
        let mut seq = StepSequencer::new(counter(7)).unwrap();
        seq.run_to_end();
        for (i, record) in seq.current_state().records().iter().enumerate() {
            assert_eq!(record.index(), i);
        }
    }
}
