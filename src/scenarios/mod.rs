//! Scenario contract and the built-in teaching scenarios.
//!
//! A scenario is the data a widget is visualizing plus a pure per-step
//! computation. The sequencer only needs two things from it: how many steps
//! exist (`length`) and what step `i` looks like (`step_at`).
//!
//! Built-in scenarios:
//! - [`binary_search`] - bisection with low / mid / high pointers
//! - [`linear_search`] - left-to-right scan with early stop
//! - [`sliding_window`] - fixed-size window sums with a running maximum
//! - [`sorting`] - selection, insertion and merge sort pass traces
//! - [`recursion`] - factorial call-stack trace

pub mod binary_search;
pub mod linear_search;
pub mod recursion;
pub mod sliding_window;
pub mod sorting;

use serde::{Deserialize, Serialize};

use crate::engine::state::{DerivedValues, SimulationState, StepRecord, Value};
use crate::error::{SimError, SimResult};
use crate::render::{LayoutContext, Project, RenderFrame};

pub use binary_search::BinarySearch;
pub use linear_search::LinearSearch;
pub use recursion::FactorialTrace;
pub use sliding_window::SlidingWindow;
pub use sorting::{SortAlgorithm, SortTrace};

/// Upper bound on array sizes; the widgets illustrate, they do not compute.
pub const MAX_ELEMENTS: usize = 64;

/// Largest magnitude accepted for a single value. Any sum of up to
/// `MAX_ELEMENTS + 1` values stays well inside `i64`.
pub const MAX_MAGNITUDE: i64 = 1_000_000_000;

/// What one step produces, before the sequencer assigns its index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    description: String,
    derived: DerivedValues,
    stop: bool,
}

impl StepOutcome {
    /// Outcome with a description and no derived values.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            derived: DerivedValues::new(),
            stop: false,
        }
    }

    /// Attach a derived value.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.derived.insert(name.to_string(), value.into());
        self
    }

    /// Mark this as the final step regardless of the scenario length.
    #[must_use]
    pub const fn stop(mut self) -> Self {
        self.stop = true;
        self
    }

    /// Whether this outcome ends the run.
    #[must_use]
    pub const fn is_stop(&self) -> bool {
        self.stop
    }

    /// Description text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn into_record(self, index: usize) -> StepRecord {
        StepRecord::new(index, self.description, self.derived)
    }
}

/// Fixed contract between the sequencer and the content it steps through.
///
/// `step_at` must be a pure function of the scenario, the index and the
/// records produced so far; that is what makes manual stepping and auto play
/// end in the same state.
pub trait Scenario {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Maximum number of steps. A run is terminal at `length() - 1` unless a
    /// step stops it earlier.
    fn length(&self) -> usize;

    /// Compute step `index` given the run so far.
    fn step_at(&self, index: usize, state: &SimulationState) -> StepOutcome;

    /// Check the scenario can be run.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidScenario` when the scenario has no steps or
    /// malformed parameters.
    fn validate(&self) -> SimResult<()> {
        ensure(self.length() > 0, self.name(), "scenario has no steps")
    }
}

/// `Ok(())` if `condition` holds, otherwise an `InvalidScenario` error.
///
/// # Errors
///
/// Returns `SimError::InvalidScenario` when `condition` is false.
pub fn ensure(condition: bool, scenario: &str, reason: impl Into<String>) -> SimResult<()> {
    if condition {
        Ok(())
    } else {
        Err(SimError::invalid_scenario(scenario, reason))
    }
}

/// Validate a value array shared by several scenarios.
pub(crate) fn ensure_values(scenario: &str, values: &[i64]) -> SimResult<()> {
    ensure(!values.is_empty(), scenario, "values must not be empty")?;
    ensure(
        values.len() <= MAX_ELEMENTS,
        scenario,
        format!("at most {MAX_ELEMENTS} values, got {}", values.len()),
    )?;
    match values.iter().find(|v| v.unsigned_abs() > MAX_MAGNITUDE.unsigned_abs()) {
        Some(v) => Err(SimError::invalid_scenario(
            scenario,
            format!("value {v} is outside -{MAX_MAGNITUDE}..={MAX_MAGNITUDE}"),
        )),
        None => Ok(()),
    }
}

/// Any built-in scenario, selected by `type` in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioKind {
    BinarySearch(BinarySearch),
    LinearSearch(LinearSearch),
    SlidingWindow(SlidingWindow),
    Sorting(SortTrace),
    Factorial(FactorialTrace),
}

impl ScenarioKind {
    fn inner(&self) -> &dyn ScenarioView {
        match self {
            Self::BinarySearch(s) => s,
            Self::LinearSearch(s) => s,
            Self::SlidingWindow(s) => s,
            Self::Sorting(s) => s,
            Self::Factorial(s) => s,
        }
    }
}

/// Object-safe union of the two traits every built-in implements.
trait ScenarioView: Scenario + Project {}

impl<T: Scenario + Project> ScenarioView for T {}

impl Scenario for ScenarioKind {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn length(&self) -> usize {
        self.inner().length()
    }

    fn step_at(&self, index: usize, state: &SimulationState) -> StepOutcome {
        self.inner().step_at(index, state)
    }

    fn validate(&self) -> SimResult<()> {
        self.inner().validate()
    }
}

impl Project for ScenarioKind {
    fn project(&self, state: &SimulationState, layout: &LayoutContext) -> RenderFrame {
        self.inner().project(state, layout)
    }
}

impl From<BinarySearch> for ScenarioKind {
    fn from(s: BinarySearch) -> Self {
        Self::BinarySearch(s)
    }
}

impl From<LinearSearch> for ScenarioKind {
    fn from(s: LinearSearch) -> Self {
        Self::LinearSearch(s)
    }
}

impl From<SlidingWindow> for ScenarioKind {
    fn from(s: SlidingWindow) -> Self {
        Self::SlidingWindow(s)
    }
}

impl From<SortTrace> for ScenarioKind {
    fn from(s: SortTrace) -> Self {
        Self::Sorting(s)
    }
}

impl From<FactorialTrace> for ScenarioKind {
    fn from(s: FactorialTrace) -> Self {
        Self::Factorial(s)
    }
}
