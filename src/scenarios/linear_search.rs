//! Linear search: inspect one index per step, stop on the first match.

use serde::{Deserialize, Serialize};

use crate::engine::state::SimulationState;
use crate::error::SimResult;
use crate::render::layout::{step_log, CellRow};
use crate::render::{LayoutContext, Project, RenderFrame, Role};
use crate::scenarios::{ensure_values, Scenario, StepOutcome};

/// Linear search scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearSearch {
    /// Values in display order.
    pub values: Vec<i64>,
    /// Value to look for.
    pub target: i64,
}

impl LinearSearch {
    /// Create a scenario. Validation happens when it is loaded.
    #[must_use]
    pub fn new(values: Vec<i64>, target: i64) -> Self {
        Self { values, target }
    }
}

impl Scenario for LinearSearch {
    fn name(&self) -> &str {
        "linear_search"
    }

    fn length(&self) -> usize {
        self.values.len()
    }

    fn step_at(&self, index: usize, _state: &SimulationState) -> StepOutcome {
        let value = self.values.get(index).copied().unwrap_or_default();
        let found = value == self.target;
        let last = index + 1 >= self.values.len();

        let description = if found {
            format!("Checking index {index}... Match!")
        } else if last {
            format!("Checking index {index}... Not a match; {} not found", self.target)
        } else {
            format!("Checking index {index}... Not a match")
        };

        let outcome = StepOutcome::new(description)
            .with("index", index)
            .with("value", value)
            .with("found", found);

        if found {
            outcome.stop()
        } else {
            outcome
        }
    }

    fn validate(&self) -> SimResult<()> {
        ensure_values(self.name(), &self.values)
    }
}

impl Project for LinearSearch {
    fn project(&self, state: &SimulationState, layout: &LayoutContext) -> RenderFrame {
        let n = self.values.len();
        let mut frame = RenderFrame::begin("Linear Search Visualization", layout);
        let row = CellRow::fit(layout, n, 80.0, (layout.height - 300.0).max(60.0), 90.0);

        let last = state.last_record();
        let current = last.and_then(|r| r.int("index"));
        let found = last.is_some_and(|r| r.flag("found") == Some(true));

        #[allow(clippy::cast_possible_wrap)]
        let roles: Vec<Role> = (0..n as i64)
            .map(|i| match current {
                Some(c) if i == c && found => Role::Found,
                Some(c) if i == c => Role::Active,
                Some(c) if i < c => Role::Visited,
                _ => Role::Pending,
            })
            .collect();

        frame.extend(row.bars(&self.values, &roles, layout));
        frame.extend(step_log(state, layout, row.bottom() + 40.0));

        let status = match current {
            None => "Press Step to begin search.".to_string(),
            Some(c) if found => format!("Found target {} at index {c}.", self.target),
            Some(_) if state.is_terminal() => format!("Target {} not found.", self.target),
            Some(c) => format!("Checking index {c}... Not a match"),
        };
        frame.set_status(status, layout);
        frame
    }
}
