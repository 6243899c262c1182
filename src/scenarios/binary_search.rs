//! Binary search over a small sorted array.
//!
//! Each step is one comparison: `mid = (low + high) / 2`, compare, then shrink
//! the window. The next window is derived from the previous record, so the
//! scenario itself carries only the array and the target.

use serde::{Deserialize, Serialize};

use crate::engine::state::{SimulationState, StepRecord};
use crate::error::SimResult;
use crate::render::layout::{step_log, CellRow};
use crate::render::{Color, LayoutContext, Project, RenderFrame, Role};
use crate::scenarios::{ensure, ensure_values, Scenario, StepOutcome};

/// Binary search scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BinarySearch {
    /// Sorted (non-decreasing) values.
    pub values: Vec<i64>,
    /// Value to look for.
    pub target: i64,
}

/// Search window `[low, high]`; empty once `low > high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    low: i64,
    high: i64,
}

impl BinarySearch {
    /// Create a scenario. Validation happens when it is loaded.
    #[must_use]
    pub fn new(values: Vec<i64>, target: i64) -> Self {
        Self { values, target }
    }

    /// The classroom example: 12 values, target 56.
    #[must_use]
    pub fn classroom() -> Self {
        Self::new(vec![4, 8, 13, 19, 25, 31, 42, 56, 63, 75, 88, 94], 56)
    }

    #[allow(clippy::cast_possible_wrap)]
    fn initial_window(&self) -> Window {
        Window {
            low: 0,
            high: self.values.len() as i64 - 1,
        }
    }

    /// Window left for the next comparison after `record`.
    fn window_after(record: &StepRecord) -> Window {
        let low = record.int("low").unwrap_or(0);
        let high = record.int("high").unwrap_or(-1);
        let mid = record.int("mid").unwrap_or(low);
        match record.text("direction") {
            Some("right") => Window { low: mid + 1, high },
            Some("left") => Window { low, high: mid - 1 },
            _ => Window { low, high },
        }
    }

    fn value_at(&self, index: i64) -> i64 {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.values.get(i))
            .copied()
            .unwrap_or_default()
    }
}

impl Scenario for BinarySearch {
    fn name(&self) -> &str {
        "binary_search"
    }

    /// Worst-case comparison count: the bit length of the array size.
    fn length(&self) -> usize {
        (usize::BITS - self.values.len().leading_zeros()) as usize
    }

    fn step_at(&self, _index: usize, state: &SimulationState) -> StepOutcome {
        let window = state
            .last_record()
            .map_or_else(|| self.initial_window(), Self::window_after);

        let mid = (window.low + window.high).div_euclid(2);
        let value = self.value_at(mid);
        let target = self.target;

        let (direction, description) = if value == target {
            ("found", format!("mid={mid}: {value} == {target}, found at index {mid}"))
        } else if value < target {
            ("right", format!("mid={mid}: {value} < {target}, go right"))
        } else {
            ("left", format!("mid={mid}: {value} > {target}, go left"))
        };

        let found = direction == "found";
        let exhausted = match direction {
            "right" => mid + 1 > window.high,
            "left" => window.low > mid - 1,
            _ => false,
        };
        let description = if exhausted {
            format!("{description}; {target} not found")
        } else {
            description
        };

        let outcome = StepOutcome::new(description)
            .with("low", window.low)
            .with("mid", mid)
            .with("high", window.high)
            .with("value", value)
            .with("direction", direction)
            .with("found", found);

        if found || exhausted {
            outcome.stop()
        } else {
            outcome
        }
    }

    fn validate(&self) -> SimResult<()> {
        ensure_values(self.name(), &self.values)?;
        ensure(
            self.values.windows(2).all(|w| w[0] <= w[1]),
            self.name(),
            "values must be sorted in ascending order",
        )
    }
}

impl Project for BinarySearch {
    fn project(&self, state: &SimulationState, layout: &LayoutContext) -> RenderFrame {
        let n = self.values.len();
        let mut frame = RenderFrame::begin("Binary Search Visualization", layout);
        let chart_height = (layout.height - 300.0).max(60.0);
        let row = CellRow::fit(layout, n, 80.0, chart_height, 90.0);

        let last = state.last_record();
        let window = last.map_or_else(|| self.initial_window(), Self::window_after);
        let mid = last.and_then(|r| r.int("mid")).unwrap_or(-1);
        let found = last.is_some_and(|r| r.flag("found") == Some(true));

        #[allow(clippy::cast_possible_wrap)]
        let roles: Vec<Role> = (0..n as i64)
            .map(|i| {
                if found && i == mid {
                    Role::Found
                } else if i == mid {
                    Role::Active
                } else if i < window.low || i > window.high {
                    Role::Visited
                } else {
                    Role::Pending
                }
            })
            .collect();

        frame.extend(row.bars(&self.values, &roles, layout));
        let base = row.bottom() + 14.0;
        frame.extend(row.pointer("low", window.low, n, base, Color::LOW));
        frame.extend(row.pointer("mid", mid, n, base + 20.0, Color::MID));
        frame.extend(row.pointer("high", window.high, n, base + 40.0, Color::HIGH));
        frame.extend(step_log(state, layout, row.bottom() + 70.0));

        let status = match last {
            None => format!("Target {}: press Step to begin search.", self.target),
            Some(_) if found => format!("Found target {} at index {mid}.", self.target),
            Some(_) if state.is_terminal() => format!("Target {} not found.", self.target),
            Some(_) => format!(
                "Searching indices {}..{} for {}",
                window.low, window.high, self.target
            ),
        };
        frame.set_status(status, layout);
        frame
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine::sequencer::StepSequencer;
    use crate::error::SimError;

    fn mids(scenario: BinarySearch) -> Vec<i64> {
        let mut seq = StepSequencer::new(scenario).unwrap();
        seq.run_to_end()
            .iter()
            .filter_map(|r| r.int("mid"))
            .collect()
    }

    #[test]
    fn test_length_is_worst_case_comparisons() {
        assert_eq!(BinarySearch::new(vec![1], 1).length(), 1);
        assert_eq!(BinarySearch::new(vec![1, 2, 3], 1).length(), 2);
        assert_eq!(BinarySearch::classroom().length(), 4);
        assert_eq!(BinarySearch::new((0..16).collect(), 0).length(), 5);
    }

    #[test]
    fn test_classroom_trace() {
        let mut seq = StepSequencer::new(BinarySearch::classroom()).unwrap();
        let records = seq.run_to_end();

        let trace: Vec<(i64, i64, &str)> = records
            .iter()
            .map(|r| (r.int("mid").unwrap(), r.int("value").unwrap(), r.text("direction").unwrap()))
            .collect();
        assert_eq!(
            trace,
            vec![(5, 31, "right"), (8, 63, "left"), (6, 42, "right"), (7, 56, "found")]
        );
        assert_eq!(records[0].description(), "mid=5: 31 < 56, go right");
        assert_eq!(records[1].description(), "mid=8: 63 > 56, go left");
        assert_eq!(records[3].flag("found"), Some(true));
        assert!(records[..3].iter().all(|r| r.flag("found") == Some(false)));
        assert!(seq.is_terminal());
    }

    #[test]
    fn test_not_found_stops_when_window_empty() {
        let mut seq = StepSequencer::new(BinarySearch::new(
            vec![4, 8, 13, 19, 25, 31, 42, 56, 63, 75, 88, 94],
            50,
        ))
        .unwrap();
        let records = seq.run_to_end();
        let last = records.last().unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(last.flag("found"), Some(false));
        assert!(last.description().ends_with("50 not found"));
        assert!(seq.is_terminal());
    }

    #[test]
    fn test_found_on_first_comparison() {
        assert_eq!(mids(BinarySearch::new(vec![1, 2, 3], 2)), vec![1]);
    }

    #[test]
    fn test_target_below_all_values() {
        assert_eq!(mids(BinarySearch::new(vec![10, 20, 30, 40], 1)), vec![1, 0]);
    }

    #[test]
    fn test_unsorted_rejected() {
        let err = StepSequencer::new(BinarySearch::new(vec![3, 1, 2], 1)).unwrap_err();
        assert!(matches!(err, SimError::InvalidScenario { .. }));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(StepSequencer::new(BinarySearch::new(vec![], 1)).is_err());
    }

    #[test]
    fn test_projection_roles_after_found() {
        let mut seq = StepSequencer::new(BinarySearch::classroom()).unwrap();
        seq.run_to_end();
        let frame = seq.scenario().project(seq.current_state(), &LayoutContext::default());

        assert_eq!(frame.count_role(Role::Found), 1);
        assert_eq!(frame.status, "Found target 56 at index 7.");
        assert!(frame.texts().contains(&"mid=7: 56 == 56, found at index 7"));
    }

    #[test]
    fn test_projection_before_start() {
        let scenario = BinarySearch::classroom();
        let frame = scenario.project(&SimulationState::new(), &LayoutContext::default());
        assert_eq!(frame.count_role(Role::Pending), 12);
        assert!(frame.texts().contains(&"Ready"));
        assert!(frame.texts().contains(&"low"));
        assert!(frame.texts().contains(&"high"));
        assert!(!frame.texts().contains(&"mid"));
    }
}
