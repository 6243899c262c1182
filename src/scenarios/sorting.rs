//! Sorting pass traces.
//!
//! The whole trace is built once when the scenario is constructed: a
//! "Start array" frame, one frame per pass (selection / insertion) or per
//! merged range (merge sort), and a final "Sorted" frame.

use serde::{Deserialize, Serialize};

use crate::engine::state::SimulationState;
use crate::error::SimResult;
use crate::render::layout::{step_log, CellRow};
use crate::render::{LayoutContext, Project, RenderFrame, Role};
use crate::scenarios::{ensure_values, Scenario, StepOutcome};

/// Which algorithm to trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAlgorithm {
    #[default]
    Selection,
    Insertion,
    Merge,
}

impl SortAlgorithm {
    /// Display name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Selection => "Selection Sort",
            Self::Insertion => "Insertion Sort",
            Self::Merge => "Merge Sort",
        }
    }

    /// Asymptotic cost shown next to the chart.
    #[must_use]
    pub const fn complexity(self) -> &'static str {
        match self {
            Self::Selection => "O(n^2)",
            Self::Insertion => "O(n^2) avg",
            Self::Merge => "O(n log n)",
        }
    }
}

/// Serialized form: just the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortConfig {
    pub values: Vec<i64>,
    #[serde(default)]
    pub algorithm: SortAlgorithm,
}

/// One frame of the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    array: Vec<i64>,
    note: String,
}

/// Precomputed sorting trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SortConfig", into = "SortConfig")]
pub struct SortTrace {
    config: SortConfig,
    frames: Vec<Frame>,
}

impl SortTrace {
    /// Build the trace for `values` under `algorithm`.
    #[must_use]
    pub fn new(values: Vec<i64>, algorithm: SortAlgorithm) -> Self {
        Self::from(SortConfig { values, algorithm })
    }

    /// Algorithm being traced.
    #[must_use]
    pub const fn algorithm(&self) -> SortAlgorithm {
        self.config.algorithm
    }

    /// Input values.
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.config.values
    }
}

impl From<SortConfig> for SortTrace {
    fn from(config: SortConfig) -> Self {
        let frames = if config.values.is_empty() {
            Vec::new()
        } else {
            match config.algorithm {
                SortAlgorithm::Selection => selection_frames(&config.values),
                SortAlgorithm::Insertion => insertion_frames(&config.values),
                SortAlgorithm::Merge => merge_frames(&config.values),
            }
        };
        Self { config, frames }
    }
}

impl From<SortTrace> for SortConfig {
    fn from(trace: SortTrace) -> Self {
        trace.config
    }
}

fn start_frame(values: &[i64]) -> Frame {
    Frame {
        array: values.to_vec(),
        note: "Start array".to_string(),
    }
}

fn sorted_frame(array: &[i64]) -> Frame {
    Frame {
        array: array.to_vec(),
        note: "Sorted".to_string(),
    }
}

fn selection_frames(values: &[i64]) -> Vec<Frame> {
    let mut a = values.to_vec();
    let mut frames = vec![start_frame(values)];

    for i in 0..a.len().saturating_sub(1) {
        let mut min_idx = i;
        for j in i + 1..a.len() {
            if a[j] < a[min_idx] {
                min_idx = j;
            }
        }
        let note = if min_idx == i {
            format!("Position {i} already minimum")
        } else {
            a.swap(i, min_idx);
            format!("Swap index {i} with min index {min_idx}")
        };
        frames.push(Frame {
            array: a.clone(),
            note,
        });
    }

    frames.push(sorted_frame(&a));
    frames
}

fn insertion_frames(values: &[i64]) -> Vec<Frame> {
    let mut a = values.to_vec();
    let mut frames = vec![start_frame(values)];

    for i in 1..a.len() {
        let key = a[i];
        let mut j = i;
        while j > 0 && a[j - 1] > key {
            a[j] = a[j - 1];
            j -= 1;
        }
        a[j] = key;
        frames.push(Frame {
            array: a.clone(),
            note: format!("Insert {key} into sorted prefix"),
        });
    }

    frames.push(sorted_frame(&a));
    frames
}

fn merge_frames(values: &[i64]) -> Vec<Frame> {
    fn sort_range(a: &mut [i64], lo: usize, hi: usize, frames: &mut Vec<Frame>) {
        if hi - lo <= 1 {
            return;
        }
        let mid = (lo + hi) / 2;
        sort_range(a, lo, mid, frames);
        sort_range(a, mid, hi, frames);

        let mut merged = Vec::with_capacity(hi - lo);
        let (mut i, mut j) = (lo, mid);
        while i < mid && j < hi {
            if a[i] <= a[j] {
                merged.push(a[i]);
                i += 1;
            } else {
                merged.push(a[j]);
                j += 1;
            }
        }
        merged.extend_from_slice(&a[i..mid]);
        merged.extend_from_slice(&a[j..hi]);
        a[lo..hi].copy_from_slice(&merged);

        frames.push(Frame {
            array: a.to_vec(),
            note: format!("Merge range [{lo}, {}]", hi - 1),
        });
    }

    let mut a = values.to_vec();
    let mut frames = vec![start_frame(values)];
    let len = a.len();
    sort_range(&mut a, 0, len, &mut frames);
    frames.push(sorted_frame(&a));
    frames
}

impl Scenario for SortTrace {
    fn name(&self) -> &str {
        "sorting"
    }

    fn length(&self) -> usize {
        self.frames.len()
    }

    fn step_at(&self, index: usize, _state: &SimulationState) -> StepOutcome {
        let Some(frame) = self.frames.get(index) else {
            return StepOutcome::new("Sorted").stop();
        };
        let changed: Vec<i64> = index
            .checked_sub(1)
            .and_then(|prev| self.frames.get(prev))
            .map(|prev| {
                frame
                    .array
                    .iter()
                    .zip(&prev.array)
                    .enumerate()
                    .filter(|(_, (now, before))| now != before)
                    .filter_map(|(i, _)| i64::try_from(i).ok())
                    .collect()
            })
            .unwrap_or_default();

        StepOutcome::new(frame.note.clone())
            .with("algorithm", self.config.algorithm.label())
            .with("pass", index)
            .with("array", frame.array.clone())
            .with("changed", changed)
    }

    fn validate(&self) -> SimResult<()> {
        ensure_values(self.name(), &self.config.values)
    }
}

impl Project for SortTrace {
    fn project(&self, state: &SimulationState, layout: &LayoutContext) -> RenderFrame {
        let algorithm = self.config.algorithm;
        let mut frame = RenderFrame::begin(algorithm.label(), layout);
        let last = state.last_record();
        let array = last
            .and_then(|r| r.list("array"))
            .unwrap_or(self.config.values.as_slice());
        let changed = last.and_then(|r| r.list("changed")).unwrap_or_default();

        let roles: Vec<Role> = (0..array.len())
            .map(|i| {
                if state.is_terminal() {
                    Role::Found
                } else if i64::try_from(i).is_ok_and(|i| changed.contains(&i)) {
                    Role::Active
                } else {
                    Role::Pending
                }
            })
            .collect();

        let row = CellRow::fit(layout, array.len(), 80.0, (layout.height - 300.0).max(60.0), 60.0);
        frame.extend(row.bars(array, &roles, layout));
        frame.extend(step_log(state, layout, row.bottom() + 40.0));

        let shown = state.steps_taken().max(1);
        frame.set_status(
            format!(
                "Frame {shown}/{} | {}: {}",
                self.length(),
                algorithm.label(),
                algorithm.complexity()
            ),
            layout,
        );
        frame
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine::sequencer::StepSequencer;

    const SEED: [i64; 8] = [8, 3, 6, 1, 7, 2, 5, 4];

    fn notes(trace: SortTrace) -> Vec<String> {
        let mut seq = StepSequencer::new(trace).unwrap();
        seq.run_to_end()
            .iter()
            .map(|r| r.description().to_string())
            .collect()
    }

    #[test]
    fn test_selection_trace() {
        let trace = SortTrace::new(SEED.to_vec(), SortAlgorithm::Selection);
        assert_eq!(trace.length(), 9);
        let notes = notes(trace);
        assert_eq!(notes[0], "Start array");
        assert_eq!(notes[1], "Swap index 0 with min index 3");
        assert_eq!(notes[8], "Sorted");
    }

    #[test]
    fn test_insertion_trace() {
        let trace = SortTrace::new(SEED.to_vec(), SortAlgorithm::Insertion);
        let notes = notes(trace);
        assert_eq!(notes.len(), 9);
        assert_eq!(notes[1], "Insert 3 into sorted prefix");
    }

    #[test]
    fn test_merge_trace() {
        let trace = SortTrace::new(SEED.to_vec(), SortAlgorithm::Merge);
        // Start + 7 merges for 8 elements + Sorted.
        assert_eq!(trace.length(), 9);
        let notes = notes(trace);
        assert_eq!(notes[1], "Merge range [0, 1]");
        assert_eq!(notes[7], "Merge range [0, 7]");
    }

    #[test]
    fn test_every_algorithm_ends_sorted() {
        for algorithm in [
            SortAlgorithm::Selection,
            SortAlgorithm::Insertion,
            SortAlgorithm::Merge,
        ] {
            let mut seq = StepSequencer::new(SortTrace::new(SEED.to_vec(), algorithm)).unwrap();
            let records = seq.run_to_end();
            let last = records.last().unwrap();
            assert_eq!(last.list("array"), Some(&[1, 2, 3, 4, 5, 6, 7, 8][..]));
        }
    }

    #[test]
    fn test_changed_indices() {
        let trace = SortTrace::new(vec![3, 1, 2], SortAlgorithm::Selection);
        let mut seq = StepSequencer::new(trace).unwrap();
        seq.advance();
        let swap = seq.advance();
        assert_eq!(swap.record().and_then(|r| r.list("changed")), Some(&[0, 1][..]));
    }

    #[test]
    fn test_single_value() {
        let trace = SortTrace::new(vec![5], SortAlgorithm::Merge);
        assert_eq!(trace.length(), 2);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(StepSequencer::new(SortTrace::new(vec![], SortAlgorithm::Insertion)).is_err());
    }

    #[test]
    fn test_yaml_round_trip_keeps_inputs_only() {
        let trace = SortTrace::new(vec![2, 1], SortAlgorithm::Insertion);
        let yaml = serde_yaml::to_string(&trace).unwrap();
        assert!(yaml.contains("insertion"));
        assert!(!yaml.contains("Start array"));
        let back: SortTrace = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, trace);
    }

    #[test]
    fn test_projection_terminal_all_found() {
        let trace = SortTrace::new(SEED.to_vec(), SortAlgorithm::Merge);
        let mut seq = StepSequencer::new(trace).unwrap();
        seq.run_to_end();
        let frame = seq.scenario().project(seq.current_state(), &LayoutContext::default());
        assert_eq!(frame.count_role(Role::Found), 8);
        assert_eq!(frame.status, "Frame 9/9 | Merge Sort: O(n log n)");
    }
}
