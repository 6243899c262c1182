//! Simulation state management.
//!
//! The state is an append-only log of [`StepRecord`]s plus a terminal flag.
//! Position is derived from the log length, so `records.len() == position + 1`
//! holds by construction.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A derived value attached to a step record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag (e.g. `found`).
    Bool(bool),
    /// Integer quantity (index, sum, pointer).
    Int(i64),
    /// Integer sequence (array snapshot, call stack).
    List(Vec<i64>),
    /// Free text (direction, action name).
    Text(String),
}

impl Value {
    /// Integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// List payload, if any.
    #[must_use]
    pub fn as_list(&self) -> Option<&[i64]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<usize> for Value {
    #[allow(clippy::cast_possible_wrap)]
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Self::List(v)
    }
}

impl From<&[i64]> for Value {
    fn from(v: &[i64]) -> Self {
        Self::List(v.to_vec())
    }
}

/// Ordered name → value mapping carried by each record.
pub type DerivedValues = IndexMap<String, Value>;

/// One immutable unit of progress produced by a single advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    index: usize,
    description: String,
    derived: DerivedValues,
}

impl StepRecord {
    /// Create a record. Only the sequencer assigns indices.
    #[must_use]
    pub(crate) fn new(index: usize, description: String, derived: DerivedValues) -> Self {
        Self {
            index,
            description,
            derived,
        }
    }

    /// Zero-based step index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Human-readable description for the step log.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// All derived values in insertion order.
    #[must_use]
    pub const fn derived(&self) -> &DerivedValues {
        &self.derived
    }

    /// Look up a derived value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.derived.get(name)
    }

    /// Integer derived value by name.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    /// Boolean derived value by name.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// List derived value by name.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[i64]> {
        self.get(name).and_then(Value::as_list)
    }

    /// Text derived value by name.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }
}

/// State of one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    records: Vec<StepRecord>,
    terminal: bool,
}

impl SimulationState {
    /// Fresh, not-started state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            terminal: false,
        }
    }

    /// Current position; `-1` before the first step.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn position(&self) -> i64 {
        self.records.len() as i64 - 1
    }

    /// Whether any step has been taken.
    #[must_use]
    pub fn is_started(&self) -> bool {
        !self.records.is_empty()
    }

    /// Whether no further steps remain.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Number of steps taken so far.
    #[must_use]
    pub fn steps_taken(&self) -> usize {
        self.records.len()
    }

    /// All records in order.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Most recent record.
    #[must_use]
    pub fn last_record(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    /// The last `n` records, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> &[StepRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    pub(crate) fn push(&mut self, record: StepRecord, terminal: bool) {
        self.records.push(record);
        self.terminal = terminal;
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.terminal = false;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn record(index: usize) -> StepRecord {
        let mut derived = DerivedValues::new();
        derived.insert("index".to_string(), Value::from(index));
        StepRecord::new(index, format!("step {index}"), derived)
    }

    #[test]
    fn test_new_state_not_started() {
        let state = SimulationState::new();
        assert_eq!(state.position(), -1);
        assert!(!state.is_started());
        assert!(!state.is_terminal());
        assert!(state.last_record().is_none());
    }

    #[test]
    fn test_position_tracks_records() {
        let mut state = SimulationState::new();
        state.push(record(0), false);
        state.push(record(1), true);

        assert_eq!(state.position(), 1);
        assert_eq!(state.steps_taken(), 2);
        assert!(state.is_terminal());
        assert_eq!(state.last_record().map(StepRecord::index), Some(1));
    }

    #[test]
    fn test_clear() {
        let mut state = SimulationState::new();
        state.push(record(0), true);
        state.clear();
        assert_eq!(state, SimulationState::new());
    }

    #[test]
    fn test_recent_window() {
        let mut state = SimulationState::new();
        for i in 0..6 {
            state.push(record(i), false);
        }
        let recent: Vec<usize> = state.recent(4).iter().map(StepRecord::index).collect();
        assert_eq!(recent, vec![2, 3, 4, 5]);
        assert_eq!(state.recent(10).len(), 6);
    }

    #[test]
    fn test_record_accessors() {
        let mut derived = DerivedValues::new();
        derived.insert("found".to_string(), Value::from(true));
        derived.insert("mid".to_string(), Value::from(5_i64));
        derived.insert("array".to_string(), Value::from(vec![1, 2, 3]));
        derived.insert("direction".to_string(), Value::from("right"));
        let rec = StepRecord::new(0, "inspect".to_string(), derived);

        assert_eq!(rec.flag("found"), Some(true));
        assert_eq!(rec.int("mid"), Some(5));
        assert_eq!(rec.list("array"), Some(&[1, 2, 3][..]));
        assert_eq!(rec.text("direction"), Some("right"));
        assert_eq!(rec.int("found"), None);
        assert!(rec.get("missing").is_none());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(vec![2, 1, 5]).to_string(), "[2, 1, 5]");
        assert_eq!(Value::from(42_i64).to_string(), "42");
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(Value::from("left").to_string(), "left");
    }

    #[test]
    fn test_value_untagged_json() {
        let mut derived = DerivedValues::new();
        derived.insert("sum".to_string(), Value::from(9_i64));
        derived.insert("found".to_string(), Value::from(true));
        let json = serde_json::to_string(&derived).unwrap();
        assert_eq!(json, r#"{"sum":9,"found":true}"#);

        let back: DerivedValues = serde_json::from_str(&json).unwrap();
        assert_eq!(back, derived);
    }
}
