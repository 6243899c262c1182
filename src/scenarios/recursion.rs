//! Factorial call-stack trace.
//!
//! Descent pushes one frame per call (enter, check, recurse or base return);
//! ascent computes and pops; a final step reports the result with an empty
//! stack.

use serde::{Deserialize, Serialize};

use crate::engine::state::SimulationState;
use crate::error::SimResult;
use crate::render::layout::label;
use crate::render::{Color, LayoutContext, Project, RenderCommand, RenderFrame, Role};
use crate::scenarios::{ensure, Scenario, StepOutcome};

/// Largest argument the trace accepts.
pub const MAX_ARG: i64 = 10;

/// Serialized form: just the argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactorialConfig {
    pub n: i64,
}

/// What happens on one traced step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Action {
    Enter,
    Check,
    Recurse,
    BaseReturn,
    Compute,
    Return,
    Done,
}

impl Action {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Check => "check",
            Self::Recurse => "recurse",
            Self::BaseReturn => "base_return",
            Self::Compute => "compute",
            Self::Return => "return",
            Self::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TraceStep {
    action: Action,
    arg: i64,
    narration: String,
    /// Arguments on the stack, bottom first.
    stack: Vec<i64>,
    result: Option<i64>,
}

/// Precomputed `factorial(n)` trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FactorialConfig", into = "FactorialConfig")]
pub struct FactorialTrace {
    n: i64,
    steps: Vec<TraceStep>,
}

impl FactorialTrace {
    /// Build the trace for `factorial(n)`.
    #[must_use]
    pub fn new(n: i64) -> Self {
        Self::from(FactorialConfig { n })
    }

    /// The traced argument.
    #[must_use]
    pub const fn n(&self) -> i64 {
        self.n
    }
}

impl From<FactorialConfig> for FactorialTrace {
    fn from(config: FactorialConfig) -> Self {
        let n = config.n;
        let steps = if (1..=MAX_ARG).contains(&n) {
            build_trace(n)
        } else {
            Vec::new()
        };
        Self { n, steps }
    }
}

impl From<FactorialTrace> for FactorialConfig {
    fn from(trace: FactorialTrace) -> Self {
        Self { n: trace.n }
    }
}

fn build_trace(n: i64) -> Vec<TraceStep> {
    let stack_down_to = |arg: i64| (arg..=n).rev().collect::<Vec<_>>();
    let mut steps = Vec::new();
    let mut push = |action, arg, narration: String, stack, result| {
        steps.push(TraceStep {
            action,
            arg,
            narration,
            stack,
            result,
        });
    };

    for i in (1..=n).rev() {
        push(
            Action::Enter,
            i,
            format!("Call factorial({i}): push new frame onto stack"),
            stack_down_to(i),
            None,
        );
        if i <= 1 {
            push(
                Action::Check,
                i,
                format!("Check: n = {i} <= 1? Yes! Base case reached."),
                stack_down_to(i),
                None,
            );
            push(
                Action::BaseReturn,
                i,
                "Return 1: base case sends back 1".to_string(),
                stack_down_to(i),
                Some(1),
            );
        } else {
            push(
                Action::Check,
                i,
                format!("Check: n = {i} <= 1? No, take the else branch."),
                stack_down_to(i),
                None,
            );
            push(
                Action::Recurse,
                i,
                format!(
                    "Need factorial({}) to compute {i} * factorial({})",
                    i - 1,
                    i - 1
                ),
                stack_down_to(i),
                None,
            );
        }
    }

    let mut result = 1;
    for i in 2..=n {
        let previous = result;
        result *= i;
        push(
            Action::Compute,
            i,
            format!("Back in factorial({i}): result = {i} * {previous} = {result}"),
            stack_down_to(i),
            Some(result),
        );
        push(
            Action::Return,
            i,
            format!("Return {result}: pop factorial({i}) from the stack"),
            stack_down_to(i + 1),
            Some(result),
        );
    }

    push(
        Action::Done,
        n,
        format!("Done! factorial({n}) = {result}. Stack is empty."),
        Vec::new(),
        Some(result),
    );
    steps
}

impl Scenario for FactorialTrace {
    fn name(&self) -> &str {
        "factorial"
    }

    fn length(&self) -> usize {
        self.steps.len()
    }

    fn step_at(&self, index: usize, _state: &SimulationState) -> StepOutcome {
        let Some(step) = self.steps.get(index) else {
            return StepOutcome::new("Done").stop();
        };
        let outcome = StepOutcome::new(step.narration.clone())
            .with("action", step.action.as_str())
            .with("arg", step.arg)
            .with("depth", step.stack.len())
            .with("stack", step.stack.clone());
        match step.result {
            Some(result) => outcome.with("result", result),
            None => outcome,
        }
    }

    fn validate(&self) -> SimResult<()> {
        ensure(
            (1..=MAX_ARG).contains(&self.n),
            self.name(),
            format!("n must be between 1 and {MAX_ARG}, got {}", self.n),
        )
    }
}

impl Project for FactorialTrace {
    fn project(&self, state: &SimulationState, layout: &LayoutContext) -> RenderFrame {
        let mut frame = RenderFrame::begin("Recursive Call Stack", layout);
        let last = state.last_record();
        let stack = last.and_then(|r| r.list("stack")).unwrap_or_default();
        let action = last.and_then(|r| r.text("action")).unwrap_or("");

        let frame_height = 36.0;
        let width = (layout.inner_width() / 2.0).min(260.0);
        let x = layout.width - layout.margin - width;
        let floor = layout.height - 60.0;

        frame.extend([label(
            x + width / 2.0,
            70.0,
            "Call Stack".to_string(),
            16.0,
            Color::INK,
        )]);

        for (level, arg) in stack.iter().enumerate() {
            let top_of_stack = level + 1 == stack.len();
            let role = match (top_of_stack, action) {
                (true, "base_return" | "compute") => Role::Found,
                (true, _) => Role::Active,
                (false, _) => Role::Pending,
            };
            let y = floor - (level as f64 + 1.0) * (frame_height + 4.0);
            frame.extend([
                RenderCommand::Rect {
                    x,
                    y,
                    width,
                    height: frame_height,
                    radius: 6.0,
                    role,
                    fill: layout.color(role),
                    stroke: Some(Color::SLATE),
                },
                label(x + width / 2.0, y + 10.0, format!("factorial({arg})"), 14.0, Color::INK),
            ]);
        }

        let status = match last {
            None => format!("factorial({}): click Step or Auto Play to begin", self.n),
            Some(record) => record.description().to_string(),
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

    fn actions(n: i64) -> Vec<String> {
        let mut seq = StepSequencer::new(FactorialTrace::new(n)).unwrap();
        seq.run_to_end()
            .iter()
            .filter_map(|r| r.text("action").map(str::to_string))
            .collect()
    }

    #[test]
    fn test_factorial_one() {
        assert_eq!(actions(1), vec!["enter", "check", "base_return", "done"]);
    }

    #[test]
    fn test_factorial_three_shape() {
        assert_eq!(
            actions(3),
            vec![
                "enter", "check", "recurse", // 3
                "enter", "check", "recurse", // 2
                "enter", "check", "base_return", // 1
                "compute", "return", // 2
                "compute", "return", // 3
                "done",
            ]
        );
    }

    #[test]
    fn test_result_and_stack() {
        let mut seq = StepSequencer::new(FactorialTrace::new(4)).unwrap();
        let records = seq.run_to_end();

        let last = records.last().unwrap();
        assert_eq!(last.int("result"), Some(24));
        assert_eq!(last.int("depth"), Some(0));

        let deepest = records.iter().filter_map(|r| r.int("depth")).max();
        assert_eq!(deepest, Some(4));
        assert_eq!(records[0].list("stack"), Some(&[4][..]));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(StepSequencer::new(FactorialTrace::new(0)).is_err());
        assert!(StepSequencer::new(FactorialTrace::new(MAX_ARG + 1)).is_err());
        assert!(StepSequencer::new(FactorialTrace::new(MAX_ARG)).is_ok());
    }

    #[test]
    fn test_projection_stack_roles() {
        let mut seq = StepSequencer::new(FactorialTrace::new(3)).unwrap();
        for _ in 0..9 {
            seq.advance();
        }
        // Base case returning at the top of a three-deep stack.
        let frame = seq.scenario().project(seq.current_state(), &LayoutContext::default());
        assert_eq!(frame.count_role(Role::Found), 1);
        assert_eq!(frame.count_role(Role::Pending), 2);
        assert_eq!(frame.status, "Return 1: base case sends back 1");
    }
}
