//! Sliding window sums.
//!
//! Step 0 sums the first `k` elements directly; every later step slides the
//! window one place, subtracting the element that leaves and adding the one
//! that enters. The running maximum keeps the earliest window on ties.

use serde::{Deserialize, Serialize};

use crate::engine::state::SimulationState;
use crate::error::SimResult;
use crate::render::layout::{line_of_text, CellRow};
use crate::render::{Align, Color, LayoutContext, Project, RenderCommand, RenderFrame, Role};
use crate::scenarios::{ensure, ensure_values, Scenario, StepOutcome};

/// Sliding window scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlidingWindow {
    /// Input sequence.
    pub data: Vec<i64>,
    /// Window size.
    pub k: usize,
}

impl SlidingWindow {
    /// Create a scenario. Validation happens when it is loaded.
    #[must_use]
    pub fn new(data: Vec<i64>, k: usize) -> Self {
        Self { data, k }
    }

    fn window(&self, start: usize) -> &[i64] {
        let end = (start + self.k).min(self.data.len());
        self.data.get(start..end).unwrap_or_default()
    }

    fn direct_sum(&self, start: usize) -> i64 {
        self.window(start).iter().sum()
    }

    fn joined(values: &[i64], sep: &str) -> String {
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl Scenario for SlidingWindow {
    fn name(&self) -> &str {
        "sliding_window"
    }

    fn length(&self) -> usize {
        if self.k == 0 || self.k > self.data.len() {
            0
        } else {
            self.data.len() - self.k + 1
        }
    }

    fn step_at(&self, start: usize, state: &SimulationState) -> StepOutcome {
        let end = start + self.k - 1;

        let Some(prev) = state.last_record().filter(|_| start > 0) else {
            let sum = self.direct_sum(start);
            return StepOutcome::new(format!(
                "Window [{start}..{end}]: {} = {sum}",
                Self::joined(self.window(start), " + ")
            ))
            .with("start", start)
            .with("end", end)
            .with("sum", sum)
            .with("max_sum", sum)
            .with("max_start", start);
        };

        let prev_sum = prev.int("sum").unwrap_or_else(|| self.direct_sum(start - 1));
        let leaving = self.data.get(start - 1).copied().unwrap_or_default();
        let entering = self.data.get(end).copied().unwrap_or_default();
        let sum = prev_sum - leaving + entering;

        let prev_max = prev.int("max_sum").unwrap_or(prev_sum);
        let (max_sum, max_start) = if sum > prev_max {
            #[allow(clippy::cast_possible_wrap)]
            let s = start as i64;
            (sum, s)
        } else {
            (prev_max, prev.int("max_start").unwrap_or(0))
        };

        StepOutcome::new(format!(
            "Window [{start}..{end}]: {prev_sum} - {leaving} + {entering} = {sum}"
        ))
        .with("start", start)
        .with("end", end)
        .with("sum", sum)
        .with("max_sum", max_sum)
        .with("max_start", max_start)
        .with("leaving", leaving)
        .with("entering", entering)
    }

    fn validate(&self) -> SimResult<()> {
        ensure_values(self.name(), &self.data)?;
        ensure(
            self.k >= 1 && self.k <= self.data.len(),
            self.name(),
            format!("window size k={} must be between 1 and {}", self.k, self.data.len()),
        )
    }
}

impl Project for SlidingWindow {
    fn project(&self, state: &SimulationState, layout: &LayoutContext) -> RenderFrame {
        let mut frame = RenderFrame::begin("Sliding Window Visualization", layout);
        let row = CellRow::fit(layout, self.data.len(), 110.0, 70.0, 90.0);
        let last = state.last_record();
        let start = last.and_then(|r| r.int("start"));

        let roles: Vec<Role> = (0..self.data.len())
            .map(|i| match start.and_then(|s| usize::try_from(s).ok()) {
                Some(s) if i >= s && i < s + self.k => Role::Active,
                _ => Role::Pending,
            })
            .collect();
        frame.extend(row.boxes(&self.data, &roles, layout));

        let panel_top = row.bottom() + 50.0;
        frame.extend([RenderCommand::Text {
            x: layout.width / 2.0,
            y: row.bottom() + 26.0,
            text: format!("window size k = {}", self.k),
            size: 13.0,
            align: Align::Center,
            color: Color::INK,
        }]);

        let Some((record, s)) = last.zip(start.and_then(|s| usize::try_from(s).ok())) else {
            frame.set_status("Press Step to place the first window.", layout);
            return frame;
        };

        frame.extend([row.bracket(s, s + self.k - 1)]);

        let window = self.window(s);
        let sum = record.int("sum").unwrap_or_default();
        let x = layout.margin + 16.0;
        frame.extend([
            line_of_text(
                x,
                panel_top,
                format!("Current window: [{}]", Self::joined(window, ", ")),
                14.0,
            ),
            line_of_text(
                x,
                panel_top + 28.0,
                format!("Current sum: {} = {sum}", Self::joined(window, " + ")),
                14.0,
            ),
        ]);
        let update = match (record.int("leaving"), record.int("entering")) {
            (Some(leaving), Some(entering)) => format!(
                "Slide update: {} - {leaving} + {entering} = {sum}",
                sum + leaving - entering
            ),
            _ => "First window uses direct sum of first k elements.".to_string(),
        };
        frame.extend([line_of_text(x, panel_top + 56.0, update, 14.0)]);

        let max_sum = record.int("max_sum").unwrap_or(sum);
        let max_start = record.int("max_start").unwrap_or_default();
        #[allow(clippy::cast_possible_wrap)]
        let k = self.k as i64;
        let mut status = format!(
            "Step {}/{} | max sum so far: {max_sum} at window [{max_start}..{}]",
            s + 1,
            self.length(),
            max_start + k - 1
        );
        if state.is_terminal() {
            status.push_str(" | complete");
        }
        if sum == max_sum {
            status.push_str(" | current is maximum");
        }
        frame.set_status(status, layout);
        frame
    }
}
