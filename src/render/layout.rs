//! Shared layout arithmetic for array-style widgets.

use crate::engine::state::SimulationState;
use crate::render::{Align, Color, LayoutContext, RenderCommand, Role};

/// Gap between adjacent cells in pixels.
pub const CELL_GAP: f64 = 5.0;

/// Height of the step log panel.
pub const LOG_PANEL_HEIGHT: f64 = 120.0;

/// A horizontal row of equally sized cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRow {
    pub x0: f64,
    pub top: f64,
    pub cell_width: f64,
    pub height: f64,
    pub gap: f64,
}

impl CellRow {
    /// Spread `n` cells across the inner width, capped at `max_cell` wide
    /// and centred.
    #[must_use]
    pub fn fit(layout: &LayoutContext, n: usize, top: f64, height: f64, max_cell: f64) -> Self {
        let n_f = n.max(1) as f64;
        let gap = CELL_GAP;
        let available = layout.inner_width() - (n_f - 1.0) * gap;
        let cell_width = (available / n_f).clamp(1.0, max_cell);
        let total = cell_width * n_f + (n_f - 1.0) * gap;
        let x0 = (layout.width - total) / 2.0;
        Self {
            x0,
            top,
            cell_width,
            height,
            gap,
        }
    }

    /// Left edge of cell `i`.
    #[must_use]
    pub fn x(&self, i: usize) -> f64 {
        self.x0 + i as f64 * (self.cell_width + self.gap)
    }

    /// Horizontal centre of cell `i`.
    #[must_use]
    pub fn center(&self, i: usize) -> f64 {
        self.x(i) + self.cell_width / 2.0
    }

    /// Bottom edge of the row.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Value boxes: one rounded cell per value with its label and index.
    #[must_use]
    pub fn boxes(
        &self,
        values: &[i64],
        roles: &[Role],
        layout: &LayoutContext,
    ) -> Vec<RenderCommand> {
        let mut commands = Vec::with_capacity(values.len() * 3);
        for (i, value) in values.iter().enumerate() {
            let role = roles.get(i).copied().unwrap_or_default();
            commands.push(RenderCommand::Rect {
                x: self.x(i),
                y: self.top,
                width: self.cell_width,
                height: self.height,
                radius: 8.0,
                role,
                fill: layout.color(role),
                stroke: Some(Color::SLATE),
            });
            let x = self.center(i);
            commands.push(label(
                x,
                self.top + self.height / 2.0 - 10.0,
                value.to_string(),
                20.0,
                Color::INK,
            ));
            commands.push(label(x, self.bottom() + 6.0, i.to_string(), 12.0, Color::MUTED));
        }
        commands
    }

    /// Bar chart: bar height proportional to value, minimum 20 px.
    #[must_use]
    pub fn bars(
        &self,
        values: &[i64],
        roles: &[Role],
        layout: &LayoutContext,
    ) -> Vec<RenderCommand> {
        let max = values.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0).max(1) as f64;
        let mut commands = Vec::with_capacity(values.len() * 2);
        for (i, value) in values.iter().enumerate() {
            let role = roles.get(i).copied().unwrap_or_default();
            let bar = 20.0 + (value.unsigned_abs() as f64 / max) * (self.height - 20.0);
            let y = self.bottom() - bar;
            commands.push(RenderCommand::Rect {
                x: self.x(i),
                y,
                width: self.cell_width,
                height: bar,
                radius: 5.0,
                role,
                fill: layout.color(role),
                stroke: Some(Color::SLATE),
            });
            commands.push(label(self.center(i), y - 14.0, value.to_string(), 10.0, Color::INK));
        }
        commands
    }

    /// Pointer tick and caption under cell `index`; nothing if out of range.
    #[must_use]
    pub fn pointer(
        &self,
        name: &str,
        index: i64,
        n: usize,
        y: f64,
        color: Color,
    ) -> Vec<RenderCommand> {
        let Ok(i) = usize::try_from(index) else {
            return Vec::new();
        };
        if i >= n {
            return Vec::new();
        }
        let px = self.center(i);
        vec![
            RenderCommand::Line {
                x1: px,
                y1: y - 10.0,
                x2: px,
                y2: y - 2.0,
                color,
            },
            label(px, y, name.to_string(), 11.0, color),
        ]
    }

    /// Outline around cells `start..=end`.
    #[must_use]
    pub fn bracket(&self, start: usize, end: usize) -> RenderCommand {
        let x = self.x(start) - 4.0;
        let width = self.x(end) + self.cell_width - self.x(start) + 8.0;
        RenderCommand::Rect {
            x,
            y: self.top - 4.0,
            width,
            height: self.height + 8.0,
            radius: 10.0,
            role: Role::Neutral,
            fill: Color::new(0, 0, 0, 0),
            stroke: Some(Color::INK),
        }
    }
}

/// Centred text label.
#[must_use]
pub fn label(x: f64, y: f64, text: String, size: f64, color: Color) -> RenderCommand {
    RenderCommand::Text {
        x,
        y,
        text,
        size,
        align: Align::Center,
        color,
    }
}

/// Left-aligned text line.
#[must_use]
pub fn line_of_text(x: f64, y: f64, text: String, size: f64) -> RenderCommand {
    RenderCommand::Text {
        x,
        y,
        text,
        size,
        align: Align::Left,
        color: Color::INK,
    }
}

/// "Step Log" panel with the most recent descriptions, "Ready" before the
/// first step.
#[must_use]
pub fn step_log(state: &SimulationState, layout: &LayoutContext, top: f64) -> Vec<RenderCommand> {
    let x = layout.margin;
    let width = layout.inner_width();
    let mut commands = vec![
        RenderCommand::Rect {
            x,
            y: top,
            width,
            height: LOG_PANEL_HEIGHT,
            radius: 8.0,
            role: Role::Neutral,
            fill: Color::LOG_PANEL,
            stroke: Some(Color::SLATE),
        },
        RenderCommand::Text {
            x: x + 10.0,
            y: top + 8.0,
            text: "Step Log".to_string(),
            size: 13.0,
            align: Align::Left,
            color: Color::LOG_HEADING,
        },
    ];

    let lines: Vec<String> = if state.is_started() {
        state
            .recent(layout.log_lines)
            .iter()
            .map(|r| r.description().to_string())
            .collect()
    } else {
        vec!["Ready".to_string()]
    };

    for (i, text) in lines.into_iter().enumerate() {
        commands.push(RenderCommand::Text {
            x: x + 10.0,
            y: top + 32.0 + i as f64 * 18.0,
            text,
            size: 12.0,
            align: Align::Left,
            color: Color::LOG_TEXT,
        });
    }
    commands
}
