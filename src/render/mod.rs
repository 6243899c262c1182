//! Platform-agnostic render commands.
//!
//! A scenario projects its [`SimulationState`] into a [`RenderFrame`]: a flat
//! list of primitives that a canvas, DOM or terminal host can replay. The
//! projection is a pure function of state and [`LayoutContext`], so equal
//! states give byte-identical frames and snapshot tests can compare
//! fingerprints.

pub mod layout;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::state::SimulationState;
use crate::error::{SimError, SimResult};

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create new color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// `#rrggbb` form (alpha omitted when opaque).
    #[must_use]
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const ALICE_BLUE: Self = Self::rgb(240, 248, 255);
    pub const INK: Self = Self::rgb(15, 23, 42);
    pub const SLATE: Self = Self::rgb(51, 65, 85);
    pub const MUTED: Self = Self::rgb(71, 85, 105);
    pub const LOG_PANEL: Self = Self::new(15, 23, 42, 240);
    pub const LOG_HEADING: Self = Self::rgb(147, 197, 253);
    pub const LOG_TEXT: Self = Self::rgb(226, 232, 240);
    pub const LOW: Self = Self::rgb(37, 99, 235);
    pub const MID: Self = Self::rgb(234, 179, 8);
    pub const HIGH: Self = Self::rgb(220, 38, 38);
}

/// Semantic role of a drawn element; the palette decides its color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Already examined or excluded from the search range.
    Visited,
    /// Being examined on the current step.
    Active,
    /// The answer.
    Found,
    /// Not yet examined.
    #[default]
    Pending,
    /// Background and chrome.
    Neutral,
}

/// Role → color mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub visited: Color,
    pub active: Color,
    pub found: Color,
    pub pending: Color,
    pub neutral: Color,
}

impl Palette {
    /// Color for a role.
    #[must_use]
    pub const fn color(&self, role: Role) -> Color {
        match role {
            Role::Visited => self.visited,
            Role::Active => self.active,
            Role::Found => self.found,
            Role::Pending => self.pending,
            Role::Neutral => self.neutral,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            visited: Color::rgb(209, 213, 219),
            active: Color::rgb(253, 230, 138),
            found: Color::rgb(34, 197, 94),
            pending: Color::rgb(96, 165, 250),
            neutral: Color::WHITE,
        }
    }
}

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Platform-agnostic render command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Fill the whole drawing area.
    Clear { color: Color },

    /// Filled rectangle with optional rounded corners.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        role: Role,
        fill: Color,
        stroke: Option<Color>,
    },

    /// Straight line.
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
    },

    /// Text label anchored at its top edge.
    Text {
        x: f64,
        y: f64,
        text: String,
        size: f64,
        align: Align,
        color: Color,
    },
}

/// Geometry and colors the projection may depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutContext {
    /// Drawing area width in pixels.
    #[validate(range(min = 100.0, max = 8192.0))]
    pub width: f64,
    /// Drawing area height in pixels.
    #[validate(range(min = 100.0, max = 8192.0))]
    pub height: f64,
    /// Outer margin in pixels.
    #[validate(range(min = 0.0, max = 400.0))]
    pub margin: f64,
    /// Number of descriptions shown in the step log panel.
    #[validate(range(min = 1, max = 20))]
    pub log_lines: usize,
    /// Role colors.
    pub palette: Palette,
}

impl LayoutContext {
    /// Layout for a drawing area of the given size.
    #[must_use]
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Width available between the margins.
    #[must_use]
    pub fn inner_width(&self) -> f64 {
        (self.width - 2.0 * self.margin).max(0.0)
    }

    /// Color for a role under this layout's palette.
    #[must_use]
    pub const fn color(&self, role: Role) -> Color {
        self.palette.color(role)
    }
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self {
            width: 760.0,
            height: 500.0,
            margin: 28.0,
            log_lines: 4,
            palette: Palette::default(),
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Widget title.
    pub title: String,
    /// One-line status summary.
    pub status: String,
    /// Drawing area width.
    pub width: f64,
    /// Drawing area height.
    pub height: f64,
    /// Primitives in paint order.
    pub commands: Vec<RenderCommand>,
}

impl RenderFrame {
    /// Empty frame with a background fill and title, ready for content.
    #[must_use]
    pub fn begin(title: impl Into<String>, layout: &LayoutContext) -> Self {
        let title = title.into();
        let commands = vec![
            RenderCommand::Clear {
                color: Color::ALICE_BLUE,
            },
            RenderCommand::Text {
                x: layout.width / 2.0,
                y: 10.0,
                text: title.clone(),
                size: 24.0,
                align: Align::Center,
                color: Color::INK,
            },
        ];
        Self {
            title,
            status: String::new(),
            width: layout.width,
            height: layout.height,
            commands,
        }
    }

    /// Replace the title, including the drawn title label.
    pub fn retitle(&mut self, title: impl Into<String>) {
        let old = std::mem::replace(&mut self.title, title.into());
        for command in &mut self.commands {
            if let RenderCommand::Text { text, .. } = command {
                if *text == old {
                    text.clone_from(&self.title);
                    break;
                }
            }
        }
    }

    /// Append commands.
    pub fn extend(&mut self, commands: impl IntoIterator<Item = RenderCommand>) {
        self.commands.extend(commands);
    }

    /// Set the status line and draw it along the bottom edge.
    pub fn set_status(&mut self, status: impl Into<String>, layout: &LayoutContext) {
        self.status = status.into();
        self.commands.push(RenderCommand::Text {
            x: layout.margin,
            y: layout.height - 24.0,
            text: self.status.clone(),
            size: 13.0,
            align: Align::Left,
            color: Color::SLATE,
        });
    }

    /// Number of rectangles drawn with a given role.
    #[must_use]
    pub fn count_role(&self, role: Role) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Rect { role: r, .. } if *r == role))
            .count()
    }

    /// All text labels in paint order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Blake3 hash of the binary encoding, for snapshot comparison.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn fingerprint(&self) -> SimResult<[u8; 32]> {
        let bytes = bincode::serialize(self)
            .map_err(|e| SimError::serialization(format!("Frame fingerprint: {e}")))?;
        Ok(*blake3::hash(&bytes).as_bytes())
    }

    /// JSON encoding for hosts that draw outside Rust.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string(self)
            .map_err(|e| SimError::serialization(format!("Frame JSON: {e}")))
    }
}

/// Pure mapping from simulation state to a drawable frame.
pub trait Project {
    /// Draw `state` into `layout`. Must not mutate anything or read clocks.
    fn project(&self, state: &SimulationState, layout: &LayoutContext) -> RenderFrame;
}
