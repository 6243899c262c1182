//! Widget configuration with YAML schema and validation.
//!
//! Mistake-proofing happens in two layers:
//! - Schema constraints via `serde` and `validator` derives
//! - Semantic validation of the scenario itself
//!
//! A config that loads successfully always yields a working controller.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use validator::Validate;

use crate::engine::clock::{FrameClock, DEFAULT_INTERVAL_MS};
use crate::engine::playback::PlaybackController;
use crate::error::{SimError, SimResult};
use crate::render::LayoutContext;
use crate::scenarios::{BinarySearch, Scenario, ScenarioKind};

/// Top-level widget configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct MicrosimConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Widget metadata.
    #[validate(nested)]
    #[serde(default)]
    pub widget: WidgetMeta,

    /// Automatic playback settings.
    #[validate(nested)]
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Drawing area geometry.
    #[validate(nested)]
    #[serde(default)]
    pub layout: LayoutContext,

    /// The scenario to step through.
    pub scenario: ScenarioKind,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl MicrosimConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SimResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;

        config.validate()?;
        config.validate_semantic()?;

        Ok(config)
    }

    /// Serialize back to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> SimResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> MicrosimConfigBuilder {
        MicrosimConfigBuilder::default()
    }

    /// Validate semantic constraints beyond schema.
    ///
    /// # Errors
    ///
    /// Returns `SimError::Config` for inconsistent geometry and
    /// `SimError::InvalidScenario` if the scenario is rejected.
    pub fn validate_semantic(&self) -> SimResult<()> {
        if self.layout.inner_width() <= 0.0 {
            return Err(SimError::config(format!(
                "margin {} leaves no drawing area in width {}",
                self.layout.margin, self.layout.width
            )));
        }

        self.scenario.validate()
    }

    /// Build an idle (or already playing) controller for this config.
    ///
    /// The controller carries the configured layout and, when set, the
    /// title override.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidScenario` if the scenario is rejected.
    pub fn into_controller(self) -> SimResult<PlaybackController<ScenarioKind>> {
        let clock = FrameClock::new(self.playback.interval_ms);
        let mut controller =
            PlaybackController::new(self.scenario, clock)?.with_layout(self.layout);
        if !self.widget.title.is_empty() {
            controller = controller.with_title(self.widget.title);
        }
        if self.playback.autoplay {
            controller.play();
        }
        info!(
            interval_ms = self.playback.interval_ms,
            autoplay = self.playback.autoplay,
            "controller ready"
        );
        Ok(controller)
    }
}

impl Default for MicrosimConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            widget: WidgetMeta::default(),
            playback: PlaybackConfig::default(),
            layout: LayoutContext::default(),
            scenario: BinarySearch::classroom().into(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct MicrosimConfigBuilder {
    title: Option<String>,
    interval_ms: Option<u64>,
    autoplay: Option<bool>,
    layout: Option<LayoutContext>,
    scenario: Option<ScenarioKind>,
}

impl MicrosimConfigBuilder {
    /// Set the widget title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the auto-advance interval in milliseconds.
    #[must_use]
    pub const fn interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = Some(interval_ms);
        self
    }

    /// Start playing as soon as the controller is built.
    #[must_use]
    pub const fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    /// Set the drawing area geometry.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // LayoutContext doesn't impl Copy
    pub fn layout(mut self, layout: LayoutContext) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Set the scenario.
    #[must_use]
    pub fn scenario(mut self, scenario: impl Into<ScenarioKind>) -> Self {
        self.scenario = Some(scenario.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> MicrosimConfig {
        let mut config = MicrosimConfig::default();

        if let Some(title) = self.title {
            config.widget.title = title;
        }

        if let Some(interval_ms) = self.interval_ms {
            config.playback.interval_ms = interval_ms;
        }

        if let Some(autoplay) = self.autoplay {
            config.playback.autoplay = autoplay;
        }

        if let Some(layout) = self.layout {
            config.layout = layout;
        }

        if let Some(scenario) = self.scenario {
            config.scenario = scenario;
        }

        config
    }
}

/// Widget metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct WidgetMeta {
    /// Title override; empty keeps the scenario's own title.
    #[validate(length(max = 120))]
    #[serde(default)]
    pub title: String,
}

/// Automatic playback settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Milliseconds between automatic steps.
    #[validate(range(min = 10, max = 60_000))]
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Enter Auto mode immediately.
    #[serde(default)]
    pub autoplay: bool,
}

const fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            autoplay: false,
        }
    }
}
