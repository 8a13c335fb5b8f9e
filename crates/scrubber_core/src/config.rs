//! Scrubber configuration
//!
//! Every field has a default, so an empty TOML table is a valid config:
//!
//! ```toml
//! auto_hide_delay = 2.0
//! hit_zone_width = 60.0
//! uppercase_titles = true
//! nested_in_controller_wrapper = false
//! layout = "tv"
//!
//! [animation]
//! duration = 0.4
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrubberError};
use crate::geometry::{AnimationSpec, LayoutMetrics, LayoutPreset};
use crate::gesture::DEFAULT_HIT_ZONE_WIDTH;

/// Layout either by preset name or spelled out in full
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutConfig {
    Preset(LayoutPreset),
    Custom(LayoutMetrics),
}

impl LayoutConfig {
    /// Resolve to concrete metrics
    pub fn metrics(&self) -> LayoutMetrics {
        match self {
            LayoutConfig::Preset(preset) => preset.metrics(),
            LayoutConfig::Custom(metrics) => *metrics,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig::Preset(LayoutPreset::default())
    }
}

/// Configuration for scrubber behavior and appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubberConfig {
    /// Seconds of inactivity before the scrubber hides
    pub auto_hide_delay: f32,
    /// Width of the trailing strip that accepts gestures
    pub hit_zone_width: f32,
    /// Uppercase section titles before display
    pub uppercase_titles: bool,
    /// The scroll container sits inside a controller-managed wrapper view,
    /// so gesture locations are measured from the wrapper's origin
    pub nested_in_controller_wrapper: bool,
    /// Sizes for each visual state
    pub layout: LayoutConfig,
    /// State change animation parameters
    pub animation: AnimationSpec,
}

impl Default for ScrubberConfig {
    fn default() -> Self {
        Self {
            auto_hide_delay: 2.0,
            hit_zone_width: DEFAULT_HIT_ZONE_WIDTH,
            uppercase_titles: true,
            nested_in_controller_wrapper: false,
            layout: LayoutConfig::default(),
            animation: AnimationSpec::default(),
        }
    }
}

impl ScrubberConfig {
    /// Create config for TV-style layouts
    pub fn tv() -> Self {
        Self {
            layout: LayoutConfig::Preset(LayoutPreset::Tv),
            ..Default::default()
        }
    }

    /// Parse and validate a TOML config
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the scrubber cannot work with
    pub fn validate(&self) -> Result<()> {
        positive("auto_hide_delay", self.auto_hide_delay)?;
        if Duration::try_from_secs_f32(self.auto_hide_delay).is_err() {
            return Err(ScrubberError::InvalidConfig {
                field: "auto_hide_delay",
                reason: "is too large",
            });
        }
        positive("hit_zone_width", self.hit_zone_width)?;

        let layout = self.layout.metrics();
        positive("layout.marker_height", layout.marker_height)?;
        if !layout.width_hidden.is_finite() || layout.width_hidden < 0.0 {
            return Err(ScrubberError::InvalidConfig {
                field: "layout.width_hidden",
                reason: "must be a non-negative number",
            });
        }

        if !self.animation.duration.is_finite() || self.animation.duration < 0.0 {
            return Err(ScrubberError::InvalidConfig {
                field: "animation.duration",
                reason: "must be a non-negative number",
            });
        }
        Ok(())
    }

    /// Auto-hide delay as a duration
    ///
    /// Saturates instead of panicking on unvalidated values.
    pub fn auto_hide_duration(&self) -> Duration {
        if self.auto_hide_delay > 0.0 {
            Duration::try_from_secs_f32(self.auto_hide_delay).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScrubberError::InvalidConfig {
            field,
            reason: "must be a positive number",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = ScrubberConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScrubberConfig::default());
        assert_eq!(config.auto_hide_duration(), Duration::from_secs(2));
    }

    #[test]
    fn test_preset_by_name() {
        let config = ScrubberConfig::from_toml_str("layout = \"tv\"\nhit_zone_width = 80.0").unwrap();
        assert_eq!(config.layout.metrics(), LayoutMetrics::tv());
        assert_eq!(config.hit_zone_width, 80.0);
    }

    #[test]
    fn test_custom_layout() {
        let input = r#"
            [layout]
            marker_height = 30.0
            width_hidden = 2.0
            width_scrolling = 120.0
            width_scrubbing = 160.0
            trailing_margin_hidden = 0.0
            trailing_margin_scrolling = 4.0
            corner_radius = 6.0
        "#;
        let config = ScrubberConfig::from_toml_str(input).unwrap();
        assert_eq!(config.layout.metrics().marker_height, 30.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = ScrubberConfig::from_toml_str("auto_hide_delay = 0.0").unwrap_err();
        assert!(matches!(
            err,
            ScrubberError::InvalidConfig {
                field: "auto_hide_delay",
                ..
            }
        ));

        let err = ScrubberConfig::from_toml_str("hit_zone_width = -5.0").unwrap_err();
        assert!(err.to_string().contains("hit_zone_width"));

        assert!(matches!(
            ScrubberConfig::from_toml_str("auto_hide_delay = \"soon\""),
            Err(ScrubberError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_unrepresentable_delay() {
        let config = ScrubberConfig {
            auto_hide_delay: 1.0e30,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ScrubberError::InvalidConfig {
                field: "auto_hide_delay",
                reason: "is too large",
            })
        ));
        assert_eq!(config.auto_hide_duration(), Duration::MAX);

        let negative = ScrubberConfig {
            auto_hide_delay: -1.0,
            ..Default::default()
        };
        assert_eq!(negative.auto_hide_duration(), Duration::ZERO);
    }
}
