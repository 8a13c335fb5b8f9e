//! Target geometry for each visual profile
//!
//! The state machine only names width and margin classes; this module turns
//! them into pixel values for a renderer.

use serde::{Deserialize, Serialize};

use crate::state::{MarginClass, VisualProfile, WidthClass};

/// Layout preset matching the host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPreset {
    /// Phones and tablets
    #[default]
    Touch,
    /// Living-room displays driven by a remote
    Tv,
}

impl LayoutPreset {
    /// Get the layout metrics for this preset
    pub fn metrics(&self) -> LayoutMetrics {
        match self {
            LayoutPreset::Touch => LayoutMetrics::touch(),
            LayoutPreset::Tv => LayoutMetrics::tv(),
        }
    }
}

/// Pixel sizes used by the scrubber overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    /// Height of the marker container
    pub marker_height: f32,
    /// Container width while hidden (thin hit target)
    pub width_hidden: f32,
    /// Container width while scrolling
    pub width_scrolling: f32,
    /// Container width while scrubbing
    pub width_scrubbing: f32,
    /// Trailing margin while hidden or scrubbing
    pub trailing_margin_hidden: f32,
    /// Trailing margin while scrolling
    pub trailing_margin_scrolling: f32,
    /// Corner radius of the marker container
    pub corner_radius: f32,
}

impl LayoutMetrics {
    pub fn touch() -> Self {
        Self {
            marker_height: 42.0,
            width_hidden: 4.0,
            width_scrolling: 140.0,
            width_scrubbing: 200.0,
            trailing_margin_hidden: 1.0,
            trailing_margin_scrolling: 1.0,
            corner_radius: 4.0,
        }
    }

    pub fn tv() -> Self {
        Self {
            marker_height: 100.0,
            width_hidden: 4.0,
            width_scrolling: 280.0,
            width_scrubbing: 200.0,
            trailing_margin_hidden: 1.0,
            // Negative: the label slides out past the trailing edge
            trailing_margin_scrolling: -120.0,
            corner_radius: 12.0,
        }
    }

    /// Width in pixels for a width class
    pub fn width(&self, class: WidthClass) -> f32 {
        match class {
            WidthClass::Collapsed => self.width_hidden,
            WidthClass::Scrolling => self.width_scrolling,
            WidthClass::Scrubbing => self.width_scrubbing,
        }
    }

    /// Trailing margin in pixels for a margin class
    pub fn trailing_margin(&self, class: MarginClass) -> f32 {
        match class {
            MarginClass::Hidden => self.trailing_margin_hidden,
            MarginClass::Scrolling => self.trailing_margin_scrolling,
        }
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::touch()
    }
}

/// Spring parameters for state change animations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSpec {
    /// Duration in seconds
    pub duration: f32,
    /// Spring damping ratio (1.0 = critically damped)
    pub damping: f32,
    /// Initial spring velocity
    pub initial_velocity: f32,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: 0.4,
            damping: 0.8,
            initial_velocity: 10.0,
        }
    }
}

/// Resolved geometry a renderer animates towards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetGeometry {
    pub width: f32,
    pub trailing_margin: f32,
    pub height: f32,
    pub corner_radius: f32,
    /// Label opacity (0.0 or 1.0)
    pub label_opacity: f32,
}

/// Resolve a visual profile against layout metrics
pub fn target_geometry(profile: VisualProfile, layout: &LayoutMetrics) -> TargetGeometry {
    TargetGeometry {
        width: layout.width(profile.width),
        trailing_margin: layout.trailing_margin(profile.margin),
        height: layout.marker_height,
        corner_radius: layout.corner_radius,
        label_opacity: if profile.label_visible { 1.0 } else { 0.0 },
    }
}
