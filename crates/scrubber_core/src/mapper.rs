//! Coordinate mapping between scroll-offset space and marker space
//!
//! Every conversion goes through a fraction in `[0, 1]`. Clamping happens on
//! the fraction, never on pixels, so the result does not depend on the marker
//! size.

use serde::{Deserialize, Serialize};

/// Snapshot of the host container's scroll geometry
///
/// Supplied by the host on every scroll notification. Insets and offset may be
/// negative while the container is overscrolling.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollMetrics {
    /// Visible height of the scroll container
    pub container_height: f32,
    /// Total height of the scrollable content
    pub content_height: f32,
    /// Padding before the content counted in position math
    pub content_inset_top: f32,
    /// Padding after the content counted in position math
    pub content_inset_bottom: f32,
    /// Current vertical scroll position
    pub content_offset_y: f32,
    /// Height of the scrubber marker
    pub marker_height: f32,
}

impl ScrollMetrics {
    /// Sum of top and bottom insets
    pub fn total_inset(&self) -> f32 {
        self.content_inset_top + self.content_inset_bottom
    }

    /// Scrollable overflow: how far the content can move past the container
    pub fn scroll_range(&self) -> f32 {
        self.content_height - self.container_height + self.total_inset()
    }

    /// Distance the marker can travel inside the container
    pub fn track_length(&self) -> f32 {
        self.container_height - self.total_inset() - self.marker_height
    }

    /// Check if the content overflows the container
    pub fn can_scroll(&self) -> bool {
        self.scroll_range() > 0.0
    }
}

/// Clamp a fraction to `[0, 1]`, mapping NaN to 0
pub fn bounded_fraction(fraction: f32) -> f32 {
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0)
}

/// Fraction of the scroll range the content is scrolled by
///
/// Returns 0 when the content does not overflow the container.
pub fn offset_fraction_from_scroll(metrics: &ScrollMetrics) -> f32 {
    let range = metrics.scroll_range();
    if range <= 0.0 {
        return 0.0;
    }
    bounded_fraction(metrics.content_offset_y / range)
}

/// Content offset that corresponds to `fraction` of the scroll range
pub fn scroll_offset_from_fraction(fraction: f32, metrics: &ScrollMetrics) -> f32 {
    fraction * metrics.scroll_range() - metrics.content_inset_top
}

/// Top edge of the marker, in content coordinates, for `fraction`
pub fn marker_pixel_from_fraction(fraction: f32, metrics: &ScrollMetrics) -> f32 {
    (metrics.content_offset_y + metrics.content_inset_top) + fraction * metrics.track_length()
}

/// Fraction along the marker track for a location measured from the track top
///
/// Returns 0 when the marker has no room to travel.
pub fn fraction_from_track_location(location: f32, metrics: &ScrollMetrics) -> f32 {
    let track = metrics.track_length();
    if track <= 0.0 {
        return 0.0;
    }
    bounded_fraction(location / track)
}

/// Marker position along the track
///
/// The fraction is the only stored value; pixel positions are re-derived from
/// the metrics in effect at the time of the query.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkerPosition {
    fraction: f32,
}

impl MarkerPosition {
    /// Create a marker position, clamping the fraction
    pub fn new(fraction: f32) -> Self {
        Self {
            fraction: bounded_fraction(fraction),
        }
    }

    /// Marker position for the current scroll offset
    pub fn from_metrics(metrics: &ScrollMetrics) -> Self {
        Self::new(offset_fraction_from_scroll(metrics))
    }

    /// Fraction in `[0, 1]`
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Top edge of the marker in content coordinates
    pub fn pixel_offset(&self, metrics: &ScrollMetrics) -> f32 {
        marker_pixel_from_fraction(self.fraction, metrics)
    }

    /// Vertical centre of the marker in content coordinates
    pub fn center_y(&self, metrics: &ScrollMetrics) -> f32 {
        self.pixel_offset(metrics) + metrics.marker_height / 2.0
    }
}
