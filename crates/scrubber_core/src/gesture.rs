//! Gesture interpretation
//!
//! Turns raw drag/press events into scrubber actions. The coordinator only
//! computes offsets; the scrubber decides what to do with them and the host
//! applies them.

use serde::{Deserialize, Serialize};

use crate::geometry::LayoutMetrics;
use crate::mapper::{fraction_from_track_location, scroll_offset_from_fraction, ScrollMetrics};

/// Width of the interactive strip at the trailing edge of the overlay
pub const DEFAULT_HIT_ZONE_WIDTH: f32 = 60.0;

/// A 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Gesture phase as reported by the platform recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Begin,
    Change,
    End,
    Cancel,
}

/// A pointer gesture event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub phase: GesturePhase,
    /// Location relative to the scrubber overlay row (used for hit testing)
    pub position: Point,
    /// Vertical location in window space (used for seeking)
    pub window_y: f32,
}

impl GestureEvent {
    pub fn new(phase: GesturePhase, position: Point, window_y: f32) -> Self {
        Self {
            phase,
            position,
            window_y,
        }
    }
}

/// Host geometry needed to interpret a gesture
///
/// Hosts return `None` instead when they are not attached to a window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HostGeometry {
    /// Window-space y of the scroll container's origin
    pub container_origin_y: f32,
    /// Window-space y of the controller wrapper's origin, when there is one
    pub wrapper_origin_y: Option<f32>,
    /// Width of the scrubber overlay row
    pub overlay_width: f32,
    /// Height of the view the overlay is installed in
    pub containing_height: f32,
}

impl HostGeometry {
    /// Origin the track is measured from
    pub fn track_origin_y(&self, nested_in_controller_wrapper: bool) -> f32 {
        match self.wrapper_origin_y {
            Some(wrapper) if nested_in_controller_wrapper => wrapper,
            _ => self.container_origin_y,
        }
    }
}

/// Trailing strip of the overlay that accepts gestures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitZone {
    pub width: f32,
}

impl HitZone {
    pub fn new(width: f32) -> Self {
        Self { width }
    }

    /// Check if `point` (overlay-local) falls inside the zone
    pub fn contains(&self, point: Point, overlay_width: f32, overlay_height: f32) -> bool {
        let left = overlay_width - self.width;
        point.x >= left && point.x < overlay_width && point.y >= 0.0 && point.y < overlay_height
    }
}

impl Default for HitZone {
    fn default() -> Self {
        Self::new(DEFAULT_HIT_ZONE_WIDTH)
    }
}

/// What the scrubber should do in response to a gesture event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    /// Event dropped: outside the hit zone, no tracked gesture, or no geometry
    Ignored,
    /// A gesture started inside the hit zone
    Began,
    /// The pointer moved; `offset` is `None` when the location did not change
    Moved { offset: Option<f32> },
    /// The pointer lifted, possibly after moving one last time
    Ended { offset: Option<f32> },
    /// The platform cancelled the gesture
    Cancelled,
}

/// Tracks a single drag gesture from begin to end
#[derive(Debug, Clone)]
pub struct GestureCoordinator {
    hit_zone: HitZone,
    /// Height of the overlay row, for hit testing
    overlay_height: f32,
    nested_in_controller_wrapper: bool,
    tracking: bool,
    previous_location: Option<f32>,
}

impl Default for GestureCoordinator {
    fn default() -> Self {
        Self::new(HitZone::default(), LayoutMetrics::default().marker_height, false)
    }
}

impl GestureCoordinator {
    pub fn new(hit_zone: HitZone, overlay_height: f32, nested_in_controller_wrapper: bool) -> Self {
        Self {
            hit_zone,
            overlay_height,
            nested_in_controller_wrapper,
            tracking: false,
            previous_location: None,
        }
    }

    /// Check if a gesture that began in the hit zone is in progress
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Drop any in-progress gesture without reporting it
    pub fn reset(&mut self) {
        self.tracking = false;
        self.previous_location = None;
    }

    /// Location of the pointer along the marker track
    pub fn track_location(&self, window_y: f32, geometry: &HostGeometry, metrics: &ScrollMetrics) -> f32 {
        window_y
            - (geometry.track_origin_y(self.nested_in_controller_wrapper) + metrics.total_inset())
    }

    /// Content offset for a pointer at `window_y`
    pub fn offset_for(&self, window_y: f32, geometry: &HostGeometry, metrics: &ScrollMetrics) -> f32 {
        let location = self.track_location(window_y, geometry, metrics);
        let fraction = fraction_from_track_location(location, metrics);
        scroll_offset_from_fraction(fraction, metrics)
    }

    /// Interpret one event
    ///
    /// `geometry` is `None` when the host has no window; every event is then
    /// ignored.
    pub fn interpret(
        &mut self,
        event: &GestureEvent,
        geometry: Option<&HostGeometry>,
        metrics: &ScrollMetrics,
    ) -> GestureAction {
        let Some(geometry) = geometry else {
            tracing::trace!(phase = ?event.phase, "gesture ignored: host has no window");
            return GestureAction::Ignored;
        };
        if geometry.containing_height == 0.0 {
            tracing::trace!(phase = ?event.phase, "gesture ignored: containing view has no height");
            return GestureAction::Ignored;
        }

        match event.phase {
            GesturePhase::Begin => {
                // A second recognizer may report its own begin mid-drag
                if self.tracking {
                    tracing::trace!("gesture began while another is tracked");
                    return GestureAction::Ignored;
                }
                if !self.hit_zone.contains(event.position, geometry.overlay_width, self.overlay_height) {
                    tracing::trace!(x = event.position.x, y = event.position.y, "gesture began outside hit zone");
                    return GestureAction::Ignored;
                }
                self.tracking = true;
                self.previous_location = Some(self.track_location(event.window_y, geometry, metrics));
                GestureAction::Began
            }
            GesturePhase::Change | GesturePhase::End => {
                if !self.tracking {
                    return GestureAction::Ignored;
                }
                let location = self.track_location(event.window_y, geometry, metrics);
                let offset = if self.previous_location == Some(location) {
                    tracing::trace!(location, "gesture location unchanged");
                    None
                } else {
                    Some(self.offset_for(event.window_y, geometry, metrics))
                };
                self.previous_location = Some(location);

                if event.phase == GesturePhase::End {
                    self.reset();
                    GestureAction::Ended { offset }
                } else {
                    GestureAction::Moved { offset }
                }
            }
            GesturePhase::Cancel => {
                if !self.tracking {
                    return GestureAction::Ignored;
                }
                self.reset();
                GestureAction::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> ScrollMetrics {
        ScrollMetrics {
            container_height: 500.0,
            content_height: 2000.0,
            content_inset_top: 0.0,
            content_inset_bottom: 0.0,
            content_offset_y: 0.0,
            marker_height: 50.0,
        }
    }

    fn geometry() -> HostGeometry {
        HostGeometry {
            container_origin_y: 100.0,
            wrapper_origin_y: Some(20.0),
            overlay_width: 320.0,
            containing_height: 600.0,
        }
    }

    fn event(phase: GesturePhase, window_y: f32) -> GestureEvent {
        GestureEvent::new(phase, Point::new(300.0, 10.0), window_y)
    }

    #[test]
    fn test_hit_zone() {
        let zone = HitZone::default();
        assert!(zone.contains(Point::new(260.0, 0.0), 320.0, 42.0));
        assert!(zone.contains(Point::new(319.9, 41.0), 320.0, 42.0));
        assert!(!zone.contains(Point::new(259.0, 10.0), 320.0, 42.0));
        assert!(!zone.contains(Point::new(300.0, 42.0), 320.0, 42.0));
        assert!(!zone.contains(Point::new(300.0, -1.0), 320.0, 42.0));
    }

    #[test]
    fn test_begin_outside_zone_is_ignored() {
        let mut gestures = GestureCoordinator::default();
        let outside = GestureEvent::new(GesturePhase::Begin, Point::new(10.0, 10.0), 200.0);
        assert_eq!(
            gestures.interpret(&outside, Some(&geometry()), &metrics()),
            GestureAction::Ignored
        );
        assert!(!gestures.is_tracking());

        // The rest of that gesture is dropped too
        assert_eq!(
            gestures.interpret(&event(GesturePhase::Change, 300.0), Some(&geometry()), &metrics()),
            GestureAction::Ignored
        );
    }

    #[test]
    fn test_overlapping_begin_keeps_tracked_gesture() {
        let mut gestures = GestureCoordinator::default();
        let g = geometry();
        let m = metrics();

        gestures.interpret(&event(GesturePhase::Begin, 150.0), Some(&g), &m);
        let stray = GestureEvent::new(GesturePhase::Begin, Point::new(10.0, 10.0), 150.0);
        assert_eq!(gestures.interpret(&stray, Some(&g), &m), GestureAction::Ignored);
        assert_eq!(
            gestures.interpret(&event(GesturePhase::Begin, 200.0), Some(&g), &m),
            GestureAction::Ignored
        );
        assert!(gestures.is_tracking());

        assert_eq!(
            gestures.interpret(&event(GesturePhase::End, 150.0), Some(&g), &m),
            GestureAction::Ended { offset: None }
        );
        assert!(!gestures.is_tracking());
    }

    #[test]
    fn test_drag_produces_offsets() {
        let mut gestures = GestureCoordinator::default();
        let g = geometry();
        let m = metrics();

        assert_eq!(
            gestures.interpret(&event(GesturePhase::Begin, 100.0), Some(&g), &m),
            GestureAction::Began
        );

        // Halfway down a 450px track maps to halfway through a 1500px range
        match gestures.interpret(&event(GesturePhase::Change, 325.0), Some(&g), &m) {
            GestureAction::Moved { offset: Some(offset) } => assert!((offset - 750.0).abs() < 0.01),
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_repeated_location_is_debounced() {
        let mut gestures = GestureCoordinator::default();
        let g = geometry();
        let m = metrics();

        gestures.interpret(&event(GesturePhase::Begin, 150.0), Some(&g), &m);
        assert_eq!(
            gestures.interpret(&event(GesturePhase::Change, 150.0), Some(&g), &m),
            GestureAction::Moved { offset: None }
        );
        assert!(matches!(
            gestures.interpret(&event(GesturePhase::Change, 160.0), Some(&g), &m),
            GestureAction::Moved { offset: Some(_) }
        ));
        assert_eq!(
            gestures.interpret(&event(GesturePhase::End, 160.0), Some(&g), &m),
            GestureAction::Ended { offset: None }
        );
        assert!(!gestures.is_tracking());
    }

    #[test]
    fn test_no_window_ignores_everything() {
        let mut gestures = GestureCoordinator::default();
        assert_eq!(
            gestures.interpret(&event(GesturePhase::Begin, 150.0), None, &metrics()),
            GestureAction::Ignored
        );

        let flat = HostGeometry {
            containing_height: 0.0,
            ..geometry()
        };
        assert_eq!(
            gestures.interpret(&event(GesturePhase::Begin, 150.0), Some(&flat), &metrics()),
            GestureAction::Ignored
        );
    }

    #[test]
    fn test_wrapper_origin() {
        let m = metrics();
        let g = geometry();

        let plain = GestureCoordinator::new(HitZone::default(), 42.0, false);
        assert_eq!(plain.track_location(150.0, &g, &m), 50.0);

        let nested = GestureCoordinator::new(HitZone::default(), 42.0, true);
        assert_eq!(nested.track_location(150.0, &g, &m), 130.0);

        let unwrapped = HostGeometry {
            wrapper_origin_y: None,
            ..g
        };
        assert_eq!(nested.track_location(150.0, &unwrapped, &m), 50.0);
    }

    #[test]
    fn test_cancel() {
        let mut gestures = GestureCoordinator::default();
        let g = geometry();
        assert_eq!(
            gestures.interpret(&event(GesturePhase::Cancel, 0.0), Some(&g), &metrics()),
            GestureAction::Ignored
        );
        gestures.interpret(&event(GesturePhase::Begin, 150.0), Some(&g), &metrics());
        assert_eq!(
            gestures.interpret(&event(GesturePhase::Cancel, 0.0), Some(&g), &metrics()),
            GestureAction::Cancelled
        );
    }
}
