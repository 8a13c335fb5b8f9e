//! Section title lookup
//!
//! Resolution order for a query point:
//! 1. the item under the point
//! 2. a visible section header whose frame contains the point
//! 3. `(0, 0)` when the point is still inside the top inset
//!
//! When nothing matches the previous title is kept, so the label never blinks
//! empty while the marker crosses a gap between rows.

use serde::{Deserialize, Serialize};

use crate::gesture::Point;

/// Location of an item within the host's sectioned data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

/// Axis-aligned rectangle in content coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if `point` lies inside (right and bottom edges excluded)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Host data the scrubber reads section titles from
pub trait ScrubberDataSource {
    /// Index path of the item whose frame contains `point`
    fn index_path_for_item_at(&self, point: Point) -> Option<IndexPath>;

    /// Section headers currently on screen, with their frames
    fn visible_section_headers(&self) -> Vec<(IndexPath, Rect)>;

    /// Display text for the section containing `index_path`
    fn section_title(&self, index_path: IndexPath) -> Option<String>;
}

/// Find the index path to label for a point in content coordinates
pub fn resolve_index_path(
    source: &dyn ScrubberDataSource,
    point: Point,
    inset_top: f32,
) -> Option<IndexPath> {
    if let Some(index_path) = source.index_path_for_item_at(point) {
        return Some(index_path);
    }
    if let Some((index_path, _)) = source
        .visible_section_headers()
        .into_iter()
        .find(|(_, frame)| frame.contains(point))
    {
        return Some(index_path);
    }
    // Headers below the visible window are unknown here, so the only safe
    // guess is the very first section while the marker sits in the top inset.
    (point.y < inset_top).then_some(IndexPath::new(0, 0))
}

/// Holds the current label and refreshes it from a data source
#[derive(Debug, Clone, Default)]
pub struct SectionTitleResolver {
    uppercase: bool,
    title: Option<String>,
}

impl SectionTitleResolver {
    pub fn new(uppercase: bool) -> Self {
        Self {
            uppercase,
            title: None,
        }
    }

    /// Current label, if one has ever been resolved
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Re-resolve the label for a marker centred at `center_y`
    ///
    /// Returns true if the label changed.
    pub fn refresh(&mut self, source: &dyn ScrubberDataSource, center_y: f32, inset_top: f32) -> bool {
        // Probe the leading edge of the content; the scrubber overlays the
        // trailing edge, where there may be no item.
        let point = Point::new(0.0, center_y);

        let Some(index_path) = resolve_index_path(source, point, inset_top) else {
            tracing::trace!(center_y, "no section at marker; keeping title");
            return false;
        };
        let Some(raw) = source.section_title(index_path) else {
            return false;
        };

        let title = if self.uppercase { raw.to_uppercase() } else { raw };
        if self.title.as_deref() == Some(title.as_str()) {
            return false;
        }
        tracing::debug!(section = index_path.section, %title, "section title changed");
        self.title = Some(title);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two sections: header at 0..40, items 40..240, header 240..280, items 280..480
    struct Fixture {
        headers_visible: bool,
    }

    impl ScrubberDataSource for Fixture {
        fn index_path_for_item_at(&self, point: Point) -> Option<IndexPath> {
            match point.y {
                y if (40.0..240.0).contains(&y) => Some(IndexPath::new(0, ((y - 40.0) / 50.0) as usize)),
                y if (280.0..480.0).contains(&y) => Some(IndexPath::new(1, ((y - 280.0) / 50.0) as usize)),
                _ => None,
            }
        }

        fn visible_section_headers(&self) -> Vec<(IndexPath, Rect)> {
            if !self.headers_visible {
                return Vec::new();
            }
            vec![
                (IndexPath::new(0, 0), Rect::new(0.0, 0.0, 320.0, 40.0)),
                (IndexPath::new(1, 0), Rect::new(0.0, 240.0, 320.0, 40.0)),
            ]
        }

        fn section_title(&self, index_path: IndexPath) -> Option<String> {
            ["Apples", "Bananas"].get(index_path.section).map(|s| s.to_string())
        }
    }

    #[test]
    fn test_item_hit_wins() {
        let source = Fixture { headers_visible: true };
        assert_eq!(
            resolve_index_path(&source, Point::new(0.0, 300.0), 0.0),
            Some(IndexPath::new(1, 0))
        );
    }

    #[test]
    fn test_header_fallback() {
        let source = Fixture { headers_visible: true };
        assert_eq!(
            resolve_index_path(&source, Point::new(0.0, 250.0), 0.0),
            Some(IndexPath::new(1, 0))
        );
    }

    #[test]
    fn test_top_inset_fallback() {
        let source = Fixture { headers_visible: false };
        assert_eq!(
            resolve_index_path(&source, Point::new(0.0, 10.0), 64.0),
            Some(IndexPath::new(0, 0))
        );
        assert_eq!(resolve_index_path(&source, Point::new(0.0, 250.0), 64.0), None);
    }

    #[test]
    fn test_no_match_keeps_title() {
        let source = Fixture { headers_visible: false };
        let mut resolver = SectionTitleResolver::new(true);

        assert!(resolver.refresh(&source, 100.0, 0.0));
        assert_eq!(resolver.title(), Some("APPLES"));

        // Gap between sections with headers scrolled away
        assert!(!resolver.refresh(&source, 250.0, 0.0));
        assert_eq!(resolver.title(), Some("APPLES"));

        assert!(resolver.refresh(&source, 300.0, 0.0));
        assert_eq!(resolver.title(), Some("BANANAS"));
    }

    #[test]
    fn test_case_preserved_when_configured() {
        let source = Fixture { headers_visible: true };
        let mut resolver = SectionTitleResolver::new(false);
        resolver.refresh(&source, 100.0, 0.0);
        assert_eq!(resolver.title(), Some("Apples"));

        // Same title again is not a change
        assert!(!resolver.refresh(&source, 150.0, 0.0));
    }
}
