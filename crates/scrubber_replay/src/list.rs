//! Simulated sectioned list
//!
//! Stands in for a real scroll container: every section is a header followed
//! by fixed-height rows. Offsets the scrubber pushes are applied immediately
//! and queued so the runner can report the scroll back.

use serde::{Deserialize, Serialize};

use scrubber_core::{
    HostGeometry, IndexPath, Point, Rect, ScrollMetrics, ScrubberDataSource, ScrubberHost,
};

use crate::error::{ReplayError, Result};

/// One section of the list
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SectionSpec {
    pub title: String,
    pub rows: usize,
}

/// Shape of the simulated list
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ListSpec {
    pub sections: Vec<SectionSpec>,
    #[serde(default = "default_header_height")]
    pub header_height: f32,
    #[serde(default = "default_row_height")]
    pub row_height: f32,
    #[serde(default = "default_container_height")]
    pub container_height: f32,
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default)]
    pub inset_top: f32,
    #[serde(default)]
    pub inset_bottom: f32,
    /// Window-space y of the container
    #[serde(default)]
    pub origin_y: f32,
    /// Window-space y of an enclosing controller wrapper
    #[serde(default)]
    pub wrapper_origin_y: Option<f32>,
}

fn default_header_height() -> f32 {
    30.0
}

fn default_row_height() -> f32 {
    60.0
}

fn default_container_height() -> f32 {
    600.0
}

fn default_width() -> f32 {
    320.0
}

impl ListSpec {
    /// Evenly sized sections named after their index
    pub fn uniform(sections: usize, rows: usize) -> Self {
        Self {
            sections: (0..sections)
                .map(|i| SectionSpec {
                    title: format!("Section {i}"),
                    rows,
                })
                .collect(),
            header_height: default_header_height(),
            row_height: default_row_height(),
            container_height: default_container_height(),
            width: default_width(),
            inset_top: 0.0,
            inset_bottom: 0.0,
            origin_y: 0.0,
            wrapper_origin_y: None,
        }
    }

    fn section_height(&self, section: &SectionSpec) -> f32 {
        self.header_height + section.rows as f32 * self.row_height
    }
}

/// In-memory list acting as both scrubber host and data source
#[derive(Debug, Clone)]
pub struct SimulatedList {
    spec: ListSpec,
    /// Top of each section in content coordinates
    section_tops: Vec<f32>,
    content_height: f32,
    offset_y: f32,
    /// Offsets pushed by the scrubber and not yet reported back
    pending: Vec<f32>,
}

impl SimulatedList {
    pub fn new(spec: ListSpec) -> Result<Self> {
        if spec.sections.is_empty() {
            return Err(ReplayError::EmptyList);
        }

        let mut section_tops = Vec::with_capacity(spec.sections.len());
        let mut top = 0.0;
        for section in &spec.sections {
            section_tops.push(top);
            top += spec.section_height(section);
        }

        Ok(Self {
            spec,
            section_tops,
            content_height: top,
            offset_y: 0.0,
            pending: Vec::new(),
        })
    }

    pub fn spec(&self) -> &ListSpec {
        &self.spec
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    pub fn offset(&self) -> f32 {
        self.offset_y
    }

    /// Scroll as if the user had flicked the content
    pub fn scroll_to(&mut self, offset_y: f32) {
        self.offset_y = offset_y;
    }

    /// Scroll geometry as the host would report it
    pub fn metrics(&self, marker_height: f32) -> ScrollMetrics {
        ScrollMetrics {
            container_height: self.spec.container_height,
            content_height: self.content_height,
            content_inset_top: self.spec.inset_top,
            content_inset_bottom: self.spec.inset_bottom,
            content_offset_y: self.offset_y,
            marker_height,
        }
    }

    /// Drain offsets the scrubber has pushed since the last call
    pub fn take_pending(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.pending)
    }

    fn header_frame(&self, section: usize) -> Rect {
        Rect::new(
            0.0,
            self.section_tops[section],
            self.spec.width,
            self.spec.header_height,
        )
    }
}

impl ScrubberHost for SimulatedList {
    fn geometry(&self) -> Option<HostGeometry> {
        Some(HostGeometry {
            container_origin_y: self.spec.origin_y,
            wrapper_origin_y: self.spec.wrapper_origin_y,
            overlay_width: self.spec.width,
            containing_height: self.spec.container_height,
        })
    }

    fn set_content_offset(&mut self, offset_y: f32) {
        tracing::trace!(offset_y, "list scrolled by scrubber");
        self.offset_y = offset_y;
        self.pending.push(offset_y);
    }
}

impl ScrubberDataSource for SimulatedList {
    fn index_path_for_item_at(&self, point: Point) -> Option<IndexPath> {
        if point.x < 0.0 || point.x >= self.spec.width || self.spec.row_height <= 0.0 {
            return None;
        }
        self.spec
            .sections
            .iter()
            .zip(&self.section_tops)
            .enumerate()
            .find_map(|(index, (section, &top))| {
                let rows_top = top + self.spec.header_height;
                let local = point.y - rows_top;
                let row = (local / self.spec.row_height).floor();
                (local >= 0.0 && row < section.rows as f32)
                    .then(|| IndexPath::new(index, row as usize))
            })
    }

    /// Headers that intersect the visible window
    fn visible_section_headers(&self) -> Vec<(IndexPath, Rect)> {
        let top = self.offset_y;
        let bottom = self.offset_y + self.spec.container_height;
        (0..self.spec.sections.len())
            .map(|section| (IndexPath::new(section, 0), self.header_frame(section)))
            .filter(|(_, frame)| frame.y + frame.height > top && frame.y < bottom)
            .collect()
    }

    fn section_title(&self, index_path: IndexPath) -> Option<String> {
        self.spec
            .sections
            .get(index_path.section)
            .map(|section| section.title.clone())
    }
}
