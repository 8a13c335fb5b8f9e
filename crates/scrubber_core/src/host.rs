//! Collaborators the scrubber talks to
//!
//! The scrubber keeps only weak handles to these; their lifetime belongs to
//! whoever created them. A collaborator that has been dropped is treated as
//! absent.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::gesture::HostGeometry;
use crate::title::ScrubberDataSource;

/// The scroll container the scrubber overlays
pub trait ScrubberHost {
    /// Current window geometry, or `None` if the container is not in a window
    fn geometry(&self) -> Option<HostGeometry>;

    /// Move the content to `offset_y`
    ///
    /// The host is expected to report the resulting scroll back through
    /// `SectionScrubber::on_scroll`.
    fn set_content_offset(&mut self, offset_y: f32);
}

/// Receives scrubbing start/stop notifications
pub trait ScrubberDelegate {
    fn did_start_scrubbing(&mut self);
    fn did_stop_scrubbing(&mut self);
}

/// Shared handle to a host
pub type SharedHost = Arc<Mutex<dyn ScrubberHost>>;

/// Shared handle to a delegate
pub type SharedDelegate = Arc<Mutex<dyn ScrubberDelegate>>;

/// Shared handle to a data source
pub type SharedDataSource = Arc<Mutex<dyn ScrubberDataSource>>;
