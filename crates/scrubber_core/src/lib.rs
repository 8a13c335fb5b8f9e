//! Section Scrubber Core
//!
//! Platform-independent logic for a scroll position indicator that shows the
//! current section title and can be dragged to seek:
//!
//! - **Coordinate mapping**: scroll offset ⇄ marker position, through a
//!   clamped fraction
//! - **Visibility state machine**: Hidden / Scrolling / Scrubbing with a
//!   debounced auto-hide
//! - **Gesture handling**: trailing-edge hit zone, drag-to-seek, debounced
//!   locations
//! - **Section titles**: item, header, then top-inset fallback lookup
//!
//! Rendering is left to the host: the scrubber exposes target geometry per
//! state and a queue of [`ScrubberEvent`]s.

pub mod config;
pub mod error;
pub mod fsm;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod mapper;
pub mod scrubber;
pub mod state;
pub mod timer;
pub mod title;

pub use config::{LayoutConfig, ScrubberConfig};
pub use error::{Result, ScrubberError};
pub use fsm::{StateMachine, Transition};
pub use geometry::{target_geometry, AnimationSpec, LayoutMetrics, LayoutPreset, TargetGeometry};
pub use gesture::{GestureEvent, GesturePhase, HitZone, HostGeometry, Point};
pub use host::{SharedDataSource, SharedDelegate, SharedHost, ScrubberDelegate, ScrubberHost};
pub use mapper::{
    marker_pixel_from_fraction, offset_fraction_from_scroll, scroll_offset_from_fraction,
    MarkerPosition, ScrollMetrics,
};
pub use scrubber::{ScrubberEvent, ScrubberRenderInfo, SectionScrubber};
pub use state::{MarginClass, ScrubberState, VisualProfile, WidthClass};
pub use timer::{AutoHideTimer, Clock, ManualClock, SystemClock, TimerId, TimerQueue};
pub use title::{IndexPath, Rect, ScrubberDataSource, SectionTitleResolver};
