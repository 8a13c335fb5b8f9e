//! Section scrubber component
//!
//! Ties the mapper, visibility machine, auto-hide timer, gesture coordinator
//! and title resolver together behind the host-facing API.
//!
//! # Example
//!
//! ```rust
//! use scrubber_core::{ManualClock, ScrollMetrics, ScrubberConfig, ScrubberState, SectionScrubber};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let mut scrubber = SectionScrubber::with_clock(ScrubberConfig::default(), clock.clone()).unwrap();
//!
//! scrubber.on_scroll(ScrollMetrics {
//!     container_height: 500.0,
//!     content_height: 2000.0,
//!     content_offset_y: 750.0,
//!     marker_height: 50.0,
//!     ..Default::default()
//! });
//! assert_eq!(scrubber.state(), ScrubberState::Scrolling);
//! assert_eq!(scrubber.marker_y(), 975.0);
//!
//! clock.advance(Duration::from_secs(2));
//! scrubber.tick();
//! assert_eq!(scrubber.state(), ScrubberState::Hidden);
//! ```

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::config::ScrubberConfig;
use crate::error::Result;
use crate::fsm::{StateMachine, Transition};
use crate::geometry::{target_geometry, AnimationSpec, LayoutMetrics, TargetGeometry};
use crate::gesture::{GestureAction, GestureCoordinator, GestureEvent, HitZone};
use crate::host::{ScrubberDelegate, ScrubberHost};
use crate::mapper::{MarkerPosition, ScrollMetrics};
use crate::state::{self, ScrubberState, VisibilityInput, VisualProfile};
use crate::timer::{AutoHideTimer, Clock, SystemClock};
use crate::title::{ScrubberDataSource, SectionTitleResolver};

/// Something a renderer should react to
#[derive(Debug, Clone, PartialEq)]
pub enum ScrubberEvent {
    /// A state became active
    ///
    /// `animation` is `None` for the initial layout after `attach`.
    StateChanged {
        from: ScrubberState,
        to: ScrubberState,
        profile: VisualProfile,
        geometry: TargetGeometry,
        animation: Option<AnimationSpec>,
    },
    /// The section label changed
    TitleChanged { title: String },
    /// The marker moved along the track
    MarkerMoved { fraction: f32, y: f32 },
}

/// Snapshot of everything needed to draw the scrubber
#[derive(Debug, Clone, PartialEq)]
pub struct ScrubberRenderInfo {
    pub state: ScrubberState,
    /// Expanded rather than collapsed to the hidden hit target
    pub visible: bool,
    pub profile: VisualProfile,
    pub geometry: TargetGeometry,
    /// Marker position along the track (0.0 to 1.0)
    pub marker_fraction: f32,
    /// Top edge of the marker in content coordinates
    pub marker_y: f32,
    pub title: Option<String>,
}

/// Scroll position indicator with a draggable marker and section label
pub struct SectionScrubber {
    config: ScrubberConfig,
    layout: LayoutMetrics,
    fsm: StateMachine<ScrubberState, VisibilityInput>,
    hide_timer: AutoHideTimer,
    gestures: GestureCoordinator,
    titles: SectionTitleResolver,
    marker: MarkerPosition,
    metrics: ScrollMetrics,
    clock: Box<dyn Clock>,
    host: Option<Weak<Mutex<dyn ScrubberHost>>>,
    delegate: Option<Weak<Mutex<dyn ScrubberDelegate>>>,
    data_source: Option<Weak<Mutex<dyn ScrubberDataSource>>>,
    events: SmallVec<[ScrubberEvent; 4]>,
}

impl std::fmt::Debug for SectionScrubber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionScrubber")
            .field("state", &self.state())
            .field("marker", &self.marker)
            .field("title", &self.titles.title())
            .field("hide_deadline", &self.hide_timer.deadline())
            .finish_non_exhaustive()
    }
}

impl SectionScrubber {
    /// Create a scrubber driven by wall-clock time
    pub fn new(config: ScrubberConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock::new())
    }

    /// Create a scrubber with a custom time source
    pub fn with_clock(config: ScrubberConfig, clock: impl Clock + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            layout: config.layout.metrics(),
            fsm: state::visibility_machine(),
            hide_timer: AutoHideTimer::new(config.auto_hide_duration()),
            gestures: GestureCoordinator::new(
                HitZone::new(config.hit_zone_width),
                config.layout.metrics().marker_height,
                config.nested_in_controller_wrapper,
            ),
            titles: SectionTitleResolver::new(config.uppercase_titles),
            marker: MarkerPosition::default(),
            metrics: ScrollMetrics::default(),
            clock: Box::new(clock),
            host: None,
            delegate: None,
            data_source: None,
            events: SmallVec::new(),
            config,
        })
    }

    // =========================================================================
    // Collaborators
    // =========================================================================

    /// Set the scroll container this scrubber overlays
    pub fn set_host<H: ScrubberHost + 'static>(&mut self, host: &Arc<Mutex<H>>) {
        let weak: Weak<Mutex<H>> = Arc::downgrade(host);
        self.host = Some(weak);
    }

    /// Set the receiver of scrubbing start/stop notifications
    pub fn set_delegate<D: ScrubberDelegate + 'static>(&mut self, delegate: &Arc<Mutex<D>>) {
        let weak: Weak<Mutex<D>> = Arc::downgrade(delegate);
        self.delegate = Some(weak);
    }

    /// Set the source of section titles
    pub fn set_data_source<S: ScrubberDataSource + 'static>(&mut self, source: &Arc<Mutex<S>>) {
        let weak: Weak<Mutex<S>> = Arc::downgrade(source);
        self.data_source = Some(weak);
    }

    /// Called once the overlay is installed in the host's view hierarchy
    ///
    /// Lays out the current state without animation.
    pub fn attach(&mut self) {
        let current = self.state();
        self.events.push(ScrubberEvent::StateChanged {
            from: current,
            to: current,
            profile: current.profile(),
            geometry: self.geometry(),
            animation: None,
        });
    }

    /// Called when the overlay is removed from its host
    ///
    /// Ends an in-progress scrub, cancels the pending hide and forgets
    /// every collaborator, so nothing the scrubber schedules can reach them
    /// afterwards.
    pub fn detach(&mut self) {
        if self.gestures.is_tracking() || self.state() == ScrubberState::Scrubbing {
            self.stop_scrubbing();
        }
        if self.hide_timer.cancel() {
            tracing::debug!("auto-hide cancelled on detach");
        }
        self.gestures.reset();
        self.host = None;
        self.delegate = None;
        self.data_source = None;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &ScrubberConfig {
        &self.config
    }

    /// Layout sizes in effect
    pub fn layout(&self) -> &LayoutMetrics {
        &self.layout
    }

    /// Marker height hosts should report in `ScrollMetrics`
    pub fn marker_height(&self) -> f32 {
        self.layout.marker_height
    }

    pub fn state(&self) -> ScrubberState {
        self.fsm.current_state()
    }

    pub fn marker(&self) -> MarkerPosition {
        self.marker
    }

    /// Metrics from the last scroll notification
    pub fn metrics(&self) -> &ScrollMetrics {
        &self.metrics
    }

    /// Top edge of the marker in content coordinates
    pub fn marker_y(&self) -> f32 {
        self.marker.pixel_offset(&self.metrics)
    }

    pub fn title(&self) -> Option<&str> {
        self.titles.title()
    }

    /// Check if an auto-hide is scheduled
    pub fn is_hide_pending(&self) -> bool {
        self.hide_timer.is_armed()
    }

    /// When the scheduled auto-hide fires, on the scrubber's clock
    pub fn hide_deadline(&self) -> Option<Duration> {
        self.hide_timer.deadline()
    }

    /// Number of scheduled auto-hides (zero or one)
    pub fn pending_timers(&self) -> usize {
        self.hide_timer.pending()
    }

    /// Recent state transitions, oldest first
    pub fn transition_history(&self) -> &[Transition<ScrubberState, VisibilityInput>] {
        self.fsm.history()
    }

    /// Target geometry for the current state
    pub fn geometry(&self) -> TargetGeometry {
        target_geometry(self.state().profile(), &self.layout)
    }

    /// Everything a renderer needs for the current frame
    pub fn render_info(&self) -> ScrubberRenderInfo {
        let state = self.state();
        ScrubberRenderInfo {
            state,
            visible: state.is_visible(),
            profile: state.profile(),
            geometry: self.geometry(),
            marker_fraction: self.marker.fraction(),
            marker_y: self.marker_y(),
            title: self.titles.title().map(str::to_owned),
        }
    }

    /// Drain queued events, oldest first
    pub fn take_events(&mut self) -> Vec<ScrubberEvent> {
        self.events.drain(..).collect()
    }

    // =========================================================================
    // Scroll
    // =========================================================================

    /// Called by the host whenever its content scrolls
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        if metrics.content_height == 0.0 {
            tracing::trace!("scroll ignored: no content");
            return;
        }
        self.metrics = metrics;

        // The transition below refreshes the title, so the marker must match
        // the new metrics first.
        let marker = MarkerPosition::from_metrics(&self.metrics);
        let moved = marker != self.marker;
        self.marker = marker;

        if self.state() == ScrubberState::Hidden {
            self.send(VisibilityInput::ScrollActivity);
        }
        if self.state() != ScrubberState::Scrubbing {
            self.arm_hide_timer();
        }

        if moved {
            self.events.push(ScrubberEvent::MarkerMoved {
                fraction: marker.fraction(),
                y: self.marker_y(),
            });
        }

        self.refresh_title();
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Called by the host for every drag/press event over the overlay
    pub fn on_gesture(&mut self, event: GestureEvent) {
        let geometry = match self.host.as_ref().and_then(Weak::upgrade) {
            Some(host) => {
                let geometry = host.lock().geometry();
                geometry
            }
            None => None,
        };

        match self.gestures.interpret(&event, geometry.as_ref(), &self.metrics) {
            GestureAction::Ignored => {}
            GestureAction::Began => self.begin_scrubbing(),
            GestureAction::Moved { offset } => {
                if let Some(offset) = offset {
                    self.push_offset(offset);
                }
                self.arm_hide_timer();
            }
            GestureAction::Ended { offset } => {
                if let Some(offset) = offset {
                    self.push_offset(offset);
                }
                self.arm_hide_timer();
                self.stop_scrubbing();
            }
            GestureAction::Cancelled => self.stop_scrubbing(),
        }
    }

    /// Enter `Scrubbing` and notify the delegate
    ///
    /// From `Hidden` the scrubber passes through `Scrolling` first.
    pub fn begin_scrubbing(&mut self) {
        self.hide_timer.cancel();

        for transition in state::begin_scrubbing(&mut self.fsm) {
            self.on_transition(transition);
        }

        if let Some(delegate) = self.delegate.as_ref().and_then(Weak::upgrade) {
            delegate.lock().did_start_scrubbing();
        }
    }

    /// Notify the delegate and leave `Scrubbing` if it was active
    pub fn stop_scrubbing(&mut self) {
        if let Some(delegate) = self.delegate.as_ref().and_then(Weak::upgrade) {
            delegate.lock().did_stop_scrubbing();
        }

        if self.state() == ScrubberState::Scrubbing {
            self.send(VisibilityInput::GestureEnded);
            self.arm_hide_timer();
        }
    }

    fn push_offset(&mut self, offset: f32) {
        if self.state() != ScrubberState::Scrubbing {
            return;
        }
        if let Some(host) = self.host.as_ref().and_then(Weak::upgrade) {
            tracing::debug!(offset, "scrub to offset");
            host.lock().set_content_offset(offset);
        }
    }

    // =========================================================================
    // Auto-hide
    // =========================================================================

    /// Fire the auto-hide if its deadline has passed
    ///
    /// Call from the host's frame or run loop.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        if self.hide_timer.poll(now) {
            self.on_auto_hide_timer_fire();
        }
    }

    /// Hide the scrubber unless the user is scrubbing
    pub fn on_auto_hide_timer_fire(&mut self) {
        if self.state() == ScrubberState::Scrubbing {
            tracing::trace!("auto-hide ignored while scrubbing");
            return;
        }
        self.send(VisibilityInput::HideTimer);
    }

    fn arm_hide_timer(&mut self) {
        let now = self.clock.now();
        self.hide_timer.arm(now);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn send(&mut self, input: VisibilityInput) {
        if let Some(transition) = self.fsm.send(input) {
            self.on_transition(transition);
        }
    }

    fn on_transition(&mut self, transition: Transition<ScrubberState, VisibilityInput>) {
        tracing::debug!(
            from = ?transition.from_state,
            to = ?transition.to_state,
            input = ?transition.event,
            "scrubber state changed"
        );
        let profile = transition.to_state.profile();
        self.events.push(ScrubberEvent::StateChanged {
            from: transition.from_state,
            to: transition.to_state,
            profile,
            geometry: target_geometry(profile, &self.layout),
            animation: Some(self.config.animation),
        });
        self.refresh_title();
    }

    fn refresh_title(&mut self) {
        let Some(source) = self.data_source.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        let center_y = self.marker.center_y(&self.metrics);
        let changed = {
            let source = source.lock();
            self.titles
                .refresh(&*source, center_y, self.metrics.content_inset_top)
        };
        if changed {
            if let Some(title) = self.titles.title() {
                self.events.push(ScrubberEvent::TitleChanged {
                    title: title.to_owned(),
                });
            }
        }
    }
}
