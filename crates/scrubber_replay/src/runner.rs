//! Scenario runner
//!
//! Drives a [`SectionScrubber`] against a [`SimulatedList`] on a manual clock,
//! one step at a time. Every step leaves a transcript entry with the events
//! the scrubber queued and the offsets it pushed to the list. The run stops at
//! the first failed assertion.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use scrubber_core::{
    Clock, GestureEvent, GesturePhase, ManualClock, Point, ScrubberDelegate, ScrubberEvent,
    ScrubberState, SectionScrubber,
};

use crate::error::Result;
use crate::list::SimulatedList;
use crate::scenario::{Scenario, ScenarioStep};

/// Distance from the trailing edge for gestures without an explicit `x`
const DEFAULT_GESTURE_INSET: f32 = 1.0;

/// Records delegate notifications
#[derive(Debug, Default)]
struct DelegateLog {
    notes: Vec<&'static str>,
}

impl ScrubberDelegate for DelegateLog {
    fn did_start_scrubbing(&mut self) {
        self.notes.push("delegate: started scrubbing");
    }

    fn did_stop_scrubbing(&mut self) {
        self.notes.push("delegate: stopped scrubbing");
    }
}

/// What happened during one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    /// Zero-based step index
    pub step: usize,
    /// Simulated time after the step
    pub time_ms: u64,
    pub action: String,
    pub state: ScrubberState,
    pub title: Option<String>,
    /// List content offset after the step
    pub offset: f32,
    pub marker_fraction: f32,
    /// Scrubber events, host commands and delegate notifications
    pub events: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:>3}] t={}ms {:<32} state={:?} offset={:.1} marker={:.3}",
            self.step, self.time_ms, self.action, self.state, self.offset, self.marker_fraction
        )?;
        if let Some(title) = &self.title {
            write!(f, " title={title:?}")?;
        }
        for event in &self.events {
            write!(f, "\n        {event}")?;
        }
        if let Some(failure) = &self.failure {
            write!(f, "\n        FAILED: {failure}")?;
        }
        Ok(())
    }
}

/// The first assertion that did not hold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertionFailure {
    pub step: usize,
    pub message: String,
}

/// Outcome of a scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub name: String,
    pub transcript: Vec<TranscriptEntry>,
    pub failure: Option<AssertionFailure>,
}

impl ReplayReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// Number of assertion steps that ran and held
    pub fn assertions_passed(&self, scenario: &Scenario) -> usize {
        self.transcript
            .iter()
            .filter(|entry| entry.failure.is_none())
            .filter(|entry| {
                scenario
                    .steps
                    .get(entry.step)
                    .is_some_and(ScenarioStep::is_assertion)
            })
            .count()
    }
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "scenario: {}", self.name)?;
        for entry in &self.transcript {
            writeln!(f, "{entry}")?;
        }
        match &self.failure {
            Some(failure) => write!(f, "FAILED at step {}: {}", failure.step, failure.message),
            None => write!(f, "PASSED ({} steps)", self.transcript.len()),
        }
    }
}

/// Runs scenario steps against a live scrubber
pub struct ScenarioRunner {
    scrubber: SectionScrubber,
    clock: ManualClock,
    list: Arc<Mutex<SimulatedList>>,
    delegate: Arc<Mutex<DelegateLog>>,
    /// Offsets the scrubber pushed to the list since the last entry
    host_commands: Vec<f32>,
}

impl ScenarioRunner {
    /// Build the list and scrubber a scenario describes
    pub fn new(scenario: &Scenario) -> Result<Self> {
        let list = Arc::new(Mutex::new(SimulatedList::new(scenario.list.clone())?));
        let delegate = Arc::new(Mutex::new(DelegateLog::default()));
        let clock = ManualClock::new();

        let mut scrubber = SectionScrubber::with_clock(scenario.config.clone(), clock.clone())?;
        scrubber.set_host(&list);
        scrubber.set_data_source(&list);
        scrubber.set_delegate(&delegate);
        scrubber.attach();

        Ok(Self {
            scrubber,
            clock,
            list,
            delegate,
            host_commands: Vec::new(),
        })
    }

    /// Build a runner and run `scenario` on it
    pub fn run_scenario(scenario: &Scenario) -> Result<ReplayReport> {
        let mut runner = Self::new(scenario)?;
        Ok(runner.run(scenario))
    }

    pub fn scrubber(&self) -> &SectionScrubber {
        &self.scrubber
    }

    /// Current list offset
    pub fn offset(&self) -> f32 {
        self.list.lock().offset()
    }

    /// Simulated time since the runner was created
    pub fn elapsed(&self) -> Duration {
        self.clock.now()
    }

    /// Run every step, stopping at the first failed assertion
    pub fn run(&mut self, scenario: &Scenario) -> ReplayReport {
        tracing::info!(
            scenario = scenario.display_name(),
            steps = scenario.steps.len(),
            "replay started"
        );

        let mut transcript = Vec::with_capacity(scenario.steps.len());
        let mut failure = None;

        for (index, step) in scenario.steps.iter().enumerate() {
            let outcome = self.step(step);
            let entry = self.record(index, step, outcome.err());
            let failed = entry.failure.clone();
            transcript.push(entry);

            if let Some(message) = failed {
                tracing::warn!(step = index, %message, "assertion failed");
                failure = Some(AssertionFailure {
                    step: index,
                    message,
                });
                break;
            }
        }

        tracing::info!(passed = failure.is_none(), "replay finished");
        ReplayReport {
            name: scenario.display_name().to_string(),
            transcript,
            failure,
        }
    }

    /// Apply one step; `Err` carries an assertion failure message
    pub fn step(&mut self, step: &ScenarioStep) -> std::result::Result<(), String> {
        tracing::debug!(step = %step.describe(), "replay step");
        match *step {
            ScenarioStep::ScrollTo { offset } => {
                self.list.lock().scroll_to(offset);
                self.report_scroll();
            }
            ScenarioStep::Advance { ms } => {
                self.clock.advance(Duration::from_millis(ms));
                self.scrubber.tick();
            }
            ScenarioStep::Gesture { phase, y, x } => self.gesture(phase, x, y),
            ScenarioStep::Drag { from, to, moves } => {
                self.gesture(GesturePhase::Begin, None, from);
                for i in 1..=moves {
                    let y = from + (to - from) * i as f32 / moves as f32;
                    self.gesture(GesturePhase::Change, None, y);
                }
                self.gesture(GesturePhase::End, None, to);
            }
            ScenarioStep::AssertState { state } => {
                let actual = self.scrubber.state();
                if actual != state {
                    return Err(format!("expected state {state:?}, found {actual:?}"));
                }
            }
            ScenarioStep::AssertTitle { ref title } => {
                let actual = self.scrubber.title();
                if actual != Some(title.as_str()) {
                    return Err(format!("expected title {title:?}, found {actual:?}"));
                }
            }
            ScenarioStep::AssertOffset { offset, tolerance } => {
                let actual = self.offset();
                if (actual - offset).abs() > tolerance {
                    return Err(format!("expected offset {offset} (±{tolerance}), found {actual}"));
                }
            }
            ScenarioStep::AssertMarker { fraction, tolerance } => {
                let actual = self.scrubber.marker().fraction();
                if (actual - fraction).abs() > tolerance {
                    return Err(format!(
                        "expected marker fraction {fraction} (±{tolerance}), found {actual}"
                    ));
                }
            }
        }
        Ok(())
    }

    fn gesture(&mut self, phase: GesturePhase, x: Option<f32>, window_y: f32) {
        let width = self.list.lock().spec().width;
        let x = x.unwrap_or(width - DEFAULT_GESTURE_INSET);
        let local_y = self.scrubber.marker_height() / 2.0;
        self.scrubber
            .on_gesture(GestureEvent::new(phase, Point::new(x, local_y), window_y));

        // A real scroll view reports programmatic scrolls back to the overlay
        let pushed = self.list.lock().take_pending();
        if !pushed.is_empty() {
            self.host_commands.extend(pushed);
            self.report_scroll();
        }
    }

    fn report_scroll(&mut self) {
        let metrics = self.list.lock().metrics(self.scrubber.marker_height());
        self.scrubber.on_scroll(metrics);
    }

    fn record(&mut self, index: usize, step: &ScenarioStep, failure: Option<String>) -> TranscriptEntry {
        let mut events: Vec<String> = self
            .scrubber
            .take_events()
            .iter()
            .map(describe_event)
            .collect();
        events.extend(
            self.host_commands
                .drain(..)
                .map(|offset| format!("host: set content offset {offset:.1}")),
        );
        events.extend(self.delegate.lock().notes.drain(..).map(str::to_owned));

        TranscriptEntry {
            step: index,
            time_ms: self.elapsed().as_millis() as u64,
            action: step.describe(),
            state: self.scrubber.state(),
            title: self.scrubber.title().map(str::to_owned),
            offset: self.offset(),
            marker_fraction: self.scrubber.marker().fraction(),
            events,
            failure,
        }
    }
}

/// One-line description of a scrubber event
pub fn describe_event(event: &ScrubberEvent) -> String {
    match event {
        ScrubberEvent::StateChanged {
            from, to, animation, ..
        } => {
            let how = if animation.is_some() { "animated" } else { "immediate" };
            format!("state: {from:?} -> {to:?} ({how})")
        }
        ScrubberEvent::TitleChanged { title } => format!("title: {title:?}"),
        ScrubberEvent::MarkerMoved { fraction, y } => {
            format!("marker: fraction={fraction:.3} y={y:.1}")
        }
    }
}
