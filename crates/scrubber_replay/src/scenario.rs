//! Scenario definition for headless scrubber replay
//!
//! A scenario is a list shape, an optional scrubber config and a sequence of
//! steps. Either JSON or TOML works:
//!
//! ```toml
//! [list]
//! sections = [{ title = "Alpha", rows = 10 }, { title = "Bravo", rows = 10 }]
//!
//! [[steps]]
//! type = "scroll_to"
//! offset = 300.0
//!
//! [[steps]]
//! type = "assert_state"
//! state = "scrolling"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use scrubber_core::{GesturePhase, ScrubberConfig, ScrubberState};

use crate::error::{ReplayError, Result};
use crate::list::ListSpec;

/// A full replay scenario
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub config: ScrubberConfig,
    pub list: ListSpec,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Load a scenario from JSON text
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from TOML text
    pub fn from_toml(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load a scenario from file, picking the format by extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&raw),
            Some("toml") => Self::from_toml(&raw),
            _ => Err(ReplayError::UnknownFormat(path.to_path_buf())),
        }
    }

    /// Display name, falling back to a placeholder
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed scenario")
    }
}

/// One replay step
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// The user scrolls the content to `offset`
    ScrollTo { offset: f32 },
    /// Let simulated time pass, firing any due timers
    Advance { ms: u64 },
    /// One gesture event at window-space `y`
    ///
    /// `x` is overlay-local and defaults to just inside the trailing edge.
    Gesture {
        phase: GesturePhase,
        y: f32,
        #[serde(default)]
        x: Option<f32>,
    },
    /// Begin at `from`, move in `moves` equal steps, end at `to`
    Drag {
        from: f32,
        to: f32,
        #[serde(default = "default_moves")]
        moves: u32,
    },
    AssertState { state: ScrubberState },
    AssertTitle { title: String },
    /// Check the list's content offset
    AssertOffset {
        offset: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    /// Check the marker's fraction along its track
    AssertMarker {
        fraction: f32,
        #[serde(default = "default_fraction_tolerance")]
        tolerance: f32,
    },
}

fn default_moves() -> u32 {
    4
}

fn default_tolerance() -> f32 {
    0.5
}

fn default_fraction_tolerance() -> f32 {
    0.001
}

impl ScenarioStep {
    /// Check if this step only inspects state
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            ScenarioStep::AssertState { .. }
                | ScenarioStep::AssertTitle { .. }
                | ScenarioStep::AssertOffset { .. }
                | ScenarioStep::AssertMarker { .. }
        )
    }

    /// Short human-readable form for transcripts
    pub fn describe(&self) -> String {
        match self {
            ScenarioStep::ScrollTo { offset } => format!("scroll to {offset}"),
            ScenarioStep::Advance { ms } => format!("advance {ms}ms"),
            ScenarioStep::Gesture { phase, y, .. } => format!("gesture {phase:?} at y={y}"),
            ScenarioStep::Drag { from, to, moves } => {
                format!("drag {from} -> {to} ({moves} moves)")
            }
            ScenarioStep::AssertState { state } => format!("assert state {state:?}"),
            ScenarioStep::AssertTitle { title } => format!("assert title {title:?}"),
            ScenarioStep::AssertOffset { offset, .. } => format!("assert offset {offset}"),
            ScenarioStep::AssertMarker { fraction, .. } => format!("assert marker {fraction}"),
        }
    }
}
