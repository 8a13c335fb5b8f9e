//! Headless replay for the section scrubber
//!
//! Runs scripted scroll, gesture and timing steps against a scrubber attached
//! to a simulated sectioned list, and records what the scrubber did. Used for
//! regression scenarios and for inspecting behavior without a UI.

pub mod error;
pub mod list;
pub mod runner;
pub mod scenario;

pub use error::{ReplayError, Result};
pub use list::{ListSpec, SectionSpec, SimulatedList};
pub use runner::{describe_event, AssertionFailure, ReplayReport, ScenarioRunner, TranscriptEntry};
pub use scenario::{Scenario, ScenarioStep};
