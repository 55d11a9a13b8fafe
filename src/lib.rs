//! Folio Interact - Headless interaction engine for a static portfolio page
//!
//! Folio turns browser events into page mutations and analytics events through
//! a set of small controllers sharing one page model and one virtual clock:
//! navigation → reveal/parallax → typing effect → contact form → analytics.
//!
//! ## Modules
//!
//! - **Runtime**: `PortfolioRuntime` owns the page, timers and controllers
//! - **Contact form**: validation rules and the submit state machine
//! - **Tracker**: `track(action, category, label)` with swappable sinks

pub mod analytics;
pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod form;
pub mod nav;
pub mod reveal;
pub mod runtime;
pub mod scroll;
pub mod timer;
pub mod tracker;
pub mod typing;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::InteractConfig;
pub use dom::{ElementId, Page, PageSpec};
pub use error::InteractError;
pub use events::{parse_script, PageEvent, ScriptStep, Target};
pub use form::{
    validate_value, ContactSubmission, SimulatedTransport, SubmitError, SubmitTransport,
    ValidationReport,
};
pub use runtime::{PortfolioRuntime, RuntimeBuilder};
pub use tracker::{
    EventSink, EventTracker, FanoutSink, JsonLinesSink, Label, LogSink, MemorySink, TrackedEvent,
};

/// Folio version
pub const FOLIO_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI and FFI
pub const PRODUCER_NAME: &str = "folio-interact";
