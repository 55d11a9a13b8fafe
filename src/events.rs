//! Browser events and replay scripts
//!
//! A script is NDJSON, one timestamped event per line:
//!
//! ```text
//! {"at_ms": 0,    "type": "scroll", "y": 400}
//! {"at_ms": 1200, "type": "click",  "target": {"class": "nav-link", "nth": 2}}
//! {"at_ms": 1500, "type": "input",  "target": {"name": "email"}, "value": "a@b.co"}
//! ```

use serde::{Deserialize, Serialize};

use crate::dom::{ElementId, Page};
use crate::error::InteractError;

/// How an event names its target element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    /// By `id` attribute
    Id { id: String },
    /// First element whose `name` attribute matches
    Name { name: String },
    /// The `nth` (0-based) element carrying a class
    Class {
        class: String,
        #[serde(default)]
        nth: usize,
    },
    /// Raw handle in document order
    Handle { element: usize },
}

impl Target {
    pub fn id(id: impl Into<String>) -> Self {
        Target::Id { id: id.into() }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Target::Name { name: name.into() }
    }

    pub fn class(class: impl Into<String>, nth: usize) -> Self {
        Target::Class {
            class: class.into(),
            nth,
        }
    }

    pub fn resolve(&self, page: &Page) -> Option<ElementId> {
        match self {
            Target::Id { id } => page.get_by_id(id),
            Target::Name { name } => page
                .query(|el| el.name() == Some(name.as_str()))
                .first()
                .copied(),
            Target::Class { class, nth } => page.query_class(class).get(*nth).copied(),
            Target::Handle { element } => {
                let handle = ElementId(*element);
                page.get(handle).map(|_| handle)
            }
        }
    }
}

/// Events the host forwards from the browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// Viewport moved to `y`
    Scroll { y: f64 },
    Click { target: Target },
    /// Control value changed
    Input { target: Target, value: String },
    /// Control lost focus
    Blur { target: Target },
    /// Contact form submitted (e.g. Enter in a field)
    Submit,
    MouseEnter { target: Target },
    MouseLeave { target: Target },
    /// Page is going away
    Unload,
    /// Uncaught runtime error surfaced by the page
    Error { message: String },
    /// Outcome of the optional worker registration
    WorkerRegistration {
        ok: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Navigation timing entry
    NavigationTiming {
        load_event_start: f64,
        load_event_end: f64,
    },
}

/// One scripted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Milliseconds since page load
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: PageEvent,
}

/// Parse an NDJSON script; blank lines are skipped, times must not decrease.
pub fn parse_script(ndjson: &str) -> Result<Vec<ScriptStep>, InteractError> {
    let mut steps: Vec<ScriptStep> = Vec::new();

    for (line_no, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let step: ScriptStep = serde_json::from_str(trimmed).map_err(|e| {
            InteractError::ScriptError(format!("line {}: {}", line_no + 1, e))
        })?;

        if let Some(prev) = steps.last() {
            if step.at_ms < prev.at_ms {
                return Err(InteractError::ScriptError(format!(
                    "line {}: at_ms {} is earlier than previous step at {}",
                    line_no + 1,
                    step.at_ms,
                    prev.at_ms
                )));
            }
        }
        steps.push(step);
    }

    Ok(steps)
}
