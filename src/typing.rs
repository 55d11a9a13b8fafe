//! Typing effect
//!
//! Reveals the hero text one character at a time, then blinks a border cursor
//! until the page goes away.

use crate::config::{EffectsConfig, TimingConfig};
use crate::dom::{ElementId, Page};
use crate::timer::{Scheduler, Task, TimerId};

pub const TYPING_CLASS: &str = "typing-effect";
const CURSOR_PROPERTY: &str = "border-right";

/// Lifecycle of the effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingPhase {
    /// No flagged element on the page
    Inactive,
    /// Waiting for the start delay
    Pending,
    /// `typed` characters shown so far
    Typing { typed: usize },
    /// Terminal state; `timer` drives the blink
    Blinking { timer: TimerId },
}

#[derive(Debug)]
pub struct TypingEffect {
    target: Option<ElementId>,
    chars: Vec<char>,
    phase: TypingPhase,
}

impl TypingEffect {
    /// Capture the first flagged element's text, clear it, and schedule the
    /// first character after the start delay.
    pub fn attach(
        page: &mut Page,
        scheduler: &mut Scheduler,
        timing: &TimingConfig,
        effects: &EffectsConfig,
    ) -> Self {
        let Some(target) = page.query_first_class(TYPING_CLASS) else {
            return Self {
                target: None,
                chars: Vec::new(),
                phase: TypingPhase::Inactive,
            };
        };

        let chars: Vec<char> = page.text(target).chars().collect();
        page.set_text(target, "");
        page.set_style(target, CURSOR_PROPERTY, effects.cursor_visible.as_str());
        scheduler.set_timeout(timing.typing_start_delay_ms, Task::TypeNextChar);

        tracing::debug!(chars = chars.len(), "Typing effect armed");
        Self {
            target: Some(target),
            chars,
            phase: TypingPhase::Pending,
        }
    }

    pub fn phase(&self) -> &TypingPhase {
        &self.phase
    }

    /// Full text being typed
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Handle [`Task::TypeNextChar`]
    pub fn on_type_tick(&mut self, page: &mut Page, scheduler: &mut Scheduler, timing: &TimingConfig) {
        let Some(target) = self.target else {
            return;
        };

        let typed = match self.phase {
            TypingPhase::Pending => 0,
            TypingPhase::Typing { typed } => typed,
            TypingPhase::Inactive | TypingPhase::Blinking { .. } => return,
        };

        if let Some(&ch) = self.chars.get(typed) {
            page.push_text(target, ch);
            self.phase = TypingPhase::Typing { typed: typed + 1 };
            scheduler.set_timeout(timing.typing_char_interval_ms, Task::TypeNextChar);
        } else {
            let timer = scheduler.set_interval(timing.cursor_blink_interval_ms, Task::BlinkCursor);
            self.phase = TypingPhase::Blinking { timer };
        }
    }

    /// Handle [`Task::BlinkCursor`]
    pub fn on_blink(&mut self, page: &mut Page, effects: &EffectsConfig) {
        let (Some(target), TypingPhase::Blinking { .. }) = (self.target, &self.phase) else {
            return;
        };

        let next = if page.style(target, CURSOR_PROPERTY) == Some(effects.cursor_hidden.as_str()) {
            effects.cursor_visible.as_str()
        } else {
            effects.cursor_hidden.as_str()
        };
        page.set_style(target, CURSOR_PROPERTY, next);
    }
}
