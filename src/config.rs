//! Runtime configuration
//!
//! Every delay, threshold and selector the controllers use lives here so a host
//! can retune the page without touching controller code. Defaults reproduce the
//! portfolio page as shipped.

use serde::{Deserialize, Serialize};

use crate::error::InteractError;

/// Timing constants in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before the first typed character
    pub typing_start_delay_ms: u64,
    /// Interval between typed characters
    pub typing_char_interval_ms: u64,
    /// Cursor blink half-period once typing completes
    pub cursor_blink_interval_ms: u64,
    /// Simulated submission latency
    pub submit_latency_ms: u64,
    /// Success notice auto-dismiss
    pub success_dismiss_ms: u64,
    /// Trailing debounce for scroll-depth recomputation
    pub scroll_depth_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            typing_start_delay_ms: 1000,
            typing_char_interval_ms: 100,
            cursor_blink_interval_ms: 750,
            submit_latency_ms: 2000,
            success_dismiss_ms: 5000,
            scroll_depth_debounce_ms: 150,
        }
    }
}

/// Scroll-driven thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Header gains the scrolled state strictly above this offset
    pub header_scrolled_offset: f64,
    /// A section becomes current this many pixels before its top
    pub section_activation_offset: f64,
    /// Multiplier applied to the scroll offset for parallax elements
    pub parallax_rate: f64,
    /// Fraction of an element that must be visible to reveal it
    pub reveal_threshold: f64,
    /// Bottom inset applied to the viewport for reveal checks
    pub reveal_bottom_margin: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            header_scrolled_offset: 50.0,
            section_activation_offset: 200.0,
            parallax_rate: -0.5,
            reveal_threshold: 0.1,
            reveal_bottom_margin: 50.0,
        }
    }
}

/// Contact form validation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub name_min_chars: usize,
    pub subject_min_chars: usize,
    pub message_min_chars: usize,
    /// Label shown on the submit control while a submission is in flight
    pub sending_label: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            name_min_chars: 2,
            subject_min_chars: 5,
            message_min_chars: 10,
            sending_label: "Sending...".to_string(),
        }
    }
}

/// Visual constants for the typing cursor and hover lift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub cursor_visible: String,
    pub cursor_hidden: String,
    pub card_hover_lift_px: f64,
    pub button_hover_lift_px: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            cursor_visible: "3px solid #3b82f6".to_string(),
            cursor_hidden: "3px solid transparent".to_string(),
            card_hover_lift_px: -5.0,
            button_hover_lift_px: -2.0,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractConfig {
    pub timing: TimingConfig,
    pub scroll: ScrollConfig,
    pub form: FormConfig,
    pub effects: EffectsConfig,
}

impl InteractConfig {
    /// Load configuration from JSON; omitted keys fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, InteractError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn validate(&self) -> Result<(), InteractError> {
        if self.timing.cursor_blink_interval_ms == 0 {
            return Err(InteractError::ConfigError(
                "cursor_blink_interval_ms must be positive".to_string(),
            ));
        }
        if self.timing.typing_char_interval_ms == 0 {
            return Err(InteractError::ConfigError(
                "typing_char_interval_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.scroll.reveal_threshold) {
            return Err(InteractError::ConfigError(format!(
                "reveal_threshold must be within 0..=1, got {}",
                self.scroll.reveal_threshold
            )));
        }
        Ok(())
    }
}
