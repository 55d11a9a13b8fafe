//! Page-level analytics
//!
//! Lifecycle and engagement events that do not belong to a single controller:
//! page load, time on page, outbound and social link clicks, runtime errors,
//! worker registration and navigation timing.

use serde::{Deserialize, Serialize};

use crate::dom::{ElementId, Page};
use crate::tracker::EventTracker;

pub const SOCIAL_CLASS: &str = "social-btn";

/// Social platform inferred from a link's icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialPlatform {
    Linkedin,
    Github,
    Email,
    Unknown,
}

impl SocialPlatform {
    /// Classify by the icon's class list, first match wins
    pub fn from_icon_classes(classes: &str) -> Self {
        if classes.contains("linkedin") {
            SocialPlatform::Linkedin
        } else if classes.contains("github") {
            SocialPlatform::Github
        } else if classes.contains("envelope") {
            SocialPlatform::Email
        } else {
            SocialPlatform::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialPlatform::Linkedin => "linkedin",
            SocialPlatform::Github => "github",
            SocialPlatform::Email => "email",
            SocialPlatform::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Default)]
pub struct PageAnalytics {
    loaded_at_ms: Option<u64>,
    unload_reported: bool,
    worker_reported: bool,
}

impl PageAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page load: remember the start time and report the path
    pub fn on_load(&mut self, page: &Page, now_ms: u64, tracker: &EventTracker) {
        self.loaded_at_ms = Some(now_ms);
        tracker.track("page_load", "engagement", page.pathname());
    }

    /// Unload: report whole seconds on page, once per visit
    pub fn on_unload(&mut self, now_ms: u64, tracker: &EventTracker) -> Option<u64> {
        if self.unload_reported {
            return None;
        }
        self.unload_reported = true;

        let elapsed = now_ms.saturating_sub(self.loaded_at_ms.unwrap_or(0));
        let seconds = (elapsed as f64 / 1000.0).round() as u64;
        tracker.track("time_on_page", "engagement", seconds);
        Some(seconds)
    }

    /// Uncaught runtime error: log and report, never escalate
    pub fn on_error(&self, message: &str, tracker: &EventTracker) {
        tracing::error!(error = message, "Page runtime error");
        tracker.track("javascript_error", "error", message);
    }

    /// Worker registration outcome, reported at most once per load
    pub fn on_worker_registration(&mut self, result: Result<(), &str>, tracker: &EventTracker) {
        if self.worker_reported {
            tracing::debug!("Duplicate worker registration outcome ignored");
            return;
        }
        self.worker_reported = true;

        match result {
            Ok(()) => {
                tracing::info!("Service worker registered");
                tracker.track("service_worker", "install", "success");
            }
            Err(reason) => {
                tracing::info!(reason, "Service worker registration failed");
                tracker.track("service_worker", "install", "failed");
            }
        }
    }

    /// Navigation timing entry
    pub fn on_navigation_timing(&self, load_event_start: f64, load_event_end: f64, tracker: &EventTracker) {
        let duration = (load_event_end - load_event_start).round() as i64;
        tracker.track("page_load_time", "performance", duration);
    }

    /// Document-level click: social buttons report first (their own handler),
    /// then outbound links bubble up to the document handler.
    pub fn on_click(&self, page: &Page, target: ElementId, tracker: &EventTracker) {
        if let Some(social) = page.closest_with_class(target, SOCIAL_CLASS) {
            let platform = Self::social_platform(page, social);
            tracker.track("social_click", "engagement", platform.as_str());
        }

        if let Some(link) = page.closest(target, "a") {
            let el = page.element(link);
            let href = el.attr("href").unwrap_or_default();
            if !href.is_empty() && el.attr("target") == Some("_blank") {
                tracker.track("external_link_click", "engagement", href);
            }
        }
    }

    fn social_platform(page: &Page, link: ElementId) -> SocialPlatform {
        page.descendants_with_tag(link, &["i"])
            .first()
            .map(|&icon| {
                let classes: Vec<&str> = page.element(icon).classes.iter().map(String::as_str).collect();
                SocialPlatform::from_icon_classes(&classes.join(" "))
            })
            .unwrap_or(SocialPlatform::Unknown)
    }
}
