//! Scroll monitoring
//!
//! Derives the active section and cumulative scroll depth from the raw scroll
//! offset. Section detection is cheap and runs on every tick; depth is only
//! recomputed on the trailing edge of a debounce, and reports coarse
//! milestones at most once each per page session.

use serde::{Deserialize, Serialize};

use crate::tracker::EventTracker;

/// Scroll-depth milestones, in increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Milestone {
    Quarter,
    Half,
    ThreeQuarters,
    Complete,
}

impl Milestone {
    /// Bucket a depth percentage: [25,50) [50,75) [75,100) [100,∞)
    pub fn for_depth(depth_percent: i64) -> Option<Self> {
        match depth_percent {
            d if d >= 100 => Some(Milestone::Complete),
            d if d >= 75 => Some(Milestone::ThreeQuarters),
            d if d >= 50 => Some(Milestone::Half),
            d if d >= 25 => Some(Milestone::Quarter),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Milestone::Quarter => "25%",
            Milestone::Half => "50%",
            Milestone::ThreeQuarters => "75%",
            Milestone::Complete => "100%",
        }
    }
}

/// `round(scroll_y / (scroll_height - inner_height) * 100)`, or `None` when
/// the document does not scroll.
pub fn scroll_depth_percent(scroll_y: f64, scroll_height: f64, inner_height: f64) -> Option<i64> {
    let scrollable = scroll_height - inner_height;
    if scrollable <= 0.0 || !scrollable.is_finite() || !scroll_y.is_finite() {
        return None;
    }
    Some((scroll_y / scrollable * 100.0).round() as i64)
}

/// The last section (document order) whose top minus `activation_offset` has
/// been reached by `scroll_y`.
pub fn active_section<'a, I>(sections: I, scroll_y: f64, activation_offset: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a (String, f64)>,
{
    sections
        .into_iter()
        .filter(|(_, top)| scroll_y >= top - activation_offset)
        .map(|(id, _)| id.as_str())
        .last()
}

/// Session-scoped scroll tracking state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollTrackingState {
    /// High-water mark of observed depth; never decreases
    pub max_scroll_depth_percent: i64,
    /// Highest milestone already reported
    pub last_milestone: Option<Milestone>,
    pub active_section_id: Option<String>,
}

/// Scroll-depth high-water mark and milestone reporting
#[derive(Debug, Default)]
pub struct ScrollMonitor {
    state: ScrollTrackingState,
}

impl ScrollMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScrollTrackingState {
        &self.state
    }

    pub fn max_depth(&self) -> i64 {
        self.state.max_scroll_depth_percent
    }

    /// Remember the section the navigation last highlighted
    pub fn set_active_section(&mut self, id: Option<&str>) {
        self.state.active_section_id = id.map(str::to_string);
    }

    /// Feed one depth sample. Returns the milestone to report, if any: only a
    /// sample above the high-water mark whose bucket is above the last reported
    /// milestone produces one.
    pub fn observe_depth(&mut self, depth_percent: i64) -> Option<Milestone> {
        if depth_percent <= self.state.max_scroll_depth_percent {
            return None;
        }
        self.state.max_scroll_depth_percent = depth_percent;

        let milestone = Milestone::for_depth(depth_percent)?;
        if self.state.last_milestone.is_some_and(|last| milestone <= last) {
            return None;
        }
        self.state.last_milestone = Some(milestone);
        Some(milestone)
    }

    /// Recompute depth from the viewport and report a crossed milestone
    pub fn record_depth(
        &mut self,
        scroll_y: f64,
        scroll_height: f64,
        inner_height: f64,
        tracker: &EventTracker,
    ) {
        let Some(depth) = scroll_depth_percent(scroll_y, scroll_height, inner_height) else {
            tracing::debug!(scroll_height, inner_height, "Document does not scroll; depth skipped");
            return;
        };

        if let Some(milestone) = self.observe_depth(depth) {
            tracing::debug!(depth, milestone = milestone.label(), "Scroll milestone reached");
            tracker.track("scroll_depth", "engagement", milestone.label());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::MemorySink;
    use pretty_assertions::assert_eq;

    fn sections() -> Vec<(String, f64)> {
        vec![
            ("s1".to_string(), 0.0),
            ("s2".to_string(), 1000.0),
            ("s3".to_string(), 2000.0),
        ]
    }

    #[test]
    fn test_active_section_offset_rule() {
        let sections = sections();

        assert_eq!(active_section(&sections, 850.0, 200.0), Some("s2"));
        assert_eq!(active_section(&sections, 799.0, 200.0), Some("s1"));
        assert_eq!(active_section(&sections, 800.0, 200.0), Some("s2"));
        assert_eq!(active_section(&sections, 1800.0, 200.0), Some("s3"));
    }

    #[test]
    fn test_active_section_none_before_first() {
        let sections = vec![("late".to_string(), 500.0)];
        assert_eq!(active_section(&sections, 0.0, 200.0), None);
    }

    #[test]
    fn test_later_section_wins_on_overlap() {
        let sections = vec![("a".to_string(), 100.0), ("b".to_string(), 100.0)];
        assert_eq!(active_section(&sections, 0.0, 200.0), Some("b"));
    }

    #[test]
    fn test_depth_percent_rounding() {
        assert_eq!(scroll_depth_percent(0.0, 3000.0, 1000.0), Some(0));
        assert_eq!(scroll_depth_percent(499.0, 3000.0, 1000.0), Some(25));
        assert_eq!(scroll_depth_percent(2000.0, 3000.0, 1000.0), Some(100));
        assert_eq!(scroll_depth_percent(100.0, 800.0, 800.0), None);
    }

    #[test]
    fn test_milestone_buckets() {
        assert_eq!(Milestone::for_depth(24), None);
        assert_eq!(Milestone::for_depth(25), Some(Milestone::Quarter));
        assert_eq!(Milestone::for_depth(74), Some(Milestone::Half));
        assert_eq!(Milestone::for_depth(99), Some(Milestone::ThreeQuarters));
        assert_eq!(Milestone::for_depth(130), Some(Milestone::Complete));
    }

    #[test]
    fn test_milestone_sequence_fires_once_each() {
        let mut monitor = ScrollMonitor::new();
        let labels: Vec<&str> = [10, 30, 30, 60, 95, 100]
            .into_iter()
            .filter_map(|d| monitor.observe_depth(d))
            .map(|m| m.label())
            .collect();

        assert_eq!(labels, vec!["25%", "50%", "75%", "100%"]);
        assert_eq!(monitor.max_depth(), 100);
    }

    #[test]
    fn test_same_bucket_increase_does_not_repeat() {
        let mut monitor = ScrollMonitor::new();
        assert_eq!(monitor.observe_depth(30), Some(Milestone::Quarter));
        assert_eq!(monitor.observe_depth(40), None);
        assert_eq!(monitor.max_depth(), 40);
    }

    #[test]
    fn test_depth_high_water_mark_never_decreases() {
        let mut monitor = ScrollMonitor::new();
        monitor.observe_depth(60);
        assert_eq!(monitor.observe_depth(20), None);
        assert_eq!(monitor.max_depth(), 60);
    }

    #[test]
    fn test_skipping_buckets_reports_landing_bucket_only() {
        let mut monitor = ScrollMonitor::new();
        assert_eq!(monitor.observe_depth(80), Some(Milestone::ThreeQuarters));
        assert_eq!(monitor.observe_depth(90), None);
        assert_eq!(monitor.observe_depth(100), Some(Milestone::Complete));
    }

    #[test]
    fn test_record_depth_emits_event() {
        let sink = MemorySink::new();
        let tracker = EventTracker::new(sink.clone());
        let mut monitor = ScrollMonitor::new();

        monitor.record_depth(1000.0, 3000.0, 1000.0, &tracker);
        monitor.record_depth(500.0, 3000.0, 1000.0, &tracker);

        assert_eq!(
            sink.actions(),
            vec![("scroll_depth".to_string(), "50%".to_string())]
        );
    }
}
