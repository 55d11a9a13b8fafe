//! Navigation controller
//!
//! Header scrolled state, active-link highlighting, and in-page link handling.

use crate::config::ScrollConfig;
use crate::dom::{ElementId, Page};
use crate::scroll::active_section;
use crate::tracker::EventTracker;

pub const NAVBAR_ID: &str = "navbar";
pub const NAV_LINK_CLASS: &str = "nav-link";
pub const DRAWER_CLASS: &str = "navbar-collapse";
const SCROLLED_CLASS: &str = "scrolled";
const ACTIVE_CLASS: &str = "active";
const DRAWER_OPEN_CLASS: &str = "show";

/// Result of a navigation link click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Scrolled to the section with this id
    Scrolled(String),
    /// Fragment did not resolve; click swallowed
    Unresolved,
}

/// Element handles captured once at start-up
#[derive(Debug, Default)]
pub struct NavigationController {
    navbar: Option<ElementId>,
    links: Vec<ElementId>,
    sections: Vec<(String, f64)>,
    drawer: Option<ElementId>,
}

impl NavigationController {
    pub fn attach(page: &Page) -> Self {
        let controller = Self {
            navbar: page.get_by_id(NAVBAR_ID),
            links: page.query_class(NAV_LINK_CLASS),
            sections: page.sections_with_id(),
            drawer: page.query_first_class(DRAWER_CLASS),
        };

        if controller.navbar.is_none() {
            tracing::debug!("No #navbar element; header state disabled");
        }
        controller
    }

    /// The nav link `target` belongs to, if any
    pub fn link_for(&self, page: &Page, target: ElementId) -> Option<ElementId> {
        page.closest_with_class(target, NAV_LINK_CLASS)
            .filter(|link| self.links.contains(link))
    }

    /// Per-tick update: header state and active link. Returns the active section.
    pub fn on_scroll(&self, page: &mut Page, config: &ScrollConfig) -> Option<String> {
        let scroll_y = page.scroll_y();

        if let Some(navbar) = self.navbar {
            if scroll_y > config.header_scrolled_offset {
                page.add_class(navbar, SCROLLED_CLASS);
            } else {
                page.remove_class(navbar, SCROLLED_CLASS);
            }
        }

        let current = active_section(&self.sections, scroll_y, config.section_activation_offset)
            .map(str::to_string);
        self.highlight(page, current.as_deref());
        current
    }

    fn highlight(&self, page: &mut Page, current: Option<&str>) {
        for &link in &self.links {
            page.remove_class(link, ACTIVE_CLASS);
            let matches = current.is_some_and(|id| page.element(link).href_fragment() == Some(id));
            if matches {
                page.add_class(link, ACTIVE_CLASS);
            }
        }
    }

    /// Handle a click on a navigation link. Default jump behaviour is always
    /// suppressed; the mobile drawer closes whatever the outcome.
    pub fn on_link_click(&self, page: &mut Page, link: ElementId, tracker: &EventTracker) -> NavOutcome {
        let target = page
            .element(link)
            .href_fragment()
            .filter(|fragment| !fragment.is_empty())
            .map(str::to_string);

        let section = target.as_deref().and_then(|id| page.get_by_id(id));
        let outcome = match section {
            Some(section) => {
                page.scroll_into_view(section);
                let id = target.unwrap_or_default();
                tracker.track("navigation_click", "header", id.as_str());
                NavOutcome::Scrolled(id)
            }
            None => {
                tracing::debug!(href = ?page.element(link).attr("href"), "Navigation target not found");
                NavOutcome::Unresolved
            }
        };

        self.close_drawer(page);
        outcome
    }

    fn close_drawer(&self, page: &mut Page) {
        if let Some(drawer) = self.drawer {
            if page.has_class(drawer, DRAWER_OPEN_CLASS) {
                page.remove_class(drawer, DRAWER_OPEN_CLASS);
            }
        }
    }
}
