//! Reveal, parallax and hover-lift effects
//!
//! Reveal is one-way: an element leaves the watch list the first time enough of
//! it is visible. Parallax and hover lift are pure style writes with no events.

use crate::config::{EffectsConfig, ScrollConfig};
use crate::dom::{ElementId, Page};

pub const REVEAL_CLASS: &str = "reveal-on-scroll";
const REVEALED_CLASS: &str = "revealed";
pub const PARALLAX_CLASSES: [&str; 2] = ["floating-shapes", "hero-bg"];
pub const CARD_CLASSES: [&str; 3] = ["card", "skill-card", "project-card"];
pub const BUTTON_CLASS: &str = "btn";

/// Fraction of an element's height inside the viewport band
/// `[scroll_y, scroll_y + inner_height - bottom_margin]`.
pub fn visible_ratio(top: f64, height: f64, scroll_y: f64, inner_height: f64, bottom_margin: f64) -> f64 {
    let view_top = scroll_y;
    let view_bottom = scroll_y + (inner_height - bottom_margin).max(0.0);

    if height <= 0.0 {
        return if top >= view_top && top <= view_bottom { 1.0 } else { 0.0 };
    }

    let overlap = (top + height).min(view_bottom) - top.max(view_top);
    (overlap.max(0.0) / height).min(1.0)
}

/// Watches reveal-flagged elements until each has been shown once
#[derive(Debug, Default)]
pub struct RevealController {
    watching: Vec<ElementId>,
}

impl RevealController {
    pub fn attach(page: &Page) -> Self {
        Self {
            watching: page.query_class(REVEAL_CLASS),
        }
    }

    pub fn watching(&self) -> usize {
        self.watching.len()
    }

    /// Reveal newly visible elements; returns how many were revealed.
    pub fn check(&mut self, page: &mut Page, config: &ScrollConfig) -> usize {
        let scroll_y = page.scroll_y();
        let inner_height = page.inner_height();
        let before = self.watching.len();

        self.watching.retain(|&id| {
            let el = page.element(id);
            let ratio = visible_ratio(el.top, el.height, scroll_y, inner_height, config.reveal_bottom_margin);
            let visible = ratio > 0.0 && ratio >= config.reveal_threshold;
            if visible {
                page.add_class(id, REVEALED_CLASS);
            }
            !visible
        });

        before - self.watching.len()
    }
}

/// Scroll-proportional vertical offset for background layers
#[derive(Debug, Default)]
pub struct ParallaxController {
    layers: Vec<ElementId>,
}

impl ParallaxController {
    pub fn attach(page: &Page) -> Self {
        Self {
            layers: page.query_any_class(&PARALLAX_CLASSES),
        }
    }

    pub fn on_scroll(&self, page: &mut Page, config: &ScrollConfig) {
        let offset = page.scroll_y() * config.parallax_rate;
        let transform = translate_y(offset);
        for &layer in &self.layers {
            page.set_style(layer, "transform", transform.as_str());
        }
    }
}

/// Lift cards and buttons under the pointer
#[derive(Debug, Default)]
pub struct HoverLift {
    cards: Vec<ElementId>,
    buttons: Vec<ElementId>,
}

impl HoverLift {
    pub fn attach(page: &Page) -> Self {
        Self {
            cards: page.query_any_class(&CARD_CLASSES),
            buttons: page.query_class(BUTTON_CLASS),
        }
    }

    /// Pointer entered `target`; lifts the nearest card and button around it
    pub fn on_enter(&self, page: &mut Page, target: ElementId, config: &EffectsConfig) {
        for (el, lift) in self.hovered(page, target, config) {
            page.set_style(el, "transform", translate_y(lift));
        }
    }

    /// Pointer left `target` itself. Leave does not bubble, so only a lifted
    /// element that is the target drops back; ancestors the pointer also left
    /// arrive as their own events.
    pub fn on_leave(&self, page: &mut Page, target: ElementId) {
        if self.cards.contains(&target) || self.buttons.contains(&target) {
            page.set_style(target, "transform", "translateY(0)");
        }
    }

    fn hovered(&self, page: &Page, target: ElementId, config: &EffectsConfig) -> Vec<(ElementId, f64)> {
        let mut hovered = Vec::new();
        for &card in &self.cards {
            if card == target || page.is_descendant_of(target, card) {
                hovered.push((card, config.card_hover_lift_px));
            }
        }
        for &button in &self.buttons {
            if button == target || page.is_descendant_of(target, button) {
                hovered.push((button, config.button_hover_lift_px));
            }
        }
        hovered
    }
}

fn translate_y(px: f64) -> String {
    // -0.0 renders as "-0px"; normalise it
    let px = if px == 0.0 { 0.0 } else { px };
    format!("translateY({px}px)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        Page::from_json(
            r#"{
                "viewport": { "inner_height": 1000, "scroll_height": 5000 },
                "body": [
                    { "classes": ["hero-bg"], "top": 0, "height": 600 },
                    { "classes": ["reveal-on-scroll"], "top": 900, "height": 200 },
                    { "classes": ["reveal-on-scroll"], "top": 3000, "height": 200 },
                    { "classes": ["card"], "top": 1200, "height": 300, "children": [
                        { "tag": "a", "classes": ["btn"], "children": [ { "tag": "i" } ] }
                    ]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_visible_ratio_with_bottom_margin() {
        // band is [0, 950]; element [900, 1100] → 50/200
        assert_eq!(visible_ratio(900.0, 200.0, 0.0, 1000.0, 50.0), 0.25);
        assert_eq!(visible_ratio(960.0, 200.0, 0.0, 1000.0, 50.0), 0.0);
        assert_eq!(visible_ratio(100.0, 200.0, 0.0, 1000.0, 50.0), 1.0);
    }

    #[test]
    fn test_reveal_threshold_boundary() {
        // band [0, 950]; element [930, 1130] → exactly 10%
        assert!(visible_ratio(930.0, 200.0, 0.0, 1000.0, 50.0) >= 0.1);
        // [931, 1131] → 9.5%
        assert!(visible_ratio(931.0, 200.0, 0.0, 1000.0, 50.0) < 0.1);
    }

    #[test]
    fn test_reveal_is_one_way() {
        let mut page = page();
        let mut reveal = RevealController::attach(&page);
        let config = ScrollConfig::default();
        let targets = page.query_class(REVEAL_CLASS);

        assert_eq!(reveal.check(&mut page, &config), 1);
        assert!(page.has_class(targets[0], "revealed"));
        assert!(!page.has_class(targets[1], "revealed"));

        page.scroll_to(2500.0);
        assert_eq!(reveal.check(&mut page, &config), 1);
        page.scroll_to(0.0);
        assert_eq!(reveal.check(&mut page, &config), 0);

        assert!(page.has_class(targets[0], "revealed"));
        assert!(page.has_class(targets[1], "revealed"));
        assert_eq!(reveal.watching(), 0);
    }

    #[test]
    fn test_parallax_offset() {
        let mut page = page();
        let parallax = ParallaxController::attach(&page);
        let layer = page.query_class("hero-bg")[0];

        page.scroll_to(300.0);
        parallax.on_scroll(&mut page, &ScrollConfig::default());
        assert_eq!(page.style(layer, "transform"), Some("translateY(-150px)"));

        page.scroll_to(0.0);
        parallax.on_scroll(&mut page, &ScrollConfig::default());
        assert_eq!(page.style(layer, "transform"), Some("translateY(0px)"));
    }

    #[test]
    fn test_hover_lift_card_and_button() {
        let mut page = page();
        let hover = HoverLift::attach(&page);
        let config = EffectsConfig::default();
        let card = page.query_class("card")[0];
        let button = page.query_class("btn")[0];
        let icon = page.query(|el| el.tag == "i")[0];

        hover.on_enter(&mut page, icon, &config);
        assert_eq!(page.style(card, "transform"), Some("translateY(-5px)"));
        assert_eq!(page.style(button, "transform"), Some("translateY(-2px)"));

        // leaving the icon keeps the pointer inside the button and card
        hover.on_leave(&mut page, icon);
        assert_eq!(page.style(card, "transform"), Some("translateY(-5px)"));
        assert_eq!(page.style(button, "transform"), Some("translateY(-2px)"));

        hover.on_leave(&mut page, button);
        assert_eq!(page.style(button, "transform"), Some("translateY(0)"));
        assert_eq!(page.style(card, "transform"), Some("translateY(-5px)"));

        hover.on_leave(&mut page, card);
        assert_eq!(page.style(card, "transform"), Some("translateY(0)"));
    }
}
