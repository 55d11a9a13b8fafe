//! Headless page model
//!
//! A flattened element tree that carries just enough of the page to drive the
//! controllers: identity (id, tag, classes, attributes), form state (value,
//! disabled), presentation (text, inline style) and layout (document-relative
//! top and height). Elements are stored in document order; a page description
//! is nested JSON that is flattened pre-order on load.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::InteractError;

/// Handle to an element in a [`Page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

/// Serialized description of one element and its children
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementSpec {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Arbitrary attributes (`href`, `target`, `name`, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    /// Inline style properties (`transform`, `border-right`, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    /// Document-relative top offset in pixels
    #[serde(default)]
    pub top: f64,
    /// Rendered height in pixels
    #[serde(default)]
    pub height: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

fn default_tag() -> String {
    "div".to_string()
}

/// Viewport geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current vertical scroll offset
    #[serde(default)]
    pub scroll_y: f64,
    /// Window inner height
    #[serde(default = "default_inner_height")]
    pub inner_height: f64,
    /// Full document height; derived from the content when omitted
    #[serde(default)]
    pub scroll_height: Option<f64>,
}

fn default_inner_height() -> f64 {
    800.0
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            inner_height: default_inner_height(),
            scroll_height: None,
        }
    }
}

/// Serialized description of a whole page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSpec {
    /// Location pathname reported on page load
    #[serde(default = "default_pathname")]
    pub pathname: String,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub body: Vec<ElementSpec>,
}

fn default_pathname() -> String {
    "/".to_string()
}

/// A live element
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub parent: Option<ElementId>,
    pub classes: BTreeSet<String>,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub value: String,
    pub disabled: bool,
    pub style: BTreeMap<String, String>,
    pub top: f64,
    pub height: f64,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The `name` attribute, used by form controls
    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    /// The fragment of an in-page `href` (`#about` → `about`)
    pub fn href_fragment(&self) -> Option<&str> {
        let href = self.attr("href")?;
        href.find('#').map(|idx| &href[idx + 1..])
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// The in-memory page
#[derive(Debug, Clone)]
pub struct Page {
    pathname: String,
    viewport: Viewport,
    elements: Vec<Element>,
    ids: HashMap<String, ElementId>,
}

impl Page {
    /// Build a page from a description, rejecting duplicate ids.
    pub fn from_spec(spec: PageSpec) -> Result<Self, InteractError> {
        let mut page = Self {
            pathname: spec.pathname,
            viewport: spec.viewport,
            elements: Vec::new(),
            ids: HashMap::new(),
        };

        for child in spec.body {
            page.insert(child, None)?;
        }

        if page.viewport.inner_height < 0.0 {
            return Err(InteractError::PageError(
                "viewport.inner_height must not be negative".to_string(),
            ));
        }

        Ok(page)
    }

    /// Parse a page description from JSON
    pub fn from_json(json: &str) -> Result<Self, InteractError> {
        let spec: PageSpec = serde_json::from_str(json)?;
        Self::from_spec(spec)
    }

    fn insert(&mut self, spec: ElementSpec, parent: Option<ElementId>) -> Result<(), InteractError> {
        let handle = ElementId(self.elements.len());

        if let Some(id) = &spec.id {
            if self.ids.insert(id.clone(), handle).is_some() {
                return Err(InteractError::DuplicateId(id.clone()));
            }
        }

        self.elements.push(Element {
            tag: spec.tag.to_ascii_lowercase(),
            id: spec.id,
            parent,
            classes: spec.classes.into_iter().collect(),
            attrs: spec.attrs,
            text: spec.text,
            value: spec.value,
            disabled: spec.disabled,
            style: spec.style,
            top: spec.top,
            height: spec.height,
        });

        for child in spec.children {
            self.insert(child, Some(handle))?;
        }
        Ok(())
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    pub fn scroll_y(&self) -> f64 {
        self.viewport.scroll_y
    }

    pub fn inner_height(&self) -> f64 {
        self.viewport.inner_height
    }

    /// Full document height
    pub fn scroll_height(&self) -> f64 {
        self.viewport.scroll_height.unwrap_or_else(|| {
            self.elements
                .iter()
                .map(Element::bottom)
                .fold(self.viewport.inner_height, f64::max)
        })
    }

    /// Largest reachable scroll offset
    pub fn max_scroll_y(&self) -> f64 {
        (self.scroll_height() - self.inner_height()).max(0.0)
    }

    /// Move the viewport; the offset is clamped to the scrollable range.
    pub fn scroll_to(&mut self, y: f64) {
        self.viewport.scroll_y = y.clamp(0.0, self.max_scroll_y());
    }

    /// Align the top of an element with the top of the viewport
    pub fn scroll_into_view(&mut self, id: ElementId) {
        let top = self.elements[id.0].top;
        self.scroll_to(top);
    }

    /// Scroll the least distance that brings an element into view. Does
    /// nothing when it is already fully visible. An element taller than the
    /// viewport is aligned to its top. Returns whether the offset changed.
    pub fn scroll_into_view_nearest(&mut self, id: ElementId) -> bool {
        let (top, bottom) = {
            let element = &self.elements[id.0];
            (element.top, element.bottom())
        };
        let view_top = self.viewport.scroll_y;
        let view_bottom = view_top + self.viewport.inner_height;

        let target = if top < view_top {
            top
        } else if bottom > view_bottom {
            (bottom - self.viewport.inner_height).min(top)
        } else {
            return false;
        };

        self.scroll_to(target);
        self.viewport.scroll_y != view_top
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<ElementId> {
        self.ids.get(id).copied()
    }

    /// All elements carrying `class`, in document order
    pub fn query_class(&self, class: &str) -> Vec<ElementId> {
        self.query(|el| el.has_class(class))
    }

    /// All elements carrying any of `classes`, in document order
    pub fn query_any_class(&self, classes: &[&str]) -> Vec<ElementId> {
        self.query(|el| classes.iter().any(|c| el.has_class(c)))
    }

    /// First element carrying `class`
    pub fn query_first_class(&self, class: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|el| el.has_class(class))
            .map(ElementId)
    }

    pub fn query<F>(&self, predicate: F) -> Vec<ElementId>
    where
        F: Fn(&Element) -> bool,
    {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| predicate(el))
            .map(|(idx, _)| ElementId(idx))
            .collect()
    }

    /// `section` elements that carry an id, with their top offsets
    pub fn sections_with_id(&self) -> Vec<(String, f64)> {
        self.elements
            .iter()
            .filter(|el| el.tag == "section")
            .filter_map(|el| el.id.clone().map(|id| (id, el.top)))
            .collect()
    }

    pub fn is_descendant_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut current = self.elements[id.0].parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.elements[parent.0].parent;
        }
        false
    }

    /// Descendants of `root` matching one of `tags`, in document order
    pub fn descendants_with_tag(&self, root: ElementId, tags: &[&str]) -> Vec<ElementId> {
        self.query(|el| tags.contains(&el.tag.as_str()))
            .into_iter()
            .filter(|id| self.is_descendant_of(*id, root))
            .collect()
    }

    /// Nearest inclusive ancestor with the given tag
    pub fn closest(&self, id: ElementId, tag: &str) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(handle) = current {
            let el = self.elements.get(handle.0)?;
            if el.tag == tag {
                return Some(handle);
            }
            current = el.parent;
        }
        None
    }

    /// Nearest inclusive ancestor with the given class
    pub fn closest_with_class(&self, id: ElementId, class: &str) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(handle) = current {
            let el = self.elements.get(handle.0)?;
            if el.has_class(class) {
                return Some(handle);
            }
            current = el.parent;
        }
        None
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        self.elements[id.0].classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        self.elements[id.0].classes.remove(class);
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements[id.0].has_class(class)
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: impl Into<String>) {
        self.elements[id.0]
            .style
            .insert(property.to_string(), value.into());
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.elements[id.0].style.get(property).map(String::as_str)
    }

    pub fn text(&self, id: ElementId) -> &str {
        &self.elements[id.0].text
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        self.elements[id.0].text = text.into();
    }

    pub fn push_text(&mut self, id: ElementId, ch: char) {
        self.elements[id.0].text.push(ch);
    }

    pub fn value(&self, id: ElementId) -> &str {
        &self.elements[id.0].value
    }

    pub fn set_value(&mut self, id: ElementId, value: impl Into<String>) {
        self.elements[id.0].value = value.into();
    }

    pub fn is_disabled(&self, id: ElementId) -> bool {
        self.elements[id.0].disabled
    }

    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        self.elements[id.0].disabled = disabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page_json() -> &'static str {
        r##"{
            "pathname": "/index.html",
            "viewport": { "inner_height": 800 },
            "body": [
                { "tag": "nav", "id": "navbar", "children": [
                    { "tag": "a", "classes": ["nav-link"], "attrs": { "href": "#about" } }
                ]},
                { "tag": "section", "id": "home", "top": 0, "height": 1000 },
                { "tag": "section", "id": "about", "top": 1000, "height": 1000, "children": [
                    { "tag": "a", "classes": ["social-btn"], "attrs": { "href": "https://github.com/x", "target": "_blank" }, "children": [
                        { "tag": "i", "classes": ["fab", "fa-github"] }
                    ]}
                ]},
                { "tag": "section", "top": 2000, "height": 500 }
            ]
        }"##
    }

    #[test]
    fn test_flattened_document_order() {
        let page = Page::from_json(sample_page_json()).unwrap();

        assert_eq!(page.len(), 7);
        assert_eq!(page.element(ElementId(0)).tag, "nav");
        assert_eq!(page.element(ElementId(1)).parent, Some(ElementId(0)));
        assert_eq!(page.get_by_id("about"), Some(ElementId(3)));
        assert_eq!(page.pathname(), "/index.html");
    }

    #[test]
    fn test_sections_without_id_are_skipped() {
        let page = Page::from_json(sample_page_json()).unwrap();
        let sections = page.sections_with_id();

        assert_eq!(
            sections,
            vec![("home".to_string(), 0.0), ("about".to_string(), 1000.0)]
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let json = r#"{ "body": [ { "id": "x" }, { "id": "x" } ] }"#;
        assert!(matches!(
            Page::from_json(json),
            Err(InteractError::DuplicateId(id)) if id == "x"
        ));
    }

    #[test]
    fn test_scroll_height_derived_and_clamped() {
        let mut page = Page::from_json(sample_page_json()).unwrap();

        assert_eq!(page.scroll_height(), 2500.0);
        page.scroll_to(10_000.0);
        assert_eq!(page.scroll_y(), 1700.0);
        page.scroll_to(-5.0);
        assert_eq!(page.scroll_y(), 0.0);
    }

    #[test]
    fn test_closest_and_fragment() {
        let page = Page::from_json(sample_page_json()).unwrap();
        let icon = page.query_class("fa-github")[0];

        let anchor = page.closest(icon, "a").unwrap();
        assert_eq!(page.element(anchor).attr("target"), Some("_blank"));
        assert_eq!(page.closest_with_class(icon, "social-btn"), Some(anchor));
        assert_eq!(page.element(ElementId(1)).href_fragment(), Some("about"));
        assert_eq!(page.element(anchor).href_fragment(), None);
    }

    #[test]
    fn test_class_and_style_mutation() {
        let mut page = Page::from_json(sample_page_json()).unwrap();
        let nav = page.get_by_id("navbar").unwrap();

        page.add_class(nav, "scrolled");
        assert!(page.has_class(nav, "scrolled"));
        page.remove_class(nav, "scrolled");
        assert!(!page.has_class(nav, "scrolled"));

        page.set_style(nav, "transform", "translateY(0)");
        assert_eq!(page.style(nav, "transform"), Some("translateY(0)"));
    }

    #[test]
    fn test_scroll_into_view_nearest() {
        let mut page = Page::from_json(
            r#"{
                "viewport": { "inner_height": 400, "scroll_height": 3000 },
                "body": [
                    { "id": "a", "top": 100, "height": 50 },
                    { "id": "b", "top": 900, "height": 100 },
                    { "id": "tall", "top": 1500, "height": 900 }
                ]
            }"#,
        )
        .unwrap();
        let a = page.get_by_id("a").unwrap();
        let b = page.get_by_id("b").unwrap();
        let tall = page.get_by_id("tall").unwrap();

        // below the viewport: bottom edge aligned
        assert!(page.scroll_into_view_nearest(b));
        assert_eq!(page.scroll_y(), 600.0);

        // fully visible: untouched
        assert!(!page.scroll_into_view_nearest(b));
        assert_eq!(page.scroll_y(), 600.0);

        // above the viewport: top edge aligned
        assert!(page.scroll_into_view_nearest(a));
        assert_eq!(page.scroll_y(), 100.0);

        // taller than the viewport: top edge aligned
        assert!(page.scroll_into_view_nearest(tall));
        assert_eq!(page.scroll_y(), 1500.0);
    }

    #[test]
    fn test_initial_disabled_and_style() {
        let json = r#"{ "body": [
            { "tag": "button", "id": "send", "disabled": true, "style": { "opacity": "0.5" } },
            { "tag": "button", "id": "reset" }
        ] }"#;
        let page = Page::from_json(json).unwrap();
        let send = page.get_by_id("send").unwrap();
        let reset = page.get_by_id("reset").unwrap();

        assert!(page.is_disabled(send));
        assert_eq!(page.style(send, "opacity"), Some("0.5"));
        assert!(!page.is_disabled(reset));
        assert_eq!(page.style(reset, "opacity"), None);
    }
}
