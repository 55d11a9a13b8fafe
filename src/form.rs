//! Contact form controller
//!
//! Field-level validation on blur, whole-form validation on submit, and the
//! submit-control state machine:
//!
//! ```text
//! Idle → Validating → Idle        (errors shown)
//!                   → Submitting → Idle (success or failure notice shown)
//! ```
//!
//! Submitting is only entered from a validation pass with zero errors, and the
//! control stays disabled until the transport answers, so a second submission
//! cannot start while one is in flight.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::config::{FormConfig, InteractConfig};
use crate::dom::{ElementId, Page};
use crate::timer::{Scheduler, Task, TimerId};
use crate::tracker::EventTracker;

pub const FORM_ID: &str = "contactForm";
pub const SUBMIT_ID: &str = "submitBtn";
pub const SUCCESS_ALERT_ID: &str = "successAlert";
pub const ERROR_ALERT_ID: &str = "errorAlert";
pub const ERROR_MESSAGE_ID: &str = "errorMessage";

const VALID_CLASS: &str = "is-valid";
const INVALID_CLASS: &str = "is-invalid";
const HIDDEN_CLASS: &str = "d-none";
const LOADING_CLASS: &str = "loading";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// The four validated fields, in reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Name,
    Email,
    Subject,
    Message,
}

impl FieldName {
    pub const ALL: [FieldName; 4] = [
        FieldName::Name,
        FieldName::Email,
        FieldName::Subject,
        FieldName::Message,
    ];

    /// Map a control's `name` attribute; unknown names have no rule.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(FieldName::Name),
            "email" => Some(FieldName::Email),
            "subject" => Some(FieldName::Subject),
            "message" => Some(FieldName::Message),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Email => "email",
            FieldName::Subject => "subject",
            FieldName::Message => "message",
        }
    }

    /// Whether the trimmed `value` satisfies this field's rule
    pub fn accepts(&self, value: &str, rules: &FormConfig) -> bool {
        let value = value.trim();
        match self {
            FieldName::Name => value.chars().count() >= rules.name_min_chars,
            FieldName::Email => EMAIL_PATTERN.is_match(value),
            FieldName::Subject => value.chars().count() >= rules.subject_min_chars,
            FieldName::Message => value.chars().count() >= rules.message_min_chars,
        }
    }

    /// User-facing message for a failed rule
    pub fn error_message(&self, rules: &FormConfig) -> String {
        match self {
            FieldName::Name => format!(
                "Name must be at least {} characters long",
                rules.name_min_chars
            ),
            FieldName::Email => "Please enter a valid email address".to_string(),
            FieldName::Subject => format!(
                "Subject must be at least {} characters long",
                rules.subject_min_chars
            ),
            FieldName::Message => format!(
                "Message must be at least {} characters long",
                rules.message_min_chars
            ),
        }
    }
}

/// Validate one field by its `name` attribute. Unknown names always pass.
pub fn validate_value(field: &str, value: &str, rules: &FormConfig) -> bool {
    FieldName::parse(field).map_or(true, |f| f.accepts(value, rules))
}

/// Visual validity marker on a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    Untouched,
    Valid,
    Invalid,
}

/// Snapshot of one form control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
    pub name: String,
    pub value: String,
    pub validity: Validity,
}

/// Outcome of validating the whole form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// One message per failing rule, in name/email/subject/message order
    pub errors: Vec<String>,
}

/// The message the visitor is sending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactSubmission {
    pub fn field(&self, field: FieldName) -> &str {
        match field {
            FieldName::Name => &self.name,
            FieldName::Email => &self.email,
            FieldName::Subject => &self.subject,
            FieldName::Message => &self.message,
        }
    }

    fn field_mut(&mut self, field: FieldName) -> &mut String {
        match field {
            FieldName::Name => &mut self.name,
            FieldName::Email => &mut self.email,
            FieldName::Subject => &mut self.subject,
            FieldName::Message => &mut self.message,
        }
    }

    /// Check every rule; missing values count as empty.
    pub fn validate(&self, rules: &FormConfig) -> ValidationReport {
        let errors: Vec<String> = FieldName::ALL
            .iter()
            .filter(|field| !field.accepts(self.field(**field), rules))
            .map(|field| field.error_message(rules))
            .collect();

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Delivery failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("request timed out")]
    Timeout,

    #[error("server rejected the message ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("network error: {0}")]
    Network(String),
}

/// Where a validated submission goes once the latency elapses
pub trait SubmitTransport {
    fn deliver(&mut self, submission: &ContactSubmission) -> Result<(), SubmitError>;
}

/// Stand-in backend that accepts everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedTransport;

impl SubmitTransport for SimulatedTransport {
    fn deliver(&mut self, submission: &ContactSubmission) -> Result<(), SubmitError> {
        tracing::debug!(subject = %submission.subject, "Simulated delivery accepted");
        Ok(())
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Submit control state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting {
        original_label: String,
        submission: ContactSubmission,
    },
}

/// What a submit attempt did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// A submission is already in flight
    Ignored,
    /// Validation failed; errors are on display
    Rejected(ValidationReport),
    /// Valid, but the page has no submit control to drive
    NoControl,
    /// Submitting; the transport is consulted after the latency
    Submitting,
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Delivered,
    Failed(SubmitError),
}

pub struct ContactForm {
    form: ElementId,
    controls: Vec<ElementId>,
    submit: Option<ElementId>,
    success_alert: Option<ElementId>,
    error_alert: Option<ElementId>,
    error_message: Option<ElementId>,
    state: SubmitState,
    dismiss_timer: Option<TimerId>,
    transport: Box<dyn SubmitTransport>,
}

impl ContactForm {
    /// Bind to `#contactForm`; `None` when the page has no form.
    pub fn attach(page: &Page, transport: Box<dyn SubmitTransport>) -> Option<Self> {
        let Some(form) = page.get_by_id(FORM_ID) else {
            tracing::debug!("No #contactForm element; contact form disabled");
            return None;
        };

        Some(Self {
            form,
            controls: page.descendants_with_tag(form, &["input", "textarea"]),
            submit: page.get_by_id(SUBMIT_ID),
            success_alert: page.get_by_id(SUCCESS_ALERT_ID),
            error_alert: page.get_by_id(ERROR_ALERT_ID),
            error_message: page.get_by_id(ERROR_MESSAGE_ID),
            state: SubmitState::Idle,
            dismiss_timer: None,
            transport,
        })
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmitState::Submitting { .. })
    }

    /// Whether `id` is one of the form's own controls
    pub fn owns_control(&self, id: ElementId) -> bool {
        self.controls.contains(&id)
    }

    pub fn form(&self) -> ElementId {
        self.form
    }

    /// The form control carrying `name`
    pub fn control_named(&self, page: &Page, name: &str) -> Option<ElementId> {
        self.controls
            .iter()
            .copied()
            .find(|&id| page.element(id).name() == Some(name))
    }

    /// Current state of every named control
    pub fn field_states(&self, page: &Page) -> Vec<FieldState> {
        self.controls
            .iter()
            .filter_map(|&id| {
                let el = page.element(id);
                let validity = if el.has_class(INVALID_CLASS) {
                    Validity::Invalid
                } else if el.has_class(VALID_CLASS) {
                    Validity::Valid
                } else {
                    Validity::Untouched
                };
                el.name().map(|name| FieldState {
                    name: name.to_string(),
                    value: el.value.clone(),
                    validity,
                })
            })
            .collect()
    }

    /// Blur: recompute validity from the current value and mark the field
    pub fn validate_field(&self, page: &mut Page, control: ElementId, rules: &FormConfig) -> bool {
        let el = page.element(control);
        let valid = validate_value(el.name().unwrap_or_default(), &el.value, rules);

        page.remove_class(control, VALID_CLASS);
        page.remove_class(control, INVALID_CLASS);
        page.add_class(control, if valid { VALID_CLASS } else { INVALID_CLASS });
        valid
    }

    /// Input: store the new value and clear any stale marker
    pub fn on_input(&self, page: &mut Page, control: ElementId, value: &str) {
        page.set_value(control, value);
        page.remove_class(control, VALID_CLASS);
        page.remove_class(control, INVALID_CLASS);
    }

    /// Snapshot the named controls; the first control wins for a repeated name.
    pub fn snapshot(&self, page: &Page) -> ContactSubmission {
        let mut submission = ContactSubmission::default();
        for field in FieldName::ALL {
            if let Some(id) = self.control_named(page, field.as_str()) {
                *submission.field_mut(field) = page.value(id).to_string();
            }
        }
        submission
    }

    /// Re-validate all four fields from the current form snapshot
    pub fn validate_form(&self, page: &Page, rules: &FormConfig) -> ValidationReport {
        self.snapshot(page).validate(rules)
    }

    /// Submit event
    pub fn on_submit(
        &mut self,
        page: &mut Page,
        scheduler: &mut Scheduler,
        config: &InteractConfig,
    ) -> SubmitAttempt {
        if self.is_submitting() {
            tracing::debug!("Submit ignored while a submission is in flight");
            return SubmitAttempt::Ignored;
        }

        self.hide(page, self.success_alert);
        self.hide(page, self.error_alert);

        let report = self.validate_form(page, &config.form);
        if !report.is_valid {
            tracing::debug!(errors = report.errors.len(), "Contact form rejected");
            self.show_errors(page, &report.errors);
            return SubmitAttempt::Rejected(report);
        }

        let Some(button) = self.submit else {
            return SubmitAttempt::NoControl;
        };

        let original_label = page.text(button).to_string();
        page.set_text(button, config.form.sending_label.as_str());
        page.set_disabled(button, true);
        page.add_class(button, LOADING_CLASS);

        self.state = SubmitState::Submitting {
            original_label,
            submission: self.snapshot(page),
        };
        scheduler.set_timeout(config.timing.submit_latency_ms, Task::CompleteSubmission);
        SubmitAttempt::Submitting
    }

    /// Handle [`Task::CompleteSubmission`]
    pub fn on_submission_complete(
        &mut self,
        page: &mut Page,
        scheduler: &mut Scheduler,
        config: &InteractConfig,
        tracker: &EventTracker,
    ) -> Option<SubmitOutcome> {
        let SubmitState::Submitting {
            original_label,
            submission,
        } = std::mem::replace(&mut self.state, SubmitState::Idle)
        else {
            return None;
        };

        if let Some(button) = self.submit {
            page.set_text(button, original_label);
            page.set_disabled(button, false);
            page.remove_class(button, LOADING_CLASS);
        }

        match self.transport.deliver(&submission) {
            Ok(()) => {
                self.show_success(page, scheduler, config.timing.success_dismiss_ms);
                self.reset(page);
                tracker.track("form_submit", "contact", "success");
                Some(SubmitOutcome::Delivered)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Contact form delivery failed");
                self.show_errors(page, &[format!("Your message could not be sent: {e}")]);
                tracker.track("form_submit", "contact", "failed");
                Some(SubmitOutcome::Failed(e))
            }
        }
    }

    /// Handle [`Task::DismissSuccess`]
    pub fn on_dismiss_success(&mut self, page: &mut Page, timer: TimerId) {
        if self.dismiss_timer == Some(timer) {
            self.dismiss_timer = None;
            self.hide(page, self.success_alert);
        }
    }

    fn show_errors(&self, page: &mut Page, errors: &[String]) {
        let (Some(message), Some(alert)) = (self.error_message, self.error_alert) else {
            return;
        };
        let body = errors
            .iter()
            .map(|e| format!("• {e}"))
            .collect::<Vec<_>>()
            .join("\n");
        page.set_text(message, body);
        page.remove_class(alert, HIDDEN_CLASS);
        page.scroll_into_view_nearest(alert);
    }

    fn show_success(&mut self, page: &mut Page, scheduler: &mut Scheduler, dismiss_ms: u64) {
        let Some(alert) = self.success_alert else {
            return;
        };
        page.remove_class(alert, HIDDEN_CLASS);
        page.scroll_into_view_nearest(alert);

        if let Some(previous) = self.dismiss_timer.take() {
            scheduler.clear(previous);
        }
        self.dismiss_timer = Some(scheduler.set_timeout(dismiss_ms, Task::DismissSuccess));
    }

    fn hide(&self, page: &mut Page, alert: Option<ElementId>) {
        if let Some(alert) = alert {
            page.add_class(alert, HIDDEN_CLASS);
        }
    }

    fn reset(&self, page: &mut Page) {
        for &control in &self.controls {
            page.set_value(control, "");
            page.remove_class(control, VALID_CLASS);
            page.remove_class(control, INVALID_CLASS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::MemorySink;
    use pretty_assertions::assert_eq;

    fn rules() -> FormConfig {
        FormConfig::default()
    }

    fn form_page() -> Page {
        Page::from_json(
            r#"{
                "body": [
                    { "tag": "form", "id": "contactForm", "children": [
                        { "tag": "input", "attrs": { "name": "name" } },
                        { "tag": "input", "attrs": { "name": "email" } },
                        { "tag": "input", "attrs": { "name": "subject" } },
                        { "tag": "textarea", "attrs": { "name": "message" } },
                        { "tag": "button", "id": "submitBtn", "text": "Send Message" }
                    ]},
                    { "id": "successAlert", "classes": ["d-none"] },
                    { "id": "errorAlert", "classes": ["d-none"], "children": [
                        { "tag": "span", "id": "errorMessage" }
                    ]}
                ]
            }"#,
        )
        .unwrap()
    }

    fn fill(form: &ContactForm, page: &mut Page, values: [&str; 4]) {
        for (field, value) in FieldName::ALL.iter().zip(values) {
            let id = form.control_named(page, field.as_str()).unwrap();
            form.on_input(page, id, value);
        }
    }

    struct FailingTransport;

    impl SubmitTransport for FailingTransport {
        fn deliver(&mut self, _: &ContactSubmission) -> Result<(), SubmitError> {
            Err(SubmitError::Timeout)
        }
    }

    #[test]
    fn test_length_boundaries() {
        let rules = rules();
        assert!(validate_value("name", "Al", &rules));
        assert!(!validate_value("name", "A", &rules));
        assert!(validate_value("subject", "Hello", &rules));
        assert!(!validate_value("subject", "Hell", &rules));
        assert!(validate_value("message", "0123456789", &rules));
        assert!(!validate_value("message", "012345678", &rules));
    }

    #[test]
    fn test_values_are_trimmed() {
        assert!(!validate_value("name", "  A  ", &rules()));
        assert!(validate_value("name", "  Al ", &rules()));
    }

    #[test]
    fn test_email_pattern() {
        let rules = rules();
        assert!(validate_value("email", "dev@example.com", &rules));
        assert!(validate_value("email", " a@b.co ", &rules));
        assert!(!validate_value("email", "dev@example", &rules));
        assert!(!validate_value("email", "dev example@x.com", &rules));
        assert!(!validate_value("email", "@example.com", &rules));
        assert!(!validate_value("email", "", &rules));
    }

    #[test]
    fn test_unknown_field_always_valid() {
        assert!(validate_value("phone", "", &rules()));
    }

    #[test]
    fn test_empty_form_reports_all_errors_in_order() {
        let report = ContactSubmission::default().validate(&rules());

        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec![
                "Name must be at least 2 characters long",
                "Please enter a valid email address",
                "Subject must be at least 5 characters long",
                "Message must be at least 10 characters long",
            ]
        );
    }

    #[test]
    fn test_valid_submission_has_no_errors() {
        let submission = ContactSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello there".to_string(),
            message: "I would like to talk.".to_string(),
        };
        assert_eq!(
            submission.validate(&rules()),
            ValidationReport {
                is_valid: true,
                errors: vec![]
            }
        );
    }

    #[test]
    fn test_blur_marks_and_input_clears() {
        let mut page = form_page();
        let form = ContactForm::attach(&page, Box::new(SimulatedTransport)).unwrap();
        let name = form.control_named(&page, "name").unwrap();

        form.on_input(&mut page, name, "A");
        assert!(!form.validate_field(&mut page, name, &rules()));
        assert_eq!(form.field_states(&page)[0].validity, Validity::Invalid);

        form.on_input(&mut page, name, "Ada");
        assert_eq!(form.field_states(&page)[0].validity, Validity::Untouched);

        assert!(form.validate_field(&mut page, name, &rules()));
        assert_eq!(form.field_states(&page)[0].validity, Validity::Valid);
    }

    #[test]
    fn test_invalid_submit_shows_errors_and_keeps_button() {
        let mut page = form_page();
        let mut form = ContactForm::attach(&page, Box::new(SimulatedTransport)).unwrap();
        let mut scheduler = Scheduler::new();
        fill(&form, &mut page, ["Ada", "nope", "Hello", "short"]);

        let attempt = form.on_submit(&mut page, &mut scheduler, &InteractConfig::default());

        assert!(matches!(attempt, SubmitAttempt::Rejected(ref r) if r.errors.len() == 2));
        let message = page.get_by_id(ERROR_MESSAGE_ID).unwrap();
        assert_eq!(
            page.text(message),
            "• Please enter a valid email address\n• Message must be at least 10 characters long"
        );
        let alert = page.get_by_id(ERROR_ALERT_ID).unwrap();
        assert!(!page.has_class(alert, "d-none"));
        let button = page.get_by_id(SUBMIT_ID).unwrap();
        assert!(!page.is_disabled(button));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_successful_submission_flow() {
        let mut page = form_page();
        let mut form = ContactForm::attach(&page, Box::new(SimulatedTransport)).unwrap();
        let mut scheduler = Scheduler::new();
        let sink = MemorySink::new();
        let tracker = EventTracker::new(sink.clone());
        let config = InteractConfig::default();
        fill(&form, &mut page, ["Ada", "ada@example.com", "Hello", "Let us build things"]);
        let button = page.get_by_id(SUBMIT_ID).unwrap();

        assert_eq!(
            form.on_submit(&mut page, &mut scheduler, &config),
            SubmitAttempt::Submitting
        );
        assert!(page.is_disabled(button));
        assert_eq!(page.text(button), "Sending...");
        assert!(page.has_class(button, "loading"));

        // double submission is impossible while in flight
        assert_eq!(
            form.on_submit(&mut page, &mut scheduler, &config),
            SubmitAttempt::Ignored
        );

        let (_, task) = scheduler.pop_due(2000).unwrap();
        assert_eq!(task, Task::CompleteSubmission);
        let outcome = form.on_submission_complete(&mut page, &mut scheduler, &config, &tracker);

        assert_eq!(outcome, Some(SubmitOutcome::Delivered));
        assert!(!page.is_disabled(button));
        assert_eq!(page.text(button), "Send Message");
        assert!(form.field_states(&page).iter().all(|f| f.value.is_empty()
            && f.validity == Validity::Untouched));
        let success = page.get_by_id(SUCCESS_ALERT_ID).unwrap();
        assert!(!page.has_class(success, "d-none"));
        assert_eq!(
            sink.actions(),
            vec![("form_submit".to_string(), "success".to_string())]
        );

        assert!(scheduler.pop_due(6999).is_none());
        let (timer, task) = scheduler.pop_due(7000).unwrap();
        assert_eq!(task, Task::DismissSuccess);
        form.on_dismiss_success(&mut page, timer);
        assert!(page.has_class(success, "d-none"));
    }

    #[test]
    fn test_notices_scroll_into_view() {
        let mut page = Page::from_json(
            r#"{
                "viewport": { "inner_height": 400, "scroll_height": 3000 },
                "body": [
                    { "tag": "form", "id": "contactForm", "top": 0, "height": 300, "children": [
                        { "tag": "input", "attrs": { "name": "name" } },
                        { "tag": "input", "attrs": { "name": "email" } },
                        { "tag": "input", "attrs": { "name": "subject" } },
                        { "tag": "textarea", "attrs": { "name": "message" } },
                        { "tag": "button", "id": "submitBtn", "text": "Send Message" }
                    ]},
                    { "id": "successAlert", "classes": ["d-none"], "top": 2000, "height": 60 },
                    { "id": "errorAlert", "classes": ["d-none"], "top": 2100, "height": 60, "children": [
                        { "tag": "span", "id": "errorMessage" }
                    ]}
                ]
            }"#,
        )
        .unwrap();
        let mut form = ContactForm::attach(&page, Box::new(SimulatedTransport)).unwrap();
        let mut scheduler = Scheduler::new();
        let tracker = EventTracker::new(MemorySink::new());
        let config = InteractConfig::default();

        // error notice below the viewport: bottom edge aligned
        form.on_submit(&mut page, &mut scheduler, &config);
        assert_eq!(page.scroll_y(), 1760.0);

        // success notice above the viewport: top edge aligned
        fill(&form, &mut page, ["Ada", "ada@example.com", "Hello", "Let us build things"]);
        form.on_submit(&mut page, &mut scheduler, &config);
        page.scroll_to(2600.0);
        scheduler.pop_due(2000).unwrap();
        form.on_submission_complete(&mut page, &mut scheduler, &config, &tracker);
        assert_eq!(page.scroll_y(), 2000.0);
    }

    #[test]
    fn test_failed_delivery_keeps_values_and_shows_error() {
        let mut page = form_page();
        let mut form = ContactForm::attach(&page, Box::new(FailingTransport)).unwrap();
        let mut scheduler = Scheduler::new();
        let sink = MemorySink::new();
        let tracker = EventTracker::new(sink.clone());
        let config = InteractConfig::default();
        fill(&form, &mut page, ["Ada", "ada@example.com", "Hello", "Let us build things"]);

        form.on_submit(&mut page, &mut scheduler, &config);
        scheduler.pop_due(2000).unwrap();
        let outcome = form.on_submission_complete(&mut page, &mut scheduler, &config, &tracker);

        assert_eq!(outcome, Some(SubmitOutcome::Failed(SubmitError::Timeout)));
        assert_eq!(form.snapshot(&page).name, "Ada");
        let message = page.get_by_id(ERROR_MESSAGE_ID).unwrap();
        assert_eq!(
            page.text(message),
            "• Your message could not be sent: request timed out"
        );
        assert!(!form.is_submitting());
        assert_eq!(
            sink.actions(),
            vec![("form_submit".to_string(), "failed".to_string())]
        );
    }

    #[test]
    fn test_missing_submit_button_is_noop() {
        let mut page = Page::from_json(
            r#"{ "body": [ { "tag": "form", "id": "contactForm", "children": [
                { "tag": "input", "attrs": { "name": "name" }, "value": "Ada" },
                { "tag": "input", "attrs": { "name": "email" }, "value": "ada@example.com" },
                { "tag": "input", "attrs": { "name": "subject" }, "value": "Hello" },
                { "tag": "textarea", "attrs": { "name": "message" }, "value": "0123456789" }
            ]} ] }"#,
        )
        .unwrap();
        let mut form = ContactForm::attach(&page, Box::new(SimulatedTransport)).unwrap();
        let mut scheduler = Scheduler::new();

        assert_eq!(
            form.on_submit(&mut page, &mut scheduler, &InteractConfig::default()),
            SubmitAttempt::NoControl
        );
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_no_form_disables_controller() {
        let page = Page::from_json(r#"{ "body": [] }"#).unwrap();
        assert!(ContactForm::attach(&page, Box::new(SimulatedTransport)).is_none());
    }
}
