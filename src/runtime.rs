//! Page runtime
//!
//! Owns the page, the timer queue, the tracker and every controller, and routes
//! host events to them. Controllers are initialised in page order: navigation,
//! hover lift, typing, parallax, contact form, reveal, analytics. Handlers for
//! one event type run in that same order.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::analytics::PageAnalytics;
use crate::config::InteractConfig;
use crate::dom::{ElementId, Page};
use crate::error::InteractError;
use crate::events::{PageEvent, ScriptStep, Target};
use crate::form::{ContactForm, SimulatedTransport, SubmitAttempt, SubmitTransport, SUBMIT_ID};
use crate::nav::{NavOutcome, NavigationController};
use crate::reveal::{HoverLift, ParallaxController, RevealController};
use crate::scroll::{ScrollMonitor, ScrollTrackingState};
use crate::timer::{Debouncer, Scheduler, Task, TimerId};
use crate::tracker::{EventSink, EventTracker, LogSink, VirtualClock};
use crate::typing::TypingEffect;

/// Builder for [`PortfolioRuntime`]
pub struct RuntimeBuilder {
    config: InteractConfig,
    sink: Box<dyn EventSink>,
    transport: Box<dyn SubmitTransport>,
    epoch: Option<DateTime<Utc>>,
    visit_id: Option<Uuid>,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self {
            config: InteractConfig::default(),
            sink: Box::new(LogSink),
            transport: Box::new(SimulatedTransport),
            epoch: None,
            visit_id: None,
        }
    }
}

impl RuntimeBuilder {
    pub fn config(mut self, config: InteractConfig) -> Self {
        self.config = config;
        self
    }

    /// Analytics destination (default: log lines)
    pub fn sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Submission backend (default: always succeeds)
    pub fn transport(mut self, transport: impl SubmitTransport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    /// Wall-clock time of page load; event timestamps are offset from it
    pub fn epoch(mut self, epoch: DateTime<Utc>) -> Self {
        self.epoch = Some(epoch);
        self
    }

    pub fn visit_id(mut self, visit_id: Uuid) -> Self {
        self.visit_id = Some(visit_id);
        self
    }

    /// Attach all controllers to `page` and fire the load-time work
    pub fn build(self, mut page: Page) -> PortfolioRuntime {
        let visit_id = self.visit_id.unwrap_or_else(Uuid::new_v4);
        let _span = tracing::debug_span!("page", visit = %visit_id).entered();

        let mut scheduler = Scheduler::new();
        let clock = VirtualClock::new(self.epoch.unwrap_or_else(Utc::now), scheduler.clock_handle());
        let tracker = EventTracker::with_clock(self.sink, clock);
        let config = self.config;

        let nav = NavigationController::attach(&page);
        let hover = HoverLift::attach(&page);
        let typing = TypingEffect::attach(&mut page, &mut scheduler, &config.timing, &config.effects);
        let parallax = ParallaxController::attach(&page);
        let form = ContactForm::attach(&page, self.transport);
        let mut reveal = RevealController::attach(&page);
        reveal.check(&mut page, &config.scroll);

        let mut analytics = PageAnalytics::new();
        analytics.on_load(&page, scheduler.now(), &tracker);

        tracing::debug!(
            elements = page.len(),
            form = form.is_some(),
            reveal = reveal.watching(),
            "Page runtime ready"
        );

        PortfolioRuntime {
            visit_id,
            depth_debounce: Debouncer::new(config.timing.scroll_depth_debounce_ms, Task::RecomputeScrollDepth),
            config,
            page,
            scheduler,
            tracker,
            nav,
            hover,
            typing,
            parallax,
            form,
            reveal,
            monitor: ScrollMonitor::new(),
            analytics,
        }
    }
}

/// One page visit
pub struct PortfolioRuntime {
    visit_id: Uuid,
    config: InteractConfig,
    page: Page,
    scheduler: Scheduler,
    tracker: EventTracker,
    nav: NavigationController,
    hover: HoverLift,
    typing: TypingEffect,
    parallax: ParallaxController,
    form: Option<ContactForm>,
    reveal: RevealController,
    monitor: ScrollMonitor,
    depth_debounce: Debouncer,
    analytics: PageAnalytics,
}

impl PortfolioRuntime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }

    /// Runtime with default configuration, log sink and simulated transport
    pub fn new(page: Page) -> Self {
        Self::builder().build(page)
    }

    /// Parse a page description and build a runtime around it
    pub fn from_json(page_json: &str, builder: RuntimeBuilder) -> Result<Self, InteractError> {
        Ok(builder.build(Page::from_json(page_json)?))
    }

    pub fn visit_id(&self) -> Uuid {
        self.visit_id
    }

    pub fn config(&self) -> &InteractConfig {
        &self.config
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Milliseconds since load
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }

    pub fn scroll_state(&self) -> &ScrollTrackingState {
        self.monitor.state()
    }

    pub fn typing(&self) -> &TypingEffect {
        &self.typing
    }

    pub fn contact_form(&self) -> Option<&ContactForm> {
        self.form.as_ref()
    }

    /// The tracker, for host code that reports its own events
    pub fn tracker(&self) -> &EventTracker {
        &self.tracker
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Fire every timer due up to `at_ms`, then set the clock there.
    pub fn advance_to(&mut self, at_ms: u64) {
        let _span = tracing::debug_span!("page", visit = %self.visit_id).entered();
        while let Some((id, task)) = self.scheduler.pop_due(at_ms) {
            self.run_task(id, task);
        }
        self.scheduler.set_now(at_ms);
    }

    pub fn advance_by(&mut self, ms: u64) {
        self.advance_to(self.now().saturating_add(ms));
    }

    fn run_task(&mut self, id: TimerId, task: Task) {
        match task {
            Task::TypeNextChar => {
                self.typing
                    .on_type_tick(&mut self.page, &mut self.scheduler, &self.config.timing)
            }
            Task::BlinkCursor => self.typing.on_blink(&mut self.page, &self.config.effects),
            Task::CompleteSubmission => {
                let scroll_y = self.page.scroll_y();
                if let Some(form) = self.form.as_mut() {
                    form.on_submission_complete(
                        &mut self.page,
                        &mut self.scheduler,
                        &self.config,
                        &self.tracker,
                    );
                }
                self.after_alert_scroll(scroll_y);
            }
            Task::DismissSuccess => {
                if let Some(form) = self.form.as_mut() {
                    form.on_dismiss_success(&mut self.page, id);
                }
            }
            Task::RecomputeScrollDepth => {
                self.depth_debounce.fired(id);
                self.monitor.record_depth(
                    self.page.scroll_y(),
                    self.page.scroll_height(),
                    self.page.inner_height(),
                    &self.tracker,
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Apply a script, advancing time to each step before dispatching it.
    pub fn replay(&mut self, steps: &[ScriptStep]) -> Result<(), InteractError> {
        for step in steps {
            if step.at_ms < self.now() {
                return Err(InteractError::TimeTravel {
                    at_ms: step.at_ms,
                    now_ms: self.now(),
                });
            }
            self.advance_to(step.at_ms);
            self.dispatch(step.event.clone());
        }
        Ok(())
    }

    /// Route one browser event to its handlers
    pub fn dispatch(&mut self, event: PageEvent) {
        let _span = tracing::debug_span!("page", visit = %self.visit_id).entered();

        match event {
            PageEvent::Scroll { y } => {
                self.page.scroll_to(y);
                self.on_scroll_tick();
            }
            PageEvent::Click { target } => {
                if let Some(el) = self.resolve(&target) {
                    self.on_click(el);
                }
            }
            PageEvent::Input { target, value } => {
                if let Some(el) = self.resolve(&target) {
                    match &self.form {
                        Some(form) if form.owns_control(el) => form.on_input(&mut self.page, el, &value),
                        _ => self.page.set_value(el, value),
                    }
                }
            }
            PageEvent::Blur { target } => {
                if let (Some(el), Some(form)) = (self.resolve(&target), &self.form) {
                    if form.owns_control(el) {
                        form.validate_field(&mut self.page, el, &self.config.form);
                    }
                }
            }
            PageEvent::Submit => {
                self.submit();
            }
            PageEvent::MouseEnter { target } => {
                if let Some(el) = self.resolve(&target) {
                    self.hover.on_enter(&mut self.page, el, &self.config.effects);
                }
            }
            PageEvent::MouseLeave { target } => {
                if let Some(el) = self.resolve(&target) {
                    self.hover.on_leave(&mut self.page, el);
                }
            }
            PageEvent::Unload => {
                self.analytics.on_unload(self.scheduler.now(), &self.tracker);
            }
            PageEvent::Error { message } => {
                self.analytics.on_error(&message, &self.tracker);
            }
            PageEvent::WorkerRegistration { ok, reason } => {
                let result = if ok {
                    Ok(())
                } else {
                    Err(reason.as_deref().unwrap_or("registration failed"))
                };
                self.analytics.on_worker_registration(result, &self.tracker);
            }
            PageEvent::NavigationTiming {
                load_event_start,
                load_event_end,
            } => {
                self.analytics
                    .on_navigation_timing(load_event_start, load_event_end, &self.tracker);
            }
        }
    }

    fn resolve(&self, target: &Target) -> Option<ElementId> {
        let resolved = target.resolve(&self.page);
        if resolved.is_none() {
            tracing::debug!(?target, "Event target not on page");
        }
        resolved
    }

    /// Every scroll tick: header, highlight, parallax, reveal, then re-arm the
    /// depth debounce.
    fn on_scroll_tick(&mut self) {
        let active = self.nav.on_scroll(&mut self.page, &self.config.scroll);
        self.monitor.set_active_section(active.as_deref());
        self.parallax.on_scroll(&mut self.page, &self.config.scroll);
        self.reveal.check(&mut self.page, &self.config.scroll);
        self.depth_debounce.trigger(&mut self.scheduler);
    }

    fn on_click(&mut self, el: ElementId) {
        if let Some(link) = self.nav.link_for(&self.page, el) {
            let outcome = self.nav.on_link_click(&mut self.page, link, &self.tracker);
            if matches!(outcome, NavOutcome::Scrolled(_)) {
                self.on_scroll_tick();
            }
        }

        if self.is_submit_control(el) {
            let disabled = self
                .page
                .get_by_id(SUBMIT_ID)
                .is_some_and(|button| self.page.is_disabled(button));
            if !disabled {
                self.submit();
            }
        }

        self.analytics.on_click(&self.page, el, &self.tracker);
    }

    fn is_submit_control(&self, el: ElementId) -> bool {
        let Some(form) = &self.form else {
            return false;
        };
        self.page.get_by_id(SUBMIT_ID).is_some_and(|button| {
            (button == el || self.page.is_descendant_of(el, button))
                && self.page.is_descendant_of(button, form.form())
        })
    }

    fn submit(&mut self) -> Option<SubmitAttempt> {
        let scroll_y = self.page.scroll_y();
        let form = self.form.as_mut()?;
        let attempt = form.on_submit(&mut self.page, &mut self.scheduler, &self.config);
        self.after_alert_scroll(scroll_y);
        Some(attempt)
    }

    /// A form notice scrolled into view moves the page like a user scroll.
    fn after_alert_scroll(&mut self, scroll_y: f64) {
        if self.page.scroll_y() != scroll_y {
            self.on_scroll_tick();
        }
    }
}
