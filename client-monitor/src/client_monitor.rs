use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    Collaborators, ErrorCategory, MonitorOptions, MonitorState, PartialOptions,
    RegistrationReport, ScheduleReport,
    activation::ActivationDispatcher,
    host::Host,
    performance::PerformanceScheduler,
};

/// Decides which capture subsystems run and wires performance recording to
/// the page lifecycle.
///
/// One `ClientMonitor` is created per page, with the page [`Host`] and the
/// [`Collaborators`] it drives. It owns the held [`MonitorOptions`]; every
/// entry point merges a [`PartialOptions`] into them first.
///
/// # Entry Points
///
/// - [`register(partial)`](Self::register) merges, activates every enabled
///   error-capture category, then (with `autoSendPerformance`) schedules
///   performance recording on load and, in single-page-app mode, on every
///   hash navigation.
/// - [`set_performance_config(partial)`](Self::set_performance_config)
///   merges and schedules one recording. For apps with history-based
///   routing, call it once per navigation.
///
/// # Example
///
/// ```rust
/// use client_monitor::{ClientMonitor, Collaborators, MonitorOptions, PartialOptions, host::Page};
///
/// let page = Page::loaded();
/// let collaborators = Collaborators::new(|options: &MonitorOptions| {
///     println!("recording performance for {}", options.service);
///     Ok(())
/// });
///
/// let mut monitor = ClientMonitor::new(page, collaborators);
/// let report = monitor.register(
///     &PartialOptions::new()
///         .with_service("shop")
///         .with_report_url("https://collector/x"),
/// );
/// assert!(report.is_clean());
/// ```
///
/// Calling `register` again re-merges the options but does not re-activate
/// categories that are already active; see
/// [`reset_activations`](Self::reset_activations).
pub struct ClientMonitor {
    options: Rc<RefCell<MonitorOptions>>,
    collaborators: Collaborators,
    activations: ActivationDispatcher,
    scheduler: PerformanceScheduler,
    state: MonitorState,
}

impl ClientMonitor {
    /// Create a monitor with default options. Nothing is activated or
    /// subscribed until the first entry point call.
    pub fn new<H: Host + 'static>(host: H, collaborators: Collaborators) -> Self {
        let options = Rc::new(RefCell::new(MonitorOptions::default()));
        let scheduler =
            PerformanceScheduler::new(Rc::new(host), collaborators.recorder(), options.clone());
        Self {
            options,
            collaborators,
            activations: ActivationDispatcher::new(),
            scheduler,
            state: MonitorState::Uninitialized,
        }
    }

    /// Page-wide setup: merge `partial`, activate error capture, then
    /// schedule performance recording if `autoSendPerformance` is on.
    ///
    /// Intended to be called once per page. Later calls merge again and
    /// only activate categories that are not active yet, plus the framework
    /// adapter when the hook has been replaced.
    pub fn register(&mut self, partial: &PartialOptions) -> RegistrationReport {
        self.merge(partial);

        let snapshot = self.options();
        let activation = self.activations.dispatch(&snapshot, &self.collaborators);

        let performance = if snapshot.auto_send_performance {
            Some(self.scheduler.schedule(true))
        } else {
            tracing::debug!("automatic performance sending disabled");
            None
        };

        RegistrationReport::new(activation, performance)
    }

    /// Merge `partial` and schedule one performance recording.
    ///
    /// Records immediately if the page has loaded, otherwise on `load`.
    /// Never subscribes to hash navigation: a history-based router calls
    /// this once per route change.
    pub fn set_performance_config(&mut self, partial: &PartialOptions) -> ScheduleReport {
        self.merge(partial);
        self.scheduler.schedule(false)
    }

    /// Forget which categories were activated so the next `register`
    /// activates every enabled category again.
    pub fn reset_activations(&mut self) {
        tracing::debug!("activation set cleared");
        self.activations.reset();
    }

    /// Cancel all pending load subscriptions and the navigation
    /// subscription. Returns how many were still live.
    ///
    /// The held options and activation set are kept; a later `register`
    /// subscribes again.
    pub fn teardown(&mut self) -> usize {
        let cancelled = self.scheduler.teardown();
        tracing::debug!(cancelled, "monitor torn down");
        cancelled
    }

    /// Snapshot of the held options.
    pub fn options(&self) -> MonitorOptions {
        self.options.borrow().clone()
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Returns `true` if `category` has been activated successfully.
    pub fn is_active(&self, category: ErrorCategory) -> bool {
        self.activations.is_active(category)
    }

    /// Returns `true` while the hash-navigation subscription is live.
    pub fn is_watching_navigation(&self) -> bool {
        self.scheduler.is_watching_navigation()
    }

    fn merge(&mut self, partial: &PartialOptions) {
        self.options.borrow_mut().merge(partial);
        if !self.state.is_configured() {
            self.state = MonitorState::Configured;
            let options = self.options.borrow();
            tracing::info!(
                service = %options.service,
                report_url = %options.report_url,
                "client monitor configured"
            );
        } else {
            tracing::debug!(?partial, "options merged");
        }
    }
}

impl fmt::Debug for ClientMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientMonitor")
            .field("options", &self.options)
            .field("activations", &self.activations)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{
        Activation, FrameworkHook, LoadOutcome, NavigationWatch,
        host::{HostSignal, Page},
        testing::{CallLog, Fault},
    };

    fn monitor(page: &Page) -> (ClientMonitor, CallLog) {
        let log = CallLog::new();
        let monitor = ClientMonitor::new(page.clone(), log.collaborators());
        (monitor, log)
    }

    #[test]
    fn starts_uninitialized_with_defaults() {
        let (monitor, log) = monitor(&Page::new());
        assert_eq!(monitor.state(), MonitorState::Uninitialized);
        assert_eq!(monitor.options(), MonitorOptions::default());
        assert!(log.calls().is_empty());
    }

    #[test]
    fn shop_scenario_on_loaded_page() {
        let page = Page::loaded();
        let (mut monitor, log) = monitor(&page);

        let report = monitor.register(
            &PartialOptions::new()
                .with_service("shop")
                .with_report_url("https://collector/x")
                .with_activate_resource_errors(false),
        );

        assert_eq!(monitor.state(), MonitorState::Configured);
        assert_eq!(log.activations(ErrorCategory::Script), 1);
        assert_eq!(log.activations(ErrorCategory::Promise), 1);
        assert_eq!(log.activations(ErrorCategory::Api), 1);
        assert_eq!(log.activations(ErrorCategory::Resource), 0);
        assert_eq!(log.recording_count(), 1);
        assert_eq!(
            report.performance().map(|p| &p.load),
            Some(&LoadOutcome::Recorded)
        );

        for category in [ErrorCategory::Script, ErrorCategory::Promise, ErrorCategory::Api] {
            let ctx = &log.contexts(category)[0];
            assert_eq!(ctx.service(), "shop");
            assert_eq!(ctx.report_url(), "https://collector/x");
        }
        let recorded = &log.recordings()[0];
        assert_eq!(recorded.service, "shop");
        assert_eq!(recorded.report_url, "https://collector/x");
        assert!(report.is_clean());
    }

    #[test]
    fn deferred_recording_waits_for_load() {
        let page = Page::new();
        let (mut monitor, log) = monitor(&page);

        let report = monitor.register(&PartialOptions::new().with_service("shop"));
        assert_eq!(
            report.performance().map(|p| &p.load),
            Some(&LoadOutcome::Deferred)
        );
        assert_eq!(log.recording_count(), 0);
        assert_eq!(log.activations(ErrorCategory::Script), 1);

        page.emit(HostSignal::Load);
        page.run_pending();
        assert_eq!(log.recording_count(), 1);
    }

    #[test]
    fn auto_send_off_schedules_nothing() {
        let page = Page::new();
        let (mut monitor, log) = monitor(&page);

        let report = monitor.register(
            &PartialOptions::new()
                .with_auto_send_performance(false)
                .with_single_page_app_mode(true),
        );

        assert!(report.performance().is_none());
        assert_eq!(page.subscriber_count(HostSignal::Load), 0);
        assert_eq!(page.subscriber_count(HostSignal::HashChange), 0);

        page.emit(HostSignal::Load);
        page.emit(HostSignal::HashChange);
        page.run_pending();
        assert_eq!(log.recording_count(), 0);

        let schedule = monitor.set_performance_config(&PartialOptions::new());
        assert_eq!(schedule.load, LoadOutcome::Recorded);
        assert_eq!(log.recording_count(), 1);
    }

    #[test]
    fn spa_navigation_uses_current_options() {
        let page = Page::new();
        let (mut monitor, log) = monitor(&page);

        let report = monitor.register(
            &PartialOptions::new()
                .with_service("shop")
                .with_single_page_app_mode(true),
        );
        assert_eq!(
            report.performance().map(|p| p.navigation),
            Some(NavigationWatch::Subscribed)
        );

        page.emit(HostSignal::Load);
        page.run_pending();
        assert_eq!(log.recording_count(), 1);

        page.emit(HostSignal::HashChange);
        page.run_pending();
        assert_eq!(log.recording_count(), 2);

        monitor.set_performance_config(&PartialOptions::new().with_page_path("/cart"));
        // Page is loaded, so the call above recorded once on its own.
        assert_eq!(log.recording_count(), 3);

        page.emit(HostSignal::HashChange);
        page.run_pending();
        let recordings = log.recordings();
        assert_eq!(recordings.len(), 4);
        assert_eq!(recordings[1].page_path, None);
        assert_eq!(recordings[3].page_path.as_deref(), Some("/cart"));
    }

    #[test]
    fn history_router_drives_recording_manually() {
        let page = Page::loaded();
        let (mut monitor, log) = monitor(&page);
        monitor.register(
            &PartialOptions::new()
                .with_auto_send_performance(false)
                .with_single_page_app_mode(true),
        );

        for path in ["/a", "/b"] {
            let schedule = monitor.set_performance_config(&PartialOptions::new().with_page_path(path));
            assert_eq!(schedule.navigation, NavigationWatch::Off);
        }

        assert_eq!(page.subscriber_count(HostSignal::HashChange), 0);
        let paths: Vec<_> = log
            .recordings()
            .into_iter()
            .map(|o| o.page_path.unwrap_or_default())
            .collect();
        assert_eq!(paths, vec!["/a", "/b"]);
    }

    #[test]
    fn set_performance_config_configures_monitor() {
        let (mut monitor, log) = monitor(&Page::loaded());
        monitor.set_performance_config(&PartialOptions::new().with_service("shop"));

        assert_eq!(monitor.state(), MonitorState::Configured);
        assert_eq!(monitor.options().service, "shop");
        assert_eq!(log.activations(ErrorCategory::Script), 0);
    }

    #[test]
    fn framework_adapter_follows_hook() {
        let (mut monitor, log) = monitor(&Page::loaded());
        monitor.register(&PartialOptions::new().with_activate_js_errors(true));
        assert_eq!(log.activations(ErrorCategory::Framework), 0);

        let hook = FrameworkHook::new("vue");
        let report = monitor.register(&PartialOptions::new().with_framework_hook(hook.clone()));

        assert_eq!(
            report.activation().outcome(ErrorCategory::Framework),
            Some(&Activation::Activated)
        );
        assert_eq!(log.framework_hooks(), vec![hook]);
    }

    #[test]
    fn replaced_hook_reaches_framework_adapter() {
        let (mut monitor, log) = monitor(&Page::loaded());
        let first = FrameworkHook::with_token("vue", 2_u8);
        let second = FrameworkHook::with_token("vue", 3_u8);

        monitor.register(&PartialOptions::new().with_framework_hook(first.clone()));
        let report = monitor.register(&PartialOptions::new().with_framework_hook(second.clone()));

        assert_eq!(
            report.activation().outcome(ErrorCategory::Framework),
            Some(&Activation::Activated)
        );
        assert_eq!(monitor.options().framework.hook(), Some(&second));
        assert_eq!(log.framework_hooks(), vec![first, second]);
        assert_eq!(log.activations(ErrorCategory::Script), 1);
    }

    #[test]
    fn reregistration_does_not_duplicate_work() {
        let page = Page::loaded();
        let (mut monitor, log) = monitor(&page);
        let partial = PartialOptions::new().with_single_page_app_mode(true);

        monitor.register(&partial);
        let second = monitor.register(&partial);

        assert_eq!(second.activation().activated().count(), 0);
        assert_eq!(log.activations(ErrorCategory::Script), 1);
        assert_eq!(page.subscriber_count(HostSignal::HashChange), 1);
        // The load branch is per call: the loaded page records each time.
        assert_eq!(log.recording_count(), 2);

        monitor.reset_activations();
        monitor.register(&partial);
        assert_eq!(log.activations(ErrorCategory::Script), 2);
    }

    #[test]
    fn failing_collaborator_is_reported_not_thrown() {
        let page = Page::loaded();
        let (mut monitor, log) = monitor(&page);
        log.fail_activation(ErrorCategory::Promise, Fault::Panic);
        log.fail_recording(Fault::Error);

        let report = monitor.register(&PartialOptions::new());

        assert!(!report.is_clean());
        assert_eq!(
            report.activation().failures().map(|(c, _)| c).collect::<Vec<_>>(),
            vec![ErrorCategory::Promise]
        );
        assert!(matches!(
            report.performance().map(|p| &p.load),
            Some(LoadOutcome::Failed(_))
        ));
        assert!(monitor.is_active(ErrorCategory::Api));
        assert!(!monitor.is_active(ErrorCategory::Promise));
    }

    #[test]
    fn teardown_stops_future_recordings() {
        let page = Page::new();
        let (mut monitor, log) = monitor(&page);
        monitor.register(&PartialOptions::new().with_single_page_app_mode(true));
        assert!(monitor.is_watching_navigation());

        assert_eq!(monitor.teardown(), 2);
        assert!(!monitor.is_watching_navigation());

        page.emit(HostSignal::Load);
        page.emit(HostSignal::HashChange);
        page.run_pending();
        assert_eq!(log.recording_count(), 0);
    }

    #[test]
    fn recorder_can_read_options_while_recording() {
        let page = Page::loaded();
        let seen = Rc::new(Cell::new(false));
        let flag = seen.clone();
        let collaborators = Collaborators::new(move |options: &MonitorOptions| {
            flag.set(options.use_first_meaningful_paint);
            Ok(())
        });
        let mut monitor = ClientMonitor::new(page, collaborators);

        monitor.register(&PartialOptions::new().with_use_first_meaningful_paint(true));
        assert!(seen.get());
    }
}
