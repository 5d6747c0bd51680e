use std::{cell::RefCell, rc::Rc};

use crate::{
    Error, MonitorOptions, PerformanceRecorder, Result,
    activation::isolate,
    subscription::Subscription,
    host::{Delivery, Host, HostSignal, SignalHandler},
};

/// What happened to the page-load recording of one scheduling call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was already loaded; the recorder ran synchronously.
    Recorded,
    /// The page was already loaded; the recorder ran and failed.
    Failed(Error),
    /// The page is still loading; the recorder runs when `load` fires.
    Deferred,
}

/// State of the hash-navigation subscription after a scheduling call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationWatch {
    /// Single-page-app mode is off, or the call never watches navigation.
    Off,
    /// A persistent navigation subscription was registered by this call.
    Subscribed,
    /// A navigation subscription from an earlier call is still live.
    AlreadySubscribed,
}

/// Outcome of one performance scheduling call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleReport {
    pub load: LoadOutcome,
    pub navigation: NavigationWatch,
}

/// Wires the performance recorder to the page lifecycle.
///
/// Handlers read the shared options when they fire, so a recording always
/// sees the configuration current at that moment.
pub(crate) struct PerformanceScheduler {
    host: Rc<dyn Host>,
    recorder: Rc<dyn PerformanceRecorder>,
    options: Rc<RefCell<MonitorOptions>>,
    pending_loads: Vec<Subscription>,
    navigation: Option<Subscription>,
}

impl PerformanceScheduler {
    pub fn new(
        host: Rc<dyn Host>,
        recorder: Rc<dyn PerformanceRecorder>,
        options: Rc<RefCell<MonitorOptions>>,
    ) -> Self {
        Self {
            host,
            recorder,
            options,
            pending_loads: Vec::new(),
            navigation: None,
        }
    }

    /// Record now if the page is loaded, otherwise once on `load`. With
    /// `watch_navigation` and single-page-app mode on, also record on every
    /// hash navigation.
    pub fn schedule(&mut self, watch_navigation: bool) -> ScheduleReport {
        let ready_state = self.host.ready_state();
        let load = if ready_state.is_complete() {
            match record(&self.recorder, &self.options) {
                Ok(()) => LoadOutcome::Recorded,
                Err(e) => LoadOutcome::Failed(e),
            }
        } else {
            self.pending_loads.retain(Subscription::is_live);
            let sub = Subscription::new(
                self.host.clone(),
                HostSignal::Load,
                Delivery::Once,
                self.handler(),
            );
            self.pending_loads.push(sub);
            LoadOutcome::Deferred
        };

        let spa = self.options.borrow().enable_single_page_app_mode;
        let navigation = if !(watch_navigation && spa) {
            NavigationWatch::Off
        } else if self.is_watching_navigation() {
            NavigationWatch::AlreadySubscribed
        } else {
            self.navigation = Some(Subscription::new(
                self.host.clone(),
                HostSignal::HashChange,
                Delivery::Persistent,
                self.handler(),
            ));
            NavigationWatch::Subscribed
        };

        tracing::debug!(%ready_state, ?load, ?navigation, "performance scheduled");
        ScheduleReport { load, navigation }
    }

    pub fn is_watching_navigation(&self) -> bool {
        self.navigation.as_ref().is_some_and(Subscription::is_live)
    }

    /// Cancel every live subscription. Returns how many were cancelled.
    pub fn teardown(&mut self) -> usize {
        let loads = self.pending_loads.drain(..);
        let navigation = self.navigation.take();
        loads.chain(navigation).filter(|s| s.cancel()).count()
    }

    fn handler(&self) -> SignalHandler {
        let recorder = self.recorder.clone();
        let options = self.options.clone();
        Box::new(move |signal| {
            if let Err(e) = record(&recorder, &options) {
                tracing::error!(signal = %signal, error = %e, "performance recording failed");
            }
        })
    }
}

fn record(
    recorder: &Rc<dyn PerformanceRecorder>,
    options: &Rc<RefCell<MonitorOptions>>,
) -> Result {
    // Snapshot first: the recorder may re-enter the monitor and merge.
    let snapshot = options.borrow().clone();
    isolate("performance-recorder", || recorder.record(&snapshot))
}
