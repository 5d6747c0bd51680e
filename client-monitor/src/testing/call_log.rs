use std::{borrow::Cow, cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{
    Collaborators, Error, ErrorCategory, FrameworkHook, Label, MonitorOptions,
    PerformanceRecorder, ReportContext, Result,
    testing::spies::{CaptureSpy, FrameworkSpy, RecorderSpy},
};

/// One successful collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Activated(ErrorCategory, ReportContext),
    FrameworkActivated(ReportContext, FrameworkHook),
    Recorded(MonitorOptions),
}

/// How an injected failure behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// Return [`InjectedFault`] wrapped in [`Error::External`].
    Error,
    /// Panic inside the collaborator.
    Panic,
}

/// Error returned by a collaborator configured with [`Fault::Error`].
#[derive(Debug, thiserror::Error)]
#[error("injected fault in {0}")]
pub struct InjectedFault(pub Cow<'static, str>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum Target {
    Capture(ErrorCategory),
    Recorder,
}

impl Target {
    fn name(&self) -> Cow<'static, str> {
        match self {
            Target::Capture(category) => category.label(),
            Target::Recorder => Cow::Borrowed("performance-recorder"),
        }
    }
}

#[derive(Default)]
struct LogInner {
    calls: Vec<Call>,
    faults: HashMap<Target, Fault>,
}

/// Shared log of every successful collaborator call.
///
/// Clones share the same log. Failed calls (injected faults) are not logged.
#[derive(Clone, Default)]
pub struct CallLog {
    inner: Rc<RefCell<LogInner>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collaborators whose every slot records into this log.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(RecorderSpy::new(self.clone()))
            .with_script_errors(CaptureSpy::new(self.clone(), ErrorCategory::Script))
            .with_promise_errors(CaptureSpy::new(self.clone(), ErrorCategory::Promise))
            .with_framework_errors(FrameworkSpy::new(self.clone()))
            .with_api_errors(CaptureSpy::new(self.clone(), ErrorCategory::Api))
            .with_resource_errors(CaptureSpy::new(self.clone(), ErrorCategory::Resource))
    }

    /// A recorder that records into this log.
    pub fn recorder(&self) -> Rc<dyn PerformanceRecorder> {
        Rc::new(RecorderSpy::new(self.clone()))
    }

    /// Make activations of `category` fail until [`clear_faults`](Self::clear_faults).
    pub fn fail_activation(&self, category: ErrorCategory, fault: Fault) {
        self.inner
            .borrow_mut()
            .faults
            .insert(Target::Capture(category), fault);
    }

    /// Make recordings fail until [`clear_faults`](Self::clear_faults).
    pub fn fail_recording(&self, fault: Fault) {
        self.inner.borrow_mut().faults.insert(Target::Recorder, fault);
    }

    pub fn clear_faults(&self) {
        self.inner.borrow_mut().faults.clear();
    }

    /// Forget all logged calls. Injected faults are kept.
    pub fn clear(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// Snapshot of every logged call, in call order.
    pub fn calls(&self) -> Vec<Call> {
        self.inner.borrow().calls.clone()
    }

    /// Number of successful activations of `category`.
    pub fn activations(&self, category: ErrorCategory) -> usize {
        self.contexts(category).len()
    }

    /// Contexts passed to each successful activation of `category`.
    pub fn contexts(&self, category: ErrorCategory) -> Vec<ReportContext> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Activated(c, ctx) if *c == category => Some(ctx.clone()),
                Call::FrameworkActivated(ctx, _) if category == ErrorCategory::Framework => {
                    Some(ctx.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Hooks passed to each successful framework activation.
    pub fn framework_hooks(&self) -> Vec<FrameworkHook> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::FrameworkActivated(_, hook) => Some(hook.clone()),
                _ => None,
            })
            .collect()
    }

    /// Options passed to each successful recording.
    pub fn recordings(&self) -> Vec<MonitorOptions> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Recorded(options) => Some(options.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn recording_count(&self) -> usize {
        self.recordings().len()
    }

    /// Apply any injected fault for `target`, otherwise log `call`.
    pub(super) fn hit(&self, target: Target, call: Call) -> Result {
        let fault = self.inner.borrow().faults.get(&target).copied();
        match fault {
            Some(Fault::Panic) => panic!("injected panic in {}", target.name()),
            Some(Fault::Error) => Err(Error::external(InjectedFault(target.name()))),
            None => {
                self.inner.borrow_mut().calls.push(call);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for CallLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("CallLog")
            .field("calls", &inner.calls.len())
            .field("faults", &inner.faults)
            .finish()
    }
}
