use std::{fmt, rc::Rc};

use crate::{ErrorCategory, FrameworkHook, MonitorOptions, ReportContext, Result};

/// Activation entry point of an error-capture subsystem.
///
/// Called once per category per activation with the identity parameters of
/// the held configuration. The orchestrator keeps no handle to whatever the
/// subsystem installs; it only looks at the returned result to build its
/// [`ActivationReport`](crate::ActivationReport).
///
/// Implemented for any `Fn(&ReportContext) -> Result`:
///
/// ```rust
/// use client_monitor::{Collaborators, MonitorOptions, ReportContext};
///
/// let collaborators = Collaborators::new(|_: &MonitorOptions| Ok(()))
///     .with_script_errors(|ctx: &ReportContext| {
///         println!("capturing script errors for {}", ctx.service());
///         Ok(())
///     });
/// ```
pub trait ErrorCapture {
    fn activate(&self, context: &ReportContext) -> Result;
}

impl<F> ErrorCapture for F
where
    F: Fn(&ReportContext) -> Result,
{
    fn activate(&self, context: &ReportContext) -> Result {
        self(context)
    }
}

/// Activation entry point of a UI-framework error adapter.
///
/// Only called when the held configuration carries a
/// [`FrameworkHook`]; the hook is passed along untouched.
pub trait FrameworkCapture {
    fn activate(&self, context: &ReportContext, hook: &FrameworkHook) -> Result;
}

impl<F> FrameworkCapture for F
where
    F: Fn(&ReportContext, &FrameworkHook) -> Result,
{
    fn activate(&self, context: &ReportContext, hook: &FrameworkHook) -> Result {
        self(context, hook)
    }
}

/// Measures and reports timing/navigation data.
///
/// Receives the full held configuration, so recorder-specific keys such as
/// `use_first_meaningful_paint` or anything in `extra` reach it unchanged.
pub trait PerformanceRecorder {
    fn record(&self, options: &MonitorOptions) -> Result;
}

impl<F> PerformanceRecorder for F
where
    F: Fn(&MonitorOptions) -> Result,
{
    fn record(&self, options: &MonitorOptions) -> Result {
        self(options)
    }
}

/// Capture slot that accepts every activation and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCapture;

impl ErrorCapture for NoopCapture {
    fn activate(&self, _context: &ReportContext) -> Result {
        Ok(())
    }
}

impl FrameworkCapture for NoopCapture {
    fn activate(&self, _context: &ReportContext, _hook: &FrameworkHook) -> Result {
        Ok(())
    }
}

/// The set of collaborators a [`ClientMonitor`](crate::ClientMonitor) drives.
///
/// Every capture slot starts as [`NoopCapture`]; install real subsystems
/// with the `with_*` methods.
pub struct Collaborators {
    script: Box<dyn ErrorCapture>,
    promise: Box<dyn ErrorCapture>,
    framework: Box<dyn FrameworkCapture>,
    api: Box<dyn ErrorCapture>,
    resource: Box<dyn ErrorCapture>,
    recorder: Rc<dyn PerformanceRecorder>,
}

impl Collaborators {
    pub fn new<R: PerformanceRecorder + 'static>(recorder: R) -> Self {
        Self {
            script: Box::new(NoopCapture),
            promise: Box::new(NoopCapture),
            framework: Box::new(NoopCapture),
            api: Box::new(NoopCapture),
            resource: Box::new(NoopCapture),
            recorder: Rc::new(recorder),
        }
    }

    pub fn with_script_errors<C: ErrorCapture + 'static>(mut self, capture: C) -> Self {
        self.script = Box::new(capture);
        self
    }

    pub fn with_promise_errors<C: ErrorCapture + 'static>(mut self, capture: C) -> Self {
        self.promise = Box::new(capture);
        self
    }

    pub fn with_framework_errors<C: FrameworkCapture + 'static>(mut self, capture: C) -> Self {
        self.framework = Box::new(capture);
        self
    }

    pub fn with_api_errors<C: ErrorCapture + 'static>(mut self, capture: C) -> Self {
        self.api = Box::new(capture);
        self
    }

    pub fn with_resource_errors<C: ErrorCapture + 'static>(mut self, capture: C) -> Self {
        self.resource = Box::new(capture);
        self
    }

    /// Returns the capture slot for a category that does not take a hook.
    ///
    /// Returns `None` for [`ErrorCategory::Framework`]; use
    /// [`framework`](Self::framework) for that one.
    pub fn capture(&self, category: ErrorCategory) -> Option<&dyn ErrorCapture> {
        match category {
            ErrorCategory::Script => Some(self.script.as_ref()),
            ErrorCategory::Promise => Some(self.promise.as_ref()),
            ErrorCategory::Api => Some(self.api.as_ref()),
            ErrorCategory::Resource => Some(self.resource.as_ref()),
            ErrorCategory::Framework => None,
        }
    }

    pub fn framework(&self) -> &dyn FrameworkCapture {
        self.framework.as_ref()
    }

    pub(crate) fn recorder(&self) -> Rc<dyn PerformanceRecorder> {
        self.recorder.clone()
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
