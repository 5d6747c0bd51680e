use crate::{
    ErrorCapture, ErrorCategory, FrameworkCapture, FrameworkHook, MonitorOptions,
    PerformanceRecorder, ReportContext, Result,
    testing::{Call, CallLog, call_log::Target},
};

pub(crate) struct CaptureSpy {
    log: CallLog,
    category: ErrorCategory,
}

impl CaptureSpy {
    pub fn new(log: CallLog, category: ErrorCategory) -> Self {
        Self { log, category }
    }
}

impl ErrorCapture for CaptureSpy {
    fn activate(&self, context: &ReportContext) -> Result {
        self.log.hit(
            Target::Capture(self.category),
            Call::Activated(self.category, context.clone()),
        )
    }
}

pub(crate) struct FrameworkSpy {
    log: CallLog,
}

impl FrameworkSpy {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl FrameworkCapture for FrameworkSpy {
    fn activate(&self, context: &ReportContext, hook: &FrameworkHook) -> Result {
        self.log.hit(
            Target::Capture(ErrorCategory::Framework),
            Call::FrameworkActivated(context.clone(), hook.clone()),
        )
    }
}

pub(crate) struct RecorderSpy {
    log: CallLog,
}

impl RecorderSpy {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl PerformanceRecorder for RecorderSpy {
    fn record(&self, options: &MonitorOptions) -> Result {
        self.log.hit(Target::Recorder, Call::Recorded(options.clone()))
    }
}
