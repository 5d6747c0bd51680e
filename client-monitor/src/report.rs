use crate::{ActivationReport, LoadOutcome, ScheduleReport};

/// Everything one [`ClientMonitor::register`](crate::ClientMonitor::register)
/// call did.
///
/// Registration never fails as a whole: collaborator failures are isolated
/// and collected here instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReport {
    activation: ActivationReport,
    performance: Option<ScheduleReport>,
}

impl RegistrationReport {
    pub(crate) fn new(activation: ActivationReport, performance: Option<ScheduleReport>) -> Self {
        Self {
            activation,
            performance,
        }
    }

    pub fn activation(&self) -> &ActivationReport {
        &self.activation
    }

    /// `None` when `autoSendPerformance` was off and nothing was scheduled.
    pub fn performance(&self) -> Option<&ScheduleReport> {
        self.performance.as_ref()
    }

    /// Returns `true` if no activation and no synchronous recording failed.
    pub fn is_clean(&self) -> bool {
        let recorded_ok = !matches!(
            self.performance.as_ref().map(|p| &p.load),
            Some(LoadOutcome::Failed(_))
        );
        self.activation.is_clean() && recorded_ok
    }
}
