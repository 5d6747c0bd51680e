use std::{
    collections::HashSet,
    panic::{AssertUnwindSafe, catch_unwind},
};

use std::borrow::Cow;

use crate::{Collaborators, Error, ErrorCategory, FrameworkHook, Label, MonitorOptions, Result};

/// Outcome of one category in an activation dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The collaborator was called and returned `Ok`.
    Activated,
    /// Skipped: the category was activated by an earlier call. For the
    /// framework adapter, only while the hook is the one it was activated with.
    AlreadyActive,
    /// The collaborator returned an error or panicked. The category stays
    /// inactive and is retried on the next dispatch.
    Failed(Error),
}

impl Activation {
    pub fn is_failed(&self) -> bool {
        matches!(self, Activation::Failed(_))
    }
}

/// Per-category outcomes of one activation dispatch, in activation order.
///
/// Categories disabled by the configuration do not appear at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationReport {
    outcomes: Vec<(ErrorCategory, Activation)>,
}

impl ActivationReport {
    pub fn outcome(&self, category: ErrorCategory) -> Option<&Activation> {
        self.outcomes
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, a)| a)
    }

    /// Categories whose collaborator was called successfully by this dispatch.
    pub fn activated(&self) -> impl Iterator<Item = ErrorCategory> + '_ {
        self.outcomes
            .iter()
            .filter(|(_, a)| matches!(a, Activation::Activated))
            .map(|(c, _)| *c)
    }

    pub fn failures(&self) -> impl Iterator<Item = (ErrorCategory, &Error)> + '_ {
        self.outcomes.iter().filter_map(|(c, a)| match a {
            Activation::Failed(e) => Some((*c, e)),
            _ => None,
        })
    }

    /// Returns `true` if no activation failed.
    pub fn is_clean(&self) -> bool {
        !self.outcomes.iter().any(|(_, a)| a.is_failed())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ErrorCategory, Activation)> {
        self.outcomes.iter()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Run a collaborator call, turning a panic into [`Error::CollaboratorPanicked`].
pub(crate) fn isolate(
    collaborator: impl Into<Cow<'static, str>>,
    f: impl FnOnce() -> Result,
) -> Result {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let err = Error::panicked(collaborator.into(), payload);
            tracing::error!(error = %err, "collaborator panicked");
            Err(err)
        }
    }
}

/// Activates error-capture collaborators according to the held options and
/// remembers which categories are already active.
#[derive(Debug, Default)]
pub(crate) struct ActivationDispatcher {
    active: HashSet<ErrorCategory>,
    // Hook the framework adapter was last activated with.
    framework_hook: Option<FrameworkHook>,
}

impl ActivationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, category: ErrorCategory) -> bool {
        self.active.contains(&category)
    }

    /// Forget every activation so the next dispatch calls all collaborators again.
    pub fn reset(&mut self) {
        self.active.clear();
        self.framework_hook = None;
    }

    pub fn dispatch(
        &mut self,
        options: &MonitorOptions,
        collaborators: &Collaborators,
    ) -> ActivationReport {
        let ctx = options.report_context();
        let mut report = ActivationReport::default();

        let plain = |this: &mut Self, report: &mut ActivationReport, category: ErrorCategory| {
            this.activate(report, category, || match collaborators.capture(category) {
                Some(capture) => capture.activate(&ctx),
                None => Ok(()),
            });
        };

        if options.activate_js_errors {
            plain(self, &mut report, ErrorCategory::Script);
            plain(self, &mut report, ErrorCategory::Promise);
            if let Some(hook) = options.framework.hook() {
                if self.framework_hook.as_ref() != Some(hook) {
                    self.active.remove(&ErrorCategory::Framework);
                }
                self.activate(&mut report, ErrorCategory::Framework, || {
                    collaborators.framework().activate(&ctx, hook)
                });
                if self.is_active(ErrorCategory::Framework) {
                    self.framework_hook = Some(hook.clone());
                }
            }
        }
        if options.activate_api_errors {
            plain(self, &mut report, ErrorCategory::Api);
        }
        if options.activate_resource_errors {
            plain(self, &mut report, ErrorCategory::Resource);
        }

        report
    }

    fn activate(
        &mut self,
        report: &mut ActivationReport,
        category: ErrorCategory,
        f: impl FnOnce() -> Result,
    ) {
        if self.active.contains(&category) {
            tracing::trace!(category = %category.label(), "already active, skipping");
            report.outcomes.push((category, Activation::AlreadyActive));
            return;
        }

        let label = category.label();
        match isolate(label.clone(), f) {
            Ok(()) => {
                tracing::debug!(category = %label, "activated");
                self.active.insert(category);
                report.outcomes.push((category, Activation::Activated));
            }
            Err(e) => {
                tracing::warn!(category = %label, error = %e, "activation failed");
                report.outcomes.push((category, Activation::Failed(e)));
            }
        }
    }
}
