use std::{borrow::Cow, fmt};

use crate::Label;

/// Categories of error capture the orchestrator can activate.
///
/// | Category | Enabled by | Collaborator |
/// |----------|------------|--------------|
/// | [`Script`](Self::Script) | `activateJsErrors` | [`ErrorCapture`](crate::ErrorCapture) |
/// | [`Promise`](Self::Promise) | `activateJsErrors` | [`ErrorCapture`](crate::ErrorCapture) |
/// | [`Framework`](Self::Framework) | `activateJsErrors` + a framework hook | [`FrameworkCapture`](crate::FrameworkCapture) |
/// | [`Api`](Self::Api) | `activateApiErrors` | [`ErrorCapture`](crate::ErrorCapture) |
/// | [`Resource`](Self::Resource) | `activateResourceErrors` | [`ErrorCapture`](crate::ErrorCapture) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCategory {
    /// Uncaught script errors.
    Script,
    /// Unhandled promise rejections.
    Promise,
    /// Errors reported through a UI-framework error hook.
    Framework,
    /// Failed network/API requests.
    Api,
    /// Resources (scripts, images, stylesheets) that failed to load.
    Resource,
}

impl ErrorCategory {
    /// All categories, in activation order.
    pub const ALL: [ErrorCategory; 5] = [
        ErrorCategory::Script,
        ErrorCategory::Promise,
        ErrorCategory::Framework,
        ErrorCategory::Api,
        ErrorCategory::Resource,
    ];
}

impl Label for ErrorCategory {
    fn label(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self {
            ErrorCategory::Script => "script-errors",
            ErrorCategory::Promise => "promise-errors",
            ErrorCategory::Framework => "framework-errors",
            ErrorCategory::Api => "api-errors",
            ErrorCategory::Resource => "resource-errors",
        })
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
