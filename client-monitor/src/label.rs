use std::borrow::Cow;

/// Human-readable label for an error category.
///
/// Used in log fields and as the collaborator name in panic errors.
///
/// # Example
///
/// ```rust
/// use client_monitor::{ErrorCategory, Label};
///
/// assert_eq!(ErrorCategory::Api.label(), "api-errors");
/// ```
pub trait Label {
    /// Returns a human-readable label for this item.
    fn label(&self) -> Cow<'static, str>;
}
