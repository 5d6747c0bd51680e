use std::{any::Any, borrow::Cow, sync::Arc};

/// The single error type for all client-monitor operations.
///
/// Every fallible API returns `client_monitor::Result<T>` (alias for
/// `Result<T, client_monitor::Error>`). Collaborators report their own
/// failures through [`Error::external`], so a capture subsystem or a
/// performance recorder only needs to produce one error type.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("External error: {0}")]
    External(#[source] Arc<dyn std::error::Error + Send + Sync>),

    #[error("Collaborator '{collaborator}' panicked: {message}")]
    CollaboratorPanicked {
        collaborator: Cow<'static, str>,
        message: String,
    },

    #[error("Invalid options: {0}")]
    InvalidOptions(#[source] Arc<serde_json::Error>),

    #[error("Host is no longer available")]
    HostUnavailable,
}

impl Error {
    pub fn external(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::External(Arc::new(e))
    }

    /// Build an error from a caught panic payload.
    pub(crate) fn panicked(collaborator: Cow<'static, str>, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Error::CollaboratorPanicked {
            collaborator,
            message,
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::External(a), Self::External(b)) => Arc::ptr_eq(a, b),
            (
                Self::CollaboratorPanicked {
                    collaborator: c1,
                    message: m1,
                },
                Self::CollaboratorPanicked {
                    collaborator: c2,
                    message: m2,
                },
            ) => c1 == c2 && m1 == m2,
            (Self::InvalidOptions(a), Self::InvalidOptions(b)) => Arc::ptr_eq(a, b),
            (Self::HostUnavailable, Self::HostUnavailable) => true,
            _ => false,
        }
    }
}

impl Eq for Error {}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidOptions(Arc::new(e))
    }
}
