use std::fmt;

/// Position of a [`ClientMonitor`](crate::ClientMonitor) in its lifecycle.
///
/// The first call to `register` or `set_performance_config` moves the
/// monitor to [`Configured`](Self::Configured), where it stays for the rest
/// of the page lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonitorState {
    #[default]
    Uninitialized,
    Configured,
}

impl MonitorState {
    pub fn is_configured(&self) -> bool {
        matches!(self, MonitorState::Configured)
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MonitorState::Uninitialized => "uninitialized",
            MonitorState::Configured => "configured",
        })
    }
}
