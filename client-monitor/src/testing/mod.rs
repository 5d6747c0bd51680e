//! Recording collaborators for asserting on orchestrator behavior.
//!
//! Enable with the `test-harness` feature:
//!
//! ```toml
//! [dev-dependencies]
//! client-monitor = { version = "0.1", features = ["test-harness"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use client_monitor::{ClientMonitor, ErrorCategory, PartialOptions, host::Page};
//! use client_monitor::testing::{CallLog, Fault};
//!
//! let log = CallLog::new();
//! log.fail_activation(ErrorCategory::Api, Fault::Panic);
//!
//! let mut monitor = ClientMonitor::new(Page::loaded(), log.collaborators());
//! let report = monitor.register(&PartialOptions::new().with_service("shop"));
//!
//! assert_eq!(1, log.activations(ErrorCategory::Script));
//! assert_eq!(1, log.recording_count());
//! assert!(!report.is_clean());
//! ```
//!
//! # Note
//!
//! The log uses `Rc` internally and is `!Send`, like everything else
//! driven by the single-threaded page loop.

mod call_log;
mod spies;

pub use call_log::{Call, CallLog, Fault, InjectedFault};
