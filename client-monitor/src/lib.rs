#![cfg_attr(docsrs, feature(doc_cfg))]
//! # client-monitor
//!
//! Decides which client-side telemetry runs on a page and when.
//!
//! A [`ClientMonitor`] holds the page's monitoring configuration, activates
//! the enabled error-capture subsystems (script errors, promise rejections,
//! a UI-framework hook, API errors, resource errors) and wires a
//! performance recorder to the page lifecycle: once on load, and again on
//! every hash navigation in single-page-app mode.
//!
//! How errors are captured, how metrics are computed and how anything is
//! sent over the network is left to the collaborators you plug in.
//!
//! ## Quick Start
//!
//! ```rust
//! use client_monitor::{ClientMonitor, Collaborators, MonitorOptions, PartialOptions, ReportContext};
//! use client_monitor::host::{HostSignal, Page};
//!
//! let collaborators = Collaborators::new(|options: &MonitorOptions| {
//!     println!("page timing for {}", options.service);
//!     Ok(())
//! })
//! .with_script_errors(|ctx: &ReportContext| {
//!     println!("script errors go to {}", ctx.report_url());
//!     Ok(())
//! });
//!
//! let page = Page::new();
//! let mut monitor = ClientMonitor::new(page.clone(), collaborators);
//!
//! let options = PartialOptions::from_json(
//!     r#"{ "service": "shop", "reportUrl": "https://collector/x", "enableSPA": true }"#,
//! )?;
//! let report = monitor.register(&options);
//! assert!(report.is_clean());
//!
//! // Recording waits for load, then repeats on each hash navigation.
//! page.emit(HostSignal::Load);
//! page.emit(HostSignal::HashChange);
//! assert_eq!(page.run_pending(), 2);
//! # Ok::<(), client_monitor::Error>(())
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ClientMonitor`] | Holds the configuration and drives the collaborators |
//! | [`MonitorOptions`] | The merged configuration |
//! | [`PartialOptions`] | A set of overrides, built in code or parsed from JSON |
//! | [`Collaborators`] | Capture subsystems and the performance recorder |
//! | [`ReportContext`] | Identity parameters passed to every capture subsystem |
//! | [`RegistrationReport`] | Per-category activation outcomes and scheduling result |
//! | [`host::Page`] | In-crate single-threaded page event loop |
//!
//! ## Configuration Merge
//!
//! Every entry point merges its [`PartialOptions`] into the held
//! configuration key by key. Absent keys keep their value; nested values
//! are replaced whole. The configuration starts at defaults and is never
//! reset.
//!
//! ## Failure Isolation
//!
//! Collaborators run one at a time inside their own boundary. An error or a
//! panic is recorded in the report and the remaining collaborators still
//! run; nothing is thrown back at the caller. Recorder failures inside page
//! handlers are logged through `tracing` and never reach the page loop.
//!
//! ## Features
//!
//! - **`test-harness`** - Recording collaborators with fault injection ([`testing::CallLog`])

mod activation;
mod category;
mod client_monitor;
mod collaborator;
mod context;
mod error;
mod framework;
mod label;
mod monitor_state;
mod options;
mod performance;
mod report;
mod subscription;

pub mod host;

#[cfg(any(test, feature = "test-harness"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-harness")))]
pub mod testing;

pub use activation::{Activation, ActivationReport};
pub use category::ErrorCategory;
pub use client_monitor::ClientMonitor;
pub use collaborator::{
    Collaborators, ErrorCapture, FrameworkCapture, NoopCapture, PerformanceRecorder,
};
pub use context::ReportContext;
pub use error::Error;
pub use framework::{Framework, FrameworkHook};
pub use label::Label;
pub use monitor_state::MonitorState;
pub use options::{MonitorOptions, PartialOptions};
pub use performance::{LoadOutcome, NavigationWatch, ScheduleReport};
pub use report::RegistrationReport;

/// Convenience alias for `Result<T, client_monitor::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
