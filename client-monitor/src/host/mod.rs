//! Page environment the orchestrator wires itself into.
//!
//! The [`Host`] trait is the narrow surface the orchestrator needs from a
//! page: a ready-state query and signal subscriptions. [`Page`] is the
//! in-crate implementation, a single-threaded signal queue that a browser
//! bridge (or a test) feeds, and [`SignalPump`] drives a `Page` from an
//! asynchronous signal source.
//!
//! # Example
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//! use client_monitor::host::{Delivery, Host, HostSignal, Page};
//!
//! let page = Page::new();
//! let fired = Rc::new(Cell::new(0));
//! let counter = fired.clone();
//! page.subscribe(HostSignal::Load, Delivery::Once, Box::new(move |_| {
//!     counter.set(counter.get() + 1);
//! }));
//!
//! page.emit(HostSignal::Load);
//! page.run_pending();
//! assert_eq!(fired.get(), 1);
//! ```

mod page;
mod pump;

use std::fmt;

pub use page::Page;
pub use pump::{SignalPump, SignalSender};

/// Identifier of a signal subscription, unique per host.
pub type SubscriptionId = u32;

/// Callback invoked by the host when a subscribed signal fires.
pub type SignalHandler = Box<dyn FnMut(HostSignal)>;

/// Document loading state, as reported by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn is_complete(&self) -> bool {
        matches!(self, ReadyState::Complete)
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReadyState::Loading => "loading",
            ReadyState::Interactive => "interactive",
            ReadyState::Complete => "complete",
        })
    }
}

/// Page signals the orchestrator subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostSignal {
    /// Page finished loading. Fires once.
    Load,
    /// In-page hash navigation. Fires once per route change.
    HashChange,
}

impl fmt::Display for HostSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HostSignal::Load => "load",
            HostSignal::HashChange => "hashchange",
        })
    }
}

/// How long a subscription stays registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delivery {
    /// Removed before its handler runs for the first time.
    Once,
    /// Stays until explicitly unsubscribed.
    Persistent,
}

/// The page surface the orchestrator depends on.
///
/// Implementations are single-threaded: handlers are queued callbacks run
/// by the host's own loop, never concurrently with each other.
pub trait Host {
    /// Current loading state. Queried once per scheduling decision.
    fn ready_state(&self) -> ReadyState;

    /// Register `handler` for `signal` and return its id.
    fn subscribe(
        &self,
        signal: HostSignal,
        delivery: Delivery,
        handler: SignalHandler,
    ) -> SubscriptionId;

    /// Remove a subscription. Returns `false` if it was not registered
    /// (already delivered once, or already removed).
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Returns `true` while the subscription is registered.
    fn is_subscribed(&self, id: SubscriptionId) -> bool;
}
