use std::fmt;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use super::{HostSignal, Page};
use crate::{Error, Result};

/// Sending half of a [`SignalPump`].
///
/// Cheap to clone and `Send`, so a bridge running elsewhere (a DOM event
/// listener, a test driver) can forward signals into the page loop.
#[derive(Debug, Clone)]
pub struct SignalSender(UnboundedSender<HostSignal>);

impl SignalSender {
    /// Forward a signal to the page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostUnavailable`] if the pump has been dropped.
    pub fn send(&self, signal: HostSignal) -> Result {
        self.0.send(signal).map_err(|_| Error::HostUnavailable)
    }
}

/// Drives a [`Page`] from an asynchronous signal source.
///
/// Every received signal is emitted on the page and dispatched right away,
/// so handlers run in the order signals arrive. The pump holds `Rc` state
/// and must run on a current-thread runtime or inside a `LocalSet`.
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> client_monitor::Result {
/// use client_monitor::host::{HostSignal, Page, SignalPump};
///
/// let page = Page::new();
/// let (pump, sender) = SignalPump::new(page.clone());
///
/// sender.send(HostSignal::Load)?;
/// drop(sender);
///
/// assert_eq!(pump.run().await, 1);
/// assert!(page.pending() == 0);
/// # Ok(())
/// # }
/// ```
pub struct SignalPump {
    page: Page,
    receiver: UnboundedReceiver<HostSignal>,
}

impl SignalPump {
    pub fn new(page: Page) -> (Self, SignalSender) {
        let (tx, rx) = unbounded_channel();
        let pump = Self { page, receiver: rx };
        (pump, SignalSender(tx))
    }

    /// Receive and dispatch signals until every sender is dropped.
    ///
    /// Returns the number of signals processed.
    pub async fn run(mut self) -> usize {
        let mut processed = 0;
        while let Some(signal) = self.receiver.recv().await {
            self.page.emit(signal);
            let calls = self.page.run_pending();
            tracing::trace!(signal = %signal, handlers = calls, "signal pumped");
            processed += 1;
        }
        tracing::debug!(processed, "signal source closed");
        processed
    }
}

impl fmt::Debug for SignalPump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalPump")
            .field("page", &self.page)
            .field("receiver", &self.receiver)
            .finish()
    }
}
