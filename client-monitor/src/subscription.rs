use std::{fmt, rc::Rc};

use crate::host::{Delivery, Host, HostSignal, SignalHandler, SubscriptionId};

/// Handle to a signal subscription registered by the orchestrator.
///
/// Dropping the handle does not unsubscribe: subscriptions live for the
/// page lifetime unless [`cancel`](Self::cancel) is called.
pub(crate) struct Subscription {
    id: SubscriptionId,
    signal: HostSignal,
    delivery: Delivery,
    host: Rc<dyn Host>,
}

impl Subscription {
    pub fn new(
        host: Rc<dyn Host>,
        signal: HostSignal,
        delivery: Delivery,
        handler: SignalHandler,
    ) -> Self {
        let id = host.subscribe(signal, delivery, handler);
        tracing::debug!(id, signal = %signal, ?delivery, "subscribed");
        Self {
            id,
            signal,
            delivery,
            host,
        }
    }

    /// Returns `true` until the subscription is cancelled or, for a one-shot
    /// subscription, until it has fired.
    pub fn is_live(&self) -> bool {
        self.host.is_subscribed(self.id)
    }

    /// Remove the subscription from the host.
    ///
    /// Returns `false` if it was no longer registered.
    pub fn cancel(&self) -> bool {
        let removed = self.host.unsubscribe(self.id);
        if removed {
            tracing::debug!(id = self.id, signal = %self.signal, "unsubscribed");
        }
        removed
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("signal", &self.signal)
            .field("delivery", &self.delivery)
            .finish_non_exhaustive()
    }
}
