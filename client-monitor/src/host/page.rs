use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use super::{Delivery, Host, HostSignal, ReadyState, SignalHandler, SubscriptionId};

struct SubscriberEntry {
    id: SubscriptionId,
    signal: HostSignal,
    delivery: Delivery,
    // Taken out while the handler runs so it can re-enter the page.
    handler: Option<SignalHandler>,
}

#[derive(Default)]
struct PageInner {
    ready_state: ReadyState,
    subscribers: Vec<SubscriberEntry>,
    queue: VecDeque<HostSignal>,
    last_id: SubscriptionId,
}

/// Single-threaded page event loop.
///
/// Signals are queued with [`emit`](Self::emit) and dispatched in FIFO order
/// by [`run_pending`](Self::run_pending). Each signal is delivered to its
/// subscribers in subscription order. Handlers may subscribe, unsubscribe or
/// emit further signals while running; signals emitted during dispatch are
/// handled in the same `run_pending` call.
///
/// `Page` is a cheap handle: clones share the same queue and subscribers.
#[derive(Clone, Default)]
pub struct Page {
    inner: Rc<RefCell<PageInner>>,
}

impl Page {
    /// A page that is still loading.
    pub fn new() -> Self {
        Self::default()
    }

    /// A page whose load has already completed.
    pub fn loaded() -> Self {
        let page = Self::new();
        page.set_ready_state(ReadyState::Complete);
        page
    }

    pub fn set_ready_state(&self, state: ReadyState) {
        self.inner.borrow_mut().ready_state = state;
    }

    /// Queue a signal. [`HostSignal::Load`] also moves the page to
    /// [`ReadyState::Complete`], as the browser does before firing `load`.
    pub fn emit(&self, signal: HostSignal) {
        let mut inner = self.inner.borrow_mut();
        if signal == HostSignal::Load {
            inner.ready_state = ReadyState::Complete;
        }
        inner.queue.push_back(signal);
    }

    /// Number of signals waiting to be dispatched.
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Dispatch every queued signal. Returns the number of handler calls.
    pub fn run_pending(&self) -> usize {
        let mut calls = 0;
        loop {
            let next = self.inner.borrow_mut().queue.pop_front();
            let Some(signal) = next else {
                break;
            };
            calls += self.dispatch(signal);
        }
        calls
    }

    /// Number of live subscriptions for `signal`.
    pub fn subscriber_count(&self, signal: HostSignal) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.signal == signal)
            .count()
    }

    fn dispatch(&self, signal: HostSignal) -> usize {
        let ids: Vec<SubscriptionId> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.signal == signal)
            .map(|s| s.id)
            .collect();

        tracing::trace!(signal = %signal, subscribers = ids.len(), "dispatching signal");

        let mut calls = 0;
        for id in ids {
            let Some((mut handler, delivery)) = self.take_handler(id) else {
                continue;
            };

            handler(signal);
            calls += 1;

            if delivery == Delivery::Persistent {
                let mut inner = self.inner.borrow_mut();
                if let Some(entry) = inner.subscribers.iter_mut().find(|s| s.id == id) {
                    entry.handler = Some(handler);
                }
            }
        }
        calls
    }

    /// Take the handler out of its entry; one-shot entries are removed.
    fn take_handler(&self, id: SubscriptionId) -> Option<(SignalHandler, Delivery)> {
        let mut inner = self.inner.borrow_mut();
        let pos = inner.subscribers.iter().position(|s| s.id == id)?;
        match inner.subscribers[pos].delivery {
            Delivery::Once => {
                let entry = inner.subscribers.remove(pos);
                entry.handler.map(|h| (h, Delivery::Once))
            }
            Delivery::Persistent => inner.subscribers[pos]
                .handler
                .take()
                .map(|h| (h, Delivery::Persistent)),
        }
    }
}

impl Host for Page {
    fn ready_state(&self) -> ReadyState {
        self.inner.borrow().ready_state
    }

    fn subscribe(
        &self,
        signal: HostSignal,
        delivery: Delivery,
        handler: SignalHandler,
    ) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        inner.last_id += 1;
        let id = inner.last_id;
        inner.subscribers.push(SubscriberEntry {
            id,
            signal,
            delivery,
            handler: Some(handler),
        });
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|s| s.id != id);
        inner.subscribers.len() != before
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner.borrow().subscribers.iter().any(|s| s.id == id)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Page")
            .field("ready_state", &inner.ready_state)
            .field("subscribers.len()", &inner.subscribers.len())
            .field("queue", &inner.queue)
            .field("last_id", &inner.last_id)
            .finish()
    }
}
