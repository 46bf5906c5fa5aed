//! Publish/subscribe channels backing the scheduler's event streams.
//!
//! Two flavours exist:
//!
//! - [`EventTopic`]: a pure occurrence stream. A subscriber only observes
//!   events published after it subscribed.
//! - [`ValueTopic`]: a "current value + change notification" channel. A new
//!   subscriber immediately receives the latest value, then every subsequent
//!   publication.
//!
//! Each subscriber owns an unbounded receiver, so publishing never blocks and
//! never drops events for a live subscriber. Receivers that have been dropped
//! are pruned on the next publish.
//!
//! The flip side: events buffer in a stream until it is read. A stream that
//! is kept alive but never polled grows with every publication, so drop
//! subscriptions you no longer consume.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Receiving half of a topic subscription.
///
/// The buffer is unbounded: events accumulate until received. Drop the stream
/// to detach from its topic once it is no longer read.
#[derive(Debug)]
pub struct EventStream<E> {
    rx: mpsc::UnboundedReceiver<E>,
}

impl<E> EventStream<E> {
    /// Wait for the next event.
    ///
    /// Returns `None` once the publishing side has been dropped and all
    /// buffered events were consumed.
    pub async fn recv(&mut self) -> Option<E> {
        self.rx.recv().await
    }

    /// Take the next buffered event without waiting.
    pub fn try_recv(&mut self) -> Option<E> {
        self.rx.try_recv().ok()
    }

    /// Drain every event buffered so far.
    pub fn drain(&mut self) -> Vec<E> {
        let mut out = Vec::new();
        while let Some(ev) = self.try_recv() {
            out.push(ev);
        }
        out
    }
}

/// Occurrence stream without replay.
#[derive(Debug)]
pub struct EventTopic<E> {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<E>>>,
}

impl<E: Clone> EventTopic<E> {
    /// Create a topic with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> EventStream<E> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().push(tx);
        EventStream { rx }
    }

    /// Deliver an event to every live subscriber.
    pub fn publish(&self, ev: E) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(ev.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        let mut subs = self.subscribers.lock();
        subs.retain(|tx| !tx.is_closed());
        subs.len()
    }
}

impl<E: Clone> Default for EventTopic<E> {
    fn default() -> Self {
        Self::new()
    }
}

struct ValueState<E> {
    current: E,
    subscribers: Vec<mpsc::UnboundedSender<E>>,
}

/// Stateful stream that replays its latest value to new subscribers.
pub struct ValueTopic<E> {
    state: Mutex<ValueState<E>>,
}

impl<E: Clone> ValueTopic<E> {
    /// Create a topic holding `initial`.
    pub fn new(initial: E) -> Self {
        Self {
            state: Mutex::new(ValueState {
                current: initial,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Register a subscriber; the current value is delivered immediately.
    pub fn subscribe(&self) -> EventStream<E> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock();
        // rx is alive, so the replay send cannot fail.
        let _ = tx.send(state.current.clone());
        state.subscribers.push(tx);
        EventStream { rx }
    }

    /// Store `value` and deliver it to every live subscriber, even when it is
    /// unchanged.
    pub fn publish(&self, value: E) {
        let mut state = self.state.lock();
        state.current = value;
        let current = state.current.clone();
        state
            .subscribers
            .retain(|tx| tx.send(current.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn current(&self) -> E {
        self.state.lock().current.clone()
    }
}

impl<E: Clone + Default> Default for ValueTopic<E> {
    fn default() -> Self {
        Self::new(E::default())
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for ValueTopic<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ValueTopic")
            .field("current", &state.current)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}

/// Payload of the task-error stream.
#[derive(Debug)]
pub struct TaskFailure<T> {
    /// Failure raised by the task's execution.
    pub error: Arc<anyhow::Error>,
    /// The task that failed.
    pub task: Arc<T>,
}

// Manual impl: `T` itself need not be `Clone`.
impl<T> Clone for TaskFailure<T> {
    fn clone(&self) -> Self {
        Self {
            error: Arc::clone(&self.error),
            task: Arc::clone(&self.task),
        }
    }
}

/// One entry of the combined task lifecycle stream.
///
/// For any single task the stream yields `Queued`, then `Starting`, then an
/// optional `Failed`, then `Completed`, in publication order.
#[derive(Debug)]
pub enum TaskEvent<T> {
    /// Admitted into the pending queue.
    Queued(Arc<T>),
    /// Promoted into the running queue; execution has not begun yet.
    Starting(Arc<T>),
    /// Execution failed.
    Failed(TaskFailure<T>),
    /// Execution settled and the running slot was released.
    Completed(Arc<T>),
}

impl<T> TaskEvent<T> {
    /// The task this event refers to.
    pub fn task(&self) -> &Arc<T> {
        match self {
            Self::Queued(task) | Self::Starting(task) | Self::Completed(task) => task,
            Self::Failed(failure) => &failure.task,
        }
    }
}

impl<T> Clone for TaskEvent<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Queued(task) => Self::Queued(Arc::clone(task)),
            Self::Starting(task) => Self::Starting(Arc::clone(task)),
            Self::Failed(failure) => Self::Failed(failure.clone()),
            Self::Completed(task) => Self::Completed(Arc::clone(task)),
        }
    }
}
