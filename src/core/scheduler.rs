//! Two-queue admission and promotion engine.
//!
//! A [`Scheduler`] owns a *pending* queue (admission buffer) and a *running*
//! queue (execution slots). Submitted tasks wait in pending; a single loop
//! promotes them into running whenever a slot is free and launches their
//! execution without waiting for it.
//!
//! ## Loop model
//!
//! The loop is the single consumer of an internal message channel:
//!
//! ```text
//! queue_task ───────┐
//! start ────────────┼──► Reevaluate ──┐
//! set_max_parallel ─┘                 ├──► loop ──► re-evaluation pass ──► spawn(task)
//! settled task ─────────► Settled ────┘                                         │
//!        ▲                                                                      │
//!        └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queue state lives behind one mutex; every pass, every settlement and every
//! admission runs to completion under it, so mutations never interleave and
//! events are published in the order the mutations happened.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::core::{
    AppResult, BoundedQueue, EventStream, EventTopic, SchedulerError, Task, TaskEvent,
    TaskFailure,
};

/// Default number of tasks allowed to run at once.
pub const DEFAULT_MAX_PARALLEL_TASKS: usize = 10;
/// Default number of tasks allowed to wait for a slot.
pub const DEFAULT_MAX_QUEUED_TASKS: usize = 200;

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn a future that runs to completion in the background.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Capacity limits of a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerLimits {
    /// Capacity of the running queue.
    pub max_parallel_tasks: usize,
    /// Capacity of the pending queue.
    pub max_queued_tasks: usize,
}

impl Default for SchedulerLimits {
    fn default() -> Self {
        Self {
            max_parallel_tasks: DEFAULT_MAX_PARALLEL_TASKS,
            max_queued_tasks: DEFAULT_MAX_QUEUED_TASKS,
        }
    }
}

/// Point-in-time view of scheduler occupancy and lifetime counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    /// Tasks waiting in the pending queue.
    pub queued_tasks: usize,
    /// Tasks currently executing.
    pub running_tasks: usize,
    /// Current pending capacity.
    pub max_queued_tasks: usize,
    /// Current running capacity.
    pub max_parallel_tasks: usize,
    /// Tasks accepted by `queue_task`.
    pub admitted_tasks: u64,
    /// Tasks refused because the pending queue was full.
    pub rejected_tasks: u64,
    /// Tasks promoted into the running queue.
    pub started_tasks: u64,
    /// Tasks that settled successfully.
    pub succeeded_tasks: u64,
    /// Tasks that settled with a failure.
    pub failed_tasks: u64,
}

#[derive(Debug, Default)]
struct SchedulerCounters {
    admitted: AtomicU64,
    rejected: AtomicU64,
    started: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl SchedulerCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

enum Message<T> {
    /// Run one re-evaluation pass.
    Reevaluate,
    /// A running task finished.
    Settled {
        task: Arc<T>,
        outcome: AppResult<()>,
    },
    /// Stop the loop.
    Shutdown,
}

struct Queues<T> {
    pending: BoundedQueue<Arc<T>>,
    running: BoundedQueue<Arc<T>>,
}

struct Shared<T> {
    queues: Mutex<Queues<T>>,
    queued: EventTopic<Arc<T>>,
    starting: EventTopic<Arc<T>>,
    errors: EventTopic<TaskFailure<T>>,
    completed: EventTopic<Arc<T>>,
    lifecycle: EventTopic<TaskEvent<T>>,
    counters: SchedulerCounters,
    tx: mpsc::UnboundedSender<Message<T>>,
    started: AtomicBool,
    shut_down: AtomicBool,
}

impl<T> Shared<T> {
    fn post(&self, message: Message<T>) {
        // The inbox is gone once the loop stopped; nothing left to notify.
        let _ = self.tx.send(message);
    }

    fn request_shutdown(&self) {
        // Flipped under the queues lock so no admission straddles it.
        let _queues = self.queues.lock();
        if !self.shut_down.swap(true, Ordering::SeqCst) {
            tracing::info!("scheduler shutting down");
            self.post(Message::Shutdown);
        }
    }
}

impl<T: Task> Shared<T> {
    /// Promote pending tasks while running slots are free.
    fn reevaluate<S: Spawn>(&self, spawner: &S) {
        let mut queues = self.queues.lock();
        while queues.running.free_slots() > 0 {
            let Some(task) = queues.pending.pop() else {
                break;
            };
            if let Err(err) = queues.running.push(Arc::clone(&task)) {
                tracing::error!("running queue refused promoted task {}: {}", task.name(), err);
                queues.pending.restore_front(task);
                break;
            }
            SchedulerCounters::bump(&self.counters.started);
            tracing::info!(
                task = task.name(),
                running = queues.running.len(),
                queued = queues.pending.len(),
                "task starting"
            );
            self.starting.publish(Arc::clone(&task));
            self.lifecycle.publish(TaskEvent::Starting(Arc::clone(&task)));
            spawner.spawn(drive(task, self.tx.clone()));
        }
    }

    /// Record the outcome of a running task and release its slot.
    fn settle(&self, task: Arc<T>, outcome: AppResult<()>) {
        let mut queues = self.queues.lock();
        match outcome {
            Ok(()) => {
                SchedulerCounters::bump(&self.counters.succeeded);
                tracing::debug!(task = task.name(), "task completed");
            }
            Err(error) => {
                SchedulerCounters::bump(&self.counters.failed);
                tracing::warn!(task = task.name(), error = %error, "task failed");
                let failure = TaskFailure {
                    error: Arc::new(error),
                    task: Arc::clone(&task),
                };
                self.errors.publish(failure.clone());
                self.lifecycle.publish(TaskEvent::Failed(failure));
            }
        }
        if !queues.running.remove(&task) {
            tracing::warn!("settled task {} was not in the running queue", task.name());
        }
        self.completed.publish(Arc::clone(&task));
        self.lifecycle.publish(TaskEvent::Completed(task));
    }
}

/// Reports a settlement exactly once, including when the execution future is
/// dropped early or unwinds.
struct SettleGuard<T> {
    task: Option<Arc<T>>,
    tx: mpsc::UnboundedSender<Message<T>>,
}

impl<T> SettleGuard<T> {
    fn settle(&mut self, outcome: AppResult<()>) {
        if let Some(task) = self.task.take() {
            let _ = self.tx.send(Message::Settled { task, outcome });
        }
    }
}

impl<T> Drop for SettleGuard<T> {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.settle(Err(anyhow::anyhow!("task execution aborted before settling")));
        }
    }
}

async fn drive<T: Task>(task: Arc<T>, tx: mpsc::UnboundedSender<Message<T>>) {
    let mut guard = SettleGuard {
        task: Some(Arc::clone(&task)),
        tx,
    };
    let outcome = task.execute().await;
    guard.settle(outcome);
}

async fn run_loop<T, S>(
    shared: Arc<Shared<T>>,
    spawner: S,
    mut inbox: mpsc::UnboundedReceiver<Message<T>>,
)
where
    T: Task,
    S: Spawn,
{
    tracing::info!("scheduler loop started");
    while let Some(message) = inbox.recv().await {
        match message {
            Message::Reevaluate => {}
            Message::Settled { task, outcome } => shared.settle(task, outcome),
            Message::Shutdown => break,
        }
        shared.reevaluate(&spawner);
    }
    tracing::info!("scheduler loop stopped");
}

/// Bounded-concurrency task scheduler.
///
/// Tasks are admitted into a pending queue of `max_queued_tasks` slots and
/// promoted, in arrival order, into a running queue of `max_parallel_tasks`
/// slots once [`Scheduler::start`] has been called.
///
/// # Example
///
/// ```rust,ignore
/// use qd_scheduler::core::{Scheduler, SchedulerLimits};
/// use qd_scheduler::runtime::TokioSpawner;
///
/// let scheduler = Scheduler::new(SchedulerLimits::default(), TokioSpawner::current()?);
/// let mut failures = scheduler.task_errors();
///
/// scheduler.start()?;
/// scheduler.queue_task(my_task)?;
///
/// while let Some(failure) = failures.recv().await {
///     tracing::error!("{} failed: {}", failure.task.name(), failure.error);
/// }
/// ```
pub struct Scheduler<T, S> {
    shared: Arc<Shared<T>>,
    spawner: S,
    inbox: Mutex<Option<mpsc::UnboundedReceiver<Message<T>>>>,
}

impl<T, S> Scheduler<T, S>
where
    T: Task,
    S: Spawn + Clone + Send + 'static,
{
    /// Create a scheduler with the given capacities. The loop is idle until
    /// [`Scheduler::start`] is called.
    pub fn new(limits: SchedulerLimits, spawner: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Shared {
            queues: Mutex::new(Queues {
                pending: BoundedQueue::new(limits.max_queued_tasks),
                running: BoundedQueue::new(limits.max_parallel_tasks),
            }),
            queued: EventTopic::new(),
            starting: EventTopic::new(),
            errors: EventTopic::new(),
            completed: EventTopic::new(),
            lifecycle: EventTopic::new(),
            counters: SchedulerCounters::default(),
            tx,
            started: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
        };
        Self {
            shared: Arc::new(shared),
            spawner,
            inbox: Mutex::new(Some(rx)),
        }
    }

    /// Create a scheduler with 10 parallel and 200 queued task slots.
    pub fn with_defaults(spawner: S) -> Self {
        Self::new(SchedulerLimits::default(), spawner)
    }

    /// Admit a task into the pending queue.
    ///
    /// Never blocks and never promotes inline; promotion happens on the loop.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::QueueFull`] when the pending queue is at capacity.
    ///   No queued event is emitted and scheduler state is unchanged.
    /// - [`SchedulerError::Shutdown`] after [`Scheduler::shutdown`].
    pub fn queue_task(&self, task: impl Into<Arc<T>>) -> Result<(), SchedulerError> {
        let task = task.into();
        {
            let mut queues = self.shared.queues.lock();
            if self.shared.shut_down.load(Ordering::SeqCst) {
                return Err(SchedulerError::Shutdown);
            }
            if let Err(err) = queues.pending.push(Arc::clone(&task)) {
                SchedulerCounters::bump(&self.shared.counters.rejected);
                tracing::warn!("task {} rejected: {}", task.name(), err);
                return Err(err);
            }
            SchedulerCounters::bump(&self.shared.counters.admitted);
            tracing::debug!(task = task.name(), queued = queues.pending.len(), "task queued");
            self.shared.queued.publish(Arc::clone(&task));
            self.shared.lifecycle.publish(TaskEvent::Queued(task));
        }
        if self.shared.started.load(Ordering::SeqCst) {
            self.shared.post(Message::Reevaluate);
        }
        Ok(())
    }

    /// Activate the promotion loop and run the first re-evaluation pass.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::AlreadyStarted`] on every call after the first.
    /// - [`SchedulerError::Shutdown`] after [`Scheduler::shutdown`].
    pub fn start(&self) -> Result<(), SchedulerError> {
        if self.shared.shut_down.load(Ordering::SeqCst) {
            return Err(SchedulerError::Shutdown);
        }
        let inbox = self
            .inbox
            .lock()
            .take()
            .ok_or(SchedulerError::AlreadyStarted)?;
        self.shared.started.store(true, Ordering::SeqCst);
        self.shared.post(Message::Reevaluate);
        self.spawner.spawn(run_loop(
            Arc::clone(&self.shared),
            self.spawner.clone(),
            inbox,
        ));
        Ok(())
    }
}

impl<T: Task, S> Scheduler<T, S> {
    /// Change the running capacity.
    ///
    /// Running tasks are never evicted. Zero closes the scheduler for
    /// promotion until the limit is raised again; raising it promotes waiting
    /// tasks on the next pass.
    pub fn set_max_parallel_tasks(&self, max_parallel_tasks: usize) {
        self.shared
            .queues
            .lock()
            .running
            .set_capacity(max_parallel_tasks);
        tracing::info!(max_parallel_tasks, "parallel task limit updated");
        if self.shared.started.load(Ordering::SeqCst) {
            self.shared.post(Message::Reevaluate);
        }
    }

    /// Change the pending capacity.
    ///
    /// Queued tasks are never evicted. Zero rejects every admission.
    pub fn set_max_queued_tasks(&self, max_queued_tasks: usize) {
        self.shared
            .queues
            .lock()
            .pending
            .set_capacity(max_queued_tasks);
        tracing::info!(max_queued_tasks, "queued task limit updated");
    }

    /// Current capacities.
    pub fn limits(&self) -> SchedulerLimits {
        let queues = self.shared.queues.lock();
        SchedulerLimits {
            max_parallel_tasks: queues.running.capacity(),
            max_queued_tasks: queues.pending.capacity(),
        }
    }

    /// Snapshot of occupancy and lifetime counters.
    pub fn stats(&self) -> SchedulerStats {
        let queues = self.shared.queues.lock();
        let counters = &self.shared.counters;
        SchedulerStats {
            queued_tasks: queues.pending.len(),
            running_tasks: queues.running.len(),
            max_queued_tasks: queues.pending.capacity(),
            max_parallel_tasks: queues.running.capacity(),
            admitted_tasks: counters.admitted.load(Ordering::Relaxed),
            rejected_tasks: counters.rejected.load(Ordering::Relaxed),
            started_tasks: counters.started.load(Ordering::Relaxed),
            succeeded_tasks: counters.succeeded.load(Ordering::Relaxed),
            failed_tasks: counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Tasks accepted into the pending queue.
    pub fn task_queued(&self) -> EventStream<Arc<T>> {
        self.shared.queued.subscribe()
    }

    /// Tasks promoted into the running queue, emitted before execution begins.
    pub fn task_starting(&self) -> EventStream<Arc<T>> {
        self.shared.starting.subscribe()
    }

    /// Execution failures, each emitted before the task's completed event.
    pub fn task_errors(&self) -> EventStream<TaskFailure<T>> {
        self.shared.errors.subscribe()
    }

    /// Tasks that settled, successfully or not.
    pub fn task_completed(&self) -> EventStream<Arc<T>> {
        self.shared.completed.subscribe()
    }

    /// Every lifecycle event of every task, in the order it happened.
    pub fn task_events(&self) -> EventStream<TaskEvent<T>> {
        self.shared.lifecycle.subscribe()
    }

    /// Pending queue size; replays the current size on subscribe.
    pub fn queued_tasks_count(&self) -> EventStream<usize> {
        self.shared.queues.lock().pending.watch_size()
    }

    /// Running queue size; replays the current size on subscribe.
    pub fn running_tasks_count(&self) -> EventStream<usize> {
        self.shared.queues.lock().running.watch_size()
    }
}

impl<T, S> Scheduler<T, S> {
    /// Stop the promotion loop.
    ///
    /// Tasks already running are not cancelled; their settlements are no
    /// longer processed. Further `queue_task` and `start` calls fail with
    /// [`SchedulerError::Shutdown`].
    pub fn shutdown(&self) {
        self.shared.request_shutdown();
    }

    /// True once [`Scheduler::shutdown`] was called or the scheduler dropped.
    pub fn is_shut_down(&self) -> bool {
        self.shared.shut_down.load(Ordering::SeqCst)
    }
}

impl<T, S> Drop for Scheduler<T, S> {
    fn drop(&mut self) {
        self.shared.request_shutdown();
    }
}
