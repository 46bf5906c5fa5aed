//! Console harness: random sleep tasks fed to a single-slot scheduler.
//!
//! Every five seconds a batch of one to four tasks, each sleeping one to four
//! seconds, is queued. Rejections are logged and dropped. All lifecycle and
//! count streams are printed through `tracing`.
//!
//! ```text
//! RUST_LOG=info cargo run --example sleep_tasks
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use qd_scheduler::core::{AppResult, EventStream, Scheduler, SchedulerLimits, Task};
use qd_scheduler::runtime::{TokioScheduler, TokioSpawner};
use qd_scheduler::util::init_tracing_with;
use rand::Rng;

const ROUNDS: usize = 6;

struct SleepTask {
    name: String,
    duration: Duration,
}

#[async_trait]
impl Task for SleepTask {
    async fn execute(&self) -> AppResult<()> {
        tokio::time::sleep(self.duration).await;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn log_stream<E, F>(mut stream: EventStream<E>, describe: F)
where
    E: Send + 'static,
    F: Fn(E) -> String + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(ev) = stream.recv().await {
            tracing::info!("{}", describe(ev));
        }
    });
}

fn generate_tasks(scheduler: &TokioScheduler<SleepTask>, next_id: &mut usize) {
    let mut rng = rand::rng();
    let count = rng.random_range(1..5);
    for _ in 0..count {
        let task = SleepTask {
            name: format!("Task {next_id}"),
            duration: Duration::from_secs(rng.random_range(1..5)),
        };
        *next_id += 1;
        let name = task.name.clone();
        if let Err(err) = scheduler.queue_task(task) {
            tracing::error!("error while queuing task {name}: {err}");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing_with("info");

    let scheduler: TokioScheduler<SleepTask> = Scheduler::new(
        SchedulerLimits {
            max_parallel_tasks: 1,
            max_queued_tasks: 10,
        },
        TokioSpawner::current()?,
    );

    log_stream(scheduler.task_queued(), |t: Arc<SleepTask>| format!("task {} queued", t.name));
    log_stream(scheduler.task_starting(), |t: Arc<SleepTask>| format!("task {} started", t.name));
    log_stream(scheduler.task_errors(), |f| {
        format!("error for task {}: {}", f.task.name, f.error)
    });
    log_stream(scheduler.task_completed(), |t: Arc<SleepTask>| {
        format!("task {} completed", t.name)
    });
    log_stream(scheduler.queued_tasks_count(), |c| format!("queued tasks: {c}"));
    log_stream(scheduler.running_tasks_count(), |c| format!("running tasks: {c}"));

    scheduler.start()?;

    let mut next_id = 0;
    let mut interval = tokio::time::interval(Duration::from_secs(5));
    interval.tick().await;
    for _ in 0..ROUNDS {
        interval.tick().await;
        generate_tasks(&scheduler, &mut next_id);
    }

    loop {
        let stats = scheduler.stats();
        if stats.queued_tasks == 0 && stats.running_tasks == 0 {
            tracing::info!("drained: {}", serde_json::to_string(&stats)?);
            break;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    Ok(())
}
