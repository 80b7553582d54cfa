//! Task registry and execution lifecycle.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::error::SchedulerError;

/// One registered task: an id, a cadence, and the work to run.
struct Task {
    id: String,
    interval: Duration,
    work: Box<dyn Fn(CancellationToken) -> BoxFuture<'static, ()> + Send + Sync>,
    state: Mutex<TaskState>,
}

struct TaskState {
    running: bool,
    enabled: bool,
    /// Bumped each time an execution starts. A completing execution may
    /// only clear `running` while its stamp is still the current one,
    /// so a stopped run that lingers cannot clobber a newer run's flag.
    generation: u64,
    /// Token handed to the current execution; `stop` cancels it.
    exec_cancel: CancellationToken,
    /// Token watched by the periodic driver; `disable` cancels it.
    driver_cancel: CancellationToken,
}

impl Task {
    /// Start one execution, refusing if one is already in flight.
    fn start(task: &Arc<Task>) -> Result<(), SchedulerError> {
        let (cancel, generation) = {
            let mut state = task.state.lock().unwrap();
            if state.running {
                return Err(SchedulerError::AlreadyRunning(task.id.clone()));
            }
            state.running = true;
            state.generation += 1;
            state.exec_cancel = CancellationToken::new();
            (state.exec_cancel.clone(), state.generation)
        };

        let task = Arc::clone(task);
        tokio::spawn(async move {
            let work = (task.work)(cancel);
            if AssertUnwindSafe(work).catch_unwind().await.is_err() {
                error!(task = %task.id, "task execution panicked");
            }

            let mut state = task.state.lock().unwrap();
            if state.generation == generation {
                state.running = false;
            }
        });

        Ok(())
    }

    fn snapshot(&self) -> TaskSnapshot {
        let state = self.state.lock().unwrap();
        TaskSnapshot {
            id: self.id.clone(),
            interval: self.interval,
            running: state.running,
            enabled: state.enabled,
        }
    }
}

/// Point-in-time view of one registered task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub id: String,
    pub interval: Duration,
    /// An execution is currently in flight
    pub running: bool,
    /// A periodic driver is ticking for this task
    pub enabled: bool,
}

/// Registry of named background tasks.
///
/// Tasks run two ways: on a fixed cadence once [`enable_task`] has
/// started their driver, and on demand via [`trigger_task`]. Both paths
/// go through the same gate, so each task has at most one execution in
/// flight; a tick or trigger that lands while one is running is
/// refused, never queued.
///
/// Stopping is advisory. [`stop_task`] cancels the token the execution
/// was handed and immediately reports the task idle; work that ignores
/// the token runs to completion in the background.
///
/// [`enable_task`]: Scheduler::enable_task
/// [`trigger_task`]: Scheduler::trigger_task
/// [`stop_task`]: Scheduler::stop_task
pub struct Scheduler {
    tasks: Mutex<HashMap<String, Arc<Task>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler {
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Register a task under `id`.
    ///
    /// The work closure is called once per execution with a fresh
    /// cancellation token; long-running work should check it and wind
    /// down when it fires. Registering an id that already exists
    /// replaces the old task outright: its driver is cancelled and its
    /// in-flight execution (if any) is told to stop. The replacement
    /// starts disabled.
    pub fn add_task<F>(&self, id: impl Into<String>, interval: Duration, work: F)
    where
        F: Fn(CancellationToken) -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        let id = id.into();
        let task = Arc::new(Task {
            id: id.clone(),
            interval,
            work: Box::new(work),
            state: Mutex::new(TaskState {
                running: false,
                enabled: false,
                generation: 0,
                exec_cancel: CancellationToken::new(),
                driver_cancel: CancellationToken::new(),
            }),
        });

        let replaced = self.tasks.lock().unwrap().insert(id.clone(), task);
        match replaced {
            Some(old) => {
                let state = old.state.lock().unwrap();
                state.driver_cancel.cancel();
                state.exec_cancel.cancel();
                info!(task = %id, "task re-registered, previous instance cancelled");
            }
            None => {
                info!(task = %id, interval_secs = interval.as_secs(), "task registered");
            }
        }
    }

    /// Run `id` now, outside its periodic cadence.
    pub fn trigger_task(&self, id: &str) -> Result<(), SchedulerError> {
        let task = self.get(id)?;
        Task::start(&task)?;
        info!(task = %id, "task triggered");
        Ok(())
    }

    /// Ask the in-flight execution of `id` to stop.
    ///
    /// The task is reported idle as soon as this returns; the work
    /// itself decides how quickly to honour the token.
    pub fn stop_task(&self, id: &str) -> Result<(), SchedulerError> {
        let task = self.get(id)?;
        {
            let mut state = task.state.lock().unwrap();
            if !state.running {
                return Err(SchedulerError::NotRunning(id.to_string()));
            }
            state.exec_cancel.cancel();
            state.running = false;
        }
        info!(task = %id, "task stopped");
        Ok(())
    }

    /// Start the periodic driver for `id`.
    ///
    /// The first run happens one full interval after enabling, not
    /// immediately. A tick that lands while a previous run is still
    /// going is refused by the execution gate and dropped.
    pub fn enable_task(&self, id: &str) -> Result<(), SchedulerError> {
        let task = self.get(id)?;
        let driver_cancel = {
            let mut state = task.state.lock().unwrap();
            if state.enabled {
                return Err(SchedulerError::AlreadyEnabled(id.to_string()));
            }
            state.enabled = true;
            state.driver_cancel = CancellationToken::new();
            state.driver_cancel.clone()
        };

        let driver = Arc::clone(&task);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(driver.interval);
            // interval yields immediately; swallow that so the first
            // run lands one interval from now
            ticker.tick().await;
            loop {
                tokio::select! {
                    // cancellation wins over a simultaneous tick
                    biased;
                    _ = driver_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = Task::start(&driver) {
                            debug!(task = %driver.id, error = %e, "periodic tick dropped");
                        }
                    }
                }
            }
            debug!(task = %driver.id, "periodic driver exited");
        });

        info!(task = %id, interval_secs = task.interval.as_secs(), "task enabled");
        Ok(())
    }

    /// Stop the periodic driver for `id`. An in-flight execution is
    /// left alone; use [`stop_task`](Scheduler::stop_task) for that.
    pub fn disable_task(&self, id: &str) -> Result<(), SchedulerError> {
        let task = self.get(id)?;
        {
            let mut state = task.state.lock().unwrap();
            if !state.enabled {
                return Err(SchedulerError::AlreadyDisabled(id.to_string()));
            }
            state.driver_cancel.cancel();
            state.enabled = false;
        }
        info!(task = %id, "task disabled");
        Ok(())
    }

    /// Snapshot every registered task, sorted by id.
    pub fn tasks(&self) -> Vec<TaskSnapshot> {
        let tasks = self.tasks.lock().unwrap();
        let mut snapshots: Vec<TaskSnapshot> = tasks.values().map(|t| t.snapshot()).collect();
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        snapshots
    }

    fn get(&self, id: &str) -> Result<Arc<Task>, SchedulerError> {
        self.tasks
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| SchedulerError::NotFound(id.to_string()))
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
