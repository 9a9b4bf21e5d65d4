//! Timer service implementation.

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::{BinaryHeap, HashMap};
use std::cmp::Reverse;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::error::{TimerError, TimerResult};

type Task = Arc<dyn Fn() + Send + Sync>;

/// Identifier of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Deadline {
    due: Instant,
    seq: u64,
    id: TaskId,
}

struct Registration {
    period: Duration,
    task: Task,
}

#[derive(Default)]
struct Queue {
    deadlines: BinaryHeap<Reverse<Deadline>>,
    tasks: HashMap<TaskId, Registration>,
    next_id: u64,
    next_seq: u64,
    shutdown: bool,
}

impl Queue {
    fn push(&mut self, id: TaskId, due: Instant) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.deadlines.push(Reverse(Deadline { due, seq, id }));
    }
}

#[derive(Default)]
struct Shared {
    queue: Mutex<Queue>,
    wakeup: Condvar,
    executed: AtomicU64,
    panicked: AtomicU64,
}

/// Counters describing the timer's activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerStats {
    /// Tasks currently registered.
    pub active_tasks: usize,
    /// Task runs that completed.
    pub executed: u64,
    /// Task runs that panicked.
    pub panicked: u64,
}

/// One background thread running any number of periodic tasks.
pub struct TimerService {
    name: String,
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for TimerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerService")
            .field("name", &self.name)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl TimerService {
    /// Spawns the timer thread.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Spawn`] if the thread cannot be created.
    pub fn start(name: impl Into<String>) -> TimerResult<Self> {
        let name = name.into();
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name(name.clone())
            .spawn(move || run_worker(&worker_shared))
            .map_err(|e| TimerError::Spawn(e.to_string()))?;

        info!(timer = %name, "Timer service started");
        Ok(Self {
            name,
            shared,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Name of the timer thread.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers `task` to run after `initial_delay` and then every `period`.
    ///
    /// Runs that fall behind are not replayed: if a deadline has already
    /// passed when the previous run ends, the next run is one period later.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidPeriod`] for a zero period and
    /// [`TimerError::ShutDown`] once the service has stopped.
    pub fn schedule_at_fixed_rate<F>(
        &self,
        initial_delay: Duration,
        period: Duration,
        task: F,
    ) -> TimerResult<TaskHandle>
    where
        F: Fn() + Send + Sync + 'static,
    {
        if period.is_zero() {
            return Err(TimerError::InvalidPeriod);
        }
        let now = Instant::now();
        let due = now.checked_add(initial_delay).unwrap_or(now);

        let mut queue = self.shared.queue.lock();
        if queue.shutdown {
            return Err(TimerError::ShutDown);
        }
        let id = TaskId(queue.next_id);
        queue.next_id = queue.next_id.wrapping_add(1);
        queue.tasks.insert(id, Registration { period, task: Arc::new(task) });
        queue.push(id, due);
        drop(queue);

        self.shared.wakeup.notify_one();
        debug!(timer = %self.name, task = %id, period_ms = period.as_millis(), "Task scheduled");
        Ok(TaskHandle {
            id,
            shared: Arc::downgrade(&self.shared),
        })
    }

    /// True until [`TimerService::shutdown`] is called.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.shared.queue.lock().shutdown
    }

    /// Number of registered tasks.
    #[must_use]
    pub fn active_tasks(&self) -> usize {
        self.shared.queue.lock().tasks.len()
    }

    /// Activity counters.
    #[must_use]
    pub fn stats(&self) -> TimerStats {
        TimerStats {
            active_tasks: self.active_tasks(),
            executed: self.shared.executed.load(Ordering::Relaxed),
            panicked: self.shared.panicked.load(Ordering::Relaxed),
        }
    }

    /// Cancels every task and stops the timer thread.
    ///
    /// Waits for a run in progress to finish, unless called from a task, in
    /// which case the thread exits as soon as that task returns. Calling it
    /// again is a no-op.
    pub fn shutdown(&self) {
        {
            let mut queue = self.shared.queue.lock();
            if !queue.shutdown {
                queue.shutdown = true;
                queue.tasks.clear();
                queue.deadlines.clear();
            }
        }
        self.shared.wakeup.notify_all();

        let Some(worker) = self.worker.lock().take() else {
            return;
        };
        if worker.thread().id() == thread::current().id() {
            warn!(timer = %self.name, "Timer shut down from its own task; thread exits after the task");
            return;
        }
        match worker.join() {
            Ok(()) => info!(timer = %self.name, "Timer service stopped"),
            Err(_) => error!(timer = %self.name, "Timer thread panicked"),
        }
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Cancels one scheduled task.
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    shared: Weak<Shared>,
}

impl TaskHandle {
    /// Id of the task.
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Prevents any further run of the task.
    ///
    /// Returns false if the task was already cancelled or the timer is gone.
    /// Never waits for a run in progress.
    pub fn cancel(&self) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        let removed = shared.queue.lock().tasks.remove(&self.id).is_some();
        if removed {
            shared.wakeup.notify_one();
            debug!(task = %self.id, "Task cancelled");
        }
        removed
    }

    /// True while the task is registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.queue.lock().tasks.contains_key(&self.id))
    }
}

fn run_worker(shared: &Shared) {
    let mut queue = shared.queue.lock();
    loop {
        if queue.shutdown {
            break;
        }
        let now = Instant::now();
        match queue.deadlines.peek().map(|Reverse(deadline)| deadline.due) {
            None => {
                shared.wakeup.wait(&mut queue);
                continue;
            }
            Some(due) if due > now => {
                let _timed_out = shared.wakeup.wait_until(&mut queue, due);
                continue;
            }
            Some(_) => {}
        }

        let Some(Reverse(deadline)) = queue.deadlines.pop() else {
            continue;
        };
        let Some(registration) = queue.tasks.get(&deadline.id) else {
            continue;
        };
        let task = Arc::clone(&registration.task);
        let period = registration.period;

        let mut next = deadline.due.checked_add(period).unwrap_or(now);
        if next <= now {
            next = now.checked_add(period).unwrap_or(now);
        }
        queue.push(deadline.id, next);

        MutexGuard::unlocked(&mut queue, || run_task(shared, deadline.id, &task));
    }
}

fn run_task(shared: &Shared, id: TaskId, task: &Task) {
    match catch_unwind(AssertUnwindSafe(|| task())) {
        Ok(()) => {
            shared.executed.fetch_add(1, Ordering::Relaxed);
        }
        Err(_) => {
            shared.panicked.fetch_add(1, Ordering::Relaxed);
            error!(task = %id, "Timer task panicked");
        }
    }
}
