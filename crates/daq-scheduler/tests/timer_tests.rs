//! Timer service behaviour across threads.

use daq_scheduler::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::{Duration, Instant};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn counting(counter: &Arc<AtomicU32>) -> impl Fn() + Send + Sync + 'static {
    let counter = Arc::clone(counter);
    move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_tasks_fire_at_their_own_rates() -> TestResult {
    let timer = TimerService::start("rates")?;
    let fast = Arc::new(AtomicU32::new(0));
    let slow = Arc::new(AtomicU32::new(0));

    let _fast = timer.schedule_at_fixed_rate(Duration::ZERO, Duration::from_millis(10), counting(&fast))?;
    let _slow = timer.schedule_at_fixed_rate(Duration::ZERO, Duration::from_millis(200), counting(&slow))?;

    thread::sleep(Duration::from_millis(300));
    timer.shutdown();

    let fast = fast.load(Ordering::SeqCst);
    let slow = slow.load(Ordering::SeqCst);
    assert!(fast >= 10, "fast task ran {fast} times");
    assert!((1..=3).contains(&slow), "slow task ran {slow} times");
    Ok(())
}

#[test]
fn test_no_runs_after_shutdown() -> TestResult {
    let timer = TimerService::start("after-shutdown")?;
    let counter = Arc::new(AtomicU32::new(0));
    let _handle = timer.schedule_at_fixed_rate(Duration::ZERO, Duration::from_millis(5), counting(&counter))?;

    thread::sleep(Duration::from_millis(30));
    timer.shutdown();
    let at_shutdown = counter.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(30));

    assert_eq!(counter.load(Ordering::SeqCst), at_shutdown);
    assert_eq!(timer.active_tasks(), 0);
    Ok(())
}

#[test]
fn test_cancel_from_other_threads() -> TestResult {
    let timer = Arc::new(TimerService::start("cancel-threads")?);
    let mut handles = vec![];

    for _ in 0..8 {
        let timer = Arc::clone(&timer);
        handles.push(thread::spawn(move || {
            let counter = Arc::new(AtomicU32::new(0));
            let task = timer.schedule_at_fixed_rate(Duration::ZERO, Duration::from_millis(2), counting(&counter));
            if let Ok(task) = task {
                thread::sleep(Duration::from_millis(20));
                assert!(task.cancel());
            }
        }));
    }

    for handle in handles {
        assert!(handle.join().is_ok(), "Thread should not panic");
    }
    assert_eq!(timer.active_tasks(), 0);
    Ok(())
}

#[test]
fn test_task_can_cancel_itself() -> TestResult {
    let timer = TimerService::start("self-cancel")?;
    let counter = Arc::new(AtomicU32::new(0));
    let slot: Arc<parking_lot::Mutex<Option<TaskHandle>>> = Arc::new(parking_lot::Mutex::new(None));

    let task_counter = Arc::clone(&counter);
    let task_slot = Arc::clone(&slot);
    let handle = timer.schedule_at_fixed_rate(Duration::from_millis(10), Duration::from_millis(5), move || {
        if task_counter.fetch_add(1, Ordering::SeqCst) >= 2 {
            if let Some(handle) = task_slot.lock().as_ref() {
                handle.cancel();
            }
        }
    })?;
    *slot.lock() = Some(handle);

    thread::sleep(Duration::from_millis(150));
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    Ok(())
}

#[test]
fn test_drop_joins_thread_promptly() -> TestResult {
    let timer = TimerService::start("drop")?;
    let _handle = timer.schedule_at_fixed_rate(Duration::from_secs(3600), Duration::from_secs(3600), || {})?;
    let start = Instant::now();
    drop(timer);
    assert!(start.elapsed() < Duration::from_secs(1));
    Ok(())
}
