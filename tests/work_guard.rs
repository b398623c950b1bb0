mod common;

use common::{Recorder, UNIT, init_tracing};
use reactor_compose::time::WaitTimer;
use reactor_compose::{ManualWait, Runtime, bind_executor, start_wait};
use std::thread;
use std::time::Instant;

#[test]
fn test_guard_counts_outstanding_work() {
    init_tracing();
    let rt = Runtime::new();
    let executor = rt.executor();

    assert_eq!(executor.outstanding_work(), 0);

    let first = executor.work_guard();
    let second = executor.work_guard();
    assert_eq!(executor.outstanding_work(), 2);
    assert_eq!(first.executor(), Some(executor));

    drop(first);
    assert_eq!(executor.outstanding_work(), 1);

    drop(second);
    assert_eq!(executor.outstanding_work(), 0);
}

#[test]
fn test_reset_releases_exactly_once() {
    init_tracing();
    let rt = Runtime::new();
    let executor = rt.executor();

    let mut guard = executor.work_guard();
    assert!(guard.owns_work());

    guard.reset();
    assert!(!guard.owns_work());
    assert!(guard.executor().is_none());
    assert_eq!(executor.outstanding_work(), 0);

    guard.reset();
    drop(guard);
    assert_eq!(executor.outstanding_work(), 0);
}

#[test]
fn test_run_returns_immediately_without_work() {
    init_tracing();
    let rt = Runtime::new();

    assert_eq!(rt.run(), 0);
}

#[test]
fn test_run_waits_for_guard_release() {
    init_tracing();
    let rt = Runtime::new();
    let guard = rt.executor().work_guard();

    let start = Instant::now();
    let releaser = thread::spawn(move || {
        thread::sleep(UNIT);
        drop(guard);
    });

    rt.run();

    assert!(start.elapsed() >= UNIT, "run() should wait for the guard");
    releaser.join().unwrap();
}

#[test]
fn test_pending_operation_holds_both_executors() {
    init_tracing();
    let resource_rt = Runtime::new();
    let handler_rt = Runtime::new();
    let wait = ManualWait::new(resource_rt.executor());
    let recorder = Recorder::new();

    start_wait(
        &wait,
        bind_executor(handler_rt.executor(), recorder.handler("bound")),
    );

    assert_eq!(resource_rt.executor().outstanding_work(), 1);
    assert_eq!(handler_rt.executor().outstanding_work(), 1);

    wait.fire();

    // Guards are gone; only the queued completion remains.
    assert_eq!(resource_rt.executor().outstanding_work(), 0);
    assert_eq!(handler_rt.executor().outstanding_work(), 1);
    assert_eq!(handler_rt.executor().queued_jobs(), 1);

    assert_eq!(handler_rt.run(), 1);
    assert_eq!(recorder.events(), vec!["bound: None true"]);
    assert_eq!(handler_rt.executor().outstanding_work(), 0);
}

#[test]
fn test_pending_operation_on_one_executor_holds_two_units() {
    init_tracing();
    let rt = Runtime::new();
    let timer = WaitTimer::with_duration(rt.executor(), UNIT / 4);
    let recorder = Recorder::new();

    start_wait(&timer, recorder.handler("timer"));

    // The timer registration plus the resource and handler guards.
    assert_eq!(rt.executor().pending_timers(), 1);
    assert_eq!(rt.executor().outstanding_work(), 3);

    rt.run();

    assert_eq!(recorder.events(), vec!["timer: None true"]);
    assert_eq!(rt.executor().outstanding_work(), 0);
    assert_eq!(rt.executor().pending_timers(), 0);
}
