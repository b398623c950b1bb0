mod common;

use common::{Recorder, UNIT, init_tracing};
use reactor_compose::time::WaitTimer;
use reactor_compose::{
    Abandoned, Executor, ManualWait, Runtime, RuntimeBuilder, UseAwaitable, UseFuture,
    WaitResult, bind_executor, start_wait,
};
use futures::FutureExt;
use std::sync::{Arc, Mutex};

#[test]
fn test_callback_token_runs_handler_on_resource_executor() {
    init_tracing();
    let rt = Runtime::new();
    let timer = WaitTimer::with_duration(rt.executor(), UNIT / 4);
    let seen = Arc::new(Mutex::new(None));

    let executor = rt.executor().clone();
    let slot = seen.clone();
    start_wait(&timer, move |result: WaitResult| {
        *slot.lock().unwrap() = Some((result, executor.running_in_this_thread()));
    });

    rt.run();

    assert_eq!(*seen.lock().unwrap(), Some(((None, true), true)));
}

#[test]
fn test_future_token_starts_immediately() {
    init_tracing();
    let rt = Runtime::new();
    let wait = ManualWait::new(rt.executor());

    let pending = start_wait(&wait, UseFuture);
    assert_eq!(wait.pending(), 1, "UseFuture should start the wait eagerly");

    wait.fire();
    assert_eq!(rt.block_on(pending), Ok((None, true)));
}

#[test]
fn test_awaitable_token_is_lazy() {
    init_tracing();
    let rt = Runtime::new();
    let wait = ManualWait::new(rt.executor());

    let result = rt.block_on(async {
        let mut awaitable = start_wait(&wait, UseAwaitable);
        assert!(!awaitable.is_started());
        assert_eq!(wait.pending(), 0, "Nothing should start before the first poll");

        assert!(futures::poll!(&mut awaitable).is_pending());
        assert!(awaitable.is_started());
        assert_eq!(wait.pending(), 1);

        wait.cancel();
        awaitable.await
    });

    assert_eq!(result, Ok((None, false)));
}

#[test]
fn test_dropped_awaitable_never_starts() {
    init_tracing();
    let rt = Runtime::new();
    let wait = ManualWait::new(rt.executor());

    drop(start_wait(&wait, UseAwaitable));

    assert_eq!(wait.pending(), 0);
    assert_eq!(rt.executor().outstanding_work(), 0);
}

#[test]
fn test_future_reports_abandoned_when_runtime_drops_completion() {
    init_tracing();
    let rt = Runtime::new();
    let wait = ManualWait::new(rt.executor());

    let pending = start_wait(&wait, UseFuture);
    wait.fire();
    assert_eq!(rt.executor().queued_jobs(), 1);

    // The posted completion is discarded with the runtime.
    drop(rt);

    assert_eq!(futures::executor::block_on(pending), Err(Abandoned));
}

#[test]
fn test_future_reports_abandoned_when_resource_outlives_runtime() {
    init_tracing();
    let rt = Runtime::new();
    let executor = rt.executor().clone();
    let wait = ManualWait::new(&executor);

    let pending = start_wait(&wait, UseFuture);
    drop(rt);

    // The completion is posted to a closed executor and dropped there.
    assert_eq!(wait.fire(), 1);
    assert_eq!(executor.queued_jobs(), 0);
    assert_eq!(executor.outstanding_work(), 0);

    assert_eq!(pending.now_or_never(), Some(Err(Abandoned)));
}

#[test]
fn test_timer_waits_are_abandoned_with_their_runtime() {
    init_tracing();
    let rt = Runtime::new();
    let executor = rt.executor().clone();
    let timer = WaitTimer::with_duration(&executor, UNIT * 10);

    let started_before = start_wait(&timer, UseFuture);
    drop(rt);
    let started_after = start_wait(&timer, UseFuture);

    assert_eq!(executor.pending_timers(), 0);
    assert_eq!(timer.cancel(), 0);
    assert_eq!(executor.outstanding_work(), 0);

    assert_eq!(started_before.now_or_never(), Some(Err(Abandoned)));
    assert_eq!(started_after.now_or_never(), Some(Err(Abandoned)));
}

#[test]
fn test_bound_handler_runs_on_its_own_executor() {
    init_tracing();
    let resource_rt = Runtime::new();
    let handler_rt = Runtime::new();
    let timer = WaitTimer::with_duration(resource_rt.executor(), UNIT / 4);
    let recorder = Recorder::new();

    let resource_executor = resource_rt.executor().clone();
    let handler_executor = handler_rt.executor().clone();
    let events = recorder.clone();
    start_wait(
        &timer,
        bind_executor(handler_rt.executor(), move |(error, succeeded): WaitResult| {
            events.push(format!(
                "{error:?} {succeeded} on handler executor: {}, on resource executor: {}",
                handler_executor.running_in_this_thread(),
                resource_executor.running_in_this_thread(),
            ));
        }),
    );

    // The operation keeps the handler executor busy until it delivers.
    assert_eq!(handler_rt.executor().outstanding_work(), 1);

    resource_rt.run();
    assert!(recorder.events().is_empty(), "Handler must not run on the resource executor");
    assert_eq!(handler_rt.executor().queued_jobs(), 1);

    handler_rt.run();
    assert_eq!(
        recorder.events(),
        vec!["None true on handler executor: true, on resource executor: false"]
    );
}

#[test]
fn test_bound_future_token_delivers_through_other_executor() {
    init_tracing();
    let resource_rt = Runtime::new();
    let handler_rt = Runtime::new();
    let wait = ManualWait::new(resource_rt.executor());

    let pending = start_wait(&wait, bind_executor(handler_rt.executor(), UseFuture));
    wait.fire();

    assert_eq!(resource_rt.executor().queued_jobs(), 0);
    assert_eq!(handler_rt.executor().queued_jobs(), 1);

    assert_eq!(handler_rt.block_on(pending), Ok((None, true)));
}

#[test]
fn test_awaitable_delivers_on_awaiting_executor() {
    init_tracing();
    let resource_rt = RuntimeBuilder::new()
        .worker_threads(2)
        .thread_name("resource")
        .build()
        .unwrap();
    let task_rt = Runtime::new();
    let timer = WaitTimer::with_duration(resource_rt.executor(), UNIT);

    let result = task_rt.block_on(async {
        let mut awaitable = start_wait(&timer, UseAwaitable);
        assert!(futures::poll!(&mut awaitable).is_pending());

        // Work is held on both sides while the wait is pending.
        assert_eq!(task_rt.executor().outstanding_work(), 1);
        assert!(resource_rt.executor().outstanding_work() >= 2);

        awaitable.await
    });

    assert_eq!(result, Ok((None, true)));
}

#[test]
fn test_operations_started_from_spawned_tasks() {
    init_tracing();
    let rt = RuntimeBuilder::new().worker_threads(4).build().unwrap();
    assert_eq!(rt.background_workers(), 3);

    let handles: Vec<_> = (0..8u32)
        .map(|i| {
            let executor = rt.executor().clone();

            rt.spawn(async move {
                let timer = WaitTimer::with_duration(&executor, UNIT / 8 * (i % 3));
                let result = start_wait(&timer, UseAwaitable).await;

                assert!(Executor::current().is_some_and(|current| current == executor));
                result
            })
        })
        .collect();

    let results = rt.block_on(async {
        let mut outputs = Vec::new();
        for handle in handles {
            outputs.push(handle.await);
        }
        outputs
    });

    assert_eq!(results, vec![Ok((None, true)); 8]);
}
