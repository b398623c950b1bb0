mod common;

use common::{Recorder, UNIT, init_tracing};
use reactor_compose::time::WaitTimer;
use reactor_compose::{Runtime, RuntimeBuilder, UseFuture, WaitResult, start_wait};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[test]
fn test_built_runtime_completes_waits_on_workers() {
    init_tracing();
    let rt = RuntimeBuilder::new()
        .worker_threads(3)
        .thread_name("builder-test")
        .build()
        .unwrap();
    assert_eq!(rt.background_workers(), 2);

    // Nobody on this thread runs the executor, so a worker must deliver.
    let timer = WaitTimer::with_duration(rt.executor(), UNIT / 4);
    let (sender, receiver) = mpsc::channel();
    start_wait(&timer, move |result: WaitResult| {
        let name = thread::current().name().map(str::to_owned);
        sender.send((result, name)).unwrap();
    });

    let (result, name) = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(result, (None, true));
    assert!(
        name.is_some_and(|name| name.starts_with("builder-test-")),
        "Handler should run on a named worker thread"
    );
}

#[test]
fn test_zero_workers_is_single_threaded() {
    init_tracing();
    let rt = RuntimeBuilder::new().worker_threads(0).build().unwrap();
    assert_eq!(rt.background_workers(), 0);

    let timer = WaitTimer::new(rt.executor());
    let pending = start_wait(&timer, UseFuture);

    assert_eq!(rt.block_on(pending), Ok((None, true)));
}

#[test]
fn test_poll_delivers_only_ready_completions() {
    init_tracing();
    let rt = Runtime::builder().build().unwrap();
    let recorder = Recorder::new();

    let ready = WaitTimer::new(rt.executor());
    let later = WaitTimer::with_duration(rt.executor(), UNIT * 10);
    start_wait(&ready, recorder.handler("ready"));
    start_wait(&later, recorder.handler("later"));

    // Expiry callback, then the completion it posts.
    assert_eq!(rt.poll(), 2);
    assert_eq!(rt.poll(), 0);
    assert_eq!(recorder.events(), vec!["ready: None true"]);

    later.cancel();
    rt.run();
    assert_eq!(
        recorder.events(),
        vec!["ready: None true", "later: None false"]
    );
}

fn failing_handler(_: WaitResult) {
    panic!("handler failed");
}

#[test]
fn test_worker_survives_a_panicking_handler() {
    init_tracing();
    let rt = RuntimeBuilder::new()
        .worker_threads(2)
        .thread_name("panic-test")
        .build()
        .unwrap();
    assert_eq!(rt.background_workers(), 1);

    let failing = WaitTimer::new(rt.executor());
    start_wait(&failing, failing_handler);

    // Only one background worker exists, so it must outlive the panic.
    let healthy = WaitTimer::with_duration(rt.executor(), UNIT / 2);
    let (sender, receiver) = mpsc::channel();
    start_wait(&healthy, move |result: WaitResult| {
        sender.send(result).unwrap();
    });

    assert_eq!(
        receiver.recv_timeout(Duration::from_secs(5)).unwrap(),
        (None, true)
    );
}
