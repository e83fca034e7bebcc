//! Integration tests for the thread-pool executor.

mod common;

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use commandant::{AsyncExecutor, Engine, Error, Executor};

use common::{git_environment, new_log, Log};

type Errors = Arc<Mutex<Vec<Error>>>;

fn pool(workers: usize) -> (AsyncExecutor, Log, Errors) {
    let log = new_log();
    let engine = Engine::new();
    engine
        .register(git_environment("git", &log))
        .expect("fresh engine accepts the environment");

    let errors: Errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let executor = AsyncExecutor::new(
        Arc::new(engine) as Arc<dyn Executor + Send + Sync>,
        NonZeroUsize::new(workers).expect("worker count is nonzero"),
        move |error| sink.lock().push(error),
    );

    (executor, log, errors)
}

fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) {
    let start = Instant::now();
    while !done() {
        assert!(
            start.elapsed() < deadline,
            "condition not reached within {deadline:?}"
        );
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn submitted_lines_run_to_completion() {
    let (executor, log, errors) = pool(4);

    for i in 0..20 {
        executor.execute(&format!("git echo msg-{i}")).unwrap();
    }

    wait_until(Duration::from_secs(5), || log.lock().len() == 20);
    assert!(errors.lock().is_empty());

    // Ordering between concurrent submissions is unspecified; content is not.
    let mut seen = log.lock().clone();
    seen.sort();
    let mut expected: Vec<String> = (0..20).map(|i| format!("msg-{i}")).collect();
    expected.sort();
    assert_eq!(seen, expected);
}

#[test]
fn failures_route_to_the_error_handler_not_the_submitter() {
    let (executor, _log, errors) = pool(2);

    // Submission succeeds even though execution will fail.
    executor.execute("git bogus").unwrap();

    wait_until(Duration::from_secs(5), || !errors.lock().is_empty());
    assert!(matches!(
        &errors.lock()[0],
        Error::CommandNotFound { name } if name == "bogus"
    ));
}

#[test]
fn close_rejects_new_submissions() {
    let (executor, _log, _errors) = pool(2);

    assert!(!executor.is_closed());
    executor.close();
    assert!(executor.is_closed());

    assert!(matches!(
        executor.execute("git echo late").unwrap_err(),
        Error::ExecutorClosed
    ));
}

#[test]
fn queued_lines_still_run_after_close() {
    let (executor, log, errors) = pool(1);

    for i in 0..10 {
        executor.execute(&format!("git echo queued-{i}")).unwrap();
    }
    executor.close();

    // Drop joins the workers, which drain the queue first.
    drop(executor);

    assert_eq!(log.lock().len(), 10);
    assert!(errors.lock().is_empty());
}

#[test]
fn workers_terminate_once_closed_and_drained() {
    let (executor, _log, _errors) = pool(2);

    executor.close();
    wait_until(Duration::from_secs(5), || executor.is_terminated());
}
