//! Integration tests for the line-oriented shell loop.

mod common;

use std::io::Cursor;
use std::sync::Arc;

use parking_lot::Mutex;

use commandant::{Engine, Error, Shell};

use common::{git_environment, new_log, Log};

type Errors = Arc<Mutex<Vec<Error>>>;

fn shell_fixture() -> (Shell<Engine>, Log, Errors) {
    let log = new_log();
    let engine = Engine::new();
    engine
        .register(git_environment("git", &log))
        .expect("fresh engine accepts the environment");

    let errors: Errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let shell = Shell::new(engine, move |error| sink.lock().push(error));

    (shell, log, errors)
}

#[test]
fn executes_each_line_until_eof() {
    let (shell, log, errors) = shell_fixture();

    shell.run(Cursor::new("git echo one\ngit echo two\n"));

    assert_eq!(log.lock().as_slice(), ["one", "two"]);
    assert!(errors.lock().is_empty());
}

#[test]
fn empty_and_whitespace_lines_are_skipped() {
    let (shell, log, errors) = shell_fixture();

    shell.run(Cursor::new("\n   \n\t\ngit echo only\n\n"));

    assert_eq!(log.lock().as_slice(), ["only"]);
    assert!(errors.lock().is_empty());
}

#[test]
fn errors_go_to_the_handler_and_the_loop_continues() {
    let (shell, log, errors) = shell_fixture();

    shell.run(Cursor::new("git bogus\ngit echo after\n"));

    assert_eq!(log.lock().as_slice(), ["after"]);
    let errors = errors.lock();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        Error::CommandNotFound { name } if name == "bogus"
    ));
}

#[test]
fn final_line_without_newline_still_executes() {
    let (shell, log, _errors) = shell_fixture();

    shell.run(Cursor::new("git echo last"));

    assert_eq!(log.lock().as_slice(), ["last"]);
}

#[test]
fn spawn_runs_on_a_dedicated_thread_and_joins_at_eof() {
    let (shell, log, errors) = shell_fixture();

    let handle = shell.spawn(Cursor::new("git echo threaded\n"));
    handle.join().expect("shell thread exits cleanly");

    assert_eq!(log.lock().as_slice(), ["threaded"]);
    assert!(errors.lock().is_empty());
}
