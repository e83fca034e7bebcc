//! Integration tests for environment routing and greedy command dispatch.

mod common;

use commandant::{BuildError, Engine, Error, Executor};

use common::{git_environment, new_log};

fn single_env_engine() -> (Engine, common::Log) {
    let log = new_log();
    let engine = Engine::new();
    engine
        .register(git_environment("git", &log))
        .expect("fresh engine accepts the environment");
    (engine, log)
}

// =============================================================================
// GREEDY SUBCOMMAND RESOLUTION
// =============================================================================

#[test]
fn resolves_deepest_matching_subcommand() {
    let (engine, log) = single_env_engine();

    engine.execute("git remote add origin url").unwrap();

    assert_eq!(log.lock().as_slice(), ["add origin url tags=false"]);
}

#[test]
fn unmatched_token_becomes_residue_for_the_matched_command() {
    let (engine, _log) = single_env_engine();

    // `remote` declares no positionals, so `bogus` trips the arity check
    // rather than a command lookup failure.
    let err = engine.execute("git remote bogus").unwrap_err();

    assert!(matches!(
        err,
        Error::ArgCount { command, expected: 0, actual: 1 } if command == "remote"
    ));
}

#[test]
fn first_unmatched_token_is_command_not_found() {
    let (engine, _log) = single_env_engine();

    let err = engine.execute("git bogus remote add").unwrap_err();

    assert!(matches!(err, Error::CommandNotFound { name } if name == "bogus"));
}

#[test]
fn flags_stop_the_walk_and_join_the_residue() {
    let (engine, log) = single_env_engine();

    engine
        .execute("git remote add origin url --tags")
        .unwrap();

    assert_eq!(log.lock().as_slice(), ["add origin url tags=true"]);
}

#[test]
fn options_interleave_with_positionals() {
    let (engine, log) = single_env_engine();

    engine.execute("git sum 1 --scale=3 2").unwrap();

    assert_eq!(log.lock().as_slice(), ["9"]);
}

#[test]
fn handlers_see_the_routed_invocation() {
    let (engine, log) = single_env_engine();

    engine.execute("git whereami").unwrap();
    engine.execute("whereami").unwrap();

    assert_eq!(log.lock().as_slice(), ["git:whereami", "git:whereami"]);
}

#[test]
fn quoted_arguments_survive_the_full_pipeline() {
    let (engine, log) = single_env_engine();

    engine.execute("git echo \"hello world\"").unwrap();

    assert_eq!(log.lock().as_slice(), ["hello world"]);
}

// =============================================================================
// ENVIRONMENT ROUTING
// =============================================================================

#[test]
fn first_token_selects_the_environment() {
    let log = new_log();
    let engine = Engine::new();
    engine.register(git_environment("alpha", &log)).unwrap();
    engine.register(git_environment("beta", &log)).unwrap();

    engine.execute("beta echo hi").unwrap();

    assert_eq!(log.lock().as_slice(), ["hi"]);
}

#[test]
fn unknown_environment_fails_with_multiple_registered() {
    let log = new_log();
    let engine = Engine::new();
    engine.register(git_environment("alpha", &log)).unwrap();
    engine.register(git_environment("beta", &log)).unwrap();

    let err = engine.execute("gamma echo hi").unwrap_err();

    assert!(matches!(err, Error::EnvironmentNotFound { name } if name == "gamma"));
}

#[test]
fn single_environment_shortcut_dispatches_identically() {
    let (engine, log) = single_env_engine();

    engine.execute("git echo one").unwrap();
    engine.execute("echo two").unwrap();

    assert_eq!(log.lock().as_slice(), ["one", "two"]);
}

#[test]
fn empty_line_is_an_invocation_format_error() {
    let (engine, _log) = single_env_engine();

    assert!(matches!(
        engine.execute("").unwrap_err(),
        Error::InvocationFormat { .. }
    ));
    assert!(matches!(
        engine.execute("   ").unwrap_err(),
        Error::InvocationFormat { .. }
    ));
}

#[test]
fn environment_name_alone_is_an_invocation_format_error() {
    let (engine, _log) = single_env_engine();

    assert!(matches!(
        engine.execute("git").unwrap_err(),
        Error::InvocationFormat { .. }
    ));
}

#[test]
fn no_environments_registered_fails_lookup() {
    let engine = Engine::new();

    let err = engine.execute("anything at all").unwrap_err();

    assert!(matches!(err, Error::EnvironmentNotFound { name } if name == "anything"));
}

#[test]
fn unregister_removes_the_environment() {
    let log = new_log();
    let engine = Engine::new();
    engine.register(git_environment("alpha", &log)).unwrap();
    engine.register(git_environment("beta", &log)).unwrap();

    assert!(engine.unregister("beta"));
    assert!(!engine.unregister("beta"));

    let err = engine.execute("beta echo hi").unwrap_err();
    assert!(matches!(err, Error::EnvironmentNotFound { name } if name == "beta"));
}

// =============================================================================
// BUILD-PHASE FAILURES
// =============================================================================

#[test]
fn duplicate_environment_registration_fails() {
    let log = new_log();
    let engine = Engine::new();
    engine.register(git_environment("git", &log)).unwrap();

    let err = engine.register(git_environment("git", &log)).unwrap_err();

    assert_eq!(
        err,
        BuildError::DuplicateEnvironment {
            name: "git".to_string()
        }
    );
}

// =============================================================================
// HANDLER FAILURES
// =============================================================================

#[test]
fn handler_failure_is_wrapped_as_command_execution() {
    let (engine, _log) = single_env_engine();

    let err = engine.execute("git fail").unwrap_err();

    match err {
        Error::CommandExecution { command, source } => {
            assert_eq!(command, "fail");
            assert_eq!(source.to_string(), "handler exploded");
        }
        other => panic!("expected CommandExecution, got {other:?}"),
    }
}

#[test]
fn tokenization_errors_surface_from_execute() {
    let (engine, _log) = single_env_engine();

    assert!(matches!(
        engine.execute("git echo \"unterminated").unwrap_err(),
        Error::Tokenize(_)
    ));
}
