//! Error types for the invocation pipeline.
//!
//! Runtime failures surface as [`Error`], a closed taxonomy covering every
//! stage from tokenization through handler execution. Failures during the
//! one-time construction phase (duplicate names, duplicate converters) are
//! reported as [`BuildError`] and can never occur during dispatch.

use thiserror::Error;

use crate::parse::TokenizeError;

/// A handler-reported failure, carried as the source of
/// [`Error::CommandExecution`].
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the pipeline entry points.
///
/// Every variant is raised synchronously to the immediate caller; nothing is
/// retried and nothing is swallowed. A failure at any resolution step aborts
/// before the handler runs, so [`Error::CommandExecution`] always means the
/// handler itself failed with fully validated arguments.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed quoting or escaping in the input line.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    /// Too few tokens to identify the environment or command.
    #[error("invalid invocation, expected: {expected}")]
    InvocationFormat { expected: &'static str },

    /// First token named no registered environment.
    #[error("unknown environment \"{name}\"")]
    EnvironmentNotFound { name: String },

    /// No command matched where a path token had to resolve.
    #[error("unknown command \"{name}\"")]
    CommandNotFound { name: String },

    /// Positional argument count did not match the command definition.
    #[error("command \"{command}\" expects {expected} argument(s), got {actual}")]
    ArgCount {
        command: String,
        expected: usize,
        actual: usize,
    },

    /// No converter registered for a declared parameter type.
    #[error("no converter registered for type {type_name}")]
    ConverterNotFound { type_name: &'static str },

    /// Input string was not parseable as the declared type.
    #[error("cannot convert \"{value}\" to {type_name}: {reason}")]
    Conversion {
        value: String,
        type_name: &'static str,
        reason: String,
    },

    /// Converted value was rejected by the parameter's validator.
    #[error("invalid value \"{value}\" for \"{name}\"")]
    ArgValidation { name: String, value: String },

    /// The handler itself failed after resolution succeeded.
    #[error("command \"{command}\" failed")]
    CommandExecution {
        command: String,
        #[source]
        source: HandlerError,
    },

    /// Submission was rejected because the executor has shut down.
    #[error("executor is closed")]
    ExecutorClosed,
}

/// Errors raised during the one-time, single-threaded build phase.
///
/// Duplicate registration fails immediately; nothing is ever silently
/// overwritten.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("command \"{name}\" already registered")]
    DuplicateCommand { name: String },

    #[error("argument \"{arg}\" declared twice on command \"{command}\"")]
    DuplicateArg { command: String, arg: String },

    #[error("option \"{key}\" declared twice on command \"{command}\"")]
    DuplicateOption { command: String, key: String },

    #[error("flag \"{flag}\" declared twice on command \"{command}\"")]
    DuplicateFlag { command: String, flag: String },

    #[error("converter for type {type_name} already registered")]
    DuplicateConverter { type_name: &'static str },

    #[error("environment \"{name}\" already registered")]
    DuplicateEnvironment { name: String },
}
