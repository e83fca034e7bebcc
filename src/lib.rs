//! Commandant: a typed command-invocation pipeline.
//!
//! Turns a raw line of text into the execution of a strongly-typed, named
//! operation selected from a hierarchy of registered commands grouped into
//! isolated environments:
//!
//! ```text
//! text → tokenize → route environment → walk command tree → classify
//! residue → convert + validate → Context → handler
//! ```
//!
//! Each stage is a pure function over immutable structures built once at
//! startup, so concurrent invocations share everything without locks.
//! Quoting and escaping, `--key=value` options, `--flag` flags, exact
//! positional arity, pluggable converters with validators, option
//! defaults, and greedy-prefix subcommand matching all live in the
//! pipeline; handlers only ever see fully resolved, typed arguments.

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod parse;
pub mod resolve;
pub mod spec;

pub use convert::{ConvertError, ConverterRegistry, Value};
pub use engine::{AsyncExecutor, Context, Engine, Environment, Executor, Shell};
pub use error::{BuildError, Error, HandlerError};
pub use parse::{classify, tokenize, Invocation, ParsedArgs, TokenizeError};
pub use resolve::{resolve, TypedArgs};
pub use spec::{ArgSpec, CommandDef, CommandRegistry, CommandSpec, FlagSpec, Handler, OptionSpec};
