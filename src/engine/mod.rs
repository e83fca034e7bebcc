//! Dispatch: environments, the multi-environment engine, and execution
//! wrappers.
//!
//! An [`Environment`] owns one isolated command tree plus its converters and
//! walks it greedily, token by token, to find the deepest matching
//! subcommand. The [`Engine`] routes full input lines to environments by
//! their first token. [`AsyncExecutor`] and [`Shell`] sit above the
//! synchronous pipeline without changing its guarantees.

mod async_executor;
mod shell;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::convert::ConverterRegistry;
use crate::error::{BuildError, Error};
use crate::parse::{classify, tokenize, Invocation};
use crate::resolve::{resolve, TypedArgs};
use crate::spec::{CommandDef, CommandRegistry};

pub use async_executor::AsyncExecutor;
pub use shell::Shell;

const ENGINE_USAGE: &str = "<environment> <command> [args] [options]";
const COMMAND_USAGE: &str = "<command> [args] [options]";

/// Anything that can run one input line to completion.
pub trait Executor {
    /// Executes a single line. For synchronous implementations this returns
    /// once the handler has finished or failed; asynchronous ones may only
    /// report acceptance.
    fn execute(&self, line: &str) -> Result<(), Error>;
}

impl<T: Executor + ?Sized> Executor for Arc<T> {
    fn execute(&self, line: &str) -> Result<(), Error> {
        (**self).execute(line)
    }
}

/// The read surface handed to command handlers.
///
/// Wraps the resolved arguments, the originating invocation, the root
/// registry of the environment (for introspection such as help listings),
/// and a per-invocation state value produced by the environment's state
/// factory.
pub struct Context<S> {
    invocation: Invocation,
    args: TypedArgs,
    registry: Arc<CommandRegistry<S>>,
    state: S,
}

impl<S> Context<S> {
    /// Returns the positional argument `name` as a `T`.
    pub fn arg<T: std::any::Any>(&self, name: &str) -> Option<&T> {
        self.args.arg(name)
    }

    /// Returns the option `key` as a `T` (converted input or default).
    pub fn option<T: std::any::Any>(&self, key: &str) -> Option<&T> {
        self.args.option(key)
    }

    /// Whether the flag `name` was passed.
    pub fn flag(&self, name: &str) -> bool {
        self.args.flag(name)
    }

    pub fn args(&self) -> &TypedArgs {
        &self.args
    }

    /// The parsed invocation this context was built from.
    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// The environment's root command registry.
    pub fn registry(&self) -> &CommandRegistry<S> {
        &self.registry
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }
}

/// An isolated command namespace: one command tree, one converter registry,
/// one context state factory.
///
/// Immutable after construction; concurrent invocations share it freely.
pub struct Environment<S> {
    name: String,
    commands: Arc<CommandRegistry<S>>,
    converters: Arc<ConverterRegistry>,
    state: Arc<dyn Fn() -> S + Send + Sync>,
}

impl<S: 'static> Environment<S> {
    /// Creates an environment. The state factory runs once per invocation
    /// to produce the context state; shared services are typically captured
    /// in the closure and cloned out.
    pub fn new(
        name: impl Into<String>,
        commands: CommandRegistry<S>,
        converters: ConverterRegistry,
        state: impl Fn() -> S + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            commands: Arc::new(commands),
            converters: Arc::new(converters),
            state: Arc::new(state),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dispatches a token sequence within this environment.
    ///
    /// Walks the command tree greedily: tokens are consumed as subcommand
    /// names for as long as they match, without requiring a separator; the
    /// first non-matching token and everything after it become the residue
    /// resolved against the deepest matched definition.
    pub fn dispatch(&self, tokens: &[String]) -> Result<(), Error> {
        let Some(first) = tokens.first() else {
            return Err(Error::InvocationFormat {
                expected: COMMAND_USAGE,
            });
        };

        let Some(mut def) = self.commands.get(first) else {
            return Err(Error::CommandNotFound {
                name: first.clone(),
            });
        };

        let mut path = vec![first.clone()];
        let mut residue: &[String] = &[];

        for (i, token) in tokens.iter().enumerate().skip(1) {
            match def.subcommands().get(token) {
                Some(sub) => {
                    path.push(token.clone());
                    def = sub;
                }
                None => {
                    residue = &tokens[i..];
                    break;
                }
            }
        }

        let invocation = Invocation {
            environment: self.name.clone(),
            command_path: path,
            args: classify(residue),
        };

        let args = resolve(&invocation.args, def, &self.converters)?;
        self.run(def, invocation, args)
    }

    fn run(
        &self,
        def: &CommandDef<S>,
        invocation: Invocation,
        args: TypedArgs,
    ) -> Result<(), Error> {
        let mut context = Context {
            invocation,
            args,
            registry: Arc::clone(&self.commands),
            state: (self.state)(),
        };

        def.handler()(&mut context).map_err(|source| Error::CommandExecution {
            command: def.name().to_string(),
            source,
        })
    }
}

trait DynEnvironment: Send + Sync {
    fn dispatch(&self, tokens: &[String]) -> Result<(), Error>;
}

impl<S: 'static> DynEnvironment for Environment<S> {
    fn dispatch(&self, tokens: &[String]) -> Result<(), Error> {
        Environment::dispatch(self, tokens)
    }
}

/// Routes input lines to named environments.
///
/// The first token selects an environment. With exactly one environment
/// registered, a first token that matches no environment name is instead
/// treated as the start of the command path within that sole environment;
/// this shortcut is deliberate and lets single-namespace tools omit the
/// environment prefix entirely.
///
/// Registration and unregistration are safe concurrently with dispatch:
/// the map is read-locked only long enough to clone out a handle, never
/// across a handler run.
#[derive(Default)]
pub struct Engine {
    environments: RwLock<HashMap<String, Arc<dyn DynEnvironment>>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an environment under its name.
    ///
    /// Fails if the name is taken; the existing environment is untouched.
    pub fn register<S: 'static>(&self, environment: Environment<S>) -> Result<(), BuildError> {
        let mut environments = self.environments.write();
        if environments.contains_key(environment.name()) {
            return Err(BuildError::DuplicateEnvironment {
                name: environment.name().to_string(),
            });
        }

        tracing::debug!(environment = environment.name(), "environment registered");
        environments.insert(environment.name().to_string(), Arc::new(environment));
        Ok(())
    }

    /// Removes an environment by name. Returns whether it existed;
    /// invocations already dispatched into it run to completion.
    pub fn unregister(&self, name: &str) -> bool {
        let removed = self.environments.write().remove(name).is_some();
        if removed {
            tracing::debug!(environment = name, "environment unregistered");
        }
        removed
    }
}

impl Executor for Engine {
    fn execute(&self, line: &str) -> Result<(), Error> {
        let tokens = tokenize(line)?;
        let Some(first) = tokens.first() else {
            return Err(Error::InvocationFormat {
                expected: ENGINE_USAGE,
            });
        };

        // Clone the handle out so no lock is held while the handler runs.
        let routed = {
            let environments = self.environments.read();
            match environments.get(first) {
                Some(environment) => Some((Arc::clone(environment), 1)),
                None if environments.len() == 1 => environments
                    .values()
                    .next()
                    .map(|environment| (Arc::clone(environment), 0)),
                None => None,
            }
        };

        match routed {
            Some((environment, consumed)) => environment.dispatch(&tokens[consumed..]),
            None => Err(Error::EnvironmentNotFound {
                name: first.clone(),
            }),
        }
    }
}
