//! The frozen command tree: validated definitions and their registries.

use indexmap::IndexMap;

use std::collections::HashSet;

use super::{ArgSpec, CommandSpec, FlagSpec, Handler, OptionSpec};
use crate::error::BuildError;

/// A validated, immutable command definition.
///
/// Built once from a [`CommandSpec`] during registry construction and never
/// mutated afterwards, which is what lets concurrent invocations share the
/// tree without locks.
pub struct CommandDef<S> {
    name: String,
    description: String,
    handler: Handler<S>,
    args: Vec<ArgSpec>,
    options: Vec<OptionSpec>,
    flags: Vec<FlagSpec>,
    subcommands: CommandRegistry<S>,
}

impl<S: 'static> CommandDef<S> {
    fn build(spec: CommandSpec<S>) -> Result<Self, BuildError> {
        let mut arg_names = HashSet::new();
        for arg in &spec.args {
            if !arg_names.insert(arg.name().to_string()) {
                return Err(BuildError::DuplicateArg {
                    command: spec.name.clone(),
                    arg: arg.name().to_string(),
                });
            }
        }

        let mut option_keys = HashSet::new();
        for option in &spec.options {
            if !option_keys.insert(option.key().to_string()) {
                return Err(BuildError::DuplicateOption {
                    command: spec.name.clone(),
                    key: option.key().to_string(),
                });
            }
        }

        let mut flag_names = HashSet::new();
        for flag in &spec.flags {
            if !flag_names.insert(flag.name().to_string()) {
                return Err(BuildError::DuplicateFlag {
                    command: spec.name.clone(),
                    flag: flag.name().to_string(),
                });
            }
        }

        Ok(Self {
            name: spec.name,
            description: spec.description,
            handler: spec.handler,
            args: spec.args,
            options: spec.options,
            flags: spec.flags,
            subcommands: CommandRegistry::new(spec.subcommands)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Positional argument specs, in binding order.
    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn flags(&self) -> &[FlagSpec] {
        &self.flags
    }

    /// The registry of nested subcommands; empty for leaf commands.
    pub fn subcommands(&self) -> &CommandRegistry<S> {
        &self.subcommands
    }

    pub(crate) fn handler(&self) -> &Handler<S> {
        &self.handler
    }
}

/// An immutable, insertion-ordered mapping from command name to definition,
/// scoped to one level of the hierarchy.
pub struct CommandRegistry<S> {
    commands: IndexMap<String, CommandDef<S>>,
}

impl<S> std::fmt::Debug for CommandRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<S: 'static> CommandRegistry<S> {
    /// Validates and freezes a set of command specs.
    ///
    /// Fails on the first duplicate command name at this level, or any
    /// duplicate argument/option/flag name within a command, recursively
    /// through subcommands. Nothing is ever silently overwritten.
    pub fn new(specs: Vec<CommandSpec<S>>) -> Result<Self, BuildError> {
        let mut commands = IndexMap::new();

        for spec in specs {
            let def = CommandDef::build(spec)?;
            if commands.contains_key(def.name()) {
                return Err(BuildError::DuplicateCommand {
                    name: def.name().to_string(),
                });
            }
            commands.insert(def.name().to_string(), def);
        }

        Ok(Self { commands })
    }

    pub fn get(&self, name: &str) -> Option<&CommandDef<S>> {
        self.commands.get(name)
    }

    /// Definitions in registration order, for help listings and the like.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDef<S>> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
