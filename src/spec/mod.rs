//! Command and parameter specifications.
//!
//! Plain configuration structs assembled by chained setters; all names are
//! validated for uniqueness when the specs are frozen into a
//! [`CommandRegistry`]. Nothing here parses input; specs only declare what
//! the resolver should produce.

mod registry;

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::convert::Value;
use crate::engine::Context;
use crate::error::HandlerError;

pub use registry::{CommandDef, CommandRegistry};

/// The body of a command. Receives fully resolved, typed arguments only.
pub type Handler<S> = Arc<dyn Fn(&mut Context<S>) -> Result<(), HandlerError> + Send + Sync>;

type Validator = Arc<dyn Fn(&(dyn Any + Send + Sync)) -> bool + Send + Sync>;

/// A positional argument declaration.
///
/// Declaration order on a command is the positional binding order.
#[derive(Clone)]
pub struct ArgSpec {
    name: String,
    description: String,
    ty: TypeId,
    type_name: &'static str,
    validator: Option<Validator>,
}

impl ArgSpec {
    /// Declares a positional argument converted to `T`.
    pub fn of<T: Any + Send + Sync>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ty: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            validator: None,
        }
    }

    /// Attaches a predicate run against the converted value.
    ///
    /// `T` must be the declared argument type.
    pub fn validate<T: Any>(mut self, pred: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        assert_eq!(
            TypeId::of::<T>(),
            self.ty,
            "validator type must match the declared type of \"{}\"",
            self.name
        );
        self.validator = Some(Arc::new(move |value| {
            value.downcast_ref::<T>().is_some_and(|value| pred(value))
        }));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn ty(&self) -> TypeId {
        self.ty
    }

    pub(crate) fn accepts(&self, value: &(dyn Any + Send + Sync)) -> bool {
        match &self.validator {
            Some(validator) => validator(value),
            None => true,
        }
    }
}

/// A named `--key=value` option declaration.
///
/// Options are identified by key, not position, and may carry a default
/// used verbatim when the option is absent from input.
#[derive(Clone)]
pub struct OptionSpec {
    key: String,
    description: String,
    ty: TypeId,
    type_name: &'static str,
    validator: Option<Validator>,
    default: Option<Value>,
}

impl OptionSpec {
    /// Declares an option converted to `T`.
    pub fn of<T: Any + Send + Sync>(
        key: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            ty: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            validator: None,
            default: None,
        }
    }

    /// Sets the value used when the option is not provided.
    ///
    /// Defaults are already of the target type; they are never converted or
    /// validated at resolution time.
    pub fn default_value<T: Any + Send + Sync>(mut self, value: T) -> Self {
        assert_eq!(
            TypeId::of::<T>(),
            self.ty,
            "default type must match the declared type of \"{}\"",
            self.key
        );
        self.default = Some(Arc::new(value));
        self
    }

    /// Attaches a predicate run against converted input values.
    pub fn validate<T: Any>(mut self, pred: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        assert_eq!(
            TypeId::of::<T>(),
            self.ty,
            "validator type must match the declared type of \"{}\"",
            self.key
        );
        self.validator = Some(Arc::new(move |value| {
            value.downcast_ref::<T>().is_some_and(|value| pred(value))
        }));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn ty(&self) -> TypeId {
        self.ty
    }

    pub(crate) fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub(crate) fn accepts(&self, value: &(dyn Any + Send + Sync)) -> bool {
        match &self.validator {
            Some(validator) => validator(value),
            None => true,
        }
    }
}

/// A boolean `--name` flag declaration. Presence only, no value.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    name: String,
    description: String,
}

impl FlagSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Configuration for one command, prior to registry validation.
///
/// A spec without an explicit handler gets a no-op body; such commands are
/// typically pure groupings for subcommands.
#[derive(Clone)]
pub struct CommandSpec<S> {
    name: String,
    description: String,
    handler: Handler<S>,
    args: Vec<ArgSpec>,
    options: Vec<OptionSpec>,
    flags: Vec<FlagSpec>,
    subcommands: Vec<CommandSpec<S>>,
}

impl<S: 'static> CommandSpec<S> {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Arc::new(|_| Ok(())),
            args: Vec::new(),
            options: Vec::new(),
            flags: Vec::new(),
            subcommands: Vec::new(),
        }
    }

    /// Sets the command body.
    pub fn handler(
        mut self,
        handler: impl Fn(&mut Context<S>) -> Result<(), HandlerError> + Send + Sync + 'static,
    ) -> Self {
        self.handler = Arc::new(handler);
        self
    }

    /// Appends a positional argument; call order defines binding order.
    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.args.push(spec);
        self
    }

    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.options.push(spec);
        self
    }

    pub fn flag(mut self, spec: FlagSpec) -> Self {
        self.flags.push(spec);
        self
    }

    /// Nests a subcommand under this command.
    pub fn subcommand(mut self, spec: CommandSpec<S>) -> Self {
        self.subcommands.push(spec);
        self
    }
}
