//! Argument resolution: classified strings to typed, validated values.
//!
//! Resolution is purely functional over its inputs. It performs no I/O,
//! touches no shared mutable state, and is safe to run concurrently for
//! independent invocations.

use std::any::Any;
use std::collections::{HashMap, HashSet};

use crate::convert::{ConverterRegistry, Value};
use crate::error::Error;
use crate::parse::ParsedArgs;
use crate::spec::CommandDef;

/// The immutable result of resolution: converted positionals, converted or
/// defaulted options, and the set of present flags.
///
/// Values are looked up by declared name and downcast to their declared
/// type. An option with no input value and no default is simply absent.
#[derive(Default)]
pub struct TypedArgs {
    args: HashMap<String, Value>,
    options: HashMap<String, Value>,
    flags: HashSet<String>,
}

impl std::fmt::Debug for TypedArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedArgs")
            .field("args", &self.args.keys().collect::<Vec<_>>())
            .field("options", &self.options.keys().collect::<Vec<_>>())
            .field("flags", &self.flags)
            .finish()
    }
}

impl TypedArgs {
    /// Returns the positional argument `name` as a `T`.
    ///
    /// `None` if the name was not declared or `T` is not its declared type.
    pub fn arg<T: Any>(&self, name: &str) -> Option<&T> {
        self.args.get(name)?.downcast_ref()
    }

    /// Returns the option `key` as a `T`, converted from input or taken
    /// verbatim from the declared default.
    pub fn option<T: Any>(&self, key: &str) -> Option<&T> {
        self.options.get(key)?.downcast_ref()
    }

    /// Whether the flag `name` was passed. Purely set membership; querying
    /// a declared-but-absent flag is not an error.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }
}

/// Resolves classified residue against a command definition.
///
/// Steps, in order: exact positional arity check; conversion and validation
/// of each positional in declared order; conversion and validation of each
/// provided option, or its default verbatim when absent; intersection of
/// passed flags with declared flags. Any failure aborts before the handler
/// is ever invoked.
pub fn resolve<S: 'static>(
    parsed: &ParsedArgs,
    def: &CommandDef<S>,
    converters: &ConverterRegistry,
) -> Result<TypedArgs, Error> {
    if parsed.positionals.len() != def.args().len() {
        return Err(Error::ArgCount {
            command: def.name().to_string(),
            expected: def.args().len(),
            actual: parsed.positionals.len(),
        });
    }

    let mut resolved = TypedArgs::default();

    for (spec, raw) in def.args().iter().zip(&parsed.positionals) {
        let value = convert(converters, spec.ty(), spec.type_name(), raw)?;
        if !spec.accepts(&*value) {
            return Err(Error::ArgValidation {
                name: spec.name().to_string(),
                value: raw.clone(),
            });
        }
        resolved.args.insert(spec.name().to_string(), value);
    }

    for spec in def.options() {
        match parsed.options.get(spec.key()) {
            Some(raw) => {
                let value = convert(converters, spec.ty(), spec.type_name(), raw)?;
                if !spec.accepts(&*value) {
                    return Err(Error::ArgValidation {
                        name: spec.key().to_string(),
                        value: raw.clone(),
                    });
                }
                resolved.options.insert(spec.key().to_string(), value);
            }
            // Defaults are already typed; no conversion, no validation.
            None => {
                if let Some(default) = spec.default() {
                    resolved
                        .options
                        .insert(spec.key().to_string(), default.clone());
                }
            }
        }
    }

    for spec in def.flags() {
        if parsed.flags.contains(spec.name()) {
            resolved.flags.insert(spec.name().to_string());
        }
    }

    Ok(resolved)
}

fn convert(
    converters: &ConverterRegistry,
    ty: std::any::TypeId,
    type_name: &'static str,
    raw: &str,
) -> Result<Value, Error> {
    let converter = converters
        .lookup(ty)
        .ok_or(Error::ConverterNotFound { type_name })?;

    converter(raw).map_err(|e| Error::Conversion {
        value: raw.to_string(),
        type_name,
        reason: e.reason().to_string(),
    })
}
