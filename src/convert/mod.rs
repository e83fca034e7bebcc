//! Type converters: pure, failable string-to-value functions.
//!
//! Converters are registered per target type during the build phase and
//! looked up by type tag during resolution. The registry is immutable once
//! it is handed to an environment, so concurrent invocations share it
//! without locks.

mod builtin;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::error::BuildError;

/// A converted value, type-erased for storage in typed-argument maps.
pub type Value = Arc<dyn Any + Send + Sync>;

/// Failure reported by a converter for an unparseable input string.
///
/// The resolver attaches the offending raw string and the declared type to
/// the reason before surfacing it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ConvertError {
    reason: String,
}

impl ConvertError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

type ErasedConverter = Arc<dyn Fn(&str) -> Result<Value, ConvertError> + Send + Sync>;

/// Immutable mapping from a target type to its converter.
///
/// All registration happens on a `&mut` registry during construction; once
/// the registry is moved into an environment there is no writer left.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<TypeId, ErasedConverter>,
}

impl ConverterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the standard converter set:
    /// `String`, `bool`, `i16`, `i32`, `i64`, `f32`, `f64`, and `PathBuf`.
    pub fn standard() -> Self {
        builtin::standard()
    }

    /// Registers a converter for `T`.
    ///
    /// Fails if a converter for `T` is already present; existing entries are
    /// never overwritten.
    pub fn register<T, F>(&mut self, convert: F) -> Result<(), BuildError>
    where
        T: Any + Send + Sync,
        F: Fn(&str) -> Result<T, ConvertError> + Send + Sync + 'static,
    {
        let ty = TypeId::of::<T>();
        if self.converters.contains_key(&ty) {
            return Err(BuildError::DuplicateConverter {
                type_name: std::any::type_name::<T>(),
            });
        }

        self.converters.insert(
            ty,
            Arc::new(move |raw| convert(raw).map(|value| Arc::new(value) as Value)),
        );
        Ok(())
    }

    pub(crate) fn lookup(&self, ty: TypeId) -> Option<&ErasedConverter> {
        self.converters.get(&ty)
    }
}
