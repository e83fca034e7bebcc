//! The standard converter set.

use std::any::{Any, TypeId};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use super::{ConvertError, ConverterRegistry, Value};

/// Builds the default registry. Duplicates are impossible here: every entry
/// targets a distinct type.
pub(super) fn standard() -> ConverterRegistry {
    let mut registry = ConverterRegistry::new();

    add::<String>(&mut registry, |raw| Ok(raw.to_string()));
    add::<bool>(&mut registry, |raw| match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ConvertError::new(format!(
            "expected \"true\" or \"false\", got \"{other}\""
        ))),
    });
    add::<i16>(&mut registry, parse_number::<i16>);
    add::<i32>(&mut registry, parse_number::<i32>);
    add::<i64>(&mut registry, parse_number::<i64>);
    add::<f32>(&mut registry, parse_number::<f32>);
    add::<f64>(&mut registry, parse_number::<f64>);
    add::<PathBuf>(&mut registry, |raw| Ok(PathBuf::from(raw)));

    registry
}

fn add<T: Any + Send + Sync>(
    registry: &mut ConverterRegistry,
    convert: impl Fn(&str) -> Result<T, ConvertError> + Send + Sync + 'static,
) {
    registry.converters.insert(
        TypeId::of::<T>(),
        Arc::new(move |raw| convert(raw).map(|value| Arc::new(value) as Value)),
    );
}

fn parse_number<T>(raw: &str) -> Result<T, ConvertError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| ConvertError::new(e.to_string()))
}
