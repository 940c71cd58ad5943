//! Container conversion functions
//!
//! Sequences and mappings are rebuilt element by element, each element
//! re-entering the engine against the target's element (and key) type.

use crate::engine::ConverterEngine;
use crate::error::ConvertError;
use crate::value::{Data, EntryBuilder, Value};
use crate::value_type::TypeDescriptor;

/// Convert every item of a sequence to the target's element type, keeping
/// order and count. The first failing item aborts the conversion.
pub(crate) fn convert_sequence(
    engine: &ConverterEngine,
    source: Value,
    target: &TypeDescriptor,
    depth: usize,
) -> Result<Value, ConvertError> {
    let source_type = source.ty().clone();
    let (elem_type, items) = match (target.elem(), source.into_data()) {
        (Some(elem_type), Data::Seq(items)) => (elem_type, items),
        _ => return Err(ConvertError::incompatible(&source_type, target)),
    };

    let mut converted = Vec::with_capacity(items.len());
    for item in items {
        converted.push(engine.resolve(item, elem_type, depth)?);
    }
    Ok(Value::typed(target, Data::Seq(converted)))
}

/// Convert every entry of a mapping, values to the target's value type and keys
/// to its key type. Keys that collide after conversion keep the last value.
pub(crate) fn convert_map(
    engine: &ConverterEngine,
    source: Value,
    target: &TypeDescriptor,
    depth: usize,
) -> Result<Value, ConvertError> {
    let source_type = source.ty().clone();
    let (key_type, value_type, entries) = match (target.key(), target.elem(), source.into_data()) {
        (Some(key_type), Some(value_type), Data::Map(entries)) => (key_type, value_type, entries),
        _ => return Err(ConvertError::incompatible(&source_type, target)),
    };

    let mut converted = EntryBuilder::with_capacity(entries.len());
    for (key, value) in entries {
        let value = engine.resolve(value, value_type, depth)?;
        let key = engine.resolve(key, key_type, depth)?;
        converted.insert(key, value);
    }
    Ok(Value::typed(target, Data::Map(converted.into_entries())))
}
