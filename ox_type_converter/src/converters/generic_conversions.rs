//! Generic conversion functions
//!
//! Kind-level coercion between types sharing a representation, and zero values
//! for nil sources.

use crate::converters::numeric_conversions::coerce_numeric;
use crate::error::ConvertError;
use crate::value::{Data, Value};
use crate::value_type::{Kind, TypeDescriptor};

fn is_byte_sequence(ty: &TypeDescriptor) -> bool {
    ty.kind() == Kind::Sequence && ty.elem().map(|e| e.kind()) == Some(Kind::Uint8)
}

/// Zero value of `target`, used when a nil source is converted.
pub fn zero_value(target: &TypeDescriptor) -> Option<Value> {
    let data = match target.kind() {
        Kind::Bool => Data::Bool(false),
        kind if kind.is_signed() => Data::Int(0),
        kind if kind.is_unsigned() => Data::Uint(0),
        kind if kind.is_float() => Data::Float(0.0),
        Kind::String => Data::Str(String::new()),
        Kind::Sequence => Data::Seq(Vec::new()),
        Kind::Map => Data::Map(Vec::new()),
        Kind::Nil | Kind::Interface => return Some(Value::nil()),
        _ => return None,
    };
    Some(Value::typed(target, data))
}

/// Direct representation coercion, the last resort of the resolution chain.
///
/// Covers values satisfying an interface target, same-kind aliasing, numeric
/// widening and narrowing, and `String` to and from byte sequences. Anything
/// else is [`ConvertError::IncompatibleTypes`].
pub fn coerce_kind(source: Value, target: &TypeDescriptor) -> Result<Value, ConvertError> {
    if target.is_interface() && source.ty().satisfies(target) {
        // Interfaces have no instances; the value keeps its concrete type.
        return Ok(source);
    }

    let source_kind = source.kind();
    let target_kind = target.kind();

    if source_kind == target_kind
        && (matches!(source_kind, Kind::Bool | Kind::String) || source_kind.is_numeric())
    {
        return Ok(Value::typed(target, source.into_data()));
    }

    if source_kind.is_numeric() && target_kind.is_numeric() {
        if let Some(data) = coerce_numeric(source.data(), target_kind) {
            return Ok(Value::typed(target, data));
        }
    }

    if source_kind == Kind::String && is_byte_sequence(target) {
        if let (Some(text), Some(elem)) = (source.as_str(), target.elem()) {
            let bytes = text
                .bytes()
                .map(|b| Value::typed(elem, Data::Uint(b as u64)))
                .collect();
            return Ok(Value::typed(target, Data::Seq(bytes)));
        }
    }

    if is_byte_sequence(source.ty()) && target_kind == Kind::String {
        if let Some(items) = source.as_slice() {
            let bytes: Option<Vec<u8>> = items.iter().map(|item| item.as_u64().map(|b| b as u8)).collect();
            if let Some(bytes) = bytes {
                return Ok(Value::typed(target, Data::Str(String::from_utf8(bytes)?)));
            }
        }
    }

    Err(ConvertError::incompatible(source.ty(), target))
}
