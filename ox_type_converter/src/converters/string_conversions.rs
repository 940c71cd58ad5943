//! String conversion functions
//!
//! Parsing text into booleans and numbers sized to the target type, and
//! rendering values as text.

use crate::converters::boolean_conversions::{format_bool, parse_bool};
use crate::converters::numeric_conversions::{format_float, format_int, format_uint};
use crate::error::ConvertError;
use crate::value::{Data, Value};
use crate::value_type::{Kind, TypeDescriptor};

/// Parse `text` into a scalar of exactly `target`.
///
/// Returns `Ok(None)` when the target kind has no textual grammar. Parse
/// failures are returned as the parser reported them.
pub fn parse_scalar(text: &str, target: &TypeDescriptor) -> Result<Option<Value>, ConvertError> {
    let data = match target.kind() {
        Kind::Bool => Data::Bool(parse_bool(text)?),
        Kind::Int8 => Data::Int(text.parse::<i8>()? as i64),
        Kind::Int16 => Data::Int(text.parse::<i16>()? as i64),
        Kind::Int32 => Data::Int(text.parse::<i32>()? as i64),
        Kind::Int64 | Kind::Int => Data::Int(text.parse::<i64>()?),
        Kind::Uint8 => Data::Uint(text.parse::<u8>()? as u64),
        Kind::Uint16 => Data::Uint(text.parse::<u16>()? as u64),
        Kind::Uint32 => Data::Uint(text.parse::<u32>()? as u64),
        Kind::Uint64 | Kind::Uint => Data::Uint(text.parse::<u64>()?),
        Kind::Float32 => Data::Float(parse_float(text, text.parse::<f32>()? as f64)?),
        Kind::Float64 => Data::Float(parse_float(text, text.parse::<f64>()?)?),
        _ => return Ok(None),
    };
    Ok(Some(Value::typed(target, data)))
}

/// Reject values that overflowed the target width, unless the text spells an
/// infinity itself.
fn parse_float(text: &str, parsed: f64) -> Result<f64, ConvertError> {
    if parsed.is_infinite() && !is_infinity_literal(text) {
        return Err(ConvertError::ParseFloatRange {
            input: text.to_string(),
        });
    }
    Ok(parsed)
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(|c| c == '+' || c == '-').unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Text for `value` when it is a struct with the render capability or a
/// boolean or number. Other values have no default rendering.
pub fn render_text(value: &Value) -> Option<String> {
    if let Some(render) = value.as_object().and_then(|object| object.as_render()) {
        return Some(render.render_text());
    }

    match value.data() {
        Data::Bool(b) if value.kind() == Kind::Bool => Some(format_bool(*b)),
        Data::Int(i) if value.kind().is_signed() => Some(format_int(*i)),
        Data::Uint(u) if value.kind().is_unsigned() => Some(format_uint(*u)),
        Data::Float(f) if value.kind().is_float() => Some(format_float(*f)),
        _ => None,
    }
}

/// Re-encode text into the exact string-like `target` type.
pub fn to_string_type(text: String, target: &TypeDescriptor) -> Value {
    Value::typed(target, Data::Str(text))
}
