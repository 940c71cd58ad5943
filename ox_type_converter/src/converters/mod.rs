//! Built-in conversion rules
//!
//! These run after every custom strategy declined, in the order laid out in
//! [`convert_builtin`].

pub mod boolean_conversions;
pub mod container_conversions;
pub mod generic_conversions;
pub mod numeric_conversions;
pub mod string_conversions;

use log::trace;

use crate::engine::ConverterEngine;
use crate::error::ConvertError;
use crate::value::Value;
use crate::value_type::{Kind, TypeDescriptor};

/// Apply the built-in rules: nil to zero value, rendering to string targets,
/// parsing from string sources, container recursion, then kind coercion.
pub(crate) fn convert_builtin(
    engine: &ConverterEngine,
    source: Value,
    target: &TypeDescriptor,
    depth: usize,
) -> Result<Value, ConvertError> {
    if source.is_nil() {
        trace!("Nil source, using zero value of {}", target);
        return generic_conversions::zero_value(target)
            .ok_or_else(|| ConvertError::incompatible(source.ty(), target));
    }

    if target.kind() == Kind::String {
        if let Some(text) = string_conversions::render_text(&source) {
            trace!("Rendered {} as text for {}", source.ty(), target);
            return Ok(string_conversions::to_string_type(text, target));
        }
    }

    if source.kind() == Kind::String {
        if let Some(text) = source.as_str() {
            if let Some(value) = string_conversions::parse_scalar(text, target)? {
                trace!("Parsed {} from text", target);
                return Ok(value);
            }
        }
    }

    match (source.kind(), target.kind()) {
        (Kind::Sequence, Kind::Sequence) => {
            container_conversions::convert_sequence(engine, source, target, depth)
        }
        (Kind::Map, Kind::Map) => container_conversions::convert_map(engine, source, target, depth),
        _ => generic_conversions::coerce_kind(source, target),
    }
}
