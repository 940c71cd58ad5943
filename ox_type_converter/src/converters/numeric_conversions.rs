//! Numeric conversion functions
//!
//! Width normalization, numeric coercion between kinds, and the textual
//! rendering of numbers.

use crate::value::Data;
use crate::value_type::Kind;

/// Significant digits used when rendering floats.
pub const FLOAT_PRECISION: usize = 6;

/// Wrap a signed integer to the width of `kind`.
pub fn wrap_signed(value: i64, kind: Kind) -> i64 {
    match kind {
        Kind::Int8 => value as i8 as i64,
        Kind::Int16 => value as i16 as i64,
        Kind::Int32 => value as i32 as i64,
        _ => value,
    }
}

/// Wrap an unsigned integer to the width of `kind`.
pub fn wrap_unsigned(value: u64, kind: Kind) -> u64 {
    match kind {
        Kind::Uint8 => value as u8 as u64,
        Kind::Uint16 => value as u16 as u64,
        Kind::Uint32 => value as u32 as u64,
        _ => value,
    }
}

/// Round a float to the precision of `kind`.
pub fn round_float(value: f64, kind: Kind) -> f64 {
    match kind {
        Kind::Float32 => value as f32 as f64,
        _ => value,
    }
}

/// Bring numeric payloads in line with the width of `kind`. Other payloads
/// pass through untouched.
pub fn normalize(data: Data, kind: Kind) -> Data {
    match data {
        Data::Int(i) if kind.is_signed() => Data::Int(wrap_signed(i, kind)),
        Data::Uint(u) if kind.is_unsigned() => Data::Uint(wrap_unsigned(u, kind)),
        Data::Float(f) if kind.is_float() => Data::Float(round_float(f, kind)),
        other => other,
    }
}

/// Float to signed integer, truncating toward zero and saturating at the
/// bounds of the target width.
fn float_to_signed(value: f64, kind: Kind) -> i64 {
    match kind {
        Kind::Int8 => value as i8 as i64,
        Kind::Int16 => value as i16 as i64,
        Kind::Int32 => value as i32 as i64,
        _ => value as i64,
    }
}

fn float_to_unsigned(value: f64, kind: Kind) -> u64 {
    match kind {
        Kind::Uint8 => value as u8 as u64,
        Kind::Uint16 => value as u16 as u64,
        Kind::Uint32 => value as u32 as u64,
        _ => value as u64,
    }
}

/// Convert a numeric payload to the representation of another numeric kind.
///
/// Integers wrap (two's complement), floats truncate toward zero. Returns
/// `None` for non-numeric payloads or targets.
pub fn coerce_numeric(data: &Data, target: Kind) -> Option<Data> {
    let converted = match *data {
        Data::Int(i) if target.is_signed() => Data::Int(wrap_signed(i, target)),
        Data::Int(i) if target.is_unsigned() => Data::Uint(wrap_unsigned(i as u64, target)),
        Data::Int(i) if target.is_float() => Data::Float(round_float(i as f64, target)),
        Data::Uint(u) if target.is_signed() => Data::Int(wrap_signed(u as i64, target)),
        Data::Uint(u) if target.is_unsigned() => Data::Uint(wrap_unsigned(u, target)),
        Data::Uint(u) if target.is_float() => Data::Float(round_float(u as f64, target)),
        Data::Float(f) if target.is_signed() => Data::Int(float_to_signed(f, target)),
        Data::Float(f) if target.is_unsigned() => Data::Uint(float_to_unsigned(f, target)),
        Data::Float(f) if target.is_float() => Data::Float(round_float(f, target)),
        _ => return None,
    };
    Some(converted)
}

/// Render a signed integer in base 10.
pub fn format_int(value: i64) -> String {
    value.to_string()
}

/// Render an unsigned integer in base 10.
pub fn format_uint(value: u64) -> String {
    value.to_string()
}

/// Render a float with six significant digits in the `%g` style: trailing
/// zeros dropped, exponent notation when the decimal exponent is below -4 or
/// at least six.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value == 0.0 {
        return format!("{sign}0");
    }

    // Rounded to FLOAT_PRECISION significant digits, e.g. "9.20000e0".
    let scientific = format!("{:.*e}", FLOAT_PRECISION - 1, value.abs());
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let mut digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    while digits.len() > 1 && digits.ends_with('0') {
        digits.pop();
    }

    if exponent < -4 || exponent >= FLOAT_PRECISION as i32 {
        let (head, tail) = digits.split_at(1);
        let mut out = format!("{sign}{head}");
        if !tail.is_empty() {
            out.push('.');
            out.push_str(tail);
        }
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        out.push_str(&format!("e{}{:02}", exponent_sign, exponent.abs()));
        out
    } else if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        format!("{sign}0.{zeros}{digits}")
    } else {
        let integer_len = exponent as usize + 1;
        if digits.len() <= integer_len {
            let zeros = "0".repeat(integer_len - digits.len());
            format!("{sign}{digits}{zeros}")
        } else {
            let (integer, fraction) = digits.split_at(integer_len);
            format!("{sign}{integer}.{fraction}")
        }
    }
}
