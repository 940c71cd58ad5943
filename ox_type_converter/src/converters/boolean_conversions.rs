//! Boolean conversion functions
//!
//! This module contains the textual grammar for booleans.

use crate::error::ConvertError;

/// Render a boolean as `"true"` or `"false"`.
pub fn format_bool(value: bool) -> String {
    value.to_string()
}

/// Parse a boolean. Accepts `1, t, T, TRUE, true, True` and
/// `0, f, F, FALSE, false, False`.
pub fn parse_bool(text: &str) -> Result<bool, ConvertError> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ConvertError::ParseBool {
            input: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bool() {
        assert_eq!(format_bool(true), "true");
        assert_eq!(format_bool(false), "false");
    }

    #[test]
    fn test_parse_bool() {
        for text in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(text).unwrap(), true, "{text}");
        }
        for text in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(text).unwrap(), false, "{text}");
        }
    }

    #[test]
    fn test_parse_bool_invalid() {
        let result = parse_bool("yes");
        assert!(matches!(result, Err(ConvertError::ParseBool { ref input }) if input == "yes"));
        assert!(parse_bool("tRUE").is_err());
        assert!(parse_bool("").is_err());
    }
}
