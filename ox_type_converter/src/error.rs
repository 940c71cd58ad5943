use std::num::{ParseFloatError, ParseIntError};
use std::string::FromUtf8Error;

use thiserror::Error;

use crate::value_type::TypeDescriptor;

/// Errors surfaced by the conversion engine.
///
/// Parse failures from the built-in string rules are carried verbatim
/// (`#[error(transparent)]`), as are errors returned by custom converters.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("incompatible types: cannot convert {from} to {to}")]
    IncompatibleTypes { from: TypeDescriptor, to: TypeDescriptor },

    #[error("expected a reference, found {found}")]
    ExpectedReference { found: TypeDescriptor },

    #[error("{name} is not an interface type")]
    NotAnInterface { name: TypeDescriptor },

    #[error("conversion of {from} to {to} did not converge after {depth} re-dispatches")]
    DidNotConverge {
        from: TypeDescriptor,
        to: TypeDescriptor,
        depth: usize,
    },

    #[error(transparent)]
    ParseInt(#[from] ParseIntError),

    #[error(transparent)]
    ParseFloat(#[from] ParseFloatError),

    #[error("value out of range: {input:?}")]
    ParseFloatRange { input: String },

    #[error("invalid boolean syntax: {input:?}")]
    ParseBool { input: String },

    #[error(transparent)]
    InvalidUtf8(#[from] FromUtf8Error),

    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl ConvertError {
    pub fn incompatible(from: &TypeDescriptor, to: &TypeDescriptor) -> Self {
        ConvertError::IncompatibleTypes {
            from: from.clone(),
            to: to.clone(),
        }
    }

    /// Wrap an arbitrary error raised by a custom converter.
    pub fn custom<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ConvertError::Custom(error.into())
    }

    /// Custom converter failure described by a message only.
    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        ConvertError::Custom(message.into())
    }

    pub fn is_incompatible(&self) -> bool {
        matches!(self, ConvertError::IncompatibleTypes { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            ConvertError::ParseInt(_)
                | ConvertError::ParseFloat(_)
                | ConvertError::ParseFloatRange { .. }
                | ConvertError::ParseBool { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_are_transparent() {
        let parse_error = "XYZ".parse::<i32>().unwrap_err();
        let expected = parse_error.to_string();
        let error = ConvertError::from(parse_error);
        assert!(error.is_parse());
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_custom_message() {
        let error = ConvertError::msg("boom");
        assert_eq!(error.to_string(), "boom");
        assert!(!error.is_incompatible());
    }

    #[test]
    fn test_incompatible_display() {
        let error = ConvertError::incompatible(&TypeDescriptor::bool(), &TypeDescriptor::isize());
        assert!(error.is_incompatible());
        assert_eq!(error.to_string(), "incompatible types: cannot convert bool to isize");
    }
}
