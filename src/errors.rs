//! Error handling for tree construction.
//!
//! Only literal assembly can fail while building a tree. Malformed macro calls are
//! not errors: they fall back to ordinary calls and are left for later stages.
//! Internal invariant violations (for example an unbalanced indent in the debug
//! writer) panic instead of producing a partial result.

use miette::Diagnostic;
use thiserror::Error;

use crate::ast::Offset;

/// Convenience alias used across the builder.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Failure raised by a builder operation.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("invalid literal at offset {offset}: {reason}")]
    #[diagnostic(code(cel::literal::invalid))]
    InvalidLiteral {
        offset: Offset,
        #[source]
        reason: LiteralError,
    },
}

/// Why a literal could not be assembled.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("surrogate code point U+{0:04X} is not allowed in a string")]
    #[diagnostic(
        code(cel::literal::surrogate),
        help("surrogates, paired or lone, have no UTF-8 encoding")
    )]
    SurrogateCodePoint(u32),

    #[error("code point {0:#x} is outside the Unicode range")]
    #[diagnostic(code(cel::literal::code_point))]
    InvalidCodePoint(u32),

    #[error("value {0:#x} does not fit in a byte")]
    #[diagnostic(code(cel::literal::byte_range))]
    ByteOutOfRange(u32),

    #[error("integer literal '{0}' is out of range")]
    #[diagnostic(code(cel::literal::int_range))]
    IntegerOutOfRange(String),

    #[error("malformed numeric literal '{0}'")]
    #[diagnostic(code(cel::literal::malformed))]
    MalformedNumber(String),
}

impl BuildError {
    pub(crate) fn invalid_literal(offset: Offset, reason: LiteralError) -> Self {
        BuildError::InvalidLiteral { offset, reason }
    }

    /// Offset of the build call that failed.
    pub fn offset(&self) -> Offset {
        match self {
            BuildError::InvalidLiteral { offset, .. } => *offset,
        }
    }

    /// The underlying literal failure, if this is a literal error.
    pub fn literal_error(&self) -> Option<&LiteralError> {
        match self {
            BuildError::InvalidLiteral { reason, .. } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    #[test]
    fn display_names_the_offset_and_reason() {
        let err = BuildError::invalid_literal(7, LiteralError::SurrogateCodePoint(0xD800));
        assert_eq!(
            err.to_string(),
            "invalid literal at offset 7: surrogate code point U+D800 is not allowed in a string"
        );
        assert_eq!(err.offset(), 7);
    }

    #[test]
    fn report_carries_the_diagnostic_code() {
        let err = BuildError::invalid_literal(0, LiteralError::ByteOutOfRange(0x100));
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("cel::literal::invalid"));
    }
}
