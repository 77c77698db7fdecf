//! Literal assembler.
//!
//! Turns the raw pieces handed over by the front-end into typed constants. String
//! and bytes literals arrive as a sequence of [`Fragment`]s: verbatim source text or
//! code points the front-end already decoded from escapes.

use crate::errors::LiteralError;

/// One segment of a quoted literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Source text copied as-is.
    Text(String),
    /// Escape-decoded values: code points for strings, byte values for bytes.
    CodePoints(Vec<u32>),
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::Text(text.to_string())
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Fragment::Text(text)
    }
}

impl From<Vec<u32>> for Fragment {
    fn from(code_points: Vec<u32>) -> Self {
        Fragment::CodePoints(code_points)
    }
}

const SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDFFF;

/// Concatenates fragments into a string, rejecting surrogate code points.
pub fn assemble_string(fragments: &[Fragment]) -> Result<String, LiteralError> {
    let mut text = String::new();
    for fragment in fragments {
        match fragment {
            Fragment::Text(chunk) => text.push_str(chunk),
            Fragment::CodePoints(code_points) => {
                for &cp in code_points {
                    if SURROGATES.contains(&cp) {
                        return Err(LiteralError::SurrogateCodePoint(cp));
                    }
                    let ch = char::from_u32(cp).ok_or(LiteralError::InvalidCodePoint(cp))?;
                    text.push(ch);
                }
            }
        }
    }
    Ok(text)
}

/// Concatenates fragments into bytes. Text contributes its UTF-8 encoding.
pub fn assemble_bytes(fragments: &[Fragment]) -> Result<Vec<u8>, LiteralError> {
    let mut bytes = Vec::new();
    for fragment in fragments {
        match fragment {
            Fragment::Text(chunk) => bytes.extend_from_slice(chunk.as_bytes()),
            Fragment::CodePoints(values) => {
                for &value in values {
                    let byte = u8::try_from(value).map_err(|_| LiteralError::ByteOutOfRange(value))?;
                    bytes.push(byte);
                }
            }
        }
    }
    Ok(bytes)
}

/// Parses a signed integer literal. A leading `-` negates; `0x` selects hex.
pub fn parse_int64(digits: &str) -> Result<i64, LiteralError> {
    let (negative, magnitude) = match digits.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, digits),
    };
    let magnitude = parse_magnitude(magnitude, digits)?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| LiteralError::IntegerOutOfRange(digits.to_string()))
}

/// Parses an unsigned integer literal. The caller strips the `u` suffix.
pub fn parse_uint64(digits: &str) -> Result<u64, LiteralError> {
    if digits.starts_with(['-', '+']) {
        return Err(LiteralError::MalformedNumber(digits.to_string()));
    }
    let magnitude = parse_magnitude(digits, digits)?;
    u64::try_from(magnitude).map_err(|_| LiteralError::IntegerOutOfRange(digits.to_string()))
}

/// Parses a decimal floating point literal. Overflow yields an infinity.
pub fn parse_double(digits: &str) -> Result<f64, LiteralError> {
    digits
        .parse::<f64>()
        .map_err(|_| LiteralError::MalformedNumber(digits.to_string()))
}

// Digits wider than 64 bits still fit in i128 up to 38 decimal places; anything
// longer is reported as out of range rather than malformed.
fn parse_magnitude(digits: &str, literal: &str) -> Result<i128, LiteralError> {
    let (radix, body) = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return Err(LiteralError::MalformedNumber(literal.to_string()));
    }
    i128::from_str_radix(body, radix)
        .map_err(|_| LiteralError::IntegerOutOfRange(literal.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_concatenate_left_to_right() {
        let fragments = vec![
            Fragment::from("ab"),
            Fragment::from(vec![0x63, 0x1F600]),
            Fragment::from("d"),
        ];
        assert_eq!(assemble_string(&fragments), Ok("abc\u{1F600}d".to_string()));
    }

    #[test]
    fn strings_reject_surrogates() {
        let lone = vec![Fragment::from(vec![0xDFFF])];
        assert_eq!(assemble_string(&lone), Err(LiteralError::SurrogateCodePoint(0xDFFF)));
        let paired = vec![Fragment::from(vec![0xD83D, 0xDE00])];
        assert_eq!(assemble_string(&paired), Err(LiteralError::SurrogateCodePoint(0xD83D)));
        let huge = vec![Fragment::from(vec![0x110000])];
        assert_eq!(assemble_string(&huge), Err(LiteralError::InvalidCodePoint(0x110000)));
    }

    #[test]
    fn bytes_take_raw_values_and_utf8_text() {
        let fragments = vec![Fragment::from("é"), Fragment::from(vec![0xD8, 0x00, 0xFF])];
        assert_eq!(assemble_bytes(&fragments), Ok(vec![0xC3, 0xA9, 0xD8, 0x00, 0xFF]));
        let wide = vec![Fragment::from(vec![0x100])];
        assert_eq!(assemble_bytes(&wide), Err(LiteralError::ByteOutOfRange(0x100)));
    }

    #[test]
    fn signed_integers() {
        assert_eq!(parse_int64("42"), Ok(42));
        assert_eq!(parse_int64("-42"), Ok(-42));
        assert_eq!(parse_int64("0x1F"), Ok(31));
        assert_eq!(parse_int64("-0x1F"), Ok(-31));
        assert_eq!(parse_int64("-9223372036854775808"), Ok(i64::MIN));
        assert_eq!(
            parse_int64("9223372036854775808"),
            Err(LiteralError::IntegerOutOfRange("9223372036854775808".into()))
        );
        assert_eq!(parse_int64("12a"), Err(LiteralError::MalformedNumber("12a".into())));
        assert_eq!(parse_int64("-"), Err(LiteralError::MalformedNumber("-".into())));
    }

    #[test]
    fn unsigned_integers() {
        assert_eq!(parse_uint64("18446744073709551615"), Ok(u64::MAX));
        assert_eq!(parse_uint64("0xFFFFFFFFFFFFFFFF"), Ok(u64::MAX));
        assert_eq!(
            parse_uint64("0xFFFFFFFFFFFFFFFFF"),
            Err(LiteralError::IntegerOutOfRange("0xFFFFFFFFFFFFFFFFF".into()))
        );
        assert_eq!(parse_uint64("-1"), Err(LiteralError::MalformedNumber("-1".into())));
    }

    #[test]
    fn doubles() {
        assert_eq!(parse_double("1.5"), Ok(1.5));
        assert_eq!(parse_double("-0.0").map(f64::is_sign_negative), Ok(true));
        assert_eq!(parse_double("1.99e90000009"), Ok(f64::INFINITY));
        assert!(parse_double("1.2.3").is_err());
    }
}
