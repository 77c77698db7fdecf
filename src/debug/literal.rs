//! Canonical formatting of literal constants.
//!
//! Strings are walked grapheme by grapheme. A grapheme whose base character is a
//! letter, number, punctuation, symbol or space (optionally followed by combining
//! marks) is printed verbatim; anything else has its non-printable code points
//! escaped. Bytes are decoded one UTF-8 sequence at a time and every byte that does
//! not start a valid, printable sequence is written as `\xHH`.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::ast::Constant;

static PRINTABLE_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}\p{P}\p{S} ]$").expect("valid printable class"));

static PRINTABLE_GRAPHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\p{N}\p{P}\p{S} ]\p{M}*$").expect("valid grapheme class")
});

/// Formats a constant the way it appears in the debug string.
///
/// # Examples
///
/// ```rust
/// use cel_ast::ast::Constant;
/// use cel_ast::debug::format_literal;
/// assert_eq!(format_literal(&Constant::Uint64(7)), "7u");
/// assert_eq!(format_literal(&Constant::Double(1e6)), "1e+06");
/// assert_eq!(format_literal(&Constant::String("a\tb".into())), "\"a\\tb\"");
/// ```
pub fn format_literal(constant: &Constant) -> String {
    match constant {
        Constant::Null => "null".to_string(),
        Constant::Bool(value) => value.to_string(),
        Constant::Int64(value) => value.to_string(),
        Constant::Uint64(value) => format!("{value}u"),
        Constant::Double(value) => format_double(*value),
        Constant::String(text) => quote_string(text),
        Constant::Bytes(bytes) => quote_bytes(bytes),
    }
}

/// Plain decimal below 1e6 in magnitude, `d.ddde+NN` from there on.
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if value > -1e6 && value < 1e6 {
        if value != 0.0 && value.abs() < 1e-6 {
            // Shortest form switches to an exponent below one millionth.
            return format!("{value:e}");
        }
        return value.to_string();
    }
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.strip_prefix('-') {
            Some(negative) => format!("{mantissa}e-{negative:0>2}"),
            None => format!("{mantissa}e+{exponent:0>2}"),
        },
        None => formatted,
    }
}

/// Double-quotes `text`, escaping non-printable code points.
pub fn quote_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for grapheme in text.graphemes(true) {
        let printable = PRINTABLE_GRAPHEME.is_match(grapheme);
        for ch in grapheme.chars() {
            if printable || is_printable(ch) {
                push_printable(&mut quoted, ch);
            } else {
                push_escaped_char(&mut quoted, ch);
            }
        }
    }
    quoted.push('"');
    quoted
}

/// Renders bytes as `b"..."`, escaping invalid or non-printable sequences per byte.
pub fn quote_bytes(bytes: &[u8]) -> String {
    let mut quoted = String::with_capacity(bytes.len() + 3);
    quoted.push_str("b\"");
    let mut i = 0;
    while i < bytes.len() {
        match decode_printable(&bytes[i..]) {
            Some((ch, width)) => {
                push_printable(&mut quoted, ch);
                i += width;
            }
            None => {
                push_escaped_byte(&mut quoted, bytes[i]);
                i += 1;
            }
        }
    }
    quoted.push('"');
    quoted
}

fn is_printable(ch: char) -> bool {
    let mut buf = [0u8; 4];
    PRINTABLE_CHAR.is_match(ch.encode_utf8(&mut buf))
}

// Decodes one sequence from the start of `bytes`, if it is complete, valid and printable.
fn decode_printable(bytes: &[u8]) -> Option<(char, usize)> {
    let width = match bytes[0] {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return None,
    };
    let sequence = bytes.get(..width)?;
    let ch = std::str::from_utf8(sequence).ok()?.chars().next()?;
    if ch == char::REPLACEMENT_CHARACTER || !is_printable(ch) {
        return None;
    }
    Some((ch, width))
}

fn short_escape(ch: char) -> Option<&'static str> {
    match ch {
        '\u{07}' => Some("\\a"),
        '\u{08}' => Some("\\b"),
        '\u{0C}' => Some("\\f"),
        '\n' => Some("\\n"),
        '\r' => Some("\\r"),
        '\t' => Some("\\t"),
        '\u{0B}' => Some("\\v"),
        _ => None,
    }
}

fn push_printable(out: &mut String, ch: char) {
    match ch {
        '\\' => out.push_str("\\\\"),
        '"' => out.push_str("\\\""),
        _ => out.push(ch),
    }
}

fn push_escaped_char(out: &mut String, ch: char) {
    if let Some(escape) = short_escape(ch) {
        out.push_str(escape);
    } else if (ch as u32) > 0xFFFF {
        out.push_str(&format!("\\U{:08x}", ch as u32));
    } else {
        out.push_str(&format!("\\u{:04x}", ch as u32));
    }
}

fn push_escaped_byte(out: &mut String, byte: u8) {
    match short_escape(char::from(byte)) {
        Some(escape) => out.push_str(escape),
        None => out.push_str(&format!("\\x{byte:02x}")),
    }
}
