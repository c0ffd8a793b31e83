//! Purpose: Decode entrypoints for raw response bodies plus failure classification.
//! Exports: `from_str`, `from_str_with`, `from_slice`, `from_slice_with`,
//! `ParseFailureCategory`, `categorize_error`, `categorize_message`, `hint_for_error`.
//! Role: Parser boundary that owns UTF-8 validation, BOM handling, and diagnostics.
//! Invariants: Category labels are stable once published; callers match on them.
//! Invariants: Hints never echo input payload text, only category/position/context.
use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::options::ParseOptions;
use crate::core::parser::parse_with;
use crate::core::value::Value;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseFailureCategory {
    Syntax,
    NumericRange,
    Utf8,
    DepthLimit,
    Unknown,
}

impl ParseFailureCategory {
    pub fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::NumericRange => "numeric-range",
            ParseFailureCategory::Utf8 => "utf8",
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::Unknown => "unknown",
        }
    }
}

pub fn from_str(text: &str) -> Result<Value, Error> {
    from_str_with(text, &ParseOptions::default())
}

pub fn from_str_with(text: &str, options: &ParseOptions) -> Result<Value, Error> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    match parse_with(text, options) {
        Ok(value) => {
            debug!(bytes = text.len(), kind = %value.kind(), "parsed json document");
            Ok(value)
        }
        Err(err) => {
            debug!(
                bytes = text.len(),
                category = categorize_error(&err).label(),
                position = ?err.position(),
                "json parse failed"
            );
            Err(err)
        }
    }
}

pub fn from_slice(bytes: &[u8]) -> Result<Value, Error> {
    from_slice_with(bytes, &ParseOptions::default())
}

pub fn from_slice_with(bytes: &[u8], options: &ParseOptions) -> Result<Value, Error> {
    let (skipped, body) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (UTF8_BOM.len(), rest),
        None => (0, bytes),
    };
    let text = std::str::from_utf8(body).map_err(|err| {
        let offset = skipped + err.valid_up_to() + 1;
        debug!(offset, "json body is not valid utf-8");
        Error::new(ErrorKind::InvalidUtf8)
            .with_message(format!("input is not valid utf-8 at byte {offset}"))
            .with_position(offset)
            .with_source(err)
    })?;
    from_str_with(text, options)
}

pub fn categorize_error(err: &Error) -> ParseFailureCategory {
    match err.kind() {
        ErrorKind::InvalidUtf8 => ParseFailureCategory::Utf8,
        ErrorKind::DepthLimit => ParseFailureCategory::DepthLimit,
        ErrorKind::MalformedNumber => match categorize_message(err.message()) {
            ParseFailureCategory::NumericRange => ParseFailureCategory::NumericRange,
            _ => ParseFailureCategory::Syntax,
        },
        kind if kind.is_parse() => ParseFailureCategory::Syntax,
        _ => ParseFailureCategory::Unknown,
    }
}

/// Classify a free-form parser message, e.g. from another JSON library.
pub fn categorize_message(message: &str) -> ParseFailureCategory {
    let message = message.to_ascii_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|needle| message.contains(needle));
    if has(&["utf-8", "utf8", "unicode"]) {
        ParseFailureCategory::Utf8
    } else if has(&["recursion limit", "depth"]) {
        ParseFailureCategory::DepthLimit
    } else if has(&["out of range", "overflow"]) {
        ParseFailureCategory::NumericRange
    } else if has(&[
        "expected",
        "unexpected",
        "eof",
        "invalid",
        "trailing",
        "unterminated",
        "malformed",
    ]) {
        ParseFailureCategory::Syntax
    } else {
        ParseFailureCategory::Unknown
    }
}

pub fn hint_for_error(err: &Error, context: &str) -> String {
    let mut hint = format!(
        "parse category: {}; context: {context}",
        categorize_error(err).label()
    );
    if let Some(position) = err.position() {
        hint.push_str(&format!("; position: {position}"));
    }
    if let Some(found) = err.found() {
        hint.push_str(&format!("; found: {found:?}"));
    }
    hint
}
