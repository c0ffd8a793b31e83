//! Purpose: Compact canonical JSON text for a `Value` via `Display`.
//! Exports: `impl Display for Value`, `escape_into`.
//! Role: Lets callers print parsed trees and lets tests state the re-parse round trip.
//! Invariants: Output re-parses to an equal tree under the default options.
//! Invariants: Integral floats keep a fractional part (`42.0`) so Int/Float survive.
use std::fmt::{self, Write};

use crate::core::value::{Number, Value};

/// Append `s` as JSON string contents (no surrounding quotes).
pub fn escape_into<W: Write>(s: &str, out: &mut W) -> fmt::Result {
    let mut last = 0;
    for (i, ch) in s.char_indices() {
        let escaped = match ch {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            '\u{8}' => "\\b",
            '\u{c}' => "\\f",
            c if u32::from(c) < 0x20 => {
                out.write_str(&s[last..i])?;
                write!(out, "\\u{:04x}", u32::from(c))?;
                last = i + 1;
                continue;
            }
            _ => continue,
        };
        out.write_str(&s[last..i])?;
        out.write_str(escaped)?;
        last = i + 1;
    }
    out.write_str(&s[last..])
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            // Debug keeps `.0` on integral values and switches to exponent form at the extremes.
            Number::Float(n) => write!(f, "{n:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => {
                f.write_char('"')?;
                escape_into(s, f)?;
                f.write_char('"')
            }
            Value::Array(items) => {
                f.write_char('[')?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Value::Object(map) => {
                f.write_char('{')?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        f.write_char(',')?;
                    }
                    f.write_char('"')?;
                    escape_into(key, f)?;
                    write!(f, "\":{value}")?;
                }
                f.write_char('}')
            }
        }
    }
}
