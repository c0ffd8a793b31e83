//! Purpose: Render pretty JSON text of a parsed `Value`, optionally ANSI-colored.
//! Exports: colorize_json.
//! Role: Small, pure formatter used by CLI emission paths.
//! Invariants: When color is disabled, output re-parses to the same tree.
//! Invariants: ANSI escapes appear only when explicitly enabled.
use jsonconv::Value;
use jsonconv::core::array::Array;
use jsonconv::core::canonical::escape_into;
use jsonconv::core::object::Object;

const INDENT: &str = "  ";

// Conservative 8/16-color palette for broad terminal compatibility.
// Avoid bright variants that can lose contrast on themes like Solarized.
const COLOR_KEY: &str = "36";
const COLOR_STRING: &str = "32";
const COLOR_NUMBER: &str = "33";
const COLOR_BOOL: &str = "35";
const COLOR_NULL: &str = "39";
const COLOR_PUNCT: &str = "39";

pub fn colorize_json(value: &Value, use_color: bool) -> String {
    let mut out = String::new();
    write_value(value, 0, use_color, &mut out);
    out
}

fn write_value(value: &Value, indent: usize, use_color: bool, out: &mut String) {
    match value {
        Value::Null => push_colored("null", COLOR_NULL, use_color, out),
        Value::Bool(val) => {
            let text = if *val { "true" } else { "false" };
            push_colored(text, COLOR_BOOL, use_color, out);
        }
        Value::Number(num) => push_colored(&num.to_string(), COLOR_NUMBER, use_color, out),
        Value::String(text) => push_colored(&quoted(text), COLOR_STRING, use_color, out),
        Value::Array(items) => write_array(items, indent, use_color, out),
        Value::Object(map) => write_object(map, indent, use_color, out),
    }
}

fn quoted(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len() + 2);
    encoded.push('"');
    // Writing into a String cannot fail.
    let _ = escape_into(text, &mut encoded);
    encoded.push('"');
    encoded
}

fn write_array(items: &Array, indent: usize, use_color: bool, out: &mut String) {
    if items.is_empty() {
        push_colored("[]", COLOR_PUNCT, use_color, out);
        return;
    }
    push_colored("[", COLOR_PUNCT, use_color, out);
    out.push('\n');
    for (idx, item) in items.iter().enumerate() {
        push_indent(indent + 1, out);
        write_value(item, indent + 1, use_color, out);
        if idx + 1 < items.len() {
            push_colored(",", COLOR_PUNCT, use_color, out);
        }
        out.push('\n');
    }
    push_indent(indent, out);
    push_colored("]", COLOR_PUNCT, use_color, out);
}

fn write_object(map: &Object, indent: usize, use_color: bool, out: &mut String) {
    if map.is_empty() {
        push_colored("{}", COLOR_PUNCT, use_color, out);
        return;
    }
    push_colored("{", COLOR_PUNCT, use_color, out);
    out.push('\n');
    let len = map.len();
    for (idx, (key, value)) in map.iter().enumerate() {
        push_indent(indent + 1, out);
        push_colored(&quoted(key), COLOR_KEY, use_color, out);
        push_colored(":", COLOR_PUNCT, use_color, out);
        out.push(' ');
        write_value(value, indent + 1, use_color, out);
        if idx + 1 < len {
            push_colored(",", COLOR_PUNCT, use_color, out);
        }
        out.push('\n');
    }
    push_indent(indent, out);
    push_colored("}", COLOR_PUNCT, use_color, out);
}

fn push_indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

fn push_colored(text: &str, color: &str, use_color: bool, out: &mut String) {
    if !use_color {
        out.push_str(text);
        return;
    }
    out.push_str("\u{1b}[");
    out.push_str(color);
    out.push('m');
    out.push_str(text);
    out.push_str("\u{1b}[0m");
}
