//! Purpose: Single-pass recursive-descent reader from JSON text to `Value`.
//! Exports: `parse`, `parse_with`.
//! Role: The only place grammar decisions are made; the boundary in `json::parse`
//! wraps it with UTF-8 handling and diagnostics.
//! Invariants: The cursor only moves forward, except the one-escape lookahead used to
//! pair UTF-16 surrogates.
//! Invariants: Every failure aborts the whole parse; no partial trees are returned.
//! Invariants: End of input inside a string or container is always an error,
//! regardless of `ParseOptions`.
use crate::core::array::Array;
use crate::core::error::{Error, ErrorKind};
use crate::core::object::Object;
use crate::core::options::{EscapePolicy, ParseOptions, TrailingPolicy};
use crate::core::value::{Number, Value};

/// Parse `text` with the default (strict) options.
pub fn parse(text: &str) -> Result<Value, Error> {
    parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Value, Error> {
    let mut parser = Parser::new(text, options);
    let value = parser.parse_value()?;
    if options.trailing == TrailingPolicy::Reject {
        parser.skip_whitespace();
        if let Some(found) = parser.peek_char() {
            return Err(parser
                .error_at(ErrorKind::TrailingContent, parser.pos)
                .with_found(found));
        }
    }
    Ok(value)
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    options: &'a ParseOptions,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            depth: 0,
            options,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.text.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// 1-based character position of the byte offset `at`.
    fn position_of(&self, at: usize) -> usize {
        self.text.get(..at).map_or(at, |head| head.chars().count()) + 1
    }

    fn error_at(&self, kind: ErrorKind, at: usize) -> Error {
        Error::new(kind).with_position(self.position_of(at))
    }

    /// Grammar error at the cursor, naming the character found there.
    fn unexpected(&self, kind: ErrorKind) -> Error {
        let err = self.error_at(kind, self.pos);
        match self.peek_char() {
            Some(found) => err.with_found(found),
            None => err,
        }
    }

    fn unterminated(&self, opened_at: usize, what: &str) -> Error {
        self.error_at(ErrorKind::UnterminatedContainer, self.pos)
            .with_message(format!(
                "unterminated {what} opened at position {}",
                self.position_of(opened_at)
            ))
    }

    fn parse_value(&mut self) -> Result<Value, Error> {
        self.skip_whitespace();
        let Some(next) = self.peek() else {
            return Err(if self.depth == 0 {
                self.error_at(ErrorKind::UnexpectedEnd, self.pos)
                    .with_message("expected a value but input is empty")
            } else {
                self.error_at(ErrorKind::UnterminatedContainer, self.pos)
                    .with_message("input ended where a value was expected")
            });
        };
        match next {
            b'{' => self.parse_object(),
            b'[' => self.parse_array(),
            b'"' => self.parse_string().map(Value::String),
            b't' => self.parse_literal("true", ErrorKind::InvalidBooleanLiteral, Value::Bool(true)),
            b'f' => self.parse_literal(
                "false",
                ErrorKind::InvalidBooleanLiteral,
                Value::Bool(false),
            ),
            b'n' => self.parse_literal("null", ErrorKind::InvalidNullLiteral, Value::Null),
            b'-' | b'0'..=b'9' => self.parse_number().map(Value::Number),
            _ => Err(self.unexpected(ErrorKind::UnexpectedCharacter)),
        }
    }

    fn enter(&mut self) -> Result<(), Error> {
        self.depth += 1;
        let max = self.options.effective_max_depth();
        if self.depth > max {
            return Err(self
                .error_at(ErrorKind::DepthLimit, self.pos)
                .with_message(format!("nesting deeper than {max} levels")));
        }
        Ok(())
    }

    fn parse_object(&mut self) -> Result<Value, Error> {
        let opened_at = self.pos;
        self.enter()?;
        self.pos += 1;
        let mut object = Object::new();

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Value::Object(object));
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'"') => {}
                Some(_) => return Err(self.unexpected(ErrorKind::ExpectedStringKey)),
                None => return Err(self.unterminated(opened_at, "object")),
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            match self.peek() {
                Some(b':') => self.pos += 1,
                Some(_) => return Err(self.unexpected(ErrorKind::ExpectedColon)),
                None => return Err(self.unterminated(opened_at, "object")),
            }

            let value = self.parse_value()?;
            object.insert(key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.unexpected(ErrorKind::ExpectedCommaOrBrace)),
                None => return Err(self.unterminated(opened_at, "object")),
            }
        }

        self.depth -= 1;
        Ok(Value::Object(object))
    }

    fn parse_array(&mut self) -> Result<Value, Error> {
        let opened_at = self.pos;
        self.enter()?;
        self.pos += 1;
        let mut array = Array::new();

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Value::Array(array));
        }

        loop {
            array.push(self.parse_value()?);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.unexpected(ErrorKind::ExpectedCommaOrBracket)),
                None => return Err(self.unterminated(opened_at, "array")),
            }
        }

        self.depth -= 1;
        Ok(Value::Array(array))
    }

    fn parse_string(&mut self) -> Result<String, Error> {
        let opened_at = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut run_start = self.pos;

        loop {
            let Some(byte) = self.peek() else {
                return Err(self.error_at(ErrorKind::UnterminatedString, opened_at));
            };
            match byte {
                b'"' => {
                    out.push_str(&self.text[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                b'\\' => {
                    out.push_str(&self.text[run_start..self.pos]);
                    self.parse_escape(opened_at, &mut out)?;
                    run_start = self.pos;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn parse_escape(&mut self, opened_at: usize, out: &mut String) -> Result<(), Error> {
        let escape_at = self.pos;
        self.pos += 1;
        let Some(escaped) = self.peek_char() else {
            return Err(self.error_at(ErrorKind::UnterminatedString, opened_at));
        };
        self.pos += escaped.len_utf8();

        match escaped {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let unit = self.parse_hex4(opened_at, escape_at)?;
                out.push(self.decode_utf16(unit, opened_at)?);
            }
            other => match self.options.escapes {
                EscapePolicy::Drop => {}
                EscapePolicy::Reject => {
                    return Err(self
                        .error_at(ErrorKind::InvalidEscape, escape_at)
                        .with_message(format!("invalid escape sequence '\\{other}'"))
                        .with_found(other));
                }
            },
        }
        Ok(())
    }

    fn parse_hex4(&mut self, opened_at: usize, escape_at: usize) -> Result<u16, Error> {
        let mut unit: u16 = 0;
        for _ in 0..4 {
            let Some(byte) = self.peek() else {
                return Err(self.error_at(ErrorKind::UnterminatedString, opened_at));
            };
            let digit = match byte {
                b'0'..=b'9' => byte - b'0',
                b'a'..=b'f' => byte - b'a' + 10,
                b'A'..=b'F' => byte - b'A' + 10,
                _ => {
                    let err = self
                        .error_at(ErrorKind::InvalidEscape, escape_at)
                        .with_message("\\u escape needs exactly four hex digits");
                    return Err(match self.peek_char() {
                        Some(found) => err.with_found(found),
                        None => err,
                    });
                }
            };
            unit = (unit << 4) | u16::from(digit);
            self.pos += 1;
        }
        Ok(unit)
    }

    /// Turns one UTF-16 code unit into a char, pairing a high surrogate with an
    /// immediately following `\u` low surrogate. Unpaired halves become U+FFFD.
    fn decode_utf16(&mut self, unit: u16, opened_at: usize) -> Result<char, Error> {
        const REPLACEMENT: char = '\u{FFFD}';
        match unit {
            0xD800..=0xDBFF => {
                if !self.bytes[self.pos..].starts_with(b"\\u") {
                    return Ok(REPLACEMENT);
                }
                let lookahead_at = self.pos;
                self.pos += 2;
                let low = self.parse_hex4(opened_at, lookahead_at)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    self.pos = lookahead_at;
                    return Ok(REPLACEMENT);
                }
                let high = u32::from(unit - 0xD800);
                let low = u32::from(low - 0xDC00);
                Ok(char::from_u32(0x10000 + (high << 10) + low).unwrap_or(REPLACEMENT))
            }
            0xDC00..=0xDFFF => Ok(REPLACEMENT),
            _ => Ok(char::from_u32(u32::from(unit)).unwrap_or(REPLACEMENT)),
        }
    }

    fn consume_digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn malformed_number(&self, start: usize, detail: &str) -> Error {
        let err = self
            .error_at(ErrorKind::MalformedNumber, start)
            .with_message(format!(
                "malformed number {:?}: {detail}",
                &self.text[start..self.pos]
            ));
        match self.peek_char() {
            Some(found) => err.with_found(found),
            None => err,
        }
    }

    fn parse_number(&mut self) -> Result<Number, Error> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        if self.consume_digits() == 0 {
            return Err(self.malformed_number(start, "expected digits"));
        }

        let mut is_float = false;
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            if self.consume_digits() == 0 {
                return Err(self.malformed_number(start, "expected digits after '.'"));
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.consume_digits() == 0 {
                return Err(self.malformed_number(start, "expected exponent digits"));
            }
        }

        let literal = &self.text[start..self.pos];
        if !is_float {
            // Integers beyond i64 fall through to f64, losing precision.
            if let Ok(n) = literal.parse::<i64>() {
                return Ok(Number::Int(n));
            }
        }
        match literal.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Number::Float(n)),
            _ => Err(self.malformed_number(start, "number out of range")),
        }
    }

    fn parse_literal(
        &mut self,
        literal: &str,
        kind: ErrorKind,
        value: Value,
    ) -> Result<Value, Error> {
        if self.bytes[self.pos..].starts_with(literal.as_bytes()) {
            self.pos += literal.len();
            return Ok(value);
        }
        let err = self
            .error_at(kind, self.pos)
            .with_message(format!("expected literal `{literal}`"));
        Err(match self.peek_char() {
            Some(found) => err.with_found(found),
            None => err,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, parse_with};
    use crate::core::error::ErrorKind;
    use crate::core::options::{EscapePolicy, HARD_MAX_DEPTH, ParseOptions, TrailingPolicy};
    use crate::core::value::{Number, Value};

    fn parse_err(text: &str) -> (ErrorKind, Option<usize>) {
        let err = parse(text).unwrap_err();
        (err.kind(), err.position())
    }

    #[test]
    fn scalars_at_root() {
        assert_eq!(parse("null").unwrap(), Value::Null);
        assert_eq!(parse(" true ").unwrap(), Value::Bool(true));
        assert_eq!(parse("\tfalse\n").unwrap(), Value::Bool(false));
        assert_eq!(parse("\"hi\"").unwrap(), Value::from("hi"));
        assert_eq!(parse("-17").unwrap(), Value::from(-17i64));
    }

    #[test]
    fn integer_and_float_literals_stay_distinct() {
        let int = parse("42").unwrap();
        let float = parse("42.0").unwrap();
        assert_eq!(int.as_number(), Some(&Number::Int(42)));
        assert_eq!(float.as_number(), Some(&Number::Float(42.0)));
        assert_ne!(int, float);

        assert_eq!(parse("1e3").unwrap(), Value::from(1000.0));
        assert_eq!(parse("2E-2").unwrap(), Value::from(0.02));
        assert_eq!(parse("-0").unwrap(), Value::from(0i64));
        assert_eq!(parse("007").unwrap(), Value::from(7i64));
    }

    #[test]
    fn integer_overflow_falls_back_to_float() {
        assert_eq!(
            parse("9223372036854775807").unwrap(),
            Value::from(i64::MAX)
        );
        assert_eq!(
            parse("9223372036854775808").unwrap(),
            Value::from(9_223_372_036_854_775_808.0)
        );
        assert_eq!(
            parse("-9223372036854775808").unwrap(),
            Value::from(i64::MIN)
        );
    }

    #[test]
    fn malformed_numbers_fail() {
        for text in ["-", "-x", "1.", "1.e5", "1e", "1e+", "1e999"] {
            let err = parse(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedNumber, "input {text:?}");
            assert_eq!(err.position(), Some(1), "input {text:?}");
        }
    }

    #[test]
    fn string_escapes() {
        let value = parse(r#""a\nb\u0041""#).unwrap();
        assert_eq!(value.as_str(), Some("a\nbA"));

        let value = parse(r#""\"\\\/\b\f\n\r\t""#).unwrap();
        assert_eq!(value.as_str(), Some("\"\\/\u{8}\u{c}\n\r\t"));

        let value = parse(r#""\u00e9t\u00C9""#).unwrap();
        assert_eq!(value.as_str(), Some("étÉ"));
    }

    #[test]
    fn non_ascii_passes_through_unchanged() {
        let value = parse("\"snow ☃ and 🎉\"").unwrap();
        assert_eq!(value.as_str(), Some("snow ☃ and 🎉"));
    }

    #[test]
    fn surrogate_pairs_combine_and_lone_halves_are_replaced() {
        assert_eq!(parse(r#""\ud83c\udf89""#).unwrap().as_str(), Some("🎉"));
        assert_eq!(parse(r#""\ud83cx""#).unwrap().as_str(), Some("\u{FFFD}x"));
        assert_eq!(parse(r#""\udf89""#).unwrap().as_str(), Some("\u{FFFD}"));
        assert_eq!(
            parse(r#""\ud83c\u0041""#).unwrap().as_str(),
            Some("\u{FFFD}A")
        );
    }

    #[test]
    fn unknown_escape_policy() {
        let err = parse(r#""a\qb""#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEscape);
        assert_eq!(err.position(), Some(3));
        assert_eq!(err.found(), Some('q'));

        let opts = ParseOptions::strict().with_escapes(EscapePolicy::Drop);
        let value = parse_with(r#""a\qb\é""#, &opts).unwrap();
        assert_eq!(value.as_str(), Some("ab"));
    }

    #[test]
    fn bad_unicode_escape_fails() {
        let err = parse(r#""\u12g4""#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEscape);
        assert_eq!(err.position(), Some(2));
        assert_eq!(err.found(), Some('g'));
    }

    #[test]
    fn unterminated_strings_fail_in_every_mode() {
        for opts in [ParseOptions::strict(), ParseOptions::lenient()] {
            for text in ["\"abc", "\"abc\\", "\"\\u00", "[\"x"] {
                let err = parse_with(text, &opts).unwrap_err();
                assert_eq!(err.kind(), ErrorKind::UnterminatedString, "input {text:?}");
            }
        }
    }

    #[test]
    fn empty_containers() {
        let obj = parse("{}").unwrap();
        assert_eq!(obj.as_object().map(|o| o.len()), Some(0));
        let arr = parse("[ ]").unwrap();
        assert_eq!(arr.as_array().map(|a| a.len()), Some(0));
    }

    #[test]
    fn nested_structure() {
        let value = parse(r#"{"a":[1,2,{"b":true}]}"#).unwrap();
        let arr = value.get("a").unwrap().as_array().unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(0).unwrap(), &Value::from(1i64));
        let inner = arr.get(2).unwrap();
        assert_eq!(inner.get("b").unwrap(), &Value::Bool(true));
    }

    #[test]
    fn whitespace_around_structural_characters() {
        let value = parse(" {\r\n \"k\" :\t[ 1 , 2 ] ,\n\"z\" : null } ").unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.try_get("z"), Some(&Value::Null));
    }

    #[test]
    fn key_order_and_duplicates() {
        let value = parse(r#"{"b":1,"a":2}"#).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["b", "a"]);

        let value = parse(r#"{"x":1,"x":2}"#).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj.get("x").unwrap(), &Value::from(2i64));
    }

    #[test]
    fn grammar_errors_carry_positions() {
        let cases = [
            (r#"{"a":}"#, ErrorKind::UnexpectedCharacter, 6),
            ("xyz", ErrorKind::UnexpectedCharacter, 1),
            ("{a:1}", ErrorKind::ExpectedStringKey, 2),
            (r#"{"a":1,}"#, ErrorKind::ExpectedStringKey, 8),
            (r#"{"a" 1}"#, ErrorKind::ExpectedColon, 6),
            (r#"{"a":1 "b":2}"#, ErrorKind::ExpectedCommaOrBrace, 8),
            ("[1 2]", ErrorKind::ExpectedCommaOrBracket, 4),
            ("[1,]", ErrorKind::UnexpectedCharacter, 4),
            ("tru", ErrorKind::InvalidBooleanLiteral, 1),
            ("[fals]", ErrorKind::InvalidBooleanLiteral, 2),
            ("nul", ErrorKind::InvalidNullLiteral, 1),
            ("", ErrorKind::UnexpectedEnd, 1),
            ("   ", ErrorKind::UnexpectedEnd, 4),
        ];
        for (text, kind, position) in cases {
            assert_eq!(parse_err(text), (kind, Some(position)), "input {text:?}");
        }
    }

    #[test]
    fn positions_count_characters_not_bytes() {
        let err = parse("[\"é☃\", ?]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedCharacter);
        assert_eq!(err.position(), Some(8));
        assert_eq!(err.found(), Some('?'));
    }

    #[test]
    fn unterminated_containers_fail() {
        for opts in [ParseOptions::strict(), ParseOptions::lenient()] {
            for text in ["[1,2", "[1,", "{\"a\":1", "{\"a\"", "{\"a\":", "[", "{"] {
                let err = parse_with(text, &opts).unwrap_err();
                assert_eq!(
                    err.kind(),
                    ErrorKind::UnterminatedContainer,
                    "input {text:?}"
                );
            }
        }
        let err = parse("[1,2").unwrap_err();
        assert_eq!(err.position(), Some(5));
        assert_eq!(err.message(), "unterminated array opened at position 1");
    }

    #[test]
    fn trailing_content_policy() {
        let err = parse("{} x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TrailingContent);
        assert_eq!(err.position(), Some(4));
        assert_eq!(err.found(), Some('x'));
        assert_eq!(parse("[1] \n\t").unwrap().as_array().map(|a| a.len()), Some(1));

        let opts = ParseOptions::strict().with_trailing(TrailingPolicy::Ignore);
        assert_eq!(parse_with("1 2 3", &opts).unwrap(), Value::from(1i64));
        assert_eq!(parse_with("{}garbage", &opts).unwrap().kind().as_str(), "object");
    }

    #[test]
    fn depth_limit() {
        let deep = format!("{}0{}", "[".repeat(10), "]".repeat(10));
        let opts = ParseOptions::strict().with_max_depth(Some(10));
        assert!(parse_with(&deep, &opts).is_ok());

        let opts = ParseOptions::strict().with_max_depth(Some(9));
        let err = parse_with(&deep, &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DepthLimit);
        assert_eq!(err.position(), Some(10));

        let opts = ParseOptions::strict().with_max_depth(None);
        let deeper = format!("{}{}", "[".repeat(600), "]".repeat(600));
        assert!(parse_with(&deeper, &opts).is_ok());
        assert_eq!(parse(&deeper).unwrap_err().kind(), ErrorKind::DepthLimit);
    }

    #[test]
    fn unlimited_depth_still_stops_at_hard_ceiling() {
        let huge = format!("{}{}", "[".repeat(200_000), "]".repeat(200_000));
        for max_depth in [None, Some(usize::MAX)] {
            let opts = ParseOptions::strict().with_max_depth(max_depth);
            let err = parse_with(&huge, &opts).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DepthLimit);
            assert_eq!(err.position(), Some(HARD_MAX_DEPTH + 1));
            assert_eq!(err.message(), "nesting deeper than 600 levels");
        }
    }
}
