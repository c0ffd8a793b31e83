//! Purpose: Caller-side navigation over parsed trees: paths and get-or-default helpers.
//! Exports: `Path`, `Segment`, `Lookup`, `f64_or`, `i64_or`, `str_or`, `bool_or`.
//! Role: Policy layer on top of the failing core lookups; quote extraction builds on it.
//! Invariants: `*_or` helpers never fail; missing or wrong-typed values yield the default.
//! Invariants: Path text round-trips through `Display` for paths built by `Path::parse`.
//! Notes: Path text cannot name keys containing `.` or `[`; pass a built `Path`
//! (`Path::root().key("a.b")`) to the `*_or` helpers for those.
use std::fmt;
use std::str::FromStr;

use crate::core::error::{Error, ErrorKind};
use crate::core::value::Value;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Chain of key/index steps, written like `optionChain.result[0].quote`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut segments = Vec::new();
        if text.is_empty() {
            return Ok(Self { segments });
        }
        for (part_idx, part) in text.split('.').enumerate() {
            let (key, mut brackets) = match part.find('[') {
                Some(at) => part.split_at(at),
                None => (part, ""),
            };
            if key.is_empty() && (brackets.is_empty() || part_idx > 0) {
                return Err(invalid_path(text, "empty key"));
            }
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }
            while !brackets.is_empty() {
                let Some(close) = brackets.find(']') else {
                    return Err(invalid_path(text, "missing ']'"));
                };
                let digits = &brackets[1..close];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid_path(text, "index must be a non-negative integer"));
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|err| invalid_path(text, "index too large").with_source(err))?;
                segments.push(Segment::Index(index));
                brackets = &brackets[close + 1..];
                if !brackets.is_empty() && !brackets.starts_with('[') {
                    return Err(invalid_path(text, "unexpected text after ']'"));
                }
            }
        }
        Ok(Self { segments })
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Walk the path; the error names the prefix that failed.
    pub fn resolve<'v>(&self, root: &'v Value) -> Result<&'v Value, Error> {
        let mut current = root;
        for (depth, segment) in self.segments.iter().enumerate() {
            let step = match segment {
                Segment::Key(key) => current.get(key),
                Segment::Index(index) => current.at(*index),
            };
            current = step.map_err(|err| {
                let prefix = Path {
                    segments: self.segments[..=depth].to_vec(),
                };
                let message = format!("{} at `{prefix}`", err.message());
                err.with_message(message)
            })?;
        }
        Ok(current)
    }

    pub fn find<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.resolve(root).ok()
    }
}

fn invalid_path(text: &str, detail: &str) -> Error {
    Error::new(ErrorKind::Usage)
        .with_message(format!("invalid path {text:?}: {detail}"))
        .with_hint("Paths look like `optionChain.result[0].quote.bid`.")
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if idx == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Anything the `*_or` helpers accept as a location: path text or a built `Path`.
pub trait Lookup {
    fn lookup<'v>(&self, root: &'v Value) -> Option<&'v Value>;
}

impl Lookup for str {
    fn lookup<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        Path::parse(self).ok()?.find(root)
    }
}

impl Lookup for Path {
    fn lookup<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.find(root)
    }
}

pub fn f64_or<L: Lookup + ?Sized>(root: &Value, path: &L, default: f64) -> f64 {
    path.lookup(root).and_then(Value::as_f64).unwrap_or(default)
}

/// Integers, or floats with no fractional part that fit `i64`.
pub fn i64_or<L: Lookup + ?Sized>(root: &Value, path: &L, default: i64) -> i64 {
    let Some(number) = path.lookup(root).and_then(Value::as_number) else {
        return default;
    };
    if let Some(n) = number.as_i64() {
        return n;
    }
    let n = number.as_f64();
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        n as i64
    } else {
        default
    }
}

pub fn str_or<'v, L: Lookup + ?Sized>(root: &'v Value, path: &L, default: &'v str) -> &'v str {
    path.lookup(root).and_then(Value::as_str).unwrap_or(default)
}

pub fn bool_or<L: Lookup + ?Sized>(root: &Value, path: &L, default: bool) -> bool {
    path.lookup(root).and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::{Path, Segment, bool_or, f64_or, i64_or, str_or};
    use crate::core::error::ErrorKind;
    use crate::core::parser::parse;

    #[test]
    fn parse_keys_and_indexes() {
        let path = Path::parse("optionChain.result[0].quote.bid").unwrap();
        assert_eq!(
            path.segments(),
            [
                Segment::Key("optionChain".to_string()),
                Segment::Key("result".to_string()),
                Segment::Index(0),
                Segment::Key("quote".to_string()),
                Segment::Key("bid".to_string()),
            ]
        );
        assert_eq!(path.to_string(), "optionChain.result[0].quote.bid");

        let path: Path = "[1][2].x".parse().unwrap();
        assert_eq!(path, Path::root().index(1).index(2).key("x"));
        assert_eq!(Path::parse("").unwrap(), Path::root());
        assert_eq!(
            Path::parse("a.0").unwrap(),
            Path::root().key("a").key("0")
        );
    }

    #[test]
    fn parse_rejects_malformed_paths() {
        for text in ["a..b", "a.", ".a", "a[", "a[]", "a[-1]", "a[x]", "a[0]b", "a.[0]"] {
            let err = Path::parse(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Usage, "path {text:?}");
        }
    }

    #[test]
    fn resolve_reports_failing_prefix() {
        let doc = parse(r#"{"a":{"list":[1,2]}}"#).unwrap();
        let found = Path::parse("a.list[1]").unwrap().resolve(&doc).unwrap();
        assert_eq!(found.as_i64(), Some(2));
        assert_eq!(Path::root().resolve(&doc).unwrap(), &doc);

        let err = Path::parse("a.list[5]").unwrap().resolve(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
        assert!(err.message().ends_with("at `a.list[5]`"));

        let err = Path::parse("a.nope.x").unwrap().resolve(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyNotFound);
        assert_eq!(err.message(), "key \"nope\" not found at `a.nope`");

        let err = Path::parse("a.list.x").unwrap().resolve(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(Path::parse("a.list.x").unwrap().find(&doc).is_none());
    }

    #[test]
    fn defaults_cover_missing_and_wrong_types() {
        let doc = parse(
            r#"{"price":12.5,"count":7,"whole":300.0,"frac":1.5,"name":"AAPL","itm":true}"#,
        )
        .unwrap();
        assert_eq!(f64_or(&doc, "price", 0.0), 12.5);
        assert_eq!(f64_or(&doc, "count", 0.0), 7.0);
        assert_eq!(f64_or(&doc, "name", -1.0), -1.0);
        assert_eq!(f64_or(&doc, "missing", -1.0), -1.0);
        assert_eq!(f64_or(&doc, "bad[", -1.0), -1.0);

        assert_eq!(i64_or(&doc, "count", 0), 7);
        assert_eq!(i64_or(&doc, "whole", 0), 300);
        assert_eq!(i64_or(&doc, "frac", -1), -1);
        assert_eq!(i64_or(&doc, "name", -1), -1);

        assert_eq!(str_or(&doc, "name", ""), "AAPL");
        assert_eq!(str_or(&doc, "price", "n/a"), "n/a");
        assert!(bool_or(&doc, "itm", false));
        assert!(!bool_or(&doc, "price", false));
    }

    #[test]
    fn built_paths_reach_keys_with_dots_and_brackets() {
        let doc = parse(r#"{"a.b":5,"c[0]":"x","d":{"e.f":true,"g":[1.5]}}"#).unwrap();
        assert_eq!(i64_or(&doc, "a.b", -1), -1);
        assert_eq!(i64_or(&doc, &Path::root().key("a.b"), -1), 5);
        assert_eq!(str_or(&doc, &Path::root().key("c[0]"), ""), "x");
        assert!(bool_or(&doc, &Path::root().key("d").key("e.f"), false));
        assert_eq!(f64_or(&doc, &Path::root().key("d").key("g").index(0), 0.0), 1.5);
        assert_eq!(f64_or(&doc, "d.g[0]", 0.0), 1.5);
    }
}
