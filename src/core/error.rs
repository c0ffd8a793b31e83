//! Purpose: Single error type for parsing, lookups, and CLI plumbing.
//! Exports: `Error`, `ErrorKind`, `to_exit_code`.
//! Role: Every fallible operation in the crate returns this error.
//! Invariants: Positions are 1-based character positions in the parsed text
//! (byte offsets for `InvalidUtf8`).
//! Invariants: Exit-code mapping is stable once published.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    UnexpectedCharacter,
    UnexpectedEnd,
    ExpectedStringKey,
    ExpectedColon,
    ExpectedCommaOrBrace,
    ExpectedCommaOrBracket,
    InvalidBooleanLiteral,
    InvalidNullLiteral,
    UnterminatedString,
    UnterminatedContainer,
    InvalidEscape,
    MalformedNumber,
    TrailingContent,
    DepthLimit,
    InvalidUtf8,
    KeyNotFound,
    IndexOutOfRange,
    TypeMismatch,
    Usage,
    Io,
    Internal,
}

impl ErrorKind {
    /// True for failures raised while reading JSON text.
    pub fn is_parse(self) -> bool {
        !matches!(
            self,
            ErrorKind::KeyNotFound
                | ErrorKind::IndexOutOfRange
                | ErrorKind::TypeMismatch
                | ErrorKind::Usage
                | ErrorKind::Io
                | ErrorKind::Internal
        )
    }

    pub fn is_lookup(self) -> bool {
        matches!(
            self,
            ErrorKind::KeyNotFound | ErrorKind::IndexOutOfRange | ErrorKind::TypeMismatch
        )
    }

    fn default_message(self) -> &'static str {
        match self {
            ErrorKind::UnexpectedCharacter => "unexpected character",
            ErrorKind::UnexpectedEnd => "unexpected end of input",
            ErrorKind::ExpectedStringKey => "expected string key",
            ErrorKind::ExpectedColon => "expected ':'",
            ErrorKind::ExpectedCommaOrBrace => "expected ',' or '}'",
            ErrorKind::ExpectedCommaOrBracket => "expected ',' or ']'",
            ErrorKind::InvalidBooleanLiteral => "invalid boolean literal",
            ErrorKind::InvalidNullLiteral => "invalid null literal",
            ErrorKind::UnterminatedString => "unterminated string",
            ErrorKind::UnterminatedContainer => "unterminated object or array",
            ErrorKind::InvalidEscape => "invalid escape sequence",
            ErrorKind::MalformedNumber => "malformed number",
            ErrorKind::TrailingContent => "trailing content after value",
            ErrorKind::DepthLimit => "nesting depth limit exceeded",
            ErrorKind::InvalidUtf8 => "input is not valid utf-8",
            ErrorKind::KeyNotFound => "key not found",
            ErrorKind::IndexOutOfRange => "index out of range",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::Usage => "usage error",
            ErrorKind::Io => "i/o error",
            ErrorKind::Internal => "internal error",
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    hint: Option<String>,
    position: Option<usize>,
    found: Option<char>,
    key: Option<String>,
    index: Option<usize>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            hint: None,
            position: None,
            found: None,
            key: None,
            index: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Explicit message, falling back to the kind's default wording.
    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Offending character, for `UnexpectedCharacter` and friends.
    pub fn found(&self) -> Option<char> {
        self.found
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_found(mut self, found: char) -> Self {
        self.found = Some(found);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message())?;
        if let Some(found) = self.found {
            write!(f, " (found: {found:?})")?;
        }
        if let Some(position) = self.position {
            write!(f, " (position: {position})")?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {key:?})")?;
        }
        if let Some(index) = self.index {
            write!(f, " (index: {index})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::KeyNotFound | ErrorKind::IndexOutOfRange | ErrorKind::TypeMismatch => 3,
        ErrorKind::Io => 8,
        _ => 4,
    }
}
