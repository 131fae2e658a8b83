//! Error types for xmltojson

use std::fmt;
use thiserror::Error;

/// Position in the raw XML text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in the raw XML text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unexpected byte or construct while parsing XML
    UnexpectedToken,
    /// Input ended inside an element, attribute or markup section
    UnexpectedEof,
    /// Closing tag does not match the open element
    MismatchedTag { expected: String, found: String },
    /// Attribute name repeated on one element
    DuplicateAttribute { name: String },
    /// Unknown or malformed character entity
    InvalidEntity,
    /// Input is not valid UTF-8
    InvalidUtf8,
    /// Source could not be fetched
    FetchFailed,
    /// Document could not be converted (malformed XML or empty result)
    ParseFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken => write!(f, "unexpected token"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected {expected}, found {found}")
            }
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::InvalidEntity => write!(f, "invalid xml entity"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::FetchFailed => write!(f, "cannot receive xml"),
            Self::ParseFailed => write!(f, "cannot parse xml"),
        }
    }
}

/// Main error type for xmltojson
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at a specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::new(pos, pos))
    }

    /// Numeric code reported to the fallback hook: 404 for fetch
    /// failures, 500 for everything that went wrong after the bytes
    /// arrived.
    pub fn code(&self) -> u16 {
        match self.kind {
            ErrorKind::FetchFailed => 404,
            _ => 500,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}: {}", self.span.start, self.message)
    }
}

/// Structured value handed to the caller-supplied fallback hook
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub code: u16,
}

impl From<&Error> for Failure {
    fn from(err: &Error) -> Self {
        Self {
            message: err.message().to_string(),
            code: err.code(),
        }
    }
}

/// Result type alias for xmltojson
pub type Result<T> = std::result::Result<T, Error>;
