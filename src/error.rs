//! Error types for circuit input encoding

use std::fmt;

use thiserror::Error;

/// One of the three dot-separated parts of a compact JWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtSegment {
    Header,
    Payload,
    Signature,
}

impl fmt::Display for JwtSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JwtSegment::Header => "header",
            JwtSegment::Payload => "payload",
            JwtSegment::Signature => "signature",
        };
        f.write_str(name)
    }
}

/// What is structurally wrong with a token string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDefect {
    /// The segment is absent or empty.
    Missing(JwtSegment),
    /// The token split into more than three segments.
    SegmentCount(usize),
}

impl fmt::Display for TokenDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenDefect::Missing(segment) => write!(f, "{segment} is missing"),
            TokenDefect::SegmentCount(n) => write!(f, "expected 3 segments, found {n}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CircuitInputError {
    #[error("invalid JWT: {0}")]
    MalformedToken(TokenDefect),

    /// Always a configuration problem on the caller's side: the container was sized too small.
    #[error("source of length {len} exceeds container capacity {capacity}")]
    CapacityExceeded { len: usize, capacity: usize },

    #[error("container already holds {len} elements")]
    AlreadyPopulated { len: usize },

    #[error("failed to parse RSA public key: {0}")]
    KeyParseFailure(String),

    #[error("value of {bits} bits does not fit in {capacity} bits")]
    LimbOverflow { bits: u64, capacity: u64 },

    #[error("invalid signature encoding: {0}")]
    InvalidEncoding(String),

    #[error("limb width must be between 1 and {max} bits, got {got}")]
    InvalidLimbWidth { got: usize, max: usize },

    #[error("reduction constant is undefined for a zero modulus")]
    ZeroModulus,

    #[error("token was parsed for {found}, but {expected} inputs were requested")]
    AlgorithmMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid input document field '{field}': {reason}")]
    InvalidDocument { field: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CircuitInputError {
    pub fn missing(segment: JwtSegment) -> Self {
        Self::MalformedToken(TokenDefect::Missing(segment))
    }

    pub fn key_parse(msg: impl Into<String>) -> Self {
        Self::KeyParseFailure(msg.into())
    }

    pub fn document(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CircuitInputError>;
