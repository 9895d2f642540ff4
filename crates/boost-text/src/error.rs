// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Archive errors.
//!
//! Every variant is `Clone + PartialEq`: a reader or writer latches the first
//! error it hits and hands the same value back on every later call.

use std::io;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Errors raised while reading or writing a text archive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    /// Missing or empty source, or the magic signature did not match.
    #[error("not a Boost text archive")]
    NotBoost,

    /// Magic signature matched but the header fields are malformed or truncated.
    #[error("invalid archive header")]
    InvalidHeader,

    /// A type descriptor record could not be decoded.
    #[error("invalid type descriptor")]
    InvalidTypeDescr,

    /// Encoded array length differs from the destination capacity.
    #[error("invalid array length")]
    InvalidArrayLen,

    /// The value shape has no encoding in this format.
    #[error("type not supported")]
    TypeNotSupported,

    /// Source exhausted in the middle of a token.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// A string payload was not followed by the `' '` delimiter.
    #[error("expected a delimiter, found byte {0:#04x}")]
    NotADelimiter(u8),

    #[error("invalid integer token: {0}")]
    ParseInt(#[from] ParseIntError),

    #[error("invalid float token: {0}")]
    ParseFloat(#[from] ParseFloatError),

    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// Length does not fit in the 32-bit length field of the active profile.
    #[error("length {0} does not fit in a 32-bit length field")]
    LengthOverflow(usize),

    /// The value does not have the shape its schema declares.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("I/O error: {message}")]
    Io { kind: io::ErrorKind, message: String },
}

impl ArchiveError {
    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl From<io::Error> for ArchiveError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Self::UnexpectedEof,
            kind => Self::Io {
                kind,
                message: err.to_string(),
            },
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ArchiveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_unexpected_eof_folds_into_sentinel() {
        let err: ArchiveError = io::Error::from(io::ErrorKind::UnexpectedEof).into();
        assert_eq!(err, ArchiveError::UnexpectedEof);
    }

    #[test]
    fn test_io_error_keeps_kind() {
        let err: ArchiveError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();
        match err {
            ArchiveError::Io { kind, message } => {
                assert_eq!(kind, io::ErrorKind::BrokenPipe);
                assert_eq!(message, "pipe closed");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors_compare_by_value() {
        let a: ArchiveError = "x".parse::<u64>().unwrap_err().into();
        let b: ArchiveError = "y".parse::<u64>().unwrap_err().into();
        assert_eq!(a, b);
        assert_ne!(a, ArchiveError::UnexpectedEof);
    }

    #[test]
    fn test_display() {
        assert_eq!(ArchiveError::NotBoost.to_string(), "not a Boost text archive");
        assert_eq!(
            ArchiveError::NotADelimiter(b'x').to_string(),
            "expected a delimiter, found byte 0x78"
        );
        assert_eq!(
            ArchiveError::mismatch("bool", "I32(1)").to_string(),
            "type mismatch: expected bool, found I32(1)"
        );
    }
}
