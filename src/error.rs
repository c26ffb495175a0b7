// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `kecontact` library.
//!
//! This module provides the error hierarchy used across the library: value
//! validation for typed commands, transport communication, datagram parsing,
//! and session state.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred in the datagram transport.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a datagram.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// No transport is registered with the session.
    ///
    /// Returned when sending before the transport connected or after it
    /// was lost.
    #[error("no transport registered, session is not connected")]
    NotConnected,
}

/// Errors related to command argument validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u32,
        /// Maximum allowed value.
        max: u32,
        /// The actual value that was provided.
        actual: u32,
    },

    /// A text argument cannot be sent to the station.
    #[error("invalid text argument: {0}")]
    InvalidText(String),
}

/// Errors raised by the datagram transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Socket I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport reported an error for a received datagram.
    #[error("transport error: {0}")]
    Transport(String),

    /// Invalid station address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// Errors related to parsing station datagrams.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Datagram is not valid UTF-8 text.
    #[error("datagram is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Expected fields are missing from a report, or not numeric.
    #[error("missing field in report: {0}")]
    MissingField(String),

    /// Unexpected payload format.
    #[error("unexpected payload format: {0}")]
    UnexpectedFormat(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 6000,
            max: 63000,
            actual: 70000,
        };
        assert_eq!(err.to_string(), "value 70000 is out of range [6000, 63000]");
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("Setenergy".to_string());
        assert_eq!(err.to_string(), "missing field in report: Setenergy");
    }

    #[test]
    fn error_from_parse_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = ParseError::from(json_err).into();
        assert!(matches!(err, Error::Parse(ParseError::Json(_))));
    }

    #[test]
    fn not_connected_display() {
        assert_eq!(
            Error::NotConnected.to_string(),
            "no transport registered, session is not connected"
        );
    }
}
