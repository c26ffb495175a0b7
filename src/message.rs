// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classification of incoming station datagrams.
//!
//! A KEBA station sends three kinds of text datagrams:
//!
//! - `TCH-OK :done` - a command was accepted
//! - `TCH-ERROR ...` - a command was rejected
//! - a JSON object tagged with an `ID` field - a report
//!
//! # Examples
//!
//! ```
//! use kecontact::message::{MessageCategory, classify};
//!
//! assert_eq!(classify("TCH-OK :done\n").unwrap(), MessageCategory::CommandAck);
//!
//! let msg = classify(r#"{"ID": "2", "Max curr": 32000}"#).unwrap();
//! assert!(matches!(msg, MessageCategory::Report(_)));
//! ```

use serde_json::Value;

use crate::error::ParseError;
use crate::report::{ReportUpdate, decode_report};

/// Marker contained in every command acknowledgement.
pub const ACK_MARKER: &str = "TCH-OK :done";

/// Marker contained in every command rejection.
pub const ERROR_MARKER: &str = "TCH-ERROR";

/// Category of a decoded datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageCategory {
    /// The station accepted the last command.
    CommandAck,
    /// The station rejected the last command.
    CommandError,
    /// A structured report with its normalized fields.
    Report(ReportUpdate),
    /// Valid JSON without an `ID` field.
    Unrecognized,
}

impl MessageCategory {
    /// Returns the command outcome for acknowledgement messages.
    ///
    /// `Some(true)` for an ack, `Some(false)` for an error, `None` otherwise.
    #[must_use]
    pub fn command_result(&self) -> Option<bool> {
        match self {
            Self::CommandAck => Some(true),
            Self::CommandError => Some(false),
            Self::Report(_) | Self::Unrecognized => None,
        }
    }

    /// Returns `true` if this is a report.
    #[must_use]
    pub fn is_report(&self) -> bool {
        matches!(self, Self::Report(_))
    }
}

/// Classifies the decoded text of a datagram.
///
/// The acknowledgement marker is checked first, then the error marker; only
/// if neither is present is the text parsed as JSON.
///
/// # Errors
///
/// Returns `ParseError::Json` if the text is not valid JSON, and
/// `ParseError::UnexpectedFormat` if it is valid JSON but not an object.
pub fn classify(text: &str) -> Result<MessageCategory, ParseError> {
    if text.contains(ACK_MARKER) {
        return Ok(MessageCategory::CommandAck);
    }

    if text.contains(ERROR_MARKER) {
        return Ok(MessageCategory::CommandError);
    }

    let Value::Object(object) = serde_json::from_str::<Value>(text)? else {
        return Err(ParseError::UnexpectedFormat(format!(
            "expected a JSON object, got: {text}"
        )));
    };

    Ok(decode_report(object).map_or(MessageCategory::Unrecognized, MessageCategory::Report))
}

/// Decodes raw datagram bytes as UTF-8 and classifies them.
///
/// # Errors
///
/// Returns `ParseError::InvalidUtf8` for non-UTF-8 payloads, otherwise the
/// errors of [`classify`].
pub fn classify_bytes(payload: &[u8]) -> Result<MessageCategory, ParseError> {
    classify(std::str::from_utf8(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportId;

    #[test]
    fn ack_is_detected() {
        assert_eq!(classify("TCH-OK :done").unwrap(), MessageCategory::CommandAck);
        assert_eq!(
            classify("TCH-OK :done\n").unwrap().command_result(),
            Some(true)
        );
    }

    #[test]
    fn error_is_detected() {
        let msg = classify("TCH-ERROR:err").unwrap();
        assert_eq!(msg, MessageCategory::CommandError);
        assert_eq!(msg.command_result(), Some(false));
    }

    #[test]
    fn ack_marker_wins_over_error_marker() {
        let msg = classify("TCH-ERROR TCH-OK :done").unwrap();
        assert_eq!(msg, MessageCategory::CommandAck);
    }

    #[test]
    fn report_is_decoded() {
        let msg = classify(r#"{"ID": "3", "E total": 123456}"#).unwrap();

        let MessageCategory::Report(update) = msg else {
            panic!("expected a report");
        };
        assert_eq!(update.id(), &ReportId::Metering);
        assert_eq!(update.get("E total"), Some(&serde_json::json!(12)));
    }

    #[test]
    fn object_without_id_is_unrecognized() {
        let msg = classify(r#"{"Firmware": "P30 v 3.10.16"}"#).unwrap();
        assert_eq!(msg, MessageCategory::Unrecognized);
        assert_eq!(msg.command_result(), None);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let result = classify("Firmware: P30 v 3.10.16");
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn non_object_json_is_unexpected_format() {
        let result = classify("[1, 2, 3]");
        assert!(matches!(result, Err(ParseError::UnexpectedFormat(_))));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let result = classify_bytes(&[0x7b, 0xff, 0x7d]);
        assert!(matches!(result, Err(ParseError::InvalidUtf8(_))));
    }

    #[test]
    fn bytes_are_classified() {
        let msg = classify_bytes(b"TCH-OK :done").unwrap();
        assert_eq!(msg, MessageCategory::CommandAck);
    }
}
