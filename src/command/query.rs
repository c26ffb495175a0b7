// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data query commands.

use crate::command::Command;
use crate::error::ValueError;
use crate::report::ReportId;
use crate::types::HistoryIndex;

/// Requests a report from the station.
///
/// # Examples
///
/// ```
/// use kecontact::command::{Command, ReportCommand};
///
/// assert_eq!(ReportCommand::Identity.to_wire(), "report 1");
/// assert_eq!(ReportCommand::history(0).unwrap().to_wire(), "report 100");
/// assert_eq!(ReportCommand::history(30).unwrap().to_wire(), "report 130");
/// assert!(ReportCommand::history(31).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportCommand {
    /// Report 1: product, serial, firmware.
    Identity,
    /// Report 2: state and current limits.
    Limits,
    /// Report 3: live metering.
    Metering,
    /// Charging session history entry.
    History(HistoryIndex),
}

impl ReportCommand {
    /// Creates a history report request.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `index` exceeds 30.
    pub fn history(index: u8) -> Result<Self, ValueError> {
        Ok(Self::History(HistoryIndex::new(index)?))
    }

    /// Returns the ID of the report the station answers with.
    #[must_use]
    pub fn report_id(&self) -> ReportId {
        match self {
            Self::Identity => ReportId::Identity,
            Self::Limits => ReportId::Limits,
            Self::Metering => ReportId::Metering,
            Self::History(index) => ReportId::Other(index.report_id()),
        }
    }
}

impl Command for ReportCommand {
    fn name(&self) -> String {
        "report".to_string()
    }

    fn payload(&self) -> Option<String> {
        Some(self.report_id().as_str().to_string())
    }
}

/// Requests the firmware banner (`i`).
///
/// The station answers with a JSON object without an `ID` field, which the
/// session treats as unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InfoCommand;

impl Command for InfoCommand {
    fn name(&self) -> String {
        "i".to_string()
    }

    fn payload(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_commands() {
        assert_eq!(ReportCommand::Identity.to_wire(), "report 1");
        assert_eq!(ReportCommand::Limits.to_wire(), "report 2");
        assert_eq!(ReportCommand::Metering.to_wire(), "report 3");
        assert_eq!(ReportCommand::history(5).unwrap().to_wire(), "report 105");
    }

    #[test]
    fn report_id_matches_decoder() {
        assert_eq!(ReportCommand::Metering.report_id(), ReportId::from("3"));
        assert_eq!(
            ReportCommand::history(12).unwrap().report_id(),
            ReportId::Other("112".to_string())
        );
    }

    #[test]
    fn history_index_out_of_range_is_rejected() {
        assert_eq!(
            ReportCommand::history(99).unwrap_err(),
            ValueError::OutOfRange {
                min: 0,
                max: 30,
                actual: 99
            }
        );
        assert_eq!(
            ReportCommand::History(HistoryIndex::MAX).to_wire(),
            "report 130"
        );
    }

    #[test]
    fn info_command() {
        assert_eq!(InfoCommand.to_wire(), "i");
    }
}
