// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! KEBA UDP command definitions.
//!
//! Commands are plain ASCII strings sent as a single datagram. The station
//! answers data queries with a report and everything else with
//! `TCH-OK :done` or `TCH-ERROR`.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Wire example |
//! |-------------|---------|---------|
//! | [`InfoCommand`] | Firmware banner | `i` |
//! | [`ReportCommand`] | Request a report | `report 3` |
//! | [`ChargingCommand`] | Enable, limit and authorize charging | `curr 16000` |
//! | [`DisplayCommand`] | Show text on the P30 display | `display 0 2 10 0 Hello$EV` |
//!
//! # Examples
//!
//! ```
//! use kecontact::command::{ChargingCommand, Command, ReportCommand};
//! use kecontact::types::ChargingCurrent;
//!
//! assert_eq!(ReportCommand::Limits.to_wire(), "report 2");
//!
//! let cmd = ChargingCommand::SetCurrent(ChargingCurrent::from_amps(16).unwrap());
//! assert_eq!(cmd.name(), "curr");
//! assert_eq!(cmd.to_wire(), "curr 16000");
//! ```

mod charging;
mod display;
mod query;

pub use charging::ChargingCommand;
pub use display::DisplayCommand;
pub use query::{InfoCommand, ReportCommand};

/// A command that can be sent to a KEBA station.
pub trait Command {
    /// Returns the command keyword, e.g. `"report"`, `"ena"`.
    fn name(&self) -> String;

    /// Returns the space-separated arguments, if any.
    fn payload(&self) -> Option<String>;

    /// Returns the full text sent in the datagram.
    ///
    /// Format: `<name> <payload>` or just `<name>` if no payload.
    fn to_wire(&self) -> String {
        match self.payload() {
            Some(p) => format!("{} {}", self.name(), p),
            None => self.name(),
        }
    }
}
