// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display text command for P30 stations.

use crate::command::Command;
use crate::error::ValueError;

/// Shows a text on the station display.
///
/// The display holds at most 23 characters; longer texts are cut. Spaces
/// are sent as `$`, which the station renders as blanks.
///
/// # Examples
///
/// ```
/// use kecontact::command::{Command, DisplayCommand};
///
/// let cmd = DisplayCommand::new("Hello EV").unwrap();
/// assert_eq!(cmd.to_wire(), "display 0 2 10 0 Hello$EV");
///
/// let cmd = DisplayCommand::new("Charging").unwrap().with_duration(5, 30);
/// assert_eq!(cmd.to_wire(), "display 0 5 30 0 Charging");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCommand {
    text: String,
    min_secs: u8,
    max_secs: u8,
}

impl DisplayCommand {
    /// Maximum number of characters shown.
    pub const MAX_LEN: usize = 23;

    /// Default minimum display time in seconds.
    pub const DEFAULT_MIN_SECS: u8 = 2;

    /// Default maximum display time in seconds.
    pub const DEFAULT_MAX_SECS: u8 = 10;

    /// Creates a display command.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidText` if the text contains characters
    /// other than printable ASCII.
    pub fn new(text: impl Into<String>) -> Result<Self, ValueError> {
        let text = text.into();
        if !text.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
            return Err(ValueError::InvalidText(format!(
                "display text must be printable ASCII: {text}"
            )));
        }
        Ok(Self {
            text,
            min_secs: Self::DEFAULT_MIN_SECS,
            max_secs: Self::DEFAULT_MAX_SECS,
        })
    }

    /// Sets how long the text stays on screen.
    #[must_use]
    pub fn with_duration(mut self, min_secs: u8, max_secs: u8) -> Self {
        self.min_secs = min_secs;
        self.max_secs = max_secs.max(min_secs);
        self
    }

    /// Returns the text as it will appear on the wire.
    #[must_use]
    pub fn wire_text(&self) -> String {
        self.text
            .chars()
            .take(Self::MAX_LEN)
            .map(|c| if c == ' ' { '$' } else { c })
            .collect()
    }
}

impl Command for DisplayCommand {
    fn name(&self) -> String {
        "display".to_string()
    }

    fn payload(&self) -> Option<String> {
        Some(format!(
            "0 {} {} 0 {}",
            self.min_secs,
            self.max_secs,
            self.wire_text()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_text_is_cut() {
        let cmd = DisplayCommand::new("abcdefghijklmnopqrstuvwxyz").unwrap();
        assert_eq!(cmd.wire_text(), "abcdefghijklmnopqrstuvw");
    }

    #[test]
    fn non_ascii_is_rejected() {
        assert!(DisplayCommand::new("Grüße").is_err());
        assert!(DisplayCommand::new("line\nbreak").is_err());
    }

    #[test]
    fn max_never_below_min() {
        let cmd = DisplayCommand::new("x").unwrap().with_duration(20, 5);
        assert_eq!(cmd.to_wire(), "display 0 20 20 0 x");
    }
}
