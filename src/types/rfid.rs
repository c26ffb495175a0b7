// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RFID authorization values for `start` and `stop`.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// RFID tag, up to 16 hexadecimal digits.
///
/// # Examples
///
/// ```
/// use kecontact::types::RfidTag;
///
/// let tag: RfidTag = "e3f76b8d00000000".parse().unwrap();
/// assert_eq!(tag.as_str(), "e3f76b8d00000000");
///
/// assert!("not-hex".parse::<RfidTag>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RfidTag(String);

impl RfidTag {
    /// Maximum number of hex digits.
    pub const MAX_LEN: usize = 16;

    /// Returns the tag as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RfidTag {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > Self::MAX_LEN || !is_hex(s) {
            return Err(ValueError::InvalidText(format!(
                "RFID tag must be 1-{} hex digits: {s}",
                Self::MAX_LEN
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for RfidTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// RFID class, exactly 20 hexadecimal digits.
///
/// # Examples
///
/// ```
/// use kecontact::types::RfidClass;
///
/// assert_eq!(RfidClass::default().as_str(), "01010400000000000000");
/// assert!("0101".parse::<RfidClass>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RfidClass(String);

impl RfidClass {
    /// Required number of hex digits.
    pub const LEN: usize = 20;

    /// Class the station uses for tags without an explicit class.
    pub const DEFAULT: &'static str = "01010400000000000000";

    /// Returns the class as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RfidClass {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl FromStr for RfidClass {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::LEN || !is_hex(s) {
            return Err(ValueError::InvalidText(format!(
                "RFID class must be {} hex digits: {s}",
                Self::LEN
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for RfidClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}
