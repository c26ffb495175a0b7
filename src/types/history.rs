// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Charging session history index.

use std::fmt;

use crate::error::ValueError;

/// Index into the station's charging session history (0-30, 0 is latest).
///
/// # Examples
///
/// ```
/// use kecontact::types::HistoryIndex;
///
/// let index = HistoryIndex::new(12).unwrap();
/// assert_eq!(index.report_id(), "112");
///
/// assert!(HistoryIndex::new(31).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HistoryIndex(u8);

impl HistoryIndex {
    /// Latest session.
    pub const LATEST: Self = Self(0);

    /// Oldest session the station keeps.
    pub const MAX: Self = Self(30);

    /// Creates a history index.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` above 30.
    pub fn new(index: u8) -> Result<Self, ValueError> {
        if index > Self::MAX.0 {
            return Err(ValueError::OutOfRange {
                min: u32::from(Self::LATEST.0),
                max: u32::from(Self::MAX.0),
                actual: u32::from(index),
            });
        }
        Ok(Self(index))
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the report ID the station uses for this entry (`100`-`130`).
    #[must_use]
    pub fn report_id(&self) -> String {
        format!("1{:02}", self.0)
    }
}

impl fmt::Display for HistoryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for HistoryIndex {
    type Error = ValueError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(HistoryIndex::new(0).unwrap(), HistoryIndex::LATEST);
        assert_eq!(HistoryIndex::new(30).unwrap(), HistoryIndex::MAX);
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert_eq!(
            HistoryIndex::new(99).unwrap_err(),
            ValueError::OutOfRange {
                min: 0,
                max: 30,
                actual: 99
            }
        );
        assert!(HistoryIndex::try_from(u8::MAX).is_err());
    }

    #[test]
    fn report_id_is_zero_padded() {
        assert_eq!(HistoryIndex::LATEST.report_id(), "100");
        assert_eq!(HistoryIndex::new(5).unwrap().report_id(), "105");
        assert_eq!(HistoryIndex::MAX.report_id(), "130");
    }
}
