// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Charging current type.
//!
//! KEBA stations accept charging currents in milliamps between 6 A and 63 A.

use std::fmt;

use crate::error::ValueError;

/// Charging current limit in milliamps (6000-63000).
///
/// # Examples
///
/// ```
/// use kecontact::types::ChargingCurrent;
///
/// let current = ChargingCurrent::from_amps(16).unwrap();
/// assert_eq!(current.milliamps(), 16000);
///
/// assert!(ChargingCurrent::new(5999).is_err());
/// assert!(ChargingCurrent::new(63001).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChargingCurrent(u32);

impl ChargingCurrent {
    /// Lowest current allowed by IEC 61851 (6 A).
    pub const MIN: Self = Self(6000);

    /// Highest current a station accepts (63 A).
    pub const MAX: Self = Self(63000);

    /// Creates a current from milliamps.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` outside 6000-63000 mA.
    pub fn new(milliamps: u32) -> Result<Self, ValueError> {
        if !(Self::MIN.0..=Self::MAX.0).contains(&milliamps) {
            return Err(ValueError::OutOfRange {
                min: Self::MIN.0,
                max: Self::MAX.0,
                actual: milliamps,
            });
        }
        Ok(Self(milliamps))
    }

    /// Creates a current from whole amps.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` outside 6-63 A.
    pub fn from_amps(amps: u8) -> Result<Self, ValueError> {
        Self::new(u32::from(amps) * 1000)
    }

    /// Returns the current in milliamps, as sent on the wire.
    #[must_use]
    pub const fn milliamps(&self) -> u32 {
        self.0
    }

    /// Returns the current in amps.
    #[must_use]
    pub fn amps(&self) -> f64 {
        f64::from(self.0) / 1000.0
    }
}

impl fmt::Display for ChargingCurrent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} A", self.amps())
    }
}

impl TryFrom<u32> for ChargingCurrent {
    type Error = ValueError;

    fn try_from(milliamps: u32) -> Result<Self, Self::Error> {
        Self::new(milliamps)
    }
}
