// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session energy limit type.

use std::fmt;

use crate::error::ValueError;
use crate::units::ENERGY_DIVISOR;

/// Energy after which the station stops charging, in 0.1 Wh.
///
/// `0` disables the limit. This is the unit the `setenergy` command takes
/// and the `Setenergy` field of report 2 carries.
///
/// # Examples
///
/// ```
/// use kecontact::types::EnergyLimit;
///
/// let limit = EnergyLimit::from_kwh(10).unwrap();
/// assert_eq!(limit.raw(), 100_000);
/// assert!((limit.kwh() - 10.0).abs() < f64::EPSILON);
///
/// assert!(EnergyLimit::DISABLED.is_disabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnergyLimit(u32);

impl EnergyLimit {
    /// No limit.
    pub const DISABLED: Self = Self(0);

    /// Largest value the station accepts.
    pub const MAX_RAW: u32 = 999_999_999;

    /// Creates a limit from the raw wire value (0.1 Wh).
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` above 999 999 999.
    pub fn new(raw: u32) -> Result<Self, ValueError> {
        if raw > Self::MAX_RAW {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: Self::MAX_RAW,
                actual: raw,
            });
        }
        Ok(Self(raw))
    }

    /// Creates a limit from whole kilowatt-hours.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the raw value would exceed the
    /// station's maximum.
    pub fn from_kwh(kwh: u32) -> Result<Self, ValueError> {
        let raw = kwh.checked_mul(10_000).ok_or(ValueError::OutOfRange {
            min: 0,
            max: Self::MAX_RAW / 10_000,
            actual: kwh,
        })?;
        Self::new(raw)
    }

    /// Returns the raw wire value in 0.1 Wh.
    #[must_use]
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Returns the limit in kWh.
    #[must_use]
    pub fn kwh(&self) -> f64 {
        f64::from(self.0) / ENERGY_DIVISOR
    }

    /// Returns `true` if no limit is set.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for EnergyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_disabled() {
            f.write_str("unlimited")
        } else {
            write!(f, "{} kWh", self.kwh())
        }
    }
}
