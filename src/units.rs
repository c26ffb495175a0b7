// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit normalization for raw report fields.
//!
//! KEBA stations report currents in milliamps, power in milliwatts and
//! energy in tenths of a watt-hour. The helpers here turn those raw integers
//! into the human-scale values stored in the device state.
//!
//! # Examples
//!
//! ```
//! use kecontact::units::Scale;
//!
//! // 16 A reported as 16000 mA
//! assert_eq!(Scale::MILLI.apply(16000.0), serde_json::json!(16.0));
//!
//! // Session energy in 0.1 Wh, shown as kWh with two decimals
//! assert_eq!(Scale::TEN_THOUSANDTH_ROUNDED.apply(123_456.0), serde_json::json!(12.35));
//! ```

use serde_json::Value;

/// Divisor used for milliamp and per-mille fields.
pub const MILLI_DIVISOR: f64 = 1000.0;

/// Divisor used for energy fields reported in 0.1 Wh.
pub const ENERGY_DIVISOR: f64 = 10_000.0;

/// Divisor used for the active power field reported in mW.
pub const POWER_DIVISOR: f64 = 1_000_000.0;

/// How a raw wire value is turned into its normalized form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Plain division.
    Divide(f64),
    /// Division followed by rounding to two decimal places.
    DivideRounded(f64),
    /// Division followed by truncation towards zero to an integer.
    DivideTruncated(f64),
}

impl Scale {
    /// Milliamps to amps, per-mille to ratio.
    pub const MILLI: Self = Self::Divide(MILLI_DIVISOR);

    /// 0.1 Wh to kWh, rounded to two decimals.
    pub const TEN_THOUSANDTH_ROUNDED: Self = Self::DivideRounded(ENERGY_DIVISOR);

    /// 0.1 Wh to whole kWh.
    pub const TEN_THOUSANDTH_TRUNCATED: Self = Self::DivideTruncated(ENERGY_DIVISOR);

    /// mW to kW, rounded to two decimals.
    pub const MILLIONTH_ROUNDED: Self = Self::DivideRounded(POWER_DIVISOR);

    /// Applies the scale to a raw value.
    ///
    /// Non-finite results become `null`.
    #[must_use]
    pub fn apply(self, raw: f64) -> Value {
        match self {
            Self::Divide(divisor) => Value::from(raw / divisor),
            Self::DivideRounded(divisor) => Value::from(round_to_hundredths(raw / divisor)),
            Self::DivideTruncated(divisor) => truncate_to_integer(raw / divisor),
        }
    }
}

/// Rounds to two decimal places.
///
/// Rounding works on the exact decimal expansion of `value`, so a quotient
/// stored slightly below `x.xx5` rounds down and one slightly above rounds
/// up.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Truncates towards zero and stores the result as an integer value.
fn truncate_to_integer(value: f64) -> Value {
    if !value.is_finite() {
        return Value::Null;
    }
    // Report counters stay far below i64::MAX after scaling
    #[allow(clippy::cast_possible_truncation)]
    let truncated = value.trunc() as i64;
    Value::from(truncated)
}
