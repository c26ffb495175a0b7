// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validated argument types for station commands.
//!
//! These types make out-of-range command arguments unrepresentable:
//!
//! - [`ChargingCurrent`] - Current limit in mA (6000-63000)
//! - [`EnergyLimit`] - Session energy limit in 0.1 Wh
//! - [`HistoryIndex`] - Charging session history entry (0-30)
//! - [`RfidTag`] / [`RfidClass`] - RFID authorization for `start`/`stop`

mod current;
mod energy_limit;
mod history;
mod rfid;

pub use current::ChargingCurrent;
pub use energy_limit::EnergyLimit;
pub use history::HistoryIndex;
pub use rfid::{RfidClass, RfidTag};
