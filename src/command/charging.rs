// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Charging control commands.

use crate::command::Command;
use crate::error::ValueError;
use crate::types::{ChargingCurrent, EnergyLimit, RfidClass, RfidTag};

/// Command controlling the charging process.
///
/// # Examples
///
/// ```
/// use kecontact::command::{ChargingCommand, Command};
/// use kecontact::types::{ChargingCurrent, EnergyLimit};
///
/// assert_eq!(ChargingCommand::Enable.to_wire(), "ena 1");
/// assert_eq!(ChargingCommand::Disable.to_wire(), "ena 0");
///
/// let delayed = ChargingCommand::set_current_delayed(ChargingCurrent::MIN, 30).unwrap();
/// assert_eq!(delayed.to_wire(), "currtime 6000 30");
///
/// let energy = ChargingCommand::SetEnergy(EnergyLimit::from_kwh(10).unwrap());
/// assert_eq!(energy.to_wire(), "setenergy 100000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargingCommand {
    /// Allow charging (`ena 1`).
    Enable,
    /// Suspend charging (`ena 0`).
    Disable,
    /// Set the current limit immediately (`curr`).
    SetCurrent(ChargingCurrent),
    /// Set the current limit after a delay in seconds (`currtime`).
    SetCurrentDelayed {
        /// New current limit.
        current: ChargingCurrent,
        /// Delay in seconds (0-860400).
        delay_secs: u32,
    },
    /// Stop charging after the given session energy (`setenergy`).
    SetEnergy(EnergyLimit),
    /// Switch the relay output (`output`).
    SetOutput(bool),
    /// Unlock the socket (`unlock`).
    Unlock,
    /// Authorize a session with an RFID tag (`start`).
    Start {
        /// Tag to authorize.
        tag: RfidTag,
        /// Class of the tag.
        class: RfidClass,
    },
    /// End an RFID-authorized session (`stop`).
    Stop {
        /// Tag that started the session.
        tag: RfidTag,
    },
    /// Configure the fallback current on communication loss (`failsafe`).
    Failsafe {
        /// Seconds without communication before falling back; 0 disables.
        timeout_secs: u16,
        /// Current applied after the timeout.
        current: ChargingCurrent,
        /// Store the setting in flash.
        persist: bool,
    },
}

impl ChargingCommand {
    /// Longest delay `currtime` accepts (239 hours).
    pub const MAX_DELAY_SECS: u32 = 860_400;

    /// Shortest non-zero failsafe timeout.
    pub const MIN_FAILSAFE_SECS: u16 = 10;

    /// Longest failsafe timeout.
    pub const MAX_FAILSAFE_SECS: u16 = 600;

    /// Creates a delayed current change.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the delay exceeds 860400 s.
    pub fn set_current_delayed(
        current: ChargingCurrent,
        delay_secs: u32,
    ) -> Result<Self, ValueError> {
        if delay_secs > Self::MAX_DELAY_SECS {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: Self::MAX_DELAY_SECS,
                actual: delay_secs,
            });
        }
        Ok(Self::SetCurrentDelayed {
            current,
            delay_secs,
        })
    }

    /// Creates a failsafe configuration.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` unless the timeout is 0 or 10-600 s.
    pub fn failsafe(
        timeout_secs: u16,
        current: ChargingCurrent,
        persist: bool,
    ) -> Result<Self, ValueError> {
        if timeout_secs != 0
            && !(Self::MIN_FAILSAFE_SECS..=Self::MAX_FAILSAFE_SECS).contains(&timeout_secs)
        {
            return Err(ValueError::OutOfRange {
                min: u32::from(Self::MIN_FAILSAFE_SECS),
                max: u32::from(Self::MAX_FAILSAFE_SECS),
                actual: u32::from(timeout_secs),
            });
        }
        Ok(Self::Failsafe {
            timeout_secs,
            current,
            persist,
        })
    }

    /// Creates an RFID start with the default tag class.
    #[must_use]
    pub fn start(tag: RfidTag) -> Self {
        Self::Start {
            tag,
            class: RfidClass::default(),
        }
    }
}

impl Command for ChargingCommand {
    fn name(&self) -> String {
        match self {
            Self::Enable | Self::Disable => "ena",
            Self::SetCurrent(_) => "curr",
            Self::SetCurrentDelayed { .. } => "currtime",
            Self::SetEnergy(_) => "setenergy",
            Self::SetOutput(_) => "output",
            Self::Unlock => "unlock",
            Self::Start { .. } => "start",
            Self::Stop { .. } => "stop",
            Self::Failsafe { .. } => "failsafe",
        }
        .to_string()
    }

    fn payload(&self) -> Option<String> {
        match self {
            Self::Enable => Some("1".to_string()),
            Self::Disable => Some("0".to_string()),
            Self::SetCurrent(current) => Some(current.milliamps().to_string()),
            Self::SetCurrentDelayed {
                current,
                delay_secs,
            } => Some(format!("{} {delay_secs}", current.milliamps())),
            Self::SetEnergy(limit) => Some(limit.raw().to_string()),
            Self::SetOutput(on) => Some(u8::from(*on).to_string()),
            Self::Unlock => None,
            Self::Start { tag, class } => Some(format!("{tag} {class}")),
            Self::Stop { tag } => Some(tag.to_string()),
            Self::Failsafe {
                timeout_secs,
                current,
                persist,
            } => Some(format!(
                "{timeout_secs} {} {}",
                current.milliamps(),
                u8::from(*persist)
            )),
        }
    }
}
