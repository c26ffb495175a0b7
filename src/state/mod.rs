// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.
//!
//! The [`DeviceState`] struct accumulates everything a station has reported
//! during a session. Reports are merged as a shallow union: keys in the
//! update win, all other keys are kept.
//!
//! # Examples
//!
//! ```
//! use kecontact::message::{MessageCategory, classify};
//! use kecontact::state::DeviceState;
//!
//! let mut state = DeviceState::new();
//!
//! if let MessageCategory::Report(update) = classify(r#"{"ID": "2", "Max curr": 16000}"#)? {
//!     state.merge(&update);
//! }
//!
//! assert_eq!(state.max_current(), Some(16.0));
//! # Ok::<(), kecontact::ParseError>(())
//! ```

mod device_state;

pub use device_state::{DeviceState, ONLINE_FIELD};
