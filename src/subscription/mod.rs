// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for session notifications.
//!
//! Each [`Session`](crate::Session) owns a [`CallbackRegistry`]. Observers
//! register through the session and are called synchronously on the
//! datagram path:
//!
//! - after every merged report, with the full device state
//! - after every command acknowledgement or rejection
//!
//! ```
//! use kecontact::Session;
//!
//! let session = Session::new();
//! let sub_id = session.on_state_updated(|state| {
//!     println!("station state: {state:?}");
//! });
//!
//! session.unsubscribe(sub_id);
//! ```

mod callback;

pub use callback::{CallbackRegistry, SubscriptionId};
