// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Datagram transports for talking to KEBA charging stations.
//!
//! The [`Session`](crate::Session) never touches sockets itself. It hands
//! outbound datagrams to a [`Transport`] and is driven by lifecycle events
//! the transport (or the application) delivers.
//!
//! # Transports
//!
//! - [`UdpTransport`]: tokio UDP socket bound to the station's port 7090
//!   (feature `udp`, enabled by default)
//! - any application type implementing [`Transport`]

#[cfg(feature = "udp")]
mod udp;

#[cfg(feature = "udp")]
pub use udp::{UdpConfig, UdpConnection, UdpTransport};

use crate::error::ProtocolError;

/// Outbound half of a datagram transport.
///
/// `send` is a non-blocking handoff: implementations queue the datagram and
/// return immediately. It may be called from any task while the session is
/// handling inbound datagrams.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use kecontact::ProtocolError;
/// use kecontact::protocol::Transport;
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<Vec<u8>>>);
///
/// impl Transport for Recorder {
///     fn send(&self, datagram: &[u8]) -> Result<(), ProtocolError> {
///         self.0.lock().push(datagram.to_vec());
///         Ok(())
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// recorder.send(b"report 1").unwrap();
/// assert_eq!(recorder.0.lock().len(), 1);
/// ```
pub trait Transport: Send + Sync {
    /// Queues a datagram for the station.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the transport can no longer send.
    fn send(&self, datagram: &[u8]) -> Result<(), ProtocolError>;
}
