// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session handling for one charging station.
//!
//! A [`Session`] owns the cumulative [`DeviceState`] of a single station and
//! reacts to transport lifecycle events:
//!
//! | Event | Method | Effect |
//! |-------|--------|--------|
//! | connected | [`Session::connection_made`] | transport recorded |
//! | datagram | [`Session::datagram_received`] | `Online = true`, classify, merge |
//! | error | [`Session::error_received`] | logged and returned |
//! | lost | [`Session::connection_lost`] | `Online = false`, transport dropped |
//!
//! Inbound events are processed one at a time. Sending only reads the
//! transport handle and may happen concurrently from another task.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::command::Command;
use crate::error::{Error, ProtocolError, Result};
use crate::message::{MessageCategory, classify_bytes};
use crate::protocol::Transport;
use crate::report::ReportId;
use crate::state::DeviceState;
use crate::subscription::{CallbackRegistry, SubscriptionId};

/// Connection status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// No transport registered. Initial state, and the state after loss.
    Disconnected,
    /// A transport is registered.
    Connected,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("disconnected"),
            Self::Connected => f.write_str("connected"),
        }
    }
}

/// What the session did with a datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatagramOutcome {
    /// A report was merged and observers were notified.
    Merged(ReportId),
    /// The station accepted the last command.
    CommandAccepted,
    /// The station rejected the last command.
    CommandRejected,
    /// Valid JSON without an `ID` field; nothing merged.
    Unrecognized,
    /// The session is disconnected; the datagram was not processed.
    Dropped,
}

impl DatagramOutcome {
    /// Returns `Some(accepted)` for command acknowledgements.
    #[must_use]
    pub fn command_result(&self) -> Option<bool> {
        match self {
            Self::CommandAccepted => Some(true),
            Self::CommandRejected => Some(false),
            _ => None,
        }
    }
}

/// Protocol session with a single KEBA charging station.
///
/// Each session owns its own state; nothing is shared between instances.
/// Wrap it in an `Arc` to drive it from a transport task and send from
/// others.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use kecontact::{ProtocolError, Session};
/// use kecontact::protocol::Transport;
///
/// struct Discard;
///
/// impl Transport for Discard {
///     fn send(&self, _datagram: &[u8]) -> Result<(), ProtocolError> {
///         Ok(())
///     }
/// }
///
/// let session = Session::new();
/// session.on_state_updated(|state| println!("max current: {:?}", state.max_current()));
///
/// session.connection_made(Arc::new(Discard));
/// let addr = "192.168.1.20:7090".parse().unwrap();
/// session.datagram_received(br#"{"ID": "2", "Max curr": 32000}"#, addr)?;
///
/// assert!(session.is_online());
/// assert_eq!(session.state().max_current(), Some(32.0));
/// # Ok::<(), kecontact::Error>(())
/// ```
pub struct Session {
    state: RwLock<DeviceState>,
    transport: RwLock<Option<Arc<dyn Transport>>>,
    callbacks: CallbackRegistry,
    inbound: Mutex<()>,
}

impl Session {
    /// Creates a disconnected session with an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DeviceState::new()),
            transport: RwLock::new(None),
            callbacks: CallbackRegistry::new(),
            inbound: Mutex::new(()),
        }
    }

    // =========================================================================
    // Lifecycle events
    // =========================================================================

    /// Records the transport once it is ready.
    ///
    /// `Online` is not touched here; it becomes `true` with the first
    /// datagram. Calling this again (reconnect) replaces the transport.
    pub fn connection_made(&self, transport: Arc<dyn Transport>) {
        let _inbound = self.inbound.lock();
        *self.transport.write() = Some(transport);
        tracing::debug!("UDP connection setup complete");
    }

    /// Handles a datagram from the station.
    ///
    /// `Online` is set before the payload is looked at, so even a malformed
    /// datagram marks the station online. Reports are merged and every state
    /// observer is called with the full state afterwards.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` if the payload is not UTF-8, not JSON, or not a
    /// JSON object. The session stays usable.
    pub fn datagram_received(&self, payload: &[u8], addr: SocketAddr) -> Result<DatagramOutcome> {
        let _inbound = self.inbound.lock();

        if self.transport.read().is_none() {
            tracing::debug!(addr = %addr, "Dropping datagram received while disconnected");
            return Ok(DatagramOutcome::Dropped);
        }

        tracing::debug!(addr = %addr, len = payload.len(), "Data received");
        self.state.write().set_online(true);

        let category = classify_bytes(payload).inspect_err(|e| {
            tracing::warn!(addr = %addr, error = %e, "Discarding malformed datagram");
        })?;

        let outcome = match category {
            MessageCategory::CommandAck => {
                tracing::debug!(payload = %String::from_utf8_lossy(payload), "Command accepted");
                self.callbacks.dispatch_command_result(true);
                DatagramOutcome::CommandAccepted
            }
            MessageCategory::CommandError => {
                tracing::warn!(payload = %String::from_utf8_lossy(payload), "Command rejected");
                self.callbacks.dispatch_command_result(false);
                DatagramOutcome::CommandRejected
            }
            MessageCategory::Report(update) => {
                let snapshot = {
                    let mut state = self.state.write();
                    state.merge(&update);
                    state.clone()
                };
                tracing::debug!(id = %update.id(), fields = update.fields().len(), "Report merged");
                self.callbacks.dispatch_state_updated(&snapshot);
                DatagramOutcome::Merged(update.id().clone())
            }
            MessageCategory::Unrecognized => {
                tracing::debug!("No ID in response from KEBA charging station");
                DatagramOutcome::Unrecognized
            }
        };

        Ok(outcome)
    }

    /// Handles an error reported by the transport.
    ///
    /// The state is not modified. The error is logged and handed back so the
    /// caller can forward it.
    pub fn error_received(&self, error: ProtocolError) -> Error {
        tracing::error!(error = %error, "Error received");
        Error::Protocol(error)
    }

    /// Handles loss of the transport.
    ///
    /// Sets `Online` to `false` and forgets the transport. Observers are not
    /// called. Datagrams are dropped until the next
    /// [`connection_made`](Self::connection_made).
    pub fn connection_lost(&self, error: Option<ProtocolError>) {
        let _inbound = self.inbound.lock();
        match &error {
            Some(e) => tracing::error!(error = %e, "Connection lost"),
            None => tracing::error!("Connection lost"),
        }
        *self.transport.write() = None;
        self.state.write().set_online(false);
    }

    // =========================================================================
    // Outbound
    // =========================================================================

    /// Sends a raw text command to the station.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConnected` if no transport is registered, or the
    /// transport's error if the handoff fails.
    pub fn send(&self, payload: &str) -> Result<()> {
        let transport = self.transport.read().clone().ok_or(Error::NotConnected)?;
        tracing::debug!(payload = %payload, "Send");
        transport.send(payload.as_bytes())?;
        Ok(())
    }

    /// Sends a typed command to the station.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub fn send_command<C: Command + ?Sized>(&self, command: &C) -> Result<()> {
        self.send(&command.to_wire())
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// Returns a snapshot of the current device state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state.read().clone()
    }

    /// Returns `true` if the station is marked online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.state.read().is_online()
    }

    /// Returns the connection status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.transport.read().is_some() {
            SessionStatus::Connected
        } else {
            SessionStatus::Disconnected
        }
    }

    /// Returns `true` if a transport is registered.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status() == SessionStatus::Connected
    }

    /// Returns `true` if `transport` is the transport currently registered.
    #[must_use]
    pub fn uses_transport(&self, transport: &Arc<dyn Transport>) -> bool {
        self.transport
            .read()
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, transport))
    }

    /// Forgets everything the station reported, `Online` included.
    ///
    /// Safe to call from an observer; a merge in progress is never split.
    pub fn reset(&self) {
        self.state.write().clear();
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Registers an observer called with the full state after each merged report.
    ///
    /// The observer runs while the datagram is being handled: it may read
    /// the session, send or [`reset`](Self::reset), but must not deliver
    /// lifecycle events (`connection_made`, `datagram_received`,
    /// `connection_lost`) itself.
    pub fn on_state_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        self.callbacks.on_state_updated(callback)
    }

    /// Registers a callback for command acknowledgements (`true`) and rejections (`false`).
    pub fn on_command_result<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.callbacks.on_command_result(callback)
    }

    /// Removes a callback. Returns `true` if it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status())
            .field("state", &*self.state.read())
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}
