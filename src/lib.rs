// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `kecontact` - A Rust library for KEBA KeContact charging stations.
//!
//! KEBA P20/P30 wallboxes (and the BMW-branded variant) expose a small
//! text protocol on UDP port 7090. This library decodes the station's
//! datagrams into a continuously updated key/value state and sends
//! commands back.
//!
//! # Components
//!
//! - [`message`]: classifies datagrams as acknowledgement, error or report
//! - [`report`]: decodes reports 1, 2 and 3 and normalizes their units
//! - [`state`]: the cumulative [`DeviceState`] and its merge rules
//! - [`Session`]: owns the state of one station and reacts to transport events
//! - [`command`]: typed builders for the station's commands
//! - [`protocol`]: the [`Transport`](protocol::Transport) seam and a tokio UDP transport
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kecontact::Session;
//! use kecontact::command::ReportCommand;
//! use kecontact::protocol::{UdpConfig, UdpTransport};
//!
//! #[tokio::main]
//! async fn main() -> kecontact::Result<()> {
//!     let session = Arc::new(Session::new());
//!     session.on_state_updated(|state| {
//!         println!("power: {:?} kW, total: {:?} kWh", state.power(), state.total_energy());
//!     });
//!
//!     let connection = UdpTransport::connect(&UdpConfig::new("192.168.1.20"), Arc::clone(&session)).await?;
//!
//!     session.send_command(&ReportCommand::Identity)?;
//!     session.send_command(&ReportCommand::Metering)?;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(60)).await;
//!     connection.close();
//!     Ok(())
//! }
//! ```
//!
//! # Driving a Session Directly
//!
//! Applications with their own socket handling feed lifecycle events into
//! the session themselves:
//!
//! ```
//! use std::sync::Arc;
//! use kecontact::{DatagramOutcome, ProtocolError, Session};
//! use kecontact::protocol::Transport;
//!
//! struct Outbox;
//!
//! impl Transport for Outbox {
//!     fn send(&self, _datagram: &[u8]) -> Result<(), ProtocolError> {
//!         Ok(())
//!     }
//! }
//!
//! let session = Session::new();
//! session.connection_made(Arc::new(Outbox));
//!
//! let from = "192.168.1.20:7090".parse().unwrap();
//! let outcome = session.datagram_received(b"TCH-OK :done\n", from)?;
//! assert_eq!(outcome, DatagramOutcome::CommandAccepted);
//!
//! session.connection_lost(None);
//! assert!(!session.is_online());
//! # Ok::<(), kecontact::Error>(())
//! ```

pub mod command;
pub mod error;
pub mod message;
pub mod protocol;
pub mod report;
mod session;
pub mod state;
pub mod subscription;
pub mod types;
pub mod units;

pub use command::{ChargingCommand, Command, DisplayCommand, InfoCommand, ReportCommand};
pub use error::{Error, ParseError, ProtocolError, Result, ValueError};
pub use message::{MessageCategory, classify};
#[cfg(feature = "udp")]
pub use protocol::{UdpConfig, UdpConnection, UdpTransport};
pub use protocol::Transport;
pub use report::{ProductModel, ReportId, ReportUpdate};
pub use session::{DatagramOutcome, Session, SessionStatus};
pub use state::DeviceState;
pub use subscription::{CallbackRegistry, SubscriptionId};
pub use types::{ChargingCurrent, EnergyLimit, HistoryIndex, RfidClass, RfidTag};
