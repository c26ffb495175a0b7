// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UDP transport for KEBA charging stations.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::ProtocolError;
use crate::protocol::Transport;
use crate::session::Session;

/// Receive buffer size; station reports stay well below one MTU.
const RECV_BUFFER_SIZE: usize = 4096;

// ============================================================================
// UdpConfig
// ============================================================================

/// Configuration for a UDP connection to a KEBA station.
///
/// The station listens on UDP port 7090 and answers to port 7090 of the
/// sender, so the local socket is bound to that port by default.
///
/// # Examples
///
/// ```
/// use kecontact::protocol::UdpConfig;
///
/// let config = UdpConfig::new("192.168.1.20");
/// assert_eq!(config.port(), 7090);
/// assert_eq!(config.station_addr(), "192.168.1.20:7090");
///
/// let config = UdpConfig::new("wallbox.local")
///     .with_port(7091)
///     .with_bind_addr("0.0.0.0:0".parse().unwrap());
/// assert_eq!(config.bind_addr().port(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct UdpConfig {
    host: String,
    port: u16,
    bind_addr: SocketAddr,
}

impl UdpConfig {
    /// Default station port.
    pub const DEFAULT_PORT: u16 = 7090;
    /// Default local bind address.
    pub const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::V4(std::net::SocketAddrV4::new(
        std::net::Ipv4Addr::UNSPECIFIED,
        Self::DEFAULT_PORT,
    ));

    /// Creates a configuration for the station at `host`.
    ///
    /// # Arguments
    ///
    /// * `host` - Hostname or IP address of the charging station
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            bind_addr: Self::DEFAULT_BIND_ADDR,
        }
    }

    /// Sets the station port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the local address the socket binds to.
    #[must_use]
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Returns the station host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the station port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the local bind address.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Returns `host:port` of the station.
    #[must_use]
    pub fn station_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ============================================================================
// UdpTransport
// ============================================================================

/// Outbound half of the UDP connection.
///
/// Sending pushes the datagram onto a channel drained by a writer task, so
/// [`Transport::send`] never blocks.
#[derive(Debug)]
pub struct UdpTransport {
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    local_addr: SocketAddr,
    station_addr: SocketAddr,
}

impl UdpTransport {
    /// Opens a UDP socket to the station and attaches it to `session`.
    ///
    /// Registers the transport with [`Session::connection_made`], then spawns
    /// a reader task delivering every datagram to
    /// [`Session::datagram_received`] and a writer task for outbound
    /// commands.
    ///
    /// Connecting a session that already has a connection replaces its
    /// transport. The previous connection's reader stops at its next
    /// datagram without delivering it; close the previous connection to
    /// release its socket right away.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the host is empty or the socket cannot be
    /// bound or connected.
    pub async fn connect(
        config: &UdpConfig,
        session: Arc<Session>,
    ) -> Result<UdpConnection, ProtocolError> {
        if config.host().is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "station host is empty".to_string(),
            ));
        }

        let socket = UdpSocket::bind(config.bind_addr()).await?;
        socket.connect(config.station_addr()).await?;
        let socket = Arc::new(socket);

        let local_addr = socket.local_addr()?;
        let station_addr = socket.peer_addr()?;
        tracing::debug!(local = %local_addr, station = %station_addr, "UDP socket ready");

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let transport = Arc::new(Self {
            outbound,
            local_addr,
            station_addr,
        });

        let registered: Arc<dyn Transport> = transport.clone();
        session.connection_made(Arc::clone(&registered));

        let writer = tokio::spawn(write_datagrams(Arc::clone(&socket), outbound_rx));
        let reader = tokio::spawn(read_datagrams(socket, Arc::clone(&session), registered));

        Ok(UdpConnection {
            transport,
            session,
            reader,
            writer,
        })
    }

    /// Returns the local socket address.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns the resolved station address.
    #[must_use]
    pub fn station_addr(&self) -> SocketAddr {
        self.station_addr
    }
}

impl Transport for UdpTransport {
    fn send(&self, datagram: &[u8]) -> Result<(), ProtocolError> {
        self.outbound
            .send(datagram.to_vec())
            .map_err(|_| ProtocolError::ChannelClosed("UDP writer task stopped".to_string()))
    }
}

/// Running UDP connection owning the socket tasks.
///
/// Dropping the connection stops the tasks without notifying the session;
/// call [`close`](Self::close) to also mark the station offline.
#[derive(Debug)]
pub struct UdpConnection {
    transport: Arc<UdpTransport>,
    session: Arc<Session>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl UdpConnection {
    /// Returns the transport registered with the session.
    #[must_use]
    pub fn transport(&self) -> &Arc<UdpTransport> {
        &self.transport
    }

    /// Returns the session this connection drives.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Returns the local socket address.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.transport.local_addr()
    }

    /// Stops the socket tasks and reports the loss to the session.
    pub fn close(self) {
        self.reader.abort();
        self.writer.abort();
        self.session.connection_lost(None);
    }
}

impl Drop for UdpConnection {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

async fn write_datagrams(socket: Arc<UdpSocket>, mut outbound: mpsc::UnboundedReceiver<Vec<u8>>) {
    while let Some(datagram) = outbound.recv().await {
        if let Err(e) = socket.send(&datagram).await {
            tracing::error!(error = %e, "Failed to send datagram");
        }
    }
}

async fn read_datagrams(
    socket: Arc<UdpSocket>,
    session: Arc<Session>,
    transport: Arc<dyn Transport>,
) {
    let mut buf = [0u8; RECV_BUFFER_SIZE];

    loop {
        let received = socket.recv_from(&mut buf).await;

        if !session.uses_transport(&transport) {
            tracing::debug!("Transport no longer registered, stopping UDP reader");
            break;
        }

        match received {
            Ok((len, addr)) => {
                // Parse errors are logged by the session; keep receiving
                let _ = session.datagram_received(&buf[..len], addr);
            }
            // ICMP errors surface per datagram on a connected socket
            Err(e) => {
                let _ = session.error_received(ProtocolError::Io(e));
            }
        }
    }
}
