// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! UDP transport for assembled RTPS messages.
//!
//! One socket per address family, bound from `TransportConfig`. Multicast
//! TTL and loopback are applied at construction; sends are plain `send_to`
//! calls.

use std::io;
use std::net::{SocketAddr, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};

use super::{Transport, TransportError};
use crate::config::TransportConfig;
use crate::protocol::locator::{Locator, LocatorKind};

/// Send-only UDP transport.
#[allow(clippy::module_name_repetitions)]
pub struct UdpTransport {
    v4: Option<UdpSocket>,
    v6: Option<UdpSocket>,
    config: TransportConfig,
}

impl UdpTransport {
    /// Bind the sockets described by `config`.
    ///
    /// The IPv4 socket binds to `bind_address` when it is IPv4 (IPv6 likewise).
    /// The other family gets a wildcard socket; failure to create it is logged
    /// and only that family becomes unreachable.
    pub fn new(config: &TransportConfig) -> io::Result<Self> {
        let bind = config.bind_address;
        let (v4_bind, v6_bind): (SocketAddr, SocketAddr) = if bind.is_ipv4() {
            (bind, SocketAddr::from(([0u16; 8], 0)))
        } else {
            (SocketAddr::from(([0u8; 4], 0)), bind)
        };

        let v4 = match open_socket(v4_bind, config) {
            Ok(sock) => Some(sock),
            Err(err) if bind.is_ipv6() => {
                log::debug!("[UDP] IPv4 socket unavailable: {}", err);
                None
            }
            Err(err) => return Err(err),
        };
        let v6 = match open_socket(v6_bind, config) {
            Ok(sock) => Some(sock),
            Err(err) if bind.is_ipv4() => {
                log::debug!("[UDP] IPv6 socket unavailable: {}", err);
                None
            }
            Err(err) => return Err(err),
        };

        log::debug!(
            "[UDP] transport ready bind={} v4={} v6={} mc_ttl={} mc_loop={}",
            bind,
            v4.is_some(),
            v6.is_some(),
            config.multicast_ttl,
            config.multicast_loop
        );

        Ok(Self {
            v4,
            v6,
            config: config.clone(),
        })
    }

    /// Local address of the IPv4 socket, if any.
    pub fn local_addr_v4(&self) -> Option<SocketAddr> {
        self.v4.as_ref().and_then(|s| s.local_addr().ok())
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn socket_for(&self, kind: LocatorKind) -> Option<&UdpSocket> {
        match kind {
            LocatorKind::UdpV4 => self.v4.as_ref(),
            LocatorKind::UdpV6 => self.v6.as_ref(),
        }
    }
}

fn open_socket(bind: SocketAddr, config: &TransportConfig) -> io::Result<UdpSocket> {
    let domain = if bind.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    if bind.is_ipv4() {
        socket.set_ttl(u32::from(config.unicast_ttl))?;
        socket.set_multicast_ttl_v4(u32::from(config.multicast_ttl))?;
        socket.set_multicast_loop_v4(config.multicast_loop)?;
    } else {
        socket.set_only_v6(true)?;
        socket.set_unicast_hops_v6(u32::from(config.unicast_ttl))?;
        socket.set_multicast_hops_v6(u32::from(config.multicast_ttl))?;
        socket.set_multicast_loop_v6(config.multicast_loop)?;
    }
    socket.bind(&bind.into())?;
    Ok(socket.into())
}

impl Transport for UdpTransport {
    fn send_sync(&self, message: &[u8], locator: &Locator) -> Result<(), TransportError> {
        let socket = self
            .socket_for(locator.kind)
            .ok_or(TransportError::UnsupportedLocator(*locator))?;
        let dest = locator
            .to_socket_addr()
            .ok_or(TransportError::UnsupportedLocator(*locator))?;

        let sent = socket
            .send_to(message, dest)
            .map_err(|source| TransportError::Io {
                locator: *locator,
                source,
            })?;
        if sent != message.len() {
            return Err(TransportError::Truncated {
                locator: *locator,
                sent,
                expected: message.len(),
            });
        }

        log::trace!("[UDP] sent {} bytes to {}", sent, dest);
        Ok(())
    }
}
