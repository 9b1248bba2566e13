// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RTPS locators (Locator_t, Sec.8.3.2)
//!
//! Locators specify network addresses where readers can be reached.
//! The message group treats them as opaque destinations and hands them
//! to the transport unchanged.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// Locator kind (LOCATOR_KIND_UDPv4 = 1, LOCATOR_KIND_UDPv6 = 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorKind {
    UdpV4,
    UdpV6,
}

impl LocatorKind {
    /// Wire value of `Locator_t.kind`.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            LocatorKind::UdpV4 => 1,
            LocatorKind::UdpV6 => 2,
        }
    }
}

/// Network destination: kind + 16-byte address + port.
///
/// IPv4 addresses occupy the last 4 address bytes, as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator {
    pub kind: LocatorKind,
    pub port: u32,
    pub address: [u8; 16],
}

impl Locator {
    /// UDPv4 locator from dotted octets.
    #[must_use]
    pub fn udp_v4(octets: [u8; 4], port: u16) -> Self {
        let mut address = [0u8; 16];
        address[12..16].copy_from_slice(&octets);
        Self {
            kind: LocatorKind::UdpV4,
            port: u32::from(port),
            address,
        }
    }

    /// UDPv6 locator.
    #[must_use]
    pub fn udp_v6(addr: Ipv6Addr, port: u16) -> Self {
        Self {
            kind: LocatorKind::UdpV6,
            port: u32::from(port),
            address: addr.octets(),
        }
    }

    #[must_use]
    pub fn ip(&self) -> IpAddr {
        match self.kind {
            LocatorKind::UdpV4 => IpAddr::V4(Ipv4Addr::new(
                self.address[12],
                self.address[13],
                self.address[14],
                self.address[15],
            )),
            LocatorKind::UdpV6 => IpAddr::V6(Ipv6Addr::from(self.address)),
        }
    }

    /// Socket address for the transport, `None` if the port does not fit UDP.
    #[must_use]
    pub fn to_socket_addr(&self) -> Option<SocketAddr> {
        let port = u16::try_from(self.port).ok()?;
        Some(SocketAddr::new(self.ip(), port))
    }

    #[must_use]
    pub fn is_multicast(&self) -> bool {
        self.ip().is_multicast()
    }
}

impl From<SocketAddr> for Locator {
    fn from(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(v4) => Locator::udp_v4(v4.ip().octets(), v4.port()),
            SocketAddr::V6(v6) => Locator::udp_v6(*v6.ip(), v6.port()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LocatorKind::UdpV4 => write!(f, "udpv4://{}:{}", self.ip(), self.port),
            LocatorKind::UdpV6 => write!(f, "udpv6://[{}]:{}", self.ip(), self.port),
        }
    }
}
