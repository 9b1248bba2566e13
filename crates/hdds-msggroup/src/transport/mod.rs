// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transport seam used by the packers.
//!
//! The packers call `Transport::send_sync` once per (message, destination)
//! pair, in order, and never retry. Anything that can put bytes on the wire
//! for a `Locator` can be plugged in: the UDP socket in [`udp`], or a
//! recording double in tests.

pub mod udp;

use std::sync::Arc;

use thiserror::Error;

use crate::protocol::locator::Locator;

pub use udp::UdpTransport;

/// Transport-level send failure for one destination.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("send to {locator} failed: {source}")]
    Io {
        locator: Locator,
        #[source]
        source: std::io::Error,
    },

    #[error("locator {0} is not reachable by this transport")]
    UnsupportedLocator(Locator),

    #[error("short send to {locator}: {sent} of {expected} bytes")]
    Truncated {
        locator: Locator,
        sent: usize,
        expected: usize,
    },
}

/// Synchronous message transmission.
pub trait Transport: Send + Sync {
    /// Send one assembled message to one destination.
    fn send_sync(&self, message: &[u8], locator: &Locator) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send_sync(&self, message: &[u8], locator: &Locator) -> Result<(), TransportError> {
        (**self).send_sync(message, locator)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send_sync(&self, message: &[u8], locator: &Locator) -> Result<(), TransportError> {
        (**self).send_sync(message, locator)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_sync(&self, message: &[u8], locator: &Locator) -> Result<(), TransportError> {
        (**self).send_sync(message, locator)
    }
}
