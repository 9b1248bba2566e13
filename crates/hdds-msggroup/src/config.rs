// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message group configuration.
//!
//! Supports both programmatic and file-based (TOML) configuration:
//!
//! ```toml
//! max_message_size = 1400
//!
//! [transport]
//! bind_address = "0.0.0.0:0"
//! multicast_ttl = 1
//! multicast_loop = true
//! unicast_ttl = 64
//! ```

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Default maximum message size (fits a UDP datagram with IP/UDP headers).
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 65_500;

/// Largest UDP payload over IPv4.
pub const MAX_UDP_PAYLOAD: usize = 65_507;

/// Smallest useful message: header + INFO_TS + a minimal GAP.
pub const MIN_MESSAGE_SIZE: usize = 64;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Message group configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Upper bound on every assembled message, in bytes.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,

    /// UDP transport settings.
    #[serde(default)]
    pub transport: TransportConfig,
}

/// UDP transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Local bind address (port 0 = ephemeral).
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Multicast TTL / hop limit.
    #[serde(default = "default_multicast_ttl")]
    pub multicast_ttl: u8,

    /// Deliver multicast sends to local listeners.
    #[serde(default = "default_true")]
    pub multicast_loop: bool,

    /// Unicast TTL / hop limit.
    #[serde(default = "default_unicast_ttl")]
    pub unicast_ttl: u8,
}

fn default_max_message_size() -> usize {
    DEFAULT_MAX_MESSAGE_SIZE
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 0))
}

fn default_multicast_ttl() -> u8 {
    1
}

fn default_unicast_ttl() -> u8 {
    64
}

fn default_true() -> bool {
    true
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            transport: TransportConfig::default(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            multicast_ttl: 1,
            multicast_loop: true,
            unicast_ttl: 64,
        }
    }
}

impl GroupConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GroupConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the maximum message size.
    #[must_use]
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_message_size < MIN_MESSAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "max_message_size {} is below the minimum of {} bytes",
                self.max_message_size, MIN_MESSAGE_SIZE
            )));
        }
        if self.max_message_size > MAX_UDP_PAYLOAD {
            return Err(ConfigError::Invalid(format!(
                "max_message_size {} exceeds the UDP payload limit of {} bytes",
                self.max_message_size, MAX_UDP_PAYLOAD
            )));
        }
        if self.transport.multicast_ttl == 0 || self.transport.unicast_ttl == 0 {
            return Err(ConfigError::Invalid("TTL values must be at least 1".into()));
        }
        Ok(())
    }
}
