// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Inline QoS parameter list (ParameterList, RTPS 2.3 Sec.9.4.2.11)
//!
//! Each parameter is `pid: u16 | length: u16 | value`, with the value padded
//! to a 4-byte boundary. The list is terminated by PID_SENTINEL; the sentinel
//! is written by the encoder, not stored here.

use super::buffer::{EncodeError, EncodeResult, MessageBuffer};
use super::constants::PID_SENTINEL;

/// One inline QoS parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub pid: u16,
    pub value: Vec<u8>,
}

impl Parameter {
    #[must_use]
    pub fn new(pid: u16, value: Vec<u8>) -> Self {
        Self { pid, value }
    }

    /// Value length rounded up to 4 bytes.
    pub fn padded_len(&self) -> usize {
        (self.value.len() + 3) & !3
    }

    /// Size on the wire (header + padded value).
    pub fn encoded_len(&self) -> usize {
        4 + self.padded_len()
    }

    pub(crate) fn encode(&self, out: &mut MessageBuffer) -> EncodeResult<()> {
        let len = u16::try_from(self.padded_len())
            .map_err(|_| EncodeError::InvalidParameter("inline QoS parameter longer than u16"))?;
        out.write_u16_le(self.pid)?;
        out.write_u16_le(len)?;
        out.write_bytes(&self.value)?;
        let padding = self.padded_len() - self.value.len();
        out.write_bytes(&[0u8; 3][..padding])
    }
}

/// Ordered inline QoS parameters attached by a writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterList {
    params: Vec<Parameter>,
}

impl ParameterList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. PID_SENTINEL is reserved and rejected.
    pub fn push(&mut self, param: Parameter) -> EncodeResult<()> {
        if param.pid == PID_SENTINEL {
            return Err(EncodeError::InvalidParameter(
                "PID_SENTINEL terminates the list and cannot be added",
            ));
        }
        self.params.push(param);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.params.iter()
    }

    /// Size of all parameters on the wire, sentinel excluded.
    pub fn encoded_len(&self) -> usize {
        self.params.iter().map(Parameter::encoded_len).sum()
    }

    /// Write every parameter, without sentinel.
    pub(crate) fn encode_params(&self, out: &mut MessageBuffer) -> EncodeResult<()> {
        for param in &self.params {
            param.encode(out)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ParameterList {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}
