// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Size-bounded packing loop shared by the GAP and DATA packers.
//!
//! ```text
//! encode item 0 -> scratch
//! loop:
//!   header + prefix + scratch > max ?  -> OversizeSubmessage
//!   message = header + prefix + scratch
//!   while next item encodes and fits: append
//!   send message to every destination (unicast, then multicast)
//!   (item that did not fit stays in scratch for the next message)
//! ```
//!
//! Messages already assembled when an error surfaces are transmitted before
//! the error is returned; the offending item is never sent.

use crate::error::{GroupError, Result, SubmessageKind};
use crate::protocol::buffer::{EncodeError, EncodeResult, MessageBuffer};
use crate::protocol::constants::RTPS_SUBMSG_HEADER_SIZE;
use crate::protocol::locator::Locator;
use crate::protocol::types::SequenceNumber;
use crate::transport::{Transport, TransportError};

use super::buffers::MessageBuffers;
use super::destination::Destinations;

/// One failed (message, destination) transmission.
#[derive(Debug)]
pub struct SendFailure {
    /// Index of the message within the packing call (0-based).
    pub message_index: usize,
    pub locator: Locator,
    pub error: TransportError,
}

/// Outcome of one packing call.
#[derive(Debug, Default)]
pub struct SendReport {
    /// Messages assembled and handed to the transport.
    pub messages: usize,
    /// GAP or DATA submessages packed (INFO_TS excluded).
    pub submessages: usize,
    /// Total bytes of assembled messages (counted once per message).
    pub bytes: usize,
    /// Transmission attempts (messages x destinations).
    pub attempts: usize,
    pub failures: Vec<SendFailure>,
}

impl SendReport {
    /// True when every transmission succeeded.
    pub fn is_delivered(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn recorded transport failures into an error.
    pub fn ensure_delivered(self) -> Result<Self> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(GroupError::Delivery {
                failures: self.failures,
            })
        }
    }
}

/// Ordered items the packing loop turns into submessages.
pub(crate) trait SubmessageSource {
    const KIND: SubmessageKind;

    fn len(&self) -> usize;

    /// Sequence number reported when item `index` is rejected.
    fn sequence_number(&self, index: usize) -> SequenceNumber;

    /// Encode item `index` into `out` (already reset).
    fn encode(&self, index: usize, out: &mut MessageBuffer) -> EncodeResult<()>;

    /// Bytes written after the header of every message.
    fn prefix_len(&self) -> usize;

    fn encode_prefix(&self, out: &mut MessageBuffer) -> EncodeResult<()>;
}

/// Pack every item of `source` and send the messages to `destinations`.
///
/// The header buffer must already hold the writer's RTPS header.
pub(crate) fn run<S, T>(
    source: &S,
    buffers: &mut MessageBuffers,
    transport: &T,
    destinations: Destinations<'_>,
) -> Result<SendReport>
where
    S: SubmessageSource,
    T: Transport + ?Sized,
{
    let mut report = SendReport::default();
    let total = source.len();
    if total == 0 {
        return Ok(report);
    }

    let max = buffers.max_message_size();
    let framing = buffers.header().len() + source.prefix_len();

    // Invariant: at the top of the loop, scratch holds item `next`
    encode_item(source, buffers, 0)?;
    let mut next = 0usize;

    while next < total {
        let submessage_len = buffers.submessage().len();
        if framing + submessage_len > max {
            let sequence_number = source.sequence_number(next);
            log::error!(
                "[msggroup] {} sn={} is {} bytes, does not fit a {} byte message ({} bytes framing)",
                S::KIND,
                sequence_number,
                submessage_len,
                max,
                framing
            );
            return Err(GroupError::OversizeSubmessage {
                kind: S::KIND,
                sequence_number,
                submessage_len,
                prefix_len: framing,
                max_message_size: max,
            });
        }

        buffers.begin_message()?;
        source.encode_prefix(buffers.message_mut())?;
        buffers.append_submessage()?;
        report.submessages += 1;
        next += 1;

        let mut pending = None;
        while next < total {
            if let Err(err) = encode_item(source, buffers, next) {
                pending = Some(err);
                break;
            }
            if !buffers.submessage_fits() {
                break;
            }
            buffers.append_submessage()?;
            report.submessages += 1;
            next += 1;
        }

        dispatch(buffers.message().as_slice(), transport, destinations, &mut report);

        if let Some(err) = pending {
            return Err(err);
        }
    }

    log::debug!(
        "[msggroup] packed {} {} submessages into {} messages ({} bytes, {} failed sends)",
        report.submessages,
        S::KIND,
        report.messages,
        report.bytes,
        report.failures.len()
    );
    Ok(report)
}

fn encode_item<S: SubmessageSource>(
    source: &S,
    buffers: &mut MessageBuffers,
    index: usize,
) -> Result<()> {
    match source.encode(index, buffers.clear_submessage()) {
        Ok(()) => Ok(()),
        Err(EncodeError::SubmessageTooLarge(body_len)) => {
            let sequence_number = source.sequence_number(index);
            log::error!(
                "[msggroup] {} sn={} body of {} bytes exceeds the submessage length field",
                S::KIND,
                sequence_number,
                body_len
            );
            Err(GroupError::OversizeSubmessage {
                kind: S::KIND,
                sequence_number,
                submessage_len: body_len + RTPS_SUBMSG_HEADER_SIZE,
                prefix_len: buffers.header().len() + source.prefix_len(),
                max_message_size: buffers.max_message_size(),
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Send one message to every destination; failures are recorded, not fatal.
fn dispatch<T: Transport + ?Sized>(
    message: &[u8],
    transport: &T,
    destinations: Destinations<'_>,
    report: &mut SendReport,
) {
    let message_index = report.messages;
    for locator in destinations.iter() {
        report.attempts += 1;
        match transport.send_sync(message, locator) {
            Ok(()) => {
                log::trace!(
                    "[msggroup] message #{} ({} bytes) -> {}",
                    message_index,
                    message.len(),
                    locator
                );
            }
            Err(error) => {
                log::warn!(
                    "[msggroup] message #{} -> {} failed: {}",
                    message_index,
                    locator,
                    error
                );
                report.failures.push(SendFailure {
                    message_index,
                    locator: *locator,
                    error,
                });
            }
        }
    }
    report.messages += 1;
    report.bytes += message.len();
}
