// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Decode stage: raw transport payload to typed channel record.

use crate::channel::Channel;
use crate::record::{ChannelRecord, EnvironmentalSample, PowerSample};
use sunfuse_error::SunfuseError;

/// A payload that does not match its channel's record shape.
#[derive(Debug, thiserror::Error)]
#[error("Failed to decode {channel} payload: {source}")]
pub struct DecodeError {
    pub channel: Channel,
    #[source]
    source: serde_json::Error,
}

impl From<DecodeError> for SunfuseError {
    fn from(err: DecodeError) -> Self {
        SunfuseError::decode(err.channel, err.source)
    }
}

/// Parses `payload` as the record shape expected on `channel`.
///
/// Unknown fields are ignored; missing or non-numeric required fields, invalid
/// UTF-8 and malformed JSON all fail. Failure has no side effects, so callers
/// drop the message and keep going.
///
/// # Errors
/// Returns [`DecodeError`] carrying `channel` when the payload does not conform.
pub fn decode(channel: Channel, payload: &[u8]) -> Result<ChannelRecord, DecodeError> {
    let record = match channel {
        Channel::Environmental => {
            serde_json::from_slice::<EnvironmentalSample>(payload).map(ChannelRecord::from)
        }
        Channel::Power => serde_json::from_slice::<PowerSample>(payload).map(ChannelRecord::from),
    };

    record.map_err(|source| DecodeError { channel, source })
}
