// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Emission policy: decode, update, drain, post.

use crate::sink::Sink;
use parking_lot::Mutex;
use sunfuse_core::{
    decode, Channel, Clock, CombinedRecord, FusionState, HouseId, RecordId, SystemClock,
};
use tracing::{debug, error, info, warn};

/// Result of the synchronous half of message handling.
#[derive(Debug, Clone, PartialEq)]
pub enum Ingest {
    /// The payload did not decode; state is unchanged
    Dropped,
    /// The record was stored in its slot; the other channel is still empty
    Waiting { missing: Channel },
    /// Both slots were filled and have been drained into this record
    Ready(CombinedRecord),
}

/// What happened to one incoming message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The topic does not belong to either channel
    Ignored,
    /// The payload did not decode; state is unchanged
    Dropped,
    /// Stored in its slot, waiting for `missing`
    Waiting { missing: Channel },
    /// A combined record was emitted and the sink stored it
    Stored { id: RecordId, record: CombinedRecord },
    /// A combined record was emitted but the sink failed; the record is lost
    SinkFailed { record: CombinedRecord },
}

/// Owns the [`FusionState`] and hands every completed pair to a [`Sink`].
///
/// The state sits behind a mutex held only for the update + drain pair of a
/// single message, never across the sink call. A policy can therefore be
/// shared (`Arc<EmissionPolicy<..>>`) by callbacks running on several threads
/// and each drain still observes the update that preceded it.
pub struct EmissionPolicy<S, C = SystemClock> {
    state: Mutex<FusionState>,
    sink: S,
    clock: C,
    path: String,
}

impl<S> EmissionPolicy<S, SystemClock>
where
    S: Sink,
{
    /// Creates a policy posting to `houses/{house}` and stamping records with
    /// the wall clock.
    pub fn new(house: &HouseId, sink: S) -> Self {
        Self::with_clock(house, sink, SystemClock)
    }
}

impl<S, C> EmissionPolicy<S, C>
where
    S: Sink,
    C: Clock,
{
    pub fn with_clock(house: &HouseId, sink: S, clock: C) -> Self {
        Self {
            state: Mutex::new(FusionState::new()),
            sink,
            clock,
            path: house.storage_path(),
        }
    }

    /// Decodes `payload`, stores it in its slot and drains the state if both
    /// slots are filled.
    ///
    /// The emission timestamp is taken here, at drain time.
    pub fn ingest(&self, channel: Channel, payload: &[u8]) -> Ingest {
        let record = match decode(channel, payload) {
            Ok(record) => record,
            Err(err) => {
                warn!(%channel, error = %err, "dropping undecodable message");
                return Ingest::Dropped;
            }
        };

        let drained = {
            let mut state = self.state.lock();
            state.update(record);
            state.try_drain()
        };

        match drained {
            Some((environmental, power)) => {
                Ingest::Ready(CombinedRecord::fuse(environmental, power, self.clock.now()))
            }
            None => {
                let missing = channel.other();
                info!(
                    %missing,
                    "Waiting for more {} messages...",
                    missing.device_name()
                );
                Ingest::Waiting { missing }
            }
        }
    }

    /// Posts an emitted record. Failures are logged and not retried.
    pub async fn emit(&self, record: CombinedRecord) -> Outcome {
        match self.sink.post(&self.path, &record).await {
            Ok(id) => {
                let pretty = serde_json::to_string_pretty(&record).unwrap_or_default();
                info!(%id, path = %self.path, "Stored data ({id}):\n{pretty}");
                Outcome::Stored { id, record }
            }
            Err(err) => {
                error!(path = %self.path, error = %err, "combined record lost");
                Outcome::SinkFailed { record }
            }
        }
    }

    /// Handles one message that arrived on `channel`.
    pub async fn on_message(&self, channel: Channel, payload: &[u8]) -> Outcome {
        match self.ingest(channel, payload) {
            Ingest::Dropped => Outcome::Dropped,
            Ingest::Waiting { missing } => Outcome::Waiting { missing },
            Ingest::Ready(record) => self.emit(record).await,
        }
    }

    /// Handles one message as delivered by the transport.
    pub async fn on_topic_message(&self, topic: &str, payload: &[u8]) -> Outcome {
        match Channel::from_topic(topic) {
            Some(channel) => self.on_message(channel, payload).await,
            None => {
                debug!(topic, "ignoring message on unexpected topic");
                Outcome::Ignored
            }
        }
    }

    /// Copy of the current fusion state.
    pub fn state(&self) -> FusionState {
        self.state.lock().clone()
    }

    pub fn storage_path(&self) -> &str {
        &self.path
    }
}
