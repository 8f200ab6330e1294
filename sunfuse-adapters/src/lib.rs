// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Concrete transports and sinks.
//!
//! - [`mqtt::MqttTransport`]: MQTT broker connection (QoS 1, auto-reconnect)
//! - [`firebase::FirebaseSink`]: Firebase Realtime Database REST push
//! - [`memory::MemoryBroker`]: in-process broker for demos and tests

pub mod firebase;
pub mod memory;
pub mod mqtt;

pub use firebase::FirebaseSink;
pub use memory::{MemoryBroker, MemoryTransport};
pub use mqtt::{MqttTransport, TransportConfig};
