// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Telemetry producers.
//!
//! A [`SampleSource`] yields one [`ChannelRecord`](sunfuse_core::ChannelRecord)
//! per call, either from an accelerated synthetic day ([`SimulatedSource`]) or
//! from the Sense HAT humidity sensor ([`HardwareSource`]). A [`Generator`]
//! publishes a source's samples on a fixed cadence.

pub mod generator;
pub mod hour;
pub mod profile;
pub mod source;

pub use generator::Generator;
pub use hour::SimulatedHour;
pub use source::{
    select_environmental_source, HardwareSource, SampleSource, SimulatedSource, DEFAULT_IIO_ROOT,
};
