// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Process glue for the sunfuse binaries.
//!
//! - `mqtt-handler` subscribes to both sensor topics and stores every fused
//!   record under `houses/{house_id}` in Firebase
//! - `solar-panel` publishes environmental samples, from the Sense HAT when
//!   present
//! - `wattage-meter` publishes simulated power samples

pub mod cli;
pub mod config;
pub mod logging;
pub mod realtime;
pub mod runner;
pub mod signals;

pub use config::{Role, Settings};
