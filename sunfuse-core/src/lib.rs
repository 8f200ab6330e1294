// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core types of the sunfuse pipeline.
//!
//! Two telemetry channels (environmental and power) arrive as flat JSON
//! payloads. The [`decode`] stage turns a payload into a typed
//! [`ChannelRecord`], and [`FusionState`] keeps the most recent record per
//! channel until both are present, at which point [`FusionState::try_drain`]
//! hands out the pair and empties itself.
//!
//! ```
//! use sunfuse_core::{decode, Channel, FusionState};
//!
//! let mut state = FusionState::new();
//!
//! let env = decode(Channel::Environmental, br#"{"humidity": 55.0, "temperature": 21.0}"#).unwrap();
//! state.update(env);
//! assert!(state.try_drain().is_none());
//!
//! let power = decode(Channel::Power, br#"{"consumption_wattage": 300.0, "production_wattage": 150.0}"#).unwrap();
//! state.update(power);
//! let (env, power) = state.try_drain().unwrap();
//! assert_eq!(env.humidity, 55.0);
//! assert_eq!(power.production_wattage, 150.0);
//! assert!(state.is_empty());
//! ```

pub mod channel;
pub mod clock;
pub mod decode;
pub mod fusion_state;
pub mod house;
pub mod record;

pub use self::channel::{Channel, ENVIRONMENTAL_TOPIC, POWER_TOPIC};
pub use self::clock::{Clock, SystemClock};
pub use self::decode::{decode, DecodeError};
pub use self::fusion_state::FusionState;
pub use self::house::{HouseId, RecordId};
pub use self::record::{ChannelRecord, CombinedRecord, EnvironmentalSample, PowerSample};
