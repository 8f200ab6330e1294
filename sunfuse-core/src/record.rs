// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::channel::Channel;
use serde::{Deserialize, Serialize};

/// Reading published on the environmental channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalSample {
    /// Relative humidity, percent
    pub humidity: f64,
    /// Temperature, degrees Celsius
    pub temperature: f64,
}

/// Reading published on the power channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSample {
    pub consumption_wattage: f64,
    pub production_wattage: f64,
}

/// A decoded payload, tagged with the channel it belongs to.
///
/// Serializes to the flat wire shape of the inner sample, without a tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChannelRecord {
    Environmental(EnvironmentalSample),
    Power(PowerSample),
}

impl ChannelRecord {
    pub const fn channel(&self) -> Channel {
        match self {
            ChannelRecord::Environmental(_) => Channel::Environmental,
            ChannelRecord::Power(_) => Channel::Power,
        }
    }

    /// Encodes the record as the UTF-8 JSON payload published on its topic.
    ///
    /// # Errors
    /// Fails only if a field cannot be represented in JSON.
    pub fn to_payload(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl From<EnvironmentalSample> for ChannelRecord {
    fn from(sample: EnvironmentalSample) -> Self {
        ChannelRecord::Environmental(sample)
    }
}

impl From<PowerSample> for ChannelRecord {
    fn from(sample: PowerSample) -> Self {
        ChannelRecord::Power(sample)
    }
}

/// One environmental and one power sample fused into a single document.
///
/// `timestamp` is taken when the record is emitted, not when either sample
/// arrived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedRecord {
    pub humidity: f64,
    pub temperature: f64,
    pub consumption_wattage: f64,
    pub production_wattage: f64,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

impl CombinedRecord {
    pub const fn fuse(env: EnvironmentalSample, power: PowerSample, timestamp: u64) -> Self {
        Self {
            humidity: env.humidity,
            temperature: env.temperature,
            consumption_wattage: power.consumption_wattage,
            production_wattage: power.production_wattage,
            timestamp,
        }
    }

    pub const fn environmental(&self) -> EnvironmentalSample {
        EnvironmentalSample {
            humidity: self.humidity,
            temperature: self.temperature,
        }
    }

    pub const fn power(&self) -> PowerSample {
        PowerSample {
            consumption_wattage: self.consumption_wattage,
            production_wattage: self.production_wattage,
        }
    }
}
