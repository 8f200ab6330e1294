// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt::{self, Display};

/// Topic the environmental (solar panel) producer publishes on.
pub const ENVIRONMENTAL_TOPIC: &str = "sensor/solar_panel_rpi";

/// Topic the power (wattage meter) producer publishes on.
pub const POWER_TOPIC: &str = "sensor/wattage_meter_rt_c_component";

/// One of the two independent telemetry sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Humidity and temperature
    Environmental,
    /// Consumption and production wattage
    Power,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Environmental, Channel::Power];

    /// Transport topic this channel is published on.
    pub const fn topic(self) -> &'static str {
        match self {
            Channel::Environmental => ENVIRONMENTAL_TOPIC,
            Channel::Power => POWER_TOPIC,
        }
    }

    /// Maps a transport topic back to its channel.
    ///
    /// Returns `None` for topics the fusion pipeline does not consume.
    pub fn from_topic(topic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.topic() == topic)
    }

    /// The channel this one is paired with.
    pub const fn other(self) -> Self {
        match self {
            Channel::Environmental => Channel::Power,
            Channel::Power => Channel::Environmental,
        }
    }

    /// Human readable name of the device producing this channel.
    pub const fn device_name(self) -> &'static str {
        match self {
            Channel::Environmental => "Solar Panel",
            Channel::Power => "Wattage Meter",
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Environmental => f.write_str("environmental"),
            Channel::Power => f.write_str("power"),
        }
    }
}
