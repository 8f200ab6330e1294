// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Settings file.
//!
//! ```toml
//! [broker]
//! host = "192.168.1.20"
//! port = 1883
//!
//! [generator]
//! interval_ms = 1000
//! seconds_per_hour = 3600
//! realtime = false
//!
//! [sink]
//! firebase_url = "https://example-default-rtdb.firebaseio.com/"
//! ```
//!
//! Every section and key is optional.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use sunfuse_adapters::TransportConfig;
use sunfuse_core::Channel;
use sunfuse_error::{Result, SunfuseError};
use sunfuse_generators::{SimulatedHour, DEFAULT_IIO_ROOT};

pub const DEFAULT_FIREBASE_URL: &str = "https://erts-pr-default-rtdb.europe-west1.firebasedatabase.app/";

/// Which process is running; picks the MQTT client id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Handler,
    Producer(Channel),
}

impl Role {
    pub const fn client_id(self) -> &'static str {
        match self {
            Role::Handler => "mqtt_handler",
            Role::Producer(Channel::Environmental) => "solar_panel_rpi",
            Role::Producer(Channel::Power) => "wattage_meter_rt_c",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub interval_ms: u64,
    pub seconds_per_hour: u64,
    /// Ask for `SCHED_FIFO` at startup; only the wattage meter does.
    pub realtime: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            seconds_per_hour: SimulatedHour::DEFAULT_SECONDS_PER_HOUR,
            realtime: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SinkSettings {
    pub firebase_url: String,
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            firebase_url: DEFAULT_FIREBASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HardwareSettings {
    pub iio_root: PathBuf,
}

impl Default for HardwareSettings {
    fn default() -> Self {
        Self {
            iio_root: PathBuf::from(DEFAULT_IIO_ROOT),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub broker: TransportConfig,
    pub generator: GeneratorSettings,
    pub sink: SinkSettings,
    pub hardware: HardwareSettings,
}

impl Settings {
    /// Reads `path`, or returns the defaults when no file is given.
    ///
    /// # Errors
    /// [`SunfuseError::Config`] when the file cannot be read or parsed, or
    /// holds invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SunfuseError::config(format!("read {}: {e}", path.display())))?;
        let settings = Self::parse(&contents)
            .map_err(|e| SunfuseError::config(format!("{}: {e}", path.display())))?;
        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    /// Returns the TOML diagnostic when `contents` is malformed.
    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// # Errors
    /// [`SunfuseError::Config`] naming the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.broker.host.trim().is_empty() {
            return Err(SunfuseError::config("broker host must not be empty"));
        }
        if self.broker.port == 0 {
            return Err(SunfuseError::config("broker port must be positive"));
        }
        if self.generator.interval_ms == 0 {
            return Err(SunfuseError::config("generator interval must be positive"));
        }
        SimulatedHour::new(self.generator.seconds_per_hour)?;
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.generator.interval_ms)
    }

    /// # Errors
    /// [`SunfuseError::Config`] when `seconds_per_hour` is zero.
    pub fn hours(&self) -> Result<SimulatedHour> {
        SimulatedHour::new(self.generator.seconds_per_hour)
    }

    /// Broker settings for `role`.
    ///
    /// A client id set in the file wins over the role's own.
    pub fn transport_for(&self, role: Role) -> TransportConfig {
        let mut config = self.broker.clone();
        config
            .client_id
            .get_or_insert_with(|| role.client_id().to_string());
        config
    }
}
