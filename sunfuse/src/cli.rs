// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Command line of the three binaries. Flags override the settings file.

use crate::config::Settings;
use clap::Parser;
use std::path::PathBuf;
use sunfuse_core::HouseId;
use sunfuse_error::Result;

#[derive(Debug, Parser)]
#[command(version, about = "MQTT handler for solar energy monitoring")]
pub struct HandlerArgs {
    /// House ID for identifying the data source
    pub house_id: HouseId,

    /// MQTT broker address [default: localhost]
    pub broker: Option<String>,

    /// MQTT broker port [default: 1883]
    pub port: Option<u16>,

    /// TOML settings file
    #[arg(long, env = "SUNFUSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Firebase Realtime Database URL
    #[arg(long, env = "SUNFUSE_FIREBASE_URL")]
    pub firebase_url: Option<String>,
}

impl HandlerArgs {
    /// # Errors
    /// Fails when the settings file is unreadable or the result is invalid.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        override_broker(&mut settings, self.broker.as_ref(), self.port);
        if let Some(url) = &self.firebase_url {
            settings.sink.firebase_url.clone_from(url);
        }
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Periodic sensor telemetry publisher")]
pub struct ProducerArgs {
    /// MQTT broker address [default: localhost]
    pub broker: Option<String>,

    /// MQTT broker port [default: 1883]
    pub port: Option<u16>,

    /// TOML settings file
    #[arg(long, env = "SUNFUSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Milliseconds between samples
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Real seconds per simulated hour (3600 follows UTC)
    #[arg(long)]
    pub seconds_per_hour: Option<u64>,

    /// Where to look for the HTS221 sensor
    #[arg(long)]
    pub iio_root: Option<PathBuf>,

    /// Keep normal scheduling instead of requesting real-time priority
    #[arg(long)]
    pub no_realtime: bool,
}

impl ProducerArgs {
    /// # Errors
    /// Fails when the settings file is unreadable or the result is invalid.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        override_broker(&mut settings, self.broker.as_ref(), self.port);
        if let Some(interval_ms) = self.interval_ms {
            settings.generator.interval_ms = interval_ms;
        }
        if let Some(seconds_per_hour) = self.seconds_per_hour {
            settings.generator.seconds_per_hour = seconds_per_hour;
        }
        if let Some(iio_root) = &self.iio_root {
            settings.hardware.iio_root.clone_from(iio_root);
        }
        if self.no_realtime {
            settings.generator.realtime = false;
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn override_broker(settings: &mut Settings, broker: Option<&String>, port: Option<u16>) {
    if let Some(host) = broker {
        settings.broker.host.clone_from(host);
    }
    if let Some(port) = port {
        settings.broker.port = port;
    }
}
