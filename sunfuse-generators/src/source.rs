// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Where samples come from.

use crate::hour::SimulatedHour;
use crate::profile;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sunfuse_core::{Channel, ChannelRecord, Clock, EnvironmentalSample, SystemClock};
use sunfuse_error::{Result, SunfuseError};
use tracing::{debug, info, warn};

/// Default mount point of the Linux industrial I/O devices.
pub const DEFAULT_IIO_ROOT: &str = "/sys/bus/iio/devices";

const HTS221_NAME: &str = "hts221";

/// Produces one record per call for a fixed channel.
#[async_trait]
pub trait SampleSource: Send {
    fn channel(&self) -> Channel;

    /// Short label used in logs ("simulated", "hts221").
    fn kind(&self) -> &'static str;

    /// # Errors
    /// Hardware sources fail with [`SunfuseError::HardwareUnavailable`] when the
    /// sensor stops answering. Simulated sources never fail.
    async fn sample(&mut self) -> Result<ChannelRecord>;
}

/// Synthetic day curves with uniform jitter.
pub struct SimulatedSource {
    channel: Channel,
    hours: SimulatedHour,
    clock: Arc<dyn Clock>,
    rng: StdRng,
}

impl SimulatedSource {
    pub fn new(channel: Channel, hours: SimulatedHour) -> Self {
        Self {
            channel,
            hours,
            clock: Arc::new(SystemClock),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn environmental(hours: SimulatedHour) -> Self {
        Self::new(Channel::Environmental, hours)
    }

    pub fn power(hours: SimulatedHour) -> Self {
        Self::new(Channel::Power, hours)
    }

    /// Makes the jitter sequence reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn current_hour(&self) -> u32 {
        self.hours.hour_at(self.clock.now())
    }
}

#[async_trait]
impl SampleSource for SimulatedSource {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn kind(&self) -> &'static str {
        "simulated"
    }

    async fn sample(&mut self) -> Result<ChannelRecord> {
        let hour = self.current_hour();
        debug!(channel = %self.channel, hour, "simulated hour");
        let record = match self.channel {
            Channel::Environmental => profile::environmental_sample(hour, &mut self.rng).into(),
            Channel::Power => profile::power_sample(hour, &mut self.rng).into(),
        };
        Ok(record)
    }
}

/// HTS221 humidity and temperature sensor of the Sense HAT, read through IIO sysfs.
#[derive(Debug, Clone)]
pub struct HardwareSource {
    device: PathBuf,
}

impl HardwareSource {
    /// Looks for an `hts221` device below `iio_root` and checks it is readable.
    ///
    /// # Errors
    /// [`SunfuseError::HardwareUnavailable`] when no such device exists or its
    /// channels cannot be read.
    pub fn detect(iio_root: impl AsRef<Path>) -> Result<Self> {
        let iio_root = iio_root.as_ref();
        let entries = std::fs::read_dir(iio_root)
            .map_err(|e| unavailable(format!("{}: {e}", iio_root.display())))?;

        for entry in entries.flatten() {
            let device = entry.path();
            let name = std::fs::read_to_string(device.join("name")).unwrap_or_default();
            if name.trim() != HTS221_NAME {
                continue;
            }
            let source = Self { device };
            read_sync(&source.device, "in_temp")?;
            read_sync(&source.device, "in_humidityrelative")?;
            return Ok(source);
        }

        Err(unavailable(format!(
            "no {HTS221_NAME} device under {}",
            iio_root.display()
        )))
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    async fn read(&self, prefix: &str) -> Result<f64> {
        let raw = read_value(&self.device, prefix, "raw").await?;
        let offset = read_optional(&self.device, prefix, "offset", 0.0).await?;
        let scale = read_optional(&self.device, prefix, "scale", 1.0).await?;
        Ok(scaled(raw, offset, scale))
    }
}

#[async_trait]
impl SampleSource for HardwareSource {
    fn channel(&self) -> Channel {
        Channel::Environmental
    }

    fn kind(&self) -> &'static str {
        HTS221_NAME
    }

    async fn sample(&mut self) -> Result<ChannelRecord> {
        let temperature = self.read("in_temp").await?;
        let humidity = self.read("in_humidityrelative").await?;
        Ok(EnvironmentalSample {
            humidity,
            temperature,
        }
        .into())
    }
}

/// Picks the hardware sensor when present, the simulation otherwise.
pub fn select_environmental_source(
    iio_root: impl AsRef<Path>,
    hours: SimulatedHour,
) -> Box<dyn SampleSource> {
    match HardwareSource::detect(iio_root) {
        Ok(source) => {
            info!(device = %source.device().display(), "using hardware environmental sensor");
            Box::new(source)
        }
        Err(err) => {
            warn!(error = %err, "falling back to simulated environmental data");
            Box::new(SimulatedSource::environmental(hours))
        }
    }
}

/// Milli-units reported by IIO converted to degrees Celsius / percent.
fn scaled(raw: f64, offset: f64, scale: f64) -> f64 {
    (raw + offset) * scale / 1000.0
}

fn unavailable(reason: impl Display) -> SunfuseError {
    SunfuseError::hardware_unavailable(reason)
}

fn parse(path: &Path, contents: &str) -> Result<f64> {
    contents
        .trim()
        .parse()
        .map_err(|e| unavailable(format!("{}: {e}", path.display())))
}

fn read_sync(device: &Path, prefix: &str) -> Result<f64> {
    let path = device.join(format!("{prefix}_raw"));
    let contents =
        std::fs::read_to_string(&path).map_err(|e| unavailable(format!("{}: {e}", path.display())))?;
    parse(&path, &contents)
}

async fn read_value(device: &Path, prefix: &str, attribute: &str) -> Result<f64> {
    let path = device.join(format!("{prefix}_{attribute}"));
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| unavailable(format!("{}: {e}", path.display())))?;
    parse(&path, &contents)
}

async fn read_optional(device: &Path, prefix: &str, attribute: &str, default: f64) -> Result<f64> {
    let path = device.join(format!("{prefix}_{attribute}"));
    match tokio::fs::read_to_string(&path).await {
        Ok(contents) => parse(&path, &contents),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(default),
        Err(err) => Err(unavailable(format!("{}: {err}", path.display()))),
    }
}
