// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sunfuse_error::{Result, SunfuseError};

/// Accelerated day: one simulated hour lasts `seconds_per_hour` real seconds.
///
/// With 3600 seconds per hour the simulated hour is the UTC hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedHour {
    seconds_per_hour: u64,
}

impl SimulatedHour {
    pub const DEFAULT_SECONDS_PER_HOUR: u64 = 10;

    /// # Errors
    /// Returns [`SunfuseError::Config`] when `seconds_per_hour` is zero.
    pub fn new(seconds_per_hour: u64) -> Result<Self> {
        if seconds_per_hour == 0 {
            return Err(SunfuseError::config("seconds per hour must be positive"));
        }
        Ok(Self { seconds_per_hour })
    }

    pub const fn seconds_per_hour(&self) -> u64 {
        self.seconds_per_hour
    }

    /// Simulated hour of day (0..24) at `unix_seconds`.
    pub const fn hour_at(&self, unix_seconds: u64) -> u32 {
        ((unix_seconds / self.seconds_per_hour) % 24) as u32
    }
}

impl Default for SimulatedHour {
    fn default() -> Self {
        Self {
            seconds_per_hour: Self::DEFAULT_SECONDS_PER_HOUR,
        }
    }
}
