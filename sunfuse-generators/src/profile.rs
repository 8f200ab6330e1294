// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Daily curves of the synthetic producers.
//!
//! Each `*_baseline` function is the noiseless curve; the sample functions add
//! uniform jitter on top.

use core::f64::consts::PI;
use rand::Rng;
use sunfuse_core::{EnvironmentalSample, PowerSample};

pub const TEMPERATURE_JITTER: f64 = 1.0;
pub const HUMIDITY_JITTER: f64 = 3.0;
pub const CONSUMPTION_JITTER: f64 = 20.0;
pub const PRODUCTION_JITTER: f64 = 30.0;

/// Coldest at 05:00, warmest at 17:00.
pub fn temperature_baseline(hour: u32) -> f64 {
    10.0 + 10.0 * (2.0 * PI * (f64::from(hour) - 5.0) / 24.0).sin()
}

/// Humid at night, dry in the afternoon.
pub fn humidity_baseline(hour: u32) -> f64 {
    70.0 - 20.0 * (2.0 * PI * (f64::from(hour) - 2.0) / 24.0).sin()
}

/// Household load with morning (08:00) and evening (18:00) peaks.
pub fn consumption_baseline(hour: u32) -> f64 {
    let hour = f64::from(hour);
    let peak = |at: f64| (-(hour - at).powi(2) / 10.0).exp();
    200.0 + 150.0 * (peak(8.0) + peak(18.0))
}

/// Solar output, peaking at noon and zero between 18:00 and 06:00.
pub fn production_baseline(hour: u32) -> f64 {
    (300.0 * (PI * (f64::from(hour) - 6.0) / 12.0).sin()).max(0.0)
}

pub fn environmental_sample<R>(hour: u32, rng: &mut R) -> EnvironmentalSample
where
    R: Rng + ?Sized,
{
    EnvironmentalSample {
        humidity: humidity_baseline(hour) + jitter(rng, HUMIDITY_JITTER),
        temperature: temperature_baseline(hour) + jitter(rng, TEMPERATURE_JITTER),
    }
}

pub fn power_sample<R>(hour: u32, rng: &mut R) -> PowerSample
where
    R: Rng + ?Sized,
{
    PowerSample {
        consumption_wattage: consumption_baseline(hour) + jitter(rng, CONSUMPTION_JITTER),
        production_wattage: production_baseline(hour) + jitter(rng, PRODUCTION_JITTER),
    }
}

fn jitter<R>(rng: &mut R, amplitude: f64) -> f64
where
    R: Rng + ?Sized,
{
    rng.random_range(-amplitude..=amplitude)
}
