// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sunfuse_core::{ChannelRecord, EnvironmentalSample, HouseId, PowerSample};

/// Payload that is not even JSON.
pub const MALFORMED_PAYLOAD: &[u8] = b"{bad json";

pub fn environmental(humidity: f64, temperature: f64) -> EnvironmentalSample {
    EnvironmentalSample {
        humidity,
        temperature,
    }
}

pub fn power(consumption_wattage: f64, production_wattage: f64) -> PowerSample {
    PowerSample {
        consumption_wattage,
        production_wattage,
    }
}

/// Humid spring morning.
pub fn environmental_morning() -> EnvironmentalSample {
    environmental(55.0, 21.0)
}

/// Sunny noon on a quiet day.
pub fn power_noon() -> PowerSample {
    power(300.0, 150.0)
}

pub fn environmental_payload(humidity: f64, temperature: f64) -> Vec<u8> {
    payload(environmental(humidity, temperature))
}

pub fn power_payload(consumption_wattage: f64, production_wattage: f64) -> Vec<u8> {
    payload(power(consumption_wattage, production_wattage))
}

pub fn payload(record: impl Into<ChannelRecord>) -> Vec<u8> {
    record
        .into()
        .to_payload()
        .expect("fixture samples are finite")
}

pub fn house() -> HouseId {
    HouseId::new("HOUSE_123").expect("valid house id")
}
