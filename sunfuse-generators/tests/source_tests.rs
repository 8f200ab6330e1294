// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fs;
use std::path::Path;
use std::sync::Arc;
use sunfuse_core::{Channel, ChannelRecord};
use sunfuse_error::SunfuseError;
use sunfuse_generators::{
    select_environmental_source, HardwareSource, SampleSource, SimulatedHour, SimulatedSource,
};
use sunfuse_test_utils::FixedClock;
use tempfile::TempDir;

fn write_device(root: &Path, dir: &str, name: &str, attributes: &[(&str, &str)]) -> anyhow::Result<()> {
    let device = root.join(dir);
    fs::create_dir_all(&device)?;
    fs::write(device.join("name"), format!("{name}\n"))?;
    for (file, value) in attributes {
        fs::write(device.join(file), format!("{value}\n"))?;
    }
    Ok(())
}

fn hts221_attributes() -> Vec<(&'static str, &'static str)> {
    vec![
        ("in_temp_raw", "100"),
        ("in_temp_offset", "2000"),
        ("in_temp_scale", "10"),
        ("in_humidityrelative_raw", "-500"),
        ("in_humidityrelative_offset", "6000"),
        ("in_humidityrelative_scale", "10"),
    ]
}

#[tokio::test]
async fn test_simulated_power_at_noon() -> anyhow::Result<()> {
    // Arrange
    let hours = SimulatedHour::default();
    let clock = FixedClock::at(120);
    let mut source = SimulatedSource::power(hours)
        .with_clock(Arc::new(clock))
        .with_seed(1);

    // Act
    let record = source.sample().await?;

    // Assert
    assert_eq!(source.current_hour(), 12);
    let ChannelRecord::Power(sample) = record else {
        panic!("expected a power record, got {record:?}");
    };
    assert!((270.0..=330.0).contains(&sample.production_wattage));
    assert!((214.0..=255.0).contains(&sample.consumption_wattage));
    Ok(())
}

#[tokio::test]
async fn test_simulated_source_follows_the_clock() -> anyhow::Result<()> {
    // Arrange
    let clock = FixedClock::at(0);
    let mut source = SimulatedSource::environmental(SimulatedHour::new(3600)?)
        .with_clock(Arc::new(clock.clone()))
        .with_seed(3);

    // Act
    let midnight = source.current_hour();
    clock.advance(17 * 3600);
    let evening = source.current_hour();
    let record = source.sample().await?;

    // Assert
    assert_eq!(midnight, 0);
    assert_eq!(evening, 17);
    assert_eq!(record.channel(), Channel::Environmental);
    assert_eq!(source.kind(), "simulated");
    Ok(())
}

#[tokio::test]
async fn test_hardware_source_reads_scaled_values() -> anyhow::Result<()> {
    // Arrange
    let root = TempDir::new()?;
    write_device(root.path(), "iio:device0", "lps25h", &[("in_pressure_raw", "1")])?;
    write_device(root.path(), "iio:device1", "hts221", &hts221_attributes())?;

    // Act
    let mut source = HardwareSource::detect(root.path())?;
    let record = source.sample().await?;

    // Assert
    assert!(source.device().ends_with("iio:device1"));
    assert_eq!(source.kind(), "hts221");
    let ChannelRecord::Environmental(sample) = record else {
        panic!("expected an environmental record, got {record:?}");
    };
    assert!((sample.temperature - 21.0).abs() < 1e-9);
    assert!((sample.humidity - 55.0).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_hardware_source_defaults_missing_offset_and_scale() -> anyhow::Result<()> {
    // Arrange
    let root = TempDir::new()?;
    write_device(
        root.path(),
        "iio:device0",
        "hts221",
        &[("in_temp_raw", "21000"), ("in_humidityrelative_raw", "55000")],
    )?;

    // Act
    let mut source = HardwareSource::detect(root.path())?;
    let record = source.sample().await?;

    // Assert
    let ChannelRecord::Environmental(sample) = record else {
        panic!("expected an environmental record, got {record:?}");
    };
    assert!((sample.temperature - 21.0).abs() < 1e-9);
    assert!((sample.humidity - 55.0).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_hardware_source_fails_when_sensor_disappears() -> anyhow::Result<()> {
    // Arrange
    let root = TempDir::new()?;
    write_device(root.path(), "iio:device0", "hts221", &hts221_attributes())?;
    let mut source = HardwareSource::detect(root.path())?;
    fs::remove_file(root.path().join("iio:device0/in_temp_raw"))?;

    // Act
    let err = source.sample().await.unwrap_err();

    // Assert
    assert!(matches!(err, SunfuseError::HardwareUnavailable { .. }));
    assert!(err.is_recoverable());
    Ok(())
}

#[test]
fn test_detect_without_device_is_unavailable() -> anyhow::Result<()> {
    // Arrange
    let root = TempDir::new()?;
    write_device(root.path(), "iio:device0", "lps25h", &[])?;

    // Act
    let missing_device = HardwareSource::detect(root.path()).unwrap_err();
    let missing_root = HardwareSource::detect(root.path().join("absent")).unwrap_err();

    // Assert
    assert!(matches!(missing_device, SunfuseError::HardwareUnavailable { .. }));
    assert!(matches!(missing_root, SunfuseError::HardwareUnavailable { .. }));
    Ok(())
}

#[test]
fn test_detect_rejects_unreadable_channels() -> anyhow::Result<()> {
    // Arrange
    let root = TempDir::new()?;
    write_device(root.path(), "iio:device0", "hts221", &[("in_temp_raw", "not a number")])?;

    // Act
    let result = HardwareSource::detect(root.path());

    // Assert
    assert!(matches!(result, Err(SunfuseError::HardwareUnavailable { .. })));
    Ok(())
}

#[test]
fn test_selection_prefers_hardware() -> anyhow::Result<()> {
    // Arrange
    let root = TempDir::new()?;
    write_device(root.path(), "iio:device0", "hts221", &hts221_attributes())?;

    // Act
    let source = select_environmental_source(root.path(), SimulatedHour::default());

    // Assert
    assert_eq!(source.kind(), "hts221");
    assert_eq!(source.channel(), Channel::Environmental);
    Ok(())
}

#[test]
fn test_selection_falls_back_to_simulation() -> anyhow::Result<()> {
    // Arrange
    let root = TempDir::new()?;

    // Act
    let source = select_environmental_source(root.path(), SimulatedHour::default());

    // Assert
    assert_eq!(source.kind(), "simulated");
    assert_eq!(source.channel(), Channel::Environmental);
    Ok(())
}
