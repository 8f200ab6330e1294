// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Wiring of transports, sources, policy and sink for each binary.

use crate::config::{Role, Settings};
use std::sync::Arc;
use std::time::Duration;
use sunfuse_adapters::{FirebaseSink, MqttTransport};
use sunfuse_core::{Channel, Clock, HouseId};
use sunfuse_error::Result;
use sunfuse_exec::{EmissionPolicy, FusionSubscriber, Sink, Transport};
use sunfuse_generators::{select_environmental_source, Generator, SampleSource, SimulatedSource};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs the handler against the configured broker and Firebase database.
///
/// # Errors
/// Fails on an invalid database URL or a failed subscription.
pub async fn run_handler(house: &HouseId, settings: &Settings, shutdown: CancellationToken) -> Result<()> {
    let sink = FirebaseSink::new(settings.sink.firebase_url.as_str())?;
    let transport = Arc::new(MqttTransport::connect(&settings.transport_for(Role::Handler)));
    let policy = Arc::new(EmissionPolicy::new(house, sink));
    info!(%house, path = policy.storage_path(), "handler started");
    serve_handler(transport, policy, shutdown).await
}

/// Feeds `transport` into `policy` until `shutdown` fires or the transport
/// closes.
///
/// # Errors
/// Propagates subscription and disconnect failures.
pub async fn serve_handler<T, S, C>(
    transport: Arc<T>,
    policy: Arc<EmissionPolicy<S, C>>,
    shutdown: CancellationToken,
) -> Result<()>
where
    T: Transport + ?Sized + 'static,
    S: Sink + 'static,
    C: Clock + 'static,
{
    let mut subscriber = FusionSubscriber::new(shutdown);
    subscriber.start(transport, policy);
    subscriber.join().await
}

/// Runs the producer of `channel` against the configured broker.
///
/// # Errors
/// Fails when the settings hold an invalid simulated hour length.
pub async fn run_producer(channel: Channel, settings: &Settings, shutdown: CancellationToken) -> Result<()> {
    let source = source_for(channel, settings)?;
    let transport = Arc::new(MqttTransport::connect(&settings.transport_for(Role::Producer(channel))));
    serve_producer(transport, source, settings.interval(), shutdown).await
}

/// Environmental producers look for the hardware sensor first.
///
/// # Errors
/// [`sunfuse_error::SunfuseError::Config`] on an invalid simulated hour length.
pub fn source_for(channel: Channel, settings: &Settings) -> Result<Box<dyn SampleSource>> {
    let hours = settings.hours()?;
    let source: Box<dyn SampleSource> = match channel {
        Channel::Environmental => select_environmental_source(&settings.hardware.iio_root, hours),
        Channel::Power => Box::new(SimulatedSource::power(hours)),
    };
    Ok(source)
}

/// Publishes `source` every `period` until `shutdown` fires, then disconnects.
///
/// # Errors
/// Propagates the disconnect failure.
pub async fn serve_producer<T>(
    transport: Arc<T>,
    source: Box<dyn SampleSource>,
    period: Duration,
    shutdown: CancellationToken,
) -> Result<()>
where
    T: Transport + ?Sized + 'static,
{
    let mut generator = Generator::new(shutdown.clone());
    generator.start(Arc::clone(&transport), source, period);
    shutdown.cancelled().await;
    generator.stop().await;
    transport.disconnect().await
}
