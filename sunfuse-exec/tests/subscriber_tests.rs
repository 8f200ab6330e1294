// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use std::sync::Arc;
use sunfuse_adapters::MemoryBroker;
use sunfuse_core::{CombinedRecord, RecordId, ENVIRONMENTAL_TOPIC, POWER_TOPIC};
use sunfuse_error::SunfuseError;
use sunfuse_exec::{EmissionPolicy, FusionSubscriber, Sink, Transport};
use sunfuse_test_utils::fixtures::{
    environmental_payload, house, power_payload, MALFORMED_PAYLOAD,
};
use sunfuse_test_utils::helpers::{assert_pending_for, within_timeout};
use sunfuse_test_utils::{FixedClock, RecordingSink};
use tokio::task::yield_now;
use tokio_util::sync::CancellationToken;

async fn wait_until_subscribed(transport: &sunfuse_adapters::MemoryTransport) {
    within_timeout(async {
        while !(transport.is_subscribed(ENVIRONMENTAL_TOPIC) && transport.is_subscribed(POWER_TOPIC)) {
            yield_now().await;
        }
    })
    .await;
}

#[tokio::test]
async fn test_subscriber_fuses_messages_from_transport() -> anyhow::Result<()> {
    // Arrange
    let broker = MemoryBroker::default();
    let handler_transport = Arc::new(broker.connect());
    let producer = broker.connect();
    let sink = RecordingSink::new();
    let policy = Arc::new(EmissionPolicy::with_clock(
        &house(),
        sink.clone(),
        FixedClock::at(1_700_000_000),
    ));

    let cancel_token = CancellationToken::new();
    let mut subscriber = FusionSubscriber::new(cancel_token.clone());
    subscriber.start(Arc::clone(&handler_transport), Arc::clone(&policy));
    wait_until_subscribed(&handler_transport).await;

    // Act
    producer
        .publish(ENVIRONMENTAL_TOPIC, environmental_payload(55.0, 21.0))
        .await?;
    producer
        .publish(POWER_TOPIC, MALFORMED_PAYLOAD.to_vec())
        .await?;
    producer
        .publish(POWER_TOPIC, power_payload(300.0, 150.0))
        .await?;
    within_timeout(sink.wait_for(1)).await;

    // Assert
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].humidity, 55.0);
    assert_eq!(records[0].consumption_wattage, 300.0);
    assert_eq!(records[0].timestamp, 1_700_000_000);

    within_timeout(subscriber.stop()).await?;
    Ok(())
}

#[tokio::test]
async fn test_stop_disconnects_transport() -> anyhow::Result<()> {
    // Arrange
    let broker = MemoryBroker::default();
    let transport = Arc::new(broker.connect());
    let policy = Arc::new(EmissionPolicy::new(&house(), RecordingSink::new()));
    let mut subscriber = FusionSubscriber::new(CancellationToken::new());
    subscriber.start(Arc::clone(&transport), policy);
    wait_until_subscribed(&transport).await;

    // Act
    within_timeout(subscriber.stop()).await?;

    // Assert
    assert!(transport
        .publish(POWER_TOPIC, power_payload(1.0, 1.0))
        .await
        .is_err());
    Ok(())
}

#[tokio::test]
async fn test_run_returns_when_transport_closes() -> anyhow::Result<()> {
    // Arrange
    let broker = MemoryBroker::default();
    let transport = Arc::new(broker.connect());
    let policy = EmissionPolicy::new(&house(), RecordingSink::new());
    let cancel_token = CancellationToken::new();

    let run = FusionSubscriber::run(transport.as_ref(), &policy, cancel_token.clone());
    tokio::pin!(run);
    assert_pending_for(&mut run, 50).await;

    // Act
    transport.disconnect().await?;

    // Assert
    within_timeout(run).await?;
    Ok(())
}

struct PanickingSink;

#[async_trait]
impl Sink for PanickingSink {
    async fn post(&self, _path: &str, _record: &CombinedRecord) -> sunfuse_error::Result<RecordId> {
        panic!("sink exploded");
    }
}

#[tokio::test]
async fn test_join_reports_a_panicked_loop() -> anyhow::Result<()> {
    // Arrange
    let broker = MemoryBroker::default();
    let handler_transport = Arc::new(broker.connect());
    let producer = broker.connect();
    let policy = Arc::new(EmissionPolicy::new(&house(), PanickingSink));

    let mut subscriber = FusionSubscriber::new(CancellationToken::new());
    subscriber.start(Arc::clone(&handler_transport), policy);
    wait_until_subscribed(&handler_transport).await;

    // Act
    producer
        .publish(ENVIRONMENTAL_TOPIC, environmental_payload(55.0, 21.0))
        .await?;
    producer
        .publish(POWER_TOPIC, power_payload(300.0, 150.0))
        .await?;
    let result = within_timeout(subscriber.join()).await;

    // Assert
    assert!(
        matches!(result, Err(SunfuseError::TaskFailed { ref task, .. }) if task == "subscriber"),
        "unexpected result: {result:?}"
    );
    Ok(())
}
