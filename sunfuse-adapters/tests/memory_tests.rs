// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sunfuse_adapters::MemoryBroker;
use sunfuse_core::{ENVIRONMENTAL_TOPIC, POWER_TOPIC};
use sunfuse_exec::{Message, Transport};
use sunfuse_test_utils::fixtures::{environmental_payload, power_payload};
use sunfuse_test_utils::helpers::{assert_pending_for, within_timeout};

#[tokio::test]
async fn test_subscriber_receives_only_subscribed_topics() -> anyhow::Result<()> {
    // Arrange
    let broker = MemoryBroker::default();
    let subscriber = broker.connect();
    let publisher = broker.connect();
    subscriber.subscribe(POWER_TOPIC).await?;

    // Act
    publisher
        .publish(ENVIRONMENTAL_TOPIC, environmental_payload(55.0, 21.0))
        .await?;
    publisher
        .publish(POWER_TOPIC, power_payload(300.0, 150.0))
        .await?;

    // Assert
    let message = within_timeout(subscriber.next_message()).await;
    assert_eq!(
        message,
        Some(Message::new(POWER_TOPIC, power_payload(300.0, 150.0)))
    );
    Ok(())
}

#[tokio::test]
async fn test_messages_arrive_in_publish_order() -> anyhow::Result<()> {
    let broker = MemoryBroker::default();
    let subscriber = broker.connect();
    let publisher = broker.connect();
    subscriber.subscribe(ENVIRONMENTAL_TOPIC).await?;

    for humidity in [50.0, 51.0, 52.0] {
        publisher
            .publish(ENVIRONMENTAL_TOPIC, environmental_payload(humidity, 20.0))
            .await?;
    }

    for humidity in [50.0, 51.0, 52.0] {
        let message = within_timeout(subscriber.next_message()).await.unwrap();
        assert_eq!(message.payload, environmental_payload(humidity, 20.0));
    }
    Ok(())
}

#[tokio::test]
async fn test_publish_without_listeners_succeeds() -> anyhow::Result<()> {
    let broker = MemoryBroker::default();
    let publisher = broker.connect();
    drop(broker);

    publisher
        .publish(POWER_TOPIC, power_payload(1.0, 2.0))
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_disconnect_ends_delivery_and_rejects_publish() -> anyhow::Result<()> {
    // Arrange
    let broker = MemoryBroker::default();
    let transport = broker.connect();
    transport.subscribe(POWER_TOPIC).await?;
    assert_pending_for(transport.next_message(), 50).await;

    // Act
    transport.disconnect().await?;

    // Assert
    assert_eq!(within_timeout(transport.next_message()).await, None);
    let err = transport
        .publish(POWER_TOPIC, power_payload(1.0, 2.0))
        .await
        .unwrap_err();
    assert!(err.is_recoverable());
    Ok(())
}
