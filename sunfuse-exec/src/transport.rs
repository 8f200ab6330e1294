// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use std::sync::Arc;
use sunfuse_error::Result;

/// A payload delivered on a subscribed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Publish/subscribe transport.
///
/// Implementations connect on construction and keep reconnecting on their own;
/// callers only see the operations below. All methods take `&self` so one
/// connection can be shared by concurrent publishers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Subscribes to `topic`. The subscription survives reconnects.
    async fn subscribe(&self, topic: &str) -> Result<()>;

    /// Publishes `payload` on `topic`, resolving once the broker acknowledged it.
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()>;

    /// Next message on any subscribed topic, in arrival order.
    ///
    /// Returns `None` once the transport is closed.
    async fn next_message(&self) -> Option<Message>;

    /// Closes the connection.
    async fn disconnect(&self) -> Result<()>;
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn subscribe(&self, topic: &str) -> Result<()> {
        (**self).subscribe(topic).await
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        (**self).publish(topic, payload).await
    }

    async fn next_message(&self) -> Option<Message> {
        (**self).next_message().await
    }

    async fn disconnect(&self) -> Result<()> {
        (**self).disconnect().await
    }
}
