// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! In-process broker with exact-match topic subscriptions.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use sunfuse_error::{Result, SunfuseError};
use sunfuse_exec::{Message, Transport};
use tokio::select;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Fan-out hub shared by every [`MemoryTransport`] connected to it.
#[derive(Debug, Clone)]
pub struct MemoryBroker {
    sender: broadcast::Sender<Message>,
}

impl MemoryBroker {
    /// `capacity` bounds how far a slow subscriber may lag before it starts
    /// losing messages.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Opens a new client connection. It only sees messages published after
    /// this call.
    pub fn connect(&self) -> MemoryTransport {
        MemoryTransport {
            sender: self.sender.clone(),
            receiver: tokio::sync::Mutex::new(self.sender.subscribe()),
            topics: Mutex::new(HashSet::new()),
            closed: CancellationToken::new(),
        }
    }
}

impl Default for MemoryBroker {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// One client connection to a [`MemoryBroker`].
#[derive(Debug)]
pub struct MemoryTransport {
    sender: broadcast::Sender<Message>,
    receiver: tokio::sync::Mutex<broadcast::Receiver<Message>>,
    topics: Mutex<HashSet<String>>,
    closed: CancellationToken,
}

impl MemoryTransport {
    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.topics.lock().contains(topic)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn subscribe(&self, topic: &str) -> Result<()> {
        if self.closed.is_cancelled() {
            return Err(SunfuseError::transport_connect("memory transport disconnected"));
        }
        self.topics.lock().insert(topic.to_string());
        Ok(())
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        if self.closed.is_cancelled() {
            return Err(SunfuseError::publish(topic, "transport disconnected"));
        }
        // Publishing with nobody listening is not an error, same as on a real broker.
        let _ = self.sender.send(Message::new(topic, payload));
        Ok(())
    }

    async fn next_message(&self) -> Option<Message> {
        let mut receiver = self.receiver.lock().await;
        loop {
            let received = select! {
                _ = self.closed.cancelled() => return None,
                received = receiver.recv() => received,
            };

            match received {
                Ok(message) if self.is_subscribed(&message.topic) => return Some(message),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "memory transport lagged, messages lost");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    async fn disconnect(&self) -> Result<()> {
        self.closed.cancel();
        Ok(())
    }
}
