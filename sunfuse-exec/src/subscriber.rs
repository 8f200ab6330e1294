// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Subscriber loop feeding transport messages into the emission policy.

use crate::emission::EmissionPolicy;
use crate::sink::Sink;
use crate::transport::Transport;
use std::sync::Arc;
use sunfuse_core::{Channel, Clock};
use sunfuse_error::{Result, SunfuseError};
use tokio::select;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Background task consuming both channel topics, one message at a time.
pub struct FusionSubscriber {
    cancel_token: CancellationToken,
    task_handle: Option<JoinHandle<Result<()>>>,
}

impl FusionSubscriber {
    pub fn new(cancel_token: CancellationToken) -> Self {
        Self {
            cancel_token,
            task_handle: None,
        }
    }

    /// Spawns the subscriber loop.
    pub fn start<T, S, C>(&mut self, transport: Arc<T>, policy: Arc<EmissionPolicy<S, C>>)
    where
        T: Transport + ?Sized + 'static,
        S: Sink + 'static,
        C: Clock + 'static,
    {
        let cancel_token = self.cancel_token.clone();
        let handle = tokio::spawn(async move {
            Self::run(transport.as_ref(), policy.as_ref(), cancel_token).await
        });
        self.task_handle = Some(handle);
    }

    /// Cancels the loop and waits for it to release the transport.
    pub async fn stop(&mut self) -> Result<()> {
        self.cancel_token.cancel();
        self.join().await
    }

    /// Waits for the loop to end on its own (transport closed or token cancelled
    /// elsewhere).
    ///
    /// # Errors
    /// The loop's own error, or [`SunfuseError::TaskFailed`] if it panicked.
    pub async fn join(&mut self) -> Result<()> {
        match self.task_handle.take() {
            Some(handle) => match handle.await {
                Ok(result) => result,
                Err(err) => {
                    error!(error = %err, "subscriber task failed");
                    Err(SunfuseError::task_failed("subscriber", err))
                }
            },
            None => Ok(()),
        }
    }

    /// Subscribes to both channel topics and processes messages serially until
    /// `cancel_token` fires or the transport closes, then disconnects.
    ///
    /// # Errors
    /// Fails if a subscription request cannot be issued or the disconnect fails.
    pub async fn run<T, S, C>(
        transport: &T,
        policy: &EmissionPolicy<S, C>,
        cancel_token: CancellationToken,
    ) -> Result<()>
    where
        T: Transport + ?Sized,
        S: Sink,
        C: Clock,
    {
        for channel in Channel::ALL {
            transport.subscribe(channel.topic()).await?;
            info!(%channel, topic = channel.topic(), "subscribed");
        }

        loop {
            select! {
                biased;
                _ = cancel_token.cancelled() => {
                    info!("subscriber cancelled");
                    break;
                }
                message = transport.next_message() => match message {
                    Some(message) => {
                        policy.on_topic_message(&message.topic, &message.payload).await;
                    }
                    None => {
                        warn!("transport closed, subscriber stopping");
                        break;
                    }
                },
            }
        }

        transport.disconnect().await
    }
}
