// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::source::SampleSource;
use std::sync::Arc;
use std::time::Duration;
use sunfuse_core::ChannelRecord;
use sunfuse_error::{Result, ResultExt};
use sunfuse_exec::Transport;
use tokio::select;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Periodic publisher of one source's samples.
pub struct Generator {
    cancel_token: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl Generator {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new(cancel_token: CancellationToken) -> Self {
        Self {
            cancel_token,
            task_handle: None,
        }
    }

    pub fn start<T>(&mut self, transport: Arc<T>, mut source: Box<dyn SampleSource>, period: Duration)
    where
        T: Transport + ?Sized + 'static,
    {
        let cancel_token = self.cancel_token.clone();
        let handle = tokio::spawn(async move {
            Self::run(transport.as_ref(), source.as_mut(), period, cancel_token).await;
        });
        self.task_handle = Some(handle);
    }

    pub async fn stop(&mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.task_handle.take() {
            if let Err(err) = handle.await {
                error!(error = %err, "generator task panicked");
            }
        }
    }

    /// Publishes one sample every `period` until `cancel_token` fires.
    ///
    /// A failed tick is logged and the next tick proceeds.
    pub async fn run<T>(
        transport: &T,
        source: &mut dyn SampleSource,
        period: Duration,
        cancel_token: CancellationToken,
    ) where
        T: Transport + ?Sized,
    {
        let channel = source.channel();
        info!(%channel, source = source.kind(), topic = channel.topic(), ?period, "generator started");

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            select! {
                biased;
                _ = cancel_token.cancelled() => break,
                _ = ticker.tick() => {
                    select! {
                        biased;
                        _ = cancel_token.cancelled() => break,
                        result = Self::tick(transport, source) => {
                            if let Err(err) = result {
                                warn!(%channel, error = %err, "tick failed");
                            }
                        }
                    }
                }
            }
        }

        info!(%channel, "generator stopped");
    }

    /// Samples once and publishes the record, waiting for the acknowledgment.
    ///
    /// # Errors
    /// Propagates sampling and publish failures.
    pub async fn tick<T>(transport: &T, source: &mut dyn SampleSource) -> Result<ChannelRecord>
    where
        T: Transport + ?Sized,
    {
        let record = source.sample().await?;
        let topic = record.channel().topic();
        let payload = record.to_payload().or_publish(topic)?;
        transport.publish(topic, payload).await?;
        info!(channel = %record.channel(), ?record, "published");
        Ok(record)
    }
}
