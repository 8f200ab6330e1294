// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Publishes humidity and temperature, read from the Sense HAT when present.

use clap::Parser;
use sunfuse::cli::ProducerArgs;
use sunfuse::logging::init_tracing;
use sunfuse::runner::run_producer;
use sunfuse::signals::cancel_on_shutdown_signal;
use sunfuse_core::Channel;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let settings = ProducerArgs::parse().settings()?;

    info!(broker = %settings.broker.address(), "using MQTT broker");

    let shutdown = CancellationToken::new();
    cancel_on_shutdown_signal(shutdown.clone())?;
    run_producer(Channel::Environmental, &settings, shutdown).await?;

    info!("exiting");
    Ok(())
}
