// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Publishes simulated household consumption and solar production.

use clap::Parser;
use sunfuse::cli::ProducerArgs;
use sunfuse::config::Settings;
use sunfuse::logging::init_tracing;
use sunfuse::realtime::promote_current_thread;
use sunfuse::runner::run_producer;
use sunfuse::signals::cancel_on_shutdown_signal;
use sunfuse_core::Channel;
use tokio_util::sync::CancellationToken;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let settings = ProducerArgs::parse().settings()?;

    // Before the runtime exists, so its worker threads inherit the policy.
    if settings.generator.realtime {
        promote_current_thread();
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(settings))
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    info!(broker = %settings.broker.address(), "using MQTT broker");

    let shutdown = CancellationToken::new();
    cancel_on_shutdown_signal(shutdown.clone())?;
    run_producer(Channel::Power, &settings, shutdown).await?;

    info!("exiting");
    Ok(())
}
