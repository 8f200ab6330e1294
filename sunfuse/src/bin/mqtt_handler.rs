// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Subscribes to the solar panel and wattage meter topics and stores each
//! fused record in Firebase under `houses/{house_id}`.

use clap::Parser;
use sunfuse::cli::HandlerArgs;
use sunfuse::logging::init_tracing;
use sunfuse::runner::run_handler;
use sunfuse::signals::cancel_on_shutdown_signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = HandlerArgs::parse();
    let settings = args.settings()?;

    info!(broker = %settings.broker.address(), "using MQTT broker");

    let shutdown = CancellationToken::new();
    cancel_on_shutdown_signal(shutdown.clone())?;
    run_handler(&args.house_id, &settings, shutdown).await?;

    info!("exiting");
    Ok(())
}
