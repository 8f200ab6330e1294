// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Process shutdown on SIGINT (Ctrl+C) and SIGTERM.

use std::io;
use tokio::select;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// The signal that asked the process to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

struct SignalListener {
    #[cfg(unix)]
    terminate: Signal,
}

impl SignalListener {
    fn install() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(unix)]
    async fn next(&mut self) -> io::Result<ShutdownSignal> {
        select! {
            result = tokio::signal::ctrl_c() => result.map(|()| ShutdownSignal::Interrupt),
            _ = self.terminate.recv() => Ok(ShutdownSignal::Terminate),
        }
    }

    #[cfg(not(unix))]
    async fn next(&mut self) -> io::Result<ShutdownSignal> {
        tokio::signal::ctrl_c()
            .await
            .map(|()| ShutdownSignal::Interrupt)
    }
}

/// Installs the handlers, then cancels `shutdown` on the first shutdown signal.
///
/// The returned task yields the signal received, or `None` when `shutdown` was
/// cancelled by someone else first.
///
/// # Errors
/// Fails if the SIGTERM handler cannot be installed.
pub fn cancel_on_shutdown_signal(
    shutdown: CancellationToken,
) -> io::Result<JoinHandle<Option<ShutdownSignal>>> {
    let mut listener = SignalListener::install()?;

    Ok(tokio::spawn(async move {
        let received = select! {
            () = shutdown.cancelled() => return None,
            received = listener.next() => received,
        };

        let received = match received {
            Ok(received) => {
                info!(signal = ?received, "shutting down");
                Some(received)
            }
            Err(err) => {
                error!(error = %err, "cannot listen for shutdown signals, shutting down");
                None
            }
        };
        shutdown.cancel();
        received
    }))
}
