//! Graceful shutdown on SIGINT and SIGTERM.

use std::{io, time::Duration};

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install {signal} handler: {source}")]
    Install {
        signal: &'static str,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy)]
enum Received {
    Interrupt,
    Terminate,
}

async fn interrupt() -> Result<Received, ShutdownSignalError> {
    signal::ctrl_c()
        .await
        .map_err(|source| ShutdownSignalError::Install {
            signal: "SIGINT",
            source,
        })?;

    Ok(Received::Interrupt)
}

#[cfg(unix)]
async fn terminate() -> Result<Received, ShutdownSignalError> {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(|source| ShutdownSignalError::Install {
            signal: "SIGTERM",
            source,
        })?
        .recv()
        .await;

    Ok(Received::Terminate)
}

#[cfg(not(unix))]
async fn terminate() -> Result<Received, ShutdownSignalError> {
    std::future::pending().await
}

/// Wait for a stop signal, then stop accepting connections and give
/// in-flight requests `grace` to finish.
pub(crate) async fn listen(handle: ServerHandle, grace: Duration) -> Result<(), ShutdownSignalError> {
    let received = tokio::select! {
        received = interrupt() => received?,
        received = terminate() => received?,
    };

    info!(signal = ?received, grace_secs = grace.as_secs(), "shutting down");

    handle.stop_graceful(grace);

    Ok(())
}
