//! OS signals that stop the HTTP server.

use std::fmt;

use anyhow::{Context, Result};
use tokio::signal;

/// The signal that ended the serve loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    #[cfg(unix)]
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "SIGINT",
            #[cfg(unix)]
            Self::Terminate => "SIGTERM",
        })
    }
}

/// Resolve with whichever of SIGINT or SIGTERM arrives first.
///
/// # Errors
/// Returns an error if a handler cannot be installed.
pub async fn next_shutdown_signal() -> Result<ShutdownSignal> {
    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("failed to listen for SIGINT")?;
            Ok(ShutdownSignal::Interrupt)
        }
        result = terminate() => result,
    }
}

#[cfg(unix)]
async fn terminate() -> Result<ShutdownSignal> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
        .context("failed to install SIGTERM handler")?;
    sigterm.recv().await;
    Ok(ShutdownSignal::Terminate)
}

#[cfg(not(unix))]
async fn terminate() -> Result<ShutdownSignal> {
    std::future::pending().await
}
