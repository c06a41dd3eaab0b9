//! Plain HTTP transport for running outside Lambda.

use std::future::Future;
use std::net::{SocketAddr, TcpListener};

use axum::Router;
use tokio::signal;

use crate::Error;

/// Serves `app` on `addr` until SIGINT or SIGTERM, then drains in-flight
/// requests.
pub async fn serve(app: Router, addr: SocketAddr) -> Result<(), Error> {
    let listener = TcpListener::bind(addr)?;
    serve_on(listener, app, shutdown_signal()).await
}

/// Serves `app` on an already bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), Error>
where
    F: Future<Output = ()>,
{
    let server = axum::Server::from_tcp(listener)?.serve(app.into_make_service());
    tracing::info!(addr = %server.local_addr(), "listening");

    server.with_graceful_shutdown(shutdown).await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
