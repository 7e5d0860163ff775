//! Runs the status API next to the stream loop and stops both together.

use crate::error::AppError;
use crate::orchestration::StreamLoop;
use axum::Router;
use std::future::{Future, IntoFuture};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

/// Serve `router` on `listener` and drive `stream` until `shutdown_signal`
/// resolves.
///
/// The stream loop only returns when told to, so if it ends first (a panic
/// included) the API is shut down too and the failure is returned. The
/// API must never report healthy without a loop behind it.
pub async fn run_until_shutdown<F>(
    listener: TcpListener,
    router: Router,
    stream: StreamLoop,
    shutdown_signal: F,
) -> Result<(), AppError>
where
    F: Future<Output = ()>,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut stream_handle = tokio::spawn(stream.run(shutdown_rx.clone()));

    let mut api_shutdown = shutdown_rx;
    let server = tokio::spawn(
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = api_shutdown.changed().await;
            })
            .into_future(),
    );

    let stream_exit = tokio::select! {
        _ = shutdown_signal => {
            info!("Shutdown requested");
            None
        }
        finished = &mut stream_handle => Some(finished),
    };
    let _ = shutdown_tx.send(true);

    server
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::Serve)?;

    match stream_exit {
        None => stream_handle
            .await
            .map_err(|e| AppError::Internal(e.to_string())),
        Some(Ok(())) => {
            error!("Stream loop stopped on its own");
            Err(AppError::Internal("stream loop stopped unexpectedly".to_string()))
        }
        Some(Err(e)) => {
            error!("Stream loop crashed: {}", e);
            Err(AppError::Internal(format!("stream loop failed: {}", e)))
        }
    }
}
