use crate::config::ConfigError;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors that end the process. Everything inside the stream loop is
/// recovered where it happens.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("Server error: {0}")]
    Serve(std::io::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}
