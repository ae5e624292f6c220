//! 传输层错误类型

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid transport config: {0}")]
    InvalidConfig(String),

    #[error("Failed to start transport runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
}
