//! TSW 控制器桥接层的 WebSocket 传输
//!
//! - 入站：连接 `direct_control_url`，每个文本帧交给 `InboundBridge::on_message_received`
//! - 出站：`SyncControlSender` 实现 `OutboundSink`，消息以 `sync_control,` 前缀发往 `sync_control_url`
//!
//! 两个连接都在断开后按 `reconnect_interval_ms` 无限重连。

mod config;
pub mod direct;
mod error;
pub mod sync;
mod transport;

pub use config::{DEFAULT_DIRECT_CONTROL_URL, DEFAULT_SYNC_CONTROL_URL, TransportConfig};
pub use error::TransportError;
pub use sync::SyncControlSender;
pub use transport::Transport;
