//! 传输层配置

use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认的 direct_control 服务地址
pub const DEFAULT_DIRECT_CONTROL_URL: &str = "ws://127.0.0.1:63241";
/// 默认的 sync_control 服务地址
pub const DEFAULT_SYNC_CONTROL_URL: &str = "ws://127.0.0.1:63242";

/// 传输层配置
///
/// # Example
///
/// ```
/// use tsw_transport::TransportConfig;
///
/// let config = TransportConfig::default();
/// assert_eq!(config.direct_control_url, "ws://127.0.0.1:63241");
/// assert_eq!(config.reconnect_interval().as_secs(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// 入站命令的 WebSocket 地址
    pub direct_control_url: String,
    /// 出站同步的 WebSocket 地址
    pub sync_control_url: String,
    /// 断线重连间隔（毫秒）
    pub reconnect_interval_ms: u64,
    /// 出站通道容量；满时新消息被丢弃
    pub outbound_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            direct_control_url: DEFAULT_DIRECT_CONTROL_URL.to_string(),
            sync_control_url: DEFAULT_SYNC_CONTROL_URL.to_string(),
            reconnect_interval_ms: 5_000,
            outbound_capacity: 50,
        }
    }
}

impl TransportConfig {
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    pub fn validate(&self) -> Result<(), TransportError> {
        for (field, url) in [
            ("direct_control_url", &self.direct_control_url),
            ("sync_control_url", &self.sync_control_url),
        ] {
            if !(url.starts_with("ws://") || url.starts_with("wss://")) {
                return Err(TransportError::InvalidConfig(format!(
                    "{field} must be a ws:// or wss:// URL, got {url:?}"
                )));
            }
        }
        if self.outbound_capacity == 0 {
            return Err(TransportError::InvalidConfig(
                "outbound_capacity must be at least 1".to_string(),
            ));
        }
        if self.reconnect_interval_ms == 0 {
            return Err(TransportError::InvalidConfig(
                "reconnect_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
