//! direct_control 监听任务
//!
//! 连接外部控制器的 direct_control 服务，把每一个文本帧交给 `InboundBridge`。
//! 连接关闭或出错后等待重连间隔，然后无限重连，直到收到取消信号。

use crate::error::TransportError;
use futures_util::StreamExt;
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use tsw_bridge::InboundBridge;

/// 运行 direct_control 监听循环（直到 `cancel` 被触发）
pub async fn run_direct_listener(
    url: String,
    reconnect_interval: Duration,
    inbound: InboundBridge,
    cancel: CancellationToken,
) {
    loop {
        match listen_once(&url, &inbound, &cancel).await {
            Ok(()) => info!("[direct_control] Connection to {} closed", url),
            Err(e) => warn!("[direct_control] Connection to {} failed: {}", url, e),
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(reconnect_interval) => {
                debug!("[direct_control] Reconnecting to {}", url);
            }
        }
    }
    info!("[direct_control] Listener stopped");
}

/// 单次连接：读取直到关闭、出错或取消
async fn listen_once(
    url: &str,
    inbound: &InboundBridge,
    cancel: &CancellationToken,
) -> Result<(), TransportError> {
    let (mut socket, _) = tokio::select! {
        _ = cancel.cancelled() => return Ok(()),
        connected = connect_async(url) => connected?,
    };
    info!("[direct_control] Connected to {}", url);

    loop {
        let message = tokio::select! {
            _ = cancel.cancelled() => {
                let _ = socket.close(None).await;
                return Ok(());
            }
            message = socket.next() => message,
        };

        match message {
            Some(Ok(Message::Text(text))) => inbound.on_message_received(&text),
            Some(Ok(Message::Close(_))) | None => return Ok(()),
            Some(Ok(other)) => trace!("[direct_control] Ignoring non-text frame: {:?}", other),
            Some(Err(e)) => return Err(e.into()),
        }
    }
}
