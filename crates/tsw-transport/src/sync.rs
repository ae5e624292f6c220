//! sync_control 出站任务
//!
//! 帧线程通过 `SyncControlSender::try_send` 非阻塞地投递消息；
//! 本任务从通道读取并以 `sync_control,<identifier>,<value>` 发送。
//! 发送失败或连接关闭时重连，发送失败的那一条消息不重发。

use crate::error::TransportError;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use tsw_bridge::{OutboundError, OutboundSink};
use tsw_protocol::SyncControlMessage;

/// 出站通道的发送端（交给 `BridgeBuilder::sink`）
#[derive(Debug, Clone)]
pub struct SyncControlSender {
    tx: mpsc::Sender<SyncControlMessage>,
}

impl SyncControlSender {
    pub fn new(tx: mpsc::Sender<SyncControlMessage>) -> Self {
        Self { tx }
    }

    /// 创建容量为 `capacity` 的出站通道
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SyncControlMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

impl OutboundSink for SyncControlSender {
    fn send_message(&self, message: SyncControlMessage) -> Result<(), OutboundError> {
        self.tx.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => OutboundError::Full,
            TrySendError::Closed(_) => OutboundError::Disconnected,
        })
    }
}

/// 单次连接的结束原因
enum Disconnect {
    /// 连接断开，需要重连
    Lost,
    /// 取消或所有发送端已释放，任务结束
    Finished,
}

/// 运行 sync_control 转发循环（直到取消或所有发送端释放）
pub async fn run_sync_forwarder(
    url: String,
    reconnect_interval: Duration,
    mut rx: mpsc::Receiver<SyncControlMessage>,
    cancel: CancellationToken,
) {
    loop {
        match forward_once(&url, &mut rx, &cancel).await {
            Ok(Disconnect::Finished) => break,
            Ok(Disconnect::Lost) => info!("[sync_control] Connection to {} closed", url),
            Err(e) => warn!("[sync_control] Connection to {} failed: {}", url, e),
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(reconnect_interval) => {
                debug!("[sync_control] Reconnecting to {}", url);
            }
        }
    }
    info!("[sync_control] Forwarder stopped");
}

async fn forward_once(
    url: &str,
    rx: &mut mpsc::Receiver<SyncControlMessage>,
    cancel: &CancellationToken,
) -> Result<Disconnect, TransportError> {
    let (mut socket, _) = tokio::select! {
        _ = cancel.cancelled() => return Ok(Disconnect::Finished),
        connected = connect_async(url) => connected?,
    };
    info!("[sync_control] Connected to {}", url);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = socket.close(None).await;
                return Ok(Disconnect::Finished);
            }
            outgoing = rx.recv() => {
                let Some(message) = outgoing else {
                    let _ = socket.close(None).await;
                    return Ok(Disconnect::Finished);
                };
                let text = message.framed();
                trace!("[sync_control] Sending {}", text);
                socket.send(Message::Text(text)).await?;
            }
            incoming = socket.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => return Ok(Disconnect::Lost),
                Some(Ok(_)) => {},
                Some(Err(e)) => return Err(e.into()),
            },
        }
    }
}
