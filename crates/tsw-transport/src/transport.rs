//! 传输层运行时
//!
//! 拥有一个独立的多线程 tokio 运行时，上面跑两个任务：
//!
//! - direct_control 监听（入站）
//! - sync_control 转发（出站）
//!
//! 游戏帧线程不在运行时上；两边只通过 `InboundBridge`（入队）和
//! `SyncControlSender`（`try_send`）交互。

use crate::config::TransportConfig;
use crate::direct::run_direct_listener;
use crate::error::TransportError;
use crate::sync::run_sync_forwarder;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tsw_bridge::InboundBridge;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// 运行中的传输层
///
/// 释放时自动取消所有任务。
///
/// # Example
///
/// ```no_run
/// use tsw_bridge::BridgeBuilder;
/// use tsw_transport::{Transport, TransportConfig};
///
/// let config = TransportConfig::default();
/// let (sender, rx) = tsw_transport::SyncControlSender::channel(config.outbound_capacity);
/// let (inbound, frame) = BridgeBuilder::new().sink(sender).build().unwrap();
/// let transport = Transport::start(&config, inbound, rx).unwrap();
///
/// // ... 帧循环驱动 frame ...
///
/// transport.shutdown();
/// ```
#[derive(Debug)]
pub struct Transport {
    runtime: Option<Runtime>,
    cancel: CancellationToken,
}

impl Transport {
    /// 启动传输层
    ///
    /// `outbound` 是 [`SyncControlSender::channel`](crate::SyncControlSender::channel) 返回的接收端。
    pub fn start(
        config: &TransportConfig,
        inbound: InboundBridge,
        outbound: tokio::sync::mpsc::Receiver<tsw_protocol::SyncControlMessage>,
    ) -> Result<Self, TransportError> {
        config.validate()?;

        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("tsw-transport")
            .enable_all()
            .build()?;
        let cancel = CancellationToken::new();

        runtime.spawn(run_direct_listener(
            config.direct_control_url.clone(),
            config.reconnect_interval(),
            inbound,
            cancel.child_token(),
        ));
        runtime.spawn(run_sync_forwarder(
            config.sync_control_url.clone(),
            config.reconnect_interval(),
            outbound,
            cancel.child_token(),
        ));

        info!(
            "Transport started (direct: {}, sync: {})",
            config.direct_control_url, config.sync_control_url
        );
        Ok(Self {
            runtime: Some(runtime),
            cancel,
        })
    }

    /// 任务是否仍在运行（尚未取消）
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// 取消所有任务并等待运行时退出
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
            info!("Transport stopped");
        }
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.stop();
    }
}
