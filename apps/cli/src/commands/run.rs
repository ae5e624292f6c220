//! 运行桥接（dry-run 模式）
//!
//! 连接外部控制器的 WebSocket 服务，用内存中的模拟驾驶室代替游戏，
//! 按固定频率驱动帧循环。

use crate::app_config::AppConfig;
use crate::cab::{DEFAULT_CAB, build_cab, parse_cab};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tsw_bridge::{BridgeBuilder, BridgeMetrics, FrameBridge, MetricsSnapshot, TickOutcome};
use tsw_transport::Transport;

/// 模拟驾驶员所在的驾驶台
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeatArg {
    Front,
    Back,
    /// 未挂接座椅（使用配置的默认朝向）
    None,
}

impl SeatArg {
    fn reversed(self) -> Option<bool> {
        match self {
            SeatArg::Front => Some(false),
            SeatArg::Back => Some(true),
            SeatArg::None => None,
        }
    }
}

/// 运行命令参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 配置文件路径（TOML）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 覆盖 direct_control 地址
    #[arg(long)]
    pub direct_url: Option<String>,

    /// 覆盖 sync_control 地址
    #[arg(long)]
    pub sync_url: Option<String>,

    /// 帧频率（Hz）
    #[arg(long, default_value_t = 30)]
    pub tick_hz: u32,

    /// 模拟驾驶室控件，逗号分隔的 `name[:momentary]`
    #[arg(long, default_value = DEFAULT_CAB)]
    pub cab: String,

    /// 模拟驾驶员所在的驾驶台
    #[arg(long, value_enum, default_value_t = SeatArg::Front)]
    pub side: SeatArg,

    /// 指标输出间隔（秒，0 表示不输出）
    #[arg(long, default_value_t = 10)]
    pub report_secs: u64,

    /// 运行时长（秒），不指定则运行到 Ctrl+C
    #[arg(long)]
    pub duration_secs: Option<u64>,
}

impl RunCommand {
    pub fn execute(self) -> Result<()> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(url) = self.direct_url.clone() {
            config.transport.direct_control_url = url;
        }
        if let Some(url) = self.sync_url.clone() {
            config.transport.sync_control_url = url;
        }
        config.validate()?;

        anyhow::ensure!(
            (1..=1000).contains(&self.tick_hz),
            "--tick-hz 必须在 1..=1000 之间"
        );
        let controls = parse_cab(&self.cab).context("无效的 --cab 参数")?;

        let metrics = Arc::new(BridgeMetrics::new());
        let (transport, frame) = {
            let (sender, rx) =
                tsw_transport::SyncControlSender::channel(config.transport.outbound_capacity);
            let (inbound, frame) = BridgeBuilder::new()
                .config(config.bridge.clone())
                .sink(sender)
                .metrics(metrics.clone())
                .build()?;
            let transport = Transport::start(&config.transport, inbound, rx)?;
            (transport, frame)
        };
        let frame = Rc::new(frame);

        let mut cab = build_cab(&controls);
        cab.set_seat_reversed(self.side.reversed());
        let installed = frame.install(&mut cab);
        if installed.is_degraded() {
            warn!("Running in degraded mode: {:?}", installed);
        }
        {
            let frame = frame.clone();
            cab.on_value_changed(move |cab, component, value| {
                frame.on_input_value_changed(cab, component, value);
            });
        }
        info!(
            "Dry-run cab ready with {} controls, seat {:?}",
            controls.len(),
            self.side
        );

        let running = Arc::new(AtomicBool::new(true));
        {
            let running = running.clone();
            ctrlc::set_handler(move || {
                running.store(false, Ordering::SeqCst);
            })
            .context("注册 Ctrl+C 处理器失败")?;
        }

        run_frame_loop(&self, &frame, &cab, &config.bridge.tick_event_name, &running);

        transport.shutdown();
        log_metrics(&metrics.snapshot());
        for (name, value) in cab.values() {
            debug!("Final {} = {}", name, value);
        }
        Ok(())
    }
}

fn run_frame_loop(
    args: &RunCommand,
    frame: &FrameBridge,
    cab: &tsw_bridge::mock::SimulatedCab,
    tick_event_name: &str,
    running: &AtomicBool,
) {
    let period = Duration::from_secs_f64(1.0 / f64::from(args.tick_hz));
    let report_every = (args.report_secs > 0).then(|| Duration::from_secs(args.report_secs));
    let deadline = args
        .duration_secs
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    let mut next_tick = Instant::now();
    let mut last_report = Instant::now();

    while running.load(Ordering::SeqCst) {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            break;
        }

        if let Some(TickOutcome::Discarded { entries, reason }) =
            frame.on_pre_frame(cab, tick_event_name)
        {
            warn!("Discarded {} commands: {}", entries, reason);
        }

        if let Some(every) = report_every
            && last_report.elapsed() >= every
        {
            log_metrics(&frame.metrics());
            last_report = Instant::now();
        }

        next_tick += period;
        let now = Instant::now();
        if next_tick > now {
            spin_sleep::sleep(next_tick - now);
        } else {
            // 落后时不追帧，从当前时间重新对齐
            next_tick = now;
        }
    }
    info!("Frame loop stopped");
}

fn log_metrics(snapshot: &MetricsSnapshot) {
    info!(
        "received={} rejected={} enqueued={} superseded={} applies={} skipped={} \
         discarded_batches={} forwarded={} suppressed={} outbound_dropped={}",
        snapshot.messages_received,
        snapshot.messages_rejected,
        snapshot.commands_enqueued,
        snapshot.commands_superseded,
        snapshot.applies,
        snapshot.entries_skipped,
        snapshot.batches_discarded,
        snapshot.echoes_forwarded,
        snapshot.echoes_suppressed,
        snapshot.outbound_dropped,
    );
}
