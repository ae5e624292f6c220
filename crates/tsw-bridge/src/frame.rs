//! 帧线程桥接
//!
//! `FrameBridge` 由宿主的帧循环驱动：
//!
//! - `on_pre_frame`: 预帧事件；只有事件名匹配 `tick_event_name` 时才执行一次 `tick`
//! - `tick`: 取出队列 → 合并 → 应用
//! - `on_input_value_changed`: 值变更后通知 → 回显过滤 → 出站
//!
//! # 线程约束
//!
//! 以上方法只能在同一个帧线程上调用。`FrameBridge` 不是 `Sync`，
//! 并且在第一次帧调用时记录线程，之后从其它线程调用会直接 panic。

use crate::apply::{ApplyReport, CommandApplier, MissingContext};
use crate::coalesce::FrameCoalescer;
use crate::config::BridgeConfig;
use crate::echo::{ChangeEvent, EchoGuard};
use crate::hooks::{HookRegistry, HostHook, InstalledHooks};
use crate::host::{ComponentHandle, HostSimulation};
use crate::metrics::{BridgeMetrics, MetricsSnapshot};
use crate::outbound::OutboundBridge;
use crate::queue::CommandQueue;
use std::cell::{Cell, OnceCell};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::{debug, info, trace, warn};

/// 一次 tick 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 队列为空，什么都没做
    Idle,
    /// 缺少上下文，批次被丢弃
    Discarded {
        entries: usize,
        reason: MissingContext,
    },
    /// 批次已应用
    Applied(ApplyReport),
}

/// 帧线程归属检查
#[derive(Debug, Default)]
struct FrameThreadGuard {
    owner: OnceCell<ThreadId>,
}

impl FrameThreadGuard {
    fn check(&self) {
        let current = thread::current().id();
        let owner = *self.owner.get_or_init(|| current);
        assert_eq!(
            owner, current,
            "FrameBridge must only be driven from the simulation frame thread"
        );
    }
}

/// 帧线程桥接
#[derive(Debug)]
pub struct FrameBridge {
    queue: Arc<CommandQueue>,
    coalescer: FrameCoalescer,
    applier: CommandApplier,
    echo: EchoGuard,
    outbound: OutboundBridge,
    tick_event_name: String,
    hooks: Cell<InstalledHooks>,
    thread: FrameThreadGuard,
}

impl FrameBridge {
    pub(crate) fn new(config: &BridgeConfig, queue: Arc<CommandQueue>, outbound: OutboundBridge) -> Self {
        Self {
            coalescer: FrameCoalescer::new(queue.clone()),
            queue,
            applier: CommandApplier::new(config),
            echo: EchoGuard::new(config.suppress_in_apply_echo),
            outbound,
            tick_event_name: config.tick_event_name.clone(),
            // 未调用 install 时假定宿主已自行接好钩子
            hooks: Cell::new(InstalledHooks::all()),
            thread: FrameThreadGuard::default(),
        }
    }

    /// 向宿主注册钩子
    ///
    /// 注册失败的钩子只关闭对应功能：
    /// - 预帧钩子缺失：关闭命令队列，入站消息不再积压；之后重新安装成功时重新打开
    /// - 值变更钩子缺失：不再有出站同步
    pub fn install<R: HookRegistry + ?Sized>(&self, registry: &mut R) -> InstalledHooks {
        let mut installed = InstalledHooks::default();
        for hook in HostHook::ALL {
            match registry.register_hook(hook) {
                Ok(()) => {
                    info!("Hook registered: {:?}", hook);
                    installed.mark(hook, true);
                },
                Err(e) => {
                    warn!("Hook unavailable, running without {:?}: {}", hook, e);
                },
            }
        }

        // 队列开关始终跟随最近一次安装结果
        self.queue.set_open(installed.pre_frame);
        self.hooks.set(installed);
        installed
    }

    pub fn installed_hooks(&self) -> InstalledHooks {
        self.hooks.get()
    }

    /// 预帧事件入口
    ///
    /// 只有事件名等于配置的 `tick_event_name` 时才执行 `tick`，否则返回 `None`。
    pub fn on_pre_frame<H: HostSimulation + ?Sized>(
        &self,
        host: &H,
        event_name: &str,
    ) -> Option<TickOutcome> {
        self.thread.check();
        if event_name != self.tick_event_name {
            return None;
        }
        Some(self.tick(host))
    }

    /// 执行一帧：取出 → 合并 → 应用
    pub fn tick<H: HostSimulation + ?Sized>(&self, host: &H) -> TickOutcome {
        self.thread.check();

        let batch = self.coalescer.next_batch();
        if batch.is_empty() {
            return TickOutcome::Idle;
        }

        let entries = batch.len();
        let metrics = self.queue.metrics();
        match self.applier.apply_batch(host, batch, &self.echo, metrics) {
            Ok(report) => {
                BridgeMetrics::incr(&metrics.batches_applied);
                debug!(
                    "Applied batch: {} applied, {} skipped",
                    report.applied, report.skipped
                );
                TickOutcome::Applied(report)
            },
            Err(reason) => {
                BridgeMetrics::incr(&metrics.batches_discarded);
                debug!("Discarding batch of {} entries: {}", entries, reason);
                TickOutcome::Discarded { entries, reason }
            },
        }
    }

    /// 值变更通知入口
    ///
    /// 返回被转发出去的事件；被过滤或投递失败时返回 `None`。
    pub fn on_input_value_changed<H: HostSimulation + ?Sized>(
        &self,
        host: &H,
        component: ComponentHandle,
        new_value: f32,
    ) -> Option<ChangeEvent> {
        self.thread.check();

        let event = self.echo.classify(host, component, new_value)?;
        if !event.is_player_driven() {
            BridgeMetrics::incr(&self.queue.metrics().echoes_suppressed);
            trace!("Suppressed echo for {}={}", event.identifier, event.new_value);
            return None;
        }

        self.outbound.forward(&event).then_some(event)
    }

    pub fn queue(&self) -> &Arc<CommandQueue> {
        &self.queue
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.queue.metrics().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BridgeBuilder;
    use crate::host::{ControlCapability, ControllerId};
    use crate::mock::{CabCall, PLAYER_CONTROLLER, SimulatedCab};
    use crossbeam_channel::{Receiver, unbounded};
    use std::rc::Rc;
    use tsw_protocol::SyncControlMessage;

    fn bridge() -> (
        crate::InboundBridge,
        Rc<FrameBridge>,
        Receiver<SyncControlMessage>,
    ) {
        let (tx, rx) = unbounded();
        let (inbound, frame) = BridgeBuilder::new().sink(tx).build().unwrap();
        (inbound, Rc::new(frame), rx)
    }

    fn cab() -> SimulatedCab {
        SimulatedCab::new()
            .with_component("BrakeF", ControlCapability::Continuous)
            .with_component("BrakeB", ControlCapability::Continuous)
            .with_component("Throttle", ControlCapability::Continuous)
            .with_component("HornF", ControlCapability::Momentary)
    }

    /// 把模拟驾驶室的值变更通知接回桥接层
    fn wire(cab: &SimulatedCab, frame: &Rc<FrameBridge>) {
        let frame = frame.clone();
        cab.on_value_changed(move |cab, component, value| {
            frame.on_input_value_changed(cab, component, value);
        });
    }

    #[test]
    fn test_empty_queue_is_idle() {
        let (_inbound, frame, _rx) = bridge();
        let cab = cab();
        assert_eq!(frame.tick(&cab), TickOutcome::Idle);
        assert!(cab.calls().is_empty());
    }

    #[test]
    fn test_coalesced_value_applied_once_to_front_side() {
        let (inbound, frame, _rx) = bridge();
        let cab = cab();

        inbound.on_message_received("direct_control,Brake{SIDE},0.8");
        inbound.on_message_received("direct_control,Brake{SIDE},0.3");

        let outcome = frame.tick(&cab);
        assert_eq!(
            outcome,
            TickOutcome::Applied(ApplyReport {
                applied: 1,
                skipped: 0
            })
        );
        assert_eq!(
            cab.calls(),
            vec![
                CabCall::BeginChange {
                    component: "BrakeF".to_string(),
                    controller: PLAYER_CONTROLLER,
                },
                CabCall::SetValue {
                    component: "BrakeF".to_string(),
                    value: 0.3,
                },
                CabCall::EndChange {
                    component: "BrakeF".to_string(),
                    controller: PLAYER_CONTROLLER,
                },
            ]
        );
    }

    #[test]
    fn test_back_seat_resolves_back_control() {
        let (inbound, frame, _rx) = bridge();
        let cab = cab();
        cab.set_seat_reversed(Some(true));

        inbound.on_message_received("direct_control,Brake{SIDE},0.6");
        frame.tick(&cab);
        assert_eq!(cab.value("BrakeB"), Some(0.6));
        assert_eq!(cab.value("BrakeF"), Some(0.0));
    }

    #[test]
    fn test_no_seat_uses_default_side() {
        let (inbound, frame, _rx) = bridge();
        let cab = cab();
        cab.set_seat_reversed(None);

        inbound.on_message_received("direct_control,Brake{SIDE},0.6");
        frame.tick(&cab);
        assert_eq!(cab.value("BrakeF"), Some(0.6));
    }

    #[test]
    fn test_momentary_threshold() {
        let (inbound, frame, _rx) = bridge();
        let cab = cab();

        for (value, pushed) in [(0.51, true), (0.5, false), (1.0, true), (0.0, false)] {
            inbound.on_message_received(&format!("direct_control,Horn{{SIDE}},{value}"));
            frame.tick(&cab);
            let last_set = cab
                .take_calls()
                .into_iter()
                .find_map(|call| match call {
                    CabCall::SetPushed { pushed, .. } => Some(pushed),
                    _ => None,
                });
            assert_eq!(last_set, Some(pushed), "value {value}");
        }
    }

    #[test]
    fn test_missing_control_skips_only_that_entry() {
        let (inbound, frame, _rx) = bridge();
        let cab = cab();

        inbound.on_message_received("direct_control,Pantograph,1");
        inbound.on_message_received("direct_control,Throttle,0.4");

        let outcome = frame.tick(&cab);
        assert_eq!(
            outcome,
            TickOutcome::Applied(ApplyReport {
                applied: 1,
                skipped: 1
            })
        );
        assert_eq!(cab.value("Throttle"), Some(0.4));
        assert_eq!(frame.metrics().entries_skipped, 1);
    }

    #[test]
    fn test_missing_context_discards_batch() {
        let (inbound, frame, _rx) = bridge();
        let cab = cab();
        cab.set_player_controller(None);

        inbound.on_message_received("direct_control,Throttle,0.4");
        assert_eq!(
            frame.tick(&cab),
            TickOutcome::Discarded {
                entries: 1,
                reason: MissingContext::Controller
            }
        );

        // 批次不跨帧缓存
        cab.set_player_controller(Some(PLAYER_CONTROLLER));
        assert_eq!(frame.tick(&cab), TickOutcome::Idle);
        assert!(cab.calls().is_empty());
        assert_eq!(frame.metrics().batches_discarded, 1);
    }

    #[test]
    fn test_missing_pawn_and_actor_discard_batch() {
        let (inbound, frame, _rx) = bridge();
        let cab = cab();

        cab.set_drivable_actor_attached(false);
        inbound.on_message_received("direct_control,Throttle,0.4");
        assert!(matches!(
            frame.tick(&cab),
            TickOutcome::Discarded {
                reason: MissingContext::DrivableActor,
                ..
            }
        ));

        cab.set_pawn_possessed(false);
        inbound.on_message_received("direct_control,Throttle,0.4");
        assert!(matches!(
            frame.tick(&cab),
            TickOutcome::Discarded {
                reason: MissingContext::Pawn,
                ..
            }
        ));
    }

    #[test]
    fn test_pre_frame_gating() {
        let (inbound, frame, _rx) = bridge();
        let cab = cab();

        inbound.on_message_received("direct_control,Throttle,0.4");
        assert_eq!(frame.on_pre_frame(&cab, "ReceiveBeginPlay"), None);
        assert_eq!(cab.value("Throttle"), Some(0.0));

        assert!(matches!(
            frame.on_pre_frame(&cab, "ReceiveTick"),
            Some(TickOutcome::Applied(_))
        ));
        assert_eq!(cab.value("Throttle"), Some(0.4));
    }

    #[test]
    fn test_player_input_is_forwarded() {
        let (_inbound, frame, rx) = bridge();
        let cab = cab();
        wire(&cab, &frame);

        cab.player_input("Throttle", 0.65);
        assert_eq!(rx.try_recv().unwrap().to_string(), "Throttle,0.65");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_bridge_writes_are_not_echoed() {
        let (inbound, frame, rx) = bridge();
        let cab = cab();
        wire(&cab, &frame);

        inbound.on_message_received("direct_control,Throttle,0.4");
        frame.tick(&cab);

        assert_eq!(cab.value("Throttle"), Some(0.4));
        assert!(rx.try_recv().is_err());
        assert_eq!(frame.metrics().echoes_suppressed, 1);
    }

    #[test]
    fn test_foreign_controller_change_is_not_forwarded() {
        let (_inbound, frame, rx) = bridge();
        let cab = cab();
        wire(&cab, &frame);

        cab.foreign_input("Throttle", 0.2, ControllerId(42));
        assert!(rx.try_recv().is_err());
        assert_eq!(frame.metrics().echoes_suppressed, 1);
    }

    #[test]
    fn test_install_with_missing_pre_frame_hook_closes_queue() {
        let (inbound, frame, _rx) = bridge();
        let mut cab = cab().without_hook(HostHook::PreFrameEvent);

        let installed = frame.install(&mut cab);
        assert!(!installed.pre_frame);
        assert!(installed.value_changed);
        assert!(installed.is_degraded());
        assert_eq!(frame.installed_hooks(), installed);

        inbound.on_message_received("direct_control,Throttle,0.4");
        assert!(inbound.queue().is_empty());
    }

    #[test]
    fn test_reinstall_with_all_hooks_reopens_queue() {
        let (inbound, frame, _rx) = bridge();
        let mut degraded = cab().without_hook(HostHook::PreFrameEvent);
        assert!(!frame.install(&mut degraded).pre_frame);
        assert!(!inbound.queue().is_open());

        let mut full = cab();
        assert_eq!(frame.install(&mut full), InstalledHooks::all());
        assert!(inbound.queue().is_open());

        inbound.on_message_received("direct_control,Throttle,0.4");
        assert!(matches!(frame.tick(&full), TickOutcome::Applied(_)));
        assert_eq!(full.value("Throttle"), Some(0.4));
    }

    #[test]
    fn test_install_all_hooks() {
        let (_inbound, frame, _rx) = bridge();
        let mut cab = cab();
        assert_eq!(frame.install(&mut cab), InstalledHooks::all());
        assert_eq!(
            cab.registered_hooks(),
            vec![HostHook::PreFrameEvent, HostHook::InputValueChanged]
        );
    }

    #[test]
    fn test_frame_calls_from_other_thread_panic() {
        let (_inbound, frame, _rx) = bridge();
        let frame = Rc::try_unwrap(frame).unwrap();
        frame.tick(&cab());

        let result = thread::spawn(move || {
            let cab = cab();
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| frame.tick(&cab)))
                .is_err()
        })
        .join()
        .unwrap();
        assert!(result);
    }

    #[test]
    fn test_unmatched_pre_frame_from_other_thread_panics() {
        let (_inbound, frame, _rx) = bridge();
        let frame = Rc::try_unwrap(frame).unwrap();
        frame.tick(&cab());

        let result = thread::spawn(move || {
            let cab = cab();
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                frame.on_pre_frame(&cab, "ReceiveBeginPlay")
            }))
            .is_err()
        })
        .join()
        .unwrap();
        assert!(result);
    }
}
