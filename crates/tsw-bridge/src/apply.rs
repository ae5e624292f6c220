//! 命令应用
//!
//! 把合并后的批次写入宿主：
//!
//! 1. 解析本地玩家控制器 → Pawn → 可驾驶 Actor，任何一步失败则丢弃整个批次
//! 2. 对每个条目：按当前座椅朝向解析具体控件名（逐条解析，不缓存）
//! 3. 查找控件，找不到只跳过该条目
//! 4. begin-change → 按下/释放 或 连续值 → end-change

use crate::coalesce::CoalescedBatch;
use crate::config::BridgeConfig;
use crate::echo::EchoGuard;
use crate::host::{
    ActorId, ComponentDriver, ControlCapability, ControlTarget, ControllerId, HostSimulation,
    PawnId,
};
use crate::metrics::BridgeMetrics;
use crate::side::{ControlNameResolver, TrainSide};
use thiserror::Error;
use tracing::{debug, trace};

/// 应用所需的宿主上下文缺失
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingContext {
    #[error("no local player controller")]
    Controller,
    #[error("controller is not driving a pawn")]
    Pawn,
    #[error("pawn has no drivable actor")]
    DrivableActor,
}

/// 一个批次的应用结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyReport {
    /// 成功应用的条目数
    pub applied: usize,
    /// 找不到目标控件而跳过的条目数
    pub skipped: usize,
}

/// 本帧的应用上下文
#[derive(Debug, Clone, Copy)]
struct ApplyContext {
    controller: ControllerId,
    pawn: PawnId,
    actor: ActorId,
}

/// 命令应用器（帧线程）
#[derive(Debug, Clone)]
pub struct CommandApplier {
    resolver: ControlNameResolver,
    default_side: TrainSide,
    push_threshold: f32,
}

impl CommandApplier {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            resolver: ControlNameResolver::from_config(config),
            default_side: config.default_side,
            push_threshold: config.push_threshold,
        }
    }

    /// 当前座椅朝向（未挂接座椅时使用默认朝向）
    pub fn current_side<H: HostSimulation + ?Sized>(&self, host: &H, pawn: PawnId) -> TrainSide {
        TrainSide::from_seat(host.attached_seat_reversed(pawn), self.default_side)
    }

    fn context<H: HostSimulation + ?Sized>(&self, host: &H) -> Result<ApplyContext, MissingContext> {
        let controller = host
            .local_player_controller()
            .ok_or(MissingContext::Controller)?;
        let pawn = host.driven_pawn(controller).ok_or(MissingContext::Pawn)?;
        let actor = host
            .drivable_actor(pawn)
            .ok_or(MissingContext::DrivableActor)?;
        Ok(ApplyContext {
            controller,
            pawn,
            actor,
        })
    }

    /// 应用一个批次
    ///
    /// 缺少上下文时返回 `Err`，批次被整体丢弃（调用方负责计数）。
    pub fn apply_batch<H: HostSimulation + ?Sized>(
        &self,
        host: &H,
        batch: CoalescedBatch,
        echo: &EchoGuard,
        metrics: &BridgeMetrics,
    ) -> Result<ApplyReport, MissingContext> {
        let ctx = self.context(host)?;
        let mut report = ApplyReport::default();

        for (raw_name, value) in batch {
            // 座椅可能在两条命令之间切换，所以逐条解析朝向
            let side = self.current_side(host, ctx.pawn);
            let concrete = self.resolver.resolve(&raw_name, side);

            let Some(info) = host.find_component(ctx.actor, &concrete) else {
                debug!("Control {} ({}) not found on drivable actor, skipping", concrete, raw_name);
                BridgeMetrics::incr(&metrics.entries_skipped);
                report.skipped += 1;
                continue;
            };

            let target = ControlTarget::new(host, info);
            self.apply_target(host, target, ctx.controller, value, echo);
            BridgeMetrics::incr(&metrics.applies);
            report.applied += 1;
            trace!("Applied {}={} ({:?})", concrete, value, info.capability);
        }

        Ok(report)
    }

    /// 对单个目标执行 begin → set → end
    fn apply_target<H: ComponentDriver + ?Sized>(
        &self,
        host: &H,
        target: ControlTarget<'_>,
        controller: ControllerId,
        value: f32,
        echo: &EchoGuard,
    ) {
        let handle = target.handle();
        let _scope = echo.enter_apply(handle);

        host.begin_change(handle, controller);
        match target.capability() {
            ControlCapability::Momentary => host.set_pushed(handle, value > self.push_threshold),
            ControlCapability::Continuous => host.set_value(handle, value),
        }
        host.end_change(handle, controller);
    }
}
