//! 回显过滤（EchoGuard）
//!
//! 游戏对受监控控件的任何写入都会触发值变更通知，不管写入来自玩家的输入设备
//! 还是桥接层自己的应用。把桥接层自己的写入转发出去会形成反馈回路。
//!
//! # 判定规则
//!
//! 通知只在同时满足以下条件时才被视为玩家操作（`PlayerDriven`）：
//!
//! 1. 控件当前记录的修改者是本地玩家控制器
//! 2. 控件标识符不是哨兵值 `None`
//! 3. （`suppress_in_apply_echo` 开启时）通知不是在桥接层对同一控件的
//!    begin/end 区间内同步触发的
//!
//! # 已知限制
//!
//! 规则 1 是推断而不是显式标记：应用阶段以玩家控制器身份执行 begin-change，
//! 宿主若在 end-change 之后才延迟触发通知，规则 3 无法识别，通知会被当成玩家操作。
//! 若存在多个本地控制器（分屏/合作），规则 1 也会失效。

use crate::host::{ChangeTracker, ComponentHandle, ControllerResolver};
use std::cell::Cell;
use tracing::trace;
use tsw_protocol::NONE_IDENTIFIER;

/// 变更来源（推断得出）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// 玩家自己的输入设备
    PlayerDriven,
    /// 桥接层写入或非本地玩家
    BridgeDriven,
}

/// 一次值变更通知
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub identifier: String,
    pub new_value: f32,
    pub origin: ChangeOrigin,
}

impl ChangeEvent {
    pub fn is_player_driven(&self) -> bool {
        self.origin == ChangeOrigin::PlayerDriven
    }
}

/// 回显过滤器（帧线程独占）
#[derive(Debug)]
pub struct EchoGuard {
    /// 桥接层当前正在写入的控件
    applying: Cell<Option<ComponentHandle>>,
    suppress_in_apply: bool,
}

impl EchoGuard {
    pub fn new(suppress_in_apply: bool) -> Self {
        Self {
            applying: Cell::new(None),
            suppress_in_apply,
        }
    }

    /// 标记进入对 `component` 的写入区间，作用域结束时自动恢复
    pub fn enter_apply(&self, component: ComponentHandle) -> ApplyScope<'_> {
        let previous = self.applying.replace(Some(component));
        ApplyScope {
            guard: self,
            previous,
        }
    }

    /// 桥接层是否正在写入 `component`
    pub fn is_applying(&self, component: ComponentHandle) -> bool {
        self.applying.get() == Some(component)
    }

    /// 对一次值变更通知做来源推断
    ///
    /// 控件没有标识符或标识符为 `None` 时返回 `None`（不是可同步的控件）。
    pub fn classify<H>(
        &self,
        host: &H,
        component: ComponentHandle,
        new_value: f32,
    ) -> Option<ChangeEvent>
    where
        H: ChangeTracker + ControllerResolver + ?Sized,
    {
        let identifier = host.input_identifier(component)?;
        if identifier == NONE_IDENTIFIER {
            trace!("Ignoring value change on component without identifier");
            return None;
        }

        let origin = if self.suppress_in_apply && self.is_applying(component) {
            ChangeOrigin::BridgeDriven
        } else {
            let changer = host.currently_changing_controller(component);
            let local = host.local_player_controller();
            match (changer, local) {
                (Some(changer), Some(local)) if changer == local => ChangeOrigin::PlayerDriven,
                _ => ChangeOrigin::BridgeDriven,
            }
        };

        Some(ChangeEvent {
            identifier,
            new_value,
            origin,
        })
    }
}

/// 写入区间作用域（RAII）
#[must_use = "the apply scope ends as soon as it is dropped"]
#[derive(Debug)]
pub struct ApplyScope<'g> {
    guard: &'g EchoGuard,
    previous: Option<ComponentHandle>,
}

impl Drop for ApplyScope<'_> {
    fn drop(&mut self) {
        self.guard.applying.set(self.previous);
    }
}
