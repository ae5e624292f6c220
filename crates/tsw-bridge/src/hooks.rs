//! 宿主钩子注册
//!
//! 桥接层需要宿主的两个通知：
//!
//! - `PreFrameEvent`: 每帧的预事件，用于驱动合并/应用
//! - `InputValueChanged`: 虚拟 HID 控件值变更后的通知，用于出站同步
//!
//! 某些游戏版本缺少对应函数，注册失败时只关闭依赖它的功能（降级模式），
//! 其余部分继续运行。

use crate::error::BridgeError;

/// 宿主钩子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostHook {
    /// 预帧事件（入站应用）
    PreFrameEvent,
    /// 控件值变更后（出站同步）
    InputValueChanged,
}

impl HostHook {
    pub const ALL: [HostHook; 2] = [HostHook::PreFrameEvent, HostHook::InputValueChanged];
}

/// 钩子注册接口（由宿主实现）
pub trait HookRegistry {
    /// 注册一个钩子；宿主不支持时返回 `BridgeError::HookUnavailable`
    fn register_hook(&mut self, hook: HostHook) -> Result<(), BridgeError>;
}

/// 实际安装成功的钩子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstalledHooks {
    pub pre_frame: bool,
    pub value_changed: bool,
}

impl InstalledHooks {
    /// 所有钩子都已安装
    pub const fn all() -> Self {
        Self {
            pre_frame: true,
            value_changed: true,
        }
    }

    pub fn is_installed(&self, hook: HostHook) -> bool {
        match hook {
            HostHook::PreFrameEvent => self.pre_frame,
            HostHook::InputValueChanged => self.value_changed,
        }
    }

    pub(crate) fn mark(&mut self, hook: HostHook, installed: bool) {
        match hook {
            HostHook::PreFrameEvent => self.pre_frame = installed,
            HostHook::InputValueChanged => self.value_changed = installed,
        }
    }

    /// 是否处于降级模式（至少一个钩子缺失）
    pub fn is_degraded(&self) -> bool {
        !(self.pre_frame && self.value_changed)
    }
}
