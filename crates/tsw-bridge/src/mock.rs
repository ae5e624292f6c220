//! 模拟驾驶室
//!
//! 内存中的宿主实现，不依赖游戏进程。用于单元测试和命令行的 dry-run 模式。
//!
//! - 只有一个本地玩家控制器（`PLAYER_CONTROLLER`）、一个 Pawn 和一个可驾驶 Actor
//! - 控件按名字注册，句柄是注册顺序
//! - 每次写入都会记录到调用日志（`CabCall`）
//! - 值变更后同步调用 `on_value_changed` 注册的监听器，模拟游戏的值变更通知

use crate::error::BridgeError;
use crate::hooks::{HookRegistry, HostHook};
use crate::host::{
    ActorId, ChangeTracker, ComponentDriver, ComponentHandle, ComponentInfo, ComponentLocator,
    ControlCapability, ControllerId, ControllerResolver, PawnId, PawnResolver,
};
use std::cell::RefCell;
use std::rc::Rc;

/// 模拟驾驶室中的本地玩家控制器
pub const PLAYER_CONTROLLER: ControllerId = ControllerId(1);

const PAWN: PawnId = PawnId(10);
const ACTOR: ActorId = ActorId(20);

/// 写入调用记录
#[derive(Debug, Clone, PartialEq)]
pub enum CabCall {
    BeginChange {
        component: String,
        controller: ControllerId,
    },
    SetValue {
        component: String,
        value: f32,
    },
    SetPushed {
        component: String,
        pushed: bool,
    },
    EndChange {
        component: String,
        controller: ControllerId,
    },
}

#[derive(Debug, Clone)]
struct SimulatedControl {
    name: String,
    identifier: Option<String>,
    capability: ControlCapability,
    value: f32,
    changing: Option<ControllerId>,
}

#[derive(Debug)]
struct CabState {
    player: Option<ControllerId>,
    pawn_possessed: bool,
    actor_attached: bool,
    seat_reversed: Option<bool>,
    controls: Vec<SimulatedControl>,
    calls: Vec<CabCall>,
}

type ValueListener = Rc<dyn Fn(&SimulatedCab, ComponentHandle, f32)>;

/// 模拟驾驶室
pub struct SimulatedCab {
    state: RefCell<CabState>,
    listener: RefCell<Option<ValueListener>>,
    unavailable_hooks: Vec<HostHook>,
    registered_hooks: Vec<HostHook>,
}

impl Default for SimulatedCab {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedCab {
    /// 玩家已坐在前端驾驶台的空驾驶室
    pub fn new() -> Self {
        Self {
            state: RefCell::new(CabState {
                player: Some(PLAYER_CONTROLLER),
                pawn_possessed: true,
                actor_attached: true,
                seat_reversed: Some(false),
                controls: Vec::new(),
                calls: Vec::new(),
            }),
            listener: RefCell::new(None),
            unavailable_hooks: Vec::new(),
            registered_hooks: Vec::new(),
        }
    }

    /// 添加控件，标识符与控件名相同
    pub fn with_component(self, name: &str, capability: ControlCapability) -> Self {
        self.with_identified_component(name, Some(name), capability)
    }

    /// 添加控件并指定输入标识符（`None` 表示控件没有标识符属性）
    pub fn with_identified_component(
        self,
        name: &str,
        identifier: Option<&str>,
        capability: ControlCapability,
    ) -> Self {
        self.state.borrow_mut().controls.push(SimulatedControl {
            name: name.to_string(),
            identifier: identifier.map(str::to_string),
            capability,
            value: 0.0,
            changing: None,
        });
        self
    }

    /// 模拟缺少某个钩子函数的游戏版本
    pub fn without_hook(mut self, hook: HostHook) -> Self {
        self.unavailable_hooks.push(hook);
        self
    }

    pub fn set_player_controller(&self, controller: Option<ControllerId>) {
        self.state.borrow_mut().player = controller;
    }

    pub fn set_pawn_possessed(&self, possessed: bool) {
        self.state.borrow_mut().pawn_possessed = possessed;
    }

    pub fn set_drivable_actor_attached(&self, attached: bool) {
        self.state.borrow_mut().actor_attached = attached;
    }

    /// 座椅反向标志；`None` 表示未挂接座椅
    pub fn set_seat_reversed(&self, reversed: Option<bool>) {
        self.state.borrow_mut().seat_reversed = reversed;
    }

    /// 注册值变更监听器（替换之前的监听器）
    pub fn on_value_changed<F>(&self, listener: F)
    where
        F: Fn(&SimulatedCab, ComponentHandle, f32) + 'static,
    {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// 模拟玩家自己的输入设备修改控件
    pub fn player_input(&self, name: &str, value: f32) -> bool {
        self.foreign_input(name, value, PLAYER_CONTROLLER)
    }

    /// 以任意控制器身份修改控件；控件不存在时返回 `false`
    pub fn foreign_input(&self, name: &str, value: f32, controller: ControllerId) -> bool {
        let Some(handle) = self.handle(name) else {
            return false;
        };

        self.with_control(handle, |control| {
            control.changing = Some(controller);
            control.value = value;
        });
        self.notify(handle, value);
        self.with_control(handle, |control| control.changing = None);
        true
    }

    pub fn handle(&self, name: &str) -> Option<ComponentHandle> {
        self.state
            .borrow()
            .controls
            .iter()
            .position(|c| c.name == name)
            .map(|index| ComponentHandle(index as u64))
    }

    /// 控件当前值（按下/释放类控件为 1.0 / 0.0）
    pub fn value(&self, name: &str) -> Option<f32> {
        self.state
            .borrow()
            .controls
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value)
    }

    /// 所有控件名及当前值（按注册顺序）
    pub fn values(&self) -> Vec<(String, f32)> {
        self.state
            .borrow()
            .controls
            .iter()
            .map(|c| (c.name.clone(), c.value))
            .collect()
    }

    pub fn calls(&self) -> Vec<CabCall> {
        self.state.borrow().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<CabCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    pub fn registered_hooks(&self) -> Vec<HostHook> {
        self.registered_hooks.clone()
    }

    fn name_of(&self, handle: ComponentHandle) -> String {
        self.state
            .borrow()
            .controls
            .get(handle.0 as usize)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    fn with_control(&self, handle: ComponentHandle, f: impl FnOnce(&mut SimulatedControl)) {
        if let Some(control) = self.state.borrow_mut().controls.get_mut(handle.0 as usize) {
            f(control);
        }
    }

    fn record(&self, call: CabCall) {
        self.state.borrow_mut().calls.push(call);
    }

    /// 同步触发监听器（调用期间不持有任何内部借用）
    fn notify(&self, handle: ComponentHandle, value: f32) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(self, handle, value);
        }
    }
}

impl std::fmt::Debug for SimulatedCab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedCab")
            .field("state", &self.state)
            .field("unavailable_hooks", &self.unavailable_hooks)
            .finish_non_exhaustive()
    }
}

impl ControllerResolver for SimulatedCab {
    fn local_player_controller(&self) -> Option<ControllerId> {
        self.state.borrow().player
    }
}

impl PawnResolver for SimulatedCab {
    fn driven_pawn(&self, controller: ControllerId) -> Option<PawnId> {
        let state = self.state.borrow();
        (state.pawn_possessed && state.player == Some(controller)).then_some(PAWN)
    }

    fn drivable_actor(&self, pawn: PawnId) -> Option<ActorId> {
        (pawn == PAWN && self.state.borrow().actor_attached).then_some(ACTOR)
    }

    fn attached_seat_reversed(&self, pawn: PawnId) -> Option<bool> {
        if pawn != PAWN {
            return None;
        }
        self.state.borrow().seat_reversed
    }
}

impl ComponentLocator for SimulatedCab {
    fn find_component(&self, actor: ActorId, name: &str) -> Option<ComponentInfo> {
        if actor != ACTOR {
            return None;
        }
        let handle = self.handle(name)?;
        let capability = self.state.borrow().controls[handle.0 as usize].capability;
        Some(ComponentInfo { handle, capability })
    }
}

impl ComponentDriver for SimulatedCab {
    fn begin_change(&self, component: ComponentHandle, controller: ControllerId) {
        self.with_control(component, |c| c.changing = Some(controller));
        self.record(CabCall::BeginChange {
            component: self.name_of(component),
            controller,
        });
    }

    fn end_change(&self, component: ComponentHandle, controller: ControllerId) {
        self.record(CabCall::EndChange {
            component: self.name_of(component),
            controller,
        });
        self.with_control(component, |c| c.changing = None);
    }

    fn set_value(&self, component: ComponentHandle, value: f32) {
        self.with_control(component, |c| c.value = value);
        self.record(CabCall::SetValue {
            component: self.name_of(component),
            value,
        });
        self.notify(component, value);
    }

    fn set_pushed(&self, component: ComponentHandle, pushed: bool) {
        let value = if pushed { 1.0 } else { 0.0 };
        self.with_control(component, |c| c.value = value);
        self.record(CabCall::SetPushed {
            component: self.name_of(component),
            pushed,
        });
        self.notify(component, value);
    }
}

impl ChangeTracker for SimulatedCab {
    fn input_identifier(&self, component: ComponentHandle) -> Option<String> {
        self.state
            .borrow()
            .controls
            .get(component.0 as usize)
            .and_then(|c| c.identifier.clone())
    }

    fn currently_changing_controller(&self, component: ComponentHandle) -> Option<ControllerId> {
        self.state
            .borrow()
            .controls
            .get(component.0 as usize)
            .and_then(|c| c.changing)
    }
}

impl HookRegistry for SimulatedCab {
    fn register_hook(&mut self, hook: HostHook) -> Result<(), BridgeError> {
        if self.unavailable_hooks.contains(&hook) {
            return Err(BridgeError::HookUnavailable {
                hook,
                reason: "function not found in this game build".to_string(),
            });
        }
        self.registered_hooks.push(hook);
        Ok(())
    }
}
