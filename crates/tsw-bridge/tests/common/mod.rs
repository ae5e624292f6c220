//! 测试用宿主
//!
//! 最小化的宿主实现：一个玩家、一个机车、按名字注册的控件，记录每次写入。

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use tsw_bridge::host::{
    ActorId, ChangeTracker, ComponentDriver, ComponentHandle, ComponentInfo, ComponentLocator,
    ControlCapability, ControllerId, ControllerResolver, PawnId, PawnResolver,
};

pub const PLAYER: ControllerId = ControllerId(7);
pub const PAWN: PawnId = PawnId(1);
pub const LOCO: ActorId = ActorId(2);

/// 一次写入
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Begin(String),
    Value(String, f32),
    Pushed(String, bool),
    End(String),
}

#[derive(Debug, Default)]
struct Inner {
    names: Vec<String>,
    capabilities: Vec<ControlCapability>,
    identifiers: HashMap<u64, String>,
    changing: HashMap<u64, ControllerId>,
    values: HashMap<String, f32>,
    writes: Vec<Write>,
}

/// 测试宿主
#[derive(Debug)]
pub struct FakeHost {
    inner: RefCell<Inner>,
    pub player: Option<ControllerId>,
    pub seat_reversed: Option<bool>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(Inner::default()),
            player: Some(PLAYER),
            seat_reversed: Some(false),
        }
    }

    pub fn control(self, name: &str, capability: ControlCapability) -> Self {
        {
            let mut inner = self.inner.borrow_mut();
            let id = inner.names.len() as u64;
            inner.names.push(name.to_string());
            inner.capabilities.push(capability);
            inner.identifiers.insert(id, name.to_string());
        }
        self
    }

    pub fn handle(&self, name: &str) -> ComponentHandle {
        let inner = self.inner.borrow();
        let index = inner
            .names
            .iter()
            .position(|n| n == name)
            .expect("control not registered");
        ComponentHandle(index as u64)
    }

    pub fn set_identifier(&self, name: &str, identifier: &str) {
        let handle = self.handle(name);
        self.inner
            .borrow_mut()
            .identifiers
            .insert(handle.0, identifier.to_string());
    }

    /// 标记 `name` 当前被 `controller` 修改
    pub fn mark_changing(&self, name: &str, controller: ControllerId) {
        let handle = self.handle(name);
        self.inner.borrow_mut().changing.insert(handle.0, controller);
    }

    pub fn value(&self, name: &str) -> Option<f32> {
        self.inner.borrow().values.get(name).copied()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.inner.borrow().writes.clone()
    }

    pub fn take_writes(&self) -> Vec<Write> {
        std::mem::take(&mut self.inner.borrow_mut().writes)
    }

    /// 只保留 set_value / set_pushed
    pub fn sets(&self) -> Vec<Write> {
        self.writes()
            .into_iter()
            .filter(|w| matches!(w, Write::Value(..) | Write::Pushed(..)))
            .collect()
    }

    fn name(&self, component: ComponentHandle) -> String {
        self.inner.borrow().names[component.0 as usize].clone()
    }
}

impl ControllerResolver for FakeHost {
    fn local_player_controller(&self) -> Option<ControllerId> {
        self.player
    }
}

impl PawnResolver for FakeHost {
    fn driven_pawn(&self, controller: ControllerId) -> Option<PawnId> {
        (Some(controller) == self.player).then_some(PAWN)
    }

    fn drivable_actor(&self, _pawn: PawnId) -> Option<ActorId> {
        Some(LOCO)
    }

    fn attached_seat_reversed(&self, _pawn: PawnId) -> Option<bool> {
        self.seat_reversed
    }
}

impl ComponentLocator for FakeHost {
    fn find_component(&self, _actor: ActorId, name: &str) -> Option<ComponentInfo> {
        let inner = self.inner.borrow();
        let index = inner.names.iter().position(|n| n == name)?;
        Some(ComponentInfo {
            handle: ComponentHandle(index as u64),
            capability: inner.capabilities[index],
        })
    }
}

impl ComponentDriver for FakeHost {
    fn begin_change(&self, component: ComponentHandle, controller: ControllerId) {
        let name = self.name(component);
        let mut inner = self.inner.borrow_mut();
        inner.changing.insert(component.0, controller);
        inner.writes.push(Write::Begin(name));
    }

    fn end_change(&self, component: ComponentHandle, _controller: ControllerId) {
        let name = self.name(component);
        self.inner.borrow_mut().writes.push(Write::End(name));
    }

    fn set_value(&self, component: ComponentHandle, value: f32) {
        let name = self.name(component);
        let mut inner = self.inner.borrow_mut();
        inner.values.insert(name.clone(), value);
        inner.writes.push(Write::Value(name, value));
    }

    fn set_pushed(&self, component: ComponentHandle, pushed: bool) {
        let name = self.name(component);
        let mut inner = self.inner.borrow_mut();
        inner.values.insert(name.clone(), if pushed { 1.0 } else { 0.0 });
        inner.writes.push(Write::Pushed(name, pushed));
    }
}

impl ChangeTracker for FakeHost {
    fn input_identifier(&self, component: ComponentHandle) -> Option<String> {
        self.inner.borrow().identifiers.get(&component.0).cloned()
    }

    fn currently_changing_controller(&self, component: ComponentHandle) -> Option<ControllerId> {
        self.inner.borrow().changing.get(&component.0).copied()
    }
}
