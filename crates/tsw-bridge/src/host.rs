//! 宿主模拟接口
//!
//! 桥接层不依赖游戏对象模型，只通过这里的窄接口查询能力：
//!
//! ```text
//! ControllerResolver  本地玩家控制器
//! PawnResolver        控制器 → Pawn → 可驾驶 Actor / 座椅朝向
//! ComponentLocator    Actor 上按具体名字查找虚拟 HID 控件
//! ComponentDriver     begin/end change、连续值、按下/释放
//! ChangeTracker       控件标识符、当前正在修改控件的控制器
//! ```
//!
//! 所有方法都取 `&self`：宿主句柄本身是不透明的，内部可变性由宿主负责。
//! 所有调用都发生在帧线程上。

use std::marker::PhantomData;

/// 控制器句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerId(pub u64);

/// Pawn 句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PawnId(pub u64);

/// 可驾驶 Actor 句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub u64);

/// 虚拟 HID 控件句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentHandle(pub u64);

/// 控件能力（查找时确定一次，之后按 `match` 分派）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCapability {
    /// 按下/释放（喇叭、警惕按钮等）
    Momentary,
    /// 连续值（手柄、制动等）
    Continuous,
}

/// 查找结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentInfo {
    pub handle: ComponentHandle,
    pub capability: ControlCapability,
}

/// 已解析的控件目标
///
/// 生命周期绑定到宿主借用：只在一次应用调用中有效，不能跨帧保留。
#[derive(Debug, Clone, Copy)]
pub struct ControlTarget<'h> {
    handle: ComponentHandle,
    capability: ControlCapability,
    _host: PhantomData<&'h ()>,
}

impl<'h> ControlTarget<'h> {
    pub fn new<H: ?Sized>(_host: &'h H, info: ComponentInfo) -> Self {
        Self {
            handle: info.handle,
            capability: info.capability,
            _host: PhantomData,
        }
    }

    pub fn handle(&self) -> ComponentHandle {
        self.handle
    }

    pub fn capability(&self) -> ControlCapability {
        self.capability
    }
}

/// 本地玩家控制器解析
pub trait ControllerResolver {
    fn local_player_controller(&self) -> Option<ControllerId>;
}

/// Pawn / 可驾驶 Actor 解析
pub trait PawnResolver {
    /// 控制器当前控制的 Pawn
    fn driven_pawn(&self, controller: ControllerId) -> Option<PawnId>;

    /// Pawn 当前挂接的可驾驶 Actor（机车）
    fn drivable_actor(&self, pawn: PawnId) -> Option<ActorId>;

    /// Pawn 当前挂接座椅的反向标志；未挂接座椅时返回 `None`
    fn attached_seat_reversed(&self, pawn: PawnId) -> Option<bool>;
}

/// 控件查找
pub trait ComponentLocator {
    /// 按具体名字查找可驾驶 Actor 上的虚拟 HID 控件
    fn find_component(&self, actor: ActorId, name: &str) -> Option<ComponentInfo>;
}

/// 控件写入
pub trait ComponentDriver {
    /// 以 `controller` 身份开始修改控件
    fn begin_change(&self, component: ComponentHandle, controller: ControllerId);

    /// 结束修改
    fn end_change(&self, component: ComponentHandle, controller: ControllerId);

    /// 设置连续值
    fn set_value(&self, component: ComponentHandle, value: f32);

    /// 设置按下/释放状态
    fn set_pushed(&self, component: ComponentHandle, pushed: bool);
}

/// 变更来源查询
pub trait ChangeTracker {
    /// 控件的输入标识符（与朝向无关）；控件没有该属性时返回 `None`
    fn input_identifier(&self, component: ComponentHandle) -> Option<String>;

    /// 当前被记录为正在修改该控件的控制器
    fn currently_changing_controller(&self, component: ComponentHandle) -> Option<ControllerId>;
}

/// 完整的宿主能力集合
pub trait HostSimulation:
    ControllerResolver + PawnResolver + ComponentLocator + ComponentDriver + ChangeTracker
{
}

impl<T> HostSimulation for T where
    T: ControllerResolver + PawnResolver + ComponentLocator + ComponentDriver + ChangeTracker + ?Sized
{
}
