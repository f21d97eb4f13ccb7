//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

use crate::gesture::Point;

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    MoveSelectionUp,
    MoveSelectionDown,

    // 键盘拖放：拿起、选择目标、放下
    PickUp,
    HoverPrev,
    HoverNext,
    Drop,

    // 鼠标拖拽
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Option<Point>),
    PointerCancel,

    // 控制
    Undo,
    FetchMore,
    ToggleTheme,
    ToggleFilter,
    StartReset,
    DismissAlert,

    // 表单/通用交互
    Cancel, // Esc / n
    Submit, // y
}
