//! UI 模块
//!
//! 采用 MVI (Model-View-Intent) 架构：
//! - Model (state.rs): App 结构体及其状态数据
//! - View (view/): 将 State 映射为 UI，同时登记命中测试区域
//! - Intent (actions.rs): 键盘与鼠标事件转化为明确的语义化 Action

pub mod actions;
pub mod hit_map;
pub mod input;
pub mod logic;
pub mod state;
pub mod view;

// Re-export for convenience
pub use input::handle_event;
pub use state::App;
pub use view::render;
