//! 事件映射 (Input -> Action)
//!
//! 将按键与鼠标事件转换为 Action

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

use super::actions::Action;
use super::state::{App, AppMode};
use crate::gesture::Point;

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: &AppMode, alert_open: bool, key: KeyCode) -> Option<Action> {
    if alert_open {
        return match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('x') => Some(Action::DismissAlert),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }

    match mode {
        AppMode::Normal => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Char(' ') => Some(Action::PickUp),
            KeyCode::Char('u') => Some(Action::Undo),
            KeyCode::Char('n') => Some(Action::FetchMore),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('f') => Some(Action::ToggleFilter),
            KeyCode::Char('R') => Some(Action::StartReset),
            KeyCode::Esc => Some(Action::PointerCancel),
            _ => None,
        },
        AppMode::Carrying { .. } => match key {
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Up => Some(Action::HoverPrev),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Down => Some(Action::HoverNext),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Drop),
            KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
        AppMode::Confirm(_) => match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Submit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
    }
}

/// 鼠标左键拖拽；只有普通模式且没有弹窗时才开始手势
pub fn mouse_action(mode: &AppMode, alert_open: bool, mouse: MouseEvent) -> Option<Action> {
    let point = Point::new(i32::from(mouse.column), i32::from(mouse.row));
    if alert_open {
        // 弹窗挡住了卡片；松开只用来收尾已有的手势
        return match mouse.kind {
            MouseEventKind::Up(MouseButton::Left) => Some(Action::PointerUp(None)),
            _ => None,
        };
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if *mode == AppMode::Normal => {
            Some(Action::PointerDown(point))
        }
        MouseEventKind::Drag(MouseButton::Left) => Some(Action::PointerMove(point)),
        MouseEventKind::Up(MouseButton::Left) => Some(Action::PointerUp(Some(point))),
        MouseEventKind::ScrollDown => Some(Action::MoveSelectionDown),
        MouseEventKind::ScrollUp => Some(Action::MoveSelectionUp),
        _ => None,
    }
}

/// 处理终端事件，返回 true 表示退出
pub fn handle_event(app: &mut App, event: Event) -> bool {
    let action = match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            get_action(&app.mode, app.alert.is_some(), key.code)
        }
        Event::Mouse(mouse) => mouse_action(&app.mode, app.alert.is_some(), mouse),
        // 失去焦点时松开事件可能永远不会到达
        Event::FocusLost => Some(Action::PointerUp(None)),
        _ => None,
    };

    match action {
        Some(action) => app.dispatch(action),
        None => false,
    }
}
