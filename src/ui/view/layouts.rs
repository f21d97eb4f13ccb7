//! 布局辅助函数

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::gesture::Displacement;

/// 屏幕中央按百分比划出的区域
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// 把位移应用到卡片上，结果限制在 `bounds` 内
pub fn displaced_rect(rect: Rect, offset: Displacement, bounds: Rect) -> Rect {
    let width = rect.width.min(bounds.width);
    let height = rect.height.min(bounds.height);

    let clamp = |start: u16, delta: i32, lo: u16, span: u16, size: u16| -> u16 {
        let max = i32::from(lo) + i32::from(span) - i32::from(size);
        let pos = (i32::from(start) + delta).clamp(i32::from(lo), max.max(i32::from(lo)));
        u16::try_from(pos).unwrap_or(lo)
    };

    Rect {
        x: clamp(rect.x, offset.dx, bounds.x, bounds.width, width),
        y: clamp(rect.y, offset.dy, bounds.y, bounds.height, height),
        width,
        height,
    }
}
