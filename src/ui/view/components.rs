//! 通用 UI 组件
//!
//! 对话框、笑话卡片等通用组件

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::theme::Palette;

/// [组件] 弹窗基础框架
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str, color: Color) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(color));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// 卡片的显示状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Idle,
    Selected,
    /// 原位置上的占位
    Placeholder,
    /// 正被拖拽的浮层
    Lifted,
}

/// [组件] 笑话卡片：标题显示在屏时间
pub fn render_card(
    frame: &mut Frame,
    area: Rect,
    text: &str,
    elapsed_seconds: u64,
    state: CardState,
    palette: &Palette,
) {
    let (border, style) = match state {
        CardState::Idle => (BorderType::Plain, Style::default().fg(palette.fg)),
        CardState::Selected => (
            BorderType::Thick,
            Style::default()
                .fg(palette.selected)
                .add_modifier(Modifier::BOLD),
        ),
        CardState::Placeholder => (
            BorderType::Plain,
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::DIM),
        ),
        CardState::Lifted => (
            BorderType::Double,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
    };

    if state == CardState::Lifted {
        frame.render_widget(Clear, area);
    }

    let card = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(border)
                .title(format!("⏱ {elapsed_seconds}s")),
        );
    frame.render_widget(card, area);
}
