//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件。渲染的同时重建命中测试区域。

pub mod components;
pub mod layouts;

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
};

use super::state::{App, AppMode, ConfirmAction};
use crate::models::Reaction;
use crate::summary::{SummaryFilter, summarize};
use crate::theme::Palette;
use components::{CardState, render_card, render_dialog_framework};
use layouts::{centered_rect, displaced_rect};

const CARD_HEIGHT: u16 = 4;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let palette = app.theme.palette();
    let now = Instant::now();
    app.hit_map.clear();

    frame.render_widget(
        Block::default().style(Style::default().fg(palette.fg).bg(palette.bg)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Min(10),   // 主体
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // 待分类
            Constraint::Percentage(25), // 放置目标
            Constraint::Percentage(35), // 汇总
        ])
        .split(chunks[1]);

    render_title(frame, app, &palette, chunks[0]);
    render_targets(frame, app, &palette, columns[1]);
    let lifted = render_pending(frame, app, &palette, columns[0], now);
    render_summary(frame, app, &palette, columns[2]);
    render_help(frame, app, &palette, chunks[2]);

    // 拖拽中的卡片最后绘制，位于最上层
    if let Some((area, text, elapsed)) = lifted {
        let gesture_offset = app
            .gesture
            .as_ref()
            .map(|g| g.displacement())
            .unwrap_or_default();
        let moved = displaced_rect(area, gesture_offset, frame.area());
        render_card(frame, moved, &text, elapsed, CardState::Lifted, &palette);
        if let Some(id) = app.dragged_item_id().map(str::to_string) {
            app.hit_map.push_item(moved, &id);
        }
    }

    // 渲染弹窗
    if let AppMode::Confirm(action) = &app.mode {
        render_confirm_dialog(frame, action, &palette);
    }
    if let Some(alert) = &app.alert {
        render_alert(frame, alert, &palette);
    }
}

fn render_title(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let mut spans = vec![Span::styled(
        "😄 笑话分拣",
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    )];
    if app.is_loading() {
        spans.push(Span::styled(
            "  加载中…",
            Style::default().fg(palette.muted),
        ));
    }
    spans.push(Span::styled(
        format!("  [{}]", app.theme.name()),
        Style::default().fg(palette.muted),
    ));

    let title = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

/// 绘制待分类卡片；返回被拖拽卡片的原始位置，由调用方画到最上层
fn render_pending(
    frame: &mut Frame,
    app: &mut App,
    palette: &Palette,
    area: Rect,
    now: Instant,
) -> Option<(Rect, String, u64)> {
    let block = Block::default()
        .title(format!("待分类 ({})", app.store.pending().len()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.store.pending().is_empty() {
        let hint = if app.is_loading() {
            "正在获取笑话…"
        } else {
            "没有待分类的笑话，按 [n] 获取更多"
        };
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(palette.muted)),
            inner,
        );
        return None;
    }

    let visible = usize::from((inner.height / CARD_HEIGHT).max(1));
    let offset = app.selected_index.saturating_sub(visible - 1);
    let dragged = app.dragged_item_id().map(str::to_string);
    let mut lifted = None;

    for (slot, (index, item)) in app
        .store
        .pending()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .enumerate()
    {
        let y = inner.y + slot as u16 * CARD_HEIGHT;
        let card_area = Rect {
            x: inner.x,
            y,
            width: inner.width,
            height: CARD_HEIGHT.min(inner.bottom().saturating_sub(y)),
        };
        let elapsed = app.clocks.elapsed(&item.id, now);

        if dragged.as_deref() == Some(item.id.as_str()) {
            render_card(frame, card_area, &item.text, elapsed, CardState::Placeholder, palette);
            lifted = Some((card_area, item.text.clone(), elapsed));
            continue;
        }

        let state = if index == app.selected_index {
            CardState::Selected
        } else {
            CardState::Idle
        };
        render_card(frame, card_area, &item.text, elapsed, state, palette);
        app.hit_map.push_item(card_area, &item.id);
    }

    lifted
}

fn render_targets(frame: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (i, row) in rows.iter().enumerate() {
        let target = &app.targets[i];
        let reaction = target.reaction();
        let color = match reaction {
            Reaction::Favorable => palette.favorable,
            Reaction::Unfavorable => palette.unfavorable,
        };
        let (border, style) = if target.is_active() {
            (
                BorderType::Double,
                Style::default().fg(color).add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
        } else {
            (BorderType::Rounded, Style::default().fg(color))
        };

        let body = Paragraph::new(format!(
            "\n拖到这里\n\n共 {} 条",
            app.tally_for(reaction)
        ))
        .style(style)
        .centered()
        .block(
            Block::default()
                .title(reaction.label())
                .borders(Borders::ALL)
                .border_type(border),
        );
        frame.render_widget(body, *row);
        app.hit_map.push_target(*row, target.marker());
    }
}

fn render_summary(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let items: Vec<ListItem> = summarize(app.store.history(), app.filter)
        .map(|row| {
            let color = match row.reaction {
                Reaction::Favorable => palette.favorable,
                Reaction::Unfavorable => palette.unfavorable,
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>5} ", row.elapsed_label()), Style::default().fg(palette.muted)),
                Span::styled(
                    format!("{} ", row.reaction.label()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(row.text, Style::default().fg(color)),
            ]))
        })
        .collect();

    let title = match app.filter {
        SummaryFilter::All => "汇总".to_string(),
        SummaryFilter::FavorableOnly => format!("汇总（仅{}）", Reaction::Favorable.label()),
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    if items.is_empty() {
        let hint = if app.store.history().is_empty() {
            "还没有分类过的笑话，把卡片拖到目标上"
        } else {
            "没有符合筛选的记录，按 [f] 显示全部"
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(palette.muted))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    frame.render_widget(List::new(items).block(block), area);
}

fn render_help(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let help_text = match &app.mode {
        AppMode::Normal => "[鼠标拖拽/空格] 分类  [j/k] 导航  [n] 更多  [f] 筛选  [t] 主题  [R] 重置  [q] 退出",
        AppMode::Carrying { .. } => "[h/l] 选择目标  [Enter] 放下  [Esc] 取消",
        AppMode::Confirm(_) => "[y] 确认  [n] 取消",
    };

    let undo_style = if app.store.can_undo() {
        Style::default().fg(palette.fg)
    } else {
        Style::default().fg(palette.muted).add_modifier(Modifier::DIM)
    };

    let mut spans = vec![
        Span::styled(help_text, Style::default().fg(palette.muted)),
        Span::styled("  [u] 撤销", undo_style),
    ];
    if let Some(message) = app.message.as_deref() {
        spans.push(Span::styled(
            format!("  |  {message}"),
            Style::default().fg(palette.muted),
        ));
    }

    let help = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}

fn render_confirm_dialog(frame: &mut Frame, action: &ConfirmAction, palette: &Palette) {
    let area = centered_rect(50, 20, frame.area());
    let inner = render_dialog_framework(frame, area, "⚠️ 确认操作", palette.alert);

    let message = match action {
        ConfirmAction::Reset => "确认清空所有笑话和分类记录并重新获取？",
    };

    let dialog = Paragraph::new(format!("{message}\n\n[y] 确认  [n] 取消"))
        .style(Style::default().fg(palette.alert))
        .wrap(Wrap { trim: true });
    frame.render_widget(dialog, inner);
}

fn render_alert(frame: &mut Frame, alert: &str, palette: &Palette) {
    let area = centered_rect(60, 25, frame.area());
    let inner = render_dialog_framework(frame, area, "出错了", palette.alert);

    let body = Paragraph::new(format!("{alert}\n\n[Esc] 关闭  [n] 关闭后可重试"))
        .style(Style::default().fg(palette.alert))
        .wrap(Wrap { trim: true });
    frame.render_widget(body, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ratatui::{Terminal, backend::TestBackend};

    use crate::fetch::{Fetcher, StaticSource};
    use crate::gesture::{HitSurface, Point};
    use crate::models::Item;
    use crate::storage::MemoryStorage;
    use crate::store::SortingStore;
    use crate::theme::Theme;
    use crate::ui::actions::Action;

    fn app_with(items: &[(&str, &str)]) -> App {
        let mut store = SortingStore::new(Box::new(MemoryStorage::default()));
        store.ingest(items.iter().map(|(id, text)| Item::new(*id, *text)));
        let fetcher = Fetcher::new(Arc::new(StaticSource {
            batch: Vec::new(),
            fail: false,
        }));
        App::new(store, fetcher, Theme::Dark)
    }

    fn draw(terminal: &mut Terminal<TestBackend>, app: &mut App) {
        terminal.draw(|f| render(f, app)).unwrap();
    }

    /// 每行的文字，去掉空格（宽字符后面的占位格也是空格）
    fn screen_rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .replace(' ', "")
            })
            .collect()
    }

    #[test]
    fn test_drag_card_onto_rendered_target() {
        let mut app = app_with(&[("a", "Bad joke"), ("b", "Other joke")]);
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        draw(&mut terminal, &mut app);

        // 第一张卡片在左栏顶部，下半部分的目标是“无聊”
        let grab = Point::new(5, 5);
        let release = Point::new(50, 30);
        assert_eq!(app.hit_map.item_at(grab), Some("a"));
        assert_eq!(app.hit_map.target_under(release), Some("unfavorable"));

        app.dispatch(Action::PointerDown(grab));
        app.dispatch(Action::PointerMove(release));
        assert!(app.targets[1].is_active());
        draw(&mut terminal, &mut app);

        // 被拖动的卡片画在目标上方，命中测试时要把它排除
        assert_eq!(app.hit_map.item_at(release), Some("a"));
        assert_eq!(app.hit_map.marker_at(release), None);

        app.dispatch(Action::PointerUp(Some(release)));
        draw(&mut terminal, &mut app);

        assert_eq!(app.store.history().len(), 1);
        assert_eq!(app.store.history()[0].id, "a");
        assert_eq!(app.store.history()[0].reaction, Reaction::Unfavorable);
        assert_eq!(app.store.pending()[0].id, "b");
        assert!(app.gesture.is_none());
        assert_eq!(app.hit_map.item_at(grab), Some("b"));
    }

    #[test]
    fn test_summary_rows_show_reaction_label() {
        let mut app = app_with(&[("a", "Bad joke"), ("b", "Other joke")]);
        app.store.classify("a", Reaction::Unfavorable, 4);
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        draw(&mut terminal, &mut app);

        let rows = screen_rows(&terminal);
        let summary_row = rows
            .iter()
            .find(|row| row.contains("Badjoke"))
            .expect("classified joke is listed");
        assert!(summary_row.contains("4s"));
        assert!(summary_row.contains("无聊"));
        assert!(!rows.iter().any(|row| row.contains("还没有分类过的笑话")));
    }

    #[test]
    fn test_empty_summary_shows_hint() {
        let mut app = app_with(&[("a", "Bad joke")]);
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        draw(&mut terminal, &mut app);
        assert!(screen_rows(&terminal).iter().any(|row| row.contains("还没有分类过的笑话")));

        // 有记录但都被筛掉时提示换成筛选说明
        app.store.classify("a", Reaction::Unfavorable, 1);
        app.dispatch(Action::ToggleFilter);
        draw(&mut terminal, &mut app);
        let rows = screen_rows(&terminal);
        assert!(rows.iter().any(|row| row.contains("没有符合筛选的记录")));
        assert!(!rows.iter().any(|row| row.contains("Badjoke")));
    }
}
