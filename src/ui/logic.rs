//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑；所有状态变更最终都经过 SortingStore 的操作

use std::time::Instant;

use tracing::{info, warn};

use super::actions::Action;
use super::state::{App, AppMode, ConfirmAction};
use crate::drop_target::DragPayload;
use crate::gesture::{GestureTracker, Point};
use crate::models::{ClassifyIntent, Reaction};

impl App {
    /// 核心逻辑分发
    pub fn dispatch(&mut self, action: Action) -> bool {
        self.dispatch_at(action, Instant::now())
    }

    pub fn dispatch_at(&mut self, action: Action, now: Instant) -> bool {
        match action {
            Action::Quit => return true,
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            Action::PickUp => self.pick_up(now),
            Action::HoverPrev => self.hover_step(false),
            Action::HoverNext => self.hover_step(true),
            Action::Drop => self.drop_carried(now),

            Action::PointerDown(point) => self.pointer_down(point, now),
            Action::PointerMove(point) => self.pointer_move(point),
            Action::PointerUp(point) => self.pointer_up(point, now),
            Action::PointerCancel => self.pointer_cancel(),

            Action::Undo => self.undo(now),
            Action::FetchMore => self.fetcher.request(),
            Action::ToggleTheme => self.theme = self.theme.toggle(),
            Action::ToggleFilter => self.filter = self.filter.toggle(),
            Action::StartReset => self.mode = AppMode::Confirm(ConfirmAction::Reset),
            Action::DismissAlert => self.alert = None,

            Action::Cancel => self.cancel(),
            Action::Submit => {
                if let AppMode::Confirm(_) = self.mode {
                    self.execute_confirm(now);
                }
            }
        }
        false
    }

    /// 每次事件循环调用：收取抓取结果并推进条目计时
    pub fn tick(&mut self, now: Instant) {
        for result in self.fetcher.poll() {
            match result {
                Ok(batch) => {
                    let added = self.store.ingest(batch);
                    info!(added, "joke batch arrived");
                }
                Err(e) => {
                    warn!(error = %e, "joke fetch failed");
                    self.alert = Some(format!("获取笑话失败：{e}"));
                }
            }
        }
        self.refresh_pending(now);
    }

    // ============ 导航相关 ============

    /// 向上移动选择
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.store.pending().len() {
            self.selected_index += 1;
        }
    }

    // ============ 键盘拖放 ============

    /// 拿起选中的条目，计时随载荷一起携带
    pub fn pick_up(&mut self, now: Instant) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let payload = DragPayload::new(item.id.clone(), self.clocks.elapsed(&item.id, now));

        self.targets[0].enter();
        self.mode = AppMode::Carrying { payload, target: 0 };
    }

    fn hover_step(&mut self, forward: bool) {
        let AppMode::Carrying { target, .. } = &mut self.mode else {
            return;
        };
        let count = self.targets.len();
        self.targets[*target].leave();
        *target = if forward {
            (*target + 1) % count
        } else {
            (*target + count - 1) % count
        };
        self.targets[*target].enter();
    }

    /// 放到当前悬停的目标上
    pub fn drop_carried(&mut self, now: Instant) {
        if !matches!(self.mode, AppMode::Carrying { .. }) {
            return;
        }
        let AppMode::Carrying { payload, target } = std::mem::replace(&mut self.mode, AppMode::Normal)
        else {
            return;
        };
        if let Some(intent) = self.targets[target].drop_payload(&payload) {
            self.apply_intent(intent, now);
        }
    }

    // ============ 鼠标拖拽 ============

    pub fn pointer_down(&mut self, point: Point, now: Instant) {
        let Some(item_id) = self.hit_map.item_at(point).map(str::to_string) else {
            return;
        };
        if let Some(index) = self.store.pending().iter().position(|i| i.id == item_id) {
            self.selected_index = index;
        }

        let appeared_at = self.clocks.appeared_at(&item_id).unwrap_or(now);
        let mut tracker = GestureTracker::new(item_id, appeared_at);
        tracker.begin(point);
        self.gesture = Some(tracker);
    }

    pub fn pointer_move(&mut self, point: Point) {
        let Some(tracker) = self.gesture.as_mut() else {
            return;
        };
        tracker.move_to(point);

        let hovered = self.hit_map.target_under(point);
        for target in &mut self.targets {
            if Some(target.marker()) == hovered {
                target.enter();
            } else {
                target.leave();
            }
        }
    }

    /// 松开：在释放点做命中测试
    pub fn pointer_up(&mut self, point: Option<Point>, now: Instant) {
        let Some(mut tracker) = self.gesture.take() else {
            return;
        };
        let intent = tracker.end(point, &mut self.hit_map, now);
        self.clear_hover();

        if let Some(intent) = intent {
            self.apply_intent(intent, now);
        }
    }

    pub fn pointer_cancel(&mut self) {
        if let Some(mut tracker) = self.gesture.take() {
            tracker.cancel();
        }
        self.clear_hover();
    }

    fn clear_hover(&mut self) {
        for target in &mut self.targets {
            target.leave();
        }
    }

    // ============ Store 操作 ============

    /// 执行分类意图；未知条目静默忽略
    pub fn apply_intent(&mut self, intent: ClassifyIntent, now: Instant) {
        let ClassifyIntent {
            item_id,
            reaction,
            elapsed_seconds,
        } = intent;

        if self.store.classify(&item_id, reaction, elapsed_seconds) {
            self.message = Some(format!("已归入 {}（{}s）", reaction.label(), elapsed_seconds));
            self.refresh_pending(now);
        }
    }

    pub fn undo(&mut self, now: Instant) {
        if let Some(item) = self.store.undo() {
            self.selected_index = 0;
            self.refresh_pending(now);
            self.message = Some(format!("已撤销：{}", crate::summary::truncate_text(&item.text)));
        }
    }

    /// 执行确认操作
    pub fn execute_confirm(&mut self, now: Instant) {
        if let AppMode::Confirm(ConfirmAction::Reset) = self.mode {
            self.store.reset();
            self.clocks.clear();
            self.pointer_cancel();
            self.theme = self.default_theme;
            self.alert = None;
            self.refresh_pending(now);
            self.fetcher.request();
            self.message = Some("已重置，正在重新获取".to_string());
        }
        self.mode = AppMode::Normal;
    }

    // ============ 通用操作 ============

    /// 取消当前操作
    pub fn cancel(&mut self) {
        self.clear_hover();
        self.mode = AppMode::Normal;
        self.message = None;
    }

    pub fn tally_for(&self, reaction: Reaction) -> usize {
        crate::summary::tally(self.store.history()).get(reaction)
    }
}
