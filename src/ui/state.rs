//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use std::time::Instant;

use super::hit_map::HitMap;
use crate::clock::ItemClocks;
use crate::drop_target::{DragPayload, DropTarget};
use crate::fetch::Fetcher;
use crate::gesture::GestureTracker;
use crate::models::Item;
use crate::store::SortingStore;
use crate::summary::SummaryFilter;
use crate::theme::Theme;

/// 应用状态
pub struct App {
    pub store: SortingStore,
    pub fetcher: Fetcher,
    pub clocks: ItemClocks,
    pub targets: [DropTarget; 2],
    /// 鼠标拖拽中的手势
    pub gesture: Option<GestureTracker>,
    pub hit_map: HitMap,
    pub selected_index: usize,
    pub mode: AppMode,
    pub filter: SummaryFilter,
    pub theme: Theme,
    pub default_theme: Theme,
    /// 可关闭的错误提示
    pub alert: Option<String>,
    pub message: Option<String>,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    /// 键盘拿起了一个条目，`target` 是当前悬停的目标下标
    Carrying { payload: DragPayload, target: usize },
    Confirm(ConfirmAction),
}

/// 确认操作类型
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    Reset,
}

impl App {
    /// 创建新的应用实例
    pub fn new(store: SortingStore, fetcher: Fetcher, theme: Theme) -> Self {
        let mut app = Self {
            store,
            fetcher,
            clocks: ItemClocks::new(),
            targets: DropTarget::pair(),
            gesture: None,
            hit_map: HitMap::new(),
            selected_index: 0,
            mode: AppMode::Normal,
            filter: SummaryFilter::default(),
            theme,
            default_theme: theme,
            alert: None,
            message: None,
        };
        app.refresh_pending(Instant::now());
        app
    }

    /// 同步条目计时并确保选中索引有效
    pub fn refresh_pending(&mut self, now: Instant) {
        let pending = self.store.pending();
        self.clocks.sync(pending.iter().map(|i| i.id.as_str()), now);

        if pending.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= pending.len() {
            self.selected_index = pending.len() - 1;
        }
    }

    /// 获取当前选中的条目
    pub fn selected_item(&self) -> Option<&Item> {
        self.store.pending().get(self.selected_index)
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.is_loading()
    }

    /// 正在被拖拽或携带的条目
    pub fn dragged_item_id(&self) -> Option<&str> {
        match &self.mode {
            AppMode::Carrying { payload, .. } => Some(payload.item_id.as_str()),
            _ => self
                .gesture
                .as_ref()
                .filter(|g| g.is_dragging())
                .map(|g| g.item_id()),
        }
    }
}
