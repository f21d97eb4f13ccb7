//! 分类 Store
//!
//! `pending` 与 `history` 的唯一所有者，所有状态变更都经过这里，
//! 每次变更后保存完整快照。

use tracing::{debug, warn};

use crate::models::{ClassifiedItem, Item, Reaction, Snapshot};
use crate::storage::Persistence;

/// 启动时恢复的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// 快照已恢复
    Restored,
    /// 没有快照，需要初次抓取
    Empty,
    /// 快照无法解析，已丢弃（不自动抓取）
    Discarded,
}

pub struct SortingStore {
    state: Snapshot,
    persistence: Box<dyn Persistence>,
}

impl SortingStore {
    pub fn new(persistence: Box<dyn Persistence>) -> Self {
        Self {
            state: Snapshot::default(),
            persistence,
        }
    }

    /// 从持久化中恢复状态
    pub fn restore(persistence: Box<dyn Persistence>) -> (Self, RestoreOutcome) {
        let loaded = persistence.load();
        let mut store = Self::new(persistence);

        let outcome = match loaded {
            Ok(Some(snapshot)) => {
                debug!(
                    pending = snapshot.pending.len(),
                    history = snapshot.history.len(),
                    "restored snapshot"
                );
                store.state = snapshot;
                RestoreOutcome::Restored
            }
            Ok(None) => RestoreOutcome::Empty,
            Err(e) => {
                warn!(error = %e, "discarding unreadable snapshot");
                RestoreOutcome::Discarded
            }
        };

        (store, outcome)
    }

    pub fn pending(&self) -> &[Item] {
        &self.state.pending
    }

    pub fn history(&self) -> &[ClassifiedItem] {
        &self.state.history
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    pub fn can_undo(&self) -> bool {
        !self.state.history.is_empty()
    }

    /// 将条目从 pending 移到 history 最前面；id 不存在时什么都不做
    pub fn classify(&mut self, item_id: &str, reaction: Reaction, elapsed_seconds: u64) -> bool {
        let Some(pos) = self.state.pending.iter().position(|i| i.id == item_id) else {
            return false;
        };

        let mut pending = self.state.pending.clone();
        let item = pending.remove(pos);
        let mut history = Vec::with_capacity(self.state.history.len() + 1);
        history.push(ClassifiedItem::new(item, reaction, elapsed_seconds));
        history.extend(self.state.history.iter().cloned());

        self.state = Snapshot { pending, history };
        debug!(item_id, ?reaction, elapsed_seconds, "classified");
        self.persist();
        true
    }

    /// 撤销最近一次分类，条目回到 pending 最前面
    pub fn undo(&mut self) -> Option<Item> {
        let (latest, rest) = self.state.history.split_first()?;

        let item = latest.clone().into_item();
        let mut pending = Vec::with_capacity(self.state.pending.len() + 1);
        pending.push(item.clone());
        pending.extend(self.state.pending.iter().cloned());

        self.state = Snapshot {
            pending,
            history: rest.to_vec(),
        };
        debug!(item_id = %item.id, "undid classification");
        self.persist();
        Some(item)
    }

    /// 追加新条目，跳过 pending 中已有的 id；返回实际新增的数量
    pub fn ingest(&mut self, items: impl IntoIterator<Item = Item>) -> usize {
        let mut pending = self.state.pending.clone();
        let before = pending.len();

        for item in items {
            // 只与 pending 比较，history 中的 id 不参与去重
            if !pending.iter().any(|p| p.id == item.id) {
                pending.push(item);
            }
        }

        let added = pending.len() - before;
        self.state = Snapshot {
            pending,
            history: self.state.history.clone(),
        };
        debug!(added, "ingested batch");
        self.persist();
        added
    }

    /// 清空两个集合并删除已保存的快照
    pub fn reset(&mut self) {
        self.state = Snapshot::default();
        if let Err(e) = self.persistence.clear() {
            warn!(error = %e, "failed to clear snapshot");
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.persistence.save(&self.state) {
            warn!(error = %e, "failed to save snapshot");
        }
    }
}
