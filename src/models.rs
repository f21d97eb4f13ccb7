use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 反应类型（两个固定的分类桶）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Favorable,   // 好笑
    Unfavorable, // 不好笑
}

impl Reaction {
    pub const ALL: [Reaction; 2] = [Reaction::Favorable, Reaction::Unfavorable];

    /// 命中测试使用的稳定标记
    pub fn marker(self) -> &'static str {
        match self {
            Reaction::Favorable => "favorable",
            Reaction::Unfavorable => "unfavorable",
        }
    }

    pub fn from_marker(marker: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.marker() == marker)
    }

    pub fn label(self) -> &'static str {
        match self {
            Reaction::Favorable => "😂 好笑",
            Reaction::Unfavorable => "🙄 无聊",
        }
    }
}

/// 待分类的笑话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub text: String,
}

impl Item {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// 已分类的笑话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    pub id: String,
    pub text: String,
    pub reaction: Reaction,
    #[serde(default)]
    pub elapsed_seconds: u64,
}

impl ClassifiedItem {
    pub fn new(item: Item, reaction: Reaction, elapsed_seconds: u64) -> Self {
        Self {
            id: item.id,
            text: item.text,
            reaction,
            elapsed_seconds,
        }
    }

    /// 去掉分类信息，还原为待分类条目
    pub fn into_item(self) -> Item {
        Item {
            id: self.id,
            text: self.text,
        }
    }
}

/// 一次分类意图：由手势或放置目标产生，交给 Store 执行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyIntent {
    pub item_id: String,
    pub reaction: Reaction,
    pub elapsed_seconds: u64,
}

/// 完整的 Store 状态（同时也是持久化快照）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub pending: Vec<Item>,
    /// 最新的在前
    #[serde(default)]
    pub history: Vec<ClassifiedItem>,
}

/// TOML文件结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub meta: SnapshotMeta,
    #[serde(default)]
    pub pending: Vec<Item>,
    #[serde(default)]
    pub history: Vec<ClassifiedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub version: String,
    pub saved_at: DateTime<Local>,
}

impl SnapshotFile {
    pub const VERSION: &'static str = "1.0";

    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            meta: SnapshotMeta {
                version: Self::VERSION.to_string(),
                saved_at: Local::now(),
            },
            pending: snapshot.pending,
            history: snapshot.history,
        }
    }

    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            pending: self.pending,
            history: self.history,
        }
    }
}
