//! 放置目标
//!
//! 两个固定的反应桶。目标本身不修改 Store，只向上产生分类意图。

use crate::clock::parse_elapsed;
use crate::models::{ClassifyIntent, Reaction};

/// 随拖拽一起携带的数据，计时值以原始字符串形式传递
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub item_id: String,
    pub elapsed: Option<String>,
}

impl DragPayload {
    pub fn new(item_id: impl Into<String>, elapsed_seconds: u64) -> Self {
        Self {
            item_id: item_id.into(),
            elapsed: Some(elapsed_seconds.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    reaction: Reaction,
    active: bool,
}

impl DropTarget {
    pub fn new(reaction: Reaction) -> Self {
        Self {
            reaction,
            active: false,
        }
    }

    /// 固定的两个目标，顺序与界面一致
    pub fn pair() -> [DropTarget; 2] {
        Reaction::ALL.map(DropTarget::new)
    }

    pub fn reaction(&self) -> Reaction {
        self.reaction
    }

    /// 供命中测试查询的标记
    pub fn marker(&self) -> &'static str {
        self.reaction.marker()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn enter(&mut self) {
        self.active = true;
    }

    pub fn leave(&mut self) {
        self.active = false;
    }

    pub fn drop_payload(&mut self, payload: &DragPayload) -> Option<ClassifyIntent> {
        self.active = false;

        if payload.item_id.is_empty() {
            return None;
        }

        Some(ClassifyIntent {
            item_id: payload.item_id.clone(),
            reaction: self.reaction,
            elapsed_seconds: parse_elapsed(payload.elapsed.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_flag() {
        let mut target = DropTarget::new(Reaction::Favorable);
        assert!(!target.is_active());

        target.enter();
        assert!(target.is_active());
        target.leave();
        assert!(!target.is_active());
    }

    #[test]
    fn test_drop_emits_intent_and_clears_hover() {
        let mut target = DropTarget::new(Reaction::Unfavorable);
        target.enter();

        let intent = target.drop_payload(&DragPayload::new("abc", 12));

        assert!(!target.is_active());
        assert_eq!(
            intent,
            Some(ClassifyIntent {
                item_id: "abc".to_string(),
                reaction: Reaction::Unfavorable,
                elapsed_seconds: 12,
            })
        );
    }

    #[test]
    fn test_bad_elapsed_defaults_to_zero() {
        let mut target = DropTarget::new(Reaction::Favorable);

        let missing = DragPayload {
            item_id: "a".to_string(),
            elapsed: None,
        };
        let garbage = DragPayload {
            item_id: "a".to_string(),
            elapsed: Some("soon".to_string()),
        };

        assert_eq!(target.drop_payload(&missing).map(|i| i.elapsed_seconds), Some(0));
        assert_eq!(target.drop_payload(&garbage).map(|i| i.elapsed_seconds), Some(0));
    }

    #[test]
    fn test_drop_without_item_is_ignored() {
        let mut target = DropTarget::new(Reaction::Favorable);
        target.enter();

        assert_eq!(target.drop_payload(&DragPayload::new("", 3)), None);
        assert!(!target.is_active());
    }

    #[test]
    fn test_pair_markers() {
        let [fav, unfav] = DropTarget::pair();
        assert_eq!(fav.marker(), "favorable");
        assert_eq!(unfav.marker(), "unfavorable");
    }
}
