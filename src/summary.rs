//! 汇总视图：history 的纯投影，每次读取时重新计算

use crate::models::{ClassifiedItem, Reaction};

const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFilter {
    #[default]
    All,
    FavorableOnly,
}

impl SummaryFilter {
    pub fn toggle(self) -> Self {
        match self {
            SummaryFilter::All => SummaryFilter::FavorableOnly,
            SummaryFilter::FavorableOnly => SummaryFilter::All,
        }
    }

    pub fn accepts(self, item: &ClassifiedItem) -> bool {
        match self {
            SummaryFilter::All => true,
            SummaryFilter::FavorableOnly => item.reaction == Reaction::Favorable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub text: String,
    pub reaction: Reaction,
    pub elapsed_seconds: u64,
}

impl SummaryRow {
    pub fn elapsed_label(&self) -> String {
        format!("{}s", self.elapsed_seconds)
    }
}

/// 前 50 个字符，超出时追加 "..."
pub fn truncate_text(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// 按 history 顺序（最新在前）生成汇总行
pub fn summarize(
    history: &[ClassifiedItem],
    filter: SummaryFilter,
) -> impl Iterator<Item = SummaryRow> + Clone + '_ {
    history
        .iter()
        .filter(move |item| filter.accepts(item))
        .map(|item| SummaryRow {
            text: truncate_text(&item.text),
            reaction: item.reaction,
            elapsed_seconds: item.elapsed_seconds,
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub favorable: usize,
    pub unfavorable: usize,
}

impl Tally {
    pub fn get(&self, reaction: Reaction) -> usize {
        match reaction {
            Reaction::Favorable => self.favorable,
            Reaction::Unfavorable => self.unfavorable,
        }
    }
}

pub fn tally(history: &[ClassifiedItem]) -> Tally {
    history.iter().fold(Tally::default(), |mut t, item| {
        match item.reaction {
            Reaction::Favorable => t.favorable += 1,
            Reaction::Unfavorable => t.unfavorable += 1,
        }
        t
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;

    fn classified(id: &str, reaction: Reaction, secs: u64) -> ClassifiedItem {
        ClassifiedItem::new(Item::new(id, format!("joke {id}")), reaction, secs)
    }

    #[test]
    fn test_truncate_long_text() {
        let row = truncate_text(&"A".repeat(60));
        assert_eq!(row, format!("{}...", "A".repeat(50)));
    }

    #[test]
    fn test_truncate_keeps_short_and_exact_text() {
        assert_eq!(truncate_text("short"), "short");
        assert_eq!(truncate_text(&"B".repeat(50)), "B".repeat(50));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "笑".repeat(51);
        assert_eq!(truncate_text(&text), format!("{}...", "笑".repeat(50)));
    }

    #[test]
    fn test_scenario_row() {
        let history = vec![ClassifiedItem::new(
            Item::new("a", "A".repeat(60)),
            Reaction::Favorable,
            7,
        )];

        let rows: Vec<_> = summarize(&history, SummaryFilter::All).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text.chars().count(), 53);
        assert!(rows[0].text.ends_with("..."));
        assert_eq!(rows[0].elapsed_label(), "7s");
    }

    #[test]
    fn test_favorable_filter_is_ordered_subsequence() {
        let history = vec![
            classified("e", Reaction::Favorable, 1),
            classified("d", Reaction::Unfavorable, 2),
            classified("c", Reaction::Favorable, 3),
            classified("b", Reaction::Unfavorable, 4),
            classified("a", Reaction::Favorable, 5),
        ];

        let rows: Vec<_> = summarize(&history, SummaryFilter::FavorableOnly).collect();
        let secs: Vec<_> = rows.iter().map(|r| r.elapsed_seconds).collect();
        assert_eq!(secs, [1, 3, 5]);
        assert!(rows.iter().all(|r| r.reaction == Reaction::Favorable));
    }

    #[test]
    fn test_projection_is_restartable() {
        let history = vec![
            classified("b", Reaction::Unfavorable, 4),
            classified("a", Reaction::Favorable, 5),
        ];
        let rows = summarize(&history, SummaryFilter::All);

        let first: Vec<_> = rows.clone().collect();
        let second: Vec<_> = rows.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_tally() {
        let history = vec![
            classified("c", Reaction::Favorable, 1),
            classified("b", Reaction::Unfavorable, 2),
            classified("a", Reaction::Favorable, 3),
        ];
        let t = tally(&history);
        assert_eq!(t.get(Reaction::Favorable), 2);
        assert_eq!(t.get(Reaction::Unfavorable), 1);
    }
}
