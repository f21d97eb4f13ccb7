//! 条目计时
//!
//! 每个可见条目记录出现时刻，读数按整秒向下取整。

use std::collections::HashMap;
use std::time::Instant;

/// 从出现到 `now` 经过的整秒数，不会为负
pub fn elapsed_seconds(appeared_at: Instant, now: Instant) -> u64 {
    now.saturating_duration_since(appeared_at).as_secs()
}

/// 解析随拖拽携带的原始计时值，无法解析时为 0
pub fn parse_elapsed(raw: Option<&str>) -> u64 {
    let Some(raw) = raw.map(str::trim) else {
        return 0;
    };
    if let Ok(secs) = raw.parse::<u64>() {
        return secs;
    }
    match raw.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => secs.floor() as u64,
        _ => 0,
    }
}

/// 每个可见条目各自的出现时刻
#[derive(Debug, Default)]
pub struct ItemClocks {
    appeared: HashMap<String, Instant>,
}

impl ItemClocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 与当前可见的 id 同步：新条目开始计时，消失的条目停止计时
    pub fn sync<'a>(&mut self, visible_ids: impl IntoIterator<Item = &'a str>, now: Instant) {
        let mut next = HashMap::new();
        for id in visible_ids {
            let started = self.appeared.get(id).copied().unwrap_or(now);
            next.insert(id.to_string(), started);
        }
        self.appeared = next;
    }

    pub fn appeared_at(&self, id: &str) -> Option<Instant> {
        self.appeared.get(id).copied()
    }

    /// 未计时的条目读数为 0
    pub fn elapsed(&self, id: &str, now: Instant) -> u64 {
        self.appeared_at(id)
            .map(|t| elapsed_seconds(t, now))
            .unwrap_or(0)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.appeared.len()
    }

    pub fn clear(&mut self) {
        self.appeared.clear();
    }
}
