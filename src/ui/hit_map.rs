//! 命中测试区域
//!
//! 每帧渲染时重建，后登记的区域位于上层。

use std::collections::HashSet;

use ratatui::layout::{Position, Rect};

use crate::gesture::{HitSurface, Point};

#[derive(Debug, Clone, PartialEq, Eq)]
enum RegionKind {
    Item(String),
    Target(&'static str),
}

#[derive(Debug, Clone)]
struct Region {
    area: Rect,
    kind: RegionKind,
}

#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<Region>,
    hidden: HashSet<String>,
}

fn contains(area: Rect, point: Point) -> bool {
    match (u16::try_from(point.x), u16::try_from(point.y)) {
        (Ok(x), Ok(y)) => area.contains(Position { x, y }),
        _ => false,
    }
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始新的一帧
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn push_item(&mut self, area: Rect, item_id: &str) {
        self.regions.push(Region {
            area,
            kind: RegionKind::Item(item_id.to_string()),
        });
    }

    pub fn push_target(&mut self, area: Rect, marker: &'static str) {
        self.regions.push(Region {
            area,
            kind: RegionKind::Target(marker),
        });
    }

    fn topmost(&self, point: Point) -> Option<&Region> {
        self.regions.iter().rev().find(|r| {
            let hidden = matches!(&r.kind, RegionKind::Item(id) if self.hidden.contains(id));
            !hidden && contains(r.area, point)
        })
    }

    /// 指针按下时找到的条目
    pub fn item_at(&self, point: Point) -> Option<&str> {
        match &self.topmost(point)?.kind {
            RegionKind::Item(id) => Some(id.as_str()),
            RegionKind::Target(_) => None,
        }
    }

    /// 只看放置目标，忽略所有条目；用于拖拽中的悬停高亮
    pub fn target_under(&self, point: Point) -> Option<&'static str> {
        self.regions.iter().rev().find_map(|r| match r.kind {
            RegionKind::Target(marker) if contains(r.area, point) => Some(marker),
            _ => None,
        })
    }
}

impl HitSurface for HitMap {
    fn set_hit_testable(&mut self, item_id: &str, testable: bool) {
        if testable {
            self.hidden.remove(item_id);
        } else {
            self.hidden.insert(item_id.to_string());
        }
    }

    fn marker_at(&self, point: Point) -> Option<String> {
        match &self.topmost(point)?.kind {
            RegionKind::Target(marker) => Some((*marker).to_string()),
            RegionKind::Item(_) => None,
        }
    }
}
