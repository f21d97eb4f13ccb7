//! 拖拽手势
//!
//! 指针位移的计算是纯函数，松开时通过宿主提供的 [`HitSurface`]
//! 找到释放点下方的放置目标。

use std::time::Instant;

use tracing::trace;

use crate::clock::elapsed_seconds;
use crate::models::{ClassifyIntent, Reaction};

/// 屏幕坐标（终端的列/行）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// 相对于起点的位移，只用于视觉反馈
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Displacement {
    pub dx: i32,
    pub dy: i32,
}

impl Displacement {
    pub fn between(start: Point, current: Point) -> Self {
        Self {
            dx: current.x - start.x,
            dy: current.y - start.y,
        }
    }

    #[allow(dead_code)]
    pub fn is_neutral(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// 宿主渲染层提供的命中测试
pub trait HitSurface {
    /// 拖拽中的条目在命中测试时需要对自己“隐身”
    fn set_hit_testable(&mut self, item_id: &str, testable: bool);

    /// 返回该点最上层元素所带的反应标记
    fn marker_at(&self, point: Point) -> Option<String>;
}

/// 在作用域内让条目不可命中，离开作用域时恢复
struct Unhittable<'a, S: HitSurface + ?Sized> {
    surface: &'a mut S,
    item_id: &'a str,
}

impl<'a, S: HitSurface + ?Sized> Unhittable<'a, S> {
    fn new(surface: &'a mut S, item_id: &'a str) -> Self {
        surface.set_hit_testable(item_id, false);
        Self { surface, item_id }
    }

    fn marker_at(&self, point: Point) -> Option<String> {
        self.surface.marker_at(point)
    }
}

impl<S: HitSurface + ?Sized> Drop for Unhittable<'_, S> {
    fn drop(&mut self) {
        self.surface.set_hit_testable(self.item_id, true);
    }
}

/// 单个条目的指针拖拽跟踪
#[derive(Debug, Clone)]
pub struct GestureTracker {
    item_id: String,
    appeared_at: Instant,
    start: Option<Point>,
    offset: Displacement,
}

impl GestureTracker {
    pub fn new(item_id: impl Into<String>, appeared_at: Instant) -> Self {
        Self {
            item_id: item_id.into(),
            appeared_at,
            start: None,
            offset: Displacement::default(),
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    pub fn displacement(&self) -> Displacement {
        self.offset
    }

    pub fn begin(&mut self, point: Point) {
        self.start = Some(point);
        self.offset = Displacement::default();
    }

    pub fn move_to(&mut self, point: Point) -> Displacement {
        if let Some(start) = self.start {
            self.offset = Displacement::between(start, point);
        }
        self.offset
    }

    /// 结束手势；没有释放点或没有命中目标时不产生意图
    pub fn end<S: HitSurface + ?Sized>(
        &mut self,
        point: Option<Point>,
        surface: &mut S,
        now: Instant,
    ) -> Option<ClassifyIntent> {
        let started = self.start.take();
        self.offset = Displacement::default();

        started?;
        let point = point?;

        let marker = {
            let guard = Unhittable::new(surface, &self.item_id);
            guard.marker_at(point)
        };
        trace!(item_id = %self.item_id, ?point, ?marker, "gesture released");

        let reaction = Reaction::from_marker(&marker?)?;
        Some(ClassifyIntent {
            item_id: self.item_id.clone(),
            reaction,
            elapsed_seconds: elapsed_seconds(self.appeared_at, now),
        })
    }

    /// 被宿主取消（例如失去焦点），恢复中立状态
    pub fn cancel(&mut self) {
        self.start = None;
        self.offset = Displacement::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    /// 左半边是 favorable 目标，(5,5) 处是被拖拽的条目本身
    #[derive(Default)]
    struct FakeSurface {
        hidden: HashSet<String>,
        bogus_marker: bool,
    }

    impl HitSurface for FakeSurface {
        fn set_hit_testable(&mut self, item_id: &str, testable: bool) {
            if testable {
                self.hidden.remove(item_id);
            } else {
                self.hidden.insert(item_id.to_string());
            }
        }

        fn marker_at(&self, point: Point) -> Option<String> {
            if point == Point::new(5, 5) && !self.hidden.contains("joke") {
                return None;
            }
            if self.bogus_marker {
                return Some("sideways".to_string());
            }
            (point.x < 10).then(|| "favorable".to_string())
        }
    }

    impl FakeSurface {
        fn is_hidden(&self) -> bool {
            self.hidden.contains("joke")
        }
    }

    #[test]
    fn test_move_reports_displacement() {
        let mut tracker = GestureTracker::new("joke", Instant::now());
        tracker.begin(Point::new(10, 4));
        assert!(tracker.is_dragging());

        assert_eq!(tracker.move_to(Point::new(3, 6)), Displacement { dx: -7, dy: 2 });
        assert_eq!(tracker.displacement(), Displacement { dx: -7, dy: 2 });
    }

    #[test]
    fn test_move_before_begin_is_neutral() {
        let mut tracker = GestureTracker::new("joke", Instant::now());
        assert!(tracker.move_to(Point::new(3, 6)).is_neutral());
    }

    #[test]
    fn test_drop_over_target_emits_intent() {
        let t0 = Instant::now();
        let mut tracker = GestureTracker::new("joke", t0);
        let mut surface = FakeSurface::default();

        tracker.begin(Point::new(20, 2));
        tracker.move_to(Point::new(4, 2));
        let intent = tracker.end(
            Some(Point::new(4, 2)),
            &mut surface,
            t0 + Duration::from_millis(7_400),
        );

        assert_eq!(
            intent,
            Some(ClassifyIntent {
                item_id: "joke".to_string(),
                reaction: Reaction::Favorable,
                elapsed_seconds: 7,
            })
        );
        assert!(!tracker.is_dragging());
        assert!(tracker.displacement().is_neutral());
        assert!(!surface.is_hidden());
    }

    #[test]
    fn test_dragged_item_does_not_hit_itself() {
        let mut tracker = GestureTracker::new("joke", Instant::now());
        let mut surface = FakeSurface::default();
        assert_eq!(surface.marker_at(Point::new(5, 5)), None);

        tracker.begin(Point::new(5, 5));
        let intent = tracker.end(Some(Point::new(5, 5)), &mut surface, Instant::now());

        assert_eq!(intent.map(|i| i.reaction), Some(Reaction::Favorable));
        assert!(!surface.is_hidden());
    }

    #[test]
    fn test_release_outside_targets_resets() {
        let mut tracker = GestureTracker::new("joke", Instant::now());
        let mut surface = FakeSurface::default();

        tracker.begin(Point::new(20, 2));
        tracker.move_to(Point::new(30, 9));
        let intent = tracker.end(Some(Point::new(30, 9)), &mut surface, Instant::now());

        assert_eq!(intent, None);
        assert!(tracker.displacement().is_neutral());
        assert!(!tracker.is_dragging());
        assert!(!surface.is_hidden());
    }

    #[test]
    fn test_unknown_marker_restores_hit_testing() {
        let mut tracker = GestureTracker::new("joke", Instant::now());
        let mut surface = FakeSurface {
            bogus_marker: true,
            ..Default::default()
        };

        tracker.begin(Point::new(1, 1));
        assert_eq!(tracker.end(Some(Point::new(1, 1)), &mut surface, Instant::now()), None);
        assert!(!surface.is_hidden());
    }

    #[test]
    fn test_end_without_pointer_or_begin_is_noop() {
        let mut tracker = GestureTracker::new("joke", Instant::now());
        let mut surface = FakeSurface::default();

        assert_eq!(tracker.end(Some(Point::new(1, 1)), &mut surface, Instant::now()), None);

        tracker.begin(Point::new(1, 1));
        tracker.move_to(Point::new(2, 2));
        assert_eq!(tracker.end(None, &mut surface, Instant::now()), None);
        assert!(tracker.displacement().is_neutral());
        assert!(!tracker.is_dragging());
        assert!(!surface.is_hidden());
    }

    #[test]
    fn test_elapsed_is_not_reset_by_failed_attempts() {
        let t0 = Instant::now();
        let mut tracker = GestureTracker::new("joke", t0);
        let mut surface = FakeSurface::default();

        tracker.begin(Point::new(20, 2));
        tracker.end(Some(Point::new(30, 2)), &mut surface, t0 + Duration::from_secs(3));

        tracker.begin(Point::new(20, 2));
        let intent = tracker.end(Some(Point::new(2, 2)), &mut surface, t0 + Duration::from_secs(11));
        assert_eq!(intent.map(|i| i.elapsed_seconds), Some(11));
    }
}
