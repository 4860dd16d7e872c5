//! Axis-aligned overlap tests between widget rectangles.

use crate::widget::Widget;
use kurbo::Rect;

/// Check whether two rectangles share a non-empty area.
///
/// Rectangles that only touch along an edge or a corner do not overlap.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Find the first widget whose stored bounds overlap `rect`.
///
/// With `exclude_self`, the widget whose id equals `candidate_id` is skipped so a
/// widget being dragged never collides with its own stale bounds.
pub fn first_overlap<'a>(
    candidate_id: Option<&str>,
    rect: Rect,
    widgets: &'a [Widget],
    exclude_self: bool,
) -> Option<&'a Widget> {
    widgets.iter().find(|existing| {
        if exclude_self && candidate_id == Some(existing.id()) {
            return false;
        }
        overlaps(rect, existing.rect())
    })
}

/// Check `rect` against every widget in `widgets`.
pub fn any_overlap(candidate_id: Option<&str>, rect: Rect, widgets: &[Widget], exclude_self: bool) -> bool {
    first_overlap(candidate_id, rect, widgets, exclude_self).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WidgetKind;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::from_origin_size((x, y), (w, h))
    }

    fn widget(id: &str, x: i32, y: i32, w: i32, h: i32) -> Widget {
        Widget::with_id(id, WidgetKind::Clock, x, y, w, h).unwrap()
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(a, rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!overlaps(a, rect(0.0, 10.0, 10.0, 10.0)));
        assert!(!overlaps(a, rect(10.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_overlap_detected() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(a, rect(5.0, 5.0, 10.0, 10.0)));
        assert!(overlaps(a, rect(2.0, 2.0, 2.0, 2.0)));
        assert!(overlaps(a, rect(9.5, 0.0, 10.0, 10.0)));
        assert!(!overlaps(a, rect(20.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let rects = [
            rect(0.0, 0.0, 10.0, 10.0),
            rect(10.0, 0.0, 10.0, 10.0),
            rect(5.0, 5.0, 1.0, 30.0),
            rect(-4.0, 3.5, 9.25, 2.0),
            rect(100.0, 100.0, 1.0, 1.0),
        ];
        for a in rects {
            for b in rects {
                assert_eq!(overlaps(a, b), overlaps(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_fractional_candidate_against_integer_bounds() {
        let widgets = [widget("a", 100, 100, 50, 50)];
        assert!(!any_overlap(None, rect(49.5, 100.0, 50.5, 10.0), &widgets, false));
        assert!(any_overlap(None, rect(49.5, 100.0, 50.75, 10.0), &widgets, false));
    }

    #[test]
    fn test_self_exclusion() {
        let widgets = [widget("me", 0, 0, 100, 100), widget("other", 300, 0, 100, 100)];
        let moved = rect(20.0, 20.0, 100.0, 100.0);

        assert!(!any_overlap(Some("me"), moved, &widgets, true));
        assert!(any_overlap(Some("me"), moved, &widgets, false));
        assert!(any_overlap(Some("me"), rect(250.0, 0.0, 100.0, 100.0), &widgets, true));
    }

    #[test]
    fn test_first_overlap_reports_widget() {
        let widgets = [widget("a", 0, 0, 10, 10), widget("b", 20, 0, 10, 10)];
        let hit = first_overlap(None, rect(25.0, 5.0, 2.0, 2.0), &widgets, false);
        assert_eq!(hit.map(Widget::id), Some("b"));
        assert!(first_overlap(None, rect(12.0, 0.0, 5.0, 5.0), &widgets, false).is_none());
    }

    #[test]
    fn test_empty_collection() {
        assert!(!any_overlap(None, rect(0.0, 0.0, 10.0, 10.0), &[], true));
    }
}
