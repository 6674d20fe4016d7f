use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Floating tooltip placement: right of and above the pointer, kept inside the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tooltip {
    pub offset: Point,
}

impl Default for Tooltip {
    fn default() -> Self {
        Self {
            offset: Point::new(10.0, -28.0),
        }
    }
}

impl Tooltip {
    pub fn place(&self, pointer: Point, size: Size, bounds: Rect) -> Point {
        Point::new(
            clamp_axis(pointer.x + self.offset.x, size.width, bounds.x, bounds.width),
            clamp_axis(pointer.y + self.offset.y, size.height, bounds.y, bounds.height),
        )
    }
}

// A tooltip larger than the bounds is pinned to the near edge.
fn clamp_axis(pos: f64, extent: f64, origin: f64, span: f64) -> f64 {
    let max = origin + (span - extent).max(0.0);
    pos.clamp(origin, max)
}

/// Which mark is under the pointer, and where the tooltip goes.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverState<T> {
    pub target: Option<T>,
    pub position: Option<Point>,
}

impl<T> Default for HoverState<T> {
    fn default() -> Self {
        Self {
            target: None,
            position: None,
        }
    }
}

impl<T: PartialEq> HoverState<T> {
    pub fn enter(&mut self, target: T, position: Point) {
        self.target = Some(target);
        self.position = Some(position);
    }

    /// Only moves while something is hovered.
    pub fn move_to(&mut self, position: Point) {
        if self.target.is_some() {
            self.position = Some(position);
        }
    }

    pub fn leave(&mut self) {
        self.target = None;
        self.position = None;
    }

    pub fn is_hovering(&self, target: &T) -> bool {
        self.target.as_ref() == Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_from_pointer_inside_bounds() {
        let tip = Tooltip::default();
        let bounds = Rect::new(0.0, 0.0, 900.0, 400.0);
        let at = tip.place(Point::new(100.0, 100.0), Size::new(50.0, 20.0), bounds);
        assert_eq!(at, Point::new(110.0, 72.0));
    }

    #[test]
    fn test_clamped_to_right_and_top_edges() {
        let tip = Tooltip::default();
        let bounds = Rect::new(0.0, 0.0, 300.0, 200.0);
        let at = tip.place(Point::new(290.0, 5.0), Size::new(80.0, 40.0), bounds);
        assert_eq!(at, Point::new(220.0, 0.0));
    }

    #[test]
    fn test_oversized_tooltip_pins_to_origin() {
        let tip = Tooltip::default();
        let bounds = Rect::new(20.0, 30.0, 100.0, 100.0);
        let at = tip.place(Point::new(50.0, 50.0), Size::new(500.0, 500.0), bounds);
        assert_eq!(at, Point::new(20.0, 30.0));
    }

    #[test]
    fn test_hover_lifecycle() {
        let mut hover: HoverState<&str> = HoverState::default();
        hover.move_to(Point::new(1.0, 1.0));
        assert!(hover.position.is_none());

        hover.enter("rock", Point::new(5.0, 5.0));
        hover.move_to(Point::new(7.0, 9.0));
        assert!(hover.is_hovering(&"rock"));
        assert_eq!(hover.position, Some(Point::new(7.0, 9.0)));

        hover.leave();
        assert!(!hover.is_hovering(&"rock"));
        assert!(hover.position.is_none());
    }

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(10.0, 0.0)));
        assert!(!r.contains(Point::new(10.1, 5.0)));
    }
}
