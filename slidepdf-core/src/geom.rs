//! Integer geometry shared by the annotation engine, the presenter and the
//! paint seam. Coordinates are page-local pixels unless stated otherwise.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A size in fractional units (page sizes in points, 72 pt = 1 inch).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeF {
    pub width: f64,
    pub height: f64,
}

impl SizeF {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning the two corner points, normalized.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: a.x.max(b.x) - x,
            height: a.y.max(b.y) - y,
        }
    }

    pub fn of_size(size: Size) -> Self {
        Self {
            x: 0,
            y: 0,
            width: size.width as i32,
            height: size.height as i32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width.max(0) as u32, self.height.max(0) as u32)
    }

    pub fn contains(&self, point: Point) -> bool {
        !self.is_empty()
            && point.x >= self.x
            && point.x < self.right()
            && point.y >= self.y
            && point.y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn intersection(&self, other: &Rect) -> Rect {
        if !self.intersects(other) {
            return Rect::EMPTY;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Rect {
            x,
            y,
            width: self.right().min(other.right()) - x,
            height: self.bottom().min(other.bottom()) - y,
        }
    }

    /// Smallest rectangle covering both; an empty side contributes nothing.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Squared distance from `p` to the segment `a`-`b`, clamping the projection
/// parameter to the segment.
pub fn segment_distance_squared(a: Point, b: Point, p: Point) -> f64 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    let len = dx * dx + dy * dy;

    let dist = |qx: f64, qy: f64| {
        let ex = qx - p.x as f64;
        let ey = qy - p.y as f64;
        ex * ex + ey * ey
    };

    // Degenerate segment
    if len == 0.0 {
        return dist(a.x as f64, a.y as f64);
    }

    let t = ((p.x - a.x) as f64 * dx + (p.y - a.y) as f64 * dy) / len;
    if t <= 0.0 {
        return dist(a.x as f64, a.y as f64);
    }
    if t >= 1.0 {
        return dist(b.x as f64, b.y as f64);
    }
    dist(a.x as f64 + t * dx, a.y as f64 + t * dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_ignores_empty_rects() {
        let a = Rect::new(10, 10, 5, 5);
        assert_eq!(Rect::EMPTY.union(&a), a);
        assert_eq!(a.union(&Rect::EMPTY), a);

        let b = Rect::new(0, 0, 2, 2);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0, 0, 15, 15));
    }

    #[test]
    fn intersection_is_empty_for_disjoint_rects() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 10, 10);
        assert!(!a.intersects(&b));
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn distance_clamps_to_segment_endpoints() {
        let a = Point::new(0, 0);
        let b = Point::new(10, 0);

        // Beyond the end: distance to the endpoint, not the infinite line.
        let d = segment_distance_squared(a, b, Point::new(15, 0));
        assert_eq!(d, 25.0);

        // Orthogonal projection inside the segment.
        let d = segment_distance_squared(a, b, Point::new(5, 3));
        assert_eq!(d, 9.0);

        // Degenerate segment behaves like a point.
        let d = segment_distance_squared(a, a, Point::new(3, 4));
        assert_eq!(d, 25.0);
    }
}
