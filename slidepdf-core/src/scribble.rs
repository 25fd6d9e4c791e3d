//! Freehand annotation storage and rendering. Coordinates are page-local so
//! a scribble stays valid across views with different target offsets.

use crate::canvas::{Canvas, Color};
use crate::geom::{segment_distance_squared, Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Line {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    color: Color,
    width: u32,
}

impl Line {
    fn bounding_box(&self) -> Rect {
        let pad = 2 * self.width as i32;
        let min_x = self.x1.min(self.x2) - pad;
        let min_y = self.y1.min(self.y2) - pad;
        let max_x = self.x1.max(self.x2) + pad;
        let max_y = self.y1.max(self.y2) + pad;
        Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }

    fn distance_to_squared(&self, x: i32, y: i32) -> f64 {
        segment_distance_squared(
            Point::new(self.x1, self.y1),
            Point::new(self.x2, self.y2),
            Point::new(x, y),
        )
    }

    fn same_style(&self, other: &Line) -> bool {
        self.width == other.width && self.color == other.color
    }

    fn chains_from(&self, previous: &Line) -> bool {
        self.x1 == previous.x2 && self.y1 == previous.y2 && self.same_style(previous)
    }
}

/// A collection of hand-drawn line segments for one page (or the scratch
/// layer). Insertion order drives stroke batching; erasure removes by
/// swap-and-pop, so batching after an erase is best-effort (possibly more
/// draw calls, never different pixels).
#[derive(Debug, Default)]
pub struct Scribble {
    lines: Vec<Line>,
}

impl Scribble {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Appends a line and returns the region to repaint.
    pub fn draw_line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        width: u32,
        color: Color,
    ) -> Rect {
        let line = Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width,
        };
        let bb = line.bounding_box();
        self.lines.push(line);
        bb
    }

    /// Removes every line whose distance from either endpoint of the erase
    /// stroke is within `width`, returning the union of their bounding boxes
    /// (empty when nothing was removed).
    pub fn erase_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, width: u32) -> Rect {
        let width_sq = (width as f64) * (width as f64);
        let probe = Line {
            x1,
            y1,
            x2,
            y2,
            color: Color::BLACK,
            width,
        };
        let probe_bb = probe.bounding_box();

        let mut removed = Rect::EMPTY;
        let mut index = 0;
        while index < self.lines.len() {
            let line = self.lines[index];
            // Broad phase: skip lines whose boxes cannot touch the stroke.
            if !probe_bb.intersects(&line.bounding_box()) {
                index += 1;
                continue;
            }

            let d = line
                .distance_to_squared(x1, y1)
                .min(line.distance_to_squared(x2, y2));
            if d <= width_sq {
                removed = removed.union(&line.bounding_box());
                self.lines.swap_remove(index);
            } else {
                index += 1;
            }
        }

        removed
    }

    /// Draws all lines, batching maximal same-style endpoint-chained runs
    /// into single polylines. Purely a draw-call optimization; stored data
    /// is untouched.
    pub fn paint(&self, canvas: &mut dyn Canvas, origin: Point) {
        let mut index = 0;
        while index < self.lines.len() {
            let first = self.lines[index];

            let mut end = index + 1;
            while end < self.lines.len() && self.lines[end].chains_from(&self.lines[end - 1]) {
                end += 1;
            }

            let mut points = Vec::with_capacity(end - index + 1);
            for line in &self.lines[index..end] {
                points.push(Point::new(line.x1 + origin.x, line.y1 + origin.y));
            }
            let last = self.lines[end - 1];
            points.push(Point::new(last.x2 + origin.x, last.y2 + origin.y));
            canvas.polyline(&points, first.width, first.color);

            index = end;
        }
    }
}
