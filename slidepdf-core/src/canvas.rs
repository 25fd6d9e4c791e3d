//! The paint seam between the presenter and whatever actually puts pixels on
//! a display, plus a software RGBA implementation used by the tty shell and
//! by tests.

use crate::geom::{segment_distance_squared, Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const GREEN: Color = Color::new(0, 160, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A borrowed view of RGBA8 pixel data. The bytes live in the render cache
/// (or any other backing store); the view never owns them.
#[derive(Debug, Clone, Copy)]
pub struct BitmapView<'a> {
    pub width: u32,
    pub height: u32,
    /// Bytes per row; at least `4 * width`.
    pub stride: usize,
    pub pixels: &'a [u8],
}

/// Read access to the rendered pages of one document. Implemented by the
/// render pipeline's handle; `None` means "not rendered yet", never an error.
pub trait PageStore {
    fn page_count(&self) -> usize;
    fn page(&self, index: usize) -> Option<BitmapView<'_>>;
    fn thumbnail(&self, index: usize) -> Option<BitmapView<'_>>;
    fn dimmed_thumbnail(&self, index: usize) -> Option<BitmapView<'_>>;
}

/// Drawing operations the presenter needs from a view surface.
pub trait Canvas {
    fn viewport(&self) -> Rect;
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn blit(&mut self, origin: Point, bitmap: BitmapView<'_>);
    fn polyline(&mut self, points: &[Point], width: u32, color: Color);
    fn text_extent(&self, text: &str) -> Size;
    fn draw_text(&mut self, origin: Point, text: &str);
}

/// Fixed cell metrics used for text extents in the software canvas.
pub const GLYPH_WIDTH: u32 = 8;
pub const GLYPH_HEIGHT: u32 = 16;

const BYTES_PER_PIXEL: usize = 4;

/// An in-memory RGBA frame. Text is not rasterized; the shell collects the
/// recorded strings and places them with the terminal's own font.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    texts: Vec<(Point, String)>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0; width as usize * height as usize * BYTES_PER_PIXEL];
        for px in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
            texts: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Strings recorded by `draw_text` since the last call, with origins.
    pub fn take_texts(&mut self) -> Vec<(Point, String)> {
        std::mem::take(&mut self.texts)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        self.pixels[idx] = color.r;
        self.pixels[idx + 1] = color.g;
        self.pixels[idx + 2] = color.b;
        self.pixels[idx + 3] = 255;
    }

    fn draw_segment(&mut self, a: Point, b: Point, width: u32, color: Color) {
        let half = (width.max(1) as f64) / 2.0;
        let pad = half.ceil() as i32;
        let x0 = (a.x.min(b.x) - pad).max(0);
        let x1 = (a.x.max(b.x) + pad).min(self.width as i32 - 1);
        let y0 = (a.y.min(b.y) - pad).max(0);
        let y1 = (a.y.max(b.y) + pad).min(self.height as i32 - 1);
        let limit = half * half;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if segment_distance_squared(a, b, Point::new(x, y)) <= limit {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }
}

impl Canvas for FrameBuffer {
    fn viewport(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let clipped = rect.intersection(&self.viewport());
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set_pixel(x, y, color);
            }
        }
    }

    fn blit(&mut self, origin: Point, bitmap: BitmapView<'_>) {
        let dest = Rect::new(
            origin.x,
            origin.y,
            bitmap.width as i32,
            bitmap.height as i32,
        )
        .intersection(&self.viewport());
        if dest.is_empty() {
            return;
        }
        for row in 0..dest.height {
            let src_y = (dest.y - origin.y + row) as usize;
            let src_x = (dest.x - origin.x) as usize;
            let src_start = src_y * bitmap.stride + src_x * BYTES_PER_PIXEL;
            let src_end = src_start + dest.width as usize * BYTES_PER_PIXEL;
            let dst_start = ((dest.y + row) as usize * self.width as usize + dest.x as usize)
                * BYTES_PER_PIXEL;
            let dst_end = dst_start + dest.width as usize * BYTES_PER_PIXEL;
            self.pixels[dst_start..dst_end].copy_from_slice(&bitmap.pixels[src_start..src_end]);
        }
    }

    fn polyline(&mut self, points: &[Point], width: u32, color: Color) {
        match points {
            [] => {}
            [single] => self.draw_segment(*single, *single, width, color),
            _ => {
                for pair in points.windows(2) {
                    self.draw_segment(pair[0], pair[1], width, color);
                }
            }
        }
    }

    fn text_extent(&self, text: &str) -> Size {
        Size::new(text.chars().count() as u32 * GLYPH_WIDTH, GLYPH_HEIGHT)
    }

    fn draw_text(&mut self, origin: Point, text: &str) {
        self.texts.push((origin, text.to_owned()));
    }
}
