//! Display geometry negotiation. Enumerating physical screens is the shell's
//! job; given their rectangles this computes the shared presentation size and
//! a centered target rectangle per screen.

use crate::geom::{Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    /// The screen's full rectangle in global coordinates.
    pub geometry: Rect,
    /// Where the presentation lands, in screen-local coordinates.
    pub target: Rect,
}

/// All screens participating in the presentation; index 0 is the designated
/// primary (overview grid, timer readout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLayout {
    screens: Vec<Screen>,
    common: Size,
}

impl ScreenLayout {
    pub fn new(geometries: &[Rect], primary: usize) -> Self {
        let mut geometries = geometries.to_vec();
        if primary > 0 && primary < geometries.len() {
            geometries.swap(0, primary);
        }

        // The common presentation area is the largest box every screen can
        // show: minimum width times minimum height.
        // TODO: pick a common aspect ratio instead of the plain minimum so a
        // portrait screen does not squash the presentation for everyone.
        let mut common = geometries
            .first()
            .map(|g| Size::new(g.width.max(0) as u32, g.height.max(0) as u32))
            .unwrap_or_default();
        for geometry in geometries.iter().skip(1) {
            common.width = common.width.min(geometry.width.max(0) as u32);
            common.height = common.height.min(geometry.height.max(0) as u32);
        }

        let screens = geometries
            .iter()
            .map(|geometry| {
                let (width, height) = if common.width as i32 > geometry.width
                    || common.height as i32 > geometry.height
                {
                    let cx = geometry.width as f64 / common.width.max(1) as f64;
                    let cy = geometry.height as f64 / common.height.max(1) as f64;
                    let c = cx.min(cy);
                    (
                        (common.width as f64 * c) as i32,
                        (common.height as f64 * c) as i32,
                    )
                } else {
                    (common.width as i32, common.height as i32)
                };
                Screen {
                    geometry: *geometry,
                    target: Rect::new(
                        (geometry.width - width) / 2,
                        (geometry.height - height) / 2,
                        width,
                        height,
                    ),
                }
            })
            .collect();

        Self { screens, common }
    }

    /// A single-display layout whose target fills the whole screen.
    pub fn single(size: Size) -> Self {
        Self::new(&[Rect::of_size(size)], 0)
    }

    pub fn common(&self) -> Size {
        self.common
    }

    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    pub fn screen(&self, index: usize) -> &Screen {
        &self.screens[index]
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_screen_fills_itself() {
        let layout = ScreenLayout::single(Size::new(1920, 1080));
        assert_eq!(layout.common(), Size::new(1920, 1080));
        assert_eq!(layout.screen(0).target, Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn primary_screen_moves_to_the_front() {
        let laptop = Rect::new(0, 0, 1366, 768);
        let beamer = Rect::new(1366, 0, 1024, 768);
        let layout = ScreenLayout::new(&[laptop, beamer], 1);
        assert_eq!(layout.screen(0).geometry, beamer);
        assert_eq!(layout.screen(1).geometry, laptop);
    }

    #[test]
    fn common_size_is_the_minimum_per_axis() {
        let layout = ScreenLayout::new(
            &[Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 1024, 768)],
            0,
        );
        assert_eq!(layout.common(), Size::new(1024, 768));
    }

    #[test]
    fn targets_are_centered_on_larger_screens() {
        let layout = ScreenLayout::new(
            &[Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 1024, 768)],
            0,
        );
        // Large screen shows the 1024x768 common area centered.
        assert_eq!(layout.screen(0).target, Rect::new(448, 156, 1024, 768));
        // Small screen is exactly the common area.
        assert_eq!(layout.screen(1).target, Rect::new(0, 0, 1024, 768));
    }
}
