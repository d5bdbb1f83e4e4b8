//! Float geometry shared by the layouts and the composer.

use crate::photo::SizePx;

/// An axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrinks the rectangle by `amount` on every side.
    ///
    /// No clamping: an inset larger than half the size yields a negative
    /// width or height.
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            self.width - amount * 2.0,
            self.height - amount * 2.0,
        )
    }

    /// Returns true if the interiors of the two rectangles overlap.
    ///
    /// Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Uniform scale that fits a `src_w x src_h` image inside a `box_w x box_h` box.
///
/// The smaller of the two axis ratios wins, so the image never overflows the
/// box and its aspect ratio is preserved.
pub fn fit_scale(src_w: f32, src_h: f32, box_w: f32, box_h: f32) -> f32 {
    (box_w / src_w).min(box_h / src_h)
}

/// Scale-fits an image of `src` pixels into `bounds`, centered on both axes.
pub fn fit_rect(src: SizePx, bounds: Rect) -> Rect {
    let (src_w, src_h) = (src.width as f32, src.height as f32);
    let scale = fit_scale(src_w, src_h, bounds.width, bounds.height);
    let width = src_w * scale;
    let height = src_h * scale;
    Rect::new(
        bounds.x + (bounds.width - width) / 2.0,
        bounds.y + (bounds.height - height) / 2.0,
        width,
        height,
    )
}
