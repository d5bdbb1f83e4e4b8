//! Collage layouts.
//!
//! A layout turns a photo count and a canvas size into one [`Slot`] per
//! photo: where its panel goes, how far the photo is inset inside it, and
//! the drop shadow drawn under it. Layouts never look at pixels, which keeps
//! them cheap to test; the [`Composer`](crate::Composer) does the drawing.
//!
//! # Architecture
//!
//! Each layout implements [`Arrangement`]. Randomized layouts draw from the
//! RNG carried by the [`LayoutContext`], so callers decide whether a render
//! is reproducible.
//!
//! ```text
//! LayoutKind ──► Arrangement::arrange(ctx) ──► Vec<Slot> ──► Composer
//! ```

pub mod bands;
pub mod geometry;
pub mod grid;
pub mod main_side;
pub mod mosaic;

pub use bands::{Axis, Bands};
pub use geometry::{Rect, fit_rect, fit_scale};
pub use grid::{Grid, GridShape};
pub use main_side::MainSide;
pub use mosaic::{MAX_PLACEMENT_ATTEMPTS, Mosaic};

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::photo::SizePx;

/// Default canvas size of every collage.
pub const CANVAS_SIZE: SizePx = SizePx::new(1200, 800);

// ============================================================================
// LayoutKind
// ============================================================================

/// The five layout presets, in the order the layout switcher cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum LayoutKind {
    /// Equal cells, row-major.
    #[default]
    Grid,
    /// One large photo on the left, the rest stacked on the right.
    MainSide,
    /// Randomly scattered, slightly rotated squares.
    Mosaic,
    /// Full-width bands stacked top to bottom.
    Vertical,
    /// Full-height bands laid out left to right.
    Horizontal,
}

impl LayoutKind {
    /// All layouts in cycle order.
    pub const ALL: [LayoutKind; 5] = [
        Self::Grid,
        Self::MainSide,
        Self::Mosaic,
        Self::Vertical,
        Self::Horizontal,
    ];

    /// Returns the next layout in cycle order, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|kind| *kind == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Stable identifier, matching the serialized form.
    pub fn id(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::MainSide => "main-side",
            Self::Mosaic => "mosaic",
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }

    /// Looks a layout up by its [`id`](Self::id).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// User-facing name, also embedded in export file names.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Grid => "网格布局",
            Self::MainSide => "主图布局",
            Self::Mosaic => "艺术拼贴",
            Self::Vertical => "垂直叠加",
            Self::Horizontal => "水平展开",
        }
    }

    /// Computes the slots for `count` photos using this layout's defaults.
    pub fn arrange(self, ctx: &mut LayoutContext<'_>) -> Vec<Slot> {
        match self {
            Self::Grid => Grid.arrange(ctx),
            Self::MainSide => MainSide.arrange(ctx),
            Self::Mosaic => Mosaic::default().arrange(ctx),
            Self::Vertical => Bands::new(Axis::Vertical).arrange(ctx),
            Self::Horizontal => Bands::new(Axis::Horizontal).arrange(ctx),
        }
    }
}

// ============================================================================
// Placement / Slot
// ============================================================================

/// Where a photo's panel sits on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Rotation about the panel's center, in radians.
    pub rotation: f32,
    pub corner_radius: f32,
}

impl Placement {
    /// The unrotated bounds of the panel.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        self.rect().center()
    }
}

/// Black drop shadow drawn under a panel.
///
/// `blur` follows the HTML canvas `shadowBlur` convention: the gaussian
/// standard deviation is half of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Opacity of the shadow color (0.0-1.0).
    pub alpha: f32,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Shadow {
    pub const fn new(alpha: f32, blur: f32, offset_x: f32, offset_y: f32) -> Self {
        Self {
            alpha,
            blur,
            offset_x,
            offset_y,
        }
    }

    /// Gaussian standard deviation equivalent to `blur`.
    pub fn sigma(&self) -> f32 {
        self.blur / 2.0
    }
}

/// Panel styling shared by every slot of a layout region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStyle {
    pub corner_radius: f32,
    /// Gap between the panel edge and the photo clip region.
    pub inset: f32,
    /// Corner radius of the photo clip region.
    pub inner_radius: f32,
    pub shadow: Shadow,
}

impl PanelStyle {
    /// Builds the slot for photo `index` with its panel at `rect`.
    pub fn slot(&self, index: usize, rect: Rect, rotation: f32) -> Slot {
        Slot {
            index,
            panel: Placement {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                rotation,
                corner_radius: self.corner_radius,
            },
            inset: self.inset,
            inner_radius: self.inner_radius,
            shadow: self.shadow,
        }
    }
}

/// Everything the composer needs to draw one photo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Index of the photo in the set.
    pub index: usize,
    pub panel: Placement,
    pub inset: f32,
    pub inner_radius: f32,
    pub shadow: Shadow,
}

impl Slot {
    /// The photo clip region, in the panel's unrotated frame.
    pub fn clip_rect(&self) -> Rect {
        self.panel.rect().inset(self.inset)
    }

    /// Where a photo of `size` pixels lands once scale-fit into the clip region.
    pub fn photo_rect(&self, size: SizePx) -> Rect {
        fit_rect(size, self.clip_rect())
    }
}

// ============================================================================
// Arrangement
// ============================================================================

/// Inputs shared by every layout.
pub struct LayoutContext<'a> {
    /// Number of photos to place.
    pub count: usize,
    pub canvas: SizePx,
    /// Randomness source for randomized layouts.
    pub rng: &'a mut dyn RngCore,
}

impl<'a> LayoutContext<'a> {
    pub fn new(count: usize, canvas: SizePx, rng: &'a mut dyn RngCore) -> Self {
        Self { count, canvas, rng }
    }

    /// Canvas width as a float.
    pub fn width(&self) -> f32 {
        self.canvas.width as f32
    }

    /// Canvas height as a float.
    pub fn height(&self) -> f32 {
        self.canvas.height as f32
    }
}

/// A layout algorithm.
///
/// Implementations return exactly one slot per photo, ordered by photo
/// index, and return nothing for a zero count.
pub trait Arrangement {
    fn arrange(&self, ctx: &mut LayoutContext<'_>) -> Vec<Slot>;
}


#[cfg(test)]
mod tests {
    use super::test_support::ZeroRng;
    use super::*;

    #[test]
    fn layout_cycle_wraps() {
        let mut kind = LayoutKind::Grid;
        let mut seen = Vec::new();
        for _ in 0..LayoutKind::ALL.len() {
            seen.push(kind);
            kind = kind.next();
        }
        assert_eq!(seen, LayoutKind::ALL);
        assert_eq!(kind, LayoutKind::Grid);
    }

    #[test]
    fn layout_ids_round_trip() {
        for kind in LayoutKind::ALL {
            assert_eq!(LayoutKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(LayoutKind::from_id("spiral"), None);
    }

    #[test]
    fn layout_serializes_as_id() {
        let json = serde_json::to_string(&LayoutKind::MainSide).unwrap();
        assert_eq!(json, "\"main-side\"");
    }

    #[test]
    fn every_layout_yields_one_slot_per_photo() {
        for kind in LayoutKind::ALL {
            for count in 1..=10 {
                let mut rng = ZeroRng;
                let mut ctx = LayoutContext::new(count, CANVAS_SIZE, &mut rng);
                let slots = kind.arrange(&mut ctx);
                assert_eq!(slots.len(), count, "{kind:?} with {count} photos");
                for (i, slot) in slots.iter().enumerate() {
                    assert_eq!(slot.index, i);
                }
            }
        }
    }

    #[test]
    fn every_layout_handles_zero_photos() {
        for kind in LayoutKind::ALL {
            let mut rng = ZeroRng;
            let mut ctx = LayoutContext::new(0, CANVAS_SIZE, &mut rng);
            assert!(kind.arrange(&mut ctx).is_empty());
        }
    }

    #[test]
    fn slot_clip_and_photo_rects() {
        let style = PanelStyle {
            corner_radius: 12.0,
            inset: 8.0,
            inner_radius: 8.0,
            shadow: Shadow::new(0.1, 10.0, 2.0, 2.0),
        };
        let slot = style.slot(0, Rect::new(8.0, 8.0, 584.0, 384.0), 0.0);
        assert_eq!(slot.clip_rect(), Rect::new(16.0, 16.0, 568.0, 368.0));

        let photo = slot.photo_rect(SizePx::new(200, 100));
        assert_eq!(photo.width, 568.0);
        assert_eq!(photo.height, 284.0);
        assert_eq!(photo.y, 16.0 + (368.0 - 284.0) / 2.0);
    }
}
