//! Collage composition: layouts in, finished bitmap out.

use image::RgbaImage;
use image::imageops::FilterType;
use log::{debug, info, warn};
use palette::Srgb;
use rand::RngCore;
use resvg::tiny_skia::{
    self, Color, FillRule, FilterQuality, GradientStop, LinearGradient, Mask, Paint, Pixmap,
    PixmapPaint, Point, SpreadMode, Transform,
};

use crate::error::{CollageError, Result};
use crate::layout::{CANVAS_SIZE, LayoutContext, LayoutKind, Slot};
use crate::photo::{Photo, PhotoSet, SizePx};
use crate::raster::{rgba_image_to_pixmap, pixmap_to_rgba_image, rounded_rect_path, shadow_layer};

// ============================================================================
// Theme
// ============================================================================

/// Colors used to paint a collage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Background gradient color at the top-left corner.
    pub background_start: Srgb<u8>,
    /// Background gradient color at the bottom-right corner.
    pub background_end: Srgb<u8>,
    /// Fill of the panel behind each photo.
    pub panel: Srgb<u8>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background_start: Srgb::new(0xf8, 0xfa, 0xfc),
            background_end: Srgb::new(0xe2, 0xe8, 0xf0),
            panel: Srgb::new(0xff, 0xff, 0xff),
        }
    }
}

fn opaque(color: Srgb<u8>) -> Color {
    Color::from_rgba8(color.red, color.green, color.blue, 255)
}

// ============================================================================
// RenderResult
// ============================================================================

/// A finished collage.
///
/// Remembers the layout it was drawn with and the photo-set version it was
/// drawn from, so a caller can tell when it has gone stale.
#[derive(Debug, Clone)]
pub struct RenderResult {
    image: RgbaImage,
    layout: LayoutKind,
    photos_version: u64,
    slots: Vec<Slot>,
}

impl RenderResult {
    /// The rendered canvas.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// The slots the photos were drawn into, in photo order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.image.width(), self.image.height())
    }

    /// Returns true if `photos` changed since this result was rendered.
    pub fn is_stale(&self, photos: &PhotoSet) -> bool {
        self.photos_version != photos.version()
    }
}

// ============================================================================
// Composer
// ============================================================================

/// Draws photos into the slots computed by a layout.
///
/// Every render starts from a freshly painted canvas. Per photo the
/// drawing order is: drop shadow, panel fill, clip to the inset frame, then
/// the scale-fit photo. Shadow and clip live in per-slot buffers, so nothing
/// carries over to the next photo.
///
/// # Example
///
/// ```
/// use collage_renderer::{Composer, LayoutKind, Photo, PhotoSet};
/// use image::RgbaImage;
/// use rand::SeedableRng;
///
/// let mut photos = PhotoSet::new();
/// photos.add(vec![Photo::new(RgbaImage::new(64, 48)).unwrap()]).unwrap();
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let result = Composer::default()
///     .render(&photos, LayoutKind::Grid, &mut rng)
///     .unwrap();
/// assert_eq!(result.image().dimensions(), (1200, 800));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Composer {
    canvas: SizePx,
    /// Colors used for background and panels.
    pub theme: Theme,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(CANVAS_SIZE)
    }
}

impl Composer {
    /// Creates a composer for a canvas of the given size with the default theme.
    pub fn new(canvas: SizePx) -> Self {
        Self {
            canvas,
            theme: Theme::default(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn canvas(&self) -> SizePx {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: SizePx) {
        self.canvas = canvas;
    }

    /// Lays out `photos` with `layout` and draws the collage.
    ///
    /// Fails with [`CollageError::EmptyInput`] when there is nothing to draw.
    pub fn render(
        &self,
        photos: &PhotoSet,
        layout: LayoutKind,
        rng: &mut dyn RngCore,
    ) -> Result<RenderResult> {
        if photos.is_empty() {
            return Err(CollageError::EmptyInput);
        }
        let mut ctx = LayoutContext::new(photos.len(), self.canvas, rng);
        let slots = layout.arrange(&mut ctx);
        let image = self.draw(photos.as_slice(), &slots)?;
        info!(
            "rendered {} photo(s) as {} on {}x{}",
            photos.len(),
            layout.id(),
            self.canvas.width,
            self.canvas.height
        );

        Ok(RenderResult {
            image,
            layout,
            photos_version: photos.version(),
            slots,
        })
    }

    /// Draws `photos` into precomputed `slots`.
    ///
    /// Slots whose index has no photo are skipped.
    pub fn draw(&self, photos: &[Photo], slots: &[Slot]) -> Result<RgbaImage> {
        let mut pixmap = self.blank_canvas()?;
        for slot in slots {
            let Some(photo) = photos.get(slot.index) else {
                warn!("slot {} has no photo", slot.index);
                continue;
            };
            self.draw_slot(&mut pixmap, photo, slot)?;
        }
        Ok(pixmap_to_rgba_image(&pixmap))
    }

    /// Allocates the canvas and paints the diagonal background gradient.
    fn blank_canvas(&self) -> Result<Pixmap> {
        let SizePx { width, height } = self.canvas;
        let canvas_error = || CollageError::Canvas { width, height };
        let mut pixmap = Pixmap::new(width, height).ok_or_else(canvas_error)?;

        let (w, h) = (width as f32, height as f32);
        let shader = LinearGradient::new(
            Point::from_xy(0.0, 0.0),
            Point::from_xy(w, h),
            vec![
                GradientStop::new(0.0, opaque(self.theme.background_start)),
                GradientStop::new(1.0, opaque(self.theme.background_end)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        )
        .ok_or_else(canvas_error)?;
        let paint = Paint {
            shader,
            ..Paint::default()
        };
        let rect = tiny_skia::Rect::from_xywh(0.0, 0.0, w, h).ok_or_else(canvas_error)?;
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        Ok(pixmap)
    }

    fn draw_slot(&self, pixmap: &mut Pixmap, photo: &Photo, slot: &Slot) -> Result<()> {
        let panel = slot.panel;
        let (cx, cy) = panel.center();
        let transform = if panel.rotation == 0.0 {
            Transform::identity()
        } else {
            Transform::from_rotate_at(panel.rotation.to_degrees(), cx, cy)
        };

        let Some(panel_path) = rounded_rect_path(panel.rect(), panel.corner_radius) else {
            warn!("slot {}: degenerate panel {:?}, skipped", slot.index, panel.rect());
            return Ok(());
        };

        if let Some(shadow) = shadow_layer(&panel_path, transform, &slot.shadow, self.canvas) {
            pixmap.draw_pixmap(
                shadow.left,
                shadow.top,
                shadow.pixmap.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }

        let mut paint = Paint::default();
        paint.set_color(opaque(self.theme.panel));
        paint.anti_alias = true;
        pixmap.fill_path(&panel_path, &paint, FillRule::Winding, transform, None);

        let Some(clip_path) = rounded_rect_path(slot.clip_rect(), slot.inner_radius) else {
            warn!("slot {}: frame inset leaves no room for the photo", slot.index);
            return Ok(());
        };
        let mut clip = Mask::new(pixmap.width(), pixmap.height()).ok_or(CollageError::Canvas {
            width: pixmap.width(),
            height: pixmap.height(),
        })?;
        clip.fill_path(&clip_path, FillRule::Winding, true, transform);

        let target = slot.photo_rect(photo.dimensions());
        let (tw, th) = (target.width.ceil() as u32, target.height.ceil() as u32);
        if tw == 0 || th == 0 {
            return Ok(());
        }
        // Resample once on the CPU; tiny-skia then only applies a sub-pixel scale.
        let resized = if photo.dimensions() == SizePx::new(tw, th) {
            rgba_image_to_pixmap(photo.data())
        } else {
            rgba_image_to_pixmap(&image::imageops::resize(
                photo.data(),
                tw,
                th,
                FilterType::Triangle,
            ))
        };
        let Some(source) = resized else {
            return Ok(());
        };

        let photo_transform = transform
            .pre_translate(target.x, target.y)
            .pre_scale(target.width / tw as f32, target.height / th as f32);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, photo_transform, Some(&clip));

        debug!(
            "slot {}: photo {}x{} -> {:.1}x{:.1} at ({:.1}, {:.1})",
            slot.index,
            photo.dimensions().width,
            photo.dimensions().height,
            target.width,
            target.height,
            target.x,
            target.y
        );
        Ok(())
    }
}
