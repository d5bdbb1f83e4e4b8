//! Raster helpers on top of tiny-skia.
//!
//! Conversions between `image` buffers and tiny-skia pixmaps, the rounded
//! panel path, and the blurred drop-shadow layer.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{
    ColorU8, FillRule, IntSize, Paint, Path, PathBuilder, Pixmap, Transform,
};

use crate::layout::{Rect, Shadow};
use crate::photo::SizePx;

// ============================================================================
// Pixmap conversion
// ============================================================================

/// Converts a straight-alpha RGBA image into a premultiplied pixmap.
///
/// Returns `None` for zero-sized images.
pub fn rgba_image_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Converts a tiny-skia pixmap back into a straight-alpha RGBA image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    img
}

// ============================================================================
// Paths
// ============================================================================

/// Builds a rounded rectangle with quadratic corners of radius `radius`.
///
/// Callers pick radii no larger than half the shorter side. Returns `None`
/// when the rectangle is degenerate (zero or negative size).
pub fn rounded_rect_path(rect: Rect, radius: f32) -> Option<Path> {
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }
    let Rect {
        x,
        y,
        width: w,
        height: h,
    } = rect;
    let r = radius.max(0.0);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

// ============================================================================
// Shadows
// ============================================================================

/// A pre-blurred shadow ready to be blitted at (`left`, `top`).
pub struct ShadowLayer {
    pub pixmap: Pixmap,
    pub left: i32,
    pub top: i32,
}

/// Renders the drop shadow of `path` (drawn with `transform`) into its own layer.
///
/// The layer covers the shadow's extent clipped to the canvas. Returns
/// `None` when the shadow is fully transparent or falls outside the canvas.
pub fn shadow_layer(
    path: &Path,
    transform: Transform,
    shadow: &Shadow,
    canvas: SizePx,
) -> Option<ShadowLayer> {
    if shadow.alpha <= 0.0 {
        return None;
    }
    let sigma = shadow.sigma().max(0.0);
    let spread = (sigma * 3.0).ceil() + 1.0;

    let bounds = path.clone().transform(transform)?.bounds();
    let left = (bounds.left() + shadow.offset_x - spread).floor().max(0.0);
    let top = (bounds.top() + shadow.offset_y - spread).floor().max(0.0);
    let right = (bounds.right() + shadow.offset_x + spread)
        .ceil()
        .min(canvas.width as f32);
    let bottom = (bounds.bottom() + shadow.offset_y + spread)
        .ceil()
        .min(canvas.height as f32);
    if right <= left || bottom <= top {
        return None;
    }
    let (width, height) = ((right - left) as u32, (bottom - top) as u32);

    let mut layer = Pixmap::new(width, height)?;
    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, (shadow.alpha.clamp(0.0, 1.0) * 255.0).round() as u8);
    paint.anti_alias = true;
    let local = transform.post_translate(shadow.offset_x - left, shadow.offset_y - top);
    layer.fill_path(path, &paint, FillRule::Winding, local, None);

    let pixmap = if sigma > 0.0 {
        // Black premultiplied pixels stay valid under a linear blur.
        let raw = RgbaImage::from_raw(width, height, layer.take())?;
        let blurred = image::imageops::blur(&raw, sigma);
        Pixmap::from_vec(blurred.into_raw(), IntSize::from_wh(width, height)?)?
    } else {
        layer
    };

    Some(ShadowLayer {
        pixmap,
        left: left as i32,
        top: top as i32,
    })
}
