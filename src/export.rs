//! PNG export of a rendered collage.

use std::io::Cursor;

use chrono::{NaiveDate, Utc};
use image::{ImageFormat, RgbaImage};
use log::info;

use crate::composer::RenderResult;
use crate::error::{CollageError, Result};
use crate::layout::LayoutKind;

/// Label prefixed to export file names unless a profile overrides it.
pub const DEFAULT_LABEL: &str = "拼图";

/// Builds `{label}-{layout display name}-{YYYY-MM-DD}.png`.
pub fn file_name(label: &str, layout: LayoutKind, date: NaiveDate) -> String {
    format!(
        "{label}-{}-{}.png",
        layout.display_name(),
        date.format("%Y-%m-%d")
    )
}

/// Today's date as used in export file names.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Encodes `image` as a lossless PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(CollageError::Encode)?;
    Ok(bytes.into_inner())
}

/// A download-ready PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Export {
    /// Encodes `result`, naming the file after the layout it was rendered with.
    pub fn from_result(result: &RenderResult, label: &str, date: NaiveDate) -> Result<Self> {
        let file_name = file_name(label, result.layout(), date);
        let bytes = encode_png(result.image())?;
        info!("exported {file_name} ({} bytes)", bytes.len());
        Ok(Self { file_name, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::Composer;
    use crate::layout::test_support::ZeroRng;
    use crate::photo::{Photo, PhotoSet};
    use image::Rgba;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn file_name_embeds_label_layout_and_date() {
        assert_eq!(
            file_name(DEFAULT_LABEL, LayoutKind::Grid, date()),
            "拼图-网格布局-2024-01-15.png"
        );
        assert_eq!(
            file_name("trip", LayoutKind::Horizontal, date()),
            "trip-水平展开-2024-01-15.png"
        );
    }

    #[test]
    fn png_is_lossless() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        img.put_pixel(2, 1, Rgba([200, 100, 0, 128]));

        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn export_uses_the_rendered_layout() {
        let mut photos = PhotoSet::new();
        photos
            .add(vec![Photo::new(RgbaImage::new(20, 10)).unwrap()])
            .unwrap();
        let result = Composer::default()
            .render(&photos, LayoutKind::Vertical, &mut ZeroRng)
            .unwrap();

        let export = Export::from_result(&result, DEFAULT_LABEL, date()).unwrap();
        assert_eq!(export.file_name, "拼图-垂直叠加-2024-01-15.png");

        let decoded = image::load_from_memory(&export.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1200, 800));
    }
}
