//! collage-renderer: photo collage layouts and PNG export
//!
//! This crate holds up to ten photos, arranges them with one of five
//! layout presets on a 1200x800 canvas, and renders the result to a
//! bitmap that can be exported as a PNG.
//!
//! # Example
//!
//! ```
//! use collage_renderer::{LayoutKind, Photo, Session};
//! use image::{Rgba, RgbaImage};
//!
//! let mut session = Session::new();
//! let photos = (0..3)
//!     .map(|_| Photo::new(RgbaImage::from_pixel(64, 48, Rgba([200, 40, 40, 255]))).unwrap())
//!     .collect();
//! session.add_photos(photos).unwrap();
//!
//! // Grid first, then the next preset in the cycle.
//! session.generate().unwrap();
//! assert_eq!(session.cycle_layout(), LayoutKind::MainSide);
//!
//! let preview = session.generate().unwrap();
//! assert_eq!(preview.image().dimensions(), (1200, 800));
//!
//! let export = session.export_today().unwrap();
//! assert!(export.file_name.starts_with("拼图-主图布局-"));
//! ```
//!
//! # Serializable Profiles
//!
//! Session settings travel as a [`CollageProfile`] through the
//! [`Configurable`] trait:
//!
//! ```
//! use collage_renderer::{CollageProfile, Configurable, LayoutKind, Session};
//!
//! let mut session = Session::new();
//! let profile = CollageProfile::from_json(r#"{"layout":"mosaic","exportLabel":"trip"}"#).unwrap();
//! session.apply_profile(&profile).unwrap();
//! assert_eq!(session.layout(), LayoutKind::Mosaic);
//!
//! let json = session.export_profile().to_json().unwrap();
//! assert!(json.contains("\"exportLabel\":\"trip\""));
//! ```

mod composer;
mod error;
mod export;
pub mod layout;
mod photo;
mod profile;
mod raster;
mod session;

pub use composer::{Composer, RenderResult, Theme};
pub use error::{CollageError, Result};
pub use export::{DEFAULT_LABEL, Export, encode_png, file_name};
pub use layout::{CANVAS_SIZE, LayoutKind, Placement, Shadow, Slot};
pub use photo::{MAX_PHOTOS, Photo, PhotoId, PhotoSet, SizePx, UploadBatch};
pub use profile::{CanvasSettings, CollageProfile, ThemeSettings};
pub use session::{Configurable, RenderTicket, Session};
