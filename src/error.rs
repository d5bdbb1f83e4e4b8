//! Error type shared by the photo set, layout engine and export path.

use thiserror::Error;

/// Result alias for collage operations.
pub type Result<T> = std::result::Result<T, CollageError>;

/// Everything that can go wrong while collecting, arranging or exporting photos.
///
/// None of these are fatal: the caller surfaces a notice and the user
/// re-issues the action.
#[derive(Error, Debug)]
pub enum CollageError {
    // Photo set
    #[error("at most {max} photos allowed: {current} present, {incoming} incoming")]
    CapacityExceeded {
        current: usize,
        incoming: usize,
        max: usize,
    },

    #[error("photo has no pixels ({width}x{height})")]
    InvalidImage { width: u32, height: u32 },

    #[error("upload slot {index} is out of range or already settled")]
    InvalidUploadSlot { index: usize },

    #[error("upload batch still has {pending} file(s) decoding")]
    UploadPending { pending: usize },

    #[error("failed to decode photo: {0}")]
    Decode(#[source] image::ImageError),

    // Rendering
    #[error("no photos to arrange")]
    EmptyInput,

    #[error("a render is already in progress")]
    Busy,

    #[error("could not allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    // Export
    #[error("nothing has been rendered yet")]
    NothingRendered,

    #[error("failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),

    // Configuration
    #[error("invalid color: {value}")]
    InvalidColor { value: String },

    #[error("invalid profile: {0}")]
    Profile(#[from] serde_json::Error),
}
