//! Photo types and the capped, ordered photo set.
//!
//! Photos arrive from an upload collaborator already decoded. The set keeps
//! them in upload order and never holds more than [`MAX_PHOTOS`].

use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbaImage;
use log::debug;

use crate::error::{CollageError, Result};

/// Maximum number of photos a collage can hold.
pub const MAX_PHOTOS: usize = 10;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

static NEXT_PHOTO_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier of a photo, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(u64);

impl PhotoId {
    fn next() -> Self {
        Self(NEXT_PHOTO_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A decoded photo. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    id: PhotoId,
    data: RgbaImage,
}

impl Photo {
    /// Wraps a decoded bitmap, assigning it a fresh id.
    ///
    /// Zero-sized bitmaps are rejected since they cannot be scale-fit.
    pub fn new(data: RgbaImage) -> Result<Self> {
        let size = SizePx::new(data.width(), data.height());
        if size.is_empty() {
            return Err(CollageError::InvalidImage {
                width: size.width,
                height: size.height,
            });
        }
        Ok(Self {
            id: PhotoId::next(),
            data,
        })
    }

    /// Decodes an encoded image (PNG, JPEG, ...) into a photo.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let data = image::load_from_memory(bytes)
            .map_err(CollageError::Decode)?
            .to_rgba8();
        Self::new(data)
    }

    pub fn id(&self) -> PhotoId {
        self.id
    }

    /// The decoded RGBA pixels.
    pub fn data(&self) -> &RgbaImage {
        &self.data
    }

    /// Returns the pixel dimensions of the photo.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }
}

/// The ordered collection of photos in a collage.
///
/// Insertion order is preserved and the size never exceeds [`MAX_PHOTOS`].
/// Every structural change bumps [`version`](Self::version) so that a
/// rendered result can tell whether it is stale.
#[derive(Debug, Clone, Default)]
pub struct PhotoSet {
    photos: Vec<Photo>,
    version: u64,
}

impl PhotoSet {
    /// Creates a new empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that `incoming` more photos would fit, without changing anything.
    pub fn ensure_room(&self, incoming: usize) -> Result<()> {
        if self.photos.len() + incoming > MAX_PHOTOS {
            return Err(CollageError::CapacityExceeded {
                current: self.photos.len(),
                incoming,
                max: MAX_PHOTOS,
            });
        }
        Ok(())
    }

    /// Appends a batch of photos.
    ///
    /// The capacity check covers the whole batch: if it would cross the cap
    /// nothing is added.
    pub fn add(&mut self, photos: Vec<Photo>) -> Result<&Self> {
        self.ensure_room(photos.len())?;
        if photos.is_empty() {
            return Ok(self);
        }
        debug!("adding {} photo(s) to a set of {}", photos.len(), self.len());
        self.photos.extend(photos);
        self.bump();
        Ok(self)
    }

    /// Removes the photo with the given id. Unknown ids are ignored.
    pub fn remove(&mut self, id: PhotoId) -> &Self {
        let before = self.photos.len();
        self.photos.retain(|photo| photo.id != id);
        if self.photos.len() != before {
            self.bump();
        }
        self
    }

    /// Removes every photo.
    pub fn clear(&mut self) {
        if !self.photos.is_empty() {
            self.photos.clear();
            self.bump();
        }
    }

    /// Returns the photo with the given id, if present.
    pub fn get(&self, id: PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|photo| photo.id == id)
    }

    /// Returns the number of photos in the set.
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Returns true if the set contains no photos.
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Returns the number of photos that can still be added.
    pub fn remaining(&self) -> usize {
        MAX_PHOTOS - self.photos.len()
    }

    /// Structural change counter.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn as_slice(&self) -> &[Photo] {
        &self.photos
    }

    /// Returns an iterator over the photos in upload order.
    pub fn iter(&self) -> impl Iterator<Item = &Photo> {
        self.photos.iter()
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

impl<'a> IntoIterator for &'a PhotoSet {
    type Item = &'a Photo;
    type IntoIter = std::slice::Iter<'a, Photo>;

    fn into_iter(self) -> Self::IntoIter {
        self.photos.iter()
    }
}

// ============================================================================
// UploadBatch
// ============================================================================

#[derive(Debug)]
enum UploadSlot {
    Pending,
    Decoded(Photo),
    Failed,
}

/// Staging area for one upload gesture.
///
/// Each selected file gets a stable index when the upload starts. Decodes
/// finish in any order; once every slot has settled, [`take_photos`]
/// returns the successful ones in upload order, ready for [`PhotoSet::add`].
///
/// [`take_photos`]: Self::take_photos
#[derive(Debug)]
pub struct UploadBatch {
    slots: Vec<UploadSlot>,
}

impl UploadBatch {
    /// Reserves `len` slots.
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| UploadSlot::Pending).collect(),
        }
    }

    /// Records a successful decode for the file at `index`.
    pub fn complete(&mut self, index: usize, photo: Photo) -> Result<()> {
        *self.pending_slot(index)? = UploadSlot::Decoded(photo);
        Ok(())
    }

    /// Records that the file at `index` was not a decodable image.
    pub fn fail(&mut self, index: usize) -> Result<()> {
        *self.pending_slot(index)? = UploadSlot::Failed;
        Ok(())
    }

    /// Returns true once every slot has completed or failed.
    pub fn is_settled(&self) -> bool {
        self.pending() == 0
    }

    /// Number of files still decoding.
    pub fn pending(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, UploadSlot::Pending))
            .count()
    }

    /// Number of files decoded successfully so far.
    pub fn decoded(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, UploadSlot::Decoded(_)))
            .count()
    }

    /// Fails with [`CollageError::UploadPending`] while any file is still decoding.
    pub fn ensure_settled(&self) -> Result<()> {
        match self.pending() {
            0 => Ok(()),
            pending => Err(CollageError::UploadPending { pending }),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Moves the decoded photos out in upload order, leaving the batch empty.
    ///
    /// An unsettled batch is left untouched and reported as
    /// [`CollageError::UploadPending`].
    pub fn take_photos(&mut self) -> Result<Vec<Photo>> {
        self.ensure_settled()?;
        Ok(std::mem::take(&mut self.slots)
            .into_iter()
            .filter_map(|slot| match slot {
                UploadSlot::Decoded(photo) => Some(photo),
                UploadSlot::Pending | UploadSlot::Failed => None,
            })
            .collect())
    }

    fn pending_slot(&mut self, index: usize) -> Result<&mut UploadSlot> {
        match self.slots.get_mut(index) {
            Some(slot @ UploadSlot::Pending) => Ok(slot),
            _ => Err(CollageError::InvalidUploadSlot { index }),
        }
    }
}
