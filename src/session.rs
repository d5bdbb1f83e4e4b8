//! The collage session: photo set, current layout, preview and render state.

use chrono::NaiveDate;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::composer::{Composer, RenderResult, Theme};
use crate::error::{CollageError, Result};
use crate::export::{self, DEFAULT_LABEL, Export};
use crate::layout::LayoutKind;
use crate::photo::{Photo, PhotoId, PhotoSet, SizePx, UploadBatch};
use crate::profile::{CollageProfile, ThemeSettings};

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`CollageProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &CollageProfile) -> Result<()>;

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> CollageProfile;
}

// ============================================================================
// Session
// ============================================================================

/// Proof that a render was started. Hand it back to
/// [`Session::finish_render`] or [`Session::cancel_render`].
#[must_use = "the session stays busy until the ticket is finished or cancelled"]
#[derive(Debug)]
pub struct RenderTicket {
    layout: LayoutKind,
}

impl RenderTicket {
    /// The layout the render will use.
    pub fn layout(&self) -> LayoutKind {
        self.layout
    }
}

/// One user's collage in progress.
///
/// Holds the photo set, the selected layout and the last preview. Changing
/// the photo set drops the preview; a new one only appears after an
/// explicit [`generate`](Self::generate). Switching layouts keeps the old
/// preview until then.
///
/// # Render phases
///
/// A host that wants to show a busy indicator splits rendering in two:
///
/// ```
/// use collage_renderer::{Photo, Session};
/// use image::RgbaImage;
///
/// let mut session = Session::new();
/// session.add_photos(vec![Photo::new(RgbaImage::new(32, 32)).unwrap()]).unwrap();
///
/// let ticket = session.begin_render().unwrap();
/// assert!(session.is_rendering());
/// // ...host repaints its busy state here...
/// session.finish_render(ticket).unwrap();
///
/// let export = session.export_today().unwrap();
/// assert!(export.file_name.ends_with(".png"));
/// ```
pub struct Session<R: RngCore = StdRng> {
    photos: PhotoSet,
    layout: LayoutKind,
    composer: Composer,
    export_label: String,
    rng: R,
    rendering: bool,
    preview: Option<RenderResult>,
}

impl Session<StdRng> {
    /// Creates an empty session seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Default for Session<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> Session<R> {
    /// Creates an empty session drawing mosaic placements from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            photos: PhotoSet::new(),
            layout: LayoutKind::default(),
            composer: Composer::default(),
            export_label: DEFAULT_LABEL.to_owned(),
            rng,
            rendering: false,
            preview: None,
        }
    }

    pub fn photos(&self) -> &PhotoSet {
        &self.photos
    }

    /// Checks that `incoming` more photos would fit, e.g. before decoding.
    pub fn ensure_room(&self, incoming: usize) -> Result<()> {
        self.photos.ensure_room(incoming)
    }

    /// Appends photos; the whole batch is rejected if it would cross the cap.
    pub fn add_photos(&mut self, photos: Vec<Photo>) -> Result<&PhotoSet> {
        let before = self.photos.version();
        self.photos.add(photos)?;
        self.invalidate_if_changed(before);
        Ok(&self.photos)
    }

    /// Admits a settled upload batch in upload order, emptying it.
    ///
    /// An unsettled batch fails with [`CollageError::UploadPending`] and a
    /// batch that would cross the cap with
    /// [`CollageError::CapacityExceeded`]; either way the batch and the set
    /// are left as they were.
    pub fn admit(&mut self, batch: &mut UploadBatch) -> Result<&PhotoSet> {
        batch.ensure_settled()?;
        self.photos.ensure_room(batch.decoded())?;
        let photos = batch.take_photos()?;
        self.add_photos(photos)
    }

    /// Removes a photo by id. Unknown ids are ignored.
    pub fn remove_photo(&mut self, id: PhotoId) -> &PhotoSet {
        let before = self.photos.version();
        self.photos.remove(id);
        self.invalidate_if_changed(before);
        &self.photos
    }

    /// Removes every photo.
    pub fn clear(&mut self) {
        let before = self.photos.version();
        self.photos.clear();
        self.invalidate_if_changed(before);
    }

    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    pub fn set_layout(&mut self, layout: LayoutKind) {
        self.layout = layout;
    }

    /// Advances to the next layout. Does nothing while the set is empty.
    pub fn cycle_layout(&mut self) -> LayoutKind {
        if !self.photos.is_empty() {
            self.layout = self.layout.next();
            debug!("layout switched to {}", self.layout.id());
        }
        self.layout
    }

    /// The composer used for the next render.
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Changes the colors of future renders.
    ///
    /// Fails with [`CollageError::Busy`] while a render is in progress. A
    /// different theme drops the preview.
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.restyle(theme, self.composer.canvas())
    }

    /// Changes the canvas size of future renders.
    ///
    /// Fails with [`CollageError::Busy`] while a render is in progress. A
    /// different size drops the preview.
    pub fn set_canvas(&mut self, canvas: SizePx) -> Result<()> {
        self.restyle(self.composer.theme, canvas)
    }

    pub fn export_label(&self) -> &str {
        &self.export_label
    }

    pub fn set_export_label(&mut self, label: impl Into<String>) {
        self.export_label = label.into();
    }

    /// Returns true between [`begin_render`](Self::begin_render) and the
    /// matching finish or cancel.
    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    /// Starts a render with the current layout.
    ///
    /// Fails with [`CollageError::EmptyInput`] when there are no photos and
    /// with [`CollageError::Busy`] while another ticket is outstanding.
    pub fn begin_render(&mut self) -> Result<RenderTicket> {
        if self.photos.is_empty() {
            return Err(CollageError::EmptyInput);
        }
        if self.rendering {
            return Err(CollageError::Busy);
        }
        self.rendering = true;
        Ok(RenderTicket {
            layout: self.layout,
        })
    }

    /// Runs the render started by `ticket` and stores it as the preview.
    ///
    /// The session is no longer busy afterwards, whether or not drawing
    /// succeeded.
    pub fn finish_render(&mut self, ticket: RenderTicket) -> Result<&RenderResult> {
        let result = self
            .composer
            .render(&self.photos, ticket.layout, &mut self.rng);
        self.rendering = false;
        let result = result?;
        info!("preview ready: {}", result.layout().display_name());
        Ok(self.preview.insert(result))
    }

    /// Abandons a started render.
    pub fn cancel_render(&mut self, ticket: RenderTicket) {
        debug!("render with {} cancelled", ticket.layout.id());
        self.rendering = false;
    }

    /// Renders the current layout in one step.
    pub fn generate(&mut self) -> Result<&RenderResult> {
        let ticket = self.begin_render()?;
        self.finish_render(ticket)
    }

    /// The last rendered collage, unless the photo set changed since.
    pub fn preview(&self) -> Option<&RenderResult> {
        self.preview.as_ref()
    }

    /// Encodes the preview as a PNG named after its layout and `date`.
    pub fn export(&self, date: NaiveDate) -> Result<Export> {
        let preview = self.preview.as_ref().ok_or(CollageError::NothingRendered)?;
        Export::from_result(preview, &self.export_label, date)
    }

    /// [`export`](Self::export) with today's date.
    pub fn export_today(&self) -> Result<Export> {
        self.export(export::today())
    }

    fn restyle(&mut self, theme: Theme, canvas: SizePx) -> Result<()> {
        if self.rendering {
            return Err(CollageError::Busy);
        }
        if theme != self.composer.theme || canvas != self.composer.canvas() {
            if self.preview.take().is_some() {
                debug!("composer settings changed, preview dropped");
            }
            self.composer.theme = theme;
            self.composer.set_canvas(canvas);
        }
        Ok(())
    }

    fn invalidate_if_changed(&mut self, version: u64) {
        if self.photos.version() != version && self.preview.take().is_some() {
            debug!("photo set changed, preview dropped");
        }
    }
}

impl<R: RngCore> Configurable for Session<R> {
    /// Applies layout, canvas, theme and export label.
    ///
    /// Nothing changes if a theme color fails to parse or a render is in
    /// progress. A changed canvas or theme drops the preview.
    fn apply_profile(&mut self, profile: &CollageProfile) -> Result<()> {
        let theme = Theme::try_from(&profile.theme)?;
        self.restyle(theme, profile.canvas.into())?;
        self.layout = profile.layout;
        self.export_label = profile.export_label.clone();
        Ok(())
    }

    fn export_profile(&self) -> CollageProfile {
        CollageProfile {
            layout: self.layout,
            canvas: self.composer.canvas().into(),
            theme: ThemeSettings::from(&self.composer.theme),
            export_label: self.export_label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CANVAS_SIZE;
    use crate::layout::test_support::ZeroRng;
    use crate::photo::MAX_PHOTOS;
    use crate::profile::CanvasSettings;
    use image::RgbaImage;

    fn photos(count: usize) -> Vec<Photo> {
        (0..count)
            .map(|_| Photo::new(RgbaImage::new(40, 30)).unwrap())
            .collect()
    }

    fn session_with(count: usize) -> Session<ZeroRng> {
        let mut session = Session::with_rng(ZeroRng);
        session.add_photos(photos(count)).unwrap();
        session
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn generate_needs_photos() {
        let mut session = Session::with_rng(ZeroRng);
        assert!(matches!(session.generate(), Err(CollageError::EmptyInput)));
        assert!(!session.is_rendering());
        assert!(session.preview().is_none());
    }

    #[test]
    fn second_render_while_busy_is_rejected() {
        let mut session = session_with(2);
        let ticket = session.begin_render().unwrap();
        assert!(matches!(session.begin_render(), Err(CollageError::Busy)));
        assert!(matches!(session.generate(), Err(CollageError::Busy)));

        session.finish_render(ticket).unwrap();
        assert!(!session.is_rendering());
        assert!(session.generate().is_ok());
    }

    #[test]
    fn cancel_clears_busy() {
        let mut session = session_with(1);
        let ticket = session.begin_render().unwrap();
        session.cancel_render(ticket);
        assert!(!session.is_rendering());
        assert!(session.preview().is_none());
    }

    #[test]
    fn failed_finish_clears_busy() {
        let mut session = session_with(1);
        let ticket = session.begin_render().unwrap();
        session.clear();
        assert!(matches!(
            session.finish_render(ticket),
            Err(CollageError::EmptyInput)
        ));
        assert!(!session.is_rendering());
    }

    #[test]
    fn ticket_keeps_the_layout_it_was_issued_for() {
        let mut session = session_with(3);
        let ticket = session.begin_render().unwrap();
        session.set_layout(LayoutKind::Vertical);
        assert_eq!(ticket.layout(), LayoutKind::Grid);
        let result = session.finish_render(ticket).unwrap();
        assert_eq!(result.layout(), LayoutKind::Grid);
    }

    #[test]
    fn mutations_drop_the_preview() {
        let mut session = session_with(2);
        session.generate().unwrap();
        let second = session.photos().as_slice()[1].id();

        session.add_photos(photos(1)).unwrap();
        assert!(session.preview().is_none());

        session.generate().unwrap();
        session.remove_photo(second);
        assert!(session.preview().is_none());
        assert_eq!(session.photos().len(), 2);
    }

    #[test]
    fn no_op_mutations_keep_the_preview() {
        let mut session = session_with(2);
        session.generate().unwrap();

        let stranger = Photo::new(RgbaImage::new(1, 1)).unwrap().id();
        session.remove_photo(stranger);
        assert!(session.add_photos(photos(MAX_PHOTOS)).is_err());
        assert!(session.preview().is_some());
    }

    #[test]
    fn cycling_layouts_keeps_the_preview() {
        let mut session = session_with(2);
        session.generate().unwrap();
        assert_eq!(session.cycle_layout(), LayoutKind::MainSide);
        let preview = session.preview().unwrap();
        assert_eq!(preview.layout(), LayoutKind::Grid);
        assert!(!preview.is_stale(session.photos()));
    }

    #[test]
    fn cycling_an_empty_session_does_nothing() {
        let mut session = Session::with_rng(ZeroRng);
        assert_eq!(session.cycle_layout(), LayoutKind::Grid);
    }

    #[test]
    fn export_names_the_rendered_layout() {
        let mut session = session_with(2);
        assert!(matches!(
            session.export(date()),
            Err(CollageError::NothingRendered)
        ));

        session.generate().unwrap();
        session.cycle_layout();
        let export = session.export(date()).unwrap();
        assert_eq!(export.file_name, "拼图-网格布局-2024-01-15.png");
    }

    #[test]
    fn export_after_clear_has_nothing_to_export() {
        let mut session = session_with(1);
        session.generate().unwrap();
        session.clear();
        assert!(matches!(
            session.export(date()),
            Err(CollageError::NothingRendered)
        ));
    }

    #[test]
    fn admit_keeps_upload_order() {
        let mut session = Session::with_rng(ZeroRng);
        let mut batch = UploadBatch::new(3);
        let mut decoded = photos(2);
        let last = decoded.pop().unwrap();
        let first = decoded.pop().unwrap();
        let expected = vec![first.id(), last.id()];

        batch.complete(2, last).unwrap();
        batch.fail(1).unwrap();
        batch.complete(0, first).unwrap();
        session.admit(&mut batch).unwrap();
        assert!(batch.is_empty());

        let ids: Vec<_> = session.photos().iter().map(Photo::id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn unsettled_batch_is_rejected_and_kept() {
        let mut session = session_with(1);
        session.generate().unwrap();
        let before: Vec<_> = session.photos().iter().map(Photo::id).collect();

        let mut batch = UploadBatch::new(2);
        batch.complete(1, photos(1).remove(0)).unwrap();
        assert!(matches!(
            session.admit(&mut batch),
            Err(CollageError::UploadPending { pending: 1 })
        ));
        let after: Vec<_> = session.photos().iter().map(Photo::id).collect();
        assert_eq!(before, after);
        assert!(session.preview().is_some());

        batch.complete(0, photos(1).remove(0)).unwrap();
        session.admit(&mut batch).unwrap();
        assert_eq!(session.photos().len(), 3);
    }

    #[test]
    fn over_cap_batch_is_rejected_and_kept() {
        let mut session = session_with(MAX_PHOTOS - 1);
        let mut batch = UploadBatch::new(2);
        for (index, photo) in photos(2).into_iter().enumerate() {
            batch.complete(index, photo).unwrap();
        }
        assert!(matches!(
            session.admit(&mut batch),
            Err(CollageError::CapacityExceeded { incoming: 2, .. })
        ));
        assert_eq!(session.photos().len(), MAX_PHOTOS - 1);
        assert_eq!(batch.decoded(), 2);
    }

    #[test]
    fn same_seed_same_mosaic() {
        let render = |seed| {
            let mut session = Session::with_rng(StdRng::seed_from_u64(seed));
            session.add_photos(photos(5)).unwrap();
            session.set_layout(LayoutKind::Mosaic);
            session.generate().unwrap().slots().to_vec()
        };
        assert_eq!(render(11), render(11));
    }

    #[test]
    fn profile_round_trip_through_session() {
        let profile = CollageProfile::new()
            .with_layout(LayoutKind::Horizontal)
            .with_canvas(CanvasSettings {
                width: 600,
                height: 400,
            })
            .with_export_label("trip");

        let mut session = session_with(1);
        session.apply_profile(&profile).unwrap();
        assert_eq!(session.layout(), LayoutKind::Horizontal);
        assert_eq!(session.composer().canvas(), SizePx::new(600, 400));
        assert_eq!(session.export_profile(), profile);

        let result = session.generate().unwrap();
        assert_eq!(result.image().dimensions(), (600, 400));
        let export = session.export(date()).unwrap();
        assert_eq!(export.file_name, "trip-水平展开-2024-01-15.png");
    }

    #[test]
    fn bad_profile_changes_nothing() {
        let mut session = session_with(1);
        let profile = CollageProfile::new()
            .with_layout(LayoutKind::Mosaic)
            .with_theme(ThemeSettings {
                panel: "#zzzzzz".into(),
                ..ThemeSettings::default()
            });

        assert!(matches!(
            session.apply_profile(&profile),
            Err(CollageError::InvalidColor { .. })
        ));
        assert_eq!(session.layout(), LayoutKind::Grid);
    }

    #[test]
    fn theme_change_drops_the_preview() {
        let mut session = session_with(1);
        session.generate().unwrap();

        let unchanged = session.export_profile();
        session.apply_profile(&unchanged).unwrap();
        assert!(session.preview().is_some());

        let darker = unchanged.with_theme(ThemeSettings {
            panel: "#111827".into(),
            ..ThemeSettings::default()
        });
        session.apply_profile(&darker).unwrap();
        assert!(session.preview().is_none());
    }

    #[test]
    fn profile_is_refused_while_rendering() {
        let mut session = session_with(1);
        let ticket = session.begin_render().unwrap();
        let profile = CollageProfile::new()
            .with_layout(LayoutKind::Vertical)
            .with_canvas(CanvasSettings {
                width: 300,
                height: 200,
            });

        assert!(matches!(
            session.apply_profile(&profile),
            Err(CollageError::Busy)
        ));
        assert_eq!(session.layout(), LayoutKind::Grid);

        let result = session.finish_render(ticket).unwrap();
        assert_eq!(result.image().dimensions(), (1200, 800));
        session.apply_profile(&profile).unwrap();
        assert_eq!(session.composer().canvas(), SizePx::new(300, 200));
    }

    #[test]
    fn composer_setters_drop_the_preview() {
        let mut session = session_with(1);
        session.generate().unwrap();

        session.set_canvas(CANVAS_SIZE).unwrap();
        assert!(session.preview().is_some());

        session.set_canvas(SizePx::new(640, 480)).unwrap();
        assert!(session.preview().is_none());

        session.generate().unwrap();
        let theme = Theme {
            panel: palette::Srgb::new(0, 0, 0),
            ..Theme::default()
        };
        session.set_theme(theme).unwrap();
        assert!(session.preview().is_none());
        assert_eq!(session.composer().theme, theme);
    }

    #[test]
    fn composer_setters_are_refused_while_rendering() {
        let mut session = session_with(1);
        let ticket = session.begin_render().unwrap();
        assert!(matches!(
            session.set_canvas(SizePx::new(10, 10)),
            Err(CollageError::Busy)
        ));
        assert!(matches!(
            session.set_theme(Theme::default()),
            Err(CollageError::Busy)
        ));
        session.cancel_render(ticket);
        assert_eq!(session.composer().canvas(), CANVAS_SIZE);
    }
}
