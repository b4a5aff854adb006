// The cut-out widget: owns the mask, the brush, the last layout and the preview.
// Visual: one 600x800 canvas that repacks text after every stroke or setting change.

use crate::brush::BrushStrokeController;
use crate::compositor::{BaseImage, PreviewCompositor, Scene, VectorOverlay};
use crate::config::ConfigChange;
use crate::error::Error;
use crate::export::{Export, ExportBuilder};
use crate::font::TextMeasure;
use crate::loader::{ImageLoader, PendingImage};
use crate::mask::MaskSurface;
use crate::packer::TextPacker;
use crate::types::{
    Buttons, DirtyBounds, FrameBuffer, Point, StyleParams, TextRun, CANVAS_HEIGHT, CANVAS_WIDTH,
};
use log::{debug, error, info, warn};

/// Called with the export every time the user finishes.
pub type FinishCallback = Box<dyn FnMut(&Export)>;

/// State that only exists once a picture has loaded.
struct Session {
    image: BaseImage,
    mask: MaskSurface,
}

pub struct CutoutWidget {
    loader: Box<dyn ImageLoader>,
    measure: Box<dyn TextMeasure>,
    on_finish: FinishCallback,

    style: StyleParams,
    source: Option<String>,
    pending: Option<PendingImage>,
    session: Option<Session>,

    brush: BrushStrokeController,
    pointer_pressed: bool, // cursor disc only while a button is down
    compositor: PreviewCompositor,
    frame: FrameBuffer,
    runs: Vec<TextRun>,
    overlay: VectorOverlay,
    layout_dirty: bool,
}

impl CutoutWidget {
    /// Inert until a `Source` change is applied and its picture loads.
    pub fn new(
        loader: Box<dyn ImageLoader>,
        measure: Box<dyn TextMeasure>,
        on_finish: FinishCallback,
    ) -> Self {
        let mut frame = FrameBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        frame.fill(0x00_FF_FF_FF);
        Self {
            loader,
            measure,
            on_finish,
            style: StyleParams::default(),
            source: None,
            pending: None,
            session: None,
            brush: BrushStrokeController::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            pointer_pressed: false,
            compositor: PreviewCompositor::new(),
            frame,
            runs: Vec::new(),
            overlay: VectorOverlay::empty(CANVAS_WIDTH, CANVAS_HEIGHT),
            layout_dirty: false,
        }
    }

    /* ---------- configuration ---------- */

    pub fn apply(&mut self, change: ConfigChange) {
        debug!("change {change:?}");
        match change {
            ConfigChange::Source(source) => self.start_session(source),
            ConfigChange::FontSize(size) => self.style.font_size = size,
            ConfigChange::FontFamily(family) => self.style.font_family = family,
            ConfigChange::LineWidth(width) => self.style.line_width = width,
            ConfigChange::Text(text) => self.style.text = text,
        }
        self.request_layout();
    }

    /// Attribute-style entry point for hosts that speak in name/value pairs.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let change = ConfigChange::parse(name, value)?;
        self.apply(change);
        Ok(())
    }

    // Full restart: the old mask, bounds and layout belong to the old picture
    fn start_session(&mut self, source: String) {
        info!("loading source {source}");
        self.pending = Some(self.loader.load(&source));
        self.source = Some(source);
        self.session = None;
        self.brush.reset();
        self.pointer_pressed = false;
        self.runs.clear();
        self.overlay = VectorOverlay::empty(CANVAS_WIDTH, CANVAS_HEIGHT);
        self.layout_dirty = false;
        self.frame.fill(0x00_FF_FF_FF);
    }

    /* ---------- scheduling ---------- */

    /// Mark the preview dirty; at most one pass runs on the next `tick`.
    /// Ignored until a picture has loaded.
    pub fn request_layout(&mut self) {
        if self.session.is_some() {
            self.layout_dirty = true;
        }
    }

    /// One animation frame: pick up a finished load, then run the pending layout.
    /// Returns whether a layout pass completed.
    pub fn tick(&mut self) -> Result<bool, Error> {
        self.poll_load()?;
        if !self.layout_dirty {
            return Ok(false);
        }
        self.layout_dirty = false;
        self.layout()?;
        Ok(true)
    }

    fn poll_load(&mut self) -> Result<(), Error> {
        let Some(result) = self.pending.as_mut().and_then(PendingImage::try_take) else {
            return Ok(());
        };
        self.pending = None;
        let picture = result.inspect_err(|e| error!("source failed to load: {e}"))?;
        info!(
            "source loaded ({}x{}), canvas {CANVAS_WIDTH}x{CANVAS_HEIGHT}",
            picture.width(),
            picture.height()
        );
        self.session = Some(Session {
            image: BaseImage::fit(&picture, CANVAS_WIDTH, CANVAS_HEIGHT),
            mask: MaskSurface::new(CANVAS_WIDTH, CANVAS_HEIGHT),
        });
        self.brush.reset();
        self.layout_dirty = true;
        Ok(())
    }

    /// Repack and redraw. A failed pass leaves the previous runs, overlay and frame untouched.
    fn layout(&mut self) -> Result<(), Error> {
        let Some(session) = &self.session else {
            return Err(Error::NotLoaded);
        };
        let runs = TextPacker::new(self.measure.as_ref())
            .pack(&session.mask, &self.style)
            .inspect_err(|e| warn!("layout pass abandoned: {e}"))?;
        let scene = Scene {
            image: &session.image,
            runs: &runs,
            style: &self.style,
            cursor: self.cursor_indicator(),
            mask: &session.mask,
            dirty: self.brush.dirty_bounds(),
        };
        self.overlay = self.compositor.render(&mut self.frame, &scene);
        self.runs = runs;
        Ok(())
    }

    /* ---------- pointer input ---------- */

    pub fn pointer_down(&mut self, p: Point) {
        if self.session.is_some() {
            self.brush.pointer_down(p);
            self.pointer_pressed = true;
        }
    }

    pub fn pointer_move(&mut self, p: Point, buttons: Buttons) {
        let Some(session) = self.session.as_mut() else { return };
        if self.brush.pointer_move(p, buttons, self.style.line_width, &mut session.mask) {
            self.request_layout();
        }
    }

    pub fn pointer_up(&mut self) {
        if self.session.is_some() {
            self.brush.pointer_up();
            self.pointer_pressed = false;
            self.request_layout();
        }
    }

    /// Wipe every stroke (keeps the picture).
    pub fn clear_mask(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.mask.clear();
            self.request_layout();
        }
    }

    pub fn toggle_mask_tint(&mut self) {
        self.compositor.show_mask = !self.compositor.show_mask;
        self.request_layout();
    }

    /* ---------- output ---------- */

    /// Export the current overlay and hand it to the host.
    pub fn finish(&mut self) -> Result<Export, Error> {
        if self.session.is_none() {
            return Err(Error::NotLoaded);
        }
        let export = ExportBuilder::build(&self.overlay);
        info!(
            "finished: {} text elements, {} bytes",
            self.overlay.texts.len(),
            export.content.len()
        );
        (self.on_finish)(&export);
        Ok(export)
    }

    /* ---------- accessors ---------- */

    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn style(&self) -> &StyleParams {
        &self.style
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn overlay(&self) -> &VectorOverlay {
        &self.overlay
    }

    pub fn mask(&self) -> Option<&MaskSurface> {
        self.session.as_ref().map(|s| &s.mask)
    }

    /// Last tracked pointer position (hover included).
    pub fn cursor(&self) -> Option<Point> {
        self.brush.cursor()
    }

    /// Where the brush disc is drawn: the tracked position, only while pressed.
    pub fn cursor_indicator(&self) -> Option<Point> {
        self.cursor().filter(|_| self.pointer_pressed)
    }

    pub fn dirty_bounds(&self) -> DirtyBounds {
        self.brush.dirty_bounds()
    }
}
