// Builds what the user sees each layout pass, plus the vector copy we export.
// Visual: picture (centred, 90% fit) -> packed text -> translucent brush disc.

use crate::draw::DrawSurface;
use crate::font::BitmapFont;
use crate::mask::MaskSurface;
use crate::types::{DirtyBounds, Point, StyleParams, TextRun};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::fmt::Write as _;

/// Share of the canvas the picture may occupy along its tighter axis.
pub const IMAGE_FIT: f32 = 0.9;

const BACKGROUND: u32 = 0x00_FF_FF_FF;
const TEXT_COLOR: u32 = 0x00_00_00_00;
const CURSOR_FILL: u32 = 0x00_FF_FF_FF; // white at 80%
const CURSOR_FILL_ALPHA: f32 = 0.8;
const CURSOR_EDGE: u32 = 0x00_00_00_00;
const MASK_TINT: u32 = 0x00_FF_33_66;
const MASK_TINT_ALPHA: f32 = 0.35;

/// The source picture, pre-scaled once to its on-canvas size.
pub struct BaseImage {
    scaled: RgbaImage,
    x: i32,
    y: i32,
}

impl BaseImage {
    /// Scale by `0.9 * min(W/iw, H/ih)` (aspect preserved) and centre on the canvas.
    pub fn fit(source: &RgbaImage, width: usize, height: usize) -> Self {
        let (iw, ih) = source.dimensions();
        let s = IMAGE_FIT * (width as f32 / iw.max(1) as f32).min(height as f32 / ih.max(1) as f32);
        let w = (s * iw as f32).round().max(1.0);
        let h = (s * ih as f32).round().max(1.0);
        let scaled = imageops::resize(source, w as u32, h as u32, FilterType::Triangle);
        Self {
            scaled,
            x: ((width as f32 - w) / 2.0).round() as i32,
            y: ((height as f32 - h) / 2.0).round() as i32,
        }
    }

    /// (x, y, w, h) on the canvas.
    pub fn placement(&self) -> (i32, i32, u32, u32) {
        (self.x, self.y, self.scaled.width(), self.scaled.height())
    }
}

/// One `<text>` element of the export.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgText {
    pub x: f32,
    pub y: f32, // baseline
    pub text: String,
    pub font_family: String,
    pub font_size: f32,
}

/// Structured copy of the placed text: the real output of the tool.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorOverlay {
    pub width: usize,
    pub height: usize,
    pub texts: Vec<SvgText>,
}

impl VectorOverlay {
    pub fn empty(width: usize, height: usize) -> Self {
        Self { width, height, texts: Vec::new() }
    }

    /// One text element per run, baseline one font size below the run's top.
    pub fn from_runs(runs: &[TextRun], style: &StyleParams, width: usize, height: usize) -> Self {
        let texts = runs
            .iter()
            .map(|run| SvgText {
                x: run.x,
                y: run.y + style.font_size,
                text: run.text.clone(),
                font_family: style.font_family.clone(),
                font_size: style.font_size,
            })
            .collect();
        Self { width, height, texts }
    }

    /// The elements as SVG markup, without the enclosing `<svg>`.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for t in &self.texts {
            // Writing into a String cannot fail
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}" style="white-space: pre;">{}</text>"#,
                t.x,
                t.y,
                escape_xml(&t.font_family),
                t.font_size,
                escape_xml(&t.text),
            );
        }
        out
    }
}

/// Escape text for use in element content and double-quoted attributes.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Everything one preview frame is drawn from.
pub struct Scene<'a> {
    pub image: &'a BaseImage,
    pub runs: &'a [TextRun],
    pub style: &'a StyleParams,
    pub cursor: Option<Point>,
    pub mask: &'a MaskSurface,
    pub dirty: DirtyBounds,
}

#[derive(Default)]
pub struct PreviewCompositor {
    font: BitmapFont,
    pub show_mask: bool, // debug: tint painted pixels
}

impl PreviewCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redraw the whole surface and return the matching vector overlay.
    pub fn render<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        scene: &Scene<'_>,
    ) -> VectorOverlay {
        let (width, height) = surface.size();
        surface.clear(BACKGROUND);
        surface.draw_image(&scene.image.scaled, scene.image.x, scene.image.y);

        if self.show_mask && !scene.dirty.is_empty() {
            self.tint_mask(surface, scene.mask, scene.dirty);
        }

        let size = scene.style.font_size;
        for run in scene.runs {
            surface.fill_text(&self.font, &run.text, run.x, run.y + size, size, TEXT_COLOR);
        }

        if let Some(p) = scene.cursor {
            let r = scene.style.line_width * 0.5;
            surface.fill_circle(p.x, p.y, r, CURSOR_FILL, CURSOR_FILL_ALPHA);
            surface.stroke_circle(p.x, p.y, r, CURSOR_EDGE);
        }

        VectorOverlay::from_runs(scene.runs, scene.style, width, height)
    }

    // Only the stroked region can hold paint, so the scan stops at the dirty box
    fn tint_mask<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        mask: &MaskSurface,
        dirty: DirtyBounds,
    ) {
        let x0 = dirty.min_x.floor().max(0.0) as usize;
        let y0 = dirty.min_y.floor().max(0.0) as usize;
        let x1 = (dirty.max_x.ceil().max(0.0) as usize).min(mask.width());
        let y1 = (dirty.max_y.ceil().max(0.0) as usize).min(mask.height());
        for y in y0..y1 {
            for x in x0..x1 {
                if mask.alpha_at(x, y).is_some_and(|a| a > 0) {
                    surface.blend_pixel(x as i32, y as i32, MASK_TINT, MASK_TINT_ALPHA);
                }
            }
        }
    }
}
