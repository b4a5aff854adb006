// Greedy text packing into the open (unpainted) part of the mask.
// Visual: rows of repeating text that flow around whatever has been painted.

use crate::error::Error;
use crate::font::{TextMeasure, TextMetrics};
use crate::mask::MaskSurface;
use crate::types::{StyleParams, TextRun};
use log::debug;

/// Longest run a single growth phase may produce before we call it a bug.
pub const MAX_RUN_CHARS: usize = 1000;

pub struct TextPacker<'a> {
    measure: &'a dyn TextMeasure,
}

impl<'a> TextPacker<'a> {
    pub fn new(measure: &'a dyn TextMeasure) -> Self {
        Self { measure }
    }

    /// Lay the repeating text out top-to-bottom, left-to-right, skipping occluded space.
    /// Runs are rebuilt from scratch on every call.
    pub fn pack(&self, mask: &MaskSurface, style: &StyleParams) -> Result<Vec<TextRun>, Error> {
        let font_size = style.font_size;
        if !(font_size.is_finite() && font_size > 0.0) {
            return Err(Error::InvalidStyle(format!("font size must be positive, got {font_size}")));
        }

        let text = style.repeating_text();
        let width = mask.width() as f32;
        let height = mask.height() as f32;
        let measure =
            |s: &str| -> TextMetrics { self.measure.measure(s, &style.font_family, font_size) };
        // Right edge test: the sample sits one ascent below the top of the line box
        let open = |x: f32, y: f32, m: &TextMetrics| !mask.sample_occlusion(x, y + m.ascent);

        // An advance too small to move x at this magnitude would stall the cursor
        let step = |x: f32, by: f32| -> Result<f32, Error> {
            let next = x + by;
            if next > x {
                Ok(next)
            } else {
                Err(Error::InvalidStyle(format!(
                    "advance of {by}px is lost at x={x}; font size {font_size} is too small"
                )))
            }
        };

        let mut runs = Vec::new();
        let mut buf = String::new();
        // Rows are counted, not accumulated, so y always reaches the bottom
        let (mut x, mut row, mut i) = (0.0f32, 0usize, 0usize);
        let mut y = 0.0f32;

        'rows: while y < height {
            let first = text[i % text.len()];
            buf.clear();
            buf.push(first);
            let glyph = measure(&buf);
            if !(glyph.width.is_finite() && glyph.width > 0.0) {
                return Err(Error::InvalidStyle(format!(
                    "glyph {first:?} measures {}px wide", glyph.width
                )));
            }

            // Seek: hunt for a slot where one glyph fits
            while !(open(x, y, &glyph) && open(x + glyph.width, y, &glyph)) {
                if x + glyph.width > width {
                    x = 0.0;
                    row += 1;
                    y = row as f32 * font_size;
                } else {
                    x = step(x, glyph.width)?;
                }
                if y >= height {
                    break 'rows;
                }
            }

            // Growth: append characters while the right edge stays open
            let mut committed = 1usize;
            let mut run_width = glyph.width;
            loop {
                if committed >= MAX_RUN_CHARS {
                    return Err(Error::PackingOverflow { x, y, limit: MAX_RUN_CHARS });
                }
                buf.push(text[(i + committed) % text.len()]);
                let grown = measure(&buf);
                if !open(x + grown.width, y, &grown) {
                    buf.pop();
                    break;
                }
                committed += 1;
                run_width = grown.width;
            }

            runs.push(TextRun { text: buf.clone(), x, y });
            i = (i + committed) % text.len();
            x = step(x, run_width)?;
        }

        debug!("packed {} runs into {}x{}", runs.len(), mask.width(), mask.height());
        Ok(runs)
    }
}
