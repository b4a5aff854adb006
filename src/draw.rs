// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the canvas (picture, packed text, brush cursor).
// 2) Raster primitives the compositor draws with (image blit, discs, rings, text).
// 3) A tiny HUD line using the 5x7 font.

use crate::error::Error;
use crate::font::{glyph5x7, BitmapFont, GLYPH_COLS};
use crate::gamma::GammaLut;
use crate::types::{Buttons, FrameBuffer};
use image::RgbaImage;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::ops::Range;

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the canvas.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Mouse position in canvas pixels, None while the pointer is outside the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    /// Left paints, right erases.
    pub fn buttons(&self) -> Buttons {
        Buttons {
            primary: self.window.get_mouse_down(MouseButton::Left),
            secondary: self.window.get_mouse_down(MouseButton::Right),
        }
    }

    /// F or Enter: finish and export.
    pub fn finish_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::F, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Enter, KeyRepeat::No)
    }

    /// C: wipe the mask.
    pub fn c_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::C, KeyRepeat::No)
    }

    /// M: toggle the mask tint (debug).
    pub fn m_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::M, KeyRepeat::No)
    }
}

/* ---------- Drawing surface: the raster capability the compositor needs ---------- */

/// Minimal 2D raster target. Implementors provide pixel access; the drawing
/// operations are built on top.
pub trait DrawSurface {
    fn size(&self) -> (usize, usize);
    fn pixel(&self, x: usize, y: usize) -> u32;
    fn set_pixel(&mut self, x: usize, y: usize, color: u32);
    fn clear(&mut self, color: u32);

    /// Put a pixel if (x,y) is inside bounds.
    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, color: u32) {
        let (w, h) = self.size();
        if x < 0 || y < 0 || x as usize >= w || y as usize >= h {
            return;
        }
        self.set_pixel(x as usize, y as usize, color);
    }

    /// Mix `color` into the pixel with coverage `alpha`.
    #[inline]
    fn blend_pixel(&mut self, x: i32, y: i32, color: u32, alpha: f32) {
        let (w, h) = self.size();
        if x < 0 || y < 0 || x as usize >= w || y as usize >= h {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let mixed = GammaLut::shared().blend(self.pixel(x, y), color, alpha);
        self.set_pixel(x, y, mixed);
    }

    /// Fill pixels whose centres fall inside the rectangle; never less than one pixel.
    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: u32) {
        let px0 = (x0 - 0.5).ceil() as i32;
        let py0 = (y0 - 0.5).ceil() as i32;
        let px1 = ((x1 - 0.5).ceil() as i32).max(px0 + 1);
        let py1 = ((y1 - 0.5).ceil() as i32).max(py0 + 1);
        for y in py0..py1 {
            for x in px0..px1 {
                self.put_pixel(x, y, color);
            }
        }
    }

    /// Blit an RGBA image with its top-left corner at (x, y), honouring its alpha.
    fn draw_image(&mut self, img: &RgbaImage, x: i32, y: i32) {
        for (ix, iy, p) in img.enumerate_pixels() {
            let [r, g, b, a] = p.0;
            if a == 0 {
                continue;
            }
            let color = ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
            self.blend_pixel(x + ix as i32, y + iy as i32, color, a as f32 / 255.0);
        }
    }

    /// Translucent disc.
    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: u32, alpha: f32) {
        let r2 = r * r;
        let (xs, ys) = clip_span(self.size(), cx, cy, r);
        for y in ys {
            for x in xs.clone() {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(x, y, color, alpha);
                }
            }
        }
    }

    /// One pixel wide ring.
    fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        let (xs, ys) = clip_span(self.size(), cx, cy, r + 1.0);
        for y in ys {
            for x in xs.clone() {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if ((dx * dx + dy * dy).sqrt() - r).abs() <= 0.5 {
                    self.put_pixel(x, y, color);
                }
            }
        }
    }

    /// Text in the scalable bitmap face, baseline at `baseline`.
    fn fill_text(
        &mut self,
        font: &BitmapFont,
        text: &str,
        x: f32,
        baseline: f32,
        font_size: f32,
        color: u32,
    ) {
        font.for_each_cell(text, x, baseline, font_size, |x0, y0, x1, y1| {
            self.fill_rect(x0, y0, x1, y1, color);
        });
    }
}

/// Bounding box of a circle, clipped to the surface so big radii cost no more than the canvas.
fn clip_span((w, h): (usize, usize), cx: f32, cy: f32, r: f32) -> (Range<i32>, Range<i32>) {
    let clip = |lo: f32, hi: f32, len: usize| {
        let start = lo.floor().max(0.0).min(len as f32) as i32;
        let end = (hi.ceil() + 1.0).max(0.0).min(len as f32) as i32;
        start..end.max(start)
    };
    (clip(cx - r, cx + r, w), clip(cy - r, cy + r, h))
}

impl DrawSurface for FrameBuffer {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        self.pixels[y * self.width + x] = color;
    }

    fn clear(&mut self, color: u32) {
        self.fill(color);
    }
}

/* ---------- HUD text at 1:1 scale ---------- */

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow for contrast.
fn draw_char_5x7<S: DrawSurface + ?Sized>(fb: &mut S, x: i32, y: i32, ch: char, color: u32) {
    let rows = glyph5x7(ch);
    for (offset, c) in [(1, 0x00000000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..GLYPH_COLS {
                if (rowbits & (1 << (GLYPH_COLS - 1 - rx))) != 0 {
                    fb.put_pixel(x + rx as i32 + offset, y + ry as i32 + offset, c);
                }
            }
        }
    }
}

/// Draw a HUD string; each glyph is 5x7 with 1-pixel spacing.
pub fn draw_text_5x7<S: DrawSurface + ?Sized>(
    fb: &mut S,
    mut x: i32,
    y: i32,
    text: &str,
    color: u32,
) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}
