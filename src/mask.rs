// Off-screen occlusion mask: the source of truth for where text may go.
// Visual: never shown directly; painted areas are where the text disappears.

use crate::types::{Stroke, StrokeMode};

pub const OPAQUE: u8 = 255;

/// Per-pixel alpha; 0 = open (text allowed), >0 = painted (occluded).
pub struct MaskSurface {
    width: usize,
    height: usize,
    alpha: Vec<u8>, // length = width * height
}

impl MaskSurface {
    /// Fresh, fully open mask for a canvas of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, alpha: vec![0; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw alpha at an in-bounds pixel.
    #[inline]
    pub fn alpha_at(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.alpha[y * self.width + x])
    }

    /// Draw a round-capped segment of width `stroke.diameter`.
    /// Paint writes full alpha, erase writes zero. Coverage is all-or-nothing
    /// per pixel (centre within half the diameter of the segment).
    pub fn apply_stroke(&mut self, stroke: &Stroke) {
        let r = stroke.diameter * 0.5;
        if !(r > 0.0) {
            return;
        }
        let value = match stroke.mode {
            StrokeMode::Paint => OPAQUE,
            StrokeMode::Erase => 0,
        };

        let (ax, ay) = (stroke.from.x, stroke.from.y);
        let (dx, dy) = (stroke.to.x - ax, stroke.to.y - ay);
        let len2 = dx * dx + dy * dy;
        let r2 = r * r;

        // Scan just the segment's bounding box, grown by the radius
        let x0 = (ax.min(stroke.to.x) - r).floor().max(0.0) as usize;
        let y0 = (ay.min(stroke.to.y) - r).floor().max(0.0) as usize;
        let x1 = ((ax.max(stroke.to.x) + r).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((ay.max(stroke.to.y) + r).ceil().max(0.0) as usize).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                let cx = px as f32 + 0.5 - ax;
                let cy = py as f32 + 0.5 - ay;
                // Nearest point on the segment; a zero-length segment is a dot
                let t = if len2 > 0.0 { ((cx * dx + cy * dy) / len2).clamp(0.0, 1.0) } else { 0.0 };
                let ex = cx - t * dx;
                let ey = cy - t * dy;
                if ex * ex + ey * ey <= r2 {
                    self.alpha[py * self.width + px] = value;
                }
            }
        }
    }

    /// Whether text may NOT be placed at (x, y).
    /// x outside the canvas is occluded; y outside the canvas is open workspace.
    pub fn sample_occlusion(&self, x: f32, y: f32) -> bool {
        let fx = x.floor();
        if !(fx >= 0.0 && fx < self.width as f32) {
            return true;
        }
        let fy = y.floor();
        if !(fy >= 0.0 && fy < self.height as f32) {
            return false;
        }
        self.alpha[fy as usize * self.width + fx as usize] > 0
    }

    /// Clear the mask to fully open.
    pub fn clear(&mut self) {
        self.alpha.fill(0);
    }

    /// Number of painted pixels.
    pub fn occluded_count(&self) -> usize {
        self.alpha.iter().filter(|&&a| a > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn stroke(from: (f32, f32), to: (f32, f32), diameter: f32, mode: StrokeMode) -> Stroke {
        Stroke { from: Point::new(from.0, from.1), to: Point::new(to.0, to.1), diameter, mode }
    }

    fn occluded_set(mask: &MaskSurface) -> Vec<bool> {
        mask.alpha.iter().map(|&a| a > 0).collect()
    }

    #[test]
    fn dot_stroke_occludes_its_centre_only() {
        let mut mask = MaskSurface::new(600, 800);
        mask.apply_stroke(&stroke((300.0, 400.0), (300.0, 400.0), 60.0, StrokeMode::Paint));

        assert!(mask.sample_occlusion(300.0, 400.0));
        assert!(mask.sample_occlusion(320.0, 400.0));
        assert!(!mask.sample_occlusion(0.0, 0.0));
        assert!(!mask.sample_occlusion(340.0, 400.0));
    }

    #[test]
    fn out_of_bounds_sampling() {
        let mask = MaskSurface::new(10, 10);
        assert!(mask.sample_occlusion(10.0, 5.0));
        assert!(mask.sample_occlusion(-1.0, 5.0));
        assert!(!mask.sample_occlusion(5.0, 10.0));
        assert!(!mask.sample_occlusion(5.0, 1e6));
        assert!(!mask.sample_occlusion(9.99, 0.0));
    }

    #[test]
    fn segment_has_round_caps() {
        let mut mask = MaskSurface::new(200, 200);
        mask.apply_stroke(&stroke((50.0, 100.0), (150.0, 100.0), 20.0, StrokeMode::Paint));

        assert!(mask.sample_occlusion(100.0, 100.0));
        assert!(mask.sample_occlusion(100.0, 108.0));
        assert!(!mask.sample_occlusion(100.0, 112.0));
        // Caps extend past the endpoints along the axis, but not at the corners
        assert!(mask.sample_occlusion(157.0, 100.0));
        assert!(!mask.sample_occlusion(158.0, 109.0));
    }

    #[test]
    fn painting_only_grows_the_occluded_set() {
        let mut mask = MaskSurface::new(120, 120);
        let strokes = [
            stroke((10.0, 10.0), (60.0, 40.0), 12.0, StrokeMode::Paint),
            stroke((60.0, 40.0), (100.0, 110.0), 30.0, StrokeMode::Paint),
            stroke((0.0, 119.0), (119.0, 0.0), 4.0, StrokeMode::Paint),
        ];
        let mut before = occluded_set(&mask);
        for s in &strokes {
            mask.apply_stroke(s);
            let after = occluded_set(&mask);
            assert!(before.iter().zip(&after).all(|(b, a)| !b || *a));
            before = after;
        }
    }

    #[test]
    fn erase_undoes_the_same_stroke_on_a_fresh_buffer() {
        let mut mask = MaskSurface::new(100, 100);
        let paint = stroke((5.0, 90.0), (80.0, 20.0), 17.0, StrokeMode::Paint);
        mask.apply_stroke(&paint);
        assert!(mask.occluded_count() > 0);

        mask.apply_stroke(&Stroke { mode: StrokeMode::Erase, ..paint });
        assert_eq!(mask.occluded_count(), 0);
    }

    #[test]
    fn strokes_are_clipped_to_the_canvas() {
        let mut mask = MaskSurface::new(20, 20);
        mask.apply_stroke(&stroke((-30.0, -30.0), (5.0, 5.0), 10.0, StrokeMode::Paint));
        assert!(mask.sample_occlusion(0.0, 0.0));
        assert!(mask.sample_occlusion(5.0, 5.0));
        assert!(!mask.sample_occlusion(15.0, 15.0));
    }

    #[test]
    fn clear_reopens_everything() {
        let mut mask = MaskSurface::new(30, 30);
        mask.apply_stroke(&stroke((15.0, 15.0), (15.0, 15.0), 20.0, StrokeMode::Paint));
        mask.clear();
        assert_eq!(mask.occluded_count(), 0);
        assert_eq!(mask.alpha_at(15, 15), Some(0));
        assert_eq!(mask.alpha_at(30, 0), None);
    }
}
