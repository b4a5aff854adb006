// Turns raw pointer samples into stroke segments on the mask.
// Visual: while a button is held, each mouse move extends the painted trail.

use crate::mask::MaskSurface;
use crate::types::{Buttons, DirtyBounds, Point, Stroke};
use log::trace;

/// Pointer state machine: Idle (no anchor) -> Dragging (anchor set) -> Idle on release.
pub struct BrushStrokeController {
    last: Option<Point>,
    bounds: DirtyBounds,
    width: usize,
    height: usize,
}

impl BrushStrokeController {
    pub fn new(width: usize, height: usize) -> Self {
        Self { last: None, bounds: DirtyBounds::empty(width, height), width, height }
    }

    /// Forget the anchor and the accumulated bounds (new source image).
    pub fn reset(&mut self) {
        self.last = None;
        self.bounds = DirtyBounds::empty(self.width, self.height);
    }

    /// First sample only sets the anchor; there is no segment to draw yet.
    pub fn pointer_down(&mut self, p: Point) {
        self.last = Some(p);
    }

    /// Apply a segment from the anchor when a button is held.
    /// Returns true when the mask changed and a re-layout is due.
    /// The anchor always moves to `p`.
    pub fn pointer_move(
        &mut self,
        p: Point,
        buttons: Buttons,
        diameter: f32,
        mask: &mut MaskSurface,
    ) -> bool {
        let drew = match self.last {
            Some(from) if buttons.any() => {
                let stroke = Stroke { from, to: p, diameter, mode: buttons.mode() };
                mask.apply_stroke(&stroke);
                let r = diameter * 0.5;
                self.bounds.include(from, r);
                self.bounds.include(p, r);
                trace!("stroke {:?} -> {:?} ({:?}, {diameter}px)", from, p, stroke.mode);
                true
            }
            _ => false,
        };
        self.last = Some(p);
        drew
    }

    /// Release returns to Idle; the caller should always re-layout to drop the cursor.
    pub fn pointer_up(&mut self) {
        self.last = None;
    }

    /// Last recorded pointer position, used for the live brush indicator.
    pub fn cursor(&self) -> Option<Point> {
        self.last
    }

    /// Advisory box around every stroke so far.
    pub fn dirty_bounds(&self) -> DirtyBounds {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_only_anchors() {
        let mut mask = MaskSurface::new(100, 100);
        let mut brush = BrushStrokeController::new(100, 100);

        brush.pointer_down(Point::new(50.0, 50.0));
        assert_eq!(brush.cursor(), Some(Point::new(50.0, 50.0)));
        assert_eq!(mask.occluded_count(), 0);

        // Move without a button just tracks position
        assert!(!brush.pointer_move(Point::new(60.0, 50.0), Buttons::NONE, 10.0, &mut mask));
        assert_eq!(mask.occluded_count(), 0);
        assert_eq!(brush.cursor(), Some(Point::new(60.0, 50.0)));
        assert!(brush.dirty_bounds().is_empty());
    }

    #[test]
    fn drag_paints_from_the_previous_sample() {
        let mut mask = MaskSurface::new(100, 100);
        let mut brush = BrushStrokeController::new(100, 100);

        brush.pointer_down(Point::new(10.0, 50.0));
        assert!(brush.pointer_move(Point::new(90.0, 50.0), Buttons::PRIMARY, 10.0, &mut mask));
        assert!(mask.sample_occlusion(50.0, 50.0));
        assert!(!mask.sample_occlusion(50.0, 70.0));

        let b = brush.dirty_bounds();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (5.0, 45.0, 95.0, 55.0));
    }

    #[test]
    fn move_without_anchor_draws_nothing() {
        let mut mask = MaskSurface::new(100, 100);
        let mut brush = BrushStrokeController::new(100, 100);

        assert!(!brush.pointer_move(Point::new(20.0, 20.0), Buttons::PRIMARY, 10.0, &mut mask));
        assert_eq!(mask.occluded_count(), 0);
        // ...but the next one does, from the tracked position
        assert!(brush.pointer_move(Point::new(40.0, 20.0), Buttons::PRIMARY, 10.0, &mut mask));
        assert!(mask.sample_occlusion(30.0, 20.0));
    }

    #[test]
    fn secondary_drag_erases() {
        let mut mask = MaskSurface::new(100, 100);
        let mut brush = BrushStrokeController::new(100, 100);

        brush.pointer_down(Point::new(10.0, 50.0));
        brush.pointer_move(Point::new(90.0, 50.0), Buttons::PRIMARY, 20.0, &mut mask);
        brush.pointer_up();
        assert_eq!(brush.cursor(), None);

        brush.pointer_down(Point::new(50.0, 30.0));
        brush.pointer_move(Point::new(50.0, 70.0), Buttons::SECONDARY, 10.0, &mut mask);
        assert!(!mask.sample_occlusion(50.0, 50.0));
        assert!(mask.sample_occlusion(20.0, 50.0));
    }

    #[test]
    fn diameter_is_read_per_stroke() {
        let mut mask = MaskSurface::new(200, 100);
        let mut brush = BrushStrokeController::new(200, 100);

        brush.pointer_down(Point::new(20.0, 50.0));
        brush.pointer_move(Point::new(60.0, 50.0), Buttons::PRIMARY, 4.0, &mut mask);
        brush.pointer_move(Point::new(140.0, 50.0), Buttons::PRIMARY, 40.0, &mut mask);

        assert!(!mask.sample_occlusion(40.0, 60.0));
        assert!(mask.sample_occlusion(100.0, 60.0));
    }

    #[test]
    fn reset_clears_anchor_and_bounds() {
        let mut mask = MaskSurface::new(100, 100);
        let mut brush = BrushStrokeController::new(100, 100);
        brush.pointer_down(Point::new(10.0, 10.0));
        brush.pointer_move(Point::new(20.0, 20.0), Buttons::PRIMARY, 6.0, &mut mask);
        brush.reset();
        assert_eq!(brush.cursor(), None);
        assert!(brush.dirty_bounds().is_empty());
    }
}
