// Core value types shared by the mask, the packer and the compositor.

/// Fixed canvas size, established once the source image loads.
pub const CANVAS_WIDTH: usize = 600;
pub const CANVAS_HEIGHT: usize = 800;

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Paint covers pixels, erase clears them back to open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeMode {
    Paint,
    Erase,
}

/// One round-capped segment of the brush. Only its effect on the mask persists.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub from: Point,
    pub to: Point,
    pub diameter: f32, // brush width in pixels (the `linewidth` setting)
    pub mode: StrokeMode,
}

/// Pointer buttons held during an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Buttons {
    pub primary: bool,
    pub secondary: bool,
}

impl Buttons {
    pub const NONE: Buttons = Buttons { primary: false, secondary: false };
    pub const PRIMARY: Buttons = Buttons { primary: true, secondary: false };
    pub const SECONDARY: Buttons = Buttons { primary: false, secondary: true };

    pub fn any(&self) -> bool {
        self.primary || self.secondary
    }

    /// Secondary button erases; anything else paints.
    pub fn mode(&self) -> StrokeMode {
        if self.secondary { StrokeMode::Erase } else { StrokeMode::Paint }
    }
}

/// Running bounding box of every stroke applied this session.
/// Starts "inverted" (min = canvas size, max = 0) so the first stroke sets it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirtyBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl DirtyBounds {
    pub fn empty(width: usize, height: usize) -> Self {
        Self { min_x: width as f32, min_y: height as f32, max_x: 0.0, max_y: 0.0 }
    }

    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    /// Grow to include a disc of `radius` around `p`.
    pub fn include(&mut self, p: Point, radius: f32) {
        self.min_x = self.min_x.min(p.x - radius);
        self.min_y = self.min_y.min(p.y - radius);
        self.max_x = self.max_x.max(p.x + radius);
        self.max_y = self.max_y.max(p.y + radius);
    }
}

/// A contiguous slice of the repeating text placed at one location.
/// `y` is the top of the line box; the baseline sits at `y + font_size`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Host-configurable look of the brush and the packed text.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleParams {
    pub line_width: f32,
    pub font_size: f32,
    pub font_family: String,
    pub text: String,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            line_width: 60.0,
            font_size: 15.0,
            font_family: "serif".to_string(),
            text: "Ho ho ho!".to_string(),
        }
    }
}

impl StyleParams {
    /// The string the packer cycles through: trimmed, plus one separator space.
    pub fn repeating_text(&self) -> Vec<char> {
        let mut chars: Vec<char> = self.text.trim().chars().collect();
        chars.push(' ');
        chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeating_text_is_trimmed_and_space_terminated() {
        let style = StyleParams { text: "  Hi  ".into(), ..StyleParams::default() };
        assert_eq!(style.repeating_text(), vec!['H', 'i', ' ']);

        let blank = StyleParams { text: "   ".into(), ..StyleParams::default() };
        assert_eq!(blank.repeating_text(), vec![' ']);
    }

    #[test]
    fn dirty_bounds_grow_monotonically() {
        let mut b = DirtyBounds::empty(600, 800);
        assert!(b.is_empty());
        b.include(Point::new(100.0, 100.0), 30.0);
        assert_eq!(b, DirtyBounds { min_x: 70.0, min_y: 70.0, max_x: 130.0, max_y: 130.0 });
        b.include(Point::new(110.0, 110.0), 5.0);
        assert_eq!(b.min_x, 70.0);
        assert_eq!(b.max_x, 130.0);
        assert!(!b.is_empty());
    }

    #[test]
    fn secondary_button_selects_erase() {
        assert_eq!(Buttons::PRIMARY.mode(), StrokeMode::Paint);
        assert_eq!(Buttons::SECONDARY.mode(), StrokeMode::Erase);
        assert_eq!(Buttons { primary: true, secondary: true }.mode(), StrokeMode::Erase);
        assert!(!Buttons::NONE.any());
    }
}
