// Text measurement + a scalable 5x7 bitmap face.
// The packer only needs advance widths and ascents; `TextMeasure` is the seam
// where a host with a real font engine plugs in.

/// Glyph cell grid: 5 columns of ink + 1 column spacing, 7 rows above the baseline.
pub const GLYPH_COLS: usize = 5;
pub const GLYPH_ROWS: usize = 7;
const ADVANCE_CELLS: f32 = 6.0;
/// One cell is a tenth of the font size, so caps are 0.7em tall and the advance is 0.6em.
const CELLS_PER_EM: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    pub width: f32,  // advance of the whole string
    pub ascent: f32, // how far the tallest glyph reaches above the baseline
}

/// Measures text for a font family and size.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_family: &str, font_size: f32) -> TextMetrics;
}

/// Monospaced 5x7 face scaled to any size. The family name is not used for
/// shapes (there is only one face); it is still carried into the export.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapFont;

impl BitmapFont {
    #[inline]
    pub fn cell(font_size: f32) -> f32 {
        font_size / CELLS_PER_EM
    }

    /// Paint `text` with its baseline at `baseline`, calling `fill` for every ink cell
    /// as (x0, y0, x1, y1) in canvas pixels.
    pub fn for_each_cell(
        &self,
        text: &str,
        x: f32,
        baseline: f32,
        font_size: f32,
        mut fill: impl FnMut(f32, f32, f32, f32),
    ) {
        let cell = Self::cell(font_size);
        let top = baseline - GLYPH_ROWS as f32 * cell;
        for (n, ch) in text.chars().enumerate() {
            let rows = glyph5x7(ch);
            let gx = x + n as f32 * ADVANCE_CELLS * cell;
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..GLYPH_COLS {
                    if (rowbits & (1 << (GLYPH_COLS - 1 - rx))) != 0 {
                        let x0 = gx + rx as f32 * cell;
                        let y0 = top + ry as f32 * cell;
                        fill(x0, y0, x0 + cell, y0 + cell);
                    }
                }
            }
        }
    }
}

impl TextMeasure for BitmapFont {
    fn measure(&self, text: &str, _font_family: &str, font_size: f32) -> TextMetrics {
        let cell = Self::cell(font_size);
        let mut count = 0usize;
        let mut rows_up = 0usize;
        for ch in text.chars() {
            count += 1;
            rows_up = rows_up.max(glyph_height(ch));
        }
        TextMetrics {
            width: count as f32 * ADVANCE_CELLS * cell,
            ascent: rows_up as f32 * cell,
        }
    }
}

/// Rows of ink from the topmost lit row down to the baseline.
fn glyph_height(ch: char) -> usize {
    glyph5x7(ch)
        .iter()
        .position(|&r| r != 0)
        .map_or(0, |top| GLYPH_ROWS - top)
}

/// 5x7 glyph bitmap for a character.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
/// Lowercase letters share the capital shapes; anything unknown draws as a hollow box.
pub fn glyph5x7(ch: char) -> [u8; 7] {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        [$a,$b,$c,$d,$e,$f,$g]
    }; }

    if ch.is_whitespace() {
        return g!(0,0,0,0,0,0,0);
    }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Punctuation
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        ';' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00100,0b01000),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),
        '"' => g!(0b01010,0b01010,0b00000,0b00000,0b00000,0b00000,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '_' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '*' => g!(0b00000,0b00100,0b10101,0b01110,0b10101,0b00100,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '#' => g!(0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010),
        '&' => g!(0b01100,0b10010,0b10100,0b01000,0b10101,0b10010,0b01101),

        _ => g!(0b11111,0b10001,0b10001,0b10001,0b10001,0b10001,0b11111),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_proportional_to_char_count() {
        let font = BitmapFont;
        let one = font.measure("H", "serif", 15.0);
        let three = font.measure("Hi ", "serif", 15.0);
        assert_eq!(one.width, 9.0);
        assert_eq!(three.width, 27.0);
        assert_eq!(font.measure("", "serif", 15.0).width, 0.0);
    }

    #[test]
    fn ascent_follows_the_tallest_glyph() {
        let font = BitmapFont;
        assert_eq!(font.measure(" ", "serif", 10.0).ascent, 0.0);
        assert_eq!(font.measure(".", "serif", 10.0).ascent, 2.0);
        assert_eq!(font.measure(". H", "serif", 10.0).ascent, 7.0);
        assert_eq!(font.measure("-", "serif", 20.0).ascent, 8.0);
    }

    #[test]
    fn lowercase_uses_capital_shapes_and_unknowns_box() {
        assert_eq!(glyph5x7('h'), glyph5x7('H'));
        let tofu = glyph5x7('\u{2603}');
        assert_eq!(tofu[0], 0b11111);
        assert_eq!(tofu[3], 0b10001);
    }

    #[test]
    fn cells_land_inside_the_advance_box() {
        let font = BitmapFont;
        let mut cells = Vec::new();
        font.for_each_cell("I", 100.0, 50.0, 10.0, |x0, y0, x1, y1| cells.push((x0, y0, x1, y1)));
        assert!(!cells.is_empty());
        for (x0, y0, x1, y1) in cells {
            assert!(x0 >= 100.0 && x1 <= 105.0);
            assert!(y0 >= 43.0 && y1 <= 50.0);
        }
    }
}
