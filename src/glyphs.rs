//! Tiny 3x5 bitmap font for figure titles and labels.
//!
//! Drawing text through the plotting backend needs a system font; these glyphs
//! paint straight into the RGB buffer instead.

pub const GLYPH_W: usize = 3;
pub const GLYPH_H: usize = 5;

const fn glyph(ch: char) -> [u8; 5] {
    match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '[' => [0b011, 0b010, 0b010, 0b010, 0b011],
        ']' => [0b110, 0b010, 0b010, 0b010, 0b110],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b111, 0b001, 0b010, 0b000, 0b010],
    }
}

pub struct Canvas<'a> {
    pub buffer: &'a mut [u8],
    pub width: usize,
    pub height: usize,
}

impl Canvas<'_> {
    pub fn put_pixel(&mut self, x: usize, y: usize, color: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * 3;
        self.buffer[idx..idx + 3].copy_from_slice(&color);
    }

    fn draw_char(&mut self, x: usize, y: usize, ch: char, scale: usize, color: [u8; 3]) {
        let rows = glyph(ch.to_ascii_uppercase());
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if (bits >> (GLYPH_W - 1 - col)) & 1 == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        self.put_pixel(x + col * scale + dx, y + row * scale + dy, color);
                    }
                }
            }
        }
    }

    /// Draws `text` with its top-left corner at `(x, y)`; clipped at the edges.
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str, scale: usize, color: [u8; 3]) {
        let mut cursor = x;
        for ch in text.chars() {
            if cursor >= self.width {
                break;
            }
            self.draw_char(cursor, y, ch, scale, color);
            cursor += advance(scale);
        }
    }

    pub fn draw_text_centered(
        &mut self,
        cx: usize,
        y: usize,
        text: &str,
        scale: usize,
        color: [u8; 3],
    ) {
        let width = text_width(text, scale);
        self.draw_text(cx.saturating_sub(width / 2), y, text, scale, color);
    }
}

fn advance(scale: usize) -> usize {
    (GLYPH_W + 1) * scale
}

pub fn text_width(text: &str, scale: usize) -> usize {
    let n = text.chars().count();
    if n == 0 {
        return 0;
    }
    n * advance(scale) - scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_scaled_pixels_and_clips() {
        let mut buffer = vec![0u8; 20 * 10 * 3];
        let mut canvas = Canvas {
            buffer: &mut buffer,
            width: 20,
            height: 10,
        };
        canvas.draw_text(0, 0, "1", 2, [255, 0, 0]);
        // Top row of '1' is 0b010: only the middle column is lit.
        assert_eq!(&canvas.buffer[0..3], &[0, 0, 0]);
        let idx = 2 * 3;
        assert_eq!(&canvas.buffer[idx..idx + 3], &[255, 0, 0]);

        // Far off the canvas: must not panic.
        canvas.draw_text(18, 8, "WWW", 3, [1, 1, 1]);
    }

    #[test]
    fn text_width_accounts_for_spacing() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("AB", 1), 7);
        assert_eq!(text_width("AB", 3), 21);
    }
}
