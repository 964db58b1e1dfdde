use std::fmt;

pub const LORES_WIDTH: usize = 64;
pub const LORES_HEIGHT: usize = 32;
pub const HIRES_WIDTH: usize = 128;
pub const HIRES_HEIGHT: usize = 64;

const SCROLL_COLUMNS: usize = 4;

/// Monochrome pixel grid. Replaced outright when the resolution changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    bit_buffer: Vec<bool>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bit_buffer: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[bool] {
        &self.bit_buffer
    }

    /// Out of range coordinates read as unset.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bit_buffer[y * self.width + x]
    }

    /// Out of range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x < self.width && y < self.height {
            self.bit_buffer[y * self.width + x] = on;
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer.fill(false);
    }

    // flips one pixel, true when it was switched off
    fn flip(&mut self, x: usize, y: usize) -> bool {
        let index = y * self.width + x;
        let previous = self.bit_buffer[index];
        self.bit_buffer[index] = !previous;
        previous
    }

    /// XORs an 8-pixel-wide sprite onto the grid. The origin wraps, the
    /// sprite body is clipped at the right and bottom edges. Returns the
    /// collision flag.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let (ox, oy) = (x as usize % self.width, y as usize % self.height);
        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = oy + i;
            if ny >= self.height {
                break;
            }
            for j in 0..8 {
                let nx = ox + j;
                if nx >= self.width {
                    break;
                }
                if (row >> (7 - j)) & 1 == 1 {
                    vf |= self.flip(nx, ny);
                }
            }
        }
        vf
    }

    /// XORs a 16x16 sprite (two bytes per row) onto the grid. Pixels past an
    /// edge wrap to the opposite side.
    pub fn paint_wide(&mut self, x: u8, y: u8, sprite: &[u8; 32]) -> bool {
        let (ox, oy) = (x as usize % self.width, y as usize % self.height);
        let mut vf = false;
        for (i, pair) in sprite.chunks_exact(2).enumerate() {
            let row = u16::from_be_bytes([pair[0], pair[1]]);
            let ny = (oy + i) % self.height;
            for j in 0..16 {
                if (row >> (15 - j)) & 1 == 1 {
                    let nx = (ox + j) % self.width;
                    vf |= self.flip(nx, ny);
                }
            }
        }
        vf
    }

    pub fn scroll_right(&mut self) {
        let shift = SCROLL_COLUMNS.min(self.width);
        for row in self.bit_buffer.chunks_exact_mut(self.width) {
            row.rotate_right(shift);
            row[..shift].fill(false);
        }
    }

    pub fn scroll_left(&mut self) {
        let shift = SCROLL_COLUMNS.min(self.width);
        for row in self.bit_buffer.chunks_exact_mut(self.width) {
            row.rotate_left(shift);
            let width = row.len();
            row[width - shift..].fill(false);
        }
    }

    /// Moves every row `n` rows toward the bottom, clearing the vacated top.
    pub fn scroll_down(&mut self, n: u8) {
        let shift = (n as usize).min(self.height) * self.width;
        self.bit_buffer.rotate_right(shift);
        self.bit_buffer[..shift].fill(false);
    }
}

impl fmt::Display for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.bit_buffer.chunks_exact(self.width) {
            let line: String = row.iter().map(|on| if *on { '█' } else { ' ' }).collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lit(fb: &FrameBuffer) -> Vec<(usize, usize)> {
        let mut on = vec![];
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                if fb.get(x, y) {
                    on.push((x, y));
                }
            }
        }
        on
    }

    #[test]
    fn test_paint_twice_restores() {
        let mut fb = FrameBuffer::new(LORES_WIDTH, LORES_HEIGHT);
        fb.set(20, 20, true);
        let before = fb.clone();
        assert!(!fb.paint(1, 2, &[0b1010_0000, 0xFF]));
        assert!(fb.paint(1, 2, &[0b1010_0000, 0xFF]));
        assert_eq!(fb, before);
    }

    #[test]
    fn test_paint_collision_only_on_overlap() {
        let mut fb = FrameBuffer::new(LORES_WIDTH, LORES_HEIGHT);
        assert!(!fb.paint(0, 0, &[0xF0]));
        assert!(!fb.paint(4, 0, &[0xF0]));
        assert!(fb.paint(7, 0, &[0x80]));
        assert!(!fb.get(7, 0));
    }

    #[test]
    fn test_paint_clips_at_edges() {
        let mut fb = FrameBuffer::new(LORES_WIDTH, LORES_HEIGHT);
        fb.paint(60, 30, &[0xFF, 0xFF, 0xFF, 0xFF]);
        let on = lit(&fb);
        assert_eq!(on.len(), 8);
        assert!(on.iter().all(|(x, y)| *x >= 60 && *y >= 30));
        // nothing wrapped around to the left or top
        assert!(!fb.get(0, 30));
        assert!(!fb.get(60, 0));
    }

    #[test]
    fn test_paint_origin_wraps() {
        let mut fb = FrameBuffer::new(LORES_WIDTH, LORES_HEIGHT);
        fb.paint(64 + 2, 32 + 1, &[0x80]);
        assert_eq!(lit(&fb), vec![(2, 1)]);
    }

    #[test]
    fn test_paint_wide_wraps() {
        let mut fb = FrameBuffer::new(HIRES_WIDTH, HIRES_HEIGHT);
        let mut sprite = [0u8; 32];
        sprite[0] = 0x80;
        sprite[1] = 0x01;
        sprite[30] = 0x80;
        assert!(!fb.paint_wide(120, 60, &sprite));
        assert_eq!(lit(&fb), vec![(120, 11), (7, 60), (120, 60)]);
        assert!(fb.paint_wide(120, 60, &sprite));
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn test_scroll_right_and_left() {
        let mut fb = FrameBuffer::new(HIRES_WIDTH, HIRES_HEIGHT);
        fb.set(0, 0, true);
        fb.set(126, 5, true);
        fb.scroll_right();
        assert_eq!(lit(&fb), vec![(4, 0)]);
        fb.scroll_left();
        fb.scroll_left();
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn test_scroll_down() {
        let mut fb = FrameBuffer::new(LORES_WIDTH, LORES_HEIGHT);
        fb.set(5, 0, true);
        fb.set(6, 30, true);
        fb.scroll_down(2);
        assert_eq!(lit(&fb), vec![(5, 2)]);
        fb.scroll_down(0xF);
        assert_eq!(lit(&fb), vec![(5, 17)]);
        fb.scroll_down(0xF);
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn test_scroll_down_past_height_clears() {
        let mut fb = FrameBuffer::new(8, 4);
        fb.set(1, 1, true);
        fb.scroll_down(9);
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn test_get_set_out_of_range() {
        let mut fb = FrameBuffer::new(LORES_WIDTH, LORES_HEIGHT);
        fb.set(64, 0, true);
        fb.set(0, 32, true);
        assert!(lit(&fb).is_empty());
        assert!(!fb.get(1000, 1000));
    }

    #[test]
    fn test_text_rendering() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.set(0, 0, true);
        fb.set(2, 1, true);
        assert_eq!(fb.to_string(), "█\n  █\n");
    }
}
