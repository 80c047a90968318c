//! 1 bit per pixel display memory.
//!
//! Cells are addressed as `(line, offset)`, where `line` is the line address
//! the controller selects and `offset` the bit position within that line.
//! A fresh buffer is all 0; the clear command sets every cell to 1.

use crate::config::{BitOrder, Layout};
use image::{GrayImage, Luma};

/// Cell value written by the clear command.
pub const CLEARED: u8 = 1;

pub struct Framebuffer {
    lines: usize,
    bits_per_line: usize,
    cells: Vec<u8>,
}

impl Framebuffer {
    pub fn new(lines: usize, bits_per_line: usize) -> Self {
        Self {
            lines,
            bits_per_line,
            cells: vec![0; lines * bits_per_line],
        }
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn bits_per_line(&self) -> usize {
        self.bits_per_line
    }

    fn index(&self, line: usize, offset: usize) -> Option<usize> {
        (line < self.lines && offset < self.bits_per_line).then(|| line * self.bits_per_line + offset)
    }

    pub fn get(&self, line: usize, offset: usize) -> Option<u8> {
        self.index(line, offset).map(|i| self.cells[i])
    }

    /// Writes one cell. Returns `false` and leaves the buffer untouched when
    /// `(line, offset)` is outside the display.
    pub fn set(&mut self, line: usize, offset: usize, value: u8) -> bool {
        match self.index(line, offset) {
            Some(i) => {
                self.cells[i] = value & 1;
                true
            }
            None => false,
        }
    }

    /// Expands `byte` into the 8 cells starting at `offset` on `line`.
    /// Cells falling outside the display are skipped; returns how many were written.
    pub fn write_byte(&mut self, line: usize, offset: usize, byte: u8, order: BitOrder) -> usize {
        let mut written = 0;
        for (k, bit) in unpack_bits(byte, order).into_iter().enumerate() {
            if self.set(line, offset + k, bit) {
                written += 1;
            }
        }
        written
    }

    pub fn line(&self, line: usize) -> Option<&[u8]> {
        (line < self.lines).then(|| &self.cells[line * self.bits_per_line..(line + 1) * self.bits_per_line])
    }

    pub fn fill(&mut self, value: u8) {
        self.cells.fill(value & 1);
    }

    pub fn clear(&mut self) {
        self.fill(CLEARED);
    }

    pub fn is_uniform(&self, value: u8) -> bool {
        self.cells.iter().all(|&c| c == value)
    }

    /// Renders a luma raster: 1 is white, 0 is black.
    pub fn render(&self, layout: Layout) -> GrayImage {
        let (width, height) = match layout {
            Layout::Columns => (self.lines, self.bits_per_line),
            Layout::Rows => (self.bits_per_line, self.lines),
        };
        GrayImage::from_fn(width as u32, height as u32, |x, y| {
            let (line, offset) = match layout {
                Layout::Columns => (x as usize, y as usize),
                Layout::Rows => (y as usize, x as usize),
            };
            let value = self.cells[line * self.bits_per_line + offset];
            Luma([if value == 0 { 0 } else { 255 }])
        })
    }
}

/// Splits a byte into its 8 bits in pixel order.
pub fn unpack_bits(byte: u8, order: BitOrder) -> [u8; 8] {
    let mut bits = [0u8; 8];
    for (k, bit) in bits.iter_mut().enumerate() {
        let shift = match order {
            BitOrder::Msb => 7 - k,
            BitOrder::Lsb => k,
        };
        *bit = (byte >> shift) & 1;
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_all_zero() {
        let fb = Framebuffer::new(3, 5);
        assert!(fb.is_uniform(0));
        assert_eq!(fb.line(2), Some(&[0u8; 5][..]));
        assert_eq!(fb.line(3), None);
    }

    #[test]
    fn test_unpack_bits() {
        assert_eq!(unpack_bits(0b1011_0000, BitOrder::Msb), [1, 0, 1, 1, 0, 0, 0, 0]);
        assert_eq!(unpack_bits(0b1011_0000, BitOrder::Lsb), [0, 0, 0, 0, 1, 1, 0, 1]);
    }

    #[test]
    fn test_out_of_range_set_is_discarded() {
        let mut fb = Framebuffer::new(2, 4);
        assert!(!fb.set(2, 0, 1));
        assert!(!fb.set(0, 4, 1));
        assert!(fb.is_uniform(0));
        assert!(fb.set(1, 3, 1));
        assert_eq!(fb.get(1, 3), Some(1));
    }

    #[test]
    fn test_write_byte_clips_at_line_end() {
        let mut fb = Framebuffer::new(2, 5);
        assert_eq!(fb.write_byte(0, 0, 0xFF, BitOrder::Msb), 5);
        assert_eq!(fb.line(0), Some(&[1u8; 5][..]));
        assert_eq!(fb.line(1), Some(&[0u8; 5][..]));
    }

    #[test]
    fn test_clear_sets_all_ones() {
        let mut fb = Framebuffer::new(4, 8);
        fb.set(1, 1, 0);
        fb.clear();
        assert!(fb.is_uniform(CLEARED));
    }

    #[test]
    fn test_render_layouts() {
        let mut fb = Framebuffer::new(2, 3);
        fb.set(1, 2, 1);

        let columns = fb.render(Layout::Columns);
        assert_eq!(columns.dimensions(), (2, 3));
        assert_eq!(columns.get_pixel(1, 2).0, [255]);
        assert_eq!(columns.get_pixel(0, 2).0, [0]);

        let rows = fb.render(Layout::Rows);
        assert_eq!(rows.dimensions(), (3, 2));
        assert_eq!(rows.get_pixel(2, 1).0, [255]);
    }
}
