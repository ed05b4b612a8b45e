//! Dot-matrix display grid
//!
//! A `DotMatrix` is a cols x rows grid of packed ARGB cells, allocated once
//! and overwritten in place. The pixelation filter populates it through
//! `project`, a text label can be stamped over it as glyph cells, and the
//! animation loop rotates it one column or row at a time with wrap-around.
//! Rendering draws each populated cell as a lit dot into the pixel buffer;
//! cells that were never written keep zero alpha and stay dark.

use serde::{Deserialize, Serialize};

use crate::color::{alpha, CLEAR};
use crate::display::{glyph, PixelBuffer, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::filter::BlockColor;

/// How a lit cell is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DotShape {
    Square,
    Round,
}

/// Scroll direction for the wrap-around shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Grid cells between consecutive label characters
pub const LABEL_ADVANCE: i32 = 10;

pub struct DotMatrix {
    cols: u32,
    rows: u32,
    cells: Vec<u32>,
}

impl DotMatrix {
    /// Create a grid of unlit cells
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            cells: vec![CLEAR; (cols * rows) as usize],
        }
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && col < self.cols as i32 && row >= 0 && row < self.rows as i32
    }

    /// Set a cell color. Out-of-range writes are dropped.
    #[inline]
    pub fn set_dot(&mut self, col: i32, row: i32, color: u32) {
        if self.in_bounds(col, row) {
            self.cells[(row as u32 * self.cols + col as u32) as usize] = color;
        }
    }

    /// Read a cell. Returns None if out of range.
    #[inline]
    pub fn dot(&self, col: i32, row: i32) -> Option<u32> {
        if self.in_bounds(col, row) {
            Some(self.cells[(row as u32 * self.cols + col as u32) as usize])
        } else {
            None
        }
    }

    /// Populate the grid from filter output. Blocks beyond the grid edge are
    /// dropped, matching the fixed-size panel.
    pub fn project(&mut self, blocks: &[BlockColor]) {
        for block in blocks {
            self.set_dot(block.col as i32, block.row as i32, block.color);
        }
    }

    /// Stamp one glyph footprint anchored at (col, row): lit font bits get
    /// the `on` color, the rest of the 8x8 cell block gets the `off` fill.
    /// Characters without a glyph paint the plain background footprint.
    pub fn set_char_with_background(&mut self, ch: char, col: i32, row: i32, on: u32, off: u32) {
        let rows = glyph(ch);
        for dy in 0..GLYPH_HEIGHT as i32 {
            let bits = rows.map_or(0, |r| r[dy as usize]);
            for dx in 0..GLYPH_WIDTH as i32 {
                let color = if bits & (1 << dx) != 0 { on } else { off };
                self.set_dot(col + dx, row + dy, color);
            }
        }
    }

    /// Stamp a label starting at (col, row), one character every
    /// `LABEL_ADVANCE` cells
    pub fn overlay_label(&mut self, text: &str, col: i32, row: i32, on: u32, off: u32) {
        for (i, ch) in text.chars().enumerate() {
            self.set_char_with_background(ch, col + i as i32 * LABEL_ADVANCE, row, on, off);
        }
    }

    pub fn shift(&mut self, direction: ShiftDirection) {
        match direction {
            ShiftDirection::Left => self.shift_left(),
            ShiftDirection::Right => self.shift_right(),
            ShiftDirection::Up => self.shift_up(),
            ShiftDirection::Down => self.shift_down(),
        }
    }

    /// Move every cell one column left; column 0 wraps to the last column
    pub fn shift_left(&mut self) {
        let cols = self.cols as usize;
        if cols < 2 {
            return;
        }
        for row in self.cells.chunks_exact_mut(cols) {
            row.rotate_left(1);
        }
    }

    /// Move every cell one column right; the last column wraps to column 0
    pub fn shift_right(&mut self) {
        let cols = self.cols as usize;
        if cols < 2 {
            return;
        }
        for row in self.cells.chunks_exact_mut(cols) {
            row.rotate_right(1);
        }
    }

    /// Move every cell one row up; row 0 wraps to the bottom
    pub fn shift_up(&mut self) {
        let cols = self.cols as usize;
        if self.rows >= 2 {
            self.cells.rotate_left(cols);
        }
    }

    /// Move every cell one row down; the bottom row wraps to the top
    pub fn shift_down(&mut self) {
        let cols = self.cols as usize;
        if self.rows >= 2 {
            self.cells.rotate_right(cols);
        }
    }

    /// Draw the panel into a buffer pane. Each populated cell becomes one
    /// dot; the pane behind the dots is filled with `backdrop`.
    pub fn render(
        &self,
        buffer: &mut PixelBuffer,
        pane_x: i32,
        pane_y: i32,
        pane_w: u32,
        pane_h: u32,
        shape: DotShape,
        backdrop: u32,
    ) {
        buffer.fill_rect(pane_x, pane_y, pane_w, pane_h, backdrop);
        if self.cols == 0 || self.rows == 0 {
            return;
        }

        let cell_w = pane_w as f32 / self.cols as f32;
        let cell_h = pane_h as f32 / self.rows as f32;
        // dots fill most of the cell, leaving a thin unlit gap
        let dot = (cell_w.min(cell_h) * 0.8).max(1.0);

        for row in 0..self.rows {
            for col in 0..self.cols {
                let color = self.cells[(row * self.cols + col) as usize];
                if alpha(color) == 0 {
                    continue;
                }

                let cx = pane_x as f32 + (col as f32 + 0.5) * cell_w;
                let cy = pane_y as f32 + (row as f32 + 0.5) * cell_h;
                match shape {
                    DotShape::Square => {
                        let half = dot / 2.0;
                        buffer.fill_rect(
                            (cx - half) as i32,
                            (cy - half) as i32,
                            dot as u32,
                            dot as u32,
                            color,
                        );
                    },
                    DotShape::Round => {
                        buffer.fill_circle(cx as i32, cy as i32, (dot / 2.0) as i32, color);
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb;

    fn numbered(cols: u32, rows: u32) -> DotMatrix {
        let mut matrix = DotMatrix::new(cols, rows);
        for row in 0..rows {
            for col in 0..cols {
                matrix.set_dot(col as i32, row as i32, 0xFF00_0000 | (row * cols + col));
            }
        }
        matrix
    }

    fn snapshot(matrix: &DotMatrix) -> Vec<u32> {
        matrix.cells.clone()
    }

    #[test]
    fn test_set_dot_bounds() {
        let mut matrix = DotMatrix::new(3, 3);
        matrix.set_dot(1, 2, rgb(1, 2, 3));
        assert_eq!(matrix.dot(1, 2), Some(rgb(1, 2, 3)));
        matrix.set_dot(-1, 0, rgb(9, 9, 9));
        matrix.set_dot(3, 0, rgb(9, 9, 9));
        assert_eq!(matrix.dot(-1, 0), None);
        assert_eq!(matrix.dot(3, 0), None);
    }

    #[test]
    fn test_project_drops_out_of_range_blocks() {
        let mut matrix = DotMatrix::new(2, 2);
        matrix.project(&[
            BlockColor {
                col: 0,
                row: 0,
                color: rgb(1, 1, 1),
            },
            BlockColor {
                col: 5,
                row: 0,
                color: rgb(2, 2, 2),
            },
        ]);
        assert_eq!(matrix.dot(0, 0), Some(rgb(1, 1, 1)));
        assert_eq!(matrix.dot(1, 0), Some(CLEAR));
    }

    #[test]
    fn test_shift_left_wraps() {
        let mut matrix = numbered(3, 2);
        let first = matrix.dot(0, 0).unwrap();
        matrix.shift_left();
        // column 0 reappears on the right edge
        assert_eq!(matrix.dot(2, 0), Some(first));
        assert_eq!(matrix.dot(0, 0), Some(0xFF00_0000 | 1));
    }

    #[test]
    fn test_shift_round_trips_restore_grid() {
        let mut matrix = numbered(5, 4);
        let before = snapshot(&matrix);

        matrix.shift_left();
        matrix.shift_right();
        assert_eq!(snapshot(&matrix), before);

        matrix.shift_up();
        matrix.shift_down();
        assert_eq!(snapshot(&matrix), before);
    }

    #[test]
    fn test_full_rotation_is_identity() {
        let mut matrix = numbered(4, 3);
        let before = snapshot(&matrix);
        for _ in 0..4 {
            matrix.shift_left();
        }
        assert_eq!(snapshot(&matrix), before);
        for _ in 0..3 {
            matrix.shift_up();
        }
        assert_eq!(snapshot(&matrix), before);
    }

    #[test]
    fn test_shift_up_wraps_first_row_to_bottom() {
        let mut matrix = numbered(3, 3);
        let top = matrix.dot(1, 0).unwrap();
        matrix.shift_up();
        assert_eq!(matrix.dot(1, 2), Some(top));
    }

    #[test]
    fn test_glyph_footprint_is_exactly_on_or_off() {
        let on = rgb(255, 0, 0);
        let off = rgb(10, 10, 20);
        let mut matrix = numbered(20, 20);
        matrix.set_char_with_background('@', 4, 6, on, off);

        let rows = glyph('@').unwrap();
        let mut lit = 0;
        for dy in 0..8 {
            for dx in 0..8 {
                let cell = matrix.dot(4 + dx, 6 + dy).unwrap();
                if rows[dy as usize] & (1 << dx) != 0 {
                    assert_eq!(cell, on);
                    lit += 1;
                } else {
                    assert_eq!(cell, off);
                }
            }
        }
        assert!(lit > 0);

        // cells around the footprint keep their prior contents
        assert_eq!(matrix.dot(3, 6), Some(0xFF00_0000 | (6 * 20 + 3)));
        assert_eq!(matrix.dot(12, 6), Some(0xFF00_0000 | (6 * 20 + 12)));
        assert_eq!(matrix.dot(4, 5), Some(0xFF00_0000 | (5 * 20 + 4)));
        assert_eq!(matrix.dot(4, 14), Some(0xFF00_0000 | (14 * 20 + 4)));
    }

    #[test]
    fn test_unknown_char_paints_background_footprint() {
        let on = rgb(255, 0, 0);
        let off = rgb(1, 2, 3);
        let mut matrix = numbered(10, 10);
        matrix.set_char_with_background('\u{20AC}', 0, 0, on, off);
        for dy in 0..8 {
            for dx in 0..8 {
                assert_eq!(matrix.dot(dx, dy), Some(off));
            }
        }
    }

    #[test]
    fn test_overlay_label_advances_ten_cells() {
        let on = rgb(255, 0, 0);
        let off = rgb(10, 10, 20);
        let mut matrix = DotMatrix::new(100, 85);
        matrix.overlay_label("@hansolo_", 5, 75, on, off);

        // each of the nine characters owns an 8x8 footprint at x-offsets
        // 0, 10, 20, ... 80 from the anchor
        for (i, ch) in "@hansolo_".chars().enumerate() {
            let anchor = 5 + i as i32 * LABEL_ADVANCE;
            let rows = glyph(ch).unwrap();
            for dy in 0..8 {
                for dx in 0..8 {
                    let expected = if rows[dy as usize] & (1 << dx) != 0 {
                        on
                    } else {
                        off
                    };
                    assert_eq!(matrix.dot(anchor + dx, 75 + dy), Some(expected));
                }
            }
            // the 2-cell gutter between footprints is untouched
            assert_eq!(matrix.dot(anchor + 8, 75), Some(CLEAR));
        }
    }

    #[test]
    fn test_overlay_label_partially_off_grid_is_dropped() {
        let mut matrix = DotMatrix::new(10, 10);
        matrix.overlay_label("ab", 4, 4, rgb(255, 0, 0), rgb(0, 0, 1));
        // 'b' anchors at column 14, entirely off a 10-wide grid
        assert_eq!(matrix.dot(9, 4), Some(rgb(0, 0, 1)));
        // nothing panicked, nothing visible of the second char
    }

    #[test]
    fn test_render_lights_populated_cells_only() {
        let mut matrix = DotMatrix::new(2, 1);
        matrix.set_dot(0, 0, rgb(200, 0, 0));
        let mut buffer = PixelBuffer::with_size(20, 10);
        matrix.render(&mut buffer, 0, 0, 20, 10, DotShape::Square, rgb(3, 3, 3));

        // center of the lit cell
        assert_eq!(buffer.get_pixel(5, 5), Some(rgb(200, 0, 0)));
        // center of the unlit cell shows the backdrop
        assert_eq!(buffer.get_pixel(15, 5), Some(rgb(3, 3, 3)));
    }
}
