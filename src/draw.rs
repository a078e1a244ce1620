/*
draw.rs

Copyright 2025 Hervé Quatremain

This file is part of BBEditor.

BBEditor is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

BBEditor is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
BBEditor. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Draw the level as text.
//!
//! Each cell is drawn with two characters:
//!
//! - the destination color letter (`r`, `g`, `b`, `y`, `k`),
//! - the modifier: `F` (flow), `B` (bomb), a limit direction (`U`, `D`, `L`, `R` for movements,
//!   `u`, `d`, `l`, `r` for rotations), the uppercase preset stone color for an empty cell with a
//!   stone, or `.` for an empty cell.
//!
//! Disabled cells are drawn with `##`. The selected cell is surrounded by brackets.
//!
//! ```text
//!      0   1   2
//!  0 [r.] gF  ##
//!  1  bK  yU  kl
//! ```

use crate::grid_store::LevelObserver;
use crate::level::{Cell, CellType, Level};

/// Text representation of the board, refreshed by the [`crate::grid_store::GridStore`]
/// notifications.
#[derive(Debug, Default)]
pub struct Frame {
    /// Cell drawings, row by row.
    glyphs: Vec<Vec<String>>,

    /// Selected cell.
    selection: Option<(usize, usize)>,
}

impl Frame {
    /// Return the board drawing, with the column numbers on the first line and the row number
    /// at the beginning of each line.
    pub fn render(&self) -> String {
        let cols: usize = self.glyphs.first().map_or(0, Vec::len);
        let mut out: String = String::from("   ");
        for c in 0..cols {
            out.push_str(&format!("{c:>3} "));
        }
        out.push('\n');

        for (r, row) in self.glyphs.iter().enumerate() {
            out.push_str(&format!("{r:>2} "));
            for (c, glyph) in row.iter().enumerate() {
                if self.selection == Some((r, c)) {
                    out.push_str(&format!("[{glyph}]"));
                } else {
                    out.push_str(&format!(" {glyph} "));
                }
            }
            out.push('\n');
        }
        out
    }
}

impl LevelObserver for Frame {
    fn level_changed(&mut self, level: &Level) {
        self.glyphs = level
            .iter_rows()
            .map(|row| row.iter().map(glyph).collect())
            .collect();
    }

    fn selection_changed(&mut self, row: usize, col: usize) {
        self.selection = Some((row, col));
    }

    fn level_discarded(&mut self) {
        self.glyphs.clear();
        self.selection = None;
    }
}

/// Return the two characters that represent the cell.
fn glyph(cell: &Cell) -> String {
    let modifier: char = match cell.cell_type() {
        CellType::Disabled => return "##".to_string(),
        CellType::Empty => cell
            .preset_color()
            .map_or('.', |c| c.code().to_ascii_uppercase()),
        _ => cell.modifier(),
    };
    format!("{}{modifier}", cell.dest_color().code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_store::GridStore;
    use crate::level::{Color, Direction};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn frame_follows_the_store() {
        let frame = Rc::new(RefCell::new(Frame::default()));
        let mut store = GridStore::new();
        store.add_observer(Box::new(Rc::clone(&frame)));

        store.create(2, 3).unwrap();
        store.set_preset_color(Some(Color::Black)).unwrap();
        store.select(0, 1).unwrap();
        store.set_type(CellType::Flow).unwrap();
        store.set_dest_color(Color::Green).unwrap();
        store.select(0, 2).unwrap();
        store.set_type(CellType::Disabled).unwrap();
        store.select(1, 1).unwrap();
        store.set_type(CellType::Limit).unwrap();
        store.set_direction(Direction::RotateLeft).unwrap();

        assert_eq!(
            frame.borrow().render(),
            "     0   1   2 \n 0  rK  gF  ## \n 1  r. [rl] r. \n"
        );

        store.reset();
        assert_eq!(frame.borrow().render(), "   \n");
    }

    #[test]
    fn selection_only_moves_the_brackets() {
        let level = Level::new(1, 2).unwrap();
        let mut frame = Frame::default();
        frame.level_changed(&level);
        frame.selection_changed(0, 0);
        assert_eq!(frame.render(), "     0   1 \n 0 [r.] r. \n");
        frame.selection_changed(0, 1);
        assert_eq!(frame.render(), "     0   1 \n 0  r. [r.]\n");
    }
}
