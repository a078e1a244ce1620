/*
level.rs

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

//! Level representation.
//!
//! A [`Level`] is a rectangular matrix of [`Cell`] objects. Each cell has a type, a destination
//! color, an optional preset color (a stone already placed on the board), and a direction that
//! only matters for [`CellType::Limit`] cells.
//!
//! The [`Cell`] fields are private so that the preset color rule is enforced where the cell type
//! changes: only [`CellType::Empty`] cells can carry a preset stone.

use clap::ValueEnum;
use std::fmt;
use strum_macros::FromRepr;

use crate::errors::GridError;

/// Type of a cell.
///
/// The discriminants are the integer values stored in the saved levels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, ValueEnum, FromRepr)]
#[repr(u8)]
pub enum CellType {
    #[default]
    Empty = 0,
    Flow = 1,
    Limit = 2,
    Disabled = 3,
    Bomb = 4,
}

impl CellType {
    /// Return the [`CellType`] for a saved integer value.
    pub fn from_raw(value: i64) -> Result<Self, GridError> {
        u8::try_from(value)
            .ok()
            .and_then(Self::from_repr)
            .ok_or_else(|| GridError::invalid_field("type", value))
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CellType::Empty => write!(f, "empty"),
            CellType::Flow => write!(f, "flow"),
            CellType::Limit => write!(f, "limit"),
            CellType::Disabled => write!(f, "disabled"),
            CellType::Bomb => write!(f, "bomb"),
        }
    }
}

/// Stone and destination colors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, ValueEnum, FromRepr)]
#[repr(u8)]
pub enum Color {
    #[default]
    Red = 1,
    Green = 2,
    Blue = 3,
    Yellow = 4,
    Black = 5,
}

impl Color {
    /// Return the [`Color`] for a saved integer value.
    pub fn from_raw(value: i64) -> Result<Self, GridError> {
        u8::try_from(value)
            .ok()
            .and_then(Self::from_repr)
            .ok_or_else(|| GridError::invalid_field("color", value))
    }

    /// Single-letter code used in the exported color grid.
    pub fn code(&self) -> char {
        match self {
            Color::Red => 'r',
            Color::Green => 'g',
            Color::Blue => 'b',
            Color::Yellow => 'y',
            Color::Black => 'k',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Green => write!(f, "green"),
            Color::Blue => write!(f, "blue"),
            Color::Yellow => write!(f, "yellow"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Movement or rotation restriction of a [`CellType::Limit`] cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
    RotateUp,
    RotateDown,
    RotateLeft,
    RotateRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::RotateUp,
        Direction::RotateDown,
        Direction::RotateLeft,
        Direction::RotateRight,
    ];

    /// Name of the direction in the saved levels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::RotateUp => "rotate_up",
            Direction::RotateDown => "rotate_down",
            Direction::RotateLeft => "rotate_left",
            Direction::RotateRight => "rotate_right",
        }
    }

    /// Return the [`Direction`] for a saved name.
    pub fn from_name(name: &str) -> Result<Self, GridError> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == name)
            .ok_or_else(|| GridError::invalid_field("direction", name))
    }

    /// Character used in the exported modifier grid for a limit cell.
    ///
    /// Uppercase letters restrict the movement, lowercase letters restrict the rotation.
    pub fn code(&self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::RotateUp => 'u',
            Direction::RotateDown => 'd',
            Direction::RotateLeft => 'l',
            Direction::RotateRight => 'r',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Editable state of a board position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    cell_type: CellType,

    /// Color the stone must reach. Ignored when exporting [`CellType::Disabled`] cells.
    dest_color: Color,

    /// Stone already on the board. Only [`CellType::Empty`] cells can have one.
    preset_color: Option<Color>,

    /// Kept when the cell stops being a limit cell, but only read for limit cells.
    direction: Direction,
}

impl Cell {
    /// Create a [`Cell`] object.
    ///
    /// The preset color is dropped when the type is not [`CellType::Empty`].
    pub fn new(
        cell_type: CellType,
        dest_color: Color,
        preset_color: Option<Color>,
        direction: Direction,
    ) -> Self {
        let mut cell = Self {
            cell_type,
            dest_color,
            preset_color,
            direction,
        };
        cell.set_type(cell_type);
        cell
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn dest_color(&self) -> Color {
        self.dest_color
    }

    pub fn preset_color(&self) -> Option<Color> {
        self.preset_color
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Change the cell type. Any other type than [`CellType::Empty`] removes the preset stone.
    pub fn set_type(&mut self, cell_type: CellType) {
        self.cell_type = cell_type;
        if cell_type != CellType::Empty {
            self.preset_color = None;
        }
    }

    pub fn set_dest_color(&mut self, color: Color) {
        self.dest_color = color;
    }

    /// Place or remove the preset stone.
    ///
    /// Return `false` without changing anything when the cell is not [`CellType::Empty`].
    pub fn set_preset_color(&mut self, color: Option<Color>) -> bool {
        if self.cell_type != CellType::Empty {
            return false;
        }
        self.preset_color = color;
        true
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Color shown in the exported color grid: the preset stone if any, otherwise the
    /// destination color.
    pub fn stone_color(&self) -> Color {
        self.preset_color.unwrap_or(self.dest_color)
    }

    /// Character of the exported modifier grid.
    pub fn modifier(&self) -> char {
        match self.cell_type {
            CellType::Empty | CellType::Disabled => '0',
            CellType::Flow => 'F',
            CellType::Bomb => 'B',
            CellType::Limit => self.direction.code(),
        }
    }
}

/// Rectangular matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    /// Cells, row by row. All the rows have the same length.
    grid: Vec<Vec<Cell>>,
}

impl Level {
    /// Create a [`Level`] object with default cells.
    ///
    /// # Errors
    ///
    /// Both dimensions must be at least 1.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            grid: vec![vec![Cell::default(); cols]; rows],
        })
    }

    /// Create a [`Level`] object from already built rows.
    ///
    /// # Errors
    ///
    /// The rows must not be empty and must all have the same, non-zero, length.
    pub fn from_rows(grid: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let cols: usize = grid.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(GridError::MalformedSnapshot("the level has no cells".to_string()));
        }
        if let Some((i, row)) = grid.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(GridError::MalformedSnapshot(format!(
                "row {i} has {} cells instead of {cols}",
                row.len()
            )));
        }
        Ok(Self { grid })
    }

    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    /// Return the number of columns. The constructors reject empty grids, so the first row
    /// always exists.
    pub fn cols(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    /// Return the number of cells.
    pub fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Whether the given coordinates are inside the level.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.grid.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.grid.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Iterate over the rows, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.grid.iter().map(Vec::as_slice)
    }

    /// Iterate over all the cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_level_has_default_cells() {
        let level = Level::new(3, 4).unwrap();
        assert_eq!(level.rows(), 3);
        assert_eq!(level.cols(), 4);
        assert_eq!(level.len(), 12);
        for cell in level.iter_cells() {
            assert_eq!(cell.cell_type(), CellType::Empty);
            assert_eq!(cell.dest_color(), Color::Red);
            assert_eq!(cell.preset_color(), None);
            assert_eq!(cell.direction(), Direction::Up);
        }
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert_eq!(
            Level::new(0, 5),
            Err(GridError::InvalidDimensions { rows: 0, cols: 5 })
        );
        assert!(Level::new(6, 0).is_err());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![Cell::default(); 2], vec![Cell::default(); 3]];
        assert!(matches!(
            Level::from_rows(rows),
            Err(GridError::MalformedSnapshot(_))
        ));
        assert!(Level::from_rows(Vec::new()).is_err());
        assert!(Level::from_rows(vec![Vec::new()]).is_err());
    }

    #[test]
    fn single_row_and_single_column_levels() {
        let row = Level::from_rows(vec![vec![Cell::default(); 3]]).unwrap();
        assert_eq!((row.rows(), row.cols(), row.len()), (1, 3, 3));
        let column = Level::new(4, 1).unwrap();
        assert_eq!((column.rows(), column.cols(), column.len()), (4, 1, 4));
        assert!(column.contains(3, 0));
        assert!(!column.contains(0, 1));
    }

    #[test]
    fn non_empty_type_drops_preset() {
        let mut cell = Cell::default();
        assert!(cell.set_preset_color(Some(Color::Blue)));
        assert_eq!(cell.stone_color(), Color::Blue);

        cell.set_type(CellType::Flow);
        assert_eq!(cell.preset_color(), None);
        assert!(!cell.set_preset_color(Some(Color::Green)));
        assert_eq!(cell.preset_color(), None);
    }

    #[test]
    fn constructor_enforces_preset_rule() {
        let cell = Cell::new(CellType::Bomb, Color::Black, Some(Color::Red), Direction::Left);
        assert_eq!(cell.preset_color(), None);
        assert_eq!(cell.direction(), Direction::Left);
    }

    #[test]
    fn direction_is_kept_when_leaving_limit() {
        let mut cell = Cell::default();
        cell.set_type(CellType::Limit);
        cell.set_direction(Direction::RotateRight);
        assert_eq!(cell.modifier(), 'r');

        cell.set_type(CellType::Flow);
        assert_eq!(cell.direction(), Direction::RotateRight);
        assert_eq!(cell.modifier(), 'F');
    }

    #[test]
    fn raw_values() {
        assert_eq!(CellType::from_raw(4), Ok(CellType::Bomb));
        assert_eq!(Color::from_raw(5), Ok(Color::Black));
        assert!(Color::from_raw(0).is_err());
        assert!(Color::from_raw(-1).is_err());
        assert!(CellType::from_raw(300).is_err());
        assert_eq!(Direction::from_name("rotate_down"), Ok(Direction::RotateDown));
        assert_eq!(
            Direction::from_name("sideways"),
            Err(GridError::InvalidFieldValue {
                field: "direction",
                value: "sideways".to_string()
            })
        );
    }
}
