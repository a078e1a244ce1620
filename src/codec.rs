/*
codec.rs

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

//! Convert a [`Level`] to its saved and exported forms.
//!
//! - The [`Snapshot`] is a field-for-field copy of the cells, serialized in JSON for the save
//!   file. Loading a snapshot gives back the same level.
//! - The [`CanonicalLevel`] is the export format read by the game: two strings of characters,
//!   one for the colors and one for the cell modifiers. Rows are separated by a space.
//!
//!   ```text
//!   color    = "rrgyb kkrrb ..."
//!   modifier = "0FUB0 00lr0 ..."
//!   ```
//!
//! There is no conversion from the exported form back to a level.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::GridError;
use crate::level::{Cell, CellType, Color, Direction, Level};

/// Saved value for a cell without a preset stone.
const NO_PRESET: i64 = -1;

/// Saved form of a cell. The values are kept as integers and strings so that invalid values in
/// the save file can be reported instead of failing the whole deserialization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnapshotCell {
    /// [`CellType`] discriminant, 0 to 4.
    #[serde(rename = "type")]
    pub cell_type: i64,

    /// [`Color`] discriminant, 1 to 5.
    pub dest_color: i64,

    /// [`Color`] discriminant, or -1 when the cell has no preset stone.
    pub preset_color: i64,

    /// [`Direction`] name.
    pub direction: String,
}

impl SnapshotCell {
    /// Preset stone value. `0` is also read as "no stone", like older save files do.
    fn preset_raw(&self) -> Option<i64> {
        match self.preset_color {
            NO_PRESET | 0 => None,
            v => Some(v),
        }
    }

    fn to_cell(&self) -> Result<Cell, GridError> {
        let cell_type: CellType = CellType::from_raw(self.cell_type)?;
        let preset_color: Option<Color> = self.preset_raw().map(Color::from_raw).transpose()?;
        if preset_color.is_some() && cell_type != CellType::Empty {
            warn!("Dropping the preset stone of a {cell_type} cell");
        }
        Ok(Cell::new(
            cell_type,
            Color::from_raw(self.dest_color)?,
            preset_color,
            Direction::from_name(&self.direction)?,
        ))
    }
}

impl From<&Cell> for SnapshotCell {
    fn from(cell: &Cell) -> Self {
        Self {
            cell_type: cell.cell_type() as i64,
            dest_color: cell.dest_color() as i64,
            preset_color: cell.preset_color().map_or(NO_PRESET, |c| c as i64),
            direction: cell.direction().as_str().to_string(),
        }
    }
}

/// Structural copy of a level: a list of rows, each row a list of cells.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Snapshot {
    pub rows: Vec<Vec<SnapshotCell>>,
}

impl Snapshot {
    /// Parse the JSON text of a saved level.
    ///
    /// Text that is not a list of rows of cells gives an empty snapshot, which
    /// [`crate::grid_store::GridStore::load`] replaces with a default level.
    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!("Cannot parse the saved level: {error}");
                Self::default()
            }
        }
    }

    /// Serialize the snapshot in JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Whether the snapshot is a non-empty rectangular matrix.
    pub fn is_well_formed(&self) -> bool {
        match self.rows.first() {
            Some(first) => !first.is_empty() && self.rows.iter().all(|r| r.len() == first.len()),
            None => false,
        }
    }

    /// Build the [`Level`] object.
    ///
    /// # Errors
    ///
    /// The method returns [`GridError::MalformedSnapshot`] if the snapshot is not a non-empty
    /// rectangular matrix, or [`GridError::InvalidFieldValue`] for a cell value outside of its
    /// set.
    pub fn to_level(&self) -> Result<Level, GridError> {
        let grid: Vec<Vec<Cell>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(SnapshotCell::to_cell)
                    .collect::<Result<Vec<Cell>, GridError>>()
            })
            .collect::<Result<_, _>>()?;
        Level::from_rows(grid)
    }
}

/// Return the structural copy of the level.
pub fn to_snapshot(level: &Level) -> Snapshot {
    Snapshot {
        rows: level
            .iter_rows()
            .map(|row| row.iter().map(SnapshotCell::from).collect())
            .collect(),
    }
}

/// Exported form of a level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalLevel {
    /// One color letter per cell (`r`, `g`, `b`, `y`, or `k`).
    pub color_grid: String,

    /// One modifier character per cell (`0`, `F`, `B`, or a limit direction).
    pub modifier_grid: String,
}

impl CanonicalLevel {
    /// Start a new row. Rows are separated by a single space.
    fn start_row(&mut self, row: usize) {
        if row > 0 {
            self.color_grid.push(' ');
            self.modifier_grid.push(' ');
        }
    }

    fn push(&mut self, color: char, modifier: char) {
        self.color_grid.push(color);
        self.modifier_grid.push(modifier);
    }
}

/// How to handle invalid values when exporting a saved snapshot directly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Unknown colors are exported as `g`, unknown types and directions as `0`.
    #[default]
    Lenient,

    /// Unknown values are errors.
    Strict,
}

/// Return the exported form of the level.
pub fn to_canonical(level: &Level) -> CanonicalLevel {
    let mut canonical = CanonicalLevel::default();
    for (r, row) in level.iter_rows().enumerate() {
        canonical.start_row(r);
        for cell in row {
            canonical.push(cell.stone_color().code(), cell.modifier());
        }
    }
    canonical
}

/// Export a saved snapshot without loading it in a level.
///
/// With [`Strictness::Lenient`], values outside their set are exported with a fallback
/// character, so every cell produces one character in each grid.
///
/// # Errors
///
/// The method returns [`GridError::MalformedSnapshot`] if the snapshot is not rectangular, and
/// [`GridError::InvalidFieldValue`] for invalid values with [`Strictness::Strict`].
pub fn canonical_from_snapshot(
    snapshot: &Snapshot,
    strictness: Strictness,
) -> Result<CanonicalLevel, GridError> {
    if !snapshot.is_well_formed() {
        return Err(GridError::MalformedSnapshot(
            "the level is not a non-empty rectangular matrix".to_string(),
        ));
    }
    let mut canonical = CanonicalLevel::default();
    for (r, row) in snapshot.rows.iter().enumerate() {
        canonical.start_row(r);
        for cell in row {
            canonical.push(
                raw_color_code(cell, strictness)?,
                raw_modifier(cell, strictness)?,
            );
        }
    }
    Ok(canonical)
}

fn raw_color_code(cell: &SnapshotCell, strictness: Strictness) -> Result<char, GridError> {
    let value: i64 = cell.preset_raw().unwrap_or(cell.dest_color);
    match (Color::from_raw(value), strictness) {
        (Ok(color), _) => Ok(color.code()),
        (Err(error), Strictness::Strict) => Err(error),
        (Err(_), Strictness::Lenient) => {
            debug!("Unknown color {value}, exported as green");
            Ok('g')
        }
    }
}

fn raw_modifier(cell: &SnapshotCell, strictness: Strictness) -> Result<char, GridError> {
    let modifier = CellType::from_raw(cell.cell_type).and_then(|cell_type| match cell_type {
        CellType::Limit => Direction::from_name(&cell.direction).map(|d| d.code()),
        _ => Ok(Cell::new(cell_type, Color::default(), None, Direction::default()).modifier()),
    });
    match (modifier, strictness) {
        (Ok(c), _) => Ok(c),
        (Err(error), Strictness::Strict) => Err(error),
        (Err(error), Strictness::Lenient) => {
            debug!("Exporting an empty modifier: {error}");
            Ok('0')
        }
    }
}

/// Return the `<level>` element that the game uses to import a level.
///
/// ```text
/// <level username="Alice" color="rrg ybk" modifier="0F0 BUl" />
/// ```
pub fn level_element(canonical: &CanonicalLevel, username: Option<&str>) -> String {
    let mut element: String = String::from("<level");
    if let Some(name) = username {
        element.push_str(&format!(" username=\"{}\"", escape_attribute(name)));
    }
    element.push_str(&format!(
        " color=\"{}\" modifier=\"{}\" />",
        canonical.color_grid, canonical.modifier_grid
    ));
    element
}

/// Escape the XML special characters of an attribute value.
fn escape_attribute(value: &str) -> String {
    let mut escaped: String = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_store::GridStore;

    fn raw_cell(cell_type: i64, dest_color: i64, preset_color: i64, direction: &str) -> SnapshotCell {
        SnapshotCell {
            cell_type,
            dest_color,
            preset_color,
            direction: direction.to_string(),
        }
    }

    #[test]
    fn default_level_export() {
        let level = Level::new(2, 2).unwrap();
        let canonical = to_canonical(&level);
        assert_eq!(canonical.color_grid, "rr rr");
        assert_eq!(canonical.modifier_grid, "00 00");
    }

    #[test]
    fn limit_cell_export() {
        let mut store = GridStore::new();
        store.create(1, 1).unwrap();
        store.set_type(CellType::Limit).unwrap();
        store.set_dest_color(Color::Yellow).unwrap();
        store.set_direction(Direction::RotateLeft).unwrap();

        let canonical = to_canonical(store.level().unwrap());
        assert_eq!(canonical.color_grid, "y");
        assert_eq!(canonical.modifier_grid, "l");
    }

    #[test]
    fn every_modifier() {
        let mut store = GridStore::new();
        store.create(3, 4).unwrap();
        let cells = [
            (CellType::Empty, Direction::Up),
            (CellType::Flow, Direction::Up),
            (CellType::Bomb, Direction::Up),
            (CellType::Disabled, Direction::Down),
        ];
        for (col, (cell_type, direction)) in cells.into_iter().enumerate() {
            store.select(0, col).unwrap();
            store.set_direction(direction).unwrap();
            store.set_type(cell_type).unwrap();
        }
        for (i, direction) in Direction::ALL.into_iter().enumerate() {
            store.select(1 + i / 4, i % 4).unwrap();
            store.set_type(CellType::Limit).unwrap();
            store.set_direction(direction).unwrap();
        }
        let canonical = to_canonical(store.level().unwrap());
        assert_eq!(canonical.modifier_grid, "0FB0 UDLR udlr");
        assert_eq!(canonical.color_grid, "rrrr rrrr rrrr");
    }

    #[test]
    fn preset_stone_wins_over_destination() {
        let mut store = GridStore::new();
        store.create(1, 3).unwrap();
        store.set_dest_color(Color::Blue).unwrap();
        store.set_preset_color(Some(Color::Black)).unwrap();
        store.select(0, 1).unwrap();
        store.set_dest_color(Color::Green).unwrap();
        store.select(0, 2).unwrap();
        store.set_type(CellType::Disabled).unwrap();
        store.set_dest_color(Color::Yellow).unwrap();

        let canonical = to_canonical(store.level().unwrap());
        assert_eq!(canonical.color_grid, "kgy");
        assert_eq!(canonical.modifier_grid, "000");
    }

    #[test]
    fn grids_have_the_same_shape() {
        let level = Level::new(8, 6).unwrap();
        let canonical = to_canonical(&level);
        assert_eq!(canonical.color_grid.len(), canonical.modifier_grid.len());
        assert_eq!(canonical.color_grid.split(' ').count(), 8);
        assert!(canonical.modifier_grid.split(' ').all(|row| row.len() == 6));
    }

    #[test]
    fn snapshot_json_layout() {
        let mut store = GridStore::new();
        store.create(1, 2).unwrap();
        store.set_preset_color(Some(Color::Green)).unwrap();
        store.select(0, 1).unwrap();
        store.set_type(CellType::Limit).unwrap();
        store.set_direction(Direction::RotateUp).unwrap();

        let json = to_snapshot(store.level().unwrap()).to_json().unwrap();
        assert_eq!(
            json,
            "[[{\"type\":0,\"dest_color\":1,\"preset_color\":2,\"direction\":\"up\"},\
             {\"type\":2,\"dest_color\":1,\"preset_color\":-1,\"direction\":\"rotate_up\"}]]"
        );
        let level = Snapshot::from_json(&json).to_level().unwrap();
        assert_eq!(Some(&level), store.level());
    }

    #[test]
    fn unparsable_json_gives_empty_snapshot() {
        assert_eq!(Snapshot::from_json("not json"), Snapshot::default());
        assert_eq!(Snapshot::from_json("42"), Snapshot::default());
        assert_eq!(Snapshot::from_json("[[{\"type\": 0}]]"), Snapshot::default());
        assert!(!Snapshot::default().is_well_formed());
    }

    #[test]
    fn invalid_values_are_not_loaded() {
        let snapshot = Snapshot {
            rows: vec![vec![raw_cell(0, 9, -1, "up")]],
        };
        assert_eq!(
            snapshot.to_level(),
            Err(GridError::InvalidFieldValue {
                field: "color",
                value: "9".to_string()
            })
        );
    }

    #[test]
    fn loaded_preset_on_flow_cell_is_dropped() {
        let snapshot = Snapshot {
            rows: vec![vec![raw_cell(1, 3, 4, "left")]],
        };
        let level = snapshot.to_level().unwrap();
        let cell = level.cell(0, 0).unwrap();
        assert_eq!(cell.preset_color(), None);
        assert_eq!(cell.direction(), Direction::Left);
    }

    #[test]
    fn lenient_export_of_invalid_values() {
        let snapshot = Snapshot {
            rows: vec![
                vec![raw_cell(0, 7, -1, "up"), raw_cell(2, 4, -1, "diagonal")],
                vec![raw_cell(9, 2, 0, "up"), raw_cell(0, 1, 3, "up")],
            ],
        };
        let canonical = canonical_from_snapshot(&snapshot, Strictness::Lenient).unwrap();
        assert_eq!(canonical.color_grid, "gy gb");
        assert_eq!(canonical.modifier_grid, "00 00");
    }

    #[test]
    fn strict_export_of_invalid_values() {
        let snapshot = Snapshot {
            rows: vec![vec![raw_cell(0, 7, -1, "up")]],
        };
        assert!(matches!(
            canonical_from_snapshot(&snapshot, Strictness::Strict),
            Err(GridError::InvalidFieldValue { field: "color", .. })
        ));

        let snapshot = Snapshot {
            rows: vec![vec![raw_cell(2, 1, -1, "sideways")]],
        };
        assert!(canonical_from_snapshot(&snapshot, Strictness::Strict).is_err());
    }

    #[test]
    fn snapshot_export_matches_level_export() {
        let mut store = GridStore::new();
        store.create(2, 3).unwrap();
        store.select(1, 2).unwrap();
        store.set_type(CellType::Limit).unwrap();
        store.set_direction(Direction::Right).unwrap();
        let level = store.level().unwrap();

        let from_snapshot = canonical_from_snapshot(&to_snapshot(level), Strictness::Strict);
        assert_eq!(from_snapshot, Ok(to_canonical(level)));
    }

    #[test]
    fn ragged_snapshot_is_not_exported() {
        let snapshot = Snapshot {
            rows: vec![vec![raw_cell(0, 1, -1, "up")], Vec::new()],
        };
        assert!(matches!(
            canonical_from_snapshot(&snapshot, Strictness::Lenient),
            Err(GridError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn level_element_with_username() {
        let canonical = CanonicalLevel {
            color_grid: "rg by".to_string(),
            modifier_grid: "0F BU".to_string(),
        };
        assert_eq!(
            level_element(&canonical, None),
            "<level color=\"rg by\" modifier=\"0F BU\" />"
        );
        assert_eq!(
            level_element(&canonical, Some("Tom & \"Jerry\"")),
            "<level username=\"Tom &amp; &quot;Jerry&quot;\" color=\"rg by\" modifier=\"0F BU\" />"
        );
    }
}
