/*
grid_store.rs

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

//! Manage the level being designed.
//!
//! The [`GridStore`] object owns the [`Level`] and the selected cell. All the edits go through
//! its methods, which apply to the selected cell and notify the registered [`LevelObserver`]
//! objects so that a renderer can refresh the board.
//!
//! The store does not save anything by itself. See [`crate::saver::level`] for persistence.

use log::{debug, warn};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::codec::Snapshot;
use crate::config::{DEFAULT_COLS, DEFAULT_ROWS};
use crate::errors::GridError;
use crate::level::{Cell, CellType, Color, Direction, Level};

/// Receive the changes of a [`GridStore`].
pub trait LevelObserver {
    /// The content of the level changed (new level, or a cell was edited).
    fn level_changed(&mut self, level: &Level);

    /// Only the selected cell changed.
    fn selection_changed(&mut self, row: usize, col: usize);

    /// The level was deleted.
    fn level_discarded(&mut self) {}
}

/// Share an observer with the code that reads its state afterward.
impl<T: LevelObserver> LevelObserver for Rc<RefCell<T>> {
    fn level_changed(&mut self, level: &Level) {
        self.borrow_mut().level_changed(level);
    }

    fn selection_changed(&mut self, row: usize, col: usize) {
        self.borrow_mut().selection_changed(row, col);
    }

    fn level_discarded(&mut self) {
        self.borrow_mut().level_discarded();
    }
}

/// Level that [`GridStore::load`] put in place.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Loaded {
    /// The level from the snapshot.
    Snapshot,

    /// A default level, because the snapshot was malformed.
    Default,
}

/// Owner of the level and of the selection cursor.
#[derive(Default)]
pub struct GridStore {
    /// The level being designed, or None before the first creation and after a reset.
    level: Option<Level>,

    /// Row and column of the selected cell. Always inside the level when there is one.
    selection: Option<(usize, usize)>,

    /// Objects notified of each change.
    observers: Vec<Box<dyn LevelObserver>>,
}

impl fmt::Debug for GridStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GridStore")
            .field("level", &self.level)
            .field("selection", &self.selection)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl GridStore {
    /// Create a [`GridStore`] object without any level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object to notify on every change.
    pub fn add_observer(&mut self, observer: Box<dyn LevelObserver>) {
        self.observers.push(observer);
    }

    /// Return the level being designed.
    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    /// Return the row and column of the selected cell.
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Return the selected cell.
    pub fn selected_cell(&self) -> Option<&Cell> {
        let (row, col) = self.selection()?;
        self.level.as_ref()?.cell(row, col)
    }

    /// Replace the current level with a new level of default cells, and select the top left
    /// cell.
    ///
    /// # Errors
    ///
    /// The method returns [`GridError::InvalidDimensions`] when a dimension is zero. The current
    /// level is left untouched in that case.
    pub fn create(&mut self, rows: usize, cols: usize) -> Result<(), GridError> {
        let level: Level = Level::new(rows, cols)?;
        debug!("New {rows}x{cols} level");
        self.replace_level(level);
        Ok(())
    }

    /// Replace the current level with the level from the snapshot.
    ///
    /// A malformed snapshot is not an error: a default 6x5 level is created instead, and the
    /// method returns [`Loaded::Default`].
    pub fn load(&mut self, snapshot: &Snapshot) -> Loaded {
        match snapshot.to_level() {
            Ok(level) => {
                debug!("Loaded {}x{} level", level.rows(), level.cols());
                self.replace_level(level);
                Loaded::Snapshot
            }
            Err(error) => {
                warn!("Ignoring the saved level: {error}");
                // The default size is never zero
                if let Ok(level) = Level::new(DEFAULT_ROWS, DEFAULT_COLS) {
                    self.replace_level(level);
                }
                Loaded::Default
            }
        }
    }

    /// Change the selected cell.
    ///
    /// # Errors
    ///
    /// The method returns [`GridError::OutOfBounds`] if the coordinates are outside the level,
    /// and [`GridError::NoLevel`] if there is no level. The selection is not changed.
    pub fn select(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        let level: &Level = self.level.as_ref().ok_or(GridError::NoLevel)?;
        if !level.contains(row, col) {
            return Err(GridError::OutOfBounds {
                row,
                col,
                rows: level.rows(),
                cols: level.cols(),
            });
        }
        self.selection = Some((row, col));
        for observer in &mut self.observers {
            observer.selection_changed(row, col);
        }
        Ok(())
    }

    /// Set the type of the selected cell. The preset stone is removed if the type is not
    /// [`CellType::Empty`].
    pub fn set_type(&mut self, cell_type: CellType) -> Result<(), GridError> {
        self.selected_mut()?.set_type(cell_type);
        debug!("Cell {:?}: type = {cell_type}", self.selection);
        self.notify_level_changed();
        Ok(())
    }

    /// Set the destination color of the selected cell.
    pub fn set_dest_color(&mut self, color: Color) -> Result<(), GridError> {
        self.selected_mut()?.set_dest_color(color);
        debug!("Cell {:?}: destination color = {color}", self.selection);
        self.notify_level_changed();
        Ok(())
    }

    /// Place (or remove, with None) a preset stone on the selected cell.
    ///
    /// Nothing happens, and no observer is notified, when the selected cell is not
    /// [`CellType::Empty`]. Return whether the cell was changed.
    pub fn set_preset_color(&mut self, color: Option<Color>) -> Result<bool, GridError> {
        if !self.selected_mut()?.set_preset_color(color) {
            debug!("Cell {:?}: not empty, preset color ignored", self.selection);
            return Ok(false);
        }
        debug!("Cell {:?}: preset color = {color:?}", self.selection);
        self.notify_level_changed();
        Ok(true)
    }

    /// Set the direction of the selected cell, whatever its type.
    pub fn set_direction(&mut self, direction: Direction) -> Result<(), GridError> {
        self.selected_mut()?.set_direction(direction);
        debug!("Cell {:?}: direction = {direction}", self.selection);
        self.notify_level_changed();
        Ok(())
    }

    /// Delete the level and the selection.
    pub fn reset(&mut self) {
        debug!("Level discarded");
        self.level = None;
        self.selection = None;
        for observer in &mut self.observers {
            observer.level_discarded();
        }
    }

    fn replace_level(&mut self, level: Level) {
        self.level = Some(level);
        self.selection = Some((0, 0));
        self.notify_level_changed();
        for observer in &mut self.observers {
            observer.selection_changed(0, 0);
        }
    }

    fn selected_mut(&mut self) -> Result<&mut Cell, GridError> {
        let (row, col) = self.selection.ok_or(GridError::NoLevel)?;
        self.level
            .as_mut()
            .and_then(|level| level.cell_mut(row, col))
            .ok_or(GridError::NoLevel)
    }

    fn notify_level_changed(&mut self) {
        if let Some(level) = &self.level {
            for observer in &mut self.observers {
                observer.level_changed(level);
            }
        }
    }
}
