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

//! Save and restore the level being designed.
//!
//! The level is saved after each edit, so that the design continues where it stopped the next
//! time BBEditor runs.
//!
//! The saved object is the [`Snapshot`] of the level in JSON format, under the
//! [`LEVEL_KEY`] key.

use log::debug;
use std::error::Error;

use crate::codec::{Snapshot, to_snapshot};
use crate::config::LEVEL_KEY;
use crate::grid_store::{GridStore, Loaded};
use crate::level::Level;
use crate::saver::store::KeyValueStore;

/// Outcome of [`SaverLevel::restore`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Restored {
    /// There is no saved level.
    Nothing,

    /// The saved level is being edited.
    Saved,

    /// The saved level is invalid. A default level is being edited instead.
    Fallback,
}

/// Object to save and restore the level.
pub struct SaverLevel<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SaverLevel<S> {
    /// Create a [`SaverLevel`] object that uses the given storage.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Retrieve the snapshot of the saved level.
    ///
    /// Return None if there is no saved level. A saved value that is not a level gives an empty
    /// snapshot.
    pub fn get_snapshot(&self) -> Result<Option<Snapshot>, Box<dyn Error>> {
        Ok(self
            .store
            .get_item(LEVEL_KEY)?
            .map(|text| Snapshot::from_json(&text)))
    }

    /// Restore the saved level in the given [`GridStore`] object.
    ///
    /// When the saved level cannot be read, it is deleted and nothing is restored. A saved level
    /// that is not a valid level is replaced with a default level in the [`GridStore`] object,
    /// and the method returns [`Restored::Fallback`].
    pub fn restore(&self, grid_store: &mut GridStore) -> Restored {
        match self.get_snapshot() {
            Ok(Some(snapshot)) => match grid_store.load(&snapshot) {
                Loaded::Snapshot => Restored::Saved,
                Loaded::Default => Restored::Fallback,
            },
            Ok(None) => {
                debug!("No saved level");
                Restored::Nothing
            }
            Err(error) => {
                debug!("Error getting the saved level: {error}");
                self.delete_save();
                Restored::Nothing
            }
        }
    }

    /// Save the provided [`Level`] object.
    pub fn save_level(&self, level: &Level) -> Result<(), Box<dyn Error>> {
        let text: String = to_snapshot(level).to_json()?;
        self.store.set_item(LEVEL_KEY, &text)?;
        debug!("Level saved");
        Ok(())
    }

    /// Delete the saved level.
    pub fn delete_save(&self) {
        if let Err(error) = self.store.remove_item(LEVEL_KEY) {
            debug!("Error deleting the saved level: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{CellType, Color};
    use crate::saver::store::{FileStore, MemoryStore};
    use tempfile::tempdir;

    #[test]
    fn save_and_restore() {
        let saver = SaverLevel::new(MemoryStore::new());
        let mut store = GridStore::new();
        store.create(7, 6).unwrap();
        store.select(3, 2).unwrap();
        store.set_type(CellType::Bomb).unwrap();
        store.set_dest_color(Color::Blue).unwrap();
        saver.save_level(store.level().unwrap()).unwrap();

        let mut restored = GridStore::new();
        assert_eq!(saver.restore(&mut restored), Restored::Saved);
        assert_eq!(restored.level(), store.level());
        assert_eq!(restored.selection(), Some((0, 0)));
    }

    #[test]
    fn nothing_to_restore() {
        let saver = SaverLevel::new(MemoryStore::new());
        let mut store = GridStore::new();
        assert_eq!(saver.restore(&mut store), Restored::Nothing);
        assert!(store.level().is_none());
    }

    #[test]
    fn corrupted_save_gives_default_level() {
        let memory = MemoryStore::new();
        memory.set_item(LEVEL_KEY, "{broken").unwrap();
        let saver = SaverLevel::new(memory);

        let mut store = GridStore::new();
        assert_eq!(saver.restore(&mut store), Restored::Fallback);
        let level = store.level().unwrap();
        assert_eq!((level.rows(), level.cols()), (6, 5));
        assert!(saver.get_snapshot().unwrap().is_some());
    }

    #[test]
    fn invalid_save_is_reported_as_fallback() {
        let memory = MemoryStore::new();
        memory
            .set_item(
                LEVEL_KEY,
                r#"[[{"type":0,"dest_color":9,"preset_color":-1,"direction":"up"}]]"#,
            )
            .unwrap();
        let saver = SaverLevel::new(memory);

        let mut store = GridStore::new();
        assert_eq!(saver.restore(&mut store), Restored::Fallback);
        assert_eq!(store.level().unwrap().len(), 30);
    }

    #[test]
    fn delete_save_in_files() {
        let dir = tempdir().unwrap();
        let saver = SaverLevel::new(FileStore::new(dir.path().to_path_buf()));
        let level = Level::new(2, 2).unwrap();
        saver.save_level(&level).unwrap();
        assert!(saver.get_snapshot().unwrap().is_some());

        saver.delete_save();
        assert_eq!(saver.get_snapshot().unwrap(), None);
    }
}
