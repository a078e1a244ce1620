/*
store.rs

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

//! Key-value storage for the saved data.
//!
//! [`FileStore`] keeps each value in a `<key>.json` file of the data directory.
//! [`MemoryStore`] keeps the values in memory.

use log::debug;
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
use std::error::Error;
use std::fs::{File, create_dir_all, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::PathBuf;

/// Storage of string values indexed by a key.
pub trait KeyValueStore {
    /// Return the value for the key, or None if the key has no value.
    fn get_item(&self, key: &str) -> Result<Option<String>, Box<dyn Error>>;

    /// Store the value for the key, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>>;

    /// Delete the value for the key. Deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), Box<dyn Error>>;
}

/// Store the values in files.
pub struct FileStore {
    /// Directory where the files are created.
    data_dir: PathBuf,
}

impl FileStore {
    /// Create a [`FileStore`] object.
    ///
    /// The directory is created when the first value is stored.
    pub fn new(data_dir: PathBuf) -> Self {
        debug!("Data directory: {data_dir:?}");
        Self { data_dir }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let file: File = match File::open(self.path(key)) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(Box::new(error)),
            },
        };
        let mut reader: BufReader<File> = BufReader::new(file);
        let mut value: String = String::new();
        reader.read_to_string(&mut value)?;
        Ok(Some(value))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        create_dir_all(&self.data_dir)?;
        let file: File = File::create(self.path(key))?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        writer.write_all(value.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), Box<dyn Error>> {
        match remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(Box::new(error)),
        }
    }
}

/// Store the values in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), Box<dyn Error>> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_store_set_get_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get_item("level").unwrap(), None);
        store.set_item("level", "[[1]]").unwrap();
        assert_eq!(store.get_item("level").unwrap().as_deref(), Some("[[1]]"));
        assert!(dir.path().join("nested").join("level.json").exists());

        store.set_item("level", "[]").unwrap();
        assert_eq!(store.get_item("level").unwrap().as_deref(), Some("[]"));

        store.remove_item("level").unwrap();
        assert_eq!(store.get_item("level").unwrap(), None);
        store.remove_item("level").unwrap();
    }

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }
}
