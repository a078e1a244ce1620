/*
config.rs

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

//! Application settings.
//!
//! The data directory and the submission URL can be overridden on the command line or with the
//! `BBEDITOR_DATA_DIR` and `BBEDITOR_SUBMIT_URL` environment variables.

use std::env;
use std::path::PathBuf;

pub const APPLICATION_NAME: &str = "bbeditor";

pub const COPYRIGHT_NOTICE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright (C) 2025 Hervé Quatremain
License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>
This is free software: you are free to change and redistribute it.
There is NO WARRANTY, to the extent permitted by law."
);

/// Key under which the level being designed is saved.
pub const LEVEL_KEY: &str = "borderBoundLevel";

/// Size of the level used when the saved level cannot be read.
pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLS: usize = 5;

/// Level sizes that the game supports, as (rows, columns).
pub const LEVEL_SIZES: [(usize, usize); 6] = [(6, 5), (6, 6), (7, 5), (7, 6), (8, 5), (8, 6)];

/// Service that receives the submitted levels.
pub const SUBMIT_URL: &str = "https://borderbound.5646316.xyz";

/// Timeouts for the submission request, in seconds.
pub const SUBMIT_CONNECT_TIMEOUT_SEC: u64 = 5;
pub const SUBMIT_TIMEOUT_SEC: u64 = 20;

/// Return the directory where the level is saved when none is given on the command line.
///
/// Follow the XDG convention: `$XDG_DATA_HOME/bbeditor`, or `$HOME/.local/share/bbeditor`, or
/// the current directory as a last resort.
pub fn default_data_dir() -> PathBuf {
    let mut dir: PathBuf = match env::var_os("XDG_DATA_HOME") {
        Some(d) if !d.is_empty() => PathBuf::from(d),
        _ => match env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".local").join("share"),
            None => return PathBuf::from("."),
        },
    };
    dir.push(APPLICATION_NAME);
    dir
}
