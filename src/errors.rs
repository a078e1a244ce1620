/*
errors.rs

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

//! Errors raised when building or editing a level.

use std::fmt;

use thiserror::Error;

/// Errors raised when editing a level.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The coordinates are outside the level.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} level")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A level needs at least one row and one column.
    #[error("invalid level size {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// A type, color, or direction outside its set of values.
    #[error("invalid {field} value: {value}")]
    InvalidFieldValue { field: &'static str, value: String },

    /// The saved level is not a non-empty rectangular matrix of cells.
    #[error("malformed level snapshot: {0}")]
    MalformedSnapshot(String),

    /// There is no level to edit (never created or deleted).
    #[error("no level is being edited")]
    NoLevel,
}

impl GridError {
    pub fn invalid_field(field: &'static str, value: impl fmt::Display) -> Self {
        Self::InvalidFieldValue {
            field,
            value: value.to_string(),
        }
    }
}
