/*
cli_options.rs

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

//! Process command-line options.
//!
//! Each command restores the saved level, applies its change, and saves the level again.
//!
//! # Examples
//!
//! Create a level, turn a cell into a rotation limit, and export the level:
//!
//! ```text
//! $ bbeditor new --rows 6 --cols 5
//! $ bbeditor edit 2 3 --type limit --color yellow --direction rotate_left
//! $ bbeditor export --xml --name Alice
//! <level username="Alice" color="rrrrr rrrrr rrryr rrrrr rrrrr rrrrr" modifier="00000 00000 000l0 00000 00000 00000" />
//! ```

use clap::builder::TypedValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use std::cell::RefCell;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use crate::codec::{
    CanonicalLevel, Snapshot, Strictness, canonical_from_snapshot, level_element, to_canonical,
};
use crate::config::{self, COPYRIGHT_NOTICE, DEFAULT_COLS, DEFAULT_ROWS, LEVEL_SIZES, SUBMIT_URL};
use crate::draw::Frame;
use crate::grid_store::GridStore;
use crate::level::{CellType, Color, Direction};
use crate::saver::level::{Restored, SaverLevel};
use crate::saver::store::{FileStore, KeyValueStore};
use crate::submission::{HttpSubmitter, SubmissionForm, submit_level};

/// Design levels for BorderBound!
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// Directory where the level being designed is saved
    #[arg(long, env = "BBEDITOR_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the level sizes that the game supports
    Sizes,

    /// Start a new level, replacing the level being designed
    New {
        /// Number of rows
        #[arg(short, long, default_value_t = DEFAULT_ROWS, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
        rows: usize,

        /// Number of columns
        #[arg(short, long, default_value_t = DEFAULT_COLS, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
        cols: usize,
    },

    /// Draw the level being designed
    Show,

    /// Change a cell of the level
    Edit {
        /// Row of the cell, starting at 0
        row: usize,

        /// Column of the cell, starting at 0
        col: usize,

        /// Cell type
        #[arg(short = 't', long = "type", value_enum)]
        cell_type: Option<CellType>,

        /// Destination color
        #[arg(short, long, value_enum)]
        color: Option<Color>,

        /// Stone already on the board (empty cells only)
        #[arg(short, long, value_enum)]
        preset: Option<Preset>,

        /// Movement or rotation restriction (limit cells)
        #[arg(short = 'r', long, value_enum)]
        direction: Option<Direction>,
    },

    /// Print the exported form of the level
    Export {
        /// Print the `<level>` element instead of the two grids
        #[arg(short, long, default_value_t = false)]
        xml: bool,

        /// Author name to add to the `<level>` element
        #[arg(short, long, requires = "xml")]
        name: Option<String>,

        /// Export a saved level file instead of the level being designed
        #[arg(short, long)]
        from: Option<PathBuf>,

        /// Fail on invalid values in the file instead of using fallback characters
        #[arg(short, long, default_value_t = false, requires = "from")]
        strict: bool,
    },

    /// Send the level for publication, and delete it once accepted
    Submit {
        /// Name displayed with the level
        #[arg(short, long, default_value = "")]
        name: String,

        /// Contact email address (optional)
        #[arg(short, long, default_value = "")]
        email: String,

        /// Agree to publish the level
        #[arg(short, long, default_value_t = false)]
        agree: bool,

        /// Address of the submission service
        #[arg(long, env = "BBEDITOR_SUBMIT_URL", default_value = SUBMIT_URL)]
        url: String,
    },

    /// Delete the level being designed
    Delete,
}

/// Preset stone choice: a color, or no stone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Preset {
    None,
    Red,
    Green,
    Blue,
    Yellow,
    Black,
}

impl From<Preset> for Option<Color> {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::None => None,
            Preset::Red => Some(Color::Red),
            Preset::Green => Some(Color::Green),
            Preset::Blue => Some(Color::Blue),
            Preset::Yellow => Some(Color::Yellow),
            Preset::Black => Some(Color::Black),
        }
    }
}

/// Parse and process command-line options, and return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let data_dir: PathBuf = args.data_dir.unwrap_or_else(config::default_data_dir);
    let saver: SaverLevel<FileStore> = SaverLevel::new(FileStore::new(data_dir));

    match run(args.command, &saver) {
        Ok(()) => 0,
        Err(message) => {
            eprintln!("{message}");
            1
        }
    }
}

/// Process a command. The error is the message for the user.
fn run(command: Command, saver: &SaverLevel<FileStore>) -> Result<(), String> {
    let frame: Rc<RefCell<Frame>> = Rc::new(RefCell::new(Frame::default()));
    let mut grid_store: GridStore = GridStore::new();
    grid_store.add_observer(Box::new(Rc::clone(&frame)));

    match command {
        Command::Sizes => {
            for (rows, cols) in LEVEL_SIZES {
                println!("{rows}x{cols}");
            }
        }

        Command::New { rows, cols } => {
            if !LEVEL_SIZES.contains(&(rows, cols)) {
                eprintln!("Warning: the game does not offer {rows}x{cols} levels");
            }
            grid_store.create(rows, cols).map_err(|e| e.to_string())?;
            save(&grid_store, saver)?;
            print!("{}", frame.borrow().render());
        }

        Command::Show => {
            restore(&mut grid_store, saver)?;
            print!("{}", frame.borrow().render());
            if let Some(level) = grid_store.level() {
                let stones: usize = level
                    .iter_cells()
                    .filter(|c| c.preset_color().is_some())
                    .count();
                println!(
                    "{}x{} level, {} cells, {stones} preset stones",
                    level.rows(),
                    level.cols(),
                    level.len()
                );
            }
        }

        Command::Edit {
            row,
            col,
            cell_type,
            color,
            preset,
            direction,
        } => {
            restore(&mut grid_store, saver)?;
            grid_store.select(row, col).map_err(|e| e.to_string())?;

            // The type goes first: it decides whether the cell accepts a preset stone.
            if let Some(t) = cell_type {
                grid_store.set_type(t).map_err(|e| e.to_string())?;
            }
            if let Some(c) = color {
                grid_store.set_dest_color(c).map_err(|e| e.to_string())?;
            }
            if let Some(d) = direction {
                grid_store.set_direction(d).map_err(|e| e.to_string())?;
            }
            if let Some(p) = preset {
                let applied: bool = grid_store
                    .set_preset_color(p.into())
                    .map_err(|e| e.to_string())?;
                if !applied {
                    eprintln!("Warning: only empty cells can have a preset stone");
                }
            }
            save(&grid_store, saver)?;
            print!("{}", frame.borrow().render());
            if let Some(cell) = grid_store.selected_cell() {
                let stone: String = cell
                    .preset_color()
                    .map_or("none".to_string(), |c| c.to_string());
                println!(
                    "Cell ({row}, {col}): {}, {}, preset stone {stone}, direction {}",
                    cell.cell_type(),
                    cell.dest_color(),
                    cell.direction()
                );
            }
        }

        Command::Export {
            xml,
            name,
            from,
            strict,
        } => {
            let canonical: CanonicalLevel = match from {
                Some(path) => {
                    let text: String = fs::read_to_string(&path)
                        .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
                    let strictness = if strict {
                        Strictness::Strict
                    } else {
                        Strictness::Lenient
                    };
                    canonical_from_snapshot(&Snapshot::from_json(&text), strictness)
                        .map_err(|e| format!("{}: {e}", path.display()))?
                }
                None => {
                    restore_saved(&mut grid_store, saver)?;
                    match grid_store.level() {
                        Some(level) => to_canonical(level),
                        None => return Err(no_level_message()),
                    }
                }
            };
            if xml {
                println!("{}", level_element(&canonical, name.as_deref()));
            } else {
                println!("color:    {}", canonical.color_grid);
                println!("modifier: {}", canonical.modifier_grid);
            }
        }

        Command::Submit {
            name,
            email,
            agree,
            url,
        } => {
            restore_saved(&mut grid_store, saver)?;
            let form = SubmissionForm {
                name,
                email,
                agreed: agree,
            };
            let submitter: HttpSubmitter = HttpSubmitter::new(&url).map_err(|e| e.to_string())?;
            let message: String = submit_level(&mut grid_store, saver, &form, &submitter)
                .map_err(|e| e.to_string())?;
            println!("{message}");
        }

        Command::Delete => {
            grid_store.reset();
            saver.delete_save();
            println!("Level deleted");
        }
    }
    Ok(())
}

/// Restore the saved level. Fail when there is no level to work on.
///
/// A warning is printed when the saved level is invalid and a default level replaces it.
fn restore<S: KeyValueStore>(
    grid_store: &mut GridStore,
    saver: &SaverLevel<S>,
) -> Result<Restored, String> {
    match saver.restore(grid_store) {
        Restored::Nothing => Err(no_level_message()),
        Restored::Fallback => {
            eprintln!(
                "Warning: the saved level is invalid. A blank {DEFAULT_ROWS}x{DEFAULT_COLS} level replaces it."
            );
            Ok(Restored::Fallback)
        }
        Restored::Saved => Ok(Restored::Saved),
    }
}

/// Restore the saved level for a command that publishes it. A blank level that replaces an
/// invalid save is refused.
fn restore_saved<S: KeyValueStore>(
    grid_store: &mut GridStore,
    saver: &SaverLevel<S>,
) -> Result<(), String> {
    match restore(grid_store, saver)? {
        Restored::Saved => Ok(()),
        _ => Err(
            "The saved level cannot be used. Fix the save file, or use `bbeditor new` to start a new level."
                .to_string(),
        ),
    }
}

fn save<S: KeyValueStore>(grid_store: &GridStore, saver: &SaverLevel<S>) -> Result<(), String> {
    let level = grid_store.level().ok_or_else(no_level_message)?;
    saver
        .save_level(level)
        .map_err(|e| format!("Cannot save the level: {e}"))?;
    debug!("Saved {}x{} level", level.rows(), level.cols());
    Ok(())
}

fn no_level_message() -> String {
    "No level is being designed. Use `bbeditor new` to start one.".to_string()
}
