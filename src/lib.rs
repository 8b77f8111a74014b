//! **sbkit** - a decoder for legacy Scratch 1.x (`.sb`) project archives.
//!
//! An archive is a pair of flat object tables of tagged binary records that
//! reference each other by position. sbkit decodes both tables, resolves the
//! references, and translates the content table into the modern target
//! model: the stage followed by its sprites.
//!
//! # Layers
//! | Module | Role |
//! |--------|------|
//! | [`cursor`]  | Bounds-checked big-endian reader |
//! | [`object`]  | Record decoding, object tables, reference resolution |
//! | [`project`] | Stage/sprite translation |
//! | [`archive`] | Header validation and the two-table sequence |
//! | [`assets`]  | Interfaces for costume/sound collaborators |
//!
//! ```no_run
//! let data = std::fs::read("project.sb")?;
//! for target in sbkit::parse_project(&data)? {
//!     println!("{} ({} variables)", target.name, target.variables.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Script bodies, list watchers and bitmap pixels are not decoded: they
//! translate to empty results rather than approximations.

pub mod archive;
pub mod assets;
pub mod cursor;
pub mod error;
pub mod object;
pub mod options;
pub mod project;

pub use archive::{HeaderVersion, ProjectInfo, SbArchive, parse_project};
pub use error::{Error, ErrorKind, Result};
pub use options::{FloatPolicy, ParseOptions};
