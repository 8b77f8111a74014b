//! Whole `.sb` archives.
//!
//! ## Layout
//! ```text
//! [0x00] Magic "ScratchV01" or "ScratchV02"   (10 bytes)
//! [0x0A] ContentLength                        (i32 BE, not validated)
//! [0x0E] Project info object table
//! [....] Content object table
//! ```
//!
//! The info table's root is a dictionary of project metadata (author,
//! comment, thumbnail, ...). The content table's root is the stage; sprites,
//! media and everything else they reference follow it.

use std::io::Read;

use log::debug;

use crate::cursor::ByteCursor;
use crate::object::{Node, ObjectTable};
use crate::options::ParseOptions;
use crate::project::{ProjectTranslator, Target};
use crate::{Error, Result};

const HEADER_LEN: usize = 10;

/// Archive header revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderVersion {
    V01,
    V02,
}

impl HeaderVersion {
    fn from_magic(magic: &[u8; HEADER_LEN]) -> Option<Self> {
        match magic {
            b"ScratchV01" => Some(HeaderVersion::V01),
            b"ScratchV02" => Some(HeaderVersion::V02),
            _ => None,
        }
    }
}

/// A fully decoded archive. Only returned when both tables decoded and
/// resolved without error.
#[derive(Debug, Clone)]
pub struct SbArchive {
    pub version: HeaderVersion,
    /// Declared content length from the header.
    pub content_length: i32,
    /// Project metadata table.
    pub info_table: ObjectTable,
    /// Stage, sprites and everything they reference.
    pub content_table: ObjectTable,
}

impl SbArchive {
    /// Parse an archive with default options.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with(data, &ParseOptions::default())
    }

    /// Parse an archive: the header, then the info and content tables.
    pub fn parse_with(data: &[u8], options: &ParseOptions) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        let magic = cursor.read_array::<HEADER_LEN>()?;
        let version = HeaderVersion::from_magic(&magic).ok_or_else(|| Error::BadMagic {
            expected: b"ScratchV01",
            found: magic.to_vec(),
        })?;
        let content_length = cursor.read_i32()?;

        let info_table = ObjectTable::read(&mut cursor, options)?;
        let content_table = ObjectTable::read(&mut cursor, options)?;
        debug!(
            "{version:?} archive: {} info objects, {} content objects",
            info_table.len(),
            content_table.len()
        );

        Ok(Self {
            version,
            content_length,
            info_table,
            content_table,
        })
    }

    /// Read `reader` to the end and parse the result.
    pub fn from_reader<R: Read>(mut reader: R, options: &ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::parse_with(&data, options)
    }

    /// Translate the content table: the stage first, then every sprite.
    pub fn targets(&self) -> Result<Vec<Target>> {
        ProjectTranslator::new(&self.content_table).parse_project()
    }

    /// Project metadata from the info table.
    pub fn info(&self) -> ProjectInfo<'_> {
        ProjectInfo::new(&self.info_table)
    }
}

/// Parse an archive and translate it in one step.
pub fn parse_project(data: &[u8]) -> Result<Vec<Target>> {
    SbArchive::parse(data)?.targets()
}

/// String-keyed view of the info table's root dictionary.
///
/// Empty when the root is missing or is not a dictionary.
#[derive(Debug, Clone, Copy)]
pub struct ProjectInfo<'t> {
    table: &'t ObjectTable,
    root: Option<&'t Node>,
}

impl<'t> ProjectInfo<'t> {
    fn new(table: &'t ObjectTable) -> Self {
        Self {
            table,
            root: table.root(),
        }
    }

    /// All entries with a string key, in stored order.
    pub fn entries(self) -> impl Iterator<Item = (&'t str, &'t Node)> + 't {
        let table = self.table;
        self.root
            .and_then(Node::elements)
            .unwrap_or_default()
            .chunks_exact(2)
            .filter_map(move |pair| {
                let key = table.try_deref(&pair[0])?.as_str()?;
                Some((key, table.try_deref(&pair[1])?))
            })
    }

    /// Value stored under `key`, if any.
    pub fn get(self, key: &str) -> Option<&'t Node> {
        self.entries().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Convenience for string-valued entries such as `author` or `comment`.
    pub fn get_str(self, key: &str) -> Option<&'t str> {
        self.get(key).and_then(Node::as_str)
    }
}
