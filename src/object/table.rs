//! Object tables.
//!
//! ## Layout
//! ```text
//! [0x00] Magic "ObjS"        (4 bytes)
//! [0x04] Version (1)         (u8)
//! [0x05] Magic "Stch"        (4 bytes)
//! [0x09] Version (1)         (u8)
//! [0x0A] RecordCount         (i32 BE)
//! [0x0E] Records             (RecordCount × record)
//! ```

use std::ops::Index;

use log::debug;

use super::node::{Field, Node, ObjectId, Payload};
use super::record::{RawNode, RecordDecoder};
use super::resolve::resolve;
use crate::cursor::ByteCursor;
use crate::options::ParseOptions;
use crate::{Error, Result};

const OBJS_MAGIC: &[u8; 4] = b"ObjS";
const STCH_MAGIC: &[u8; 4] = b"Stch";
const TABLE_VERSION: u8 = 1;

/// A resolved, index-addressable object table.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTable {
    entries: Vec<Node>,
}

impl ObjectTable {
    /// Read one table at the cursor: both magics, the record count, then
    /// every record. References are resolved before the table is returned.
    pub fn read(cursor: &mut ByteCursor<'_>, options: &ParseOptions) -> Result<Self> {
        read_magic(cursor, OBJS_MAGIC)?;
        read_magic(cursor, STCH_MAGIC)?;

        // Every record takes at least its class id byte.
        let count = cursor.read_count(1)?;
        let mut raw = Vec::with_capacity(count);
        let mut decoder = RecordDecoder::new(cursor, options);
        for _ in 0..count {
            raw.push(decoder.record()?);
        }
        debug!("decoded {count} objects");

        resolve(decode_images(raw))
    }

    pub(crate) fn from_entries(entries: Vec<Node>) -> Self {
        Self { entries }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `id`, or [`None`] if `id` is outside this table.
    pub fn get(&self, id: ObjectId) -> Option<&Node> {
        self.entries.get(id.index())
    }

    /// First entry, if any.
    pub fn root(&self) -> Option<&Node> {
        self.entries.first()
    }

    /// Follow a field to the node it denotes.
    ///
    /// Inline values are returned as-is; links return the table entry.
    ///
    /// # Panics
    ///
    /// Panics if the field links past the end of this table, which only
    /// happens for a field taken from a different table. Use
    /// [`try_deref`](Self::try_deref) when the field's origin is unknown.
    pub fn deref<'t>(&'t self, field: &'t Field) -> &'t Node {
        match field {
            Field::Value(node) => node,
            Field::Ref(id) => &self.entries[id.index()],
        }
    }

    /// Checked [`deref`](Self::deref). Returns [`None`] for a link outside
    /// this table.
    pub fn try_deref<'t>(&'t self, field: &'t Field) -> Option<&'t Node> {
        match field {
            Field::Value(node) => Some(node),
            Field::Ref(id) => self.get(*id),
        }
    }

    /// Iterate over all entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.entries.iter()
    }
}

/// # Panics
///
/// Panics if `id` is outside the table; see [`ObjectTable::get`].
impl Index<ObjectId> for ObjectTable {
    type Output = Node;

    fn index(&self, id: ObjectId) -> &Self::Output {
        &self.entries[id.index()]
    }
}

fn read_magic(cursor: &mut ByteCursor<'_>, magic: &'static [u8; 4]) -> Result<()> {
    cursor.expect_magic(magic)?;
    let version = cursor.read_u8()?;
    if version != TABLE_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(())
}

/// Hook for turning form/color-form descriptors into renderable bitmaps.
///
/// Pixel decoding is not supported; descriptors are passed through
/// unchanged and keep their pixel and color-map links.
fn decode_images(raw: Vec<RawNode>) -> Vec<RawNode> {
    let images = raw
        .iter()
        .filter(|node| matches!(node.payload, Payload::Image(_)))
        .count();
    if images > 0 {
        debug!("{images} images left undecoded");
    }
    raw
}
