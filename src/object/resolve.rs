//! Back-reference resolution.
//!
//! One linear pass over the table converts every on-disk [`RefSlot`] into a
//! checked [`ObjectId`]. Links are followed at read time through
//! [`ObjectTable::deref`], so nested references need no fixed-point
//! iteration and no entry is ever copied into another.

use log::debug;

use super::node::{Node, ObjectId, RefSlot};
use super::record::RawNode;
use super::table::ObjectTable;
use crate::Result;

/// Resolve a freshly decoded table.
///
/// Fails with [`crate::Error::DanglingRef`] on the first reference that does
/// not name an entry of this table.
pub fn resolve(raw: Vec<RawNode>) -> Result<ObjectTable> {
    let len = raw.len();
    let mut links = 0usize;
    let mut link = |slot: RefSlot| -> Result<ObjectId> {
        links += 1;
        slot.link(len)
    };
    let entries = raw
        .into_iter()
        .map(|node| node.map_refs(&mut link))
        .collect::<Result<Vec<Node>>>()?;
    debug!("resolved {links} references across {len} objects");
    Ok(ObjectTable::from_entries(entries))
}
