//! The object-table layer of the archive.
//!
//! An archive stores its object graph as flat tables of tagged records that
//! point at each other by position. Decoding happens in three steps:
//!
//! * [`record`] - decode one record (fixed-format or user object) at the
//!   cursor, leaving back-references as raw [`RefSlot`]s.
//! * [`table`] - validate the table magics, decode the declared number of
//!   records, run the image hook.
//! * [`resolve`] - convert every raw slot into a checked [`ObjectId`] link.
//!
//! All class-id based decisions live in [`class`].

pub mod class;
pub mod node;
pub mod record;
pub mod resolve;
pub mod table;

pub use node::{Field, Image, LargeInt, Node, ObjectId, Payload, RefSlot};
pub use table::ObjectTable;
