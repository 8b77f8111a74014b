//! Library-wide error and result types.

use std::io;

use thiserror::Error;

/// Result alias used throughout sbkit.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`].
///
/// Every category is fatal: a failed parse never exposes a partial table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad magic, unsupported table version, an unknown class id, or
    /// nesting past the depth limit.
    Format,
    /// A read or a declared length ran past the end of the buffer.
    Bounds,
    /// The decoded graph does not have the shape of a project.
    Structural,
    /// An underlying reader or asset collaborator failed.
    Io,
}

/// All errors the library can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// A magic/signature field did not match the expected value.
    #[error("bad magic: expected {expected:?}, found {found:?}")]
    BadMagic {
        expected: &'static [u8],
        found: Vec<u8>,
    },
    /// An object table carries a version byte other than 1.
    #[error("unsupported object table version: {0}")]
    UnsupportedVersion(u8),
    /// A fixed-format class id that has no known layout.
    #[error("unknown fixed-format class {class_id} at offset {offset:#x}")]
    UnknownClass { class_id: u8, offset: usize },
    /// Inline values are nested deeper than [`MAX_DEPTH`](crate::object::record::MAX_DEPTH).
    #[error("inline values nested too deeply at offset {offset:#x}")]
    NestingTooDeep { offset: usize },
    /// The buffer ended before all expected bytes could be read.
    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },
    /// A declared count is negative or cannot fit in the remaining bytes.
    #[error("declared length {declared} at offset {offset:#x} exceeds the {remaining} bytes remaining")]
    InvalidLength {
        offset: usize,
        declared: i64,
        remaining: usize,
    },
    /// The content table does not start with a stage record.
    #[error("first object in the content table is class {class_id}, not a stage")]
    NotStage { class_id: u8 },
    /// The content table holds no records at all.
    #[error("content table is empty")]
    EmptyTable,
    /// A back-reference points outside its object table.
    #[error("reference to object {index} is outside the {len}-entry table")]
    DanglingRef { index: u32, len: usize },
    /// A record is missing a field or has one of the wrong shape.
    #[error("malformed project: {0}")]
    Structure(&'static str),
    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BadMagic { .. }
            | Error::UnsupportedVersion(_)
            | Error::UnknownClass { .. }
            | Error::NestingTooDeep { .. } => ErrorKind::Format,
            Error::UnexpectedEof { .. } | Error::InvalidLength { .. } => ErrorKind::Bounds,
            Error::NotStage { .. }
            | Error::EmptyTable
            | Error::DanglingRef { .. }
            | Error::Structure(_) => ErrorKind::Structural,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}
