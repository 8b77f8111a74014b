//! Decoded records.
//!
//! Records are generic over how they point at other table entries:
//! the decoder produces `Node<RefSlot>` (raw on-disk 1-based indices), the
//! resolver turns every slot into a checked [`ObjectId`]. Resolved nodes
//! never contain a [`RefSlot`]; consumers follow links through
//! [`ObjectTable::deref`](super::ObjectTable::deref).

use crate::{Error, Result};

/// On-disk back-reference: the 1-based position of the target record.
///
/// Only exists while a table is being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefSlot {
    pub index: u32,
}

impl RefSlot {
    /// Convert to a 0-based position in a table of `len` entries.
    ///
    /// Returns [`Error::DanglingRef`] for index 0 or anything past the end.
    pub fn link(self, len: usize) -> Result<ObjectId> {
        match (self.index as usize).checked_sub(1) {
            Some(i) if i < len => Ok(ObjectId(i)),
            _ => Err(Error::DanglingRef {
                index: self.index,
                len,
            }),
        }
    }
}

/// 0-based position of an entry in an [`ObjectTable`](super::ObjectTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    /// 0-based position in the owning table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One slot of a field stream: either an inline record or a link to a
/// table entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<R = ObjectId> {
    Value(Node<R>),
    Ref(R),
}

/// A decoded record.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<R = ObjectId> {
    pub class_id: u8,
    /// Human-readable label of the class.
    pub class_name: &'static str,
    pub payload: Payload<R>,
    /// Present only for user-object records.
    pub class_version: Option<u8>,
    /// Present only for user-object records.
    pub fields: Option<Vec<Field<R>>>,
}

/// Typed content of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<R = ObjectId> {
    Null,
    Bool(bool),
    Int(i64),
    /// An integer too large for `i64`.
    LargeInt(LargeInt),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Raw 32-bit bitmap words.
    Bitmap(Vec<u32>),
    /// Packed `0xAARRGGBB`.
    Color(u32),
    /// Arrays, collections, sets, points and rectangles.
    List(Vec<Field<R>>),
    /// Dictionaries, keys and values interleaved.
    Dictionary(Vec<Field<R>>),
    Image(Box<Image<R>>),
    /// Placeholder for user objects whose content lives in their fields.
    Object,
}

/// Form / color form descriptor. Pixel data is not decoded; the slots are
/// kept so later stages can look the arrays up in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<R = ObjectId> {
    pub width: Field<R>,
    pub height: Field<R>,
    pub depth: Field<R>,
    /// Unused offset slot.
    pub offset: Field<R>,
    pub pixels: Field<R>,
    /// Only present for color forms (class 35).
    pub color_map: Option<Field<R>>,
}

/// Arbitrary-precision integer as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargeInt {
    pub negative: bool,
    /// Little-endian magnitude bytes.
    pub magnitude: Vec<u8>,
}

impl LargeInt {
    /// Exact value if it fits in an `i64`.
    pub fn to_i64(&self) -> Option<i64> {
        let mut value: u64 = 0;
        for (i, &b) in self.magnitude.iter().enumerate() {
            if b == 0 {
                continue;
            }
            if i >= 8 {
                return None;
            }
            value |= (b as u64) << (8 * i);
        }
        if self.negative {
            0i64.checked_sub_unsigned(value)
        } else {
            i64::try_from(value).ok()
        }
    }

    /// Approximate value; each byte's place value grows by 256.
    pub fn to_f64(&self) -> f64 {
        let mut num = 0.0;
        let mut multiplier = 1.0;
        for &b in &self.magnitude {
            num += multiplier * b as f64;
            multiplier *= 256.0;
        }
        if self.negative { -num } else { num }
    }
}

impl<R> Node<R> {
    /// Whether the payload is [`Payload::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self.payload, Payload::Null)
    }

    /// Whether this record was stored as a user object (class id >= 99).
    pub fn is_user_object(&self) -> bool {
        self.class_version.is_some()
    }

    /// Text of a string, symbol or UTF-8 record.
    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Value of a boolean record.
    pub fn as_bool(&self) -> Option<bool> {
        match self.payload {
            Payload::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Integer value, including large ints that fit in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match &self.payload {
            Payload::Int(v) => Some(*v),
            Payload::LargeInt(v) => v.to_i64(),
            _ => None,
        }
    }

    /// Any numeric payload as a double.
    pub fn as_f64(&self) -> Option<f64> {
        match &self.payload {
            Payload::Int(v) => Some(*v as f64),
            Payload::LargeInt(v) => Some(v.to_f64()),
            Payload::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Elements of a list or the interleaved entries of a dictionary.
    pub fn elements(&self) -> Option<&[Field<R>]> {
        match &self.payload {
            Payload::List(items) | Payload::Dictionary(items) => Some(items),
            _ => None,
        }
    }

    /// User-object fields; empty for fixed-format records.
    pub fn fields(&self) -> &[Field<R>] {
        self.fields.as_deref().unwrap_or_default()
    }

    /// Rebuild this node with every reference passed through `f`.
    pub(crate) fn map_refs<S, F>(self, f: &mut F) -> Result<Node<S>>
    where
        F: FnMut(R) -> Result<S>,
    {
        Ok(Node {
            class_id: self.class_id,
            class_name: self.class_name,
            payload: self.payload.map_refs(f)?,
            class_version: self.class_version,
            fields: self.fields.map(|fields| map_all(fields, f)).transpose()?,
        })
    }
}

impl<R> Field<R> {
    pub(crate) fn map_refs<S, F>(self, f: &mut F) -> Result<Field<S>>
    where
        F: FnMut(R) -> Result<S>,
    {
        Ok(match self {
            Field::Value(node) => Field::Value(node.map_refs(f)?),
            Field::Ref(r) => Field::Ref(f(r)?),
        })
    }
}

impl<R> Payload<R> {
    fn map_refs<S, F>(self, f: &mut F) -> Result<Payload<S>>
    where
        F: FnMut(R) -> Result<S>,
    {
        Ok(match self {
            Payload::Null => Payload::Null,
            Payload::Bool(b) => Payload::Bool(b),
            Payload::Int(v) => Payload::Int(v),
            Payload::LargeInt(v) => Payload::LargeInt(v),
            Payload::Float(v) => Payload::Float(v),
            Payload::Str(s) => Payload::Str(s),
            Payload::Bytes(b) => Payload::Bytes(b),
            Payload::Bitmap(w) => Payload::Bitmap(w),
            Payload::Color(c) => Payload::Color(c),
            Payload::List(items) => Payload::List(map_all(items, f)?),
            Payload::Dictionary(items) => Payload::Dictionary(map_all(items, f)?),
            Payload::Image(image) => Payload::Image(Box::new(image.map_refs(f)?)),
            Payload::Object => Payload::Object,
        })
    }
}

impl<R> Image<R> {
    fn map_refs<S, F>(self, f: &mut F) -> Result<Image<S>>
    where
        F: FnMut(R) -> Result<S>,
    {
        Ok(Image {
            width: self.width.map_refs(f)?,
            height: self.height.map_refs(f)?,
            depth: self.depth.map_refs(f)?,
            offset: self.offset.map_refs(f)?,
            pixels: self.pixels.map_refs(f)?,
            color_map: self.color_map.map(|c| c.map_refs(f)).transpose()?,
        })
    }
}

fn map_all<R, S, F>(fields: Vec<Field<R>>, f: &mut F) -> Result<Vec<Field<S>>>
where
    F: FnMut(R) -> Result<S>,
{
    fields.into_iter().map(|field| field.map_refs(f)).collect()
}
