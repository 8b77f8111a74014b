//! Single-record decoding.
//!
//! ## Record layout
//! ```text
//! [0x00] ClassId                                    (u8)
//!
//! ClassId < 99 - fixed format, body per the table below
//! ClassId >= 99 - user object:
//! [0x01] ClassVersion                               (u8)
//! [0x02] FieldCount                                 (u8)
//! [0x03] Fields                                     (FieldCount × field)
//! ```
//!
//! ## Field layout
//! ```text
//! [0x00] ClassId                                    (u8)
//!        99   - [0x01] target index, 1-based        (u24 BE)
//!        else - fixed-format body inline
//! ```
//!
//! ## Fixed-format bodies (all integers big-endian)
//! ```text
//!  1        null                 -
//!  2 / 3    true / false         -
//!  4        int                  i32
//!  5        int                  i16
//!  6 / 7    large +/- int        i16 count, count bytes (little-endian magnitude)
//!  8        double               f64
//!  9 / 10   string / symbol      i32 count, count bytes
//! 11        byte array           i32 count, count bytes
//! 12        sound buffer         i32 count, 2 × count bytes
//! 13        bitmap               i32 count, count × u32
//! 14        UTF-8 string         i32 count, count bytes
//! 20..=23   array / collection   i32 count, count fields
//! 24 / 25   dictionary           i32 count, 2 × count fields
//! 30 / 31   color                u32 (10 bits per channel), u8 alpha for 31
//! 32        point                2 fields
//! 33        rectangle            4 fields
//! 34 / 35   form / color form    5 fields, 6 for 35
//! ```

use log::trace;

use super::class::{self, ClassKind, FixedKind, REF_MARKER};
use super::node::{Field, Image, LargeInt, Node, Payload, RefSlot};
use crate::cursor::ByteCursor;
use crate::options::ParseOptions;
use crate::{Error, Result};

/// A record as decoded, before references are resolved.
pub type RawNode = Node<RefSlot>;
/// A field as decoded, before references are resolved.
pub type RawField = Field<RefSlot>;

/// Deepest chain of inline values a single record may contain.
pub const MAX_DEPTH: usize = 512;

/// Decodes records at the cursor's position.
pub struct RecordDecoder<'c, 'a> {
    cursor: &'c mut ByteCursor<'a>,
    options: &'c ParseOptions,
    /// Inline fields currently being decoded.
    depth: usize,
}

impl<'c, 'a> RecordDecoder<'c, 'a> {
    pub fn new(cursor: &'c mut ByteCursor<'a>, options: &'c ParseOptions) -> Self {
        Self {
            cursor,
            options,
            depth: 0,
        }
    }

    /// Decode one top-level record.
    pub fn record(&mut self) -> Result<RawNode> {
        let offset = self.cursor.position();
        let class_id = self.cursor.read_u8()?;
        match class::classify(class_id) {
            Some(ClassKind::Fixed(kind)) => self.fixed(class_id, kind),
            // The marker only means "reference" inside a field stream.
            Some(ClassKind::UserObject | ClassKind::Reference) => self.user_object(class_id),
            None => Err(Error::UnknownClass { class_id, offset }),
        }
    }

    /// Decode one field: an inline fixed-format record or a reference.
    ///
    /// Fails with [`Error::NestingTooDeep`] once inline values nest more
    /// than [`MAX_DEPTH`] levels.
    pub fn field(&mut self) -> Result<RawField> {
        let offset = self.cursor.position();
        let class_id = self.cursor.read_u8()?;
        match class::classify(class_id) {
            Some(ClassKind::Reference) => Ok(Field::Ref(RefSlot {
                index: self.cursor.read_u24()?,
            })),
            Some(ClassKind::Fixed(kind)) => {
                if self.depth >= MAX_DEPTH {
                    return Err(Error::NestingTooDeep { offset });
                }
                self.depth += 1;
                let node = self.fixed(class_id, kind);
                self.depth -= 1;
                Ok(Field::Value(node?))
            }
            Some(ClassKind::UserObject) | None => Err(Error::UnknownClass { class_id, offset }),
        }
    }

    fn fields(&mut self, count: usize) -> Result<Vec<RawField>> {
        let mut fields = Vec::with_capacity(count);
        for _ in 0..count {
            fields.push(self.field()?);
        }
        Ok(fields)
    }

    fn user_object(&mut self, class_id: u8) -> Result<RawNode> {
        let class_version = self.cursor.read_u8()?;
        let field_count = self.cursor.read_u8()? as usize;
        let fields = self.fields(field_count)?;
        let payload = if class::has_object_payload(class_id) {
            Payload::Object
        } else {
            Payload::Null
        };
        trace!(
            "class {class_id} ({}) v{class_version}, {field_count} fields",
            class::user_object_label(class_id)
        );
        Ok(Node {
            class_id,
            class_name: class::user_object_label(class_id),
            payload,
            class_version: Some(class_version),
            fields: Some(fields),
        })
    }

    fn fixed(&mut self, class_id: u8, kind: FixedKind) -> Result<RawNode> {
        debug_assert!(class_id < REF_MARKER);
        trace!("class {class_id} ({})", kind.label());
        let c = &mut *self.cursor;
        let payload = match kind {
            FixedKind::Null => Payload::Null,
            FixedKind::True => Payload::Bool(true),
            FixedKind::False => Payload::Bool(false),
            FixedKind::SmallInt => Payload::Int(c.read_i32()? as i64),
            FixedKind::SmallInt16 => Payload::Int(c.read_i16()? as i64),
            FixedKind::LargePositiveInt => self.large_int(false)?,
            FixedKind::LargeNegativeInt => self.large_int(true)?,
            FixedKind::Float => Payload::Float(self.options.float_policy.apply(c.read_f64()?)),
            FixedKind::String | FixedKind::Symbol | FixedKind::Utf8 => {
                let count = c.read_count(1)?;
                Payload::Str(c.read_string(count)?)
            }
            FixedKind::ByteArray => {
                let count = c.read_count(1)?;
                Payload::Bytes(c.read_bytes(count)?.to_vec())
            }
            FixedKind::SoundBuffer => {
                let count = c.read_count(2)?;
                Payload::Bytes(c.read_bytes(2 * count)?.to_vec())
            }
            FixedKind::Bitmap => {
                let count = c.read_count(4)?;
                let mut words = Vec::with_capacity(count);
                for _ in 0..count {
                    words.push(c.read_u32()?);
                }
                Payload::Bitmap(words)
            }
            FixedKind::Array
            | FixedKind::OrderedCollection
            | FixedKind::Set
            | FixedKind::IdentitySet => {
                let count = c.read_count(1)?;
                Payload::List(self.fields(count)?)
            }
            FixedKind::Dictionary | FixedKind::IdentityDictionary => {
                let count = c.read_count(2)?;
                Payload::Dictionary(self.fields(2 * count)?)
            }
            FixedKind::Color => Payload::Color(pack_color(c.read_u32()?, 0xFF)),
            FixedKind::TranslucentColor => {
                let rgb = c.read_u32()?;
                Payload::Color(pack_color(rgb, c.read_u8()?))
            }
            FixedKind::Point => Payload::List(self.fields(2)?),
            FixedKind::Rectangle => Payload::List(self.fields(4)?),
            FixedKind::Form | FixedKind::ColorForm => Payload::Image(Box::new(Image {
                width: self.field()?,
                height: self.field()?,
                depth: self.field()?,
                offset: self.field()?,
                pixels: self.field()?,
                color_map: match kind {
                    FixedKind::ColorForm => Some(self.field()?),
                    _ => None,
                },
            })),
        };
        Ok(Node {
            class_id,
            class_name: kind.label(),
            payload,
            class_version: None,
            fields: None,
        })
    }

    /// Little-endian magnitude with an i16 byte count.
    fn large_int(&mut self, negative: bool) -> Result<Payload<RefSlot>> {
        let offset = self.cursor.position();
        let declared = self.cursor.read_i16()?;
        let count = self.cursor.check_count(offset, declared as i64, 1)?;
        let magnitude = self.cursor.read_bytes(count)?.to_vec();
        let value = LargeInt {
            negative,
            magnitude,
        };
        Ok(match value.to_i64() {
            Some(v) => Payload::Int(v),
            None => Payload::LargeInt(value),
        })
    }
}

/// Repack a 30-bit `RRRRRRRRRRGGGGGGGGGGBBBBBBBBBB` color word into
/// `0xAARRGGBB`, keeping the top 8 bits of each channel.
fn pack_color(rgb: u32, alpha: u8) -> u32 {
    let r = (rgb >> 22) & 0xFF;
    let g = (rgb >> 12) & 0xFF;
    let b = (rgb >> 2) & 0xFF;
    ((alpha as u32) << 24) | (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::ErrorKind;
    use crate::options::FloatPolicy;

    fn decode(bytes: &[u8]) -> Result<RawNode> {
        decode_with(bytes, &ParseOptions::default())
    }

    fn decode_with(bytes: &[u8], options: &ParseOptions) -> Result<RawNode> {
        let mut cursor = ByteCursor::new(bytes);
        let node = RecordDecoder::new(&mut cursor, options).record()?;
        assert!(cursor.is_empty(), "trailing bytes after record");
        Ok(node)
    }

    fn int(v: i64) -> RawField {
        Field::Value(Node {
            class_id: 4,
            class_name: "small int",
            payload: Payload::Int(v),
            class_version: None,
            fields: None,
        })
    }

    #[test]
    fn scalars() {
        assert_eq!(decode(&[1]).unwrap().payload, Payload::Null);
        assert_eq!(decode(&[2]).unwrap().payload, Payload::Bool(true));
        assert_eq!(decode(&[3]).unwrap().payload, Payload::Bool(false));
        assert_eq!(
            decode(&[4, 0xff, 0xff, 0xff, 0xfe]).unwrap().payload,
            Payload::Int(-2)
        );
        assert_eq!(decode(&[5, 0x01, 0x00]).unwrap().payload, Payload::Int(256));
    }

    #[test]
    fn large_ints() {
        // 0x0201 = 513, little-endian bytes.
        assert_eq!(
            decode(&[6, 0, 2, 0x01, 0x02]).unwrap().payload,
            Payload::Int(513)
        );
        assert_eq!(
            decode(&[7, 0, 2, 0x01, 0x02]).unwrap().payload,
            Payload::Int(-513)
        );

        let mut huge = vec![6, 0, 9];
        huge.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 1]);
        match decode(&huge).unwrap().payload {
            Payload::LargeInt(v) => assert_eq!(v.to_f64(), 2f64.powi(64)),
            other => panic!("expected large int, got {other:?}"),
        }
    }

    #[test]
    fn doubles_follow_policy() {
        let mut bytes = vec![8];
        bytes.extend_from_slice(&1.5f64.to_be_bytes());
        assert_eq!(decode(&bytes).unwrap().payload, Payload::Float(1.5));

        let nudge = ParseOptions::default().with_float_policy(FloatPolicy::Nudge);
        assert_eq!(
            decode_with(&bytes, &nudge).unwrap().payload,
            Payload::Float(1.5 + FloatPolicy::EPSILON)
        );
    }

    #[test]
    fn strings_and_bytes() {
        let node = decode(&[9, 0, 0, 0, 5, b'S', b't', b'a', b'g', b'e']).unwrap();
        assert_eq!(node.as_str(), Some("Stage"));
        assert_eq!(node.class_name, "string/symbol");

        let node = decode(&[14, 0, 0, 0, 2, 0xc3, 0xa4]).unwrap();
        assert_eq!(node.as_str(), Some("ä"));

        let node = decode(&[11, 0, 0, 0, 3, 1, 2, 3]).unwrap();
        assert_eq!(node.payload, Payload::Bytes(vec![1, 2, 3]));

        // Sound buffers count 16-bit samples.
        let node = decode(&[12, 0, 0, 0, 2, 1, 2, 3, 4]).unwrap();
        assert_eq!(node.payload, Payload::Bytes(vec![1, 2, 3, 4]));

        let node = decode(&[13, 0, 0, 0, 1, 0xde, 0xad, 0xbe, 0xef]).unwrap();
        assert_eq!(node.payload, Payload::Bitmap(vec![0xdead_beef]));
    }

    #[test]
    fn colors() {
        // r = 0x3ff, g = 0x200, b = 0x004 (10-bit channels).
        let word: u32 = (0x3ff << 20) | (0x200 << 10) | 0x004;
        let mut bytes = vec![30];
        bytes.extend_from_slice(&word.to_be_bytes());
        assert_eq!(decode(&bytes).unwrap().payload, Payload::Color(0xFFFF_8001));

        let mut bytes = vec![31];
        bytes.extend_from_slice(&word.to_be_bytes());
        bytes.push(0x40);
        assert_eq!(decode(&bytes).unwrap().payload, Payload::Color(0x40FF_8001));
    }

    #[test]
    fn collections_hold_fields() {
        // Array of [int 7, ref 3].
        let node = decode(&[20, 0, 0, 0, 2, 4, 0, 0, 0, 7, 99, 0, 0, 3]).unwrap();
        assert_eq!(
            node.payload,
            Payload::List(vec![int(7), Field::Ref(RefSlot { index: 3 })])
        );

        // Dictionary with one pair reads two fields.
        let node = decode(&[24, 0, 0, 0, 1, 4, 0, 0, 0, 1, 4, 0, 0, 0, 2]).unwrap();
        assert_eq!(node.payload, Payload::Dictionary(vec![int(1), int(2)]));

        let node = decode(&[32, 4, 0, 0, 0, 1, 4, 0, 0, 0, 2]).unwrap();
        assert_eq!(node.class_name, "point");
        assert_eq!(node.elements().map(<[_]>::len), Some(2));
    }

    #[test]
    fn every_collection_class() {
        let cases: [(&[u8], &str, Payload<RefSlot>); 5] = [
            (
                &[21, 0, 0, 0, 1, 4, 0, 0, 0, 1],
                "array/collection",
                Payload::List(vec![int(1)]),
            ),
            (
                &[22, 0, 0, 0, 1, 4, 0, 0, 0, 2],
                "array/collection",
                Payload::List(vec![int(2)]),
            ),
            (
                &[23, 0, 0, 0, 1, 4, 0, 0, 0, 3],
                "array/collection",
                Payload::List(vec![int(3)]),
            ),
            (
                &[25, 0, 0, 0, 1, 4, 0, 0, 0, 4, 99, 0, 0, 1],
                "dictionary",
                Payload::Dictionary(vec![int(4), Field::Ref(RefSlot { index: 1 })]),
            ),
            (
                &[33, 4, 0, 0, 0, 0, 4, 0, 0, 0, 0, 4, 0, 0, 0, 5, 4, 0, 0, 0, 6],
                "rectangle",
                Payload::List(vec![int(0), int(0), int(5), int(6)]),
            ),
        ];
        for (bytes, label, payload) in cases {
            let node = decode(bytes).unwrap();
            assert_eq!(node.class_id, bytes[0]);
            assert_eq!(node.class_name, label);
            assert_eq!(node.payload, payload);
        }
    }

    /// `levels` one-element arrays wrapped around a null.
    fn nested(levels: usize) -> Vec<u8> {
        let mut bytes = [20, 0, 0, 0, 1].repeat(levels);
        bytes.push(1);
        bytes
    }

    #[test]
    fn nesting_is_bounded() {
        let node = decode(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(node.elements().map(<[_]>::len), Some(1));

        let err = decode(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert!(matches!(
            err,
            Error::NestingTooDeep { offset } if offset == 5 * (MAX_DEPTH + 1)
        ));
        assert_eq!(err.kind(), ErrorKind::Format);

        // Far deeper input fails the same way instead of exhausting the stack.
        let err = decode(&nested(200_000)).unwrap_err();
        assert!(matches!(err, Error::NestingTooDeep { .. }));
    }

    #[test]
    fn images_keep_references() {
        let mut bytes = vec![35];
        for v in [4u8, 4, 8, 0] {
            bytes.extend_from_slice(&[5, 0, v]);
        }
        bytes.extend_from_slice(&[99, 0, 0, 2, 99, 0, 0, 3]);
        let node = decode(&bytes).unwrap();
        let Payload::Image(image) = node.payload else {
            panic!("expected image");
        };
        assert_eq!(image.pixels, Field::Ref(RefSlot { index: 2 }));
        assert_eq!(image.color_map, Some(Field::Ref(RefSlot { index: 3 })));

        bytes[0] = 34;
        bytes.truncate(bytes.len() - 4);
        let node = decode(&bytes).unwrap();
        let Payload::Image(image) = node.payload else {
            panic!("expected image");
        };
        assert_eq!(image.color_map, None);
    }

    #[test]
    fn user_objects() {
        // Sprite, version 3, two fields: ref 2 and null.
        let node = decode(&[124, 3, 2, 99, 0, 0, 2, 1]).unwrap();
        assert_eq!(node.class_version, Some(3));
        assert_eq!(node.payload, Payload::Object);
        assert_eq!(node.fields().len(), 2);
        assert_eq!(node.fields()[0], Field::Ref(RefSlot { index: 2 }));

        // Ordinary morphs carry a null payload.
        let node = decode(&[110, 1, 0]).unwrap();
        assert_eq!(node.payload, Payload::Null);
        assert!(node.is_user_object());
    }

    #[test]
    fn unknown_classes() {
        let err = decode(&[17]).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownClass {
                class_id: 17,
                offset: 0
            }
        ));

        // User objects cannot appear inline inside a field stream.
        let err = decode(&[20, 0, 0, 0, 1, 124, 1, 0]).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownClass {
                class_id: 124,
                offset: 5
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn truncated_records() {
        let err = decode(&[9, 0, 0, 0, 10, b'a']).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);

        let err = decode(&[20, 0x10, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { .. }));

        let err = decode(&[6, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { declared: -1, .. }));
    }
}
