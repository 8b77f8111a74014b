//! Class id classification.
//!
//! Every record starts with a one-byte class id. All decisions that depend
//! on it (fixed-format layout, user-object handling, the reference marker,
//! forced-empty payloads, collection membership) go through [`classify`]
//! and the helpers in this module.
//!
//! ## Ranges
//! ```text
//! 1..=98   fixed-format records (layout determined by the id alone)
//! 99       object reference marker (inside a field stream)
//! 100..    user-object records (version byte, field count, fields)
//! ```

/// Class id that introduces a 24-bit object reference inside a field stream.
pub const REF_MARKER: u8 = 99;

/// Sprite user object.
pub const SPRITE: u8 = 124;
/// Stage user object.
pub const STAGE: u8 = 125;
/// Variable watcher user object.
pub const WATCHER: u8 = 155;
/// Costume (image media) user object.
pub const IMAGE_MEDIA: u8 = 162;
/// Sound media user object.
pub const SOUND_MEDIA: u8 = 164;
/// List watcher user object.
pub const LIST_WATCHER: u8 = 175;

/// Result of classifying a class id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Fixed(FixedKind),
    Reference,
    UserObject,
}

/// Layout of a fixed-format record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedKind {
    Null,
    True,
    False,
    SmallInt,
    SmallInt16,
    LargePositiveInt,
    LargeNegativeInt,
    Float,
    String,
    Symbol,
    ByteArray,
    SoundBuffer,
    Bitmap,
    Utf8,
    Array,
    OrderedCollection,
    Set,
    IdentitySet,
    Dictionary,
    IdentityDictionary,
    Color,
    TranslucentColor,
    Point,
    Rectangle,
    Form,
    ColorForm,
}

impl FixedKind {
    /// Human-readable label for records of this kind.
    pub fn label(self) -> &'static str {
        match self {
            FixedKind::Null => "null/undefined",
            FixedKind::True | FixedKind::False => "boolean",
            FixedKind::SmallInt => "small int",
            FixedKind::SmallInt16 => "small int 16",
            FixedKind::LargePositiveInt | FixedKind::LargeNegativeInt => "large int",
            FixedKind::Float => "double/float",
            FixedKind::String | FixedKind::Symbol => "string/symbol",
            FixedKind::ByteArray => "byte array",
            FixedKind::SoundBuffer => "sound buffer",
            FixedKind::Bitmap => "bitmap",
            FixedKind::Utf8 => "utf-8 string",
            FixedKind::Array
            | FixedKind::OrderedCollection
            | FixedKind::Set
            | FixedKind::IdentitySet => "array/collection",
            FixedKind::Dictionary | FixedKind::IdentityDictionary => "dictionary",
            FixedKind::Color | FixedKind::TranslucentColor => "color",
            FixedKind::Point => "point",
            FixedKind::Rectangle => "rectangle",
            FixedKind::Form | FixedKind::ColorForm => "image",
        }
    }
}

/// Classify a class id. Returns [`None`] for ids below the reference marker
/// that have no fixed-format layout.
pub fn classify(class_id: u8) -> Option<ClassKind> {
    let kind = match class_id {
        1 => FixedKind::Null,
        2 => FixedKind::True,
        3 => FixedKind::False,
        4 => FixedKind::SmallInt,
        5 => FixedKind::SmallInt16,
        6 => FixedKind::LargePositiveInt,
        7 => FixedKind::LargeNegativeInt,
        8 => FixedKind::Float,
        9 => FixedKind::String,
        10 => FixedKind::Symbol,
        11 => FixedKind::ByteArray,
        12 => FixedKind::SoundBuffer,
        13 => FixedKind::Bitmap,
        14 => FixedKind::Utf8,
        20 => FixedKind::Array,
        21 => FixedKind::OrderedCollection,
        22 => FixedKind::Set,
        23 => FixedKind::IdentitySet,
        24 => FixedKind::Dictionary,
        25 => FixedKind::IdentityDictionary,
        30 => FixedKind::Color,
        31 => FixedKind::TranslucentColor,
        32 => FixedKind::Point,
        33 => FixedKind::Rectangle,
        34 => FixedKind::Form,
        35 => FixedKind::ColorForm,
        REF_MARKER => return Some(ClassKind::Reference),
        id if id > REF_MARKER => return Some(ClassKind::UserObject),
        _ => return None,
    };
    Some(ClassKind::Fixed(kind))
}

/// Whether a user object of this class carries an empty-object payload
/// instead of null. Its content arrives through its fields.
pub fn has_object_payload(class_id: u8) -> bool {
    matches!(
        class_id,
        SPRITE | STAGE | WATCHER | IMAGE_MEDIA | SOUND_MEDIA | LIST_WATCHER
    )
}

/// Label for a user-object class.
pub fn user_object_label(class_id: u8) -> &'static str {
    match class_id {
        SPRITE => "sprite",
        STAGE => "stage",
        WATCHER => "watcher",
        IMAGE_MEDIA => "image media",
        SOUND_MEDIA => "sound media",
        LIST_WATCHER => "list watcher",
        _ => "user object",
    }
}
