//! Field-level reflection data.

/// Kind of a component field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PropertyType {
    /// `bool`. Not `Pod`, so only appears in hand-built descriptors.
    Bool = 0,
    /// `i32`.
    Int = 1,
    /// `u32`.
    UInt = 2,
    /// `i16`.
    Short = 3,
    /// `u16`.
    UShort = 4,
    /// `i8`.
    Char = 5,
    /// `u8`.
    UChar = 6,
    /// `f32`.
    Float = 7,
    /// `f64`.
    Double = 8,
    /// `[f32; 2]`.
    Vector2 = 9,
    /// `[f32; 3]`.
    Vector3 = 10,
    /// `[f32; 4]`.
    Vector4 = 11,
    /// Owned text. Never part of a fixed-size record.
    String = 12,
    /// Anything else.
    Unknown = 13,
}

impl PropertyType {
    /// Byte size of a field of this kind, or 0 when it has no fixed layout.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Bool | Self::Char | Self::UChar => 1,
            Self::Short | Self::UShort => 2,
            Self::Int | Self::UInt | Self::Float => 4,
            Self::Double | Self::Vector2 => 8,
            Self::Vector3 => 12,
            Self::Vector4 => 16,
            Self::String | Self::Unknown => 0,
        }
    }
}

/// One named field of a component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    name: String,
    kind: PropertyType,
}

impl Property {
    /// Creates a property.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: PropertyType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field kind.
    #[must_use]
    pub fn kind(&self) -> PropertyType {
        self.kind
    }
}

/// Maps a Rust field type to its [`PropertyType`].
pub trait PropertyValue {
    /// The kind reported for fields of this type.
    const KIND: PropertyType;
}

macro_rules! impl_property_value {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                const KIND: PropertyType = PropertyType::$kind;
            }
        )*
    };
}

impl_property_value! {
    i32 => Int,
    u32 => UInt,
    i16 => Short,
    u16 => UShort,
    i8 => Char,
    u8 => UChar,
    f32 => Float,
    f64 => Double,
    [f32; 2] => Vector2,
    [f32; 3] => Vector3,
    [f32; 4] => Vector4,
}
