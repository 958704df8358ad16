//! Typed value codec.
//!
//! Constants, static fields, instance fields and primitive array elements
//! are all encoded the same way: a one-byte basic-type tag (hprof_b_spec
//! "basic type" codes) chooses one of nine fixed-width representations.
//! Object references take the identifier width of the file, not a fixed 4.
//!
//! Decoding an unknown tag byte is fatal: the tag alone determines how many
//! bytes the value occupies, so there is no way to skip past one.

use core::fmt;
use std::io::Read;

use crate::bytestream::ByteReader;
use crate::id::IdSize;
use crate::{Error, Result};

/// The nine HPROF basic types with their wire tag bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Object = 2,
    Bool = 4,
    Char = 5,
    Float = 6,
    Double = 7,
    Byte = 8,
    Short = 9,
    Int = 10,
    Long = 11,
}

impl FieldType {
    /// Maps a wire tag byte to a basic type.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            2 => Ok(Self::Object),
            4 => Ok(Self::Bool),
            5 => Ok(Self::Char),
            6 => Ok(Self::Float),
            7 => Ok(Self::Double),
            8 => Ok(Self::Byte),
            9 => Ok(Self::Short),
            10 => Ok(Self::Int),
            11 => Ok(Self::Long),
            other => Err(Error::UnknownFieldType(other)),
        }
    }

    /// The wire tag byte for this type.
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Encoded width of one value of this type.
    ///
    /// Objekt-Referenzen folgen der Identifier-Breite der Datei.
    #[inline]
    pub fn size_in_bytes(self, id_size: IdSize) -> u64 {
        match self {
            Self::Object => id_size.in_bytes(),
            Self::Bool | Self::Byte => 1,
            Self::Char | Self::Short => 2,
            Self::Float | Self::Int => 4,
            Self::Double | Self::Long => 8,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Object => "Object",
            Self::Bool => "boolean",
            Self::Char => "char",
            Self::Float => "float",
            Self::Double => "double",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
        };
        f.write_str(name)
    }
}

/// One decoded value; the variant always matches the tag it was read under.
///
/// `Char` is a UTF-16 code unit, as in the source VM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Object(u64),
    Bool(bool),
    Char(u16),
    Float(f32),
    Double(f64),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
}

impl Value {
    /// Decodes one value of type `ty`, consuming exactly
    /// `ty.size_in_bytes(id_size)` bytes.
    pub fn decode<R: Read>(
        reader: &mut ByteReader<R>,
        ty: FieldType,
        id_size: IdSize,
    ) -> Result<Self> {
        Ok(match ty {
            FieldType::Object => Self::Object(id_size.read_id(reader)?),
            FieldType::Bool => Self::Bool(reader.read_u8()? != 0),
            FieldType::Char => Self::Char(reader.read_u16()?),
            FieldType::Float => Self::Float(reader.read_f32()?),
            FieldType::Double => Self::Double(reader.read_f64()?),
            FieldType::Byte => Self::Byte(reader.read_i8()?),
            FieldType::Short => Self::Short(reader.read_i16()?),
            FieldType::Int => Self::Int(reader.read_i32()?),
            FieldType::Long => Self::Long(reader.read_i64()?),
        })
    }

    /// The basic type this value was decoded under.
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Object(_) => FieldType::Object,
            Self::Bool(_) => FieldType::Bool,
            Self::Char(_) => FieldType::Char,
            Self::Float(_) => FieldType::Float,
            Self::Double(_) => FieldType::Double,
            Self::Byte(_) => FieldType::Byte,
            Self::Short(_) => FieldType::Short,
            Self::Int(_) => FieldType::Int,
            Self::Long(_) => FieldType::Long,
        }
    }

    /// Appends the exact wire encoding of this value.
    ///
    /// Inverse of [`decode`](Self::decode): decoding then re-encoding any
    /// value yields the identical byte sequence.
    pub fn encode_into(&self, out: &mut Vec<u8>, id_size: IdSize) {
        match *self {
            Self::Object(id) => match id_size {
                IdSize::U4 => out.extend_from_slice(&(id as u32).to_be_bytes()),
                IdSize::U8 => out.extend_from_slice(&id.to_be_bytes()),
            },
            Self::Bool(b) => out.push(u8::from(b)),
            Self::Char(c) => out.extend_from_slice(&c.to_be_bytes()),
            Self::Float(v) => out.extend_from_slice(&v.to_bits().to_be_bytes()),
            Self::Double(v) => out.extend_from_slice(&v.to_bits().to_be_bytes()),
            Self::Byte(v) => out.push(v as u8),
            Self::Short(v) => out.extend_from_slice(&v.to_be_bytes()),
            Self::Int(v) => out.extend_from_slice(&v.to_be_bytes()),
            Self::Long(v) => out.extend_from_slice(&v.to_be_bytes()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Object(id) => write!(f, "0x{id:x}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(c) => match char::from_u32(u32::from(c)) {
                Some(c) => write!(f, "{c}"),
                None => write!(f, "\\u{c:04x}"),
            },
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_one(bytes: &[u8], ty: FieldType, id_size: IdSize) -> Value {
        let mut r = ByteReader::new(bytes);
        let v = Value::decode(&mut r, ty, id_size).unwrap();
        assert_eq!(r.position(), ty.size_in_bytes(id_size), "width mismatch");
        v
    }

    #[test]
    fn from_tag_covers_all_nine() {
        for (tag, ty) in [
            (2u8, FieldType::Object),
            (4, FieldType::Bool),
            (5, FieldType::Char),
            (6, FieldType::Float),
            (7, FieldType::Double),
            (8, FieldType::Byte),
            (9, FieldType::Short),
            (10, FieldType::Int),
            (11, FieldType::Long),
        ] {
            assert_eq!(FieldType::from_tag(tag).unwrap(), ty);
            assert_eq!(ty.tag(), tag);
        }
    }

    #[test]
    fn from_tag_rejects_unknown() {
        for tag in [0u8, 1, 3, 12, 0xff] {
            assert_eq!(
                FieldType::from_tag(tag).unwrap_err(),
                Error::UnknownFieldType(tag)
            );
        }
    }

    #[test]
    fn object_width_follows_id_size() {
        assert_eq!(FieldType::Object.size_in_bytes(IdSize::U4), 4);
        assert_eq!(FieldType::Object.size_in_bytes(IdSize::U8), 8);
        // Alle anderen Breiten sind fix.
        assert_eq!(FieldType::Long.size_in_bytes(IdSize::U4), 8);
        assert_eq!(FieldType::Bool.size_in_bytes(IdSize::U8), 1);
    }

    #[test]
    fn decode_primitives() {
        assert_eq!(
            decode_one(&[0x00], FieldType::Bool, IdSize::U4),
            Value::Bool(false)
        );
        assert_eq!(
            decode_one(&[0x01], FieldType::Bool, IdSize::U4),
            Value::Bool(true)
        );
        assert_eq!(
            decode_one(&[0x00, 0x41], FieldType::Char, IdSize::U4),
            Value::Char(0x41)
        );
        assert_eq!(
            decode_one(&[0xff], FieldType::Byte, IdSize::U4),
            Value::Byte(-1)
        );
        assert_eq!(
            decode_one(&[0xff, 0x00], FieldType::Short, IdSize::U4),
            Value::Short(-256)
        );
        assert_eq!(
            decode_one(&[0x00, 0x00, 0x00, 0x2a], FieldType::Int, IdSize::U4),
            Value::Int(42)
        );
        assert_eq!(
            decode_one(
                &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe],
                FieldType::Long,
                IdSize::U4
            ),
            Value::Long(-2)
        );
    }

    #[test]
    fn decode_object_uses_id_width() {
        assert_eq!(
            decode_one(&[0xff, 0xff, 0xff, 0xff], FieldType::Object, IdSize::U4),
            Value::Object(4_294_967_295)
        );
        assert_eq!(
            decode_one(
                &[0, 0, 0, 0, 0xde, 0xad, 0xbe, 0xef],
                FieldType::Object,
                IdSize::U8
            ),
            Value::Object(0xdead_beef)
        );
    }

    /// Codec round-trip law: decode then encode reproduces the input bytes.
    #[test]
    fn encode_is_exact_inverse_of_decode() {
        let cases: &[(FieldType, &[u8])] = &[
            (FieldType::Object, &[0x00, 0x00, 0x01, 0x00]),
            (FieldType::Bool, &[0x01]),
            (FieldType::Char, &[0xd8, 0x00]),
            (FieldType::Float, &[0x3f, 0xc0, 0x00, 0x00]),
            (FieldType::Double, &[0x40, 0x09, 0x21, 0xfb, 0x54, 0x44, 0x2d, 0x18]),
            (FieldType::Byte, &[0x80]),
            (FieldType::Short, &[0x7f, 0xff]),
            (FieldType::Int, &[0x80, 0x00, 0x00, 0x00]),
            (FieldType::Long, &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]),
        ];
        for &(ty, bytes) in cases {
            let v = decode_one(bytes, ty, IdSize::U4);
            let mut out = Vec::new();
            v.encode_into(&mut out, IdSize::U4);
            assert_eq!(out.as_slice(), bytes, "{ty}");
        }
    }

    #[test]
    fn display_formats() {
        assert_eq!(Value::Object(0x1f).to_string(), "0x1f");
        assert_eq!(Value::Char(0x41).to_string(), "A");
        // Unpaarige Surrogate bleiben als Escape lesbar.
        assert_eq!(Value::Char(0xd800).to_string(), "\\ud800");
        assert_eq!(FieldType::Bool.to_string(), "boolean");
    }
}
