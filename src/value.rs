//! Field values as validators see them, and declared field types.

use crate::record::{Record, RecordType};
use std::fmt;

/// Declared type of a record field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    Bool,
    Float,
    Double,
    Str,
    Record(RecordType),
    /// A field that may be absent (`Option<T>`); validators see the inner type.
    Optional(Box<FieldType>),
}

impl FieldType {
    /// Strip one `Optional` layer.
    pub fn indirect(&self) -> &FieldType {
        match self {
            FieldType::Optional(inner) => inner,
            other => other,
        }
    }

    pub fn is_str(&self) -> bool {
        matches!(self, FieldType::Str)
    }

    pub fn as_record(&self) -> Option<&RecordType> {
        match self {
            FieldType::Record(rt) => Some(rt),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::U8 => f.write_str("u8"),
            FieldType::U16 => f.write_str("u16"),
            FieldType::U32 => f.write_str("u32"),
            FieldType::U64 => f.write_str("u64"),
            FieldType::I8 => f.write_str("i8"),
            FieldType::I16 => f.write_str("i16"),
            FieldType::I32 => f.write_str("i32"),
            FieldType::I64 => f.write_str("i64"),
            FieldType::Bool => f.write_str("bool"),
            FieldType::Float => f.write_str("float"),
            FieldType::Double => f.write_str("double"),
            FieldType::Str => f.write_str("str"),
            FieldType::Record(rt) => f.write_str(rt.name()),
            FieldType::Optional(inner) => write!(f, "optional<{}>", inner),
        }
    }
}

/// A borrowed field value.
#[derive(Clone, Copy)]
pub enum Value<'a> {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Bool(bool),
    Float(f32),
    Double(f64),
    Str(&'a str),
    Record(&'a dyn Record),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("{0} value cannot be converted to u64")]
    NotInteger(&'static str),
    #[error("{0:?} is not a base-10 unsigned integer")]
    InvalidDigits(String),
}

impl<'a> Value<'a> {
    /// Short name of the value's kind, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::Bool(_) => "bool",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Str(_) => "str",
            Value::Record(_) => "record",
        }
    }

    /// Integer normalization used by the numeric validators.
    ///
    /// Any integer width converts (negative values wrap as a two's-complement cast);
    /// a string converts if it is a non-empty run of ASCII digits fitting in `u64`.
    pub fn to_u64(&self) -> Result<u64, ConversionError> {
        match *self {
            Value::U8(x) => Ok(u64::from(x)),
            Value::U16(x) => Ok(u64::from(x)),
            Value::U32(x) => Ok(u64::from(x)),
            Value::U64(x) => Ok(x),
            Value::I8(x) => Ok(x as u64),
            Value::I16(x) => Ok(x as u64),
            Value::I32(x) => Ok(x as u64),
            Value::I64(x) => Ok(x as u64),
            Value::Str(s) => {
                if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ConversionError::InvalidDigits(s.to_string()));
                }
                s.parse()
                    .map_err(|_| ConversionError::InvalidDigits(s.to_string()))
            }
            other => Err(ConversionError::NotInteger(other.kind())),
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&'a dyn Record> {
        match *self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::U8(x) => write!(f, "U8({})", x),
            Value::U16(x) => write!(f, "U16({})", x),
            Value::U32(x) => write!(f, "U32({})", x),
            Value::U64(x) => write!(f, "U64({})", x),
            Value::I8(x) => write!(f, "I8({})", x),
            Value::I16(x) => write!(f, "I16({})", x),
            Value::I32(x) => write!(f, "I32({})", x),
            Value::I64(x) => write!(f, "I64({})", x),
            Value::Bool(x) => write!(f, "Bool({})", x),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Double(x) => write!(f, "Double({})", x),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Record(r) => write!(f, "Record({})", r.record_type().name()),
        }
    }
}

macro_rules! value_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value<'_> {
                fn from(x: $t) -> Self {
                    Value::$variant(x)
                }
            }
        )*
    };
}

value_from! {
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    bool => Bool, f32 => Float, f64 => Double,
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Str(s)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_of_every_width_convert() {
        assert_eq!(Value::U8(7).to_u64(), Ok(7));
        assert_eq!(Value::U16(700).to_u64(), Ok(700));
        assert_eq!(Value::U32(70_000).to_u64(), Ok(70_000));
        assert_eq!(Value::U64(u64::MAX).to_u64(), Ok(u64::MAX));
        assert_eq!(Value::I32(42).to_u64(), Ok(42));
        assert_eq!(Value::I64(-1).to_u64(), Ok(u64::MAX));
        assert_eq!(Value::I8(-2).to_u64(), Ok(u64::MAX - 1));
    }

    #[test]
    fn numeric_strings_convert() {
        assert_eq!(Value::Str("0").to_u64(), Ok(0));
        assert_eq!(Value::Str("18446744073709551615").to_u64(), Ok(u64::MAX));
    }

    #[test]
    fn non_numeric_inputs_rejected() {
        for s in ["", "+5", "-5", " 5", "5a", "18446744073709551616"] {
            assert!(
                matches!(Value::Str(s).to_u64(), Err(ConversionError::InvalidDigits(_))),
                "{:?}",
                s
            );
        }
        assert_eq!(
            Value::Bool(true).to_u64(),
            Err(ConversionError::NotInteger("bool"))
        );
        assert_eq!(
            Value::Double(1.0).to_u64(),
            Err(ConversionError::NotInteger("double"))
        );
    }

    #[test]
    fn indirect_strips_one_optional_layer() {
        let t = FieldType::Optional(Box::new(FieldType::Str));
        assert_eq!(t.indirect(), &FieldType::Str);
        assert_eq!(FieldType::U8.indirect(), &FieldType::U8);
        assert_eq!(t.to_string(), "optional<str>");
    }
}
