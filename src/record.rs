//! Record descriptors: the per-field (name, type, rule text) view the builder compiles.
//!
//! The builder never inspects Rust types. It only needs a [`RecordDescriptor`] for the
//! type and, at validation time, the field values of an instance in descriptor order.
//! Both come from the [`Record`] trait, implemented by hand, by code generation, or by
//! the [`record!`](crate::record!) macro.

use crate::value::{FieldType, Value};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a record type. Equality and hashing use the `TypeId` only.
#[derive(Clone, Copy)]
pub struct RecordType {
    id: TypeId,
    name: &'static str,
}

impl RecordType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::named::<T>(std::any::type_name::<T>())
    }

    /// Same identity as [`RecordType::of`], with a display name of the caller's choice.
    pub fn named<T: ?Sized + 'static>(name: &'static str) -> Self {
        RecordType {
            id: TypeId::of::<T>(),
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordType({})", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: FieldType,
    /// Rule text; `None` means the field is not validated.
    pub rules: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: FieldType, rules: Option<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            ty,
            rules,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    pub record_type: RecordType,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    pub fn new(record_type: RecordType, fields: Vec<FieldDescriptor>) -> Self {
        RecordDescriptor {
            record_type,
            fields,
        }
    }
}

/// A validatable record type.
pub trait Record {
    fn descriptor() -> RecordDescriptor
    where
        Self: Sized;

    /// Must agree with `descriptor().record_type`.
    fn record_type(&self) -> RecordType;

    /// Current field values in descriptor order; `None` for an absent optional field.
    fn field_values(&self) -> Vec<Option<Value<'_>>>;
}

/// Maps a Rust field type to its declared [`FieldType`] and borrowed [`Value`].
pub trait FieldKind {
    fn field_type() -> FieldType;
    fn as_value(&self) -> Option<Value<'_>>;
}

macro_rules! scalar_field_kind {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldKind for $t {
                fn field_type() -> FieldType {
                    FieldType::$variant
                }
                fn as_value(&self) -> Option<Value<'_>> {
                    Some(Value::$variant(*self))
                }
            }
        )*
    };
}

scalar_field_kind! {
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    bool => Bool, f32 => Float, f64 => Double,
}

impl FieldKind for usize {
    fn field_type() -> FieldType {
        FieldType::U64
    }
    fn as_value(&self) -> Option<Value<'_>> {
        Some(Value::U64(*self as u64))
    }
}

impl FieldKind for isize {
    fn field_type() -> FieldType {
        FieldType::I64
    }
    fn as_value(&self) -> Option<Value<'_>> {
        Some(Value::I64(*self as i64))
    }
}

impl FieldKind for String {
    fn field_type() -> FieldType {
        FieldType::Str
    }
    fn as_value(&self) -> Option<Value<'_>> {
        Some(Value::Str(self))
    }
}

impl FieldKind for &'static str {
    fn field_type() -> FieldType {
        FieldType::Str
    }
    fn as_value(&self) -> Option<Value<'_>> {
        Some(Value::Str(*self))
    }
}

impl<T: FieldKind> FieldKind for Option<T> {
    fn field_type() -> FieldType {
        FieldType::Optional(Box::new(T::field_type()))
    }
    fn as_value(&self) -> Option<Value<'_>> {
        self.as_ref().and_then(T::as_value)
    }
}

impl<T: FieldKind> FieldKind for Box<T> {
    fn field_type() -> FieldType {
        T::field_type()
    }
    fn as_value(&self) -> Option<Value<'_>> {
        (**self).as_value()
    }
}

/// Declare a struct together with its [`Record`] and [`FieldKind`] implementations.
///
/// Rule text follows the field type after `=>`; fields without it are not validated.
///
/// ```
/// fieldrules::record! {
///     #[derive(Debug, Default)]
///     pub struct Account {
///         pub id: u64 => "min(1)",
///         pub name: String => "not_empty(), regex('^[a-z_]+$')",
///         pub note: Option<String>,
///     }
/// }
///
/// let registry = fieldrules::Registry::new();
/// registry.register_record::<Account>().unwrap();
/// assert!(registry.validate(&Account::default()).is_err());
/// ```
#[macro_export]
macro_rules! record {
    (@rules) => {
        ::core::option::Option::None
    };
    (@rules $rules:literal) => {
        ::core::option::Option::Some(::std::string::String::from($rules))
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $fvis:vis $field:ident : $ty:ty $(=> $rules:literal)? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $fvis $field: $ty, )*
        }

        impl $crate::Record for $name {
            fn descriptor() -> $crate::RecordDescriptor {
                $crate::RecordDescriptor::new(
                    $crate::RecordType::named::<$name>(::core::stringify!($name)),
                    ::std::vec![
                        $(
                            $crate::FieldDescriptor::new(
                                ::core::stringify!($field),
                                <$ty as $crate::FieldKind>::field_type(),
                                $crate::record!(@rules $($rules)?),
                            ),
                        )*
                    ],
                )
            }

            fn record_type(&self) -> $crate::RecordType {
                $crate::RecordType::named::<$name>(::core::stringify!($name))
            }

            fn field_values(&self) -> ::std::vec::Vec<::core::option::Option<$crate::Value<'_>>> {
                ::std::vec![ $( $crate::FieldKind::as_value(&self.$field), )* ]
            }
        }

        impl $crate::FieldKind for $name {
            fn field_type() -> $crate::FieldType {
                $crate::FieldType::Record($crate::RecordType::named::<$name>(::core::stringify!($name)))
            }

            fn as_value(&self) -> ::core::option::Option<$crate::Value<'_>> {
                ::core::option::Option::Some($crate::Value::Record(self))
            }
        }
    };
}
