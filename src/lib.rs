//! # fieldrules: declarative field validation rules
//!
//! Annotate record fields with compact rule text such as `max(100)`, `irange(1, 2, 3)` or
//! `regex('[a-z]+')`. Each record type is compiled once into a validator that runs the
//! rules on demand, including nested records.
//!
//! ## Rule text
//!
//! - **Invocations**: `name(args)`, several separated by commas, all of which must pass
//!   (checked left to right, first failure wins). Names match `[A-Za-z][A-Za-z0-9_]*`.
//! - **Arguments**: comma/space separated decimal integers (`42`), single-quoted strings with
//!   `\` escapes (`'it\'s'`), and uppercase constant names (`MAX_LEN`) registered up front.
//!
//! ## Built-in validators
//!
//! `max`, `min`, `irange`, `srange`, `not_empty`, `len`, `regex`, `strct`
//! (see [`builtin`]). Custom ones are registered with [`Registry::register_validator`].
//!
//! ## Example
//!
//! ```
//! use fieldrules::{record, Registry};
//!
//! record! {
//!     struct Inner {
//!         i: i64 => "max(MAX_INT)",
//!         s: String => "regex('^[a-zA-Z]+$')",
//!     }
//! }
//!
//! record! {
//!     struct Outer {
//!         j: i64,
//!         inner: Inner => "strct()",
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry.register_constant_int("MAX_INT", 100).unwrap();
//! registry.register_record::<Inner>().unwrap();
//! registry.register_record::<Outer>().unwrap();
//!
//! let ok = Outer { j: 99, inner: Inner { i: 99, s: "abc".into() } };
//! assert!(registry.validate(&ok).is_ok());
//!
//! let bad = Outer { j: 99, inner: Inner { i: 1000, s: "abc".into() } };
//! let err = registry.validate(&bad).unwrap_err();
//! assert_eq!(err.as_validation().unwrap().field.as_deref(), Some("inner"));
//! ```
//!
//! ## Registries
//!
//! A [`Registry`] holds factories, constants and compiled record validators. Use an owned
//! instance (tests, libraries) or the process-wide [`Registry::global`] through the free
//! functions [`register_validator`], [`register_constant_int`], [`register_constant_str`],
//! [`register_record`] and [`validate`]. Register constants and validators before the
//! record types that use them.
//!
//! ## Logging
//!
//! Registration and compilation emit [`tracing`] events (`debug`, `warn` on overwrites and
//! ambiguous constants, `trace` per rule). Validation failures are returned, never logged.

pub mod args;
pub mod builder;
pub mod builtin;
pub mod check;
pub mod error;
pub mod record;
pub mod registry;
pub mod rules;
pub mod validator;
pub mod value;

pub use args::{
    parse_arguments, parse_arguments_with_symbol_offsets, Arguments, SyntaxError, SyntaxErrorKind,
};
pub use builder::RecordValidator;
pub use error::{ConfigError, FailureKind, ValidateError, ValidationError};
pub use record::{FieldDescriptor, FieldKind, Record, RecordDescriptor, RecordType};
pub use registry::{
    register_constant_int, register_constant_str, register_record, register_validator, validate,
    Constant, ConstantTable, Factory, Registry, ValidatorArgs,
};
pub use rules::{parse_rules, Invocation, RuleTextError};
pub use validator::{compose, Validator};
pub use value::{ConversionError, FieldType, Value};

/// Annotation key that introspection layers conventionally read rule text from.
pub const DEFAULT_TAG_NAME: &str = "xvldt";
