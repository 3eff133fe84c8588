//! Error types.
//!
//! Two classes with different lifetimes:
//!
//! - [`ConfigError`]: raised while registering validators/constants or compiling a
//!   record type. It means the declarations themselves are wrong and is not retried.
//! - [`ValidationError`]: raised while validating a concrete value. It is an ordinary
//!   outcome carrying a reason and, once tagged, the failing field's name.
//!
//! [`ValidateError`] is what [`Registry::validate`](crate::Registry::validate) returns:
//! either the record failed validation, or its type was never registered.

use crate::args::SyntaxError;
use crate::rules::RuleTextError;
use crate::value::{ConversionError, FieldType};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {kind} name {name:?}: must match [A-Za-z][A-Za-z0-9_]*")]
    InvalidName { kind: &'static str, name: String },
    #[error("unknown validator: {0}")]
    UnknownValidator(String),
    #[error("unknown constant: {0}")]
    UnknownConstant(String),
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
    #[error("{0}")]
    RuleText(#[from] RuleTextError),
    #[error("validator {validator} requires {expected}")]
    MissingArgument {
        validator: String,
        expected: &'static str,
    },
    #[error("validator {validator} cannot be applied to a field of type {found}")]
    InvalidFieldType { validator: String, found: FieldType },
    #[error("invalid regex pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("record type {0} not registered")]
    RecordNotRegistered(&'static str),
    /// Raised by user-supplied factories.
    #[error("validator {validator}: {message}")]
    Factory { validator: String, message: String },
    #[error("{record}.{field}: {source}")]
    Field {
        record: &'static str,
        field: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Innermost error, looking through [`ConfigError::Field`] wrappers.
    pub fn root(&self) -> &ConfigError {
        match self {
            ConfigError::Field { source, .. } => source.root(),
            other => other,
        }
    }
}

/// What kind of check produced a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Bound, set membership, length, pattern or emptiness violation.
    Constraint,
    /// The value is not of the kind the validator expects (e.g. an integer reaching `regex`).
    TypeMismatch,
    /// A record validator received something other than an instance of its record type.
    InvalidRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validate fail for field {}: {reason}", .field.as_deref().unwrap_or("<unnamed>"))]
pub struct ValidationError {
    pub kind: FailureKind,
    pub reason: String,
    pub field: Option<String>,
}

impl ValidationError {
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        ValidationError {
            kind,
            reason: reason.into(),
            field: None,
        }
    }

    pub fn constraint(reason: impl Into<String>) -> Self {
        Self::new(FailureKind::Constraint, reason)
    }

    pub fn type_mismatch(reason: impl Into<String>) -> Self {
        Self::new(FailureKind::TypeMismatch, reason)
    }

    pub fn invalid_record(reason: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidRecord, reason)
    }

    /// Sets (or overwrites) the field name; the reason is untouched.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl From<ConversionError> for ValidationError {
    fn from(e: ConversionError) -> Self {
        ValidationError::type_mismatch(format!("not an integer: {}", e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidateError {
    #[error("record type {0} not registered")]
    NotRegistered(&'static str),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl ValidateError {
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ValidateError::Invalid(e) => Some(e),
            ValidateError::NotRegistered(_) => None,
        }
    }
}
