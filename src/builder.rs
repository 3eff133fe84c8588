//! Compile a [`RecordDescriptor`] into a [`RecordValidator`].
//!
//! For each field with rule text: split it into invocations, look each name up in the
//! registry, lex its arguments, substitute constants, call the factory with the field's
//! declared type, then AND the results in order and tag them with the field name.
//! Any failure here is a [`ConfigError`] wrapped with the record and field names.

use crate::args::parse_arguments;
use crate::error::{ConfigError, ValidationError};
use crate::record::{FieldDescriptor, Record, RecordDescriptor, RecordType};
use crate::registry::{Registry, ValidatorArgs};
use crate::rules::parse_rules;
use crate::validator::{compose, Validator};
use crate::value::Value;
use tracing::{debug, trace};

/// Compiled validator for one record type.
#[derive(Debug)]
pub struct RecordValidator {
    record_type: RecordType,
    /// One slot per descriptor field; `None` for fields without rules.
    fields: Vec<Option<Validator>>,
}

impl RecordValidator {
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Number of fields that carry a validator.
    pub fn validated_fields(&self) -> usize {
        self.fields.iter().filter(|f| f.is_some()).count()
    }

    /// Validate fields in declaration order, stopping at the first failure.
    pub fn validate(&self, record: &dyn Record) -> Result<(), ValidationError> {
        let found = record.record_type();
        if found != self.record_type {
            return Err(ValidationError::invalid_record(format!(
                "expected {}, found {}",
                self.record_type.name(),
                found.name()
            )));
        }
        for (validator, value) in self.fields.iter().zip(record.field_values()) {
            let (Some(validator), Some(value)) = (validator, value) else {
                continue;
            };
            validator.validate(&value)?;
        }
        Ok(())
    }

    /// Validate a field value holding a record of this type.
    pub fn validate_value(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        match value.as_record() {
            Some(record) => self.validate(record),
            None => Err(ValidationError::invalid_record(format!(
                "{} value cannot be validated as {}",
                value.kind(),
                self.record_type.name()
            ))),
        }
    }
}

pub fn build(registry: &Registry, descriptor: &RecordDescriptor) -> Result<RecordValidator, ConfigError> {
    let record = descriptor.record_type.name();
    let mut fields = Vec::with_capacity(descriptor.fields.len());
    for field in &descriptor.fields {
        let validator = match &field.rules {
            Some(rules) => Some(build_field(registry, field, rules).map_err(|source| {
                ConfigError::Field {
                    record,
                    field: field.name.clone(),
                    source: Box::new(source),
                }
            })?),
            None => None,
        };
        fields.push(validator);
    }
    let compiled = RecordValidator {
        record_type: descriptor.record_type,
        fields,
    };
    debug!(
        record,
        fields = descriptor.fields.len(),
        validated = compiled.validated_fields(),
        "compiled record validator"
    );
    Ok(compiled)
}

/// Compile one field's rule text into a single validator tagged with the field name.
pub fn build_field(
    registry: &Registry,
    field: &FieldDescriptor,
    rules: &str,
) -> Result<Validator, ConfigError> {
    let field_type = field.ty.indirect();
    let mut chain = Vec::new();
    for invocation in parse_rules(rules)? {
        let factory = registry
            .lookup_validator(&invocation.name)
            .ok_or_else(|| ConfigError::UnknownValidator(invocation.name.clone()))?;
        let arguments = registry.resolve_constants(parse_arguments(&invocation.arguments)?)?;
        trace!(
            field = %field.name,
            validator = %invocation.name,
            integers = ?arguments.integers,
            strings = ?arguments.strings,
            "building validator"
        );
        let args = ValidatorArgs::new(&invocation.name, field_type.clone(), registry)
            .with_integers(arguments.integers)
            .with_strings(arguments.strings);
        chain.push(factory(&args)?);
    }
    Ok(compose(chain).with_field(field.name.clone()))
}
