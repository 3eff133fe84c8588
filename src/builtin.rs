//! Built-in validator factories.
//!
//! | Name | Arguments | Checks |
//! |------|-----------|--------|
//! | `max` | integer | integer-like value `<=` bound |
//! | `min` | integer | integer-like value `>=` bound |
//! | `irange` | integers | integer-like value is one of them |
//! | `srange` | strings | string value is one of them |
//! | `not_empty` | | string is not empty after trimming whitespace |
//! | `len` | integer | string field, byte length equals it |
//! | `regex` | string | string field, pattern matches (compiled once) |
//! | `strct` | | record field, delegates to the registered record validator |
//!
//! "Integer-like" means anything [`Value::to_u64`] accepts.

use crate::error::{ConfigError, ValidationError};
use crate::registry::{Registry, ValidatorArgs};
use crate::validator::Validator;
use crate::value::Value;
use ::regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

pub const MAX: &str = "max";
pub const MIN: &str = "min";
pub const INT_RANGE: &str = "irange";
pub const STR_RANGE: &str = "srange";
pub const NOT_EMPTY: &str = "not_empty";
pub const LEN: &str = "len";
pub const REGEX: &str = "regex";
pub const RECORD: &str = "strct";

pub(crate) fn install(registry: &Registry) {
    registry.insert_factory(MAX, Arc::new(max));
    registry.insert_factory(MIN, Arc::new(min));
    registry.insert_factory(INT_RANGE, Arc::new(int_range));
    registry.insert_factory(STR_RANGE, Arc::new(str_range));
    registry.insert_factory(NOT_EMPTY, Arc::new(not_empty));
    registry.insert_factory(LEN, Arc::new(len));
    registry.insert_factory(REGEX, Arc::new(regex));
    registry.insert_factory(RECORD, Arc::new(record));
}

fn expect_str<'v>(value: &Value<'v>) -> Result<&'v str, ValidationError> {
    value
        .as_str()
        .ok_or_else(|| ValidationError::type_mismatch(format!("not a string: {}", value.kind())))
}

pub fn max(args: &ValidatorArgs<'_>) -> Result<Validator, ConfigError> {
    let bound = args.first_integer()?;
    Ok(Validator::new(move |value| {
        if value.to_u64()? > bound {
            return Err(ValidationError::constraint(format!(
                "out of range: greater than {}",
                bound
            )));
        }
        Ok(())
    }))
}

pub fn min(args: &ValidatorArgs<'_>) -> Result<Validator, ConfigError> {
    let bound = args.first_integer()?;
    Ok(Validator::new(move |value| {
        if value.to_u64()? < bound {
            return Err(ValidationError::constraint(format!(
                "out of range: less than {}",
                bound
            )));
        }
        Ok(())
    }))
}

pub fn int_range(args: &ValidatorArgs<'_>) -> Result<Validator, ConfigError> {
    let allowed: HashSet<u64> = args.integers.iter().copied().collect();
    Ok(Validator::new(move |value| {
        let i = value.to_u64()?;
        if !allowed.contains(&i) {
            return Err(ValidationError::constraint(format!("invalid value: {}", i)));
        }
        Ok(())
    }))
}

pub fn str_range(args: &ValidatorArgs<'_>) -> Result<Validator, ConfigError> {
    let allowed: HashSet<String> = args.strings.iter().cloned().collect();
    Ok(Validator::new(move |value| {
        let s = expect_str(value)?;
        if !allowed.contains(s) {
            return Err(ValidationError::constraint(format!("invalid value: {:?}", s)));
        }
        Ok(())
    }))
}

pub fn not_empty(_args: &ValidatorArgs<'_>) -> Result<Validator, ConfigError> {
    Ok(Validator::new(|value| {
        if expect_str(value)?.trim().is_empty() {
            return Err(ValidationError::constraint("empty string"));
        }
        Ok(())
    }))
}

pub fn len(args: &ValidatorArgs<'_>) -> Result<Validator, ConfigError> {
    args.require_str_field()?;
    let expected = args.first_integer()?;
    Ok(Validator::new(move |value| {
        let actual = expect_str(value)?.len() as u64;
        if actual != expected {
            return Err(ValidationError::constraint(format!(
                "invalid string length: {} (expected {})",
                actual, expected
            )));
        }
        Ok(())
    }))
}

pub fn regex(args: &ValidatorArgs<'_>) -> Result<Validator, ConfigError> {
    args.require_str_field()?;
    let pattern = args.first_string()?;
    let re = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(Validator::new(move |value| {
        if !re.is_match(expect_str(value)?) {
            return Err(ValidationError::constraint(format!(
                "string not match pattern {:?}",
                re.as_str()
            )));
        }
        Ok(())
    }))
}

pub fn record(args: &ValidatorArgs<'_>) -> Result<Validator, ConfigError> {
    let record_type = args
        .field_type
        .as_record()
        .ok_or_else(|| args.invalid_field_type())?;
    let nested = args
        .registry()
        .record_validator(record_type)
        .ok_or(ConfigError::RecordNotRegistered(record_type.name()))?;
    Ok(Validator::new(move |value| nested.validate_value(value)))
}
