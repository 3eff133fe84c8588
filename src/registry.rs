//! Validator factories, constants and compiled record validators.
//!
//! ## Policies
//!
//! - Validators and constants: re-registering a name overwrites it (last writer wins,
//!   logged at `warn`).
//! - Constants: a symbol is looked up in the integer table first, then the string table.
//! - Record types: compiled at most once; registering a type again is a no-op.
//!
//! ## Thread safety
//!
//! Tables sit behind `parking_lot::RwLock`s, so registration may overlap with validation.
//! Record registrations are serialised by a separate mutex. Factories run without any
//! table lock held, except that a factory must not itself register a record type.

use crate::args::Arguments;
use crate::builder::{self, RecordValidator};
use crate::builtin;
use crate::error::{ConfigError, ValidateError};
use crate::record::{Record, RecordDescriptor, RecordType};
use crate::validator::Validator;
use crate::value::FieldType;
use parking_lot::{Mutex, RwLock};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

/// Builds a [`Validator`] from resolved arguments and the field's declared type.
pub type Factory = Arc<dyn Fn(&ValidatorArgs<'_>) -> Result<Validator, ConfigError> + Send + Sync>;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z][A-Za-z0-9_]*$").expect("name pattern compiles"));

/// Whether `name` is a valid validator or constant name.
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Input to a [`Factory`]: one invocation's resolved arguments.
pub struct ValidatorArgs<'a> {
    /// Name the factory was invoked under.
    pub name: &'a str,
    pub strings: Vec<String>,
    pub integers: Vec<u64>,
    /// Declared type of the field, with one `Optional` layer stripped.
    pub field_type: FieldType,
    registry: &'a Registry,
}

impl<'a> ValidatorArgs<'a> {
    pub fn new(name: &'a str, field_type: FieldType, registry: &'a Registry) -> Self {
        ValidatorArgs {
            name,
            strings: Vec::new(),
            integers: Vec::new(),
            field_type,
            registry,
        }
    }

    pub fn with_integers(mut self, integers: impl IntoIterator<Item = u64>) -> Self {
        self.integers.extend(integers);
        self
    }

    pub fn with_strings<S: Into<String>>(mut self, strings: impl IntoIterator<Item = S>) -> Self {
        self.strings.extend(strings.into_iter().map(Into::into));
        self
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn first_integer(&self) -> Result<u64, ConfigError> {
        self.integers
            .first()
            .copied()
            .ok_or_else(|| self.missing("one integer argument"))
    }

    pub fn first_string(&self) -> Result<&str, ConfigError> {
        self.strings
            .first()
            .map(String::as_str)
            .ok_or_else(|| self.missing("one string argument"))
    }

    /// Fail construction unless the declared field type is a string.
    pub fn require_str_field(&self) -> Result<(), ConfigError> {
        if self.field_type.is_str() {
            Ok(())
        } else {
            Err(self.invalid_field_type())
        }
    }

    pub fn invalid_field_type(&self) -> ConfigError {
        ConfigError::InvalidFieldType {
            validator: self.name.to_string(),
            found: self.field_type.clone(),
        }
    }

    fn missing(&self, expected: &'static str) -> ConfigError {
        ConfigError::MissingArgument {
            validator: self.name.to_string(),
            expected,
        }
    }
}

/// A resolved symbolic constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    Integer(u64),
    Str(String),
}

#[derive(Debug, Clone, Default)]
pub struct ConstantTable {
    integers: HashMap<String, u64>,
    strings: HashMap<String, String>,
}

impl ConstantTable {
    /// Integer constants take precedence over string constants of the same name.
    pub fn resolve(&self, name: &str) -> Option<Constant> {
        if let Some(&i) = self.integers.get(name) {
            return Some(Constant::Integer(i));
        }
        self.strings.get(name).cloned().map(Constant::Str)
    }

    /// Registered both as an integer and as a string.
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.integers.contains_key(name) && self.strings.contains_key(name)
    }
}

pub struct Registry {
    factories: RwLock<HashMap<String, Factory>>,
    constants: RwLock<ConstantTable>,
    records: RwLock<HashMap<RecordType, Arc<RecordValidator>>>,
    compile: Mutex<()>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constants = self.constants.read();
        f.debug_struct("Registry")
            .field("validators", &self.factories.read().len())
            .field("int_constants", &constants.integers.len())
            .field("str_constants", &constants.strings.len())
            .field("records", &self.records.read().len())
            .finish()
    }
}

impl Registry {
    /// Registry with the built-in validators.
    pub fn new() -> Self {
        let registry = Self::empty();
        builtin::install(&registry);
        registry
    }

    /// Registry without any validators.
    pub fn empty() -> Self {
        Registry {
            factories: RwLock::new(HashMap::new()),
            constants: RwLock::new(ConstantTable::default()),
            records: RwLock::new(HashMap::new()),
            compile: Mutex::new(()),
        }
    }

    /// Process-wide registry (with built-ins), created on first use.
    pub fn global() -> &'static Registry {
        static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);
        &GLOBAL
    }

    pub fn register_validator<F>(&self, name: &str, factory: F) -> Result<(), ConfigError>
    where
        F: Fn(&ValidatorArgs<'_>) -> Result<Validator, ConfigError> + Send + Sync + 'static,
    {
        check_name("validator", name)?;
        self.insert_factory(name, Arc::new(factory));
        Ok(())
    }

    pub(crate) fn insert_factory(&self, name: &str, factory: Factory) {
        if self
            .factories
            .write()
            .insert(name.to_string(), factory)
            .is_some()
        {
            warn!(validator = name, "validator factory replaced");
        } else {
            debug!(validator = name, "registered validator factory");
        }
    }

    pub fn register_constant_int(&self, name: &str, value: u64) -> Result<(), ConfigError> {
        check_name("constant", name)?;
        let mut constants = self.constants.write();
        if constants.integers.insert(name.to_string(), value).is_some() {
            warn!(constant = name, value, "integer constant replaced");
        } else {
            debug!(constant = name, value, "registered integer constant");
        }
        if constants.strings.contains_key(name) {
            warn!(constant = name, "constant is also a string constant; the integer wins");
        }
        Ok(())
    }

    pub fn register_constant_str(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), ConfigError> {
        check_name("constant", name)?;
        let value = value.into();
        let mut constants = self.constants.write();
        if constants.integers.contains_key(name) {
            warn!(constant = name, "constant is also an integer constant; the integer wins");
        }
        match constants.strings.insert(name.to_string(), value) {
            Some(_) => warn!(constant = name, "string constant replaced"),
            None => debug!(constant = name, "registered string constant"),
        }
        Ok(())
    }

    pub fn lookup_validator(&self, name: &str) -> Option<Factory> {
        self.factories.read().get(name).cloned()
    }

    pub fn lookup_constant(&self, name: &str) -> Option<Constant> {
        self.constants.read().resolve(name)
    }

    pub fn is_ambiguous_constant(&self, name: &str) -> bool {
        self.constants.read().is_ambiguous(name)
    }

    /// Substitute every symbol with its constant, appending to the integer or string list.
    pub fn resolve_constants(&self, mut arguments: Arguments) -> Result<Arguments, ConfigError> {
        let constants = self.constants.read();
        for symbol in std::mem::take(&mut arguments.symbols) {
            match constants.resolve(&symbol) {
                Some(Constant::Integer(i)) => arguments.integers.push(i),
                Some(Constant::Str(s)) => arguments.strings.push(s),
                None => return Err(ConfigError::UnknownConstant(symbol)),
            }
        }
        Ok(arguments)
    }

    /// Compile and cache the validator for `R`. Registering a type again does nothing.
    pub fn register_record<R: Record>(&self) -> Result<(), ConfigError> {
        self.register_descriptor(R::descriptor())
    }

    pub fn register_descriptor(&self, descriptor: RecordDescriptor) -> Result<(), ConfigError> {
        let _compiling = self.compile.lock();
        let record_type = descriptor.record_type;
        if self.records.read().contains_key(&record_type) {
            debug!(record = record_type.name(), "record type already registered");
            return Ok(());
        }
        let validator = builder::build(self, &descriptor)?;
        self.records
            .write()
            .insert(record_type, Arc::new(validator));
        Ok(())
    }

    pub fn record_validator(&self, record_type: &RecordType) -> Option<Arc<RecordValidator>> {
        self.records.read().get(record_type).cloned()
    }

    pub fn is_registered<R: Record>(&self) -> bool {
        self.records
            .read()
            .contains_key(&R::descriptor().record_type)
    }

    pub fn validate<R: Record>(&self, record: &R) -> Result<(), ValidateError> {
        self.validate_dyn(record)
    }

    pub fn validate_dyn(&self, record: &dyn Record) -> Result<(), ValidateError> {
        let record_type = record.record_type();
        let validator = self
            .record_validator(&record_type)
            .ok_or(ValidateError::NotRegistered(record_type.name()))?;
        validator.validate(record)?;
        Ok(())
    }
}

fn check_name(kind: &'static str, name: &str) -> Result<(), ConfigError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

/// Register a validator factory in the global registry.
pub fn register_validator<F>(name: &str, factory: F) -> Result<(), ConfigError>
where
    F: Fn(&ValidatorArgs<'_>) -> Result<Validator, ConfigError> + Send + Sync + 'static,
{
    Registry::global().register_validator(name, factory)
}

/// Register an integer constant in the global registry.
pub fn register_constant_int(name: &str, value: u64) -> Result<(), ConfigError> {
    Registry::global().register_constant_int(name, value)
}

/// Register a string constant in the global registry.
pub fn register_constant_str(name: &str, value: impl Into<String>) -> Result<(), ConfigError> {
    Registry::global().register_constant_str(name, value)
}

/// Compile `R` in the global registry.
pub fn register_record<R: Record>() -> Result<(), ConfigError> {
    Registry::global().register_record::<R>()
}

/// Validate against the global registry.
pub fn validate<R: Record>(record: &R) -> Result<(), ValidateError> {
    Registry::global().validate(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::parse_arguments;

    #[test]
    fn names_follow_identifier_grammar() {
        for ok in ["a", "Max", "not_empty", "x9_", "Z"] {
            assert!(is_valid_name(ok), "{}", ok);
        }
        for bad in ["", "9a", "_a", "a-b", "a b", "ä", "max()"] {
            assert!(!is_valid_name(bad), "{}", bad);
        }
    }

    #[test]
    fn invalid_names_rejected_everywhere() {
        let r = Registry::empty();
        assert!(matches!(
            r.register_validator("1bad", |_| Ok(Validator::pass())),
            Err(ConfigError::InvalidName { kind: "validator", .. })
        ));
        assert!(matches!(
            r.register_constant_int("bad name", 1),
            Err(ConfigError::InvalidName { kind: "constant", .. })
        ));
        assert!(r.register_constant_str("", "x").is_err());
    }

    #[test]
    fn validator_overwrite_last_writer_wins() {
        let r = Registry::empty();
        r.register_validator("v", |_| Ok(Validator::pass())).unwrap();
        r.register_validator("v", |args| Err(args.invalid_field_type()))
            .unwrap();
        let factory = r.lookup_validator("v").unwrap();
        let args = ValidatorArgs::new("v", FieldType::U8, &r);
        assert!(factory(&args).is_err());
        assert!(r.lookup_validator("w").is_none());
    }

    #[test]
    fn integer_constant_wins_over_string() {
        let r = Registry::empty();
        r.register_constant_str("LIMIT", "ten").unwrap();
        assert_eq!(r.lookup_constant("LIMIT"), Some(Constant::Str("ten".into())));
        r.register_constant_int("LIMIT", 10).unwrap();
        assert_eq!(r.lookup_constant("LIMIT"), Some(Constant::Integer(10)));
        assert!(r.is_ambiguous_constant("LIMIT"));
        r.register_constant_int("LIMIT", 11).unwrap();
        assert_eq!(r.lookup_constant("LIMIT"), Some(Constant::Integer(11)));
    }

    #[test]
    fn resolve_appends_every_symbol() {
        let r = Registry::empty();
        r.register_constant_int("A", 1).unwrap();
        r.register_constant_int("B", 2).unwrap();
        r.register_constant_str("S", "s").unwrap();
        let args = parse_arguments("7, A, 'x', S, B").unwrap();
        let resolved = r.resolve_constants(args).unwrap();
        assert_eq!(resolved.integers, vec![7, 1, 2]);
        assert_eq!(resolved.strings, vec!["x", "s"]);
        assert!(resolved.symbols.is_empty());
    }

    #[test]
    fn unresolved_symbol_is_an_error() {
        let r = Registry::empty();
        let args = parse_arguments("NOPE").unwrap();
        assert!(matches!(
            r.resolve_constants(args),
            Err(ConfigError::UnknownConstant(name)) if name == "NOPE"
        ));
    }

    #[test]
    fn builtins_present_only_in_new() {
        assert!(Registry::new().lookup_validator("max").is_some());
        assert!(Registry::empty().lookup_validator("max").is_none());
    }

    #[test]
    fn unregistered_record_type_reported() {
        let r = Registry::new();
        assert!(r.record_validator(&RecordType::of::<u8>()).is_none());
    }
}
