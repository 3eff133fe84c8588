//! Executable validators and their combinators.
//!
//! A [`Validator`] is an immutable, cheaply clonable check over a [`Value`]. Combinators
//! never modify their inputs; they return new validators sharing the old ones.

use crate::error::ValidationError;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type CheckFn = dyn Fn(&Value<'_>) -> Result<(), ValidationError> + Send + Sync;

#[derive(Clone)]
pub struct Validator {
    check: Arc<CheckFn>,
}

impl Validator {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value<'_>) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        Validator {
            check: Arc::new(check),
        }
    }

    /// A validator that accepts every value.
    pub fn pass() -> Self {
        Validator::new(|_| Ok(()))
    }

    pub fn validate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        (self.check)(value)
    }

    /// Run `self`, then `other` only if `self` succeeded. The first failure wins.
    pub fn and(&self, other: &Validator) -> Validator {
        let first = self.clone();
        let second = other.clone();
        Validator::new(move |value| {
            first.validate(value)?;
            second.validate(value)
        })
    }

    /// Attach `field` to any failure, replacing a field name set further down.
    pub fn with_field(&self, field: impl Into<String>) -> Validator {
        let inner = self.clone();
        let field: Arc<str> = Arc::from(field.into());
        Validator::new(move |value| {
            inner
                .validate(value)
                .map_err(|e| e.with_field(field.as_ref()))
        })
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

/// Sequence validators with [`Validator::and`], in order. No validators compose to [`Validator::pass`].
pub fn compose<I>(validators: I) -> Validator
where
    I: IntoIterator<Item = Validator>,
{
    let mut it = validators.into_iter();
    match it.next() {
        None => Validator::pass(),
        Some(first) => it.fold(first, |acc, v| acc.and(&v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn failing(reason: &'static str) -> Validator {
        Validator::new(move |_| Err(ValidationError::constraint(reason)))
    }

    fn counting(calls: &Arc<AtomicUsize>) -> Validator {
        let calls = Arc::clone(calls);
        Validator::new(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn and_short_circuits_on_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let v = failing("first").and(&counting(&calls));
        let e = v.validate(&Value::U8(1)).unwrap_err();
        assert_eq!(e.reason, "first");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn and_runs_second_after_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let v = counting(&calls).and(&failing("second"));
        assert_eq!(v.validate(&Value::U8(1)).unwrap_err().reason, "second");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn compose_of_nothing_passes() {
        assert!(compose(Vec::new()).validate(&Value::Bool(false)).is_ok());
        assert!(compose(None).validate(&Value::Str("")).is_ok());
    }

    #[test]
    fn compose_reports_first_failure_in_order() {
        let v = compose([Validator::pass(), failing("b"), failing("c")]);
        assert_eq!(v.validate(&Value::U8(0)).unwrap_err().reason, "b");
    }

    #[test]
    fn with_field_sets_and_overwrites_name() {
        let tagged = failing("bad").with_field("inner");
        let e = tagged.validate(&Value::U8(0)).unwrap_err();
        assert_eq!(e.field.as_deref(), Some("inner"));

        let retagged = tagged.with_field("outer");
        let e = retagged.validate(&Value::U8(0)).unwrap_err();
        assert_eq!(e.field.as_deref(), Some("outer"));
        assert_eq!(e.reason, "bad");
        assert_eq!(e.kind, FailureKind::Constraint);
        assert_eq!(e.to_string(), "validate fail for field outer: bad");
    }

    #[test]
    fn with_field_on_pass_still_passes() {
        assert!(Validator::pass().with_field("x").validate(&Value::U8(0)).is_ok());
    }

    #[test]
    fn combinators_leave_inputs_unchanged() {
        let base = failing("base");
        let _ = base.with_field("f").and(&Validator::pass());
        let e = base.validate(&Value::U8(0)).unwrap_err();
        assert!(e.field.is_none());
    }

    #[test]
    fn validators_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
    }
}
