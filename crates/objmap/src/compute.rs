//! Compute functions
//!
//! A [`Compute`] is the post-processing step of a pick: a shared unary
//! function from the picked value to the output value. Failures are returned
//! as [`crate::Error`] and propagate out of the mapper untouched.

use std::fmt;
use std::sync::Arc;

use crate::{Error, Result, Value};

/// Type alias for the boxed compute function
pub type ComputeFn = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// A unary transform applied to picked values.
#[derive(Clone)]
pub struct Compute {
    func: ComputeFn,
}

impl Compute {
    /// Wrap a closure as a compute.
    pub fn new(func: impl Fn(Value) -> Result<Value> + Send + Sync + 'static) -> Self {
        Self {
            func: Arc::new(func),
        }
    }

    /// Run the compute on a picked value.
    ///
    /// # Errors
    ///
    /// Returns whatever error the wrapped function produces.
    pub fn apply(&self, value: Value) -> Result<Value> {
        (self.func)(value)
    }

    /// Compose: run `self`, then feed its output to `next`.
    #[must_use]
    pub fn then(self, next: Compute) -> Self {
        Self::new(move |value| next.apply(self.apply(value)?))
    }
}

impl fmt::Debug for Compute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compute").finish_non_exhaustive()
    }
}

impl<F> From<F> for Compute
where
    F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
{
    fn from(func: F) -> Self {
        Self::new(func)
    }
}

/// Lift a compute over an array, applying it to every element in order.
///
/// Anything other than an array, including the absent marker, is a
/// [`Error::TypeMismatch`].
#[must_use]
pub fn each(compute: impl Into<Compute>) -> Compute {
    let compute = compute.into();
    Compute::new(move |value| match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| compute.apply(item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Err(Error::type_mismatch("array", &other)),
    })
}

/// Apply computes left to right. An empty chain is the identity.
#[must_use]
pub fn chain(computes: impl IntoIterator<Item = Compute>) -> Compute {
    let computes: Vec<Compute> = computes.into_iter().collect();
    Compute::new(move |value| {
        computes
            .iter()
            .try_fold(value, |current, compute| compute.apply(current))
    })
}
