use std::any::type_name;
use std::fmt;
use std::num::NonZero;

use crate::{Constructor, Pool, ResetHook, Resettable};

/// Configures and creates a [`Pool`].
///
/// Obtained via [`Pool::builder()`].
///
/// # Example
///
/// ```rust
/// use std::num::NonZero;
///
/// use reuse_pool::Pool;
///
/// let pool = Pool::builder(|| vec![0_u8; 4096])
///     .reset(|buffer: &mut Vec<u8>| buffer.fill(0))
///     .max_idle(NonZero::new(16).unwrap())
///     .build();
///
/// let buffer = pool.acquire();
/// assert_eq!(buffer.len(), 4096);
/// pool.release(buffer);
/// ```
#[must_use]
pub struct PoolBuilder<T> {
    constructor: Constructor<T>,
    reset: ResetHook<T>,
    max_idle: Option<NonZero<usize>>,
}

impl<T> PoolBuilder<T> {
    pub(crate) fn new(constructor: Constructor<T>) -> Self {
        Self {
            constructor,
            reset: ResetHook::Noop,
            max_idle: None,
        }
    }

    /// Sets a closure that restores released objects before they re-enter the pool.
    ///
    /// Replaces any previously configured reset behavior. By default, released objects are
    /// not reset at all.
    pub fn reset<F>(mut self, reset: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.reset = ResetHook::Custom(Box::new(reset));
        self
    }

    /// Restores released objects via their [`Resettable`] implementation.
    ///
    /// Replaces any previously configured reset behavior.
    pub fn resettable(mut self) -> Self
    where
        T: Resettable,
    {
        self.reset = ResetHook::Resettable(T::reset);
        self
    }

    /// Limits how many idle objects the pool keeps.
    ///
    /// Objects released while the limit is reached are reset and then dropped. By default, the
    /// number of idle objects is unlimited.
    pub fn max_idle(mut self, max_idle: NonZero<usize>) -> Self {
        self.max_idle = Some(max_idle);
        self
    }

    /// Creates the pool. The pool starts out without any idle objects.
    #[must_use]
    pub fn build(self) -> Pool<T> {
        Pool::from_parts(self.constructor, self.reset, self.max_idle)
    }
}

impl<T> fmt::Debug for PoolBuilder<T> {
    #[cfg_attr(test, mutants::skip)] // Diagnostic output only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("reset", &self.reset)
            .field("max_idle", &self.max_idle)
            .finish_non_exhaustive()
    }
}
