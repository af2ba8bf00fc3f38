use std::any::type_name;
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::Pool;

/// An object acquired from a [`Pool`] that is released back into the pool when dropped.
///
/// Created via [`Pool::rent()`]. Dereferences to the pooled object.
///
/// # Example
///
/// ```rust
/// use reuse_pool::Pool;
///
/// let pool = Pool::new(String::new);
///
/// {
///     let mut text = pool.rent();
///     text.push_str("temporary");
/// }
///
/// // The string was reset and returned to the pool when the guard was dropped.
/// assert_eq!(pool.idle(), 1);
/// assert!(pool.acquire().is_empty());
/// ```
pub struct Rented<'a, T> {
    pool: &'a Pool<T>,

    // Only `None` after the object has been taken out by `into_inner()` or `drop()`.
    object: Option<T>,
}

impl<'a, T> Rented<'a, T> {
    pub(crate) fn new(pool: &'a Pool<T>, object: T) -> Self {
        Self {
            pool,
            object: Some(object),
        }
    }

    /// Detaches the object from the pool. It will not be released when dropped.
    #[must_use]
    pub fn into_inner(mut self) -> T {
        self.object
            .take()
            .expect("object is present until the guard is consumed")
    }
}

impl<T> Deref for Rented<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.object
            .as_ref()
            .expect("object is present until the guard is consumed")
    }
}

impl<T> DerefMut for Rented<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.object
            .as_mut()
            .expect("object is present until the guard is consumed")
    }
}

impl<T> Drop for Rented<'_, T> {
    fn drop(&mut self) {
        if let Some(object) = self.object.take() {
            self.pool.release(object);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Rented<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("object", &self.object)
            .finish_non_exhaustive()
    }
}
