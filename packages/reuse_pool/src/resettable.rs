use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::BuildHasher;

/// A type that can be restored to a reusable state after use.
///
/// A [`Pool`][crate::Pool] created via [`Pool::new()`][crate::Pool::new] calls
/// [`reset()`][Self::reset] on every object that is released back into the pool, before the
/// object can be acquired again.
///
/// Implementations should discard any state that must not leak from one user of the object to
/// the next, while keeping whatever makes the object worth pooling (typically allocated capacity).
///
/// # Example
///
/// ```rust
/// use reuse_pool::{Pool, Resettable};
///
/// struct Scratch {
///     lines: Vec<String>,
///     total_len: usize,
/// }
///
/// impl Resettable for Scratch {
///     fn reset(&mut self) {
///         self.lines.clear();
///         self.total_len = 0;
///     }
/// }
///
/// let pool = Pool::new(|| Scratch {
///     lines: Vec::with_capacity(64),
///     total_len: 0,
/// });
///
/// let mut scratch = pool.acquire();
/// scratch.lines.push("hello".to_owned());
/// scratch.total_len += 5;
/// pool.release(scratch);
///
/// let scratch = pool.acquire();
/// assert!(scratch.lines.is_empty());
/// assert_eq!(scratch.total_len, 0);
/// ```
pub trait Resettable {
    /// Restores the object to a state in which it can be handed to a new user.
    fn reset(&mut self);
}

impl<T> Resettable for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<T> Resettable for VecDeque<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl Resettable for String {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<K, V, S: BuildHasher> Resettable for HashMap<K, V, S> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<T, S: BuildHasher> Resettable for HashSet<T, S> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<K, V> Resettable for BTreeMap<K, V> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<T> Resettable for BTreeSet<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<T: Resettable + ?Sized> Resettable for Box<T> {
    fn reset(&mut self) {
        (**self).reset();
    }
}
