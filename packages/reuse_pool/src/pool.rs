use std::any::type_name;
use std::fmt;
use std::num::NonZero;

use tracing::trace;

use crate::{Counters, PoolBuilder, PoolStats, Rented, Resettable, Store};

pub(crate) type Constructor<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Restores a released object before it re-enters the idle store.
pub(crate) enum ResetHook<T> {
    Noop,
    Resettable(fn(&mut T)),
    Custom(Box<dyn Fn(&mut T) + Send + Sync>),
}

impl<T> ResetHook<T> {
    fn apply(&self, object: &mut T) {
        match self {
            Self::Noop => {}
            Self::Resettable(reset) => reset(object),
            Self::Custom(reset) => reset(object),
        }
    }
}

impl<T> fmt::Debug for ResetHook<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Noop => write!(f, "Noop"),
            Self::Resettable(_) => write!(f, "Resettable"),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// A thread-safe cache of reusable objects of type `T`.
///
/// [`acquire()`][Self::acquire] hands out an idle object if one is available and otherwise
/// calls the constructor. [`release()`][Self::release] runs the reset hook on the object and
/// stores it for a future acquisition.
///
/// Which idle object an acquisition receives is unspecified. The pool never inspects objects
/// beyond running the reset hook on them.
///
/// The pool has no global instance and no teardown step. Create it where it is needed and pass
/// it (or an `Arc` of it) to whoever needs to use it; idle objects are dropped together with
/// the pool.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
///
/// use reuse_pool::Pool;
///
/// let pool = Arc::new(Pool::new(String::new));
///
/// let workers = (0..4)
///     .map(|i| {
///         let pool = Arc::clone(&pool);
///         thread::spawn(move || {
///             let mut text = pool.acquire();
///             text.push_str(&format!("worker {i}"));
///             pool.release(text);
///         })
///     })
///     .collect::<Vec<_>>();
///
/// for worker in workers {
///     worker.join().unwrap();
/// }
///
/// assert!(pool.stats().misses <= 4);
/// ```
pub struct Pool<T> {
    store: Store<T>,
    constructor: Constructor<T>,
    reset: ResetHook<T>,
    counters: Counters,
}

impl<T: Resettable> Pool<T> {
    /// Creates a pool that builds new objects via `constructor` and restores released objects
    /// via their [`Resettable`] implementation.
    ///
    /// The idle store is unbounded. Use [`Pool::builder()`] for other configurations.
    #[must_use]
    pub fn new<F>(constructor: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::builder(constructor).resettable().build()
    }
}

impl<T> Pool<T> {
    /// Starts configuring a pool that builds new objects via `constructor`.
    ///
    /// Unless configured otherwise, released objects are stored as-is without any reset.
    #[must_use]
    pub fn builder<F>(constructor: F) -> PoolBuilder<T>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        PoolBuilder::new(Box::new(constructor))
    }

    pub(crate) fn from_parts(
        constructor: Constructor<T>,
        reset: ResetHook<T>,
        max_idle: Option<NonZero<usize>>,
    ) -> Self {
        Self {
            store: Store::new(max_idle),
            constructor,
            reset,
            counters: Counters::default(),
        }
    }

    /// Takes an idle object from the pool or constructs a new one if none is idle.
    ///
    /// # Panics
    ///
    /// Panics raised by the constructor propagate to the caller.
    #[must_use]
    pub fn acquire(&self) -> T {
        if let Some(object) = self.store.pop() {
            self.counters.record_hit();
            trace!(pooled_type = type_name::<T>(), "reusing idle object");
            return object;
        }

        let object = (self.constructor)();
        self.counters.record_miss();
        trace!(pooled_type = type_name::<T>(), "constructed new object");
        object
    }

    /// Resets the object and makes it available to future acquisitions.
    ///
    /// The reset hook runs on the calling thread before the object becomes visible to any
    /// other caller. If the pool was configured with [`PoolBuilder::max_idle()`] and is full,
    /// the object is dropped after the reset.
    ///
    /// # Panics
    ///
    /// Panics raised by the reset hook propagate to the caller. The object is dropped in that
    /// case and does not return to the pool.
    pub fn release(&self, mut object: T) {
        self.reset.apply(&mut object);

        match self.store.push(object) {
            Ok(()) => self.counters.record_return(),
            Err(object) => {
                self.counters.record_discard();
                trace!(
                    pooled_type = type_name::<T>(),
                    "idle store is full, dropping released object"
                );
                drop(object);
            }
        }
    }

    /// Acquires an object wrapped in a guard that releases it back into the pool when dropped.
    #[must_use]
    pub fn rent(&self) -> Rented<'_, T> {
        Rented::new(self, self.acquire())
    }

    /// Number of idle objects currently stored in the pool.
    ///
    /// Under concurrent use the value may be outdated by the time it is observed.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.store.len()
    }

    /// The maximum number of idle objects the pool keeps, if limited.
    #[must_use]
    pub fn max_idle(&self) -> Option<NonZero<usize>> {
        self.store.limit()
    }

    /// Returns the usage counters of the pool.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot()
    }
}

impl<T> fmt::Debug for Pool<T> {
    #[cfg_attr(test, mutants::skip)] // Diagnostic output only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("idle", &self.store.len())
            .field("max_idle", &self.store.limit())
            .field("reset", &self.reset)
            .field("stats", &self.counters.snapshot())
            .finish_non_exhaustive()
    }
}
