#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! An object pool that recycles values instead of constructing new ones.
//!
//! Some values are expensive to construct but cheap to put back into a reusable state, such
//! as growable buffers that have already reached their working size. A [`Pool`] keeps such
//! values around after use and hands them out again on the next [`Pool::acquire()`].
//!
//! Every object returned via [`Pool::release()`] passes through the pool's reset hook before it
//! becomes available to the next caller. The hook is either the [`Resettable`] implementation
//! of the pooled type or a closure supplied to the [`PoolBuilder`].
//!
//! # Example
//!
//! ```rust
//! use reuse_pool::Pool;
//!
//! let pool = Pool::new(|| Vec::<u8>::with_capacity(1024));
//!
//! let mut buffer = pool.acquire();
//! buffer.extend_from_slice(b"Some data");
//!
//! // The buffer is cleared before it goes back into the pool.
//! pool.release(buffer);
//!
//! let buffer = pool.acquire();
//! assert!(buffer.is_empty());
//! assert!(buffer.capacity() >= 1024);
//! ```
//!
//! # Thread safety
//!
//! [`Pool<T>`] is `Send` and `Sync` whenever `T` is `Send`. Acquiring and releasing never block:
//! the idle objects are kept in a lock-free queue. Share the pool between threads by wrapping
//! it in an `Arc` or by borrowing it into scoped threads.
//!
//! # Panics
//!
//! The constructor and the reset hook are called on the thread that acquires or releases,
//! respectively. A panic in either unwinds into that caller; the pool itself remains usable.

mod builder;
mod pool;
mod rented;
mod resettable;
mod stats;
mod store;

pub use builder::*;
pub(crate) use pool::{Constructor, ResetHook};
pub use pool::*;
pub use rented::*;
pub use resettable::*;
pub(crate) use stats::Counters;
pub use stats::*;
pub(crate) use store::*;
