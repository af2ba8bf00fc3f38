#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Bridges between in-memory sequences and channel-based streams.
//!
//! A stream is the receiving end of a [`crossbeam` channel][crossbeam::channel]: an ordered,
//! optionally bounded hand-off buffer that is closed once every sender is gone. This crate
//! offers three ways to move data across that boundary:
//!
//! * [`adapt()`] transforms every element of a source stream on a background worker and
//!   delivers the results through a new stream. The output closes exactly when the source
//!   closes and every already-received element has been delivered.
//! * [`to_stream()`] and [`to_stream_filled()`] expose a finite sequence as a stream, either
//!   fully buffered up front or fed by a background producer when the buffer is smaller than
//!   the sequence.
//! * [`drain()`] synchronously receives a fixed number of elements from any stream.
//!
//! # Example
//!
//! ```rust
//! use stream_bridge::{adapt, drain, to_stream};
//!
//! let numbers = to_stream(vec![1, 2, 3], 1);
//! let texts = adapt(numbers.into_receiver(), |n: i32| n.to_string());
//!
//! assert_eq!(drain(&texts, 3).unwrap(), vec!["1", "2", "3"]);
//!
//! // The producer finished and dropped its sender, so the adapted stream closes too.
//! assert_eq!(texts.recv(), None);
//! ```
//!
//! # Background workers
//!
//! Each adapter and each asynchronous producer runs on its own thread. A worker stops when its
//! input is exhausted, when nobody is left to receive its output or when it is cancelled via a
//! [`CancellationToken`]. Workers can be joined to learn why they stopped.
//!
//! # Panics
//!
//! A panic inside a transform or a source iterator does not tear down the process. The worker
//! catches it, closes its output stream and reports the panic as an [`Error`] when joined.

mod adapter;
mod cancellation;
mod drain;
mod error;
mod producer;
mod stream;
mod worker;

pub use adapter::*;
pub use cancellation::*;
pub use crossbeam::channel::{Receiver, Sender};
pub use drain::*;
pub use error::*;
pub use producer::*;
pub use stream::*;
pub use worker::*;
