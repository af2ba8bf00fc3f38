#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for tests, benchmarks and examples in this workspace.

mod call_counter;
mod eventually;
mod watchdog;

pub use call_counter::*;
pub use eventually::*;
pub use watchdog::*;
