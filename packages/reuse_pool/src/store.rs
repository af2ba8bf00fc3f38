use std::num::NonZero;

use crossbeam::queue::{ArrayQueue, SegQueue};

/// Lock-free storage for idle pool objects.
///
/// Objects come out in no particular order guaranteed to the caller.
#[derive(Debug)]
pub(crate) enum Store<T> {
    Unbounded(SegQueue<T>),
    Bounded(ArrayQueue<T>),
}

impl<T> Store<T> {
    pub(crate) fn new(max_idle: Option<NonZero<usize>>) -> Self {
        match max_idle {
            Some(limit) => Self::Bounded(ArrayQueue::new(limit.get())),
            None => Self::Unbounded(SegQueue::new()),
        }
    }

    pub(crate) fn pop(&self) -> Option<T> {
        match self {
            Self::Unbounded(queue) => queue.pop(),
            Self::Bounded(queue) => queue.pop(),
        }
    }

    /// Hands the object back to the caller if the store is already at its limit.
    pub(crate) fn push(&self, object: T) -> Result<(), T> {
        match self {
            Self::Unbounded(queue) => {
                queue.push(object);
                Ok(())
            }
            Self::Bounded(queue) => queue.push(object),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Unbounded(queue) => queue.len(),
            Self::Bounded(queue) => queue.len(),
        }
    }

    pub(crate) fn limit(&self) -> Option<NonZero<usize>> {
        match self {
            Self::Unbounded(_) => None,
            Self::Bounded(queue) => NonZero::new(queue.capacity()),
        }
    }
}
