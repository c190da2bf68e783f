//! Serialized deferred-operation queue.
//!
//! Operations pushed here run strictly after the current synchronous work and
//! strictly in push order, once the host drains the queue.

use std::collections::VecDeque;

/// A deferred operation.
pub type QueuedOp<C> = Box<dyn FnOnce(&mut C)>;

/// FIFO of deferred operations.
pub struct OperationQueue<C> {
    ops: VecDeque<QueuedOp<C>>,
}

impl<C> OperationQueue<C> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            ops: VecDeque::new(),
        }
    }

    /// Appends an operation.
    pub fn push(&mut self, op: QueuedOp<C>) {
        self.ops.push_back(op);
    }

    /// Takes the oldest operation.
    pub fn pop(&mut self) -> Option<QueuedOp<C>> {
        self.ops.pop_front()
    }

    /// Number of pending operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl<C> Default for OperationQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for OperationQueue<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationQueue")
            .field("pending", &self.ops.len())
            .finish()
    }
}
