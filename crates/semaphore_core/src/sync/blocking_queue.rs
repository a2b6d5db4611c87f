//! # Blocking Queue
//!
//! Unbounded FIFO handoff channel with a blocking `receive`.
//!
//! ## Architecture
//!
//! ```text
//!   Producer ──send()──> [ Mutex<VecDeque<T>> ] ──receive()──> Observer
//!                                 │
//!                           Condvar (not_empty)
//! ```
//!
//! ## Ordering
//!
//! Values are removed oldest-first. Two sends followed by one receive return
//! the first value sent; the second stays pending for the next receive.
//!
//! ## Thread Safety
//!
//! - `send`: never parks, holds the lock only for the push
//! - `receive`: parks with the lock released while the queue is empty
//! - Share between threads through `Arc<BlockingQueue<T>>`

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Thread-safe FIFO queue with blocking receive and non-blocking send.
///
/// The queue has single-consumer removal semantics: every value is handed to
/// exactly one receiver. Use one logical consumer per queue, or fan values
/// out to per-observer channels upstream.
///
/// There is no capacity bound. A producer that outpaces its consumer grows
/// the queue without limit.
pub struct BlockingQueue<T> {
    /// Pending values, oldest at the front.
    buffer: Mutex<VecDeque<T>>,
    /// Signalled once per pushed value.
    not_empty: Condvar,
}

impl<T> BlockingQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }

    /// Appends a value and wakes at least one blocked receiver.
    ///
    /// Never blocks beyond acquiring the lock. Always succeeds.
    pub fn send(&self, value: T) {
        let mut buf = self.buffer.lock();
        buf.push_back(value);
        self.not_empty.notify_one();
    }

    /// Removes and returns the oldest pending value, parking the calling
    /// thread while the queue is empty.
    ///
    /// # Blocking
    ///
    /// Blocks forever if no value is ever sent. Callers that need an upper
    /// bound should use [`BlockingQueue::receive_timeout`].
    pub fn receive(&self) -> T {
        tracing::trace!(thread = ?std::thread::current().id(), "blocking receive");

        let mut buf = self.buffer.lock();
        loop {
            if let Some(value) = buf.pop_front() {
                return value;
            }
            self.not_empty.wait(&mut buf);
        }
    }

    /// Removes and returns the oldest pending value without blocking.
    pub fn try_receive(&self) -> Option<T> {
        self.buffer.lock().pop_front()
    }

    /// Like [`BlockingQueue::receive`], but gives up after `timeout`.
    ///
    /// Returns `None` if no value arrived in time. Spurious wakeups do not
    /// extend the total wait.
    pub fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Some(self.receive());
        };

        let mut buf = self.buffer.lock();
        loop {
            if let Some(value) = buf.pop_front() {
                return Some(value);
            }
            if self.not_empty.wait_until(&mut buf, deadline).timed_out() {
                return buf.pop_front();
            }
        }
    }

    /// Removes every pending value, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.buffer.lock().drain(..).collect()
    }

    /// Returns the number of pending values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    /// Returns true if no values are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingQueue")
            .field("pending", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_receive_is_oldest_first() {
        let queue = BlockingQueue::new();
        queue.send("red");
        queue.send("green");

        assert_eq!(queue.receive(), "red");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.receive(), "green");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_try_receive_empty() {
        let queue: BlockingQueue<u8> = BlockingQueue::new();
        assert_eq!(queue.try_receive(), None);

        queue.send(3);
        assert_eq!(queue.try_receive(), Some(3));
        assert_eq!(queue.try_receive(), None);
    }

    #[test]
    fn test_receive_timeout_expires() {
        let queue: BlockingQueue<u8> = BlockingQueue::new();
        let start = Instant::now();

        assert_eq!(queue.receive_timeout(Duration::from_millis(20)), None);
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn test_receive_timeout_returns_pending() {
        let queue = BlockingQueue::new();
        queue.send(9_u32);
        assert_eq!(queue.receive_timeout(Duration::ZERO), Some(9));
    }

    #[test]
    fn test_drain_preserves_order() {
        let queue = BlockingQueue::new();
        for i in 0..5 {
            queue.send(i);
        }

        assert_eq!(queue.drain(), vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_receive_wakes_on_send() {
        let queue = Arc::new(BlockingQueue::new());
        let receiver = Arc::clone(&queue);

        let handle = thread::spawn(move || receiver.receive());

        // Give the receiver time to park on the condvar
        thread::sleep(Duration::from_millis(20));
        queue.send(42_u64);

        assert_eq!(handle.join().unwrap(), 42);
    }

    #[test]
    fn test_debug_reports_pending() {
        let queue = BlockingQueue::new();
        queue.send(1_u8);
        assert_eq!(format!("{queue:?}"), "BlockingQueue { pending: 1 }");
    }
}
