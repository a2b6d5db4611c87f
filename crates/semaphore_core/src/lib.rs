//! # SEMAPHORE Core
//!
//! Cross-thread handoff primitives for the SEMAPHORE signaling stack.
//!
//! ## Architecture Rules
//!
//! 1. **No busy-polling** - Waiters park on a condition variable
//! 2. **No lost wakeups** - Every send notifies under the same lock the receiver checks
//! 3. **No torn state** - All queue mutation happens under exclusive access
//!
//! ## Example
//!
//! ```rust
//! use semaphore_core::BlockingQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(BlockingQueue::new());
//! let producer = Arc::clone(&queue);
//!
//! let handle = thread::spawn(move || producer.send(7_u32));
//! assert_eq!(queue.receive(), 7);
//! handle.join().unwrap();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod sync;

pub use sync::BlockingQueue;
