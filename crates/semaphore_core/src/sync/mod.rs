//! # Synchronization Primitives
//!
//! ## The Problem
//!
//! ```text
//! Thread 1 (Producer):  publishes discrete events
//! Thread 2 (Observer):  must block until an event arrives
//!
//! Spin on a shared flag:   BURNS A CORE, RACES ON WRITES
//! Sleep-and-poll:          LATENCY + MISSED EVENTS
//! ```
//!
//! ## The Solution: Mutex + Condvar Handoff
//!
//! ```text
//! send():    lock -> push -> notify_one
//! receive(): lock -> while empty { park (lock released) } -> pop
//! ```
//!
//! The receiver re-checks emptiness under the lock after every wakeup, so a
//! notify that races ahead of the park is never lost and spurious wakeups are
//! harmless.

mod blocking_queue;

pub use blocking_queue::BlockingQueue;
