//! # Traffic Error Types
//!
//! All errors that can occur while configuring, starting, or waiting on a
//! phase cycler.

use crate::phase::Phase;
use thiserror::Error;

/// Errors that can occur in the traffic-light system.
#[derive(Error, Debug)]
pub enum TrafficError {
    /// The OS refused to create the background thread.
    #[error("failed to spawn phase cycler thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// `start` was called on a cycler that is already running or has run.
    #[error("phase cycler already started")]
    AlreadyStarted,

    /// Invalid configuration values or configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A bounded wait gave up before the target phase was published.
    #[error("timed out after {waited_ms}ms waiting for {target}")]
    WaitTimedOut {
        /// The phase that was awaited.
        target: Phase,
        /// How long the caller waited.
        waited_ms: u64,
    },
}

/// Result type for traffic-light operations.
pub type TrafficResult<T> = Result<T, TrafficError>;
