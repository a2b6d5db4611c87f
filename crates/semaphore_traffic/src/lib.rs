//! # SEMAPHORE Traffic
//!
//! Traffic-light phase cycling on a background thread, with blocking waits
//! for observers on other threads.
//!
//! ## Design Principles
//!
//! 1. **One writer** - Only the cycler thread changes the phase
//! 2. **Atomic reads** - `current_phase` never tears or races
//! 3. **Deterministic shutdown** - `stop` (or drop) joins the cycler thread
//! 4. **External configuration** - Timing lives in TOML, not code
//!
//! ## Example
//!
//! ```rust
//! use semaphore_traffic::{CyclerConfig, Phase, PhaseCycler};
//!
//! let cycler = PhaseCycler::new(CyclerConfig::accelerated())?;
//! cycler.start()?;
//!
//! cycler.wait_for(Phase::Green);
//! cycler.stop();
//! # Ok::<(), semaphore_traffic::TrafficError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod cycler;
pub mod error;
pub mod host;
pub mod phase;

pub use config::CyclerConfig;
pub use cycler::PhaseCycler;
pub use error::{TrafficError, TrafficResult};
pub use host::{Simulate, TrafficLight};
pub use phase::{Phase, PhaseChange};
