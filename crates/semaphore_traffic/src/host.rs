//! # Traffic-Light Host
//!
//! The object a simulation owns: it starts its cycler when told to simulate
//! and stops it when dropped.

use crate::config::CyclerConfig;
use crate::cycler::PhaseCycler;
use crate::error::TrafficResult;
use crate::phase::{Phase, PhaseChange};
use crossbeam_channel::Receiver;

/// Anything that can be started as an independent unit of work.
pub trait Simulate {
    /// Starts the background work.
    ///
    /// # Errors
    ///
    /// Implementors report failure to start (for example thread creation).
    fn simulate(&mut self) -> TrafficResult<()>;
}

/// A traffic light at an intersection.
#[derive(Debug)]
pub struct TrafficLight {
    id: u32,
    cycler: PhaseCycler,
}

impl TrafficLight {
    /// Creates a light that shows red until simulated.
    ///
    /// # Errors
    ///
    /// Returns the config validation error from [`PhaseCycler::new`].
    pub fn new(id: u32, config: CyclerConfig) -> TrafficResult<Self> {
        Ok(Self {
            id,
            cycler: PhaseCycler::new(config)?,
        })
    }

    /// Identifier of this light.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Current phase.
    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.cycler.current_phase()
    }

    /// Blocks until the light turns green.
    pub fn wait_for_green(&self) {
        self.cycler.wait_for_green();
    }

    /// Registers an observer of every transition.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<PhaseChange> {
        self.cycler.subscribe()
    }

    /// The underlying cycler.
    #[must_use]
    pub const fn cycler(&self) -> &PhaseCycler {
        &self.cycler
    }
}

impl Simulate for TrafficLight {
    fn simulate(&mut self) -> TrafficResult<()> {
        tracing::debug!(light = self.id, "simulating traffic light");
        self.cycler.start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrafficError;
    use std::time::Duration;

    #[test]
    fn test_light_starts_red() {
        let light = TrafficLight::new(3, CyclerConfig::accelerated()).unwrap();
        assert_eq!(light.id(), 3);
        assert_eq!(light.current_phase(), Phase::Red);
        assert!(!light.cycler().is_running());
    }

    #[test]
    fn test_simulate_then_green() {
        let mut light = TrafficLight::new(1, CyclerConfig::accelerated()).unwrap();
        light.simulate().unwrap();
        assert!(light.cycler().is_running());

        light.wait_for_green();
        assert!(light.cycler().transitions() >= 1);
    }

    #[test]
    fn test_simulate_twice_rejected() {
        let mut light = TrafficLight::new(1, CyclerConfig::accelerated()).unwrap();
        light.simulate().unwrap();
        assert!(matches!(light.simulate(), Err(TrafficError::AlreadyStarted)));
    }

    #[test]
    fn test_drop_joins_cycler() {
        let mut light = TrafficLight::new(7, CyclerConfig::accelerated()).unwrap();
        let changes = light.subscribe();
        light.simulate().unwrap();
        assert!(changes.recv_timeout(Duration::from_secs(5)).is_ok());

        drop(light);

        // Sender side went away with the joined cycler
        while changes.try_recv().is_ok() {}
        assert!(changes.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
