//! Routing parameters.

use serde::{Deserialize, Serialize};

/// Parameters the routing graph is weighted with.
///
/// Fixed when the graph is built; a snapshot carries them so a reloaded
/// index reproduces the same itineraries and durations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Minutes a rider waits at a stop before every boarding.
    pub bus_wait_mins: f64,

    /// Bus travel speed in km/h, assumed constant across the network.
    pub bus_velocity_kmh: f64,
}

impl RoutingConfig {
    /// Creates a config with the given wait time and velocity.
    pub fn new(bus_wait_mins: f64, bus_velocity_kmh: f64) -> Self {
        Self {
            bus_wait_mins,
            bus_velocity_kmh,
        }
    }

    /// Minutes spent riding `meters` of road at the configured velocity.
    pub fn ride_minutes(&self, meters: u32) -> f64 {
        f64::from(meters) / 1000.0 / self.bus_velocity_kmh * 60.0
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            bus_wait_mins: 6.0,
            bus_velocity_kmh: 40.0,
        }
    }
}
