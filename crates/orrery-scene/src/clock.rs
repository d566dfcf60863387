//! Simulated time for orbital motion and axial spin.

/// Which simulated motions are running. Orbit and spin pause independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    pub orbit_enabled: bool,
    pub spin_enabled: bool,
}

impl Default for RunState {
    /// Orbiting, not spinning.
    fn default() -> Self {
        Self {
            orbit_enabled: true,
            spin_enabled: false,
        }
    }
}

impl RunState {
    pub fn toggle_orbit(&mut self) {
        self.orbit_enabled = !self.orbit_enabled;
    }

    pub fn toggle_spin(&mut self) {
        self.spin_enabled = !self.spin_enabled;
    }
}

/// Two accumulators of simulated seconds. They never decrease and are never reset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationClock {
    orbit_time: f32,
    spin_time: f32,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta_time` to each accumulator whose motion is enabled.
    ///
    /// Negative, NaN and infinite deltas are dropped.
    pub fn advance(&mut self, delta_time: f32, run_state: RunState) {
        if !(delta_time.is_finite() && delta_time > 0.0) {
            return;
        }
        if run_state.orbit_enabled {
            self.orbit_time += delta_time;
        }
        if run_state.spin_enabled {
            self.spin_time += delta_time;
        }
    }

    pub fn orbit_time(&self) -> f32 {
        self.orbit_time
    }

    pub fn spin_time(&self) -> f32 {
        self.spin_time
    }
}
