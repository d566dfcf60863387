//! Scene model for the orrery: the celestial body registry, the simulation clock,
//! the fly camera and the per-frame model transforms.

pub mod body;
pub mod camera;
pub mod clock;
pub mod state;
pub mod transform;

pub use body::{
    BODY_SLOTS, Background, BodyRegistry, CelestialBody, POPULATED_BODIES, ReservedSlot, Sun,
};
pub use camera::{Camera, CameraMovement, PITCH_LIMIT_DEG};
pub use clock::{RunState, SimulationClock};
pub use state::SceneState;
pub use transform::{
    compose_background_transform, compose_orbit_ring_transform, compose_planet_transform,
    compose_sun_transform, orbit_ring_radius, orbital_position,
};
