//! Static parameters of the sun, the planets and the star-field background.
//!
//! Distances and speeds are rescaled from real values so the whole system fits
//! on screen and moves at a watchable pace.

use glam::Vec3;

/// Units of world distance added to every orbit so inner planets clear the sun.
pub const DISTANCE_OFFSET: f32 = 10.0;
/// World units per astronomical unit.
pub const DISTANCE_SCALE: f32 = 10.0;
/// Divisor applied to rotation and orbital speeds.
pub const SPEED_DAMPING: f32 = 30.0;
/// Phong exponent shared by every planet.
pub const PLANET_SHININESS: f32 = 64.0;

/// Slots in the body table, including the reserved one.
pub const BODY_SLOTS: usize = 9;
/// Bodies that are actually drawn.
pub const POPULATED_BODIES: usize = 8;

struct BodyRow {
    name: &'static str,
    au: f32,
    size: f32,
    rotation_speed: f32,
    orbital_speed: f32,
    texture: &'static str,
}

const PLANET_TABLE: [BodyRow; POPULATED_BODIES] = [
    BodyRow {
        name: "Mercury",
        au: 0.39,
        size: 0.5,
        rotation_speed: 10.5,
        orbital_speed: 47.4,
        texture: "2k_mercury.jpg",
    },
    BodyRow {
        name: "Venus",
        au: 0.72,
        size: 1.0,
        rotation_speed: 6.5,
        orbital_speed: 35.0,
        texture: "2k_venus_surface.jpg",
    },
    BodyRow {
        name: "Earth",
        au: 1.00,
        size: 1.0,
        rotation_speed: 1674.0,
        orbital_speed: 29.8,
        texture: "2k_earth_daymap.jpg",
    },
    BodyRow {
        name: "Mars",
        au: 1.52,
        size: 0.6,
        rotation_speed: 868.0,
        orbital_speed: 24.1,
        texture: "2k_mars.jpg",
    },
    BodyRow {
        name: "Jupiter",
        au: 5.20,
        size: 6.0,
        rotation_speed: 453.0,
        orbital_speed: 13.1,
        texture: "2k_jupiter.jpg",
    },
    BodyRow {
        name: "Saturn",
        au: 9.58,
        size: 5.0,
        rotation_speed: 34800.0,
        orbital_speed: 9.7,
        texture: "2k_saturn.jpg",
    },
    BodyRow {
        name: "Uranus",
        au: 19.22,
        size: 3.0,
        rotation_speed: 9000.0,
        orbital_speed: 6.8,
        texture: "2k_uranus.jpg",
    },
    BodyRow {
        name: "Neptune",
        au: 30.05,
        size: 3.0,
        rotation_speed: 9700.0,
        orbital_speed: 5.4,
        texture: "2k_neptune.jpg",
    },
];

/// A planet's drawing and motion parameters. Immutable once the registry is built.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub name: &'static str,
    /// Diffuse texture file name, relative to the resource directory.
    pub diffuse_texture: &'static str,
    /// Specular map file name. No body ships one; the material's flat specular is used.
    pub specular_texture: Option<&'static str>,
    pub shininess: f32,
    /// Orbit radius, used for both the x and z extent.
    pub distance: f32,
    /// Radians of spin per unit of spin time.
    pub rotation_speed: f32,
    /// Radians of orbit per unit of orbit time.
    pub orbital_speed: f32,
    /// Uniform scale applied to the unit sphere.
    pub size: f32,
}

impl CelestialBody {
    fn from_row(row: &BodyRow) -> Self {
        Self {
            name: row.name,
            diffuse_texture: row.texture,
            specular_texture: None,
            shininess: PLANET_SHININESS,
            distance: orbit_distance(row.au),
            rotation_speed: row.rotation_speed / SPEED_DAMPING,
            orbital_speed: row.orbital_speed / SPEED_DAMPING,
            size: row.size,
        }
    }
}

/// A table slot that is allocated but never drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReservedSlot {
    pub name: &'static str,
    pub au: f32,
}

/// Pluto keeps its slot and distance but has no size, speeds or texture.
pub const RESERVED_SLOTS: [ReservedSlot; BODY_SLOTS - POPULATED_BODIES] = [ReservedSlot {
    name: "Pluto",
    au: 39.48,
}];

/// World-space orbit radius for a distance in astronomical units.
pub fn orbit_distance(au: f32) -> f32 {
    DISTANCE_OFFSET + au * DISTANCE_SCALE
}

/// The populated planets, in order from the sun, plus the reserved slots.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyRegistry {
    bodies: Vec<CelestialBody>,
    reserved: &'static [ReservedSlot],
}

impl BodyRegistry {
    /// Build the registry from the built-in planet table.
    pub fn setup() -> Self {
        Self {
            bodies: PLANET_TABLE.iter().map(CelestialBody::from_row).collect(),
            reserved: &RESERVED_SLOTS,
        }
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CelestialBody> {
        self.bodies.iter()
    }

    pub fn get(&self, index: usize) -> Option<&CelestialBody> {
        self.bodies.get(index)
    }

    pub fn populated_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn reserved(&self) -> &[ReservedSlot] {
        self.reserved
    }

    /// Populated plus reserved slots.
    pub fn capacity(&self) -> usize {
        self.bodies.len() + self.reserved.len()
    }
}

impl<'a> IntoIterator for &'a BodyRegistry {
    type Item = &'a CelestialBody;
    type IntoIter = std::slice::Iter<'a, CelestialBody>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The unlit light-source sphere at the center of the system.
#[derive(Debug, Clone, PartialEq)]
pub struct Sun {
    /// Also the light position.
    pub position: Vec3,
    pub scale: f32,
    pub color: Vec3,
    pub texture: &'static str,
}

impl Default for Sun {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 10.0,
            color: Vec3::ONE,
            texture: "2k_sun.jpg",
        }
    }
}

/// The star-map sphere that surrounds the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub radius: f32,
    pub texture: &'static str,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            radius: 1.0,
            texture: "8k_stars_milky_way.jpg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_eight_bodies_populated() {
        let registry = BodyRegistry::setup();
        assert_eq!(registry.populated_count(), POPULATED_BODIES);
        assert_eq!(registry.iter().count(), 8);
        assert_eq!(registry.capacity(), BODY_SLOTS);
        assert!(registry.get(8).is_none());
    }

    #[test]
    fn test_reserved_slot_is_pluto() {
        let registry = BodyRegistry::setup();
        assert_eq!(registry.reserved().len(), 1);
        assert_eq!(registry.reserved()[0].name, "Pluto");
        assert!(registry.iter().all(|b| b.name != "Pluto"));
    }

    #[test]
    fn test_distances_are_rescaled() {
        let registry = BodyRegistry::setup();
        let earth = registry.get(2).unwrap();
        assert_eq!(earth.name, "Earth");
        assert!((earth.distance - 20.0).abs() < 1e-5);
        let mercury = registry.get(0).unwrap();
        assert!((mercury.distance - 13.9).abs() < 1e-5);
        let neptune = registry.get(7).unwrap();
        assert!((neptune.distance - 310.5).abs() < 1e-3);
    }

    #[test]
    fn test_speeds_are_damped() {
        let registry = BodyRegistry::setup();
        let mercury = registry.get(0).unwrap();
        assert!((mercury.orbital_speed - 1.58).abs() < 1e-5);
        assert!((mercury.rotation_speed - 0.35).abs() < 1e-5);
        let saturn = registry.get(5).unwrap();
        assert!((saturn.rotation_speed - 1160.0).abs() < 1e-2);
    }

    #[test]
    fn test_orbits_increase_outward() {
        let registry = BodyRegistry::setup();
        let distances: Vec<f32> = registry.iter().map(|b| b.distance).collect();
        assert!(distances.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_every_body_has_texture_and_material() {
        for body in &BodyRegistry::setup() {
            assert!(body.diffuse_texture.ends_with(".jpg"));
            assert!(body.specular_texture.is_none());
            assert_eq!(body.shininess, PLANET_SHININESS);
            assert!(body.size > 0.0);
        }
    }

    #[test]
    fn test_sun_defaults() {
        let sun = Sun::default();
        assert_eq!(sun.position, Vec3::ZERO);
        assert_eq!(sun.scale, 10.0);
        assert_eq!(sun.color, Vec3::ONE);
    }
}
