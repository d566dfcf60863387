//! Per-frame model transforms. Every function here is pure.

use glam::{Mat3, Mat4, Vec3};

use crate::body::CelestialBody;

/// Height of every orbital plane above y = 0.
pub const ORBIT_HEIGHT: f32 = 1.0;

/// A body's position on its orbit after `orbit_time` simulated seconds.
///
/// The angle is measured from +Z toward +X, so `orbit_time = 0` puts every body on the +Z axis.
pub fn orbital_position(body: &CelestialBody, orbit_time: f32) -> Vec3 {
    let angle = orbit_time * body.orbital_speed;
    Vec3::new(
        body.distance * angle.sin(),
        ORBIT_HEIGHT,
        body.distance * angle.cos(),
    )
}

/// `translate(orbit position) * scale(size) * rotate_y(spin)`.
///
/// Scale and spin act in the body's own frame, so spin rate does not depend on orbit radius.
pub fn compose_planet_transform(body: &CelestialBody, orbit_time: f32, spin_time: f32) -> Mat4 {
    Mat4::from_translation(orbital_position(body, orbit_time))
        * Mat4::from_scale(Vec3::splat(body.size))
        * Mat4::from_rotation_y(spin_time * body.rotation_speed)
}

/// Orbit rings are generated at their world radius, so they need no model transform.
pub fn compose_orbit_ring_transform() -> Mat4 {
    Mat4::IDENTITY
}

/// Radius of the ring traced by `body`. Orbits are circular, so this is its distance.
pub fn orbit_ring_radius(body: &CelestialBody) -> f32 {
    body.distance
}

/// `translate(position) * scale(scale)`. The sun does not spin.
pub fn compose_sun_transform(position: Vec3, scale: f32) -> Mat4 {
    Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(scale))
}

/// The camera's view matrix with its translation dropped, so the background stays centered on the viewer.
pub fn compose_background_transform(view: Mat4) -> Mat4 {
    Mat4::from_mat3(Mat3::from_mat4(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyRegistry;
    use crate::camera::Camera;
    use std::f32::consts::FRAC_PI_2;

    fn body(distance: f32, orbital_speed: f32) -> CelestialBody {
        CelestialBody {
            name: "Test",
            diffuse_texture: "test.jpg",
            specular_texture: None,
            shininess: 64.0,
            distance,
            rotation_speed: 2.0,
            orbital_speed,
            size: 1.0,
        }
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_position_at_time_zero() {
        let b = body(13.9, 1.58);
        assert!(approx(orbital_position(&b, 0.0), Vec3::new(0.0, 1.0, 13.9)));
    }

    #[test]
    fn test_position_at_quarter_orbit() {
        let b = body(13.9, 1.58);
        let t = FRAC_PI_2 / 1.58;
        assert!(approx(orbital_position(&b, t), Vec3::new(13.9, 1.0, 0.0)));
    }

    #[test]
    fn test_planet_transform_is_pure() {
        let registry = BodyRegistry::setup();
        for b in &registry {
            let a = compose_planet_transform(b, 12.5, 3.25);
            let c = compose_planet_transform(b, 12.5, 3.25);
            assert_eq!(a.to_cols_array(), c.to_cols_array());
        }
    }

    #[test]
    fn test_planet_transform_places_center_on_orbit() {
        let mut b = body(20.0, 0.5);
        b.size = 3.0;
        let m = compose_planet_transform(&b, 1.0, 7.0);
        let center = m.transform_point3(Vec3::ZERO);
        assert!(approx(center, orbital_position(&b, 1.0)));
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let mut b = body(20.0, 0.0);
        b.size = 3.0;
        let m = compose_planet_transform(&b, 0.0, 0.0);
        let top = m.transform_point3(Vec3::Y);
        assert!(approx(top, Vec3::new(0.0, 1.0 + 3.0, 20.0)));
    }

    #[test]
    fn test_spin_rotates_about_local_y() {
        let b = body(20.0, 0.0);
        let t = FRAC_PI_2 / b.rotation_speed;
        let m = compose_planet_transform(&b, 0.0, t);
        // Rotating +X a quarter turn about Y lands on -Z.
        let p = m.transform_point3(Vec3::X);
        assert!(approx(p, Vec3::new(0.0, 1.0, 19.0)));
    }

    #[test]
    fn test_ring_transform_is_identity_and_radius_tracks_distance() {
        assert_eq!(compose_orbit_ring_transform(), Mat4::IDENTITY);
        for b in &BodyRegistry::setup() {
            assert_eq!(orbit_ring_radius(b), b.distance);
        }
    }

    #[test]
    fn test_sun_transform() {
        let m = compose_sun_transform(Vec3::ZERO, 10.0);
        assert!(approx(m.transform_point3(Vec3::X), Vec3::new(10.0, 0.0, 0.0)));
        let moved = compose_sun_transform(Vec3::new(1.0, 2.0, 3.0), 2.0);
        assert!(approx(moved.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_background_ignores_camera_position() {
        let near = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, -117.0, -14.0);
        let far = Camera::new(Vec3::new(-300.0, 50.0, 900.0), Vec3::Y, -117.0, -14.0);
        let a = compose_background_transform(near.view_matrix());
        let b = compose_background_transform(far.view_matrix());
        assert!(a.abs_diff_eq(b, 1e-5));
        assert_eq!(a.w_axis, glam::Vec4::W);
    }
}
