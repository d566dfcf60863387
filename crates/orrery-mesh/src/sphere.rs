//! UV sphere generation.
//!
//! Vertices are laid out as `stacks + 1` rings running from the north pole
//! (`θ = 0`) to the south pole (`θ = π`). Each ring holds `slices + 1`
//! vertices: the last one repeats the first position with `u = 1` so the
//! texture seam closes without wrapping.

use std::f32::consts::{PI, TAU};

use crate::mesh::SphereMesh;
use crate::vertex::Vertex;

/// Minimum longitudinal subdivisions for a closed sphere.
pub const MIN_SLICES: u32 = 3;
/// Minimum latitudinal subdivisions for a closed sphere.
pub const MIN_STACKS: u32 = 2;

/// Generate an indexed UV sphere centred at the origin.
///
/// Produces `(slices + 1) * (stacks + 1)` vertices and `6 * slices * stacks`
/// triangle-list indices. Returns [`SphereMesh::empty`] when `slices < 3`,
/// `stacks < 2`, `radius` is not a positive finite number, the counts do not
/// fit a `u32` index, or the buffers cannot be allocated.
#[must_use]
pub fn generate_sphere(radius: f32, slices: u32, stacks: u32) -> SphereMesh {
    if slices < MIN_SLICES || stacks < MIN_STACKS || !(radius.is_finite() && radius > 0.0) {
        return SphereMesh::empty();
    }

    let ring = slices as usize + 1;
    let Some(vertex_count) = ring.checked_mul(stacks as usize + 1) else {
        return SphereMesh::empty();
    };
    let Some(index_count) = (slices as usize)
        .checked_mul(stacks as usize)
        .and_then(|quads| quads.checked_mul(6))
    else {
        return SphereMesh::empty();
    };
    if u32::try_from(vertex_count).is_err() {
        return SphereMesh::empty();
    }
    let Some(mut mesh) = SphereMesh::try_with_capacity(vertex_count, index_count) else {
        return SphereMesh::empty();
    };

    for i in 0..=stacks {
        let theta = i as f32 * PI / stacks as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let v = i as f32 / stacks as f32;

        for j in 0..=slices {
            let phi = j as f32 * TAU / slices as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let position = [
                radius * sin_theta * cos_phi,
                radius * cos_theta,
                radius * sin_theta * sin_phi,
            ];
            let normal = [
                position[0] / radius,
                position[1] / radius,
                position[2] / radius,
            ];
            mesh.vertices.push(Vertex {
                position,
                normal,
                uv: [j as f32 / slices as f32, v],
            });
        }
    }

    let ring = slices + 1;
    for i in 0..stacks {
        let k1 = i * ring;
        let k2 = k1 + ring;
        for j in 0..slices {
            let (a, b) = (k1 + j, k2 + j);
            mesh.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_counts_match_tessellation() {
        for &(slices, stacks) in &[(3, 2), (8, 8), (32, 32), (17, 5)] {
            let mesh = generate_sphere(2.5, slices, stacks);
            assert_eq!(
                mesh.vertex_count(),
                ((slices + 1) * (stacks + 1)) as usize,
                "vertex count for {slices}x{stacks}"
            );
            assert_eq!(
                mesh.index_count(),
                (6 * slices * stacks) as usize,
                "index count for {slices}x{stacks}"
            );
        }
    }

    #[test]
    fn test_indices_in_bounds() {
        let mesh = generate_sphere(1.0, 32, 32);
        assert!(mesh.indices_in_bounds());
    }

    #[test]
    fn test_normals_are_unit_and_match_position() {
        let radius = 3.7;
        let mesh = generate_sphere(radius, 24, 12);
        for v in &mesh.vertices {
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5, "normal length {}", n.length());
            let expected = Vec3::from(v.position) / radius;
            assert!((n - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_poles_and_seam() {
        let slices = 16;
        let stacks = 8;
        let mesh = generate_sphere(1.0, slices, stacks);
        let ring = (slices + 1) as usize;

        let north = mesh.vertices[0].position;
        assert!((north[1] - 1.0).abs() < 1e-6);
        let south = mesh.vertices[mesh.vertex_count() - 1].position;
        assert!((south[1] + 1.0).abs() < 1e-6);

        for i in 0..=stacks as usize {
            let first = mesh.vertices[i * ring];
            let last = mesh.vertices[i * ring + slices as usize];
            assert!((Vec3::from(first.position) - Vec3::from(last.position)).length() < 1e-5);
            assert_eq!(first.uv[0], 0.0);
            assert_eq!(last.uv[0], 1.0);
            assert_eq!(first.uv[1], last.uv[1]);
        }
    }

    #[test]
    fn test_first_quad_triangles() {
        let mesh = generate_sphere(1.0, 4, 2);
        // ring length 5: k1 = 0, k2 = 5
        assert_eq!(&mesh.indices[..6], &[0, 5, 1, 1, 5, 6]);
    }

    #[test]
    fn test_invalid_parameters_yield_empty_mesh() {
        let cases = [
            (1.0, 2, 8),
            (1.0, 8, 1),
            (0.0, 8, 8),
            (-1.0, 8, 8),
            (f32::NAN, 8, 8),
            (f32::INFINITY, 8, 8),
        ];
        for (radius, slices, stacks) in cases {
            let mesh = generate_sphere(radius, slices, stacks);
            assert!(mesh.is_empty(), "({radius}, {slices}, {stacks})");
            assert_eq!(mesh.vertex_count(), 0);
            assert_eq!(mesh.index_count(), 0);
            assert_eq!(mesh.vertices.capacity(), 0);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate_sphere(1.0, 12, 6), generate_sphere(1.0, 12, 6));
    }
}
