//! Closed circle generation for orbit rings.

use std::f32::consts::TAU;

use crate::mesh::CircleMesh;
use crate::vertex::CircleVertex;

/// Generate `segments + 1` points on a circle of `radius` and `segments`
/// line-list index pairs `(i, i + 1)`.
///
/// The closing point repeats point 0 exactly so the ring has no gap.
/// Returns [`CircleMesh::empty`] for `segments == 0`, a radius that is not a
/// positive finite number, or a failed allocation.
#[must_use]
pub fn generate_circle(radius: f32, segments: u32) -> CircleMesh {
    if segments == 0 || !(radius.is_finite() && radius > 0.0) || segments == u32::MAX {
        return CircleMesh::empty();
    }
    let Some(mut mesh) =
        CircleMesh::try_with_capacity(segments as usize + 1, segments as usize * 2)
    else {
        return CircleMesh::empty();
    };

    let step = TAU / segments as f32;
    for i in 0..segments {
        let (sin, cos) = (i as f32 * step).sin_cos();
        mesh.vertices.push(CircleVertex {
            position: [radius * cos, radius * sin],
        });
    }
    mesh.vertices.push(mesh.vertices[0]);

    for i in 0..segments {
        mesh.indices.extend_from_slice(&[i, i + 1]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_and_index_counts() {
        for segments in [1, 2, 3, 64, 128] {
            let mesh = generate_circle(13.9, segments);
            assert_eq!(mesh.vertex_count(), segments as usize + 1);
            assert_eq!(mesh.index_count(), segments as usize * 2);
        }
    }

    #[test]
    fn test_ring_is_closed() {
        let mesh = generate_circle(49.0, 128);
        assert_eq!(mesh.vertices.first(), mesh.vertices.last());
    }

    #[test]
    fn test_indices_reference_consecutive_points() {
        let mesh = generate_circle(1.0, 16);
        for (i, pair) in mesh.indices.chunks(2).enumerate() {
            assert_eq!(pair, &[i as u32, i as u32 + 1]);
        }
        assert!(mesh.indices_in_bounds());
    }

    #[test]
    fn test_points_lie_on_radius() {
        let radius = 19.6;
        let mesh = generate_circle(radius, 128);
        for v in &mesh.vertices {
            let [x, y] = v.position;
            assert!(((x * x + y * y).sqrt() - radius).abs() < 1e-4);
        }
        assert_eq!(mesh.vertices[0].position, [radius, 0.0]);
    }

    #[test]
    fn test_invalid_parameters_yield_empty_mesh() {
        assert!(generate_circle(1.0, 0).is_empty());
        assert!(generate_circle(0.0, 32).is_empty());
        assert!(generate_circle(-2.0, 32).is_empty());
        assert!(generate_circle(f32::NAN, 32).is_empty());
    }
}
