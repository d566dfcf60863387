//! Procedural mesh generation: indexed UV spheres and closed orbit circles.

pub mod circle;
pub mod mesh;
pub mod sphere;
pub mod vertex;

pub use circle::generate_circle;
pub use mesh::{CircleMesh, Mesh, SphereMesh};
pub use sphere::generate_sphere;
pub use vertex::{
    CIRCLE_VERTEX_ATTRIBUTES, CIRCLE_VERTEX_LAYOUT, CircleVertex, VERTEX_ATTRIBUTES,
    VERTEX_LAYOUT, Vertex,
};
