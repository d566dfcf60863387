//! CPU-side indexed mesh container.

use crate::vertex::{CircleVertex, Vertex};

/// An indexed mesh owned by whoever generated it until it is uploaded.
///
/// Invariant: every index is `< vertices.len()`. An empty mesh (no vertices,
/// no indices) is the result of invalid generator input and must not be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

/// Triangle-list sphere mesh.
pub type SphereMesh = Mesh<Vertex>;

/// Line-list circle mesh, one index pair per segment.
pub type CircleMesh = Mesh<CircleVertex>;

impl<V> Default for Mesh<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V> Mesh<V> {
    /// A mesh with no vertices and no indices. Does not allocate.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Allocate a mesh with exact capacity, or `None` if the allocator refuses.
    pub(crate) fn try_with_capacity(vertices: usize, indices: usize) -> Option<Self> {
        let mut mesh = Self::empty();
        mesh.vertices.try_reserve_exact(vertices).ok()?;
        mesh.indices.try_reserve_exact(indices).ok()?;
        Some(mesh)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// True when there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Check that every index references an existing vertex.
    #[must_use]
    pub fn indices_in_bounds(&self) -> bool {
        let n = self.vertices.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }
}
