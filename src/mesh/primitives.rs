//! Canonical starting shapes.

use nalgebra::Point3;

use super::halfedge::{Face, HalfEdge, HalfEdgeMesh, Vertex};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// Octahedron corners: the six unit points on the coordinate axes.
const OCTAHEDRON_VERTICES: [[f64; 3]; 6] = [
    [0.0, 0.0, 1.0],
    [-1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, -1.0],
];

/// Counter-clockwise seen from outside. Face `f` owns half-edges
/// `3f`, `3f + 1`, `3f + 2`, leaving its three corners in order.
const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [1, 2, 0],
    [2, 3, 0],
    [3, 4, 0],
    [4, 1, 0],
    [2, 1, 5],
    [3, 2, 5],
    [4, 3, 5],
    [1, 4, 5],
];

/// Twin of each half-edge under the numbering above.
const OCTAHEDRON_TWINS: [usize; 24] = [
    12, 5, 10, 15, 8, 1, 18, 11, 4, 21, 2, 7, 0, 23, 16, 3, 14, 19, 6, 17, 22, 9, 20, 13,
];

/// The canonical octahedron: 6 vertices, 12 edges (24 half-edges), 8 faces,
/// every vertex at distance 1 from the origin.
///
/// # Example
/// ```
/// use hedron::mesh::{octahedron, HalfEdgeMesh};
///
/// let mesh: HalfEdgeMesh = octahedron();
/// assert_eq!(mesh.euler_characteristic(), 2);
/// ```
pub fn octahedron<I: MeshIndex>() -> HalfEdgeMesh<I> {
    let mut vertices: Vec<Vertex<I>> = OCTAHEDRON_VERTICES
        .iter()
        .map(|&[x, y, z]| Vertex::new(Point3::new(x, y, z)))
        .collect();
    let mut halfedges = Vec::with_capacity(24);
    let mut faces = Vec::with_capacity(8);

    for (f, corners) in OCTAHEDRON_FACES.iter().enumerate() {
        faces.push(Face::new(HalfEdgeId::new(3 * f)));
        for (k, &v) in corners.iter().enumerate() {
            let id = 3 * f + k;
            halfedges.push(HalfEdge {
                origin: VertexId::new(v),
                twin: HalfEdgeId::new(OCTAHEDRON_TWINS[id]),
                next: HalfEdgeId::new(3 * f + (k + 1) % 3),
                prev: HalfEdgeId::new(3 * f + (k + 2) % 3),
                face: FaceId::new(f),
            });
            if !vertices[v].halfedge.is_valid() {
                vertices[v].halfedge = HalfEdgeId::new(id);
            }
        }
    }

    HalfEdgeMesh {
        vertices,
        halfedges,
        faces,
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// See [`octahedron`].
    pub fn octahedron() -> Self {
        octahedron()
    }
}
