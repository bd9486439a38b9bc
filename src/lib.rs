//! # Hedron
//!
//! A half-edge mesh engine for closed triangle meshes, with spherical
//! midpoint subdivision and legacy VTK ASCII polydata I/O.
//!
//! ## Features
//!
//! - **Half-edge store**: O(1) twin/next/prev/origin/face lookups with type-safe indices
//! - **Flexible indexing**: 16-bit, 32-bit, and 64-bit indices
//! - **Builder**: derives full connectivity from vertex-index triples, or from
//!   an explicit edge list plus triangles
//! - **Sphere subdivision**: refines the octahedron into geodesic spheres
//! - **VTK polydata**: reads and writes `POINTS` / `LINES` / `POLYGONS`
//!
//! ## Quick Start
//!
//! ```no_run
//! use hedron::prelude::*;
//! use hedron::algo::subdivide::{sphere_subdivide, SubdivideOptions};
//!
//! let mesh: HalfEdgeMesh = octahedron();
//! let sphere = sphere_subdivide(&mesh, &SubdivideOptions::new(3)).unwrap();
//! println!("Vertices: {}", sphere.num_vertices());
//! println!("Faces: {}", sphere.num_faces());
//!
//! hedron::io::save(&sphere, "sphere.vtk").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use hedron::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_edges(), 6);
//! assert_eq!(mesh.num_faces(), 4);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use hedron::prelude::*;
//!
//! let mesh: HalfEdgeMesh = octahedron();
//!
//! // Every octahedron vertex has four neighbors.
//! let v = VertexId::new(0);
//! assert_eq!(mesh.vertex_neighbors(v).count(), 4);
//!
//! // Walking a face returns to where it started.
//! let f = FaceId::new(0);
//! let he = mesh.face(f).halfedge;
//! assert_eq!(mesh.next(mesh.next(mesh.next(he))), he);
//! let [v0, v1, v2] = mesh.face_triangle(f);
//! assert_eq!(mesh.origin(mesh.twin(he)), v1);
//! # let _ = (v0, v2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use hedron::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_edges_and_triangles, build_from_triangles, octahedron, to_edge_list,
        to_face_vertex, Face, FaceId, HalfEdge, HalfEdgeId, HalfEdgeMesh, MeshIndex, Vertex,
        VertexId,
    };
}

pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::algo::subdivide::{sphere_subdivide, SubdivideOptions};
    use crate::io::vtk;

    #[test]
    fn test_octahedron_to_text_and_back() {
        let mesh: HalfEdgeMesh = octahedron();
        let sphere = sphere_subdivide(&mesh, &SubdivideOptions::default()).unwrap();

        let text = vtk::write(&sphere).unwrap();
        let back: HalfEdgeMesh = vtk::read(&text).unwrap();

        assert_eq!(back.num_vertices(), 18);
        assert_eq!(back.num_edges(), 48);
        assert_eq!(back.num_faces(), 32);
        assert!(back.is_valid());
        assert_eq!(to_edge_list(&back).len(), back.num_edges());
    }

    #[test]
    fn test_small_index_type() {
        let mesh: HalfEdgeMesh<u16> = octahedron();
        let sphere = sphere_subdivide(&mesh, &SubdivideOptions::new(3)).unwrap();
        assert_eq!(sphere.num_faces(), 512);
        assert_eq!(sphere.euler_characteristic(), 2);
    }
}
