//! Core mesh data structures.
//!
//! This module provides the half-edge store, the builder that derives
//! connectivity from vertex-index triples, and the canonical octahedron.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], a closed triangle mesh stored as three
//! arenas (vertices, half-edges, faces) linked by typed handles
//! ([`VertexId`], [`HalfEdgeId`], [`FaceId`]). The handles are generic over
//! the integer width ([`MeshIndex`]), `u32` by default.
//!
//! # Construction
//!
//! ```
//! use hedron::mesh::{build_from_triangles, octahedron, HalfEdgeMesh};
//! use nalgebra::Point3;
//!
//! let canonical: HalfEdgeMesh = octahedron();
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let tetra: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(canonical.num_faces(), 2 * tetra.num_faces());
//! ```

mod builder;
mod halfedge;
mod index;
mod primitives;

pub use builder::{build_from_edges_and_triangles, build_from_triangles, to_edge_list, to_face_vertex};
pub use halfedge::{Face, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh, Vertex, VertexHalfEdgeIter};
pub use index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use primitives::octahedron;
