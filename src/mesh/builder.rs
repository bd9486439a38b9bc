//! Half-edge construction from index lists.
//!
//! Two entry points share one matching algorithm:
//!
//! - [`build_from_triangles`] derives the edge pairs from the faces themselves.
//! - [`build_from_edges_and_triangles`] starts from an explicit list of
//!   undirected edges (as stored in VTK `LINES`), pre-allocates a twin pair of
//!   half-edges per record, and then only *matches* face edges against it.
//!
//! Matching is by exact `(origin, end)` index equality through a hash map, so
//! construction is linear in the number of edges. Each face is tried with its
//! own winding first and with the reversed winding second, because the input
//! is not guaranteed to be consistently oriented across neighbours.

use std::collections::HashMap;

use log::{debug, warn};
use nalgebra::Point3;

use super::halfedge::{Face, HalfEdge, HalfEdgeMesh};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a closed half-edge mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Errors
/// - [`MeshError::EmptyMesh`] if there are no faces
/// - [`MeshError::InvalidVertexIndex`] / [`MeshError::DegenerateFace`] for bad faces
/// - [`MeshError::NonManifoldEdge`] if an edge is shared by more than two faces
/// - [`MeshError::IncompleteTopology`] if the surface is not closed
///
/// # Example
/// ```
/// use hedron::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
///     Point3::new(0.5, 0.5, 1.0),
/// ];
/// let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
///
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_halfedges(), 12);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    check_faces(vertices.len(), faces)?;

    let mut asm = Assembler::new(vertices, faces.len() * 3, faces.len())?;
    for (fi, &[a, b, c]) in faces.iter().enumerate() {
        asm.ensure_pair(a, b);
        asm.ensure_pair(b, c);
        asm.ensure_pair(c, a);
        asm.attach_face(fi, [a, b, c])?;
    }
    asm.finish()
}

/// Build a closed half-edge mesh from vertices, undirected edges and faces.
///
/// Each edge record `[a, b]` becomes the half-edge pair `a -> b`, `b -> a`
/// (stored at consecutive indices and linked as twins). Faces must then use
/// exactly the listed edges, every listed edge must border two faces.
///
/// # Errors
/// In addition to the errors of [`build_from_triangles`]:
/// - [`MeshError::InvalidEdgeVertex`] / [`MeshError::DegenerateEdge`] for bad edge records
/// - [`MeshError::NonManifoldEdge`] for an edge listed twice
/// - [`MeshError::IncompleteTopology`] if a face uses an unlisted edge or an
///   edge is left without faces
pub fn build_from_edges_and_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    edges: &[[usize; 2]],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    check_faces(vertices.len(), faces)?;

    for (ei, &[a, b]) in edges.iter().enumerate() {
        for v in [a, b] {
            if v >= vertices.len() {
                return Err(MeshError::InvalidEdgeVertex { edge: ei, vertex: v });
            }
        }
        if a == b {
            return Err(MeshError::DegenerateEdge { edge: ei });
        }
    }

    let mut asm = Assembler::new(vertices, edges.len() * 2, faces.len())?;
    for &[a, b] in edges {
        if !asm.ensure_pair(a, b) {
            return Err(MeshError::NonManifoldEdge { v0: a, v1: b });
        }
    }
    for (fi, &face) in faces.iter().enumerate() {
        asm.attach_face(fi, face)?;
    }
    asm.finish()
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces), faces in traversal order from each face's
/// stored half-edge.
pub fn to_face_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 3]> = mesh
        .face_ids()
        .map(|f| {
            let [v0, v1, v2] = mesh.face_triangle(f);
            [v0.index(), v1.index(), v2.index()]
        })
        .collect();

    (vertices, faces)
}

/// List every undirected edge once, as `[origin, end]` of the half-edge whose
/// origin index is not greater than its twin's.
pub fn to_edge_list<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Vec<[usize; 2]> {
    mesh.undirected_edges()
        .map(|he| [mesh.origin(he).index(), mesh.dest(he).index()])
        .collect()
}

fn check_faces(num_vertices: usize, faces: &[[usize; 3]]) -> Result<()> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= num_vertices {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }
    Ok(())
}

/// Mesh under construction plus the directed-edge lookup table.
///
/// Never escapes this module: callers only see the result of
/// [`Assembler::finish`], which is either a validated mesh or an error.
struct Assembler<I: MeshIndex> {
    mesh: HalfEdgeMesh<I>,
    directed: HashMap<(usize, usize), HalfEdgeId<I>>,
}

impl<I: MeshIndex> Assembler<I> {
    fn new(vertices: &[Point3<f64>], num_halfedges: usize, num_faces: usize) -> Result<Self> {
        let largest = vertices.len().max(num_halfedges).max(num_faces);
        if largest > I::capacity() {
            return Err(MeshError::IndexOverflow { count: largest });
        }

        let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), num_faces);
        for &p in vertices {
            mesh.add_vertex(p);
        }

        Ok(Self {
            mesh,
            directed: HashMap::with_capacity(num_halfedges),
        })
    }

    /// Create the twin pair `a -> b` / `b -> a` unless it exists.
    /// Returns whether a new pair was created.
    fn ensure_pair(&mut self, a: usize, b: usize) -> bool {
        if self.directed.contains_key(&(a, b)) {
            return false;
        }

        let ab = HalfEdgeId::new(self.mesh.halfedges.len());
        let ba = HalfEdgeId::new(self.mesh.halfedges.len() + 1);

        let mut forward = HalfEdge::new(VertexId::new(a));
        forward.twin = ba;
        let mut backward = HalfEdge::new(VertexId::new(b));
        backward.twin = ab;
        self.mesh.halfedges.push(forward);
        self.mesh.halfedges.push(backward);

        self.directed.insert((a, b), ab);
        self.directed.insert((b, a), ba);
        true
    }

    /// The three half-edges of the loop `a -> b -> c -> a`, or `None` if any
    /// of them already bounds a face.
    fn free_loop(&self, fi: usize, [a, b, c]: [usize; 3]) -> Result<Option<[HalfEdgeId<I>; 3]>> {
        let mut loop_hes = [HalfEdgeId::invalid(); 3];
        for (slot, (from, to)) in loop_hes.iter_mut().zip([(a, b), (b, c), (c, a)]) {
            let he = *self.directed.get(&(from, to)).ok_or_else(|| {
                MeshError::incomplete(format!(
                    "face {} uses edge ({}, {}) which is not in the edge list",
                    fi, from, to
                ))
            })?;
            if self.mesh.halfedge(he).face.is_valid() {
                return Ok(None);
            }
            *slot = he;
        }
        Ok(Some(loop_hes))
    }

    fn attach_face(&mut self, fi: usize, [a, b, c]: [usize; 3]) -> Result<()> {
        if let Some(hes) = self.free_loop(fi, [a, b, c])? {
            self.link_face(hes);
            return Ok(());
        }

        // Second pass: the neighbour that claimed a directed edge may simply
        // be wound the other way round.
        if let Some(hes) = self.free_loop(fi, [a, c, b])? {
            warn!("face {} is wound against its neighbours; attaching it reversed", fi);
            self.link_face(hes);
            return Ok(());
        }

        for (from, to) in [(a, b), (b, c), (c, a)] {
            let claimed = |key: (usize, usize)| {
                self.directed
                    .get(&key)
                    .is_some_and(|&he| self.mesh.halfedge(he).face.is_valid())
            };
            if claimed((from, to)) && claimed((to, from)) {
                return Err(MeshError::NonManifoldEdge { v0: from, v1: to });
            }
        }
        Err(MeshError::incomplete(format!(
            "face {} cannot be oriented consistently with its neighbours",
            fi
        )))
    }

    fn link_face(&mut self, hes: [HalfEdgeId<I>; 3]) {
        let face_id = FaceId::new(self.mesh.faces.len());
        self.mesh.faces.push(Face::new(hes[0]));

        for k in 0..3 {
            let he = self.mesh.halfedge_mut(hes[k]);
            he.next = hes[(k + 1) % 3];
            he.prev = hes[(k + 2) % 3];
            he.face = face_id;
        }
    }

    fn finish(mut self) -> Result<HalfEdgeMesh<I>> {
        for (i, he) in self.mesh.halfedges.iter().enumerate() {
            if !he.face.is_valid() {
                let twin = &self.mesh.halfedges[he.twin.index()];
                return Err(MeshError::incomplete(format!(
                    "half-edge {} ({} -> {}) borders no face",
                    i,
                    he.origin.index(),
                    twin.origin.index()
                )));
            }
        }

        for i in 0..self.mesh.halfedges.len() {
            let origin = self.mesh.halfedges[i].origin;
            let vertex = self.mesh.vertex_mut(origin);
            if !vertex.halfedge.is_valid() {
                vertex.halfedge = HalfEdgeId::new(i);
            }
        }

        self.mesh.validate()?;

        debug!(
            "built half-edge mesh: {} vertices, {} edges, {} faces",
            self.mesh.num_vertices(),
            self.mesh.num_edges(),
            self.mesh.num_faces()
        );
        Ok(self.mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        (vertices, faces)
    }

    fn tetrahedron_edges() -> Vec<[usize; 2]> {
        vec![[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]]
    }

    #[test]
    fn test_tetrahedron() {
        let (vertices, faces) = tetrahedron();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert!(mesh.is_valid());

        // twin pairs sit at consecutive indices
        for i in (0..12).step_by(2) {
            let he = HalfEdgeId::<u32>::new(i);
            assert_eq!(mesh.twin(he).index(), i + 1);
        }
    }

    #[test]
    fn test_faces_keep_input_winding() {
        let (vertices, faces) = tetrahedron();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();
        let (_, out_faces) = to_face_vertex(&mesh);
        assert_eq!(out_faces, faces);
    }

    #[test]
    fn test_open_surface_is_incomplete() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &[[0, 1, 2]]);
        assert!(matches!(result, Err(MeshError::IncompleteTopology { .. })));
    }

    #[test]
    fn test_unused_vertex_is_incomplete() {
        let (mut vertices, faces) = tetrahedron();
        vertices.push(Point3::new(9.0, 9.0, 9.0));
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::IncompleteTopology { .. })));
    }

    #[test]
    fn test_inconsistent_winding_is_repaired() {
        let (vertices, mut faces) = tetrahedron();
        faces[3] = [0, 2, 3]; // reversed [2, 0, 3]

        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();
        assert!(mesh.is_valid());
        let (_, out_faces) = to_face_vertex(&mesh);
        assert_eq!(out_faces[3], [0, 3, 2]);
    }

    #[test]
    fn test_non_manifold_edge() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { v0: 0, v1: 1 })));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &[[0, 1, 2]]);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = tetrahedron();
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &[[0, 0, 2]]);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_no_faces() {
        let (vertices, _) = tetrahedron();
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &[]);
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_index_overflow() {
        let vertices = vec![Point3::origin(); 70_000];
        let result: Result<HalfEdgeMesh<u16>> = build_from_triangles(&vertices, &[[0, 1, 2]]);
        assert!(matches!(result, Err(MeshError::IndexOverflow { count: 70_000 })));
    }

    #[test]
    fn test_from_edges_matches_from_triangles() {
        let (vertices, faces) = tetrahedron();
        let edges = tetrahedron_edges();

        let a: HalfEdgeMesh<u32> = build_from_edges_and_triangles(&vertices, &edges, &faces).unwrap();
        let b: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert!(a.is_valid());
        assert_eq!(a.num_halfedges(), b.num_halfedges());
        assert_eq!(to_face_vertex(&a), to_face_vertex(&b));

        // pairs follow the edge list order
        for (i, &[o, e]) in edges.iter().enumerate() {
            let he = HalfEdgeId::<u32>::new(2 * i);
            assert_eq!(a.origin(he).index(), o);
            assert_eq!(a.dest(he).index(), e);
        }
    }

    #[test]
    fn test_from_edges_missing_edge() {
        let (vertices, faces) = tetrahedron();
        let mut edges = tetrahedron_edges();
        edges.pop();
        let result: Result<HalfEdgeMesh<u32>> =
            build_from_edges_and_triangles(&vertices, &edges, &faces);
        assert!(matches!(result, Err(MeshError::IncompleteTopology { .. })));
    }

    #[test]
    fn test_from_edges_unused_edge() {
        let (mut vertices, faces) = tetrahedron();
        vertices.push(Point3::new(2.0, 2.0, 2.0));
        let mut edges = tetrahedron_edges();
        edges.push([3, 4]);
        let result: Result<HalfEdgeMesh<u32>> =
            build_from_edges_and_triangles(&vertices, &edges, &faces);
        assert!(matches!(result, Err(MeshError::IncompleteTopology { .. })));
    }

    #[test]
    fn test_from_edges_bad_records() {
        let (vertices, faces) = tetrahedron();

        let mut duplicated = tetrahedron_edges();
        duplicated.push([1, 0]);
        let result: Result<HalfEdgeMesh<u32>> =
            build_from_edges_and_triangles(&vertices, &duplicated, &faces);
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { v0: 1, v1: 0 })));

        let result: Result<HalfEdgeMesh<u32>> =
            build_from_edges_and_triangles(&vertices, &[[2, 2]], &faces);
        assert!(matches!(result, Err(MeshError::DegenerateEdge { edge: 0 })));

        let result: Result<HalfEdgeMesh<u32>> =
            build_from_edges_and_triangles(&vertices, &[[0, 9]], &faces);
        assert!(matches!(
            result,
            Err(MeshError::InvalidEdgeVertex { edge: 0, vertex: 9 })
        ));
    }

    #[test]
    fn test_edge_list_roundtrip() {
        let (vertices, faces) = tetrahedron();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        let edges = to_edge_list(&mesh);
        assert_eq!(edges.len(), 6);
        for &[o, e] in &edges {
            assert!(o < e);
        }

        let rebuilt: HalfEdgeMesh<u32> =
            build_from_edges_and_triangles(&vertices, &edges, &faces).unwrap();
        assert_eq!(to_face_vertex(&rebuilt), to_face_vertex(&mesh));
    }
}
