//! Half-edge mesh storage.
//!
//! [`HalfEdgeMesh`] owns three flat arenas (vertices, half-edges, faces). All
//! relations between elements are typed handles into those arenas, so growing
//! the mesh never invalidates a reference.
//!
//! # Structure
//!
//! - Every undirected edge is stored as two **half-edges** pointing in opposite
//!   directions, each other's **twin**
//! - Each half-edge knows its **origin** vertex, the **next** and **prev**
//!   half-edges around its face, and the **face** itself
//! - Each vertex stores one outgoing half-edge
//! - Each face stores one half-edge on its boundary
//!
//! A mesh is either empty or a closed, manifold triangle mesh: every half-edge
//! has a twin, a face, and a three-cycle of `next`/`prev` links. The builder
//! and the subdivision engine only ever hand out meshes in one of those two
//! states; [`HalfEdgeMesh::validate`] checks it for anything else.

use nalgebra::{Point3, Vector3};

use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex at the given position with no incident half-edge.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

/// A directed half-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge leaves from.
    pub origin: VertexId<I>,

    /// The oppositely directed half-edge of the same edge.
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face.
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId<I>,

    /// The face this half-edge bounds.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a half-edge leaving `origin` with every relation unset.
    pub fn new(origin: VertexId<I>) -> Self {
        Self {
            origin,
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }
}

/// A triangular face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a face anchored at the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

/// A closed triangle mesh stored as half-edges.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) halfedges: Vec<HalfEdge<I>>,
    pub(crate) faces: Vec<Face<I>>,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create an empty mesh with room for a closed mesh of the given size.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // Closed triangle mesh: every face owns exactly three half-edges.
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_faces * 3),
            faces: Vec::with_capacity(num_faces),
        }
    }

    // ==================== Lifecycle ====================

    /// Whether the mesh holds no vertices, half-edges or faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.halfedges.is_empty() && self.faces.is_empty()
    }

    /// Drop every element, returning the mesh to the empty state.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.halfedges.clear();
        self.faces.clear();
    }

    // ==================== Counts ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.halfedges.len() / 2
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// V - E + F.
    pub fn euler_characteristic(&self) -> i64 {
        self.num_vertices() as i64 - self.num_edges() as i64 + self.num_faces() as i64
    }

    // ==================== Accessors ====================

    /// Get a vertex by ID.
    ///
    /// # Panics
    /// Panics if the ID is out of range; see [`try_vertex`](Self::try_vertex).
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    #[inline]
    pub(crate) fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    ///
    /// # Panics
    /// Panics if the ID is out of range; see [`try_halfedge`](Self::try_halfedge).
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    #[inline]
    pub(crate) fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    /// Get a face by ID.
    ///
    /// # Panics
    /// Panics if the ID is out of range; see [`try_face`](Self::try_face).
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get a vertex by position, failing with [`MeshError::OutOfRange`].
    pub fn try_vertex(&self, index: usize) -> Result<&Vertex<I>> {
        self.vertices.get(index).ok_or(MeshError::OutOfRange {
            element: "vertex",
            index,
            len: self.vertices.len(),
        })
    }

    /// Get a half-edge by position, failing with [`MeshError::OutOfRange`].
    pub fn try_halfedge(&self, index: usize) -> Result<&HalfEdge<I>> {
        self.halfedges.get(index).ok_or(MeshError::OutOfRange {
            element: "half-edge",
            index,
            len: self.halfedges.len(),
        })
    }

    /// Get a face by position, failing with [`MeshError::OutOfRange`].
    pub fn try_face(&self, index: usize) -> Result<&Face<I>> {
        self.faces.get(index).ok_or(MeshError::OutOfRange {
            element: "face",
            index,
            len: self.faces.len(),
        })
    }

    /// Get a vertex position by index, failing with [`MeshError::OutOfRange`].
    pub fn try_position(&self, index: usize) -> Result<Point3<f64>> {
        self.try_vertex(index).map(|v| v.position)
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    ///
    /// Positions are the only vertex data open to callers; connectivity is
    /// owned by the builder.
    ///
    /// ```compile_fail
    /// use hedron::mesh::{octahedron, HalfEdgeMesh, HalfEdgeId, VertexId};
    ///
    /// let mut mesh: HalfEdgeMesh = octahedron();
    /// mesh.vertex_mut(VertexId::new(0)).halfedge = HalfEdgeId::invalid();
    /// ```
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the end vertex of a half-edge (the origin of its `next`).
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.next(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<I>)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId::new(i), f))
    }

    /// One half-edge per undirected edge: the one whose origin index is not
    /// greater than its twin's origin index.
    pub fn undirected_edges(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedges()
            .filter(|(_, he)| he.origin <= self.halfedge(he.twin).origin)
            .map(|(id, _)| id)
    }

    /// Iterate over outgoing half-edges around a vertex.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// Number of edges incident on a vertex.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Iterate over vertices of a face.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// The three vertices of a face in traversal order, starting at the
    /// face's stored half-edge.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.origin(he0), self.origin(he1), self.origin(he2)]
    }

    /// Positions of the three vertices of a face.
    pub fn face_positions(&self, f: FaceId<I>) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    // ==================== Geometry ====================

    /// Unit normal of a face, following its winding.
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0)).normalize()
    }

    /// Area of a face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Length of an edge.
    pub fn edge_length(&self, he: HalfEdgeId<I>) -> f64 {
        (self.position(self.dest(he)) - self.position(self.origin(he))).norm()
    }

    /// Arithmetic mean of an edge's endpoints.
    pub fn edge_midpoint(&self, he: HalfEdgeId<I>) -> Point3<f64> {
        let p0 = self.position(self.origin(he));
        let p1 = self.position(self.dest(he));
        Point3::from((p0.coords + p1.coords) * 0.5)
    }

    /// Axis-aligned bounding box, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(&v.position), max.sup(&v.position))
        }))
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    // ==================== Construction ====================

    /// Append a vertex with no incident half-edge and return its ID.
    pub(crate) fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    // ==================== Validation ====================

    /// Whether the mesh is empty or a closed manifold triangle mesh.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check every connectivity invariant.
    ///
    /// An empty mesh is valid. A populated mesh must satisfy, for every
    /// half-edge `e`: `next(prev(e)) == e`, `prev(next(e)) == e`,
    /// `next(next(next(e))) == e`, `twin(twin(e)) == e`,
    /// `origin(twin(e)) == dest(e)`, and all three half-edges of a face must
    /// reference that face. Every vertex must have an outgoing half-edge.
    pub fn validate(&self) -> Result<()> {
        let nv = self.vertices.len();
        let nh = self.halfedges.len();
        let nf = self.faces.len();

        let he_at = |id: HalfEdgeId<I>| -> Option<&HalfEdge<I>> {
            if id.is_valid() {
                self.halfedges.get(id.index())
            } else {
                None
            }
        };

        for (vid, v) in self.vertices() {
            match he_at(v.halfedge) {
                Some(he) if he.origin == vid => {}
                Some(_) => {
                    return Err(MeshError::incomplete(format!(
                        "vertex {} points at a half-edge that does not leave it",
                        vid.index()
                    )))
                }
                None => {
                    return Err(MeshError::incomplete(format!(
                        "vertex {} has no outgoing half-edge",
                        vid.index()
                    )))
                }
            }
        }

        for (id, he) in self.halfedges() {
            let e = id.index();
            if !he.origin.is_valid() || he.origin.index() >= nv {
                return Err(MeshError::incomplete(format!("half-edge {} has no origin", e)));
            }
            let (Some(twin), Some(next), Some(prev)) =
                (he_at(he.twin), he_at(he.next), he_at(he.prev))
            else {
                return Err(MeshError::incomplete(format!(
                    "half-edge {} is missing its twin, next or prev",
                    e
                )));
            };
            if !he.face.is_valid() || he.face.index() >= nf {
                return Err(MeshError::incomplete(format!("half-edge {} has no face", e)));
            }
            if he.twin == id || twin.twin != id {
                return Err(MeshError::incomplete(format!(
                    "half-edge {} and its twin are not paired",
                    e
                )));
            }
            if next.prev != id || prev.next != id {
                return Err(MeshError::incomplete(format!(
                    "half-edge {} breaks the next/prev inverse law",
                    e
                )));
            }
            if he_at(next.next).map(|h| h.next) != Some(id) {
                return Err(MeshError::incomplete(format!(
                    "half-edge {} is not on a three-cycle",
                    e
                )));
            }
            if twin.origin != next.origin || he_at(twin.next).map(|h| h.origin) != Some(he.origin) {
                return Err(MeshError::incomplete(format!(
                    "half-edge {} and its twin do not share endpoints",
                    e
                )));
            }
            if next.face != he.face {
                return Err(MeshError::incomplete(format!(
                    "half-edge {} and its next bound different faces",
                    e
                )));
            }
        }

        for (fid, f) in self.faces() {
            match he_at(f.halfedge) {
                Some(he) if he.face == fid => {}
                _ => {
                    return Err(MeshError::incomplete(format!(
                        "face {} is not bounded by its half-edge",
                        fid.index()
                    )))
                }
            }
        }

        if nh != 3 * nf {
            return Err(MeshError::incomplete(format!(
                "{} half-edges for {} triangles",
                nh, nf
            )));
        }

        Ok(())
    }
}

/// Iterator over outgoing half-edges around a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    remaining: usize,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            remaining: if start.is_valid() { mesh.num_halfedges() } else { 0 },
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let result = self.current;

        // he: v -> w, twin: w -> v, next(twin) leaves v again.
        self.current = self.mesh.next(self.mesh.twin(self.current));
        if self.current == self.start {
            self.remaining = 0;
        }

        Some(result)
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, f: FaceId<I>) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for FaceHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);
        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}
