//! Mesh file I/O.
//!
//! Meshes are exchanged as legacy VTK ASCII `POLYDATA`; see [`vtk`] for the
//! exact dialect. [`load`] and [`save`] work on files, the [`vtk`] functions
//! work on in-memory text.
//!
//! ```no_run
//! use hedron::io::{load, save};
//! use hedron::algo::subdivide::subdivide;
//! use hedron::mesh::HalfEdgeMesh;
//!
//! let mesh: HalfEdgeMesh = load("octahedron.vtk").unwrap();
//! save(&subdivide(&mesh).unwrap(), "refined.vtk").unwrap();
//! ```

pub mod vtk;

use std::fs;
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Load a mesh from a VTK polydata file.
///
/// On failure nothing is returned, so a caller replacing its current mesh
/// with the result keeps the old one.
///
/// # Errors
/// [`MeshError::Io`](crate::error::MeshError::Io) if the file cannot be read,
/// otherwise any error from [`vtk::read`].
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let mesh = vtk::read(&text)?;
    info!(
        "loaded {}: {} vertices, {} edges, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_edges(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save a mesh to a VTK polydata file, replacing any existing file.
///
/// # Errors
/// [`MeshError::EmptyMesh`](crate::error::MeshError::EmptyMesh) if the mesh is
/// empty, in which case no file is created.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let text = vtk::write(mesh)?;
    fs::write(path, text)?;
    info!(
        "saved {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(())
}
