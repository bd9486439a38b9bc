//! Edge-midpoint subdivision with projection onto the unit sphere.

use std::collections::HashMap;

use log::debug;
use nalgebra::Point3;

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, HalfEdgeMesh, MeshIndex};

use super::SubdivideOptions;

/// Performs one subdivision step and returns the refined mesh.
///
/// The input is left untouched.
///
/// # Errors
///
/// - [`MeshError::EmptyMesh`] if `mesh` is empty
/// - [`MeshError::IncompleteTopology`] if `mesh` is not a closed manifold
/// - [`MeshError::DegenerateGeometry`] if a vertex lands on the origin and
///   cannot be projected
pub fn subdivide<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Result<HalfEdgeMesh<I>> {
    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    mesh.validate()?;
    subdivide_once(mesh)
}

/// Performs `options.iterations` subdivision steps.
///
/// Zero iterations returns a copy of the (checked) input.
pub fn sphere_subdivide<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    options: &SubdivideOptions,
) -> Result<HalfEdgeMesh<I>> {
    sphere_subdivide_with_progress(mesh, options, &Progress::none())
}

/// [`sphere_subdivide`] with progress reporting, one report per step.
pub fn sphere_subdivide_with_progress<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<HalfEdgeMesh<I>> {
    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    mesh.validate()?;

    let mut current = mesh.clone();
    for iter in 0..options.iterations {
        progress.report(iter, options.iterations, "Sphere subdivision");
        current = subdivide_once(&current)?;
    }
    progress.report(options.iterations, options.iterations, "Sphere subdivision");

    Ok(current)
}

/// One step on a mesh already known to be populated and manifold.
fn subdivide_once<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Result<HalfEdgeMesh<I>> {
    let (mut positions, faces) = to_face_vertex(mesh);
    let num_original = positions.len();

    // Keyed by source vertex pair rather than coordinates, so both faces of an
    // edge always share the same new vertex.
    let mut midpoints: HashMap<(usize, usize), usize> = HashMap::with_capacity(mesh.num_edges());
    let mut new_faces: Vec<[usize; 3]> = Vec::with_capacity(faces.len() * 4);

    for &[a, b, c] in &faces {
        let ab = midpoint_vertex(&mut positions, &mut midpoints, a, b);
        let bc = midpoint_vertex(&mut positions, &mut midpoints, b, c);
        let ca = midpoint_vertex(&mut positions, &mut midpoints, c, a);

        new_faces.push([a, ab, ca]);
        new_faces.push([b, bc, ab]);
        new_faces.push([c, ca, bc]);
        new_faces.push([ab, bc, ca]);
    }

    project_onto_unit_sphere(&mut positions)?;

    let refined = build_from_triangles(&positions, &new_faces)?;
    debug!(
        "subdivided {} -> {} vertices ({} edge points), {} -> {} faces",
        num_original,
        refined.num_vertices(),
        midpoints.len(),
        faces.len(),
        refined.num_faces()
    );
    Ok(refined)
}

/// Index of the midpoint vertex of edge `(a, b)`, appending it on first use.
fn midpoint_vertex(
    positions: &mut Vec<Point3<f64>>,
    midpoints: &mut HashMap<(usize, usize), usize>,
    a: usize,
    b: usize,
) -> usize {
    let key = if a < b { (a, b) } else { (b, a) };
    *midpoints.entry(key).or_insert_with(|| {
        let p0 = positions[key.0].coords;
        let p1 = positions[key.1].coords;
        positions.push(Point3::from(p0 * 0.5 + p1 * 0.5));
        positions.len() - 1
    })
}

fn project_onto_unit_sphere(positions: &mut [Point3<f64>]) -> Result<()> {
    for (i, p) in positions.iter_mut().enumerate() {
        // Rescale by the largest component first so the norm neither
        // underflows nor overflows.
        let scale = p.coords.amax();
        if scale == 0.0 || !scale.is_finite() {
            return Err(MeshError::DegenerateGeometry { vertex: i });
        }
        p.coords = (p.coords / scale).normalize();
    }
    Ok(())
}
