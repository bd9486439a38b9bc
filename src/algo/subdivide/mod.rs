//! Spherical midpoint subdivision.
//!
//! Each step of the scheme:
//!
//! 1. Inserts one new vertex per edge at the arithmetic mean of its endpoints,
//!    shared by the two faces on that edge
//! 2. Splits every triangle into three corner triangles and one center triangle
//! 3. Projects every vertex onto the unit sphere
//!
//! Starting from the octahedron this yields a sequence of geodesic spheres.
//! Vertex count grows to `V + E`, face count to `4F`, and the Euler
//! characteristic is unchanged.
//!
//! # Example
//!
//! ```
//! use hedron::prelude::*;
//! use hedron::algo::subdivide::{sphere_subdivide, SubdivideOptions};
//!
//! let mesh: HalfEdgeMesh = octahedron();
//! let sphere = sphere_subdivide(&mesh, &SubdivideOptions::new(2)).unwrap();
//! assert_eq!(sphere.num_faces(), 8 * 16);
//! ```

mod midpoint;

pub use midpoint::{sphere_subdivide, sphere_subdivide_with_progress, subdivide};

/// Options for [`sphere_subdivide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdivideOptions {
    /// Number of subdivision steps.
    pub iterations: usize,
}

impl SubdivideOptions {
    /// Create options with the specified number of steps.
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Set the number of steps.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}
