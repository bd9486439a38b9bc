//! Mesh processing algorithms.
//!
//! - **Subdivision**: edge-midpoint refinement with projection onto the unit sphere

pub mod progress;
pub mod subdivide;

pub use progress::Progress;
