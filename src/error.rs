//! Error types for hedron.
//!
//! Every fallible operation in the crate returns [`Result`], so callers get a
//! typed [`MeshError`] instead of a partially built mesh.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building, subdividing, reading or writing a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The operation requires a populated mesh but the mesh is empty.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Malformed VTK input: bad header, misplaced section keyword or bad number.
    #[error("format error at line {line}: {message}")]
    Format {
        /// 1-based line number where parsing failed.
        line: usize,
        /// Description of what was expected.
        message: String,
    },

    /// Connectivity could not be completed (missing twin, next/prev or face).
    #[error("incomplete topology: {details}")]
    IncompleteTopology {
        /// Description of the unresolved relation.
        details: String,
    },

    /// An element accessor was given an index past the end of its collection.
    #[error("{element} index {index} out of range (len {len})")]
    OutOfRange {
        /// Which collection was indexed ("vertex", "half-edge" or "face").
        element: &'static str,
        /// The requested index.
        index: usize,
        /// The collection length at the time of the request.
        len: usize,
    },

    /// A vertex could not be projected onto the unit sphere.
    #[error("vertex {vertex} has zero or non-finite length and cannot be normalized")]
    DegenerateGeometry {
        /// Index of the offending vertex.
        vertex: usize,
    },

    /// A face references a vertex index that does not exist.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// An edge record references a vertex index that does not exist.
    #[error("edge {edge} references invalid vertex index {vertex}")]
    InvalidEdgeVertex {
        /// The edge record index.
        edge: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An edge record connects a vertex to itself.
    #[error("edge {edge} is degenerate (both ends are the same vertex)")]
    DegenerateEdge {
        /// The edge record index.
        edge: usize,
    },

    /// An undirected edge is listed twice or is shared by more than two faces.
    #[error("edge ({v0}, {v1}) is non-manifold")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The element count does not fit the mesh's index type.
    #[error("{count} elements do not fit the mesh index type")]
    IndexOverflow {
        /// Number of elements requested.
        count: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeshError {
    /// Create a format error for the given 1-based line.
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        MeshError::Format {
            line,
            message: message.into(),
        }
    }

    /// Create an incomplete-topology error.
    pub fn incomplete(details: impl Into<String>) -> Self {
        MeshError::IncompleteTopology {
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        let err = MeshError::format(3, "expected ASCII");
        assert_eq!(err.to_string(), "format error at line 3: expected ASCII");
    }

    #[test]
    fn test_out_of_range_display() {
        let err = MeshError::OutOfRange {
            element: "vertex",
            index: 7,
            len: 6,
        };
        assert_eq!(err.to_string(), "vertex index 7 out of range (len 6)");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: MeshError = io.into();
        assert!(matches!(err, MeshError::Io(_)));
    }
}
