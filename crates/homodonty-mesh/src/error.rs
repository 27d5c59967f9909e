//! Error types for mesh queries.

use thiserror::Error;

/// Errors that can occur when reading or querying a triangle mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Mesh has no triangles to project onto.
    #[error("mesh has no faces")]
    NoFaces,

    /// Vertex buffer length is not a multiple of three.
    #[error("vertex buffer length {0} is not a multiple of 3")]
    MalformedVertices(usize),

    /// Index buffer length is not a multiple of three.
    #[error("index buffer length {0} is not a multiple of 3")]
    MalformedIndices(usize),

    /// A face references a vertex that does not exist.
    #[error("face index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A vertex coordinate is NaN or infinite.
    #[error("vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
