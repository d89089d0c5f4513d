//! Geometry kernel boundary
//!
//! The traits module defines the interface every kernel backend implements;
//! the mesh module provides the built-in pure-Rust backend.

pub mod mesh;
pub mod traits;

pub use mesh::MeshKernel;
pub use traits::{
    BooleanKind, CadError, CadResult, EdgeId, EdgeInfo, FaceId, FaceInfo, GeomKernel, NullKernel,
    Shape, TessellatedMesh,
};

/// Get the default geometry kernel
pub fn default_kernel() -> Box<dyn GeomKernel> {
    Box::new(MeshKernel::new())
}
