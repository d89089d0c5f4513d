//! CAD Kernel Abstraction and Shape Operations
//!
//! This crate provides:
//! - An abstract geometry-kernel trait for primitive construction,
//!   transforms, booleans, and defeaturing
//! - An opaque, arena-managed shape handle type
//! - A pure-Rust tessellation backend used as the default kernel
//! - A total (never-erroring) shape-operation layer for combining and
//!   modifying raw shapes outside the document tree

pub mod kernel;
pub mod ops;

// Re-exports for convenience
pub use kernel::{
    BooleanKind, CadError, CadResult, EdgeId, EdgeInfo, FaceId, FaceInfo, GeomKernel, MeshKernel,
    NullKernel, Shape, TessellatedMesh, default_kernel,
};
pub use ops::ShapeOps;
