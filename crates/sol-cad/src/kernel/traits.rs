//! Geometry kernel trait definitions
//!
//! These types define the interface that all kernel backends must implement.
//! Geometry lives inside the backend; callers only ever hold opaque handles.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Opaque handle to kernel-resident geometry
///
/// The actual boundary representation is stored inside the kernel backend,
/// keyed by this handle's id, and stays alive for the kernel's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier
    pub id: Uuid,
    /// Marker for backend-resident data (the data itself never crosses here)
    #[serde(skip)]
    has_kernel_data: bool,
}

impl Shape {
    /// Create a new shape handle with the given ID
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            has_kernel_data: false,
        }
    }

    /// Mark that this shape has backend-resident data
    pub fn with_kernel_data(mut self) -> Self {
        self.has_kernel_data = true;
        self
    }

    /// Check if this shape has backend-resident data
    pub fn has_kernel_data(&self) -> bool {
        self.has_kernel_data
    }
}

/// Unique identifier for an edge within a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId {
    /// ID of the shape this edge belongs to
    pub shape_id: Uuid,
    /// Index of the edge within the shape
    pub index: u32,
}

impl EdgeId {
    /// Create a new edge ID
    pub fn new(shape_id: Uuid, index: u32) -> Self {
        Self { shape_id, index }
    }
}

/// Unique identifier for a face within a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceId {
    /// ID of the shape this face belongs to
    pub shape_id: Uuid,
    /// Index of the face within the shape
    pub index: u32,
}

impl FaceId {
    /// Create a new face ID
    pub fn new(shape_id: Uuid, index: u32) -> Self {
        Self { shape_id, index }
    }
}

/// Information about an edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeInfo {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Start point of the edge
    pub start: DVec3,
    /// End point of the edge
    pub end: DVec3,
    /// Midpoint of the edge
    pub midpoint: DVec3,
    /// Length of the edge
    pub length: f64,
}

impl EdgeInfo {
    /// Create a new edge info
    pub fn new(id: EdgeId, start: DVec3, end: DVec3) -> Self {
        let midpoint = (start + end) * 0.5;
        let length = (end - start).length();
        Self {
            id,
            start,
            end,
            midpoint,
            length,
        }
    }
}

/// Information about a face
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceInfo {
    /// Unique identifier for this face
    pub id: FaceId,
    /// Center point of the face
    pub center: DVec3,
    /// Normal vector of the face
    pub normal: DVec3,
    /// Approximate area of the face
    pub area: f64,
}

impl FaceInfo {
    /// Create a new face info
    pub fn new(id: FaceId, center: DVec3, normal: DVec3, area: f64) -> Self {
        Self {
            id,
            center,
            normal: normal.normalize_or_zero(),
            area,
        }
    }
}

/// Boolean operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanKind {
    /// Union (fuse)
    Union,
    /// Subtraction (cut)
    Subtract,
    /// Intersection (common)
    Intersect,
    /// Section (intersection contour)
    Section,
}

/// Error type for kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Primitive construction failed: {0}")]
    ConstructionFailed(String),

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Shape not found: {0}")]
    ShapeNotFound(Uuid),

    #[error("Tessellation failed: {0}")]
    TessellationFailed(String),

    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),
}

/// Result type for kernel operations
pub type CadResult<T> = Result<T, CadError>;

/// A tessellated mesh output from the kernel, for display layers
#[derive(Debug, Clone, Default)]
pub struct TessellatedMesh {
    /// Vertex positions (3 floats per vertex)
    pub vertices: Vec<[f32; 3]>,
    /// Vertex normals (3 floats per vertex)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (3 indices per triangle)
    pub indices: Vec<u32>,
}

impl TessellatedMesh {
    /// Create an empty tessellated mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// The main geometry kernel trait
///
/// Implementations provide the actual shape construction and boolean
/// algebra. Primitives are built at the canonical origin; placement is the
/// caller's concern via [`GeomKernel::transform`].
pub trait GeomKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Check if the kernel is available
    fn is_available(&self) -> bool;

    /// Create a box with one corner at the origin, extending to (w, h, d)
    fn create_box(&self, width: f64, height: f64, depth: f64) -> CadResult<Shape>;

    /// Create a sphere centered at the origin
    fn create_sphere(&self, radius: f64) -> CadResult<Shape>;

    /// Create a cylinder with its base at the origin, extending along +Z
    fn create_cylinder(&self, radius: f64, height: f64) -> CadResult<Shape>;

    /// Create a conical frustum: base radius `radius1` at z = 0, top radius
    /// `radius2` at z = `height`
    fn create_cone(&self, radius1: f64, radius2: f64, height: f64) -> CadResult<Shape>;

    /// Create a torus centered at the origin, tube circling the Z axis
    fn create_torus(&self, major_radius: f64, minor_radius: f64) -> CadResult<Shape>;

    /// Apply an affine transform to a shape
    ///
    /// Copy-on-transform: the input handle stays valid and the result is a
    /// new handle referring to transformed geometry.
    fn transform(&self, shape: &Shape, transform: &DMat4) -> CadResult<Shape>;

    /// Perform a boolean operation on two shapes
    fn boolean(&self, a: &Shape, b: &Shape, kind: BooleanKind) -> CadResult<Shape>;

    /// Split a shape with a tool shape
    fn split(&self, shape: &Shape, tool: &Shape) -> CadResult<Shape>;

    /// Remove the listed faces from a shape, healing the openings
    fn defeature(&self, shape: &Shape, faces_to_remove: &[FaceId]) -> CadResult<Shape>;

    /// Apply a uniform-radius fillet to every edge of a shape
    ///
    /// The backend enumerates the shape's edges itself; there is no
    /// per-edge radius selection.
    fn fillet(&self, shape: &Shape, radius: f64) -> CadResult<Shape>;

    /// Get all edges of a shape with their geometric information
    fn edges(&self, shape: &Shape) -> CadResult<Vec<EdgeInfo>>;

    /// Get all faces of a shape with their geometric information
    fn faces(&self, shape: &Shape) -> CadResult<Vec<FaceInfo>>;

    /// Tessellate a shape into triangles
    fn tessellate(&self, shape: &Shape, tolerance: f64) -> CadResult<TessellatedMesh>;
}

/// A null kernel that always returns errors (used when no kernel is available)
#[derive(Debug, Default)]
pub struct NullKernel;

impl NullKernel {
    fn unavailable<T>() -> CadResult<T> {
        Err(CadError::KernelNotAvailable(
            "No geometry kernel available".into(),
        ))
    }
}

impl GeomKernel for NullKernel {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn create_box(&self, _width: f64, _height: f64, _depth: f64) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn create_sphere(&self, _radius: f64) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn create_cylinder(&self, _radius: f64, _height: f64) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn create_cone(&self, _radius1: f64, _radius2: f64, _height: f64) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn create_torus(&self, _major_radius: f64, _minor_radius: f64) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn transform(&self, _shape: &Shape, _transform: &DMat4) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn boolean(&self, _a: &Shape, _b: &Shape, _kind: BooleanKind) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn split(&self, _shape: &Shape, _tool: &Shape) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn defeature(&self, _shape: &Shape, _faces_to_remove: &[FaceId]) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn fillet(&self, _shape: &Shape, _radius: f64) -> CadResult<Shape> {
        Self::unavailable()
    }

    fn edges(&self, _shape: &Shape) -> CadResult<Vec<EdgeInfo>> {
        Self::unavailable()
    }

    fn faces(&self, _shape: &Shape) -> CadResult<Vec<FaceInfo>> {
        Self::unavailable()
    }

    fn tessellate(&self, _shape: &Shape, _tolerance: f64) -> CadResult<TessellatedMesh> {
        Self::unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_info_derives_midpoint_and_length() {
        let id = EdgeId::new(Uuid::new_v4(), 0);
        let info = EdgeInfo::new(id, DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(info.midpoint, DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(info.length, 2.0);
    }

    #[test]
    fn null_kernel_reports_unavailable() {
        let kernel = NullKernel;
        assert!(!kernel.is_available());
        assert!(matches!(
            kernel.create_box(1.0, 1.0, 1.0),
            Err(CadError::KernelNotAvailable(_))
        ));
        let shape = Shape::new(Uuid::new_v4());
        assert!(kernel.fillet(&shape, 0.5).is_err());
    }
}
