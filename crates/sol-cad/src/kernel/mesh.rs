//! Mesh-based kernel backend
//!
//! Pure Rust backend that represents every shape as a triangle mesh.
//! Primitive construction and affine transforms are exact at the vertex
//! level; union concatenates the operand meshes (overlapping volume is not
//! removed). The remaining boolean algebra, splitting, defeaturing, and
//! filleting require a B-Rep kernel and report `OperationFailed`.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;
use std::sync::Mutex;

use glam::{DMat3, DMat4, DVec3};
use uuid::Uuid;

use super::{
    BooleanKind, CadError, CadResult, EdgeId, EdgeInfo, FaceId, FaceInfo, GeomKernel, Shape,
    TessellatedMesh,
};

/// Segments around the axis for cylinders and cones
const RADIAL_SEGMENTS: u32 = 32;
/// Latitude bands for spheres
const SPHERE_LAT_SEGMENTS: u32 = 16;
/// Longitude segments for spheres
const SPHERE_LON_SEGMENTS: u32 = 32;
/// Segments around the main ring of a torus
const TORUS_MAJOR_SEGMENTS: u32 = 32;
/// Segments around the tube of a torus
const TORUS_MINOR_SEGMENTS: u32 = 16;

/// Triangle mesh stored per shape
#[derive(Debug, Clone, Default)]
struct MeshData {
    vertices: Vec<DVec3>,
    normals: Vec<DVec3>,
    indices: Vec<u32>,
}

/// Mesh-based geometry kernel
pub struct MeshKernel {
    /// Storage for mesh data (keyed by shape id)
    shapes: Mutex<HashMap<Uuid, MeshData>>,
}

impl MeshKernel {
    /// Create a new mesh kernel
    pub fn new() -> Self {
        Self {
            shapes: Mutex::new(HashMap::new()),
        }
    }

    /// Number of shapes currently resident in the kernel
    pub fn shape_count(&self) -> usize {
        self.shapes.lock().unwrap().len()
    }

    /// Store a mesh and return a handle to it
    fn store(&self, mesh: MeshData) -> Shape {
        let id = Uuid::new_v4();
        let mut shapes = self.shapes.lock().unwrap();
        shapes.insert(id, mesh);
        tracing::debug!(shape = %id, "stored mesh in kernel");
        Shape::new(id).with_kernel_data()
    }

    /// Get a stored mesh by handle
    fn fetch(&self, shape: &Shape) -> CadResult<MeshData> {
        let shapes = self.shapes.lock().unwrap();
        shapes
            .get(&shape.id)
            .cloned()
            .ok_or(CadError::ShapeNotFound(shape.id))
    }
}

impl Default for MeshKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl GeomKernel for MeshKernel {
    fn name(&self) -> &str {
        "mesh"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn create_box(&self, width: f64, height: f64, depth: f64) -> CadResult<Shape> {
        if !(width > 0.0 && height > 0.0 && depth > 0.0) {
            return Err(CadError::ConstructionFailed(
                "box dimensions must be positive".into(),
            ));
        }
        Ok(self.store(generate_box_mesh(width, height, depth)))
    }

    fn create_sphere(&self, radius: f64) -> CadResult<Shape> {
        if !(radius > 0.0) {
            return Err(CadError::ConstructionFailed(
                "sphere radius must be positive".into(),
            ));
        }
        Ok(self.store(generate_sphere_mesh(radius)))
    }

    fn create_cylinder(&self, radius: f64, height: f64) -> CadResult<Shape> {
        if !(radius > 0.0 && height > 0.0) {
            return Err(CadError::ConstructionFailed(
                "cylinder radius and height must be positive".into(),
            ));
        }
        Ok(self.store(generate_frustum_mesh(radius, radius, height)))
    }

    fn create_cone(&self, radius1: f64, radius2: f64, height: f64) -> CadResult<Shape> {
        if radius1 < 0.0 || radius2 < 0.0 || !(height > 0.0) {
            return Err(CadError::ConstructionFailed(
                "cone radii must be non-negative and height positive".into(),
            ));
        }
        if radius1 == 0.0 && radius2 == 0.0 {
            return Err(CadError::ConstructionFailed(
                "cone must have at least one non-zero radius".into(),
            ));
        }
        Ok(self.store(generate_frustum_mesh(radius1, radius2, height)))
    }

    fn create_torus(&self, major_radius: f64, minor_radius: f64) -> CadResult<Shape> {
        // Self-intersecting tori (minor >= major) are accepted here; the
        // document layer applies the stricter parametric rule.
        if !(major_radius > 0.0 && minor_radius > 0.0) {
            return Err(CadError::ConstructionFailed(
                "torus radii must be positive".into(),
            ));
        }
        Ok(self.store(generate_torus_mesh(major_radius, minor_radius)))
    }

    fn transform(&self, shape: &Shape, transform: &DMat4) -> CadResult<Shape> {
        let mesh = self.fetch(shape)?;
        let normal_matrix = DMat3::from_mat4(*transform).inverse().transpose();
        let transformed = MeshData {
            vertices: mesh
                .vertices
                .iter()
                .map(|v| transform.transform_point3(*v))
                .collect(),
            normals: mesh
                .normals
                .iter()
                .map(|n| (normal_matrix * *n).normalize_or_zero())
                .collect(),
            indices: mesh.indices,
        };
        Ok(self.store(transformed))
    }

    fn boolean(&self, a: &Shape, b: &Shape, kind: BooleanKind) -> CadResult<Shape> {
        match kind {
            BooleanKind::Union => {
                let mut merged = self.fetch(a)?;
                let other = self.fetch(b)?;
                let offset = merged.vertices.len() as u32;
                merged.vertices.extend(other.vertices);
                merged.normals.extend(other.normals);
                merged
                    .indices
                    .extend(other.indices.iter().map(|i| i + offset));
                Ok(self.store(merged))
            }
            BooleanKind::Subtract | BooleanKind::Intersect | BooleanKind::Section => {
                // Requires exact B-Rep classification of the operand volumes.
                self.fetch(a)?;
                self.fetch(b)?;
                Err(CadError::BooleanFailed(format!(
                    "{kind:?} is not supported by the mesh backend"
                )))
            }
        }
    }

    fn split(&self, shape: &Shape, tool: &Shape) -> CadResult<Shape> {
        self.fetch(shape)?;
        self.fetch(tool)?;
        Err(CadError::OperationFailed(
            "split is not supported by the mesh backend".into(),
        ))
    }

    fn defeature(&self, shape: &Shape, _faces_to_remove: &[FaceId]) -> CadResult<Shape> {
        self.fetch(shape)?;
        Err(CadError::OperationFailed(
            "defeaturing is not supported by the mesh backend".into(),
        ))
    }

    fn fillet(&self, shape: &Shape, _radius: f64) -> CadResult<Shape> {
        self.fetch(shape)?;
        Err(CadError::OperationFailed(
            "fillet is not supported by the mesh backend".into(),
        ))
    }

    fn edges(&self, shape: &Shape) -> CadResult<Vec<EdgeInfo>> {
        let mesh = self.fetch(shape)?;
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for tri in mesh.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    let id = EdgeId::new(shape.id, edges.len() as u32);
                    edges.push(EdgeInfo::new(
                        id,
                        mesh.vertices[key.0 as usize],
                        mesh.vertices[key.1 as usize],
                    ));
                }
            }
        }
        Ok(edges)
    }

    fn faces(&self, shape: &Shape) -> CadResult<Vec<FaceInfo>> {
        let mesh = self.fetch(shape)?;
        let faces = mesh
            .indices
            .chunks_exact(3)
            .enumerate()
            .map(|(i, tri)| {
                let a = mesh.vertices[tri[0] as usize];
                let b = mesh.vertices[tri[1] as usize];
                let c = mesh.vertices[tri[2] as usize];
                let cross = (b - a).cross(c - a);
                FaceInfo::new(
                    FaceId::new(shape.id, i as u32),
                    (a + b + c) / 3.0,
                    cross,
                    cross.length() * 0.5,
                )
            })
            .collect();
        Ok(faces)
    }

    fn tessellate(&self, shape: &Shape, _tolerance: f64) -> CadResult<TessellatedMesh> {
        let mesh = self.fetch(shape)?;
        Ok(TessellatedMesh {
            vertices: mesh
                .vertices
                .iter()
                .map(|v| [v.x as f32, v.y as f32, v.z as f32])
                .collect(),
            normals: mesh
                .normals
                .iter()
                .map(|n| [n.x as f32, n.y as f32, n.z as f32])
                .collect(),
            indices: mesh.indices,
        })
    }
}

/// Generate a box mesh with one corner at the origin
///
/// 24 vertices (4 per face for proper normals), 12 triangles.
fn generate_box_mesh(width: f64, height: f64, depth: f64) -> MeshData {
    let (w, h, d) = (width, height, depth);
    let mut mesh = MeshData::default();

    let mut add_face = |corners: [[f64; 3]; 4], normal: [f64; 3]| {
        let base = mesh.vertices.len() as u32;
        for corner in corners {
            mesh.vertices.push(DVec3::from_array(corner));
            mesh.normals.push(DVec3::from_array(normal));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    };

    // +X face
    add_face(
        [[w, 0.0, 0.0], [w, h, 0.0], [w, h, d], [w, 0.0, d]],
        [1.0, 0.0, 0.0],
    );
    // -X face
    add_face(
        [[0.0, h, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, d], [0.0, h, d]],
        [-1.0, 0.0, 0.0],
    );
    // +Y face
    add_face(
        [[w, h, 0.0], [0.0, h, 0.0], [0.0, h, d], [w, h, d]],
        [0.0, 1.0, 0.0],
    );
    // -Y face
    add_face(
        [[0.0, 0.0, 0.0], [w, 0.0, 0.0], [w, 0.0, d], [0.0, 0.0, d]],
        [0.0, -1.0, 0.0],
    );
    // +Z face (top)
    add_face(
        [[0.0, 0.0, d], [w, 0.0, d], [w, h, d], [0.0, h, d]],
        [0.0, 0.0, 1.0],
    );
    // -Z face (bottom)
    add_face(
        [[0.0, h, 0.0], [w, h, 0.0], [w, 0.0, 0.0], [0.0, 0.0, 0.0]],
        [0.0, 0.0, -1.0],
    );

    mesh
}

/// Generate a UV sphere mesh centered at the origin
fn generate_sphere_mesh(radius: f64) -> MeshData {
    let mut mesh = MeshData::default();
    let (lat_segments, lon_segments) = (SPHERE_LAT_SEGMENTS, SPHERE_LON_SEGMENTS);

    for lat in 0..=lat_segments {
        let theta = (lat as f64 / lat_segments as f64) * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..=lon_segments {
            let phi = (lon as f64 / lon_segments as f64) * 2.0 * PI;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let dir = DVec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta);
            mesh.vertices.push(dir * radius);
            mesh.normals.push(dir);
        }
    }

    for lat in 0..lat_segments {
        for lon in 0..lon_segments {
            let current = lat * (lon_segments + 1) + lon;
            let next = current + lon_segments + 1;
            mesh.indices
                .extend_from_slice(&[current, next, current + 1, current + 1, next, next + 1]);
        }
    }

    mesh
}

/// Generate a frustum mesh: base radius `r1` at z = 0, top radius `r2` at
/// z = `height`
///
/// A cylinder is the `r1 == r2` special case. Caps are emitted only for
/// rings with non-zero radius.
fn generate_frustum_mesh(r1: f64, r2: f64, height: f64) -> MeshData {
    let mut mesh = MeshData::default();
    let segments = RADIAL_SEGMENTS;

    // Side vertices, bottom and top ring interleaved
    for i in 0..=segments {
        let theta = (i as f64 / segments as f64) * 2.0 * PI;
        let (sin, cos) = theta.sin_cos();
        // Slant normal is constant along the ruling: radial component
        // scales with height, z component with the radius difference.
        let normal = DVec3::new(cos * height, sin * height, r1 - r2).normalize_or_zero();

        mesh.vertices.push(DVec3::new(r1 * cos, r1 * sin, 0.0));
        mesh.normals.push(normal);
        mesh.vertices.push(DVec3::new(r2 * cos, r2 * sin, height));
        mesh.normals.push(normal);
    }

    for i in 0..segments {
        let base = i * 2;
        mesh.indices.extend_from_slice(&[
            base,
            base + 2,
            base + 1,
            base + 1,
            base + 2,
            base + 3,
        ]);
    }

    // Caps
    for (radius, z, normal_z) in [(r1, 0.0, -1.0), (r2, height, 1.0)] {
        if radius == 0.0 {
            continue;
        }
        let normal = DVec3::new(0.0, 0.0, normal_z);
        let center = mesh.vertices.len() as u32;
        mesh.vertices.push(DVec3::new(0.0, 0.0, z));
        mesh.normals.push(normal);

        let rim_start = mesh.vertices.len() as u32;
        for i in 0..=segments {
            let theta = (i as f64 / segments as f64) * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            mesh.vertices.push(DVec3::new(radius * cos, radius * sin, z));
            mesh.normals.push(normal);
        }
        for i in 0..segments {
            if normal_z > 0.0 {
                mesh.indices
                    .extend_from_slice(&[center, rim_start + i, rim_start + i + 1]);
            } else {
                mesh.indices
                    .extend_from_slice(&[center, rim_start + i + 1, rim_start + i]);
            }
        }
    }

    mesh
}

/// Generate a torus mesh centered at the origin, tube circling the Z axis
fn generate_torus_mesh(major_radius: f64, minor_radius: f64) -> MeshData {
    let mut mesh = MeshData::default();
    let (major_segments, minor_segments) = (TORUS_MAJOR_SEGMENTS, TORUS_MINOR_SEGMENTS);

    for i in 0..=major_segments {
        let u = (i as f64 / major_segments as f64) * 2.0 * PI;
        let (sin_u, cos_u) = u.sin_cos();

        for j in 0..=minor_segments {
            let v = (j as f64 / minor_segments as f64) * 2.0 * PI;
            let (sin_v, cos_v) = v.sin_cos();

            let ring = major_radius + minor_radius * cos_v;
            mesh.vertices
                .push(DVec3::new(ring * cos_u, ring * sin_u, minor_radius * sin_v));
            mesh.normals
                .push(DVec3::new(cos_v * cos_u, cos_v * sin_u, sin_v));
        }
    }

    for i in 0..major_segments {
        for j in 0..minor_segments {
            let current = i * (minor_segments + 1) + j;
            let next = current + minor_segments + 1;
            mesh.indices
                .extend_from_slice(&[current, next, current + 1, current + 1, next, next + 1]);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn box_mesh_spans_requested_dimensions() {
        let mesh = generate_box_mesh(2.0, 4.0, 6.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);

        let mut min = DVec3::splat(f64::MAX);
        let mut max = DVec3::splat(f64::MIN);
        for v in &mesh.vertices {
            min = min.min(*v);
            max = max.max(*v);
        }
        assert_eq!(min, DVec3::ZERO);
        assert_eq!(max, DVec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let mesh = generate_sphere_mesh(1.5);
        for v in &mesh.vertices {
            assert_relative_eq!(v.length(), 1.5, epsilon = 1e-12);
        }
        assert!(mesh.indices.len() % 3 == 0);
    }

    #[test]
    fn cone_with_apex_has_single_cap() {
        let full = generate_frustum_mesh(2.0, 1.0, 3.0);
        let apex = generate_frustum_mesh(2.0, 0.0, 3.0);
        assert!(apex.vertices.len() < full.vertices.len());
    }

    #[test]
    fn construction_rejects_degenerate_parameters() {
        let kernel = MeshKernel::new();
        assert!(kernel.create_box(-1.0, 1.0, 1.0).is_err());
        assert!(kernel.create_sphere(0.0).is_err());
        assert!(kernel.create_cylinder(1.0, f64::NAN).is_err());
        assert!(kernel.create_cone(0.0, 0.0, 1.0).is_err());
        assert!(kernel.create_torus(1.0, 0.0).is_err());
        assert_eq!(kernel.shape_count(), 0);
    }

    #[test]
    fn transform_copies_instead_of_mutating() {
        let kernel = MeshKernel::new();
        let original = kernel.create_box(1.0, 1.0, 1.0).unwrap();
        let moved = kernel
            .transform(&original, &DMat4::from_translation(DVec3::new(5.0, 0.0, 0.0)))
            .unwrap();

        assert_ne!(original.id, moved.id);
        // Both handles stay resolvable
        let before = kernel.tessellate(&original, 0.1).unwrap();
        let after = kernel.tessellate(&moved, 0.1).unwrap();
        assert_eq!(before.vertices.len(), after.vertices.len());
        let shift = f64::from(after.vertices[0][0] - before.vertices[0][0]);
        assert_relative_eq!(shift, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn union_concatenates_meshes() {
        let kernel = MeshKernel::new();
        let a = kernel.create_box(1.0, 1.0, 1.0).unwrap();
        let b = kernel.create_sphere(1.0).unwrap();
        let fused = kernel.boolean(&a, &b, BooleanKind::Union).unwrap();

        let mesh_a = kernel.tessellate(&a, 0.1).unwrap();
        let mesh_b = kernel.tessellate(&b, 0.1).unwrap();
        let merged = kernel.tessellate(&fused, 0.1).unwrap();
        assert_eq!(
            merged.vertices.len(),
            mesh_a.vertices.len() + mesh_b.vertices.len()
        );
        assert_eq!(
            merged.triangle_count(),
            mesh_a.triangle_count() + mesh_b.triangle_count()
        );
    }

    #[test]
    fn subtract_reports_unsupported() {
        let kernel = MeshKernel::new();
        let a = kernel.create_box(1.0, 1.0, 1.0).unwrap();
        let b = kernel.create_box(1.0, 1.0, 1.0).unwrap();
        assert!(matches!(
            kernel.boolean(&a, &b, BooleanKind::Subtract),
            Err(CadError::BooleanFailed(_))
        ));
    }

    #[test]
    fn unknown_handle_is_reported() {
        let kernel = MeshKernel::new();
        let ghost = Shape::new(Uuid::new_v4());
        assert!(matches!(
            kernel.transform(&ghost, &DMat4::IDENTITY),
            Err(CadError::ShapeNotFound(_))
        ));
    }

    #[test]
    fn edges_are_deduplicated() {
        let kernel = MeshKernel::new();
        let cube = kernel.create_box(1.0, 1.0, 1.0).unwrap();
        let edges = kernel.edges(&cube).unwrap();
        // 6 faces * 4 rim edges + 6 face diagonals, each counted once per
        // shared vertex pair; faces do not share vertices in this layout.
        assert_eq!(edges.len(), 30);
        for edge in &edges {
            assert!(edge.length > 0.0);
            assert_eq!(edge.id.shape_id, cube.id);
        }
    }

    #[test]
    fn faces_report_area_and_normal() {
        let kernel = MeshKernel::new();
        let cube = kernel.create_box(2.0, 2.0, 2.0).unwrap();
        let faces = kernel.faces(&cube).unwrap();
        assert_eq!(faces.len(), 12);
        let total: f64 = faces.iter().map(|f| f.area).sum();
        assert_relative_eq!(total, 24.0, epsilon = 1e-12);
    }
}
