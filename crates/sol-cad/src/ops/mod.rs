//! Shape operation layer
//!
//! Combines and modifies raw shape handles independently of the document
//! tree. Every operation is total: a missing input, a degenerate argument,
//! or a kernel failure yields `None`, never an error. Callers treat an
//! empty result as the uniform failure signal.

use glam::{DMat4, DQuat, DVec3};

use crate::kernel::{BooleanKind, FaceId, GeomKernel, Shape};

/// Orchestrates kernel operations on raw shapes
pub struct ShapeOps<'k> {
    kernel: &'k dyn GeomKernel,
}

impl<'k> ShapeOps<'k> {
    /// Create a new operation layer over the given kernel
    pub fn new(kernel: &'k dyn GeomKernel) -> Self {
        Self { kernel }
    }

    fn boolean(&self, a: Option<&Shape>, b: Option<&Shape>, kind: BooleanKind) -> Option<Shape> {
        self.kernel.boolean(a?, b?, kind).ok()
    }

    /// Fuse two shapes into one
    pub fn union(&self, a: Option<&Shape>, b: Option<&Shape>) -> Option<Shape> {
        self.boolean(a, b, BooleanKind::Union)
    }

    /// Cut the second shape out of the first
    pub fn subtract(&self, a: Option<&Shape>, b: Option<&Shape>) -> Option<Shape> {
        self.boolean(a, b, BooleanKind::Subtract)
    }

    /// Keep only the common volume of two shapes
    pub fn intersect(&self, a: Option<&Shape>, b: Option<&Shape>) -> Option<Shape> {
        self.boolean(a, b, BooleanKind::Intersect)
    }

    /// Build the intersection contour of two shapes
    pub fn section(&self, a: Option<&Shape>, b: Option<&Shape>) -> Option<Shape> {
        self.boolean(a, b, BooleanKind::Section)
    }

    /// Split a shape with a tool shape
    pub fn split(&self, shape: Option<&Shape>, tool: Option<&Shape>) -> Option<Shape> {
        self.kernel.split(shape?, tool?).ok()
    }

    /// Remove the listed faces from a shape
    ///
    /// An empty face list short-circuits to `None` without touching the
    /// kernel.
    pub fn defeature(&self, shape: Option<&Shape>, faces_to_remove: &[FaceId]) -> Option<Shape> {
        let shape = shape?;
        if faces_to_remove.is_empty() {
            return None;
        }
        self.kernel.defeature(shape, faces_to_remove).ok()
    }

    /// Round every edge of a shape with a uniform radius
    pub fn fillet(&self, shape: Option<&Shape>, radius: f64) -> Option<Shape> {
        let shape = shape?;
        if !(radius > 0.0) {
            return None;
        }
        self.kernel.fillet(shape, radius).ok()
    }

    /// Translate a shape by the given offsets
    pub fn translate(&self, shape: Option<&Shape>, dx: f64, dy: f64, dz: f64) -> Option<Shape> {
        let transform = DMat4::from_translation(DVec3::new(dx, dy, dz));
        self.kernel.transform(shape?, &transform).ok()
    }

    /// Rotate a shape by `angle` radians about an axis through the origin
    ///
    /// A zero-length axis yields `None`.
    pub fn rotate(&self, shape: Option<&Shape>, angle: f64, axis: DVec3) -> Option<Shape> {
        let shape = shape?;
        let axis = axis.try_normalize()?;
        let transform = DMat4::from_quat(DQuat::from_axis_angle(axis, angle));
        self.kernel.transform(shape, &transform).ok()
    }

    /// Scale a shape about the origin
    pub fn scale(&self, shape: Option<&Shape>, sx: f64, sy: f64, sz: f64) -> Option<Shape> {
        let transform = DMat4::from_scale(DVec3::new(sx, sy, sz));
        self.kernel.transform(shape?, &transform).ok()
    }
}
