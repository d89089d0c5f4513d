//! Primitive parameter types and the closed variant set of tree nodes
//!
//! Each primitive validates its own parameters and computes volume and
//! surface area from closed-form formulas. The formulas never consult the
//! kernel and do not gate on validity, so metrics stay readable even when
//! no geometry could be built.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use sol_cad::kernel::{GeomKernel, Shape};

/// Box dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxParams {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl BoxParams {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// All dimensions must be strictly positive
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.depth > 0.0
    }

    pub fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }

    pub fn surface_area(&self) -> f64 {
        2.0 * (self.width * self.height + self.width * self.depth + self.height * self.depth)
    }
}

/// Sphere radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereParams {
    pub radius: f64,
}

impl SphereParams {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn is_valid(&self) -> bool {
        self.radius > 0.0
    }

    pub fn volume(&self) -> f64 {
        (4.0 / 3.0) * PI * self.radius.powi(3)
    }

    pub fn surface_area(&self) -> f64 {
        4.0 * PI * self.radius * self.radius
    }
}

/// Cylinder radius and height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderParams {
    pub radius: f64,
    pub height: f64,
}

impl CylinderParams {
    pub fn new(radius: f64, height: f64) -> Self {
        Self { radius, height }
    }

    pub fn is_valid(&self) -> bool {
        self.radius > 0.0 && self.height > 0.0
    }

    pub fn volume(&self) -> f64 {
        PI * self.radius * self.radius * self.height
    }

    pub fn surface_area(&self) -> f64 {
        2.0 * PI * self.radius * self.radius + 2.0 * PI * self.radius * self.height
    }
}

/// Conical frustum: base radius, top radius, height
///
/// Either radius may be zero (full cone); both zero is degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeParams {
    pub radius1: f64,
    pub radius2: f64,
    pub height: f64,
}

impl ConeParams {
    pub fn new(radius1: f64, radius2: f64, height: f64) -> Self {
        Self {
            radius1,
            radius2,
            height,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.radius1 >= 0.0 && self.radius2 >= 0.0 && self.height > 0.0
    }

    pub fn volume(&self) -> f64 {
        (PI * self.height / 3.0)
            * (self.radius1 * self.radius1
                + self.radius1 * self.radius2
                + self.radius2 * self.radius2)
    }

    pub fn surface_area(&self) -> f64 {
        let slant =
            (self.height * self.height + (self.radius1 - self.radius2).powi(2)).sqrt();
        PI * (self.radius1 + self.radius2) * slant
            + PI * self.radius1 * self.radius1
            + PI * self.radius2 * self.radius2
    }
}

/// Torus: main ring radius and tube radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorusParams {
    pub major_radius: f64,
    pub minor_radius: f64,
}

impl TorusParams {
    pub fn new(major_radius: f64, minor_radius: f64) -> Self {
        Self {
            major_radius,
            minor_radius,
        }
    }

    /// The tube must be thinner than the ring it circles
    pub fn is_valid(&self) -> bool {
        self.major_radius > 0.0 && self.minor_radius > 0.0 && self.minor_radius < self.major_radius
    }

    pub fn volume(&self) -> f64 {
        2.0 * PI * PI * self.major_radius * self.minor_radius * self.minor_radius
    }

    pub fn surface_area(&self) -> f64 {
        4.0 * PI * PI * self.major_radius * self.minor_radius
    }
}

/// The closed set of node variants in the document tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SolutionKind {
    Box(BoxParams),
    Sphere(SphereParams),
    Cylinder(CylinderParams),
    Cone(ConeParams),
    Torus(TorusParams),
    Assembly,
    Custom,
}

impl SolutionKind {
    /// Get the type tag of this variant
    pub fn type_name(&self) -> &'static str {
        match self {
            SolutionKind::Box(_) => "Box",
            SolutionKind::Sphere(_) => "Sphere",
            SolutionKind::Cylinder(_) => "Cylinder",
            SolutionKind::Cone(_) => "Cone",
            SolutionKind::Torus(_) => "Torus",
            SolutionKind::Assembly => "Assembly",
            SolutionKind::Custom => "Custom",
        }
    }

    /// Check if this variant is a parametric primitive
    pub fn is_primitive(&self) -> bool {
        !matches!(self, SolutionKind::Assembly | SolutionKind::Custom)
    }

    /// Validate the variant's parameters
    ///
    /// Assemblies and custom nodes carry no parameters and are always
    /// valid.
    pub fn is_valid(&self) -> bool {
        match self {
            SolutionKind::Box(p) => p.is_valid(),
            SolutionKind::Sphere(p) => p.is_valid(),
            SolutionKind::Cylinder(p) => p.is_valid(),
            SolutionKind::Cone(p) => p.is_valid(),
            SolutionKind::Torus(p) => p.is_valid(),
            SolutionKind::Assembly | SolutionKind::Custom => true,
        }
    }

    /// Closed-form volume of a primitive; zero for non-primitives
    ///
    /// Assemblies aggregate over children at the node level instead.
    pub fn volume(&self) -> f64 {
        match self {
            SolutionKind::Box(p) => p.volume(),
            SolutionKind::Sphere(p) => p.volume(),
            SolutionKind::Cylinder(p) => p.volume(),
            SolutionKind::Cone(p) => p.volume(),
            SolutionKind::Torus(p) => p.volume(),
            SolutionKind::Assembly | SolutionKind::Custom => 0.0,
        }
    }

    /// Closed-form surface area of a primitive; zero for non-primitives
    pub fn surface_area(&self) -> f64 {
        match self {
            SolutionKind::Box(p) => p.surface_area(),
            SolutionKind::Sphere(p) => p.surface_area(),
            SolutionKind::Cylinder(p) => p.surface_area(),
            SolutionKind::Cone(p) => p.surface_area(),
            SolutionKind::Torus(p) => p.surface_area(),
            SolutionKind::Assembly | SolutionKind::Custom => 0.0,
        }
    }

    /// Build the base shape for this variant via the kernel
    ///
    /// Returns `None` for invalid parameters, non-primitive variants, and
    /// kernel construction failures alike.
    pub fn construct(&self, kernel: &dyn GeomKernel) -> Option<Shape> {
        if !self.is_valid() {
            return None;
        }
        let built = match *self {
            SolutionKind::Box(p) => kernel.create_box(p.width, p.height, p.depth),
            SolutionKind::Sphere(p) => kernel.create_sphere(p.radius),
            SolutionKind::Cylinder(p) => kernel.create_cylinder(p.radius, p.height),
            SolutionKind::Cone(p) => kernel.create_cone(p.radius1, p.radius2, p.height),
            SolutionKind::Torus(p) => kernel.create_torus(p.major_radius, p.minor_radius),
            SolutionKind::Assembly | SolutionKind::Custom => return None,
        };
        built.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sol_cad::kernel::{MeshKernel, NullKernel};

    #[test]
    fn box_metrics_match_closed_forms() {
        let params = BoxParams::new(2.0, 3.0, 4.0);
        assert!(params.is_valid());
        assert_relative_eq!(params.volume(), 24.0);
        assert_relative_eq!(params.surface_area(), 2.0 * (6.0 + 8.0 + 12.0));
    }

    #[test]
    fn sphere_metrics_match_closed_forms() {
        let params = SphereParams::new(1.0);
        assert_relative_eq!(params.volume(), 4.0 / 3.0 * PI, epsilon = 1e-12);
        assert_relative_eq!(params.surface_area(), 4.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn cylinder_formula_ignores_validity() {
        // Negative radius enters the formula squared; the metric is still
        // reported even though no geometry can exist.
        let params = CylinderParams::new(-1.0, 5.0);
        assert!(!params.is_valid());
        assert_relative_eq!(params.volume(), PI * 5.0, epsilon = 1e-12);
    }

    #[test]
    fn cone_frustum_metrics() {
        let params = ConeParams::new(2.0, 1.0, 3.0);
        assert!(params.is_valid());
        assert_relative_eq!(
            params.volume(),
            PI * 3.0 / 3.0 * (4.0 + 2.0 + 1.0),
            epsilon = 1e-12
        );
        let slant = (9.0_f64 + 1.0).sqrt();
        assert_relative_eq!(
            params.surface_area(),
            PI * 3.0 * slant + PI * 4.0 + PI,
            epsilon = 1e-12
        );
    }

    #[test]
    fn full_cone_accepts_a_zero_radius() {
        assert!(ConeParams::new(0.0, 2.0, 1.0).is_valid());
        assert!(ConeParams::new(2.0, 0.0, 1.0).is_valid());
        assert!(!ConeParams::new(1.0, 1.0, 0.0).is_valid());
    }

    #[test]
    fn torus_requires_minor_below_major() {
        assert!(TorusParams::new(5.0, 1.0).is_valid());
        assert!(!TorusParams::new(1.0, 1.0).is_valid());
        assert!(!TorusParams::new(1.0, 2.0).is_valid());

        let params = TorusParams::new(3.0, 1.0);
        assert_relative_eq!(params.volume(), 2.0 * PI * PI * 3.0, epsilon = 1e-12);
        assert_relative_eq!(params.surface_area(), 4.0 * PI * PI * 3.0, epsilon = 1e-12);
    }

    #[test]
    fn construct_skips_invalid_and_non_primitive_kinds() {
        let kernel = MeshKernel::new();
        assert!(SolutionKind::Box(BoxParams::new(1.0, 1.0, 1.0))
            .construct(&kernel)
            .is_some());
        assert!(SolutionKind::Box(BoxParams::new(-1.0, 1.0, 1.0))
            .construct(&kernel)
            .is_none());
        assert!(SolutionKind::Assembly.construct(&kernel).is_none());
        assert!(SolutionKind::Custom.construct(&kernel).is_none());
    }

    #[test]
    fn construct_absorbs_kernel_failure() {
        let kernel = NullKernel;
        let kind = SolutionKind::Sphere(SphereParams::new(1.0));
        assert!(kind.construct(&kernel).is_none());
    }
}
