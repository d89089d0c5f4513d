//! Node construction surface
//!
//! The factory pairs a geometry kernel with the node constructors so that
//! primitives come out fully formed: parameters set, kernel shape built
//! (when the parameters allow), frame at the origin.

use std::sync::Arc;

use sol_cad::kernel::{GeomKernel, default_kernel};

use crate::primitive::{
    BoxParams, ConeParams, CylinderParams, SolutionKind, SphereParams, TorusParams,
};
use crate::solution::Solution;

/// Creates solution nodes backed by a shared geometry kernel
pub struct SolutionFactory {
    kernel: Arc<dyn GeomKernel>,
}

impl SolutionFactory {
    /// Create a factory over the given kernel
    pub fn new(kernel: Arc<dyn GeomKernel>) -> Self {
        Self { kernel }
    }

    /// Create a factory over the default kernel
    pub fn with_default_kernel() -> Self {
        Self::new(Arc::from(default_kernel()))
    }

    /// The kernel used for construction and later mutations
    pub fn kernel(&self) -> &dyn GeomKernel {
        self.kernel.as_ref()
    }

    fn primitive(&self, name: impl Into<String>, kind: SolutionKind) -> Solution {
        let node = Solution::new(name, kind);
        node.update_geometry(self.kernel());
        node
    }

    /// Create a box node
    pub fn create_box(
        &self,
        name: impl Into<String>,
        width: f64,
        height: f64,
        depth: f64,
    ) -> Solution {
        self.primitive(name, SolutionKind::Box(BoxParams::new(width, height, depth)))
    }

    /// Create a sphere node
    pub fn create_sphere(&self, name: impl Into<String>, radius: f64) -> Solution {
        self.primitive(name, SolutionKind::Sphere(SphereParams::new(radius)))
    }

    /// Create a cylinder node
    pub fn create_cylinder(&self, name: impl Into<String>, radius: f64, height: f64) -> Solution {
        self.primitive(
            name,
            SolutionKind::Cylinder(CylinderParams::new(radius, height)),
        )
    }

    /// Create a cone (frustum) node
    pub fn create_cone(
        &self,
        name: impl Into<String>,
        radius1: f64,
        radius2: f64,
        height: f64,
    ) -> Solution {
        self.primitive(
            name,
            SolutionKind::Cone(ConeParams::new(radius1, radius2, height)),
        )
    }

    /// Create a torus node
    pub fn create_torus(
        &self,
        name: impl Into<String>,
        major_radius: f64,
        minor_radius: f64,
    ) -> Solution {
        self.primitive(
            name,
            SolutionKind::Torus(TorusParams::new(major_radius, minor_radius)),
        )
    }

    /// Create an empty assembly node
    pub fn create_assembly(&self, name: impl Into<String>) -> Solution {
        Solution::assembly(name)
    }
}
