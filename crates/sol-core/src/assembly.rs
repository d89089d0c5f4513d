//! Assembly aggregation
//!
//! An assembly owns no geometry of its own. Its components are exactly its
//! children: the component operations delegate to the generic hierarchy
//! operations, so no separate bookkeeping list can drift out of sync with
//! the tree. Metrics are recomputed from the current children on every
//! call.

use crate::primitive::SolutionKind;
use crate::solution::Solution;

impl Solution {
    /// Check whether this node is an assembly
    pub fn is_assembly(&self) -> bool {
        matches!(self.kind(), SolutionKind::Assembly)
    }

    /// Add a component to this assembly
    ///
    /// Delegates to [`Solution::add_child`]; calling this on a
    /// non-assembly node is ignored.
    pub fn add_component(&self, component: &Solution) {
        if !self.is_assembly() {
            tracing::warn!(
                node = %self.id(),
                kind = self.type_name(),
                "ignoring component added to a non-assembly node"
            );
            return;
        }
        self.add_child(component);
    }

    /// Remove a component from this assembly
    pub fn remove_component(&self, component: &Solution) {
        if !self.is_assembly() {
            return;
        }
        self.remove_child(component);
    }

    /// The current components, in insertion order
    pub fn components(&self) -> Vec<Solution> {
        self.children()
    }

    /// Number of components
    pub fn component_count(&self) -> usize {
        self.child_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{BoxParams, SphereParams};
    use approx::assert_relative_eq;
    use sol_cad::kernel::MeshKernel;
    use std::f64::consts::PI;

    fn unit_box(kernel: &MeshKernel) -> Solution {
        let node = Solution::new("box", SolutionKind::Box(BoxParams::new(1.0, 1.0, 1.0)));
        node.update_geometry(kernel);
        node
    }

    fn unit_sphere(kernel: &MeshKernel) -> Solution {
        let node = Solution::new("sphere", SolutionKind::Sphere(SphereParams::new(1.0)));
        node.update_geometry(kernel);
        node
    }

    #[test]
    fn assembly_sums_component_metrics() {
        let kernel = MeshKernel::new();
        let assembly = Solution::assembly("assembly");
        assembly.add_component(&unit_box(&kernel));
        assembly.add_component(&unit_sphere(&kernel));

        assert_relative_eq!(assembly.volume(), 1.0 + 4.0 / 3.0 * PI, epsilon = 1e-12);
        assert_relative_eq!(
            assembly.surface_area(),
            6.0 + 4.0 * PI,
            epsilon = 1e-12
        );
    }

    #[test]
    fn removing_a_component_updates_metrics_and_children() {
        let kernel = MeshKernel::new();
        let assembly = Solution::assembly("assembly");
        let cube = unit_box(&kernel);
        let ball = unit_sphere(&kernel);
        assembly.add_component(&cube);
        assembly.add_component(&ball);

        assembly.remove_component(&cube);
        assert_eq!(assembly.component_count(), 1);
        assert!(!assembly.components().contains(&cube));
        assert_relative_eq!(assembly.volume(), 4.0 / 3.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn metrics_are_live_after_component_mutation() {
        let kernel = MeshKernel::new();
        let assembly = Solution::assembly("assembly");
        let cube = unit_box(&kernel);
        assembly.add_component(&cube);
        assert_relative_eq!(assembly.volume(), 1.0);

        // Mutating a component after attachment is reflected immediately
        cube.set_params(&kernel, SolutionKind::Box(BoxParams::new(2.0, 1.0, 1.0)));
        assert_relative_eq!(assembly.volume(), 2.0);
    }

    #[test]
    fn nested_assemblies_aggregate_recursively() {
        let kernel = MeshKernel::new();
        let outer = Solution::assembly("outer");
        let inner = Solution::assembly("inner");
        inner.add_component(&unit_box(&kernel));
        inner.add_component(&unit_box(&kernel));
        outer.add_component(&inner);
        outer.add_component(&unit_box(&kernel));

        assert_relative_eq!(outer.volume(), 3.0);
    }

    #[test]
    fn component_calls_on_non_assembly_nodes_are_ignored() {
        let kernel = MeshKernel::new();
        let cube = unit_box(&kernel);
        let other = unit_box(&kernel);
        cube.add_component(&other);
        assert_eq!(cube.child_count(), 0);
        assert!(other.parent().is_none());
    }

    #[test]
    fn empty_assembly_has_zero_metrics() {
        let assembly = Solution::assembly("assembly");
        assert_eq!(assembly.volume(), 0.0);
        assert_eq!(assembly.surface_area(), 0.0);
        assert!(!assembly.has_shape());
    }
}
