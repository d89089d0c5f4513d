//! Solution tree nodes
//!
//! A `Solution` is a cheap-to-clone handle to a reference-counted node.
//! Children are owned through such handles; the parent link is a weak
//! back-reference, so dropping the last handle to a parent automatically
//! turns its children into roots. The tree is single-threaded by design:
//! all mutation happens through `RefCell` on one thread.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use glam::{DMat4, DQuat, DVec3};
use uuid::Uuid;

use sol_cad::kernel::{GeomKernel, Shape};

use crate::frame::Frame;
use crate::primitive::SolutionKind;

struct SolutionData {
    id: Uuid,
    name: String,
    kind: SolutionKind,
    frame: Frame,
    shape: Option<Shape>,
    visible: bool,
    locked: bool,
    parent: Weak<RefCell<SolutionData>>,
    children: Vec<Solution>,
}

impl Drop for SolutionData {
    fn drop(&mut self) {
        // Children outlive this node when held elsewhere; sever their
        // back-references so they become roots.
        for child in &self.children {
            child.inner.borrow_mut().parent = Weak::new();
        }
    }
}

/// Handle to a node in the document tree
///
/// Cloning the handle shares the node; the node is reclaimed when the last
/// handle (external or parental) is dropped.
#[derive(Clone)]
pub struct Solution {
    inner: Rc<RefCell<SolutionData>>,
}

impl Solution {
    /// Create a detached node of the given kind
    ///
    /// No geometry is built here; call [`Solution::update_geometry`] (or
    /// use the factory) to construct the kernel shape.
    pub fn new(name: impl Into<String>, kind: SolutionKind) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SolutionData {
                id: Uuid::new_v4(),
                name: name.into(),
                kind,
                frame: Frame::default(),
                shape: None,
                visible: true,
                locked: false,
                parent: Weak::new(),
                children: Vec::new(),
            })),
        }
    }

    /// Create an empty assembly node
    pub fn assembly(name: impl Into<String>) -> Self {
        Self::new(name, SolutionKind::Assembly)
    }

    /// Create a custom node that manages its shape externally
    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(name, SolutionKind::Custom)
    }

    /// Check whether two handles refer to the same node
    pub fn ptr_eq(a: &Solution, b: &Solution) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    // ========== Basic properties ==========

    /// Process-unique identifier, stable for the node's lifetime
    pub fn id(&self) -> Uuid {
        self.inner.borrow().id
    }

    /// Display name
    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    /// Set the display name
    pub fn set_name(&self, name: impl Into<String>) {
        self.inner.borrow_mut().name = name.into();
    }

    /// The node's variant and parameters
    pub fn kind(&self) -> SolutionKind {
        self.inner.borrow().kind
    }

    /// Type tag of the node's variant
    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    /// Visibility flag; has no effect on geometry
    pub fn is_visible(&self) -> bool {
        self.inner.borrow().visible
    }

    pub fn set_visible(&self, visible: bool) {
        self.inner.borrow_mut().visible = visible;
    }

    /// Lock flag; has no effect on geometry
    pub fn is_locked(&self) -> bool {
        self.inner.borrow().locked
    }

    pub fn set_locked(&self, locked: bool) {
        self.inner.borrow_mut().locked = locked;
    }

    /// The node's local coordinate frame
    pub fn frame(&self) -> Frame {
        self.inner.borrow().frame
    }

    /// Current cached shape handle, if geometry exists
    pub fn shape(&self) -> Option<Shape> {
        self.inner.borrow().shape.clone()
    }

    /// Check whether the node currently has kernel geometry
    pub fn has_shape(&self) -> bool {
        self.inner.borrow().shape.is_some()
    }

    /// Attach an externally built shape to a custom node
    pub fn set_shape(&self, shape: Option<Shape>) {
        self.inner.borrow_mut().shape = shape;
    }

    // ========== Hierarchy ==========

    /// Parent node, if attached
    pub fn parent(&self) -> Option<Solution> {
        self.inner
            .borrow()
            .parent
            .upgrade()
            .map(|inner| Solution { inner })
    }

    /// Snapshot of the child list, in insertion order
    pub fn children(&self) -> Vec<Solution> {
        self.inner.borrow().children.clone()
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// Attach a node as the last child of this one
    ///
    /// A node attached elsewhere is re-parented, not duplicated.
    /// Self-attachment and attaching an ancestor are ignored: either would
    /// break the forest invariant.
    pub fn add_child(&self, child: &Solution) {
        if Solution::ptr_eq(self, child) {
            tracing::warn!(node = %self.id(), "ignoring attempt to attach a node to itself");
            return;
        }
        if child.is_ancestor_of(self) {
            tracing::warn!(
                node = %self.id(),
                child = %child.id(),
                "ignoring attach that would create a cycle"
            );
            return;
        }

        child.detach();
        self.inner.borrow_mut().children.push(child.clone());
        child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
    }

    /// Remove a direct child, turning it into a root
    ///
    /// A node that is not a child of this one is ignored.
    pub fn remove_child(&self, child: &Solution) {
        let removed = {
            let mut data = self.inner.borrow_mut();
            let before = data.children.len();
            data.children.retain(|c| !Solution::ptr_eq(c, child));
            data.children.len() != before
        };
        if removed {
            child.inner.borrow_mut().parent = Weak::new();
        }
    }

    /// Detach this node from its parent, if any
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }

    /// Root of the tree this node belongs to (itself when detached)
    pub fn root(&self) -> Solution {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// All ancestors, nearest first
    pub fn ancestors(&self) -> Vec<Solution> {
        let mut ancestors = Vec::new();
        let mut current = self.parent();
        while let Some(node) = current {
            current = node.parent();
            ancestors.push(node);
        }
        ancestors
    }

    /// All descendants, depth-first
    pub fn descendants(&self) -> Vec<Solution> {
        let mut result = Vec::new();
        for child in self.children() {
            result.push(child.clone());
            result.extend(child.descendants());
        }
        result
    }

    /// Check if this node is an ancestor of another
    pub fn is_ancestor_of(&self, other: &Solution) -> bool {
        let mut current = other.parent();
        while let Some(node) = current {
            if Solution::ptr_eq(&node, self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Accumulated frame from the root down to this node
    pub fn absolute_frame(&self) -> Frame {
        let local = self.frame();
        match self.parent() {
            Some(parent) => Frame::compose(parent.absolute_frame(), local),
            None => local,
        }
    }

    // ========== Frame mutation and geometry ==========

    /// Replace the position and re-apply the frame to the cached shape
    pub fn set_position(&self, kernel: &dyn GeomKernel, position: DVec3) {
        self.inner.borrow_mut().frame.position = position;
        self.resync(kernel);
    }

    /// Replace the orientation triple and re-apply the frame to the cached
    /// shape
    pub fn set_orientation(&self, kernel: &dyn GeomKernel, orientation: DVec3) {
        self.inner.borrow_mut().frame.orientation = orientation;
        self.resync(kernel);
    }

    /// Replace the whole frame and re-apply it to the cached shape
    pub fn set_frame(&self, kernel: &dyn GeomKernel, frame: Frame) {
        self.inner.borrow_mut().frame = frame;
        self.resync(kernel);
    }

    /// Shift the position by the given offsets
    pub fn translate(&self, kernel: &dyn GeomKernel, dx: f64, dy: f64, dz: f64) {
        self.inner.borrow_mut().frame.position += DVec3::new(dx, dy, dz);
        self.resync(kernel);
    }

    /// Rotate the orientation triple by `angle` radians about `axis`
    /// through the node's position
    ///
    /// A degenerate axis is not validated and degenerates the orientation.
    pub fn rotate(&self, kernel: &dyn GeomKernel, angle: f64, axis: DVec3) {
        {
            let mut data = self.inner.borrow_mut();
            let rotation = DQuat::from_axis_angle(axis.normalize(), angle);
            data.frame.orientation = rotation * data.frame.orientation;
        }
        self.resync(kernel);
    }

    /// Scale the cached shape about the node's position
    ///
    /// The frame is deliberately left untouched: scale is baked into the
    /// geometry, not kept as re-applyable state.
    pub fn scale(&self, kernel: &dyn GeomKernel, sx: f64, sy: f64, sz: f64) {
        let (shape, transform) = {
            let data = self.inner.borrow();
            let Some(shape) = data.shape.clone() else {
                return;
            };
            let pivot = data.frame.position;
            let transform = DMat4::from_translation(pivot)
                * DMat4::from_scale(DVec3::new(sx, sy, sz))
                * DMat4::from_translation(-pivot);
            (shape, transform)
        };
        self.inner.borrow_mut().shape = kernel.transform(&shape, &transform).ok();
    }

    /// Rebuild the cached shape from the node's parameters
    ///
    /// Invalid parameters and kernel failures both leave the node without
    /// geometry; metrics remain readable either way. The current frame is
    /// applied to the freshly built base shape.
    pub fn update_geometry(&self, kernel: &dyn GeomKernel) {
        let kind = self.kind();
        let base = kind.construct(kernel);
        tracing::debug!(
            node = %self.id(),
            kind = kind.type_name(),
            built = base.is_some(),
            "regenerated geometry"
        );
        self.inner.borrow_mut().shape = base;
        self.resync(kernel);
    }

    /// Replace a primitive's parameters and regenerate its geometry
    pub fn set_params(&self, kernel: &dyn GeomKernel, kind: SolutionKind) {
        self.inner.borrow_mut().kind = kind;
        self.update_geometry(kernel);
    }

    /// Re-apply the node's frame to the cached shape
    ///
    /// With no cached shape this is a no-op; geometry is built fresh on the
    /// next `update_geometry`. Otherwise the kernel transforms a copy of
    /// the current shape, so handles held elsewhere stay valid. A kernel
    /// failure leaves the node without geometry.
    fn resync(&self, kernel: &dyn GeomKernel) {
        let (shape, transform) = {
            let data = self.inner.borrow();
            match &data.shape {
                Some(shape) => (shape.clone(), data.frame.to_transform()),
                None => return,
            }
        };
        self.inner.borrow_mut().shape = kernel.transform(&shape, &transform).ok();
    }

    // ========== Derived metrics ==========

    /// Volume: closed-form for primitives, child sum for assemblies
    pub fn volume(&self) -> f64 {
        let data = self.inner.borrow();
        match data.kind {
            SolutionKind::Assembly => data.children.iter().map(|c| c.volume()).sum(),
            kind => kind.volume(),
        }
    }

    /// Surface area: closed-form for primitives, child sum for assemblies
    pub fn surface_area(&self) -> f64 {
        let data = self.inner.borrow();
        match data.kind {
            SolutionKind::Assembly => data.children.iter().map(|c| c.surface_area()).sum(),
            kind => kind.surface_area(),
        }
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        Solution::ptr_eq(self, other)
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(data) => f
                .debug_struct("Solution")
                .field("id", &data.id)
                .field("name", &data.name)
                .field("kind", &data.kind.type_name())
                .field("children", &data.children.len())
                .finish(),
            Err(_) => f.write_str("Solution(<borrowed>)"),
        }
    }
}
