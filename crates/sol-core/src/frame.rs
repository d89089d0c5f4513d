//! Coordinate frames
//!
//! A frame is the placement of a node: a position plus an orientation
//! triple. Pure value semantics; no operation here can fail.

use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// The canonical orientation triple of a freshly constructed frame
pub const DEFAULT_ORIENTATION: DVec3 = DVec3::ONE;

/// Position and orientation of a node
///
/// The orientation is a direction triple, not an Euler rotation; frames
/// combine by flat component-wise arithmetic, not composed rotations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub position: DVec3,
    pub orientation: DVec3,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: DEFAULT_ORIENTATION,
        }
    }
}

impl Frame {
    /// Create a frame at the given position with the default orientation
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: DVec3::new(x, y, z),
            ..Self::default()
        }
    }

    /// Create a frame with an explicit orientation triple
    pub fn with_orientation(x: f64, y: f64, z: f64, a: f64, b: f64, c: f64) -> Self {
        Self {
            position: DVec3::new(x, y, z),
            orientation: DVec3::new(a, b, c),
        }
    }

    /// Get the position triple
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Get the orientation triple
    pub fn orientation(&self) -> DVec3 {
        self.orientation
    }

    /// Check whether the orientation equals the canonical default
    pub fn has_default_orientation(&self) -> bool {
        self.orientation == DEFAULT_ORIENTATION
    }

    /// Distance between this frame's position and another's
    pub fn distance(&self, other: &Frame) -> f64 {
        self.position.distance(other.position)
    }

    /// Combine a parent frame with a child frame
    ///
    /// Positions add; orientation triples multiply component-wise.
    pub fn compose(parent: Frame, child: Frame) -> Frame {
        Frame {
            position: parent.position + child.position,
            orientation: parent.orientation * child.orientation,
        }
    }

    /// Convert the frame into a kernel-native affine transform
    ///
    /// Translation by position; when the orientation differs from the
    /// default, the default direction is additionally rotated onto the
    /// normalized orientation direction. Degenerate orientation triples
    /// (e.g. all-zero) are not validated and yield a degenerate matrix.
    pub fn to_transform(&self) -> DMat4 {
        let translation = DMat4::from_translation(self.position);
        if self.has_default_orientation() {
            return translation;
        }
        let rotation = DQuat::from_rotation_arc(
            DEFAULT_ORIENTATION.normalize(),
            self.orientation.normalize(),
        );
        translation * DMat4::from_quat(rotation)
    }
}

impl Add for Frame {
    type Output = Frame;

    fn add(self, other: Frame) -> Frame {
        Frame {
            position: self.position + other.position,
            orientation: self.orientation + other.orientation,
        }
    }
}

impl Sub for Frame {
    type Output = Frame;

    fn sub(self, other: Frame) -> Frame {
        Frame {
            position: self.position - other.position,
            orientation: self.orientation - other.orientation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_frame_has_default_orientation() {
        let frame = Frame::new(1.0, 2.0, 3.0);
        assert_eq!(frame.position(), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(frame.orientation(), DEFAULT_ORIENTATION);
        assert!(frame.has_default_orientation());
    }

    #[test]
    fn addition_and_subtraction_are_component_wise() {
        let a = Frame::with_orientation(1.0, 2.0, 3.0, 1.0, 1.0, 2.0);
        let b = Frame::with_orientation(0.5, 0.5, 0.5, 1.0, 2.0, 1.0);

        let sum = a + b;
        assert_eq!(sum.position, DVec3::new(1.5, 2.5, 3.5));
        assert_eq!(sum.orientation, DVec3::new(2.0, 3.0, 3.0));

        let diff = sum - b;
        assert_eq!(diff, a);
    }

    #[test]
    fn equality_compares_all_six_scalars() {
        let a = Frame::with_orientation(1.0, 2.0, 3.0, 1.0, 1.0, 1.0);
        let b = Frame::new(1.0, 2.0, 3.0);
        assert_eq!(a, b);
        let c = Frame::with_orientation(1.0, 2.0, 3.0, 1.0, 1.0, 1.0 + 1e-15);
        assert_ne!(a, c);
    }

    #[test]
    fn default_orientation_yields_pure_translation() {
        let frame = Frame::new(4.0, -2.0, 7.0);
        let transform = frame.to_transform();
        let moved = transform.transform_point3(DVec3::ZERO);
        assert_eq!(moved, DVec3::new(4.0, -2.0, 7.0));
        // No rotation part
        let unit = transform.transform_point3(DVec3::X) - moved;
        assert_eq!(unit, DVec3::X);
    }

    #[test]
    fn non_default_orientation_rotates_the_default_direction() {
        let frame = Frame::with_orientation(0.0, 0.0, 0.0, -1.0, -1.0, -1.0);
        let transform = frame.to_transform();
        let rotated = transform.transform_point3(DEFAULT_ORIENTATION.normalize());
        assert_relative_eq!(
            rotated.dot(DEFAULT_ORIENTATION.normalize()),
            -1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn composition_adds_positions_and_scales_orientations() {
        let parent = Frame::with_orientation(10.0, 0.0, 0.0, 2.0, 1.0, 1.0);
        let child = Frame::with_orientation(1.0, 1.0, 1.0, 1.0, 3.0, 1.0);
        let combined = Frame::compose(parent, child);
        assert_eq!(combined.position, DVec3::new(11.0, 1.0, 1.0));
        assert_eq!(combined.orientation, DVec3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn distance_is_positional_only() {
        let a = Frame::new(0.0, 0.0, 0.0);
        let b = Frame::with_orientation(3.0, 4.0, 0.0, 9.0, 9.0, 9.0);
        assert_relative_eq!(a.distance(&b), 5.0);
    }
}
