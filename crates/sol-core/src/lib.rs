//! Core CAD Document Model
//!
//! This crate contains the document-side data structures:
//! - Frame: position and orientation of a node
//! - Solution: hierarchical tree node with kernel-backed geometry
//! - Primitive parameter types with closed-form metrics
//! - Assembly aggregation over child nodes
//! - SolutionFactory: construction surface over a geometry kernel

pub mod assembly;
pub mod factory;
pub mod frame;
pub mod primitive;
pub mod solution;

pub use factory::SolutionFactory;
pub use frame::Frame;
pub use primitive::{
    BoxParams, ConeParams, CylinderParams, SolutionKind, SphereParams, TorusParams,
};
pub use solution::Solution;
