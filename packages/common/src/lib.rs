//! Shared traversal utilities for lesson document trees.

pub mod visitor;

pub use visitor::*;
