//! Interval tree module
//!
//! This module provides the augmented AVL tree that backs each key's entry
//! set, supporting overlap search with subtree pruning.

/// The augmented AVL implementation
pub mod avl;

// Re-export key types
pub use avl::{IntervalTree, TreeDefect};
