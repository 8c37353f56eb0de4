// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for tree traversal.
//!
//! The design follows a hybrid approach: macro-generated trait method
//! signatures with manual walk implementations per node kind.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_*` methods
//! - Children are visited in source order (left-to-right, top-to-bottom)
//!
//! # Example
//!
//! ```
//! use pysema::nodes::{Name, TreeBuilder};
//! use pysema::visitor::{walk_file_input, VisitResult, Visitor};
//!
//! struct NameCounter {
//!     count: usize,
//! }
//!
//! impl<'a> Visitor<'a> for NameCounter {
//!     fn visit_name(&mut self, _node: &'a Name) -> VisitResult {
//!         self.count += 1;
//!         VisitResult::Continue
//!     }
//! }
//!
//! let mut t = TreeBuilder::new();
//! let x = t.name("x");
//! let y = t.name("y");
//! let stmt = t.assign(vec![x], y);
//! let tree = t.file_input(vec![stmt]);
//!
//! let mut counter = NameCounter { count: 0 };
//! walk_file_input(&mut counter, &tree);
//! assert_eq!(counter.count, 2);
//! ```

mod dispatch;
mod traits;

pub use dispatch::*;
pub use traits::{VisitResult, Visitor};
