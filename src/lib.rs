// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Semantic analysis core for Python static analysis.
//!
//! This crate takes the parsed syntax tree of a single Python module and
//! builds a symbol table: scopes, name bindings, resolved reads, class
//! models (including instance attributes discovered through `self.x`
//! assignments), and shallow inferred types. The result is a set of
//! queryable side tables keyed by node identity, ready for lint rules to
//! consume without reparsing.
//!
//! # Pipeline
//!
//! [`SymbolTableBuilder::build`] runs three synchronous tree traversals
//! plus a fix-up pass:
//!
//! 1. **Binding pass** - creates scopes and records every name binding
//!    (definitions, parameters, imports, assignment targets).
//! 2. **Reference pass** - resolves every read to a symbol in the visible
//!    scope chain and records qualified-name child usages.
//! 3. **Disambiguation** - names bound to multiple definitions collapse
//!    into ambiguous symbols; class members are attached.
//! 4. **Inference pass** - computes an [`InferredType`] per expression and
//!    finalizes function parameter types from annotations.
//!
//! # Quick Start
//!
//! ```
//! use pysema::nodes::TreeBuilder;
//! use pysema::semantic::{SourceFile, SymbolKind, SymbolTableBuilder};
//!
//! let mut t = TreeBuilder::new();
//! let x = t.name("x");
//! let one = t.int("1");
//! let assign = t.assign(vec![x], one);
//! let tree = t.file_input(vec![assign]);
//!
//! let file = SourceFile::new("mod.py", "");
//! let table = SymbolTableBuilder::new(&file).build(&tree);
//!
//! let module = table.module_scope();
//! let sym = table.symbol(module.symbol("x").unwrap());
//! assert_eq!(sym.kind(), SymbolKind::Other);
//! assert_eq!(sym.fully_qualified_name(), Some("mod.x"));
//! ```
//!
//! # What this crate is not
//!
//! There is no lexer or parser here; trees are produced by an external
//! parser through [`nodes::TreeBuilder`]. There is no full type inferencer
//! either: inference is a shallow, best-effort pass that answers "what
//! builtin type can this be" and "can this value have this member", and
//! degrades to `Any` whenever uncertain.

/// Syntax tree nodes and the tree construction API.
pub mod nodes;

/// Visitor infrastructure for tree traversal.
pub mod visitor;

/// The symbol table subsystem: scopes, symbols, passes, and indices.
pub mod semantic;

pub use nodes::{NodeId, Span, TreeBuilder};
pub use semantic::{
    GlobalSymbolIndex, IndexError, InferredType, MemberLookup, Scope, ScopeId, ScopeKind,
    SourceFile, StubIndex, Symbol, SymbolDescriptor, SymbolId, SymbolKind, SymbolTable,
    SymbolTableBuilder, Usage, UsageKind,
};
pub use visitor::{VisitResult, Visitor};
