// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The symbol table subsystem.
//!
//! Naming and binding follow the source language's execution model: local,
//! enclosing, module, and builtin scopes, with explicit `global` and
//! `nonlocal` overrides, class scopes transparent to nested functions,
//! comprehension scopes that evaluate their outermost iterable one scope
//! up, and parameter defaults evaluated in the enclosing scope.
//!
//! # Entry point
//!
//! Build a [`SymbolTableBuilder`] for one [`SourceFile`], optionally wire
//! in a [`StubIndex`] and a [`GlobalSymbolIndex`], then call
//! [`SymbolTableBuilder::build`] with the parsed tree. The returned
//! [`SymbolTable`] answers all rule queries: the symbol of a name node,
//! the locals of a scope anchor, class and instance fields, inferred
//! expression types, and unresolved-import flags.

mod ambiguity;
mod binding;
mod builder;
mod inference;
mod reference;
mod scope;
mod stubs;
mod symbol;

pub use builder::{SymbolTable, SymbolTableBuilder};
pub use inference::{BuiltinTag, InferredType};
pub use scope::{Scope, ScopeId, ScopeKind};
pub use stubs::{
    ClassDescriptor, DescriptorKind, FunctionDescriptor, GlobalSymbolIndex, IndexError,
    SourceFile, StubIndex, StubParameter, SymbolDescriptor, BUILTIN_NAMES,
};
pub use symbol::{
    ClassData, FunctionData, MemberLookup, ParameterDescriptor, Symbol, SymbolId, SymbolKind,
    Usage, UsageKind,
};
