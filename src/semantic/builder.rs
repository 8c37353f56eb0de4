// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The symbol table and the builder that produces it.
//!
//! [`SymbolTableBuilder::build`] runs the binding pass, the reference
//! pass, disambiguation plus attachment, and the inference pass, in that
//! order, over one file. The builder owns every piece of mutable state; the
//! stub and global-symbol indices are read-only and may be shared across
//! files analyzed in parallel.
//!
//! Building is total: every input tree yields a table. Missing information
//! (unresolved imports, unknown bases, absent stubs) is encoded in the
//! table, never raised.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::nodes::{ClassDef, Expression, FileInput, FunctionDef, ImportFrom, NodeId};
use crate::semantic::ambiguity;
use crate::semantic::binding::BindingPass;
use crate::semantic::inference::{InferencePass, InferredType};
use crate::semantic::reference::ReferencePass;
use crate::semantic::scope::{Scope, ScopeId};
use crate::semantic::stubs::{GlobalSymbolIndex, SourceFile, StubIndex};
use crate::semantic::symbol::{MemberLookup, Symbol, SymbolId};

/// The result of building: scopes, symbols, and the node-keyed side tables
/// that stand in for tree annotations.
///
/// All collections are frozen once [`SymbolTableBuilder::build`] returns.
#[derive(Debug, Default)]
pub struct SymbolTable {
    pub(crate) scopes: Vec<Scope>,
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) scope_ids_by_anchor: HashMap<NodeId, ScopeId>,
    /// The `symbol()` slot of every resolved name node.
    pub(crate) symbol_ids_by_name_node: HashMap<NodeId, SymbolId>,
    /// Local symbols published per function/lambda/comprehension anchor.
    pub(crate) locals_by_anchor: HashMap<NodeId, Vec<SymbolId>>,
    pub(crate) class_fields_by_def: HashMap<NodeId, Vec<SymbolId>>,
    pub(crate) instance_fields_by_def: HashMap<NodeId, Vec<SymbolId>>,
    pub(crate) global_variables: Vec<SymbolId>,
    /// The function symbol of each `def` node that has exactly one.
    pub(crate) function_symbols_by_def: HashMap<NodeId, SymbolId>,
    pub(crate) types_by_expression: HashMap<NodeId, InferredType>,
    pub(crate) unresolved_wildcard_imports: HashSet<NodeId>,
    /// Declared types from annotated assignments, by symbol.
    pub(crate) declared_types: HashMap<SymbolId, InferredType>,
    /// Cache of symbols instantiated from index descriptors, by FQN.
    pub(crate) descriptor_symbols_by_fqn: HashMap<String, SymbolId>,
    /// Superclass FQNs awaiting resolution after a descriptor batch.
    pub(crate) pending_superclasses: Vec<(SymbolId, Vec<String>)>,
}

impl SymbolTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The symbol behind an id.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    /// The scope behind an id.
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub(crate) fn scopes_mut(&mut self) -> &mut [Scope] {
        &mut self.scopes
    }

    /// All scopes in creation order.
    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    /// The module scope.
    pub fn module_scope(&self) -> &Scope {
        &self.scopes[self.module_scope_id().index()]
    }

    /// The module scope's id. The module scope is always created first.
    pub fn module_scope_id(&self) -> ScopeId {
        debug_assert!(!self.scopes.is_empty(), "no module scope was created");
        ScopeId(0)
    }

    /// The scope anchored at the given node, if any.
    pub fn scope_at(&self, anchor: NodeId) -> Option<ScopeId> {
        self.scope_ids_by_anchor.get(&anchor).copied()
    }

    /// The symbol slot of a name node.
    pub fn symbol_id_of(&self, node: NodeId) -> Option<SymbolId> {
        self.symbol_ids_by_name_node.get(&node).copied()
    }

    /// The symbol of a name node, if resolution succeeded.
    pub fn symbol_of(&self, name: &crate::nodes::Name) -> Option<&Symbol> {
        self.symbol_id_of(name.node_id).map(|id| self.symbol(id))
    }

    /// The local symbols published on a function, lambda, or comprehension
    /// anchor.
    pub fn local_variable_symbols(&self, anchor: NodeId) -> &[SymbolId] {
        self.locals_by_anchor
            .get(&anchor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The class-body fields of a class def.
    pub fn class_fields(&self, class_def: &ClassDef) -> &[SymbolId] {
        self.class_fields_by_def
            .get(&class_def.node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The instance fields of a class def.
    pub fn instance_fields(&self, class_def: &ClassDef) -> &[SymbolId] {
        self.instance_fields_by_def
            .get(&class_def.node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The module-level variables, excluding seeded builtins.
    pub fn global_variables(&self) -> &[SymbolId] {
        &self.global_variables
    }

    /// The function symbol of a def, when the def has exactly one.
    pub fn function_symbol_of(&self, def: &FunctionDef) -> Option<SymbolId> {
        self.function_symbols_by_def.get(&def.node_id).copied()
    }

    /// The inferred type of an expression. `Any` when nothing was inferred.
    pub fn expression_type(&self, expr: &Expression) -> InferredType {
        self.types_by_expression
            .get(&expr.node_id())
            .copied()
            .unwrap_or(InferredType::Any)
    }

    /// Whether a wildcard import could not be resolved against the indices.
    pub fn has_unresolved_wildcard_import(&self, import: &ImportFrom) -> bool {
        self.unresolved_wildcard_imports.contains(&import.node_id)
    }

    /// Search a class symbol's members, then each parent in declaration
    /// order. `Unknown` (not `Absent`) when the hierarchy is partly
    /// unresolved, so rules can decline to report.
    pub fn resolve_member(&self, class: SymbolId, name: &str) -> MemberLookup {
        let mut visited = HashSet::new();
        self.resolve_member_inner(class, name, &mut visited)
    }

    fn resolve_member_inner(
        &self,
        class: SymbolId,
        name: &str,
        visited: &mut HashSet<SymbolId>,
    ) -> MemberLookup {
        if !visited.insert(class) {
            return MemberLookup::Absent;
        }
        let Some(data) = self.symbol(class).class_data() else {
            return MemberLookup::Unknown;
        };
        if let Some(&member) = data.members.get(name) {
            return MemberLookup::Found(member);
        }
        let mut unknown = data.has_unresolved_hierarchy;
        for &superclass in &data.superclasses {
            match self.resolve_member_inner(superclass, name, visited) {
                MemberLookup::Found(member) => return MemberLookup::Found(member),
                MemberLookup::Unknown => unknown = true,
                MemberLookup::Absent => {}
            }
        }
        if unknown {
            MemberLookup::Unknown
        } else {
            MemberLookup::Absent
        }
    }
}

/// Per-build state shared by the passes.
pub(crate) struct BuildContext<'a> {
    pub(crate) table: SymbolTable,
    pub(crate) source_file: &'a SourceFile,
    pub(crate) stub_index: Option<&'a StubIndex>,
    pub(crate) global_index: Option<&'a GlobalSymbolIndex>,
    pub(crate) module_fqn: String,
    /// Package segments plus module name, for relative import resolution.
    pub(crate) file_path: Vec<String>,
    /// Node ids of every assignment-target leaf expression.
    pub(crate) assignment_lhs: HashSet<NodeId>,
    /// Def nodes by their name node, for ambiguity alternatives.
    pub(crate) function_defs: HashMap<NodeId, &'a FunctionDef>,
    pub(crate) class_defs: HashMap<NodeId, &'a ClassDef>,
}

impl<'a> BuildContext<'a> {
    fn new(
        source_file: &'a SourceFile,
        stub_index: Option<&'a StubIndex>,
        global_index: Option<&'a GlobalSymbolIndex>,
    ) -> Self {
        Self {
            table: SymbolTable::new(),
            source_file,
            stub_index,
            global_index,
            module_fqn: source_file.module_fqn(),
            file_path: source_file.path_components(),
            assignment_lhs: HashSet::new(),
            function_defs: HashMap::new(),
            class_defs: HashMap::new(),
        }
    }
}

/// Builds the symbol table for one file.
///
/// One builder instance per file; the indices it borrows are read-only and
/// safe for concurrent reads from parallel builders.
pub struct SymbolTableBuilder<'a> {
    source_file: &'a SourceFile,
    stub_index: Option<&'a StubIndex>,
    global_index: Option<&'a GlobalSymbolIndex>,
}

impl<'a> SymbolTableBuilder<'a> {
    /// A builder with no stub or cross-file information.
    pub fn new(source_file: &'a SourceFile) -> Self {
        Self {
            source_file,
            stub_index: None,
            global_index: None,
        }
    }

    /// Use a stub index for builtins and wildcard imports.
    pub fn with_stub_index(mut self, index: &'a StubIndex) -> Self {
        self.stub_index = Some(index);
        self
    }

    /// Use a global-symbol index for cross-file imports.
    pub fn with_global_symbols(mut self, index: &'a GlobalSymbolIndex) -> Self {
        self.global_index = Some(index);
        self
    }

    /// Build the symbol table for the given tree.
    pub fn build(&self, tree: &'a FileInput) -> SymbolTable {
        let mut ctx = BuildContext::new(self.source_file, self.stub_index, self.global_index);
        debug!(module = %ctx.module_fqn, "building symbol table");

        BindingPass::run(&mut ctx, tree);
        ReferencePass::run(&mut ctx, tree);
        ambiguity::create_ambiguous_symbols(&mut ctx);
        ambiguity::add_symbols_to_tree(&mut ctx, tree);
        InferencePass::run(&mut ctx, tree);

        debug!(
            scopes = ctx.table.scopes.len(),
            symbols = ctx.table.symbols.len(),
            "symbol table built"
        );
        ctx.table
    }
}
