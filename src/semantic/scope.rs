// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The scope graph: a tree of scopes anchored to syntax nodes, with the
//! name-resolution and binding operations the passes are built on.
//!
//! # Resolution rules
//!
//! Resolution walks the parent chain of the current scope and stops at the
//! first match, with three exceptions:
//!
//! - a name declared `global` resolves directly in the module scope;
//! - a name declared `nonlocal` skips the current scope and walks parents
//!   excluding the module scope;
//! - class scopes on the chain are transparent to resolution from nested
//!   functions (only the starting scope's own map is consulted when it is
//!   itself a class scope).

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use crate::nodes::{Name, NodeId, Parameter};
use crate::semantic::builder::SymbolTable;
use crate::semantic::symbol::{Symbol, SymbolData, SymbolId, Usage, UsageKind};

/// Index of a scope in the per-file registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// The kind of construct that introduced a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Module-level scope (top-level of a file).
    Module,
    /// Class body scope.
    Class,
    /// Function or method body scope.
    Function,
    /// Lambda expression scope.
    Lambda,
    /// Comprehension scope (list/set/dict comp, generator expression).
    Comprehension,
}

impl ScopeKind {
    /// Returns the string representation used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Module => "module",
            ScopeKind::Class => "class",
            ScopeKind::Function => "function",
            ScopeKind::Lambda => "lambda",
            ScopeKind::Comprehension => "comprehension",
        }
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One lexical scope.
///
/// Maps iterate in first-binding order; the registry itself iterates in
/// creation order (pre-order of the binding pass).
#[derive(Debug, Clone)]
pub struct Scope {
    pub(crate) node: NodeId,
    pub(crate) kind: ScopeKind,
    pub(crate) parent: Option<ScopeId>,
    /// Dotted prefix for names declared directly in this scope.
    pub(crate) qualified_name: Option<String>,
    pub(crate) symbols_by_name: IndexMap<String, SymbolId>,
    /// Class scopes only: `self.<attr>` assignments found in methods.
    pub(crate) instance_attributes_by_name: IndexMap<String, SymbolId>,
    pub(crate) global_names: IndexSet<String>,
    pub(crate) nonlocal_names: IndexSet<String>,
    /// Module scope only: symbols seeded from the builtin namespace.
    pub(crate) builtin_symbols: IndexSet<SymbolId>,
}

impl Scope {
    pub(crate) fn new(
        node: NodeId,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        qualified_name: Option<String>,
    ) -> Self {
        Self {
            node,
            kind,
            parent,
            qualified_name,
            symbols_by_name: IndexMap::new(),
            instance_attributes_by_name: IndexMap::new(),
            global_names: IndexSet::new(),
            nonlocal_names: IndexSet::new(),
            builtin_symbols: IndexSet::new(),
        }
    }

    /// The syntax node this scope is anchored to.
    pub fn anchor(&self) -> NodeId {
        self.node
    }

    /// The kind of construct that introduced this scope.
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// The enclosing scope, or `None` for the module scope.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Look up a name bound directly in this scope.
    pub fn symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols_by_name.get(name).copied()
    }

    /// The symbols bound in this scope, in first-binding order.
    pub fn symbols(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.symbols_by_name.values().copied()
    }

    /// The names bound in this scope, in first-binding order.
    pub fn symbol_names(&self) -> impl Iterator<Item = &str> {
        self.symbols_by_name.keys().map(String::as_str)
    }

    /// Look up an instance attribute of this class scope.
    pub fn instance_attribute(&self, name: &str) -> Option<SymbolId> {
        self.instance_attributes_by_name.get(name).copied()
    }

    /// The instance attributes of this class scope, in discovery order.
    pub fn instance_attributes(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.instance_attributes_by_name.values().copied()
    }

    /// Whether the name was declared `global` in this scope.
    pub fn is_global_name(&self, name: &str) -> bool {
        self.global_names.contains(name)
    }

    /// Whether the name was declared `nonlocal` in this scope.
    pub fn is_nonlocal_name(&self, name: &str) -> bool {
        self.nonlocal_names.contains(name)
    }

    /// Whether the symbol was seeded from the builtin namespace.
    pub fn is_builtin_symbol(&self, symbol: SymbolId) -> bool {
        self.builtin_symbols.contains(&symbol)
    }
}

// Scope-graph operations on the table. These are the primitives the three
// passes are written against.
impl SymbolTable {
    /// Insert a new scope keyed by its anchor node. Idempotent: a second
    /// call with the same anchor returns the existing scope.
    pub(crate) fn create_scope(
        &mut self,
        anchor: NodeId,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        qualified_name: Option<String>,
    ) -> ScopeId {
        if let Some(&existing) = self.scope_ids_by_anchor.get(&anchor) {
            return existing;
        }
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(anchor, kind, parent, qualified_name));
        self.scope_ids_by_anchor.insert(anchor, id);
        trace!(scope = %id, kind = %self.scopes[id.index()].kind, "created scope");
        id
    }

    /// Bind a symbol under a name in a scope's local map.
    pub(crate) fn insert_local(
        &mut self,
        scope: ScopeId,
        name: impl Into<String>,
        symbol: SymbolId,
    ) {
        self.scopes[scope.index()]
            .symbols_by_name
            .insert(name.into(), symbol);
    }

    /// Record a `global` declaration in a scope.
    pub(crate) fn add_global_name(&mut self, scope: ScopeId, name: &str) {
        self.scopes[scope.index()].global_names.insert(name.to_string());
    }

    /// Record a `nonlocal` declaration in a scope.
    pub(crate) fn add_nonlocal_name(&mut self, scope: ScopeId, name: &str) {
        self.scopes[scope.index()]
            .nonlocal_names
            .insert(name.to_string());
    }

    /// The symbol slot of an expression usable as a qualifier: a name, or
    /// the attribute name of a nested qualified expression.
    pub(crate) fn expression_symbol(&self, expr: &crate::nodes::Expression) -> Option<SymbolId> {
        match expr {
            crate::nodes::Expression::Name(name) => self.symbol_ids_by_name_node.get(&name.node_id).copied(),
            crate::nodes::Expression::Qualified(qualified) => self
                .symbol_ids_by_name_node
                .get(&qualified.name.node_id)
                .copied(),
            _ => None,
        }
    }

    /// Allocate a symbol in the arena.
    pub(crate) fn alloc_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    /// Append a usage and point the name node's symbol slot at the symbol.
    pub(crate) fn add_usage(&mut self, symbol: SymbolId, node: NodeId, kind: UsageKind) {
        self.symbols[symbol.index()].usages.push(Usage { node, kind });
        self.symbol_ids_by_name_node.insert(node, symbol);
    }

    /// Resolve a name from the given scope, honoring `global`/`nonlocal`
    /// redirection and class-scope transparency.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let start = &self.scopes[scope.index()];

        if start.global_names.contains(name) {
            return self.scopes[self.module_scope_id().index()]
                .symbols_by_name
                .get(name)
                .copied();
        }

        if start.nonlocal_names.contains(name) {
            let mut current = start.parent;
            while let Some(parent_id) = current {
                let parent = &self.scopes[parent_id.index()];
                if parent.parent.is_none() {
                    break;
                }
                if parent.kind != ScopeKind::Class {
                    if let Some(&id) = parent.symbols_by_name.get(name) {
                        return Some(id);
                    }
                }
                current = parent.parent;
            }
            return None;
        }

        if let Some(&id) = start.symbols_by_name.get(name) {
            return Some(id);
        }
        let mut current = start.parent;
        while let Some(parent_id) = current {
            let parent = &self.scopes[parent_id.index()];
            if parent.kind != ScopeKind::Class {
                if let Some(&id) = parent.symbols_by_name.get(name) {
                    return Some(id);
                }
            }
            current = parent.parent;
        }
        None
    }

    /// Locate or create the local symbol for a binding, subject to
    /// `global`/`nonlocal` redirection, then record the usage. The
    /// fully-qualified name is set only if not already set.
    pub(crate) fn add_binding_usage(
        &mut self,
        scope: ScopeId,
        name: &Name,
        kind: UsageKind,
        fully_qualified_name: Option<String>,
    ) {
        let scope_ref = &self.scopes[scope.index()];
        let redirected = scope_ref.global_names.contains(&name.name)
            || scope_ref.nonlocal_names.contains(&name.name);
        if !redirected && !scope_ref.symbols_by_name.contains_key(&name.name) {
            let id = self.alloc_symbol(Symbol::new(name.name.as_str(), fully_qualified_name.clone()));
            self.scopes[scope.index()]
                .symbols_by_name
                .insert(name.name.clone(), id);
        }
        match self.resolve(scope, &name.name) {
            Some(id) => {
                if let Some(fqn) = fully_qualified_name {
                    let symbol = &mut self.symbols[id.index()];
                    if symbol.fully_qualified_name.is_none() {
                        symbol.fully_qualified_name = Some(fqn);
                    }
                }
                self.add_usage(id, name.node_id, kind);
            }
            None => {
                trace!(name = %name.name, "binding has no reachable symbol");
            }
        }
    }

    /// Register a method's implicit-instance parameter. Subsequent
    /// `self.x` child usages land in the enclosing class scope's instance
    /// attributes.
    pub(crate) fn create_self_parameter(&mut self, method_scope: ScopeId, parameter: &Parameter) {
        let class_scope = self.scopes[method_scope.index()].parent;
        debug_assert!(
            class_scope
                .map(|id| self.scopes[id.index()].kind == ScopeKind::Class)
                .unwrap_or(false),
            "self parameter outside a method scope"
        );
        let mut symbol = Symbol::new(parameter.name.name.as_str(), None);
        symbol.self_class_scope = class_scope;
        let id = self.alloc_symbol(symbol);
        self.scopes[method_scope.index()]
            .symbols_by_name
            .insert(parameter.name.name.clone(), id);
        self.add_usage(id, parameter.name.node_id, UsageKind::Parameter);
    }

    /// Record or create a child usage for the attribute `name` under the
    /// given qualifier symbol.
    ///
    /// Child usages on a self parameter are routed into the class scope's
    /// instance attributes. An ambiguous qualifier fans the usage out to
    /// every class alternative.
    pub(crate) fn add_or_create_child_usage(
        &mut self,
        qualifier: SymbolId,
        name: &Name,
        kind: UsageKind,
    ) {
        if let Some(class_scope) = self.symbols[qualifier.index()].self_class_scope {
            let existing = self.scopes[class_scope.index()]
                .instance_attributes_by_name
                .get(&name.name)
                .copied();
            let child = match existing {
                Some(id) => id,
                None => {
                    let id = self.alloc_symbol(Symbol::new(name.name.as_str(), None));
                    self.scopes[class_scope.index()]
                        .instance_attributes_by_name
                        .insert(name.name.clone(), id);
                    id
                }
            };
            self.add_usage(child, name.node_id, kind);
            return;
        }

        if let SymbolData::Ambiguous { alternatives } = &self.symbols[qualifier.index()].data {
            let class_alternatives: Vec<SymbolId> = alternatives
                .iter()
                .copied()
                .filter(|&alt| self.symbols[alt.index()].class_data().is_some())
                .collect();
            for alternative in class_alternatives {
                self.add_or_create_child_usage(alternative, name, kind);
            }
            return;
        }

        let existing = self.symbols[qualifier.index()].children.get(&name.name).copied();
        let child = match existing {
            Some(id) => id,
            None => {
                let fqn = self.symbols[qualifier.index()]
                    .fully_qualified_name
                    .as_ref()
                    .map(|f| format!("{f}.{}", name.name));
                let id = self.alloc_symbol(Symbol::new(name.name.as_str(), fqn));
                self.symbols[qualifier.index()]
                    .children
                    .insert(name.name.clone(), id);
                id
            }
        };
        self.add_usage(child, name.node_id, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::builder::SymbolTable;

    fn table_with_chain() -> (SymbolTable, ScopeId, ScopeId, ScopeId, ScopeId) {
        // module -> class -> method -> inner function
        let mut table = SymbolTable::new();
        let module = table.create_scope(NodeId::new(0), ScopeKind::Module, None, None);
        let class = table.create_scope(NodeId::new(1), ScopeKind::Class, Some(module), None);
        let method = table.create_scope(NodeId::new(2), ScopeKind::Function, Some(class), None);
        let inner = table.create_scope(NodeId::new(3), ScopeKind::Function, Some(method), None);
        (table, module, class, method, inner)
    }

    fn bind(table: &mut SymbolTable, scope: ScopeId, name: &str, node: u32) -> SymbolId {
        let name = Name {
            node_id: NodeId::new(node),
            name: name.to_string(),
            span: None,
            is_variable: true,
        };
        table.add_binding_usage(scope, &name, UsageKind::AssignmentLhs, None);
        table.resolve(scope, &name.name).unwrap()
    }

    #[test]
    fn test_create_scope_is_idempotent() {
        let mut table = SymbolTable::new();
        let a = table.create_scope(NodeId::new(0), ScopeKind::Module, None, None);
        let b = table.create_scope(NodeId::new(0), ScopeKind::Module, None, None);
        assert_eq!(a, b);
        assert_eq!(table.scopes().count(), 1);
    }

    #[test]
    fn test_resolve_walks_parents() {
        let (mut table, module, _, method, _) = table_with_chain();
        let sym = bind(&mut table, module, "x", 10);
        assert_eq!(table.resolve(method, "x"), Some(sym));
    }

    #[test]
    fn test_class_scope_is_skipped_from_nested_function() {
        let (mut table, module, class, method, _) = table_with_chain();
        let module_sym = bind(&mut table, module, "x", 10);
        let class_sym = bind(&mut table, class, "x", 11);
        // From the method, the class binding is invisible.
        assert_eq!(table.resolve(method, "x"), Some(module_sym));
        // From the class body itself, the class binding wins.
        assert_eq!(table.resolve(class, "x"), Some(class_sym));
    }

    #[test]
    fn test_global_redirects_to_module_scope() {
        let (mut table, module, _, method, _) = table_with_chain();
        let module_sym = bind(&mut table, module, "x", 10);
        table.scopes_mut()[method.index()]
            .global_names
            .insert("x".to_string());
        bind(&mut table, method, "x", 11);
        // No local symbol was created; the module symbol got the usage.
        assert!(table.scope(method).symbol("x").is_none());
        assert_eq!(table.resolve(method, "x"), Some(module_sym));
        assert_eq!(table.symbol(module_sym).usages().len(), 2);
    }

    #[test]
    fn test_nonlocal_skips_current_and_module() {
        let (mut table, module, _, method, inner) = table_with_chain();
        bind(&mut table, module, "x", 10);
        let method_sym = bind(&mut table, method, "x", 11);
        table.scopes_mut()[inner.index()]
            .nonlocal_names
            .insert("x".to_string());
        assert_eq!(table.resolve(inner, "x"), Some(method_sym));
    }

    #[test]
    fn test_nonlocal_never_reaches_module_scope() {
        let (mut table, module, _, _, inner) = table_with_chain();
        bind(&mut table, module, "x", 10);
        table.scopes_mut()[inner.index()]
            .nonlocal_names
            .insert("x".to_string());
        assert_eq!(table.resolve(inner, "x"), None);
    }

    #[test]
    fn test_binding_usage_sets_fqn_once() {
        let (mut table, module, ..) = table_with_chain();
        let name_a = Name {
            node_id: NodeId::new(10),
            name: "x".to_string(),
            span: None,
            is_variable: true,
        };
        let name_b = Name {
            node_id: NodeId::new(11),
            name: "x".to_string(),
            span: None,
            is_variable: true,
        };
        table.add_binding_usage(module, &name_a, UsageKind::AssignmentLhs, Some("m.x".into()));
        table.add_binding_usage(module, &name_b, UsageKind::AssignmentLhs, Some("other.x".into()));
        let sym = table.resolve(module, "x").unwrap();
        assert_eq!(table.symbol(sym).fully_qualified_name(), Some("m.x"));
        assert_eq!(table.symbol(sym).usages().len(), 2);
    }
}
