// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Disambiguation and symbol attachment: the fix-up between the reference
//! and inference passes.
//!
//! A name bound more than once, where at least one binding is a `def` or
//! `class`, becomes an ambiguous symbol carrying one alternative per
//! binding usage. Class models are completed here: class-body symbols and
//! instance attributes merge into the member set, and every scope's locals
//! are published onto its anchor for rule queries.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::trace;

use crate::nodes::{ClassDef, Expression, FileInput, FunctionDef, NodeId};
use crate::semantic::builder::{BuildContext, SymbolTable};
use crate::semantic::scope::{ScopeId, ScopeKind};
use crate::semantic::symbol::{
    ClassData, FunctionData, Symbol, SymbolData, SymbolId, SymbolKind, Usage, UsageKind,
};

/// Replace multiply-bound names with ambiguous symbols.
///
/// Scopes are scanned in creation order and each scope's names in
/// first-binding order, so alternative lists and downstream diagnostics
/// are deterministic.
pub(crate) fn create_ambiguous_symbols(ctx: &mut BuildContext<'_>) {
    let scope_count = ctx.table.scopes.len();
    for index in 0..scope_count {
        let scope_id = ScopeId(index as u32);
        let entries: Vec<(String, SymbolId)> = ctx
            .table
            .scope(scope_id)
            .symbols_by_name
            .iter()
            .map(|(name, id)| (name.clone(), *id))
            .collect();
        for (name, symbol_id) in entries {
            if ctx.table.scope(scope_id).builtin_symbols.contains(&symbol_id) {
                continue;
            }
            let symbol = ctx.table.symbol(symbol_id);
            if symbol.kind() == SymbolKind::Ambiguous {
                continue;
            }
            let binding_usages: Vec<Usage> = symbol.binding_usages().copied().collect();
            if binding_usages.len() < 2 {
                continue;
            }
            let has_declaration = binding_usages.iter().any(|u| {
                matches!(
                    u.kind,
                    UsageKind::FuncDeclaration | UsageKind::ClassDeclaration
                )
            });
            if !has_declaration {
                continue;
            }

            let fqn = symbol.fully_qualified_name.clone();
            let usages = symbol.usages.clone();
            let alternatives: Vec<SymbolId> = binding_usages
                .iter()
                .map(|usage| alternative_definition(ctx, usage, &name, fqn.clone()))
                .collect();

            trace!(name = %name, count = alternatives.len(), "created ambiguous symbol");
            let mut replacement = Symbol::new(name.as_str(), fqn)
                .with_data(SymbolData::Ambiguous { alternatives });
            replacement.usages = usages.clone();
            let replacement_id = ctx.table.alloc_symbol(replacement);
            ctx.table.insert_local(scope_id, name, replacement_id);
            for usage in &usages {
                ctx.table
                    .symbol_ids_by_name_node
                    .insert(usage.node, replacement_id);
            }
        }
    }
}

/// Build one alternative from a binding usage: a fresh function symbol
/// from a `def` node, a fresh class symbol from a `class` node, or a plain
/// symbol otherwise.
fn alternative_definition(
    ctx: &mut BuildContext<'_>,
    usage: &Usage,
    name: &str,
    fqn: Option<String>,
) -> SymbolId {
    match usage.kind {
        UsageKind::FuncDeclaration => match ctx.function_defs.get(&usage.node).copied() {
            Some(def) => function_alternative(ctx, def, name, fqn),
            None => ctx.table.alloc_symbol(Symbol::new(name, fqn)),
        },
        UsageKind::ClassDeclaration => match ctx.class_defs.get(&usage.node).copied() {
            Some(def) => class_alternative(ctx, def, name, fqn),
            None => ctx.table.alloc_symbol(Symbol::new(name, fqn)),
        },
        _ => ctx.table.alloc_symbol(Symbol::new(name, fqn)),
    }
}

fn function_alternative(
    ctx: &mut BuildContext<'_>,
    def: &FunctionDef,
    name: &str,
    fqn: Option<String>,
) -> SymbolId {
    let is_method = ctx
        .table
        .scope_at(def.node_id)
        .and_then(|scope| ctx.table.scope(scope).parent())
        .map(|parent| ctx.table.scope(parent).kind() == ScopeKind::Class)
        .unwrap_or(false);
    let data = FunctionData::from_def(def, is_method, ctx.source_file.is_stub());
    let id = ctx
        .table
        .alloc_symbol(Symbol::new(name, fqn).with_data(SymbolData::Function(data)));
    ctx.table.function_symbols_by_def.insert(def.node_id, id);
    id
}

fn class_alternative(
    ctx: &mut BuildContext<'_>,
    def: &ClassDef,
    name: &str,
    fqn: Option<String>,
) -> SymbolId {
    let mut data = ClassData::from_def(def);
    // Base resolution for alternatives runs against the module scope's
    // name map; lexical context is gone by the time they are fabricated.
    let module = ctx.table.module_scope_id();
    for argument in &def.arguments {
        if argument.keyword.is_some() {
            continue;
        }
        let resolved = match &argument.value {
            Expression::Name(base) => ctx.table.scope(module).symbol(&base.name),
            _ => None,
        };
        match resolved {
            Some(base) if ctx.table.symbol(base).class_data().is_some() => {
                data.superclasses.push(base);
            }
            _ => data.has_unresolved_hierarchy = true,
        }
    }
    let id = ctx
        .table
        .alloc_symbol(Symbol::new(name, fqn).with_data(SymbolData::Class(data)));
    if let Some(scope) = ctx.table.scope_at(def.node_id) {
        let members = class_members(&mut ctx.table, scope);
        ctx.table
            .symbol_mut(id)
            .class_data_mut()
            .expect("just created as a class symbol")
            .members = members;
    }
    id
}

/// Compute a class's member set from its scope: class-body symbols plus
/// instance attributes. On a name collision the class-body symbol wins and
/// absorbs the instance attribute's usages.
pub(crate) fn class_members(
    table: &mut SymbolTable,
    scope: ScopeId,
) -> IndexMap<String, SymbolId> {
    let mut members: IndexMap<String, SymbolId> =
        table.scope(scope).symbols_by_name.clone();
    let instance_attributes: Vec<(String, SymbolId)> = table
        .scope(scope)
        .instance_attributes_by_name
        .iter()
        .map(|(name, id)| (name.clone(), *id))
        .collect();
    for (name, attribute) in instance_attributes {
        match members.get(&name).copied() {
            Some(member) => {
                let usages: Vec<Usage> = table.symbol(attribute).usages.clone();
                for usage in usages {
                    table.add_usage(member, usage.node, usage.kind);
                }
            }
            None => {
                members.insert(name, attribute);
            }
        }
    }
    members
}

/// Publish each scope's locals onto its anchor and finish class symbols.
pub(crate) fn add_symbols_to_tree(ctx: &mut BuildContext<'_>, tree: &FileInput) {
    debug_assert_eq!(
        ctx.table.module_scope().anchor(),
        tree.node_id,
        "module scope anchored to a different tree"
    );
    let class_defs_by_anchor: HashMap<NodeId, &ClassDef> = ctx
        .class_defs
        .values()
        .map(|def| (def.node_id, *def))
        .collect();

    let scope_count = ctx.table.scopes.len();
    for index in 0..scope_count {
        let scope_id = ScopeId(index as u32);
        let kind = ctx.table.scope(scope_id).kind();
        let anchor = ctx.table.scope(scope_id).anchor();
        match kind {
            ScopeKind::Function | ScopeKind::Lambda | ScopeKind::Comprehension => {
                let locals: Vec<SymbolId> = ctx.table.scope(scope_id).symbols().collect();
                ctx.table.locals_by_anchor.insert(anchor, locals);
            }
            ScopeKind::Class => {
                let fields: Vec<SymbolId> = ctx.table.scope(scope_id).symbols().collect();
                let instance_fields: Vec<SymbolId> =
                    ctx.table.scope(scope_id).instance_attributes().collect();
                ctx.table.class_fields_by_def.insert(anchor, fields);
                ctx.table
                    .instance_fields_by_def
                    .insert(anchor, instance_fields);

                // Attach members only while the def's name still denotes a
                // class; ambiguous rebindings carry members per alternative.
                if let Some(def) = class_defs_by_anchor.get(&anchor) {
                    if let Some(class_symbol) = ctx.table.symbol_id_of(def.name.node_id) {
                        if ctx.table.symbol(class_symbol).class_data().is_some() {
                            let members = class_members(&mut ctx.table, scope_id);
                            ctx.table
                                .symbol_mut(class_symbol)
                                .class_data_mut()
                                .expect("checked to be a class symbol")
                                .members = members;
                        }
                    }
                }
            }
            ScopeKind::Module => {
                let scope = ctx.table.scope(scope_id);
                let globals: Vec<SymbolId> = scope
                    .symbols()
                    .filter(|id| !scope.builtin_symbols.contains(id))
                    .collect();
                ctx.table.global_variables = globals;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::TreeBuilder;
    use crate::semantic::builder::SymbolTableBuilder;
    use crate::semantic::stubs::SourceFile;

    fn file() -> SourceFile {
        SourceFile::new("mod.py", "")
    }

    #[test]
    fn test_class_rebound_by_value_yields_class_and_other_alternatives() {
        // class C: pass
        // C = None
        let mut t = TreeBuilder::new();
        let body = vec![t.pass_stmt()];
        let class = t.class_def("C", vec![], body);
        let c = t.name("C");
        let none = t.none();
        let assign = t.assign(vec![c], none);
        let tree = t.file_input(vec![class, assign]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        let sym = table.symbol(table.module_scope().symbol("C").unwrap());
        assert_eq!(sym.kind(), SymbolKind::Ambiguous);
        let alternatives = sym.alternatives().unwrap();
        assert_eq!(alternatives.len(), 2);
        assert_eq!(table.symbol(alternatives[0]).kind(), SymbolKind::Class);
        assert_eq!(table.symbol(alternatives[1]).kind(), SymbolKind::Other);
    }

    #[test]
    fn test_plain_rebinding_stays_unambiguous() {
        // x = 1
        // x = 2
        let mut t = TreeBuilder::new();
        let x1 = t.name("x");
        let one = t.int("1");
        let a1 = t.assign(vec![x1], one);
        let x2 = t.name("x");
        let two = t.int("2");
        let a2 = t.assign(vec![x2], two);
        let tree = t.file_input(vec![a1, a2]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        let sym = table.symbol(table.module_scope().symbol("x").unwrap());
        assert_eq!(sym.kind(), SymbolKind::Other);
        assert_eq!(sym.usages().len(), 2);
    }

    #[test]
    fn test_usage_slots_repoint_to_the_ambiguous_symbol() {
        // def f(): pass
        // f = 3
        let mut t = TreeBuilder::new();
        let params = t.no_parameters();
        let body = vec![t.pass_stmt()];
        let def = t.function_def("f", params, body);
        let f = t.name("f");
        let f_id = f.node_id();
        let three = t.int("3");
        let assign = t.assign(vec![f], three);
        let tree = t.file_input(vec![def, assign]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        let ambiguous = table.module_scope().symbol("f").unwrap();
        assert_eq!(table.symbol(ambiguous).kind(), SymbolKind::Ambiguous);
        assert_eq!(table.symbol_id_of(f_id), Some(ambiguous));
    }

    #[test]
    fn test_class_alternative_keeps_members_of_its_own_def() {
        // class C:
        //     def ping(self): pass
        // class C:
        //     def pong(self): pass
        let mut t = TreeBuilder::new();
        let ping_self = t.param("self");
        let ping_params = t.parameters(vec![ping_self]);
        let ping_body = vec![t.pass_stmt()];
        let ping = t.function_def("ping", ping_params, ping_body);
        let c1 = t.class_def("C", vec![], vec![ping]);
        let pong_self = t.param("self");
        let pong_params = t.parameters(vec![pong_self]);
        let pong_body = vec![t.pass_stmt()];
        let pong = t.function_def("pong", pong_params, pong_body);
        let c2 = t.class_def("C", vec![], vec![pong]);
        let tree = t.file_input(vec![c1, c2]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        let sym = table.symbol(table.module_scope().symbol("C").unwrap());
        let alternatives = sym.alternatives().unwrap();
        assert_eq!(alternatives.len(), 2);
        let first = table.symbol(alternatives[0]).class_data().unwrap();
        let second = table.symbol(alternatives[1]).class_data().unwrap();
        assert!(first.members.contains_key("ping"));
        assert!(!first.members.contains_key("pong"));
        assert!(second.members.contains_key("pong"));
    }
}
