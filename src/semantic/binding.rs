// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The binding pass: first traversal.
//!
//! Creates the scope graph, records every binding usage (definitions,
//! parameters, imports, assignment and loop targets, comprehension
//! targets), seeds builtins, and collects the assignment-LHS side set. The
//! pass never reads names; reads are the second traversal's job, because a
//! read may appear in the tree before the binding it refers to.

use tracing::{debug, trace};

use crate::nodes::{
    AliasedName, AnnotatedAssignment, AnyParameter, Assignment, AssignmentExpression, ClassDef,
    ComprehensionExpression, ComprehensionFor, CompoundAssignment, DictCompExpression,
    ExceptClause, Expression, FileInput, ForStatement, FunctionDef, GlobalStatement, ImportFrom,
    ImportName, ImportedNames, LambdaExpression, Name, NonlocalStatement, ParameterList,
    ParameterStar, TupleParameter, WithItem,
};
use crate::semantic::builder::BuildContext;
use crate::semantic::scope::{ScopeId, ScopeKind};
use crate::semantic::stubs::{SymbolDescriptor, BASE_MODULES, BUILTIN_NAMES};
use crate::semantic::symbol::{ClassData, FunctionData, Symbol, SymbolData, UsageKind};
use crate::visitor::{walk_file_input, VisitResult, Visitor};

/// First-phase visitor. See the module docs.
pub(crate) struct BindingPass<'c, 'a> {
    ctx: &'c mut BuildContext<'a>,
    scope_stack: Vec<ScopeId>,
}

impl<'c, 'a> BindingPass<'c, 'a> {
    pub(crate) fn run(ctx: &'c mut BuildContext<'a>, tree: &'a FileInput) {
        let mut pass = Self {
            ctx,
            scope_stack: Vec::new(),
        };
        walk_file_input(&mut pass, tree);
    }

    fn current_scope(&self) -> ScopeId {
        *self.scope_stack.last().expect("scope stack is empty")
    }

    /// Dotted prefix + name, following the current scope's qualified name.
    fn qualified_name_for(&self, name: &str) -> Option<String> {
        let scope = self.ctx.table.scope(self.current_scope());
        match scope.qualified_name.as_deref() {
            Some("") => Some(name.to_string()),
            Some(prefix) => Some(format!("{prefix}.{name}")),
            None => None,
        }
    }

    /// The qualified-name prefix a new def/class scope inherits: the just
    /// bound symbol's FQN, or its bare name when the FQN is unknown.
    fn scope_qualified_name(&self, name: &Name) -> Option<String> {
        match self.ctx.table.symbol_id_of(name.node_id) {
            Some(id) => Some(
                self.ctx
                    .table
                    .symbol(id)
                    .fully_qualified_name()
                    .unwrap_or(&name.name)
                    .to_string(),
            ),
            None => Some(name.name.clone()),
        }
    }

    fn add_function_symbol(&mut self, node: &'a FunctionDef, fqn: Option<String>) {
        let scope = self.current_scope();
        if self.ctx.table.is_existing_symbol(scope, &node.name.name) {
            self.ctx
                .table
                .add_binding_usage(scope, &node.name, UsageKind::FuncDeclaration, fqn);
            return;
        }
        let is_method = self.ctx.table.scope(scope).kind() == ScopeKind::Class;
        let data = FunctionData::from_def(node, is_method, self.ctx.source_file.is_stub());
        let id = self
            .ctx
            .table
            .alloc_symbol(Symbol::new(node.name.name.as_str(), fqn).with_data(SymbolData::Function(data)));
        self.ctx.table.insert_local(scope, node.name.name.as_str(), id);
        self.ctx
            .table
            .add_usage(id, node.name.node_id, UsageKind::FuncDeclaration);
        self.ctx.table.function_symbols_by_def.insert(node.node_id, id);
    }

    fn add_class_symbol(&mut self, node: &'a ClassDef, fqn: Option<String>) {
        let scope = self.current_scope();
        if self.ctx.table.is_existing_symbol(scope, &node.name.name) {
            self.ctx
                .table
                .add_binding_usage(scope, &node.name, UsageKind::ClassDeclaration, fqn);
            return;
        }
        let data = ClassData::from_def(node);
        let id = self
            .ctx
            .table
            .alloc_symbol(Symbol::new(node.name.name.as_str(), fqn).with_data(SymbolData::Class(data)));
        self.ctx.table.insert_local(scope, node.name.name.as_str(), id);
        self.ctx
            .table
            .add_usage(id, node.name.node_id, UsageKind::ClassDeclaration);
    }

    /// Register parameters of a function or lambda. For methods, the first
    /// plain parameter is the implicit-instance parameter.
    fn create_parameters(&mut self, parameters: &'a ParameterList, is_method: bool) {
        if parameters.is_empty() {
            return;
        }
        let scope = self.current_scope();
        let mut skip_first = false;
        if is_method {
            if let Some(AnyParameter::Param(first)) = parameters.parameters.first() {
                if first.star == ParameterStar::None {
                    self.ctx.table.create_self_parameter(scope, first);
                    skip_first = true;
                }
            }
        }
        for (index, entry) in parameters.parameters.iter().enumerate() {
            match entry {
                AnyParameter::Param(param) => {
                    if skip_first && index == 0 {
                        continue;
                    }
                    self.ctx.table.add_binding_usage(
                        scope,
                        &param.name,
                        UsageKind::Parameter,
                        None,
                    );
                }
                AnyParameter::Tuple(tuple) => self.bind_tuple_parameters(tuple),
                AnyParameter::Star(_) | AnyParameter::Slash(_) => {}
            }
        }
    }

    fn bind_tuple_parameters(&mut self, tuple: &'a TupleParameter) {
        let scope = self.current_scope();
        for entry in &tuple.parameters {
            match entry {
                AnyParameter::Param(param) => {
                    self.ctx.table.add_binding_usage(
                        scope,
                        &param.name,
                        UsageKind::Parameter,
                        None,
                    );
                }
                AnyParameter::Tuple(nested) => self.bind_tuple_parameters(nested),
                AnyParameter::Star(_) | AnyParameter::Slash(_) => {}
            }
        }
    }

    /// Shared handling of `import ...` and `from M import ...` names.
    fn create_imported_names(
        &mut self,
        names: &'a [AliasedName],
        from_module: Option<&str>,
        dotted_prefix: usize,
    ) {
        for aliased in names {
            let Some(first) = aliased.dotted_name.first() else {
                continue;
            };
            let base = match from_module {
                Some(module) => format!("{module}.{}", first.name),
                None => first.name.clone(),
            };
            let fqn = if dotted_prefix > 0 {
                self.resolve_relative(dotted_prefix, &base)
            } else {
                Some(base)
            };
            let scope = self.current_scope();
            if from_module.is_some() {
                let target = aliased.alias.as_ref().unwrap_or(first);
                let descriptor = fqn.as_deref().and_then(|f| {
                    self.ctx.global_index.and_then(|index| index.symbol_by_fqn(f))
                });
                self.ctx.table.add_imported_symbol(scope, target, fqn, descriptor);
            } else if let Some(alias) = &aliased.alias {
                let full = if dotted_prefix > 0 {
                    fqn
                } else {
                    Some(aliased.dotted())
                };
                let module_symbols = full.as_deref().and_then(|m| self.module_symbols(m));
                self.ctx
                    .table
                    .add_module_symbol(scope, alias, full, module_symbols);
            } else {
                let module_symbols = fqn.as_deref().and_then(|m| self.module_symbols(m));
                self.ctx
                    .table
                    .add_module_symbol(scope, first, fqn, module_symbols);
            }
        }
    }

    fn module_symbols(&self, module: &str) -> Option<&'a [SymbolDescriptor]> {
        self.ctx
            .global_index
            .and_then(|index| index.module_symbols(module))
            .or_else(|| {
                self.ctx
                    .stub_index
                    .and_then(|index| index.symbols_for_module(module))
            })
    }

    /// Resolve a relative import by truncating the file path by the dotted
    /// prefix length. `None` when the prefix climbs past the project root.
    fn resolve_relative(&self, dotted_prefix: usize, module_name: &str) -> Option<String> {
        if dotted_prefix > self.ctx.file_path.len() {
            return None;
        }
        let kept = &self.ctx.file_path[..self.ctx.file_path.len() - dotted_prefix];
        let resolved = kept.join(".");
        if resolved.is_empty() {
            Some(module_name.to_string())
        } else {
            Some(format!("{resolved}.{module_name}"))
        }
    }

    fn handle_wildcard_import(&mut self, node: &'a ImportFrom) {
        let module_name = node.module_name();
        let mut symbols: Option<&'a [SymbolDescriptor]> = module_name.as_deref().and_then(|m| {
            self.ctx
                .global_index
                .and_then(|index| index.module_symbols(m))
        });
        if symbols.is_none() {
            if let Some(module) = module_name.as_deref() {
                if module != self.ctx.module_fqn && !self.ctx.source_file.is_stub() {
                    symbols = self
                        .ctx
                        .stub_index
                        .and_then(|index| index.symbols_for_module(module));
                }
            }
        }
        match symbols {
            Some(symbols) if !symbols.is_empty() => {
                let scope = self.current_scope();
                self.ctx
                    .table
                    .create_symbols_from_wildcard_import(scope, symbols);
            }
            _ => {
                debug!(module = ?module_name, "unresolved wildcard import");
                self.ctx
                    .table
                    .unresolved_wildcard_imports
                    .insert(node.node_id);
            }
        }
    }

    fn bind_targets(&mut self, target: &'a Expression, kind: UsageKind, with_fqn: bool) {
        let scope = self.current_scope();
        for name in bound_names_from_expression(target) {
            let fqn = if with_fqn {
                self.qualified_name_for(&name.name)
            } else {
                None
            };
            self.ctx.table.add_binding_usage(scope, name, kind, fqn);
        }
    }

    fn collect_assignment_lhs(&mut self, target: &'a Expression) {
        for leaf in assignment_target_leaves(target) {
            self.ctx.assignment_lhs.insert(leaf.node_id());
        }
    }
}

impl<'c, 'a> Visitor<'a> for BindingPass<'c, 'a> {
    fn visit_file_input(&mut self, node: &'a FileInput) -> VisitResult {
        let module_fqn = self.ctx.module_fqn.clone();
        let scope =
            self.ctx
                .table
                .create_scope(node.node_id, ScopeKind::Module, None, Some(module_fqn));
        self.scope_stack.push(scope);

        // Base stub modules must not see themselves through the builtin
        // namespace while their own summaries are being built.
        let skip_builtins = self.ctx.source_file.is_stub()
            && BASE_MODULES.contains(&self.ctx.source_file.module_name());
        if !skip_builtins {
            let stub_index = self.ctx.stub_index;
            for name in BUILTIN_NAMES {
                let descriptor = stub_index.and_then(|index| index.builtin_symbols().get(*name));
                self.ctx.table.create_builtin_symbol(name, descriptor);
            }
            self.ctx.table.resolve_pending_hierarchies();
            trace!("seeded builtin namespace");
        }
        VisitResult::Continue
    }

    fn leave_file_input(&mut self, _node: &'a FileInput) {
        self.scope_stack.pop();
    }

    fn visit_function_def(&mut self, node: &'a FunctionDef) -> VisitResult {
        let fqn = self.qualified_name_for(&node.name.name);
        self.add_function_symbol(node, fqn);
        self.ctx.function_defs.insert(node.name.node_id, node);

        let parent = self.current_scope();
        let is_method = self.ctx.table.scope(parent).kind() == ScopeKind::Class;
        let qualified_name = self.scope_qualified_name(&node.name);
        let scope =
            self.ctx
                .table
                .create_scope(node.node_id, ScopeKind::Function, Some(parent), qualified_name);
        self.scope_stack.push(scope);
        self.create_parameters(&node.parameters, is_method);
        VisitResult::Continue
    }

    fn leave_function_def(&mut self, _node: &'a FunctionDef) {
        self.scope_stack.pop();
    }

    fn visit_class_def(&mut self, node: &'a ClassDef) -> VisitResult {
        let fqn = self.qualified_name_for(&node.name.name);
        self.add_class_symbol(node, fqn);
        self.ctx.class_defs.insert(node.name.node_id, node);

        let parent = self.current_scope();
        let qualified_name = self.scope_qualified_name(&node.name);
        let scope =
            self.ctx
                .table
                .create_scope(node.node_id, ScopeKind::Class, Some(parent), qualified_name);
        self.scope_stack.push(scope);
        VisitResult::Continue
    }

    fn leave_class_def(&mut self, _node: &'a ClassDef) {
        self.scope_stack.pop();
    }

    fn visit_lambda(&mut self, node: &'a LambdaExpression) -> VisitResult {
        let parent = self.current_scope();
        let qualified_name = Some(self.ctx.module_fqn.clone());
        let scope =
            self.ctx
                .table
                .create_scope(node.node_id, ScopeKind::Lambda, Some(parent), qualified_name);
        self.scope_stack.push(scope);
        self.create_parameters(&node.parameters, false);
        VisitResult::Continue
    }

    fn leave_lambda(&mut self, _node: &'a LambdaExpression) {
        self.scope_stack.pop();
    }

    fn visit_comprehension(&mut self, node: &'a ComprehensionExpression) -> VisitResult {
        let parent = self.current_scope();
        let qualified_name = Some(self.ctx.module_fqn.clone());
        let scope = self.ctx.table.create_scope(
            node.node_id,
            ScopeKind::Comprehension,
            Some(parent),
            qualified_name,
        );
        self.scope_stack.push(scope);
        VisitResult::Continue
    }

    fn leave_comprehension(&mut self, _node: &'a ComprehensionExpression) {
        self.scope_stack.pop();
    }

    fn visit_dict_comp(&mut self, node: &'a DictCompExpression) -> VisitResult {
        let parent = self.current_scope();
        let qualified_name = Some(self.ctx.module_fqn.clone());
        let scope = self.ctx.table.create_scope(
            node.node_id,
            ScopeKind::Comprehension,
            Some(parent),
            qualified_name,
        );
        self.scope_stack.push(scope);
        VisitResult::Continue
    }

    fn leave_dict_comp(&mut self, _node: &'a DictCompExpression) {
        self.scope_stack.pop();
    }

    fn visit_comp_for(&mut self, node: &'a ComprehensionFor) -> VisitResult {
        self.bind_targets(&node.target, UsageKind::CompDeclaration, false);
        VisitResult::Continue
    }

    fn visit_for_stmt(&mut self, node: &'a ForStatement) -> VisitResult {
        self.bind_targets(&node.target, UsageKind::LoopDeclaration, false);
        self.collect_assignment_lhs(&node.target);
        VisitResult::Continue
    }

    fn visit_assignment(&mut self, node: &'a Assignment) -> VisitResult {
        for target in &node.targets {
            self.collect_assignment_lhs(target);
            self.bind_targets(target, UsageKind::AssignmentLhs, true);
        }
        VisitResult::Continue
    }

    fn visit_annotated_assignment(&mut self, node: &'a AnnotatedAssignment) -> VisitResult {
        if let Expression::Name(name) = &node.target {
            let fqn = self.qualified_name_for(&name.name);
            let scope = self.current_scope();
            self.ctx
                .table
                .add_binding_usage(scope, name, UsageKind::AssignmentLhs, fqn);
        }
        self.collect_assignment_lhs(&node.target);
        VisitResult::Continue
    }

    fn visit_compound_assignment(&mut self, node: &'a CompoundAssignment) -> VisitResult {
        if let Expression::Name(name) = &node.target {
            let scope = self.current_scope();
            self.ctx.table.add_binding_usage(
                scope,
                name,
                UsageKind::CompoundAssignmentLhs,
                None,
            );
        }
        self.collect_assignment_lhs(&node.target);
        VisitResult::Continue
    }

    fn visit_assignment_expression(&mut self, node: &'a AssignmentExpression) -> VisitResult {
        let scope = self.current_scope();
        self.ctx
            .table
            .add_binding_usage(scope, &node.name, UsageKind::AssignmentLhs, None);
        self.ctx.assignment_lhs.insert(node.name.node_id);
        VisitResult::Continue
    }

    fn visit_global_stmt(&mut self, node: &'a GlobalStatement) -> VisitResult {
        // Not binding usages proper, but a module-scope symbol must exist
        // for the redirected name.
        let module = self.ctx.table.module_scope_id();
        let scope = self.current_scope();
        for name in &node.names {
            self.ctx
                .table
                .add_binding_usage(module, name, UsageKind::GlobalDeclaration, None);
            self.ctx.table.add_global_name(scope, &name.name);
        }
        VisitResult::SkipChildren
    }

    fn visit_nonlocal_stmt(&mut self, node: &'a NonlocalStatement) -> VisitResult {
        let scope = self.current_scope();
        for name in &node.names {
            self.ctx.table.add_nonlocal_name(scope, &name.name);
        }
        VisitResult::SkipChildren
    }

    fn visit_except_clause(&mut self, node: &'a ExceptClause) -> VisitResult {
        if let Some(target) = &node.target {
            self.bind_targets(target, UsageKind::ExceptionInstance, false);
            self.collect_assignment_lhs(target);
        }
        VisitResult::Continue
    }

    fn visit_with_item(&mut self, node: &'a WithItem) -> VisitResult {
        if let Some(target) = &node.target {
            self.bind_targets(target, UsageKind::WithInstance, false);
            self.collect_assignment_lhs(target);
        }
        VisitResult::Continue
    }

    fn visit_import_name(&mut self, node: &'a ImportName) -> VisitResult {
        self.create_imported_names(&node.modules, None, 0);
        VisitResult::SkipChildren
    }

    fn visit_import_from(&mut self, node: &'a ImportFrom) -> VisitResult {
        match &node.names {
            ImportedNames::Star => self.handle_wildcard_import(node),
            ImportedNames::Names(names) => {
                let module_name = node.module_name();
                self.create_imported_names(names, module_name.as_deref(), node.dotted_prefix);
            }
        }
        VisitResult::SkipChildren
    }
}

/// The names bound by an assignment-like target expression: names inside
/// tuples, lists, and starred expressions. Qualified expressions and
/// subscripts bind nothing in the current scope.
pub(crate) fn bound_names_from_expression(expr: &Expression) -> Vec<&Name> {
    let mut names = Vec::new();
    collect_bound_names(expr, &mut names);
    names
}

fn collect_bound_names<'e>(expr: &'e Expression, out: &mut Vec<&'e Name>) {
    match expr {
        Expression::Name(name) => out.push(name),
        Expression::Tuple(tuple) => {
            for element in &tuple.elements {
                collect_bound_names(element, out);
            }
        }
        Expression::List(list) => {
            for element in &list.elements {
                collect_bound_names(element, out);
            }
        }
        Expression::Starred(starred) => collect_bound_names(&starred.value, out),
        _ => {}
    }
}

/// The leaf expressions of an assignment target, flattening tuple and list
/// structure. These feed the LHS side set the reference pass consults for
/// qualified-expression usage kinds.
pub(crate) fn assignment_target_leaves(expr: &Expression) -> Vec<&Expression> {
    let mut leaves = Vec::new();
    collect_target_leaves(expr, &mut leaves);
    leaves
}

fn collect_target_leaves<'e>(expr: &'e Expression, out: &mut Vec<&'e Expression>) {
    match expr {
        Expression::Tuple(tuple) => {
            for element in &tuple.elements {
                collect_target_leaves(element, out);
            }
        }
        Expression::List(list) => {
            for element in &list.elements {
                collect_target_leaves(element, out);
            }
        }
        Expression::Starred(starred) => collect_target_leaves(&starred.value, out),
        _ => out.push(expr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::TreeBuilder;
    use crate::semantic::builder::SymbolTableBuilder;
    use crate::semantic::scope::ScopeKind;
    use crate::semantic::stubs::SourceFile;

    fn file() -> SourceFile {
        SourceFile::new("mod.py", "")
    }

    #[test]
    fn test_scope_hierarchy_is_created_in_preorder() {
        // class Outer:
        //     def method(self):
        //         f = lambda v: v
        let mut t = TreeBuilder::new();
        let v_param = t.param("v");
        let lambda_params = t.parameters(vec![v_param]);
        let v_read = t.name("v");
        let lambda = t.lambda(lambda_params, v_read);
        let f = t.name("f");
        let assign = t.assign(vec![f], lambda);
        let self_param = t.param("self");
        let method_params = t.parameters(vec![self_param]);
        let method = t.function_def("method", method_params, vec![assign]);
        let class = t.class_def("Outer", vec![], vec![method]);
        let tree = t.file_input(vec![class]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        let kinds: Vec<ScopeKind> = table.scopes().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ScopeKind::Module,
                ScopeKind::Class,
                ScopeKind::Function,
                ScopeKind::Lambda
            ]
        );
    }

    #[test]
    fn test_import_binds_first_dotted_component() {
        // import os.path
        let mut t = TreeBuilder::new();
        let module = t.aliased_name(&["os", "path"], None);
        let import = t.import(vec![module]);
        let tree = t.file_input(vec![import]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        let os = table.module_scope().symbol("os").expect("os bound");
        assert!(table.module_scope().symbol("path").is_none());
        assert_eq!(table.symbol(os).usages()[0].kind, UsageKind::Import);
        assert_eq!(table.symbol(os).fully_qualified_name(), Some("os"));
    }

    #[test]
    fn test_import_alias_binds_full_dotted_fqn() {
        // import os.path as p
        let mut t = TreeBuilder::new();
        let module = t.aliased_name(&["os", "path"], Some("p"));
        let import = t.import(vec![module]);
        let tree = t.file_input(vec![import]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        let p = table.module_scope().symbol("p").expect("alias bound");
        assert!(table.module_scope().symbol("os").is_none());
        assert_eq!(table.symbol(p).fully_qualified_name(), Some("os.path"));
    }

    #[test]
    fn test_tuple_parameters_destructure_recursively() {
        // def f((a, (b, c))): pass
        let mut t = TreeBuilder::new();
        let a = t.param("a");
        let b = t.param("b");
        let c = t.param("c");
        let inner = t.tuple_param(vec![b, c]);
        let outer = t.tuple_param(vec![a, inner]);
        let params = t.parameters(vec![outer]);
        let body = vec![t.pass_stmt()];
        let def = t.function_def("f", params, body);
        let tree = t.file_input(vec![def]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        let crate::nodes::Statement::FunctionDef(def) = &tree.statements[0] else {
            panic!("expected function def");
        };
        let scope = table.scope_at(def.node_id).unwrap();
        for name in ["a", "b", "c"] {
            let id = table.scope(scope).symbol(name).expect("param bound");
            assert_eq!(table.symbol(id).usages()[0].kind, UsageKind::Parameter);
        }
    }

    #[test]
    fn test_self_parameter_is_flagged_only_in_methods() {
        // class C:
        //     def m(self): pass
        // def free(self): pass
        let mut t = TreeBuilder::new();
        let m_self = t.param("self");
        let m_params = t.parameters(vec![m_self]);
        let m_body = vec![t.pass_stmt()];
        let method = t.function_def("m", m_params, m_body);
        let class = t.class_def("C", vec![], vec![method]);
        let free_self = t.param("self");
        let free_params = t.parameters(vec![free_self]);
        let free_body = vec![t.pass_stmt()];
        let free = t.function_def("free", free_params, free_body);
        let tree = t.file_input(vec![class, free]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);

        let crate::nodes::Statement::ClassDef(class_def) = &tree.statements[0] else {
            panic!("expected class def");
        };
        let crate::nodes::Statement::FunctionDef(method_def) = &class_def.body[0] else {
            panic!("expected method def");
        };
        let method_scope = table.scope_at(method_def.node_id).unwrap();
        let method_self = table.scope(method_scope).symbol("self").unwrap();
        assert!(table.symbol(method_self).is_self_parameter());

        let crate::nodes::Statement::FunctionDef(free_def) = &tree.statements[1] else {
            panic!("expected free def");
        };
        let free_scope = table.scope_at(free_def.node_id).unwrap();
        let free_self = table.scope(free_scope).symbol("self").unwrap();
        assert!(!table.symbol(free_self).is_self_parameter());
    }

    #[test]
    fn test_assignment_side_set_covers_tuple_leaves() {
        // (a, obj.attr) = value
        let mut t = TreeBuilder::new();
        let a = t.name("a");
        let obj = t.name("obj");
        let attr = t.qualified(obj, "attr");
        let attr_id = attr.node_id();
        let target = t.tuple(vec![a, attr]);
        let value = t.name("value");
        let assign = t.assign(vec![target], value);
        let tree = t.file_input(vec![assign]);

        let leaves = {
            let crate::nodes::Statement::Assignment(assign) = &tree.statements[0] else {
                panic!("expected assignment");
            };
            assignment_target_leaves(&assign.targets[0])
        };
        assert_eq!(leaves.len(), 2);
        assert!(leaves.iter().any(|e| e.node_id() == attr_id));
    }

    #[test]
    fn test_bound_names_skip_non_binding_leaves() {
        // (a, obj.attr, items[0]) binds only `a`
        let mut t = TreeBuilder::new();
        let a = t.name("a");
        let obj = t.name("obj");
        let attr = t.qualified(obj, "attr");
        let items = t.name("items");
        let zero = t.int("0");
        let sub = t.subscript(items, zero);
        let target = t.tuple(vec![a, attr, sub]);

        let names = bound_names_from_expression(&target);
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].name, "a");
    }
}
