// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The reference pass: second traversal.
//!
//! Resolves every variable read to a symbol in the visible scope chain and
//! records child usages for qualified expressions. Reads cannot be handled
//! in the binding pass because a read may appear in the tree before the
//! binding it refers to.
//!
//! Three visit-order contracts live here and must not be simplified away:
//!
//! - a parameter's default value is visited with the function scope
//!   popped, so it resolves in the enclosing scope;
//! - a comprehension's outermost iterable is visited in the enclosing
//!   scope; result, targets, and nested clauses in the comprehension
//!   scope;
//! - a function's decorators and return annotation are visited before
//!   entering the function scope.

use crate::nodes::{
    ClassDef, ComprehensionExpression, ComprehensionFor, Decorator, DictCompExpression, FileInput,
    FunctionDef, LambdaExpression, Name, Parameter, QualifiedExpression,
};
use crate::semantic::builder::BuildContext;
use crate::semantic::scope::ScopeId;
use crate::semantic::symbol::UsageKind;
use crate::visitor::{
    walk_argument, walk_comprehension_clause, walk_decorator, walk_expression, walk_file_input,
    walk_name, walk_parameter_list, walk_statement, VisitResult, Visitor,
};

/// Second-phase visitor. See the module docs.
pub(crate) struct ReferencePass<'c, 'a> {
    ctx: &'c mut BuildContext<'a>,
    scope_stack: Vec<ScopeId>,
}

impl<'c, 'a> ReferencePass<'c, 'a> {
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

    fn enter_scope_at(&mut self, anchor: crate::nodes::NodeId) {
        let scope = self
            .ctx
            .table
            .scope_at(anchor)
            .expect("scope created by the binding pass");
        self.scope_stack.push(scope);
    }

    fn leave_scope(&mut self) {
        self.scope_stack.pop();
    }

    /// Resolve a read and append an `Other` usage, deduplicated by name
    /// node identity so re-running the builder never duplicates usages.
    fn add_symbol_usage(&mut self, name: &'a Name) {
        let scope = self.current_scope();
        if let Some(id) = self.ctx.table.resolve(scope, &name.name) {
            if !self.ctx.table.symbol(id).has_usage_at(name.node_id) {
                self.ctx.table.add_usage(id, name.node_id, UsageKind::Other);
            }
        }
    }

    /// Resolve the base-class hierarchy of a class def. Arguments were
    /// scanned just before entering the class scope, so base names carry
    /// their symbols already. Unresolvable bases taint the hierarchy.
    fn resolve_type_hierarchy(&mut self, node: &'a ClassDef) {
        let Some(class_symbol) = self.ctx.table.symbol_id_of(node.name.node_id) else {
            return;
        };
        if self.ctx.table.symbol(class_symbol).class_data().is_none() {
            return;
        }
        let mut superclasses = Vec::new();
        let mut unresolved = false;
        for argument in &node.arguments {
            if argument.keyword.is_some() {
                continue;
            }
            match self.ctx.table.expression_symbol(&argument.value) {
                Some(base) if self.ctx.table.symbol(base).class_data().is_some() => {
                    superclasses.push(base);
                }
                _ => unresolved = true,
            }
        }
        let data = self
            .ctx
            .table
            .symbol_mut(class_symbol)
            .class_data_mut()
            .expect("checked to be a class symbol");
        data.superclasses = superclasses;
        data.has_unresolved_hierarchy |= unresolved;
    }

    /// Visit the pieces of a comprehension's `for` clause chain with the
    /// scope ordering exception: the outermost iterable resolves in the
    /// enclosing scope.
    fn walk_comprehension_clauses(&mut self, anchor: crate::nodes::NodeId, comp_for: &'a ComprehensionFor) {
        let _ = walk_expression(self, &comp_for.target);
        self.leave_scope();
        let _ = walk_expression(self, &comp_for.iterable);
        self.enter_scope_at(anchor);
        if let Some(nested) = &comp_for.nested {
            let _ = walk_comprehension_clause(self, nested);
        }
    }
}

impl<'c, 'a> Visitor<'a> for ReferencePass<'c, 'a> {
    fn visit_file_input(&mut self, node: &'a FileInput) -> VisitResult {
        self.enter_scope_at(node.node_id);
        VisitResult::Continue
    }

    fn leave_file_input(&mut self, _node: &'a FileInput) {
        self.leave_scope();
    }

    fn visit_function_def(&mut self, node: &'a FunctionDef) -> VisitResult {
        for decorator in &node.decorators {
            let _ = walk_decorator(self, decorator);
        }
        if let Some(annotation) = &node.return_annotation {
            let _ = walk_expression(self, annotation);
        }
        self.enter_scope_at(node.node_id);
        let _ = walk_name(self, &node.name);
        let _ = walk_parameter_list(self, &node.parameters);
        for stmt in &node.body {
            let _ = walk_statement(self, stmt);
        }
        self.leave_scope();
        VisitResult::SkipChildren
    }

    fn visit_param(&mut self, node: &'a Parameter) -> VisitResult {
        // The default value is evaluated in the function's enclosing
        // scope, not the function scope.
        let function_scope = self.scope_stack.pop().expect("scope stack is empty");
        if let Some(default) = &node.default {
            let _ = walk_expression(self, default);
        }
        self.scope_stack.push(function_scope);
        let _ = walk_name(self, &node.name);
        if let Some(annotation) = &node.annotation {
            let _ = walk_expression(self, annotation);
        }
        VisitResult::SkipChildren
    }

    fn visit_lambda(&mut self, node: &'a LambdaExpression) -> VisitResult {
        self.enter_scope_at(node.node_id);
        let _ = walk_parameter_list(self, &node.parameters);
        let _ = walk_expression(self, &node.body);
        self.leave_scope();
        VisitResult::SkipChildren
    }

    fn visit_class_def(&mut self, node: &'a ClassDef) -> VisitResult {
        for argument in &node.arguments {
            let _ = walk_argument(self, argument);
        }
        for decorator in &node.decorators {
            let _ = walk_decorator(self, decorator);
        }
        self.enter_scope_at(node.node_id);
        let _ = walk_name(self, &node.name);
        self.resolve_type_hierarchy(node);
        for stmt in &node.body {
            let _ = walk_statement(self, stmt);
        }
        self.leave_scope();
        VisitResult::SkipChildren
    }

    fn visit_comprehension(&mut self, node: &'a ComprehensionExpression) -> VisitResult {
        self.enter_scope_at(node.node_id);
        let _ = walk_expression(self, &node.result);
        self.walk_comprehension_clauses(node.node_id, &node.comp_for);
        self.leave_scope();
        VisitResult::SkipChildren
    }

    fn visit_dict_comp(&mut self, node: &'a DictCompExpression) -> VisitResult {
        self.enter_scope_at(node.node_id);
        let _ = walk_expression(self, &node.key);
        let _ = walk_expression(self, &node.value);
        self.walk_comprehension_clauses(node.node_id, &node.comp_for);
        self.leave_scope();
        VisitResult::SkipChildren
    }

    fn visit_name(&mut self, node: &'a Name) -> VisitResult {
        if node.is_variable {
            self.add_symbol_usage(node);
        }
        VisitResult::Continue
    }

    fn visit_decorator(&mut self, node: &'a Decorator) -> VisitResult {
        // Only the first component of the dotted name is a resolvable
        // read; the rest are attribute accesses on it.
        if let Some(first) = node.name.first() {
            self.add_symbol_usage(first);
        }
        VisitResult::Continue
    }

    fn leave_qualified_expression(&mut self, node: &'a QualifiedExpression) {
        // The qualifier has been visited, so its symbol slot is final.
        let Some(qualifier) = self.ctx.table.expression_symbol(&node.qualifier) else {
            return;
        };
        let kind = if self.ctx.assignment_lhs.contains(&node.node_id) {
            UsageKind::AssignmentLhs
        } else {
            UsageKind::Other
        };
        self.ctx
            .table
            .add_or_create_child_usage(qualifier, &node.name, kind);
    }
}

#[cfg(test)]
mod tests {
    use crate::nodes::{Statement, TreeBuilder};
    use crate::semantic::builder::SymbolTableBuilder;
    use crate::semantic::stubs::SourceFile;
    use crate::semantic::symbol::UsageKind;

    fn file() -> SourceFile {
        SourceFile::new("mod.py", "")
    }

    #[test]
    fn test_read_before_binding_still_resolves() {
        // def f():
        //     return helper()
        // def helper(): pass
        let mut t = TreeBuilder::new();
        let helper_read = t.name("helper");
        let helper_read_id = helper_read.node_id();
        let call = t.call(helper_read, vec![]);
        let ret = t.return_stmt(Some(call));
        let f_params = t.no_parameters();
        let f = t.function_def("f", f_params, vec![ret]);
        let helper_params = t.no_parameters();
        let helper_body = vec![t.pass_stmt()];
        let helper = t.function_def("helper", helper_params, helper_body);
        let tree = t.file_input(vec![f, helper]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        let helper_sym = table.module_scope().symbol("helper").unwrap();
        assert_eq!(table.symbol_id_of(helper_read_id), Some(helper_sym));
        assert!(table
            .symbol(helper_sym)
            .usages()
            .iter()
            .any(|u| u.node == helper_read_id && u.kind == UsageKind::Other));
    }

    #[test]
    fn test_unresolved_read_leaves_slot_empty() {
        let mut t = TreeBuilder::new();
        let mystery = t.name("mystery");
        let mystery_id = mystery.node_id();
        let stmt = t.expr_stmt(mystery);
        let tree = t.file_input(vec![stmt]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        assert_eq!(table.symbol_id_of(mystery_id), None);
    }

    #[test]
    fn test_decorator_first_component_resolves() {
        // def deco(f): pass
        // @deco
        // def g(): pass
        let mut t = TreeBuilder::new();
        let deco_f = t.param("f");
        let deco_params = t.parameters(vec![deco_f]);
        let deco_body = vec![t.pass_stmt()];
        let deco = t.function_def("deco", deco_params, deco_body);
        let decorator = t.decorator(&["deco"]);
        let g_name = t.name_node("g");
        let g_params = t.no_parameters();
        let g_body = vec![t.pass_stmt()];
        let g = t.function_def_full(g_name, vec![decorator], g_params, None, g_body, false);
        let tree = t.file_input(vec![deco, g]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        let deco_sym = table.module_scope().symbol("deco").unwrap();
        // Declaration plus the decorator read.
        assert_eq!(table.symbol(deco_sym).usages().len(), 2);
    }

    #[test]
    fn test_qualified_store_records_assignment_child_usage() {
        // obj = thing()
        // obj.attr = 1
        let mut t = TreeBuilder::new();
        let obj = t.name("obj");
        let thing = t.name("thing");
        let call = t.call(thing, vec![]);
        let bind_obj = t.assign(vec![obj], call);
        let obj_read = t.name("obj");
        let attr = t.qualified(obj_read, "attr");
        let one = t.int("1");
        let store = t.assign(vec![attr], one);
        let tree = t.file_input(vec![bind_obj, store]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        let obj_sym = table.module_scope().symbol("obj").unwrap();
        let child = table.symbol(obj_sym).children()["attr"];
        assert_eq!(
            table.symbol(child).usages()[0].kind,
            UsageKind::AssignmentLhs
        );
    }

    #[test]
    fn test_return_annotation_resolves_outside_function_scope() {
        // Result = 1
        // def f() -> Result:
        //     Result = 2
        let mut t = TreeBuilder::new();
        let r1 = t.name("Result");
        let one = t.int("1");
        let module_assign = t.assign(vec![r1], one);
        let annotation = t.name("Result");
        let annotation_id = annotation.node_id();
        let r2 = t.name("Result");
        let two = t.int("2");
        let local_assign = t.assign(vec![r2], two);
        let f_name = t.name_node("f");
        let f_params = t.no_parameters();
        let f = t.function_def_full(
            f_name,
            vec![],
            f_params,
            Some(annotation),
            vec![local_assign],
            false,
        );
        let tree = t.file_input(vec![module_assign, f]);

        let source = file();
        let table = SymbolTableBuilder::new(&source).build(&tree);
        let module_result = table.module_scope().symbol("Result").unwrap();
        assert_eq!(table.symbol_id_of(annotation_id), Some(module_result));

        let Statement::FunctionDef(def) = &tree.statements[1] else {
            panic!("expected function def");
        };
        let local = table
            .scope(table.scope_at(def.node_id).unwrap())
            .symbol("Result")
            .unwrap();
        assert_ne!(local, module_result);
    }
}
