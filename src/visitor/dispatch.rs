// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions defining the canonical traversal order.
//!
//! Each `walk_*` function calls the node's `visit_*` hook, descends into
//! children in source order unless `SkipChildren` was returned, then calls
//! `leave_*`. A `Stop` result propagates out of the whole walk.
//!
//! Visitors that need a different child order (the symbol-table passes do,
//! for parameter defaults and comprehension iterables) return
//! `SkipChildren` from the `visit_*` hook and invoke `walk_*` on the
//! children themselves.

use super::traits::{VisitResult, Visitor};
use crate::nodes::{
    AliasedName, AnnotatedAssignment, AnyParameter, Argument, Assignment, AssignmentExpression,
    BinaryOperation, BooleanLiteral, CallExpression, ClassDef, ComprehensionClause,
    ComprehensionExpression, ComprehensionFor, ComprehensionIf, CompoundAssignment,
    ConditionalExpression, Decorator, DictCompExpression, DictElement, DictLiteral,
    EllipsisLiteral, ExceptClause, Expression, ExpressionStatement, FileInput, ForStatement,
    FunctionDef, GlobalStatement, IfStatement, ImportFrom, ImportName, ImportedNames,
    LambdaExpression, ListLiteral, Name, NoneLiteral, NonlocalStatement, NumberLiteral,
    ParamSlash, ParamStar, Parameter, ParameterList, PassStatement, QualifiedExpression,
    ReturnStatement, SetLiteral, StarredExpression, Statement, StringLiteral,
    SubscriptExpression, TryStatement, TupleLiteral, TupleParameter, UnaryOperation,
    WhileStatement, WithItem, WithStatement,
};

/// Propagates `Stop` out of the enclosing walk function.
macro_rules! try_walk {
    ($e:expr) => {
        if $e == VisitResult::Stop {
            return VisitResult::Stop;
        }
    };
}

/// Runs a node's visit/children/leave cycle.
///
/// `$children` is a block walking the children; it runs only on `Continue`.
macro_rules! walk_node {
    ($visitor:ident, $node:ident, $visit:ident, $leave:ident, $children:block) => {{
        match $visitor.$visit($node) {
            VisitResult::Continue => $children,
            VisitResult::SkipChildren => {}
            VisitResult::Stop => return VisitResult::Stop,
        }
        $visitor.$leave($node);
        VisitResult::Continue
    }};
}

/// Walk a whole file.
pub fn walk_file_input<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a FileInput) -> VisitResult {
    walk_node!(v, node, visit_file_input, leave_file_input, {
        for stmt in &node.statements {
            try_walk!(walk_statement(v, stmt));
        }
    })
}

/// Walk a statement, firing the enum-level hook then the concrete one.
pub fn walk_statement<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a Statement) -> VisitResult {
    walk_node!(v, node, visit_statement, leave_statement, {
        try_walk!(match node {
            Statement::FunctionDef(s) => walk_function_def(v, s),
            Statement::ClassDef(s) => walk_class_def(v, s),
            Statement::Assignment(s) => walk_assignment(v, s),
            Statement::AnnotatedAssignment(s) => walk_annotated_assignment(v, s),
            Statement::CompoundAssignment(s) => walk_compound_assignment(v, s),
            Statement::Expression(s) => walk_expression_statement(v, s),
            Statement::If(s) => walk_if_stmt(v, s),
            Statement::While(s) => walk_while_stmt(v, s),
            Statement::For(s) => walk_for_stmt(v, s),
            Statement::With(s) => walk_with_stmt(v, s),
            Statement::Try(s) => walk_try_stmt(v, s),
            Statement::ImportName(s) => walk_import_name(v, s),
            Statement::ImportFrom(s) => walk_import_from(v, s),
            Statement::Global(s) => walk_global_stmt(v, s),
            Statement::Nonlocal(s) => walk_nonlocal_stmt(v, s),
            Statement::Return(s) => walk_return_stmt(v, s),
            Statement::Pass(s) => walk_pass_stmt(v, s),
        });
    })
}

/// Walk a function definition: decorators, name, parameters, return
/// annotation, body.
pub fn walk_function_def<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a FunctionDef,
) -> VisitResult {
    walk_node!(v, node, visit_function_def, leave_function_def, {
        for decorator in &node.decorators {
            try_walk!(walk_decorator(v, decorator));
        }
        try_walk!(walk_name(v, &node.name));
        try_walk!(walk_parameter_list(v, &node.parameters));
        if let Some(annotation) = &node.return_annotation {
            try_walk!(walk_expression(v, annotation));
        }
        for stmt in &node.body {
            try_walk!(walk_statement(v, stmt));
        }
    })
}

/// Walk a class definition: decorators, name, arguments, body.
pub fn walk_class_def<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a ClassDef) -> VisitResult {
    walk_node!(v, node, visit_class_def, leave_class_def, {
        for decorator in &node.decorators {
            try_walk!(walk_decorator(v, decorator));
        }
        try_walk!(walk_name(v, &node.name));
        for arg in &node.arguments {
            try_walk!(walk_argument(v, arg));
        }
        for stmt in &node.body {
            try_walk!(walk_statement(v, stmt));
        }
    })
}

/// Walk a decorator: dotted name components then call arguments.
pub fn walk_decorator<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a Decorator) -> VisitResult {
    walk_node!(v, node, visit_decorator, leave_decorator, {
        for name in &node.name {
            try_walk!(walk_name(v, name));
        }
        if let Some(arguments) = &node.arguments {
            for arg in arguments {
                try_walk!(walk_argument(v, arg));
            }
        }
    })
}

/// Walk an assignment: targets then value.
pub fn walk_assignment<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a Assignment) -> VisitResult {
    walk_node!(v, node, visit_assignment, leave_assignment, {
        for target in &node.targets {
            try_walk!(walk_expression(v, target));
        }
        try_walk!(walk_expression(v, &node.value));
    })
}

/// Walk an annotated assignment: target, annotation, value.
pub fn walk_annotated_assignment<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a AnnotatedAssignment,
) -> VisitResult {
    walk_node!(v, node, visit_annotated_assignment, leave_annotated_assignment, {
        try_walk!(walk_expression(v, &node.target));
        try_walk!(walk_expression(v, &node.annotation));
        if let Some(value) = &node.value {
            try_walk!(walk_expression(v, value));
        }
    })
}

/// Walk an augmented assignment: target then value.
pub fn walk_compound_assignment<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a CompoundAssignment,
) -> VisitResult {
    walk_node!(v, node, visit_compound_assignment, leave_compound_assignment, {
        try_walk!(walk_expression(v, &node.target));
        try_walk!(walk_expression(v, &node.value));
    })
}

/// Walk a bare expression statement.
pub fn walk_expression_statement<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ExpressionStatement,
) -> VisitResult {
    walk_node!(v, node, visit_expression_statement, leave_expression_statement, {
        try_walk!(walk_expression(v, &node.expression));
    })
}

/// Walk an `if` statement.
pub fn walk_if_stmt<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a IfStatement) -> VisitResult {
    walk_node!(v, node, visit_if_stmt, leave_if_stmt, {
        try_walk!(walk_expression(v, &node.condition));
        for stmt in &node.body {
            try_walk!(walk_statement(v, stmt));
        }
        for stmt in &node.orelse {
            try_walk!(walk_statement(v, stmt));
        }
    })
}

/// Walk a `while` statement.
pub fn walk_while_stmt<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a WhileStatement,
) -> VisitResult {
    walk_node!(v, node, visit_while_stmt, leave_while_stmt, {
        try_walk!(walk_expression(v, &node.condition));
        for stmt in &node.body {
            try_walk!(walk_statement(v, stmt));
        }
        for stmt in &node.orelse {
            try_walk!(walk_statement(v, stmt));
        }
    })
}

/// Walk a `for` statement: target, iterable, body, else.
pub fn walk_for_stmt<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a ForStatement) -> VisitResult {
    walk_node!(v, node, visit_for_stmt, leave_for_stmt, {
        try_walk!(walk_expression(v, &node.target));
        try_walk!(walk_expression(v, &node.iterable));
        for stmt in &node.body {
            try_walk!(walk_statement(v, stmt));
        }
        for stmt in &node.orelse {
            try_walk!(walk_statement(v, stmt));
        }
    })
}

/// Walk a `with` statement: items then body.
pub fn walk_with_stmt<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a WithStatement,
) -> VisitResult {
    walk_node!(v, node, visit_with_stmt, leave_with_stmt, {
        for item in &node.items {
            try_walk!(walk_with_item(v, item));
        }
        for stmt in &node.body {
            try_walk!(walk_statement(v, stmt));
        }
    })
}

/// Walk one `with` item: context then target.
pub fn walk_with_item<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a WithItem) -> VisitResult {
    walk_node!(v, node, visit_with_item, leave_with_item, {
        try_walk!(walk_expression(v, &node.context));
        if let Some(target) = &node.target {
            try_walk!(walk_expression(v, target));
        }
    })
}

/// Walk a `try` statement: body, excepts, else, finally.
pub fn walk_try_stmt<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a TryStatement) -> VisitResult {
    walk_node!(v, node, visit_try_stmt, leave_try_stmt, {
        for stmt in &node.body {
            try_walk!(walk_statement(v, stmt));
        }
        for clause in &node.except_clauses {
            try_walk!(walk_except_clause(v, clause));
        }
        for stmt in &node.orelse {
            try_walk!(walk_statement(v, stmt));
        }
        for stmt in &node.finally {
            try_walk!(walk_statement(v, stmt));
        }
    })
}

/// Walk an `except` clause: exception, target, body.
pub fn walk_except_clause<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ExceptClause,
) -> VisitResult {
    walk_node!(v, node, visit_except_clause, leave_except_clause, {
        if let Some(exception) = &node.exception {
            try_walk!(walk_expression(v, exception));
        }
        if let Some(target) = &node.target {
            try_walk!(walk_expression(v, target));
        }
        for stmt in &node.body {
            try_walk!(walk_statement(v, stmt));
        }
    })
}

/// Walk an `import` statement.
pub fn walk_import_name<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ImportName,
) -> VisitResult {
    walk_node!(v, node, visit_import_name, leave_import_name, {
        for module in &node.modules {
            try_walk!(walk_aliased_name(v, module));
        }
    })
}

/// Walk a `from ... import ...` statement.
pub fn walk_import_from<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ImportFrom,
) -> VisitResult {
    walk_node!(v, node, visit_import_from, leave_import_from, {
        if let Some(module) = &node.module {
            for name in module {
                try_walk!(walk_name(v, name));
            }
        }
        if let ImportedNames::Names(names) = &node.names {
            for aliased in names {
                try_walk!(walk_aliased_name(v, aliased));
            }
        }
    })
}

/// Walk a dotted name with optional alias.
pub fn walk_aliased_name<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a AliasedName,
) -> VisitResult {
    walk_node!(v, node, visit_aliased_name, leave_aliased_name, {
        for name in &node.dotted_name {
            try_walk!(walk_name(v, name));
        }
        if let Some(alias) = &node.alias {
            try_walk!(walk_name(v, alias));
        }
    })
}

/// Walk a `global` statement.
pub fn walk_global_stmt<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a GlobalStatement,
) -> VisitResult {
    walk_node!(v, node, visit_global_stmt, leave_global_stmt, {
        for name in &node.names {
            try_walk!(walk_name(v, name));
        }
    })
}

/// Walk a `nonlocal` statement.
pub fn walk_nonlocal_stmt<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a NonlocalStatement,
) -> VisitResult {
    walk_node!(v, node, visit_nonlocal_stmt, leave_nonlocal_stmt, {
        for name in &node.names {
            try_walk!(walk_name(v, name));
        }
    })
}

/// Walk a `return` statement.
pub fn walk_return_stmt<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ReturnStatement,
) -> VisitResult {
    walk_node!(v, node, visit_return_stmt, leave_return_stmt, {
        if let Some(value) = &node.value {
            try_walk!(walk_expression(v, value));
        }
    })
}

/// Walk a `pass` statement.
pub fn walk_pass_stmt<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a PassStatement,
) -> VisitResult {
    walk_node!(v, node, visit_pass_stmt, leave_pass_stmt, {})
}

// ============================================================================
// Parameters
// ============================================================================

/// Walk a parameter list in source order.
pub fn walk_parameter_list<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ParameterList,
) -> VisitResult {
    walk_node!(v, node, visit_parameter_list, leave_parameter_list, {
        for param in &node.parameters {
            try_walk!(walk_any_parameter(v, param));
        }
    })
}

/// Dispatch one parameter-list entry.
pub fn walk_any_parameter<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a AnyParameter,
) -> VisitResult {
    match node {
        AnyParameter::Param(p) => walk_param(v, p),
        AnyParameter::Tuple(p) => walk_tuple_param(v, p),
        AnyParameter::Star(p) => walk_param_star(v, p),
        AnyParameter::Slash(p) => walk_param_slash(v, p),
    }
}

/// Walk a plain parameter: name, annotation, default.
pub fn walk_param<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a Parameter) -> VisitResult {
    walk_node!(v, node, visit_param, leave_param, {
        try_walk!(walk_name(v, &node.name));
        if let Some(annotation) = &node.annotation {
            try_walk!(walk_expression(v, annotation));
        }
        if let Some(default) = &node.default {
            try_walk!(walk_expression(v, default));
        }
    })
}

/// Walk a tuple parameter.
pub fn walk_tuple_param<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a TupleParameter,
) -> VisitResult {
    walk_node!(v, node, visit_tuple_param, leave_tuple_param, {
        for param in &node.parameters {
            try_walk!(walk_any_parameter(v, param));
        }
    })
}

/// Walk the bare `*` separator.
pub fn walk_param_star<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a ParamStar) -> VisitResult {
    walk_node!(v, node, visit_param_star, leave_param_star, {})
}

/// Walk the `/` separator.
pub fn walk_param_slash<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ParamSlash,
) -> VisitResult {
    walk_node!(v, node, visit_param_slash, leave_param_slash, {})
}

// ============================================================================
// Expressions
// ============================================================================

/// Walk an expression, firing the enum-level hook then the concrete one.
pub fn walk_expression<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a Expression,
) -> VisitResult {
    walk_node!(v, node, visit_expression, leave_expression, {
        try_walk!(match node {
            Expression::Name(e) => walk_name(v, e),
            Expression::Qualified(e) => walk_qualified_expression(v, e),
            Expression::Call(e) => walk_call(v, e),
            Expression::Lambda(e) => walk_lambda(v, e),
            Expression::Comprehension(e) => walk_comprehension(v, e),
            Expression::DictComp(e) => walk_dict_comp(v, e),
            Expression::Assignment(e) => walk_assignment_expression(v, e),
            Expression::Tuple(e) => walk_tuple_literal(v, e),
            Expression::List(e) => walk_list_literal(v, e),
            Expression::Set(e) => walk_set_literal(v, e),
            Expression::Dict(e) => walk_dict_literal(v, e),
            Expression::Subscript(e) => walk_subscript(v, e),
            Expression::Starred(e) => walk_starred(v, e),
            Expression::Binary(e) => walk_binary_operation(v, e),
            Expression::Unary(e) => walk_unary_operation(v, e),
            Expression::Conditional(e) => walk_conditional_expression(v, e),
            Expression::Number(e) => walk_number_literal(v, e),
            Expression::Str(e) => walk_string_literal(v, e),
            Expression::Bool(e) => walk_boolean_literal(v, e),
            Expression::None(e) => walk_none_literal(v, e),
            Expression::Ellipsis(e) => walk_ellipsis_literal(v, e),
        });
    })
}

/// Walk a name (leaf).
pub fn walk_name<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a Name) -> VisitResult {
    walk_node!(v, node, visit_name, leave_name, {})
}

/// Walk a qualified expression: qualifier then attribute name.
pub fn walk_qualified_expression<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a QualifiedExpression,
) -> VisitResult {
    walk_node!(v, node, visit_qualified_expression, leave_qualified_expression, {
        try_walk!(walk_expression(v, &node.qualifier));
        try_walk!(walk_name(v, &node.name));
    })
}

/// Walk a call: callee then arguments.
pub fn walk_call<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a CallExpression) -> VisitResult {
    walk_node!(v, node, visit_call, leave_call, {
        try_walk!(walk_expression(v, &node.callee));
        for arg in &node.arguments {
            try_walk!(walk_argument(v, arg));
        }
    })
}

/// Walk an argument.
pub fn walk_argument<'a, V: Visitor<'a> + ?Sized>(v: &mut V, node: &'a Argument) -> VisitResult {
    walk_node!(v, node, visit_argument, leave_argument, {
        try_walk!(walk_expression(v, &node.value));
    })
}

/// Walk a lambda: parameters then body.
pub fn walk_lambda<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a LambdaExpression,
) -> VisitResult {
    walk_node!(v, node, visit_lambda, leave_lambda, {
        try_walk!(walk_parameter_list(v, &node.parameters));
        try_walk!(walk_expression(v, &node.body));
    })
}

/// Walk a comprehension: result then the `for` clause chain.
pub fn walk_comprehension<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ComprehensionExpression,
) -> VisitResult {
    walk_node!(v, node, visit_comprehension, leave_comprehension, {
        try_walk!(walk_expression(v, &node.result));
        try_walk!(walk_comp_for(v, &node.comp_for));
    })
}

/// Walk a dict comprehension: key, value, then the `for` clause chain.
pub fn walk_dict_comp<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a DictCompExpression,
) -> VisitResult {
    walk_node!(v, node, visit_dict_comp, leave_dict_comp, {
        try_walk!(walk_expression(v, &node.key));
        try_walk!(walk_expression(v, &node.value));
        try_walk!(walk_comp_for(v, &node.comp_for));
    })
}

/// Walk a comprehension `for` clause: target, iterable, nested clause.
pub fn walk_comp_for<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ComprehensionFor,
) -> VisitResult {
    walk_node!(v, node, visit_comp_for, leave_comp_for, {
        try_walk!(walk_expression(v, &node.target));
        try_walk!(walk_expression(v, &node.iterable));
        if let Some(nested) = &node.nested {
            try_walk!(walk_comprehension_clause(v, nested));
        }
    })
}

/// Walk a comprehension `if` clause: condition, nested clause.
pub fn walk_comp_if<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ComprehensionIf,
) -> VisitResult {
    walk_node!(v, node, visit_comp_if, leave_comp_if, {
        try_walk!(walk_expression(v, &node.condition));
        if let Some(nested) = &node.nested {
            try_walk!(walk_comprehension_clause(v, nested));
        }
    })
}

/// Dispatch a comprehension clause.
pub fn walk_comprehension_clause<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ComprehensionClause,
) -> VisitResult {
    match node {
        ComprehensionClause::For(clause) => walk_comp_for(v, clause),
        ComprehensionClause::If(clause) => walk_comp_if(v, clause),
    }
}

/// Walk a walrus expression: name then value.
pub fn walk_assignment_expression<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a AssignmentExpression,
) -> VisitResult {
    walk_node!(v, node, visit_assignment_expression, leave_assignment_expression, {
        try_walk!(walk_name(v, &node.name));
        try_walk!(walk_expression(v, &node.value));
    })
}

/// Walk a tuple display.
pub fn walk_tuple_literal<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a TupleLiteral,
) -> VisitResult {
    walk_node!(v, node, visit_tuple_literal, leave_tuple_literal, {
        for element in &node.elements {
            try_walk!(walk_expression(v, element));
        }
    })
}

/// Walk a list display.
pub fn walk_list_literal<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ListLiteral,
) -> VisitResult {
    walk_node!(v, node, visit_list_literal, leave_list_literal, {
        for element in &node.elements {
            try_walk!(walk_expression(v, element));
        }
    })
}

/// Walk a set display.
pub fn walk_set_literal<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a SetLiteral,
) -> VisitResult {
    walk_node!(v, node, visit_set_literal, leave_set_literal, {
        for element in &node.elements {
            try_walk!(walk_expression(v, element));
        }
    })
}

/// Walk a dict display.
pub fn walk_dict_literal<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a DictLiteral,
) -> VisitResult {
    walk_node!(v, node, visit_dict_literal, leave_dict_literal, {
        for element in &node.elements {
            try_walk!(walk_dict_element(v, element));
        }
    })
}

/// Walk one dict entry: key then value.
pub fn walk_dict_element<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a DictElement,
) -> VisitResult {
    walk_node!(v, node, visit_dict_element, leave_dict_element, {
        try_walk!(walk_expression(v, &node.key));
        try_walk!(walk_expression(v, &node.value));
    })
}

/// Walk a subscript: object then index.
pub fn walk_subscript<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a SubscriptExpression,
) -> VisitResult {
    walk_node!(v, node, visit_subscript, leave_subscript, {
        try_walk!(walk_expression(v, &node.object));
        try_walk!(walk_expression(v, &node.index));
    })
}

/// Walk a starred expression.
pub fn walk_starred<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a StarredExpression,
) -> VisitResult {
    walk_node!(v, node, visit_starred, leave_starred, {
        try_walk!(walk_expression(v, &node.value));
    })
}

/// Walk a binary operation: left then right.
pub fn walk_binary_operation<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a BinaryOperation,
) -> VisitResult {
    walk_node!(v, node, visit_binary_operation, leave_binary_operation, {
        try_walk!(walk_expression(v, &node.left));
        try_walk!(walk_expression(v, &node.right));
    })
}

/// Walk a unary operation.
pub fn walk_unary_operation<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a UnaryOperation,
) -> VisitResult {
    walk_node!(v, node, visit_unary_operation, leave_unary_operation, {
        try_walk!(walk_expression(v, &node.operand));
    })
}

/// Walk a conditional expression in source order: value, condition, else.
pub fn walk_conditional_expression<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a ConditionalExpression,
) -> VisitResult {
    walk_node!(v, node, visit_conditional_expression, leave_conditional_expression, {
        try_walk!(walk_expression(v, &node.true_expression));
        try_walk!(walk_expression(v, &node.condition));
        try_walk!(walk_expression(v, &node.false_expression));
    })
}

/// Walk a number literal (leaf).
pub fn walk_number_literal<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a NumberLiteral,
) -> VisitResult {
    walk_node!(v, node, visit_number_literal, leave_number_literal, {})
}

/// Walk a string literal (leaf).
pub fn walk_string_literal<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a StringLiteral,
) -> VisitResult {
    walk_node!(v, node, visit_string_literal, leave_string_literal, {})
}

/// Walk a boolean literal (leaf).
pub fn walk_boolean_literal<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a BooleanLiteral,
) -> VisitResult {
    walk_node!(v, node, visit_boolean_literal, leave_boolean_literal, {})
}

/// Walk the `None` literal (leaf).
pub fn walk_none_literal<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a NoneLiteral,
) -> VisitResult {
    walk_node!(v, node, visit_none_literal, leave_none_literal, {})
}

/// Walk the `...` literal (leaf).
pub fn walk_ellipsis_literal<'a, V: Visitor<'a> + ?Sized>(
    v: &mut V,
    node: &'a EllipsisLiteral,
) -> VisitResult {
    walk_node!(v, node, visit_ellipsis_literal, leave_ellipsis_literal, {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::TreeBuilder;

    /// A visitor that tracks visit/leave call order.
    struct OrderTracker {
        events: Vec<String>,
    }

    impl<'a> Visitor<'a> for OrderTracker {
        fn visit_function_def(&mut self, node: &'a FunctionDef) -> VisitResult {
            self.events.push(format!("function_def:{}", node.name.name));
            VisitResult::Continue
        }

        fn leave_function_def(&mut self, node: &'a FunctionDef) {
            self.events
                .push(format!("leave_function_def:{}", node.name.name));
        }

        fn visit_name(&mut self, node: &'a Name) -> VisitResult {
            self.events.push(format!("name:{}", node.name));
            VisitResult::Continue
        }
    }

    #[test]
    fn test_walk_order_pre_and_post() {
        let mut t = TreeBuilder::new();
        let params = {
            let p = t.param("a");
            t.parameters(vec![p])
        };
        let ret = {
            let a = t.name("a");
            t.return_stmt(Some(a))
        };
        let def = t.function_def("f", params, vec![ret]);
        let tree = t.file_input(vec![def]);

        let mut tracker = OrderTracker { events: Vec::new() };
        walk_file_input(&mut tracker, &tree);

        assert_eq!(
            tracker.events,
            vec![
                "function_def:f",
                "name:f",
                "name:a",
                "name:a",
                "leave_function_def:f"
            ]
        );
    }

    #[test]
    fn test_skip_children_still_calls_leave() {
        struct Skipper {
            left: bool,
        }

        impl<'a> Visitor<'a> for Skipper {
            fn visit_function_def(&mut self, _node: &'a FunctionDef) -> VisitResult {
                VisitResult::SkipChildren
            }

            fn leave_function_def(&mut self, _node: &'a FunctionDef) {
                self.left = true;
            }

            fn visit_name(&mut self, _node: &'a Name) -> VisitResult {
                panic!("children should have been skipped");
            }
        }

        let mut t = TreeBuilder::new();
        let params = t.no_parameters();
        let body = vec![t.pass_stmt()];
        let def = t.function_def("f", params, body);
        let tree = t.file_input(vec![def]);

        let mut skipper = Skipper { left: false };
        walk_file_input(&mut skipper, &tree);
        assert!(skipper.left);
    }

    #[test]
    fn test_stop_halts_traversal() {
        struct Stopper {
            names: Vec<String>,
        }

        impl<'a> Visitor<'a> for Stopper {
            fn visit_name(&mut self, node: &'a Name) -> VisitResult {
                self.names.push(node.name.clone());
                if node.name == "stop_here" {
                    VisitResult::Stop
                } else {
                    VisitResult::Continue
                }
            }
        }

        let mut t = TreeBuilder::new();
        let a = t.name("a");
        let stop = t.name("stop_here");
        let z = t.name("z");
        let s1 = t.expr_stmt(a);
        let s2 = t.expr_stmt(stop);
        let s3 = t.expr_stmt(z);
        let tree = t.file_input(vec![s1, s2, s3]);

        let mut stopper = Stopper { names: Vec::new() };
        let result = walk_file_input(&mut stopper, &tree);
        assert_eq!(result, VisitResult::Stop);
        assert_eq!(stopper.names, vec!["a", "stop_here"]);
    }
}
