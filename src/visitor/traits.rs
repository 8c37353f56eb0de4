// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definition for tree traversal.

use crate::nodes::{
    // Root and statements
    AliasedName, AnnotatedAssignment, Assignment, ClassDef, CompoundAssignment, Decorator,
    ExceptClause, ExpressionStatement, FileInput, ForStatement, FunctionDef, GlobalStatement,
    IfStatement, ImportFrom, ImportName, NonlocalStatement, PassStatement, ReturnStatement,
    Statement, TryStatement, WhileStatement, WithItem, WithStatement,
    // Parameters
    ParamSlash, ParamStar, Parameter, ParameterList, TupleParameter,
    // Expressions
    Argument, AssignmentExpression, BinaryOperation, BooleanLiteral, CallExpression,
    ComprehensionExpression, ComprehensionFor, ComprehensionIf, ConditionalExpression,
    DictCompExpression, DictElement, DictLiteral, EllipsisLiteral, Expression, LambdaExpression,
    ListLiteral, Name, NoneLiteral, NumberLiteral, QualifiedExpression, SetLiteral,
    StarredExpression, StringLiteral, SubscriptExpression, TupleLiteral, UnaryOperation,
};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// The walker will not descend into this node's children, but `leave_*`
    /// will still be called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `visit_*` or `leave_*` methods will be called. The walk
    /// function will return immediately.
    Stop,
}

/// Macro to generate visitor trait method signatures.
///
/// Generates pairs of `visit_*` and `leave_*` methods with default
/// implementations that return `VisitResult::Continue` and do nothing,
/// respectively.
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called before descending into children. Return `VisitResult` to control traversal."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &'a $node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after all children have been visited. Called even if `SkipChildren` was returned."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &'a $node_type) {}
            )*
        }
    };
}

/// Immutable visitor for tree traversal.
///
/// Implement this trait to traverse a tree without modifying it. Each node
/// type has a corresponding `visit_*` and `leave_*` method pair. The `'a`
/// lifetime is the tree's; visitors may retain references to visited nodes.
///
/// # Traversal Order
///
/// - `visit_*` is called in **pre-order** (before children)
/// - `leave_*` is called in **post-order** (after children)
/// - Children are visited in source order (left-to-right, top-to-bottom)
///
/// The enum-level `visit_statement`/`visit_expression` hooks fire before
/// the concrete node's hooks, and `leave_statement`/`leave_expression`
/// after them.
///
/// # Control Flow
///
/// - Return `VisitResult::Continue` to traverse into children
/// - Return `VisitResult::SkipChildren` to skip children (but `leave_*` still called)
/// - Return `VisitResult::Stop` to halt traversal immediately
pub trait Visitor<'a> {
    // Root
    visitor_methods! {
        file_input: FileInput,
    }

    // Statements
    visitor_methods! {
        statement: Statement,
        function_def: FunctionDef,
        class_def: ClassDef,
        decorator: Decorator,
        assignment: Assignment,
        annotated_assignment: AnnotatedAssignment,
        compound_assignment: CompoundAssignment,
        expression_statement: ExpressionStatement,
        if_stmt: IfStatement,
        while_stmt: WhileStatement,
        for_stmt: ForStatement,
        with_stmt: WithStatement,
        with_item: WithItem,
        try_stmt: TryStatement,
        except_clause: ExceptClause,
        import_name: ImportName,
        import_from: ImportFrom,
        aliased_name: AliasedName,
        global_stmt: GlobalStatement,
        nonlocal_stmt: NonlocalStatement,
        return_stmt: ReturnStatement,
        pass_stmt: PassStatement,
    }

    // Parameters
    visitor_methods! {
        parameter_list: ParameterList,
        param: Parameter,
        tuple_param: TupleParameter,
        param_star: ParamStar,
        param_slash: ParamSlash,
    }

    // Expressions
    visitor_methods! {
        expression: Expression,
        name: Name,
        qualified_expression: QualifiedExpression,
        call: CallExpression,
        argument: Argument,
        lambda: LambdaExpression,
        comprehension: ComprehensionExpression,
        dict_comp: DictCompExpression,
        comp_for: ComprehensionFor,
        comp_if: ComprehensionIf,
        assignment_expression: AssignmentExpression,
        tuple_literal: TupleLiteral,
        list_literal: ListLiteral,
        set_literal: SetLiteral,
        dict_literal: DictLiteral,
        dict_element: DictElement,
        subscript: SubscriptExpression,
        starred: StarredExpression,
        binary_operation: BinaryOperation,
        unary_operation: UnaryOperation,
        conditional_expression: ConditionalExpression,
        number_literal: NumberLiteral,
        string_literal: StringLiteral,
        boolean_literal: BooleanLiteral,
        none_literal: NoneLiteral,
        ellipsis_literal: EllipsisLiteral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::TreeBuilder;

    #[test]
    fn test_visit_result_default() {
        assert_eq!(VisitResult::default(), VisitResult::Continue);
    }

    #[test]
    fn test_visitor_trait_compiles() {
        // Verifies that the trait can be implemented with all defaults.
        struct EmptyVisitor;

        impl<'a> Visitor<'a> for EmptyVisitor {}

        let _v = EmptyVisitor;
    }

    #[test]
    fn test_visitor_default_implementations() {
        struct TestVisitor;
        impl<'a> Visitor<'a> for TestVisitor {}

        let mut visitor = TestVisitor;
        let mut t = TreeBuilder::new();
        let tree = t.file_input(vec![]);

        let result = visitor.visit_file_input(&tree);
        assert_eq!(result, VisitResult::Continue);
    }
}
