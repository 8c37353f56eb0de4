// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Shallow type inference: third traversal.
//!
//! Computes an [`InferredType`] for every expression from literal kinds,
//! declared annotations, and the kind of the symbol a name resolves to,
//! then finalizes function parameter types from their annotations. The
//! pass also attaches member usages for qualified reads whose qualifier is
//! a class symbol (`A.foo` patterns).
//!
//! This is not dataflow. Whenever the answer is uncertain the type is
//! [`InferredType::Any`], for which `can_only_be` is always false and
//! `can_have_member` always true, so rules stay quiet rather than wrong.

use crate::nodes::{
    AnnotatedAssignment, BinaryOperator, ComprehensionKind, Expression, FileInput, FunctionDef,
    Name, NumberKind, QualifiedExpression, UnaryOperator,
};
use crate::semantic::builder::{BuildContext, SymbolTable};
use crate::semantic::symbol::{parameter_descriptors, MemberLookup, SymbolKind, UsageKind};
use crate::visitor::{walk_file_input, VisitResult, Visitor};

/// Nominal tags for the builtin types the analyzer reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTag {
    Int,
    Float,
    Complex,
    Str,
    Bytes,
    List,
    Set,
    FrozenSet,
    Dict,
    Tuple,
    Bool,
    NoneType,
}

impl BuiltinTag {
    /// The builtin type's name as spelled in source.
    pub fn type_name(&self) -> &'static str {
        match self {
            BuiltinTag::Int => "int",
            BuiltinTag::Float => "float",
            BuiltinTag::Complex => "complex",
            BuiltinTag::Str => "str",
            BuiltinTag::Bytes => "bytes",
            BuiltinTag::List => "list",
            BuiltinTag::Set => "set",
            BuiltinTag::FrozenSet => "frozenset",
            BuiltinTag::Dict => "dict",
            BuiltinTag::Tuple => "tuple",
            BuiltinTag::Bool => "bool",
            BuiltinTag::NoneType => "NoneType",
        }
    }

    /// Parse a builtin type name. `None` (the annotation spelling) maps to
    /// `NoneType`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(BuiltinTag::Int),
            "float" => Some(BuiltinTag::Float),
            "complex" => Some(BuiltinTag::Complex),
            "str" => Some(BuiltinTag::Str),
            "bytes" => Some(BuiltinTag::Bytes),
            "list" => Some(BuiltinTag::List),
            "set" => Some(BuiltinTag::Set),
            "frozenset" => Some(BuiltinTag::FrozenSet),
            "dict" => Some(BuiltinTag::Dict),
            "tuple" => Some(BuiltinTag::Tuple),
            "bool" => Some(BuiltinTag::Bool),
            "None" | "NoneType" => Some(BuiltinTag::NoneType),
            _ => None,
        }
    }
}

impl std::fmt::Display for BuiltinTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// The capitalized aliases from the `typing` module that denote builtins.
fn typing_alias(name: &str) -> Option<BuiltinTag> {
    match name {
        "List" => Some(BuiltinTag::List),
        "Dict" => Some(BuiltinTag::Dict),
        "Set" => Some(BuiltinTag::Set),
        "FrozenSet" => Some(BuiltinTag::FrozenSet),
        "Tuple" => Some(BuiltinTag::Tuple),
        "Text" => Some(BuiltinTag::Str),
        _ => None,
    }
}

/// The shallow type of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferredType {
    /// Unknown. Never `can_only_be`, always `can_have_member`.
    Any,
    /// A builtin value of the tagged type.
    Builtin(BuiltinTag),
    /// An instance of a class declared in this file or a stub.
    Instance(crate::semantic::symbol::SymbolId),
    /// A function or lambda value.
    Callable,
}

impl InferredType {
    /// Whether the expression can only be of the given builtin type.
    pub fn can_only_be(&self, tag: BuiltinTag) -> bool {
        matches!(self, InferredType::Builtin(t) if *t == tag)
    }

    /// Whether a value of this type can have the named member. Pessimistic:
    /// uncertainty answers true so rules stay quiet.
    pub fn can_have_member(&self, table: &SymbolTable, name: &str) -> bool {
        match self {
            InferredType::Any | InferredType::Callable => true,
            InferredType::Instance(class) => {
                !matches!(table.resolve_member(*class, name), MemberLookup::Absent)
            }
            InferredType::Builtin(tag) => {
                let module = table.module_scope();
                match module.symbol(tag.type_name()) {
                    Some(class)
                        if module.is_builtin_symbol(class)
                            && table.symbol(class).class_data().is_some() =>
                    {
                        !matches!(table.resolve_member(class, name), MemberLookup::Absent)
                    }
                    _ => true,
                }
            }
        }
    }

    /// Whether values of the two types can be the same object under `is`.
    pub fn is_identity_comparable_with(&self, other: &InferredType) -> bool {
        matches!(self, InferredType::Any)
            || matches!(other, InferredType::Any)
            || self == other
    }
}

/// Parse an annotation expression into a declared type.
///
/// Recognizes builtin type names, `typing` aliases (through their import
/// FQN or bare name), class symbols, `None`, and subscripted generics by
/// their base. String annotations (forward references) stay `Any`.
pub(crate) fn declared_type(table: &SymbolTable, annotation: &Expression) -> InferredType {
    match annotation {
        Expression::Name(name) => {
            if let Some(tag) = BuiltinTag::from_name(&name.name) {
                return InferredType::Builtin(tag);
            }
            if let Some(tag) = typing_alias(&name.name) {
                return InferredType::Builtin(tag);
            }
            if let Some(id) = table.symbol_id_of(name.node_id) {
                if table.symbol(id).class_data().is_some() {
                    return InferredType::Instance(id);
                }
            }
            InferredType::Any
        }
        Expression::None(_) => InferredType::Builtin(BuiltinTag::NoneType),
        Expression::Subscript(subscript) => declared_type(table, &subscript.object),
        Expression::Qualified(qualified) => typing_alias(&qualified.name.name)
            .map(InferredType::Builtin)
            .unwrap_or(InferredType::Any),
        Expression::Binary(binary) if binary.operator == BinaryOperator::BitOr => {
            let left = declared_type(table, &binary.left);
            let right = declared_type(table, &binary.right);
            if left == right {
                left
            } else {
                InferredType::Any
            }
        }
        _ => InferredType::Any,
    }
}

/// Third-phase visitor. See the module docs.
pub(crate) struct InferencePass<'c, 'a> {
    ctx: &'c mut BuildContext<'a>,
    /// Expression typing is skipped for stub files; parameter
    /// finalization and member usages always run.
    infer_expressions: bool,
}

impl<'c, 'a> InferencePass<'c, 'a> {
    pub(crate) fn run(ctx: &'c mut BuildContext<'a>, tree: &'a FileInput) {
        let infer_expressions = !ctx.source_file.is_stub();
        let mut pass = Self {
            ctx,
            infer_expressions,
        };
        walk_file_input(&mut pass, tree);
    }

    fn name_type(&self, name: &Name) -> InferredType {
        let table = &self.ctx.table;
        let Some(id) = table.symbol_id_of(name.node_id) else {
            return InferredType::Any;
        };
        if let Some(declared) = table.declared_types.get(&id) {
            return *declared;
        }
        match table.symbol(id).kind() {
            SymbolKind::Class => InferredType::Instance(id),
            SymbolKind::Function => InferredType::Callable,
            _ => InferredType::Any,
        }
    }

    fn call_type(&self, call: &crate::nodes::CallExpression) -> InferredType {
        let table = &self.ctx.table;
        let Some(callee) = table.expression_symbol(&call.callee) else {
            return InferredType::Any;
        };
        if table.symbol(callee).class_data().is_none() {
            return InferredType::Any;
        }
        // Calling a builtin class yields the tagged builtin value.
        if let Some(tag) = table
            .symbol(callee)
            .fully_qualified_name()
            .and_then(BuiltinTag::from_name)
        {
            return InferredType::Builtin(tag);
        }
        InferredType::Instance(callee)
    }

    fn infer(&self, expr: &Expression) -> InferredType {
        let table = &self.ctx.table;
        match expr {
            Expression::Number(n) => match n.kind {
                NumberKind::Integer => InferredType::Builtin(BuiltinTag::Int),
                NumberKind::Float => InferredType::Builtin(BuiltinTag::Float),
            },
            Expression::Str(_) => InferredType::Builtin(BuiltinTag::Str),
            Expression::Bool(_) => InferredType::Builtin(BuiltinTag::Bool),
            Expression::None(_) => InferredType::Builtin(BuiltinTag::NoneType),
            Expression::Ellipsis(_) => InferredType::Any,
            Expression::Tuple(_) => InferredType::Builtin(BuiltinTag::Tuple),
            Expression::List(_) => InferredType::Builtin(BuiltinTag::List),
            Expression::Set(_) => InferredType::Builtin(BuiltinTag::Set),
            Expression::Dict(_) => InferredType::Builtin(BuiltinTag::Dict),
            Expression::Comprehension(comp) => match comp.kind {
                ComprehensionKind::List => InferredType::Builtin(BuiltinTag::List),
                ComprehensionKind::Set => InferredType::Builtin(BuiltinTag::Set),
                ComprehensionKind::Generator => InferredType::Any,
            },
            Expression::DictComp(_) => InferredType::Builtin(BuiltinTag::Dict),
            Expression::Lambda(_) => InferredType::Callable,
            Expression::Name(name) => self.name_type(name),
            Expression::Qualified(_) => InferredType::Any,
            Expression::Call(call) => self.call_type(call),
            Expression::Assignment(walrus) => table.expression_type(&walrus.value),
            Expression::Conditional(cond) => {
                let when_true = table.expression_type(&cond.true_expression);
                let when_false = table.expression_type(&cond.false_expression);
                if when_true == when_false {
                    when_true
                } else {
                    InferredType::Any
                }
            }
            Expression::Binary(binary) => {
                if binary.operator.is_comparison() {
                    InferredType::Builtin(BuiltinTag::Bool)
                } else {
                    InferredType::Any
                }
            }
            Expression::Unary(unary) => match unary.operator {
                UnaryOperator::Not => InferredType::Builtin(BuiltinTag::Bool),
                UnaryOperator::Minus | UnaryOperator::Plus | UnaryOperator::Invert => {
                    let operand = table.expression_type(&unary.operand);
                    match operand {
                        InferredType::Builtin(BuiltinTag::Int)
                        | InferredType::Builtin(BuiltinTag::Float) => operand,
                        _ => InferredType::Any,
                    }
                }
            },
            Expression::Starred(_) | Expression::Subscript(_) => InferredType::Any,
        }
    }
}

impl<'c, 'a> Visitor<'a> for InferencePass<'c, 'a> {
    fn visit_function_def(&mut self, node: &'a FunctionDef) -> VisitResult {
        // Finalize the function symbol's parameters with declared types.
        if let Some(symbol) = self.ctx.table.function_symbols_by_def.get(&node.node_id).copied() {
            let table = &self.ctx.table;
            let (parameters, has_variadic) =
                parameter_descriptors(&node.parameters, &mut |annotation| {
                    declared_type(table, annotation)
                });
            if let Some(data) = self.ctx.table.symbol_mut(symbol).function_data_mut() {
                data.parameters = parameters;
                data.has_variadic_parameter = has_variadic;
            }
        }
        VisitResult::Continue
    }

    fn visit_annotated_assignment(&mut self, node: &'a AnnotatedAssignment) -> VisitResult {
        if let Expression::Name(target) = &node.target {
            if let Some(symbol) = self.ctx.table.symbol_id_of(target.node_id) {
                let ty = declared_type(&self.ctx.table, &node.annotation);
                self.ctx.table.declared_types.insert(symbol, ty);
            }
        }
        VisitResult::Continue
    }

    fn leave_qualified_expression(&mut self, node: &'a QualifiedExpression) {
        // Class member usages: class A: foo = 42 ... A.foo
        let Some(qualifier) = self.ctx.table.expression_symbol(&node.qualifier) else {
            return;
        };
        if self.ctx.table.symbol(qualifier).class_data().is_none() {
            return;
        }
        if let MemberLookup::Found(member) =
            self.ctx.table.resolve_member(qualifier, &node.name.name)
        {
            let kind = if self.ctx.assignment_lhs.contains(&node.node_id) {
                UsageKind::AssignmentLhs
            } else {
                UsageKind::Other
            };
            self.ctx.table.add_usage(member, node.name.node_id, kind);
        }
    }

    fn leave_expression(&mut self, node: &'a Expression) {
        if self.infer_expressions {
            let ty = self.infer(node);
            self.ctx.table.types_by_expression.insert(node.node_id(), ty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tag_round_trip() {
        for tag in [BuiltinTag::Int, BuiltinTag::Str, BuiltinTag::NoneType] {
            assert_eq!(BuiltinTag::from_name(tag.type_name()), Some(tag));
        }
        assert_eq!(BuiltinTag::from_name("None"), Some(BuiltinTag::NoneType));
        assert_eq!(BuiltinTag::from_name("whatever"), None);
    }

    #[test]
    fn test_any_is_never_only_and_always_memberful() {
        let table = SymbolTable::default();
        assert!(!InferredType::Any.can_only_be(BuiltinTag::Int));
        assert!(InferredType::Any.can_have_member(&table, "anything"));
    }

    #[test]
    fn test_identity_comparability() {
        let int = InferredType::Builtin(BuiltinTag::Int);
        let float = InferredType::Builtin(BuiltinTag::Float);
        assert!(int.is_identity_comparable_with(&int));
        assert!(!int.is_identity_comparable_with(&float));
        assert!(int.is_identity_comparable_with(&InferredType::Any));
        assert!(InferredType::Callable.is_identity_comparable_with(&InferredType::Callable));
        assert!(!InferredType::Callable.is_identity_comparable_with(&float));
    }
}
