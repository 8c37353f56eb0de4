// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement and parameter nodes.

use super::{Argument, Expression, Name, NodeId};

/// The root of a parsed module. Anchors the module scope.
#[derive(Debug, Clone)]
pub struct FileInput {
    /// Node id. Also the module scope anchor.
    pub node_id: NodeId,
    /// Top-level statements.
    pub statements: Vec<Statement>,
}

/// A statement.
#[derive(Debug, Clone)]
pub enum Statement {
    /// `def name(...): ...`
    FunctionDef(FunctionDef),
    /// `class Name(...): ...`
    ClassDef(ClassDef),
    /// `a = b = value`
    Assignment(Assignment),
    /// `target: annotation [= value]`
    AnnotatedAssignment(AnnotatedAssignment),
    /// `target op= value`
    CompoundAssignment(CompoundAssignment),
    /// A bare expression statement.
    Expression(ExpressionStatement),
    /// `if ...: ... [else: ...]`
    If(IfStatement),
    /// `while ...: ... [else: ...]`
    While(WhileStatement),
    /// `for target in iterable: ... [else: ...]`
    For(ForStatement),
    /// `with items: ...`
    With(WithStatement),
    /// `try: ... except ...: ... [else/finally]`
    Try(TryStatement),
    /// `import a.b [as c], ...`
    ImportName(ImportName),
    /// `from [.]*module import names`
    ImportFrom(ImportFrom),
    /// `global a, b`
    Global(GlobalStatement),
    /// `nonlocal a, b`
    Nonlocal(NonlocalStatement),
    /// `return [value]`
    Return(ReturnStatement),
    /// `pass`
    Pass(PassStatement),
}

impl Statement {
    /// The node id of this statement.
    pub fn node_id(&self) -> NodeId {
        match self {
            Statement::FunctionDef(s) => s.node_id,
            Statement::ClassDef(s) => s.node_id,
            Statement::Assignment(s) => s.node_id,
            Statement::AnnotatedAssignment(s) => s.node_id,
            Statement::CompoundAssignment(s) => s.node_id,
            Statement::Expression(s) => s.node_id,
            Statement::If(s) => s.node_id,
            Statement::While(s) => s.node_id,
            Statement::For(s) => s.node_id,
            Statement::With(s) => s.node_id,
            Statement::Try(s) => s.node_id,
            Statement::ImportName(s) => s.node_id,
            Statement::ImportFrom(s) => s.node_id,
            Statement::Global(s) => s.node_id,
            Statement::Nonlocal(s) => s.node_id,
            Statement::Return(s) => s.node_id,
            Statement::Pass(s) => s.node_id,
        }
    }
}

/// A function definition. Anchors a function scope.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// Node id. Also the scope anchor.
    pub node_id: NodeId,
    /// The function name.
    pub name: Name,
    /// Decorators, outermost first.
    pub decorators: Vec<Decorator>,
    /// The parameter list.
    pub parameters: ParameterList,
    /// Return annotation, if any.
    pub return_annotation: Option<Expression>,
    /// Body statements.
    pub body: Vec<Statement>,
    /// `async def` flag.
    pub is_async: bool,
}

/// A class definition. Anchors a class scope.
#[derive(Debug, Clone)]
pub struct ClassDef {
    /// Node id. Also the scope anchor.
    pub node_id: NodeId,
    /// The class name.
    pub name: Name,
    /// Decorators, outermost first.
    pub decorators: Vec<Decorator>,
    /// Base classes and keyword arguments (e.g. `metaclass=`).
    pub arguments: Vec<Argument>,
    /// Body statements.
    pub body: Vec<Statement>,
}

/// A decorator. The dotted name components are non-variable [`Name`]s; the
/// first component is resolved as a read by the reference pass.
#[derive(Debug, Clone)]
pub struct Decorator {
    /// Node id.
    pub node_id: NodeId,
    /// Dotted name components.
    pub name: Vec<Name>,
    /// Call arguments when the decorator is invoked with `(...)`.
    pub arguments: Option<Vec<Argument>>,
}

/// A plain assignment statement, possibly chained: `a = b = value`.
#[derive(Debug, Clone)]
pub struct Assignment {
    /// Node id.
    pub node_id: NodeId,
    /// The targets, one per `=` except the last.
    pub targets: Vec<Expression>,
    /// The assigned value.
    pub value: Expression,
}

/// An annotated assignment `target: annotation [= value]`.
#[derive(Debug, Clone)]
pub struct AnnotatedAssignment {
    /// Node id.
    pub node_id: NodeId,
    /// The single target.
    pub target: Expression,
    /// The annotation expression.
    pub annotation: Expression,
    /// The assigned value, if any.
    pub value: Option<Expression>,
}

/// An augmented assignment `target op= value`.
#[derive(Debug, Clone)]
pub struct CompoundAssignment {
    /// Node id.
    pub node_id: NodeId,
    /// The single target.
    pub target: Expression,
    /// The underlying binary operator.
    pub operator: super::BinaryOperator,
    /// The right-hand side.
    pub value: Expression,
}

/// A bare expression used as a statement.
#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    /// Node id.
    pub node_id: NodeId,
    /// The expression.
    pub expression: Expression,
}

/// An `if` statement. `elif` chains are nested `If`s in `orelse`.
#[derive(Debug, Clone)]
pub struct IfStatement {
    /// Node id.
    pub node_id: NodeId,
    /// The condition.
    pub condition: Expression,
    /// The `if` body.
    pub body: Vec<Statement>,
    /// The `else` body (possibly a nested `if` for `elif`).
    pub orelse: Vec<Statement>,
}

/// A `while` statement.
#[derive(Debug, Clone)]
pub struct WhileStatement {
    /// Node id.
    pub node_id: NodeId,
    /// The condition.
    pub condition: Expression,
    /// The loop body.
    pub body: Vec<Statement>,
    /// The `else` body.
    pub orelse: Vec<Statement>,
}

/// A `for` statement.
#[derive(Debug, Clone)]
pub struct ForStatement {
    /// Node id.
    pub node_id: NodeId,
    /// `async for` flag.
    pub is_async: bool,
    /// The loop target (name, tuple, ...).
    pub target: Expression,
    /// The iterated expression.
    pub iterable: Expression,
    /// The loop body.
    pub body: Vec<Statement>,
    /// The `else` body.
    pub orelse: Vec<Statement>,
}

/// A `with` statement.
#[derive(Debug, Clone)]
pub struct WithStatement {
    /// Node id.
    pub node_id: NodeId,
    /// `async with` flag.
    pub is_async: bool,
    /// Context manager items.
    pub items: Vec<WithItem>,
    /// The body.
    pub body: Vec<Statement>,
}

/// One `context [as target]` item of a `with` statement.
#[derive(Debug, Clone)]
pub struct WithItem {
    /// Node id.
    pub node_id: NodeId,
    /// The context manager expression.
    pub context: Expression,
    /// The `as` target, if any.
    pub target: Option<Expression>,
}

/// A `try` statement.
#[derive(Debug, Clone)]
pub struct TryStatement {
    /// Node id.
    pub node_id: NodeId,
    /// The `try` body.
    pub body: Vec<Statement>,
    /// `except` clauses in source order.
    pub except_clauses: Vec<ExceptClause>,
    /// The `else` body.
    pub orelse: Vec<Statement>,
    /// The `finally` body.
    pub finally: Vec<Statement>,
}

/// One `except [exception [as target]]` clause.
#[derive(Debug, Clone)]
pub struct ExceptClause {
    /// Node id.
    pub node_id: NodeId,
    /// The caught exception expression, if any.
    pub exception: Option<Expression>,
    /// The `as` target, if any.
    pub target: Option<Expression>,
    /// The handler body.
    pub body: Vec<Statement>,
}

/// An `import a.b [as c], ...` statement.
#[derive(Debug, Clone)]
pub struct ImportName {
    /// Node id.
    pub node_id: NodeId,
    /// Imported modules.
    pub modules: Vec<AliasedName>,
}

/// A dotted name with an optional alias, used by both import forms.
#[derive(Debug, Clone)]
pub struct AliasedName {
    /// Node id.
    pub node_id: NodeId,
    /// Dotted name components (non-variable names).
    pub dotted_name: Vec<Name>,
    /// The `as` alias, if any.
    pub alias: Option<Name>,
}

impl AliasedName {
    /// The dotted name joined with `.`.
    pub fn dotted(&self) -> String {
        self.dotted_name
            .iter()
            .map(|n| n.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// The imported-names part of a `from ... import ...` statement.
#[derive(Debug, Clone)]
pub enum ImportedNames {
    /// `from m import *`
    Star,
    /// `from m import a [as b], ...`
    Names(Vec<AliasedName>),
}

/// A `from [.]*module import names` statement.
#[derive(Debug, Clone)]
pub struct ImportFrom {
    /// Node id.
    pub node_id: NodeId,
    /// Number of leading dots (relative import depth).
    pub dotted_prefix: usize,
    /// The module path, absent for `from . import x`.
    pub module: Option<Vec<Name>>,
    /// The imported names or `*`.
    pub names: ImportedNames,
}

impl ImportFrom {
    /// The module path joined with `.`, if present.
    pub fn module_name(&self) -> Option<String> {
        self.module.as_ref().map(|names| {
            names
                .iter()
                .map(|n| n.name.as_str())
                .collect::<Vec<_>>()
                .join(".")
        })
    }

    /// Whether this is a wildcard import.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.names, ImportedNames::Star)
    }
}

/// A `global a, b` statement.
#[derive(Debug, Clone)]
pub struct GlobalStatement {
    /// Node id.
    pub node_id: NodeId,
    /// The declared names.
    pub names: Vec<Name>,
}

/// A `nonlocal a, b` statement.
#[derive(Debug, Clone)]
pub struct NonlocalStatement {
    /// Node id.
    pub node_id: NodeId,
    /// The declared names.
    pub names: Vec<Name>,
}

/// A `return [value]` statement.
#[derive(Debug, Clone)]
pub struct ReturnStatement {
    /// Node id.
    pub node_id: NodeId,
    /// The returned value, if any.
    pub value: Option<Expression>,
}

/// A `pass` statement.
#[derive(Debug, Clone)]
pub struct PassStatement {
    /// Node id.
    pub node_id: NodeId,
}

// ============================================================================
// Parameters
// ============================================================================

/// The parameter list of a function or lambda.
#[derive(Debug, Clone, Default)]
pub struct ParameterList {
    /// Parameters and separators in source order.
    pub parameters: Vec<AnyParameter>,
}

impl ParameterList {
    /// Whether the list has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Iterate the plain (non-tuple, non-separator) parameters.
    pub fn plain(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter_map(|p| match p {
            AnyParameter::Param(param) => Some(param),
            _ => None,
        })
    }
}

/// One entry of a [`ParameterList`].
#[derive(Debug, Clone)]
pub enum AnyParameter {
    /// A plain parameter, possibly `*args` or `**kwargs`.
    Param(Parameter),
    /// A tuple-destructured parameter.
    Tuple(TupleParameter),
    /// The bare `*` keyword-only separator.
    Star(ParamStar),
    /// The `/` positional-only separator.
    Slash(ParamSlash),
}

/// Star marker of a plain parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterStar {
    /// No star.
    None,
    /// `*args`
    Star,
    /// `**kwargs`
    StarStar,
}

/// A plain parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// Node id.
    pub node_id: NodeId,
    /// The parameter name.
    pub name: Name,
    /// Type annotation, if any.
    pub annotation: Option<Expression>,
    /// Default value, if any. Evaluated in the function's enclosing scope.
    pub default: Option<Expression>,
    /// Variadic marker.
    pub star: ParameterStar,
}

/// A tuple-destructured parameter `def f((a, (b, c))): ...`.
#[derive(Debug, Clone)]
pub struct TupleParameter {
    /// Node id.
    pub node_id: NodeId,
    /// Nested parameters.
    pub parameters: Vec<AnyParameter>,
}

/// The bare `*` separator: following plain parameters are keyword-only.
#[derive(Debug, Clone)]
pub struct ParamStar {
    /// Node id.
    pub node_id: NodeId,
}

/// The `/` separator: preceding plain parameters are positional-only.
#[derive(Debug, Clone)]
pub struct ParamSlash {
    /// Node id.
    pub node_id: NodeId,
}
