// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tree construction API.
//!
//! [`TreeBuilder`] is the single entry point for creating nodes. It assigns
//! a fresh [`NodeId`] to every node, which is what allows the semantic
//! passes to publish their results in side tables without mutating the
//! tree. One `TreeBuilder` must be used per file.
//!
//! # Example
//!
//! ```
//! use pysema::nodes::TreeBuilder;
//!
//! let mut t = TreeBuilder::new();
//! let x = t.name("x");
//! let one = t.int("1");
//! let stmt = t.assign(vec![x], one);
//! let tree = t.file_input(vec![stmt]);
//! assert_eq!(tree.statements.len(), 1);
//! ```

use super::expression::*;
use super::statement::*;
use super::{NodeId, Span};

/// Builds tree nodes with unique, creation-ordered [`NodeId`]s.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    next_id: u32,
}

impl TreeBuilder {
    /// Create a new builder. Ids start at zero.
    pub fn new() -> Self {
        Self::default()
    }

    fn id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    // ========================================================================
    // Names and expressions
    // ========================================================================

    /// A variable name.
    pub fn name(&mut self, name: &str) -> Expression {
        Expression::Name(self.name_node(name))
    }

    /// A variable name node (not wrapped in an [`Expression`]).
    pub fn name_node(&mut self, name: &str) -> Name {
        Name {
            node_id: self.id(),
            name: name.to_string(),
            span: None,
            is_variable: true,
        }
    }

    /// A variable name node with a source span.
    pub fn name_node_at(&mut self, name: &str, span: Span) -> Name {
        Name {
            node_id: self.id(),
            name: name.to_string(),
            span: Some(span),
            is_variable: true,
        }
    }

    /// A non-variable name node (attribute names, import path components).
    pub fn path_name(&mut self, name: &str) -> Name {
        Name {
            node_id: self.id(),
            name: name.to_string(),
            span: None,
            is_variable: false,
        }
    }

    /// Attribute access `qualifier.name`.
    pub fn qualified(&mut self, qualifier: Expression, name: &str) -> Expression {
        let attr = self.path_name(name);
        Expression::Qualified(Box::new(QualifiedExpression {
            node_id: self.id(),
            qualifier,
            name: attr,
        }))
    }

    /// A call expression.
    pub fn call(&mut self, callee: Expression, arguments: Vec<Argument>) -> Expression {
        Expression::Call(Box::new(CallExpression {
            node_id: self.id(),
            callee,
            arguments,
        }))
    }

    /// A positional argument.
    pub fn arg(&mut self, value: Expression) -> Argument {
        Argument {
            node_id: self.id(),
            keyword: None,
            value,
        }
    }

    /// A keyword argument `keyword=value`.
    pub fn keyword_arg(&mut self, keyword: &str, value: Expression) -> Argument {
        Argument {
            node_id: self.id(),
            keyword: Some(keyword.to_string()),
            value,
        }
    }

    /// A lambda expression.
    pub fn lambda(&mut self, parameters: ParameterList, body: Expression) -> Expression {
        Expression::Lambda(Box::new(LambdaExpression {
            node_id: self.id(),
            parameters,
            body,
        }))
    }

    /// A list comprehension.
    pub fn list_comp(&mut self, result: Expression, comp_for: ComprehensionFor) -> Expression {
        self.comprehension(ComprehensionKind::List, result, comp_for)
    }

    /// A set comprehension.
    pub fn set_comp(&mut self, result: Expression, comp_for: ComprehensionFor) -> Expression {
        self.comprehension(ComprehensionKind::Set, result, comp_for)
    }

    /// A generator expression.
    pub fn generator_exp(&mut self, result: Expression, comp_for: ComprehensionFor) -> Expression {
        self.comprehension(ComprehensionKind::Generator, result, comp_for)
    }

    /// A comprehension of the given kind.
    pub fn comprehension(
        &mut self,
        kind: ComprehensionKind,
        result: Expression,
        comp_for: ComprehensionFor,
    ) -> Expression {
        Expression::Comprehension(Box::new(ComprehensionExpression {
            node_id: self.id(),
            kind,
            result,
            comp_for,
        }))
    }

    /// A dict comprehension.
    pub fn dict_comp(
        &mut self,
        key: Expression,
        value: Expression,
        comp_for: ComprehensionFor,
    ) -> Expression {
        Expression::DictComp(Box::new(DictCompExpression {
            node_id: self.id(),
            key,
            value,
            comp_for,
        }))
    }

    /// A `for target in iterable` comprehension clause.
    pub fn comp_for(
        &mut self,
        target: Expression,
        iterable: Expression,
        nested: Option<ComprehensionClause>,
    ) -> ComprehensionFor {
        ComprehensionFor {
            node_id: self.id(),
            is_async: false,
            target,
            iterable,
            nested: nested.map(Box::new),
        }
    }

    /// An `if condition` comprehension clause.
    pub fn comp_if(
        &mut self,
        condition: Expression,
        nested: Option<ComprehensionClause>,
    ) -> ComprehensionIf {
        ComprehensionIf {
            node_id: self.id(),
            condition,
            nested: nested.map(Box::new),
        }
    }

    /// A walrus expression `name := value`.
    pub fn walrus(&mut self, name: &str, value: Expression) -> Expression {
        let name = self.name_node(name);
        Expression::Assignment(Box::new(AssignmentExpression {
            node_id: self.id(),
            name,
            value,
        }))
    }

    /// A tuple display.
    pub fn tuple(&mut self, elements: Vec<Expression>) -> Expression {
        Expression::Tuple(TupleLiteral {
            node_id: self.id(),
            elements,
        })
    }

    /// A list display.
    pub fn list(&mut self, elements: Vec<Expression>) -> Expression {
        Expression::List(ListLiteral {
            node_id: self.id(),
            elements,
        })
    }

    /// A set display.
    pub fn set(&mut self, elements: Vec<Expression>) -> Expression {
        Expression::Set(SetLiteral {
            node_id: self.id(),
            elements,
        })
    }

    /// A dict display from key/value pairs.
    pub fn dict(&mut self, elements: Vec<(Expression, Expression)>) -> Expression {
        Expression::Dict(DictLiteral {
            node_id: self.id(),
            elements: elements
                .into_iter()
                .map(|(key, value)| DictElement { key, value })
                .collect(),
        })
    }

    /// A subscript `object[index]`.
    pub fn subscript(&mut self, object: Expression, index: Expression) -> Expression {
        Expression::Subscript(Box::new(SubscriptExpression {
            node_id: self.id(),
            object,
            index,
        }))
    }

    /// A starred expression `*value`.
    pub fn starred(&mut self, value: Expression) -> Expression {
        Expression::Starred(Box::new(StarredExpression {
            node_id: self.id(),
            value,
        }))
    }

    /// A binary operation.
    pub fn binary(
        &mut self,
        left: Expression,
        operator: BinaryOperator,
        right: Expression,
    ) -> Expression {
        Expression::Binary(Box::new(BinaryOperation {
            node_id: self.id(),
            left,
            operator,
            right,
        }))
    }

    /// A unary operation.
    pub fn unary(&mut self, operator: UnaryOperator, operand: Expression) -> Expression {
        Expression::Unary(Box::new(UnaryOperation {
            node_id: self.id(),
            operator,
            operand,
        }))
    }

    /// A conditional expression `a if cond else b`.
    pub fn conditional(
        &mut self,
        true_expression: Expression,
        condition: Expression,
        false_expression: Expression,
    ) -> Expression {
        Expression::Conditional(Box::new(ConditionalExpression {
            node_id: self.id(),
            true_expression,
            condition,
            false_expression,
        }))
    }

    /// An integer literal.
    pub fn int(&mut self, value: &str) -> Expression {
        Expression::Number(NumberLiteral {
            node_id: self.id(),
            value: value.to_string(),
            kind: NumberKind::Integer,
        })
    }

    /// A float literal.
    pub fn float(&mut self, value: &str) -> Expression {
        Expression::Number(NumberLiteral {
            node_id: self.id(),
            value: value.to_string(),
            kind: NumberKind::Float,
        })
    }

    /// A string literal.
    pub fn string(&mut self, value: &str) -> Expression {
        Expression::Str(StringLiteral {
            node_id: self.id(),
            value: value.to_string(),
        })
    }

    /// A boolean literal.
    pub fn boolean(&mut self, value: bool) -> Expression {
        Expression::Bool(BooleanLiteral {
            node_id: self.id(),
            value,
        })
    }

    /// The `None` literal.
    pub fn none(&mut self) -> Expression {
        Expression::None(NoneLiteral { node_id: self.id() })
    }

    /// The `...` literal.
    pub fn ellipsis(&mut self) -> Expression {
        Expression::Ellipsis(EllipsisLiteral { node_id: self.id() })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// The file root.
    pub fn file_input(&mut self, statements: Vec<Statement>) -> FileInput {
        FileInput {
            node_id: self.id(),
            statements,
        }
    }

    /// A function definition without decorators or return annotation.
    pub fn function_def(
        &mut self,
        name: &str,
        parameters: ParameterList,
        body: Vec<Statement>,
    ) -> Statement {
        let name = self.name_node(name);
        Statement::FunctionDef(FunctionDef {
            node_id: self.id(),
            name,
            decorators: Vec::new(),
            parameters,
            return_annotation: None,
            body,
            is_async: false,
        })
    }

    /// A function definition with all parts.
    #[allow(clippy::too_many_arguments)]
    pub fn function_def_full(
        &mut self,
        name: Name,
        decorators: Vec<Decorator>,
        parameters: ParameterList,
        return_annotation: Option<Expression>,
        body: Vec<Statement>,
        is_async: bool,
    ) -> Statement {
        Statement::FunctionDef(FunctionDef {
            node_id: self.id(),
            name,
            decorators,
            parameters,
            return_annotation,
            body,
            is_async,
        })
    }

    /// A class definition without decorators.
    pub fn class_def(
        &mut self,
        name: &str,
        arguments: Vec<Argument>,
        body: Vec<Statement>,
    ) -> Statement {
        let name = self.name_node(name);
        Statement::ClassDef(ClassDef {
            node_id: self.id(),
            name,
            decorators: Vec::new(),
            arguments,
            body,
        })
    }

    /// A class definition with all parts.
    pub fn class_def_full(
        &mut self,
        name: Name,
        decorators: Vec<Decorator>,
        arguments: Vec<Argument>,
        body: Vec<Statement>,
    ) -> Statement {
        Statement::ClassDef(ClassDef {
            node_id: self.id(),
            name,
            decorators,
            arguments,
            body,
        })
    }

    /// A decorator from dotted path components.
    pub fn decorator(&mut self, dotted: &[&str]) -> Decorator {
        let name = dotted.iter().map(|part| self.path_name(part)).collect();
        Decorator {
            node_id: self.id(),
            name,
            arguments: None,
        }
    }

    /// A plain assignment `targets[0] = targets[1] = ... = value`.
    pub fn assign(&mut self, targets: Vec<Expression>, value: Expression) -> Statement {
        Statement::Assignment(Assignment {
            node_id: self.id(),
            targets,
            value,
        })
    }

    /// An annotated assignment.
    pub fn ann_assign(
        &mut self,
        target: Expression,
        annotation: Expression,
        value: Option<Expression>,
    ) -> Statement {
        Statement::AnnotatedAssignment(AnnotatedAssignment {
            node_id: self.id(),
            target,
            annotation,
            value,
        })
    }

    /// An augmented assignment `target op= value`.
    pub fn aug_assign(
        &mut self,
        target: Expression,
        operator: BinaryOperator,
        value: Expression,
    ) -> Statement {
        Statement::CompoundAssignment(CompoundAssignment {
            node_id: self.id(),
            target,
            operator,
            value,
        })
    }

    /// A bare expression statement.
    pub fn expr_stmt(&mut self, expression: Expression) -> Statement {
        Statement::Expression(ExpressionStatement {
            node_id: self.id(),
            expression,
        })
    }

    /// An `if` statement.
    pub fn if_stmt(
        &mut self,
        condition: Expression,
        body: Vec<Statement>,
        orelse: Vec<Statement>,
    ) -> Statement {
        Statement::If(IfStatement {
            node_id: self.id(),
            condition,
            body,
            orelse,
        })
    }

    /// A `while` statement.
    pub fn while_stmt(
        &mut self,
        condition: Expression,
        body: Vec<Statement>,
        orelse: Vec<Statement>,
    ) -> Statement {
        Statement::While(WhileStatement {
            node_id: self.id(),
            condition,
            body,
            orelse,
        })
    }

    /// A `for` statement.
    pub fn for_stmt(
        &mut self,
        target: Expression,
        iterable: Expression,
        body: Vec<Statement>,
    ) -> Statement {
        Statement::For(ForStatement {
            node_id: self.id(),
            is_async: false,
            target,
            iterable,
            body,
            orelse: Vec::new(),
        })
    }

    /// A `with` statement.
    pub fn with_stmt(&mut self, items: Vec<WithItem>, body: Vec<Statement>) -> Statement {
        Statement::With(WithStatement {
            node_id: self.id(),
            is_async: false,
            items,
            body,
        })
    }

    /// One `context [as target]` item of a `with` statement.
    pub fn with_item(&mut self, context: Expression, target: Option<Expression>) -> WithItem {
        WithItem {
            node_id: self.id(),
            context,
            target,
        }
    }

    /// A `try` statement.
    pub fn try_stmt(
        &mut self,
        body: Vec<Statement>,
        except_clauses: Vec<ExceptClause>,
        orelse: Vec<Statement>,
        finally: Vec<Statement>,
    ) -> Statement {
        Statement::Try(TryStatement {
            node_id: self.id(),
            body,
            except_clauses,
            orelse,
            finally,
        })
    }

    /// An `except [exception [as target]]` clause.
    pub fn except_clause(
        &mut self,
        exception: Option<Expression>,
        target: Option<Expression>,
        body: Vec<Statement>,
    ) -> ExceptClause {
        ExceptClause {
            node_id: self.id(),
            exception,
            target,
            body,
        }
    }

    /// An `import ...` statement.
    pub fn import(&mut self, modules: Vec<AliasedName>) -> Statement {
        Statement::ImportName(ImportName {
            node_id: self.id(),
            modules,
        })
    }

    /// A dotted name with an optional alias.
    pub fn aliased_name(&mut self, dotted: &[&str], alias: Option<&str>) -> AliasedName {
        let dotted_name = dotted.iter().map(|part| self.path_name(part)).collect();
        let alias = alias.map(|a| self.name_node(a));
        AliasedName {
            node_id: self.id(),
            dotted_name,
            alias,
        }
    }

    /// A `from module import names` statement.
    pub fn import_from(&mut self, module: &[&str], names: Vec<AliasedName>) -> Statement {
        self.import_from_relative(0, Some(module), names)
    }

    /// A `from [.]*[module] import names` statement with a relative prefix.
    pub fn import_from_relative(
        &mut self,
        dotted_prefix: usize,
        module: Option<&[&str]>,
        names: Vec<AliasedName>,
    ) -> Statement {
        let module = module.map(|parts| parts.iter().map(|p| self.path_name(p)).collect());
        Statement::ImportFrom(ImportFrom {
            node_id: self.id(),
            dotted_prefix,
            module,
            names: ImportedNames::Names(names),
        })
    }

    /// A `from module import *` statement.
    pub fn wildcard_import(&mut self, module: &[&str]) -> Statement {
        let module = Some(module.iter().map(|p| self.path_name(p)).collect());
        Statement::ImportFrom(ImportFrom {
            node_id: self.id(),
            dotted_prefix: 0,
            module,
            names: ImportedNames::Star,
        })
    }

    /// A `global ...` statement.
    pub fn global_stmt(&mut self, names: &[&str]) -> Statement {
        let names = names.iter().map(|n| self.name_node(n)).collect();
        Statement::Global(GlobalStatement {
            node_id: self.id(),
            names,
        })
    }

    /// A `nonlocal ...` statement.
    pub fn nonlocal_stmt(&mut self, names: &[&str]) -> Statement {
        let names = names.iter().map(|n| self.name_node(n)).collect();
        Statement::Nonlocal(NonlocalStatement {
            node_id: self.id(),
            names,
        })
    }

    /// A `return [value]` statement.
    pub fn return_stmt(&mut self, value: Option<Expression>) -> Statement {
        Statement::Return(ReturnStatement {
            node_id: self.id(),
            value,
        })
    }

    /// A `pass` statement.
    pub fn pass_stmt(&mut self) -> Statement {
        Statement::Pass(PassStatement { node_id: self.id() })
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// A parameter list.
    pub fn parameters(&mut self, parameters: Vec<AnyParameter>) -> ParameterList {
        ParameterList { parameters }
    }

    /// An empty parameter list.
    pub fn no_parameters(&mut self) -> ParameterList {
        ParameterList::default()
    }

    /// A plain parameter.
    pub fn param(&mut self, name: &str) -> AnyParameter {
        self.param_full(name, None, None)
    }

    /// A plain parameter with optional annotation and default.
    pub fn param_full(
        &mut self,
        name: &str,
        annotation: Option<Expression>,
        default: Option<Expression>,
    ) -> AnyParameter {
        let name = self.name_node(name);
        AnyParameter::Param(Parameter {
            node_id: self.id(),
            name,
            annotation,
            default,
            star: ParameterStar::None,
        })
    }

    /// A `*args` parameter.
    pub fn vararg(&mut self, name: &str) -> AnyParameter {
        let name = self.name_node(name);
        AnyParameter::Param(Parameter {
            node_id: self.id(),
            name,
            annotation: None,
            default: None,
            star: ParameterStar::Star,
        })
    }

    /// A `**kwargs` parameter.
    pub fn kwarg(&mut self, name: &str) -> AnyParameter {
        let name = self.name_node(name);
        AnyParameter::Param(Parameter {
            node_id: self.id(),
            name,
            annotation: None,
            default: None,
            star: ParameterStar::StarStar,
        })
    }

    /// The bare `*` keyword-only separator.
    pub fn star_separator(&mut self) -> AnyParameter {
        AnyParameter::Star(ParamStar { node_id: self.id() })
    }

    /// The `/` positional-only separator.
    pub fn slash_separator(&mut self) -> AnyParameter {
        AnyParameter::Slash(ParamSlash { node_id: self.id() })
    }

    /// A tuple-destructured parameter.
    pub fn tuple_param(&mut self, parameters: Vec<AnyParameter>) -> AnyParameter {
        AnyParameter::Tuple(TupleParameter {
            node_id: self.id(),
            parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut t = TreeBuilder::new();
        let a = t.name("a");
        let b = t.name("b");
        assert!(a.node_id() < b.node_id());
    }

    #[test]
    fn test_qualified_name_is_not_variable() {
        let mut t = TreeBuilder::new();
        let base = t.name("obj");
        let q = t.qualified(base, "attr");
        match q {
            Expression::Qualified(q) => {
                assert!(!q.name.is_variable);
                assert!(q.qualifier.as_name().unwrap().is_variable);
            }
            _ => panic!("expected qualified expression"),
        }
    }

    #[test]
    fn test_aliased_name_dotted() {
        let mut t = TreeBuilder::new();
        let a = t.aliased_name(&["os", "path"], None);
        assert_eq!(a.dotted(), "os.path");
        assert!(a.dotted_name.iter().all(|n| !n.is_variable));
    }

    #[test]
    fn test_import_from_module_name() {
        let mut t = TreeBuilder::new();
        let names = vec![t.aliased_name(&["q"], None)];
        let stmt = t.import_from_relative(2, Some(&["other"]), names);
        match stmt {
            Statement::ImportFrom(f) => {
                assert_eq!(f.dotted_prefix, 2);
                assert_eq!(f.module_name().as_deref(), Some("other"));
                assert!(!f.is_wildcard());
            }
            _ => panic!("expected import from"),
        }
    }
}
