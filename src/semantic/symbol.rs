// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The symbol model: a closed tagged union over the four symbol kinds,
//! usage records, and the function/class payloads.
//!
//! Symbols live in the per-file arena owned by
//! [`SymbolTable`](crate::semantic::SymbolTable); every cross-symbol
//! relation (class bases, members, ambiguous alternatives, child symbols)
//! is a [`SymbolId`] into that arena, never an owning reference. This is
//! what keeps cyclic class hierarchies representable without reference
//! cycles.

use indexmap::IndexMap;

use crate::nodes::{
    AnyParameter, ClassDef, Expression, FunctionDef, NodeId, ParameterList, ParameterStar, Span,
};
use crate::semantic::inference::InferredType;
use crate::semantic::scope::ScopeId;

/// Index of a symbol in the per-file arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// The role a name plays at one usage site.
///
/// Every kind except [`UsageKind::Other`] is a *binding* usage: the name is
/// written or declared there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageKind {
    /// Left-hand side of a plain or annotated assignment.
    AssignmentLhs,
    /// Left-hand side of an augmented assignment.
    CompoundAssignmentLhs,
    /// Comprehension loop target.
    CompDeclaration,
    /// `for` loop target.
    LoopDeclaration,
    /// Function or lambda parameter.
    Parameter,
    /// Import binding.
    Import,
    /// `def` name.
    FuncDeclaration,
    /// `class` name.
    ClassDeclaration,
    /// `except ... as` target.
    ExceptionInstance,
    /// `with ... as` target.
    WithInstance,
    /// Name listed in a `global` statement (module-scope synthesis).
    GlobalDeclaration,
    /// A plain read.
    Other,
}

impl UsageKind {
    /// Returns the string representation used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageKind::AssignmentLhs => "assignment_lhs",
            UsageKind::CompoundAssignmentLhs => "compound_assignment_lhs",
            UsageKind::CompDeclaration => "comp_declaration",
            UsageKind::LoopDeclaration => "loop_declaration",
            UsageKind::Parameter => "parameter",
            UsageKind::Import => "import",
            UsageKind::FuncDeclaration => "func_declaration",
            UsageKind::ClassDeclaration => "class_declaration",
            UsageKind::ExceptionInstance => "exception_instance",
            UsageKind::WithInstance => "with_instance",
            UsageKind::GlobalDeclaration => "global_declaration",
            UsageKind::Other => "other",
        }
    }

    /// Whether a usage of this kind binds the name.
    pub fn is_binding(&self) -> bool {
        !matches!(self, UsageKind::Other)
    }
}

impl std::fmt::Display for UsageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One usage of a symbol: the name node and the role it plays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    /// The name node.
    pub node: NodeId,
    /// The role of the name at that site.
    pub kind: UsageKind,
}

impl Usage {
    /// Whether this usage binds the name.
    pub fn is_binding_usage(&self) -> bool {
        self.kind.is_binding()
    }
}

/// The kind of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Variable, parameter, import alias - anything non-def.
    Other,
    /// Declared with a `def`.
    Function,
    /// Declared with a `class`.
    Class,
    /// Several conflicting definitions carried together.
    Ambiguous,
}

impl SymbolKind {
    /// Returns the string representation used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Other => "other",
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Ambiguous => "ambiguous",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific symbol payload.
#[derive(Debug, Clone)]
pub(crate) enum SymbolData {
    Other,
    Function(FunctionData),
    Class(ClassData),
    Ambiguous { alternatives: Vec<SymbolId> },
}

/// One parameter of a function symbol.
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    /// The parameter name; `None` for tuple parameters.
    pub name: Option<String>,
    /// The declared type, from the annotation. `Any` when unannotated.
    pub declared_type: InferredType,
    /// Whether the parameter has a default value.
    pub has_default: bool,
    /// Whether this is `*args` or `**kwargs`.
    pub is_variadic: bool,
    /// Whether the parameter is keyword-only (after `*` or `*args`).
    pub is_keyword_only: bool,
    /// Whether the parameter is positional-only (before `/`).
    pub is_positional_only: bool,
    /// Source location of the parameter name.
    pub location: Option<Span>,
}

/// Payload of a function symbol.
#[derive(Debug, Clone)]
pub struct FunctionData {
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Whether any parameter is `*args` or `**kwargs`.
    pub has_variadic_parameter: bool,
    /// Whether the function is declared directly inside a class body.
    pub is_instance_method: bool,
    /// Whether the symbol comes from a stub summary rather than source.
    pub is_stub: bool,
    /// Dotted decorator names.
    pub decorators: Vec<String>,
    /// Location of the `def` name.
    pub definition_location: Option<Span>,
}

impl FunctionData {
    /// Build the payload for a `def` node. Declared parameter types start
    /// out as `Any`; the inference pass finalizes them from annotations.
    pub(crate) fn from_def(def: &FunctionDef, is_instance_method: bool, is_stub: bool) -> Self {
        let (parameters, has_variadic_parameter) =
            parameter_descriptors(&def.parameters, &mut |_| InferredType::Any);
        let decorators = def
            .decorators
            .iter()
            .map(|d| {
                d.name
                    .iter()
                    .map(|n| n.name.as_str())
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .collect();
        Self {
            parameters,
            has_variadic_parameter,
            is_instance_method,
            is_stub,
            decorators,
            definition_location: def.name.span,
        }
    }

    /// Whether the function has decorators.
    pub fn has_decorators(&self) -> bool {
        !self.decorators.is_empty()
    }
}

/// Payload of a class symbol.
#[derive(Debug, Clone)]
pub struct ClassData {
    /// Resolved base classes in declaration order.
    pub superclasses: Vec<SymbolId>,
    /// True when some base could not be resolved to a class symbol. Member
    /// lookup answers "unknown" instead of "absent" in that case.
    pub has_unresolved_hierarchy: bool,
    /// Class members by name: class-body names plus instance attributes.
    pub members: IndexMap<String, SymbolId>,
    /// Whether the class has decorators.
    pub has_decorators: bool,
    /// Location of the `class` name.
    pub definition_location: Option<Span>,
}

impl ClassData {
    /// Build the payload for a `class` node. Hierarchy and members are
    /// filled in by the reference and attach passes.
    pub(crate) fn from_def(def: &ClassDef) -> Self {
        Self {
            superclasses: Vec::new(),
            has_unresolved_hierarchy: false,
            members: IndexMap::new(),
            has_decorators: !def.decorators.is_empty(),
            definition_location: def.name.span,
        }
    }
}

/// Result of a class member lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberLookup {
    /// The member exists; here is its symbol.
    Found(SymbolId),
    /// The member does not exist anywhere in the resolved hierarchy.
    Absent,
    /// The hierarchy is partly unresolved, so absence cannot be proven.
    Unknown,
}

/// A symbol: one named entity of the analyzed module.
///
/// Construction and mutation happen inside the builder; once `build`
/// returns, symbols are frozen.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub(crate) name: String,
    pub(crate) fully_qualified_name: Option<String>,
    pub(crate) usages: Vec<Usage>,
    pub(crate) data: SymbolData,
    /// Child symbols keyed by attribute name, created by qualified reads.
    pub(crate) children: IndexMap<String, SymbolId>,
    /// Set on a method's implicit-instance parameter: the class scope that
    /// collects `self.x` assignments.
    pub(crate) self_class_scope: Option<ScopeId>,
}

impl Symbol {
    pub(crate) fn new(name: impl Into<String>, fully_qualified_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            fully_qualified_name,
            usages: Vec::new(),
            data: SymbolData::Other,
            children: IndexMap::new(),
            self_class_scope: None,
        }
    }

    pub(crate) fn with_data(mut self, data: SymbolData) -> Self {
        self.data = data;
        self
    }

    /// The symbol's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dotted path from the module root, when known.
    pub fn fully_qualified_name(&self) -> Option<&str> {
        self.fully_qualified_name.as_deref()
    }

    /// The symbol's kind.
    pub fn kind(&self) -> SymbolKind {
        match &self.data {
            SymbolData::Other => SymbolKind::Other,
            SymbolData::Function(_) => SymbolKind::Function,
            SymbolData::Class(_) => SymbolKind::Class,
            SymbolData::Ambiguous { .. } => SymbolKind::Ambiguous,
        }
    }

    /// All usages in discovery order.
    pub fn usages(&self) -> &[Usage] {
        &self.usages
    }

    /// The binding usages only.
    pub fn binding_usages(&self) -> impl Iterator<Item = &Usage> {
        self.usages.iter().filter(|u| u.is_binding_usage())
    }

    /// Whether any usage of this name node exists already.
    pub(crate) fn has_usage_at(&self, node: NodeId) -> bool {
        self.usages.iter().any(|u| u.node == node)
    }

    /// The function payload, when this is a function symbol.
    pub fn function_data(&self) -> Option<&FunctionData> {
        match &self.data {
            SymbolData::Function(data) => Some(data),
            _ => None,
        }
    }

    /// The class payload, when this is a class symbol.
    pub fn class_data(&self) -> Option<&ClassData> {
        match &self.data {
            SymbolData::Class(data) => Some(data),
            _ => None,
        }
    }

    /// The alternative definitions, when this is an ambiguous symbol.
    pub fn alternatives(&self) -> Option<&[SymbolId]> {
        match &self.data {
            SymbolData::Ambiguous { alternatives } => Some(alternatives),
            _ => None,
        }
    }

    /// Child symbols created by qualified reads, keyed by attribute name.
    pub fn children(&self) -> &IndexMap<String, SymbolId> {
        &self.children
    }

    /// Whether this symbol is a method's implicit-instance parameter.
    pub fn is_self_parameter(&self) -> bool {
        self.self_class_scope.is_some()
    }

    /// The definition location, for function and class symbols.
    pub fn definition_location(&self) -> Option<Span> {
        match &self.data {
            SymbolData::Function(data) => data.definition_location,
            SymbolData::Class(data) => data.definition_location,
            _ => None,
        }
    }

    pub(crate) fn function_data_mut(&mut self) -> Option<&mut FunctionData> {
        match &mut self.data {
            SymbolData::Function(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn class_data_mut(&mut self) -> Option<&mut ClassData> {
        match &mut self.data {
            SymbolData::Class(data) => Some(data),
            _ => None,
        }
    }
}

/// Classify a parameter list into descriptors, resolving declared types
/// through `resolve`. Returns the descriptors and the has-variadic flag.
///
/// Plain parameters after a `*` separator or a `*args` parameter are
/// keyword-only; a `/` separator retroactively marks everything before it
/// positional-only. Tuple parameters yield a nameless descriptor.
pub(crate) fn parameter_descriptors(
    parameters: &ParameterList,
    resolve: &mut dyn FnMut(&Expression) -> InferredType,
) -> (Vec<ParameterDescriptor>, bool) {
    let mut descriptors = Vec::new();
    let mut keyword_only = false;
    let mut has_variadic = false;

    for entry in &parameters.parameters {
        match entry {
            AnyParameter::Param(param) => {
                let is_variadic = param.star != ParameterStar::None;
                if is_variadic {
                    has_variadic = true;
                }
                let declared_type = param
                    .annotation
                    .as_ref()
                    .map(&mut *resolve)
                    .unwrap_or(InferredType::Any);
                descriptors.push(ParameterDescriptor {
                    name: Some(param.name.name.clone()),
                    declared_type,
                    has_default: param.default.is_some(),
                    is_variadic,
                    is_keyword_only: keyword_only && !is_variadic,
                    is_positional_only: false,
                    location: param.name.span,
                });
                if param.star == ParameterStar::Star {
                    keyword_only = true;
                }
            }
            AnyParameter::Tuple(_) => {
                descriptors.push(ParameterDescriptor {
                    name: None,
                    declared_type: InferredType::Any,
                    has_default: false,
                    is_variadic: false,
                    is_keyword_only: keyword_only,
                    is_positional_only: false,
                    location: None,
                });
            }
            AnyParameter::Star(_) => {
                keyword_only = true;
            }
            AnyParameter::Slash(_) => {
                for descriptor in &mut descriptors {
                    if !descriptor.is_variadic {
                        descriptor.is_positional_only = true;
                    }
                }
            }
        }
    }

    (descriptors, has_variadic)
}
