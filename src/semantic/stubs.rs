// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! External symbol indices and file metadata.
//!
//! The stub index holds precomputed summaries of the standard library and
//! third-party packages; the global-symbol index holds per-module symbol
//! sets extracted from the rest of the project. Both exchange symbols as
//! [`SymbolDescriptor`]s, which the builder instantiates into the per-file
//! arena when seeding builtins and resolving imports.
//!
//! Indices are immutable after construction and safe for concurrent reads.
//! They serialize to JSON; persistence and cache invalidation belong to the
//! caller.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::nodes::Name;
use crate::semantic::builder::SymbolTable;
use crate::semantic::inference::{BuiltinTag, InferredType};
use crate::semantic::scope::ScopeId;
use crate::semantic::symbol::{
    ClassData, FunctionData, ParameterDescriptor, Symbol, SymbolData, SymbolId, UsageKind,
};

/// Error loading a persisted index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The JSON payload did not match the index schema.
    #[error("malformed symbol index: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Modules whose own analysis must not seed the builtin namespace, to
/// avoid self-reference while building stub summaries.
pub(crate) const BASE_MODULES: &[&str] = &["", "typing", "typing_extensions"];

/// The names seeded into every module scope from the builtin namespace.
pub const BUILTIN_NAMES: &[&str] = &[
    "abs",
    "all",
    "any",
    "ascii",
    "bin",
    "bool",
    "bytearray",
    "bytes",
    "callable",
    "chr",
    "classmethod",
    "compile",
    "complex",
    "delattr",
    "dict",
    "dir",
    "divmod",
    "enumerate",
    "eval",
    "exec",
    "filter",
    "float",
    "format",
    "frozenset",
    "getattr",
    "globals",
    "hasattr",
    "hash",
    "help",
    "hex",
    "id",
    "input",
    "int",
    "isinstance",
    "issubclass",
    "iter",
    "len",
    "list",
    "locals",
    "map",
    "max",
    "memoryview",
    "min",
    "next",
    "object",
    "oct",
    "open",
    "ord",
    "pow",
    "print",
    "property",
    "range",
    "repr",
    "reversed",
    "round",
    "set",
    "setattr",
    "slice",
    "sorted",
    "staticmethod",
    "str",
    "sum",
    "super",
    "tuple",
    "type",
    "vars",
    "zip",
    "__name__",
    "__file__",
    "__doc__",
    "BaseException",
    "Exception",
    "ArithmeticError",
    "AssertionError",
    "AttributeError",
    "ImportError",
    "IndexError",
    "KeyError",
    "KeyboardInterrupt",
    "LookupError",
    "NameError",
    "NotImplementedError",
    "OSError",
    "OverflowError",
    "RecursionError",
    "RuntimeError",
    "StopIteration",
    "SystemExit",
    "TypeError",
    "UnicodeDecodeError",
    "ValueError",
    "ZeroDivisionError",
    "Warning",
    "DeprecationWarning",
];

/// Metadata of the analyzed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    file_name: String,
    package: String,
    stub: bool,
}

impl SourceFile {
    /// A project source file.
    pub fn new(file_name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            package: package.into(),
            stub: false,
        }
    }

    /// A stub-summary file (analyzed while building stub indices).
    pub fn stub_file(file_name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            stub: true,
            ..Self::new(file_name, package)
        }
    }

    /// The file name, with extension.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The dotted package the file lives in; empty at the project root.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Whether this file is a stub summary.
    pub fn is_stub(&self) -> bool {
        self.stub
    }

    /// The module name: the file name with its last dot-extension removed.
    pub fn module_name(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(index) if index > 0 => &self.file_name[..index],
            _ => &self.file_name,
        }
    }

    /// The module FQN. `pkg/sub/mod.py` is `pkg.sub.mod`; a package's
    /// `__init__.py` is the package itself.
    pub fn module_fqn(&self) -> String {
        let module_name = self.module_name();
        if self.package.is_empty() {
            module_name.to_string()
        } else if module_name == "__init__" {
            self.package.clone()
        } else {
            format!("{}.{}", self.package, module_name)
        }
    }

    /// Package segments plus module name, for relative-import truncation.
    pub fn path_components(&self) -> Vec<String> {
        let mut components: Vec<String> = self
            .package
            .split('.')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        components.push(self.module_name().to_string());
        components
    }
}

/// A read-only symbol summary exchanged through the indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDescriptor {
    /// The symbol's name.
    pub name: String,
    /// The symbol's FQN, when known.
    #[serde(default)]
    pub fully_qualified_name: Option<String>,
    /// Kind-specific payload.
    #[serde(default)]
    pub kind: DescriptorKind,
}

impl SymbolDescriptor {
    /// A plain (non-function, non-class) descriptor.
    pub fn other(name: impl Into<String>, fqn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fully_qualified_name: Some(fqn.into()),
            kind: DescriptorKind::Other,
        }
    }

    /// A function descriptor.
    pub fn function(name: impl Into<String>, fqn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fully_qualified_name: Some(fqn.into()),
            kind: DescriptorKind::Function(FunctionDescriptor::default()),
        }
    }

    /// A class descriptor.
    pub fn class(
        name: impl Into<String>,
        fqn: impl Into<String>,
        members: Vec<SymbolDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            fully_qualified_name: Some(fqn.into()),
            kind: DescriptorKind::Class(ClassDescriptor {
                members,
                superclasses: Vec::new(),
            }),
        }
    }
}

/// Kind payload of a [`SymbolDescriptor`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    /// Variable, constant, module attribute.
    #[default]
    Other,
    /// A function with its signature.
    Function(FunctionDescriptor),
    /// A class with members and superclass FQNs.
    Class(ClassDescriptor),
    /// Several alternative definitions.
    Ambiguous(Vec<SymbolDescriptor>),
}

/// Signature summary of a stub function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<StubParameter>,
}

/// One parameter of a stub function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StubParameter {
    /// The parameter name; `None` for tuple parameters.
    #[serde(default)]
    pub name: Option<String>,
    /// Builtin type name from the annotation, when nominal.
    #[serde(default)]
    pub annotated_type: Option<String>,
    /// Whether the parameter has a default value.
    #[serde(default)]
    pub has_default: bool,
    /// Whether this is `*args` or `**kwargs`.
    #[serde(default)]
    pub is_variadic: bool,
    /// Whether the parameter is keyword-only.
    #[serde(default)]
    pub is_keyword_only: bool,
    /// Whether the parameter is positional-only.
    #[serde(default)]
    pub is_positional_only: bool,
}

/// Class summary: members plus superclass FQNs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Member descriptors.
    #[serde(default)]
    pub members: Vec<SymbolDescriptor>,
    /// Superclass FQNs, resolved against the instantiated batch.
    #[serde(default)]
    pub superclasses: Vec<String>,
}

/// Precomputed symbol summaries for the standard library and third-party
/// packages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StubIndex {
    builtins: IndexMap<String, SymbolDescriptor>,
    modules: HashMap<String, Vec<SymbolDescriptor>>,
}

impl StubIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a builtin symbol summary, keyed by its name.
    pub fn add_builtin(&mut self, descriptor: SymbolDescriptor) {
        self.builtins.insert(descriptor.name.clone(), descriptor);
    }

    /// Register a module's symbol summaries.
    pub fn add_module(&mut self, fqn: impl Into<String>, symbols: Vec<SymbolDescriptor>) {
        self.modules.insert(fqn.into(), symbols);
    }

    /// The builtin namespace, keyed by name.
    pub fn builtin_symbols(&self) -> &IndexMap<String, SymbolDescriptor> {
        &self.builtins
    }

    /// The summaries of one module, if indexed.
    pub fn symbols_for_module(&self, fqn: &str) -> Option<&[SymbolDescriptor]> {
        self.modules.get(fqn).map(Vec::as_slice)
    }

    /// Load an index from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, IndexError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the index to JSON.
    pub fn to_json_string(&self) -> Result<String, IndexError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Per-module symbol sets for the rest of the project, used by wildcard
/// and aliased imports.
#[derive(Debug, Clone, Default)]
pub struct GlobalSymbolIndex {
    by_module: HashMap<String, Vec<SymbolDescriptor>>,
    by_fqn: HashMap<String, SymbolDescriptor>,
}

impl GlobalSymbolIndex {
    /// Build the index from per-module symbol sets. The by-FQN view is
    /// derived once here.
    pub fn from_modules(by_module: HashMap<String, Vec<SymbolDescriptor>>) -> Self {
        let mut by_fqn = HashMap::new();
        for symbols in by_module.values() {
            for descriptor in symbols {
                if let Some(fqn) = &descriptor.fully_qualified_name {
                    by_fqn.insert(fqn.clone(), descriptor.clone());
                }
            }
        }
        Self { by_module, by_fqn }
    }

    /// Load the index from the JSON form of its per-module map.
    pub fn from_json_str(json: &str) -> Result<Self, IndexError> {
        let by_module: HashMap<String, Vec<SymbolDescriptor>> = serde_json::from_str(json)?;
        Ok(Self::from_modules(by_module))
    }

    /// The symbols of one module, if indexed.
    pub fn module_symbols(&self, fqn: &str) -> Option<&[SymbolDescriptor]> {
        self.by_module.get(fqn).map(Vec::as_slice)
    }

    /// Look up a symbol by FQN across all modules.
    pub fn symbol_by_fqn(&self, fqn: &str) -> Option<&SymbolDescriptor> {
        self.by_fqn.get(fqn)
    }
}

// Descriptor instantiation and import symbol creation.
impl SymbolTable {
    /// Instantiate an index descriptor into the arena.
    pub(crate) fn instantiate_descriptor(&mut self, descriptor: &SymbolDescriptor) -> SymbolId {
        let fqn = descriptor.fully_qualified_name.clone();
        let id = match &descriptor.kind {
            DescriptorKind::Other => self.alloc_symbol(Symbol::new(descriptor.name.as_str(), fqn)),
            DescriptorKind::Function(function) => {
                let parameters: Vec<ParameterDescriptor> = function
                    .parameters
                    .iter()
                    .map(|p| ParameterDescriptor {
                        name: p.name.clone(),
                        declared_type: p
                            .annotated_type
                            .as_deref()
                            .and_then(BuiltinTag::from_name)
                            .map(InferredType::Builtin)
                            .unwrap_or(InferredType::Any),
                        has_default: p.has_default,
                        is_variadic: p.is_variadic,
                        is_keyword_only: p.is_keyword_only,
                        is_positional_only: p.is_positional_only,
                        location: None,
                    })
                    .collect();
                let has_variadic_parameter = parameters.iter().any(|p| p.is_variadic);
                self.alloc_symbol(Symbol::new(descriptor.name.as_str(), fqn).with_data(
                    SymbolData::Function(FunctionData {
                        parameters,
                        has_variadic_parameter,
                        is_instance_method: false,
                        is_stub: true,
                        decorators: Vec::new(),
                        definition_location: None,
                    }),
                ))
            }
            DescriptorKind::Class(class) => {
                let mut members = IndexMap::new();
                for member in &class.members {
                    let member_id = self.instantiate_descriptor(member);
                    members.insert(member.name.clone(), member_id);
                }
                let id = self.alloc_symbol(Symbol::new(descriptor.name.as_str(), fqn).with_data(
                    SymbolData::Class(ClassData {
                        superclasses: Vec::new(),
                        has_unresolved_hierarchy: false,
                        members,
                        has_decorators: false,
                        definition_location: None,
                    }),
                ));
                if !class.superclasses.is_empty() {
                    self.pending_superclasses.push((id, class.superclasses.clone()));
                }
                id
            }
            DescriptorKind::Ambiguous(alternatives) => {
                let alternatives: Vec<SymbolId> = alternatives
                    .iter()
                    .map(|alt| self.instantiate_descriptor(alt))
                    .collect();
                self.alloc_symbol(
                    Symbol::new(descriptor.name.as_str(), fqn)
                        .with_data(SymbolData::Ambiguous { alternatives }),
                )
            }
        };
        if let Some(fqn) = &self.symbols[id.index()].fully_qualified_name {
            self.descriptor_symbols_by_fqn
                .entry(fqn.clone())
                .or_insert(id);
        }
        id
    }

    /// Resolve the superclass FQNs collected while instantiating a batch
    /// of descriptors. Unresolvable bases mark the hierarchy unresolved.
    pub(crate) fn resolve_pending_hierarchies(&mut self) {
        let pending = std::mem::take(&mut self.pending_superclasses);
        for (class, superclass_fqns) in pending {
            for fqn in superclass_fqns {
                let resolved = self
                    .descriptor_symbols_by_fqn
                    .get(&fqn)
                    .copied()
                    .filter(|&id| self.symbol(id).class_data().is_some());
                let data = self
                    .symbol_mut(class)
                    .class_data_mut()
                    .expect("pending hierarchy on a non-class symbol");
                match resolved {
                    Some(superclass) => data.superclasses.push(superclass),
                    None => data.has_unresolved_hierarchy = true,
                }
            }
        }
    }

    /// Whether the name is already bound (or redirected) in the scope.
    pub(crate) fn is_existing_symbol(&self, scope: ScopeId, name: &str) -> bool {
        let scope = self.scope(scope);
        scope.symbols_by_name.contains_key(name)
            || scope.global_names.contains(name)
            || scope.nonlocal_names.contains(name)
    }

    /// Seed one builtin name into the module scope.
    pub(crate) fn create_builtin_symbol(
        &mut self,
        name: &str,
        descriptor: Option<&SymbolDescriptor>,
    ) {
        let module = self.module_scope_id();
        let id = match descriptor {
            Some(descriptor) => self.instantiate_descriptor(descriptor),
            None => self.alloc_symbol(Symbol::new(name, Some(name.to_string()))),
        };
        self.scopes[module.index()]
            .symbols_by_name
            .insert(name.to_string(), id);
        self.scopes[module.index()].builtin_symbols.insert(id);
    }

    /// Copy every symbol of a wildcard-imported module into the scope
    /// under its own name.
    pub(crate) fn create_symbols_from_wildcard_import(
        &mut self,
        scope: ScopeId,
        descriptors: &[SymbolDescriptor],
    ) {
        for descriptor in descriptors {
            let id = self.instantiate_descriptor(descriptor);
            self.scopes[scope.index()]
                .symbols_by_name
                .insert(descriptor.name.clone(), id);
        }
        self.resolve_pending_hierarchies();
    }

    /// Bind a module symbol for `import X [as Y]`. Child symbols come from
    /// the module's indexed symbols so qualified reads resolve.
    pub(crate) fn add_module_symbol(
        &mut self,
        scope: ScopeId,
        name: &Name,
        full_name: Option<String>,
        module_symbols: Option<&[SymbolDescriptor]>,
    ) {
        if self.is_existing_symbol(scope, &name.name) {
            self.add_binding_usage(scope, name, UsageKind::Import, full_name);
            return;
        }
        let id = self.alloc_symbol(Symbol::new(name.name.as_str(), full_name));
        if let Some(descriptors) = module_symbols {
            for descriptor in descriptors {
                let child = self.instantiate_descriptor(descriptor);
                self.symbols[id.index()]
                    .children
                    .insert(descriptor.name.clone(), child);
            }
            self.resolve_pending_hierarchies();
        }
        self.scopes[scope.index()]
            .symbols_by_name
            .insert(name.name.clone(), id);
        self.add_usage(id, name.node_id, UsageKind::Import);
        trace!(name = %name.name, "bound module symbol");
    }

    /// Bind one name of `from M import N [as A]`, cross-referenced to the
    /// global-symbol index when the target FQN is indexed.
    pub(crate) fn add_imported_symbol(
        &mut self,
        scope: ScopeId,
        name: &Name,
        fully_qualified_name: Option<String>,
        descriptor: Option<&SymbolDescriptor>,
    ) {
        if self.is_existing_symbol(scope, &name.name) {
            self.add_binding_usage(scope, name, UsageKind::Import, fully_qualified_name);
            return;
        }
        let id = match descriptor {
            Some(descriptor) => {
                let id = self.instantiate_descriptor(descriptor);
                self.resolve_pending_hierarchies();
                // The local binding uses the alias, not the origin name.
                self.symbols[id.index()].name = name.name.clone();
                id
            }
            None => self.alloc_symbol(Symbol::new(name.name.as_str(), None)),
        };
        if fully_qualified_name.is_some() {
            self.symbols[id.index()].fully_qualified_name = fully_qualified_name;
        }
        self.scopes[scope.index()]
            .symbols_by_name
            .insert(name.name.clone(), id);
        self.add_usage(id, name.node_id, UsageKind::Import);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_fqn_rules() {
        assert_eq!(SourceFile::new("mod.py", "pkg.sub").module_fqn(), "pkg.sub.mod");
        assert_eq!(SourceFile::new("mod.py", "").module_fqn(), "mod");
        assert_eq!(SourceFile::new("__init__.py", "pkg").module_fqn(), "pkg");
        assert_eq!(SourceFile::new("archive.tar.gz", "").module_fqn(), "archive.tar");
    }

    #[test]
    fn test_path_components() {
        assert_eq!(
            SourceFile::new("mod.py", "pkg.sub").path_components(),
            vec!["pkg", "sub", "mod"]
        );
        assert_eq!(SourceFile::new("mod.py", "").path_components(), vec!["mod"]);
    }

    #[test]
    fn test_stub_index_json_round_trip() {
        let mut index = StubIndex::new();
        index.add_builtin(SymbolDescriptor::class(
            "str",
            "str",
            vec![SymbolDescriptor::function("upper", "str.upper")],
        ));
        index.add_module(
            "os.path",
            vec![SymbolDescriptor::function("join", "os.path.join")],
        );

        let json = index.to_json_string().unwrap();
        let loaded = StubIndex::from_json_str(&json).unwrap();
        assert!(loaded.builtin_symbols().contains_key("str"));
        let os_path = loaded.symbols_for_module("os.path").unwrap();
        assert_eq!(os_path.len(), 1);
        assert_eq!(os_path[0].name, "join");
    }

    #[test]
    fn test_stub_index_rejects_malformed_json() {
        let error = StubIndex::from_json_str("{not json").unwrap_err();
        assert!(matches!(error, IndexError::Malformed(_)));
    }

    #[test]
    fn test_global_index_by_fqn_is_derived() {
        let mut by_module = HashMap::new();
        by_module.insert(
            "mylib.core".to_string(),
            vec![SymbolDescriptor::class("Engine", "mylib.core.Engine", vec![])],
        );
        let index = GlobalSymbolIndex::from_modules(by_module);
        assert!(index.symbol_by_fqn("mylib.core.Engine").is_some());
        assert!(index.symbol_by_fqn("mylib.core.Missing").is_none());
    }

    #[test]
    fn test_builtin_names_contains_core_names() {
        for name in ["print", "len", "str", "Exception"] {
            assert!(BUILTIN_NAMES.contains(&name), "missing builtin {name}");
        }
    }
}
