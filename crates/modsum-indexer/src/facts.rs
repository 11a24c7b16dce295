//! Facts handed over by the front-end
//!
//! The indexer never looks at a program representation. The front-end walks
//! its functions and dispatch tables and classifies every reference into one
//! of the closed set of facts below; everything is keyed by mangled name.

use serde::{Deserialize, Serialize};

/// Everything the indexer needs to know about one compiled module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleFacts {
    /// Module name
    pub name: String,

    #[serde(default)]
    pub functions: Vec<FunctionFacts>,

    #[serde(default)]
    pub witness_tables: Vec<WitnessTableFacts>,

    #[serde(default)]
    pub vtables: Vec<VTableFacts>,

    /// Properties that may carry a key-path component
    #[serde(default)]
    pub properties: Vec<PropertyFacts>,
}

impl ModuleFacts {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse facts from their JSON form
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// One function defined or declared in the module
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionFacts {
    /// Mangled name
    pub name: String,

    /// Classified references, in body order
    #[serde(default)]
    pub facts: Vec<Fact>,

    /// Uses a foreign method calling convention
    #[serde(default)]
    pub foreign_method: bool,

    /// Referenced from foreign (C) code
    #[serde(default)]
    pub has_foreign_references: bool,
}

impl FunctionFacts {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_fact(mut self, fact: Fact) -> Self {
        self.facts.push(fact);
        self
    }

    /// Callable from outside the optimizable graph
    pub fn is_externally_callable(&self) -> bool {
        self.foreign_method || self.has_foreign_references
    }
}

/// A classified reference made by a function body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fact {
    /// Reference to a statically known function
    DirectCall { callee: String },
    /// Call through a protocol requirement
    WitnessCall { requirement: String },
    /// Call through an overridable class method
    #[serde(rename = "vtable_call")]
    VTableCall { method: String },
    /// Reference to a type
    TypeRef { type_name: String },
    /// Key-path style reference bundling several functions and methods
    ReflectionRef { components: Vec<ReflectionComponent> },
}

/// One function or method captured by a reflection-style reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReflectionComponent {
    /// A concrete function (getter, setter, equality or hash helper)
    Function { name: String },
    /// A method resolved through dynamic dispatch
    Method {
        name: String,
        context: DeclContextKind,
    },
}

/// Kind of the declaration that owns a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclContextKind {
    Class,
    Protocol,
    /// Anything else: structs, enums, extensions, free scope
    Other,
}

/// A witness table for one conformance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WitnessTableFacts {
    /// Mangled name of the conformance, for diagnostics
    #[serde(default)]
    pub conformance: String,

    /// The conforming type is declared in another module
    #[serde(default)]
    pub conforming_type_external: bool,

    /// The protocol is declared in another module
    #[serde(default)]
    pub protocol_external: bool,

    /// Method entries only; associated types and base conformances are not
    /// dispatch targets
    #[serde(default)]
    pub entries: Vec<WitnessEntry>,
}

impl WitnessTableFacts {
    /// Whether another module could bind to this table's witnesses
    pub fn is_possibly_used_externally(&self) -> bool {
        self.conforming_type_external || self.protocol_external
    }
}

/// One method entry of a witness table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WitnessEntry {
    /// Mangled name of the protocol requirement
    pub requirement: String,
    /// Mangled name of the witness, absent for unimplemented optional requirements
    #[serde(default)]
    pub witness: Option<String>,
}

/// The vtable of one class
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VTableFacts {
    /// Mangled name of the class, for diagnostics
    #[serde(default)]
    pub class: String,

    #[serde(default)]
    pub entries: Vec<VTableEntry>,
}

/// One vtable entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VTableEntry {
    /// Mangled name of the declared method (the slot)
    pub method: String,

    /// Mangled name of the implementing function
    pub implementation: String,

    #[serde(default)]
    pub method_kind: MethodKind,

    #[serde(default)]
    pub entry_kind: VTableEntryKind,

    /// The method is declared in another module
    #[serde(default)]
    pub method_external: bool,
}

/// What kind of method a vtable entry implements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    #[default]
    Normal,
    /// Invoked by the runtime's release path
    Deallocator,
    /// Destroys instance variables, also invoked by the runtime
    IvarDestroyer,
}

impl MethodKind {
    pub fn is_destructor(self) -> bool {
        matches!(self, MethodKind::Deallocator | MethodKind::IvarDestroyer)
    }
}

/// How a vtable entry relates to the superclass's entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VTableEntryKind {
    /// Introduced by this class
    #[default]
    Normal,
    /// Inherited unchanged from a superclass
    Inherited,
    /// Overrides a superclass implementation
    Override,
}

/// A module-level property
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyFacts {
    /// Mangled name of the property, for diagnostics
    #[serde(default)]
    pub name: String,

    /// Key-path component, if the property can be reached through one
    #[serde(default)]
    pub component: Option<Vec<ReflectionComponent>>,
}
