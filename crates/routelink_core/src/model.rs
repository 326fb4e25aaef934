//! Program model: the read-only symbol graph that discovery walks.
//!
//! The host compiler materializes its declarations into these plain serde
//! structures (JSON, `camelCase`). Nothing here knows about routing; the
//! types only describe declarations, their attributes, and the override /
//! implementation relationships between methods.
//!
//! # Fragments
//!
//! One logical type may be declared in several places (partial
//! declarations). Each place is a separate [`TypeDecl`] sharing the same
//! `full_name`. [`ProgramModel`] indexes fragments once at construction and
//! the member accessors concatenate over them in declaration order.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Declared accessibility of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Accessibility {
    #[default]
    Public,
    Internal,
    Protected,
    ProtectedInternal,
    PrivateProtected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
    Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MethodKind {
    #[default]
    Ordinary,
    Constructor,
    Operator,
    Conversion,
    Accessor,
    Destructor,
}

/// Reference to a type as it appears in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeRef {
    /// A named type, possibly generic. `name` is fully qualified.
    #[serde(rename_all = "camelCase")]
    Named {
        name: String,
        #[serde(default)]
        arguments: Vec<TypeRef>,
        /// Nullable reference annotation (`string?`).
        #[serde(default)]
        nullable: bool,
    },
    #[serde(rename_all = "camelCase")]
    Array {
        element: Box<TypeRef>,
        #[serde(default = "default_rank")]
        rank: u32,
    },
    TypeParameter { name: String },
}

const fn default_rank() -> u32 {
    1
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            arguments: Vec::new(),
            nullable: false,
        }
    }

    pub fn generic(name: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self::Named {
            name: name.into(),
            arguments,
            nullable: false,
        }
    }

    pub fn array(element: Self) -> Self {
        Self::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    /// Mark a named type with a nullable reference annotation.
    /// Arrays and type parameters are returned unchanged.
    #[must_use]
    pub fn nullable(self) -> Self {
        match self {
            Self::Named {
                name, arguments, ..
            } => Self::Named {
                name,
                arguments,
                nullable: true,
            },
            other => other,
        }
    }
}

/// A compile-time constant: default values and attribute arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f32),
    Double(f64),
    /// Decimal values keep their source text to avoid precision loss.
    Decimal(String),
    Char(char),
    String(String),
    #[serde(rename_all = "camelCase")]
    Enum {
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default)]
        member: Option<String>,
        value: i64,
    },
}

impl ConstantValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Attribute application on a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeData {
    /// Fully qualified attribute class name.
    pub class_name: String,
    #[serde(default)]
    pub arguments: Vec<ConstantValue>,
    #[serde(default)]
    pub named_arguments: BTreeMap<String, ConstantValue>,
}

impl AttributeData {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            arguments: Vec::new(),
            named_arguments: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, value: ConstantValue) -> Self {
        self.arguments.push(value);
        self
    }

    #[must_use]
    pub fn with_named(mut self, name: impl Into<String>, value: ConstantValue) -> Self {
        self.named_arguments.insert(name.into(), value);
        self
    }

    /// First constructor argument, when it is a string.
    pub fn first_string_argument(&self) -> Option<&str> {
        self.arguments.first().and_then(ConstantValue::as_str)
    }

    pub fn named_string(&self, name: &str) -> Option<&str> {
        self.named_arguments.get(name).and_then(ConstantValue::as_str)
    }

    pub fn named_bool(&self, name: &str) -> Option<bool> {
        self.named_arguments.get(name).and_then(ConstantValue::as_bool)
    }
}

/// Identifies a method declared on some (possibly external) type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRef {
    pub containing_type: String,
    pub name: String,
    /// Display names of the parameter types, in order.
    #[serde(default)]
    pub parameter_types: Vec<String>,
}

impl MethodRef {
    pub fn new(containing_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            containing_type: containing_type.into(),
            name: name.into(),
            parameter_types: Vec::new(),
        }
    }
}

/// Leading documentation trivia of a method, in its two textual shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocComment {
    /// `///` line block, raw.
    #[serde(default)]
    pub single_line: Option<String>,
    /// `/** ... */` block, raw.
    #[serde(default)]
    pub structured: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub has_default_value: bool,
    #[serde(default)]
    pub default_value: Option<ConstantValue>,
    #[serde(default)]
    pub attributes: Vec<AttributeData>,
}

impl ParameterDecl {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            has_default_value: false,
            default_value: None,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: ConstantValue) -> Self {
        self.has_default_value = true;
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeData) -> Self {
        self.attributes.push(attribute);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeData>,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            accessibility: Accessibility::Public,
            is_static: false,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeData) -> Self {
        self.attributes.push(attribute);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub kind: MethodKind,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_override: bool,
    /// Declared with `new`: hides an inherited member instead of overriding it.
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    #[serde(default)]
    pub attributes: Vec<AttributeData>,
    #[serde(default)]
    pub overridden_method: Option<MethodRef>,
    #[serde(default)]
    pub explicit_implementations: Vec<MethodRef>,
    #[serde(default)]
    pub doc_comment: Option<DocComment>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MethodKind::Ordinary,
            accessibility: Accessibility::Public,
            is_static: false,
            is_abstract: false,
            is_override: false,
            is_new: false,
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            attributes: Vec::new(),
            overridden_method: None,
            explicit_implementations: Vec::new(),
            doc_comment: None,
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeData) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Mark as `override` of `overridden`.
    #[must_use]
    pub fn overriding(mut self, overridden: MethodRef) -> Self {
        self.is_override = true;
        self.overridden_method = Some(overridden);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDecl {
    pub full_name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Set for nested types.
    #[serde(default)]
    pub containing_type: Option<String>,
    #[serde(default)]
    pub base_type: Option<String>,
    /// All implemented interfaces, inherited ones included.
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeData>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
}

impl TypeDecl {
    pub fn class(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            kind: TypeKind::Class,
            accessibility: Accessibility::Public,
            is_abstract: false,
            is_static: false,
            type_parameters: Vec::new(),
            containing_type: None,
            base_type: None,
            interfaces: Vec::new(),
            attributes: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Simple name: the last `.`/`+` separated segment of the full name.
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit(['.', '+'])
            .next()
            .unwrap_or(&self.full_name)
    }

    #[must_use]
    pub fn with_base(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeData) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }
}

#[derive(Serialize, Deserialize)]
struct ProgramModelData {
    #[serde(default)]
    types: Vec<TypeDecl>,
}

/// The declared type set with a full-name index over fragments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "ProgramModelData", into = "ProgramModelData")]
pub struct ProgramModel {
    types: Vec<TypeDecl>,
    index: HashMap<String, Vec<usize>>,
}

impl From<ProgramModelData> for ProgramModel {
    fn from(data: ProgramModelData) -> Self {
        Self::new(data.types)
    }
}

impl From<ProgramModel> for ProgramModelData {
    fn from(model: ProgramModel) -> Self {
        Self { types: model.types }
    }
}

impl ProgramModel {
    pub fn new(types: Vec<TypeDecl>) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, decl) in types.iter().enumerate() {
            index
                .entry(decl.full_name.clone())
                .or_default()
                .push(position);
        }
        Self { types, index }
    }

    /// Every declaration, fragments included, in declaration order.
    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.index.contains_key(full_name)
    }

    pub fn fragments<'a>(&'a self, full_name: &str) -> impl Iterator<Item = &'a TypeDecl> + use<'a> {
        self.index
            .get(full_name)
            .into_iter()
            .flatten()
            .map(|&position| &self.types[position])
    }

    /// First declared fragment of a type.
    pub fn resolve(&self, full_name: &str) -> Option<&TypeDecl> {
        self.fragments(full_name).next()
    }

    /// Resolve a type reference written in source: an exact full name, else
    /// the single logical type whose simple name matches. Ambiguous simple
    /// names resolve to nothing.
    pub fn resolve_by_name(&self, name: &str) -> Option<&TypeDecl> {
        if let Some(decl) = self.resolve(name) {
            return Some(decl);
        }
        let mut candidates = self
            .types
            .iter()
            .filter(|decl| decl.name() == name)
            .map(|decl| decl.full_name.as_str())
            .collect::<Vec<_>>();
        candidates.sort_unstable();
        candidates.dedup();
        match candidates.as_slice() {
            [single] => self.resolve(single),
            _ => None,
        }
    }

    pub fn methods_of<'a>(&'a self, full_name: &str) -> impl Iterator<Item = &'a MethodDecl> + use<'a> {
        self.fragments(full_name).flat_map(|decl| decl.methods.iter())
    }

    pub fn properties_of<'a>(
        &'a self,
        full_name: &str,
    ) -> impl Iterator<Item = &'a PropertyDecl> + use<'a> {
        self.fragments(full_name)
            .flat_map(|decl| decl.properties.iter())
    }

    pub fn attributes_of<'a>(
        &'a self,
        full_name: &str,
    ) -> impl Iterator<Item = &'a AttributeData> + use<'a> {
        self.fragments(full_name)
            .flat_map(|decl| decl.attributes.iter())
    }

    pub fn interfaces_of<'a>(&'a self, full_name: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.fragments(full_name)
            .flat_map(|decl| decl.interfaces.iter().map(String::as_str))
    }

    /// Base type named by any fragment.
    pub fn base_type_of(&self, full_name: &str) -> Option<&str> {
        self.fragments(full_name)
            .find_map(|decl| decl.base_type.as_deref())
    }

    /// The type itself followed by each resolvable base type, most derived
    /// first. Stops at the first base outside the model or at a repeat.
    pub fn base_chain<'a>(&'a self, full_name: &'a str) -> Vec<&'a str> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(full_name);
        while let Some(name) = current {
            if !self.contains(name) || !seen.insert(name) {
                break;
            }
            chain.push(name);
            current = self.base_type_of(name);
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> ProgramModel {
        ProgramModel::new(vec![
            TypeDecl::class("App.Base").with_method(MethodDecl::new("Shared")),
            TypeDecl::class("App.HomeController")
                .with_base("App.Base")
                .with_method(MethodDecl::new("Index")),
            TypeDecl::class("App.HomeController").with_method(MethodDecl::new("About")),
            TypeDecl::class("Other.HomeController"),
        ])
    }

    #[test]
    fn test_fragments_concatenate_members_in_order() {
        let model = sample_model();
        let names: Vec<_> = model
            .methods_of("App.HomeController")
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Index", "About"]);
        assert_eq!(model.fragments("App.HomeController").count(), 2);
    }

    #[test]
    fn test_base_chain_stops_outside_model() {
        let model = ProgramModel::new(vec![
            TypeDecl::class("App.A").with_base("App.B"),
            TypeDecl::class("App.B").with_base("Framework.Controller"),
        ]);
        assert_eq!(model.base_chain("App.A"), vec!["App.A", "App.B"]);
    }

    #[test]
    fn test_base_chain_is_cycle_safe() {
        let model = ProgramModel::new(vec![
            TypeDecl::class("App.A").with_base("App.B"),
            TypeDecl::class("App.B").with_base("App.A"),
        ]);
        assert_eq!(model.base_chain("App.A"), vec!["App.A", "App.B"]);
    }

    #[test]
    fn test_resolve_by_name() {
        let model = sample_model();
        assert_eq!(
            model.resolve_by_name("Base").map(|t| t.full_name.as_str()),
            Some("App.Base")
        );
        // two logical types share the simple name
        assert!(model.resolve_by_name("HomeController").is_none());
        assert!(model.resolve_by_name("App.HomeController").is_some());
        assert!(model.resolve_by_name("Missing").is_none());
    }

    #[test]
    fn test_type_name_segments() {
        assert_eq!(TypeDecl::class("App.Outer+Inner").name(), "Inner");
        assert_eq!(TypeDecl::class("Global").name(), "Global");
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = serde_json::json!({
            "types": [{
                "fullName": "App.HomeController",
                "baseType": "Microsoft.AspNetCore.Mvc.Controller",
                "attributes": [{
                    "className": "Microsoft.AspNetCore.Mvc.AreaAttribute",
                    "arguments": [{ "kind": "string", "value": "Admin" }]
                }],
                "methods": [{
                    "name": "Index",
                    "parameters": [{
                        "name": "page",
                        "type": {
                            "kind": "named",
                            "name": "System.Nullable",
                            "arguments": [{ "kind": "named", "name": "System.Int32" }]
                        },
                        "hasDefaultValue": true,
                        "defaultValue": { "kind": "null" }
                    }]
                }]
            }]
        });
        let model: ProgramModel = serde_json::from_value(json).unwrap();
        let home = model.resolve("App.HomeController").unwrap();
        assert_eq!(home.attributes[0].first_string_argument(), Some("Admin"));
        let parameter = &home.methods[0].parameters[0];
        assert_eq!(parameter.default_value, Some(ConstantValue::Null));
        assert_eq!(
            parameter.type_ref,
            TypeRef::generic("System.Nullable", vec![TypeRef::named("System.Int32")])
        );
        assert_eq!(home.accessibility, Accessibility::Public);
    }
}
