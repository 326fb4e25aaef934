//! Endpoint classification.
//!
//! Pure predicates over the program model deciding which declared types are
//! endpoint containers (controller-like), which of their methods are endpoint
//! actions, and which page-model methods are page handlers.
//!
//! # Override chains
//!
//! Several rules look "up" a method's override chain: the root-object
//! override exclusion and the exclusion attributes. The chain is walked
//! iteratively. It ends at the first method that is not an override, or at
//! an overridden method declared outside the program model. A method
//! declared `override` that names no overridden method is a broken chain
//! and fails with [`CodegenError::BrokenOverrideChain`](crate::error::CodegenError).
//!
//! # Key Functions
//!
//! - [`Classifier::is_endpoint_container`]
//! - [`Classifier::is_endpoint_action`]
//! - [`Classifier::is_page_handler`]
//! - [`Classifier::area_name`] / [`Classifier::action_name`] / [`Classifier::page_handler_name`]

use std::collections::HashSet;

use routelink_core::{
    Accessibility, MethodDecl, MethodKind, MethodRef, ProgramModel, TypeDecl, TypeKind,
};

use crate::attributes::{AttributeKind, AttributeResolver};
use crate::config::{ControllerConventions, GeneratorConfig, PageConventions};
use crate::error::{CodegenError, CodegenResult, broken_override};
use crate::naming::{strip_suffix_exact, strip_suffix_ignore_case};
use crate::type_name::display_type;

/// The walked override chain of a method.
#[derive(Debug)]
pub struct OverrideChain<'m> {
    /// The method itself followed by every overridden method found in the
    /// model, each with its containing type.
    pub methods: Vec<(&'m str, &'m MethodDecl)>,
    /// Overridden method declared outside the model, where the walk stopped.
    pub external_root: Option<&'m MethodRef>,
}

impl OverrideChain<'_> {
    /// Containing type and name of the least derived method in the chain.
    pub fn root(&self) -> (&str, &str) {
        if let Some(external) = self.external_root {
            return (&external.containing_type, &external.name);
        }
        match self.methods.last() {
            Some(&(type_name, method)) => (type_name, &method.name),
            None => ("", ""),
        }
    }
}

pub struct Classifier<'a> {
    model: &'a ProgramModel,
    attributes: AttributeResolver<'a>,
    controllers: &'a ControllerConventions,
    pages: &'a PageConventions,
}

impl<'a> Classifier<'a> {
    pub fn new(model: &'a ProgramModel, config: &'a GeneratorConfig) -> Self {
        Self {
            model,
            attributes: AttributeResolver::new(model, &config.attributes),
            controllers: &config.controllers,
            pages: &config.pages,
        }
    }

    pub const fn attributes(&self) -> &AttributeResolver<'a> {
        &self.attributes
    }

    /// Concrete, public, non-generic, top-level class that is not excluded
    /// and either carries the container suffix or an inherited inclusion
    /// attribute.
    pub fn is_endpoint_container(&self, decl: &TypeDecl) -> bool {
        let full_name = decl.full_name.as_str();
        let concrete = self
            .model
            .fragments(full_name)
            .all(|f| !f.is_abstract && !f.is_static);
        if decl.kind != TypeKind::Class
            || !concrete
            || decl.accessibility != Accessibility::Public
            || !decl.type_parameters.is_empty()
            || decl.containing_type.is_some()
        {
            return false;
        }
        let inherited = self.attributes.inherited_type_attributes(full_name);
        if inherited.contains(&AttributeKind::NonController) {
            return false;
        }
        has_suffix_ignore_case(decl.name(), &self.controllers.container_suffix)
            || inherited.contains(&AttributeKind::Controller)
    }

    /// Area of a container: the nearest area attribute on the type or its
    /// bases; the root area (empty) when there is none or it has no value.
    pub fn area_name(&self, full_name: &str) -> String {
        self.attributes
            .inherited_type_attributes(full_name)
            .into_iter()
            .find_map(|kind| match kind {
                AttributeKind::Area(value) => Some(value.unwrap_or_default()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Container name with the suffix stripped.
    pub fn container_name<'n>(&self, decl: &'n TypeDecl) -> &'n str {
        strip_suffix_ignore_case(decl.name(), &self.controllers.container_suffix)
    }

    /// Whether `method`, declared on `owner`, is an endpoint action.
    pub fn is_endpoint_action(&self, owner: &str, method: &MethodDecl) -> CodegenResult<bool> {
        if method.kind != MethodKind::Ordinary || method.is_static || !is_callable(method) {
            return Ok(false);
        }
        let chain = self.override_chain(owner, method)?;
        if self.is_root_object_override(method, &chain) || self.is_disposal(owner, method) {
            return Ok(false);
        }
        Ok(!self.chain_has(&chain, &AttributeKind::NonAction))
    }

    /// Action name: an explicit name attribute verbatim, else the method
    /// name without the async suffix.
    pub fn action_name(&self, method: &MethodDecl) -> String {
        self.attributes
            .resolve_all(&method.attributes)
            .into_iter()
            .find_map(|kind| match kind {
                AttributeKind::ActionName(Some(name)) => Some(name),
                _ => None,
            })
            .unwrap_or_else(|| {
                strip_suffix_exact(&method.name, &self.controllers.action_async_suffix).to_string()
            })
    }

    /// Whether `method`, declared on the page model `owner`, is a page handler.
    pub fn is_page_handler(&self, owner: &str, method: &MethodDecl) -> CodegenResult<bool> {
        if self.handler_suffix(&method.name).is_none()
            || method.kind != MethodKind::Ordinary
            || method.is_static
            || !is_callable(method)
        {
            return Ok(false);
        }
        let chain = self.override_chain(owner, method)?;
        if self.is_root_object_override(method, &chain) {
            return Ok(false);
        }
        Ok(!self.chain_has(&chain, &AttributeKind::NonHandler))
    }

    /// Handler name distinguishing several handlers on one page: the part of
    /// the method name after the verb prefix, async suffix removed. `None`
    /// for the page's default handler.
    pub fn page_handler_name(&self, method: &MethodDecl) -> Option<String> {
        let rest = self.handler_suffix(&method.name)?;
        let rest = rest
            .strip_suffix(self.pages.handler_async_suffix.as_str())
            .unwrap_or(rest);
        (!rest.is_empty()).then(|| rest.to_string())
    }

    /// Remainder of a handler method name after `{prefix}{verb}`.
    fn handler_suffix<'n>(&self, name: &'n str) -> Option<&'n str> {
        self.pages.handler_verbs.iter().find_map(|verb| {
            let prefix_len = self.pages.handler_prefix.len();
            let marker_len = prefix_len + verb.len();
            let prefix = name.get(..prefix_len)?;
            let verb_part = name.get(prefix_len..marker_len)?;
            if !prefix.eq_ignore_ascii_case(&self.pages.handler_prefix)
                || !verb_part.eq_ignore_ascii_case(verb)
            {
                return None;
            }
            name.get(marker_len..)
        })
    }

    fn is_root_object_override(&self, method: &MethodDecl, chain: &OverrideChain<'_>) -> bool {
        if !method.is_override {
            return false;
        }
        let (root_type, root_name) = chain.root();
        root_type == self.controllers.root_object_type
            && self
                .controllers
                .root_object_overrides
                .iter()
                .any(|name| name == root_name)
    }

    /// Explicit or implicit implementation of the disposal contract.
    fn is_disposal(&self, owner: &str, method: &MethodDecl) -> bool {
        let conventions = self.controllers;
        let explicit = method.explicit_implementations.iter().any(|r| {
            r.containing_type == conventions.disposal_interface
                && r.name == conventions.disposal_method
        });
        if explicit {
            return true;
        }
        method.name == conventions.disposal_method
            && method.parameters.is_empty()
            && self
                .model
                .base_chain(owner)
                .into_iter()
                .any(|name| {
                    self.model
                        .interfaces_of(name)
                        .any(|i| i == conventions.disposal_interface)
                })
    }

    fn chain_has(&self, chain: &OverrideChain<'_>, kind: &AttributeKind) -> bool {
        chain.methods.iter().any(|(_, method)| {
            method
                .attributes
                .iter()
                .any(|a| self.attributes.resolve(a) == *kind)
        })
    }

    /// Resolve a method reference against the model by name and parameter
    /// display types.
    fn find_method(&self, reference: &MethodRef) -> Option<(&'a str, &'a MethodDecl)> {
        let decl = self.model.resolve(&reference.containing_type)?;
        self.model
            .methods_of(&reference.containing_type)
            .find(|m| {
                m.name == reference.name
                    && m.parameters.len() == reference.parameter_types.len()
                    && m.parameters
                        .iter()
                        .zip(&reference.parameter_types)
                        .all(|(p, t)| display_type(&p.type_ref) == *t)
            })
            .map(|m| (decl.full_name.as_str(), m))
    }

    /// Walk the override chain of `method` declared on `owner`.
    pub fn override_chain<'m>(
        &self,
        owner: &'m str,
        method: &'m MethodDecl,
    ) -> CodegenResult<OverrideChain<'m>>
    where
        'a: 'm,
    {
        let mut methods = vec![(owner, method)];
        let mut seen = HashSet::from([std::ptr::from_ref(method)]);
        let (mut type_name, mut current) = (owner, method);
        while current.is_override {
            let Some(reference) = current.overridden_method.as_ref() else {
                return Err(broken_override(type_name, &current.name));
            };
            let Some((next_type, next)) = self.find_method(reference) else {
                return Ok(OverrideChain {
                    methods,
                    external_root: Some(reference),
                });
            };
            if !seen.insert(std::ptr::from_ref(next)) {
                return Err(CodegenError::CyclicOverrideChain {
                    type_name: owner.to_string(),
                    method: method.name.clone(),
                });
            }
            methods.push((next_type, next));
            (type_name, current) = (next_type, next);
        }
        Ok(OverrideChain {
            methods,
            external_root: None,
        })
    }
}

fn is_callable(method: &MethodDecl) -> bool {
    !method.is_abstract
        && method.type_parameters.is_empty()
        && method.accessibility == Accessibility::Public
}

fn has_suffix_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name
            .get(name.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

#[cfg(test)]
mod tests {
    use routelink_core::{AttributeData, ConstantValue};

    use super::*;
    use crate::test_helpers::{action, attribute, controller, param, string_attribute};

    const HOME: &str = "App.HomeController";

    fn object_override(name: &str) -> MethodRef {
        MethodRef::new("System.Object", name)
    }

    fn check_action(model: &ProgramModel, owner: &str, method: &str) -> CodegenResult<bool> {
        let config = GeneratorConfig::default();
        let classifier = Classifier::new(model, &config);
        let decl = model
            .methods_of(owner)
            .find(|m| m.name == method)
            .expect("method not in model");
        classifier.is_endpoint_action(owner, decl)
    }

    fn check_container(model: &ProgramModel, full_name: &str) -> bool {
        let config = GeneratorConfig::default();
        let classifier = Classifier::new(model, &config);
        classifier.is_endpoint_container(model.resolve(full_name).unwrap())
    }

    #[test]
    fn test_container_by_suffix() {
        let model = crate::program_model![controller(HOME), TypeDecl::class("App.Homecontroller")];
        assert!(check_container(&model, HOME));
        assert!(check_container(&model, "App.Homecontroller"));
    }

    #[test]
    fn test_container_structural_rules() {
        let mut abstract_decl = controller("App.AbstractController");
        abstract_decl.is_abstract = true;
        let mut generic = controller("App.GenericController");
        generic.type_parameters.push("T".into());
        let mut internal = controller("App.InternalController");
        internal.accessibility = Accessibility::Internal;
        let mut nested = controller("App.Outer+NestedController");
        nested.containing_type = Some("App.Outer".into());
        let mut record = controller("App.RecordController");
        record.kind = TypeKind::Struct;

        let model = crate::program_model![abstract_decl, generic, internal, nested, record];
        for decl in model.types() {
            assert!(!check_container(&model, &decl.full_name), "{}", decl.full_name);
        }
    }

    #[test]
    fn test_container_abstract_on_any_fragment() {
        let mut fragment = controller(HOME);
        fragment.is_abstract = true;
        let model = crate::program_model![controller(HOME), fragment];
        assert!(!check_container(&model, HOME));
    }

    #[test]
    fn test_container_by_inherited_inclusion_attribute() {
        let model = crate::program_model![
            TypeDecl::class("Microsoft.AspNetCore.Mvc.ControllerBase")
                .with_attribute(attribute("Controller")),
            TypeDecl::class("App.Widgets").with_base("Microsoft.AspNetCore.Mvc.ControllerBase"),
            TypeDecl::class("App.Plain"),
        ];
        assert!(check_container(&model, "App.Widgets"));
        assert!(!check_container(&model, "App.Plain"));
    }

    #[test]
    fn test_container_exclusion_attribute() {
        let model = crate::program_model![
            controller("App.HiddenController").with_attribute(attribute("NonController")),
            TypeDecl::class("App.ExcludedBase").with_attribute(attribute("NonController")),
            TypeDecl::class("App.ChildController").with_base("App.ExcludedBase"),
        ];
        assert!(!check_container(&model, "App.HiddenController"));
        assert!(!check_container(&model, "App.ChildController"));
    }

    #[test]
    fn test_area_name_inherited_and_default() {
        let model = crate::program_model![
            TypeDecl::class("App.AdminBase").with_attribute(string_attribute("Area", "Admin")),
            controller("App.UsersController").with_base("App.AdminBase"),
            controller(HOME),
            controller("App.BrokenController").with_attribute(attribute("Area")),
        ];
        let config = GeneratorConfig::default();
        let classifier = Classifier::new(&model, &config);
        assert_eq!(classifier.area_name("App.UsersController"), "Admin");
        assert_eq!(classifier.area_name(HOME), "");
        assert_eq!(classifier.area_name("App.BrokenController"), "");
    }

    #[test]
    fn test_plain_public_method_is_action() {
        let model = crate::program_model![controller(HOME).with_method(action("Index"))];
        assert!(check_action(&model, HOME, "Index").unwrap());
    }

    #[test]
    fn test_non_action_attribute_excludes() {
        let model = crate::program_model![controller(HOME)
            .with_method(action("Helper").with_attribute(attribute("NonAction")))];
        assert!(!check_action(&model, HOME, "Helper").unwrap());
    }

    #[test]
    fn test_non_action_inherited_through_override_chain() {
        let model = crate::program_model![
            TypeDecl::class("App.BaseController")
                .with_method(action("Helper").with_attribute(attribute("NonAction"))),
            controller(HOME).with_base("App.BaseController").with_method(
                action("Helper").overriding(MethodRef::new("App.BaseController", "Helper"))
            ),
        ];
        assert!(!check_action(&model, HOME, "Helper").unwrap());
    }

    #[test]
    fn test_structural_method_rules() {
        let mut ctor = action(".ctor");
        ctor.kind = MethodKind::Constructor;
        let mut op = action("op_Equality");
        op.kind = MethodKind::Operator;
        let mut stat = action("Static");
        stat.is_static = true;
        let mut abs = action("Abstract");
        abs.is_abstract = true;
        let mut generic = action("Generic");
        generic.type_parameters.push("T".into());
        let mut private = action("Private");
        private.accessibility = Accessibility::Private;

        let model = crate::program_model![controller(HOME)
            .with_method(ctor)
            .with_method(op)
            .with_method(stat)
            .with_method(abs)
            .with_method(generic)
            .with_method(private)];
        for name in [".ctor", "op_Equality", "Static", "Abstract", "Generic", "Private"] {
            assert!(!check_action(&model, HOME, name).unwrap(), "{name}");
        }
    }

    #[test]
    fn test_root_object_overrides_excluded_but_new_allowed() {
        let mut hidden = action("GetHashCode");
        hidden.is_new = true;
        let model = crate::program_model![controller(HOME)
            .with_method(action("ToString").overriding(object_override("ToString")))
            .with_method(
                action("Equals")
                    .with_parameter(param("obj", "Object"))
                    .overriding(object_override("Equals"))
            )
            .with_method(hidden)];
        assert!(!check_action(&model, HOME, "ToString").unwrap());
        assert!(!check_action(&model, HOME, "Equals").unwrap());
        assert!(check_action(&model, HOME, "GetHashCode").unwrap());
    }

    #[test]
    fn test_root_object_override_through_model_chain() {
        let model = crate::program_model![
            TypeDecl::class("App.BaseController")
                .with_method(action("ToString").overriding(object_override("ToString"))),
            controller(HOME).with_base("App.BaseController").with_method(
                action("ToString").overriding(MethodRef::new("App.BaseController", "ToString"))
            ),
        ];
        assert!(!check_action(&model, HOME, "ToString").unwrap());
    }

    #[test]
    fn test_override_of_external_non_root_method_is_action() {
        let model = crate::program_model![controller(HOME).with_method(
            action("Index").overriding(MethodRef::new("App.External", "Index"))
        )];
        assert!(check_action(&model, HOME, "Index").unwrap());
    }

    #[test]
    fn test_broken_override_chain_fails_fast() {
        let mut broken = action("Index");
        broken.is_override = true;
        let model = crate::program_model![controller(HOME).with_method(broken)];
        let err = check_action(&model, HOME, "Index").unwrap_err();
        assert!(matches!(err, CodegenError::BrokenOverrideChain { .. }));
    }

    #[test]
    fn test_cyclic_override_chain_is_an_error() {
        let model = crate::program_model![
            TypeDecl::class("App.Base")
                .with_method(action("Index").overriding(MethodRef::new(HOME, "Index"))),
            controller(HOME)
                .with_method(action("Index").overriding(MethodRef::new("App.Base", "Index"))),
        ];
        let err = check_action(&model, HOME, "Index").unwrap_err();
        assert!(matches!(
            err,
            CodegenError::CyclicOverrideChain { ref type_name, ref method }
                if type_name == HOME && method == "Index"
        ));
    }

    #[test]
    fn test_disposal_explicit_and_implicit() {
        let mut explicit = action("System.IDisposable.Dispose");
        explicit
            .explicit_implementations
            .push(MethodRef::new("System.IDisposable", "Dispose"));
        let model = crate::program_model![
            controller(HOME)
                .with_interface("System.IDisposable")
                .with_method(action("Dispose"))
                .with_method(action("Dispose").with_parameter(param("now", "Boolean"))),
            controller("App.OtherController")
                .with_method(explicit)
                .with_method(action("Dispose")),
        ];
        assert!(!check_action(&model, HOME, "Dispose").unwrap());
        // overload with a parameter is not the contract method
        let config = GeneratorConfig::default();
        let classifier = Classifier::new(&model, &config);
        let overload = model
            .methods_of(HOME)
            .find(|m| m.name == "Dispose" && !m.parameters.is_empty())
            .unwrap();
        assert!(classifier.is_endpoint_action(HOME, overload).unwrap());
        // explicit implementation; the plain Dispose here implements nothing
        let other: Vec<_> = model.methods_of("App.OtherController").collect();
        assert!(!classifier.is_endpoint_action("App.OtherController", other[0]).unwrap());
        assert!(classifier.is_endpoint_action("App.OtherController", other[1]).unwrap());
    }

    #[test]
    fn test_action_name() {
        let model = crate::program_model![];
        let config = GeneratorConfig::default();
        let classifier = Classifier::new(&model, &config);
        assert_eq!(classifier.action_name(&action("IndexAsync")), "Index");
        assert_eq!(classifier.action_name(&action("Index")), "Index");
        let renamed = action("IndexAsync").with_attribute(
            attribute("ActionName").with_argument(ConstantValue::String("Start_Async".into())),
        );
        assert_eq!(classifier.action_name(&renamed), "Start_Async");
    }

    #[test]
    fn test_page_handlers() {
        let model = crate::program_model![];
        let config = GeneratorConfig::default();
        let classifier = Classifier::new(&model, &config);
        let owner = "App.Pages.IndexModel";

        for name in ["OnGet", "OnGetAsync", "onpost", "OnPostDeleteAsync", "OnPut"] {
            assert!(classifier.is_page_handler(owner, &action(name)).unwrap(), "{name}");
        }
        for name in ["Get", "OnFetch", "Load", "On", "Bücher", "Aé", "OnGé", "Oñget"] {
            assert!(!classifier.is_page_handler(owner, &action(name)).unwrap(), "{name}");
        }
        let excluded = action("OnGetHelper").with_attribute(AttributeData::new(
            "Microsoft.AspNetCore.Mvc.RazorPages.NonHandlerAttribute",
        ));
        assert!(!classifier.is_page_handler(owner, &excluded).unwrap());

        assert_eq!(classifier.page_handler_name(&action("OnGet")), None);
        assert_eq!(classifier.page_handler_name(&action("OnGetAsync")), None);
        assert_eq!(
            classifier.page_handler_name(&action("OnPostDeleteAsync")),
            Some("Delete".to_string())
        );
        assert_eq!(
            classifier.page_handler_name(&action("OnPostExport")),
            Some("Export".to_string())
        );
        assert_eq!(
            classifier.page_handler_name(&action("OnPostÜbersicht")),
            Some("Übersicht".to_string())
        );
    }
}
