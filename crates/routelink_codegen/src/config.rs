//! Convention tables.
//!
//! Every rule the classifier, the route-template parser and the emitter
//! apply is data held here: suffixes, verb prefixes, attribute identities,
//! constraint names, emitted type names. Each table has a `Default` with the
//! well-known framework values and deserializes from JSON with every field
//! optional, so a configuration file only lists what it overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CodegenResult;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// Everything one generation run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub attributes: AttributeTable,
    pub controllers: ControllerConventions,
    pub pages: PageConventions,
    pub route_constraints: RouteConstraintTable,
    pub emitter: EmitterOptions,
    /// Quoted in failure diagnostics.
    pub issue_url: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            attributes: AttributeTable::default(),
            controllers: ControllerConventions::default(),
            pages: PageConventions::default(),
            route_constraints: RouteConstraintTable::default(),
            emitter: EmitterOptions::default(),
            issue_url: "https://github.com/routelink/routelink/issues".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(text: &str) -> CodegenResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Fully qualified attribute class names for each recognized attribute kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttributeTable {
    pub controller: Vec<String>,
    pub non_controller: Vec<String>,
    pub non_action: Vec<String>,
    pub action_name: Vec<String>,
    pub area: Vec<String>,
    pub from_body: Vec<String>,
    pub from_form: Vec<String>,
    pub from_header: Vec<String>,
    pub from_services: Vec<String>,
    pub from_query: Vec<String>,
    pub from_route: Vec<String>,
    pub bind_property: Vec<String>,
    pub non_handler: Vec<String>,
}

impl Default for AttributeTable {
    fn default() -> Self {
        Self {
            controller: strings(&["Microsoft.AspNetCore.Mvc.ControllerAttribute"]),
            non_controller: strings(&["Microsoft.AspNetCore.Mvc.NonControllerAttribute"]),
            non_action: strings(&["Microsoft.AspNetCore.Mvc.NonActionAttribute"]),
            action_name: strings(&["Microsoft.AspNetCore.Mvc.ActionNameAttribute"]),
            area: strings(&["Microsoft.AspNetCore.Mvc.AreaAttribute"]),
            from_body: strings(&["Microsoft.AspNetCore.Mvc.FromBodyAttribute"]),
            from_form: strings(&["Microsoft.AspNetCore.Mvc.FromFormAttribute"]),
            from_header: strings(&["Microsoft.AspNetCore.Mvc.FromHeaderAttribute"]),
            from_services: strings(&["Microsoft.AspNetCore.Mvc.FromServicesAttribute"]),
            from_query: strings(&["Microsoft.AspNetCore.Mvc.FromQueryAttribute"]),
            from_route: strings(&["Microsoft.AspNetCore.Mvc.FromRouteAttribute"]),
            bind_property: strings(&["Microsoft.AspNetCore.Mvc.BindPropertyAttribute"]),
            non_handler: strings(&["Microsoft.AspNetCore.Mvc.RazorPages.NonHandlerAttribute"]),
        }
    }
}

/// Rules for the endpoint (controller/action) family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControllerConventions {
    /// Stripped from container names, matched case-insensitively.
    pub container_suffix: String,
    /// Stripped from action names.
    pub action_async_suffix: String,
    pub root_object_type: String,
    /// Root-object methods that are never actions when overridden.
    pub root_object_overrides: Vec<String>,
    /// Single-method disposal contract.
    pub disposal_interface: String,
    pub disposal_method: String,
    /// Parameters of these types are server-bound uploads.
    pub file_upload_types: Vec<String>,
}

impl Default for ControllerConventions {
    fn default() -> Self {
        Self {
            container_suffix: "Controller".to_string(),
            action_async_suffix: "Async".to_string(),
            root_object_type: "System.Object".to_string(),
            root_object_overrides: strings(&["Equals", "GetHashCode", "ToString"]),
            disposal_interface: "System.IDisposable".to_string(),
            disposal_method: "Dispose".to_string(),
            file_upload_types: strings(&[
                "Microsoft.AspNetCore.Http.IFormFile",
                "Microsoft.AspNetCore.Http.IFormFileCollection",
            ]),
        }
    }
}

/// Rules for the page family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConventions {
    /// Leading line marker of a page template; its optional quoted argument
    /// is the route template.
    pub page_marker: String,
    /// Leading line marker naming the bound model type.
    pub model_marker: String,
    pub template_extension: String,
    pub pages_root: String,
    pub areas_root: String,
    /// When set, template paths are made relative to this directory before
    /// the pages/areas segments are located.
    pub project_root: Option<String>,
    pub handler_prefix: String,
    pub handler_verbs: Vec<String>,
    pub handler_async_suffix: String,
}

impl Default for PageConventions {
    fn default() -> Self {
        Self {
            page_marker: "@page".to_string(),
            model_marker: "@model".to_string(),
            template_extension: ".cshtml".to_string(),
            pages_root: "Pages".to_string(),
            areas_root: "Areas".to_string(),
            project_root: None,
            handler_prefix: "On".to_string(),
            handler_verbs: strings(&["Delete", "Get", "Head", "Options", "Patch", "Post", "Put"]),
            handler_async_suffix: "Async".to_string(),
        }
    }
}

/// Route constraint names and the types they imply. Names are matched
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteConstraintTable {
    /// Bare constraints that force `string`.
    pub string_constraints: Vec<String>,
    /// Constraint functions that force `string`.
    pub string_functions: Vec<String>,
    /// Constraint functions that suggest `numeric_range_type` without
    /// settling it.
    pub numeric_range_functions: Vec<String>,
    pub numeric_range_type: String,
    /// Constraints naming a type outright.
    pub type_constraints: BTreeMap<String, String>,
    /// Type of a parameter without a deciding constraint.
    pub default_type: String,
}

impl Default for RouteConstraintTable {
    fn default() -> Self {
        let type_constraints = [
            ("int", "int"),
            ("long", "long"),
            ("float", "float"),
            ("double", "double"),
            ("decimal", "decimal"),
            ("bool", "bool"),
            ("guid", "System.Guid"),
            ("datetime", "System.DateTime"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            string_constraints: strings(&["alpha"]),
            string_functions: strings(&["length", "minlength", "maxlength", "regex"]),
            numeric_range_functions: strings(&["range", "min", "max"]),
            numeric_range_type: "int".to_string(),
            type_constraints,
            default_type: "string".to_string(),
        }
    }
}

/// Names used in the emitted source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmitterOptions {
    pub namespace: String,
    pub usings: Vec<String>,
    pub url_helper_type: String,
    pub route_values_type: String,
    /// URL-resolution collaborator call for endpoints.
    pub action_method: String,
    /// Page-resolution collaborator call for pages.
    pub page_method: String,
    pub area_key: String,
    pub controller_extensions_class: String,
    pub page_extensions_class: String,
    pub root_controllers_accessor: String,
    pub root_pages_accessor: String,
    pub controllers_file_name: String,
    pub pages_file_name: String,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            namespace: "RouteLinks".to_string(),
            usings: strings(&["Microsoft.AspNetCore.Mvc", "Microsoft.AspNetCore.Routing"]),
            url_helper_type: "IUrlHelper".to_string(),
            route_values_type: "RouteValueDictionary".to_string(),
            action_method: "Action".to_string(),
            page_method: "Page".to_string(),
            area_key: "area".to_string(),
            controller_extensions_class: "ControllerUrlExtensions".to_string(),
            page_extensions_class: "PageUrlExtensions".to_string(),
            root_controllers_accessor: "Controllers".to_string(),
            root_pages_accessor: "Pages".to_string(),
            controllers_file_name: "RouteLinks.Controllers.g.cs".to_string(),
            pages_file_name: "RouteLinks.Pages.g.cs".to_string(),
        }
    }
}
