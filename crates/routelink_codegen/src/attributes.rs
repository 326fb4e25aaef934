//! Attribute resolution.
//!
//! Raw [`AttributeData`] is mapped once per symbol onto the closed
//! [`AttributeKind`] set; the classifier and the orchestrator only ever match
//! on kinds. An attribute class declared in the program model that derives
//! from a recognized class resolves to the same kind as its base.

use std::collections::{HashMap, HashSet};

use routelink_core::{AttributeData, ProgramModel};

use crate::config::AttributeTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeKind {
    Controller,
    NonController,
    NonAction,
    ActionName(Option<String>),
    Area(Option<String>),
    FromBody,
    FromForm,
    FromHeader,
    FromServices,
    FromQuery { name: Option<String> },
    FromRoute { name: Option<String> },
    BindProperty { name: Option<String>, supports_get: bool },
    NonHandler,
    Other,
}

impl AttributeKind {
    /// Values the server binds itself; callers never supply them in a URL.
    pub const fn is_server_bound(&self) -> bool {
        matches!(
            self,
            Self::FromBody | Self::FromForm | Self::FromHeader | Self::FromServices
        )
    }

    /// Explicit binding name override, if the attribute carries one.
    pub fn binding_name(&self) -> Option<&str> {
        match self {
            Self::FromQuery { name } | Self::FromRoute { name } | Self::BindProperty { name, .. } => {
                name.as_deref().filter(|n| !n.is_empty())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Controller,
    NonController,
    NonAction,
    ActionName,
    Area,
    FromBody,
    FromForm,
    FromHeader,
    FromServices,
    FromQuery,
    FromRoute,
    BindProperty,
    NonHandler,
}

pub struct AttributeResolver<'a> {
    model: &'a ProgramModel,
    roles: HashMap<&'a str, Role>,
}

impl<'a> AttributeResolver<'a> {
    pub fn new(model: &'a ProgramModel, table: &'a AttributeTable) -> Self {
        let groups: [(&'a [String], Role); 13] = [
            (&table.controller, Role::Controller),
            (&table.non_controller, Role::NonController),
            (&table.non_action, Role::NonAction),
            (&table.action_name, Role::ActionName),
            (&table.area, Role::Area),
            (&table.from_body, Role::FromBody),
            (&table.from_form, Role::FromForm),
            (&table.from_header, Role::FromHeader),
            (&table.from_services, Role::FromServices),
            (&table.from_query, Role::FromQuery),
            (&table.from_route, Role::FromRoute),
            (&table.bind_property, Role::BindProperty),
            (&table.non_handler, Role::NonHandler),
        ];
        let roles = groups
            .into_iter()
            .flat_map(|(names, role)| names.iter().map(move |name| (name.as_str(), role)))
            .collect();
        Self { model, roles }
    }

    pub const fn model(&self) -> &'a ProgramModel {
        self.model
    }

    /// Role of an attribute class, looking through its base classes when the
    /// class itself is declared in the program model.
    fn role_of(&self, class_name: &str) -> Option<Role> {
        let mut seen = HashSet::new();
        let mut current = Some(class_name);
        while let Some(name) = current {
            if let Some(role) = self.roles.get(name) {
                return Some(*role);
            }
            if !seen.insert(name) {
                break;
            }
            current = self.model.base_type_of(name);
        }
        None
    }

    pub fn resolve(&self, attribute: &AttributeData) -> AttributeKind {
        let Some(role) = self.role_of(&attribute.class_name) else {
            return AttributeKind::Other;
        };
        let name = || attribute.named_string("Name").map(str::to_string);
        match role {
            Role::Controller => AttributeKind::Controller,
            Role::NonController => AttributeKind::NonController,
            Role::NonAction => AttributeKind::NonAction,
            Role::ActionName => {
                AttributeKind::ActionName(attribute.first_string_argument().map(str::to_string))
            }
            Role::Area => AttributeKind::Area(attribute.first_string_argument().map(str::to_string)),
            Role::FromBody => AttributeKind::FromBody,
            Role::FromForm => AttributeKind::FromForm,
            Role::FromHeader => AttributeKind::FromHeader,
            Role::FromServices => AttributeKind::FromServices,
            Role::FromQuery => AttributeKind::FromQuery { name: name() },
            Role::FromRoute => AttributeKind::FromRoute { name: name() },
            Role::BindProperty => AttributeKind::BindProperty {
                name: name(),
                supports_get: attribute.named_bool("SupportsGet").unwrap_or(false),
            },
            Role::NonHandler => AttributeKind::NonHandler,
        }
    }

    pub fn resolve_all(&self, attributes: &[AttributeData]) -> Vec<AttributeKind> {
        attributes.iter().map(|a| self.resolve(a)).collect()
    }

    /// Attributes of a type and of each base type in the model, most derived
    /// first.
    pub fn inherited_type_attributes(&self, full_name: &str) -> Vec<AttributeKind> {
        self.model
            .base_chain(full_name)
            .into_iter()
            .flat_map(|name| self.model.attributes_of(name))
            .map(|a| self.resolve(a))
            .collect()
    }
}
