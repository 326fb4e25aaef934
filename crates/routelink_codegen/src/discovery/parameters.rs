//! Parameter assembly for endpoints and pages.

use routelink_core::{MethodDecl, ParameterDescriptor, PropertyDecl};

use crate::attributes::{AttributeKind, AttributeResolver};
use crate::config::ControllerConventions;
use crate::doc_comment::parameter_descriptions;
use crate::naming::camel_case;
use crate::type_name::{display_type, mentions_any};

pub struct ParameterAssembler<'a> {
    attributes: &'a AttributeResolver<'a>,
    conventions: &'a ControllerConventions,
}

impl<'a> ParameterAssembler<'a> {
    pub const fn new(
        attributes: &'a AttributeResolver<'a>,
        conventions: &'a ControllerConventions,
    ) -> Self {
        Self {
            attributes,
            conventions,
        }
    }

    /// Caller-supplied parameters of a method, in declaration order.
    ///
    /// Upload-typed parameters and parameters bound by the server (body,
    /// form, header, services) are left out.
    pub fn method_parameters(&self, method: &MethodDecl) -> Vec<ParameterDescriptor> {
        let descriptions = method
            .doc_comment
            .as_ref()
            .map(parameter_descriptions)
            .unwrap_or_default();
        method
            .parameters
            .iter()
            .filter(|p| !mentions_any(&p.type_ref, &self.conventions.file_upload_types))
            .filter_map(|p| {
                let kinds = self.attributes.resolve_all(&p.attributes);
                if kinds.iter().any(AttributeKind::is_server_bound) {
                    return None;
                }
                let name = kinds
                    .iter()
                    .find_map(AttributeKind::binding_name)
                    .unwrap_or(&p.name);
                let mut descriptor =
                    ParameterDescriptor::new(camel_case(name), display_type(&p.type_ref));
                descriptor.has_default_value = p.has_default_value;
                descriptor.default_value.clone_from(&p.default_value);
                descriptor.description = descriptions.get(&p.name).cloned();
                Some(descriptor)
            })
            .collect()
    }

    /// Parameter for a bound page-model property, when the property opts in.
    pub fn model_parameter(&self, property: &PropertyDecl) -> Option<ParameterDescriptor> {
        if property.is_static {
            return None;
        }
        let kinds = self.attributes.resolve_all(&property.attributes);
        let binding = kinds.iter().find(|kind| match kind {
            AttributeKind::BindProperty { supports_get, .. } => *supports_get,
            AttributeKind::FromQuery { .. } | AttributeKind::FromRoute { .. } => true,
            _ => false,
        })?;
        let name = binding.binding_name().unwrap_or(&property.name);
        Some(ParameterDescriptor::new(
            camel_case(name),
            display_type(&property.type_ref),
        ))
    }
}

/// Append `extra` to `parameters`, skipping names already present
/// (case-insensitive). Earlier sources win.
pub fn merge_parameters(
    parameters: &mut Vec<ParameterDescriptor>,
    extra: impl IntoIterator<Item = ParameterDescriptor>,
) {
    for candidate in extra {
        let taken = parameters
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(&candidate.name));
        if taken {
            tracing::debug!(parameter = %candidate.name, "parameter already supplied, dropped");
        } else {
            parameters.push(candidate);
        }
    }
}
