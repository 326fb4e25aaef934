//! Endpoint family discovery.

use std::collections::HashSet;

use routelink_core::{AreaDescriptor, ControllerTreeBuilder, ProgramModel};

use super::DiscoveryReport;
use super::parameters::ParameterAssembler;
use crate::classify::Classifier;
use crate::config::GeneratorConfig;
use crate::type_name::display_type;

/// Walk the program model and build the endpoint descriptor tree.
///
/// Containers are visited in declaration order (fragments of one logical
/// type once, at their first fragment). A container's own actions come
/// first, then the actions of its base classes in the model, most derived
/// first; a base method redeclared by a derived type is skipped.
pub fn discover_controllers(
    model: &ProgramModel,
    config: &GeneratorConfig,
) -> DiscoveryReport<AreaDescriptor> {
    let _span = tracing::info_span!("discover_controllers").entered();
    let classifier = Classifier::new(model, config);
    let assembler = ParameterAssembler::new(classifier.attributes(), &config.controllers);
    let mut tree = ControllerTreeBuilder::new();
    let mut warnings = Vec::new();
    let mut visited = HashSet::new();

    for decl in model.types() {
        let full_name = decl.full_name.as_str();
        if !visited.insert(full_name) {
            continue;
        }
        if !classifier.is_endpoint_container(decl) {
            tracing::debug!(type_name = full_name, "not an endpoint container");
            continue;
        }
        let area = classifier.area_name(full_name);
        let container = tree.area(&area).container(classifier.container_name(decl));
        tracing::debug!(
            type_name = full_name,
            area = %area,
            container = container.name(),
            "endpoint container"
        );

        let mut declared = HashSet::new();
        for owner in model.base_chain(full_name) {
            for method in model.methods_of(owner) {
                let signature = (
                    method.name.as_str(),
                    method
                        .parameters
                        .iter()
                        .map(|p| display_type(&p.type_ref))
                        .collect::<Vec<_>>(),
                );
                if !declared.insert(signature) {
                    continue;
                }
                match classifier.is_endpoint_action(owner, method) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(err) => {
                        tracing::warn!(
                            type_name = owner,
                            method = %method.name,
                            error = %err,
                            "skipping declaration"
                        );
                        warnings.push(err);
                        continue;
                    }
                }
                let action = classifier.action_name(method);
                let kept = container.add_endpoint(action.clone(), assembler.method_parameters(method));
                tracing::debug!(
                    container = container.name(),
                    action = %action,
                    kept,
                    "endpoint action"
                );
            }
        }
    }

    let areas = tree.build();
    tracing::debug!(areas = areas.len(), "endpoint discovery finished");
    DiscoveryReport { areas, warnings }
}
