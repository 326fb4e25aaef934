use routelink_core::{AreaDescriptor, ContainerDescriptor};

use super::{
    SourceWriter, open_file, open_helper_class, string_literal, write_child_property,
    write_extensions, write_url_method,
};
use crate::config::EmitterOptions;
use crate::naming::sanitize_identifier;

fn area_class(area: &AreaDescriptor) -> String {
    if area.is_root() {
        "ControllerUrls".to_string()
    } else {
        format!("{}ControllerUrls", sanitize_identifier(area.name()))
    }
}

fn area_accessor(area: &AreaDescriptor, options: &EmitterOptions) -> String {
    if area.is_root() {
        options.root_controllers_accessor.clone()
    } else {
        format!(
            "{}{}",
            sanitize_identifier(area.name()),
            options.root_controllers_accessor
        )
    }
}

/// Render the endpoint family.
pub fn emit_controllers(areas: &[AreaDescriptor], options: &EmitterOptions) -> String {
    let mut writer = SourceWriter::new();
    open_file(&mut writer, options);

    let accessors: Vec<_> = areas
        .iter()
        .map(|area| (area_accessor(area, options), area_class(area)))
        .collect();
    write_extensions(
        &mut writer,
        &options.controller_extensions_class,
        &accessors,
        options,
    );

    for area in areas {
        open_helper_class(&mut writer, &area_class(area), options);
        for container in area.containers() {
            let name = sanitize_identifier(container.name());
            write_child_property(&mut writer, &name, &format!("{name}Urls"));
        }
        for container in area.containers() {
            write_container(&mut writer, container, options);
        }
        writer.close();
    }

    writer.close();
    writer.finish()
}

fn write_container(writer: &mut SourceWriter, container: &ContainerDescriptor, options: &EmitterOptions) {
    let class_name = format!("{}Urls", sanitize_identifier(container.name()));
    open_helper_class(writer, &class_name, options);
    for endpoint in container.endpoints() {
        let call_head = format!(
            "{}({}, {}",
            options.action_method,
            string_literal(endpoint.name()),
            string_literal(container.name())
        );
        write_url_method(
            writer,
            &sanitize_identifier(endpoint.name()),
            &call_head,
            container.area(),
            endpoint.parameters(),
            options,
        );
    }
    writer.close();
}
