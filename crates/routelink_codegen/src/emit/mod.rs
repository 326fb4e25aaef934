//! Code emitter.
//!
//! Renders frozen descriptor trees into URL helper source. Output is a pure
//! function of the descriptors and [`EmitterOptions`]: no timestamps, no
//! hash-ordered iteration, so an unchanged tree always yields byte-identical
//! text.
//!
//! # Shape
//!
//! One static extension class exposes an accessor per area. Each area class
//! wraps the URL helper and exposes one property per container (or folder);
//! each generated method returns the collaborator call with the area and the
//! declared parameters as ordered route values.
//!
//! # Key Functions
//!
//! - [`emit_controllers`] - endpoint family
//! - [`emit_pages`] - page family

mod controllers;
mod literal;
mod pages;
mod writer;

pub use controllers::emit_controllers;
pub use literal::{constant_literal, string_literal};
pub use pages::emit_pages;
pub use writer::SourceWriter;

use routelink_core::ParameterDescriptor;

use crate::config::EmitterOptions;
use crate::naming::{parameter_identifier, sanitize_identifier};

const URL_HELPER_FIELD: &str = "_urlHelper";

/// File preamble up to and including the namespace opening.
fn open_file(writer: &mut SourceWriter, options: &EmitterOptions) {
    writer.line("// <auto-generated/>");
    writer.line("#nullable enable");
    if !options.usings.is_empty() {
        writer.member();
        for using in &options.usings {
            writer.line(&format!("using {using};"));
        }
    }
    writer.member();
    writer.open(&format!("namespace {}", options.namespace));
}

/// Static extension class with one accessor per `(accessor, class)` pair.
fn write_extensions(
    writer: &mut SourceWriter,
    class_name: &str,
    accessors: &[(String, String)],
    options: &EmitterOptions,
) {
    writer.member();
    writer.open(&format!("public static class {class_name}"));
    for (accessor, target) in accessors {
        writer.member();
        writer.line(&format!(
            "public static {target} {accessor}(this {} urlHelper) => new {target}(urlHelper);",
            options.url_helper_type
        ));
    }
    writer.close();
}

/// Open a helper class and write its URL helper field and constructor.
fn open_helper_class(writer: &mut SourceWriter, class_name: &str, options: &EmitterOptions) {
    writer.member();
    writer.open(&format!("public sealed class {class_name}"));
    writer.member();
    writer.line(&format!(
        "private readonly {} {URL_HELPER_FIELD};",
        options.url_helper_type
    ));
    writer.member();
    writer.open(&format!(
        "public {class_name}({} urlHelper)",
        options.url_helper_type
    ));
    writer.line(&format!("{URL_HELPER_FIELD} = urlHelper;"));
    writer.close();
}

/// Property returning a nested helper class bound to the same URL helper.
fn write_child_property(writer: &mut SourceWriter, property: &str, class_name: &str) {
    writer.member();
    writer.line(&format!(
        "public {class_name} {property} => new {class_name}({URL_HELPER_FIELD});"
    ));
}

/// Comma-separated parameter declarations. A default is rendered only when
/// every later parameter has one too, since required parameters cannot
/// follow optional ones.
fn parameter_list(parameters: &[ParameterDescriptor]) -> String {
    let first_optional = parameters
        .iter()
        .rposition(|p| !p.has_default_value)
        .map_or(0, |last_required| last_required + 1);
    parameters
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let declaration = format!("{} {}", p.type_name, parameter_identifier(&p.name));
            if index < first_optional {
                return declaration;
            }
            let default = p
                .default_value
                .as_ref()
                .map_or_else(|| "default".to_string(), constant_literal);
            format!("{declaration} = {default}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn write_parameter_docs(writer: &mut SourceWriter, parameters: &[ParameterDescriptor]) {
    for parameter in parameters {
        if let Some(description) = &parameter.description {
            writer.line(&format!(
                "/// <param name=\"{}\">{}</param>",
                sanitize_identifier(&parameter.name),
                xml_escape(description)
            ));
        }
    }
}

/// One URL method: `public string? {name}({parameters})` returning
/// `{call_head}, new RouteValues { ... });`.
fn write_url_method(
    writer: &mut SourceWriter,
    method_name: &str,
    call_head: &str,
    area: &str,
    parameters: &[ParameterDescriptor],
    options: &EmitterOptions,
) {
    writer.member();
    write_parameter_docs(writer, parameters);
    writer.open(&format!(
        "public string? {method_name}({})",
        parameter_list(parameters)
    ));
    writer.open(&format!(
        "return {URL_HELPER_FIELD}.{call_head}, new {}",
        options.route_values_type
    ));
    writer.line(&format!(
        "[{}] = {},",
        string_literal(&options.area_key),
        string_literal(area)
    ));
    for parameter in parameters {
        writer.line(&format!(
            "[{}] = {},",
            string_literal(&parameter.name),
            parameter_identifier(&parameter.name)
        ));
    }
    writer.close_with(");");
    writer.close();
}
