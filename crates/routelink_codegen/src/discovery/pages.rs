//! Page family discovery.
//!
//! A template file is a page when one of its lines is the page marker. The
//! marker's optional quoted argument is the route template; a model marker
//! names the page-model type whose bound properties and handler methods add
//! parameters and handler variants.

use regex::Regex;
use routelink_core::{
    PageAreaDescriptor, PageTreeBuilder, ParameterDescriptor, ProgramModel, TemplateFile, TypeDecl,
    path_segments,
};

use super::DiscoveryReport;
use super::parameters::{ParameterAssembler, merge_parameters};
use crate::classify::Classifier;
use crate::config::{GeneratorConfig, PageConventions};
use crate::error::CodegenError;
use crate::route_template::parse_route_parameters;

/// Line patterns for the page and model markers.
struct Markers {
    page: Regex,
    model: Regex,
}

impl Markers {
    fn new(conventions: &PageConventions) -> Option<Self> {
        let page = Regex::new(&format!(
            r#"(?m)^[ \t]*{}(?:[ \t]+"([^"\r\n]*)")?[ \t]*\r?$"#,
            regex::escape(&conventions.page_marker)
        ))
        .ok()?;
        let model = Regex::new(&format!(
            r"(?m)^[ \t]*{}[ \t]+(\S+)",
            regex::escape(&conventions.model_marker)
        ))
        .ok()?;
        Some(Self { page, model })
    }

    /// Route template of a page file; `None` when the file is not a page.
    fn route_template<'t>(&self, text: &'t str) -> Option<&'t str> {
        let captures = self.page.captures(text)?;
        Some(captures.get(1).map_or("", |m| m.as_str()))
    }

    fn model_type<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.model
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

/// Area name and site-relative page path (leading `/`, no extension) of a
/// template file, or `None` when the path is not under a pages root.
pub fn page_location(path: &str, conventions: &PageConventions) -> Option<(String, String)> {
    let mut segments = path_segments(path);
    if let Some(root) = &conventions.project_root {
        let root = path_segments(root);
        if segments.len() > root.len()
            && segments
                .iter()
                .zip(&root)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
        {
            segments = segments.split_off(root.len());
        }
    }

    let pages_at = segments
        .iter()
        .position(|s| s.eq_ignore_ascii_case(&conventions.pages_root))?;
    let area = match pages_at.checked_sub(2).map(|i| segments[i]) {
        Some(areas) if areas.eq_ignore_ascii_case(&conventions.areas_root) => {
            segments[pages_at - 1].to_string()
        }
        _ => String::new(),
    };

    let (file_name, folders) = segments[pages_at + 1..].split_last()?;
    let extension = &conventions.template_extension;
    let split = file_name.len().checked_sub(extension.len())?;
    let stem = file_name
        .get(split..)
        .filter(|tail| tail.eq_ignore_ascii_case(extension))
        .and_then(|_| file_name.get(..split))
        .filter(|stem| !stem.is_empty())?;

    let mut page = String::new();
    for segment in folders.iter().copied().chain(std::iter::once(stem)) {
        page.push('/');
        page.push_str(segment);
    }
    Some((area, page))
}

/// Walk the template files and build the page descriptor tree.
pub fn discover_pages(
    model: &ProgramModel,
    templates: &[TemplateFile],
    config: &GeneratorConfig,
) -> DiscoveryReport<PageAreaDescriptor> {
    let _span = tracing::info_span!("discover_pages", templates = templates.len()).entered();
    let mut warnings = Vec::new();
    let Some(markers) = Markers::new(&config.pages) else {
        tracing::warn!(
            page_marker = %config.pages.page_marker,
            model_marker = %config.pages.model_marker,
            "page markers do not form valid patterns"
        );
        return DiscoveryReport {
            areas: Vec::new(),
            warnings,
        };
    };
    let classifier = Classifier::new(model, config);
    let assembler = ParameterAssembler::new(classifier.attributes(), &config.controllers);
    let mut tree = PageTreeBuilder::new();

    for file in templates {
        let Some(route) = markers.route_template(&file.text) else {
            continue;
        };
        let Some((area, page)) = page_location(&file.path, &config.pages) else {
            tracing::debug!(path = %file.path, "page outside a pages root, dropped");
            continue;
        };

        let mut parameters = parse_route_parameters(route, &config.route_constraints);
        let page_model = markers.model_type(&file.text).and_then(|name| {
            let resolved = model.resolve_by_name(name);
            if resolved.is_none() {
                tracing::debug!(path = %file.path, model = name, "page model not resolved");
            }
            resolved
        });

        let mut handlers = Vec::new();
        if let Some(page_model) = page_model {
            let bound = model
                .properties_of(&page_model.full_name)
                .filter_map(|p| assembler.model_parameter(p));
            merge_parameters(&mut parameters, bound);
            handlers = page_handlers(&classifier, &assembler, page_model, &mut warnings);
        }

        let area_builder = tree.area(&area);
        if handlers.is_empty() {
            let kept = area_builder.add_page(&page, None, parameters);
            tracing::debug!(area = %area, page = %page, kept, "page");
            continue;
        }
        for (handler, handler_parameters) in handlers {
            let mut combined = parameters.clone();
            merge_parameters(&mut combined, handler_parameters);
            let kept = area_builder.add_page(&page, handler.clone(), combined);
            tracing::debug!(area = %area, page = %page, handler = ?handler, kept, "page handler");
        }
    }

    let areas = tree.build();
    tracing::debug!(areas = areas.len(), "page discovery finished");
    DiscoveryReport { areas, warnings }
}

type Handler = (Option<String>, Vec<ParameterDescriptor>);

fn page_handlers(
    classifier: &Classifier<'_>,
    assembler: &ParameterAssembler<'_>,
    page_model: &TypeDecl,
    warnings: &mut Vec<CodegenError>,
) -> Vec<Handler> {
    let owner = page_model.full_name.as_str();
    let model = classifier.attributes().model();
    let mut handlers = Vec::new();
    for method in model.methods_of(owner) {
        match classifier.is_page_handler(owner, method) {
            Ok(true) => handlers.push((
                classifier.page_handler_name(method),
                assembler.method_parameters(method),
            )),
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(
                    type_name = owner,
                    method = %method.name,
                    error = %err,
                    "skipping declaration"
                );
                warnings.push(err);
            }
        }
    }
    handlers
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use routelink_core::{ConstantValue, MethodDecl, PageFolderDescriptor, PropertyDecl, TypeRef};

    use super::*;
    use crate::test_helpers::{attribute, param};

    fn discover(model: &ProgramModel, files: &[(&str, &str)]) -> DiscoveryReport<PageAreaDescriptor> {
        let templates: Vec<_> = files
            .iter()
            .map(|(path, text)| TemplateFile::new(*path, *text))
            .collect();
        discover_pages(model, &templates, &GeneratorConfig::default())
    }

    #[rstest]
    #[case("Pages/Index.cshtml", Some(("", "/Index")))]
    #[case("src/Web/Pages/Admin/Users.cshtml", Some(("", "/Admin/Users")))]
    #[case("Areas/Identity/Pages/Account/Login.cshtml", Some(("Identity", "/Account/Login")))]
    #[case("Areas\\Shop\\Pages\\Cart.CSHTML", Some(("Shop", "/Cart")))]
    #[case("Views/Home/Index.cshtml", None)]
    #[case("Pages/Index.razor", None)]
    #[case("Pages", None)]
    #[case("Pages/.cshtml", None)]
    fn test_page_location(#[case] path: &str, #[case] expected: Option<(&str, &str)>) {
        let location = page_location(path, &PageConventions::default());
        assert_eq!(
            location.as_ref().map(|(a, p)| (a.as_str(), p.as_str())),
            expected
        );
    }

    #[test]
    fn test_page_location_relative_to_project_root() {
        let conventions = PageConventions {
            project_root: Some("/work/app".to_string()),
            ..PageConventions::default()
        };
        assert_eq!(
            page_location("/work/app/Pages/Privacy.cshtml", &conventions),
            Some((String::new(), "/Privacy".to_string()))
        );
    }

    #[test]
    fn test_only_marked_templates_are_pages() {
        let report = discover(
            &ProgramModel::default(),
            &[
                ("Pages/Index.cshtml", "@page\n<h1>Home</h1>"),
                ("Pages/_Layout.cshtml", "<html>@RenderBody()</html>"),
                ("Pages/Pager.cshtml", "@pager\n"),
            ],
        );
        let pages: Vec<_> = report.areas[0].pages().iter().map(|p| p.name()).collect();
        assert_eq!(pages, vec!["/Index"]);
    }

    #[test]
    fn test_folder_reuse_across_files() {
        let report = discover(
            &ProgramModel::default(),
            &[
                ("Pages/Nested/Feature/A.cshtml", "@page"),
                ("Pages/Nested/Feature/B.cshtml", "@page"),
            ],
        );
        let root = &report.areas[0];
        assert_eq!(root.folders().len(), 1);
        let nested = &root.folders()[0];
        assert_eq!(nested.folders().len(), 1);
        let feature: &PageFolderDescriptor = &nested.folders()[0];
        assert_eq!(feature.pages().len(), 2);
    }

    #[test]
    fn test_route_and_model_parameters() {
        let model = crate::program_model![
            TypeDecl::class("App.Pages.Products.EditModel")
                .with_property(
                    PropertyDecl::new("Id", TypeRef::named("System.String"))
                        .with_attribute(attribute("FromRoute")),
                )
                .with_property(
                    PropertyDecl::new("Filter", TypeRef::named("System.String")).with_attribute(
                        attribute("BindProperty").with_named("SupportsGet", ConstantValue::Bool(true)),
                    ),
                )
                .with_property(
                    PropertyDecl::new("Input", TypeRef::named("App.Input"))
                        .with_attribute(attribute("BindProperty")),
                )
        ];
        let report = discover(
            &model,
            &[(
                "Pages/Products/Edit.cshtml",
                "@page \"{id:int}\"\n@model EditModel\n",
            )],
        );
        let page = &report.areas[0].folders()[0].pages()[0];
        let parameters: Vec<_> = page
            .parameters()
            .iter()
            .map(|p| (p.name.as_str(), p.type_name.as_str()))
            .collect();
        assert_eq!(parameters, vec![("id", "int"), ("filter", "string")]);
    }

    #[test]
    fn test_handlers_yield_variants() {
        let model = crate::program_model![
            TypeDecl::class("App.Pages.OrderModel")
                .with_method(MethodDecl::new("OnGetAsync"))
                .with_method(MethodDecl::new("OnPostCancel").with_parameter(param("reason", "String")))
                .with_method(MethodDecl::new("OnPost"))
                .with_method(MethodDecl::new("Load"))
        ];
        let report = discover(
            &model,
            &[("Areas/Shop/Pages/Order.cshtml", "@page \"{id?}\"\n@model App.Pages.OrderModel")],
        );
        let area = &report.areas[0];
        assert_eq!(area.name(), "Shop");
        let pages: Vec<_> = area
            .pages()
            .iter()
            .map(|p| (p.page_handler(), p.parameters().len()))
            .collect();
        // OnPost duplicates OnGetAsync: same page, no handler name, same signature
        assert_eq!(pages, vec![(None, 1), (Some("Cancel"), 2)]);
    }

    #[test]
    fn test_unresolved_model_yields_route_parameters_only() {
        let report = discover(
            &ProgramModel::default(),
            &[("Pages/Index.cshtml", "@page \"{slug}\"\n@model MissingModel")],
        );
        let page = &report.areas[0].pages()[0];
        assert_eq!(page.parameters().len(), 1);
        assert_eq!(page.parameters()[0].name, "slug");
    }
}
