use std::collections::HashSet;

use routelink_core::{PageAreaDescriptor, PageDescriptor, PageFolderDescriptor};

use super::{
    SourceWriter, open_file, open_helper_class, string_literal, write_child_property,
    write_extensions, write_url_method,
};
use crate::config::EmitterOptions;
use crate::naming::sanitize_identifier;

fn area_class(area: &PageAreaDescriptor) -> String {
    if area.is_root() {
        "PageUrls".to_string()
    } else {
        format!("{}PageUrls", sanitize_identifier(area.name()))
    }
}

fn area_accessor(area: &PageAreaDescriptor, options: &EmitterOptions) -> String {
    if area.is_root() {
        options.root_pages_accessor.clone()
    } else {
        format!(
            "{}{}",
            sanitize_identifier(area.name()),
            options.root_pages_accessor
        )
    }
}

/// Method name of a page: its last segment, then its handler.
fn page_method_name(page: &PageDescriptor) -> String {
    let mut name = sanitize_identifier(page.segment());
    if let Some(handler) = page.page_handler() {
        name.push_str(&sanitize_identifier(handler));
    }
    name
}

/// `name`, or `name_{n}` for the first free `n` when it is already taken.
fn unique_member_name(taken: &mut HashSet<String>, name: String) -> String {
    if taken.insert(name.clone()) {
        return name;
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{name}_{counter}");
        if taken.insert(candidate.clone()) {
            tracing::debug!(member = %name, renamed = %candidate, "duplicate member name");
            return candidate;
        }
        counter += 1;
    }
}

/// Render the page family.
pub fn emit_pages(areas: &[PageAreaDescriptor], options: &EmitterOptions) -> String {
    let mut writer = SourceWriter::new();
    open_file(&mut writer, options);

    let accessors: Vec<_> = areas
        .iter()
        .map(|area| (area_accessor(area, options), area_class(area)))
        .collect();
    write_extensions(
        &mut writer,
        &options.page_extensions_class,
        &accessors,
        options,
    );

    for area in areas {
        let scope = Scope {
            area: area.name(),
            options,
        };
        open_helper_class(&mut writer, &area_class(area), options);
        scope.write_members(&mut writer, area.folders(), area.pages());
        writer.close();
    }

    writer.close();
    writer.finish()
}

struct Scope<'a> {
    area: &'a str,
    options: &'a EmitterOptions,
}

impl Scope<'_> {
    /// Folder properties, page methods, then the nested folder classes.
    fn write_members(
        &self,
        writer: &mut SourceWriter,
        folders: &[PageFolderDescriptor],
        pages: &[PageDescriptor],
    ) {
        let mut taken = HashSet::new();
        let methods: Vec<String> = pages
            .iter()
            .map(|page| unique_member_name(&mut taken, page_method_name(page)))
            .collect();
        let folder_classes: Vec<String> = folders
            .iter()
            .map(|folder| format!("{}FolderUrls", sanitize_identifier(folder.name())))
            .collect();

        for (folder, class_name) in folders.iter().zip(&folder_classes) {
            let mut property = sanitize_identifier(folder.name());
            if methods.contains(&property) {
                property.push_str("Folder");
            }
            let property = unique_member_name(&mut taken, property);
            write_child_property(writer, &property, class_name);
        }
        for (page, method_name) in pages.iter().zip(&methods) {
            let call_head = format!(
                "{}({}, {}",
                self.options.page_method,
                string_literal(page.name()),
                page.page_handler()
                    .map_or_else(|| "null".to_string(), string_literal)
            );
            write_url_method(
                writer,
                method_name,
                &call_head,
                self.area,
                page.parameters(),
                self.options,
            );
        }
        for (folder, class_name) in folders.iter().zip(&folder_classes) {
            open_helper_class(writer, class_name, self.options);
            self.write_members(writer, folder.folders(), folder.pages());
            writer.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use routelink_core::{PageTreeBuilder, ParameterDescriptor};

    use super::*;

    #[test]
    fn test_nested_folders() {
        let mut tree = PageTreeBuilder::new();
        let root = tree.area("");
        root.add_page("/Index", None, vec![]);
        root.add_page("/Nested/Feature/A", None, vec![]);
        let source = emit_pages(&tree.build(), &EmitterOptions::default());

        insta::assert_snapshot!(source, @r#"
        // <auto-generated/>
        #nullable enable

        using Microsoft.AspNetCore.Mvc;
        using Microsoft.AspNetCore.Routing;

        namespace RouteLinks
        {
            public static class PageUrlExtensions
            {
                public static PageUrls Pages(this IUrlHelper urlHelper) => new PageUrls(urlHelper);
            }

            public sealed class PageUrls
            {
                private readonly IUrlHelper _urlHelper;

                public PageUrls(IUrlHelper urlHelper)
                {
                    _urlHelper = urlHelper;
                }

                public NestedFolderUrls Nested => new NestedFolderUrls(_urlHelper);

                public string? Index()
                {
                    return _urlHelper.Page("/Index", null, new RouteValueDictionary
                    {
                        ["area"] = "",
                    });
                }

                public sealed class NestedFolderUrls
                {
                    private readonly IUrlHelper _urlHelper;

                    public NestedFolderUrls(IUrlHelper urlHelper)
                    {
                        _urlHelper = urlHelper;
                    }

                    public FeatureFolderUrls Feature => new FeatureFolderUrls(_urlHelper);

                    public sealed class FeatureFolderUrls
                    {
                        private readonly IUrlHelper _urlHelper;

                        public FeatureFolderUrls(IUrlHelper urlHelper)
                        {
                            _urlHelper = urlHelper;
                        }

                        public string? A()
                        {
                            return _urlHelper.Page("/Nested/Feature/A", null, new RouteValueDictionary
                            {
                                ["area"] = "",
                            });
                        }
                    }
                }
            }
        }
        "#);
    }

    #[test]
    fn test_handlers_areas_and_collisions() {
        let mut tree = PageTreeBuilder::new();
        let shop = tree.area("Shop");
        shop.add_page("/Order", None, vec![ParameterDescriptor::new("id", "int")]);
        shop.add_page(
            "/Order",
            Some("Cancel".into()),
            vec![ParameterDescriptor::new("id", "int")],
        );
        shop.add_page("/Order/Details", None, vec![]);
        let source = emit_pages(&tree.build(), &EmitterOptions::default());

        assert!(source.contains(
            "public static ShopPageUrls ShopPages(this IUrlHelper urlHelper) => new ShopPageUrls(urlHelper);"
        ));
        assert!(source.contains("public OrderFolderUrls OrderFolder => new OrderFolderUrls(_urlHelper);"));
        assert!(source.contains("public string? Order(int id)"));
        assert!(source.contains("public string? OrderCancel(int id)"));
        assert!(source.contains("return _urlHelper.Page(\"/Order\", \"Cancel\", new RouteValueDictionary"));
        assert!(source.contains("return _urlHelper.Page(\"/Order/Details\", null, new RouteValueDictionary"));
        assert!(source.contains("[\"area\"] = \"Shop\","));
    }

    #[test]
    fn test_colliding_method_names_are_numbered() {
        let mut tree = PageTreeBuilder::new();
        let root = tree.area("");
        root.add_page("/A", Some("B".into()), vec![]);
        root.add_page("/AB", None, vec![]);
        root.add_page("/AB", Some("Export".into()), vec![]);
        let source = emit_pages(&tree.build(), &EmitterOptions::default());

        assert!(source.contains("public string? AB()"));
        assert!(source.contains("public string? AB_1()"));
        assert!(source.contains("public string? ABExport()"));
        assert!(source.contains("return _urlHelper.Page(\"/A\", \"B\", new RouteValueDictionary"));
        assert!(source.contains("return _urlHelper.Page(\"/AB\", null, new RouteValueDictionary"));
        assert_eq!(source.matches("public string? AB(").count(), 1);
    }

    #[test]
    fn test_unique_member_name() {
        let mut taken = HashSet::new();
        assert_eq!(unique_member_name(&mut taken, "Index".into()), "Index");
        assert_eq!(unique_member_name(&mut taken, "Index".into()), "Index_1");
        assert_eq!(unique_member_name(&mut taken, "Index".into()), "Index_2");
        assert_eq!(unique_member_name(&mut taken, "Edit".into()), "Edit");
    }
}
