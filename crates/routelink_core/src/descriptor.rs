//! Descriptor model: the normalized tree discovery builds and the emitter reads.
//!
//! Two shapes exist:
//!
//! - endpoint family: [`AreaDescriptor`] → [`ContainerDescriptor`] →
//!   [`EndpointDescriptor`] → [`ParameterDescriptor`]
//! - page family: [`PageAreaDescriptor`] → [`PageFolderDescriptor`]* →
//!   [`PageDescriptor`] → [`ParameterDescriptor`]
//!
//! Descriptors are only produced by the builders below. A builder owns the
//! insertion order and the duplicate keys; `build` computes every derived
//! field and hands back the frozen tree. Within one node the first
//! discovered descriptor for a duplicate key is kept and later ones are
//! dropped.
//!
//! Area, container and folder names are grouped case-insensitively; the
//! first spelling seen is the one kept.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::ConstantValue;

/// One caller-supplied value of a generated URL method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    /// Camel-cased identifier.
    pub name: String,
    /// Normalized display type; a trailing `?` marks it nullable.
    #[serde(rename = "type")]
    pub type_name: String,
    pub has_default_value: bool,
    pub default_value: Option<ConstantValue>,
    pub description: Option<String>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            has_default_value: false,
            default_value: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: ConstantValue) -> Self {
        self.has_default_value = true;
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_nullable(&self) -> bool {
        self.type_name.ends_with('?')
    }
}

fn signature(parameters: &[ParameterDescriptor]) -> Vec<String> {
    parameters.iter().map(|p| p.type_name.clone()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    name: String,
    container: String,
    parameters: Vec<ParameterDescriptor>,
}

impl EndpointDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the owning container.
    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDescriptor {
    name: String,
    area: String,
    endpoints: Vec<EndpointDescriptor>,
}

impl ContainerDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the owning area; empty for the root area.
    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn endpoints(&self) -> &[EndpointDescriptor] {
        &self.endpoints
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaDescriptor {
    name: String,
    containers: Vec<ContainerDescriptor>,
}

impl AreaDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    pub fn containers(&self) -> &[ContainerDescriptor] {
        &self.containers
    }
}

/// Builds the endpoint family tree, grouping areas in first-seen order.
#[derive(Debug, Default)]
pub struct ControllerTreeBuilder {
    areas: Vec<AreaBuilder>,
    index: HashMap<String, usize>,
}

impl ControllerTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the area with this name.
    pub fn area(&mut self, name: &str) -> &mut AreaBuilder {
        let key = name.to_lowercase();
        let position = match self.index.get(&key).copied() {
            Some(position) => position,
            None => {
                self.areas.push(AreaBuilder::new(name));
                self.index.insert(key, self.areas.len() - 1);
                self.areas.len() - 1
            }
        };
        &mut self.areas[position]
    }

    /// Freeze the tree. Containers without endpoints and areas without
    /// containers are dropped.
    pub fn build(self) -> Vec<AreaDescriptor> {
        self.areas
            .into_iter()
            .filter_map(AreaBuilder::build)
            .collect()
    }
}

#[derive(Debug)]
pub struct AreaBuilder {
    name: String,
    containers: Vec<ContainerBuilder>,
    index: HashMap<String, usize>,
}

impl AreaBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            containers: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get or create the container with this name.
    pub fn container(&mut self, name: &str) -> &mut ContainerBuilder {
        let key = name.to_lowercase();
        let position = match self.index.get(&key).copied() {
            Some(position) => position,
            None => {
                self.containers
                    .push(ContainerBuilder::new(name, &self.name));
                self.index.insert(key, self.containers.len() - 1);
                self.containers.len() - 1
            }
        };
        &mut self.containers[position]
    }

    fn build(self) -> Option<AreaDescriptor> {
        let containers: Vec<_> = self
            .containers
            .into_iter()
            .filter_map(ContainerBuilder::build)
            .collect();
        if containers.is_empty() {
            return None;
        }
        Some(AreaDescriptor {
            name: self.name,
            containers,
        })
    }
}

#[derive(Debug)]
pub struct ContainerBuilder {
    name: String,
    area: String,
    endpoints: Vec<EndpointDescriptor>,
    keys: HashSet<(String, Vec<String>)>,
}

impl ContainerBuilder {
    fn new(name: &str, area: &str) -> Self {
        Self {
            name: name.to_string(),
            area: area.to_string(),
            endpoints: Vec::new(),
            keys: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Append an endpoint unless one with the same name and parameter type
    /// signature is already present. Returns whether it was kept.
    pub fn add_endpoint(
        &mut self,
        name: impl Into<String>,
        parameters: Vec<ParameterDescriptor>,
    ) -> bool {
        let name = name.into();
        if !self.keys.insert((name.clone(), signature(&parameters))) {
            return false;
        }
        self.endpoints.push(EndpointDescriptor {
            name,
            container: self.name.clone(),
            parameters,
        });
        true
    }

    fn build(self) -> Option<ContainerDescriptor> {
        if self.endpoints.is_empty() {
            return None;
        }
        Some(ContainerDescriptor {
            name: self.name,
            area: self.area,
            endpoints: self.endpoints,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    name: String,
    segment: String,
    page_handler: Option<String>,
    parameters: Vec<ParameterDescriptor>,
}

impl PageDescriptor {
    /// Full site-relative path, leading `/`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last path segment.
    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn page_handler(&self) -> Option<&str> {
        self.page_handler.as_deref()
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFolderDescriptor {
    name: String,
    path: String,
    folders: Vec<PageFolderDescriptor>,
    pages: Vec<PageDescriptor>,
}

impl PageFolderDescriptor {
    /// Single path segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn folders(&self) -> &[Self] {
        &self.folders
    }

    pub fn pages(&self) -> &[PageDescriptor] {
        &self.pages
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAreaDescriptor {
    name: String,
    path: String,
    folders: Vec<PageFolderDescriptor>,
    pages: Vec<PageDescriptor>,
}

impl PageAreaDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn folders(&self) -> &[PageFolderDescriptor] {
        &self.folders
    }

    pub fn pages(&self) -> &[PageDescriptor] {
        &self.pages
    }
}

/// Builds the page family tree, grouping areas in first-seen order.
#[derive(Debug, Default)]
pub struct PageTreeBuilder {
    areas: Vec<PageAreaBuilder>,
    index: HashMap<String, usize>,
}

impl PageTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the area with this name.
    pub fn area(&mut self, name: &str) -> &mut PageAreaBuilder {
        let key = name.to_lowercase();
        let position = match self.index.get(&key).copied() {
            Some(position) => position,
            None => {
                self.areas.push(PageAreaBuilder::new(name));
                self.index.insert(key, self.areas.len() - 1);
                self.areas.len() - 1
            }
        };
        &mut self.areas[position]
    }

    /// Freeze the tree. Areas without pages are dropped.
    pub fn build(self) -> Vec<PageAreaDescriptor> {
        self.areas
            .into_iter()
            .filter_map(PageAreaBuilder::build)
            .collect()
    }
}

#[derive(Debug)]
pub struct PageAreaBuilder {
    name: String,
    root: FolderNode,
}

impl PageAreaBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            root: FolderNode::new("", "/"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Route a page into its folder chain, creating missing folders and
    /// reusing existing ones. Returns whether the page was kept; a path
    /// without segments or a duplicate key is rejected.
    pub fn add_page(
        &mut self,
        path: &str,
        page_handler: Option<String>,
        parameters: Vec<ParameterDescriptor>,
    ) -> bool {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, folders)) = segments.split_last() else {
            return false;
        };
        let mut node = &mut self.root;
        for segment in folders {
            node = node.folder(segment);
        }
        node.insert(PageDescriptor {
            name: format!("/{}", segments.join("/")),
            segment: (*last).to_string(),
            page_handler,
            parameters,
        })
    }

    fn build(self) -> Option<PageAreaDescriptor> {
        if self.root.pages.is_empty() && self.root.folders.is_empty() {
            return None;
        }
        let root = self.root.into_descriptor();
        Some(PageAreaDescriptor {
            name: self.name,
            path: root.path,
            folders: root.folders,
            pages: root.pages,
        })
    }
}

#[derive(Debug)]
struct FolderNode {
    name: String,
    path: String,
    folders: Vec<FolderNode>,
    folder_index: HashMap<String, usize>,
    pages: Vec<PageDescriptor>,
    page_keys: HashSet<(String, Option<String>, Vec<String>)>,
}

impl FolderNode {
    fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            folders: Vec::new(),
            folder_index: HashMap::new(),
            pages: Vec::new(),
            page_keys: HashSet::new(),
        }
    }

    fn folder(&mut self, segment: &str) -> &mut Self {
        let key = segment.to_lowercase();
        let position = match self.folder_index.get(&key).copied() {
            Some(position) => position,
            None => {
                let path = if self.path == "/" {
                    format!("/{segment}")
                } else {
                    format!("{}/{segment}", self.path)
                };
                self.folders.push(Self::new(segment, &path));
                self.folder_index.insert(key, self.folders.len() - 1);
                self.folders.len() - 1
            }
        };
        &mut self.folders[position]
    }

    fn insert(&mut self, page: PageDescriptor) -> bool {
        let key = (
            page.name.clone(),
            page.page_handler.clone(),
            signature(&page.parameters),
        );
        if !self.page_keys.insert(key) {
            return false;
        }
        self.pages.push(page);
        true
    }

    fn into_descriptor(self) -> PageFolderDescriptor {
        PageFolderDescriptor {
            name: self.name,
            path: self.path,
            folders: self
                .folders
                .into_iter()
                .map(Self::into_descriptor)
                .collect(),
            pages: self.pages,
        }
    }
}
