//! Loading generator inputs from disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use routelink_codegen::GeneratorConfig;
use routelink_core::{ProgramModel, TemplateFile};

/// Every file below `folder_path`, recursively, sorted by path.
pub fn collect_files(folder_path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder_path)
        .with_context(|| format!("Failed to read directory: {}", folder_path.display()))?
    {
        let entry = entry.with_context(|| "Failed to read directory entry")?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        } else if path.is_dir() {
            files.extend(collect_files(&path)?);
        }
    }
    files.sort();
    Ok(files)
}

/// Template files below `root` with the given extension (case-insensitive),
/// sorted by path. Paths are kept relative to `root`.
pub fn collect_template_files(root: &Path, extension: &str) -> Result<Vec<TemplateFile>> {
    let wanted = extension.trim_start_matches('.');
    let mut templates = Vec::new();
    for file in collect_files(root)? {
        let matches = file
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(wanted));
        if !matches {
            continue;
        }
        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read file: {}", file.display()))?;
        let relative = file.strip_prefix(root).unwrap_or(&file);
        templates.push(TemplateFile::new(relative.display().to_string(), text));
    }
    Ok(templates)
}

pub fn load_program_model(path: &Path) -> Result<ProgramModel> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse program model: {}", path.display()))
}

pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    GeneratorConfig::from_json(&content)
        .with_context(|| format!("Failed to parse configuration: {}", path.display()))
}
