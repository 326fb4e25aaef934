//! Parameter descriptions from documentation trivia.
//!
//! Both trivia shapes carry XML documentation. The single-line block is
//! read first and the structured block last; when both describe the same
//! parameter the structured description replaces the single-line one.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use routelink_core::DocComment;

static PARAM_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?s)<param\s+name\s*=\s*"([^"]*)"\s*>(.*?)</param\s*>"#).ok()
});

/// Parameter name → description, whitespace collapsed.
pub fn parameter_descriptions(doc: &DocComment) -> HashMap<String, String> {
    let mut descriptions = HashMap::new();
    if let Some(block) = &doc.single_line {
        collect(&strip_single_line(block), &mut descriptions);
    }
    if let Some(block) = &doc.structured {
        collect(&strip_structured(block), &mut descriptions);
    }
    descriptions
}

fn collect(text: &str, into: &mut HashMap<String, String>) {
    let Some(pattern) = PARAM_TAG.as_ref() else {
        return;
    };
    for captures in pattern.captures_iter(text) {
        let description = captures[2].split_whitespace().collect::<Vec<_>>().join(" ");
        if !description.is_empty() {
            into.insert(captures[1].trim().to_string(), description);
        }
    }
}

fn strip_single_line(block: &str) -> String {
    block
        .lines()
        .map(|line| {
            let line = line.trim_start();
            line.strip_prefix("///").unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_structured(block: &str) -> String {
    let block = block.trim();
    let block = block.strip_prefix("/**").unwrap_or(block);
    let block = block.strip_suffix("*/").unwrap_or(block);
    block
        .lines()
        .map(|line| {
            let line = line.trim_start();
            line.strip_prefix('*').unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
