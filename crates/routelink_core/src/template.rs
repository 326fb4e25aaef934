//! Non-compiled page template files handed over by the host.

use serde::{Deserialize, Serialize};

/// A template file: its path and raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFile {
    pub path: String,
    pub text: String,
}

impl TemplateFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn segments(&self) -> Vec<&str> {
        path_segments(&self.path)
    }
}

/// Path split on both separator styles, empty segments removed.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .collect()
}
