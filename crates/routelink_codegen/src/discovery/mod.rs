//! Discovery orchestrator.
//!
//! Walks the program model (and, for pages, the template files), applies
//! the classifier and the route-template parser, assembles parameters and
//! fills the descriptor builders. One pass per family; each pass returns the
//! frozen tree together with the declarations it had to skip.
//!
//! # Key Functions
//!
//! - [`discover_controllers`] - endpoint family
//! - [`discover_pages`] - page family

mod controllers;
mod pages;
mod parameters;

pub use controllers::discover_controllers;
pub use pages::{discover_pages, page_location};

use crate::error::CodegenError;

/// Result of one discovery pass.
#[derive(Debug)]
pub struct DiscoveryReport<T> {
    /// Frozen descriptor tree, areas in first-seen order.
    pub areas: Vec<T>,
    /// Declarations skipped because they could not be classified.
    pub warnings: Vec<CodegenError>,
}
