//! routelink codegen - endpoint discovery and URL helper emission
//!
//! Pipeline: program model (+ template files) → [`discovery`] (using
//! [`classify`], [`route_template`], [`type_name`]) → descriptor tree →
//! [`emit`] → source text. Every rule is data in [`config`].

pub mod attributes;
pub mod classify;
pub mod config;
pub mod discovery;
pub mod doc_comment;
pub mod emit;
pub mod error;
pub mod naming;
pub mod route_template;
pub mod type_name;

#[cfg(test)]
mod test_helpers;

pub use config::GeneratorConfig;
pub use discovery::{DiscoveryReport, discover_controllers, discover_pages};
pub use emit::{emit_controllers, emit_pages};
pub use error::{CodegenError, CodegenResult};
