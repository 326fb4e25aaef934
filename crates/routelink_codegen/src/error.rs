//! Unified error handling for routelink_codegen.
//!
//! Discovery is mostly total: unresolvable references degrade to "no area" or
//! "no parameters" and malformed route templates degrade to plain strings.
//! The errors here are the cases that must not degrade silently.
//!
//! # Overview
//!
//! All fallible operations return [`CodegenResult<T>`]. A [`CodegenError`]
//! raised while classifying one declaration only skips that declaration; the
//! orchestrator records it as a warning and keeps going.
//!
//! # Key Functions
//!
//! - [`broken_override`] - Build the error for an override with no resolvable base

use thiserror::Error;

/// Result type for all codegen operations.
pub type CodegenResult<T> = Result<T, CodegenError>;

#[derive(Debug, Error)]
pub enum CodegenError {
    /// A method is declared `override` but names no overridden method.
    #[error("method `{type_name}.{method}` is declared override but its overridden method cannot be resolved")]
    BrokenOverrideChain { type_name: String, method: String },

    /// Walking an override chain revisited a method.
    #[error("override chain of `{type_name}.{method}` is cyclic")]
    CyclicOverrideChain { type_name: String, method: String },

    #[error("invalid generator configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Create the error for a declared override without a resolvable base.
#[inline]
pub fn broken_override(type_name: &str, method: &str) -> CodegenError {
    CodegenError::BrokenOverrideChain {
        type_name: type_name.to_string(),
        method: method.to_string(),
    }
}
