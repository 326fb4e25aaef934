#![cfg(test)]
//! Shared test utilities for routelink_codegen tests.
//!
//! # Test Macros
//!
//! - [`program_model!`] - Build a [`ProgramModel`] from type declarations
//!
//! # Test Functions
//!
//! - [`controller`] - A public class deriving from the framework controller base
//! - [`action`] - A public instance method
//! - [`param`] / [`param_of`] - Method parameters
//! - [`attribute`] / [`string_attribute`] - Attribute applications
//!
//! # Example
//!
//! ```ignore
//! let model = program_model![controller("App.HomeController").with_method(action("Index"))];
//! ```

use routelink_core::{AttributeData, ConstantValue, MethodDecl, ParameterDecl, TypeDecl, TypeRef};

pub const MVC: &str = "Microsoft.AspNetCore.Mvc";
pub const CONTROLLER_BASE: &str = "Microsoft.AspNetCore.Mvc.Controller";

/// Build a program model from declarations, in order.
#[macro_export]
macro_rules! program_model {
    ($($decl:expr),* $(,)?) => {
        routelink_core::ProgramModel::new(vec![$($decl),*])
    };
}

pub fn controller(full_name: &str) -> TypeDecl {
    TypeDecl::class(full_name).with_base(CONTROLLER_BASE)
}

pub fn action(name: &str) -> MethodDecl {
    MethodDecl::new(name)
}

/// Attribute from the framework namespace, e.g. `attribute("NonAction")`.
pub fn attribute(short_name: &str) -> AttributeData {
    AttributeData::new(format!("{MVC}.{short_name}Attribute"))
}

pub fn string_attribute(short_name: &str, value: &str) -> AttributeData {
    attribute(short_name).with_argument(ConstantValue::String(value.to_string()))
}

/// Parameter of a system type, e.g. `param("id", "Int32")`.
pub fn param(name: &str, system_type: &str) -> ParameterDecl {
    ParameterDecl::new(name, TypeRef::named(format!("System.{system_type}")))
}

pub fn param_of(name: &str, type_ref: TypeRef) -> ParameterDecl {
    ParameterDecl::new(name, type_ref)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_model_macro() {
        let model = program_model![
            controller("App.HomeController").with_method(action("Index")),
            TypeDecl::class("App.Other"),
        ];
        assert_eq!(model.types().len(), 2);
        assert_eq!(
            model.resolve("App.HomeController").and_then(|t| t.base_type.as_deref()),
            Some(CONTROLLER_BASE)
        );
    }

    #[test]
    fn test_attribute_helpers() {
        assert_eq!(
            attribute("NonAction").class_name,
            "Microsoft.AspNetCore.Mvc.NonActionAttribute"
        );
        assert_eq!(string_attribute("Area", "Admin").first_string_argument(), Some("Admin"));
        assert_eq!(param("id", "Int32").type_ref, TypeRef::named("System.Int32"));
    }
}
