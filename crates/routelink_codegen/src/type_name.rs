//! Canonical display names for type references.
//!
//! The display string is valid source-level type syntax: primitive aliases
//! for the well-known system types, fully qualified names otherwise,
//! `T[]` for arrays, `T?` for the optional-value wrapper and for nullable
//! annotations, and `Root<A, B>` for generic instantiations.

use routelink_core::TypeRef;

/// Generic identity rendered as `T?`.
pub const NULLABLE_WRAPPER: &str = "System.Nullable";

const PRIMITIVE_ALIASES: &[(&str, &str)] = &[
    ("System.Boolean", "bool"),
    ("System.Byte", "byte"),
    ("System.SByte", "sbyte"),
    ("System.Char", "char"),
    ("System.Decimal", "decimal"),
    ("System.Double", "double"),
    ("System.Single", "float"),
    ("System.Int16", "short"),
    ("System.UInt16", "ushort"),
    ("System.Int32", "int"),
    ("System.UInt32", "uint"),
    ("System.Int64", "long"),
    ("System.UInt64", "ulong"),
    ("System.IntPtr", "nint"),
    ("System.UIntPtr", "nuint"),
    ("System.Object", "object"),
    ("System.String", "string"),
];

/// Alias for a fully qualified primitive type name.
pub fn primitive_alias(full_name: &str) -> Option<&'static str> {
    PRIMITIVE_ALIASES
        .iter()
        .find(|(name, _)| *name == full_name)
        .map(|(_, alias)| *alias)
}

/// Drop a trailing generic arity marker (``List`1`` → `List`).
fn strip_arity(name: &str) -> &str {
    match name.rsplit_once('`') {
        Some((root, arity)) if !arity.is_empty() && arity.bytes().all(|b| b.is_ascii_digit()) => root,
        _ => name,
    }
}

fn with_nullable_marker(mut display: String) -> String {
    if !display.ends_with('?') {
        display.push('?');
    }
    display
}

/// Render a type reference as its canonical display string.
pub fn display_type(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Array { element, rank } => {
            let commas = ",".repeat(rank.saturating_sub(1) as usize);
            format!("{}[{commas}]", display_type(element))
        }
        TypeRef::TypeParameter { name } => name.clone(),
        TypeRef::Named {
            name,
            arguments,
            nullable,
        } => {
            let root = strip_arity(name);
            if root == NULLABLE_WRAPPER && arguments.len() == 1 {
                return with_nullable_marker(display_type(&arguments[0]));
            }
            let root = primitive_alias(root).unwrap_or(root);
            let display = if arguments.is_empty() {
                root.to_string()
            } else {
                let arguments = arguments
                    .iter()
                    .map(display_type)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{root}<{arguments}>")
            };
            if *nullable {
                with_nullable_marker(display)
            } else {
                display
            }
        }
    }
}

/// Whether `ty` is, wraps, or is instantiated over one of `names`.
pub fn mentions_any(ty: &TypeRef, names: &[String]) -> bool {
    match ty {
        TypeRef::Array { element, .. } => mentions_any(element, names),
        TypeRef::TypeParameter { .. } => false,
        TypeRef::Named {
            name, arguments, ..
        } => {
            let root = strip_arity(name);
            names.iter().any(|n| n == root) || arguments.iter().any(|a| mentions_any(a, names))
        }
    }
}
