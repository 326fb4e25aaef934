//! Route-template parser.
//!
//! Extracts the ordered path parameters of a template such as
//! `/orders/{id:int:min(1)}/{slug?}` and resolves each one to a type.
//!
//! # Syntax
//!
//! - `{name}` declares a parameter; `{{` and `}}` are literal braces.
//! - `{name:c1:c2(arg)}` attaches constraints. `:` and `}` inside a
//!   constraint's parentheses belong to the argument.
//! - A trailing `?` marks the parameter optional, `=value` gives a default.
//! - `*` / `**` prefixes (catch-all) are stripped from the name.
//!
//! # Type resolution
//!
//! Constraints are scanned left to right against [`RouteConstraintTable`]:
//! a string-shaped constraint settles `string` immediately, a numeric-range
//! function tentatively suggests the numeric range type, and a constraint
//! naming a type settles that type. Unknown constraints are ignored.
//! Malformed constraint syntax degrades the parameter to the default type.

use routelink_core::{ConstantValue, ParameterDescriptor};

use crate::config::RouteConstraintTable;
use crate::naming::camel_case;

/// Parse the path parameters of `template`, in occurrence order.
pub fn parse_route_parameters(
    template: &str,
    table: &RouteConstraintTable,
) -> Vec<ParameterDescriptor> {
    parameter_segments(template)
        .into_iter()
        .filter_map(|segment| parse_segment(segment, table))
        .collect()
}

/// Inner text of every `{...}` parameter segment.
fn parameter_segments(template: &str) -> Vec<&str> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => i += 2,
            b'}' if bytes.get(i + 1) == Some(&b'}') => i += 2,
            b'{' => {
                let start = i + 1;
                let end = closing_brace(bytes, start).unwrap_or(bytes.len());
                segments.push(&template[start..end]);
                i = end + 1;
            }
            _ => i += 1,
        }
    }
    segments
}

/// Position of the `}` closing a segment opened just before `start`.
fn closing_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, byte) in bytes[start..].iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'}' if depth == 0 => return Some(start + offset),
            _ => {}
        }
    }
    None
}

/// Split on `separator` outside parentheses.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn is_balanced(text: &str) -> bool {
    let mut depth = 0i32;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn parse_segment(segment: &str, table: &RouteConstraintTable) -> Option<ParameterDescriptor> {
    let mut pieces = split_top_level(segment, ':');
    let mut optional = false;
    let mut default = None;
    if let Some(last) = pieces.last_mut() {
        let mut text = (*last).trim_end();
        if let Some(stripped) = text.strip_suffix('?') {
            optional = true;
            text = stripped;
        }
        if let [head, value] = split_top_level(text, '=').as_slice() {
            default = Some(value.trim());
            text = *head;
        }
        *last = text;
    }

    let (raw_name, constraints) = pieces.split_first()?;
    let name = raw_name.trim().trim_start_matches('*').trim();
    if name.is_empty() {
        return None;
    }

    let mut type_name = if constraints.iter().all(|c| is_balanced(c)) {
        resolve_type(constraints, table).to_string()
    } else {
        table.default_type.clone()
    };
    let default_value = default.and_then(|text| typed_default(&type_name, text));
    if optional {
        type_name.push('?');
    }

    let parameter = ParameterDescriptor::new(camel_case(name), type_name);
    Some(match default_value {
        Some(value) => parameter.with_default(value),
        None => parameter,
    })
}

fn resolve_type<'t>(constraints: &[&str], table: &'t RouteConstraintTable) -> &'t str {
    let listed = |names: &[String], wanted: &str| names.iter().any(|n| n.eq_ignore_ascii_case(wanted));
    let mut resolved = None;
    for constraint in constraints {
        let function = constraint
            .split_once('(')
            .map_or(*constraint, |(function, _)| function)
            .trim();
        if listed(&table.string_constraints, function) || listed(&table.string_functions, function) {
            return &table.default_type;
        }
        if listed(&table.numeric_range_functions, function) {
            resolved = Some(table.numeric_range_type.as_str());
            continue;
        }
        if let Some((_, type_name)) = table
            .type_constraints
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(function))
        {
            return type_name;
        }
    }
    resolved.unwrap_or(&table.default_type)
}

/// Default value typed after the resolved parameter type. Text that does not
/// parse as that type yields no default.
fn typed_default(type_name: &str, text: &str) -> Option<ConstantValue> {
    match type_name {
        "int" | "long" => text.parse().ok().map(ConstantValue::Integer),
        "float" => text.parse().ok().map(ConstantValue::Float),
        "double" => text.parse().ok().map(ConstantValue::Double),
        "decimal" => text
            .parse::<f64>()
            .ok()
            .map(|_| ConstantValue::Decimal(text.to_string())),
        "bool" => match text.to_ascii_lowercase().as_str() {
            "true" => Some(ConstantValue::Bool(true)),
            "false" => Some(ConstantValue::Bool(false)),
            _ => None,
        },
        "string" => Some(ConstantValue::String(text.to_string())),
        _ => None,
    }
}
