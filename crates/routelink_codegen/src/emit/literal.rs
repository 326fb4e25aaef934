//! Source literals for default values and route-value keys.
//!
//! Rendering never depends on the host locale: numbers use Rust's shortest
//! round-trip formatting, which is also valid literal syntax in the emitted
//! language once the type suffix is added.

use routelink_core::ConstantValue;

/// Quote and escape a string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        push_escaped(&mut out, c, '"');
    }
    out.push('"');
    out
}

fn char_literal(value: char) -> String {
    let mut out = String::from('\'');
    push_escaped(&mut out, value, '\'');
    out.push('\'');
    out
}

fn push_escaped(out: &mut String, c: char, quote: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\0' => out.push_str("\\0"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => out.push_str(&format!("\\u{:04X}", u32::from(c))),
        c => out.push(c),
    }
}

/// Render a default value as a literal expression.
pub fn constant_literal(value: &ConstantValue) -> String {
    match value {
        ConstantValue::Null => "null".to_string(),
        ConstantValue::Bool(b) => b.to_string(),
        ConstantValue::Integer(i) => i.to_string(),
        ConstantValue::Unsigned(u) if i64::try_from(*u).is_ok() => u.to_string(),
        ConstantValue::Unsigned(u) => format!("{u}UL"),
        ConstantValue::Float(f) if f.is_finite() => format!("{f:?}F"),
        ConstantValue::Float(f) => non_finite("float", f64::from(*f)),
        ConstantValue::Double(d) if d.is_finite() => format!("{d:?}"),
        ConstantValue::Double(d) => non_finite("double", *d),
        ConstantValue::Decimal(text) => format!("{}M", text.trim()),
        ConstantValue::Char(c) => char_literal(*c),
        ConstantValue::String(s) => string_literal(s),
        ConstantValue::Enum {
            type_name,
            member: Some(member),
            ..
        } => format!("{type_name}.{member}"),
        ConstantValue::Enum {
            type_name, value, ..
        } if *value < 0 => format!("({type_name})({value})"),
        ConstantValue::Enum {
            type_name, value, ..
        } => format!("({type_name}){value}"),
    }
}

fn non_finite(keyword: &str, value: f64) -> String {
    if value.is_nan() {
        format!("{keyword}.NaN")
    } else if value.is_sign_positive() {
        format!("{keyword}.PositiveInfinity")
    } else {
        format!("{keyword}.NegativeInfinity")
    }
}
