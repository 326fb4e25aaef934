//! Name transformations shared by discovery and emission.

/// Reserved words of the emitted language.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Lower-case the first character; everything else is kept.
///
/// ```ignore
/// assert_eq!(camel_case("PageNumber"), "pageNumber");
/// assert_eq!(camel_case("pageSize"), "pageSize");
/// ```
pub fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strip `suffix` (ASCII case-insensitive) unless that would leave nothing.
pub fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() || name.len() <= suffix.len() {
        return name;
    }
    let split = name.len() - suffix.len();
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(tail)) if tail.eq_ignore_ascii_case(suffix) => stem,
        _ => name,
    }
}

/// Strip `suffix` (exact case) unless that would leave nothing.
pub fn strip_suffix_exact<'a>(name: &'a str, suffix: &str) -> &'a str {
    match name.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() && !suffix.is_empty() => stem,
        _ => name,
    }
}

/// Make an arbitrary string a valid identifier: invalid characters become
/// `_` and a leading digit gets a `_` prefix.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Identifier usable as a parameter or local name.
pub fn parameter_identifier(name: &str) -> String {
    let sanitized = sanitize_identifier(name);
    if is_keyword(&sanitized) {
        format!("@{sanitized}")
    } else {
        sanitized
    }
}
