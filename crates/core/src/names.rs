//! Identifier spelling.
//!
//! Every IR name has an idiomatic TypeScript spelling (PascalCase types,
//! camelCase members) and a wire spelling (the raw IR name). The helpers here
//! are the only place those rules live.

use std::collections::HashSet;
use std::sync::LazyLock;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase};

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
    ]
    .into_iter()
    .collect()
});

/// Check if an identifier needs bracket notation (or quoting) for property/key access.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in a single-quoted TypeScript string literal.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

/// Quote a property key if it is not a valid identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_bracket_notation(name) {
        format!("'{}'", escape_js_string(name))
    } else {
        name.to_string()
    }
}

/// Make `name` usable as a local binding: camelCase, no leading digit, no
/// reserved word.
pub fn sanitize_ts_identifier(name: &str) -> String {
    let mut result = name.to_lower_camel_case();
    if result.is_empty() {
        return "_empty".to_string();
    }
    if result.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result = format!("_{result}");
    }
    if TS_RESERVED_WORDS.contains(result.as_str()) {
        result = format!("_{result}");
    }
    result
}

/// Internal type name: `widget_part` -> `WidgetPart`.
pub fn type_name(raw: &str) -> String {
    raw.to_pascal_case()
}

/// Wire type name: `widget_part` -> `WidgetPartDto`.
pub fn dto_name(raw: &str) -> String {
    format!("{}Dto", type_name(raw))
}

/// Internal property name: `created_at` -> `createdAt`.
pub fn property_name(raw: &str) -> String {
    let name = raw.to_lower_camel_case();
    if name.is_empty() {
        raw.to_string()
    } else {
        name
    }
}

/// Wire property name: the IR spelling, untouched.
pub fn wire_property_name(raw: &str) -> &str {
    raw
}

/// Mapper converting the wire shape into the internal one.
pub fn map_from_dto(raw: &str) -> String {
    format!("mapFrom{}Dto", type_name(raw))
}

/// Mapper converting the internal shape into the wire one.
pub fn map_to_dto(raw: &str) -> String {
    format!("mapTo{}Dto", type_name(raw))
}

/// Service interface name: `widgets` + `Service` -> `WidgetsService`.
pub fn interface_name(raw: &str, nomenclature: &str) -> String {
    format!("{}{}", type_name(raw), nomenclature)
}

/// Method name as it appears on a service interface.
pub fn method_name(raw: &str) -> String {
    sanitize_ts_identifier(raw)
}

/// Express handler factory for a method: `get_widget` -> `handleGetWidget`.
pub fn handler_name(raw: &str) -> String {
    format!("handle{}", raw.to_pascal_case())
}

/// Directory / file-friendly form of a title: `Widget Store` -> `widget-store`.
pub fn kebab(raw: &str) -> String {
    raw.to_kebab_case()
}

/// Local binding for `raw` not yet in `used`: `id`, then `id2`, `id3`, ...
pub fn unique_local(raw: &str, used: &mut HashSet<String>) -> String {
    let base = sanitize_ts_identifier(&property_name(raw));
    let mut local = base.clone();
    let mut n = 2;
    while used.contains(&local) {
        local = format!("{base}{n}");
        n += 1;
    }
    used.insert(local.clone());
    local
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_bracket_notation() {
        // Valid identifiers
        assert!(!needs_bracket_notation("foo"));
        assert!(!needs_bracket_notation("_foo"));
        assert!(!needs_bracket_notation("$foo"));
        assert!(!needs_bracket_notation("foo123"));
        assert!(!needs_bracket_notation("camelCase"));

        // Need bracket notation
        assert!(needs_bracket_notation(""));
        assert!(needs_bracket_notation("123foo"));
        assert!(needs_bracket_notation("foo-bar"));
        assert!(needs_bracket_notation("foo.bar"));
        assert!(needs_bracket_notation("foo bar"));
    }

    #[test]
    fn test_escape_js_string() {
        assert_eq!(escape_js_string("hello"), "hello");
        assert_eq!(escape_js_string("it's"), "it\\'s");
        assert_eq!(escape_js_string("a\\b"), "a\\\\b");
        assert_eq!(escape_js_string("say \"hi\""), "say \"hi\"");
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("foo"), "foo");
        assert_eq!(quote_if_needed("foo-bar"), "'foo-bar'");
        assert_eq!(quote_if_needed("123"), "'123'");
    }

    #[test]
    fn test_sanitize_ts_identifier() {
        assert_eq!(sanitize_ts_identifier("foo"), "foo");
        assert_eq!(sanitize_ts_identifier("foo-bar"), "fooBar");
        assert_eq!(sanitize_ts_identifier("foo.bar"), "fooBar");
        assert_eq!(sanitize_ts_identifier("123foo"), "_123foo");
        assert_eq!(sanitize_ts_identifier("delete"), "_delete");
        assert_eq!(sanitize_ts_identifier("class"), "_class");
    }

    #[test]
    fn test_type_and_dto_names() {
        assert_eq!(type_name("widget_part"), "WidgetPart");
        assert_eq!(type_name("typeA"), "TypeA");
        assert_eq!(dto_name("widget"), "WidgetDto");
        assert_eq!(map_from_dto("typeA"), "mapFromTypeADto");
        assert_eq!(map_to_dto("typeA"), "mapToTypeADto");
    }

    #[test]
    fn test_member_names() {
        assert_eq!(property_name("created_at"), "createdAt");
        assert_eq!(property_name("propA"), "propA");
        assert_eq!(wire_property_name("created_at"), "created_at");
        assert_eq!(handler_name("get_widget"), "handleGetWidget");
        assert_eq!(method_name("get_widget"), "getWidget");
        assert_eq!(interface_name("widgets", "Service"), "WidgetsService");
        assert_eq!(kebab("Widget Store"), "widget-store");
    }

    #[test]
    fn test_unique_local() {
        let mut used: HashSet<String> = ["dto".to_string()].into_iter().collect();
        assert_eq!(unique_local("created_at", &mut used), "createdAt");
        assert_eq!(unique_local("createdAt", &mut used), "createdAt2");
        assert_eq!(unique_local("dto", &mut used), "dto2");
        assert_eq!(unique_local("class", &mut used), "_class");
    }
}
