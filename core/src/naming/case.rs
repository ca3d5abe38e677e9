#![deny(missing_docs)]

//! # Case Conversion
//!
//! Helpers for converting between the wire naming convention (snake_case) and the
//! TypeScript conventions (camelCase fields, PascalCase declarations).

use regex::Regex;
use std::sync::OnceLock;

/// Converts camelCase / PascalCase to snake_case.
///
/// Every uppercase letter becomes `_` plus its lowercase form, including a
/// leading one: `HTMLElement` -> `_h_t_m_l_element`.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c.is_uppercase() {
            result.push('_');
            for lc in c.to_lowercase() {
                result.push(lc);
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Converts snake_case to camelCase.
///
/// A run of underscores followed by a lowercase letter collapses into that letter
/// uppercased, so `_snake_case` -> `SnakeCase` and
/// `some__double__underscore` -> `someDoubleUnderscore`.
pub fn to_camel_case(s: &str) -> String {
    static SEPARATOR_RE: OnceLock<Regex> = OnceLock::new();
    let separator_re =
        SEPARATOR_RE.get_or_init(|| Regex::new(r"_+([a-z])").expect("Invalid regex"));

    separator_re
        .replace_all(s, |caps: &regex::Captures| caps[1].to_uppercase())
        .into_owned()
}

/// Converts an arbitrary identifier into a PascalCase declaration name.
///
/// Segments are split on any non-alphanumeric character. An all-uppercase segment
/// is title-cased (`EXPERIMENTAL` -> `Experimental`); other segments only get
/// their first letter uppercased, so `RpcBlockRequest` is left untouched.
pub fn to_pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for segment in s.split(|c: char| !c.is_ascii_alphanumeric()) {
        if segment.is_empty() {
            continue;
        }
        let all_caps = segment.len() > 1
            && segment.chars().any(|c| c.is_ascii_alphabetic())
            && !segment.chars().any(|c| c.is_ascii_lowercase());
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            if all_caps {
                out.extend(chars.map(|c| c.to_ascii_lowercase()));
            } else {
                out.extend(chars);
            }
        }
    }
    out
}

/// Returns true if `s` is a valid TypeScript identifier (ASCII subset).
pub fn is_valid_identifier(s: &str) -> bool {
    static IDENT_RE: OnceLock<Regex> = OnceLock::new();
    let ident_re = IDENT_RE
        .get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("Invalid regex"));
    ident_re.is_match(s)
}

/// Coerces a string into a valid identifier.
///
/// Invalid characters are dropped, a leading digit gets a `_` prefix, and an
/// empty result becomes `_`.
pub fn sanitize_identifier(s: &str) -> String {
    let mut out: String = s
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect();
    if out.is_empty() {
        return "_".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Renders a wire property name as a TypeScript property key.
///
/// The name is converted to camelCase; keys that are still not identifiers
/// (e.g. `content-type`, `0`) are emitted as quoted strings.
pub fn property_key(wire: &str) -> String {
    let camel = to_camel_case(wire);
    if is_valid_identifier(&camel) {
        camel
    } else {
        quote(&camel)
    }
}

/// Quotes a string as a JSON (and therefore TypeScript) string literal.
pub fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
