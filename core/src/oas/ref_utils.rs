#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for turning `$ref` strings into component names and for
//! building the JSON Pointers used in error messages.
//!
//! Only local references (`#/components/...`) are supported; the generator never
//! fetches external documents.

use percent_encoding::percent_decode_str;

/// Extracts a component name from a `$ref` if it points to `#/components/{section}/{name}`.
///
/// Returns `None` for external references, other sections, or deeper pointers
/// (e.g. `#/components/schemas/User/properties/id`).
pub(crate) fn extract_component_name(ref_str: &str, section: &str) -> Option<String> {
    let pointer = ref_str.strip_prefix("#/")?;
    let segments: Vec<&str> = pointer.split('/').collect();

    if segments.len() != 3 {
        return None;
    }
    if segments[0] != "components" || segments[1] != section {
        return None;
    }

    let name = decode_pointer_segment(segments[2]);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Encodes a single key as a JSON Pointer segment.
pub(crate) fn encode_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Appends a key to a JSON Pointer.
pub(crate) fn join_pointer(base: &str, segment: &str) -> String {
    format!("{}/{}", base, encode_pointer_segment(segment))
}

/// Pointer of a named schema under `components/schemas`.
pub(crate) fn schema_pointer(name: &str) -> String {
    join_pointer("#/components/schemas", name)
}
