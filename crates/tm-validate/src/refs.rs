//! Shared `ref` value grammar (spec §4.3.5), used for `DataSchema::ref_`
//! and `Thing::type_ref`, which share the same reference vocabulary.

use std::sync::OnceLock;

use regex::Regex;

fn ref_char_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(?:[!#$&-;=?\[\]_a-z~]|%[0-9A-Fa-f]{2})*$").unwrap())
}

/// Validate a `ref` string per spec §4.3.5. Returns the violation message
/// on failure.
pub fn validate_ref(value: &str) -> Result<(), String> {
    if value.starts_with('#') {
        return Err("ref must not start with '#'".to_string());
    }
    if !ref_char_pattern().is_match(value) {
        return Err(format!("ref '{value}' contains characters outside the allowed set"));
    }

    let hash_pos = value.find('#');
    let slash_pos = value.find('/');
    let has_path_before_hash = match (slash_pos, hash_pos) {
        (Some(s), Some(h)) => s < h,
        (Some(_), None) => true,
        (None, _) => false,
    };
    if has_path_before_hash && !(value.starts_with("./") || value.starts_with("../")) {
        return Err("ref with a path segment must start with './' or '../'".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_hash_prefix() {
        assert!(validate_ref("#/definitions/Foo").is_err());
    }

    #[test]
    fn accepts_relative_path() {
        assert!(validate_ref("./other.json#/Foo").is_ok());
        assert!(validate_ref("../other.json#/Foo").is_ok());
    }

    #[test]
    fn rejects_bare_path_with_slash() {
        assert!(validate_ref("other.json#/Foo").is_err());
    }

    #[test]
    fn accepts_fragment_only_reference() {
        assert!(validate_ref("Foo").is_ok());
    }

    #[test]
    fn rejects_disallowed_characters() {
        assert!(validate_ref("foo bar").is_err());
    }
}
