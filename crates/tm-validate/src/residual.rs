//! The residual-properties check shared by every JSON-object validator
//! (spec §4.3.5): any key not in a kind-specific allow-list is either
//! warned-and-ignored (colon-prefixed, unrecognized namespace) or an error.

use tm_diagnostics::{Condition, Reporter};
use tm_json::PropertyNameMap;

/// Namespace prefixes this implementation recognizes on a colon-prefixed
/// key (spec leaves the concrete set open; `ex:` — "extension" — is the
/// one example the spec's own Topic token rules name).
fn recognized_prefix(prefix: &str) -> bool {
    prefix == "ex"
}

pub fn check_residual_properties(property_map: &PropertyNameMap, known_keys: &[&str], reporter: &mut Reporter) {
    for key in property_map.keys() {
        if known_keys.contains(&key) {
            continue;
        }
        let offset = match property_map.offset_of(key) {
            Some(o) => o,
            None => continue,
        };
        if let Some(colon) = key.find(':') {
            if recognized_prefix(&key[..colon]) {
                continue;
            }
            reporter.add_warning(Condition::PropertyUnsupported, format!("unrecognized key '{key}' ignored"), offset);
            continue;
        }
        reporter.add_error(Condition::PropertyUnsupported, format!("unrecognized key '{key}'"), offset);
    }
}
