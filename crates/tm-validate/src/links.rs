//! Link validation (spec §3 Link).

use tm_diagnostics::{Condition, Reporter};
use tm_model::{Thing, REL_VALUES};

/// The Type value required for the non-`schemaNaming` Rel vocabulary.
pub const TM_JSON_MIME: &str = "application/tm+json";
/// The Type value required for `schemaNaming` links.
pub const JSON_MIME: &str = "application/json";

fn required_type_for_rel(rel: &str) -> Option<&'static str> {
    match rel {
        "extends" | "reference" | "typedReference" | "capability" | "component" => Some(TM_JSON_MIME),
        "schemaNaming" => Some(JSON_MIME),
        _ => None,
    }
}

pub fn validate_links(thing: &Thing, platform_context_present: bool, reporter: &mut Reporter) -> bool {
    let mut ok = true;
    let mut schema_naming_count = 0;

    for link in &thing.links {
        if !REL_VALUES.contains(&link.rel.value.as_str()) {
            reporter.add_error(
                Condition::PropertyUnsupportedValue,
                format!("unrecognized link rel '{}'", link.rel.value),
                link.rel.offset,
            );
            ok = false;
        }

        if link.href.value.is_empty() {
            reporter.add_error(Condition::PropertyEmpty, "link 'href' must not be empty", link.href.offset);
            ok = false;
        }

        if let Some(expected) = required_type_for_rel(&link.rel.value) {
            if link.type_.value != expected {
                reporter.add_error(
                    Condition::PropertyInvalid,
                    format!("link with rel '{}' must have type '{expected}'", link.rel.value),
                    link.type_.offset,
                );
                ok = false;
            }
        }

        let is_typed_reference = link.rel.value == "typedReference";
        if is_typed_reference && link.ref_type.is_none() {
            reporter.add_error(Condition::PropertyMissing, "link with rel 'typedReference' must have 'refType'", link.offset);
            ok = false;
        }
        if !is_typed_reference && link.ref_type.is_some() {
            reporter.add_error(Condition::PropertyUnsupported, "'refType' is only permitted on rel 'typedReference' links", link.offset);
            ok = false;
        }

        if link.rel.value.starts_with("platform:") && !platform_context_present {
            reporter.add_error(
                Condition::PropertyUnsupported,
                format!("link rel '{}' requires the platform context", link.rel.value),
                link.rel.offset,
            );
            ok = false;
        }

        if link.rel.value == "schemaNaming" {
            schema_naming_count += 1;
        }
    }

    if schema_naming_count > 1 {
        reporter.add_error(Condition::ElementsPlural, "at most one link with rel 'schemaNaming' is permitted", thing.links.offset);
        ok = false;
    }

    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_json::{Decoder, JsonDecode};

    fn thing_from(src: &str) -> Thing {
        let mut dec = Decoder::new(src);
        dec.parse_document().unwrap()
    }

    #[test]
    fn accepts_a_well_formed_extends_link() {
        let thing = thing_from(
            r#"{"@type":"tm:ThingModel","title":"Lamp","links":[{"rel":"extends","href":"./base.json","type":"application/tm+json"}]}"#,
        );
        let mut reporter = Reporter::new("thing.json", "", "default");
        assert!(validate_links(&thing, false, &mut reporter));
    }

    #[test]
    fn rejects_unrecognized_rel() {
        let thing = thing_from(r#"{"@type":"tm:ThingModel","title":"Lamp","links":[{"rel":"bogus","href":"x","type":"application/json"}]}"#);
        let mut reporter = Reporter::new("thing.json", "", "default");
        assert!(!validate_links(&thing, false, &mut reporter));
    }

    #[test]
    fn typed_reference_without_ref_type_is_an_error() {
        let thing = thing_from(
            r#"{"@type":"tm:ThingModel","title":"Lamp","links":[{"rel":"typedReference","href":"x","type":"application/tm+json"}]}"#,
        );
        let mut reporter = Reporter::new("thing.json", "", "default");
        assert!(!validate_links(&thing, false, &mut reporter));
    }

    #[test]
    fn more_than_one_schema_naming_link_is_an_error() {
        let thing = thing_from(
            r#"{"@type":"tm:ThingModel","title":"Lamp","links":[
                {"rel":"schemaNaming","href":"a","type":"application/json"},
                {"rel":"schemaNaming","href":"b","type":"application/json"}
            ]}"#,
        );
        let mut reporter = Reporter::new("thing.json", "", "default");
        assert!(!validate_links(&thing, false, &mut reporter));
    }
}
