//! Context validation (spec §4.3.1).

use tm_diagnostics::{Condition, Reporter};
use tm_model::{ContextSpecifier, Thing, PLATFORM_CONTEXT_URI, PROTOCOL_CONTEXT_URI, WOT_TD_V11_CONTEXT_URI};

/// The outcome of Context validation: whether it passed, and whether a
/// platform-context entry was present (spec: "recorded as a boolean used
/// by dozens of downstream checks").
pub struct ContextResult {
    pub ok: bool,
    pub platform_context_present: bool,
}

pub fn validate_context(thing: &Thing, reporter: &mut Reporter) -> ContextResult {
    let mut found_remote = false;
    let mut found_protocol = false;
    let mut found_platform = false;

    for entry in &thing.context {
        match entry {
            ContextSpecifier::Remote(uri) => {
                if uri.value == WOT_TD_V11_CONTEXT_URI {
                    found_remote = true;
                } else {
                    reporter.add_warning(
                        Condition::PropertyUnsupportedValue,
                        format!("unrecognized remote context URI '{}'", uri.value),
                        uri.offset,
                    );
                }
            }
            ContextSpecifier::Local(map) => {
                for (_prefix, uri) in map.iter() {
                    if uri.value == PROTOCOL_CONTEXT_URI {
                        found_protocol = true;
                    } else if uri.value == PLATFORM_CONTEXT_URI {
                        found_platform = true;
                    }
                }
            }
        }
    }

    let mut ok = true;
    if !found_remote {
        reporter.add_error(
            Condition::ElementMissing,
            format!("missing the required '{WOT_TD_V11_CONTEXT_URI}' context entry"),
            thing.context.offset,
        );
        ok = false;
    }
    if !found_protocol {
        reporter.add_error(Condition::ElementMissing, "missing the required protocol context entry", thing.context.offset);
        ok = false;
    }

    ContextResult { ok, platform_context_present: found_platform }
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
    fn accepts_the_minimal_valid_context() {
        let thing = thing_from(
            r#"{"@context":["https://www.w3.org/2022/wot/td/v1.1",{"dtv":"http://azure.com/DigitalTwins/dtmi#"}],"@type":"tm:ThingModel","title":"Lamp"}"#,
        );
        let mut reporter = Reporter::new("thing.json", "", "default");
        let result = validate_context(&thing, &mut reporter);
        assert!(result.ok);
        assert!(!result.platform_context_present);
        assert!(reporter.log().errors().is_empty());
    }

    #[test]
    fn missing_protocol_prefix_is_an_error() {
        let thing = thing_from(r#"{"@context":["https://www.w3.org/2022/wot/td/v1.1"],"@type":"tm:ThingModel","title":"Lamp"}"#);
        let mut reporter = Reporter::new("thing.json", "", "default");
        let result = validate_context(&thing, &mut reporter);
        assert!(!result.ok);
        assert_eq!(reporter.log().errors().len(), 1);
    }

    #[test]
    fn missing_context_entirely_reports_both_errors() {
        let thing = thing_from(r#"{"@type":"tm:ThingModel","title":"Lamp"}"#);
        let mut reporter = Reporter::new("thing.json", "", "default");
        let result = validate_context(&thing, &mut reporter);
        assert!(!result.ok);
        assert_eq!(reporter.log().errors().len(), 2);
    }

    #[test]
    fn platform_context_is_recorded_when_present() {
        let thing = thing_from(&format!(
            r#"{{"@context":["https://www.w3.org/2022/wot/td/v1.1",{{"dtv":"{}","plat":"{}"}}],"@type":"tm:ThingModel","title":"Lamp"}}"#,
            PROTOCOL_CONTEXT_URI, PLATFORM_CONTEXT_URI
        ));
        let mut reporter = Reporter::new("thing.json", "", "default");
        let result = validate_context(&thing, &mut reporter);
        assert!(result.ok);
        assert!(result.platform_context_present);
    }
}
