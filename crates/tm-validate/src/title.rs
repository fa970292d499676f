//! Type and Title validation (spec §4.3.2).

use std::sync::OnceLock;

use regex::Regex;
use tm_diagnostics::{Condition, Reporter};
use tm_model::{Thing, THING_MODEL_TYPE};

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9_]*$").unwrap())
}

pub fn validate_type(thing: &Thing, reporter: &mut Reporter) -> bool {
    if thing.type_.value == THING_MODEL_TYPE {
        true
    } else {
        reporter.add_error(
            Condition::TypeMismatch,
            format!("'@type' must be '{THING_MODEL_TYPE}', found '{}'", thing.type_.value),
            thing.type_.offset,
        );
        false
    }
}

pub fn validate_title(thing: &Thing, reporter: &mut Reporter) -> bool {
    if title_pattern().is_match(&thing.title.value) {
        true
    } else {
        reporter.add_error(
            Condition::PropertyInvalid,
            format!(
                "title '{}' must start with an uppercase letter and contain only letters, digits, or underscores",
                thing.title.value
            ),
            thing.title.offset,
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_diagnostics::Reporter;
    use tm_json::{Decoder, JsonDecode};

    fn thing_from(src: &str) -> Thing {
        let mut dec = Decoder::new(src);
        dec.parse_document().unwrap()
    }

    #[test]
    fn rejects_wrong_type() {
        let thing = thing_from(r#"{"@type":"wot:Thing","title":"Lamp"}"#);
        let mut reporter = Reporter::new("thing.json", "", "default");
        assert!(!validate_type(&thing, &mut reporter));
    }

    #[test]
    fn rejects_lowercase_title() {
        let thing = thing_from(r#"{"@type":"tm:ThingModel","title":"lamp"}"#);
        let mut reporter = Reporter::new("thing.json", "", "default");
        assert!(!validate_title(&thing, &mut reporter));
    }

    #[test]
    fn accepts_valid_title() {
        let thing = thing_from(r#"{"@type":"tm:ThingModel","title":"Lamp_2"}"#);
        let mut reporter = Reporter::new("thing.json", "", "default");
        assert!(validate_title(&thing, &mut reporter));
    }
}
