//! Composite/Event flags and TypeRef validation (spec §3, §4.3).
//!
//! The flags themselves carry no constraints beyond their decode-time
//! boolean typing, so this step is really just TypeRef: when present, it
//! must obey the same `ref` grammar a schema-level `ref` does (spec §4.3.5
//! calls out that the two share a vocabulary).

use tm_diagnostics::{Condition, Reporter};
use tm_model::Thing;

use crate::refs::validate_ref;

pub fn validate_type_ref(thing: &Thing, reporter: &mut Reporter) -> bool {
    let Some(type_ref) = &thing.type_ref else {
        return true;
    };

    match validate_ref(&type_ref.value) {
        Ok(()) => true,
        Err(reason) => {
            reporter.add_error(Condition::PropertyInvalid, format!("'typeRef': {reason}"), type_ref.offset);
            false
        }
    }
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
    fn absent_type_ref_passes() {
        let thing = thing_from(r#"{"@type":"tm:ThingModel","title":"Lamp"}"#);
        let mut reporter = Reporter::new("thing.json", "", "default");
        assert!(validate_type_ref(&thing, &mut reporter));
    }

    #[test]
    fn well_formed_type_ref_passes() {
        let thing = thing_from(r#"{"@type":"tm:ThingModel","title":"Lamp","typeRef":"./base.json#/Foo"}"#);
        let mut reporter = Reporter::new("thing.json", "", "default");
        assert!(validate_type_ref(&thing, &mut reporter));
    }

    #[test]
    fn malformed_type_ref_is_an_error() {
        let thing = thing_from(r#"{"@type":"tm:ThingModel","title":"Lamp","typeRef":"#/Foo"}"#);
        let mut reporter = Reporter::new("thing.json", "", "default");
        assert!(!validate_type_ref(&thing, &mut reporter));
    }
}
