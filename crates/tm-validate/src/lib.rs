//! The Validator: Pass A structural validation and Pass B cross-form
//! consistency over a decoded [`Thing`] (spec §4.3).

pub mod affordances;
pub mod context;
pub mod cross_form;
pub mod data_schema;
pub mod forms;
pub mod links;
pub mod refs;
pub mod residual;
pub mod schema_definitions;
pub mod title;
pub mod topics;
pub mod type_ref;

use tm_diagnostics::Reporter;
use tm_model::Thing;

use crate::affordances::{validate_action, validate_event, validate_property};
use crate::context::validate_context;
use crate::cross_form::{validate_actions_have_topics, validate_containment, validate_events_cross_form, validate_properties_cross_form};
use crate::forms::{validate_forms, AffordanceKind};
use crate::links::validate_links;
use crate::residual::check_residual_properties;
use crate::schema_definitions::validate_schema_definitions;
use crate::title::{validate_title, validate_type};
use crate::type_ref::validate_type_ref;

const THING_KEYS: &[&str] = &[
    "@context",
    "@type",
    "title",
    "description",
    "links",
    "schemaDefinitions",
    "forms",
    "actions",
    "properties",
    "events",
    "isComposite",
    "isEvent",
    "typeRef",
];

/// Run Pass A, then (only if it succeeds) Pass B, over `thing`. Returns
/// whether the document is valid (spec §4.3: "If any [Pass A step] fails,
/// emit all collected errors and do not run Pass B").
pub fn validate(thing: &Thing, reporter: &mut Reporter) -> bool {
    tracing::debug!(title = %thing.title.value, "running Pass A");

    let context_result = validate_context(thing, reporter);
    let mut pass_a_ok = context_result.ok;
    pass_a_ok &= validate_type(thing, reporter);
    pass_a_ok &= validate_title(thing, reporter);
    // Composite/Event flags carry no constraint beyond their decode-time
    // boolean typing (spec is silent beyond that).
    pass_a_ok &= validate_type_ref(thing, reporter);
    pass_a_ok &= validate_links(thing, context_result.platform_context_present, reporter);
    pass_a_ok &= validate_schema_definitions(&thing.schema_definitions, reporter);
    pass_a_ok &= validate_forms(&thing.forms, root_forms_kind(thing), true, false, &thing.schema_definitions, reporter);

    {
        let file = reporter.file().to_string();
        let line = reporter.line_of(thing.offset);
        reporter.register_name_in_thing(thing.title.value.clone(), file, line);
    }

    for (name, action) in thing.actions.iter() {
        if !validate_action(name, action, &thing.schema_definitions, reporter) {
            tracing::debug!(action = name, "action failed structural validation");
            pass_a_ok = false;
        }
    }
    for (name, property) in thing.properties.iter() {
        if !validate_property(name, property, &thing.schema_definitions, reporter) {
            tracing::debug!(property = name, "property failed structural validation");
            pass_a_ok = false;
        }
    }
    for (name, event) in thing.events.iter() {
        if !validate_event(name, event, &thing.schema_definitions, reporter) {
            tracing::debug!(event = name, "event failed structural validation");
            pass_a_ok = false;
        }
    }

    check_residual_properties(&thing.property_map, THING_KEYS, reporter);

    if !pass_a_ok {
        return false;
    }

    tracing::debug!("running Pass B");
    validate_actions_have_topics(&thing.actions, reporter);
    validate_properties_cross_form(&thing.properties, &thing.forms, reporter);
    validate_events_cross_form(&thing.events, &thing.forms, reporter);
    validate_containment(
        thing.properties.iter().map(|(name, p)| (name, p.contains.as_ref(), p.contained_in.as_ref(), p.offset())),
        reporter,
    );
    validate_containment(
        thing.events.iter().map(|(name, e)| (name, e.contains.as_ref(), e.contained_in.as_ref(), e.offset)),
        reporter,
    );

    if thing.actions.is_empty() && thing.properties.is_empty() && thing.events.is_empty() {
        reporter.add_warning(tm_diagnostics::Condition::ElementMissing, "no actions, properties, or events", thing.offset);
    }

    !reporter.log().has_errors()
}

/// A root forms array can mix Property-effective and Event-effective
/// entries; this picks whichever kind the array's first aggregate op
/// implies, falling back to Property, purely so [`validate_forms`] has a
/// kind to check non-op attributes against — op-set checking itself is
/// still per-form.
fn root_forms_kind(thing: &Thing) -> AffordanceKind {
    let has_sub_all = thing.forms.iter().any(|f| f.op.as_ref().is_some_and(|ops| ops.iter().any(|o| o.value == tm_model::op::SUBSCRIBE_ALL_EVENTS)));
    if has_sub_all {
        AffordanceKind::Event
    } else {
        AffordanceKind::Property
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
    fn minimal_valid_thing_warns_but_is_valid() {
        let thing = thing_from(
            r#"{"@context":["https://www.w3.org/2022/wot/td/v1.1",{"dtv":"http://azure.com/DigitalTwins/dtmi#"}],"@type":"tm:ThingModel","title":"Lamp"}"#,
        );
        let mut reporter = Reporter::new("thing.json", "", "default");
        assert!(validate(&thing, &mut reporter));
        assert!(reporter.log().errors().is_empty());
        assert_eq!(reporter.log().warnings().len(), 1);
    }

    #[test]
    fn wrong_type_fails_pass_a_and_skips_pass_b() {
        let thing = thing_from(r#"{"@type":"wot:Thing","title":"Lamp"}"#);
        let mut reporter = Reporter::new("thing.json", "", "default");
        assert!(!validate(&thing, &mut reporter));
    }
}
