//! Action/Property/Event structural validation (spec §3, §4.3.3, §4.3.5).

use tm_diagnostics::{Condition, Reporter};
use tm_json::MapTracker;
use tm_model::{op, Action, DataSchema, Event, Property, SchemaVariant};
use tm_names::{derive_schema_name, NamingPolicy};

use crate::data_schema::{validate_data_schema, SchemaSite};
use crate::forms::{validate_forms, AffordanceKind};

/// Register the generated name of an affordance's own embedded schema
/// (spec §4.3.2: title wins when present, else the fallback template
/// expands the affordance's own key via `CodeName`). These schemas live
/// directly in the Thing rather than `schemaDefinitions`, so they register
/// into the Thing namespace rather than a folder-scoped schema namespace.
fn register_affordance_schema_name(schema: &DataSchema, affordance_name: &str, fallback_template: &str, reporter: &mut Reporter) {
    let policy = NamingPolicy::default();
    let title = schema.title.as_ref().map(|t| t.value.as_str());
    let generated = derive_schema_name(&policy, affordance_name, title, fallback_template);
    let file = reporter.file().to_string();
    let line = reporter.line_of(schema.offset);
    reporter.register_name_in_thing(generated, file, line);
}

pub fn validate_action(name: &str, action: &Action, schema_definitions: &MapTracker<DataSchema>, reporter: &mut Reporter) -> bool {
    let mut ok = true;
    let policy = NamingPolicy::default();
    if let Some(input) = &action.input {
        ok &= validate_data_schema(input, SchemaSite::AffordanceRoot, reporter);
        register_affordance_schema_name(input, name, &policy.templates.action_in_schema, reporter);
    }
    if let Some(output) = &action.output {
        ok &= validate_data_schema(output, SchemaSite::AffordanceRoot, reporter);
        register_affordance_schema_name(output, name, &policy.templates.action_out_schema, reporter);
    }
    ok &= validate_forms(&action.forms, AffordanceKind::Action, false, false, schema_definitions, reporter);
    ok
}

pub fn validate_property(name: &str, property: &Property, schema_definitions: &MapTracker<DataSchema>, reporter: &mut Reporter) -> bool {
    let mut ok = validate_data_schema(&property.schema, SchemaSite::AffordanceRoot, reporter);

    if matches!(property.schema.variant, SchemaVariant::Null) {
        reporter.add_error(Condition::PropertyUnsupported, "a Property's schema may not be 'null'", property.offset());
        ok = false;
    }

    let is_read_only = property.read_only.as_ref().is_some_and(|r| r.value);
    let declares_write = property.forms.iter().any(|f| f.op.as_ref().is_some_and(|ops| ops.iter().any(|o| o.value == op::WRITE_PROPERTY)));
    if is_read_only && declares_write {
        reporter.add_error(
            Condition::ValuesInconsistent,
            "property is declared 'readOnly', but one of its forms has a 'writeproperty' op",
            property.offset(),
        );
        ok = false;
    }

    let policy = NamingPolicy::default();
    let template = if is_read_only { &policy.templates.prop_schema } else { &policy.templates.writable_prop_schema };
    register_affordance_schema_name(&property.schema, name, template, reporter);

    ok &= validate_forms(&property.forms, AffordanceKind::Property, false, is_read_only, schema_definitions, reporter);
    ok
}

pub fn validate_event(name: &str, event: &Event, schema_definitions: &MapTracker<DataSchema>, reporter: &mut Reporter) -> bool {
    let mut ok = true;
    let policy = NamingPolicy::default();
    if let Some(data) = &event.data {
        ok &= validate_data_schema(data, SchemaSite::AffordanceRoot, reporter);
        register_affordance_schema_name(data, name, &policy.templates.event_schema, reporter);
    }
    ok &= validate_forms(&event.forms, AffordanceKind::Event, false, false, schema_definitions, reporter);
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_json::{Decoder, JsonDecode};

    fn empty_schemas() -> MapTracker<DataSchema> {
        MapTracker::empty()
    }

    #[test]
    fn rejects_property_with_null_schema() {
        let mut dec = Decoder::new(r#"{"type":"null","forms":[]}"#);
        let prop: Property = dec.parse_document().unwrap();
        let mut reporter = Reporter::new("t.json", "", "default");
        assert!(!validate_property("p", &prop, &empty_schemas(), &mut reporter));
    }

    #[test]
    fn rejects_read_only_property_with_writeproperty_form() {
        let mut dec = Decoder::new(
            r#"{"type":"number","readOnly":true,"forms":[{"op":["writeproperty"],"topic":"dev/a","contentType":"application/json"}]}"#,
        );
        let prop: Property = dec.parse_document().unwrap();
        let mut reporter = Reporter::new("t.json", "", "default");
        assert!(!validate_property("p", &prop, &empty_schemas(), &mut reporter));
    }

    #[test]
    fn accepts_a_well_formed_action() {
        let mut dec = Decoder::new(r#"{"input":{"type":"number"},"forms":[{"op":["invokeaction"],"topic":"dev/a","contentType":"application/json"}]}"#);
        let action: Action = dec.parse_document().unwrap();
        let mut reporter = Reporter::new("t.json", "", "default");
        assert!(validate_action("a", &action, &empty_schemas(), &mut reporter));
    }

    #[test]
    fn accepts_a_well_formed_event() {
        let mut dec = Decoder::new(r#"{"data":{"type":"string"},"forms":[{"topic":"dev/e","contentType":"application/json"}]}"#);
        let event: Event = dec.parse_document().unwrap();
        let mut reporter = Reporter::new("t.json", "", "default");
        assert!(validate_event("e", &event, &empty_schemas(), &mut reporter));
    }
}
