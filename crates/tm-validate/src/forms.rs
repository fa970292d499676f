//! Form validation (spec §4.3.3).

use std::collections::HashSet;

use tm_diagnostics::{Condition, Reporter};
use tm_json::{ArrayTracker, MapTracker, Tracked};
use tm_model::{op, DataSchema, Form, SchemaReference};

use crate::topics::{property_topics_to_register, root_effective_kind, validate_topic, EffectiveKind};

/// Which affordance a `Form` array belongs to, which determines its closed
/// Op vocabulary and which of the header/response attributes it may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffordanceKind {
    Action,
    Property,
    Event,
}

fn allowed_ops(kind: AffordanceKind, is_root: bool) -> &'static [&'static str] {
    match (kind, is_root) {
        (AffordanceKind::Action, _) => &[op::INVOKE_ACTION],
        (AffordanceKind::Property, false) => &[op::READ_PROPERTY, op::WRITE_PROPERTY],
        (AffordanceKind::Property, true) => &[op::READ_ALL_PROPERTIES, op::WRITE_MULTIPLE_PROPERTIES],
        (AffordanceKind::Event, false) => &[op::SUBSCRIBE_EVENT],
        (AffordanceKind::Event, true) => &[op::SUBSCRIBE_ALL_EVENTS],
    }
}

/// Content types a form may declare, by kind (spec §4.3.3): Property and
/// Root forms require JSON; Action and Event forms admit JSON/Raw/Custom.
fn content_type_allowed(kind: AffordanceKind, is_root: bool, content_type: &str) -> bool {
    let is_json = content_type == "application/json";
    if is_root || kind == AffordanceKind::Property {
        is_json
    } else {
        is_json || content_type == "application/octet-stream" || content_type.is_empty()
    }
}

pub fn validate_forms(
    forms: &ArrayTracker<Form>,
    kind: AffordanceKind,
    is_root: bool,
    is_read_only: bool,
    schema_definitions: &MapTracker<DataSchema>,
    reporter: &mut Reporter,
) -> bool {
    let mut ok = true;
    let mut seen_ops: HashSet<String> = HashSet::new();
    let mut content_types: HashSet<String> = HashSet::new();

    let has_aggregate_op = forms.iter().any(|f| {
        f.op.as_ref().is_some_and(|ops| ops.iter().any(|o| o.value == op::READ_ALL_PROPERTIES || o.value == op::WRITE_MULTIPLE_PROPERTIES))
    });

    if forms.len() > 1 {
        for form in forms {
            if form.op.is_none() {
                reporter.add_error(
                    Condition::PropertyMissing,
                    "a form with no 'op' is only permitted when it's the sole entry in the array",
                    form.offset,
                );
                ok = false;
            }
        }
    }

    for form in forms {
        if form.op.is_none() && form.topic.is_none() {
            reporter.add_error(Condition::PropertyMissing, "a form must declare 'op', 'topic', or both", form.offset);
            ok = false;
        }

        if form.topic.is_some() && form.content_type.is_none() {
            reporter.add_error(Condition::PropertyMissing, "'contentType' is required whenever 'topic' is present", form.offset);
            ok = false;
        }

        let content_type = form.content_type.as_ref().map(|t| t.value.as_str()).unwrap_or("");
        content_types.insert(content_type.to_string());
        if form.content_type.is_some() && !content_type_allowed(kind, is_root, content_type) {
            reporter.add_error(
                Condition::PropertyUnsupportedValue,
                format!("contentType '{content_type}' is not permitted on this kind of form"),
                form.content_type.as_ref().unwrap().offset,
            );
            ok = false;
        }

        if let Some(ops) = &form.op {
            let allowed = allowed_ops(kind, is_root);
            for value in ops {
                if !allowed.contains(&value.value.as_str()) {
                    reporter.add_error(
                        Condition::PropertyUnsupportedValue,
                        format!("op '{}' is not permitted on this kind of form", value.value),
                        value.offset,
                    );
                    ok = false;
                }
                if !seen_ops.insert(value.value.clone()) {
                    reporter.add_error(Condition::Duplication, format!("op '{}' is declared more than once across this array's forms", value.value), value.offset);
                    ok = false;
                }
            }
        }

        if let Some(topic) = &form.topic {
            let form_ops: Vec<String> = form.op.iter().flat_map(|ops| ops.iter().map(|o| o.value.clone())).collect();
            let effective_kind = if is_root {
                root_effective_kind(&form_ops)
            } else {
                match kind {
                    AffordanceKind::Action => EffectiveKind::Action,
                    AffordanceKind::Property => EffectiveKind::Property,
                    AffordanceKind::Event => EffectiveKind::Event,
                }
            };
            if !validate_topic(&topic.value, effective_kind, topic.offset, reporter) {
                ok = false;
            }

            let file = reporter.file().to_string();
            let line = reporter.line_of(topic.offset);
            if kind == AffordanceKind::Property && !is_root {
                let has_read = form_ops.iter().any(|o| o == op::READ_PROPERTY);
                let has_write = form_ops.iter().any(|o| o == op::WRITE_PROPERTY);
                for resolved in property_topics_to_register(&topic.value, has_read, has_write, is_read_only, topic.offset, reporter) {
                    reporter.register_topic_in_thing(resolved, file.clone(), line, topic.value.clone());
                }
            } else {
                reporter.register_topic_in_thing(topic.value.clone(), file, line, topic.value.clone());
            }
        }

        let is_root_sub_all = is_root && kind == AffordanceKind::Event;
        if form.service_group_id.is_some() && kind == AffordanceKind::Property {
            reporter.add_error(Condition::PropertyUnsupported, "'serviceGroupId' is never permitted on Property forms", form.offset);
            ok = false;
        }
        if form.service_group_id.is_some() && is_root && !is_root_sub_all {
            reporter.add_error(Condition::PropertyUnsupported, "'serviceGroupId' is only permitted on root sub-all forms and Action/Event forms", form.offset);
            ok = false;
        }

        if let Some(additional) = &form.additional_responses {
            if kind == AffordanceKind::Event || (is_root && !has_aggregate_op) {
                reporter.add_error(Condition::PropertyUnsupported, "'additionalResponses' is not permitted on this kind of form", form.offset);
                ok = false;
            }
            if additional.len() > 1 {
                reporter.add_error(Condition::ElementsPlural, "'additionalResponses' may have at most one entry", additional.offset);
                ok = false;
            }
            for entry in additional {
                if !references_structured_object(entry, schema_definitions) {
                    reporter.add_error(
                        Condition::TypeMismatch,
                        format!("'additionalResponses' entry '{}' must reference a structured-object schema", entry.ref_.value),
                        entry.ref_.offset,
                    );
                    ok = false;
                }
            }
        }

        if form.header_code.is_some() && kind != AffordanceKind::Action {
            reporter.add_error(Condition::PropertyUnsupported, "'headerCode' is only permitted on Action forms", form.offset);
            ok = false;
        }
        if let Some(header_code) = &form.header_code {
            if !references_string_enum(header_code, schema_definitions) {
                reporter.add_error(
                    Condition::TypeMismatch,
                    format!("'headerCode' must reference a string-enum schema, found '{}'", header_code.value),
                    header_code.offset,
                );
                ok = false;
            }
        }
        if form.header_info.is_some() && kind != AffordanceKind::Action {
            reporter.add_error(Condition::PropertyUnsupported, "'headerInfo' is only permitted on Action forms", form.offset);
            ok = false;
        }
    }

    if content_types.len() > 1 {
        reporter.add_error(Condition::ValuesInconsistent, "all forms in this array must agree on 'contentType'", forms.offset);
        ok = false;
    }

    if is_root && kind == AffordanceKind::Property {
        let has_read_all = seen_ops.contains(op::READ_ALL_PROPERTIES);
        let has_write_multi = seen_ops.contains(op::WRITE_MULTIPLE_PROPERTIES);
        if has_read_all && has_write_multi {
            reporter.add_error(Condition::ValuesInconsistent, "'readAllProperties' and 'writeMultipleProperties' cannot coexist at the root level", forms.offset);
            ok = false;
        }
    }

    ok
}

fn references_string_enum(ref_name: &Tracked<String>, schema_definitions: &MapTracker<DataSchema>) -> bool {
    let key = ref_name.value.trim_start_matches('#').trim_start_matches('/');
    schema_definitions.get(key).is_some_and(DataSchema::is_string_enum)
}

fn references_structured_object(entry: &SchemaReference, schema_definitions: &MapTracker<DataSchema>) -> bool {
    let key = entry.ref_.value.trim_start_matches('#').trim_start_matches('/');
    schema_definitions.get(key).is_some_and(DataSchema::is_structured_object)
}
