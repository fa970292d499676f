//! Pass B cross-form consistency (spec §4.3.6).

use std::collections::{HashMap, HashSet};

use tm_diagnostics::{Condition, Reporter};
use tm_json::{ArrayTracker, MapTracker};
use tm_model::{op, Action, Event, Form, Property};

fn has_topic(forms: &ArrayTracker<Form>) -> bool {
    forms.iter().any(|f| f.topic.is_some())
}

fn has_op(forms: &ArrayTracker<Form>, value: &str) -> bool {
    forms.iter().any(|f| f.op.as_ref().is_some_and(|ops| ops.iter().any(|o| o.value == value)))
}

/// Every Action needs at least one form with a Topic.
pub fn validate_actions_have_topics(actions: &MapTracker<Action>, reporter: &mut Reporter) {
    for (name, action) in actions.iter() {
        if !has_topic(&action.forms) {
            reporter.add_error(Condition::ElementMissing, format!("action '{name}' has no form with a 'topic'"), action.offset);
        }
    }
}

/// Root read-all/write-multi consistency, and per-Property aggregate-form
/// fallback, per spec §4.3.6.
pub fn validate_properties_cross_form(properties: &MapTracker<Property>, root_forms: &ArrayTracker<Form>, reporter: &mut Reporter) {
    let root_read_all = has_op(root_forms, op::READ_ALL_PROPERTIES);
    let root_write_multi = has_op(root_forms, op::WRITE_MULTIPLE_PROPERTIES);

    if root_read_all {
        let any_readable_with_responses = properties.iter().any(|(_, p)| {
            has_op(&p.forms, op::READ_PROPERTY) && p.forms.iter().any(|f| f.additional_responses.is_some())
        });
        if !any_readable_with_responses {
            reporter.add_warning(
                Condition::Unusable,
                "root 'readAllProperties' is declared, but no property has both a readable form and 'additionalResponses'",
                root_forms.offset,
            );
        }
    }

    if root_write_multi {
        let any_writable = properties.iter().any(|(_, p)| has_op(&p.forms, op::WRITE_PROPERTY) && !p.read_only.as_ref().is_some_and(|r| r.value));
        if !any_writable {
            reporter.add_error(Condition::Unusable, "root 'writeMultipleProperties' is declared, but no writable property exists", root_forms.offset);
        }
    }

    for (name, property) in properties.iter() {
        if has_topic(&property.forms) {
            continue;
        }
        let read_only = property.read_only.as_ref().is_some_and(|r| r.value);
        let covered = if read_only { root_read_all } else { root_read_all || root_write_multi };
        if !covered {
            reporter.add_error_with_cross_reference(
                Condition::Unusable,
                format!("property '{name}' has no topical form and no matching root aggregate form covers it"),
                property.offset(),
                root_forms.offset,
                "forms",
            );
        }
    }
}

/// Either a root sub-all form exists, or every Event has a topical form.
pub fn validate_events_cross_form(events: &MapTracker<Event>, root_forms: &ArrayTracker<Form>, reporter: &mut Reporter) {
    if has_op(root_forms, op::SUBSCRIBE_ALL_EVENTS) {
        return;
    }
    for (name, event) in events.iter() {
        if !has_topic(&event.forms) {
            reporter.add_error(Condition::Unusable, format!("event '{name}' has no topical form, and no root 'subscribeAllEvents' form exists"), event.offset);
        }
    }
}

/// The containment graph (Property/Event `contains`/`containedIn`) must be
/// acyclic and mutually consistent (spec §4.3.6): for each `A contains B`,
/// `B` must exist, and if `B` declares `containedIn` it must name `A`;
/// conversely for each `B containedIn A`, `A` must exist and list `B` in
/// its `contains`.
pub fn validate_containment<'a>(
    names_and_contains: impl Iterator<Item = (&'a str, Option<&'a ArrayTracker<tm_json::Tracked<String>>>, Option<&'a tm_json::Tracked<String>>, tm_json::Offset)>,
    reporter: &mut Reporter,
) {
    let entries: Vec<_> = names_and_contains.collect();
    let all_names: HashSet<&str> = entries.iter().map(|(name, ..)| *name).collect();
    let contains_map: HashMap<&str, HashSet<&str>> = entries
        .iter()
        .filter_map(|(name, contains, _, _)| contains.map(|c| (*name, c.iter().map(|t| t.value.as_str()).collect())))
        .collect();
    let contained_in_map: HashMap<&str, &str> = entries
        .iter()
        .filter_map(|(name, _, contained_in, _)| contained_in.map(|c| (*name, c.value.as_str())))
        .collect();

    for (name, contains, _, offset) in &entries {
        let Some(contains) = contains else { continue };
        for child in contains.iter() {
            let child = child.value.as_str();
            if !all_names.contains(child) {
                reporter.add_error(Condition::ItemNotFound, format!("'{name}' lists '{child}' in 'contains', which does not exist"), *offset);
                continue;
            }
            if let Some(&back) = contained_in_map.get(child) {
                if back != *name {
                    reporter.add_error(
                        Condition::ValuesInconsistent,
                        format!("'{name}' lists '{child}' in 'contains', but '{child}' names '{back}' in 'containedIn'"),
                        *offset,
                    );
                }
            }
        }
    }

    for (name, _, contained_in, offset) in &entries {
        let Some(contained_in) = contained_in else { continue };
        let parent = contained_in.value.as_str();
        if !all_names.contains(parent) {
            reporter.add_error(Condition::ItemNotFound, format!("'{name}' names '{parent}' in 'containedIn', which does not exist"), *offset);
            continue;
        }
        if !contains_map.get(parent).is_some_and(|children| children.contains(*name)) {
            reporter.add_error(
                Condition::ValuesInconsistent,
                format!("'{name}' names '{parent}' in 'containedIn', but '{parent}' does not list it in 'contains'"),
                *offset,
            );
        }
    }

    let mut visited = HashSet::new();
    for (name, _, _, offset) in &entries {
        if visited.contains(name) {
            continue;
        }
        let mut path = vec![*name];
        let mut current = *name;
        while let Some(&next) = contained_in_map.get(current) {
            if path.contains(&next) {
                reporter.add_error(Condition::ValuesInconsistent, format!("containment cycle detected involving '{next}'"), *offset);
                break;
            }
            path.push(next);
            current = next;
        }
        visited.extend(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_json::{Decoder, JsonDecode};

    fn actions_from(src: &str) -> MapTracker<Action> {
        let mut dec = Decoder::new(src);
        dec.decode_map().unwrap()
    }

    #[test]
    fn flags_action_without_topic() {
        let actions = actions_from(r#"{"reboot":{"forms":[{"op":["invokeaction"]}]}}"#);
        let mut reporter = Reporter::new("t.json", "", "default");
        validate_actions_have_topics(&actions, &mut reporter);
        assert_eq!(reporter.log().errors().len(), 1);
    }

    #[test]
    fn accepts_action_with_topic() {
        let actions = actions_from(r#"{"reboot":{"forms":[{"op":["invokeaction"],"topic":"dev/reboot","contentType":"application/json"}]}}"#);
        let mut reporter = Reporter::new("t.json", "", "default");
        validate_actions_have_topics(&actions, &mut reporter);
        assert!(reporter.log().errors().is_empty());
    }

    fn tracked(value: &str) -> tm_json::Tracked<String> {
        tm_json::Tracked::new(tm_json::Offset::unknown(), value.to_string())
    }

    fn array_of(values: &[&str]) -> ArrayTracker<tm_json::Tracked<String>> {
        ArrayTracker::new(tm_json::Offset::unknown(), values.iter().map(|v| tracked(v)).collect())
    }

    #[test]
    fn consistent_bidirectional_containment_is_silent() {
        let parent_contains = array_of(&["child"]);
        let child_contained_in = tracked("parent");
        let entries = vec![
            ("parent", Some(&parent_contains), None, tm_json::Offset::unknown()),
            ("child", None, Some(&child_contained_in), tm_json::Offset::unknown()),
        ];
        let mut reporter = Reporter::new("t.json", "", "default");
        validate_containment(entries.into_iter(), &mut reporter);
        assert!(reporter.log().errors().is_empty());
    }

    #[test]
    fn contained_in_naming_a_different_parent_is_an_error() {
        let parent_contains = array_of(&["child"]);
        let child_contained_in = tracked("someone-else");
        let entries = vec![
            ("parent", Some(&parent_contains), None, tm_json::Offset::unknown()),
            ("child", None, Some(&child_contained_in), tm_json::Offset::unknown()),
            ("someone-else", None, None, tm_json::Offset::unknown()),
        ];
        let mut reporter = Reporter::new("t.json", "", "default");
        validate_containment(entries.into_iter(), &mut reporter);
        assert_eq!(reporter.log().errors().len(), 2);
    }

    #[test]
    fn contains_naming_a_nonexistent_child_is_an_error() {
        let parent_contains = array_of(&["ghost"]);
        let entries = vec![("parent", Some(&parent_contains), None, tm_json::Offset::unknown())];
        let mut reporter = Reporter::new("t.json", "", "default");
        validate_containment(entries.into_iter(), &mut reporter);
        assert_eq!(reporter.log().errors().len(), 1);
    }

    #[test]
    fn containment_cycle_is_an_error() {
        let a_contained_in = tracked("b");
        let b_contained_in = tracked("a");
        let entries = vec![
            ("a", None, Some(&a_contained_in), tm_json::Offset::unknown()),
            ("b", None, Some(&b_contained_in), tm_json::Offset::unknown()),
        ];
        let mut reporter = Reporter::new("t.json", "", "default");
        validate_containment(entries.into_iter(), &mut reporter);
        assert!(!reporter.log().errors().is_empty());
    }
}
