//! Topic validation and token-table rules (spec §4.3.4).

use tm_diagnostics::{Condition, Reporter};
use tm_json::Offset;
use tm_model::op;

/// The kind a topic's token table is checked against. Root forms are
/// reclassified into one of these ("effective kind") based on which op
/// they carry, rather than being a kind of their own (spec §4.3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveKind {
    Action,
    Property,
    Event,
}

fn allowed_tokens(kind: EffectiveKind) -> &'static [&'static str] {
    match kind {
        EffectiveKind::Action => &["executorId", "invokerClientId"],
        EffectiveKind::Property => &["action", "consumerClientId", "maintainerId"],
        EffectiveKind::Event => &["senderId"],
    }
}

fn is_token_level(level: &str) -> bool {
    level.starts_with('{') && level.ends_with('}') && level.len() > 2
}

fn token_name(level: &str) -> &str {
    &level[1..level.len() - 1]
}

/// Validate a topic's syntax and token vocabulary. Does not perform
/// `{action}` expansion — see [`expand_action_token`] for that.
pub fn validate_topic(topic: &str, kind: EffectiveKind, offset: Offset, reporter: &mut Reporter) -> bool {
    let mut ok = true;
    for level in topic.split('/') {
        if level.is_empty() {
            reporter.add_error(Condition::PropertyInvalid, format!("topic '{topic}' has an empty level"), offset);
            ok = false;
            continue;
        }
        if level.starts_with('$') {
            reporter.add_error(Condition::PropertyInvalid, format!("topic '{topic}' has a level starting with '$'"), offset);
            ok = false;
            continue;
        }
        if is_token_level(level) {
            let name = token_name(level);
            let allowed = allowed_tokens(kind).contains(&name) || name.starts_with("ex:") && name["ex:".len()..].chars().all(|c| c.is_ascii_alphabetic());
            if !allowed {
                reporter.add_error(Condition::PropertyUnsupportedValue, format!("topic '{topic}' uses an unrecognized token '{{{name}}}'"), offset);
                ok = false;
            }
            continue;
        }
        if level.chars().any(|c| matches!(c, '+' | '#' | '{' | '}' | ' ' | '"')) {
            reporter.add_error(Condition::PropertyInvalid, format!("topic '{topic}' has a level containing a reserved character"), offset);
            ok = false;
            continue;
        }
        if !level.chars().all(|c| c.is_ascii_graphic()) {
            reporter.add_error(Condition::PropertyInvalid, format!("topic '{topic}' has a level containing a non-printable-ASCII character"), offset);
            ok = false;
        }
    }
    ok
}

/// Reclassify a Root form into its effective kind, per spec §4.3.4.
pub fn root_effective_kind(ops: &[String]) -> EffectiveKind {
    if ops.contains(&op::READ_PROPERTY.to_string()) || ops.contains(&op::WRITE_PROPERTY.to_string()) {
        EffectiveKind::Property
    } else {
        EffectiveKind::Event
    }
}

/// Expand a Property topic's `{action}` token into the concrete topics it
/// should be registered under (spec §4.3.4, scenario 5). Returns the list
/// of topics to register; an empty result for a non-`{action}` topic means
/// "register the topic as-is" — see [`topics_to_register`].
fn expand_action_token(topic: &str, has_read: bool, has_write: bool, is_read_only: bool) -> Vec<String> {
    let read_topic = topic.replacen("{action}", "read", 1);
    let write_topic = topic.replacen("{action}", "write", 1);
    match (has_read, has_write) {
        (true, false) => vec![read_topic],
        (false, true) => vec![write_topic],
        (true, true) => vec![read_topic, write_topic],
        (false, false) => {
            if is_read_only {
                vec![read_topic]
            } else {
                vec![read_topic, write_topic]
            }
        }
    }
}

/// The full set of topics a Property form should register under, applying
/// `{action}` expansion when present and the read-only/explicit-op
/// consistency check when it isn't (spec §4.3.4).
pub fn property_topics_to_register(
    topic: &str,
    has_read: bool,
    has_write: bool,
    is_read_only: bool,
    offset: Offset,
    reporter: &mut Reporter,
) -> Vec<String> {
    if topic.contains("{action}") {
        expand_action_token(topic, has_read, has_write, is_read_only)
    } else {
        let explicit_single_op = has_read != has_write;
        if !is_read_only && !explicit_single_op {
            reporter.add_error(
                Condition::ValuesInconsistent,
                format!("topic '{topic}' has no '{{action}}' token, so the property must be read-only or declare exactly one of readproperty/writeproperty"),
                offset,
            );
        }
        vec![topic.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_op_reporter() -> Reporter {
        Reporter::new("t.json", "", "default")
    }

    #[test]
    fn accepts_a_well_formed_topic() {
        let mut reporter = no_op_reporter();
        assert!(validate_topic("dev/temperature", EffectiveKind::Property, Offset::unknown(), &mut reporter));
    }

    #[test]
    fn rejects_empty_level() {
        let mut reporter = no_op_reporter();
        assert!(!validate_topic("dev//temperature", EffectiveKind::Property, Offset::unknown(), &mut reporter));
    }

    #[test]
    fn rejects_dollar_prefixed_level() {
        let mut reporter = no_op_reporter();
        assert!(!validate_topic("$SYS/dev", EffectiveKind::Property, Offset::unknown(), &mut reporter));
    }

    #[test]
    fn accepts_recognized_token_for_kind() {
        let mut reporter = no_op_reporter();
        assert!(validate_topic("dev/{consumerClientId}/x", EffectiveKind::Property, Offset::unknown(), &mut reporter));
    }

    #[test]
    fn rejects_token_not_in_table_for_kind() {
        let mut reporter = no_op_reporter();
        assert!(!validate_topic("dev/{senderId}/x", EffectiveKind::Property, Offset::unknown(), &mut reporter));
    }

    #[test]
    fn accepts_ex_prefixed_token_for_any_kind() {
        let mut reporter = no_op_reporter();
        assert!(validate_topic("dev/{ex:custom}/x", EffectiveKind::Event, Offset::unknown(), &mut reporter));
    }

    #[test]
    fn action_token_expands_to_both_when_ops_implicit_and_not_read_only() {
        let mut reporter = no_op_reporter();
        let topics = property_topics_to_register("dev/{action}/x", false, false, false, Offset::unknown(), &mut reporter);
        assert_eq!(topics, vec!["dev/read/x".to_string(), "dev/write/x".to_string()]);
    }

    #[test]
    fn action_token_expands_to_read_only_when_property_is_read_only() {
        let mut reporter = no_op_reporter();
        let topics = property_topics_to_register("dev/{action}/x", false, false, true, Offset::unknown(), &mut reporter);
        assert_eq!(topics, vec!["dev/read/x".to_string()]);
    }

    #[test]
    fn non_action_topic_without_single_op_and_not_read_only_is_inconsistent() {
        let mut reporter = no_op_reporter();
        property_topics_to_register("dev/x", false, false, false, Offset::unknown(), &mut reporter);
        assert_eq!(reporter.log().errors().len(), 1);
    }
}
