//! `NamingPolicy`: the external naming configuration the core consults
//! (spec §4.4, §6). Loading it from disk is a driver concern (§1); this
//! crate only owns its shape, defaults, and template expansion.

use regex::Regex;
use serde::Deserialize;

/// An ordered `regex → template` rule applied to a schema key to derive a
/// generated title, in source order — first match wins.
#[derive(Debug, Clone, Deserialize)]
pub struct NameRule {
    pub pattern: String,
    pub template: String,
    #[serde(default)]
    pub capitalize_captures: bool,
}

impl NameRule {
    /// Try this rule against `input`; on a match, expand `template` with
    /// the rule's captures (via [`expand_template`]).
    fn apply(&self, input: &str) -> Option<String> {
        let re = Regex::new(&self.pattern).ok()?;
        let captures = re.captures(input)?;
        let args: Vec<String> = captures
            .iter()
            .skip(1)
            .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();
        Some(expand_template(&self.template, &args, self.capitalize_captures))
    }
}

/// The closed set of per-entity template functions named in spec §4.4. Each
/// template is a format string whose `{0}`, `{1}`, ... placeholders are
/// filled positionally by the caller (e.g. the affordance name, the
/// enclosing Thing's title) — not by regex captures, unlike `NameRule`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateFamily {
    pub event_schema: String,
    pub prop_schema: String,
    pub writable_prop_schema: String,
    pub prop_read_resp_schema: String,
    pub prop_write_resp_schema: String,
    pub prop_value_schema: String,
    pub action_in_schema: String,
    pub action_out_schema: String,
    pub action_resp_schema: String,
    pub backup_schema_name: String,
    pub prop_read_act_name: String,
    pub prop_write_act_name: String,
    pub prop_maintainer_binder: String,
    pub prop_consumer_binder: String,
    pub action_executor_binder: String,
    pub action_invoker_binder: String,
    pub event_sender_binder: String,
    pub event_receiver_binder: String,
}

impl Default for TemplateFamily {
    fn default() -> Self {
        TemplateFamily {
            event_schema: "{0}Event".to_string(),
            prop_schema: "{0}Property".to_string(),
            writable_prop_schema: "{0}WritableProperty".to_string(),
            prop_read_resp_schema: "{0}ReadResponse".to_string(),
            prop_write_resp_schema: "{0}WriteResponse".to_string(),
            prop_value_schema: "{0}Value".to_string(),
            action_in_schema: "{0}Input".to_string(),
            action_out_schema: "{0}Output".to_string(),
            action_resp_schema: "{0}Response".to_string(),
            backup_schema_name: "Schema{0}".to_string(),
            prop_read_act_name: "read{0}".to_string(),
            prop_write_act_name: "write{0}".to_string(),
            prop_maintainer_binder: "{0}MaintainerBinder".to_string(),
            prop_consumer_binder: "{0}ConsumerBinder".to_string(),
            action_executor_binder: "{0}ExecutorBinder".to_string(),
            action_invoker_binder: "{0}InvokerBinder".to_string(),
            event_sender_binder: "{0}SenderBinder".to_string(),
            event_receiver_binder: "{0}ReceiverBinder".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingPolicy {
    pub suppress_titles: bool,
    pub name_rules: Vec<NameRule>,
    pub capitalize_captures: bool,
    pub templates: TemplateFamily,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        NamingPolicy {
            suppress_titles: false,
            name_rules: Vec::new(),
            capitalize_captures: false,
            templates: TemplateFamily::default(),
        }
    }
}

impl NamingPolicy {
    /// Apply the first matching `nameRules` entry to `input`, if any.
    pub fn apply_name_rules(&self, input: &str) -> Option<String> {
        self.name_rules.iter().find_map(|rule| rule.apply(input))
    }

    /// Expand one of the closed template-family entries with positional
    /// `args`, honoring `capitalizeCaptures`.
    pub fn expand(&self, template: &str, args: &[&str]) -> String {
        expand_template(template, args, self.capitalize_captures)
    }
}

/// Expand `{0}`, `{1}`, ... placeholders in `template` with `args`,
/// capitalizing each substituted argument when `capitalize` is set.
fn expand_template(template: &str, args: &[impl AsRef<str>], capitalize: bool) -> String {
    let mut out = String::with_capacity(template.len());
    let bytes = template.as_bytes();

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(end) = template[i + 1..].find('}') {
                let index_str = &template[i + 1..i + 1 + end];
                if let Ok(index) = index_str.parse::<usize>() {
                    if let Some(arg) = args.get(index) {
                        let arg = arg.as_ref();
                        if capitalize {
                            out.push_str(&capitalize_str(arg));
                        } else {
                            out.push_str(arg);
                        }
                        i = i + 1 + end + 1;
                        continue;
                    }
                }
            }
        }
        let ch = template[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

fn capitalize_str(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_templates_cover_all_entity_families() {
        let policy = NamingPolicy::default();
        assert_eq!(policy.expand(&policy.templates.event_schema.clone(), &["Temperature"]), "TemperatureEvent");
        assert_eq!(policy.expand(&policy.templates.prop_read_act_name.clone(), &["temperature"]), "readtemperature");
    }

    #[test]
    fn name_rule_expands_captures() {
        let rule = NameRule {
            pattern: r"^mqv:(\w+)$".to_string(),
            template: "{0}Schema".to_string(),
            capitalize_captures: true,
        };
        assert_eq!(rule.apply("mqv:temperature"), Some("TemperatureSchema".to_string()));
        assert_eq!(rule.apply("other"), None);
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{"suppressTitles": true, "nameRules": [{"pattern": "^x$", "template": "X"}]}"#;
        let policy: NamingPolicy = serde_json::from_str(json).unwrap();
        assert!(policy.suppress_titles);
        assert_eq!(policy.name_rules.len(), 1);
        assert_eq!(policy.templates.event_schema, "{0}Event");
    }
}
