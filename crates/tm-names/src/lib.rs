//! Name Utilities (spec §4.4): `CodeName`'s four casings, and the external
//! `NamingPolicy` configuration the Validator and downstream generator
//! consult for generated-name derivation.

mod code_name;
mod policy;

pub use code_name::CodeName;
pub use policy::{NameRule, NamingPolicy, TemplateFamily};

/// A schema or affordance's generated name (spec §4.3.2, §4.4): its own
/// Title when present and titles aren't suppressed by the policy; else the
/// first matching `nameRules` template; else `fallback_template` expanded
/// with the `CodeName`-cased `key`.
pub fn derive_schema_name(policy: &NamingPolicy, key: &str, title: Option<&str>, fallback_template: &str) -> String {
    if !policy.suppress_titles {
        if let Some(title) = title {
            return title.to_string();
        }
    }
    if let Some(name) = policy.apply_name_rules(key) {
        return name;
    }
    let code = CodeName::new(key);
    policy.expand(fallback_template, &[code.pascal()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_wins_over_fallback() {
        let policy = NamingPolicy::default();
        assert_eq!(derive_schema_name(&policy, "temp", Some("Temperature"), &policy.templates.backup_schema_name), "Temperature");
    }

    #[test]
    fn falls_back_to_template_when_title_absent() {
        let policy = NamingPolicy::default();
        assert_eq!(derive_schema_name(&policy, "temp_sensor", None, &policy.templates.backup_schema_name), "SchemaTempSensor");
    }

    #[test]
    fn suppressed_titles_still_fall_back() {
        let policy = NamingPolicy { suppress_titles: true, ..NamingPolicy::default() };
        assert_eq!(derive_schema_name(&policy, "temp", Some("Temperature"), &policy.templates.backup_schema_name), "Temp");
    }
}
