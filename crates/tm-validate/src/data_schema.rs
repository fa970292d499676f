//! `DataSchema` validation (spec §3 DataSchema, §4.3.5).

use std::sync::OnceLock;

use regex::Regex;
use tm_diagnostics::{Condition, Reporter};
use tm_model::{DataSchema, SchemaVariant};

use crate::refs::validate_ref;
use crate::residual::check_residual_properties;

const COMMON_KEYS: &[&str] = &["title", "description", "type", "ref", "const"];

fn allow_list(variant: &SchemaVariant) -> Vec<&'static str> {
    let extra: &[&str] = match variant {
        SchemaVariant::Object(_) => &["properties", "additionalProperties", "required", "errorMessage"],
        SchemaVariant::Array(_) => &["items"],
        SchemaVariant::String(_) => &["format", "pattern", "contentEncoding", "enum"],
        SchemaVariant::Number(_) | SchemaVariant::Integer(_) => &["minimum", "maximum", "scaleFactor", "decimalPlaces"],
        SchemaVariant::Boolean | SchemaVariant::Null | SchemaVariant::Reference | SchemaVariant::Unresolved => &[],
    };
    COMMON_KEYS.iter().chain(extra).copied().collect()
}

/// Where a `DataSchema` occurs, which gates whether `null` and a bare `ref`
/// are permitted (spec: `ref` only at the first level of an affordance's
/// schema slot; `null` only as Action input/output or Event data).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSite {
    /// The first level of an Action's input/output or an Event's data.
    AffordanceRoot,
    /// A nested schema (object property, array item, `additionalProperties`).
    Nested,
    /// An entry in the Thing's `schemaDefinitions` map.
    SchemaDefinition,
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

/// A string the pattern-probe check considers representative of an
/// ISO-8601 duration (spec §4.3.5's "indeterminate intended type" check).
const DURATION_PROBE: &str = "P3Y6M4DT12H30M5S";
/// A string the same probe considers representative of a decimal number.
const DECIMAL_PROBE: &str = "-123.456";

pub fn validate_data_schema(schema: &DataSchema, site: SchemaSite, reporter: &mut Reporter) -> bool {
    let mut ok = true;

    if schema.type_keyword.is_some() && schema.ref_.is_some() {
        reporter.add_error(Condition::PropertyUnsupported, "'type' and 'ref' are mutually exclusive", schema.offset);
        ok = false;
    }

    match &schema.variant {
        SchemaVariant::Reference => {
            if site != SchemaSite::AffordanceRoot {
                reporter.add_error(Condition::PropertyUnsupported, "'ref' is only permitted at the first level of an affordance's schema", schema.offset);
                ok = false;
            }
            if let Some(ref_) = &schema.ref_ {
                if let Err(reason) = validate_ref(&ref_.value) {
                    reporter.add_error(Condition::PropertyInvalid, format!("'ref': {reason}"), ref_.offset);
                    ok = false;
                }
            }
        }
        SchemaVariant::Unresolved => {
            reporter.add_error(Condition::ElementMissing, "schema has neither a recognized 'type' nor a 'ref'", schema.offset);
            ok = false;
        }
        SchemaVariant::Null => {
            if site != SchemaSite::AffordanceRoot {
                reporter.add_error(Condition::PropertyUnsupported, "'null' schemas are only permitted as Action input/output or Event data", schema.offset);
                ok = false;
            }
        }
        SchemaVariant::Object(object) => {
            if let Some(properties) = &object.properties {
                for (_, prop) in properties.iter() {
                    if !validate_data_schema(prop, SchemaSite::Nested, reporter) {
                        ok = false;
                    }
                }
            }
            if let Some(additional) = &object.additional_properties {
                if !validate_data_schema(additional, SchemaSite::Nested, reporter) {
                    ok = false;
                }
            }
            if let Some(required) = &object.required {
                for name in required {
                    let declared = object.properties.as_ref().is_some_and(|p| p.contains_key(&name.value));
                    if !declared {
                        reporter.add_error(
                            Condition::ItemNotFound,
                            format!("'required' names '{}', which is not declared in 'properties'", name.value),
                            name.offset,
                        );
                        ok = false;
                    }
                }
            }
            if let Some(const_) = &schema.const_ {
                if site != SchemaSite::SchemaDefinition {
                    reporter.add_error(Condition::PropertyUnsupported, "'const' on an object schema is only permitted at the top level of 'schemaDefinitions'", schema.offset);
                    ok = false;
                } else if !validate_const_against_object(object, const_, reporter) {
                    ok = false;
                }
            }
        }
        SchemaVariant::Array(array) => {
            if let Some(items) = &array.items {
                if !validate_data_schema(items, SchemaSite::Nested, reporter) {
                    ok = false;
                }
            }
        }
        SchemaVariant::String(string) => {
            let exclusive_count =
                [string.format.is_some(), string.pattern.is_some(), string.content_encoding.is_some()].iter().filter(|b| **b).count();
            if exclusive_count > 1 {
                reporter.add_error(
                    Condition::PropertyUnsupported,
                    "'format', 'pattern', and 'contentEncoding' are mutually exclusive on a string schema",
                    schema.offset,
                );
                ok = false;
            }
            if let Some(enum_) = &string.enum_ {
                for value in enum_ {
                    if !identifier_pattern().is_match(&value.value) {
                        reporter.add_error(
                            Condition::PropertyInvalid,
                            format!("enum value '{}' is not a valid identifier", value.value),
                            value.offset,
                        );
                        ok = false;
                    }
                }
            }
            if let Some(pattern) = &string.pattern {
                match Regex::new(&pattern.value) {
                    Err(_) => {
                        reporter.add_error(Condition::PropertyInvalid, format!("pattern '{}' is not a valid regular expression", pattern.value), pattern.offset);
                        ok = false;
                    }
                    Ok(compiled) => {
                        if compiled.is_match("") {
                            reporter.add_warning(
                                Condition::PropertyUnsupportedValue,
                                "pattern matches the empty string, which is likely over-permissive",
                                pattern.offset,
                            );
                        }
                        let matches_duration = compiled.is_match(DURATION_PROBE);
                        let matches_decimal = compiled.is_match(DECIMAL_PROBE);
                        if !matches_duration && !matches_decimal {
                            reporter.add_error(
                                Condition::Unusable,
                                "pattern does not resemble either an ISO-8601 duration or a decimal number; its intended type cannot be determined",
                                pattern.offset,
                            );
                            ok = false;
                        }
                    }
                }
            }
            if let Some(const_) = &schema.const_ {
                if const_.as_str().is_none() {
                    reporter.add_error(Condition::TypeMismatch, "'const' on a string schema must itself be a string", const_.offset());
                    ok = false;
                }
            }
        }
        SchemaVariant::Number(constraints) | SchemaVariant::Integer(constraints) => {
            let is_integer = matches!(schema.variant, SchemaVariant::Integer(_));
            if let (Some(min), Some(max)) = (&constraints.minimum, &constraints.maximum) {
                if min.value > max.value {
                    reporter.add_error(Condition::ValuesInconsistent, format!("'minimum' ({}) is greater than 'maximum' ({})", min.value, max.value), schema.offset);
                    ok = false;
                }
            }
            if is_integer {
                if let Some(min) = &constraints.minimum {
                    if min.value.fract() != 0.0 {
                        reporter.add_error(Condition::PropertyInvalid, format!("'minimum' ({}) must be a whole number on an integer schema", min.value), min.offset);
                        ok = false;
                    }
                }
                if let Some(max) = &constraints.maximum {
                    if max.value.fract() != 0.0 {
                        reporter.add_error(Condition::PropertyInvalid, format!("'maximum' ({}) must be a whole number on an integer schema", max.value), max.offset);
                        ok = false;
                    }
                }
            }
            if let Some(const_) = &schema.const_ {
                match const_.as_f64() {
                    None => {
                        reporter.add_error(Condition::TypeMismatch, "'const' on a number/integer schema must itself be a number", const_.offset());
                        ok = false;
                    }
                    Some(value) => {
                        let below_min = constraints.minimum.as_ref().is_some_and(|min| value < min.value);
                        let above_max = constraints.maximum.as_ref().is_some_and(|max| value > max.value);
                        if below_min || above_max {
                            reporter.add_error(Condition::ValuesInconsistent, format!("'const' ({value}) falls outside ['minimum', 'maximum']"), const_.offset());
                            ok = false;
                        }
                    }
                }
            }
        }
        SchemaVariant::Boolean => {
            if let Some(const_) = &schema.const_ {
                if const_.as_bool().is_none() {
                    reporter.add_error(Condition::TypeMismatch, "'const' on a boolean schema must itself be a boolean", const_.offset());
                    ok = false;
                }
            }
        }
    }

    check_residual_properties(&schema.property_map, &allow_list(&schema.variant), reporter);

    ok
}

/// `const` on an object schema (spec §4.3.5): the literal must itself be a
/// JSON object, every declared property must be a simple scalar type, and
/// the property-key sets and value types must exactly agree.
fn validate_const_against_object(object: &tm_model::ObjectVariant, const_: &tm_model::JsonLiteral, reporter: &mut Reporter) -> bool {
    use tm_model::JsonLiteral;

    let Some(const_map) = const_.as_object() else {
        reporter.add_error(Condition::TypeMismatch, "'const' on an object schema must itself be a JSON object", const_.offset());
        return false;
    };

    let mut ok = true;
    let Some(properties) = &object.properties else {
        return ok;
    };

    for (name, prop) in properties.iter() {
        if !matches!(prop.variant, SchemaVariant::String(_) | SchemaVariant::Number(_) | SchemaVariant::Integer(_) | SchemaVariant::Boolean) {
            reporter.add_error(Condition::TypeMismatch, format!("const-bearing property '{name}' must be a string, number, integer, or boolean schema"), prop.offset);
            ok = false;
            continue;
        }
        let Some(value) = const_map.get(name) else {
            reporter.add_error(Condition::ItemNotFound, format!("'const' is missing a value for declared property '{name}'"), const_.offset());
            ok = false;
            continue;
        };
        let type_checks = match &prop.variant {
            SchemaVariant::String(_) => matches!(value, JsonLiteral::String(..)),
            SchemaVariant::Number(_) | SchemaVariant::Integer(_) => matches!(value, JsonLiteral::Number(..)),
            SchemaVariant::Boolean => matches!(value, JsonLiteral::Bool(..)),
            _ => true,
        };
        if !type_checks {
            reporter.add_error(Condition::TypeMismatch, format!("'const' value for '{name}' does not match its schema's type"), value.offset());
            ok = false;
        }
    }

    for key in const_map.keys() {
        if !properties.contains_key(key) {
            reporter.add_error(Condition::ItemNotFound, format!("'const' names '{key}', which is not a declared property"), const_.offset());
            ok = false;
        }
    }

    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_json::{Decoder, JsonDecode};

    fn schema_from(src: &str) -> DataSchema {
        let mut dec = Decoder::new(src);
        DataSchema::decode(&mut dec).unwrap()
    }

    #[test]
    fn rejects_unresolved_schema() {
        let schema = schema_from(r#"{"title":"x"}"#);
        let mut reporter = Reporter::new("s.json", "", "default");
        assert!(!validate_data_schema(&schema, SchemaSite::AffordanceRoot, &mut reporter));
    }

    #[test]
    fn rejects_null_outside_affordance_root() {
        let schema = schema_from(r#"{"type":"null"}"#);
        let mut reporter = Reporter::new("s.json", "", "default");
        assert!(!validate_data_schema(&schema, SchemaSite::Nested, &mut reporter));
    }

    #[test]
    fn accepts_null_at_affordance_root() {
        let schema = schema_from(r#"{"type":"null"}"#);
        let mut reporter = Reporter::new("s.json", "", "default");
        assert!(validate_data_schema(&schema, SchemaSite::AffordanceRoot, &mut reporter));
    }

    #[test]
    fn rejects_ref_outside_affordance_root() {
        let schema = schema_from(r#"{"ref":"Foo"}"#);
        let mut reporter = Reporter::new("s.json", "", "default");
        assert!(!validate_data_schema(&schema, SchemaSite::Nested, &mut reporter));
    }

    #[test]
    fn rejects_integer_with_fractional_minimum() {
        let schema = schema_from(r#"{"type":"integer","minimum":1.5}"#);
        let mut reporter = Reporter::new("s.json", "", "default");
        assert!(!validate_data_schema(&schema, SchemaSite::Nested, &mut reporter));
    }

    #[test]
    fn rejects_minimum_greater_than_maximum() {
        let schema = schema_from(r#"{"type":"number","minimum":10,"maximum":1}"#);
        let mut reporter = Reporter::new("s.json", "", "default");
        assert!(!validate_data_schema(&schema, SchemaSite::Nested, &mut reporter));
    }

    #[test]
    fn rejects_number_const_outside_range() {
        let schema = schema_from(r#"{"type":"number","minimum":0,"maximum":10,"const":20}"#);
        let mut reporter = Reporter::new("s.json", "", "default");
        assert!(!validate_data_schema(&schema, SchemaSite::Nested, &mut reporter));
    }

    #[test]
    fn accepts_number_const_within_range() {
        let schema = schema_from(r#"{"type":"number","minimum":0,"maximum":10,"const":5}"#);
        let mut reporter = Reporter::new("s.json", "", "default");
        assert!(validate_data_schema(&schema, SchemaSite::Nested, &mut reporter));
    }

    #[test]
    fn rejects_required_name_not_in_properties() {
        let schema = schema_from(r#"{"type":"object","properties":{"a":{"type":"string"}},"required":["b"]}"#);
        let mut reporter = Reporter::new("s.json", "", "default");
        assert!(!validate_data_schema(&schema, SchemaSite::Nested, &mut reporter));
    }

    #[test]
    fn accepts_a_well_formed_object_schema() {
        let schema = schema_from(r#"{"type":"object","properties":{"a":{"type":"string"}},"required":["a"]}"#);
        let mut reporter = Reporter::new("s.json", "", "default");
        assert!(validate_data_schema(&schema, SchemaSite::Nested, &mut reporter));
    }

    #[test]
    fn rejects_pattern_with_indeterminate_type() {
        let schema = schema_from(r#"{"type":"string","pattern":"^[Xx]+$"}"#);
        let mut reporter = Reporter::new("s.json", "", "default");
        assert!(!validate_data_schema(&schema, SchemaSite::Nested, &mut reporter));
    }
}
