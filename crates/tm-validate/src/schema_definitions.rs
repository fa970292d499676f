//! `schemaDefinitions` validation (spec §3, §4.3.5).
//!
//! An object schema's `const` is only permitted at the top level of a
//! `SchemaDefinitions` entry; `data_schema::validate_data_schema` enforces
//! that via the `SchemaSite` passed in here. Other variants' `const` carries
//! no site restriction.

use tm_diagnostics::Reporter;
use tm_json::MapTracker;
use tm_model::DataSchema;
use tm_names::{derive_schema_name, NamingPolicy};

use crate::data_schema::{validate_data_schema, SchemaSite};

pub fn validate_schema_definitions(schema_definitions: &MapTracker<DataSchema>, reporter: &mut Reporter) -> bool {
    let mut ok = true;
    let policy = NamingPolicy::default();
    for (key, schema) in schema_definitions.iter() {
        if !validate_data_schema(schema, SchemaSite::SchemaDefinition, reporter) {
            ok = false;
        }

        let title = schema.title.as_ref().map(|t| t.value.as_str());
        let generated = derive_schema_name(&policy, key, title, &policy.templates.backup_schema_name);
        let file = reporter.file().to_string();
        let folder = reporter.default_folder().to_string();
        let line = reporter.line_of(schema.offset);
        reporter.register_schema_name(generated, file, folder, line);
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_diagnostics::Reporter;
    use tm_json::{Decoder, JsonDecode};

    fn schemas_from(src: &str) -> MapTracker<DataSchema> {
        let mut dec = Decoder::new(src);
        dec.decode_map().unwrap()
    }

    #[test]
    fn accepts_well_formed_definitions() {
        let schemas = schemas_from(r#"{"Temp":{"type":"number"},"Status":{"type":"string","enum":["on","off"]}}"#);
        let mut reporter = Reporter::new("t.json", "", "default");
        assert!(validate_schema_definitions(&schemas, &mut reporter));
    }

    #[test]
    fn rejects_const_not_matching_declared_properties() {
        let schemas = schemas_from(r#"{"Status":{"type":"object","properties":{"code":{"type":"integer"}},"const":{"code":1,"extra":2}}}"#);
        let mut reporter = Reporter::new("t.json", "", "default");
        assert!(!validate_schema_definitions(&schemas, &mut reporter));
    }

    #[test]
    fn accepts_well_formed_object_const() {
        let schemas = schemas_from(r#"{"Status":{"type":"object","properties":{"code":{"type":"integer"}},"const":{"code":1}}}"#);
        let mut reporter = Reporter::new("t.json", "", "default");
        assert!(validate_schema_definitions(&schemas, &mut reporter));
    }
}
