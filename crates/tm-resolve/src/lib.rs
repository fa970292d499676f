//! Form/Schema resolution helpers (spec §4.5): given a `Form` and the
//! Thing's `schemaDefinitions` map, materialize its serialization format and
//! resolve the named schemas its header/response attributes point at.
//!
//! Pass A already reports dangling references (forms::references_string_enum,
//! forms::references_structured_object in `tm-validate`); resolution here is
//! best-effort and silent about names that don't resolve — a `None` schema
//! field means "Pass A already told the caller this form is invalid."

use tm_json::MapTracker;
use tm_model::{DataSchema, Form, SerializationFormat};

/// A schema reached through a form attribute, paired with the name it was
/// looked up under.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSchema<'a> {
    pub name: &'a str,
    pub schema: &'a DataSchema,
}

/// Everything a downstream code generator needs to render one `Form` (spec
/// §4.5). Borrows from the `Form` and the `schemaDefinitions` map that
/// produced it; both outlive the `Thing` they came from.
#[derive(Debug, Clone)]
pub struct FormInfo<'a> {
    /// Derived from `contentType`; `None` when the form carries no
    /// `contentType` at all (e.g. a bare-`op` root aggregate form).
    pub format: Option<SerializationFormat>,
    /// Whether this form's (at most one) `additionalResponses` entry
    /// resolves to a known schema — this implementation treats the mere
    /// presence of a resolved `additionalResponses` entry as "this form has
    /// an out-of-band error response" (see DESIGN.md).
    pub has_error_response: bool,
    pub error_schema: Option<ResolvedSchema<'a>>,
    /// The error schema has no `contentType` of its own; it's carried on
    /// the same wire format as the form's main payload.
    pub error_schema_format: Option<SerializationFormat>,
    pub header_info_schema: Option<ResolvedSchema<'a>>,
    pub header_info_format: Option<SerializationFormat>,
    pub header_code_schema: Option<ResolvedSchema<'a>>,
    pub service_group_id: Option<&'a str>,
    pub topic_pattern: Option<&'a str>,
}

fn resolve_name(raw: &str) -> &str {
    raw.trim_start_matches('#').trim_start_matches('/')
}

fn resolve_schema<'a>(reference: &'a str, schema_definitions: &'a MapTracker<DataSchema>) -> Option<ResolvedSchema<'a>> {
    let name = resolve_name(reference);
    schema_definitions.get(name).map(|schema| ResolvedSchema { name, schema })
}

pub fn resolve_form_info<'a>(form: &'a Form, schema_definitions: &'a MapTracker<DataSchema>) -> FormInfo<'a> {
    let format = form.content_type.as_ref().and_then(|ct| SerializationFormat::from_content_type(&ct.value));

    let error_schema = form
        .additional_responses
        .as_ref()
        .and_then(|responses| responses.iter().next())
        .and_then(|entry| resolve_schema(&entry.ref_.value, schema_definitions));

    let header_info_schema = form
        .header_info
        .as_ref()
        .and_then(|infos| infos.iter().next())
        .and_then(|entry| resolve_schema(&entry.ref_.value, schema_definitions));

    let header_code_schema = form.header_code.as_ref().and_then(|code| resolve_schema(&code.value, schema_definitions));

    tracing::trace!(
        topic = form.topic.as_ref().map(|t| t.value.as_str()),
        has_error_response = error_schema.is_some(),
        "resolved form info"
    );

    FormInfo {
        format,
        has_error_response: error_schema.is_some(),
        error_schema,
        error_schema_format: error_schema.as_ref().and(format),
        header_info_schema,
        header_info_format: header_info_schema.as_ref().and(format),
        header_code_schema,
        service_group_id: form.service_group_id.as_ref().map(|t| t.value.as_str()),
        topic_pattern: form.topic.as_ref().map(|t| t.value.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_json::{Decoder, JsonDecode};

    fn form_from(src: &str) -> Form {
        let mut dec = Decoder::new(src);
        Form::decode(&mut dec).unwrap()
    }

    fn schemas_from(src: &str) -> MapTracker<DataSchema> {
        let mut dec = Decoder::new(src);
        dec.decode_map().unwrap()
    }

    #[test]
    fn resolves_format_from_content_type() {
        let form = form_from(r#"{"op":["invokeaction"],"topic":"dev/reboot","contentType":"application/json"}"#);
        let schemas = schemas_from("{}");
        let info = resolve_form_info(&form, &schemas);
        assert_eq!(info.format, Some(SerializationFormat::Json));
        assert!(!info.has_error_response);
        assert_eq!(info.topic_pattern, Some("dev/reboot"));
    }

    #[test]
    fn no_content_type_resolves_to_no_format() {
        let form = form_from(r#"{"op":["readAllProperties"]}"#);
        let schemas = schemas_from("{}");
        let info = resolve_form_info(&form, &schemas);
        assert_eq!(info.format, None);
    }

    #[test]
    fn resolves_error_schema_from_additional_responses() {
        let form = form_from(
            r#"{"op":["invokeaction"],"topic":"dev/reboot","contentType":"application/json","additionalResponses":[{"ref":"Error"}]}"#,
        );
        let schemas = schemas_from(r#"{"Error":{"type":"object","properties":{"code":{"type":"integer"}}}}"#);
        let info = resolve_form_info(&form, &schemas);
        assert!(info.has_error_response);
        assert_eq!(info.error_schema.unwrap().name, "Error");
        assert_eq!(info.error_schema_format, Some(SerializationFormat::Json));
    }

    #[test]
    fn resolves_header_code_schema() {
        let form = form_from(r#"{"op":["invokeaction"],"topic":"dev/a","contentType":"application/json","headerCode":"Code"}"#);
        let schemas = schemas_from(r#"{"Code":{"type":"string","enum":["ok","fail"]}}"#);
        let info = resolve_form_info(&form, &schemas);
        assert_eq!(info.header_code_schema.unwrap().name, "Code");
    }

    #[test]
    fn dangling_reference_resolves_to_none() {
        let form = form_from(r#"{"op":["invokeaction"],"topic":"dev/a","contentType":"application/json","headerCode":"Missing"}"#);
        let schemas = schemas_from("{}");
        let info = resolve_form_info(&form, &schemas);
        assert!(info.header_code_schema.is_none());
    }
}
