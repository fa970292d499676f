//! `Action`, `Property`, and `Event` entities (spec §3).
//!
//! `Property` extends the `DataSchema` vocabulary rather than nesting one:
//! a Property's JSON object carries both the data-schema keys (`type`,
//! `properties`, `minimum`, ...) and the affordance-specific keys
//! (`readOnly`, `forms`, ...) side by side. Modeled here as composition —
//! `Property` owns a `DataSchema` built from the same object, plus its own
//! extra fields — using the field-acceptance helper shared with
//! `DataSchema` itself (see `schema::RawSchemaFields`).

use tm_json::{ArrayTracker, Decoder, JsonDecode, Offset, PropertyNameMap, Tracked};

use crate::form::Form;
use crate::schema::{DataSchema, RawSchemaFields};
use crate::support::required;

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub offset: Offset,
    pub property_map: PropertyNameMap,
    pub description: Option<Tracked<String>>,
    /// Must be a structured object, `null`, or a `ref` schema; `tm-validate`
    /// enforces that constraint (spec §4.3.5).
    pub input: Option<DataSchema>,
    pub output: Option<DataSchema>,
    pub idempotent: Option<Tracked<bool>>,
    pub safe: Option<Tracked<bool>>,
    pub forms: ArrayTracker<Form>,
    pub namespace: Option<Tracked<String>>,
    pub member_of: Option<Tracked<String>>,
}

impl JsonDecode for Action {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, tm_json::DecodeError> {
        let mut description = None;
        let mut input = None;
        let mut output = None;
        let mut idempotent = None;
        let mut safe = None;
        let mut forms = None;
        let mut namespace = None;
        let mut member_of = None;

        let (offset, property_map) = dec.decode_object(|dec, key, _span| {
            match key {
                "description" => description = Some(dec.decode_string()?),
                "input" => input = Some(DataSchema::decode(dec)?),
                "output" => output = Some(DataSchema::decode(dec)?),
                "idempotent" => idempotent = Some(dec.decode_bool()?),
                "safe" => safe = Some(dec.decode_bool()?),
                "forms" => forms = Some(dec.decode_array()?),
                "namespace" => namespace = Some(dec.decode_string()?),
                "memberOf" => member_of = Some(dec.decode_string()?),
                _ => dec.skip_value()?,
            }
            Ok(())
        })?;

        Ok(Action {
            offset,
            property_map,
            description,
            input,
            output,
            idempotent,
            safe,
            forms: required(forms, offset),
            namespace,
            member_of,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// The data-schema portion of this property (`type`, `properties`,
    /// `minimum`, ... all decoded from the same JSON object as the fields
    /// below). Shares this property's `offset` and `property_map`.
    pub schema: DataSchema,
    pub read_only: Option<Tracked<bool>>,
    /// Names of affordances this property's containment graph contains
    /// (spec cross-form consistency checks, §4.3).
    pub contains: Option<ArrayTracker<Tracked<String>>>,
    pub contained_in: Option<Tracked<String>>,
    pub forms: ArrayTracker<Form>,
}

impl Property {
    pub fn offset(&self) -> Offset {
        self.schema.offset
    }

    pub fn property_map(&self) -> &PropertyNameMap {
        &self.schema.property_map
    }
}

impl JsonDecode for Property {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, tm_json::DecodeError> {
        let mut fields = RawSchemaFields::default();
        let mut read_only = None;
        let mut contains = None;
        let mut contained_in = None;
        let mut forms = None;

        let (offset, property_map) = dec.decode_object(|dec, key, _span| {
            match key {
                "readOnly" => read_only = Some(dec.decode_bool()?),
                "contains" => contains = Some(dec.decode_array()?),
                "containedIn" => contained_in = Some(dec.decode_string()?),
                "forms" => forms = Some(dec.decode_array()?),
                _ => {
                    if !fields.accept(dec, key)? {
                        dec.skip_value()?;
                    }
                }
            }
            Ok(())
        })?;

        let schema = DataSchema::from_fields(offset, property_map.clone(), fields);
        Ok(Property {
            schema,
            read_only,
            contains,
            contained_in,
            forms: required(forms, offset),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub offset: Offset,
    pub property_map: PropertyNameMap,
    pub description: Option<Tracked<String>>,
    pub data: Option<DataSchema>,
    pub forms: ArrayTracker<Form>,
    pub namespace: Option<Tracked<String>>,
    pub member_of: Option<Tracked<String>>,
    pub contains: Option<ArrayTracker<Tracked<String>>>,
    pub contained_in: Option<Tracked<String>>,
}

impl JsonDecode for Event {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, tm_json::DecodeError> {
        let mut description = None;
        let mut data = None;
        let mut forms = None;
        let mut namespace = None;
        let mut member_of = None;
        let mut contains = None;
        let mut contained_in = None;

        let (offset, property_map) = dec.decode_object(|dec, key, _span| {
            match key {
                "description" => description = Some(dec.decode_string()?),
                "data" => data = Some(DataSchema::decode(dec)?),
                "forms" => forms = Some(dec.decode_array()?),
                "namespace" => namespace = Some(dec.decode_string()?),
                "memberOf" => member_of = Some(dec.decode_string()?),
                "contains" => contains = Some(dec.decode_array()?),
                "containedIn" => contained_in = Some(dec.decode_string()?),
                _ => dec.skip_value()?,
            }
            Ok(())
        })?;

        Ok(Event {
            offset,
            property_map,
            description,
            data,
            forms: required(forms, offset),
            namespace,
            member_of,
            contains,
            contained_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_json::Decoder;

    #[test]
    fn property_merges_schema_and_affordance_fields() {
        let src = r#"{"type":"string","readOnly":true,"forms":[]}"#;
        let mut dec = Decoder::new(src);
        let prop: Property = dec.parse_document().unwrap();
        assert!(prop.schema.type_keyword.is_some());
        assert_eq!(prop.read_only.unwrap().value, true);
    }

    #[test]
    fn action_decodes_input_and_output_schemas() {
        let src = r#"{"input":{"type":"number"},"output":{"type":"boolean"},"forms":[]}"#;
        let mut dec = Decoder::new(src);
        let action: Action = dec.parse_document().unwrap();
        assert!(action.input.is_some());
        assert!(action.output.is_some());
    }

    #[test]
    fn event_decodes_data_schema() {
        let src = r#"{"data":{"type":"string"},"forms":[]}"#;
        let mut dec = Decoder::new(src);
        let event: Event = dec.parse_document().unwrap();
        assert!(event.data.is_some());
    }
}
