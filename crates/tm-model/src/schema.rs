//! `DataSchema`: the recursive schema type (spec §3 DataSchema, §4.3.5).
//!
//! Modeled per the Design Notes: a shared "common attributes" record
//! (`title`, `description`, offset, property map) plus a per-variant
//! payload, rather than an inheritance hierarchy. Fields that don't belong
//! to the declared variant are still recorded in `property_map` (every key
//! seen at this object, recognized or not) so `tm-validate`'s
//! residual-properties check can flag them without the decoder needing to
//! know each variant's allow-list itself.
//!
//! `Property` and `Event` (in `affordances.rs`) extend this vocabulary from
//! the same JSON object rather than a nested one, so the field-acceptance
//! logic lives in [`RawSchemaFields`] and is shared rather than duplicated.

use tm_json::{ArrayTracker, Decoder, JsonDecode, MapTracker, Offset, PropertyNameMap, Tracked};

use crate::literal::JsonLiteral;

#[derive(Debug, Clone, PartialEq)]
pub struct DataSchema {
    pub offset: Offset,
    pub property_map: PropertyNameMap,
    pub title: Option<Tracked<String>>,
    pub description: Option<Tracked<String>>,
    /// The raw `type` keyword, if present (mutually exclusive with `ref_`).
    pub type_keyword: Option<Tracked<String>>,
    /// The raw `ref` keyword, if present (mutually exclusive with `type_keyword`).
    pub ref_: Option<Tracked<String>>,
    pub const_: Option<JsonLiteral>,
    pub variant: SchemaVariant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaVariant {
    Object(ObjectVariant),
    Array(ArrayVariant),
    String(StringVariant),
    Number(NumberConstraints),
    Integer(NumberConstraints),
    Boolean,
    Null,
    /// `ref` was used instead of `type`.
    Reference,
    /// Neither `type` nor `ref` was present, or `type` named an
    /// unrecognized keyword. `tm-validate` reports this.
    Unresolved,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectVariant {
    pub properties: Option<MapTracker<DataSchema>>,
    pub additional_properties: Option<Box<DataSchema>>,
    pub required: Option<ArrayTracker<Tracked<String>>>,
    pub error_message: Option<Tracked<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayVariant {
    pub items: Option<Box<DataSchema>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringVariant {
    pub format: Option<Tracked<String>>,
    pub pattern: Option<Tracked<String>>,
    pub content_encoding: Option<Tracked<String>>,
    pub enum_: Option<ArrayTracker<Tracked<String>>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberConstraints {
    pub minimum: Option<Tracked<f64>>,
    pub maximum: Option<Tracked<f64>>,
    pub scale_factor: Option<Tracked<f64>>,
    pub decimal_places: Option<Tracked<f64>>,
}

impl DataSchema {
    pub fn is_structured_object(&self) -> bool {
        matches!(self.variant, SchemaVariant::Object(_))
    }

    pub fn is_string_enum(&self) -> bool {
        matches!(&self.variant, SchemaVariant::String(s) if s.enum_.is_some())
    }

    pub(crate) fn from_fields(offset: Offset, property_map: PropertyNameMap, fields: RawSchemaFields) -> Self {
        let (variant, common) = fields.finish();
        DataSchema {
            offset,
            property_map,
            title: common.title,
            description: common.description,
            type_keyword: common.type_keyword,
            ref_: common.ref_,
            const_: common.const_,
            variant,
        }
    }
}

impl JsonDecode for DataSchema {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, tm_json::DecodeError> {
        let mut fields = RawSchemaFields::default();
        let (offset, property_map) = dec.decode_object(|dec, key, _span| {
            if !fields.accept(dec, key)? {
                dec.skip_value()?;
            }
            Ok(())
        })?;
        Ok(DataSchema::from_fields(offset, property_map, fields))
    }
}

/// The fields common to any `DataSchema`-shaped JSON object: a `DataSchema`
/// itself, or the data-schema portion of a `Property`/`Event`.
#[derive(Debug, Default)]
pub(crate) struct SchemaCommon {
    pub title: Option<Tracked<String>>,
    pub description: Option<Tracked<String>>,
    pub type_keyword: Option<Tracked<String>>,
    pub ref_: Option<Tracked<String>>,
    pub const_: Option<JsonLiteral>,
}

/// Accumulates every `DataSchema`-vocabulary key seen while decoding one
/// JSON object, regardless of which variant it'll end up matching — see
/// the module doc comment for why.
#[derive(Debug, Default)]
pub(crate) struct RawSchemaFields {
    common: SchemaCommon,
    properties: Option<MapTracker<DataSchema>>,
    additional_properties: Option<Box<DataSchema>>,
    required: Option<ArrayTracker<Tracked<String>>>,
    error_message: Option<Tracked<String>>,
    items: Option<Box<DataSchema>>,
    format: Option<Tracked<String>>,
    pattern: Option<Tracked<String>>,
    content_encoding: Option<Tracked<String>>,
    enum_: Option<ArrayTracker<Tracked<String>>>,
    minimum: Option<Tracked<f64>>,
    maximum: Option<Tracked<f64>>,
    scale_factor: Option<Tracked<f64>>,
    decimal_places: Option<Tracked<f64>>,
}

impl RawSchemaFields {
    /// Attempt to consume `key`'s value as one of the `DataSchema` keys.
    /// Returns `Ok(true)` if recognized and consumed; `Ok(false)` if the
    /// caller must handle (or skip) the value itself.
    pub(crate) fn accept(&mut self, dec: &mut Decoder<'_>, key: &str) -> Result<bool, tm_json::DecodeError> {
        match key {
            "title" => self.common.title = Some(dec.decode_string()?),
            "description" => self.common.description = Some(dec.decode_string()?),
            "type" => self.common.type_keyword = Some(dec.decode_string()?),
            "ref" => self.common.ref_ = Some(dec.decode_string()?),
            "const" => self.common.const_ = Some(JsonLiteral::decode(dec)?),
            "properties" => self.properties = Some(dec.decode_map()?),
            "additionalProperties" => self.additional_properties = Some(Box::new(DataSchema::decode(dec)?)),
            "required" => self.required = Some(dec.decode_array()?),
            "errorMessage" => self.error_message = Some(dec.decode_string()?),
            "items" => self.items = Some(Box::new(DataSchema::decode(dec)?)),
            "format" => self.format = Some(dec.decode_string()?),
            "pattern" => self.pattern = Some(dec.decode_string()?),
            "contentEncoding" => self.content_encoding = Some(dec.decode_string()?),
            "enum" => self.enum_ = Some(dec.decode_array()?),
            "minimum" => self.minimum = Some(dec.decode_number()?),
            "maximum" => self.maximum = Some(dec.decode_number()?),
            "scaleFactor" => self.scale_factor = Some(dec.decode_number()?),
            "decimalPlaces" => self.decimal_places = Some(dec.decode_number()?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub(crate) fn finish(self) -> (SchemaVariant, SchemaCommon) {
        let variant = if self.common.ref_.is_some() {
            SchemaVariant::Reference
        } else {
            match self.common.type_keyword.as_ref().map(|t| t.value.as_str()) {
                Some("object") => SchemaVariant::Object(ObjectVariant {
                    properties: self.properties,
                    additional_properties: self.additional_properties,
                    required: self.required,
                    error_message: self.error_message,
                }),
                Some("array") => SchemaVariant::Array(ArrayVariant { items: self.items }),
                Some("string") => SchemaVariant::String(StringVariant {
                    format: self.format,
                    pattern: self.pattern,
                    content_encoding: self.content_encoding,
                    enum_: self.enum_,
                }),
                Some("number") => SchemaVariant::Number(NumberConstraints {
                    minimum: self.minimum,
                    maximum: self.maximum,
                    scale_factor: self.scale_factor,
                    decimal_places: self.decimal_places,
                }),
                Some("integer") => SchemaVariant::Integer(NumberConstraints {
                    minimum: self.minimum,
                    maximum: self.maximum,
                    scale_factor: self.scale_factor,
                    decimal_places: self.decimal_places,
                }),
                Some("boolean") => SchemaVariant::Boolean,
                Some("null") => SchemaVariant::Null,
                _ => SchemaVariant::Unresolved,
            }
        };
        (variant, self.common)
    }
}
