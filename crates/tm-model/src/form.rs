//! `Form` and `SchemaReference` entities (spec §3 Form, §4.5).

use tm_json::{ArrayTracker, Decoder, JsonDecode, Offset, PropertyNameMap, Tracked};

use crate::support::required;

/// The operation vocabulary, partitioned by the kind of form it appears on
/// (spec §4.3.3). `tm-validate` owns interpreting these against a form's
/// kind; the model only carries the raw strings as they appeared in source.
pub mod op {
    pub const READ_ALL_PROPERTIES: &str = "readAllProperties";
    pub const WRITE_MULTIPLE_PROPERTIES: &str = "writeMultipleProperties";
    pub const SUBSCRIBE_ALL_EVENTS: &str = "subscribeAllEvents";
    pub const READ_PROPERTY: &str = "readproperty";
    pub const WRITE_PROPERTY: &str = "writeproperty";
    pub const INVOKE_ACTION: &str = "invokeaction";
    pub const SUBSCRIBE_EVENT: &str = "subscribeevent";
}

/// `contentType` resolves to one of these; the sole vocabulary the core
/// shares with a downstream renderer (spec Design Notes §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationFormat {
    None,
    Json,
    Raw,
    Custom,
}

impl SerializationFormat {
    /// Classify a raw `contentType` MIME string. Anything unrecognized is
    /// reported by the Validator as `PropertyUnsupportedValue`, not here.
    pub fn from_content_type(raw: &str) -> Option<Self> {
        match raw {
            "application/json" => Some(SerializationFormat::Json),
            "application/octet-stream" => Some(SerializationFormat::Raw),
            "" => Some(SerializationFormat::Custom),
            _ => None,
        }
    }
}

/// A reference to a `SchemaDefinitions` entry, used by `headerInfo` and
/// `additionalResponses`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaReference {
    pub offset: Offset,
    pub property_map: PropertyNameMap,
    pub ref_: Tracked<String>,
}

impl JsonDecode for SchemaReference {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, tm_json::DecodeError> {
        let mut ref_ = None;
        let (offset, property_map) = dec.decode_object(|dec, key, _span| {
            match key {
                "ref" => ref_ = Some(dec.decode_string()?),
                _ => dec.skip_value()?,
            }
            Ok(())
        })?;
        Ok(SchemaReference {
            offset,
            property_map,
            ref_: required(ref_, offset),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub offset: Offset,
    pub property_map: PropertyNameMap,
    pub op: Option<ArrayTracker<Tracked<String>>>,
    pub content_type: Option<Tracked<String>>,
    pub topic: Option<Tracked<String>>,
    pub service_group_id: Option<Tracked<String>>,
    pub header_code: Option<Tracked<String>>,
    pub header_info: Option<ArrayTracker<SchemaReference>>,
    pub additional_responses: Option<ArrayTracker<SchemaReference>>,
}

impl JsonDecode for Form {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, tm_json::DecodeError> {
        let mut op = None;
        let mut content_type = None;
        let mut topic = None;
        let mut service_group_id = None;
        let mut header_code = None;
        let mut header_info = None;
        let mut additional_responses = None;

        let (offset, property_map) = dec.decode_object(|dec, key, _span| {
            match key {
                "op" => op = Some(dec.decode_array()?),
                "contentType" => content_type = Some(dec.decode_string()?),
                "topic" => topic = Some(dec.decode_string()?),
                "serviceGroupId" => service_group_id = Some(dec.decode_string()?),
                "headerCode" => header_code = Some(dec.decode_string()?),
                "headerInfo" => header_info = Some(dec.decode_array()?),
                "additionalResponses" => additional_responses = Some(dec.decode_array()?),
                _ => dec.skip_value()?,
            }
            Ok(())
        })?;

        Ok(Form {
            offset,
            property_map,
            op,
            content_type,
            topic,
            service_group_id,
            header_code,
            header_info,
            additional_responses,
        })
    }
}
