//! The root `Thing` entity (spec §3 Thing).

use tm_json::{ArrayTracker, Decoder, JsonDecode, MapTracker, Offset, PropertyNameMap, Tracked};

use crate::affordances::{Action, Event, Property};
use crate::context::ContextSpecifier;
use crate::form::Form;
use crate::link::Link;
use crate::schema::DataSchema;
use crate::support::required;

/// The required `@type` value on every Thing Model document.
pub const THING_MODEL_TYPE: &str = "tm:ThingModel";

#[derive(Debug, Clone, PartialEq)]
pub struct Thing {
    pub offset: Offset,
    pub property_map: PropertyNameMap,
    pub context: ArrayTracker<ContextSpecifier>,
    pub type_: Tracked<String>,
    pub title: Tracked<String>,
    pub description: Option<Tracked<String>>,
    pub links: ArrayTracker<Link>,
    pub schema_definitions: MapTracker<DataSchema>,
    pub forms: ArrayTracker<Form>,
    pub actions: MapTracker<Action>,
    pub properties: MapTracker<Property>,
    pub events: MapTracker<Event>,
    pub is_composite: Option<Tracked<bool>>,
    pub is_event: Option<Tracked<bool>>,
    pub type_ref: Option<Tracked<String>>,
}

impl JsonDecode for Thing {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, tm_json::DecodeError> {
        let mut context = None;
        let mut type_ = None;
        let mut title = None;
        let mut description = None;
        let mut links = None;
        let mut schema_definitions = None;
        let mut forms = None;
        let mut actions = None;
        let mut properties = None;
        let mut events = None;
        let mut is_composite = None;
        let mut is_event = None;
        let mut type_ref = None;

        tracing::trace!("decoding Thing");

        let (offset, property_map) = dec.decode_object(|dec, key, _span| {
            match key {
                "@context" => context = Some(dec.decode_array()?),
                "@type" => type_ = Some(dec.decode_string()?),
                "title" => title = Some(dec.decode_string()?),
                "description" => description = Some(dec.decode_string()?),
                "links" => links = Some(dec.decode_array()?),
                "schemaDefinitions" => schema_definitions = Some(dec.decode_map()?),
                "forms" => forms = Some(dec.decode_array()?),
                "actions" => actions = Some(dec.decode_map()?),
                "properties" => properties = Some(dec.decode_map()?),
                "events" => events = Some(dec.decode_map()?),
                "isComposite" => is_composite = Some(dec.decode_bool()?),
                "isEvent" => is_event = Some(dec.decode_bool()?),
                "typeRef" => type_ref = Some(dec.decode_string()?),
                _ => dec.skip_value()?,
            }
            Ok(())
        })?;

        let thing = Thing {
            offset,
            property_map,
            context: required(context, offset),
            type_: required(type_, offset),
            title: required(title, offset),
            description,
            links: required(links, offset),
            schema_definitions: required(schema_definitions, offset),
            forms: required(forms, offset),
            actions: required(actions, offset),
            properties: required(properties, offset),
            events: required(events, offset),
            is_composite,
            is_event,
            type_ref,
        };

        tracing::trace!(title = %thing.title.value, "decoded Thing");
        Ok(thing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_valid_thing() {
        let src = r#"{
            "@context": ["https://www.w3.org/2022/wot/td/v1.1", {"dtv": "http://azure.com/DigitalTwins/dtmi#"}],
            "@type": "tm:ThingModel",
            "title": "Lamp"
        }"#;
        let mut dec = Decoder::new(src);
        let thing: Thing = dec.parse_document().unwrap();
        assert_eq!(thing.type_.value, THING_MODEL_TYPE);
        assert_eq!(thing.title.value, "Lamp");
        assert_eq!(thing.context.len(), 2);
        assert!(thing.actions.is_empty());
        assert!(thing.properties.is_empty());
        assert!(thing.events.is_empty());
    }

    #[test]
    fn missing_title_becomes_placeholder_not_decode_error() {
        let src = r#"{"@context":[],"@type":"tm:ThingModel"}"#;
        let mut dec = Decoder::new(src);
        let thing: Thing = dec.parse_document().unwrap();
        assert_eq!(thing.title.value, "");
    }

    #[test]
    fn duplicate_top_level_key_is_fatal() {
        let src = r#"{"@type":"tm:ThingModel","@type":"tm:ThingModel","title":"X"}"#;
        let mut dec = Decoder::new(src);
        let result: Result<Thing, _> = dec.parse_document();
        assert!(result.is_err());
    }
}
