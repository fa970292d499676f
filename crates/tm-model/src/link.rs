//! `Link` entities (spec §3 Link).

use tm_json::{Decoder, JsonDecode, Offset, PropertyNameMap, Tracked};

use crate::support::required;

/// The closed vocabulary of `rel` values a `Link` may carry.
pub const REL_VALUES: &[&str] = &[
    "extends",
    "reference",
    "typedReference",
    "capability",
    "component",
    "schemaNaming",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub offset: Offset,
    pub property_map: PropertyNameMap,
    pub rel: Tracked<String>,
    pub href: Tracked<String>,
    pub type_: Tracked<String>,
    pub ref_name: Option<Tracked<String>>,
    pub ref_type: Option<Tracked<String>>,
}

impl JsonDecode for Link {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, tm_json::DecodeError> {
        let mut rel = None;
        let mut href = None;
        let mut type_ = None;
        let mut ref_name = None;
        let mut ref_type = None;

        let (offset, property_map) = dec.decode_object(|dec, key, _span| {
            match key {
                "rel" => rel = Some(dec.decode_string()?),
                "href" => href = Some(dec.decode_string()?),
                "type" => type_ = Some(dec.decode_string()?),
                "refName" => ref_name = Some(dec.decode_string()?),
                "refType" => ref_type = Some(dec.decode_string()?),
                _ => dec.skip_value()?,
            }
            Ok(())
        })?;

        Ok(Link {
            offset,
            property_map,
            rel: required(rel, offset),
            href: required(href, offset),
            type_: required(type_, offset),
            ref_name,
            ref_type,
        })
    }
}
