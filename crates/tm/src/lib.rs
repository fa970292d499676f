//! The Thing Model core's public surface (spec §6): decode a document,
//! validate it, and resolve per-form wire details. Thin re-exports and one
//! orchestrating `parse` wrapper; the real work lives in `tm-json`,
//! `tm-model`, `tm-validate`, `tm-resolve`, and `tm-diagnostics`.

pub use tm_diagnostics::{Condition, ErrorLog, ErrorRecord, Level, Reporter};
pub use tm_model::Thing;
pub use tm_resolve::{resolve_form_info, FormInfo, ResolvedSchema};
pub use tm_validate::validate;

use tm_json::{Decoder, JsonDecode};

/// Decode one Thing Model document's bytes into a [`Thing`]. A malformed
/// document is a single synchronous failure — the Decoder's [`DecodeError`]
/// becomes a Fatal `JsonInvalid` record on `reporter` (spec §7), and this
/// returns `None`; the caller never sees a partially-built `Thing`.
///
/// [`DecodeError`]: tm_json::DecodeError
pub fn parse(source: &str, reporter: &mut Reporter) -> Option<Thing> {
    let mut decoder = Decoder::new(source);
    match decoder.parse_document::<Thing>() {
        Ok(thing) => Some(thing),
        Err(err) => {
            tracing::debug!(error = %err, "decode failed");
            let message = err.to_string();
            reporter.add_fatal(Condition::JsonInvalid, message, err.span.offset());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_validate_a_minimal_thing() {
        let source = r#"{"@context":["https://www.w3.org/2022/wot/td/v1.1",{"dtv":"http://azure.com/DigitalTwins/dtmi#"}],"@type":"tm:ThingModel","title":"Lamp"}"#;
        let mut reporter = Reporter::new("thing.json", source, "default");
        let thing = parse(source, &mut reporter).expect("well-formed document parses");
        assert!(validate(&thing, &mut reporter));
        assert!(reporter.log().fatal_error().is_none());
    }

    #[test]
    fn malformed_json_reports_a_fatal_record_and_returns_none() {
        let source = r#"{"@type": "#;
        let mut reporter = Reporter::new("thing.json", source, "default");
        let thing = parse(source, &mut reporter);
        assert!(thing.is_none());
        assert!(reporter.log().fatal_error().is_some());
        assert_eq!(reporter.log().fatal_error().unwrap().condition, Condition::JsonInvalid);
    }

    #[test]
    fn duplicate_key_is_a_fatal_decode_error() {
        let source = r#"{"@type":"tm:ThingModel","@type":"tm:ThingModel","title":"Lamp"}"#;
        let mut reporter = Reporter::new("thing.json", source, "default");
        let thing = parse(source, &mut reporter);
        assert!(thing.is_none());
        assert!(reporter.log().fatal_error().is_some());
    }
}
