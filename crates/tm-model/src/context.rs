//! `@context` entries: a string-or-object tagged sum (spec §3 Context).

use tm_json::{Decoder, JsonDecode, MapTracker, Offset, Tracked};

/// The WoT Thing Description v1.1 context URI — the one recognized remote
/// context entry. Anything else is a warning, ignored by the validator.
pub const WOT_TD_V11_CONTEXT_URI: &str = "https://www.w3.org/2022/wot/td/v1.1";

/// The two recognized local-context URIs (spec §3 Context, §4.3.1). A local
/// context entry maps an author-chosen prefix name to one of these; it's
/// the URI that's recognized, not the key it's bound to — the minimal
/// example in spec §8 binds the protocol URI to the prefix `"dtv"`, but any
/// prefix name is accepted as long as the URI matches.
pub const PROTOCOL_CONTEXT_URI: &str = "http://azure.com/DigitalTwins/dtmi#";
pub const PLATFORM_CONTEXT_URI: &str = "https://www.w3.org/2022/wot/td/platform/v1";

/// One `@context` array entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextSpecifier {
    /// A bare URI string.
    Remote(Tracked<String>),
    /// An object mapping one or more prefixes to their URIs.
    Local(MapTracker<Tracked<String>>),
}

impl ContextSpecifier {
    pub fn offset(&self) -> Offset {
        match self {
            ContextSpecifier::Remote(t) => t.offset,
            ContextSpecifier::Local(m) => m.offset,
        }
    }
}

impl JsonDecode for ContextSpecifier {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self, tm_json::DecodeError> {
        match dec.peek().kind {
            tm_json::TokenKind::String => Ok(ContextSpecifier::Remote(dec.decode_string()?)),
            _ => Ok(ContextSpecifier::Local(dec.decode_map()?)),
        }
    }
}
