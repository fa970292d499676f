//! The Thing Model entity model: typed, offset-tracking decode targets for
//! every object shape in a Thing Model document (spec §3).
//!
//! Built on `tm_json`'s generic `Decoder`/`JsonDecode` layer; this crate
//! knows the Thing Model vocabulary but nothing about validating it —
//! that's `tm-validate`'s job, working against the types defined here.

pub mod affordances;
pub mod context;
pub mod form;
pub mod link;
pub mod literal;
pub mod schema;
pub mod support;
pub mod thing;

pub use affordances::{Action, Event, Property};
pub use context::{ContextSpecifier, PLATFORM_CONTEXT_URI, PROTOCOL_CONTEXT_URI, WOT_TD_V11_CONTEXT_URI};
pub use form::{op, Form, SchemaReference, SerializationFormat};
pub use link::{Link, REL_VALUES};
pub use literal::JsonLiteral;
pub use schema::{ArrayVariant, DataSchema, NumberConstraints, ObjectVariant, SchemaVariant, StringVariant};
pub use support::{required, Placeholder};
pub use thing::{Thing, THING_MODEL_TYPE};
