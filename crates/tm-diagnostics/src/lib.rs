//! The Error Log & Reporter (spec §4.2): the diagnostic taxonomy, the
//! accumulating `ErrorLog`, cross-file registration tables, byte-offset to
//! line-number translation, and `ariadne`-backed rendering.

mod condition;
mod line_index;
mod record;
mod registrations;
mod render;
mod reporter;

pub use condition::{Condition, Level};
pub use line_index::LineIndex;
pub use record::{ErrorLog, ErrorRecord};
pub use reporter::Reporter;
