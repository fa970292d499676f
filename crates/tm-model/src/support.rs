//! Shared decode helpers used across entity types.

use tm_json::{ArrayTracker, MapTracker, Offset, Tracked};

/// A placeholder value used when a required field is absent from the
/// source. The decoder never fails a whole document over a missing
/// required field — that's `tm-validate`'s `PropertyMissing`/`ElementMissing`
/// territory, which needs the rest of the entity intact to keep validating.
pub trait Placeholder {
    fn placeholder(offset: Offset) -> Self;
}

impl Placeholder for Tracked<String> {
    fn placeholder(offset: Offset) -> Self {
        Tracked::new(offset, String::new())
    }
}

impl Placeholder for Tracked<f64> {
    fn placeholder(offset: Offset) -> Self {
        Tracked::new(offset, 0.0)
    }
}

impl Placeholder for Tracked<bool> {
    fn placeholder(offset: Offset) -> Self {
        Tracked::new(offset, false)
    }
}

impl<T> Placeholder for ArrayTracker<T> {
    fn placeholder(offset: Offset) -> Self {
        ArrayTracker::new(offset, Vec::new())
    }
}

impl<T> Placeholder for MapTracker<T> {
    fn placeholder(offset: Offset) -> Self {
        MapTracker::new(offset)
    }
}

/// Fill in a required-but-absent field with its placeholder.
pub fn required<T: Placeholder>(value: Option<T>, offset: Offset) -> T {
    value.unwrap_or_else(|| T::placeholder(offset))
}
