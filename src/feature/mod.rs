//! INSDC feature annotations: locations, qualifier values, and the feature
//! container itself.

mod location;
mod value;

pub use self::location::{FormatError, Location, SubLocation};
pub use self::value::{Value, ValueError};

use indexmap::IndexMap;

/// One annotated feature: its type (CDS, gene, ...), where it sits on the
/// sequence, and its qualifier table. Qualifiers keep insertion order.
#[derive(Debug, Clone)]
pub struct Feature {
    pub kind: String,
    pub location: Location,
    pub qualifiers: IndexMap<String, Value>,
}

impl Feature {
    /// Build a feature from its type and a raw location string.
    pub fn new(kind: &str, location: &str) -> Result<Feature, FormatError> {
        Ok(Feature {
            kind: kind.to_string(),
            location: Location::parse(location)?,
            qualifiers: IndexMap::new(),
        })
    }

    pub fn set_qualifier(&mut self, tag: &str, value: Value) {
        self.qualifiers.insert(tag.to_string(), value);
    }

    pub fn qualifier(&self, tag: &str) -> Option<&Value> {
        self.qualifiers.get(tag)
    }
}
