//! Tagged elements and their persisted container.

use serde::{Deserialize, Serialize};

use crate::error::{DeserializeError, SerializeError};
use crate::format::Format;

/// One serialized object: its registered type name plus its field payload.
///
/// `type_name` decides what type is rebuilt on load; `payload` is only
/// meaningful to that type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedElement {
    pub type_name: String,
    pub payload: String,
}

impl TaggedElement {
    pub fn new(type_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            payload: payload.into(),
        }
    }
}

/// Ordered list of tagged elements, as persisted by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementContainer {
    pub elements: Vec<TaggedElement>,
}

impl ElementContainer {
    pub fn new(elements: Vec<TaggedElement>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Render the whole container as text.
    pub fn to_text(&self, format: Format) -> Result<String, SerializeError> {
        format.to_text(self)
    }

    /// Parse a container previously written by [`to_text`](Self::to_text).
    pub fn from_text(text: &str, format: Format) -> Result<Self, DeserializeError> {
        format.from_text(text)
    }
}

impl From<Vec<TaggedElement>> for ElementContainer {
    fn from(elements: Vec<TaggedElement>) -> Self {
        Self { elements }
    }
}

impl IntoIterator for ElementContainer {
    type Item = TaggedElement;
    type IntoIter = std::vec::IntoIter<TaggedElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}
