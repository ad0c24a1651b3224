//! Widget parameter normalization.
//!
//! Widget parameters arrive on the command line as repeated strings of the form
//! `id=title,label=Title,required=1`. This module turns them into an ordered
//! collection keyed by the `id` field. Field names and values are not checked
//! against any schema: the generated descriptor is a starting point to be
//! edited by hand.
//!
//! # Examples
//!
//! ```
//! use mscaffold_core::parameters::{normalize_parameters, ParameterKey};
//!
//! let params = normalize_parameters([
//!     "id=title,label=Title",
//!     "label=Anonymous",
//!     "id=title,label=Heading",
//! ])
//! .unwrap();
//!
//! assert_eq!(params.len(), 2);
//! let title = params.get(&ParameterKey::id("title")).unwrap();
//! assert_eq!(title.field("label"), Some("Heading"));
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Field that makes a parameter addressable
pub const ID_FIELD: &str = "id";

/// A single widget parameter: an open, ordered set of string fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetParameter {
    fields: IndexMap<String, String>,
}

impl WidgetParameter {
    /// Parse one `key=value,key=value` string
    pub fn parse(input: &str) -> Result<Self> {
        let mut fields = IndexMap::new();
        for segment in input.split(',') {
            let mut pieces = segment.split('=');
            let (Some(key), Some(value), None) = (pieces.next(), pieces.next(), pieces.next())
            else {
                return Err(Error::MalformedParameter {
                    input: input.to_string(),
                    segment: segment.to_string(),
                });
            };
            fields.insert(key.to_string(), value.to_string());
        }
        Ok(Self { fields })
    }

    /// The identifying field, if present
    pub fn id(&self) -> Option<&str> {
        self.field(ID_FIELD)
    }

    /// Look up a single field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// All fields in input order, `id` included
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for WidgetParameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Key under which a normalized parameter is stored
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterKey {
    /// Parameter carried an `id` field
    Id(String),
    /// Synthetic position among parameters without an `id`
    Position(usize),
}

impl ParameterKey {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Position(pos) => write!(f, "{pos}"),
        }
    }
}

/// Ordered collection of normalized widget parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetParameters {
    entries: IndexMap<ParameterKey, WidgetParameter>,
}

impl WidgetParameters {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &ParameterKey) -> Option<&WidgetParameter> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParameterKey, &WidgetParameter)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ParameterKey> {
        self.entries.keys()
    }
}

/// Template view of one entry: `{ "key": .., "id": .., "fields": {..} }`
struct ParameterEntry<'a> {
    key: &'a ParameterKey,
    parameter: &'a WidgetParameter,
}

impl Serialize for ParameterEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("key", &self.key.to_string())?;
        map.serialize_entry("id", &self.parameter.id())?;
        map.serialize_entry("fields", self.parameter)?;
        map.end()
    }
}

impl Serialize for WidgetParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for (key, parameter) in &self.entries {
            seq.serialize_element(&ParameterEntry { key, parameter })?;
        }
        seq.end()
    }
}

/// Normalize raw `key=value,...` strings into an ordered parameter collection.
///
/// Parameters with an `id` are stored under it; a later parameter with the same
/// id replaces the earlier record entirely but keeps its position. Parameters
/// without an `id` receive positional keys in input order.
pub fn normalize_parameters<I, S>(raw: I) -> Result<WidgetParameters>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entries = IndexMap::new();
    let mut next_position = 0;
    for input in raw {
        let parameter = WidgetParameter::parse(input.as_ref())?;
        let key = match parameter.id() {
            Some(id) => ParameterKey::id(id),
            None => {
                let key = ParameterKey::Position(next_position);
                next_position += 1;
                key
            }
        };
        if entries.insert(key.clone(), parameter).is_some() {
            log::debug!("Widget parameter '{}' replaced by a later definition", key);
        }
    }
    Ok(WidgetParameters { entries })
}
