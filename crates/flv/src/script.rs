//! Script data (`onMetaData` and friends).
//!
//! A script tag payload is a run of AMF0 values read as (string key, ECMA
//! array) pairs. The AMF0 wire format itself belongs to the codec; this module
//! only pairs values up and stores them.

use std::collections::BTreeMap;
use std::error::Error as StdError;

use amf0::{Amf0Marker, Amf0Value};
use thiserror::Error;
use tracing::debug;

/// The properties of one ECMA array, in wire order. Keys may repeat.
pub type EcmaArray = Vec<(String, Amf0Value<'static>)>;

/// Metadata collected from every script tag of a file.
///
/// Keys are unique: a later entry with the same key replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaInfo {
    entries: BTreeMap<String, EcmaArray>,
}

impl MetaInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: String, value: EcmaArray) -> Option<EcmaArray> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&EcmaArray> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EcmaArray)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up a single property, e.g. `("onMetaData", "duration")`.
    /// If the property repeats inside the array, the last one wins.
    pub fn property(&self, key: &str, name: &str) -> Option<&Amf0Value<'static>> {
        self.get(key)?
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }
}

/// Why a script tag payload could not be paired into metadata entries.
#[derive(Error, Debug)]
pub enum ScriptDataError {
    /// The codec failed to decode a value.
    #[error("codec error: {0}")]
    Codec(#[source] Box<dyn StdError + Send + Sync>),

    #[error("expected a string key, got {0:?}")]
    NonStringKey(Amf0Marker),

    #[error("expected an ECMA array for key {key:?}, got {got:?}")]
    NonEcmaArrayValue { key: String, got: Amf0Marker },

    /// The payload ended right after a key.
    #[error("missing value for key {0:?}")]
    MissingValue(String),
}

/// Pair up decoded values into `meta`.
///
/// `values` is the codec: anything yielding one decoded AMF0 value per item
/// and ending when the input is exhausted, such as [`amf0::Amf0Decoder`].
/// Ending while a key is expected is success; any other end or any codec
/// error fails. Returns the number of pairs stored.
pub fn decode_script_data<'a, I, E>(values: I, meta: &mut MetaInfo) -> Result<usize, ScriptDataError>
where
    I: IntoIterator<Item = Result<Amf0Value<'a>, E>>,
    E: StdError + Send + Sync + 'static,
{
    let codec = |err: E| ScriptDataError::Codec(Box::new(err));
    let mut values = values.into_iter();
    let mut pairs = 0;

    while let Some(key) = values.next() {
        let key = match key.map_err(codec)? {
            Amf0Value::String(key) | Amf0Value::LongString(key) => key.into_owned(),
            other => return Err(ScriptDataError::NonStringKey(other.marker())),
        };

        let value = match values.next() {
            Some(value) => value.map_err(codec)?,
            None => return Err(ScriptDataError::MissingValue(key)),
        };

        let properties: EcmaArray = match value {
            Amf0Value::EcmaArray(props) => props
                .iter()
                .map(|(k, v)| (k.to_string(), v.into_owned()))
                .collect(),
            other => {
                return Err(ScriptDataError::NonEcmaArrayValue {
                    key,
                    got: other.marker(),
                });
            }
        };

        debug!(key = %key, properties = properties.len(), "script data entry");
        if meta.insert(key, properties).is_some() {
            debug!("script data key repeated, keeping the later value");
        }
        pairs += 1;
    }

    Ok(pairs)
}
