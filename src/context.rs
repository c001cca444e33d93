//! Context handling for kiln templates.
//! A context is the nested key/value structure a template declares in
//! `project.json`, and the same shape saved as local answers next to a
//! rendered project so a later run can reuse them.

use crate::constants::DELIMS_KEY;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;

/// A single context entry.
///
/// JSON arrays model "default plus alternatives": the first element is the
/// value used without prompting, the rest are offered as choices. An empty
/// array carries no default and is kept as a plain scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ContextValue {
    Scalar(Value),
    Sequence { default: Value, alternatives: Vec<Value> },
    Group(Context),
}

impl ContextValue {
    /// The value a leaf resolves to without asking. Groups have none.
    pub fn default_value(&self) -> Option<&Value> {
        match self {
            ContextValue::Scalar(value) => Some(value),
            ContextValue::Sequence { default, .. } => Some(default),
            ContextValue::Group(_) => None,
        }
    }

    /// Returns the value with `chosen` recorded as the answer.
    ///
    /// Scalars are replaced outright. Sequences keep their choices and move
    /// `chosen` to the default slot.
    pub fn with_answer(&self, chosen: Value) -> ContextValue {
        match self {
            ContextValue::Sequence { default, alternatives } => {
                let remaining = std::iter::once(default)
                    .chain(alternatives.iter())
                    .filter(|item| **item != chosen)
                    .cloned()
                    .collect();
                ContextValue::Sequence { default: chosen, alternatives: remaining }
            }
            _ => ContextValue::Scalar(chosen),
        }
    }
}

impl From<Value> for ContextValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                let mut items = items.into_iter();
                match items.next() {
                    Some(default) => {
                        ContextValue::Sequence { default, alternatives: items.collect() }
                    }
                    None => ContextValue::Scalar(Value::Array(Vec::new())),
                }
            }
            Value::Object(map) => ContextValue::Group(Context(
                map.into_iter().map(|(key, value)| (key, value.into())).collect(),
            )),
            other => ContextValue::Scalar(other),
        }
    }
}

impl From<ContextValue> for Value {
    fn from(value: ContextValue) -> Self {
        match value {
            ContextValue::Scalar(value) => value,
            ContextValue::Sequence { default, alternatives } => {
                Value::Array(std::iter::once(default).chain(alternatives).collect())
            }
            ContextValue::Group(context) => Value::Object(
                context.0.into_iter().map(|(key, value)| (key, value.into())).collect(),
            ),
        }
    }
}

/// Custom open/close markers for template variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub left: String,
    pub right: String,
}

/// Ordered mapping from key to [`ContextValue`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(IndexMap<String, ContextValue>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ContextValue> {
        self.0.get_mut(key)
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: ContextValue) -> Option<ContextValue> {
        self.0.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ContextValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads the `_delims_` override, if it is a pair of strings.
    pub fn delimiters(&self) -> Option<Delimiters> {
        let value = self.0.get(DELIMS_KEY)?;
        if let ContextValue::Sequence { default: Value::String(left), alternatives } = value {
            if let [Value::String(right)] = alternatives.as_slice() {
                return Some(Delimiters { left: left.clone(), right: right.clone() });
            }
        }
        warn!("Ignoring malformed '{DELIMS_KEY}', expected two strings");
        None
    }

    /// Overwrites declared keys with the values from a saved context.
    ///
    /// Saved keys the template no longer declares are dropped, and the saved
    /// delimiter override never replaces the template's own.
    pub fn merge(&mut self, saved: Context) {
        for (key, value) in saved.0 {
            if key == DELIMS_KEY {
                continue;
            }
            match self.0.get_mut(&key) {
                Some(slot) => {
                    debug!("Using saved value for '{key}'");
                    *slot = value;
                }
                None => debug!("Dropping saved key '{key}' the template no longer declares"),
            }
        }
    }

    /// Loads a context from a JSON file.
    ///
    /// # Returns
    /// * `Ok(None)` - The file does not exist
    /// * `Ok(Some(context))` - The decoded context
    ///
    /// # Errors
    /// * `Error::ContextRead` if the file exists but cannot be read or is not a JSON object
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Context>> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No context file at {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::ContextRead {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        let context = serde_json::from_str(&content).map_err(|e| Error::ContextRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Some(context))
    }

    /// Writes the context as indented JSON, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let write_error = |reason: String| Error::ContextWrite { path: path.to_path_buf(), reason };

        let mut content =
            serde_json::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;
        content.push('\n');
        std::fs::write(path, content).map_err(|e| write_error(e.to_string()))?;
        debug!("Saved context to {}", path.display());
        Ok(())
    }
}

impl FromIterator<(String, ContextValue)> for Context {
    fn from_iter<I: IntoIterator<Item = (String, ContextValue)>>(iter: I) -> Self {
        Context(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = (&'a String, &'a ContextValue);
    type IntoIter = indexmap::map::Iter<'a, String, ContextValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
