use serde_json::{Map, Value};

use crate::error::ActionsError;

/// Key holding the activity type in webhook event data.
pub const ACTION: &str = "action";

/// Parsed contents of the event file for the current workflow run.
///
/// Lookups take a path of object keys (`&["issue", "number"]`) and fail with
/// [`ActionsError::MissingField`] or [`ActionsError::FieldType`] instead of
/// returning a default.
#[derive(Debug, Clone, PartialEq)]
pub struct EventPayload {
    root: Value,
}

impl EventPayload {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Top-level keys in sorted order; empty when the document is not an object.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = self
            .root
            .as_object()
            .map(|obj| obj.keys().map(String::as_str).collect::<Vec<_>>())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.root
            .as_object()
            .is_some_and(|obj| obj.contains_key(key))
    }

    pub fn contains_path(&self, path: &[&str]) -> bool {
        self.lookup(path).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn value_at(&self, path: &[&str]) -> Result<&Value, ActionsError> {
        self.lookup(path).ok_or_else(|| ActionsError::MissingField {
            path: render_path(path),
        })
    }

    pub fn str_at(&self, path: &[&str]) -> Result<&str, ActionsError> {
        self.value_at(path)?
            .as_str()
            .ok_or_else(|| type_error(path, "a string"))
    }

    pub fn u64_at(&self, path: &[&str]) -> Result<u64, ActionsError> {
        self.value_at(path)?
            .as_u64()
            .ok_or_else(|| type_error(path, "an unsigned integer"))
    }

    pub fn bool_at(&self, path: &[&str]) -> Result<bool, ActionsError> {
        self.value_at(path)?
            .as_bool()
            .ok_or_else(|| type_error(path, "a boolean"))
    }

    pub fn object_at(&self, path: &[&str]) -> Result<&Map<String, Value>, ActionsError> {
        self.value_at(path)?
            .as_object()
            .ok_or_else(|| type_error(path, "an object"))
    }

    pub fn array_at(&self, path: &[&str]) -> Result<&[Value], ActionsError> {
        self.value_at(path)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| type_error(path, "an array"))
    }

    pub fn action(&self) -> Result<&str, ActionsError> {
        self.str_at(&[ACTION])
    }

    fn lookup(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(&self.root, |node, key| node.as_object()?.get(*key))
    }
}

impl From<Value> for EventPayload {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

fn render_path(path: &[&str]) -> String {
    if path.is_empty() {
        return "<root>".to_string();
    }
    path.join(".")
}

fn type_error(path: &[&str], expected: &'static str) -> ActionsError {
    ActionsError::FieldType {
        path: render_path(path),
        expected,
    }
}
