//! # Components
//!
//! A component is one named attribute of a synthesized client environment
//! (`timezone`, `colorDepth`, `plugins`, ...). A [`ComponentSet`] is the full mapping
//! hashed into a fingerprint identifier.
//!
//! Values form a closed variant type so canonicalization can match on them instead of
//! inspecting dynamic types. `Absent` is data, not an error: it models a collector that
//! produced no value, and renders differently from an explicit `Null` (see
//! [`crate::core::canonical`]).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Structured value carried by a component.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ComponentValue {
    /// The collector produced no value at all
    #[default]
    Absent,
    /// An explicit null
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<ComponentValue>),
    Map(BTreeMap<String, ComponentValue>),
}

impl ComponentValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, ComponentValue::Absent)
    }

    /// Convert into the structured-data model shared with the frame codec.
    ///
    /// Returns `None` for a top-level `Absent`. Nested absents become `null` inside
    /// lists and are dropped from maps; non-finite floats become `null`.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            ComponentValue::Absent => None,
            other => Some(other.to_json_nested()),
        }
    }

    fn to_json_nested(&self) -> Value {
        match self {
            ComponentValue::Absent | ComponentValue::Null => Value::Null,
            ComponentValue::Bool(b) => Value::Bool(*b),
            ComponentValue::Integer(i) => Value::Number(Number::from(*i)),
            ComponentValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            ComponentValue::Text(s) => Value::String(s.clone()),
            ComponentValue::List(items) => {
                Value::Array(items.iter().map(ComponentValue::to_json_nested).collect())
            }
            ComponentValue::Map(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    if !value.is_absent() {
                        map.insert(key.clone(), value.to_json_nested());
                    }
                }
                Value::Object(map)
            }
        }
    }
}

impl From<Value> for ComponentValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ComponentValue::Null,
            Value::Bool(b) => ComponentValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ComponentValue::Integer(i),
                None => ComponentValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ComponentValue::Text(s),
            Value::Array(items) => {
                ComponentValue::List(items.into_iter().map(ComponentValue::from).collect())
            }
            Value::Object(map) => ComponentValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, ComponentValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for ComponentValue {
    fn from(value: bool) -> Self {
        ComponentValue::Bool(value)
    }
}

impl From<i32> for ComponentValue {
    fn from(value: i32) -> Self {
        ComponentValue::Integer(i64::from(value))
    }
}

impl From<i64> for ComponentValue {
    fn from(value: i64) -> Self {
        ComponentValue::Integer(value)
    }
}

impl From<u32> for ComponentValue {
    fn from(value: u32) -> Self {
        ComponentValue::Integer(i64::from(value))
    }
}

impl From<f64> for ComponentValue {
    fn from(value: f64) -> Self {
        ComponentValue::Float(value)
    }
}

impl From<&str> for ComponentValue {
    fn from(value: &str) -> Self {
        ComponentValue::Text(value.to_string())
    }
}

impl From<String> for ComponentValue {
    fn from(value: String) -> Self {
        ComponentValue::Text(value)
    }
}

impl<T: Into<ComponentValue>> From<Vec<T>> for ComponentValue {
    fn from(values: Vec<T>) -> Self {
        ComponentValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ComponentValue>> From<Option<T>> for ComponentValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ComponentValue::Absent, Into::into)
    }
}

impl<K: Into<String>, V: Into<ComponentValue>> FromIterator<(K, V)> for ComponentValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ComponentValue::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// A standalone Absent serializes as null; map entries skip it like `to_json` does.
impl Serialize for ComponentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_nested().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ComponentValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ComponentValue::from)
    }
}

/// A named attribute of the synthesized environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    #[serde(default)]
    pub value: ComponentValue,
    /// When set, `value` is ignored and the component hashes as `error`
    #[serde(default)]
    pub is_error: bool,
}

impl Component {
    pub fn new(name: impl Into<String>, value: impl Into<ComponentValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            is_error: false,
        }
    }

    /// A component whose collector failed.
    pub fn error(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ComponentValue::Absent,
            is_error: true,
        }
    }
}

/// Mapping from component name to component, ordered byte-wise by name.
///
/// Built once through the consuming `with*` methods or `collect()`; a later component
/// with an existing name replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentSet {
    components: BTreeMap<String, Component>,
}

impl ComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: impl Into<String>, value: impl Into<ComponentValue>) -> Self {
        self.with_component(Component::new(name, value))
    }

    pub fn with_error(self, name: impl Into<String>) -> Self {
        self.with_component(Component::error(name))
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.insert(component.name.clone(), component);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components in byte-wise name order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }
}

impl FromIterator<Component> for ComponentSet {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ComponentSet::new(), ComponentSet::with_component)
    }
}

impl IntoIterator for ComponentSet {
    type Item = Component;
    type IntoIter = btree_map::IntoValues<String, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_names_are_unique_last_wins() {
        let set = ComponentSet::new()
            .with("platform", "Win32")
            .with("platform", "MacIntel");
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get("platform").map(|c| &c.value),
            Some(&ComponentValue::from("MacIntel"))
        );
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let set = ComponentSet::new()
            .with("timezone", "UTC")
            .with("audio", 35.7)
            .with("Zeta", 1);
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["Zeta", "audio", "timezone"]);
    }

    #[test]
    fn test_absent_rules_in_json() {
        let value: ComponentValue = vec![
            ComponentValue::Integer(1),
            ComponentValue::Absent,
            ComponentValue::Null,
        ]
        .into();
        assert_eq!(value.to_json(), Some(json!([1, null, null])));

        let map: ComponentValue = vec![
            ("kept", ComponentValue::Bool(true)),
            ("dropped", ComponentValue::Absent),
        ]
        .into_iter()
        .collect();
        assert_eq!(map.to_json(), Some(json!({"kept": true})));

        assert_eq!(ComponentValue::Absent.to_json(), None);
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(ComponentValue::Float(f64::NAN).to_json(), Some(Value::Null));
        assert_eq!(
            ComponentValue::Float(f64::INFINITY).to_json(),
            Some(Value::Null)
        );
    }

    #[test]
    fn test_from_json_value() {
        let value = ComponentValue::from(json!({"n": 1, "f": 0.5, "s": ["a"]}));
        let ComponentValue::Map(entries) = value else {
            panic!("expected map");
        };
        assert_eq!(entries["n"], ComponentValue::Integer(1));
        assert_eq!(entries["f"], ComponentValue::Float(0.5));
        assert_eq!(entries["s"], ComponentValue::List(vec!["a".into()]));
    }

    #[test]
    fn test_option_none_is_absent() {
        let value: ComponentValue = Option::<bool>::None.into();
        assert!(value.is_absent());
    }
}
