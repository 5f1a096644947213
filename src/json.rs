// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! JSON representation and typed state.
//!
//! Documents convert losslessly to and from [`serde_json::Value`], with two exceptions:
//! non-finite floats become `null`, and integers beyond the range of `i64` become floats.
//!
//! Any type implementing [`Serialize`] can seed a store, and any type implementing
//! [`DeserializeOwned`] can be read back out of a view:
//!
//! ```rust
//! # use pure_undo::Store;
//! # use serde::{Deserialize, Serialize};
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Animal {
//!     name: String,
//!     age: u32,
//! }
//!
//! let store = Store::from_serialize(&vec![Animal { name: "Sen".into(), age: 8 }]).unwrap();
//! store.store_for(0usize).update(|d| d.set("age", 9)).unwrap();
//!
//! let sen: Animal = store.store_for(0usize).state_as().unwrap();
//! assert_eq!(sen, Animal { name: "Sen".into(), age: 9 });
//! ```
use crate::{Map, Store, Value};
use serde::{Serialize, de::DeserializeOwned};

/// Converts a [`serde_json::Value`] to a [`Value`].
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(n) => Value::Int(n),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => items.into_iter().map(Value::from).collect(),
            serde_json::Value::Object(fields) => Value::from(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map>(),
            ),
        }
    }
}

/// Converts a [`Value`] to a `serde_json::Value`.
impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            // NaN and the infinities have no JSON representation
            Value::Float(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s.to_string()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        serde_json::Value::from(&value)
    }
}

impl Value {
    /// Converts any serializable value into a document.
    pub fn from_serialize<T>(value: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_value(value).map(Value::from)
    }

    /// Deserializes the document into `T`.
    pub fn deserialize_into<T>(&self) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        serde_json::from_value(serde_json::Value::from(self))
    }
}

impl Store {
    /// Creates a root store whose initial state is `state`, serialized.
    pub fn from_serialize<T>(state: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        Value::from_serialize(state).map(Store::new)
    }

    /// Deserializes this handle's current state into `T`.
    pub fn state_as<T>(&self) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        self.state().deserialize_into()
    }
}
