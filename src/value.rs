use std::collections::BTreeMap;

use serde::ser::{Error as _, Serialize, Serializer};

/// String-keyed payload sent as the JSON request body.
pub type Payload = BTreeMap<String, Value>;

/// JSON-serializable payload value.
///
/// Serialization fails for non-finite floats, which JSON cannot represent.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Map(Payload),
}

impl Value {
    pub fn null() -> Self {
        Self::Null
    }

    pub fn bool(value: bool) -> Self {
        Self::Bool(value)
    }

    pub fn integer(value: i64) -> Self {
        Self::Integer(value)
    }

    pub fn float(value: f64) -> Self {
        Self::Float(value)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Float(value) if value.is_finite() => serializer.serialize_f64(*value),
            Self::Float(value) => Err(S::Error::custom(format!(
                "non-finite float value '{value}' is unsupported"
            ))),
            Self::Text(value) => serializer.serialize_str(value),
            Self::List(values) => serializer.collect_seq(values),
            Self::Map(entries) => serializer.collect_map(entries),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Bool(value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(value) => Self::Integer(value),
                // u64 above i64::MAX and all fractional numbers land here.
                None => Self::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(value) => Self::Text(value),
            serde_json::Value::Array(values) => Self::list(values),
            serde_json::Value::Object(entries) => Self::map(entries),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::List(values)
    }
}

impl From<Payload> for Value {
    fn from(entries: Payload) -> Self {
        Self::Map(entries)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{Payload, Value};

    #[test]
    fn helper_constructors() {
        assert_eq!(Value::null(), Value::Null);
        assert_eq!(Value::bool(true), Value::Bool(true));
        assert_eq!(Value::integer(7), Value::Integer(7));
        assert_eq!(Value::float(1.25), Value::Float(1.25));
        assert_eq!(Value::text("abc"), Value::Text("abc".to_owned()));
        assert_eq!(
            Value::list(["en", "de"]),
            Value::List(vec![Value::text("en"), Value::text("de")])
        );
    }

    #[test]
    fn serializes_nested_payload() {
        let mut payload = Payload::new();
        payload.insert("plan".to_owned(), Value::text("pro"));
        payload.insert("seats".to_owned(), Value::integer(3));
        payload.insert(
            "flags".to_owned(),
            Value::map([("beta", Value::bool(true)), ("ratio", Value::float(0.5))]),
        );
        payload.insert("none".to_owned(), Option::<i64>::None.into());

        let encoded = serde_json::to_value(&payload).expect("must serialize");
        assert_eq!(
            encoded,
            json!({
                "plan": "pro",
                "seats": 3,
                "flags": { "beta": true, "ratio": 0.5 },
                "none": null
            })
        );
    }

    #[test]
    fn rejects_non_finite_float() {
        let value = Value::list([Value::integer(1), Value::float(f64::INFINITY)]);
        let err = serde_json::to_string(&value).expect_err("must fail");
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn converts_from_json() {
        let value = Value::from(json!({"a": [1, 2.5, "x", null, false]}));
        assert_eq!(
            value,
            Value::map([(
                "a",
                Value::list([
                    Value::integer(1),
                    Value::float(2.5),
                    Value::text("x"),
                    Value::Null,
                    Value::bool(false),
                ])
            )])
        );
    }
}
