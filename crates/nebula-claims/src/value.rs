use std::{collections::BTreeMap, fmt};

use serde::{
    de::{self, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_json::{Map, Number, Value};

use crate::scalar::ScalarString;

/// A single claim value as it appears in a rule override or in the final claim set.
///
/// Every value must end up JSON-representable. Numbers JSON can't hold (`.inf`, `.nan`,
/// integers wider than 64 bits) are kept as their text, and a YAML tag such as `!custom val`
/// is dropped in favour of the value it wraps. `Null` keeps an explicit empty value.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ClaimValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<ClaimValue>),
    Map(BTreeMap<String, ClaimValue>),
}

impl ClaimValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ClaimValue>> {
        match self {
            ClaimValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ClaimValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ClaimValueVisitor)
    }
}

struct ClaimValueVisitor;

impl<'de> Visitor<'de> for ClaimValueVisitor {
    type Value = ClaimValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a claim value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ClaimValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ClaimValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ClaimValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ClaimValue::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ClaimValue::Number(v.into()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
        match (i64::try_from(v), u64::try_from(v)) {
            (Ok(v), _) => self.visit_i64(v),
            (_, Ok(v)) => self.visit_u64(v),
            _ => Ok(ClaimValue::String(v.to_string())),
        }
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        match u64::try_from(v) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Ok(ClaimValue::String(v.to_string())),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(match Number::from_f64(v) {
            Some(n) => ClaimValue::Number(n),
            None if v.is_nan() => ClaimValue::from(".nan"),
            None if v.is_sign_negative() => ClaimValue::from("-.inf"),
            None => ClaimValue::from(".inf"),
        })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ClaimValue::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ClaimValue::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut values = Vec::new();
        while let Some(value) = seq.next_element()? {
            values.push(value);
        }
        Ok(ClaimValue::List(values))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut values = BTreeMap::new();
        while let Some((ScalarString(key), value)) = map.next_entry()? {
            values.insert(key, value);
        }
        Ok(ClaimValue::Map(values))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Self::Value, A::Error> {
        let (de::IgnoredAny, variant) = data.variant()?;
        variant.newtype_variant()
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_owned())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Number(value.into())
    }
}

impl<T: Into<ClaimValue>> From<Vec<T>> for ClaimValue {
    fn from(values: Vec<T>) -> Self {
        ClaimValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, ClaimValue>> for ClaimValue {
    fn from(map: BTreeMap<String, ClaimValue>) -> Self {
        ClaimValue::Map(map)
    }
}

impl From<ClaimValue> for Value {
    fn from(value: ClaimValue) -> Self {
        match value {
            ClaimValue::Null => Value::Null,
            ClaimValue::Bool(b) => Value::Bool(b),
            ClaimValue::Number(n) => Value::Number(n),
            ClaimValue::String(s) => Value::String(s),
            ClaimValue::List(values) => Value::Array(values.into_iter().map(Value::from).collect()),
            ClaimValue::Map(map) => Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect::<Map<_, _>>()),
        }
    }
}
