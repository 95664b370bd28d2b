//! Serde helpers shared by the bundle model
//!
//! Bundle documents are written by hand, so the same value shows up in
//! several YAML shapes: machine ids as `0` or `'0'`, `to` as a scalar or a
//! list, empty sections as `null`. The helpers here normalize those shapes
//! and reject duplicate keys, which plain map deserialization silently
//! overwrites.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use super::{Machine, MachineId, OptionValue};

/// A scalar read as text, whether YAML typed it as a string or an integer
pub(crate) struct ScalarText(pub String);

struct ScalarTextVisitor;

impl Visitor<'_> for ScalarTextVisitor {
    type Value = ScalarText;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or an integer")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<ScalarText, E> {
        Ok(ScalarText(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<ScalarText, E> {
        Ok(ScalarText(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<ScalarText, E> {
        Ok(ScalarText(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<ScalarText, E> {
        Ok(ScalarText(value.to_string()))
    }
}

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarTextVisitor)
    }
}

struct UniqueMapVisitor<K, V> {
    what: &'static str,
    marker: PhantomData<fn() -> (K, V)>,
}

impl<'de, K, V> Visitor<'de> for UniqueMapVisitor<K, V>
where
    K: Deserialize<'de> + Ord + fmt::Display,
    V: Deserialize<'de>,
{
    type Value = BTreeMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a mapping keyed by {}", self.what)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BTreeMap::new())
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some(key) = map.next_key::<K>()? {
            if entries.contains_key(&key) {
                return Err(de::Error::custom(format!(
                    "duplicate {} '{}'",
                    self.what, key
                )));
            }
            let value = map.next_value::<V>()?;
            entries.insert(key, value);
        }
        Ok(entries)
    }
}

/// Deserialize a mapping, failing on the first repeated key
fn unique_map<'de, D, K, V>(
    deserializer: D,
    what: &'static str,
) -> Result<BTreeMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de> + Ord + fmt::Display,
    V: Deserialize<'de>,
{
    deserializer.deserialize_any(UniqueMapVisitor {
        what,
        marker: PhantomData,
    })
}

pub(crate) fn deserialize_machines<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<MachineId, Machine>, D::Error>
where
    D: Deserializer<'de>,
{
    // `'0':` with no body is a machine without constraints
    let raw: BTreeMap<MachineId, Option<Machine>> = unique_map(deserializer, "machine id")?;
    Ok(raw
        .into_iter()
        .map(|(id, machine)| (id, machine.unwrap_or_default()))
        .collect())
}

pub(crate) fn deserialize_applications<'de, D, V>(
    deserializer: D,
) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    unique_map(deserializer, "application name")
}

pub(crate) fn deserialize_options<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, OptionValue>, D::Error>
where
    D: Deserializer<'de>,
{
    // A null option value leaves the charm default in place
    let raw: BTreeMap<String, Option<OptionValue>> = unique_map(deserializer, "option")?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect())
}

struct PlacementListVisitor;

impl<'de> Visitor<'de> for PlacementListVisitor {
    type Value = Vec<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a placement directive or a list of them")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(vec![value.to_string()])
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(vec![value.to_string()])
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(vec![value.to_string()])
    }

    fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
    where
        S: SeqAccess<'de>,
    {
        let mut directives = Vec::new();
        while let Some(ScalarText(directive)) = seq.next_element()? {
            directives.push(directive);
        }
        Ok(directives)
    }
}

pub(crate) fn deserialize_placement_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(PlacementListVisitor)
}

/// Treat an explicit `null` like an absent key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

struct OptionValueVisitor;

impl Visitor<'_> for OptionValueVisitor {
    type Value = OptionValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar option value")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<OptionValue, E> {
        Ok(OptionValue::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<OptionValue, E> {
        Ok(OptionValue::Int(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<OptionValue, E> {
        i64::try_from(value)
            .map(OptionValue::Int)
            .map_err(|_| E::custom(format!("option value {value} is out of range")))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<OptionValue, E> {
        Ok(OptionValue::Float(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<OptionValue, E> {
        Ok(OptionValue::String(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<OptionValue, E> {
        Ok(OptionValue::String(value))
    }
}

impl<'de> Deserialize<'de> for OptionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OptionValueVisitor)
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Bool(value) => serializer.serialize_bool(*value),
            OptionValue::Int(value) => serializer.serialize_i64(*value),
            OptionValue::Float(value) => serializer.serialize_f64(*value),
            OptionValue::String(value) => serializer.serialize_str(value),
        }
    }
}

impl<'de> Deserialize<'de> for MachineId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ScalarText(id) = ScalarText::deserialize(deserializer)?;
        if id.trim().is_empty() {
            return Err(de::Error::custom("machine id cannot be empty"));
        }
        Ok(MachineId::new(id))
    }
}

impl Serialize for MachineId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
