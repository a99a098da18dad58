//! Readers for maps and lists whose entries are checked one at a time.
//!
//! Entry errors are re-rooted under the entry's key or position, and a map
//! key that occurs twice fails instead of silently replacing the first entry.

use crate::error::AppError;
use crate::field_path::FieldPath;
use crate::model::reference::{FromConfig, RefOr};
use indexmap::IndexMap;
use serde::de::{Error as _, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

struct UniqueKeys<V> {
    path: FieldPath,
    marker: PhantomData<V>,
}

impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeys<V> {
    type Value = IndexMap<String, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map with unique keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = IndexMap::new();
        while let Some(key) = access.next_key::<String>()? {
            if map.contains_key(&key) {
                return Err(A::Error::custom(AppError::DuplicateKey {
                    path: self.path.field(key.as_str()),
                    key,
                }));
            }
            let value = access.next_value()?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

/// Reads a string-keyed map, failing with `DuplicateKey` at `path[key]` on a repeat.
pub(crate) fn unique_map<'de, D, V>(
    deserializer: D,
    path: FieldPath,
) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    deserializer.deserialize_map(UniqueKeys {
        path,
        marker: PhantomData,
    })
}

/// Reads a list of references or inline entities, locating errors at `path[i]`.
pub(crate) fn ref_list<'de, D, T>(deserializer: D, path: FieldPath) -> Result<Vec<RefOr<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: FromConfig,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            RefOr::read(value).map_err(|err| D::Error::custom(err.within(&path.index(idx))))
        })
        .collect()
}

/// Reads a map of references or inline entities, locating errors at `path[key]`.
pub(crate) fn ref_map<'de, D, T>(
    deserializer: D,
    path: FieldPath,
) -> Result<IndexMap<String, RefOr<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: FromConfig,
{
    let values: IndexMap<String, Value> = unique_map(deserializer, path.clone())?;
    values
        .into_iter()
        .map(|(key, value)| {
            let entry = RefOr::read(value)
                .map_err(|err| D::Error::custom(err.within(&path.field(key.as_str()))))?;
            Ok((key, entry))
        })
        .collect()
}
