//! Registry-keyed amount maps.
//!
//! Stock is tracked per physical location and cash income per income source.
//! Both are maps keyed by a small, configured set of identifiers. Keys are
//! plain strings on the wire, but anything entering the system through a
//! service is checked against a [`Registry`] so arbitrary keys never end up in
//! the stores.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A string identifier that belongs to a registry (locations, income sources).
pub trait RegistryKey:
    Clone + Ord + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display
{
    /// Human name of the key family, used in error messages.
    const KIND: &'static str;

    /// Build a key from raw input. Input is normalized (trimmed, lowercased).
    fn from_raw(raw: &str) -> Self;

    fn as_str(&self) -> &str;
}

macro_rules! registry_key {
    ($(#[$meta:meta])* $t:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $t(String);

        impl From<String> for $t {
            fn from(raw: String) -> Self {
                Self::new(&raw)
            }
        }

        impl From<$t> for String {
            fn from(key: $t) -> Self {
                key.0
            }
        }

        impl $t {
            pub fn new(raw: &str) -> Self {
                Self(raw.trim().to_lowercase())
            }
        }

        impl RegistryKey for $t {
            const KIND: &'static str = $kind;

            fn from_raw(raw: &str) -> Self {
                Self::new(raw)
            }

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

registry_key!(
    /// Physical storage location (warehouse, bar, cold room...).
    LocationId,
    "location"
);

registry_key!(
    /// Source of cash-register income (bar, terrace, events...).
    IncomeSourceId,
    "income source"
);

/// The known set of keys for one key family, plus an optional primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry<K> {
    keys: BTreeSet<K>,
    primary: Option<K>,
}

impl<K: RegistryKey> Registry<K> {
    /// Build a registry from raw key names.
    ///
    /// Rejects empty names and duplicates (after normalization).
    pub fn new<I, S>(keys: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for raw in keys {
            let key = K::from_raw(raw.as_ref());
            if key.as_str().is_empty() {
                return Err(DomainError::validation(format!(
                    "{} name cannot be empty",
                    K::KIND
                )));
            }
            if !set.insert(key.clone()) {
                return Err(DomainError::conflict(format!(
                    "duplicate {} '{key}'",
                    K::KIND
                )));
            }
        }
        if set.is_empty() {
            return Err(DomainError::validation(format!(
                "at least one {} must be registered",
                K::KIND
            )));
        }
        Ok(Self {
            keys: set,
            primary: None,
        })
    }

    /// Mark one registered key as primary.
    pub fn with_primary(mut self, raw: &str) -> DomainResult<Self> {
        let key = self.resolve(raw)?;
        self.primary = Some(key);
        Ok(self)
    }

    /// Parse raw input into a key, refusing keys that are not registered.
    pub fn resolve(&self, raw: &str) -> DomainResult<K> {
        let key = K::from_raw(raw);
        self.ensure_known(&key)?;
        Ok(key)
    }

    pub fn ensure_known(&self, key: &K) -> DomainResult<()> {
        if self.keys.contains(key) {
            Ok(())
        } else {
            Err(DomainError::validation(format!("unknown {} '{key}'", K::KIND)))
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    pub fn primary(&self) -> Option<&K> {
        self.primary.as_ref()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }
}

/// Quantities or money amounts keyed by a registry key.
///
/// Serialized as a flat JSON object (`{"almacen": 12.0, "barra": 3.0}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: Deserialize<'de> + Ord"
))]
pub struct KeyedAmounts<K>(BTreeMap<K, f64>);

impl<K: Ord> Default for KeyedAmounts<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: RegistryKey> KeyedAmounts<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map with exactly one entry.
    pub fn single(key: K, amount: f64) -> Self {
        let mut map = BTreeMap::new();
        map.insert(key, amount);
        Self(map)
    }

    /// Amount stored for `key`; absent keys count as 0.
    pub fn get(&self, key: &K) -> f64 {
        self.0.get(key).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, key: K, amount: f64) {
        self.0.insert(key, amount);
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Same keys, every amount set to 0.
    pub fn zeroed(&self) -> Self {
        Self(self.0.keys().map(|k| (k.clone(), 0.0)).collect())
    }

    /// Check every key against `registry` and every amount for finiteness.
    pub fn validate_against(&self, registry: &Registry<K>) -> DomainResult<()> {
        for (key, amount) in &self.0 {
            registry.ensure_known(key)?;
            if !amount.is_finite() {
                return Err(DomainError::validation(format!(
                    "amount for {} '{key}' must be a finite number",
                    K::KIND
                )));
            }
        }
        Ok(())
    }
}

impl<K: RegistryKey> FromIterator<(K, f64)> for KeyedAmounts<K> {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
