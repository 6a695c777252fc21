//! Reducer combinator
//!
//! Builds one reducer over a keyed state map out of independent slice
//! reducers. Each slice reducer only ever sees its own slice.
//!
//! ```rust
//! use statecell::{combine_reducers, ReducerMap, Store};
//! use serde_json::{json, Value};
//!
//! let reducers: ReducerMap<String, i64, Value> = ReducerMap::new()
//!     .with("clicks", |n: Option<&i64>, action: &Value| {
//!         let n = n.copied().unwrap_or(0);
//!         if action["type"] == "CLICK" { n + 1 } else { n }
//!     })
//!     .with("keys", |n: Option<&i64>, action: &Value| {
//!         let n = n.copied().unwrap_or(0);
//!         if action["type"] == "KEY" { n + 1 } else { n }
//!     });
//!
//! let store = Store::new(combine_reducers(reducers));
//! store.dispatch(json!({ "type": "CLICK" })).unwrap();
//! assert_eq!(store.get_state().unwrap()["clicks"], 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;

/// Reducer over a single slice of a combined state
pub type SubReducer<V, A> = Box<dyn Fn(Option<&V>, &A) -> V>;

/// Slice reducers registered under their state key
///
/// Purity of the registered reducers cannot be checked and is up to the
/// caller.
pub struct ReducerMap<K, V, A> {
    reducers: BTreeMap<K, SubReducer<V, A>>,
}

impl<K: Ord, V, A> ReducerMap<K, V, A> {
    pub fn new() -> Self {
        Self {
            reducers: BTreeMap::new(),
        }
    }

    /// Register `reducer` for the slice stored under `key`
    pub fn with(
        mut self,
        key: impl Into<K>,
        reducer: impl Fn(Option<&V>, &A) -> V + 'static,
    ) -> Self {
        self.insert(key, reducer);
        self
    }

    /// Register `reducer` for `key`, replacing any reducer already there
    pub fn insert(&mut self, key: impl Into<K>, reducer: impl Fn(Option<&V>, &A) -> V + 'static) {
        self.reducers.insert(key.into(), Box::new(reducer));
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.reducers.keys()
    }
}

impl<K: Ord + Clone, V, A> ReducerMap<K, V, A> {
    /// Compute the next combined state
    ///
    /// Only registered keys appear in the result. Keys present in `state`
    /// without a registered reducer are dropped.
    pub fn reduce(&self, state: Option<&BTreeMap<K, V>>, action: &A) -> BTreeMap<K, V> {
        self.reducers
            .iter()
            .map(|(key, reducer)| {
                let previous = state.and_then(|state| state.get(key));
                (key.clone(), reducer(previous, action))
            })
            .collect()
    }
}

impl<K: Ord, V, A> Default for ReducerMap<K, V, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V, A> FromIterator<(K, SubReducer<V, A>)> for ReducerMap<K, V, A> {
    fn from_iter<I: IntoIterator<Item = (K, SubReducer<V, A>)>>(iter: I) -> Self {
        Self {
            reducers: iter.into_iter().collect(),
        }
    }
}

impl<K: fmt::Debug, V, A> fmt::Debug for ReducerMap<K, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReducerMap")
            .field("keys", &self.reducers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Turn a map of slice reducers into a single reducer over the whole map
pub fn combine_reducers<K, V, A>(
    reducers: ReducerMap<K, V, A>,
) -> impl Fn(Option<&BTreeMap<K, V>>, &A) -> BTreeMap<K, V>
where
    K: Ord + Clone,
{
    move |state: Option<&BTreeMap<K, V>>, action: &A| reducers.reduce(state, action)
}
