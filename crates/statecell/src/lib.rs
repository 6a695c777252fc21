//! # statecell
//!
//! A minimal, single-writer state container. State changes only by
//! dispatching actions through a pure reducer, and listeners are notified
//! after each change.
//!
//! ## Design
//!
//! ```text
//! dispatch(action) → [middleware] → reducer(state, action) → new state → listeners
//! ```
//!
//! - [`Store`] owns the current state, the active reducer and the listeners.
//!   While a reducer runs the store rejects every other call with
//!   [`StoreError::Reentrant`].
//! - [`combine_reducers`] merges independent slice reducers into one reducer
//!   over a keyed map.
//! - Enhancers ([`StoreEnhancer`]) wrap store construction, and
//!   [`middleware::apply_middleware`] is the enhancer that puts a middleware
//!   chain in front of the reducer.
//! - [`Observable`] is a push-stream view of a store for reactive consumers.
//!
//! A store is meant for one thread of control. It never blocks, never queues
//! and never locks.
//!
//! ## Usage
//!
//! ```rust
//! use statecell::{combine_reducers, ReducerMap, Store};
//! use serde_json::{json, Value};
//!
//! let reducers: ReducerMap<String, i64, Value> = ReducerMap::new()
//!     .with("count", |n: Option<&i64>, action: &Value| {
//!         let n = n.copied().unwrap_or(0);
//!         match action["type"].as_str() {
//!             Some("INCREMENT") => n + 1,
//!             _ => n,
//!         }
//!     });
//!
//! let store = Store::new(combine_reducers(reducers));
//! let reader = store.clone();
//! let unsubscribe = store
//!     .subscribe(move || println!("count is now {}", reader.get_state().unwrap()["count"]))
//!     .unwrap();
//!
//! store.dispatch(json!({ "type": "INCREMENT" })).unwrap();
//! unsubscribe.unsubscribe().unwrap();
//! ```

pub mod action;
pub mod combine;
pub mod error;
pub mod factory;
pub mod middleware;
pub mod observable;
pub mod store;

// Re-export commonly used types
pub use action::{Action, INIT_ACTION_TYPE};
pub use combine::{combine_reducers, ReducerMap, SubReducer};
pub use error::{Operation, StoreError};
pub use factory::{create_store, BaseFactory, StoreBuilder, StoreEnhancer, StoreFactory};
pub use observable::{Observable, Observer, Subscription};
pub use store::{BoxedReducer, ListenerId, Store, Unsubscribe};
