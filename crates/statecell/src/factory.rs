//! Store construction and enhancers
//!
//! An enhancer intercepts store construction: it receives the factory that
//! would have built the store and returns a new factory wrapping it. The core
//! store never learns what an enhancer did. [`apply_middleware`] is the
//! enhancer shipped with this crate.
//!
//! [`apply_middleware`]: crate::middleware::apply_middleware

use crate::action::Action;
use crate::store::{BoxedReducer, Store};
use std::rc::Rc;

/// Capability to build a store from a reducer and an optional preloaded state
pub trait StoreFactory<S, A> {
    fn create(self: Box<Self>, reducer: BoxedReducer<S, A>, preloaded_state: Option<S>)
        -> Store<S, A>;
}

impl<S, A, F> StoreFactory<S, A> for F
where
    F: FnOnce(BoxedReducer<S, A>, Option<S>) -> Store<S, A>,
{
    fn create(
        self: Box<Self>,
        reducer: BoxedReducer<S, A>,
        preloaded_state: Option<S>,
    ) -> Store<S, A> {
        (*self)(reducer, preloaded_state)
    }
}

/// The plain store constructor handed to enhancers
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseFactory;

impl<S: 'static, A: Action + 'static> StoreFactory<S, A> for BaseFactory {
    fn create(
        self: Box<Self>,
        reducer: BoxedReducer<S, A>,
        preloaded_state: Option<S>,
    ) -> Store<S, A> {
        Store::from_parts(reducer, preloaded_state)
    }
}

/// Wraps store construction
pub trait StoreEnhancer<S, A> {
    fn enhance(self: Box<Self>, next: Box<dyn StoreFactory<S, A>>) -> Box<dyn StoreFactory<S, A>>;
}

impl<S, A, F> StoreEnhancer<S, A> for F
where
    F: FnOnce(Box<dyn StoreFactory<S, A>>) -> Box<dyn StoreFactory<S, A>>,
{
    fn enhance(self: Box<Self>, next: Box<dyn StoreFactory<S, A>>) -> Box<dyn StoreFactory<S, A>> {
        (*self)(next)
    }
}

/// Create a store
///
/// Without an enhancer the state is `preloaded_state`, or
/// `reducer(None, &A::init())` when there is none. With an enhancer,
/// construction is handed over entirely: the enhancer receives
/// [`BaseFactory`] and the factory it returns is called with the reducer and
/// preloaded state.
pub fn create_store<S: 'static, A: Action + 'static>(
    reducer: impl Fn(Option<&S>, &A) -> S + 'static,
    preloaded_state: Option<S>,
    enhancer: Option<Box<dyn StoreEnhancer<S, A>>>,
) -> Store<S, A> {
    create_store_boxed(Rc::new(reducer), preloaded_state, enhancer)
}

fn create_store_boxed<S: 'static, A: Action + 'static>(
    reducer: BoxedReducer<S, A>,
    preloaded_state: Option<S>,
    enhancer: Option<Box<dyn StoreEnhancer<S, A>>>,
) -> Store<S, A> {
    match enhancer {
        Some(enhancer) => enhancer
            .enhance(Box::new(BaseFactory))
            .create(reducer, preloaded_state),
        None => Store::from_parts(reducer, preloaded_state),
    }
}

/// Builder for a [`Store`]
///
/// Preloaded state and enhancer are independent options, so an enhancer can
/// be supplied without a preloaded state.
///
/// ```rust
/// use statecell::StoreBuilder;
/// use serde_json::Value;
///
/// let store = StoreBuilder::new(|n: Option<&u32>, _action: &Value| n.copied().unwrap_or(0))
///     .preloaded_state(5)
///     .build();
/// assert_eq!(*store.get_state().unwrap(), 5);
/// ```
pub struct StoreBuilder<S, A> {
    reducer: BoxedReducer<S, A>,
    preloaded_state: Option<S>,
    enhancer: Option<Box<dyn StoreEnhancer<S, A>>>,
}

impl<S: 'static, A: Action + 'static> StoreBuilder<S, A> {
    pub fn new(reducer: impl Fn(Option<&S>, &A) -> S + 'static) -> Self {
        Self {
            reducer: Rc::new(reducer),
            preloaded_state: None,
            enhancer: None,
        }
    }

    pub fn preloaded_state(mut self, state: S) -> Self {
        self.preloaded_state = Some(state);
        self
    }

    pub fn enhancer(mut self, enhancer: impl StoreEnhancer<S, A> + 'static) -> Self {
        self.enhancer = Some(Box::new(enhancer));
        self
    }

    pub fn build(self) -> Store<S, A> {
        create_store_boxed(self.reducer, self.preloaded_state, self.enhancer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::{Cell, RefCell};

    fn counter(state: Option<&i64>, action: &Value) -> i64 {
        let count = state.copied().unwrap_or(0);
        match action["type"].as_str() {
            Some("INCREMENT") => count + 1,
            _ => count,
        }
    }

    #[test]
    fn test_create_store_without_enhancer() {
        let store = create_store(counter, None, None);
        assert_eq!(*store.get_state().unwrap(), 0);

        let store = create_store(counter, Some(9), None);
        assert_eq!(*store.get_state().unwrap(), 9);
    }

    #[test]
    fn test_enhancer_receives_reducer_and_preloaded_state() {
        let seen_preloaded = Rc::new(Cell::new(None));
        let enhancer = {
            let seen_preloaded = Rc::clone(&seen_preloaded);
            move |next: Box<dyn StoreFactory<i64, Value>>| -> Box<dyn StoreFactory<i64, Value>> {
                Box::new(
                    move |reducer: BoxedReducer<i64, Value>, preloaded_state: Option<i64>| {
                        seen_preloaded.set(Some(preloaded_state));
                        next.create(reducer, preloaded_state.map(|n| n * 10))
                    },
                )
            }
        };

        let store = create_store(counter, Some(4), Some(Box::new(enhancer)));

        assert_eq!(seen_preloaded.get(), Some(Some(4)));
        assert_eq!(*store.get_state().unwrap(), 40);
        store.dispatch(json!({ "type": "INCREMENT" })).unwrap();
        assert_eq!(*store.get_state().unwrap(), 41);
    }

    #[test]
    fn test_enhancer_replaces_base_construction() {
        let reducer_calls = Rc::new(Cell::new(0));
        let reducer = {
            let reducer_calls = Rc::clone(&reducer_calls);
            move |state: Option<&i64>, action: &Value| {
                reducer_calls.set(reducer_calls.get() + 1);
                counter(state, action)
            }
        };
        // Builds the store itself and never calls the base factory
        let enhancer = |_next: Box<dyn StoreFactory<i64, Value>>| -> Box<dyn StoreFactory<i64, Value>> {
            Box::new(|reducer: BoxedReducer<i64, Value>, _preloaded: Option<i64>| {
                Store::from_parts(reducer, Some(100))
            })
        };

        let store = create_store(reducer, None, Some(Box::new(enhancer)));

        assert_eq!(reducer_calls.get(), 0);
        assert_eq!(*store.get_state().unwrap(), 100);
    }

    #[test]
    fn test_builder_enhancer_without_preloaded_state() {
        let created = Rc::new(RefCell::new(Vec::new()));
        let enhancer = {
            let created = Rc::clone(&created);
            move |next: Box<dyn StoreFactory<i64, Value>>| -> Box<dyn StoreFactory<i64, Value>> {
                Box::new(
                    move |reducer: BoxedReducer<i64, Value>, preloaded_state: Option<i64>| {
                        created.borrow_mut().push(preloaded_state);
                        next.create(reducer, preloaded_state)
                    },
                )
            }
        };

        let store = StoreBuilder::new(counter).enhancer(enhancer).build();

        assert_eq!(*created.borrow(), vec![None]);
        assert_eq!(*store.get_state().unwrap(), 0);
    }
}
