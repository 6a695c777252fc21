//! Push-stream view of a store
//!
//! [`Observable`] adapts a store to the minimal observer protocol used by
//! reactive libraries: subscribing pushes the current state right away and
//! again after every successful dispatch. The adapter keeps no state of its
//! own.

use crate::action::Action;
use crate::error::StoreError;
use crate::store::{Store, Unsubscribe};
use std::fmt;
use std::rc::Rc;

/// Receives states pushed by an [`Observable`]
pub trait Observer<S> {
    /// Called with the current state. Observers that don't care may leave
    /// this out.
    fn next(&self, _state: &Rc<S>) {}
}

impl<S, F: Fn(&Rc<S>)> Observer<S> for F {
    fn next(&self, state: &Rc<S>) {
        self(state)
    }
}

/// Observable projection of a [`Store`]
pub struct Observable<S, A> {
    store: Store<S, A>,
}

impl<S: 'static, A: Action + 'static> Observable<S, A> {
    pub fn new(store: &Store<S, A>) -> Self {
        Self {
            store: store.clone(),
        }
    }

    /// Subscribe an observer
    ///
    /// The observer is called with the current state before this returns.
    pub fn subscribe(&self, observer: impl Observer<S> + 'static) -> Result<Subscription, StoreError> {
        observer.next(&self.store.get_state()?);

        let read_state = self.store.state_reader();
        let unsubscribe = self.store.subscribe(move || {
            if let Some(state) = read_state() {
                observer.next(&state);
            }
        })?;

        Ok(Subscription { unsubscribe })
    }

    /// Interop hook, an observable is its own observable
    pub fn observable(&self) -> &Self {
        self
    }
}

impl<S: 'static, A: Action + 'static> From<&Store<S, A>> for Observable<S, A> {
    fn from(store: &Store<S, A>) -> Self {
        Self::new(store)
    }
}

impl<S, A> fmt::Debug for Observable<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("store", &self.store)
            .finish()
    }
}

/// Handle returned by [`Observable::subscribe`]
#[derive(Debug, Clone)]
pub struct Subscription {
    unsubscribe: Unsubscribe,
}

impl Subscription {
    /// Stop receiving states. Calling this more than once is a no-op.
    pub fn unsubscribe(&self) -> Result<(), StoreError> {
        self.unsubscribe.unsubscribe()
    }
}
