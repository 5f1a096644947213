// (c) Copyright 2025 Helsing GmbH. All rights reserved.
use crate::{Draft, Map, Value};
use std::fmt;

/// Describes one update of a store.
///
/// Either a recipe that edits a [`Draft`] of the view's current value, or a partial object
/// whose fields are shallowly assigned onto it.
///
/// ```rust
/// # use pure_undo::{object, Store, Updater};
/// let store = Store::new(object! { "a" => 1, "b" => 1 });
/// store.dispatch(Updater::mutate(|d| d.set("a", 2))).unwrap();
/// store.dispatch(Updater::merge(object! { "b" => 2 })).unwrap();
/// assert_eq!(store.state(), object! { "a" => 2, "b" => 2 });
/// ```
pub enum Updater<'f> {
    Mutate(Box<dyn FnOnce(&mut Draft<'_>) + 'f>),
    Merge(Value),
}

impl<'f> Updater<'f> {
    pub fn mutate(recipe: impl FnOnce(&mut Draft<'_>) + 'f) -> Self {
        Updater::Mutate(Box::new(recipe))
    }

    pub fn merge(partial: impl Into<Value>) -> Self {
        Updater::Merge(partial.into())
    }

    pub(crate) fn run(self, draft: &mut Draft<'_>) {
        match self {
            Updater::Mutate(recipe) => recipe(draft),
            Updater::Merge(partial) => draft.merge(partial),
        }
    }
}

impl From<Map> for Updater<'_> {
    fn from(partial: Map) -> Self {
        Updater::Merge(Value::from(partial))
    }
}

impl From<Value> for Updater<'_> {
    fn from(partial: Value) -> Self {
        Updater::Merge(partial)
    }
}

impl fmt::Debug for Updater<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Updater::Mutate(_) => f.write_str("Mutate(..)"),
            Updater::Merge(partial) => f.debug_tuple("Merge").field(partial).finish(),
        }
    }
}
