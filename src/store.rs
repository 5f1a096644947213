// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! The store: one shared snapshot, history and subscriber list, reachable through any number
//! of views.
use crate::{
    Accessor, Draft, HistoryConfig, Patch, Path, StoreError, Subscription, Updater, Value,
    draft::produce,
    history::{History, HistoryEntry},
    lens::Lens,
    subscription::Subscribers,
};
use std::{cell::RefCell, fmt, rc::Rc};
use tracing::{debug, trace, warn};

/// An updater bound to a view, as returned by [`Store::updater_for`].
pub type BoundUpdater = Box<dyn for<'f> Fn(Updater<'f>) -> Result<(), StoreError>>;

/// A handle to a state tree, positioned at the root or at a view below it.
///
/// All handles derived from one [`Store::new`] share a single snapshot, history and
/// subscriber list. Updating through any of them produces a new root snapshot, records one
/// history entry (unless the update changed nothing) and notifies every subscriber.
///
/// ```rust
/// # use pure_undo::{array, object, Store};
/// let store = Store::new(object! {
///     "numberOfWalks" => 2876,
///     "animals" => array![object! { "name" => "Aiofe" }, object! { "name" => "Sen" }],
/// });
/// let sen = store.store_for("animals").store_for(1usize);
///
/// sen.update(|d| d.set("name", "Sen the Brave")).unwrap();
/// assert_eq!(*store.state().get("animals").unwrap().get(1).unwrap().get("name").unwrap(),
///            "Sen the Brave");
///
/// store.undo().unwrap();
/// assert_eq!(*sen.state().get("name").unwrap(), "Sen");
/// ```
#[derive(Clone)]
pub struct Store {
    root: Rc<Root>,
    lens: Rc<Lens>,
}

struct Root {
    state: RefCell<RootState>,
    subscribers: Rc<Subscribers>,
}

struct RootState {
    snapshot: Value,
    history: History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recording {
    Record,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Back,
    Forward,
}

impl Store {
    /// Creates a root store with unlimited history.
    pub fn new(initial: impl Into<Value>) -> Self {
        Self::with_config(initial, HistoryConfig::default())
    }

    pub fn with_config(initial: impl Into<Value>, config: HistoryConfig) -> Self {
        Self {
            root: Rc::new(Root {
                state: RefCell::new(RootState {
                    snapshot: initial.into(),
                    history: History::new(config),
                }),
                subscribers: Rc::default(),
            }),
            lens: Rc::new(Lens::root()),
        }
    }

    /// Returns true for the handle created by [`Store::new`] (and its clones), false for
    /// views.
    pub fn is_root(&self) -> bool {
        self.lens.is_root()
    }

    /// Returns a handle to the root of this store's tree.
    pub fn root(&self) -> Store {
        Store {
            root: Rc::clone(&self.root),
            lens: Rc::new(Lens::root()),
        }
    }

    /// Returns true if both handles belong to the same tree.
    pub fn same_tree(&self, other: &Store) -> bool {
        Rc::ptr_eq(&self.root, &other.root)
    }

    /// The value this handle points at in the current snapshot.
    ///
    /// Always reads the live root snapshot. Returns [`Value::Null`] if the view's position
    /// does not exist (anymore).
    pub fn state(&self) -> Value {
        let snapshot = self.snapshot();
        self.lens
            .resolve(&snapshot)
            .ok()
            .and_then(|path| snapshot.pointer(&path).cloned())
            .unwrap_or_default()
    }

    /// The absolute position of this handle's target in the current snapshot.
    pub fn path(&self) -> Result<Path, StoreError> {
        self.lens.resolve(&self.snapshot())
    }

    /// Edits the target through `recipe` and records the change in the history.
    pub fn update(&self, recipe: impl FnOnce(&mut Draft<'_>)) -> Result<(), StoreError> {
        self.dispatch(Updater::mutate(recipe))
    }

    /// Shallowly assigns the fields of `partial` onto the target and records the change.
    pub fn merge(&self, partial: impl Into<Value>) -> Result<(), StoreError> {
        self.dispatch(Updater::merge(partial))
    }

    pub fn dispatch(&self, updater: Updater<'_>) -> Result<(), StoreError> {
        self.commit(updater, Recording::Record)
    }

    /// Like [`Store::update`], but leaves the history untouched.
    ///
    /// Entries recorded before may no longer fit the snapshot afterwards, in which case undo
    /// or redo fail with [`StoreError::Patch`].
    pub fn update_without_patches(
        &self,
        recipe: impl FnOnce(&mut Draft<'_>),
    ) -> Result<(), StoreError> {
        self.dispatch_without_patches(Updater::mutate(recipe))
    }

    pub fn merge_without_patches(&self, partial: impl Into<Value>) -> Result<(), StoreError> {
        self.dispatch_without_patches(Updater::merge(partial))
    }

    pub fn dispatch_without_patches(&self, updater: Updater<'_>) -> Result<(), StoreError> {
        self.commit(updater, Recording::Skip)
    }

    /// Returns a view of the child located by `accessor`, relative to this handle's target.
    ///
    /// Creating a view neither records history nor notifies.
    pub fn store_for(&self, accessor: impl Accessor + 'static) -> Store {
        Store {
            root: Rc::clone(&self.root),
            lens: Rc::new(Lens::compose(&self.lens, accessor)),
        }
    }

    /// Returns a function that dispatches updaters to the view located by `accessor`.
    ///
    /// ```rust
    /// # use pure_undo::{object, Store, Updater};
    /// let store = Store::new(object! { "settings" => object! { "dark" => false } });
    /// let update_settings = store.updater_for("settings");
    /// update_settings(Updater::merge(object! { "dark" => true })).unwrap();
    /// assert_eq!(store.state(), object! { "settings" => object! { "dark" => true } });
    /// ```
    pub fn updater_for(&self, accessor: impl Accessor + 'static) -> BoundUpdater {
        let view = self.store_for(accessor);
        Box::new(move |updater: Updater<'_>| view.dispatch(updater))
    }

    /// Registers `callback` to run after every change to the tree, made through any handle.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.root.subscribers.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.root.subscribers.len()
    }

    /// Reverts the most recent recorded update that has not been undone.
    ///
    /// Does nothing if there is none.
    pub fn undo(&self) -> Result<(), StoreError> {
        self.travel(Direction::Back)
    }

    /// Re-applies the most recently undone update.
    ///
    /// Does nothing if there is none.
    pub fn redo(&self) -> Result<(), StoreError> {
        self.travel(Direction::Forward)
    }

    pub fn can_undo(&self) -> bool {
        self.root.state.borrow().history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.root.state.borrow().history.can_redo()
    }

    /// Forgets all history. The snapshot is left as is.
    pub fn clear_history(&self) {
        self.root.state.borrow_mut().history.clear();
        debug!("cleared history");
    }

    /// The forward patches of all history entries, oldest first.
    pub fn patches(&self) -> Vec<Patch> {
        self.history_entries()
            .into_iter()
            .map(|entry| entry.patch)
            .collect()
    }

    /// The inverse patches of all history entries, oldest first.
    pub fn inverse_patches(&self) -> Vec<Patch> {
        self.history_entries()
            .into_iter()
            .map(|entry| entry.inverse)
            .collect()
    }

    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        self.root
            .state
            .borrow()
            .history
            .entries()
            .cloned()
            .collect()
    }

    /// Index of the most recently applied history entry, `None` before the first.
    pub fn history_pointer(&self) -> Option<usize> {
        self.root.state.borrow().history.pointer()
    }

    pub fn history_len(&self) -> usize {
        self.root.state.borrow().history.len()
    }

    fn snapshot(&self) -> Value {
        self.root.state.borrow().snapshot.clone()
    }

    /// Runs `updater` against the current snapshot and swaps in the result.
    ///
    /// The root state is not borrowed while user code runs. If the snapshot was replaced in
    /// the meantime (by the recipe itself updating the store), the result is discarded.
    fn commit(&self, updater: Updater<'_>, recording: Recording) -> Result<(), StoreError> {
        let base = self.snapshot();
        let path = self.lens.resolve(&base)?;
        let produced = produce(&base, &path, updater)?;
        if produced.snapshot.ptr_eq(&base) {
            trace!(%path, "update changed nothing");
            return Ok(());
        }

        {
            let mut state = self.root.state.borrow_mut();
            if !state.snapshot.ptr_eq(&base) {
                warn!(%path, "store changed while the update was computed");
                return Err(StoreError::Reentrant);
            }
            state.snapshot = produced.snapshot;
            match recording {
                Recording::Record => {
                    let ops = produced.patch.len();
                    state.history.record(HistoryEntry {
                        patch: produced.patch,
                        inverse: produced.inverse,
                    });
                    debug!(%path, ops, pointer = ?state.history.pointer(), "recorded update");
                }
                Recording::Skip => debug!(%path, "applied update without history"),
            }
        }

        self.root.subscribers.notify();
        Ok(())
    }

    fn travel(&self, direction: Direction) -> Result<(), StoreError> {
        let changed = {
            let mut state = self.root.state.borrow_mut();
            let entry = match direction {
                Direction::Back => state.history.next_undo().map(|entry| &entry.inverse),
                Direction::Forward => state.history.next_redo().map(|entry| &entry.patch),
            };
            let Some(patch) = entry else {
                trace!(?direction, "nothing to travel to");
                return Ok(());
            };
            let next = patch.apply(&state.snapshot).inspect_err(|e| {
                warn!(?direction, error = %e, "stored patch no longer applies");
            })?;

            let changed = !next.ptr_eq(&state.snapshot);
            state.snapshot = next;
            match direction {
                Direction::Back => state.history.step_back(),
                Direction::Forward => state.history.step_forward(),
            }
            debug!(?direction, pointer = ?state.history.pointer(), changed, "moved through history");
            changed
        };

        if changed {
            self.root.subscribers.notify();
        }
        Ok(())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.root.state.borrow();
        f.debug_struct("Store")
            .field("lens", &self.lens)
            .field("history_len", &state.history.len())
            .field("history_pointer", &state.history.pointer())
            .field("subscribers", &self.root.subscribers.len())
            .finish()
    }
}
