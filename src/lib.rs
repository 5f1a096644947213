// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! # pure-undo: Immutable State with Views and Patch-Based Undo
//!
//! This crate provides an in-process, synchronous state container for application state
//! shaped like a JSON document. It combines three ideas:
//!
//! - **Immutable snapshots.** The state is a [`Value`] tree whose containers are
//!   reference-counted. An update never mutates a snapshot someone else may be holding; it
//!   produces a new root that shares every untouched subtree with the previous one.
//! - **Views.** [`Store::store_for`] derives a handle onto any part of the tree. A view reads
//!   and updates its part as if it were a store of its own, but there is only ever one
//!   snapshot: updating through a view replaces the root.
//! - **Patch-based history.** Every update is recorded as a pair of [`Patch`]es (forward and
//!   inverse) rather than as a copy of the whole state, so undo and redo cost proportional to
//!   the edit, not to the document.
//!
//! ## Getting Started
//!
//! ```rust
//! use pure_undo::{array, object, Store};
//!
//! let store = Store::new(object! {
//!     "numberOfWalks" => 2876,
//!     "animals" => array![
//!         object! { "name" => "Aiofe", "age" => 6 },
//!         object! { "name" => "Sen", "age" => 8 },
//!     ],
//! });
//!
//! // Edit through a recipe: the draft looks mutable, the snapshot is not.
//! let before = store.state();
//! store.update(|d| d.set("numberOfWalks", 2877)).unwrap();
//! assert_eq!(*before.get("numberOfWalks").unwrap(), 2876);
//!
//! // Views of views compose.
//! let sen = store.store_for("animals").store_for(1usize);
//! sen.merge(object! { "age" => 9 }).unwrap();
//! assert_eq!(*store.state().get("animals").unwrap().get(1).unwrap().get("age").unwrap(), 9);
//!
//! // Untouched parts of the tree are shared between snapshots.
//! let aiofe_before = before.get("animals").unwrap().get(0).unwrap();
//! let aiofe_after = store.state().get("animals").unwrap().get(0).unwrap().clone();
//! assert!(aiofe_before.ptr_eq(&aiofe_after));
//!
//! // One timeline for the whole tree, whichever handle is used.
//! sen.undo().unwrap();
//! store.undo().unwrap();
//! assert_eq!(store.state(), before);
//! ```
//!
//! ## Updates
//!
//! An update is either a recipe editing a [`Draft`] or a partial object merged onto the
//! target ([`Updater`]). A few rules hold for every update, no matter which handle it goes
//! through:
//!
//! - An update that changes nothing (for example writing a value equal to the current one)
//!   is a no-op: it records no history and notifies no one.
//! - An update that fails (say, by editing through a position that does not exist) commits
//!   nothing and returns the error.
//! - A view whose target is a scalar has nothing to edit _through_: edits of its children
//!   are ignored. To change a scalar, update its parent.
//! - Recording an update after undoing discards the undone entries.
//!
//! [`Store::update_without_patches`] and friends update the snapshot without touching the
//! history. Since the history then no longer describes the snapshot, undo and redo may fail
//! with [`StoreError::Patch`] afterwards; they leave the store unchanged when they do.
//!
//! ## Subscriptions
//!
//! Callbacks registered with [`Store::subscribe`] run synchronously after every change to
//! the tree, in registration order. They may read or update the store themselves; no
//! internal borrow is held while they run.
//!
//! ## Threading
//!
//! Stores are single-threaded. Handles are `!Send` and `!Sync`.
//!
//! ## Features
//!
//! - `json`: Enables conversion of documents to and from `serde_json::Value`, and typed
//!   state through `serde`. This feature is enabled by default.
//! - `serde`: Provides `serde` support for documents, paths and patches.
//! - `arbitrary`: Implements `quickcheck::Arbitrary` for documents and paths, useful for
//!   property-based testing.
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

/// Macros usable for tests and initialization
pub mod macros;

pub mod value;
pub use value::{Map, Path, Segment, Value};
pub mod patch;
pub use patch::{Patch, PatchOp};
mod draft;
pub use draft::{Draft, Produced, produce};
mod updater;
pub use updater::Updater;
pub mod lens;
pub use lens::Accessor;
pub mod history;
pub use history::{HistoryConfig, HistoryEntry};
mod subscription;
pub use subscription::Subscription;
mod store;
pub use store::{BoundUpdater, Store};
mod error;
pub use error::{PatchError, StoreError};
#[cfg(feature = "json")]
mod json;
#[cfg(any(test, feature = "arbitrary"))]
mod arbitrary;
