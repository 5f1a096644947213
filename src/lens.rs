// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Views into a store.
//!
//! A view is described by an [`Accessor`]: something that, given the value of its parent view,
//! names the position of a child inside it. Views compose, so a view of a view resolves to the
//! concatenation of both positions.
//!
//! Positions are re-resolved against the current snapshot every time a view is read or
//! updated. An accessor that depends on the data (such as "the animal named Sen") therefore
//! follows the data as it moves.
use crate::{Path, Segment, StoreError, Value};
use std::{fmt, rc::Rc};

/// Locates a child position inside a value.
///
/// Implemented for fixed positions ([`Path`], [`Segment`], string keys and `usize` indices) and
/// for closures `Fn(&Value) -> Option<Path>`, which may inspect the value:
///
/// ```rust
/// # use pure_undo::{array, object, path, Path, Store, Value};
/// let store = Store::new(object! {
///     "animals" => array![object! { "name" => "Aiofe" }, object! { "name" => "Sen" }],
/// });
/// let sen = store.store_for(|state: &Value| -> Option<Path> {
///     let animals = state.get("animals")?.as_array()?;
///     let index = animals.iter().position(|a| *a.get("name").unwrap() == "Sen")?;
///     Some(path!["animals", index])
/// });
/// assert_eq!(sen.path().unwrap(), path!["animals", 1]);
/// ```
pub trait Accessor {
    /// Returns the position of the target relative to `value`, or `None` if there is none.
    fn locate(&self, value: &Value) -> Option<Path>;
}

impl Accessor for Path {
    fn locate(&self, _: &Value) -> Option<Path> {
        Some(self.clone())
    }
}

impl Accessor for Segment {
    fn locate(&self, _: &Value) -> Option<Path> {
        Some(Path::from(self.clone()))
    }
}

impl Accessor for &str {
    fn locate(&self, _: &Value) -> Option<Path> {
        Some(Path::from(Segment::from(*self)))
    }
}

impl Accessor for String {
    fn locate(&self, _: &Value) -> Option<Path> {
        Some(Path::from(Segment::from(self.as_str())))
    }
}

impl Accessor for usize {
    fn locate(&self, _: &Value) -> Option<Path> {
        Some(Path::from(Segment::Index(*self)))
    }
}

impl<F> Accessor for F
where
    F: Fn(&Value) -> Option<Path>,
{
    fn locate(&self, value: &Value) -> Option<Path> {
        self(value)
    }
}

/// A chain of accessors from the root of a store down to a view.
#[derive(Clone, Default)]
pub(crate) struct Lens {
    parent: Option<Rc<Lens>>,
    accessor: Option<Rc<dyn Accessor>>,
}

impl Lens {
    /// The lens of the root store.
    pub(crate) fn root() -> Self {
        Self::default()
    }

    pub(crate) fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns a lens that applies `accessor` to the target of `parent`.
    pub(crate) fn compose(parent: &Rc<Lens>, accessor: impl Accessor + 'static) -> Self {
        Self {
            parent: Some(Rc::clone(parent)),
            accessor: Some(Rc::new(accessor)),
        }
    }

    /// Number of accessors between the root and this lens.
    pub(crate) fn depth(&self) -> usize {
        self.parent.as_ref().map_or(0, |parent| parent.depth() + 1)
    }

    /// Resolves the absolute path of this lens's target in `snapshot`.
    ///
    /// Every accessor sees the value its parent resolves to, or [`Value::Null`] if nothing is
    /// there.
    pub(crate) fn resolve(&self, snapshot: &Value) -> Result<Path, StoreError> {
        let mut path = match &self.parent {
            Some(parent) => parent.resolve(snapshot)?,
            None => Path::root(),
        };
        if let Some(accessor) = &self.accessor {
            let null = Value::Null;
            let target = snapshot.pointer(&path).unwrap_or(&null);
            let relative = accessor
                .locate(target)
                .ok_or_else(|| StoreError::Unlocated { at: path.clone() })?;
            path.extend(relative.iter().cloned());
        }
        Ok(path)
    }
}

impl fmt::Debug for Lens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lens").field("depth", &self.depth()).finish()
    }
}
