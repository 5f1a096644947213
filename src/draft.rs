// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Mutable drafts of immutable snapshots.
//!
//! A recipe edits a [`Draft`] as if it were mutable. Behind the scenes every edit is applied
//! copy-on-write to a private working copy and recorded as a [`PatchOp`] along with its
//! inverse. [`produce`] then hands back the new snapshot and both patches.
use crate::{
    Path, PatchError, Segment, Updater, Value,
    patch::{Patch, PatchOp, apply_op},
    value::path::Slot,
};
use tracing::{debug, trace};

/// The result of [`produce`].
#[derive(Debug, Clone)]
pub struct Produced {
    /// The next snapshot. [`ptr_eq`](Value::ptr_eq) to the base if nothing changed.
    pub snapshot: Value,
    /// Turns the base into `snapshot`.
    pub patch: Patch,
    /// Turns `snapshot` back into the base.
    pub inverse: Patch,
}

impl Produced {
    /// Returns true if the recipe made no effective change.
    pub fn is_unchanged(&self) -> bool {
        self.patch.is_empty()
    }
}

/// Runs `updater` against a draft of `base` positioned at `at`.
///
/// `base` is never modified. If the updater changes nothing (including when it only writes
/// values equal to what is already there), the returned snapshot is `base` itself and both
/// patches are empty.
///
/// Edits that cannot be applied (such as writing through a position that does not exist) make
/// the whole call fail with the first such error. Edits through a draft whose target is a
/// scalar are silently ignored, since a scalar has no children to edit.
///
/// ```rust
/// # use pure_undo::{object, path, produce, Updater};
/// let base = object! { "count" => 1 };
/// let out = produce(&base, &path![], Updater::mutate(|d| d.set("count", 2))).unwrap();
/// assert_eq!(out.snapshot, object! { "count" => 2 });
/// assert_eq!(out.inverse.apply(&out.snapshot).unwrap(), base);
/// ```
pub fn produce(base: &Value, at: &Path, updater: Updater<'_>) -> Result<Produced, PatchError> {
    let mut doc = DraftDoc::new(base.clone());
    updater.run(&mut Draft {
        doc: &mut doc,
        base: at.clone(),
    });
    doc.finish(base)
}

/// The working copy shared by a draft and all drafts derived from it.
struct DraftDoc {
    root: Value,
    patch: Vec<PatchOp>,
    inverse: Vec<PatchOp>,
    fault: Option<PatchError>,
}

impl DraftDoc {
    fn new(root: Value) -> Self {
        Self {
            root,
            patch: Vec::new(),
            inverse: Vec::new(),
            fault: None,
        }
    }

    /// Applies `op` and records it. Returns true if the document changed.
    fn record(&mut self, op: PatchOp) -> bool {
        if self.fault.is_some() {
            return false;
        }
        match apply_op(&mut self.root, &op) {
            Ok(Some(inverse)) => {
                trace!(%op, "recorded edit");
                self.patch.push(op);
                self.inverse.push(inverse);
                true
            }
            Ok(None) => false,
            Err(e) => {
                debug!(error = %e, "edit failed");
                self.fault = Some(e);
                false
            }
        }
    }

    fn finish(self, base: &Value) -> Result<Produced, PatchError> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }
        if self.patch.is_empty() {
            return Ok(Produced {
                snapshot: base.clone(),
                patch: Patch::default(),
                inverse: Patch::default(),
            });
        }
        let mut inverse = self.inverse;
        inverse.reverse();
        Ok(Produced {
            snapshot: self.root,
            patch: Patch(self.patch),
            inverse: Patch(inverse),
        })
    }
}

/// A mutable view of one position in a document being edited.
///
/// Reads see all edits made so far. Writes are recorded and end up in the patches returned by
/// [`produce`] (or in the store's history).
///
/// Edit methods address children of the draft's target by [`Segment`]: keys for objects,
/// indices for arrays. Numeric segments on objects address the key spelled like the number.
pub struct Draft<'a> {
    doc: &'a mut DraftDoc,
    base: Path,
}

impl Draft<'_> {
    /// The absolute position of this draft in the document.
    pub fn path(&self) -> &Path {
        &self.base
    }

    /// The current value at this draft's position, or `None` if nothing is there.
    pub fn value(&self) -> Option<&Value> {
        self.doc.root.pointer(&self.base)
    }

    pub fn get(&self, segment: impl Into<Segment>) -> Option<&Value> {
        self.value()?.get(segment)
    }

    pub fn len(&self) -> usize {
        self.value().map_or(0, Value::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a draft for a child of this draft's target.
    ///
    /// The child need not exist yet; editing through a missing position fails the update.
    pub fn at(&mut self, segment: impl Into<Segment>) -> Draft<'_> {
        Draft {
            base: self.base.child(segment),
            doc: &mut *self.doc,
        }
    }

    /// Writes `value` to the child at `segment`.
    ///
    /// On arrays, writing one past the end appends.
    pub fn set(&mut self, segment: impl Into<Segment>, value: impl Into<Value>) {
        let segment = segment.into();
        if !self.editable("set") {
            return;
        }
        let append = self.value().is_some_and(|target| {
            matches!(
                (target, segment.resolve(target)),
                (Value::Array(items), Ok(Slot::Index(index))) if index == items.len()
            )
        });
        let path = self.base.child(segment);
        let value = value.into();
        let op = if append {
            PatchOp::Insert { path, value }
        } else {
            PatchOp::Set { path, value }
        };
        self.doc.record(op);
    }

    /// Replaces the child at `segment` with `f` applied to its current value.
    ///
    /// Missing children are passed to `f` as [`Value::Null`].
    pub fn set_with(&mut self, segment: impl Into<Segment>, f: impl FnOnce(&Value) -> Value) {
        let segment = segment.into();
        let next = match self.get(&segment) {
            Some(current) => f(current),
            None => f(&Value::Null),
        };
        self.set(segment, next);
    }

    /// Removes the child at `segment` and returns it. Later array elements shift down.
    ///
    /// Removing a child that does not exist does nothing. A key that is not a number fails the
    /// update on arrays, the same as for [`Draft::set`].
    pub fn remove(&mut self, segment: impl Into<Segment>) -> Option<Value> {
        let segment = segment.into();
        if !self.editable("remove") {
            return None;
        }
        let old = self.get(&segment).cloned();
        let path = self.base.child(segment);
        let removed = self.doc.record(PatchOp::Remove { path });
        old.filter(|_| removed)
    }

    /// Appends to the target array.
    pub fn push(&mut self, value: impl Into<Value>) {
        if let Some(len) = self.array_len("push") {
            let path = self.base.child(len);
            self.doc.record(PatchOp::Insert {
                path,
                value: value.into(),
            });
        }
    }

    /// Inserts into the target array at `index`, shifting later elements up.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) {
        if self.array_len("insert").is_some() {
            let path = self.base.child(index);
            self.doc.record(PatchOp::Insert {
                path,
                value: value.into(),
            });
        }
    }

    /// Removes and returns the last element of the target array.
    pub fn pop(&mut self) -> Option<Value> {
        let last = self.array_len("pop")?.checked_sub(1)?;
        self.remove(last)
    }

    /// Shallowly merges the fields of `partial` into the target.
    ///
    /// Fields absent from `partial` are left alone. Anything other than an object is ignored.
    pub fn merge(&mut self, partial: impl Into<Value>) {
        if !self.editable("merge") {
            return;
        }
        match partial.into() {
            Value::Object(fields) => {
                for (key, value) in fields.iter() {
                    self.set(key.as_str(), value.clone());
                }
            }
            other => debug!(path = %self.base, kind = other.type_name(), "ignoring non-object merge"),
        }
    }

    /// Checks whether edits can go through this draft.
    ///
    /// A missing target fails the update. A scalar target cannot have children, so edits
    /// through it are dropped.
    fn editable(&mut self, edit: &'static str) -> bool {
        if self.doc.fault.is_some() {
            return false;
        }
        match self.doc.root.pointer(&self.base) {
            None => {
                self.doc.fault = Some(PatchError::MissingPath(self.base.clone()));
                false
            }
            Some(target) if !target.is_container() => {
                debug!(
                    path = %self.base,
                    kind = target.type_name(),
                    edit,
                    "ignoring edit of a scalar draft"
                );
                false
            }
            Some(_) => true,
        }
    }

    /// Like [`Draft::editable`], but additionally requires the target to be an array.
    fn array_len(&mut self, edit: &'static str) -> Option<usize> {
        if !self.editable(edit) {
            return None;
        }
        match self.value() {
            Some(Value::Array(items)) => Some(items.len()),
            _ => {
                self.doc.fault = Some(PatchError::NotAnArray(self.base.clone()));
                None
            }
        }
    }
}

impl std::fmt::Debug for Draft<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Draft")
            .field("path", &self.base)
            .field("value", &self.value())
            .finish()
    }
}
