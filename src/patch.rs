// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Patches: replayable descriptions of document edits.
//!
//! Every edit made through a [`Draft`](crate::Draft) is recorded as a [`PatchOp`]. A [`Patch`]
//! is an ordered list of such operations, always expressed relative to the document root, so
//! it can be re-applied to any snapshot with [`Patch::apply`].
//!
//! Applying an operation never mutates the document it started from. Containers along the
//! edited path are copied on write (see [`Rc::make_mut`]), every other subtree is shared with
//! the previous snapshot.
use crate::{
    Path, PatchError, Segment, Value,
    value::path::{Slot, SlotError},
};
use std::{fmt, mem, rc::Rc};
use tracing::trace;

/// A single edit.
///
/// Paths are absolute, i.e. relative to the document root.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "lowercase"))]
pub enum PatchOp {
    /// Replaces the value at `path`, creating the object key if needed.
    Set { path: Path, value: Value },
    /// Inserts into an array at `path`, shifting later elements. On objects this behaves like
    /// [`PatchOp::Set`].
    Insert { path: Path, value: Value },
    /// Removes the value at `path`, shifting later array elements.
    Remove { path: Path },
}

impl PatchOp {
    pub fn path(&self) -> &Path {
        match self {
            PatchOp::Set { path, .. } | PatchOp::Insert { path, .. } | PatchOp::Remove { path } => {
                path
            }
        }
    }

    /// The value written by this operation, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            PatchOp::Set { value, .. } | PatchOp::Insert { value, .. } => Some(value),
            PatchOp::Remove { .. } => None,
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOp::Set { path, value } => write!(f, "set {path} = {value}"),
            PatchOp::Insert { path, value } => write!(f, "insert {path} = {value}"),
            PatchOp::Remove { path } => write!(f, "remove {path}"),
        }
    }
}

/// An ordered list of [`PatchOp`]s.
///
/// Produced in pairs by [`produce`](crate::produce): the forward patch turns the old snapshot
/// into the new one, the inverse patch turns the new one back.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[must_use = "patches should be applied or stored"]
pub struct Patch(pub(crate) Vec<PatchOp>);

impl Patch {
    pub fn ops(&self) -> &[PatchOp] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_ops(self) -> Vec<PatchOp> {
        self.0
    }

    /// Applies the patch to `base` and returns the resulting snapshot.
    ///
    /// `base` itself is left untouched. If the patch changes nothing, the returned value is
    /// [`ptr_eq`](Value::ptr_eq) to `base`. Fails on the first operation that does not fit the
    /// document, in which case no partial result is returned.
    pub fn apply(&self, base: &Value) -> Result<Value, PatchError> {
        let mut root = base.clone();
        for op in &self.0 {
            trace!(%op, "applying patch op");
            apply_op(&mut root, op)?;
        }
        Ok(root)
    }
}

impl From<Vec<PatchOp>> for Patch {
    fn from(ops: Vec<PatchOp>) -> Self {
        Self(ops)
    }
}

impl FromIterator<PatchOp> for Patch {
    fn from_iter<I: IntoIterator<Item = PatchOp>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a PatchOp;
    type IntoIter = std::slice::Iter<'a, PatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One operation per line.
impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

/// Applies `op` to `root` in place, copying shared containers on the way down.
///
/// Returns the operation that undoes `op`, or `None` if `op` did not change anything (writing
/// an equal value, removing something that is not there). `root` is only touched once the
/// operation is known to succeed.
pub(crate) fn apply_op(root: &mut Value, op: &PatchOp) -> Result<Option<PatchOp>, PatchError> {
    let Some((last, parent_path)) = op.path().split_last() else {
        return apply_to_root(root, op);
    };

    let parent = root
        .pointer(parent_path)
        .ok_or_else(|| PatchError::MissingPath(Path::from(parent_path)))?;
    let slot = last
        .resolve(parent)
        .map_err(|e| slot_error(e, parent_path, last))?;
    let Some(inverse) = invert(parent, &slot, op)? else {
        return Ok(None);
    };

    let parent = pointer_mut(root, parent_path)?;
    write(parent, slot, op);
    Ok(Some(inverse))
}

fn apply_to_root(root: &mut Value, op: &PatchOp) -> Result<Option<PatchOp>, PatchError> {
    match op {
        PatchOp::Set { value, .. } if *root == *value => Ok(None),
        PatchOp::Set { path, value } => {
            let old = mem::replace(root, value.clone());
            Ok(Some(PatchOp::Set {
                path: path.clone(),
                value: old,
            }))
        }
        PatchOp::Insert { .. } => Err(PatchError::InvalidRoot("insert at")),
        PatchOp::Remove { .. } => Err(PatchError::InvalidRoot("remove")),
    }
}

/// Computes the inverse of applying `op` at `slot` of `parent`, without writing anything.
fn invert(parent: &Value, slot: &Slot<'_>, op: &PatchOp) -> Result<Option<PatchOp>, PatchError> {
    let path = op.path().clone();
    let inverse = match (parent, slot, op) {
        (
            Value::Object(map),
            Slot::Key(key),
            PatchOp::Set { value, .. } | PatchOp::Insert { value, .. },
        ) => match map.get(&**key) {
            Some(old) if old == value => None,
            Some(old) => Some(PatchOp::Set {
                path,
                value: old.clone(),
            }),
            None => Some(PatchOp::Remove { path }),
        },
        (Value::Object(map), Slot::Key(key), PatchOp::Remove { .. }) => {
            map.get(&**key).map(|old| PatchOp::Set {
                path,
                value: old.clone(),
            })
        }
        (Value::Array(items), Slot::Index(index), PatchOp::Set { value, .. }) => {
            match items.get(*index) {
                Some(old) if old == value => None,
                Some(old) => Some(PatchOp::Set {
                    path,
                    value: old.clone(),
                }),
                None if *index == items.len() => Some(PatchOp::Remove { path }),
                None => return Err(out_of_bounds(op.path(), *index, items.len())),
            }
        }
        (Value::Array(items), Slot::Index(index), PatchOp::Insert { .. }) => {
            if *index > items.len() {
                return Err(out_of_bounds(op.path(), *index, items.len()));
            }
            Some(PatchOp::Remove { path })
        }
        (Value::Array(items), Slot::Index(index), PatchOp::Remove { .. }) => items
            .get(*index)
            .map(|old| PatchOp::Insert {
                path,
                value: old.clone(),
            }),
        _ => return Err(PatchError::NotAContainer(parent_of(op.path()))),
    };
    Ok(inverse)
}

/// Writes `op` into `parent`, which [`invert`] has already validated.
fn write(parent: &mut Value, slot: Slot<'_>, op: &PatchOp) {
    match (parent, slot) {
        (Value::Object(map), Slot::Key(key)) => {
            let map = Rc::make_mut(map);
            match op {
                PatchOp::Set { value, .. } | PatchOp::Insert { value, .. } => {
                    map.insert(key.into_owned(), value.clone());
                }
                PatchOp::Remove { .. } => {
                    map.remove(&*key);
                }
            }
        }
        (Value::Array(items), Slot::Index(index)) => {
            let items = Rc::make_mut(items);
            match op {
                PatchOp::Set { value, .. } if index == items.len() => items.push(value.clone()),
                PatchOp::Set { value, .. } => {
                    if let Some(item) = items.get_mut(index) {
                        *item = value.clone();
                    }
                }
                PatchOp::Insert { value, .. } if index <= items.len() => {
                    items.insert(index, value.clone());
                }
                PatchOp::Insert { .. } => {}
                PatchOp::Remove { .. } if index < items.len() => {
                    items.remove(index);
                }
                PatchOp::Remove { .. } => {}
            }
        }
        _ => {}
    }
}

/// Follows `path` down from `root`, making every container on the way uniquely owned.
fn pointer_mut<'v>(root: &'v mut Value, path: &[Segment]) -> Result<&'v mut Value, PatchError> {
    let mut current = root;
    for (depth, segment) in path.iter().enumerate() {
        let slot = segment
            .resolve(current)
            .map_err(|e| slot_error(e, &path[..depth], segment))?;
        current = match (current, slot) {
            (Value::Object(map), Slot::Key(key)) => Rc::make_mut(map).get_mut(&*key),
            (Value::Array(items), Slot::Index(index)) => Rc::make_mut(items).get_mut(index),
            _ => None,
        }
        .ok_or_else(|| PatchError::MissingPath(Path::from(&path[..=depth])))?;
    }
    Ok(current)
}

fn slot_error(e: SlotError, parent: &[Segment], segment: &Segment) -> PatchError {
    match e {
        SlotError::NotAContainer => PatchError::NotAContainer(Path::from(parent)),
        SlotError::NotAnIndex => PatchError::InvalidSegment {
            path: Path::from(parent),
            segment: segment.clone(),
        },
    }
}

fn out_of_bounds(path: &Path, index: usize, len: usize) -> PatchError {
    PatchError::IndexOutOfBounds {
        path: parent_of(path),
        index,
        len,
    }
}

fn parent_of(path: &Path) -> Path {
    path.split_last()
        .map(|(_, parent)| Path::from(parent))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{array, object, path};

    fn walks() -> Value {
        object! {
            "numberOfWalks" => 2876,
            "animals" => array![
                object! { "name" => "Aiofe", "age" => 6 },
                object! { "name" => "Sen", "age" => 8 },
            ],
        }
    }

    fn set(path: Path, value: impl Into<Value>) -> PatchOp {
        PatchOp::Set {
            path,
            value: value.into(),
        }
    }

    #[test]
    fn apply_leaves_base_untouched_and_shares_siblings() {
        let base = walks();
        let patch = Patch::from(vec![set(path!["animals", 0, "age"], 7)]);
        let next = patch.apply(&base).unwrap();

        assert_eq!(*base.pointer(&path!["animals", 0, "age"]).unwrap(), 6);
        assert_eq!(*next.pointer(&path!["animals", 0, "age"]).unwrap(), 7);
        assert!(!next.ptr_eq(&base));
        assert!(
            next.pointer(&path!["animals", 1])
                .unwrap()
                .ptr_eq(base.pointer(&path!["animals", 1]).unwrap())
        );
    }

    #[test]
    fn equal_writes_are_no_ops() {
        let base = walks();
        let patch = Patch::from(vec![
            set(path!["numberOfWalks"], 2876),
            PatchOp::Remove {
                path: path!["missing"],
            },
        ]);
        assert!(patch.apply(&base).unwrap().ptr_eq(&base));
    }

    #[test]
    fn inverses_restore_the_previous_value() {
        let mut doc = walks();
        let ops = [
            set(path!["numberOfWalks"], 2877),
            set(path!["owner"], "Siobhan"),
            set(path!["animals", 2], object! { "name" => "Rua" }),
            PatchOp::Insert {
                path: path!["animals", 0],
                value: object! { "name" => "Bran" },
            },
            PatchOp::Remove {
                path: path!["animals", 1],
            },
        ];
        let mut inverses = Vec::new();
        for op in &ops {
            inverses.push(apply_op(&mut doc, op).unwrap().unwrap());
        }
        insta::assert_snapshot!(Patch::from(inverses.clone()), @r#"
        set /numberOfWalks = 2876
        remove /owner
        remove /animals/2
        remove /animals/0
        insert /animals/1 = {"age":6,"name":"Aiofe"}
        "#);

        inverses.reverse();
        assert_eq!(Patch::from(inverses).apply(&doc).unwrap(), walks());
    }

    #[test]
    fn root_ops() {
        let mut doc = walks();
        let inverse = apply_op(&mut doc, &set(path![], 1)).unwrap().unwrap();
        assert_eq!(doc, 1);
        assert_eq!(inverse, set(path![], walks()));

        let remove = PatchOp::Remove { path: path![] };
        assert_eq!(
            apply_op(&mut doc, &remove),
            Err(PatchError::InvalidRoot("remove"))
        );
    }

    #[test]
    fn errors_describe_the_failing_position() {
        let base = walks();
        let cases = [
            (
                set(path!["animals", 5], 1),
                PatchError::IndexOutOfBounds {
                    path: path!["animals"],
                    index: 5,
                    len: 2,
                },
            ),
            (
                set(path!["animals", "first"], 1),
                PatchError::InvalidSegment {
                    path: path!["animals"],
                    segment: Segment::from("first"),
                },
            ),
            (
                set(path!["numberOfWalks", "x"], 1),
                PatchError::NotAContainer(path!["numberOfWalks"]),
            ),
            (
                set(path!["owner", "name"], 1),
                PatchError::MissingPath(path!["owner"]),
            ),
        ];
        for (op, expected) in cases {
            assert_eq!(Patch::from(vec![op]).apply(&base), Err(expected));
        }
    }

    #[test]
    fn failed_patch_keeps_no_partial_result() {
        let base = walks();
        let patch = Patch::from(vec![
            set(path!["numberOfWalks"], 1),
            set(path!["nope", "deeper"], 1),
        ]);
        assert!(patch.apply(&base).is_err());
        assert_eq!(*base.get("numberOfWalks").unwrap(), 2876);
    }

    #[test]
    fn numeric_segments_address_object_keys() {
        let base = object! { "1" => "one" };
        let next = Patch::from(vec![set(path![1], "uno")]).apply(&base).unwrap();
        assert_eq!(next, object! { "1" => "uno" });
    }

    #[cfg(feature = "json")]
    #[test]
    fn serializes_with_op_tags() {
        let patch = Patch::from(vec![
            set(path!["animals", 0, "age"], 7),
            PatchOp::Remove {
                path: path!["owner"],
            },
        ]);
        let json = serde_json::to_string(&patch).unwrap();
        insta::assert_snapshot!(
            json,
            @r#"[{"op":"set","path":["animals",0,"age"],"value":7},{"op":"remove","path":["owner"]}]"#
        );
        let back: Patch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, patch);
    }
}
