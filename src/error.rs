// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Errors produced while editing documents and driving stores.
//!
//! Note that most edge cases of a store are not errors at all: undoing with no history,
//! redoing at the newest entry, updates that change nothing, and unsubscribing twice are all
//! silent no-ops. Errors are reserved for programmer mistakes that would otherwise be hidden,
//! such as editing through a view whose position does not exist.
use crate::{Path, Segment};
use std::{error, fmt};

/// An edit or patch operation could not be applied to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// No value exists at the given path.
    MissingPath(Path),
    /// The value at the given path is a scalar, so it has no children to edit.
    NotAContainer(Path),
    /// An array-only edit was attempted on the non-array value at the given path.
    NotAnArray(Path),
    /// A key that is not a number was used to address an array.
    InvalidSegment { path: Path, segment: Segment },
    /// An array position past the end of the array was written to.
    IndexOutOfBounds { path: Path, index: usize, len: usize },
    /// The operation cannot target the document root.
    InvalidRoot(&'static str),
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::MissingPath(path) => write!(f, "no value at '{path}'"),
            PatchError::NotAContainer(path) => {
                write!(f, "value at '{path}' is not an array or object")
            }
            PatchError::NotAnArray(path) => write!(f, "value at '{path}' is not an array"),
            PatchError::InvalidSegment { path, segment } => {
                write!(f, "'{segment}' is not a valid index into the array at '{path}'")
            }
            PatchError::IndexOutOfBounds { path, index, len } => write!(
                f,
                "index {index} is out of bounds for the array at '{path}' of length {len}"
            ),
            PatchError::InvalidRoot(op) => write!(f, "cannot {op} the document root"),
        }
    }
}

impl error::Error for PatchError {}

/// A store operation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The update (or a stored history patch) could not be applied.
    Patch(PatchError),
    /// A view accessor could not locate its target below the given path.
    Unlocated { at: Path },
    /// The store was changed while an update was being computed, typically by a recipe
    /// that itself updates the store.
    Reentrant,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Patch(_) => f.write_str("failed to apply patch"),
            StoreError::Unlocated { at } => {
                write!(f, "view accessor found no target below '{at}'")
            }
            StoreError::Reentrant => {
                f.write_str("the store changed while an update was being computed")
            }
        }
    }
}

impl error::Error for StoreError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            StoreError::Patch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PatchError> for StoreError {
    fn from(e: PatchError) -> Self {
        StoreError::Patch(e)
    }
}
