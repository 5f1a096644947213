// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Addressing of values inside a document.
use super::Value;
use smallvec::SmallVec;
use std::{
    borrow::Cow,
    fmt,
    ops::{Deref, DerefMut},
};

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Segment {
    Index(usize),
    Key(String),
}

/// A [`Segment`] resolved against a concrete container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot<'a> {
    Key(Cow<'a, str>),
    Index(usize),
}

/// Why a [`Segment`] cannot address anything in a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotError {
    /// The value is a scalar.
    NotAContainer,
    /// A key that is not a number was used on an array.
    NotAnIndex,
}

impl Segment {
    /// Resolves this segment against `container`.
    ///
    /// Objects are addressed by key, so an index addresses the key spelled like the number.
    /// Arrays are addressed by position, so a key addresses the index it parses as.
    pub(crate) fn resolve(&self, container: &Value) -> Result<Slot<'_>, SlotError> {
        match (container, self) {
            (Value::Object(_), Segment::Key(key)) => Ok(Slot::Key(Cow::Borrowed(key))),
            (Value::Object(_), Segment::Index(index)) => {
                Ok(Slot::Key(Cow::Owned(index.to_string())))
            }
            (Value::Array(_), Segment::Index(index)) => Ok(Slot::Index(*index)),
            (Value::Array(_), Segment::Key(key)) => key
                .parse::<usize>()
                .map(Slot::Index)
                .map_err(|_| SlotError::NotAnIndex),
            _ => Err(SlotError::NotAContainer),
        }
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_owned())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<&Segment> for Segment {
    fn from(segment: &Segment) -> Self {
        segment.clone()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(index) => write!(f, "{index}"),
            // JSON pointer escaping, RFC 6901 section 3
            Segment::Key(key) => f.write_str(&key.replace('~', "~0").replace('/', "~1")),
        }
    }
}

/// A location in a document, relative to some value.
///
/// The empty path addresses the value itself. Paths display as JSON pointers:
///
/// ```rust
/// # use pure_undo::path;
/// assert_eq!(path!["animals", 1, "name"].to_string(), "/animals/1/name");
/// assert_eq!(path![].to_string(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Path(SmallVec<[Segment; 4]>);

impl Path {
    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.0.push(segment.into());
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut child = self.clone();
        child.push(segment);
        child
    }

    /// Returns a new path with all of `other` appended.
    pub fn join(&self, other: &[Segment]) -> Self {
        let mut joined = self.clone();
        joined.0.extend(other.iter().cloned());
        joined
    }

    /// Splits off the last segment, returning it and the path of the parent.
    pub fn split_last(&self) -> Option<(&Segment, &[Segment])> {
        self.0.split_last()
    }

    /// Returns true if `self` is `other` or lies below it.
    pub fn starts_with(&self, other: &[Segment]) -> bool {
        self.0.starts_with(other)
    }
}

impl Deref for Path {
    type Target = [Segment];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Path {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<&[Segment]> for Path {
    fn from(segments: &[Segment]) -> Self {
        Self(segments.iter().cloned().collect())
    }
}

impl From<Segment> for Path {
    fn from(segment: Segment) -> Self {
        Self(smallvec::smallvec![segment])
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Segment> for Path {
    fn extend<I: IntoIterator<Item = Segment>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
