// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Implementation of the quickcheck::Arbitrary trait for documents and paths.
use crate::{Map, Path, Segment, Value};
use quickcheck::{Arbitrary, Gen};
use std::iter;

/// Containers nest at most this deep, which keeps generated documents small.
const MAX_DEPTH: usize = 3;

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        arbitrary_value(g, 0)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Value::Null => Box::new(iter::empty()),
            Value::Bool(b) => Box::new(b.shrink().map(Value::Bool)),
            Value::Int(n) => Box::new(n.shrink().map(Value::Int).chain(iter::once(Value::Null))),
            Value::Float(n) => Box::new(
                n.shrink()
                    .filter(|n| n.is_finite())
                    .map(Value::Float)
                    .chain(iter::once(Value::Null)),
            ),
            Value::String(s) => Box::new(
                s.to_string()
                    .shrink()
                    .map(Value::from)
                    .chain(iter::once(Value::Null)),
            ),
            Value::Array(items) => Box::new(
                items
                    .to_vec()
                    .shrink()
                    .map(Value::from)
                    .chain(iter::once(Value::Null)),
            ),
            Value::Object(fields) => Box::new(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect::<Vec<_>>()
                    .shrink()
                    .map(|fields| Value::from(fields.into_iter().collect::<Map>()))
                    .chain(iter::once(Value::Null)),
            ),
        }
    }
}

fn arbitrary_value(g: &mut Gen, depth: usize) -> Value {
    let kinds = if depth < MAX_DEPTH { 7 } else { 5 };
    match usize::arbitrary(g) % kinds {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => Value::Int(i64::arbitrary(g)),
        // finite only, so that every generated value has a JSON rendering
        3 => Value::Float(f64::from(i32::arbitrary(g)) / 8.0),
        4 => Value::from(arbitrary_key(g)),
        5 => {
            let len = usize::arbitrary(g) % 4;
            (0..len).map(|_| arbitrary_value(g, depth + 1)).collect()
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            (0..len)
                .map(|_| (arbitrary_key(g), arbitrary_value(g, depth + 1)))
                .collect()
        }
    }
}

/// Keys are drawn from a small alphabet so that generated documents and paths overlap.
fn arbitrary_key(g: &mut Gen) -> String {
    let keys = ["a", "b", "c", "name", "0", "1"];
    g.choose(&keys).copied().unwrap_or("a").to_owned()
}

impl Arbitrary for Segment {
    fn arbitrary(g: &mut Gen) -> Self {
        if bool::arbitrary(g) {
            Segment::Index(usize::arbitrary(g) % 4)
        } else {
            Segment::Key(arbitrary_key(g))
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Segment::Index(index) => Box::new(index.shrink().map(Segment::Index)),
            Segment::Key(_) => Box::new(iter::once(Segment::Index(0))),
        }
    }
}

impl Arbitrary for Path {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % (MAX_DEPTH + 1);
        (0..len).map(|_| Segment::arbitrary(g)).collect()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.to_vec().shrink().map(Path::from_iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[quickcheck]
    fn generated_values_equal_themselves(value: Value) -> bool {
        value == value.clone() && value.ptr_eq(&value.clone())
    }

    #[quickcheck]
    fn generated_paths_stay_shallow(path: Path) -> bool {
        path.len() <= MAX_DEPTH
    }
}
