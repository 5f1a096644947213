// (c) Copyright 2025 Helsing GmbH. All rights reserved.
/// Convenience macro for creating a [`Path`](crate::Path).
///
/// Accepts anything that converts into a [`Segment`](crate::Segment): string keys and
/// `usize` indices.
///
/// ```rust
/// # use pure_undo::{path, Segment};
/// let path = path!["animals", 1, "name"];
/// assert_eq!(path.len(), 3);
/// assert_eq!(path[1], Segment::Index(1));
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($segment:expr),+ $(,)?) => {
        <$crate::Path as ::core::iter::FromIterator<$crate::Segment>>::from_iter([
            $($crate::Segment::from($segment)),+
        ])
    };
}

/// Convenience macro for creating an object [`Value`](crate::Value).
///
/// Values are converted with [`From`], so literals and nested [`object!`]/[`array!`]
/// invocations can be mixed freely.
///
/// ```rust
/// # use pure_undo::{array, object};
/// let state = object! {
///     "numberOfWalks" => 2876,
///     "animals" => array![
///         object! { "name" => "Aiofe", "age" => 6 },
///         object! { "name" => "Sen", "age" => 8 },
///     ],
/// };
/// assert_eq!(state.get("animals").unwrap().len(), 2);
/// ```
#[macro_export]
macro_rules! object {
    () => {
        $crate::Value::object()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut map = $crate::Map::new();
            $( map.insert(::std::string::String::from($key), $crate::Value::from($value)); )+
            $crate::Value::from(map)
        }
    };
}

/// Convenience macro for creating an array [`Value`](crate::Value).
///
/// ```rust
/// # use pure_undo::array;
/// let list = array![1, "two", 3.0];
/// assert_eq!(list.len(), 3);
/// ```
#[macro_export]
macro_rules! array {
    () => {
        $crate::Value::array()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Value::from(::std::vec![$($crate::Value::from($value)),+])
    };
}
