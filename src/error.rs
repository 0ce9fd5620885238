use std::fmt;

/// Errors reported by the boundary checks of the containers in this crate
///
/// Every fallible operation validates its arguments before touching the container, so receiving
/// one of these errors means nothing was modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A keyed lookup (e.g. `AvlMap::at`) did not find the key
    KeyNotFound,
    /// A position was the end sentinel, or referred to an element that is no longer present
    InvalidPosition,
    /// The operation needs at least one element but the container is empty
    Empty,
    /// An index was outside the bounds of the container
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
    /// A requested size exceeds what the container can hold
    InvalidSize {
        requested: usize,
        max: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
            Error::InvalidPosition => write!(f, "invalid position: cannot be erased or dereferenced"),
            Error::Empty => write!(f, "container is empty"),
            Error::IndexOutOfRange {index, len} => {
                write!(f, "index {} is out of range for length {}", index, len)
            },
            Error::InvalidSize {requested, max} => {
                write!(f, "requested size {} exceeds the maximum of {}", requested, max)
            },
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(
            Error::IndexOutOfRange {index: 7, len: 3}.to_string(),
            "index 7 is out of range for length 3",
        );
        assert_eq!(
            Error::InvalidSize {requested: 10, max: 4}.to_string(),
            "requested size 10 exceeds the maximum of 4",
        );
    }

    #[test]
    fn is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&Error::Empty);
    }
}
