//! Newtype IDs for type-safe identification of classes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based YOLO class index.
///
/// A class id is the position of the class name in the [`ClassRegistry`]
/// it was resolved against.
///
/// [`ClassRegistry`]: super::ClassRegistry
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub usize);

impl ClassId {
    /// Creates a new ClassId.
    #[inline]
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the underlying index.
    #[inline]
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ClassId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}
