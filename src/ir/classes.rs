//! Ordered class registry mapping class names to YOLO class ids.

use std::collections::HashSet;

use super::ClassId;
use crate::error::Voc2YoloError;

/// Class names used when no explicit list is given.
pub const DEFAULT_CLASSES: [&str; 2] = ["weed", "rice"];

/// A fixed, ordered list of known class names.
///
/// The id of a class is its zero-based position, so the order must stay
/// stable across runs for labels to remain comparable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassRegistry {
    names: Vec<String>,
}

impl ClassRegistry {
    /// Builds a registry from an ordered list of names.
    ///
    /// Names are trimmed. Empty or duplicate names are rejected, as is an
    /// empty list.
    pub fn new<I, S>(names: I) -> Result<Self, Voc2YoloError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();

        for (idx, raw) in names.into_iter().enumerate() {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                return Err(Voc2YoloError::InvalidClassRegistry {
                    message: format!("class name at position {idx} is empty"),
                });
            }
            if !seen.insert(name.to_string()) {
                return Err(Voc2YoloError::InvalidClassRegistry {
                    message: format!("class name '{name}' appears more than once"),
                });
            }
            ordered.push(name.to_string());
        }

        if ordered.is_empty() {
            return Err(Voc2YoloError::InvalidClassRegistry {
                message: "at least one class name is required".to_string(),
            });
        }

        Ok(Self { names: ordered })
    }

    /// Resolves a class name to its id, or `None` for unknown names.
    pub fn id_of(&self, name: &str) -> Option<ClassId> {
        self.names.iter().position(|n| n == name).map(ClassId::new)
    }

    /// Iterates `(id, name)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| (ClassId::new(idx), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self {
            names: DEFAULT_CLASSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
