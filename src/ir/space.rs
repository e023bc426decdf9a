//! Coordinate space marker types.
//!
//! Zero-sized types used as type parameters so pixel-space and normalized
//! boxes cannot be mixed up at compile time.

use std::fmt;

/// Marker type for absolute pixel coordinates, as found in VOC XML.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for coordinates relative to the image size, as written to
/// YOLO label files.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {} // uninhabited
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {} // uninhabited
    }
}
