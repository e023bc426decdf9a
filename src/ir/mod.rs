//! Annotation types shared by the converter and the splitter.
//!
//! Boxes carry a coordinate-space marker ([`Pixel`] or [`Normalized`]) so a
//! VOC corner box can only reach a label file through the normalization in
//! [`BBoxXYXY::to_normalized_cxcywh`].
//!
//! # Example
//!
//! ```
//! use voc2yolo::ir::{BBoxXYXY, ClassRegistry, Pixel};
//! use voc2yolo::ir::io_yolo::YoloLabelLine;
//!
//! let registry = ClassRegistry::default();
//! let class_id = registry.id_of("rice").unwrap();
//! let bbox = BBoxXYXY::<Pixel>::from_xyxy(10.0, 50.0, 30.0, 150.0);
//! let line = YoloLabelLine::new(class_id, bbox.to_normalized_cxcywh(100, 200));
//! assert_eq!(line.to_string(), "1 0.2 0.5 0.2 0.5");
//! ```

mod bbox;
mod classes;
mod ids;
pub mod io_voc_xml;
pub mod io_yolo;
mod space;

pub use bbox::{BBoxCXCYWH, BBoxXYXY};
pub use classes::{ClassRegistry, DEFAULT_CLASSES};
pub use ids::ClassId;
pub use space::{Normalized, Pixel};
