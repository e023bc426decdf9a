//! Pascal VOC XML reader.
//!
//! Reads one annotation document per file: the `<size>` of the image and the
//! `<object>` entries with their `<bndbox>` corners in pixel space. The root
//! element name is not checked, matching how loosely VOC exports are
//! produced by labeling tools in the wild.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;
use walkdir::WalkDir;

use super::{BBoxXYXY, Pixel};
use crate::error::Voc2YoloError;

pub const VOC_XML_EXTENSION: &str = "xml";

/// A parsed VOC annotation document.
#[derive(Clone, Debug, PartialEq)]
pub struct VocAnnotation {
    pub width: u32,
    pub height: u32,
    pub objects: Vec<VocObject>,
}

/// One `<object>` entry.
///
/// The bounding box is kept as raw text until the object has been matched
/// against a class list, so a malformed box on an object that is going to be
/// skipped anyway does not fail the whole file.
#[derive(Clone, Debug, PartialEq)]
pub struct VocObject {
    pub name: String,
    bndbox: Option<RawBndBox>,
}

#[derive(Clone, Debug, PartialEq)]
struct RawBndBox {
    xmin: Option<String>,
    ymin: Option<String>,
    xmax: Option<String>,
    ymax: Option<String>,
}

impl VocObject {
    /// Parses the `<bndbox>` corners into a pixel-space box.
    ///
    /// `path` is only used for error context.
    pub fn bbox(&self, path: &Path) -> Result<BBoxXYXY<Pixel>, Voc2YoloError> {
        let raw = self
            .bndbox
            .as_ref()
            .ok_or_else(|| Voc2YoloError::VocXmlParse {
                path: path.to_path_buf(),
                message: format!("missing <bndbox> in <object> '{}'", self.name),
            })?;

        let xmin = parse_f64_field(raw.xmin.as_deref(), "xmin", path)?;
        let ymin = parse_f64_field(raw.ymin.as_deref(), "ymin", path)?;
        let xmax = parse_f64_field(raw.xmax.as_deref(), "xmax", path)?;
        let ymax = parse_f64_field(raw.ymax.as_deref(), "ymax", path)?;

        Ok(BBoxXYXY::from_xyxy(xmin, ymin, xmax, ymax))
    }
}

/// Read and parse a VOC XML file.
pub fn read_voc_xml(path: &Path) -> Result<VocAnnotation, Voc2YoloError> {
    let xml = fs::read_to_string(path).map_err(Voc2YoloError::Io)?;
    parse_voc_xml_str(&xml, path)
}

/// Parse VOC XML from a UTF-8 string.
///
/// `path` is only used for error context.
pub fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<VocAnnotation, Voc2YoloError> {
    let document =
        roxmltree::Document::parse(xml).map_err(|source| Voc2YoloError::VocXmlParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;

    let root = document.root_element();

    let size = child_element(root, "size").ok_or_else(|| Voc2YoloError::MissingSize {
        path: path.to_path_buf(),
    })?;
    let width = parse_required_u32(size, "width", path)?;
    let height = parse_required_u32(size, "height", path)?;

    if width == 0 || height == 0 {
        return Err(Voc2YoloError::InvalidImageSize {
            path: path.to_path_buf(),
            width,
            height,
        });
    }

    let mut objects = Vec::new();
    for object in root
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let name_node = child_element(object, "name").ok_or_else(|| Voc2YoloError::VocXmlParse {
            path: path.to_path_buf(),
            message: "missing <name> in <object>".to_string(),
        })?;
        let name = name_node.text().unwrap_or_default().to_string();

        let bndbox = child_element(object, "bndbox").map(|node| RawBndBox {
            xmin: optional_child_text(node, "xmin"),
            ymin: optional_child_text(node, "ymin"),
            xmax: optional_child_text(node, "xmax"),
            ymax: optional_child_text(node, "ymax"),
        });

        objects.push(VocObject { name, bndbox });
    }

    Ok(VocAnnotation {
        width,
        height,
        objects,
    })
}

/// Parse VOC XML from bytes.
///
/// The input must be valid UTF-8.
pub fn from_voc_xml_slice(bytes: &[u8]) -> Result<VocAnnotation, Voc2YoloError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| Voc2YoloError::VocXmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    parse_voc_xml_str(xml, Path::new("<memory>"))
}

/// XML files found directly inside an annotations directory.
#[derive(Debug, Default)]
pub struct XmlListing {
    /// Flat `.xml` files, sorted by file name.
    pub files: Vec<PathBuf>,
    /// `.xml` files in sub-directories; these are not converted.
    pub nested: Vec<PathBuf>,
}

/// List `.xml` files in `dir` without descending into sub-directories.
pub fn collect_xml_files(dir: &Path) -> Result<XmlListing, Voc2YoloError> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(Voc2YoloError::Io)? {
        let entry = entry.map_err(Voc2YoloError::Io)?;
        let path = entry.path();
        if path.is_file() && has_xml_extension(&path) {
            files.push(path);
        }
    }

    files.sort_by_cached_key(|path| file_name_string(path));

    let mut nested = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).min_depth(2) {
        let entry = entry.map_err(|source| Voc2YoloError::VocXmlParse {
            path: dir.to_path_buf(),
            message: format!("failed while traversing annotations directory: {source}"),
        })?;

        if entry.file_type().is_file() && has_xml_extension(entry.path()) {
            nested.push(entry.path().to_path_buf());
        }
    }
    nested.sort();

    Ok(XmlListing { files, nested })
}

pub fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(VOC_XML_EXTENSION))
        .unwrap_or(false)
}

fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn parse_required_u32(node: Node<'_, '_>, tag: &str, path: &Path) -> Result<u32, Voc2YoloError> {
    let raw = optional_child_text(node, tag).ok_or_else(|| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in <size>"),
    })?;
    raw.parse::<u32>().map_err(|_| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid <{tag}> value '{raw}' in <size>; expected u32"),
    })
}

fn parse_f64_field(raw: Option<&str>, tag: &str, path: &Path) -> Result<f64, Voc2YoloError> {
    let raw = raw.ok_or_else(|| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in <bndbox>"),
    })?;
    raw.parse::<f64>().map_err(|_| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!(
            "invalid <{tag}> value '{raw}' in <bndbox>; expected floating-point number"
        ),
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<annotation>
  <filename>field_001.jpg</filename>
  <size>
    <width>640</width>
    <height>480</height>
    <depth>3</depth>
  </size>
  <object>
    <name>weed</name>
    <bndbox>
      <xmin>10</xmin>
      <ymin>20</ymin>
      <xmax>30.5</xmax>
      <ymax>40</ymax>
    </bndbox>
  </object>
  <object>
    <name>corn</name>
  </object>
</annotation>"#;

    #[test]
    fn parse_extracts_size_and_objects_in_order() {
        let parsed = parse_voc_xml_str(SAMPLE, Path::new("sample.xml")).expect("parse xml");
        assert_eq!(parsed.width, 640);
        assert_eq!(parsed.height, 480);
        assert_eq!(parsed.objects.len(), 2);
        assert_eq!(parsed.objects[0].name, "weed");
        assert_eq!(parsed.objects[1].name, "corn");

        let bbox = parsed.objects[0]
            .bbox(Path::new("sample.xml"))
            .expect("parse bbox");
        assert_eq!(bbox.xmin(), 10.0);
        assert_eq!(bbox.ymin(), 20.0);
        assert_eq!(bbox.xmax(), 30.5);
        assert_eq!(bbox.ymax(), 40.0);
    }

    #[test]
    fn object_without_bndbox_fails_only_when_box_is_requested() {
        let parsed = parse_voc_xml_str(SAMPLE, Path::new("sample.xml")).expect("parse xml");
        let err = parsed.objects[1]
            .bbox(Path::new("sample.xml"))
            .expect_err("missing bndbox");
        assert!(err.to_string().contains("missing <bndbox>"));
    }

    #[test]
    fn missing_size_is_reported_distinctly() {
        let xml = "<annotation><object><name>weed</name></object></annotation>";
        let err = parse_voc_xml_str(xml, Path::new("nosize.xml")).expect_err("no size");
        assert!(matches!(err, Voc2YoloError::MissingSize { .. }));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let xml = "<annotation><size><width>0</width><height>10</height></size></annotation>";
        let err = parse_voc_xml_str(xml, Path::new("zero.xml")).expect_err("zero width");
        assert!(matches!(
            err,
            Voc2YoloError::InvalidImageSize {
                width: 0,
                height: 10,
                ..
            }
        ));
    }

    #[test]
    fn non_integer_size_is_a_parse_error() {
        let xml = "<annotation><size><width>64.5</width><height>10</height></size></annotation>";
        let err = parse_voc_xml_str(xml, Path::new("float.xml")).expect_err("float width");
        assert!(err.to_string().contains("expected u32"));
    }

    #[test]
    fn object_name_is_kept_verbatim() {
        let xml = "<annotation><size><width>5</width><height>5</height></size>\
                   <object><name> weed </name></object><object><name/></object></annotation>";
        let parsed = parse_voc_xml_str(xml, Path::new("padded.xml")).expect("parse");
        assert_eq!(parsed.objects[0].name, " weed ");
        assert_eq!(parsed.objects[1].name, "");
    }

    #[test]
    fn root_name_is_not_checked() {
        let xml = "<doc><size><width>5</width><height>5</height></size></doc>";
        let parsed = parse_voc_xml_str(xml, Path::new("doc.xml")).expect("parse");
        assert!(parsed.objects.is_empty());
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let err = from_voc_xml_slice(b"<annotation><size>").expect_err("truncated");
        assert!(matches!(err, Voc2YoloError::VocXmlParse { .. }));
    }

    #[test]
    fn collect_xml_files_is_flat_and_sorted() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("b.xml"), "").expect("write b");
        fs::write(temp.path().join("a.XML"), "").expect("write a");
        fs::write(temp.path().join("notes.txt"), "").expect("write txt");
        fs::create_dir_all(temp.path().join("nested")).expect("create nested");
        fs::write(temp.path().join("nested/c.xml"), "").expect("write c");

        let listing = collect_xml_files(temp.path()).expect("list");
        let names: Vec<_> = listing.files.iter().map(|p| file_name_string(p)).collect();
        assert_eq!(names, vec!["a.XML", "b.xml"]);
        assert_eq!(listing.nested.len(), 1);
    }
}
