//! Ultralytics-style YOLO label and layout writer.
//!
//! Label files hold one `class_id cx cy w h` row per object, normalized to
//! the image size. Dataset roots carry `images/<split>` and `labels/<split>`
//! trees plus an optional `data.yaml` descriptor.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{BBoxCXCYWH, ClassId, ClassRegistry, Normalized};
use crate::error::Voc2YoloError;

pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
pub const LABEL_EXTENSION: &str = "txt";
pub const DATA_YAML_FILE: &str = "data.yaml";

/// One row of a YOLO label file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoloLabelLine {
    pub class_id: ClassId,
    pub bbox: BBoxCXCYWH<Normalized>,
}

impl YoloLabelLine {
    pub fn new(class_id: ClassId, bbox: BBoxCXCYWH<Normalized>) -> Self {
        Self { class_id, bbox }
    }
}

impl fmt::Display for YoloLabelLine {
    /// Formats the row without a trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (cx, cy, w, h) = self.bbox.to_tuple();
        write!(
            f,
            "{} {} {} {} {}",
            self.class_id,
            format_label_float(cx),
            format_label_float(cy),
            format_label_float(w),
            format_label_float(h)
        )
    }
}

/// Formats a float the way existing label tooling writes it.
///
/// This is the shortest string that round-trips, with the conventions of
/// the tools whose output we must match: integral values keep `.0`,
/// exponents are signed with at least two digits (`1e-05`, `1e+16`), and
/// non-finite values are lower-case.
pub fn format_label_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Debug already produces the shortest round-trip digits, keeps `.0` on
    // integral values and switches to exponent form below 1e-4 and at 1e16.
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Renders label rows as file contents, one newline-terminated row each.
pub fn to_label_string(lines: &[YoloLabelLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

/// Writes a label file, replacing any existing file. An empty slice
/// produces an empty file.
pub fn write_label_file(path: &Path, lines: &[YoloLabelLine]) -> Result<(), Voc2YoloError> {
    fs::write(path, to_label_string(lines)).map_err(Voc2YoloError::Io)
}

/// Label file name for an annotation or image path: same stem, `.txt`.
pub fn label_file_name(path: &Path) -> Option<PathBuf> {
    let mut name = path.file_stem()?.to_os_string();
    name.push(".");
    name.push(LABEL_EXTENSION);
    Some(PathBuf::from(name))
}

/// Returns true for `.jpg`, `.jpeg` and `.png` files (any case).
pub fn is_image_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

#[derive(Debug, Serialize)]
struct DataYaml {
    path: String,
    train: String,
    val: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    test: Option<String>,
    nc: usize,
    names: BTreeMap<usize, String>,
}

/// Writes `data.yaml` at the dataset root.
///
/// `path` is the canonical dataset root when it can be resolved, otherwise
/// the root as given. Split entries point at the `images/<split>`
/// directories; `test` is omitted when `include_test` is false.
pub fn write_data_yaml(
    output_root: &Path,
    registry: &ClassRegistry,
    include_test: bool,
) -> Result<PathBuf, Voc2YoloError> {
    let root = fs::canonicalize(output_root).unwrap_or_else(|_| output_root.to_path_buf());

    let data = DataYaml {
        path: root.to_string_lossy().replace('\\', "/"),
        train: "images/train".to_string(),
        val: "images/val".to_string(),
        test: include_test.then(|| "images/test".to_string()),
        nc: registry.len(),
        names: registry
            .iter()
            .map(|(id, name)| (id.as_usize(), name.to_string()))
            .collect(),
    };

    let path = output_root.join(DATA_YAML_FILE);
    let yaml = serde_yaml::to_string(&data).map_err(|source| Voc2YoloError::DataYamlWrite {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, yaml).map_err(Voc2YoloError::Io)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_line_uses_shortest_float_form() {
        let line = YoloLabelLine::new(ClassId(1), BBoxCXCYWH::new(0.2, 0.5, 0.2, 0.5));
        assert_eq!(line.to_string(), "1 0.2 0.5 0.2 0.5");
    }

    #[test]
    fn integral_values_keep_decimal_point() {
        assert_eq!(format_label_float(1.0), "1.0");
        assert_eq!(format_label_float(0.0), "0.0");
        assert_eq!(format_label_float(-0.0), "-0.0");
    }

    #[test]
    fn exponent_form_has_signed_two_digit_exponent() {
        assert_eq!(format_label_float(0.00001), "1e-05");
        assert_eq!(format_label_float(1.5e-7), "1.5e-07");
        assert_eq!(format_label_float(1e16), "1e+16");
        assert_eq!(format_label_float(1.25e-100), "1.25e-100");
        assert_eq!(format_label_float(0.0001), "0.0001");
    }

    #[test]
    fn non_finite_values_are_lower_case() {
        assert_eq!(format_label_float(f64::NAN), "nan");
        assert_eq!(format_label_float(f64::INFINITY), "inf");
        assert_eq!(format_label_float(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn label_string_terminates_every_row() {
        let lines = [
            YoloLabelLine::new(ClassId(0), BBoxCXCYWH::new(0.5, 0.5, 1.0, 1.0)),
            YoloLabelLine::new(ClassId(1), BBoxCXCYWH::new(0.25, 0.75, 0.1, 0.3)),
        ];
        assert_eq!(
            to_label_string(&lines),
            "0 0.5 0.5 1.0 1.0\n1 0.25 0.75 0.1 0.3\n"
        );
        assert_eq!(to_label_string(&[]), "");
    }

    #[test]
    fn label_file_name_replaces_extension() {
        assert_eq!(
            label_file_name(Path::new("/data/raw/img_01.jpeg")),
            Some(PathBuf::from("img_01.txt"))
        );
        assert_eq!(
            label_file_name(Path::new("frame.v2.xml")),
            Some(PathBuf::from("frame.v2.txt"))
        );
    }

    #[test]
    fn image_extensions_are_case_insensitive() {
        assert!(is_image_file(Path::new("a.JPG")));
        assert!(is_image_file(Path::new("a.jpeg")));
        assert!(is_image_file(Path::new("a.png")));
        assert!(!is_image_file(Path::new("a.bmp")));
        assert!(!is_image_file(Path::new("jpg")));
    }

    #[test]
    fn data_yaml_lists_names_in_registry_order() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let registry = ClassRegistry::default();

        let path = write_data_yaml(temp.path(), &registry, true).expect("write data.yaml");
        let yaml = fs::read_to_string(path).expect("read data.yaml");

        assert!(yaml.contains("train: images/train"));
        assert!(yaml.contains("val: images/val"));
        assert!(yaml.contains("test: images/test"));
        assert!(yaml.contains("nc: 2"));
        assert!(yaml.contains("0: weed"));
        assert!(yaml.contains("1: rice"));
    }

    #[test]
    fn data_yaml_can_omit_test_split() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let registry = ClassRegistry::new(["a"]).expect("registry");

        let path = write_data_yaml(temp.path(), &registry, false).expect("write data.yaml");
        let yaml = fs::read_to_string(path).expect("read data.yaml");
        assert!(!yaml.contains("test:"));
    }
}
