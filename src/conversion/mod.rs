//! Pascal VOC XML to YOLO label conversion.
//!
//! [`convert_voc_file`] turns one annotation document into one label file.
//! [`convert_voc_dir`] runs it over a flat directory, absorbing per-file
//! failures into a [`ConversionReport`] so one bad file never stops a batch.

pub mod report;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
};

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Voc2YoloError;
use crate::ir::io_voc_xml::{collect_xml_files, read_voc_xml, VocAnnotation};
use crate::ir::io_yolo::{label_file_name, write_label_file, YoloLabelLine};
use crate::ir::ClassRegistry;

/// What happened to a single converted file.
#[derive(Clone, Debug, PartialEq)]
pub struct FileOutcome {
    /// The label file that was written.
    pub label_path: PathBuf,
    /// Rows written, in document order.
    pub lines: Vec<YoloLabelLine>,
    /// Class names of objects dropped because they are not in the registry.
    pub unknown_classes: Vec<String>,
}

/// Convert one VOC XML file into `output_dir/<stem>.txt`.
///
/// `output_dir` is created if needed. Objects whose class is not in
/// `registry` are left out and listed in the outcome. Any error (unreadable
/// file, malformed XML, missing `<size>`, zero dimensions, bad box values)
/// means no label file is written for this input.
pub fn convert_voc_file(
    xml_path: &Path,
    output_dir: &Path,
    registry: &ClassRegistry,
) -> Result<FileOutcome, Voc2YoloError> {
    fs::create_dir_all(output_dir).map_err(Voc2YoloError::Io)?;

    let annotation = read_voc_xml(xml_path)?;
    let (lines, unknown_classes) = annotation_to_label_lines(&annotation, registry, xml_path)?;

    let file_name = label_file_name(xml_path).ok_or_else(|| Voc2YoloError::VocXmlParse {
        path: xml_path.to_path_buf(),
        message: "path has no file name".to_string(),
    })?;
    let label_path = output_dir.join(file_name);
    write_label_file(&label_path, &lines)?;

    Ok(FileOutcome {
        label_path,
        lines,
        unknown_classes,
    })
}

/// Resolve every object of a parsed annotation into label rows.
///
/// Returns the rows in document order together with the names of objects
/// whose class is unknown. `path` is only used for error context.
pub fn annotation_to_label_lines(
    annotation: &VocAnnotation,
    registry: &ClassRegistry,
    path: &Path,
) -> Result<(Vec<YoloLabelLine>, Vec<String>), Voc2YoloError> {
    let mut lines = Vec::with_capacity(annotation.objects.len());
    let mut unknown = Vec::new();

    for object in &annotation.objects {
        let Some(class_id) = registry.id_of(&object.name) else {
            unknown.push(object.name.clone());
            continue;
        };

        let bbox = object.bbox(path)?;
        lines.push(YoloLabelLine::new(
            class_id,
            bbox.to_normalized_cxcywh(annotation.width, annotation.height),
        ));
    }

    Ok((lines, unknown))
}

/// Convert every `.xml` file directly inside `xml_dir`.
///
/// Fails only if `xml_dir` is missing or the output directory cannot be
/// created. Files are processed in file-name order.
pub fn convert_voc_dir(
    xml_dir: &Path,
    output_dir: &Path,
    registry: &ClassRegistry,
) -> Result<ConversionReport, Voc2YoloError> {
    if !xml_dir.is_dir() {
        return Err(Voc2YoloError::InputDirNotFound {
            kind: "XML annotations",
            path: xml_dir.to_path_buf(),
        });
    }
    fs::create_dir_all(output_dir).map_err(Voc2YoloError::Io)?;

    let listing = collect_xml_files(xml_dir)?;
    let mut report = ConversionReport::new(xml_dir, output_dir);

    if let Some(sample) = listing.nested.first() {
        report.add(ConversionIssue::info(
            ConversionIssueCode::NestedXmlNotScanned,
            xml_dir,
            format!(
                "annotations are scanned flat (non-recursive); {} nested .xml file(s) were not converted, e.g. {}",
                listing.nested.len(),
                sample.strip_prefix(xml_dir).unwrap_or(sample).display()
            ),
        ));
    }

    for xml_path in &listing.files {
        report.counts.files_seen += 1;

        match convert_voc_file(xml_path, output_dir, registry) {
            Ok(outcome) => {
                report.counts.files_converted += 1;
                report.counts.objects_written += outcome.lines.len();
                report.counts.objects_skipped += outcome.unknown_classes.len();
                for name in outcome.unknown_classes {
                    report.add(ConversionIssue::warning(
                        ConversionIssueCode::UnknownClass,
                        xml_path.as_path(),
                        format!("skipping unknown class '{name}'"),
                    ));
                }
            }
            Err(err) => {
                report.counts.files_skipped += 1;
                report.add(skipped_file_issue(xml_path, &err));
            }
        }
    }

    Ok(report)
}

fn skipped_file_issue(path: &Path, err: &Voc2YoloError) -> ConversionIssue {
    match err {
        Voc2YoloError::MissingSize { .. } => ConversionIssue::warning(
            ConversionIssueCode::MissingSize,
            path,
            "skipping file: 'size' element not found",
        ),
        Voc2YoloError::InvalidImageSize { width, height, .. } => ConversionIssue::warning(
            ConversionIssueCode::InvalidImageSize,
            path,
            format!("skipping file: image size {width}x{height} has a zero dimension"),
        ),
        other => ConversionIssue::warning(
            ConversionIssueCode::MalformedAnnotation,
            path,
            format!("skipping file: {other}"),
        ),
    }
}
