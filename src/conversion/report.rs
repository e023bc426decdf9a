//! Conversion report types.
//!
//! A batch conversion never aborts on a single bad file; everything that was
//! skipped ends up here instead, with a stable code and the offending path.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A report generated by a VOC-to-YOLO batch conversion.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// Directory the XML files were read from.
    pub source_dir: PathBuf,
    /// Directory the label files were written to.
    pub output_dir: PathBuf,
    pub counts: ConversionCounts,
    /// Issues in processing order.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    /// Count of warning-level issues.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    /// Count of info-level issues.
    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Info)
            .count()
    }

    /// Issues carrying the given code.
    pub fn issues_with_code(
        &self,
        code: ConversionIssueCode,
    ) -> impl Iterator<Item = &ConversionIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Converted {} of {} XML file(s) from {} into {}",
            self.counts.files_converted,
            self.counts.files_seen,
            self.source_dir.display(),
            self.output_dir.display()
        )?;
        writeln!(
            f,
            "  {} label line(s) written, {} object(s) skipped, {} file(s) skipped",
            self.counts.objects_written, self.counts.objects_skipped, self.counts.files_skipped
        )?;

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", warnings)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Warning)
            {
                writeln!(f, "  - {}", issue)?;
            }
        }

        let infos = self.info_count();
        if infos > 0 {
            writeln!(f)?;
            writeln!(f, "Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Info)
            {
                writeln!(f, "  - {}", issue)?;
            }
        }

        Ok(())
    }
}

/// Running totals for a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    pub files_seen: usize,
    pub files_converted: usize,
    pub files_skipped: usize,
    pub objects_written: usize,
    pub objects_skipped: usize,
}

/// A single issue found while converting.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: ConversionIssueCode,
    pub path: PathBuf,
    pub message: String,
}

impl ConversionIssue {
    pub fn warning(
        code: ConversionIssueCode,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn info(
        code: ConversionIssueCode,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConversionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    /// Something in the input was dropped.
    Warning,
    /// Informational note; nothing was dropped from the converted files.
    Info,
}

/// Stable issue codes for programmatic consumption.
///
/// These codes are part of the JSON report and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionIssueCode {
    /// An object's class is not in the class list; the object was dropped.
    UnknownClass,
    /// The document has no `<size>`; the file was skipped.
    MissingSize,
    /// Width or height is zero; the file was skipped.
    InvalidImageSize,
    /// The document could not be read or parsed; the file was skipped.
    MalformedAnnotation,
    /// `.xml` files in sub-directories were not scanned.
    NestedXmlNotScanned,
}
