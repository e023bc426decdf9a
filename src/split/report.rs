//! Split report types.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::SplitPlan;

/// The result of a split-and-organize run.
#[derive(Clone, Debug, Serialize)]
pub struct SplitReport {
    pub output_dir: PathBuf,
    pub seed: u64,
    pub counts: SplitCounts,
    /// Which image went where.
    pub plan: SplitPlan,
    pub issues: Vec<SplitIssue>,
}

impl SplitReport {
    pub fn warning_count(&self) -> usize {
        self.issues.len()
    }
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Dataset split complete. Train: {}, Val: {}, Test: {}",
            self.counts.train, self.counts.val, self.counts.test
        )?;
        writeln!(
            f,
            "  {} image(s) and {} label file(s) copied into {} (seed {})",
            self.counts.total(),
            self.counts.labels_copied,
            self.output_dir.display(),
            self.seed
        )?;

        if !self.issues.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", self.issues.len())?;
            for issue in &self.issues {
                writeln!(f, "  - {}", issue)?;
            }
        }

        Ok(())
    }
}

/// Per-bucket image counts plus label bookkeeping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SplitCounts {
    pub train: usize,
    pub val: usize,
    pub test: usize,
    pub labels_copied: usize,
    /// Images copied without a label file (background images).
    pub images_without_labels: usize,
}

impl SplitCounts {
    pub fn total(&self) -> usize {
        self.train + self.val + self.test
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SplitIssue {
    pub code: SplitIssueCode,
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for SplitIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Stable issue codes for the JSON report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitIssueCode {
    /// The image had no label file and was copied as a background image.
    MissingLabel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reports_bucket_sizes() {
        let report = SplitReport {
            output_dir: PathBuf::from("processed"),
            seed: 42,
            counts: SplitCounts {
                train: 7,
                val: 2,
                test: 1,
                labels_copied: 10,
                images_without_labels: 0,
            },
            plan: SplitPlan::default(),
            issues: Vec::new(),
        };

        let text = report.to_string();
        assert!(text.contains("Train: 7, Val: 2, Test: 1"));
        assert!(text.contains("10 image(s) and 10 label file(s) copied into processed"));
    }

    #[test]
    fn report_serializes_issue_codes() {
        let report = SplitReport {
            output_dir: PathBuf::from("processed"),
            seed: 7,
            counts: SplitCounts::default(),
            plan: SplitPlan::default(),
            issues: vec![SplitIssue {
                code: SplitIssueCode::MissingLabel,
                path: PathBuf::from("raw/labels/a.txt"),
                message: "no label file; copied as background image".to_string(),
            }],
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"code\":\"missing_label\""));
        assert!(json.contains("\"seed\":7"));
    }
}
