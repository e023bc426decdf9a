//! Train/val/test partitioning of an image + label dataset.
//!
//! Images are split in two seeded stages (train vs. the rest, then val vs.
//! test) and copied with their labels into the `images/<split>` and
//! `labels/<split>` layout YOLO trainers read.

pub mod report;

pub use report::{SplitCounts, SplitIssue, SplitIssueCode, SplitReport};

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Voc2YoloError;
use crate::ir::io_yolo::{is_image_file, label_file_name};

pub const DEFAULT_SEED: u64 = 42;

const RATIO_TOLERANCE: f64 = 1e-6;

/// One of the three dataset subsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitBucket {
    Train,
    Val,
    Test,
}

impl SplitBucket {
    pub const ALL: [SplitBucket; 3] = [SplitBucket::Train, SplitBucket::Val, SplitBucket::Test];

    /// Directory name under `images/` and `labels/`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            SplitBucket::Train => "train",
            SplitBucket::Val => "val",
            SplitBucket::Test => "test",
        }
    }
}

/// What to do when an image has no label file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingLabelPolicy {
    /// Abort before anything is copied.
    #[default]
    Error,
    /// Copy the image alone; trainers treat it as a background image.
    Background,
}

/// Split options.
#[derive(Clone, Debug)]
pub struct SplitOptions {
    pub train_ratio: f64,
    pub val_ratio: f64,
    pub test_ratio: f64,
    pub seed: u64,
    pub missing_labels: MissingLabelPolicy,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            train_ratio: 0.7,
            val_ratio: 0.15,
            test_ratio: 0.15,
            seed: DEFAULT_SEED,
            missing_labels: MissingLabelPolicy::Error,
        }
    }
}

/// Validate split options before running.
pub fn validate_split_options(opts: &SplitOptions) -> Result<(), Voc2YoloError> {
    for (name, value) in [
        ("train", opts.train_ratio),
        ("val", opts.val_ratio),
        ("test", opts.test_ratio),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(Voc2YoloError::InvalidSplitParams {
                message: format!("{name} ratio must be in the interval [0.0, 1.0], got {value}"),
            });
        }
    }

    let holdout = opts.val_ratio + opts.test_ratio;
    if !(holdout > 0.0 && holdout < 1.0) {
        return Err(Voc2YoloError::InvalidSplitParams {
            message: format!(
                "val + test ratio must be in the interval (0.0, 1.0), got {holdout}"
            ),
        });
    }

    let total = opts.train_ratio + holdout;
    if (total - 1.0).abs() > RATIO_TOLERANCE {
        return Err(Voc2YoloError::InvalidSplitParams {
            message: format!("train + val + test ratios must sum to 1.0, got {total}"),
        });
    }

    Ok(())
}

/// Image file names per bucket. The three lists are disjoint and together
/// hold every input name exactly once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SplitPlan {
    pub train: Vec<String>,
    pub val: Vec<String>,
    pub test: Vec<String>,
}

impl SplitPlan {
    pub fn bucket(&self, bucket: SplitBucket) -> &[String] {
        match bucket {
            SplitBucket::Train => &self.train,
            SplitBucket::Val => &self.val,
            SplitBucket::Test => &self.test,
        }
    }

    /// Iterates `(bucket, image_name)` pairs, train first.
    pub fn iter(&self) -> impl Iterator<Item = (SplitBucket, &str)> {
        SplitBucket::ALL.into_iter().flat_map(move |bucket| {
            self.bucket(bucket)
                .iter()
                .map(move |name| (bucket, name.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shuffle `items` with a generator seeded by `seed` and cut it in two.
///
/// The held-out side gets `ceil(holdout_fraction * n)` items, the kept side
/// the rest. Returns `(kept, held_out)`.
pub fn shuffle_split<T>(mut items: Vec<T>, holdout_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let n = items.len();
    let n_holdout = ((holdout_fraction * n as f64).ceil() as usize).min(n);

    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let kept = items.split_off(n_holdout);
    (kept, items)
}

/// Partition image names into train/val/test.
///
/// Names are sorted first so the result depends only on the set of names
/// and the seed. Stage one holds out `val + test` of the images, stage two
/// gives `test / (val + test)` of the held-out images to test. Options are
/// assumed valid (see [`validate_split_options`]).
pub fn partition(image_names: &[String], opts: &SplitOptions) -> SplitPlan {
    let mut names = image_names.to_vec();
    names.sort();

    let holdout = opts.val_ratio + opts.test_ratio;
    let (mut train, remaining) = shuffle_split(names, holdout, opts.seed);
    let (mut val, mut test) = shuffle_split(remaining, opts.test_ratio / holdout, opts.seed);

    train.sort();
    val.sort();
    test.sort();

    SplitPlan { train, val, test }
}

/// List image file names (`.jpg`, `.jpeg`, `.png`) directly inside `dir`,
/// sorted. An image whose name is not valid UTF-8 is an error.
pub fn collect_image_names(dir: &Path) -> Result<Vec<String>, Voc2YoloError> {
    let mut names = Vec::new();

    for entry in fs::read_dir(dir).map_err(Voc2YoloError::Io)? {
        let entry = entry.map_err(Voc2YoloError::Io)?;
        let path = entry.path();
        if path.is_file() && is_image_file(&path) {
            let name = entry
                .file_name()
                .into_string()
                .map_err(|_| Voc2YoloError::NonUtf8FileName { path })?;
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Create `images/{train,val,test}` and `labels/{train,val,test}` under
/// `output_dir`. Existing directories and files are left alone.
pub fn create_split_dirs(output_dir: &Path) -> Result<(), Voc2YoloError> {
    for bucket in SplitBucket::ALL {
        fs::create_dir_all(output_dir.join("images").join(bucket.dir_name()))
            .map_err(Voc2YoloError::Io)?;
        fs::create_dir_all(output_dir.join("labels").join(bucket.dir_name()))
            .map_err(Voc2YoloError::Io)?;
    }
    Ok(())
}

/// Split a raw image/label set and copy it into the YOLO directory layout.
///
/// Fatal errors (invalid options, missing input directories, no images,
/// a missing label under [`MissingLabelPolicy::Error`]) are raised before
/// any directory is created or file copied.
pub fn split_and_organize(
    raw_images_dir: &Path,
    raw_labels_dir: &Path,
    output_dir: &Path,
    opts: &SplitOptions,
) -> Result<SplitReport, Voc2YoloError> {
    validate_split_options(opts)?;

    if !raw_images_dir.is_dir() {
        return Err(Voc2YoloError::InputDirNotFound {
            kind: "Raw images",
            path: raw_images_dir.to_path_buf(),
        });
    }
    if !raw_labels_dir.is_dir() {
        return Err(Voc2YoloError::InputDirNotFound {
            kind: "Raw labels",
            path: raw_labels_dir.to_path_buf(),
        });
    }

    let images = collect_image_names(raw_images_dir)?;
    if images.is_empty() {
        return Err(Voc2YoloError::NoImagesFound {
            path: raw_images_dir.to_path_buf(),
        });
    }

    let plan = partition(&images, opts);

    let mut jobs = Vec::with_capacity(plan.len());
    let mut issues = Vec::new();
    for (bucket, image_name) in plan.iter() {
        let label_name = label_file_name(Path::new(image_name)).ok_or_else(|| {
            Voc2YoloError::LabelNotFound {
                image: image_name.to_string(),
                label_path: raw_labels_dir.to_path_buf(),
            }
        })?;
        let label_path = raw_labels_dir.join(&label_name);

        let label = if label_path.is_file() {
            Some(label_name)
        } else {
            match opts.missing_labels {
                MissingLabelPolicy::Error => {
                    return Err(Voc2YoloError::LabelNotFound {
                        image: image_name.to_string(),
                        label_path,
                    });
                }
                MissingLabelPolicy::Background => {
                    issues.push(SplitIssue {
                        code: SplitIssueCode::MissingLabel,
                        path: label_path,
                        message: format!(
                            "no label file for '{image_name}'; copied as background image"
                        ),
                    });
                    None
                }
            }
        };

        jobs.push(CopyJob {
            bucket,
            image_name,
            label,
        });
    }

    create_split_dirs(output_dir)?;

    let mut counts = SplitCounts {
        train: plan.train.len(),
        val: plan.val.len(),
        test: plan.test.len(),
        ..Default::default()
    };

    for job in jobs {
        let split = job.bucket.dir_name();
        copy_file(
            &raw_images_dir.join(job.image_name),
            &output_dir.join("images").join(split).join(job.image_name),
        )?;

        match &job.label {
            Some(label_name) => {
                copy_file(
                    &raw_labels_dir.join(label_name),
                    &output_dir.join("labels").join(split).join(label_name),
                )?;
                counts.labels_copied += 1;
            }
            None => counts.images_without_labels += 1,
        }
    }

    Ok(SplitReport {
        output_dir: output_dir.to_path_buf(),
        seed: opts.seed,
        counts,
        plan,
        issues,
    })
}

struct CopyJob<'a> {
    bucket: SplitBucket,
    image_name: &'a str,
    label: Option<PathBuf>,
}

fn copy_file(from: &Path, to: &Path) -> Result<(), Voc2YoloError> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|source| Voc2YoloError::CopyFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
}
