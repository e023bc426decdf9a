//! voc2yolo: Pascal VOC annotations to a YOLO training dataset.
//!
//! The crate does two things, usually one after the other:
//!
//! 1. convert VOC XML annotation files into YOLO label files
//!    ([`conversion`]), and
//! 2. split an image + label set into train/val/test and copy it into the
//!    `images/<split>` + `labels/<split>` layout trainers expect ([`split`]).
//!
//! # Modules
//!
//! - [`ir`]: boxes, class registry, VOC reader and YOLO writer
//! - [`conversion`]: single-file and batch conversion with reporting
//! - [`split`]: seeded partitioning and dataset materialization
//! - [`error`]: error type for voc2yolo operations

pub mod conversion;
pub mod error;
pub mod ir;
pub mod split;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};

pub use error::Voc2YoloError;

use conversion::ConversionReport;
use ir::io_yolo::write_data_yaml;
use ir::ClassRegistry;
use split::{MissingLabelPolicy, SplitOptions, SplitReport};

/// The voc2yolo CLI application.
#[derive(Parser)]
#[command(name = "voc2yolo")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a directory of VOC XML files into YOLO label files.
    Convert(ConvertArgs),
    /// Split images and labels into train/val/test in the YOLO layout.
    Split(SplitArgs),
    /// Convert annotations, then split the dataset (full pipeline).
    Prepare(PrepareArgs),
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Directory containing the VOC XML files (not searched recursively).
    xml_dir: PathBuf,

    /// Directory to write the label files to.
    #[arg(short = 'o', long)]
    output_dir: PathBuf,

    #[command(flatten)]
    classes: ClassArgs,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(clap::Args)]
struct SplitArgs {
    /// Directory containing the raw images.
    images_dir: PathBuf,

    /// Directory containing one label file per image.
    labels_dir: PathBuf,

    /// Dataset root to create `images/` and `labels/` in.
    #[arg(short = 'o', long)]
    output_dir: PathBuf,

    #[command(flatten)]
    split: SplitArgsCommon,

    #[command(flatten)]
    classes: ClassArgs,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(clap::Args)]
struct PrepareArgs {
    /// Raw data root holding `outputs/` (XML), `images/` and `labels/`.
    raw_dir: PathBuf,

    /// Dataset root to create `images/` and `labels/` in.
    #[arg(short = 'o', long)]
    output_dir: PathBuf,

    /// XML annotations directory [default: <RAW_DIR>/outputs].
    #[arg(long)]
    xml_dir: Option<PathBuf>,

    /// Raw images directory [default: <RAW_DIR>/images].
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Where converted labels are written and read back from
    /// [default: <RAW_DIR>/labels].
    #[arg(long)]
    labels_dir: Option<PathBuf>,

    #[command(flatten)]
    split: SplitArgsCommon,

    #[command(flatten)]
    classes: ClassArgs,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(clap::Args)]
struct ClassArgs {
    /// Ordered class names; a class id is its position in this list.
    #[arg(
        long,
        env = "VOC2YOLO_CLASSES",
        value_delimiter = ',',
        default_values = ir::DEFAULT_CLASSES
    )]
    classes: Vec<String>,
}

#[derive(clap::Args)]
struct SplitArgsCommon {
    /// Fraction of images for training [default: 1 - val - test].
    #[arg(long, value_parser = validate_ratio)]
    train_ratio: Option<f64>,

    /// Fraction of images for validation.
    #[arg(long, default_value_t = 0.15, value_parser = validate_ratio)]
    val_ratio: f64,

    /// Fraction of images for testing.
    #[arg(long, default_value_t = 0.15, value_parser = validate_ratio)]
    test_ratio: f64,

    /// Seed for the shuffle; the same seed and images give the same split.
    #[arg(long, env = "VOC2YOLO_SEED", default_value_t = split::DEFAULT_SEED)]
    seed: u64,

    /// What to do with images that have no label file.
    #[arg(long, value_enum, default_value_t = MissingLabels::Error)]
    missing_labels: MissingLabels,

    /// Do not write `data.yaml` into the output directory.
    #[arg(long)]
    no_data_yaml: bool,
}

impl SplitArgsCommon {
    fn to_options(&self) -> SplitOptions {
        SplitOptions {
            train_ratio: self
                .train_ratio
                .unwrap_or(1.0 - self.val_ratio - self.test_ratio),
            val_ratio: self.val_ratio,
            test_ratio: self.test_ratio,
            seed: self.seed,
            missing_labels: match self.missing_labels {
                MissingLabels::Error => MissingLabelPolicy::Error,
                MissingLabels::Background => MissingLabelPolicy::Background,
            },
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum MissingLabels {
    /// Abort before copying anything.
    Error,
    /// Copy the image without a label (background image).
    Background,
}

fn validate_ratio(s: &str) -> Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("RATIO must be between 0.0 and 1.0".to_string()),
    }
}

/// Run the voc2yolo CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), Voc2YoloError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Split(args)) => run_split(args),
        Some(Commands::Prepare(args)) => run_prepare(args),
        None => {
            println!("voc2yolo {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Pascal VOC annotations to YOLO datasets.");
            println!();
            println!("Run 'voc2yolo --help' for usage information.");
            Ok(())
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), Voc2YoloError> {
    let registry = ClassRegistry::new(&args.classes.classes)?;
    let report = conversion::convert_voc_dir(&args.xml_dir, &args.output_dir, &registry)?;

    match args.report {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print!("{}", report),
    }
    Ok(())
}

fn run_split(args: SplitArgs) -> Result<(), Voc2YoloError> {
    let registry = ClassRegistry::new(&args.classes.classes)?;
    let opts = args.split.to_options();

    let report = split::split_and_organize(
        &args.images_dir,
        &args.labels_dir,
        &args.output_dir,
        &opts,
    )?;
    finish_split(&args.output_dir, &registry, &args.split, &report)?;

    match args.report {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print!("{}", report),
    }
    Ok(())
}

fn run_prepare(args: PrepareArgs) -> Result<(), Voc2YoloError> {
    let registry = ClassRegistry::new(&args.classes.classes)?;
    let opts = args.split.to_options();
    split::validate_split_options(&opts)?;

    let xml_dir = args
        .xml_dir
        .clone()
        .unwrap_or_else(|| args.raw_dir.join("outputs"));
    let images_dir = args
        .images_dir
        .clone()
        .unwrap_or_else(|| args.raw_dir.join("images"));
    let labels_dir = args
        .labels_dir
        .clone()
        .unwrap_or_else(|| args.raw_dir.join("labels"));

    let text = args.report == ReportFormat::Text;

    if text {
        println!("Starting XML to YOLO conversion...");
    }
    let conversion = conversion::convert_voc_dir(&xml_dir, &labels_dir, &registry)?;
    if text {
        print!("{}", conversion);
        println!("{}", "-".repeat(50));
        println!("Starting data splitting and organization...");
    }

    let split_report =
        split::split_and_organize(&images_dir, &labels_dir, &args.output_dir, &opts)?;
    finish_split(&args.output_dir, &registry, &args.split, &split_report)?;

    match args.report {
        ReportFormat::Json => println!("{}", prepare_json(&conversion, &split_report)?),
        ReportFormat::Text => {
            print!("{}", split_report);
            println!("{}", "-".repeat(50));
            println!("All data processing is complete.");
        }
    }
    Ok(())
}

fn finish_split(
    output_dir: &Path,
    registry: &ClassRegistry,
    args: &SplitArgsCommon,
    report: &SplitReport,
) -> Result<(), Voc2YoloError> {
    if args.no_data_yaml {
        return Ok(());
    }
    let include_test = report.counts.test > 0;
    write_data_yaml(output_dir, registry, include_test)?;
    Ok(())
}

fn prepare_json(
    conversion: &ConversionReport,
    split: &SplitReport,
) -> Result<String, Voc2YoloError> {
    let value = serde_json::json!({
        "conversion": conversion,
        "split": split,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
