use std::path::PathBuf;
use thiserror::Error;

/// The main error type for voc2yolo operations.
#[derive(Debug, Error)]
pub enum Voc2YoloError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse VOC XML {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Skipping {path}: 'size' element not found")]
    MissingSize { path: PathBuf },

    #[error("Invalid image size {width}x{height} in {path}; width and height must be positive")]
    InvalidImageSize {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    #[error("{kind} directory not found at: {path}")]
    InputDirNotFound { kind: &'static str, path: PathBuf },

    #[error("No image files found in the directory: {path}")]
    NoImagesFound { path: PathBuf },

    #[error("Image file name is not valid UTF-8: {path}")]
    NonUtf8FileName { path: PathBuf },

    #[error("Label file for image '{image}' not found at: {label_path}")]
    LabelNotFound { image: String, label_path: PathBuf },

    #[error("Invalid split parameters: {message}")]
    InvalidSplitParams { message: String },

    #[error("Invalid class list: {message}")]
    InvalidClassRegistry { message: String },

    #[error("Failed to copy {from} to {to}: {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write data.yaml to {path}: {source}")]
    DataYamlWrite {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize report as JSON: {0}")]
    ReportJson(#[from] serde_json::Error),
}
