use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("External tool failed with {}: {}", describe_exit_code(.code), .command.join(" "))]
    ExternalTool {
        code: Option<i32>,
        command: Vec<String>,
    },

    #[error("Failed to save image to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid compression factor: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Compression tool not found: {0}")]
    ToolNotFound(String),
}

impl CompressionError {
    /// Exit code reported by the external tool, if this is a tool failure.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CompressionError::ExternalTool { code, .. } => *code,
            _ => None,
        }
    }
}

fn describe_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
