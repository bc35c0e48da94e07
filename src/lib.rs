pub mod cli;
pub mod compressor;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod formats;
pub mod image_source;
pub mod info;
pub mod logger;
pub mod platform;
pub mod utils;

pub use compressor::{CompressionRequest, Compressor, ToolOptions};
pub use error::{CompressionError, Result};
pub use fetch::{fetch_url_async, fetch_url_sync, FetchOptions};
pub use formats::{ColorMode, ImageKind, ToolFormat};
pub use image_source::{ImageSource, SourceSpec};
pub use info::{image_info_rows, print_image_info};
pub use platform::{tool_path, Platform};
pub use utils::format_file_size;
