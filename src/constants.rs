pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

// pngquant: --quality=<min>-<max>
pub const DEFAULT_PNG_QUALITY: u8 = 50;

// jpegoptim: -m<quality> -S<size>%
pub const DEFAULT_JPEG_MAX_QUALITY: u8 = 100;
pub const DEFAULT_JPEG_SIZE_PERCENT: u8 = 50;

/// pngquant exit status when `--skip-if-larger` discarded the result.
pub const PNGQUANT_SKIPPED_EXIT_CODE: i32 = 98;

pub const PNGQUANT_BIN: &str = "pngquant";
pub const JPEGOPTIM_BIN: &str = "jpegoptim";

/// Bundled binaries live under `<base>/tools/<format>/<platform>/<binary>`.
pub const BUNDLED_TOOLS_DIR: &str = "tools";

pub const SIZE_UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
pub const SIZE_UNIT_STEP: f64 = 1024.0;

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Original size:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Compressed size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Compression ratio:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const INFO_PREFIX: &str = "📋";
