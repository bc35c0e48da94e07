use crate::compressor::{Compressor, ToolOptions};
use crate::error::{CompressionError, Result};
use crate::fetch::{fetch_url_sync, is_url, FetchOptions};
use crate::formats::{ColorMode, ImageKind};
use crate::utils::{format_file_size, validate_file_exists};
use image::error::DecodingError;
use image::{ImageDecoder, ImageError, ImageFormat, ImageReader};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where to load an image from.
///
/// When more than one field is set the buffer wins over the URL, and the URL
/// over the path.
#[derive(Debug, Clone, Default)]
pub struct SourceSpec {
    pub path: Option<PathBuf>,
    pub url: Option<String>,
    pub buffer: Option<Vec<u8>>,
}

impl SourceSpec {
    /// A path or an `http(s)://` URL, as typed on the command line
    pub fn from_input(input: &str) -> Self {
        if is_url(input) {
            Self {
                url: Some(input.to_string()),
                ..Self::default()
            }
        } else {
            Self {
                path: Some(PathBuf::from(input)),
                ..Self::default()
            }
        }
    }
}

/// An encoded PNG or JPEG held in memory together with its header metadata.
#[derive(Debug, Clone)]
pub struct ImageSource {
    data: Vec<u8>,
    kind: ImageKind,
    width: u32,
    height: u32,
    mode: ColorMode,
}

impl ImageSource {
    /// Loads the bytes described by `spec` and reads the image header.
    ///
    /// # Returns
    /// * `Err(CompressionError::Configuration)` - `spec` names no source
    /// * `Err(CompressionError::UnsupportedFormat)` - the bytes are not PNG or JPEG
    pub fn new(spec: SourceSpec) -> Result<Self> {
        Self::load(spec, &FetchOptions::default())
    }

    pub fn load(spec: SourceSpec, fetch_options: &FetchOptions) -> Result<Self> {
        let data = if let Some(buffer) = spec.buffer {
            buffer
        } else if let Some(url) = spec.url {
            fetch_url_sync(&url, fetch_options)?
        } else if let Some(path) = spec.path {
            read_file(&path)?
        } else {
            return Err(CompressionError::Configuration(
                "an image path, url or buffer is required".to_string(),
            ));
        };

        Self::from_buffer(data)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_buffer(read_file(path.as_ref())?)
    }

    pub fn from_url(url: &str) -> Result<Self> {
        Self::from_url_with(url, &FetchOptions::default())
    }

    pub fn from_url_with(url: &str, options: &FetchOptions) -> Result<Self> {
        Self::from_buffer(fetch_url_sync(url, options)?)
    }

    /// Wraps encoded bytes, reading only the header to learn the format,
    /// dimensions and color mode.
    pub fn from_buffer(data: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&data).map_err(|_| {
            CompressionError::UnsupportedFormat("unrecognized image data".to_string())
        })?;
        let kind = ImageKind::from_image_format(format)?;

        let decoder = ImageReader::with_format(Cursor::new(&data), kind.to_image_format())
            .into_decoder()?;
        let (width, height) = decoder.dimensions();
        let mode = match kind {
            ImageKind::Png => png_header_mode(&data)?,
            ImageKind::Jpeg => ColorMode::from(decoder.color_type()),
        };
        drop(decoder);

        debug!(
            "loaded {} image {}x{} {} ({} bytes)",
            kind,
            width,
            height,
            mode,
            data.len()
        );

        Ok(Self {
            data,
            kind,
            width,
            height,
            mode,
        })
    }

    pub fn format(&self) -> ImageKind {
        self.kind
    }

    /// `image/png` or `image/jpeg`
    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }

    /// File extension, `jpg` for JPEG
    pub fn ext(&self) -> &'static str {
        self.kind.extension()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Encoded size, e.g. `"1.00MB"`
    pub fn file_size(&self) -> String {
        format_file_size(self.byte_len() as u64)
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Compresses with the platform's default tool. See [`Self::compress_with`].
    pub fn compress(&self, factor: Option<u8>) -> Result<ImageSource> {
        self.compress_with(factor, &ToolOptions::default())
    }

    /// Runs the format's compression tool and wraps its output in a new
    /// `ImageSource`. `self` is never modified.
    ///
    /// `factor` is the pngquant quality for PNG and the jpegoptim target size
    /// percentage for JPEG.
    pub fn compress_with(&self, factor: Option<u8>, options: &ToolOptions) -> Result<ImageSource> {
        let compressed = Compressor::new(&self.data, self.kind.name())?
            .with_options(options.clone())
            .execute(factor)?;
        ImageSource::from_buffer(compressed)
    }

    /// Writes the encoded bytes to `path`, creating missing parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| CompressionError::Save {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(path, &self.data).map_err(|source| CompressionError::Save {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("saved {} bytes to {:?}", self.data.len(), path);
        Ok(())
    }
}

/// The decoder expands palettes and sub-byte depths, so the mode comes from
/// the IHDR chunk instead.
fn png_header_mode(data: &[u8]) -> Result<ColorMode> {
    let reader = png::Decoder::new(Cursor::new(data))
        .read_info()
        .map_err(|e| ImageError::Decoding(DecodingError::new(ImageFormat::Png.into(), e)))?;
    let info = reader.info();
    Ok(ColorMode::from_png_header(info.color_type, info.bit_depth))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    validate_file_exists(path)?;
    Ok(fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, RgbaImage};
    use tempfile::TempDir;

    fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    fn sample_png() -> Vec<u8> {
        let img = RgbaImage::from_fn(40, 30, |x, y| {
            image::Rgba([(x * 6) as u8, (y * 8) as u8, 128, 255])
        });
        encode(&DynamicImage::ImageRgba8(img), ImageFormat::Png)
    }

    fn sample_jpeg() -> Vec<u8> {
        encode(&DynamicImage::new_rgb8(64, 48), ImageFormat::Jpeg)
    }

    fn encode_png_raw(
        width: u32,
        height: u32,
        color: png::ColorType,
        depth: png::BitDepth,
        palette: Option<Vec<u8>>,
        pixels: &[u8],
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            if let Some(palette) = palette {
                encoder.set_palette(palette);
            }
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(pixels).unwrap();
        }
        buf
    }

    const GIF_HEADER: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff!\xf9\x04\x01\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;";

    #[test]
    fn test_png_metadata_matches_decoder() {
        let data = sample_png();
        let source = ImageSource::from_buffer(data.clone()).unwrap();
        let decoded = image::load_from_memory(&data).unwrap();

        assert_eq!(source.format(), ImageKind::Png);
        assert_eq!(source.size(), decoded.dimensions());
        assert_eq!(source.mode(), ColorMode::from(decoded.color()));
        assert_eq!(source.mode().to_string(), "RGBA");
        assert_eq!(source.content_type(), "image/png");
        assert_eq!(source.ext(), "png");
    }

    #[test]
    fn test_indexed_png_reports_palette_mode() {
        let data = encode_png_raw(
            2,
            1,
            png::ColorType::Indexed,
            png::BitDepth::Eight,
            Some(vec![255, 0, 0, 0, 0, 255]),
            &[0, 1],
        );
        let source = ImageSource::from_buffer(data).unwrap();

        assert_eq!(source.format(), ImageKind::Png);
        assert_eq!(source.size(), (2, 1));
        assert_eq!(source.mode(), ColorMode::Palette);
        assert_eq!(source.mode().to_string(), "P");
    }

    #[test]
    fn test_one_bit_grayscale_png_reports_bilevel_mode() {
        // 8 pixels packed into a single byte
        let data = encode_png_raw(
            8,
            1,
            png::ColorType::Grayscale,
            png::BitDepth::One,
            None,
            &[0b1010_1010],
        );
        let source = ImageSource::from_buffer(data).unwrap();

        assert_eq!(source.size(), (8, 1));
        assert_eq!(source.mode().to_string(), "1");
    }

    #[test]
    fn test_jpeg_metadata() {
        let source = ImageSource::from_buffer(sample_jpeg()).unwrap();
        assert_eq!(source.format(), ImageKind::Jpeg);
        assert_eq!(source.format().to_string(), "JPEG");
        assert_eq!((source.width(), source.height()), (64, 48));
        assert_eq!(source.mode().to_string(), "RGB");
        assert_eq!(source.content_type(), "image/jpeg");
        assert_eq!(source.ext(), "jpg");
    }

    #[test]
    fn test_gif_is_unsupported() {
        let result = ImageSource::from_buffer(GIF_HEADER.to_vec());
        assert!(matches!(result, Err(CompressionError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_garbage_is_unsupported() {
        let result = ImageSource::from_buffer(b"definitely not an image".to_vec());
        assert!(matches!(result, Err(CompressionError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_empty_spec_is_configuration_error() {
        let result = ImageSource::new(SourceSpec::default());
        assert!(matches!(result, Err(CompressionError::Configuration(_))));
    }

    #[test]
    fn test_buffer_takes_precedence() {
        let spec = SourceSpec {
            path: Some(PathBuf::from("/nonexistent/input.png")),
            url: Some("http://127.0.0.1:1/never.png".to_string()),
            buffer: Some(sample_png()),
        };
        let source = ImageSource::new(spec).unwrap();
        assert_eq!(source.format(), ImageKind::Png);
    }

    #[test]
    fn test_spec_from_input() {
        let spec = SourceSpec::from_input("https://example.com/a.jpg");
        assert_eq!(spec.url.as_deref(), Some("https://example.com/a.jpg"));
        assert!(spec.path.is_none());

        let spec = SourceSpec::from_input("output/input.png");
        assert_eq!(spec.path, Some(PathBuf::from("output/input.png")));
        assert!(spec.url.is_none());
    }

    #[tokio::test]
    async fn test_from_url_inside_runtime_returns_error() {
        let result = ImageSource::from_url("http://127.0.0.1:1/x.png");
        assert!(matches!(result, Err(CompressionError::Http(_))));
    }

    #[test]
    fn test_missing_path() {
        let result = ImageSource::from_path("/nonexistent/input.png");
        assert!(matches!(result, Err(CompressionError::FileNotFound(_))));
    }

    #[test]
    fn test_from_path_reads_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.jpg");
        let data = sample_jpeg();
        fs::write(&path, &data).unwrap();

        let source = ImageSource::from_path(&path).unwrap();
        assert_eq!(source.as_bytes(), data.as_slice());
        assert_eq!(source.byte_len(), data.len());
    }

    #[test]
    fn test_file_size_is_human_readable() {
        let source = ImageSource::from_buffer(sample_png()).unwrap();
        assert_eq!(
            source.file_size(),
            format_file_size(source.byte_len() as u64)
        );
        assert!(source.file_size().ends_with("KB"));
    }

    #[test]
    fn test_save_creates_nested_directories() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a").join("b").join("c").join("out.png");
        let source = ImageSource::from_buffer(sample_png()).unwrap();

        source.save(&target).unwrap();

        assert_eq!(fs::read(&target).unwrap(), source.as_bytes());
    }

    #[test]
    fn test_save_directory_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"file, not a directory").unwrap();

        let source = ImageSource::from_buffer(sample_png()).unwrap();
        let result = source.save(blocker.join("nested").join("out.png"));
        assert!(matches!(result, Err(CompressionError::Save { .. })));
    }

    #[test]
    fn test_save_write_failure() {
        let dir = TempDir::new().unwrap();
        let source = ImageSource::from_buffer(sample_png()).unwrap();
        // The target is an existing directory.
        let result = source.save(dir.path());
        assert!(matches!(result, Err(CompressionError::Save { .. })));
    }

    #[cfg(unix)]
    mod compression {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn fake_tool(dir: &TempDir, name: &str, body: &str) -> ToolOptions {
            let path = dir.path().join(name);
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            ToolOptions::new(Some(path), None)
        }

        #[test]
        fn test_compress_returns_new_source() {
            let dir = TempDir::new().unwrap();
            let options = fake_tool(&dir, "passthrough", "cat");
            let original = ImageSource::from_buffer(sample_png()).unwrap();

            let compressed = original.compress_with(None, &options).unwrap();

            assert_eq!(compressed.format(), ImageKind::Png);
            assert_eq!(compressed.size(), original.size());
            assert!(compressed.byte_len() <= original.byte_len());
        }

        #[test]
        fn test_failed_compression_leaves_original_untouched() {
            let dir = TempDir::new().unwrap();
            let options = fake_tool(&dir, "fails", "cat > /dev/null\nexit 99");
            let data = sample_jpeg();
            let original = ImageSource::from_buffer(data.clone()).unwrap();

            let result = original.compress_with(Some(40), &options);

            assert_eq!(result.unwrap_err().exit_code(), Some(99));
            assert_eq!(original.as_bytes(), data.as_slice());
        }

        #[test]
        fn test_tool_output_must_still_be_an_image() {
            let dir = TempDir::new().unwrap();
            let options = fake_tool(&dir, "garbage", "cat > /dev/null\nprintf 'nope'");
            let original = ImageSource::from_buffer(sample_png()).unwrap();

            let result = original.compress_with(None, &options);
            assert!(matches!(result, Err(CompressionError::UnsupportedFormat(_))));
        }

        #[test]
        #[ignore = "requires pngquant on PATH"]
        fn test_real_pngquant_round_trip() {
            assert!(
                which::which("pngquant").is_ok(),
                "pngquant must be installed to run this test"
            );
            let original = ImageSource::from_buffer(sample_png()).unwrap();
            match original.compress(None) {
                Ok(compressed) => {
                    assert_eq!(compressed.format(), ImageKind::Png);
                    assert!(image::load_from_memory(compressed.as_bytes()).is_ok());
                    assert!(compressed.byte_len() <= original.byte_len());
                }
                // 98: --skip-if-larger kept the original, 99: quality below minimum
                Err(err) => assert!(matches!(
                    err.exit_code(),
                    Some(crate::constants::PNGQUANT_SKIPPED_EXIT_CODE) | Some(99)
                )),
            }
        }
    }
}
