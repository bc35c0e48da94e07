use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tiny_image::cli::{Args, Commands};
use tiny_image::constants::{
    ORIGINAL_SIZE_PREFIX, PNGQUANT_SKIPPED_EXIT_CODE, SUCCESS_PREFIX, WARNING_PREFIX,
};
use tiny_image::utils::{create_progress_spinner, format_file_size, print_compression_result};
use tiny_image::{
    logger, print_image_info, FetchOptions, ImageKind, ImageSource, SourceSpec, ToolOptions,
};
use tracing::debug;

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    match args.command {
        Commands::Compress {
            input,
            output,
            factor,
            tool,
            tools_dir,
            timeout,
        } => {
            let options = ToolOptions::new(tool, tools_dir);
            compress(&input, &output, factor, &options, &FetchOptions::new(timeout))?;
        }
        Commands::Info { input, timeout } => {
            let image = load(&input, &FetchOptions::new(timeout))?;
            print_image_info(&input, &image);
        }
    }

    Ok(())
}

fn load(input: &str, fetch_options: &FetchOptions) -> Result<ImageSource> {
    let spinner = create_progress_spinner(&format!("Loading {}...", input));
    let image = ImageSource::load(SourceSpec::from_input(input), fetch_options)
        .with_context(|| format!("failed to load image from {}", input));
    spinner.finish_and_clear();
    image
}

fn compress(
    input: &str,
    output: &Path,
    factor: Option<u8>,
    options: &ToolOptions,
    fetch_options: &FetchOptions,
) -> Result<()> {
    println!("🗜️  Compressing image: {}", input);
    println!("📁 Output: {:?}", output);

    let original = load(input, fetch_options)?;
    println!(
        "{} {} bytes ({}, {}x{} {} {})",
        ORIGINAL_SIZE_PREFIX,
        original.byte_len(),
        original.file_size(),
        original.width(),
        original.height(),
        original.format(),
        original.mode()
    );

    let spinner = create_progress_spinner("Compressing...");
    let result = original.compress_with(factor, options);
    spinner.finish_and_clear();

    let compressed = match result {
        Ok(compressed) => compressed,
        Err(err)
            if original.format() == ImageKind::Png
                && err.exit_code() == Some(PNGQUANT_SKIPPED_EXIT_CODE) =>
        {
            println!(
                "{}  pngquant could not make the image smaller, keeping the original",
                WARNING_PREFIX
            );
            debug!("{}", err);
            original.clone()
        }
        Err(err) => return Err(err).context("compression failed"),
    };

    let output = with_default_extension(output, compressed.ext());
    compressed
        .save(&output)
        .with_context(|| format!("failed to save {:?}", output))?;

    print_compression_result(original.byte_len() as u64, compressed.byte_len() as u64);
    println!(
        "{} Saved {} ({})",
        SUCCESS_PREFIX,
        output.display(),
        format_file_size(compressed.byte_len() as u64)
    );

    Ok(())
}

/// Adds the image's extension when the output path has none.
fn with_default_extension(output: &Path, ext: &str) -> PathBuf {
    if output.extension().is_some() {
        output.to_path_buf()
    } else {
        output.with_extension(ext)
    }
}
