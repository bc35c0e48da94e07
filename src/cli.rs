use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tiny-image",
    about = "Inspect PNG/JPEG images and shrink them with pngquant or jpegoptim",
    long_about = "tiny-image loads a PNG or JPEG from a local path or an http(s) URL, reports its \
                  metadata, and pipes it through pngquant (PNG) or jpegoptim (JPEG) to produce a \
                  smaller copy. On Linux the tools are taken from PATH; on Windows and macOS they \
                  are expected under tools/<format>/<platform>/ next to the executable.",
    version,
    after_help = "EXAMPLES:\n  \
    tiny-image info output/input.png\n  \
    tiny-image compress output/input.png output/output.png\n  \
    tiny-image compress https://example.com/photo.jpg output/output.jpg -f 40"
)]
pub struct Args {
    #[arg(short = 'v', long, global = true, help = "Show debug logging")]
    pub verbose: bool,

    #[arg(short = 'q', long, global = true, help = "Only log errors")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress a PNG or JPEG image",
        long_about = "Load an image from a path or URL, run it through the format's compression \
                      tool and save the result. Missing output directories are created."
    )]
    Compress {
        #[arg(help = "Input image path or http(s) URL")]
        input: String,

        #[arg(help = "Output image file path")]
        output: PathBuf,

        #[arg(
            short = 'f',
            long,
            help = "Compression factor (1-100)",
            long_help = "PNG: pngquant quality, used as both minimum and maximum (default 50). \
                         JPEG: jpegoptim target size as a percentage of the original (default 50)."
        )]
        factor: Option<u8>,

        #[arg(
            long,
            help = "Run this compression binary instead of pngquant/jpegoptim",
            conflicts_with = "tools_dir"
        )]
        tool: Option<PathBuf>,

        #[arg(
            long,
            help = "Directory containing the bundled tools/ tree",
            long_help = "Directory containing tools/<format>/<platform>/<binary>. \
                         Defaults to the directory of this executable."
        )]
        tools_dir: Option<PathBuf>,

        #[arg(long, help = "Timeout in seconds for downloading a URL input")]
        timeout: Option<u64>,
    },

    #[command(
        about = "Display image information",
        long_about = "Show format, content type, dimensions, color mode and file size."
    )]
    Info {
        #[arg(help = "Input image path or http(s) URL")]
        input: String,

        #[arg(long, help = "Timeout in seconds for downloading a URL input")]
        timeout: Option<u64>,
    },
}
