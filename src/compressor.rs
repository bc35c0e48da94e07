use crate::constants::{
    DEFAULT_JPEG_MAX_QUALITY, DEFAULT_JPEG_SIZE_PERCENT, DEFAULT_PNG_QUALITY, MAX_QUALITY,
    MIN_QUALITY,
};
use crate::error::{CompressionError, Result};
use crate::formats::ToolFormat;
use crate::platform::{bundled_tool_path, executable_dir, tool_path, Platform};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::str::FromStr;
use std::thread;
use tracing::debug;

/// Overrides for locating the compression binary.
#[derive(Debug, Clone, Default)]
pub struct ToolOptions {
    /// Run this executable instead of resolving one for the platform
    pub program: Option<PathBuf>,
    /// Root of the bundled `tools/` tree; defaults to the executable's directory
    pub tools_dir: Option<PathBuf>,
}

impl ToolOptions {
    pub fn new(program: Option<PathBuf>, tools_dir: Option<PathBuf>) -> Self {
        Self { program, tools_dir }
    }
}

/// One compression call: which tool, and the optional factor to hand it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionRequest {
    pub format: ToolFormat,
    pub factor: Option<u8>,
}

impl CompressionRequest {
    pub fn new(format: ToolFormat, factor: Option<u8>) -> Result<Self> {
        if let Some(factor) = factor {
            if !(MIN_QUALITY..=MAX_QUALITY).contains(&factor) {
                return Err(CompressionError::InvalidQuality(factor));
            }
        }
        Ok(Self { format, factor })
    }

    /// Tool arguments, excluding the program itself
    pub fn arguments(&self) -> Vec<String> {
        match self.format {
            ToolFormat::Png => {
                let quality = self.factor.unwrap_or(DEFAULT_PNG_QUALITY);
                png_arguments(quality, quality)
            }
            ToolFormat::Jpg => jpg_arguments(
                DEFAULT_JPEG_MAX_QUALITY,
                self.factor.unwrap_or(DEFAULT_JPEG_SIZE_PERCENT),
            ),
        }
    }
}

fn png_arguments(quality_min: u8, quality_max: u8) -> Vec<String> {
    vec![
        "--skip-if-larger".to_string(),
        "-v".to_string(),
        "-f".to_string(),
        format!("--quality={}-{}", quality_min, quality_max),
        "-".to_string(),
        "-o".to_string(),
        "-".to_string(),
    ]
}

fn jpg_arguments(quality: u8, size_percent: u8) -> Vec<String> {
    vec![
        format!("-m{}", quality),
        format!("-S{}%", size_percent),
        "-v".to_string(),
        "-q".to_string(),
        "--stdin".to_string(),
        "--stdout".to_string(),
    ]
}

/// Pipes an in-memory image through `pngquant` or `jpegoptim`.
///
/// # Example
/// ```no_run
/// use tiny_image::Compressor;
///
/// let data = std::fs::read("photo.jpg")?;
/// let smaller = Compressor::new(&data, "jpeg")?.execute(Some(40))?;
/// # Ok::<(), tiny_image::CompressionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Compressor<'a> {
    data: &'a [u8],
    format: ToolFormat,
    options: ToolOptions,
}

impl<'a> Compressor<'a> {
    /// `format` is matched case-insensitively against `png`, `jpeg` and `jpg`.
    pub fn new(data: &'a [u8], format: &str) -> Result<Self> {
        let format = ToolFormat::from_str(format)?;
        Ok(Self {
            data,
            format,
            options: ToolOptions::default(),
        })
    }

    pub fn with_options(mut self, options: ToolOptions) -> Self {
        self.options = options;
        self
    }

    pub fn format(&self) -> ToolFormat {
        self.format
    }

    pub fn resolve_program(&self) -> Result<PathBuf> {
        if let Some(program) = &self.options.program {
            return Ok(program.clone());
        }

        let platform = Platform::current()?;
        if let Some(dir) = &self.options.tools_dir {
            return Ok(bundled_tool_path(platform, self.format, dir));
        }

        if platform.uses_system_tools() {
            // A bare binary name, looked up on PATH
            let name = tool_path(platform, self.format, Path::new(""));
            return which::which(&name)
                .map_err(|_| CompressionError::ToolNotFound(name.display().to_string()));
        }

        Ok(tool_path(platform, self.format, &executable_dir()?))
    }

    /// Full argument vector, program first
    pub fn command_line(&self, factor: Option<u8>) -> Result<Vec<String>> {
        let request = CompressionRequest::new(self.format, factor)?;
        let program = self.resolve_program()?;

        let mut command = vec![program.to_string_lossy().into_owned()];
        command.extend(request.arguments());
        Ok(command)
    }

    /// Runs the tool and returns whatever it wrote to stdout.
    ///
    /// A non-zero exit status is the only failure signal; stderr is logged
    /// and otherwise ignored.
    pub fn execute(&self, factor: Option<u8>) -> Result<Vec<u8>> {
        let command = self.command_line(factor)?;
        let (program, args) = match command.split_first() {
            Some((program, args)) => (Path::new(program), args),
            None => {
                return Err(CompressionError::Configuration(
                    "empty compression command".to_string(),
                ))
            }
        };

        debug!("running {} on {} bytes", command.join(" "), self.data.len());
        let output = run_piped(program, args, self.data)?;

        if !output.status.success() {
            debug!(
                "{} stderr: {}",
                self.format.binary_name(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(CompressionError::ExternalTool {
                code: output.status.code(),
                command,
            });
        }

        debug!(
            "{} produced {} bytes",
            self.format.binary_name(),
            output.stdout.len()
        );
        Ok(output.stdout)
    }
}

struct ToolOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// Owns a spawned child and kills/reaps it unless `wait` completed.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn kill(&mut self) {
        let _ = self.child.kill();
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait()?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn run_piped(program: &Path, args: &[String], input: &[u8]) -> Result<ToolOutput> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                CompressionError::ToolNotFound(program.display().to_string())
            }
            _ => CompressionError::Io(e),
        })?;

    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let mut guard = ChildGuard::new(child);

    // stdin is fed on its own thread so a tool that starts writing before it
    // has read everything cannot fill the stdout pipe and stall.
    let (stdout, stderr) = thread::scope(|scope| -> io::Result<(Vec<u8>, Vec<u8>)> {
        let writer = scope.spawn(move || write_input(stdin, input));
        let stderr_reader = scope.spawn(move || read_pipe(stderr));

        let stdout = read_pipe(stdout);
        if stdout.is_err() {
            guard.kill();
        }

        let stderr = stderr_reader
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stderr reader panicked")));
        let written = writer
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));

        written?;
        Ok((stdout?, stderr?))
    })?;

    let status = guard.wait()?;
    Ok(ToolOutput {
        status,
        stdout,
        stderr,
    })
}

fn write_input(stdin: Option<ChildStdin>, input: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(input) {
        // The tool exited without consuming everything; its status decides.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn read_pipe<R: Read>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf)?;
    }
    Ok(buf)
}
