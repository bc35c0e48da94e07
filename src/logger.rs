use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for the given verbosity flags.
/// `quiet` wins over `verbose`.
pub fn default_directive(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "tiny_image=error"
    } else if verbose {
        "tiny_image=debug"
    } else {
        "tiny_image=warn"
    }
}

/// Installs the global subscriber, writing to stderr. `RUST_LOG` overrides
/// the flags.
pub fn init(quiet: bool, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet, verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
