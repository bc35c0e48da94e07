use crate::error::{CompressionError, Result};
use std::thread;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl FetchOptions {
    pub fn new(timeout_secs: Option<u64>) -> Self {
        Self {
            timeout: timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Returns true if `input` looks like something `fetch_url_sync` can download
pub fn is_url(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Downloads `url` with a single GET and returns the full response body
///
/// # Arguments
/// * `url` - Address of the image
/// * `options` - Request options
///
/// # Returns
/// * `Ok(bytes)` - The response body
/// * `Err(CompressionError::Http)` - Connection failure, timeout or non-2xx status
pub async fn fetch_url_async(url: &str, options: &FetchOptions) -> Result<Vec<u8>> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build()?;

    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.bytes().await?;

    debug!("fetched {} bytes from {}", body.len(), url);
    Ok(body.to_vec())
}

/// Blocking wrapper around [`fetch_url_async`].
///
/// Safe to call from inside a tokio runtime: the request then runs on a
/// separate thread with its own runtime, since `block_on` panics on a thread
/// that is already driving one.
pub fn fetch_url_sync(url: &str, options: &FetchOptions) -> Result<Vec<u8>> {
    if tokio::runtime::Handle::try_current().is_err() {
        return block_on_fetch(url, options);
    }

    debug!("fetching {} from a helper thread", url);
    thread::scope(|scope| {
        scope
            .spawn(|| block_on_fetch(url, options))
            .join()
            .unwrap_or_else(|_| {
                Err(CompressionError::Configuration(format!(
                    "fetch thread for {} panicked",
                    url
                )))
            })
    })
}

fn block_on_fetch(url: &str, options: &FetchOptions) -> Result<Vec<u8>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CompressionError::Io)?;

    runtime.block_on(fetch_url_async(url, options))
}
