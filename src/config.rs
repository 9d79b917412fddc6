// Configuration module: everything either tool reads from the
// environment lives here, so neither binary ever carries a hardcoded
// credential or endpoint.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout applied to every HTTP request. Without one, a stalled
/// connection would hang the tool indefinitely.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory both tools operate on unless `POSTS_DIR` overrides it.
pub const DEFAULT_POSTS_DIR: &str = "facebook-posts";

/// Configuration for the image-generation tool.
#[derive(Debug, Clone)]
pub struct ImageGenConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub output_dir: PathBuf,
    pub timeout: Duration,
}

impl ImageGenConfig {
    /// Build the config from the environment. The API key comes from
    /// `OPENROUTER_API_KEY`, falling back to `~/.openrouter_key`; a
    /// missing key is fatal before any request is made.
    pub fn from_env() -> Result<Self> {
        Ok(ImageGenConfig {
            api_key: load_key("OPENROUTER_API_KEY", ".openrouter_key")?,
            base_url: env_or("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1"),
            model: env_or("IMAGE_MODEL", "google/gemini-2.5-flash-image"),
            output_dir: PathBuf::from(env_or("POSTS_DIR", DEFAULT_POSTS_DIR)),
            timeout: request_timeout(),
        })
    }
}

/// Configuration for the post-scheduling tool.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub api_key: String,
    pub base_url: String,
    /// Public URL prefix under which the generated images are hosted.
    /// The scheduling service fetches media from here, so it must be
    /// reachable from the outside.
    pub media_base_url: String,
    pub posts_dir: PathBuf,
    /// Named cadence passed to the service's auto-schedule feature.
    pub cadence: String,
    pub timeout: Duration,
}

impl SchedulerConfig {
    /// Build the config from the environment. `AYRSHARE_API_KEY` (or
    /// `~/.ayrshare_key`) and `MEDIA_BASE_URL` are required; both are
    /// checked before any file is touched.
    pub fn from_env() -> Result<Self> {
        Ok(SchedulerConfig {
            api_key: load_key("AYRSHARE_API_KEY", ".ayrshare_key")?,
            base_url: env_or("AYRSHARE_BASE_URL", "https://api.ayrshare.com/api"),
            media_base_url: std::env::var("MEDIA_BASE_URL").context(
                "MEDIA_BASE_URL is not set; point it at the public URL prefix \
                 where the generated images are hosted",
            )?,
            posts_dir: PathBuf::from(env_or("POSTS_DIR", DEFAULT_POSTS_DIR)),
            cadence: env_or("SCHEDULE_CADENCE", "every_other_day"),
            timeout: request_timeout(),
        })
    }
}

/// Read an API key from the named environment variable, falling back to
/// a single-line file in the user's home directory (so a key can be
/// reused across runs without exporting it each time).
fn load_key(var: &str, fallback_file: &str) -> Result<String> {
    if let Ok(val) = std::env::var(var) {
        let val = val.trim();
        if !val.is_empty() {
            return Ok(val.to_string());
        }
    }
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(fallback_file);
    if let Ok(data) = std::fs::read_to_string(&path) {
        let key = data.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }
    anyhow::bail!("{} is not set and {} does not contain a key", var, path.display())
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.into())
}

fn request_timeout() -> Duration {
    std::env::var("REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}
