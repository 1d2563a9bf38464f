use std::fmt;
use std::path::PathBuf;

use anyhow::{Result, anyhow};

/// A user-supplied asset location: a filesystem path or an http(s) URL.
/// Hashable so it can key in-flight fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    File(PathBuf),
    Url(String),
}

impl Location {
    /// `http://` and `https://` are URLs, anything else is a filesystem path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    /// Fetch the raw bytes. Blocking; call from a worker thread.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::File(path) => std::fs::read(path)
                .map_err(|e| anyhow!("Failed to read {}: {e}", path.display())),
            Self::Url(url) => {
                let resp = reqwest::blocking::get(url)
                    .map_err(|e| anyhow!("Request failed for {url}: {e}"))?;
                if !resp.status().is_success() {
                    return Err(anyhow!("Fetch failed {url}: {}", resp.status()));
                }
                let bytes = resp
                    .bytes()
                    .map_err(|e| anyhow!("Failed to read body from {url}: {e}"))?;
                Ok(bytes.to_vec())
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}
