//! Byte acquisition for log URIs.
//!
//! [`LogReader`] picks a transport from the URI: `http://` / `https://` go
//! through `ehttp`, anything else is a local path on native targets. In the
//! browser every URI is fetched, relative ones against the page location.

use crate::errors::LoadError;

/// Transport used to read one URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogReader {
    /// Local filesystem path.
    #[cfg(not(target_arch = "wasm32"))]
    File,
    /// HTTP(S) fetch.
    #[cfg(feature = "http")]
    Http,
}

/// Whether `uri` names a remote resource.
#[must_use]
pub fn is_remote(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}

impl LogReader {
    /// Chooses the reader for `uri`.
    pub fn for_uri(uri: &str) -> Result<Self, LoadError> {
        #[cfg(not(target_arch = "wasm32"))]
        if !is_remote(uri) {
            return Ok(Self::File);
        }

        #[cfg(feature = "http")]
        {
            let _ = uri;
            Ok(Self::Http)
        }
        #[cfg(not(feature = "http"))]
        {
            Err(LoadError::Network(format!(
                "cannot fetch '{uri}': HTTP feature is not enabled. Enable it with `features = [\"http\"]`"
            )))
        }
    }

    /// Reads the whole resource at `uri`.
    pub async fn read_bytes(self, uri: &str) -> Result<Vec<u8>, LoadError> {
        match self {
            #[cfg(not(target_arch = "wasm32"))]
            Self::File => std::fs::read(uri).map_err(|e| LoadError::Network(format!("{uri}: {e}"))),
            #[cfg(feature = "http")]
            Self::Http => fetch(uri).await,
        }
    }
}

#[cfg(feature = "http")]
async fn fetch(uri: &str) -> Result<Vec<u8>, LoadError> {
    let response = ehttp::fetch_async(ehttp::Request::get(uri))
        .await
        .map_err(LoadError::Network)?;

    if !response.ok {
        return Err(LoadError::HttpStatus {
            status: response.status,
            status_text: response.status_text,
        });
    }
    Ok(response.bytes)
}

/// Reads `uri` with the reader [`LogReader::for_uri`] selects.
pub async fn read_bytes(uri: &str) -> Result<Vec<u8>, LoadError> {
    LogReader::for_uri(uri)?.read_bytes(uri).await
}

/// File-name part of a path or URL, used as a display label.
#[must_use]
pub fn source_filename(uri: &str) -> &str {
    let trimmed = uri.split(['?', '#']).next().unwrap_or(uri);
    if is_remote(trimmed) {
        trimmed.rsplit('/').find(|s| !s.is_empty()).unwrap_or(uri)
    } else {
        std::path::Path::new(trimmed)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_strips_query_and_directories() {
        assert_eq!(source_filename("https://host/logs/run.json?v=2"), "run.json");
        assert_eq!(source_filename("data/run.json"), "run.json");
        assert_eq!(source_filename("run.json"), "run.json");
    }

    #[test]
    fn remote_detection() {
        assert!(is_remote("https://host/run.json"));
        assert!(!is_remote("run.json"));
    }
}
