//! Sources the proxy list is loaded from.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::SourceError;

/// Somewhere a newline-delimited proxy list can be read from.
#[async_trait]
pub trait ProxySource: Send + Sync {
    /// Fetch the raw list text.
    async fn fetch_list(&self) -> Result<String, SourceError>;

    /// Human-readable location, used in log lines.
    fn location(&self) -> &str;
}

/// Proxy list served over HTTP(S).
pub struct RemoteListSource {
    client: Client,
    url: String,
}

impl RemoteListSource {
    /// Create a source downloading `url` with the given timeout.
    ///
    /// The download always goes out directly, never through a system proxy.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().no_proxy().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ProxySource for RemoteListSource {
    async fn fetch_list(&self) -> Result<String, SourceError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }
        Ok(response.text().await?)
    }

    fn location(&self) -> &str {
        &self.url
    }
}

/// Proxy list stored in a local file.
pub struct FileListSource {
    path: PathBuf,
    display: String,
}

impl FileListSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        Self { path, display }
    }
}

#[async_trait]
impl ProxySource for FileListSource {
    async fn fetch_list(&self) -> Result<String, SourceError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })
    }

    fn location(&self) -> &str {
        &self.display
    }
}

/// Pick a source for `location`: URLs are downloaded, anything else is read
/// from disk.
pub fn source_from_location(
    location: &str,
    timeout: Duration,
) -> Result<Arc<dyn ProxySource>, SourceError> {
    if location.starts_with("http") {
        Ok(Arc::new(RemoteListSource::new(location, timeout)?))
    } else {
        Ok(Arc::new(FileListSource::new(location)))
    }
}
