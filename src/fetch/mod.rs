// src/fetch/mod.rs

use anyhow::Result;
use async_trait::async_trait;

pub use files::FileProvider;
pub use http::HttpProvider;

/// Source of raw CSV text, addressed by a relative resource path such as
/// `data/dscr_data.csv`.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    async fn fetch_text(&self, path: &str) -> Result<String>;
}

/// Picks a provider for `source`: `http(s)://` prefixes go over the network,
/// anything else is treated as a local directory.
pub fn provider_for(source: &str) -> Result<Box<dyn ResourceProvider>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(Box::new(HttpProvider::new(source)?))
    } else {
        Ok(Box::new(FileProvider::new(source)))
    }
}

/// Reads resources relative to a base directory.
pub mod files {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;
    use tracing::debug;

    pub struct FileProvider {
        base_dir: PathBuf,
    }

    impl FileProvider {
        pub fn new(base_dir: impl Into<PathBuf>) -> Self {
            Self {
                base_dir: base_dir.into(),
            }
        }
    }

    #[async_trait]
    impl ResourceProvider for FileProvider {
        async fn fetch_text(&self, path: &str) -> Result<String> {
            let full = self.base_dir.join(path);
            debug!(path = %full.display(), "reading resource");
            tokio::fs::read_to_string(&full)
                .await
                .with_context(|| format!("reading {}", full.display()))
        }
    }
}

/// Fetches resources relative to a base URL.
pub mod http {
    use super::*;
    use anyhow::Context;
    use reqwest::Client;
    use tracing::debug;
    use url::Url;

    pub struct HttpProvider {
        client: Client,
        base: Url,
    }

    impl HttpProvider {
        pub fn new(base: &str) -> Result<Self> {
            Self::with_client(Client::new(), base)
        }

        pub fn with_client(client: Client, base: &str) -> Result<Self> {
            // a base without a trailing slash would have its last segment
            // replaced by `Url::join`
            let normalized = if base.ends_with('/') {
                base.to_string()
            } else {
                format!("{}/", base)
            };
            let base =
                Url::parse(&normalized).with_context(|| format!("parsing base URL {}", base))?;
            Ok(Self { client, base })
        }

        pub fn resolve(&self, path: &str) -> Result<Url> {
            self.base
                .join(path)
                .with_context(|| format!("joining {} onto {}", path, self.base))
        }
    }

    #[async_trait]
    impl ResourceProvider for HttpProvider {
        async fn fetch_text(&self, path: &str) -> Result<String> {
            let url = self.resolve(path)?;
            debug!(%url, "fetching resource");
            self.client
                .get(url.clone())
                .send()
                .await
                .with_context(|| format!("GET {} failed", url))?
                .error_for_status()
                .with_context(|| format!("Non-success status {}", url))?
                .text()
                .await
                .with_context(|| format!("Reading text from {}", url))
        }
    }
}
