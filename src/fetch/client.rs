//! Photo search client and downloader.

use std::path::{Path, PathBuf};

use reqwest::{header::AUTHORIZATION, Client};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use crate::error::{FetchError, Result};
use crate::fetch::types::{ImageRecord, SearchQuery, SearchResponse};

/// Write buffer used while streaming image bodies to disk
pub const DOWNLOAD_CHUNK_SIZE: usize = 8192;

/// Default Pexels API root
pub const DEFAULT_API_BASE: &str = "https://api.pexels.com/v1";

/// Outcome of one fetch call
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Photos listed by the API for this page
    pub listed: usize,

    /// Files written, in download order
    pub downloaded: Vec<PathBuf>,

    /// Photos skipped for lack of an original URL
    pub skipped: usize,
}

/// Searches the photo API and downloads original-resolution images
pub struct PhotoFetcher {
    http: Client,
    api_key: String,
    api_base: String,
}

impl PhotoFetcher {
    pub fn new<K: Into<String>>(api_key: K) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_API_BASE)
    }

    /// Point the fetcher at a different API root (mirrors, local mocks)
    pub fn with_base_url<K: Into<String>, B: Into<String>>(api_key: K, api_base: B) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FetchError::MissingApiKey.into());
        }

        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self {
            http,
            api_key,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self) -> Result<url::Url> {
        let raw = format!("{}/search", self.api_base);
        url::Url::parse(&raw).map_err(|_| FetchError::InvalidEndpoint { url: raw }.into())
    }

    /// Request one page of search results
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let url = self.search_url()?;
        debug!("GET {} query={:?} per_page={} page={}", url, query.query, query.per_page, query.page);

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.api_key.as_str())
            .query(&query.params())
            .send()
            .await
            .map_err(FetchError::Network)?
            .error_for_status()
            .map_err(FetchError::Network)?;

        let body: SearchResponse = response.json().await.map_err(FetchError::Network)?;
        Ok(body)
    }

    /// Search, then download every listed image into `save_dir`.
    ///
    /// Runs strictly in order. The first network failure aborts the call;
    /// files already written stay on disk.
    pub async fn fetch<P: AsRef<Path>>(&self, query: &SearchQuery, save_dir: P) -> Result<FetchReport> {
        let save_dir = save_dir.as_ref();
        tokio::fs::create_dir_all(save_dir).await?;

        let response = self.search(query).await?;
        let mut report = FetchReport {
            listed: response.photos.len(),
            ..FetchReport::default()
        };

        if response.photos.is_empty() {
            info!("No photos found for the given query.");
            return Ok(report);
        }

        debug!(
            "{} photos on page {} ({} total results)",
            response.photos.len(),
            query.page,
            response.total_results.unwrap_or_default()
        );

        for photo in &response.photos {
            let Some(record) = ImageRecord::from_photo(photo) else {
                debug!("Photo {} has no original URL, skipping", photo.id);
                report.skipped += 1;
                continue;
            };

            debug!("Photo {}", photo.describe());
            let path = self.download(&record, save_dir).await?;
            info!("Downloaded: {}", record.file_name());
            report.downloaded.push(path);
        }

        Ok(report)
    }

    /// Stream one image to `{save_dir}/{id}.{ext}`
    pub async fn download(&self, record: &ImageRecord, save_dir: &Path) -> Result<PathBuf> {
        let mut response = self
            .http
            .get(&record.url)
            .send()
            .await
            .map_err(FetchError::Network)?
            .error_for_status()
            .map_err(FetchError::Network)?;

        let path = save_dir.join(record.file_name());
        let write_failed = |e: std::io::Error| FetchError::WriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let file = File::create(&path).await.map_err(write_failed)?;
        let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);

        while let Some(chunk) = response.chunk().await.map_err(FetchError::Network)? {
            writer.write_all(&chunk).await.map_err(write_failed)?;
        }
        writer.flush().await.map_err(write_failed)?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn photo(server: &MockServer, id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "photographer": "Tester",
            "src": { "original": format!("{}/photos/{id}/pexels-photo-{id}.jpeg", server.uri()) }
        })
    }

    async fn mount_search(server: &MockServer, photos: Vec<serde_json::Value>) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(header("Authorization", "test-key"))
            .and(query_param("query", "nature"))
            .and(query_param("per_page", "10"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "per_page": 10,
                "total_results": photos.len(),
                "photos": photos,
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_image(server: &MockServer, id: u64, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/photos/{id}/pexels-photo-{id}.jpeg")))
            .respond_with(ResponseTemplate::new(status).set_body_bytes(format!("image-{id}").into_bytes()))
            .mount(server)
            .await;
    }

    fn fetcher(server: &MockServer) -> PhotoFetcher {
        PhotoFetcher::with_base_url("test-key", format!("{}/v1", server.uri())).unwrap()
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        assert!(matches!(
            PhotoFetcher::new("  "),
            Err(crate::error::ReelError::Fetch(FetchError::MissingApiKey))
        ));
    }

    #[tokio::test]
    async fn test_downloads_one_file_per_photo() {
        let server = MockServer::start().await;
        let photos = vec![photo(&server, 11), photo(&server, 12), json!({ "id": 13, "src": {} })];
        mount_search(&server, photos).await;
        mount_image(&server, 11, 200).await;
        mount_image(&server, 12, 200).await;

        let dir = tempdir().unwrap();
        let save_dir = dir.path().join("images");
        let report = fetcher(&server)
            .fetch(&SearchQuery::new("nature", 10, 1), &save_dir)
            .await
            .unwrap();

        assert_eq!(report.listed, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.downloaded, vec![save_dir.join("11.jpeg"), save_dir.join("12.jpeg")]);
        assert_eq!(listing(&save_dir), vec!["11.jpeg", "12.jpeg"]);
        assert_eq!(std::fs::read(save_dir.join("12.jpeg")).unwrap(), b"image-12");
    }

    #[tokio::test]
    async fn test_empty_results_are_not_an_error() {
        let server = MockServer::start().await;
        mount_search(&server, vec![]).await;

        let dir = tempdir().unwrap();
        let report = fetcher(&server)
            .fetch(&SearchQuery::new("nature", 10, 1), dir.path())
            .await
            .unwrap();

        assert_eq!(report.listed, 0);
        assert!(report.downloaded.is_empty());
        assert!(listing(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_failure_mid_batch_keeps_earlier_files() {
        let server = MockServer::start().await;
        let photos = (1..=10).map(|id| photo(&server, id)).collect();
        mount_search(&server, photos).await;
        mount_image(&server, 1, 200).await;
        mount_image(&server, 2, 200).await;
        mount_image(&server, 3, 500).await;
        for id in 4..=10 {
            mount_image(&server, id, 200).await;
        }

        let dir = tempdir().unwrap();
        let result = fetcher(&server)
            .fetch(&SearchQuery::new("nature", 10, 1), dir.path())
            .await;

        assert!(matches!(result, Err(crate::error::ReelError::Fetch(FetchError::Network(_)))));
        assert_eq!(listing(dir.path()), vec!["1.jpeg", "2.jpeg"]);
    }

    #[tokio::test]
    async fn test_bad_status_on_search_aborts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let err = fetcher(&server)
            .fetch(&SearchQuery::new("nature", 10, 1), dir.path())
            .await
            .unwrap_err();

        assert!(err.user_message().contains("401"));
        assert!(listing(dir.path()).is_empty());
    }
}
