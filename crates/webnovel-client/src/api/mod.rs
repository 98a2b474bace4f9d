//! Typed access to the content service REST API

pub mod auth;
pub mod chapters;
pub mod envelope;
pub mod novels;
pub mod settings;

pub use chapters::ChapterResponse;
pub use envelope::ApiResponse;

use std::path::{Path, PathBuf};

use bytes::Bytes;
use reqwest::{
    Method, RequestBuilder, Response, StatusCode,
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;

use crate::{
    config::{ClientConfig, RetryConfig},
    error::Error,
    store::AuthStore,
};

pub const EPUB_CONTENT_TYPE: &str = "application/epub+zip";

pub(crate) const NO_QUERY: &[(&str, &str)] = &[];

/// An EPUB returned by one of the download endpoints
#[derive(Debug, Clone)]
pub struct EpubFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl EpubFile {
    pub async fn save_to<P: AsRef<Path>>(&self, dir: P) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
    auth: AuthStore,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, auth: AuthStore) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("webnovel-manager/{}", webnovel_lib::LIB_VERSION))
            .build()
            .map_err(Error::Builder)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry,
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request built by `build`, attaching the session token. Only
    /// GET requests are retried, and only on transport failures and 5xx.
    pub(crate) async fn send<F>(&self, method: Method, path: &str, build: F) -> Result<Response, Error>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url(path);
        let retry = if method == Method::GET {
            self.retry
        } else {
            RetryConfig::none()
        };

        let mut attempt = 0;
        loop {
            let mut req = build(self.client.request(method.clone(), &url));
            if let Some(token) = self.auth.token() {
                req = req.bearer_auth(token);
            }

            debug!("{method} {url}");
            let result = match req.send().await {
                Ok(res) => self.check(res).await,
                Err(e) => Err(Error::Network(e)),
            };

            match result {
                Err(e) if e.is_retryable() && attempt < retry.max_retries => {
                    let delay = retry.backoff(attempt);
                    warn!("{method} {url} failed: {e:?}, retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn check(&self, res: Response) -> Result<Response, Error> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        if status == StatusCode::UNAUTHORIZED {
            info!("session rejected, logging out");
            self.auth.logout();
            return Err(Error::Unauthorized);
        }

        let body = res.bytes().await.unwrap_or_default();
        let err = Error::from_response(status, &body);
        debug!("{status}: {err}");
        Err(err)
    }

    pub(crate) async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let res = self.send(Method::GET, path, |req| req.query(query)).await?;
        decode(res).await
    }
}

pub(crate) async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, Error> {
    let body = res.bytes().await.map_err(Error::Network)?;
    Ok(serde_json::from_slice(&body)?)
}

pub(crate) fn is_epub(res: &Response) -> bool {
    res.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains(EPUB_CONTENT_TYPE))
}

pub(crate) async fn epub(res: Response, fallback: &str) -> Result<EpubFile, Error> {
    if !is_epub(&res) {
        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("no content type")
            .to_string();
        return Err(Error::UnexpectedContent(content_type));
    }

    let filename = res
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(disposition_filename)
        .unwrap_or_else(|| fallback.to_string());
    let bytes = res.bytes().await.map_err(Error::Network)?;

    Ok(EpubFile { filename, bytes })
}

/// Pulls the file name out of a `Content-Disposition` header, keeping only
/// the final path component
pub fn disposition_filename(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for part in header.split(';').map(str::trim) {
        if let Some(value) = part.strip_prefix("filename*=") {
            let value = value.trim_matches('"');
            // RFC 5987 `charset'lang'value`, undecodable values fall back to `filename=`
            extended = match value.split_once("''") {
                Some((_, encoded)) => urlencoding::decode(encoded)
                    .map(|name| name.into_owned())
                    .ok(),
                None => Some(value.to_string()),
            };
        } else if let Some(value) = part.strip_prefix("filename=") {
            plain = Some(value.trim_matches('"').to_string());
        }
    }

    extended
        .or(plain)
        .and_then(|name| {
            name.rsplit(['/', '\\'])
                .next()
                .map(|name| name.trim().to_string())
        })
        .filter(|name| !name.is_empty() && name != "." && name != "..")
}
