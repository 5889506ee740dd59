use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::fetcher::charset::decode_body;
use crate::fetcher::errors::FetchError;
use crate::page::{PageError, PageSnapshot, PageSource};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const USER_AGENT: &str = concat!("leetmark/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub struct FetchedPage {
    pub url_final: Url,
    pub status: StatusCode,
    pub encoding: &'static encoding_rs::Encoding,
    pub body_utf8: String,
    pub fetched_at: DateTime<Utc>,
}

pub fn build_client() -> Result<Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );

    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .default_headers(headers)
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(client: &Client, url: &Url) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    if let Some(content_length) = response.content_length()
        && content_length > MAX_BODY_SIZE
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let url_final = response.url().clone();
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http {
            status,
            retriable: status.is_server_error(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();
    if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
        return Err(FetchError::UnsupportedContentType(content_type));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::Io(e.to_string()))?;
    // Content-Length may be missing or wrong.
    if body.len() as u64 > MAX_BODY_SIZE {
        return Err(FetchError::BodyTooLarge(body.len() as u64));
    }

    let (body_utf8, encoding) = decode_body(&content_type, &body)?;
    debug!(
        status = status.as_u16(),
        encoding = encoding.name(),
        bytes = body.len(),
        "fetched page"
    );

    Ok(FetchedPage {
        url_final,
        status,
        encoding,
        body_utf8,
        fetched_at: Utc::now(),
    })
}

/// A problem page read over HTTP. Server-rendered markup only, so most
/// fields come from the slug fallbacks unless the site pre-renders.
pub struct HttpPage {
    client: Client,
    url: Url,
}

impl HttpPage {
    pub fn new(url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client()?,
            url: Url::parse(url)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl PageSource for HttpPage {
    async fn snapshot(&self) -> Result<PageSnapshot, PageError> {
        let page = fetch(&self.client, &self.url).await?;
        Ok(PageSnapshot {
            url: page.url_final,
            html: page.body_utf8,
            captured_at: page.fetched_at,
        })
    }
}
