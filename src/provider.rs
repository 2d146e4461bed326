//! Host implementations of the provider traits.

use anyhow::{Context, Result};
use bytes::Bytes;
use http::{Request, Response};
use realtime::{Config, HttpRequest};

use crate::config;

/// Outbound HTTP over `reqwest`, configuration from the environment.
#[derive(Debug, Clone, Default)]
pub struct Provider {
    client: reqwest::Client,
}

impl Provider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpRequest for Provider {
    async fn fetch(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let request = reqwest::Request::try_from(request).context("converting request")?;
        let url = request.url().clone();

        // the query string carries the api key: keep it out of error chains
        let response =
            self.client.execute(request).await.map_err(reqwest::Error::without_url).with_context(
                || format!("sending request to {}{}", url.origin().ascii_serialization(), url.path()),
            )?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)
            .context("reading response body")?;

        let mut reply = Response::new(body);
        *reply.status_mut() = status;
        *reply.headers_mut() = headers;
        Ok(reply)
    }
}

impl Config for Provider {
    async fn get(&self, key: &str) -> Result<String> {
        config::get(key)
    }
}
