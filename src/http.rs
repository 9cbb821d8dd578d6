use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{CoreError, CoreResult};

/// Build the outbound client shared by the catalog and favorites clients.
pub fn build_client(timeout: Duration) -> Client {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Join a base URL and a relative path without doubling slashes.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Append escaped path segments to a base URL.
pub fn url_with_segments(base: &str, segments: &[&str]) -> CoreResult<String> {
    let mut url = reqwest::Url::parse(base)
        .map_err(|e| CoreError::Validation(format!("bad base url {base:?}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| CoreError::Validation(format!("base url {base:?} cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(String::from(url))
}

pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> CoreResult<T> {
    let response = client.get(url).query(query).send().await?;
    let response = ensure_success(response)?;
    let body = response.json::<T>().await?;
    debug!(%url, "GET ok");
    Ok(body)
}

pub(crate) fn ensure_success(response: Response) -> CoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CoreError::Transport(format!(
            "{} returned {}",
            response.url(),
            status
        )))
    }
}
