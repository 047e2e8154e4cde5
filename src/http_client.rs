use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::config::ImportConfig;

pub const PREFER: &str = "prefer";
pub const APIKEY: &str = "apikey";
pub const RETURN_REPRESENTATION: &str = "return=representation";

pub fn http_client(cfg: &ImportConfig) -> Result<Client> {
    Client::builder()
        .timeout(cfg.timeout)
        .default_headers(default_headers(&cfg.api_key)?)
        .build()
        .context("failed to build http client")
}

pub fn default_headers(api_key: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut key = HeaderValue::from_str(api_key).context("api key is not a valid header value")?;
    key.set_sensitive(true);
    headers.insert(APIKEY, key);

    let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
        .context("api key is not a valid header value")?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);

    headers.insert(PREFER, HeaderValue::from_static(RETURN_REPRESENTATION));
    Ok(headers)
}
