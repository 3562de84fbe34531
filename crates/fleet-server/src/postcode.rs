//! Postcode validation for new branches.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::PostcodeConfig;
use crate::error::{ServerError, ServerResult};

/// Outcome of a successful postcode lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostcodeCheck {
    Valid,
    Invalid,
}

/// Decides whether a postcode is real before a branch is stored.
///
/// An `Err` means the answer could not be obtained at all; a postcode that
/// was looked up and found wanting is `Ok(PostcodeCheck::Invalid)`.
#[async_trait]
pub trait PostcodeValidator: Send + Sync {
    async fn check(&self, postcode: &str) -> ServerResult<PostcodeCheck>;
}

/// Accepts every postcode without a lookup.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAllPostcodes;

#[async_trait]
impl PostcodeValidator for AcceptAllPostcodes {
    async fn check(&self, _postcode: &str) -> ServerResult<PostcodeCheck> {
        Ok(PostcodeCheck::Valid)
    }
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    status: u16,
    result: Option<bool>,
}

/// Validator backed by the postcodes.io `validate` endpoint.
#[derive(Clone, Debug)]
pub struct PostcodesIoValidator {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl PostcodesIoValidator {
    pub fn new(config: &PostcodeConfig) -> ServerResult<Self> {
        let base_url = reqwest::Url::parse(&config.base_url)
            .map_err(|e| ServerError::Config(format!("postcode.base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ServerError::Config(format!(
                "postcode.base_url: {base_url} cannot be a base URL"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServerError::Config(format!("postcode client: {e}")))?;
        Ok(Self { client, base_url })
    }

    fn validate_url(&self, postcode: &str) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["postcodes", postcode, "validate"]);
        }
        url
    }
}

#[async_trait]
impl PostcodeValidator for PostcodesIoValidator {
    async fn check(&self, postcode: &str) -> ServerResult<PostcodeCheck> {
        let url = self.validate_url(postcode.trim());
        tracing::debug!(%url, "validating postcode");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ServerError::PostcodeServiceUnavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ServerError::PostcodeServiceUnavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }
        let body: ValidateResponse = response
            .json()
            .await
            .map_err(|e| ServerError::PostcodeServiceUnavailable(e.to_string()))?;

        match (body.status, body.result) {
            (200, Some(true)) => Ok(PostcodeCheck::Valid),
            (200, Some(false)) => Ok(PostcodeCheck::Invalid),
            (status, result) => Err(ServerError::PostcodeServiceUnavailable(format!(
                "unexpected reply: status {status}, result {result:?}"
            ))),
        }
    }
}
