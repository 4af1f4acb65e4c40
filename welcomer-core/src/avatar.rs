// ABOUTME: HTTP client for fetching and normalizing member avatars
// ABOUTME: Implements timeouts, size limits, and decode-to-RGBA with a fixed square resize

use crate::constants::{fetch, timing};
use crate::error::WelcomerError;
use image::imageops::FilterType;
use image::RgbaImage;
use reqwest::Client;
use url::Url;

pub struct AvatarFetcher {
    client: Client,
    size: u32,
}

impl AvatarFetcher {
    pub fn new(size: u32) -> Result<Self, WelcomerError> {
        let client = Client::builder()
            .timeout(timing::AVATAR_REQUEST_TIMEOUT)
            .user_agent(fetch::USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(fetch::MAX_REDIRECTS))
            .build()
            .map_err(|e| WelcomerError::AvatarFetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, size })
    }

    /// Download the avatar at `url`, decode it, and stretch it to the
    /// configured square size in RGBA.
    pub async fn fetch(&self, url: &str) -> Result<RgbaImage, WelcomerError> {
        let validated_url = validate_avatar_url(url)?;

        let response = self
            .client
            .get(validated_url)
            .send()
            .await
            .map_err(|e| WelcomerError::AvatarFetch(format!("request failed for {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(WelcomerError::AvatarFetch(format!(
                "HTTP status {} for {}",
                response.status(),
                url
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > fetch::MAX_AVATAR_BYTES {
                return Err(WelcomerError::AvatarFetch(format!(
                    "avatar too large: {} bytes (max {}): {}",
                    content_length,
                    fetch::MAX_AVATAR_BYTES,
                    url
                )));
            }
        }

        let bytes = self.download_body_with_limit(response, url).await?;

        let img = image::load_from_memory(&bytes)
            .map_err(|e| WelcomerError::AvatarFetch(format!("undecodable avatar from {}: {}", url, e)))?;

        // Direct stretch to the target square; the source is square on the
        // platform anyway.
        Ok(img
            .resize_exact(self.size, self.size, FilterType::Lanczos3)
            .to_rgba8())
    }

    async fn download_body_with_limit(
        &self,
        response: reqwest::Response,
        url: &str,
    ) -> Result<Vec<u8>, WelcomerError> {
        use futures_util::StreamExt;

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                WelcomerError::AvatarFetch(format!("failed to read response body: {}", e))
            })?;

            bytes.extend_from_slice(&chunk);

            if bytes.len() as u64 > fetch::MAX_AVATAR_BYTES {
                return Err(WelcomerError::AvatarFetch(format!(
                    "avatar exceeded size limit during download: {} bytes (max {}): {}",
                    bytes.len(),
                    fetch::MAX_AVATAR_BYTES,
                    url
                )));
            }
        }

        Ok(bytes)
    }
}

fn validate_avatar_url(url: &str) -> Result<Url, WelcomerError> {
    let parsed = Url::parse(url)
        .map_err(|e| WelcomerError::AvatarFetch(format!("invalid URL '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(WelcomerError::AvatarFetch(format!(
            "unsupported URL scheme '{}': {}",
            scheme, url
        ))),
    }
}
