//! Network lookup of channel metadata.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::channel::error::LookupError;
use crate::channel::parser::parse_channel_page;
use crate::config::LookupConfig;
use crate::feeds::ChannelInfo;

/// Resolves a source URL into channel metadata.
#[async_trait]
pub trait ChannelLookup: Send + Sync {
    async fn lookup(&self, source_url: &str) -> Result<ChannelInfo, LookupError>;
}

/// `ChannelLookup` that fetches the channel page over HTTP.
#[derive(Debug, Clone)]
pub struct HttpChannelLookup {
    client: reqwest::Client,
}

impl HttpChannelLookup {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChannelLookup for HttpChannelLookup {
    async fn lookup(&self, source_url: &str) -> Result<ChannelInfo, LookupError> {
        let url = validated_url(source_url)?;
        tracing::debug!(url = %url, "Fetching channel page");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_channel_page(&body)
    }
}

fn validated_url(raw: &str) -> Result<url::Url, LookupError> {
    url::Url::parse(raw.trim())
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .ok_or_else(|| LookupError::InvalidUrl(raw.to_string()))
}
