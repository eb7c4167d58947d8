// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile source backed by a PostgREST-style HTTP API.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::{debug, info, warn};

use arpent_config::model::DirectoryConfig;
use arpent_core::{ArpentError, Profile, ProfileSource};

/// Columns read for every profile.
pub const PROFILE_COLUMNS: &str =
    "id,slug,name,position,email,phone,bio,photo_url,display_order,active";

/// Reads active profiles from `{base_url}/rest/v1/{table}`.
#[derive(Debug, Clone)]
pub struct RestProfileSource {
    client: reqwest::Client,
    url: String,
}

impl RestProfileSource {
    pub fn new(base_url: &str, api_key: &str, table: &str) -> Result<Self, ArpentError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key)
                .map_err(|e| ArpentError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| ArpentError::Config(format!("invalid API key header value: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ArpentError::Directory {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            url: format!("{}/rest/v1/{table}", base_url.trim_end_matches('/')),
        })
    }

    /// Creates a source from the `[directory]` config section.
    pub fn from_config(config: &DirectoryConfig) -> Result<Self, ArpentError> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| ArpentError::Config("directory.base_url is not set".into()))?;
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| ArpentError::Config("directory.api_key is not set".into()))?;
        let source = Self::new(base_url, api_key, &config.table)?;
        info!(url = %source.url(), "profile source initialized");
        Ok(source)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self, filter: Option<(&str, &str)>) -> Result<Vec<Profile>, ArpentError> {
        let mut url = reqwest::Url::parse(&self.url).map_err(|e| {
            ArpentError::Config(format!("invalid profile store URL {}: {e}", self.url))
        })?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("select", PROFILE_COLUMNS)
                .append_pair("active", "eq.true");
            match filter {
                Some((column, value)) => {
                    query
                        .append_pair(column, &format!("eq.{value}"))
                        .append_pair("limit", "1");
                }
                None => {
                    query.append_pair("order", "display_order.asc");
                }
            }
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ArpentError::Directory {
                message: format!("request to profile store failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, filter = ?filter, "profile store response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "profile store returned an error status");
            return Err(ArpentError::Directory {
                message: format!("profile store returned {status}: {body}"),
                source: None,
            });
        }

        let body = response.text().await.map_err(|e| ArpentError::Directory {
            message: format!("failed to read profile store response: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body)
            .map_err(|e| ArpentError::Decode(format!("profile rows did not parse: {e}")))
    }
}

#[async_trait]
impl ProfileSource for RestProfileSource {
    async fn by_email(&self, email: &str) -> Result<Option<Profile>, ArpentError> {
        Ok(self.fetch(Some(("email", email))).await?.into_iter().next())
    }

    async fn by_slug(&self, slug: &str) -> Result<Option<Profile>, ArpentError> {
        Ok(self.fetch(Some(("slug", slug))).await?.into_iter().next())
    }

    async fn list_active(&self) -> Result<Vec<Profile>, ArpentError> {
        self.fetch(None).await
    }
}
