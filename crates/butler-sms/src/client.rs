// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Twilio Messages API.
//!
//! Provides [`TwilioClient`] which handles basic authentication, pagination
//! of the message list, and a single retry on transient errors for the
//! account check. Message listing never retries: a failed fetch ends the
//! poll loop.

use std::time::Duration;

use butler_core::ButlerError;
use chrono::NaiveDate;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ApiMessage, MessagePage, SendResponse};

/// API version segment used in every resource path.
const API_VERSION: &str = "2010-04-01";

/// Upper bound on pages followed for one listing.
const MAX_PAGES: usize = 50;

/// Retries allowed for the account check run by `butler doctor`.
const ACCOUNT_CHECK_RETRIES: u32 = 1;

/// HTTP client for Twilio REST calls.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    client: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: SecretString,
}

impl TwilioClient {
    /// Creates a client for one account.
    pub fn new(
        base_url: &str,
        account_sid: String,
        auth_token: SecretString,
        timeout: Duration,
    ) -> Result<Self, ButlerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ButlerError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            account_sid,
            auth_token,
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{API_VERSION}/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }

    /// Lists every message sent on `day`, following `next_page_uri` links.
    pub async fn list_messages(&self, day: NaiveDate) -> Result<Vec<ApiMessage>, ButlerError> {
        let query = serde_urlencoded::to_string([("DateSent", day.format("%Y-%m-%d").to_string())])
            .map_err(|e| ButlerError::Internal(format!("failed to encode query: {e}")))?;
        let mut url = format!("{}?{query}", self.messages_url());
        let mut messages = Vec::new();

        for page_no in 0..MAX_PAGES {
            let body = self.get_with_retry(&url, 0).await?;
            let page: MessagePage =
                serde_json::from_str(&body).map_err(|e| ButlerError::Transport {
                    message: format!("failed to parse message list: {e}"),
                    source: Some(Box::new(e)),
                })?;
            debug!(page = page_no, count = page.messages.len(), "message page received");
            messages.extend(page.messages);

            match page.next_page_uri {
                Some(next) if !next.is_empty() => url = format!("{}{next}", self.base_url),
                _ => return Ok(messages),
            }
        }

        warn!(max = MAX_PAGES, "message listing truncated at page limit");
        Ok(messages)
    }

    /// Sends one SMS and returns the new message SID.
    pub async fn send_message(
        &self,
        to: &str,
        from: &str,
        body: &str,
    ) -> Result<SendResponse, ButlerError> {
        let form = serde_urlencoded::to_string([("To", to), ("From", from), ("Body", body)])
            .map_err(|e| ButlerError::Internal(format!("failed to encode form: {e}")))?;

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .body(form)
            .send()
            .await
            .map_err(|e| ButlerError::Transport {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        debug!(status = %status, "send response received");
        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| ButlerError::Transport {
            message: format!("failed to parse send response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Fetches the account resource. Used as a credential check.
    pub async fn fetch_account(&self) -> Result<(), ButlerError> {
        let url = format!(
            "{}/{API_VERSION}/Accounts/{}.json",
            self.base_url, self.account_sid
        );
        self.get_with_retry(&url, ACCOUNT_CHECK_RETRIES)
            .await
            .map(|_| ())
    }

    /// GETs a URL, retrying up to `max_retries` times on 429/500/503.
    async fn get_with_retry(&self, url: &str, max_retries: u32) -> Result<String, ButlerError> {
        let mut last_error = None;

        for attempt in 0..=max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying Twilio request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .get(url)
                .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
                .send()
                .await
                .map_err(|e| ButlerError::Transport {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            if status.is_success() {
                return response.text().await.map_err(|e| ButlerError::Transport {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < max_retries {
                warn!(status = %status, "transient error, will retry");
                last_error = Some(api_error(status, &body));
                continue;
            }
            return Err(api_error(status, &body));
        }

        Err(last_error.unwrap_or_else(|| ButlerError::Transport {
            message: "request failed after retries".into(),
            source: None,
        }))
    }
}

fn api_error(status: reqwest::StatusCode, body: &str) -> ButlerError {
    let message = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(err) => match err.code {
            Some(code) => format!("Twilio API error {code} ({status}): {}", err.message),
            None => format!("Twilio API error ({status}): {}", err.message),
        },
        Err(_) => format!("API returned {status}: {body}"),
    };
    ButlerError::Transport {
        message,
        source: None,
    }
}

/// Returns true for HTTP status codes worth one retry.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
