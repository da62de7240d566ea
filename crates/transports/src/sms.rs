//! SMS delivery via a Twilio-style REST API.
//!
//! [`SmsClient`] posts messages through the provider's account-scoped
//! `Messages` resource and polls per-message delivery status by provider
//! message id. Configuration is loaded from environment variables; if
//! `TWILIO_ACCOUNT_SID` is not set, [`SmsConfig::from_env`] returns `None`
//! and no client should be constructed.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::TransportError;

/// HTTP request timeout for a single API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default provider API base URL.
const DEFAULT_API_BASE: &str = "https://api.twilio.com";

// ---------------------------------------------------------------------------
// Phone normalization
// ---------------------------------------------------------------------------

/// Normalize a phone number toward E.164.
///
/// A bare 10-digit US number gains `+1`, an 11-digit number starting with
/// `1` gains `+`; common separators (spaces, dashes, dots, parentheses) are
/// tolerated. Anything already starting with `+`, or not recognizably a US
/// number, is passed through verbatim.
pub fn normalize_phone_number(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('+') {
        return trimmed.to_string();
    }

    let digits: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.to_string();
    }

    match digits.len() {
        10 => format!("+1{digits}"),
        11 if digits.starts_with('1') => format!("+{digits}"),
        _ => trimmed.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Delivery status vocabulary
// ---------------------------------------------------------------------------

/// Provider-reported delivery status for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsDeliveryStatus {
    Queued,
    Sending,
    Sent,
    Delivered,
    Read,
    Undelivered,
    Failed,
    Unknown,
}

impl SmsDeliveryStatus {
    /// Map the provider's status string onto the fixed vocabulary.
    ///
    /// Unrecognized values become [`Unknown`](Self::Unknown) rather than an
    /// error so a provider-side vocabulary addition cannot break polling.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "accepted" | "queued" => Self::Queued,
            "sending" => Self::Sending,
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            "read" => Self::Read,
            "undelivered" => Self::Undelivered,
            "failed" | "canceled" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// SmsConfig
// ---------------------------------------------------------------------------

/// Configuration for the SMS provider account.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    /// Provider account SID.
    pub account_sid: String,
    /// API auth token for the account.
    pub auth_token: String,
    /// E.164 sender number messages are dispatched from.
    pub from_number: String,
    /// API base URL (overridable for tests).
    pub api_base: String,
}

impl SmsConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `TWILIO_ACCOUNT_SID` is not set, signalling that
    /// SMS delivery is not configured and should be skipped.
    ///
    /// | Variable             | Required | Default                  |
    /// |----------------------|----------|--------------------------|
    /// | `TWILIO_ACCOUNT_SID` | yes      | —                        |
    /// | `TWILIO_AUTH_TOKEN`  | yes      | —                        |
    /// | `TWILIO_FROM_NUMBER` | yes      | —                        |
    /// | `TWILIO_API_BASE`    | no       | `https://api.twilio.com` |
    pub fn from_env() -> Option<Self> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID").ok()?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN").ok()?;
        let from_number = std::env::var("TWILIO_FROM_NUMBER").ok()?;
        Some(Self {
            account_sid,
            auth_token,
            from_number,
            api_base: std::env::var("TWILIO_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// SmsTransport trait
// ---------------------------------------------------------------------------

/// Object-safe seam over the SMS provider, implemented by [`SmsClient`] and
/// by fakes in orchestrator tests.
#[async_trait]
pub trait SmsTransport: Send + Sync {
    /// Send one message, returning the provider message id.
    async fn send_message(
        &self,
        to: &str,
        body: &str,
        media_url: Option<&str>,
    ) -> Result<String, TransportError>;

    /// Poll current delivery status for a previously-sent message.
    async fn message_status(
        &self,
        provider_message_id: &str,
    ) -> Result<SmsDeliveryStatus, TransportError>;
}

// ---------------------------------------------------------------------------
// SmsClient
// ---------------------------------------------------------------------------

/// Message resource fields we read back from the provider.
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

/// Error body shape returned by the provider on non-success responses.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// REST client for the SMS provider.
pub struct SmsClient {
    config: SmsConfig,
    client: reqwest::Client,
}

impl SmsClient {
    /// Create a new client with a pre-configured HTTP client.
    pub fn new(config: SmsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base, self.config.account_sid
        )
    }

    fn message_url(&self, sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages/{sid}.json",
            self.config.api_base, self.config.account_sid
        )
    }

    async fn read_error(response: reqwest::Response) -> TransportError {
        let status = response.status().as_u16();
        let body: ApiErrorBody = response.json().await.unwrap_or_default();
        TransportError::Api {
            service: "SMS provider",
            status,
            message: body.message,
        }
    }
}

#[async_trait]
impl SmsTransport for SmsClient {
    async fn send_message(
        &self,
        to: &str,
        body: &str,
        media_url: Option<&str>,
    ) -> Result<String, TransportError> {
        let to = normalize_phone_number(to);
        if to.is_empty() {
            return Err(TransportError::InvalidInput(
                "phone number is empty".to_string(),
            ));
        }

        let mut form = vec![
            ("To", to.clone()),
            ("From", self.config.from_number.clone()),
            ("Body", body.to_string()),
        ];
        if let Some(url) = media_url {
            form.push(("MediaUrl", url.to_string()));
        }

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        let resource: MessageResource = response.json().await?;
        tracing::info!(to = %to, sid = %resource.sid, "SMS dispatched");
        Ok(resource.sid)
    }

    async fn message_status(
        &self,
        provider_message_id: &str,
    ) -> Result<SmsDeliveryStatus, TransportError> {
        let response = self
            .client
            .get(self.message_url(provider_message_id))
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }

        let resource: MessageResource = response.json().await?;
        Ok(resource
            .status
            .as_deref()
            .map(SmsDeliveryStatus::from_provider)
            .unwrap_or(SmsDeliveryStatus::Unknown))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
