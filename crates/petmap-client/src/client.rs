//! HTTP client for the facility finder REST API.
//!
//! Wraps `reqwest` with bearer-token handling, backend error envelopes and
//! lenient facility list decoding. Authorized endpoints fail fast with
//! [`ClientError::NotAuthenticated`] when no token is held, and a 401/403
//! from the backend drops the stored token.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use petmap_core::{AppConfig, District, Facility, FacilityId};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::types::{
    Credentials, ErrorBody, FilterRequest, MessageResponse, NicknameUpdate, PasswordUpdate,
    Profile, SearchRequest, TokenResponse, UploadResponse,
};

/// Longest backend error text carried into [`ClientError::Status`].
const MAX_ERROR_MESSAGE_CHARS: usize = 200;

/// Client for the facility finder REST API.
///
/// Use [`ApiClient::new`] with the backend origin (or a wiremock server URI
/// in tests). The bearer token lives behind a mutex so a shared client can
/// discard it when the backend rejects it.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Mutex<Option<String>>,
}

impl ApiClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join("api/...")` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            token: Mutex::new(None),
        })
    }

    /// Creates a client from application config, adopting `PETMAP_TOKEN` if set.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let client = Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        if let Some(token) = &config.api_token {
            client.set_token(token.clone());
        }
        Ok(client)
    }

    pub fn set_token(&self, token: String) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear_token(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lists every district. Fetched once per session.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Status`] on a non-2xx response.
    /// - [`ClientError::Deserialize`] if the body is not a district list.
    pub async fn districts(&self) -> Result<Vec<District>, ClientError> {
        let url = self.endpoint("api/districts")?;
        let request = self.client.get(url.clone());
        self.send_json(request, &url, false).await
    }

    /// Free-text search ranked around `request.lat`/`request.lon`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::districts`]; records that fail to decode are
    /// skipped rather than failing the call.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<Facility>, ClientError> {
        let url = self.endpoint("api/search")?;
        let builder = self.client.post(url.clone()).json(request);
        let body: serde_json::Value = self.send_json(builder, &url, false).await?;
        parse_facility_list(body, &url)
    }

    /// Facilities for a district key and expanded backend categories.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::search`].
    pub async fn filter(&self, request: &FilterRequest) -> Result<Vec<Facility>, ClientError> {
        let url = self.endpoint("api/filter")?;
        let builder = self.client.post(url.clone()).json(request);
        let body: serde_json::Value = self.send_json(builder, &url, false).await?;
        parse_facility_list(body, &url)
    }

    /// Full record for the detail view.
    ///
    /// # Errors
    ///
    /// [`ClientError::Status`] with 404 when the id is unknown, otherwise as
    /// [`ApiClient::districts`].
    pub async fn facility(&self, id: &FacilityId) -> Result<Facility, ClientError> {
        let mut url = self.endpoint("api/facilities")?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .push(id.as_str());
        let request = self.client.get(url.clone());
        self.send_json(request, &url, false).await
    }

    /// Exchanges credentials for a bearer token and keeps it for later calls.
    ///
    /// # Errors
    ///
    /// [`ClientError::Status`] with 401 on wrong credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let url = self.endpoint("api/login")?;
        let builder = self
            .client
            .post(url.clone())
            .json(&Credentials { username, password });
        let response: TokenResponse = self.send_json(builder, &url, false).await?;
        self.set_token(response.access_token.clone());
        tracing::info!(username, "logged in");
        Ok(response.access_token)
    }

    /// Creates an account. Returns the backend's confirmation message.
    ///
    /// # Errors
    ///
    /// [`ClientError::Status`] with 409 when the username is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let url = self.endpoint("api/register")?;
        let builder = self
            .client
            .post(url.clone())
            .json(&Credentials { username, password });
        let response: MessageResponse = self.send_json(builder, &url, false).await?;
        Ok(response
            .message
            .unwrap_or_else(|| "registered".to_string()))
    }

    /// # Errors
    ///
    /// [`ClientError::NotAuthenticated`] without a token,
    /// [`ClientError::AuthExpired`] when the token is rejected.
    pub async fn profile(&self) -> Result<Profile, ClientError> {
        let url = self.endpoint("api/profile")?;
        let request = self.authorized(self.client.get(url.clone()))?;
        self.send_json(request, &url, true).await
    }

    /// # Errors
    ///
    /// As [`ApiClient::profile`].
    pub async fn update_nickname(&self, nickname: &str) -> Result<(), ClientError> {
        let url = self.endpoint("api/profile/nickname")?;
        let request = self.authorized(
            self.client
                .put(url.clone())
                .json(&NicknameUpdate { nickname }),
        )?;
        let _: MessageResponse = self.send_json(request, &url, true).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// As [`ApiClient::profile`].
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let url = self.endpoint("api/profile/password")?;
        let request = self.authorized(self.client.put(url.clone()).json(&PasswordUpdate {
            current_password,
            new_password,
        }))?;
        let _: MessageResponse = self.send_json(request, &url, true).await?;
        Ok(())
    }

    /// Sends a profile picture as multipart field `file`.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::profile`]; [`ClientError::Http`] if `mime` is not a
    /// valid MIME type.
    pub async fn upload_profile_picture(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<UploadResponse, ClientError> {
        let url = self.endpoint("api/profile/upload")?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let request = self.authorized(self.client.post(url.clone()).multipart(form))?;
        self.send_json(request, &url, true).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    /// Sends the request, maps non-2xx statuses to typed errors and decodes
    /// the JSON body.
    ///
    /// When `authorized` is set, 401 and 403 discard the held token and
    /// surface as [`ClientError::AuthExpired`].
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
        authorized: bool,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if authorized
            && (status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN)
        {
            tracing::warn!(url = %url, status = status.as_u16(), "token rejected, logging out");
            self.clear_token();
            return Err(ClientError::AuthExpired {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            tracing::warn!(url = %url, status = status.as_u16(), %message, "backend returned error status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

/// Extracts `{"error": ...}` from a backend error body, falling back to the
/// raw text.
fn error_message(body: &str) -> String {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string());
    if message.chars().count() > MAX_ERROR_MESSAGE_CHARS {
        format!(
            "{}...",
            message.chars().take(MAX_ERROR_MESSAGE_CHARS).collect::<String>()
        )
    } else {
        message
    }
}

/// Decodes a facility list record by record, skipping records that fail to
/// decode (unknown category, bad coordinate) with a warning.
fn parse_facility_list(body: serde_json::Value, url: &Url) -> Result<Vec<Facility>, ClientError> {
    let records: Vec<serde_json::Value> =
        serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
            context: url.to_string(),
            source: e,
        })?;
    let total = records.len();
    let facilities: Vec<Facility> = records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Facility>(record) {
            Ok(facility) => Some(facility),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "skipping undecodable facility record");
                None
            }
        })
        .collect();
    if facilities.len() < total {
        tracing::info!(
            url = %url,
            kept = facilities.len(),
            skipped = total - facilities.len(),
            "facility list partially decoded"
        );
    }
    Ok(facilities)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
