//! HTTP client module: OAuth-signed requests against the upload and status endpoints.
//!
//! This module provides:
//! - Request and connect timeouts from [`Config`]
//! - OAuth 1.0a signing of every request
//! - Form, query and multipart request helpers
//! - Typed responses for the upload protocol and status updates

use crate::auth::{Credentials, OAuth1Signer};
use crate::config::Config;
use crate::error::{MediaError, Result};
use crate::media::MediaCategory;
use crate::traits::{MediaEndpoint, StatusEndpoint};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header, multipart};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// HTTP client for the media upload and status update APIs.
#[derive(Debug, Clone)]
pub struct TwitterHttpClient {
    client: Client,
    signer: OAuth1Signer,
    config: Config,
}

impl TwitterHttpClient {
    /// Creates a new client with the default configuration.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, Config::default())
    }

    /// Creates a new client with custom configuration.
    pub fn with_config(credentials: Credentials, config: Config) -> Result<Self> {
        config.validate()?;
        credentials.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(&config.http.user_agent)
            .build()?;

        Ok(Self {
            client,
            signer: OAuth1Signer::new(credentials),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Makes a signed POST with a form-encoded body.
    pub async fn post_form(&self, url: &str, params: &[(&str, String)]) -> Result<Response> {
        let authorization = self
            .signer
            .authorization_header(&Method::POST, url, params)?;
        self.send(self.client.post(url).form(params), authorization)
            .await
    }

    /// Makes a signed GET with query parameters.
    pub async fn get_query(&self, url: &str, params: &[(&str, String)]) -> Result<Response> {
        let authorization = self
            .signer
            .authorization_header(&Method::GET, url, params)?;
        self.send(self.client.get(url).query(params), authorization)
            .await
    }

    /// Makes a signed multipart POST carrying text fields and one binary part.
    ///
    /// Multipart fields are not part of the OAuth signature.
    pub async fn post_multipart(
        &self,
        url: &str,
        fields: &[(&str, String)],
        file_field: &str,
        data: Vec<u8>,
    ) -> Result<Response> {
        let authorization = self.signer.authorization_header(&Method::POST, url, &[])?;

        let mut form = multipart::Form::new();
        for (name, value) in fields {
            form = form.text(name.to_string(), value.clone());
        }
        form = form.part(file_field.to_string(), multipart::Part::bytes(data));

        self.send(self.client.post(url).multipart(form), authorization)
            .await
    }

    async fn send(&self, request: RequestBuilder, authorization: String) -> Result<Response> {
        let response = request
            .header(header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MediaError::Timeout
                } else {
                    MediaError::Network(e)
                }
            })?;

        debug!("{} -> HTTP {}", response.url(), response.status());
        Ok(response)
    }
}

/// Reads a JSON body, turning non-2xx responses into [`MediaError::Api`].
pub async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(MediaError::from_api_response(
            status.as_u16(),
            api_error_message(&body),
        ));
    }

    Ok(serde_json::from_slice(&body)?)
}

/// Extracts a readable message from an API error body.
fn api_error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ApiErrorResponse>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .iter()
            .map(|e| format!("{} (code {})", e.message, e.code))
            .collect::<Vec<_>>()
            .join("; "),
        Ok(ApiErrorResponse {
            error: Some(message),
            ..
        }) => message,
        _ => {
            let text = String::from_utf8_lossy(body);
            if text.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                text.into_owned()
            }
        }
    }
}

#[async_trait::async_trait]
impl MediaEndpoint for TwitterHttpClient {
    async fn init(
        &self,
        media_type: &str,
        total_bytes: u64,
        media_category: Option<MediaCategory>,
    ) -> Result<InitResponse> {
        let mut params = vec![
            ("command", "INIT".to_string()),
            ("media_type", media_type.to_string()),
            ("total_bytes", total_bytes.to_string()),
        ];
        if let Some(category) = media_category {
            params.push(("media_category", category.as_str().to_string()));
        }

        let response = self.post_form(&self.config.http.upload_url, &params).await?;
        parse_json(response).await
    }

    async fn append(
        &self,
        media_id: u64,
        segment_index: u32,
        chunk: Vec<u8>,
    ) -> Result<StatusCode> {
        let fields = [
            ("command", "APPEND".to_string()),
            ("media_id", media_id.to_string()),
            ("segment_index", segment_index.to_string()),
        ];

        let response = self
            .post_multipart(&self.config.http.upload_url, &fields, "media", chunk)
            .await?;
        Ok(response.status())
    }

    async fn finalize(&self, media_id: u64) -> Result<ProcessingResponse> {
        let params = [
            ("command", "FINALIZE".to_string()),
            ("media_id", media_id.to_string()),
        ];

        let response = self.post_form(&self.config.http.upload_url, &params).await?;
        parse_json(response).await
    }

    async fn status(&self, media_id: u64) -> Result<ProcessingResponse> {
        let params = [
            ("command", "STATUS".to_string()),
            ("media_id", media_id.to_string()),
        ];

        let response = self.get_query(&self.config.http.upload_url, &params).await?;
        parse_json(response).await
    }
}

#[async_trait::async_trait]
impl StatusEndpoint for TwitterHttpClient {
    async fn update_status(&self, text: &str, media_ids: &[u64]) -> Result<StatusUpdateResponse> {
        let mut params = vec![("status", text.to_string())];
        if !media_ids.is_empty() {
            let joined = media_ids
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            params.push(("media_ids", joined));
        }

        let response = self.post_form(&self.config.http.status_url, &params).await?;
        parse_json(response).await
    }
}

/// INIT response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InitResponse {
    pub media_id: u64,
    pub media_id_string: Option<String>,
    pub expires_after_secs: Option<u64>,
}

/// FINALIZE and STATUS response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProcessingResponse {
    pub media_id: Option<u64>,
    pub processing_info: Option<ProcessingInfo>,
}

/// Server-reported asynchronous processing status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProcessingInfo {
    pub state: ProcessingState,
    /// Suggested wait before the next STATUS request
    pub check_after_secs: Option<u64>,
    pub progress_percent: Option<u8>,
    pub error: Option<ProcessingErrorInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingState {
    Pending,
    InProgress,
    Succeeded,
    Failed,
    /// Any state this client does not know yet; treated as still processing.
    #[serde(other)]
    Unknown,
}

/// Error detail attached to a `failed` processing state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProcessingErrorInfo {
    pub code: Option<i64>,
    pub name: Option<String>,
    pub message: Option<String>,
}

/// Status update response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusUpdateResponse {
    pub id: u64,
    pub id_str: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    code: i64,
    message: String,
}

impl ProcessingErrorInfo {
    /// Human-readable reason for logs and errors.
    pub fn describe(&self) -> String {
        match (&self.name, &self.message) {
            (Some(name), Some(message)) => format!("{name}: {message}"),
            (Some(name), None) => name.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => match self.code {
                Some(code) => format!("error code {code}"),
                None => "unknown error".to_string(),
            },
        }
    }
}
