//! HTTP client for the vision chat-completion API.
//!
//! Posts an image URL plus the structured prompt to a vision-capable
//! model and returns the parsed verdict. Transport and API failures are
//! errors (callers log and treat the cell as a negative detection);
//! unparseable model *text* is not an error — it degrades to the default
//! negative verdict via [`crate::parse_analysis_or_default`].

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};

use crate::error::VisionError;
use crate::parse::parse_analysis_or_default;
use crate::prompt::analysis_prompt;
use crate::types::{
    ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageUrl, SatelliteAnalysis,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
const CHAT_COMPLETIONS_PATH: &str = "chat/completions";
const MAX_COMPLETION_TOKENS: u32 = 500;

/// Client for a vision-capable chat-completion API.
///
/// Use [`VisionClient::new`] for production or
/// [`VisionClient::with_base_url`] to point at a mock server in tests.
pub struct VisionClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

impl VisionClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, VisionError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`VisionError::InvalidUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, VisionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("gridscout/0.1 (substation-detection)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| VisionError::InvalidUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    /// Submits one satellite image URL for analysis and returns the parsed
    /// verdict.
    ///
    /// # Errors
    ///
    /// - [`VisionError::ApiError`] on a non-2xx model API response.
    /// - [`VisionError::Http`] on network failure.
    /// - [`VisionError::EmptyCompletion`] when the completion has no content.
    /// - [`VisionError::Deserialize`] when the response envelope is malformed.
    ///
    /// A completion whose *text* does not contain valid JSON is NOT an
    /// error; it yields the default negative verdict.
    pub async fn analyze_satellite_image(
        &self,
        image_url: &str,
    ) -> Result<SatelliteAnalysis, VisionError> {
        let content = self.complete(image_url).await?;
        Ok(parse_analysis_or_default(&content))
    }

    async fn complete(&self, image_url: &str) -> Result<String, VisionError> {
        let url = self
            .base_url
            .join(CHAT_COMPLETIONS_PATH)
            .map_err(|e| VisionError::InvalidUrl(format!("{CHAT_COMPLETIONS_PATH}: {e}")))?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: analysis_prompt(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_url.to_owned(),
                        },
                    },
                ],
            }],
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        tracing::debug!(model = %self.model, "vision analysis request");

        let response = self
            .client
            .post(url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(VisionError::ApiError {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.text().await?;
        let envelope: ChatResponse =
            serde_json::from_str(&body).map_err(|e| VisionError::Deserialize {
                context: url.path().to_owned(),
                source: e,
            })?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(VisionError::EmptyCompletion)
    }
}
