//! OpenAI-compatible vision provider.
//!
//! Submits each photo to the chat completions endpoint with a fixed
//! extraction prompt and parses the JSON reply into
//! [`BuildingFeatures`]. API key auth only.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::building::BuildingFeatures;
use crate::config::VisionConfig;
use crate::error::VisionError;

use super::{PhotoPayload, VisionAnalyzer};

/// Extraction prompt. The model must reply with bare JSON in this exact
/// shape; anything else is treated as malformed.
const ANALYSIS_PROMPT: &str = r#"Analyze this building photo and extract the following information.
Respond ONLY with a valid JSON object (no markdown, no explanation), using this exact structure:

{
    "building_type": "Single Family Residential|Multi-Family Residential|Commercial|Industrial|Mixed Use",
    "roof_style": "Gable|Hip|Flat|Mansard|Gambrel|Shed|Butterfly",
    "exterior_material": "Vinyl Siding|Wood Siding|Fiber Cement|Brick|Stone|Stucco|Metal|EIFS",
    "stories": <number>,
    "window_count": <number of visible windows>,
    "door_count": <number of visible doors, not including garage>,
    "has_garage": true|false,
    "garage_doors": <number>,
    "has_porch": true|false,
    "has_deck": true|false,
    "has_dormers": true|false,
    "dormer_count": <number>,
    "special_features": ["list", "of", "notable", "features"],
    "photo_quality": "low|medium|high",
    "confidence": <0.0 to 1.0 based on how clearly features are visible>
}

Be conservative in your estimates. If something is not clearly visible, indicate lower confidence.
Count only what you can see - don't assume features on non-visible sides."#;

/// Vision provider for OpenAI-compatible chat completions APIs.
pub struct OpenAiVision {
    client: Client,
    config: VisionConfig,
}

impl OpenAiVision {
    /// Create the provider. Fails when no API key is configured.
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        if config.api_key.is_none() {
            return Err(VisionError::Auth);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn api_key(&self) -> String {
        self.config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().to_string())
            .unwrap_or_default()
    }
}

#[async_trait]
impl VisionAnalyzer for OpenAiVision {
    async fn analyze(&self, photo: &PhotoPayload) -> Result<BuildingFeatures, VisionError> {
        let data_url = format!(
            "data:{};base64,{}",
            photo.media_type,
            BASE64.encode(&photo.data)
        );

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: ANALYSIS_PROMPT,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: data_url,
                            detail: "high",
                        },
                    },
                ],
            }],
            max_tokens: 1000,
        };

        tracing::debug!(source = %photo.source, model = %self.config.model, "submitting photo for analysis");

        let response = self
            .client
            .post(self.api_url())
            .header("Authorization", format!("Bearer {}", self.api_key()))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VisionError::Unavailable {
                        reason: "request timed out".to_string(),
                    }
                } else {
                    VisionError::Unavailable {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(VisionError::Auth);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, "vision API error body: {body}");
            return Err(VisionError::Unavailable {
                reason: format!("API returned {status}"),
            });
        }

        let parsed: ChatResponse =
            response.json().await.map_err(|e| VisionError::Malformed {
                reason: format!("response envelope: {e}"),
            })?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| VisionError::Malformed {
                reason: "response had no choices".to_string(),
            })?;

        let raw: RawFeatures = serde_json::from_str(strip_code_fences(&content)).map_err(|e| {
            VisionError::Malformed {
                reason: format!("feature JSON: {e}"),
            }
        })?;

        Ok(raw.into_features())
    }
}

/// Models occasionally wrap the JSON in markdown fences despite the prompt.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
    detail: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// The schema the model replies in, with every field optional so partial
/// answers still parse.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFeatures {
    building_type: Option<String>,
    roof_style: Option<String>,
    exterior_material: Option<String>,
    stories: Option<u32>,
    window_count: Option<u32>,
    door_count: Option<u32>,
    has_garage: bool,
    garage_doors: Option<u32>,
    has_porch: bool,
    has_deck: bool,
    dormer_count: Option<u32>,
    special_features: Vec<String>,
    photo_quality: Option<String>,
    confidence: Option<f64>,
}

impl RawFeatures {
    fn into_features(self) -> BuildingFeatures {
        BuildingFeatures {
            building_type: self.building_type.and_then(|s| s.parse().ok()),
            roof_style: self.roof_style.and_then(|s| s.parse().ok()),
            exterior_material: self.exterior_material.and_then(|s| s.parse().ok()),
            stories: self.stories,
            window_count: self.window_count,
            door_count: self.door_count,
            garage_doors: self.garage_doors.or(self.has_garage.then_some(1)),
            has_porch: self.has_porch,
            has_deck: self.has_deck,
            dormer_count: self.dormer_count,
            special_features: self.special_features,
            photo_quality: self
                .photo_quality
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            confidence: self.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
        }
    }
}
