// Image generation module: formats a single chat-completions request
// asking for image output, and decodes the data-URI payload that comes
// back. Deliberately small and synchronous; one request, no retries.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::ImageGenConfig;

/// Platform tag baked into every generated filename.
pub const PLATFORM_TAG: &str = "facebook";

/// Style directives appended verbatim to every prompt.
const STYLE_GUIDELINES: &str = "Style guidelines:
- Modern, clean, professional aesthetic
- Warm, inviting colors (blues, greens, oranges)
- Suitable for middle/high school science education
- No text in the image
- Focus on visual storytelling and education";

/// Append the fixed style-guideline block to a caller-supplied prompt.
pub fn enhance_prompt(prompt: &str) -> String {
    format!("{}\n\n{}", prompt, STYLE_GUIDELINES)
}

/// Derive the output filename for a generated image:
/// `<date>_facebook_<slug>_v1.png`.
pub fn image_file_name(date: NaiveDate, slug: &str) -> String {
    format!("{}_{}_{}_v1.png", date.format("%Y-%m-%d"), PLATFORM_TAG, slug)
}

/// Extract the base64 payload from a data-URI
/// (`data:<mime>;base64,<payload>`) and decode it. A string without a
/// comma is treated as a bare payload, so a service that returns raw
/// base64 instead of a data-URI still decodes.
pub fn decode_data_uri(url: &str) -> Result<Vec<u8>> {
    let payload = match url.split_once(',') {
        Some((_, payload)) => payload,
        None => url,
    };
    BASE64
        .decode(payload)
        .context("Decoding base64 image payload")
}

#[derive(Serialize, Debug)]
struct GenerateRequest<'a> {
    model: &'a str,
    modalities: [&'a str; 2],
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response shape of the chat-completions endpoint, reduced to the
/// fields this tool reads. Everything that may legitimately be absent is
/// optional or defaulted, so a text-only response parses cleanly.
#[derive(Deserialize, Debug)]
struct GenerateResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    images: Vec<GeneratedImage>,
}

#[derive(Deserialize, Debug)]
struct GeneratedImage {
    image_url: ImageUrl,
}

#[derive(Deserialize, Debug)]
struct ImageUrl {
    url: String,
}

fn first_image_url(response: GenerateResponse) -> Option<String> {
    let choice = response.choices.into_iter().next()?;
    choice
        .message
        .images
        .into_iter()
        .next()
        .map(|image| image.image_url.url)
}

/// Blocking client for the image-generation endpoint.
pub struct ImageClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ImageClient {
    pub fn new(config: &ImageGenConfig) -> Result<ImageClient> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ImageClient {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Generate one image for the prompt (style guidelines are appended
    /// here) and return the decoded bytes. A response without an image
    /// is an error, not a panic; no retries are attempted.
    pub fn generate(&self, prompt: &str) -> Result<Vec<u8>> {
        let enhanced = enhance_prompt(prompt);
        let body = GenerateRequest {
            model: &self.model,
            modalities: ["image", "text"],
            messages: [ChatMessage {
                role: "user",
                content: &enhanced,
            }],
        };

        let url = format!("{}/chat/completions", self.base_url);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .context("Failed to send image generation request")?;

        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Image generation failed: {} - {}", status, txt);
        }

        let response: GenerateResponse =
            res.json().context("Parsing image generation response json")?;
        let image_url =
            first_image_url(response).context("No images found in response")?;
        decode_data_uri(&image_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_date_platform_slug_versioned() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            image_file_name(date, "systems-thinking"),
            "2024-06-01_facebook_systems-thinking_v1.png"
        );
    }

    #[test]
    fn decodes_data_uri_payload() {
        let bytes = decode_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn payload_without_comma_decodes_as_bare_base64() {
        let bytes = decode_data_uri("aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn invalid_payload_is_an_error() {
        assert!(decode_data_uri("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn enhanced_prompt_keeps_original_text_first() {
        let enhanced = enhance_prompt("A diagram of a water cycle");
        assert!(enhanced.starts_with("A diagram of a water cycle\n\n"));
        assert!(enhanced.contains("Style guidelines:"));
        assert!(enhanced.contains("No text in the image"));
    }

    #[test]
    fn response_with_image_yields_its_url() {
        let json = r#"{
            "choices": [{
                "message": {
                    "images": [{"image_url": {"url": "data:image/png;base64,aGVsbG8="}}]
                }
            }]
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            first_image_url(response).as_deref(),
            Some("data:image/png;base64,aGVsbG8=")
        );
    }

    #[test]
    fn text_only_response_yields_no_url() {
        let json = r#"{"choices": [{"message": {}}]}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(first_image_url(response), None);
    }

    #[test]
    fn empty_choices_yield_no_url() {
        let json = r#"{"choices": []}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(first_image_url(response), None);
    }

    #[test]
    fn request_body_matches_wire_format() {
        let body = GenerateRequest {
            model: "google/gemini-2.5-flash-image",
            modalities: ["image", "text"],
            messages: [ChatMessage {
                role: "user",
                content: "draw",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "google/gemini-2.5-flash-image",
                "modalities": ["image", "text"],
                "messages": [{"role": "user", "content": "draw"}]
            })
        );
    }
}
