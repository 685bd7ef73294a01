use super::ImageSettings;
use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const UNKNOWN_MODEL: &str = "unknown_model";

/// Body of a txt2img call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub cfg_scale: f64,
    pub steps: u32,
    pub sampler_name: String,
    pub seed: i64,
    pub batch_size: u32,
    pub n_iter: u32,
}

impl ImageRequest {
    pub fn new(prompt: String, negative_prompt: String, settings: &ImageSettings) -> Self {
        Self {
            prompt,
            negative_prompt,
            width: settings.width,
            height: settings.height,
            cfg_scale: settings.cfg_scale,
            steps: settings.steps,
            sampler_name: settings.sampler_name.clone(),
            seed: settings.seed,
            batch_size: 1,
            n_iter: 1,
        }
    }
}

/// Synchronous image generation service.
pub trait ImageBackend: Send + Sync {
    /// Returns the encoded image bytes.
    fn generate(&self, request: &ImageRequest) -> Result<Vec<u8>>;

    /// Name of the loaded model, used to group output directories.
    fn current_model(&self) -> String {
        UNKNOWN_MODEL.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct Txt2ImgResponse {
    #[serde(default)]
    images: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OptionsResponse {
    sd_model_checkpoint: Option<String>,
}

/// Client for a Stable Diffusion WebUI style HTTP API.
#[derive(Debug, Clone)]
pub struct HttpImageBackend {
    client: Client,
    base_url: String,
}

impl HttpImageBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl ImageBackend for HttpImageBackend {
    fn generate(&self, request: &ImageRequest) -> Result<Vec<u8>> {
        let url = self.endpoint("sdapi/v1/txt2img");
        debug!(%url, steps = request.steps, "requesting image");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .with_context(|| format!("Image request to {url} failed"))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("Image backend returned {status}: {}", body.trim());
        }
        let payload: Txt2ImgResponse = response
            .json()
            .context("Image backend returned malformed JSON")?;
        let encoded = payload
            .images
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Image backend returned no images"))?;
        // Some servers prefix a data URL header.
        let encoded = encoded
            .split_once(',')
            .map(|(_, data)| data.to_string())
            .unwrap_or(encoded);
        STANDARD
            .decode(encoded.trim())
            .context("Image payload is not valid base64")
    }

    fn current_model(&self) -> String {
        let url = self.endpoint("sdapi/v1/options");
        let model = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<OptionsResponse>());
        match model {
            Ok(OptionsResponse {
                sd_model_checkpoint: Some(name),
            }) if !name.trim().is_empty() => name,
            Ok(_) => UNKNOWN_MODEL.to_string(),
            Err(err) => {
                warn!(error = %err, "could not read current model");
                UNKNOWN_MODEL.to_string()
            }
        }
    }
}
