//! Blocking HTTP transport for the Gemini `generateContent` endpoint.
//!
//! The api key travels in the `x-goog-api-key` header; URLs and log lines
//! never carry it.

use log::{error, info};
use reqwest::blocking::{Client, ClientBuilder};
use std::time::Instant;
use studynotes_core::{
    extract_generated_text, GenerationClient, GenerationConfig, GenerationError, GenerationPayload,
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_ERROR_BODY_CHARS: usize = 500;

pub struct GeminiClient {
    http: Client,
    config: GenerationConfig,
}

impl GeminiClient {
    /// Fails fast when no api key is configured.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        Self::with_builder(config, Client::builder())
    }

    fn with_builder(
        config: GenerationConfig,
        builder: ClientBuilder,
    ) -> Result<Self, GenerationError> {
        if config.api_key.is_none() {
            return Err(GenerationError::MissingCredentials);
        }
        let http = builder
            .timeout(config.timeout)
            .build()
            .map_err(|err| GenerationError::Transport(err.to_string()))?;
        Ok(Self { http, config })
    }
}

impl GenerationClient for GeminiClient {
    fn generate(&self, payload: &GenerationPayload) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredentials)?;
        let started_at = Instant::now();

        let response = self
            .http
            .post(self.config.generate_content_url())
            .header(API_KEY_HEADER, api_key)
            .json(&payload.to_request_body())
            .send()
            .map_err(|err| {
                error!(
                    "event=generation_call module=cli status=error model={} duration_ms={} error_code=transport",
                    self.config.model,
                    started_at.elapsed().as_millis()
                );
                GenerationError::Transport(err.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        if !status.is_success() {
            error!(
                "event=generation_call module=cli status=error model={} duration_ms={} http_status={}",
                self.config.model,
                started_at.elapsed().as_millis(),
                status.as_u16()
            );
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        info!(
            "event=generation_call module=cli status=ok model={} duration_ms={} response_bytes={}",
            self.config.model,
            started_at.elapsed().as_millis(),
            body.len()
        );
        extract_generated_text(&body)
    }
}
