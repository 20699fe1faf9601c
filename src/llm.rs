//! テキスト補完サービスのクライアント
//!
//! `POST { message, model, provider, system }` → `{ text }` だけを扱う。

use crate::config::{AuthProvider, HttpConfig, LlmSettings};
use crate::error::{Result, TimError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

#[cfg(test)]
pub mod mock;

/// 補完リクエスト
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub message: &'a str,
    pub model: &'a str,
    pub provider: &'a str,
    pub system: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    text: String,
}

/// 補完クライアント trait
pub trait CompletionClient: Send + Sync {
    /// system プロンプトとユーザーメッセージから応答テキストを得る
    fn complete<'a>(
        &'a self,
        system: &'a str,
        message: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

/// HTTP経由の補完クライアント
pub struct HttpCompletionClient {
    http: Client,
    endpoint: String,
    model: String,
    provider: String,
    api_key: Option<String>,
}

impl HttpCompletionClient {
    pub fn new(config: &HttpConfig, settings: &LlmSettings, auth: &AuthProvider) -> Self {
        Self {
            http: config.build_client(),
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            provider: settings.provider.clone(),
            api_key: auth.llm_api_key().map(str::to_string),
        }
    }
}

impl CompletionClient for HttpCompletionClient {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        message: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let body = CompletionRequest {
                message,
                model: &self.model,
                provider: &self.provider,
                system,
            };

            tracing::debug!(endpoint = %self.endpoint, model = %self.model, "requesting completion");

            let mut req = self.http.post(&self.endpoint).json(&body);
            if let Some(key) = &self.api_key {
                req = req.bearer_auth(key);
            }

            let response = req.send().await?;
            let status = response.status().as_u16();

            if !response.status().is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(TimError::Completion { status, message });
            }

            let parsed: CompletionResponse = response.json().await?;
            Ok(parsed.text)
        })
    }
}

#[cfg(test)]
#[path = "llm_test.rs"]
mod tests;
