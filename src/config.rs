//! HTTP設定・認証プロバイダー・アプリケーション設定

use crate::content::cache::DEFAULT_TTL;
use crate::content::fetcher::DEFAULT_MAX_CONCURRENT;
use crate::env::EnvVar;
use crate::error::{Result, TimError};
use crate::host::github;
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 設定ファイルの場所を上書きする環境変数
pub const CONFIG_ENV: &str = "TIM_CONFIG";

/// HTTP設定
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// タイムアウト
    pub timeout: Option<Duration>,
    /// User-Agent
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: "tim-cli".to_string(),
        }
    }
}

impl HttpConfig {
    /// reqwest::Client を構築
    pub fn build_client(&self) -> Client {
        let mut builder = Client::builder().user_agent(&self.user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().unwrap_or_else(|_| Client::new())
    }
}

/// 認証プロバイダー
///
/// 明示的に設定されたトークンを保持する。
/// 環境変数や gh CLI へのフォールバックは各ホストクライアントが行う。
#[derive(Debug, Clone, Default)]
pub struct AuthProvider {
    github_token: Option<String>,
    llm_api_key: Option<String>,
}

impl AuthProvider {
    /// 新しいAuthProviderを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// GitHubトークンを設定
    pub fn with_github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    /// 補完サービスのAPIキーを設定
    pub fn with_llm_api_key(mut self, key: impl Into<String>) -> Self {
        self.llm_api_key = Some(key.into());
        self
    }

    /// GitHubトークンを取得
    pub fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    /// 補完サービスのAPIキーを取得
    pub fn llm_api_key(&self) -> Option<&str> {
        self.llm_api_key.as_deref()
    }
}

/// 補完サービス設定
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmSettings {
    /// POST先エンドポイント
    pub endpoint: String,
    pub model: String,
    pub provider: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5173/api/llmcall".to_string(),
            model: "gpt-4o-mini".to_string(),
            provider: "OpenAI".to_string(),
        }
    }
}

/// アプリケーション設定（`~/.tim/config.toml`）
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub github_api_base: String,
    pub github_token: Option<String>,
    /// キャッシュの有効期間（ミリ秒）
    pub cache_ttl_ms: u64,
    /// 同時に発行するHTTPリクエストの上限
    pub max_concurrent_requests: usize,
    /// テンプレートのメタデータディレクトリ名
    pub metadata_dir: String,
    pub http_timeout_secs: u64,
    /// カタログファイル（未指定なら組み込みカタログ）
    pub catalog: Option<PathBuf>,
    pub llm: LlmSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_api_base: github::API_BASE.to_string(),
            github_token: None,
            cache_ttl_ms: DEFAULT_TTL.as_millis() as u64,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT,
            metadata_dir: ".bolt".to_string(),
            http_timeout_secs: 30,
            catalog: None,
            llm: LlmSettings::default(),
        }
    }
}

impl Settings {
    /// 既定の場所から設定を読み込む
    ///
    /// 優先順位: 1. TIM_CONFIG, 2. $HOME/.tim/config.toml
    /// ファイルが存在しなければ既定値を返す。
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// 設定ファイルのパスを解決
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = EnvVar::get(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        EnvVar::get("HOME").map(|home| PathBuf::from(home).join(".tim").join("config.toml"))
    }

    /// 指定パスから設定を読み込む
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// TOML文字列をパースして検証
    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.max_concurrent_requests == 0 {
            return Err(TimError::Config(
                "max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        if self.metadata_dir.trim().is_empty() {
            return Err(TimError::Config("metadata_dir must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// HTTP設定を生成
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            timeout: Some(Duration::from_secs(self.http_timeout_secs)),
            ..HttpConfig::default()
        }
    }

    /// 認証プロバイダーを生成
    ///
    /// 補完サービスのキーは TIM_LLM_API_KEY から取得する。
    pub fn auth_provider(&self) -> AuthProvider {
        let mut auth = AuthProvider::new();
        if let Some(token) = &self.github_token {
            auth = auth.with_github_token(token);
        }
        if let Some(key) = EnvVar::get("TIM_LLM_API_KEY") {
            auth = auth.with_llm_api_key(key);
        }
        auth
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
