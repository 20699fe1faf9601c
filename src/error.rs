use thiserror::Error;

/// TIM統一エラー型
#[derive(Debug, Error)]
pub enum TimError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{host} API error: {message} (status: {status})")]
    RepoApi {
        host: String,
        status: u16,
        message: String,
    },

    #[error("Completion service error: {message} (status: {status})")]
    Completion { status: u16, message: String },

    #[error("Could not parse completion response: {0}")]
    Parse(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Invalid repository format: {0}. Expected 'owner/repo' or 'owner/repo@ref'")]
    InvalidRepoFormat(String),

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, TimError>;

impl TimError {
    /// 外部サービスとの通信失敗かどうか
    ///
    /// リトライはしない。呼び出し側でフォールバックを選ぶための判定にのみ使う。
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TimError::Network(_) | TimError::RepoApi { .. } | TimError::Completion { .. }
        )
    }

    /// ローカルで回復できるエラーかどうか（既定テンプレートへ縮退する）
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TimError::Parse(_) | TimError::TemplateNotFound(_))
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
