//! リポジトリコンテンツの取得とキャッシュ

pub mod cache;
pub mod fetcher;

pub use cache::{CacheStatus, ExpiringCache};
pub use fetcher::ContentFetcher;

use crate::error::{Result, TimError};
use crate::host::RemoteFile;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

/// 取得済みのファイル
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoFile {
    pub name: String,
    /// リポジトリルートからの相対パス（`/` 区切り）
    pub path: String,
    pub content: String,
}

impl RepoFile {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            content: content.into(),
        }
    }

    /// パスだけからファイルを作成（name はパスの末尾要素）
    #[cfg(test)]
    pub fn at(path: &str, content: impl Into<String>) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        Self::new(name, path, content)
    }

    /// ホストのファイル記述子をデコード
    ///
    /// GitHub は base64 を 60 桁ごとに改行して返すため、空白を除いてからデコードする。
    pub fn decode(remote: RemoteFile) -> Result<Self> {
        match remote.encoding.as_deref() {
            None | Some("base64") => {}
            Some(other) => {
                return Err(TimError::Decode {
                    path: remote.path,
                    reason: format!("unsupported encoding '{}'", other),
                })
            }
        }

        let compact: String = remote
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        let bytes = STANDARD.decode(compact).map_err(|e| TimError::Decode {
            path: remote.path.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self::new(
            remote.name,
            remote.path,
            String::from_utf8_lossy(&bytes),
        ))
    }
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
