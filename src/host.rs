//! ホスト別クライアント
//!
//! リポジトリのコンテンツAPI（パス一覧 / 単一ファイル）を抽象化する。

pub mod github;
#[cfg(test)]
pub mod mock;

pub use github::GitHubClient;

use crate::config::{AuthProvider, HttpConfig, Settings};
use crate::error::Result;
use crate::repo::Repo;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// ホスト種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    GitHub,
}

impl HostKind {
    /// ホスト名を返す
    pub fn as_str(&self) -> &'static str {
        match self {
            HostKind::GitHub => "github",
        }
    }
}

impl std::fmt::Display for HostKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// コンテンツエントリの種別
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// ディレクトリ一覧の1要素
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// 単一ファイルの記述子（content はトランスポート用にエンコード済み）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl RemoteFile {
    /// contents API が本文を返さない大きなファイルか
    ///
    /// GitHub は 1MB を超えるファイルを `encoding: "none"`、空の content で返す。
    pub fn is_oversized(&self) -> bool {
        self.encoding.as_deref() == Some("none")
    }
}

/// パス一覧APIの応答
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ContentListing {
    Dir(Vec<ContentEntry>),
    File(RemoteFile),
}

/// ホスト別クライアント trait
pub trait HostClient: Send + Sync {
    /// ホスト種別
    fn kind(&self) -> HostKind;

    /// パスの子要素一覧、またはファイルそのものを取得
    ///
    /// 空パスはリポジトリルートを表す。
    fn list_contents<'a>(
        &'a self,
        repo: &'a Repo,
        path: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ContentListing>> + Send + 'a>>;
}

/// ホストクライアントファクトリー
///
/// HTTP設定と認証プロバイダーを保持し、ホスト種別に応じたクライアントを生成する。
pub struct HostClientFactory {
    config: HttpConfig,
    auth: AuthProvider,
    github_api_base: String,
}

impl HostClientFactory {
    /// 新しいファクトリーを作成
    pub fn new(config: HttpConfig, auth: AuthProvider) -> Self {
        Self {
            config,
            auth,
            github_api_base: github::API_BASE.to_string(),
        }
    }

    /// GitHub API のベースURLを差し替える
    pub fn with_github_api_base(mut self, base: impl Into<String>) -> Self {
        self.github_api_base = base.into();
        self
    }

    /// アプリケーション設定からファクトリーを作成
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.http_config(), settings.auth_provider())
            .with_github_api_base(settings.github_api_base.clone())
    }

    /// ホスト種別に応じたクライアントを生成
    pub fn create(&self, host: HostKind) -> Arc<dyn HostClient> {
        match host {
            HostKind::GitHub => Arc::new(GitHubClient::with_base_url(
                &self.config,
                &self.auth,
                &self.github_api_base,
            )),
        }
    }
}

#[cfg(test)]
#[path = "host_test.rs"]
mod tests;
