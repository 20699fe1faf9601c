//! GitHub クライアント

use crate::config::{AuthProvider, HttpConfig};
use crate::env::EnvVar;
use crate::error::{Result, TimError};
use crate::host::{ContentListing, HostClient, HostKind};
use crate::repo::Repo;
use reqwest::{Client, Url};
use std::future::Future;
use std::pin::Pin;
use std::process::Command;
use std::sync::OnceLock;

pub const API_BASE: &str = "https://api.github.com";

/// GitHub クライアント
pub struct GitHubClient {
    http: Client,
    auth: AuthProvider,
    base_url: String,
    /// 解決済みトークン（初回のリクエストで一度だけ解決）
    token: OnceLock<Option<String>>,
}

impl GitHubClient {
    /// APIのベースURLを指定して作成
    pub fn with_base_url(config: &HttpConfig, auth: &AuthProvider, base_url: &str) -> Self {
        Self {
            http: config.build_client(),
            auth: auth.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: OnceLock::new(),
        }
    }

    /// 認証トークンを取得
    ///
    /// 優先順位:
    /// 1. AuthProviderに設定されたトークン
    /// 2. 環境変数 GITHUB_TOKEN
    /// 3. gh CLI から取得
    fn get_token(&self) -> Option<&str> {
        self.token
            .get_or_init(|| {
                self.auth
                    .github_token()
                    .map(str::to_string)
                    .or_else(|| EnvVar::get("GITHUB_TOKEN"))
                    .or_else(get_token_from_cli)
            })
            .as_deref()
    }

    /// 認証ヘッダーを生成
    fn auth_header(&self) -> Option<(&'static str, String)> {
        self.get_token()
            .map(|t| ("Authorization", format!("Bearer {}", t)))
    }

    /// コンテンツURL
    ///
    /// パスはセグメントごとにパーセントエンコードする（`#` や `?` を含むファイル名のため）。
    fn contents_url(&self, repo: &Repo, path: &str) -> Result<Url> {
        let invalid_base = |reason: String| {
            TimError::Config(format!("invalid GitHub API base '{}': {}", self.base_url, reason))
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid_base(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid_base("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["repos", repo.owner(), repo.name(), "contents"])
            .extend(path.split('/').filter(|segment| !segment.is_empty()));

        if let Some(git_ref) = repo.git_ref() {
            url.query_pairs_mut().append_pair("ref", git_ref);
        }
        Ok(url)
    }
}

/// gh CLIからトークンを取得
fn get_token_from_cli() -> Option<String> {
    Command::new("gh")
        .args(["auth", "token"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
}

impl HostClient for GitHubClient {
    fn kind(&self) -> HostKind {
        HostKind::GitHub
    }

    fn list_contents<'a>(
        &'a self,
        repo: &'a Repo,
        path: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ContentListing>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.contents_url(repo, path)?;
            tracing::debug!(%url, "listing contents");

            let mut req = self
                .http
                .get(url)
                .header("Accept", "application/vnd.github+json");

            if let Some((name, value)) = self.auth_header() {
                req = req.header(name, value);
            }

            let response = req.send().await?;
            let status = response.status().as_u16();

            if !response.status().is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(TimError::RepoApi {
                    host: HostKind::GitHub.to_string(),
                    status,
                    message,
                });
            }

            Ok(response.json::<ContentListing>().await?)
        })
    }
}

/// GitHub用のリポジトリパスパーサ
///
/// `owner/repo` の後ろに続くパス（`/tree/main` など）は無視する。
pub fn parse_repo_path(input: &str) -> Result<(String, String)> {
    let input = input.trim();

    let without_prefix = input
        .strip_prefix("https://github.com/")
        .or_else(|| input.strip_prefix("github.com/"))
        .unwrap_or(input);

    let without_suffix = without_prefix
        .strip_suffix(".git")
        .unwrap_or(without_prefix);

    let mut parts = without_suffix.split('/').map(str::trim);
    match (parts.next(), parts.next()) {
        (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(TimError::InvalidRepoFormat(input.to_string())),
    }
}

#[cfg(test)]
#[path = "github_test.rs"]
mod tests;
