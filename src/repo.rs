//! テンプレートリポジトリの参照
//!
//! カタログの `github_repo` やCLI引数から、取得対象のリポジトリを組み立てる。
//!
//! ## 対応フォーマット
//!
//! - `owner/repo` - 短縮記法
//! - `owner/repo@ref` - ref指定
//! - `https://github.com/owner/repo` - HTTP URL
//! - `git@github.com:owner/repo` - SCP形式

use crate::error::{Result, TimError};
use crate::host::{self, HostKind};

/// リポジトリ参照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    host: HostKind,
    owner: String,
    name: String,
    git_ref: Option<String>,
}

impl Repo {
    /// 新しいRepoを作成
    pub fn new(
        host: HostKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        git_ref: Option<String>,
    ) -> Self {
        Self {
            host,
            owner: owner.into(),
            name: name.into(),
            git_ref,
        }
    }

    /// ホスト種別
    pub fn host(&self) -> HostKind {
        self.host
    }

    /// オーナー名
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// リポジトリ名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Git ref（ブランチ、タグ、コミットSHA）
    pub fn git_ref(&self) -> Option<&str> {
        self.git_ref.as_deref()
    }

    /// フルパス形式 (owner/repo)
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// キャッシュキー（リポジトリ + ref + パス）
    pub fn cache_key(&self, path: &str) -> String {
        match self.git_ref() {
            Some(git_ref) => format!("{}@{}/{}", self.full_name(), git_ref, path),
            None => format!("{}/{}", self.full_name(), path),
        }
    }
}

impl std::fmt::Display for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.git_ref() {
            Some(git_ref) => write!(f, "{}@{}", self.full_name(), git_ref),
            None => write!(f, "{}", self.full_name()),
        }
    }
}

/// 入力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocatorKind {
    HttpUrl,
    Scp,
    Shorthand,
}

/// 文字列からリポジトリ参照を生成
///
/// 1. 入力形式を判定 (HTTP URL / SCP / 短縮記法)
/// 2. ホストとパスを抽出
/// 3. `@ref` を分離
/// 4. `host::github::parse_repo_path()` で owner/name を得る
pub fn from_url(input: &str) -> Result<Repo> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TimError::InvalidRepoFormat(input.to_string()));
    }

    let raw_path = match detect_locator_kind(input)? {
        LocatorKind::HttpUrl => parse_http_url(input)?,
        LocatorKind::Scp => parse_scp_url(input)?,
        LocatorKind::Shorthand => input.to_string(),
    };

    let (path, git_ref) = split_ref(&raw_path)?;
    let (owner, name) = host::github::parse_repo_path(&path)?;

    Ok(Repo::new(HostKind::GitHub, owner, name, git_ref))
}

fn detect_locator_kind(input: &str) -> Result<LocatorKind> {
    if let Some((scheme, _rest)) = input.split_once("://") {
        return match scheme {
            "http" | "https" => Ok(LocatorKind::HttpUrl),
            _ => Err(TimError::InvalidRepoFormat(format!(
                "Unsupported scheme: {}",
                scheme
            ))),
        };
    }

    if input.starts_with("git@") && input.contains(':') {
        return Ok(LocatorKind::Scp);
    }

    Ok(LocatorKind::Shorthand)
}

/// パスから `@ref` を分離
fn split_ref(path: &str) -> Result<(String, Option<String>)> {
    let path = path.strip_suffix(".git").unwrap_or(path);

    match path.split_once('@') {
        Some((_, "")) => Err(TimError::InvalidRepoFormat(format!(
            "Empty ref after @: {}",
            path
        ))),
        Some((left, right)) => Ok((left.to_string(), Some(right.to_string()))),
        None => Ok((path.to_string(), None)),
    }
}

fn parse_http_url(input: &str) -> Result<String> {
    let rest = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
        .unwrap_or(input);

    let (host, path) = rest
        .split_once('/')
        .ok_or_else(|| TimError::InvalidRepoFormat(input.to_string()))?;

    ensure_github_host(host)?;
    Ok(path.trim_start_matches('/').to_string())
}

/// SCP形式 (git@github.com:owner/repo)
fn parse_scp_url(input: &str) -> Result<String> {
    let rest = input.strip_prefix("git@").unwrap_or(input);

    let (host, path) = rest
        .split_once(':')
        .ok_or_else(|| TimError::InvalidRepoFormat(input.to_string()))?;

    ensure_github_host(host)?;
    Ok(path.to_string())
}

fn ensure_github_host(host: &str) -> Result<()> {
    let host = host.split(':').next().unwrap_or(host);

    match host.to_ascii_lowercase().as_str() {
        "github.com" | "www.github.com" => Ok(()),
        _ => Err(TimError::InvalidRepoFormat(format!("Unknown host: {}", host))),
    }
}

#[cfg(test)]
#[path = "repo_test.rs"]
mod tests;

#[cfg(test)]
#[path = "repo_proptests.rs"]
mod proptests;
