//! リポジトリツリーの再帰取得

use crate::content::RepoFile;
use crate::error::{Result, TimError};
use crate::host::{ContentListing, EntryKind, HostClient};
use crate::repo::Repo;
use futures::future::try_join_all;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// 同時リクエスト数の既定値
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// リポジトリのコンテンツを再帰的に取得し、フラットなファイル一覧にする
///
/// ディレクトリの子要素は兄弟を待たずに並行して取得する。
/// 同時に処理中のHTTPリクエスト数はセマフォで制限する。
/// 本文を返さない大きなファイルは警告を出して結果から外す。
/// 許可はリクエスト1回の間だけ保持し、再帰の間は保持しないので、深いツリーでも詰まらない。
/// 返す順序は保証しない。
pub struct ContentFetcher {
    host: Arc<dyn HostClient>,
    permits: Arc<Semaphore>,
}

impl ContentFetcher {
    pub fn new(host: Arc<dyn HostClient>, max_concurrent: usize) -> Self {
        Self {
            host,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// `path` 以下のファイルをすべて取得（空パスはリポジトリ全体）
    ///
    /// いずれかのリクエストが失敗すると全体が失敗する。
    pub async fn fetch(&self, repo: &Repo, path: &str) -> Result<Vec<RepoFile>> {
        if repo.host() != self.host.kind() {
            return Err(TimError::Validation(format!(
                "{} is not served by the {:?} client",
                repo,
                self.host.kind()
            )));
        }

        tracing::debug!(repo = %repo, path, "fetching repository contents");
        let files = self.walk(repo, path.trim_matches('/').to_string()).await?;
        tracing::debug!(repo = %repo, count = files.len(), "fetched repository contents");
        Ok(files)
    }

    fn walk<'a>(
        &'a self,
        repo: &'a Repo,
        path: String,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RepoFile>>> + Send + 'a>> {
        Box::pin(async move {
            match self.list(repo, &path).await? {
                ContentListing::File(file) if file.is_oversized() => {
                    tracing::warn!(
                        repo = %repo,
                        path = %file.path,
                        "file too large for the contents API, skipping"
                    );
                    Ok(Vec::new())
                }
                ContentListing::File(file) => Ok(vec![RepoFile::decode(file)?]),
                ContentListing::Dir(entries) => {
                    let children = entries.into_iter().filter_map(|entry| match entry.kind {
                        EntryKind::File | EntryKind::Dir => Some(self.walk(repo, entry.path)),
                        _ => {
                            tracing::debug!(path = %entry.path, kind = ?entry.kind, "skipping entry");
                            None
                        }
                    });

                    let nested = try_join_all(children).await?;
                    Ok(nested.into_iter().flatten().collect())
                }
            }
        })
    }

    async fn list(&self, repo: &Repo, path: &str) -> Result<ContentListing> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| TimError::Config(format!("request limiter closed: {}", e)))?;

        self.host.list_contents(repo, path).await
    }
}

#[cfg(test)]
#[path = "fetcher_test.rs"]
mod tests;
