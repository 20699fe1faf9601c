//! 有効期限付きのコンテンツキャッシュ

use crate::content::{ContentFetcher, RepoFile};
use crate::error::Result;
use crate::repo::Repo;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// 既定の有効期間（1時間）
pub const DEFAULT_TTL: Duration = Duration::from_millis(3_600_000);

/// `get` が返したデータの出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// 有効期間内のキャッシュ
    Fresh,
    /// 取得し直したデータ
    Refreshed,
    /// 再取得に失敗したため期限切れのキャッシュを返した
    StaleFallback,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<RepoFile>,
    timestamp: Instant,
    fetched_at: DateTime<Utc>,
}

/// ContentFetcher を包むキーごとのキャッシュ
///
/// キーは リポジトリ + ref + パス。エントリは削除されず、プロセス終了まで保持される。
///
/// マップのロックは読み書きの瞬間だけ保持し、取得中は保持しない。
/// 同じキーへの同時ミスはどちらも取得を行い、後に書いた方が残る。
/// エントリは同じリモートから冪等に得られるので、どちらが残っても内容は変わらない。
pub struct ExpiringCache {
    fetcher: ContentFetcher,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ExpiringCache {
    pub fn new(fetcher: ContentFetcher, ttl: Duration) -> Self {
        Self {
            fetcher,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// ファイル一覧を取得（キャッシュ優先）
    pub async fn get(&self, repo: &Repo, path: &str) -> Result<Vec<RepoFile>> {
        self.get_with_status(repo, path).await.map(|(data, _)| data)
    }

    /// ファイル一覧と、その出どころを取得
    ///
    /// - 有効期間内ならネットワークに出ずに返す
    /// - 期限切れ・未取得なら取得し、成功したらエントリを上書きする
    /// - 取得に失敗し、古いエントリがあればそれを返す（タイムスタンプは更新しない）
    /// - エントリがなく取得に失敗したら、そのエラーを返す
    pub async fn get_with_status(
        &self,
        repo: &Repo,
        path: &str,
    ) -> Result<(Vec<RepoFile>, CacheStatus)> {
        let key = repo.cache_key(path);

        if let Some(entry) = self.lookup(&key) {
            if entry.timestamp.elapsed() < self.ttl {
                tracing::debug!(%key, "cache hit");
                return Ok((entry.data, CacheStatus::Fresh));
            }
        }

        match self.fetcher.fetch(repo, path).await {
            Ok(data) => {
                self.store(key, data.clone());
                Ok((data, CacheStatus::Refreshed))
            }
            Err(err) => match self.lookup(&key) {
                Some(stale) => {
                    tracing::warn!(%key, error = %err, "fetch failed, serving stale cache");
                    Ok((stale.data, CacheStatus::StaleFallback))
                }
                None => Err(err),
            },
        }
    }

    /// キーが最後に取得された日時
    pub fn fetched_at(&self, repo: &Repo, path: &str) -> Option<DateTime<Utc>> {
        self.lock().get(&repo.cache_key(path)).map(|e| e.fetched_at)
    }

    fn lookup(&self, key: &str) -> Option<CacheEntry> {
        self.lock().get(key).cloned()
    }

    fn store(&self, key: String, data: Vec<RepoFile>) {
        let entry = CacheEntry {
            data,
            timestamp: Instant::now(),
            fetched_at: Utc::now(),
        };
        let mut entries = self.lock();
        entries.insert(key, entry);
        tracing::debug!(
            entries = entries.len(),
            ttl_ms = self.ttl.as_millis() as u64,
            "cache stored"
        );
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
