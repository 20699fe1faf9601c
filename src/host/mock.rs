//! テスト用モックホスト

use super::*;
use crate::error::TimError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// メモリ上のファイルツリーを返すホスト
pub struct MockHost {
    files: RwLock<BTreeMap<String, String>>,
    oversized: RwLock<BTreeSet<String>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    failing: AtomicBool,
    delay: Option<Duration>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
            oversized: RwLock::new(BTreeSet::new()),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            delay: None,
        }
    }

    /// 各リクエストに遅延を入れる（同時実行数の計測用）
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// ファイルを追加
    pub fn add_file(&self, path: &str, content: &str) {
        self.files
            .write()
            .unwrap()
            .insert(path.to_string(), content.to_string());
    }

    /// 本文なし（`encoding: "none"`）で返すファイルを追加
    pub fn add_oversized_file(&self, path: &str) {
        self.add_file(path, "");
        self.oversized.write().unwrap().insert(path.to_string());
    }

    /// 以降のリクエストを 500 で失敗させる
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// list_contents の呼び出し回数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 同時に処理中だったリクエスト数の最大値
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn listing(&self, path: &str) -> Result<ContentListing> {
        let files = self.files.read().unwrap();

        if let Some(content) = files.get(path) {
            let name = path.rsplit('/').next().unwrap_or(path).to_string();
            if self.oversized.read().unwrap().contains(path) {
                return Ok(ContentListing::File(RemoteFile {
                    kind: EntryKind::File,
                    name,
                    path: path.to_string(),
                    content: String::new(),
                    encoding: Some("none".to_string()),
                }));
            }
            return Ok(ContentListing::File(RemoteFile {
                kind: EntryKind::File,
                name,
                path: path.to_string(),
                content: STANDARD.encode(content),
                encoding: Some("base64".to_string()),
            }));
        }

        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{}/", path)
        };

        let mut children: BTreeMap<String, EntryKind> = BTreeMap::new();
        for file_path in files.keys() {
            let Some(rest) = file_path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => children.insert(dir.to_string(), EntryKind::Dir),
                None => children.insert(rest.to_string(), EntryKind::File),
            };
        }

        if children.is_empty() && !path.is_empty() {
            return Err(TimError::RepoApi {
                host: "mock".to_string(),
                status: 404,
                message: format!("{} not found", path),
            });
        }

        Ok(ContentListing::Dir(
            children
                .into_iter()
                .map(|(name, kind)| ContentEntry {
                    kind,
                    path: format!("{}{}", prefix, name),
                    name,
                    url: None,
                })
                .collect(),
        ))
    }
}

impl HostClient for MockHost {
    fn kind(&self) -> HostKind {
        HostKind::GitHub
    }

    fn list_contents<'a>(
        &'a self,
        _repo: &'a Repo,
        path: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ContentListing>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let result = if self.failing.load(Ordering::SeqCst) {
                Err(TimError::RepoApi {
                    host: "mock".to_string(),
                    status: 500,
                    message: "unavailable".to_string(),
                })
            } else {
                self.listing(path.trim_matches('/'))
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        })
    }
}
