//! テンプレートのインポートフロー
//!
//! 依頼文 → テンプレート選択 → 取得（キャッシュ経由） → 選別 → バンドル組み立て。

use crate::bundle::{ImportMessageBuilder, ImportResult};
use crate::config::Settings;
use crate::content::{CacheStatus, ContentFetcher, ExpiringCache, RepoFile};
use crate::error::{Result, TimError};
use crate::filter::{FileSetFilter, FilteredFileSet};
use crate::host::{HostClientFactory, HostKind};
use crate::llm::HttpCompletionClient;
use crate::repo::Repo;
use crate::template::{TemplateCatalog, TemplateResolver, TemplateSelection, BLANK_TEMPLATE};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// `import` の結果
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub selection: TemplateSelection,
    #[serde(flatten)]
    pub result: ImportResult,
    /// バンドルに含めたファイル（失敗時は空）
    #[serde(skip)]
    pub files: FilteredFileSet,
}

/// インポートフローの組み立て役
///
/// キャッシュはインスタンスごとに1つ持ち、プロセス終了まで保持する。
pub struct Importer {
    catalog: Arc<TemplateCatalog>,
    resolver: TemplateResolver,
    cache: ExpiringCache,
    filter: FileSetFilter,
    builder: ImportMessageBuilder,
}

impl Importer {
    pub fn new(
        catalog: Arc<TemplateCatalog>,
        resolver: TemplateResolver,
        cache: ExpiringCache,
        filter: FileSetFilter,
    ) -> Self {
        Self {
            catalog,
            resolver,
            cache,
            filter,
            builder: ImportMessageBuilder::new(),
        }
    }

    /// 設定から実クライアントで組み立てる
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let catalog = Arc::new(match &settings.catalog {
            Some(path) => TemplateCatalog::load(path)?,
            None => TemplateCatalog::builtin()?,
        });

        let http = settings.http_config();
        let auth = settings.auth_provider();

        let completion = Arc::new(HttpCompletionClient::new(&http, &settings.llm, &auth));
        let resolver = TemplateResolver::new(catalog.clone(), completion);

        let host = HostClientFactory::from_settings(settings).create(HostKind::GitHub);
        let fetcher = ContentFetcher::new(host, settings.max_concurrent_requests);
        let cache = ExpiringCache::new(fetcher, settings.cache_ttl());
        tracing::debug!(
            templates = catalog.len(),
            ttl = ?cache.ttl(),
            "importer ready"
        );

        Ok(Self::new(
            catalog,
            resolver,
            cache,
            FileSetFilter::new(settings.metadata_dir.clone()),
        ))
    }

    /// 依頼文からテンプレートを選ぶ
    ///
    /// 通信失敗や解釈不能な応答は blank（タイトルなし）に落とす。
    pub async fn select_template(&self, request: &str) -> TemplateSelection {
        match self.resolver.resolve(request).await {
            Ok(Some(selection)) => selection,
            Ok(None) => TemplateSelection::blank(),
            Err(err) => {
                tracing::warn!(error = %err, "template selection failed, using blank");
                TemplateSelection::blank()
            }
        }
    }

    /// リポジトリのファイル一覧を取得（キャッシュ経由）
    pub async fn fetch(
        &self,
        repo: &Repo,
        path: &str,
    ) -> Result<(Vec<RepoFile>, CacheStatus)> {
        self.cache.get_with_status(repo, path).await
    }

    /// キャッシュに保持しているデータの取得日時
    pub fn fetched_at(&self, repo: &Repo, path: &str) -> Option<DateTime<Utc>> {
        self.cache.fetched_at(repo, path)
    }

    /// テンプレートのファイルを取得して選別する
    ///
    /// blank は空の集合を返す。カタログにない名前も blank として扱う。
    async fn collect_files(&self, template_id: &str) -> Result<FilteredFileSet> {
        let Some(template) = self.catalog.find(template_id) else {
            if template_id != BLANK_TEMPLATE {
                let err = TimError::TemplateNotFound(template_id.to_string());
                tracing::warn!(error = %err, "falling back to blank");
            }
            return Ok(FilteredFileSet::default());
        };
        if !template.has_repo() {
            tracing::debug!(template = %template.name, "no repository to fetch");
            return Ok(FilteredFileSet::default());
        }

        let repo = template.repo()?;
        let files = self.cache.get(&repo, "").await?;
        tracing::info!(
            template = %template.name,
            repo = %repo,
            files = files.len(),
            "loaded template"
        );

        Ok(self.filter.filter(files))
    }

    /// テンプレートを取得してインポート結果を組み立てる
    pub async fn get_templates(
        &self,
        template_id: &str,
        title: Option<&str>,
    ) -> Result<ImportResult> {
        self.assemble(template_id, title)
            .await
            .map(|(result, _)| result)
    }

    async fn assemble(
        &self,
        template_id: &str,
        title: Option<&str>,
    ) -> Result<(ImportResult, FilteredFileSet)> {
        let set = self.collect_files(template_id).await?;
        let result = match self.catalog.find(template_id) {
            Some(template) => self.builder.build(&template.name, &set, title),
            None => ImportResult::empty(title),
        };
        Ok((result, set))
    }

    /// 名前を指定してインポートし、失敗はエラー artifact に変換する
    pub async fn import_template(&self, template_id: &str, title: Option<&str>) -> ImportOutcome {
        let selection = TemplateSelection::new(template_id, title.unwrap_or_default());
        match self.assemble(template_id, title).await {
            Ok((result, files)) => ImportOutcome {
                selection,
                result,
                files,
            },
            Err(err) => {
                tracing::error!(
                    template = template_id,
                    transport = err.is_transport(),
                    error = %err,
                    "import failed"
                );
                ImportOutcome {
                    selection,
                    result: self.builder.error_artifact(&err.to_string()),
                    files: FilteredFileSet::default(),
                }
            }
        }
    }

    /// 依頼文からのインポート全体
    pub async fn import(&self, request: &str) -> ImportOutcome {
        let selection = self.select_template(request).await;
        if selection.is_blank() {
            tracing::info!("no template needed, importing blank");
        }
        let title = Some(selection.title.as_str()).filter(|t| !t.is_empty());
        let outcome = self.import_template(&selection.template_id, title).await;
        ImportOutcome {
            selection,
            ..outcome
        }
    }
}

#[cfg(test)]
#[path = "import_test.rs"]
mod tests;
