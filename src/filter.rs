//! インポート対象ファイルの選別
//!
//! 1. 固定ルールで除外（VCSメタデータ、ロックファイル、ツールのメタデータディレクトリ）
//! 2. `<metadata-dir>/ignore` のルールに一致したファイルを読み取り専用として記録
//!
//! ignore に一致したファイルもインポート対象から外さない。
//! `ignored` はメッセージに注記するための一覧であり、`files` の部分集合になる。

use crate::content::RepoFile;
use glob::{MatchOptions, Pattern};

/// バージョン管理メタデータのプレフィックス
pub const VCS_PREFIX: &str = ".git";

/// 常に除外する依存ロックファイル
pub const LOCK_FILES: &[&str] = &["package-lock.json", "yarn.lock", "pnpm-lock.yaml"];

/// メタデータディレクトリ内の ignore ファイル名
pub const IGNORE_FILE: &str = "ignore";

/// メタデータディレクトリ内のセットアップ手順ファイル名
pub const PROMPT_FILE: &str = "prompt";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// ignore ファイルの1行分
#[derive(Debug, Clone)]
struct IgnoreRule {
    source: String,
    patterns: Vec<Pattern>,
}

impl IgnoreRule {
    /// gitignore風の1行をglobパターン群に変換
    ///
    /// - 先頭 `/` はルートに固定
    /// - 末尾 `/` はディレクトリ配下のみに一致
    /// - `/` を含まないパターンは任意の深さのファイル名に一致
    /// - 一致したパスの配下もすべて一致
    fn compile(line: &str) -> Option<Self> {
        let mut body = line;
        let anchored = body.starts_with('/');
        body = body.trim_start_matches('/');
        let dir_only = body.ends_with('/');
        body = body.trim_end_matches('/');

        if body.is_empty() {
            return None;
        }

        let bases = if anchored || body.contains('/') {
            vec![body.to_string()]
        } else {
            vec![body.to_string(), format!("**/{}", body)]
        };

        let mut patterns = Vec::new();
        for base in bases {
            let mut candidates = vec![format!("{}/**", base)];
            if !dir_only {
                candidates.push(base);
            }
            for candidate in candidates {
                match Pattern::new(&candidate) {
                    Ok(pattern) => patterns.push(pattern),
                    Err(e) => {
                        tracing::warn!(rule = line, error = %e, "skipping invalid ignore rule");
                        return None;
                    }
                }
            }
        }

        Some(Self {
            source: line.to_string(),
            patterns,
        })
    }

    fn is_match(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(path, MATCH_OPTIONS))
    }
}

/// ignore ファイルから読み込んだルール集合（記述順）
#[derive(Debug, Clone, Default)]
pub struct IgnoreRuleSet {
    rules: Vec<IgnoreRule>,
}

impl IgnoreRuleSet {
    /// 1行1パターンでパース（前後の空白は除去、空行と `#` 行は無視）
    pub fn parse(content: &str) -> Self {
        let rules = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(IgnoreRule::compile)
            .collect();

        Self { rules }
    }

    /// いずれかのルールに一致するか
    pub fn is_match(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| rule.is_match(path))
    }

    /// 有効なルールの元の記述
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.source.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// 選別結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredFileSet {
    /// インポートするファイル
    pub files: Vec<RepoFile>,
    /// ignore ルールに一致したファイル（読み取り専用として注記する）
    pub ignored: Vec<RepoFile>,
    /// `<metadata-dir>/prompt` の内容
    pub setup_instructions: Option<String>,
}

/// インポート対象ファイルのフィルタ
#[derive(Debug, Clone)]
pub struct FileSetFilter {
    metadata_dir: String,
}

impl FileSetFilter {
    pub fn new(metadata_dir: impl Into<String>) -> Self {
        Self {
            metadata_dir: metadata_dir.into(),
        }
    }

    pub fn metadata_dir(&self) -> &str {
        &self.metadata_dir
    }

    /// ignore ファイルのパス
    pub fn ignore_path(&self) -> String {
        format!("{}/{}", self.metadata_dir, IGNORE_FILE)
    }

    /// セットアップ手順ファイルのパス
    pub fn prompt_path(&self) -> String {
        format!("{}/{}", self.metadata_dir, PROMPT_FILE)
    }

    /// 固定ルールで除外されるか（大文字小文字を区別する前方一致 / 完全一致）
    pub fn is_excluded(&self, file: &RepoFile) -> bool {
        file.path.starts_with(VCS_PREFIX)
            || LOCK_FILES.contains(&file.name.as_str())
            || file.path.starts_with(&self.metadata_dir)
    }

    /// ファイル一覧を選別
    ///
    /// ignore / prompt ファイルは除外前の一覧から探す（どちらもメタデータディレクトリ内にあるため）。
    pub fn filter(&self, files: Vec<RepoFile>) -> FilteredFileSet {
        let ignore_path = self.ignore_path();
        let prompt_path = self.prompt_path();

        let rules = files
            .iter()
            .find(|f| f.path == ignore_path)
            .map(|f| IgnoreRuleSet::parse(&f.content))
            .unwrap_or_default();

        let setup_instructions = files
            .iter()
            .find(|f| f.path == prompt_path)
            .map(|f| f.content.clone());

        let files: Vec<RepoFile> = files
            .into_iter()
            .filter(|f| !self.is_excluded(f))
            .collect();

        let ignored: Vec<RepoFile> = if rules.is_empty() {
            Vec::new()
        } else {
            files
                .iter()
                .filter(|f| rules.is_match(&f.path))
                .cloned()
                .collect()
        };

        tracing::debug!(
            files = files.len(),
            ignored = ignored.len(),
            rules = rules.len(),
            patterns = ?rules.patterns().collect::<Vec<_>>(),
            metadata_dir = self.metadata_dir(),
            "filtered template files"
        );

        FilteredFileSet {
            files,
            ignored,
            setup_instructions,
        }
    }
}

impl Default for FileSetFilter {
    fn default() -> Self {
        Self::new(".bolt")
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;

#[cfg(test)]
#[path = "filter_proptests.rs"]
mod proptests;
