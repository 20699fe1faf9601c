//! インポート結果（バンドルと指示メッセージ）の組み立て

use crate::content::RepoFile;
use crate::error::{Result, TimError};
use crate::filter::FilteredFileSet;
use crate::template::BLANK_TEMPLATE;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

/// バンドルの artifact id
pub const BUNDLE_ID: &str = "imported-files";

/// タイトル未指定時のバンドル名
pub const DEFAULT_BUNDLE_TITLE: &str = "Importing Starter Files";

/// 指示メッセージの末尾に必ず置く文
pub const CLOSING_DIRECTIVE: &str = "The starter template has been imported. \
Continue with my original request. Do not recreate or overwrite any file that already exists in the project.";

const PERMITTED_ACTIONS: &[&str] = &[
    "Import these files as dependencies",
    "Read from these files",
    "Reference these files",
];

const FORBIDDEN_ACTIONS: &[&str] = &[
    "Modify any content within these files",
    "Delete these files",
    "Rename these files",
    "Move these files",
    "Recreate or write new versions of these files",
];

/// インポートの出力
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    /// ファイルを束ねた artifact
    pub bundle: String,
    /// 人が読む指示メッセージ
    pub instructions: String,
}

impl ImportResult {
    /// ファイルなしのインポート（blank テンプレート用）
    pub fn empty(title: Option<&str>) -> Self {
        ImportMessageBuilder::new().build(BLANK_TEMPLATE, &FilteredFileSet::default(), title)
    }
}

/// バンドルと指示メッセージのビルダー
#[derive(Debug, Clone, Default)]
pub struct ImportMessageBuilder;

impl ImportMessageBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 選別済みファイルからインポート結果を組み立てる
    pub fn build(
        &self,
        template_id: &str,
        set: &FilteredFileSet,
        title: Option<&str>,
    ) -> ImportResult {
        tracing::debug!(
            template = template_id,
            files = set.files.len(),
            ignored = set.ignored.len(),
            "building import message"
        );

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_BUNDLE_TITLE);

        ImportResult {
            bundle: render_bundle(title, &set.files),
            instructions: render_instructions(set),
        }
    }

    /// 失敗を利用者向けの artifact と謝罪文に変換する
    pub fn error_artifact(&self, message: &str) -> ImportResult {
        let bundle = format!(
            "<artifact id=\"{}\" title=\"Import Failed\" type=\"error\">\n{}\n</artifact>",
            BUNDLE_ID,
            message.trim()
        );
        let instructions = format!(
            "Sorry, the starter template could not be imported ({}). \
             Please continue with my original request without a template.",
            message.trim()
        );
        ImportResult {
            bundle,
            instructions,
        }
    }
}

fn render_bundle(title: &str, files: &[RepoFile]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<artifact id=\"{}\" title=\"{}\" type=\"bundled\">",
        BUNDLE_ID,
        escape_attr(title)
    );
    for file in files {
        let _ = writeln!(
            out,
            "<action type=\"file\" filePath=\"{}\">\n{}\n</action>",
            escape_attr(&file.path),
            file.content
        );
    }
    out.push_str("</artifact>");
    out
}

fn render_instructions(set: &FilteredFileSet) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if let Some(setup) = set
        .setup_instructions
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        blocks.push(format!("TEMPLATE INSTRUCTIONS:\n{}", setup));
    }

    if !set.ignored.is_empty() {
        blocks.push(render_access_rules(&set.ignored));
    }

    blocks.push(CLOSING_DIRECTIVE.to_string());
    blocks.join("\n\n---\n\n")
}

fn render_access_rules(ignored: &[RepoFile]) -> String {
    let mut out = String::from(
        "STRICT FILE ACCESS RULES - READ CAREFULLY:\n\n\
         The following files are READ-ONLY and must never be modified:\n",
    );
    for file in ignored {
        let _ = writeln!(out, "- {}", file.path);
    }

    out.push_str("\nPermitted actions:\n");
    for action in PERMITTED_ACTIONS {
        let _ = writeln!(out, "+ {}", action);
    }

    out.push_str("\nStrictly forbidden actions:\n");
    for action in FORBIDDEN_ACTIONS {
        let _ = writeln!(out, "x {}", action);
    }

    out.push_str(
        "\nIf functionality needs to change, create new files instead of modifying the protected ones listed above.",
    );
    out
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// インポート対象ファイルをディレクトリに書き出す
///
/// 絶対パスや `..` を含むパスは `TimError::Validation`。
pub fn write_files(dir: &Path, files: &[RepoFile]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let relative = Path::new(&file.path);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe || file.path.is_empty() {
            return Err(TimError::Validation(format!(
                "refusing to write outside the output directory: {}",
                file.path
            )));
        }

        let target = dir.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &file.content)?;
        tracing::debug!(path = %target.display(), "wrote file");
        written.push(target);
    }

    Ok(written)
}

#[cfg(test)]
#[path = "bundle_test.rs"]
mod tests;
