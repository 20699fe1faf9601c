//! 補完サービスによるテンプレート選択

use crate::error::{Result, TimError};
use crate::llm::CompletionClient;
use crate::template::prompt::build_selection_prompt;
use crate::template::{TemplateCatalog, TemplateSelection, BLANK_TEMPLATE, UNTITLED_PROJECT};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static TEMPLATE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<templateName>(.*?)</templateName>").expect("valid templateName regex")
});

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title>(.*?)</title>").expect("valid title regex"));

/// 応答テキストから選択結果を取り出す
///
/// `templateName` タグがなければ `TimError::Parse`。
/// `title` タグがなければ "Untitled Project"。
pub fn parse_selection(text: &str) -> Result<TemplateSelection> {
    let template_id = TEMPLATE_NAME_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .ok_or_else(|| TimError::Parse("missing <templateName> tag".to_string()))?;

    let title = TITLE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| UNTITLED_PROJECT.to_string());

    Ok(TemplateSelection::new(template_id, title))
}

/// テンプレート選択器
pub struct TemplateResolver {
    catalog: Arc<TemplateCatalog>,
    client: Arc<dyn CompletionClient>,
}

impl TemplateResolver {
    pub fn new(catalog: Arc<TemplateCatalog>, client: Arc<dyn CompletionClient>) -> Self {
        Self { catalog, client }
    }

    /// 依頼文からテンプレートを選ぶ
    ///
    /// 応答を解釈できなければ `Ok(None)`（呼び出し側は blank を使う）。
    /// 通信失敗は `Err` として返す。
    pub async fn resolve(&self, request: &str) -> Result<Option<TemplateSelection>> {
        let prompt = build_selection_prompt(&self.catalog);
        let reply = self.client.complete(&prompt, request).await?;

        match parse_selection(&reply) {
            Ok(parsed) => Ok(Some(self.validate(parsed))),
            Err(err) if err.is_recoverable() => {
                tracing::warn!(error = %err, "could not parse template selection");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// カタログにない名前を代替テンプレートに置き換える（タイトルは保持）
    pub fn validate(&self, parsed: TemplateSelection) -> TemplateSelection {
        if self.catalog.accepts(&parsed.template_id) {
            return parsed;
        }

        let fallback = self
            .catalog
            .fallback()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| BLANK_TEMPLATE.to_string());

        let err = TimError::TemplateNotFound(parsed.template_id);
        tracing::warn!(error = %err, fallback = %fallback, "using fallback template");

        TemplateSelection::new(fallback, parsed.title)
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
