//! スターターテンプレートのカタログと選択

pub mod prompt;
pub mod resolver;

pub use resolver::TemplateResolver;

use crate::error::{Result, TimError};
use crate::repo::{self, Repo};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 空のプロジェクトを表す予約済みテンプレート名
pub const BLANK_TEMPLATE: &str = "blank";

/// タイトルが得られなかったときのプロジェクト名
pub const UNTITLED_PROJECT: &str = "Untitled Project";

const BUILTIN_CATALOG: &str = include_str!("template/catalog.toml");

/// カタログの1エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// `owner/repo` または `owner/repo@ref`
    ///
    /// blank エントリでは省略できる（省略時は取得しない）。
    #[serde(default)]
    pub github_repo: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// 選択結果がカタログにないときの代替先
    #[serde(default)]
    pub default: bool,
}

impl Template {
    /// 取得元リポジトリ
    pub fn repo(&self) -> Result<Repo> {
        repo::from_url(&self.github_repo)
    }

    pub fn is_blank(&self) -> bool {
        self.name == BLANK_TEMPLATE
    }

    /// 取得するリポジトリを持つか
    ///
    /// リポジトリ指定のない blank エントリは空のファイル集合として扱う。
    pub fn has_repo(&self) -> bool {
        !(self.is_blank() && self.github_repo.trim().is_empty())
    }
}

/// テンプレート選択結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSelection {
    pub template_id: String,
    pub title: String,
}

impl TemplateSelection {
    pub fn new(template_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            title: title.into(),
        }
    }

    /// 空テンプレート（タイトルなし）
    pub fn blank() -> Self {
        Self::new(BLANK_TEMPLATE, "")
    }

    pub fn is_blank(&self) -> bool {
        self.template_id == BLANK_TEMPLATE
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    templates: Vec<Template>,
}

/// テンプレートカタログ（記述順を保持）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<Template>) -> Result<Self> {
        let catalog = Self { templates };
        catalog.validate()?;
        Ok(catalog)
    }

    /// 組み込みカタログ
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    /// ファイルから読み込む
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.templates)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for template in &self.templates {
            if template.name.trim().is_empty() {
                return Err(TimError::Validation("template name must not be empty".into()));
            }
            if !seen.insert(template.name.as_str()) {
                return Err(TimError::Validation(format!(
                    "duplicate template name: {}",
                    template.name
                )));
            }
            if template.has_repo() {
                template.repo()?;
            }
        }
        Ok(())
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// 名前で検索
    pub fn find(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// 名前が選択可能か（カタログにあるか blank）
    pub fn accepts(&self, name: &str) -> bool {
        name == BLANK_TEMPLATE || self.find(name).is_some()
    }

    /// 代替テンプレート
    ///
    /// `default = true` の最初のエントリ、なければ先頭のエントリ。blank は対象外。
    pub fn fallback(&self) -> Option<&Template> {
        let mut candidates = self.templates.iter().filter(|t| !t.is_blank());
        let first = candidates.clone().next();
        candidates.find(|t| t.default).or(first)
    }

    /// カタログで上書きされた blank エントリ
    pub fn blank(&self) -> Option<&Template> {
        self.find(BLANK_TEMPLATE)
    }
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
