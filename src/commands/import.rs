//! tim import コマンド
//!
//! 名前を指定してテンプレートを取得し、バンドルと指示メッセージを出力する。

use crate::bundle::{write_files, ImportResult};
use crate::commands::load_importer;
use crate::filter::FilteredFileSet;
use crate::import::Importer;
use crate::output::{spinner, CommandSummary};
use crate::template::TemplateSelection;
use chrono::{DateTime, Utc};
use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
pub struct Args {
    /// Template name from the catalog (or "blank")
    pub template: String,

    /// Project title used for the bundle
    #[arg(long)]
    pub title: Option<String>,

    /// Write the importable files under this directory
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// JSON 出力
#[derive(Debug, Serialize)]
pub(crate) struct ImportJson<'a> {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<&'a TemplateSelection>,
    #[serde(flatten)]
    pub result: &'a ImportResult,
    pub ignored: Vec<&'a str>,
}

impl<'a> ImportJson<'a> {
    pub fn new(
        selection: Option<&'a TemplateSelection>,
        result: &'a ImportResult,
        set: &'a FilteredFileSet,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            selection,
            result,
            ignored: set.ignored.iter().map(|f| f.path.as_str()).collect(),
        }
    }
}

pub async fn run(args: Args) -> Result<(), String> {
    let importer = load_importer()?;
    execute(&importer, &args).await
}

pub(crate) async fn execute(importer: &Importer, args: &Args) -> Result<(), String> {
    let pb = spinner(&format!("Importing {}...", args.template));
    let outcome = importer
        .import_template(&args.template, args.title.as_deref())
        .await;
    pb.finish_and_clear();

    emit(
        None,
        &outcome.result,
        &outcome.files,
        args.out.as_deref(),
        args.json,
    )
}

/// 結果を表示し、必要ならファイルを書き出す
pub(crate) fn emit(
    selection: Option<&TemplateSelection>,
    result: &ImportResult,
    set: &FilteredFileSet,
    out: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    if json {
        let body = ImportJson::new(selection, result, set);
        serde_json::to_string_pretty(&body)
            .map(|json| println!("{json}"))
            .map_err(|e| format!("Failed to serialize import: {}", e))?;
    } else {
        if let Some(selection) = selection {
            crate::output::print_selection(selection);
            println!();
        }
        println!("{}", result.bundle);
        println!();
        println!("{}", result.instructions);
    }

    if let Some(dir) = out {
        let written = write_files(dir, &set.files)
            .map_err(|e| format!("Failed to write files to {}: {}", dir.display(), e))?;
        let summary = CommandSummary::format(written.len(), set.ignored.len());
        let location = format!("({})", dir.display());
        eprintln!("{} {}", summary, location.dimmed());
    }

    Ok(())
}

#[cfg(test)]
#[path = "import_test.rs"]
mod tests;
