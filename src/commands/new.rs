//! tim new コマンド
//!
//! 依頼文からテンプレートを選び、そのままインポートする。
//! 取得や選択の失敗はエラー artifact として出力される。

use crate::commands::import::emit;
use crate::commands::load_importer;
use crate::output::spinner;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
pub struct Args {
    /// What you want to build
    pub request: String,

    /// Write the importable files under this directory
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: Args) -> Result<(), String> {
    let importer = load_importer()?;

    let pb = spinner("Selecting and importing template...");
    let outcome = importer.import(&args.request).await;
    pb.finish_and_clear();

    emit(
        Some(&outcome.selection),
        &outcome.result,
        &outcome.files,
        args.out.as_deref(),
        args.json,
    )
}
