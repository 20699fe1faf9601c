use clap::{Parser, Subcommand};

use crate::commands::{fetch, import, new, select, templates};

#[derive(Debug, Parser)]
#[command(name = "tim")]
#[command(about = "Template Importer CLI", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// テンプレートカタログの一覧
    Templates(templates::Args),

    /// 依頼文からテンプレートを選択
    Select(select::Args),

    /// リポジトリのファイルを取得
    Fetch(fetch::Args),

    /// 名前を指定してテンプレートをインポート
    Import(import::Args),

    /// 依頼文からテンプレートを選んでインポート
    New(new::Args),
}
