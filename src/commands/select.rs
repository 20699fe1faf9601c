//! tim select コマンド
//!
//! 依頼文に合うテンプレートを補完サービスに選ばせる。

use crate::commands::load_importer;
use crate::output::{print_selection, spinner};
use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// What you want to build
    pub request: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: Args) -> Result<(), String> {
    let importer = load_importer()?;

    let pb = spinner("Selecting template...");
    let selection = importer.select_template(&args.request).await;
    pb.finish_and_clear();

    if args.json {
        serde_json::to_string_pretty(&selection)
            .map(|json| println!("{json}"))
            .map_err(|e| format!("Failed to serialize selection: {}", e))
    } else {
        print_selection(&selection);
        Ok(())
    }
}
