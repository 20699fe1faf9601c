//! tim fetch コマンド
//!
//! リポジトリ（またはそのサブパス）のファイルを再帰的に取得して一覧する。

use crate::commands::load_importer;
use crate::content::RepoFile;
use crate::output::{cache_label, spinner};
use crate::repo;
use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// owner/repo[@ref] or a GitHub URL
    pub repo: String,

    /// Sub-path inside the repository
    #[arg(long, default_value = "")]
    pub path: String,

    /// Output in JSON format (includes file contents)
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: Args) -> Result<(), String> {
    let repo = repo::from_url(&args.repo).map_err(|e| e.to_string())?;
    let importer = load_importer()?;

    let pb = spinner(&format!("Fetching {}...", repo));
    let fetched = importer.fetch(&repo, args.path.trim_matches('/')).await;
    pb.finish_and_clear();

    let (mut files, status) = fetched.map_err(|e| format!("Failed to fetch {}: {}", repo, e))?;
    files.sort_by(|a, b| a.path.cmp(&b.path));

    if args.json {
        return serde_json::to_string_pretty(&files)
            .map(|json| println!("{json}"))
            .map_err(|e| format!("Failed to serialize files: {}", e));
    }

    for line in listing(&files) {
        println!("{line}");
    }
    println!("{} file(s) from {} ({})", files.len(), repo, cache_label(status));
    if let Some(at) = importer.fetched_at(&repo, args.path.trim_matches('/')) {
        println!("fetched at {}", at.to_rfc3339());
    }
    Ok(())
}

fn listing(files: &[RepoFile]) -> Vec<String> {
    files
        .iter()
        .map(|f| format!("{:>8}  {}", f.content.len(), f.path))
        .collect()
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
