use crate::cli::Command;
use crate::config::Settings;
use crate::import::Importer;

pub mod fetch;
pub mod import;
pub mod new;
pub mod select;
pub mod templates;

pub async fn dispatch(cli: crate::cli::Cli) -> Result<(), String> {
    match cli.command {
        Command::Templates(args) => templates::run(args).await,
        Command::Select(args) => select::run(args).await,
        Command::Fetch(args) => fetch::run(args).await,
        Command::Import(args) => import::run(args).await,
        Command::New(args) => new::run(args).await,
    }
}

/// 設定を読み込んで Importer を組み立てる
pub(crate) fn load_importer() -> Result<Importer, String> {
    let settings = Settings::load().map_err(|e| format!("Failed to load config: {}", e))?;
    Importer::from_settings(&settings).map_err(|e| e.to_string())
}
