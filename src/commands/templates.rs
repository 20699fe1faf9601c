//! tim templates コマンド
//!
//! テンプレートカタログの一覧を表示する。

use crate::config::Settings;
use crate::template::{Template, TemplateCatalog, BLANK_TEMPLATE};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Parser)]
pub struct Args {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CatalogJson<'a> {
    templates: &'a [Template],
}

pub async fn run(args: Args) -> Result<(), String> {
    let settings = Settings::load().map_err(|e| format!("Failed to load config: {}", e))?;
    let catalog = match &settings.catalog {
        Some(path) => TemplateCatalog::load(path),
        None => TemplateCatalog::builtin(),
    }
    .map_err(|e| format!("Failed to load catalog: {}", e))?;

    if args.json {
        print_json(&catalog)
    } else {
        print_table(&catalog);
        Ok(())
    }
}

fn print_json(catalog: &TemplateCatalog) -> Result<(), String> {
    let json = CatalogJson {
        templates: catalog.templates(),
    };
    serde_json::to_string_pretty(&json)
        .map(|json| println!("{json}"))
        .map_err(|e| format!("Failed to serialize catalog: {}", e))
}

fn print_table(catalog: &TemplateCatalog) {
    if catalog.is_empty() {
        println!("No templates in catalog, only {} is available", BLANK_TEMPLATE.cyan());
        return;
    }
    println!("{}", build_table(catalog));
    let count = catalog.templates().iter().filter(|t| !t.is_blank()).count();
    println!(
        "{} template(s), plus {} for scripts and trivial tasks",
        count,
        BLANK_TEMPLATE.cyan()
    );
}

fn build_table(catalog: &TemplateCatalog) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Label", "Repository", "Tags", "Default"]);

    let fallback = catalog.fallback().map(|t| t.name.as_str());
    for template in catalog.templates() {
        let is_fallback = fallback == Some(template.name.as_str());
        table.add_row(vec![
            template.name.as_str(),
            template.label.as_str(),
            template.github_repo.as_str(),
            &template.tags.join(", "),
            if is_fallback { "*" } else { "" },
        ]);
    }
    table
}

#[cfg(test)]
#[path = "templates_test.rs"]
mod tests;
