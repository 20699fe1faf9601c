use crate::content::CacheStatus;
use crate::template::TemplateSelection;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

pub struct CommandSummary {
    pub prefix: String,
    pub message: String,
}

impl CommandSummary {
    /// 書き出し結果の1行サマリ
    pub fn format(written: usize, ignored: usize) -> Self {
        match (written, ignored) {
            (0, _) => Self {
                prefix: "•".yellow().to_string(),
                message: "No files to write (blank template)".to_string(),
            },
            (w, 0) => Self {
                prefix: "✓".green().to_string(),
                message: format!("{} file(s) written", w.green()),
            },
            (w, i) => Self {
                prefix: "✓".green().to_string(),
                message: format!("{} file(s) written, {} marked read-only", w.green(), i.yellow()),
            },
        }
    }
}

impl std::fmt::Display for CommandSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.prefix, self.message)
    }
}

/// ネットワーク処理中のスピナー
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// キャッシュ状態の表示ラベル
pub fn cache_label(status: CacheStatus) -> String {
    match status {
        CacheStatus::Fresh => "cached".cyan().to_string(),
        CacheStatus::Refreshed => "fetched".green().to_string(),
        CacheStatus::StaleFallback => "stale (fetch failed)".yellow().to_string(),
    }
}

/// 選択結果を表示
pub fn print_selection(selection: &TemplateSelection) {
    println!("{} {}", "Template:".bold(), selection.template_id.green());
    if !selection.title.is_empty() {
        println!("{} {}", "Title:".bold(), selection.title);
    }
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;
