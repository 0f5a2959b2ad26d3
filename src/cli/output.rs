//! CLI output formatting utilities.

use crate::artifacts::Artifact;
use crate::script::ScriptResult;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print a drafted script with its titles, captions and sources.
    pub fn script_result(result: &ScriptResult) {
        Output::header(&format!("Script ({})", result.mode));
        println!("{}", result.script);

        if !result.titles.is_empty() {
            Output::header("Titles");
            for title in &result.titles {
                Output::list_item(title);
            }
        }

        if !result.thumbnails.is_empty() {
            Output::header("Thumbnail captions");
            for caption in &result.thumbnails {
                Output::list_item(caption);
            }
        }

        if !result.image_prompt.is_empty() {
            Output::header("Image prompt");
            println!("{}", result.image_prompt);
        }

        if !result.sources.is_empty() {
            Output::header("Sources");
            for source in &result.sources {
                println!(
                    "  {} {} {}",
                    style("*").cyan(),
                    content_preview(&source.title, 80),
                    style(format!("({})", source.source)).dim()
                );
            }
        }
    }

    /// Print a written artifact.
    pub fn artifact(label: &str, artifact: &Artifact) {
        Output::kv(
            label,
            &format!("{} ({})", artifact.filepath, format_size(artifact.size)),
        );
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Format file size in human-readable format.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Truncate content with ellipsis, on character boundaries.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(content_preview("속보 뉴스", 2), "속보...");
        assert_eq!(content_preview("a\nb", 10), "a b");
    }
}
