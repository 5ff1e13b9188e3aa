//! Markdown batch report generation

use crate::fetcher::BatchResult;
use crate::output::stats::BatchStatistics;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report of a batch to a file
///
/// # Arguments
///
/// * `result` - The batch result
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn write_markdown_report(result: &BatchResult, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(result);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a batch result as markdown
pub fn format_markdown_report(result: &BatchResult) -> String {
    let stats = BatchStatistics::from_result(result);
    let mut md = String::new();

    md.push_str("# Krio-Fetch Batch Report\n\n");

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **URLs Requested**: {}\n", stats.total));
    md.push_str(&format!("- **Succeeded**: {}\n", stats.succeeded));
    md.push_str(&format!("- **Failed**: {}\n", stats.failed()));
    md.push_str(&format!("- **Cancelled**: {}\n", stats.cancelled()));
    md.push_str(&format!("- **Success Rate**: {:.2}%\n\n", stats.success_rate()));

    md.push_str("## Results\n\n");
    md.push_str("| # | URL | Status | Title | Chars |\n");
    md.push_str("|---|-----|--------|-------|-------|\n");

    for (index, outcome) in result.iter().enumerate() {
        let (status, title, chars) = match &outcome.result {
            Ok(document) => (
                "ok".to_string(),
                escape_cell(&document.title),
                document.content.chars().count().to_string(),
            ),
            Err(e) => (format!("{:?}", e.kind()), String::new(), "-".to_string()),
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            index + 1,
            escape_cell(&outcome.url),
            status,
            title,
            chars
        ));
    }
    md.push('\n');

    if !stats.failures.is_empty() {
        md.push_str("## Errors\n\n");
        for (url, message) in &stats.failures {
            md.push_str(&format!("- `{}`: {}\n", url, message));
        }
        md.push('\n');
    }

    md
}

/// Keeps table cells on one line and escapes column separators
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(&['\n', '\r'][..], " ")
}
