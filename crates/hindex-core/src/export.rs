use crate::{compute_h_index, models::Article, Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Filename the download button has always used
pub const DEFAULT_EXPORT_FILE: &str = "hindex_articles.json";

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }
}

/// Exporter for an article list
pub struct Exporter;

impl Exporter {
    /// Export articles to a file with automatic format detection
    pub fn export_to_file<P: AsRef<Path>>(articles: &[Article], path: P) -> Result<()> {
        let path = path.as_ref();

        // Detect format from extension
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .ok_or_else(|| {
                Error::ExportError(
                    "Could not determine export format from extension. Use .json, .csv, or .md"
                        .to_string(),
                )
            })?;

        Self::export_to_file_with_format(articles, path, format)
    }

    /// Export articles to a file with explicit format
    pub fn export_to_file_with_format<P: AsRef<Path>>(
        articles: &[Article],
        path: P,
        format: ExportFormat,
    ) -> Result<()> {
        let content = Self::render(articles, format)?;

        let mut file = File::create(path)
            .map_err(|e| Error::ExportError(format!("Failed to create file: {}", e)))?;

        file.write_all(content.as_bytes())
            .map_err(|e| Error::ExportError(format!("Failed to write file: {}", e)))?;

        Ok(())
    }

    pub fn render(articles: &[Article], format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Self::to_json(articles),
            ExportFormat::Csv => Ok(Self::to_csv(articles)),
            ExportFormat::Markdown => Ok(Self::to_markdown(articles)),
        }
    }

    /// Indented JSON array of `{title, citations}`
    pub fn to_json(articles: &[Article]) -> Result<String> {
        serde_json::to_string_pretty(articles)
            .map_err(|e| Error::ExportError(format!("Failed to serialize JSON: {}", e)))
    }

    pub fn to_csv(articles: &[Article]) -> String {
        let mut output = String::from("Title,Citations\n");

        for article in articles {
            output.push_str(&format!(
                "{},{}\n",
                Self::escape_csv(&article.title),
                article.citations
            ));
        }

        output
    }

    /// Markdown table plus an H-index summary
    pub fn to_markdown(articles: &[Article]) -> String {
        let result = compute_h_index(&articles.iter().map(|a| a.citations).collect::<Vec<_>>());
        let mut output = String::new();

        output.push_str("# Publication List\n\n");
        output.push_str(&format!(
            "Exported {}\n\n",
            chrono::Utc::now().format("%Y-%m-%d")
        ));
        output.push_str(&format!(
            "**H-index:** {} | **Articles:** {} | **Total citations:** {}\n\n",
            result.h,
            articles.len(),
            articles.iter().map(|a| a.citations).sum::<u64>()
        ));

        if articles.is_empty() {
            output.push_str("_No articles yet._\n");
            return output;
        }

        output.push_str("| # | Title | Citations |\n");
        output.push_str("|---|-------|-----------|\n");
        for (i, article) in articles.iter().enumerate() {
            let title = if article.title.is_empty() {
                "(untitled)".to_string()
            } else {
                article.title.replace('|', "\\|")
            };
            output.push_str(&format!("| {} | {} | {} |\n", i + 1, title, article.citations));
        }

        output
    }

    /// Escape CSV special characters
    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
