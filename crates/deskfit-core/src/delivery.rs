//! Delivery Surface
//!
//! Displays the report and packages it as a downloadable `.md` file.
//! Content is never transformed on the way out.

use crate::report::Report;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Downloadable report file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFile {
    /// File name, always ending in `.md`
    pub name: String,
    /// Report Markdown, unchanged
    pub content: String,
}

impl DownloadFile {
    /// MIME type offered with the download
    pub const MEDIA_TYPE: &'static str = "text/markdown";

    /// Write into `dir`, replacing any previous report of the same name
    ///
    /// # Errors
    /// Any error creating `dir` or writing the file.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.name);
        std::fs::write(&path, self.content.as_bytes())?;
        Ok(path)
    }
}

/// Display the report
///
/// # Errors
/// Any error from `out`.
pub fn render(report: &Report, out: &mut impl Write) -> std::io::Result<()> {
    out.write_all(report.as_markdown().as_bytes())?;
    out.flush()
}

/// Package the report for download. A name without the `.md` extension
/// gets one appended.
#[must_use]
pub fn download(report: &Report, file_name: &str) -> DownloadFile {
    let name = if file_name.ends_with(".md") {
        file_name.to_string()
    } else {
        format!("{file_name}.md")
    };
    DownloadFile {
        name,
        content: report.as_markdown().to_string(),
    }
}

/// HTML rendering of the report for browsers
#[must_use]
pub fn to_html(report: &Report) -> String {
    let parser = pulldown_cmark::Parser::new_ext(
        report.as_markdown(),
        pulldown_cmark::Options::ENABLE_TABLES,
    );
    let mut body = String::new();
    pulldown_cmark::html::push_html(&mut body, parser);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Workspace Optimization Report</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{DetectedRisks, FixPlan, PrioritizedRisks, ProductSuggestions};
    use crate::report::assemble;

    fn sample() -> Report {
        assemble(
            &DetectedRisks::new("| Area | Concern |\n|------|---------|\n| Monitor | too low |"),
            &PrioritizedRisks::new("1. Monitor too low (high)"),
            &FixPlan::new("- Raise monitor to eye level"),
            &ProductSuggestions::new("- [Monitor Riser](https://shop.example/riser)"),
        )
    }

    #[test]
    fn render_writes_markdown_unchanged() {
        let report = sample();
        let mut out = Vec::new();
        render(&report, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), report.as_markdown());
    }

    #[test]
    fn download_appends_extension() {
        let report = sample();
        assert_eq!(download(&report, "report").name, "report.md");
        let file = download(&report, "workspace_optimization_report.md");
        assert_eq!(file.name, "workspace_optimization_report.md");
        assert_eq!(file.content, report.as_markdown());
    }

    #[test]
    fn write_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample();
        let path = download(&report, "out.md").write_to(&dir.path().join("nested")).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), report.as_markdown());
    }

    #[test]
    fn html_renders_tables_and_links() {
        let html = to_html(&sample());
        assert!(html.contains("<table>"));
        assert!(html.contains("<a href=\"https://shop.example/riser\">Monitor Riser</a>"));
        assert!(html.contains("<h3>Detected Risks</h3>"));
    }
}
