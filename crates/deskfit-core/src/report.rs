//! Report Assembler
//!
//! Pure concatenation of the four stage outputs under fixed headings.
//! Stage text is embedded verbatim; empty stages give empty sections.

use crate::records::{DetectedRisks, FixPlan, PrioritizedRisks, ProductSuggestions};

/// Report title
pub const REPORT_TITLE: &str = "## Workspace Optimization Report";

/// Closing remark appended after the four sections
pub const SUMMARY_SECTION: &str = "### Ergonomic Summary\n\n\
> \"Your workspace has great potential. With just a few adjustments, you can improve posture, \
reduce fatigue, and make your setup truly ergonomic.\"\n";

const RULE: &str = "---";

/// Fixed report sections, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Vision Analyzer output
    DetectedRisks,
    /// Risk Prioritizer output
    PrioritizedRisks,
    /// Fix Synthesizer output
    RecommendedFixes,
    /// Product Finder output
    ProductSuggestions,
}

impl Section {
    /// Sections in report order
    pub const ALL: [Section; 4] = [
        Self::DetectedRisks,
        Self::PrioritizedRisks,
        Self::RecommendedFixes,
        Self::ProductSuggestions,
    ];

    /// Markdown heading line
    #[inline]
    #[must_use]
    pub fn heading(&self) -> &'static str {
        match self {
            Self::DetectedRisks => "### Detected Risks",
            Self::PrioritizedRisks => "### Prioritized Risks",
            Self::RecommendedFixes => "### Recommended Fixes",
            Self::ProductSuggestions => "### Product Suggestions",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::DetectedRisks => 0,
            Self::PrioritizedRisks => 1,
            Self::RecommendedFixes => 2,
            Self::ProductSuggestions => 3,
        }
    }
}

/// Final Markdown document of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    markdown: String,
    bodies: [String; 4],
}

impl Report {
    /// Whole document
    #[inline]
    #[must_use]
    pub fn as_markdown(&self) -> &str {
        &self.markdown
    }

    /// Body of one section exactly as the stage produced it
    #[inline]
    #[must_use]
    pub fn section(&self, section: Section) -> &str {
        &self.bodies[section.index()]
    }

    /// Unwrap the document
    #[inline]
    #[must_use]
    pub fn into_markdown(self) -> String {
        self.markdown
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.markdown)
    }
}

/// Concatenate the stage outputs. Never fails.
#[must_use]
pub fn assemble(
    risks: &DetectedRisks,
    prioritized: &PrioritizedRisks,
    fixes: &FixPlan,
    products: &ProductSuggestions,
) -> Report {
    let bodies = [
        risks.as_str().to_string(),
        prioritized.as_str().to_string(),
        fixes.as_str().to_string(),
        products.as_str().to_string(),
    ];

    let mut markdown = String::with_capacity(bodies.iter().map(String::len).sum::<usize>() + 512);
    markdown.push_str(REPORT_TITLE);
    markdown.push_str("\n\n");

    for section in Section::ALL {
        markdown.push_str(section.heading());
        markdown.push_str("\n\n");
        let body = &bodies[section.index()];
        if !body.is_empty() {
            markdown.push_str(body);
            markdown.push_str("\n\n");
        }
        markdown.push_str(RULE);
        markdown.push_str("\n\n");
    }

    markdown.push_str(SUMMARY_SECTION);

    Report { markdown, bodies }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn assembles_in_fixed_order() {
        let report = assemble(
            &DetectedRisks::new("Risk: monitor too low"),
            &PrioritizedRisks::new("1. Monitor too low (high)"),
            &FixPlan::new("Raise monitor to eye level"),
            &ProductSuggestions::new("Monitor stand — $25 (link)"),
        );

        let expected = format!(
            "## Workspace Optimization Report\n\n\
             ### Detected Risks\n\nRisk: monitor too low\n\n---\n\n\
             ### Prioritized Risks\n\n1. Monitor too low (high)\n\n---\n\n\
             ### Recommended Fixes\n\nRaise monitor to eye level\n\n---\n\n\
             ### Product Suggestions\n\nMonitor stand — $25 (link)\n\n---\n\n\
             {SUMMARY_SECTION}"
        );
        assert_eq!(report.as_markdown(), expected);
        assert_eq!(report.section(Section::RecommendedFixes), "Raise monitor to eye level");
    }

    #[test]
    fn empty_products_section_still_present() {
        let report = assemble(
            &DetectedRisks::new("a"),
            &PrioritizedRisks::new("b"),
            &FixPlan::new("c"),
            &ProductSuggestions::none(),
        );
        let md = report.as_markdown();
        assert!(md.contains("### Product Suggestions\n\n---"));
        assert_eq!(report.section(Section::ProductSuggestions), "");
    }
}
