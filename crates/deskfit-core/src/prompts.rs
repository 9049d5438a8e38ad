//! Prompt templates for the four stages
//!
//! Wording is tunable; only the interpolated inputs are load-bearing.

use crate::types::{FocusArea, ImprovementGoal};

/// Sentinel the query extractor returns when nothing is purchasable
pub const NO_PRODUCTS_SENTINEL: &str = "NONE";

/// Vision Analyzer system instructions
#[must_use]
pub fn analyzer_instructions(focus: FocusArea, goal: &ImprovementGoal) -> String {
    format!(
        "You are a Posture & Setup Analyzer. You examine photos of desk setups and detect \
         posture risks and ergonomic flaws.\n\
         - Study the uploaded desk setup photo.\n\
         - The user selected the focus area \"{focus}\": pay particular attention to {emphasis}.\n\
         - The user's primary improvement goal is \"{goal}\".\n\
         - Identify ergonomic risks such as slouched seating, a low monitor, awkward arm \
         positioning or a cluttered workspace. Only report what is visible in the photo.\n\
         - Provide findings as Markdown using this format:\n\n\
         | Area | Concern |\n|------|---------|\n| ... | ... |",
        focus = focus.label(),
        emphasis = focus.emphasis(),
        goal = goal.as_str(),
    )
}

/// Vision Analyzer user message
pub const ANALYZER_PROMPT: &str = "Analyze the desk image and report ergonomic issues.";

/// Risk Prioritizer system instructions
pub const PRIORITIZER_INSTRUCTIONS: &str = "You are an Ergonomic Risk Evaluator. You assess the \
severity of ergonomic risks and prioritize them.\n\
- Review the identified ergonomic issues.\n\
- Explain how each might affect physical health or productivity over time.\n\
- List every issue exactly once, most urgent first, labelling each with a severity of \
high, medium or low.\n\
- Respond in Markdown.";

/// Fix Synthesizer system instructions
pub const FIX_INSTRUCTIONS: &str = "You are a Fix Advisor. You recommend specific changes based \
on posture and workspace issues.\n\
- Using the prioritized risks and the user's selected focus and improvement goal, suggest \
step-by-step ergonomic fixes, one group per risk, in the same order.\n\
- Include actionable, low-cost and high-impact tips.\n\
- Respond in Markdown as a bulleted list, for example:\n\
- Adjust chair height to...\n- Reposition monitor to...\n- Add wrist support to...";

/// Fix Synthesizer user message
#[must_use]
pub fn fix_prompt(prioritized: &str, focus: FocusArea, goal: &ImprovementGoal) -> String {
    format!("{prioritized}\n\nFocus: {focus}\nGoal: {goal}")
}

/// Product query extraction instructions
#[must_use]
pub fn query_instructions(max_queries: usize) -> String {
    format!(
        "You turn ergonomic fixes into shopping searches.\n\
         - Read the recommended fixes and pick the ones that require buying an accessory, \
         such as monitor risers, footrests, wrist pads or lumbar cushions.\n\
         - Output at most {max_queries} short product search queries, one per line, with no \
         numbering, bullets or commentary.\n\
         - If no fix requires a purchase, output exactly {NO_PRODUCTS_SENTINEL}."
    )
}

/// Product formatting instructions
pub const PRODUCT_INSTRUCTIONS: &str = "You are a Workspace Product Finder. You recommend \
ergonomic accessories based on the user's desk setup issues and preferences.\n\
- Based on the fixes and the search results provided, recommend 8-10 product links.\n\
- Use only links that appear in the search results.\n\
- Only include actual product links, no blogs or reviews.\n\
- Respond in Markdown, for example:\n\
> *Suggested tools to optimize your setup:*\n\n\
- [Footrest Cushion](https://example.com)\n- [Monitor Riser](https://example.com)";

/// Product formatting user message: fixes plus numbered raw hits per query
#[must_use]
pub fn product_prompt(fixes: &str, results: &[(String, Vec<crate::backend::SearchHit>)]) -> String {
    let mut prompt = format!("Recommended fixes:\n\n{fixes}\n\nSearch results:\n");
    for (query, hits) in results {
        prompt.push_str(&format!("\nQuery: {query}\n"));
        for (rank, hit) in hits.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. {} | {} | {}\n",
                rank + 1,
                hit.title,
                hit.link,
                hit.snippet
            ));
        }
    }
    prompt
}

/// Split the extractor's reply into queries
///
/// Strips list markers and blank lines; the sentinel yields no queries.
#[must_use]
pub fn parse_queries(reply: &str, max_queries: usize) -> Vec<String> {
    let mut queries: Vec<String> = Vec::new();
    for line in reply.lines() {
        if queries.len() >= max_queries {
            break;
        }
        let cleaned = strip_list_marker(line.trim()).trim().trim_matches('"').trim();
        if cleaned.is_empty() || cleaned.eq_ignore_ascii_case(NO_PRODUCTS_SENTINEL) {
            continue;
        }
        if !queries.iter().any(|q| q.eq_ignore_ascii_case(cleaned)) {
            queries.push(cleaned.to_string());
        }
    }
    queries
}

fn strip_list_marker(line: &str) -> &str {
    let marker_end = if line.starts_with(['-', '*', '•']) {
        line.chars().next().map_or(0, char::len_utf8)
    } else {
        let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits > 0 && line[digits..].starts_with(['.', ')']) {
            digits + 1
        } else {
            0
        }
    };
    // a marker is only a marker when whitespace or the line end follows it
    let rest = &line[marker_end..];
    if marker_end > 0 && rest.chars().next().map_or(true, char::is_whitespace) {
        rest
    } else {
        line
    }
}
