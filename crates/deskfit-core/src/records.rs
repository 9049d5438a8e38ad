//! Stage output records
//!
//! Each stage emits free Markdown text. The wrappers only give the
//! orchestration boundary distinct types; the text is never parsed into
//! structured fields and is passed on verbatim.

use pulldown_cmark::{Event, Parser as MdParser, Tag, TagEnd};

macro_rules! stage_text {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Wrap stage output
            #[inline]
            #[must_use]
            pub fn new(text: impl Into<String>) -> Self {
                Self(text.into())
            }

            /// Text as produced by the stage
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the stage produced nothing but whitespace
            #[inline]
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Unwrap the text
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

stage_text!(
    /// Vision Analyzer output: enumerated ergonomic risks
    DetectedRisks
);
stage_text!(
    /// Risk Prioritizer output: the same risks in model-determined order
    PrioritizedRisks
);
stage_text!(
    /// Fix Synthesizer output: remediation steps per risk
    FixPlan
);
stage_text!(
    /// Product Finder output: product names with links, possibly empty
    ProductSuggestions
);

/// Markdown link found in product suggestions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLink {
    /// Link text
    pub name: String,
    /// Destination
    pub url: String,
}

impl ProductSuggestions {
    /// Section for runs where nothing purchasable was implied
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Links in document order, for diagnostics only
    #[must_use]
    pub fn links(&self) -> Vec<ProductLink> {
        let mut links = Vec::new();
        let mut current: Option<ProductLink> = None;

        for event in MdParser::new(&self.0) {
            match event {
                Event::Start(Tag::Link { dest_url, .. }) => {
                    current = Some(ProductLink {
                        name: String::new(),
                        url: dest_url.to_string(),
                    });
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some(link) = current.as_mut() {
                        link.name.push_str(&text);
                    }
                }
                Event::End(TagEnd::Link) => {
                    if let Some(link) = current.take() {
                        links.push(link);
                    }
                }
                _ => {}
            }
        }

        links
    }
}
