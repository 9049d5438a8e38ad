//! The four pipeline stages
//!
//! Each stage performs its upstream calls and wraps the model's text in a
//! typed record. Stages never retry and never inspect the text beyond
//! passing it on.

mod fixes;
mod priority;
mod products;
mod vision;

pub use fixes::FixSynthesizer;
pub use priority::RiskPrioritizer;
pub use products::ProductFinder;
pub use vision::VisionAnalyzer;
