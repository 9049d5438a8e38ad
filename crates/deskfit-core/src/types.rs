//! Core types for deskfit
//!
//! Defines the form-level data of a report run:
//! - Focus area and improvement goal selections
//! - The uploaded workspace photo
//! - The immutable workspace input for one run
//! - Run identity, stages, and run status

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use std::str::FromStr;
use ulid::Ulid;

/// Ergonomic concern category conditioning the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusArea {
    /// Seating, monitor height, arm and wrist angles
    Posture,
    /// Desk layout and clutter
    Organization,
    /// Everything
    FullAssessment,
}

impl FocusArea {
    /// All selectable focus areas in form order
    pub const ALL: [FocusArea; 3] = [Self::Posture, Self::Organization, Self::FullAssessment];

    /// Label shown to the user and written into prompts
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Posture => "Posture Correction",
            Self::Organization => "Desk Organization",
            Self::FullAssessment => "Full Ergonomic Assessment",
        }
    }

    /// Command-line slug
    #[inline]
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Posture => "posture",
            Self::Organization => "organization",
            Self::FullAssessment => "full-assessment",
        }
    }

    /// What the analyzer should pay most attention to
    #[must_use]
    pub fn emphasis(&self) -> &'static str {
        match self {
            Self::Posture => {
                "seating posture, monitor height and distance, arm, wrist and hand placement"
            }
            Self::Organization => {
                "desk layout, reach distances, cable and item clutter, lighting and screen glare"
            }
            Self::FullAssessment => {
                "posture, monitor height, chair position, hand placement, lighting and clutter"
            }
        }
    }
}

impl std::fmt::Display for FocusArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrecognized focus area selection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown focus area '{0}' (expected posture, organization or full-assessment)")]
pub struct UnknownFocusArea(pub String);

impl FromStr for FocusArea {
    type Err = UnknownFocusArea;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "posture" | "posture-correction" => Ok(Self::Posture),
            "organization" | "desk-organization" => Ok(Self::Organization),
            "full-assessment" | "full" | "full-ergonomic-assessment" => Ok(Self::FullAssessment),
            _ => Err(UnknownFocusArea(s.to_string())),
        }
    }
}

/// Primary improvement goal, enumerated or free text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImprovementGoal {
    /// Reduce physical strain
    ReduceStrain,
    /// Boost productivity
    BoostProductivity,
    /// Create a calmer space
    CalmerSpace,
    /// Maximize space efficiency
    SpaceEfficiency,
    /// Anything the user typed
    Custom(String),
}

impl ImprovementGoal {
    /// Enumerated goals in form order
    pub const PRESETS: [ImprovementGoal; 4] = [
        Self::ReduceStrain,
        Self::BoostProductivity,
        Self::CalmerSpace,
        Self::SpaceEfficiency,
    ];

    /// Text written into prompts
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ReduceStrain => "Reduce Strain",
            Self::BoostProductivity => "Boost Productivity",
            Self::CalmerSpace => "Create a Calmer Space",
            Self::SpaceEfficiency => "Maximize Space Efficiency",
            Self::Custom(text) => text,
        }
    }

    /// Parse a slug, a preset label, or free text. Blank text is `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        let normalized = trimmed.to_lowercase().replace(['_', ' '], "-");
        let goal = match normalized.as_str() {
            "reduce-strain" => Self::ReduceStrain,
            "boost-productivity" => Self::BoostProductivity,
            "calmer-space" | "create-a-calmer-space" => Self::CalmerSpace,
            "space-efficiency" | "maximize-space-efficiency" => Self::SpaceEfficiency,
            _ => Self::Custom(trimmed.to_string()),
        };
        Some(goal)
    }
}

impl std::fmt::Display for ImprovementGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uploaded workspace photo
///
/// File type and size are not checked; unknown formats pass through as JPEG.
#[derive(Clone, PartialEq, Eq)]
pub struct WorkspaceImage {
    bytes: Vec<u8>,
    media_type: &'static str,
}

impl WorkspaceImage {
    /// Wrap raw bytes, sniffing the media type from magic bytes first and the
    /// file name second
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>, file_name: Option<&str>) -> Self {
        let media_type = sniff_media_type(&bytes)
            .or_else(|| file_name.and_then(media_type_for_name))
            .unwrap_or("image/jpeg");
        Self { bytes, media_type }
    }

    /// Read a photo from disk
    ///
    /// # Errors
    /// Any error reading the file.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path.file_name().and_then(|n| n.to_str());
        Ok(Self::from_bytes(bytes, name))
    }

    /// Raw bytes
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type sent to the model
    #[inline]
    #[must_use]
    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    /// Size in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the upload carried no data
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 `data:` URL for inline image content
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }
}

impl std::fmt::Debug for WorkspaceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceImage")
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

fn media_type_for_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Immutable input of one report run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceInput {
    /// Workspace photo
    pub image: WorkspaceImage,
    /// Selected focus area
    pub focus_area: FocusArea,
    /// Improvement goal
    pub goal: ImprovementGoal,
}

/// Unique run identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(pub Ulid);

impl RunId {
    /// Generate new run ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four sequential pipeline steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Image-grounded risk detection
    Analyze,
    /// Severity ordering
    Prioritize,
    /// Remediation steps
    Synthesize,
    /// Product lookup
    FindProducts,
}

impl Stage {
    /// Stages in execution order
    pub const ALL: [Stage; 4] = [
        Self::Analyze,
        Self::Prioritize,
        Self::Synthesize,
        Self::FindProducts,
    ];

    /// 1-based position in the pipeline
    #[inline]
    #[must_use]
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Analyze => 1,
            Self::Prioritize => 2,
            Self::Synthesize => 3,
            Self::FindProducts => 4,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Analyze => "vision analysis",
            Self::Prioritize => "risk prioritization",
            Self::Synthesize => "fix synthesis",
            Self::FindProducts => "product search",
        };
        f.write_str(name)
    }
}

/// Run lifecycle, observable while a run is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Not started
    NotStarted,
    /// A stage is running
    Running(Stage),
    /// Report produced
    Completed,
    /// Stopped at the first failure
    Failed(Option<Stage>),
    /// Aborted by the user between stages
    Cancelled,
}

impl RunStatus {
    /// Whether the run has finished one way or another
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_) | Self::Cancelled)
    }
}
