//! Preference Collector
//!
//! Gathers the form fields of one run and freezes them into a
//! [`WorkspaceInput`]. Only presence is checked.

use crate::error::MissingInputError;
use crate::types::{FocusArea, ImprovementGoal, WorkspaceImage, WorkspaceInput};

/// Form state before submission
#[derive(Debug, Clone, Default)]
pub struct PreferenceForm {
    image: Option<WorkspaceImage>,
    focus_area: Option<FocusArea>,
    goal: Option<ImprovementGoal>,
}

impl PreferenceForm {
    /// Empty form
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the uploaded photo
    #[inline]
    #[must_use]
    pub fn with_image(mut self, image: WorkspaceImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Select a focus area
    #[inline]
    #[must_use]
    pub fn with_focus_area(mut self, focus: FocusArea) -> Self {
        self.focus_area = Some(focus);
        self
    }

    /// Choose an enumerated goal
    #[inline]
    #[must_use]
    pub fn with_goal(mut self, goal: ImprovementGoal) -> Self {
        self.goal = Some(goal);
        self
    }

    /// Enter a goal as text; blank text leaves the goal unset
    #[inline]
    #[must_use]
    pub fn with_goal_text(mut self, text: &str) -> Self {
        self.goal = ImprovementGoal::parse(text);
        self
    }

    /// Validate presence and freeze the input
    ///
    /// # Errors
    /// The first missing field, checked in form order: image, focus, goal.
    pub fn collect(self) -> Result<WorkspaceInput, MissingInputError> {
        let image = self.image.ok_or(MissingInputError::Image)?;
        if image.is_empty() {
            return Err(MissingInputError::EmptyImage);
        }
        let focus_area = self.focus_area.ok_or(MissingInputError::FocusArea)?;
        let goal = self.goal.ok_or(MissingInputError::Goal)?;

        Ok(WorkspaceInput {
            image,
            focus_area,
            goal,
        })
    }
}
