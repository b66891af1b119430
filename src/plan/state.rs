//! The planner's belief about where the editor's cursor is.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// On the page's category list.
    Top,
    /// Inside a category's attribute rows.
    Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavState {
    pub page: String,
    pub location: Location,
    /// Set by an activated edit toggle; unlocks the next secondary section.
    pub edit_active: bool,
}

impl NavState {
    pub fn new(page: impl Into<String>) -> Self {
        Self { page: page.into(), location: Location::Top, edit_active: false }
    }

    pub fn in_category(&self) -> bool {
        self.location == Location::Category
    }
}
