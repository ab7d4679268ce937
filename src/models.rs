use serde::Deserialize;
use serde::Serialize;

/// Category assigned when the dataset has no category column or the cell is blank
pub const DEFAULT_CATEGORY: &str = "General";

/// A prior project loaded from the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub title: String,
    pub description: String,
    pub category: String,
}

impl ProjectRecord {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
        }
    }

    /// Text the ranker matches queries against
    #[must_use]
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// Which flavour of output a generate request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Ideation,
    Execution,
}

impl Mode {
    /// Parse a mode name leniently; anything other than "execution" is ideation
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("execution") {
            Self::Execution
        } else {
            Self::Ideation
        }
    }
}
