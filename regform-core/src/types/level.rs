//! Cascade level definitions

use serde::{Deserialize, Serialize};

/// One level of the state → district → block cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    State,
    District,
    Block,
}

impl Level {
    /// All levels, parents first
    pub const ALL: [Level; 3] = [Level::State, Level::District, Level::Block];

    /// The level whose options depend on this level's selection
    #[must_use]
    pub fn child(self) -> Option<Level> {
        match self {
            Self::State => Some(Self::District),
            Self::District => Some(Self::Block),
            Self::Block => None,
        }
    }

    /// Title-case singular label, e.g. "District"
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::State => "State",
            Self::District => "District",
            Self::Block => "Block",
        }
    }

    /// Lower-case plural, e.g. "districts"
    #[must_use]
    pub fn plural(self) -> &'static str {
        match self {
            Self::State => "states",
            Self::District => "districts",
            Self::Block => "blocks",
        }
    }

    /// Default id of the select control for this level
    #[must_use]
    pub fn select_id(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::District => "district",
            Self::Block => "block",
        }
    }

    pub fn default_placeholder(self) -> String {
        format!("Select {}", self.label())
    }

    pub fn loading_placeholder(self) -> String {
        format!("Loading {}...", self.plural())
    }

    pub fn empty_placeholder(self) -> String {
        format!("No {} found", self.plural())
    }

    pub fn error_placeholder(self) -> String {
        format!("Failed to load {}", self.plural())
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.select_id())
    }
}
