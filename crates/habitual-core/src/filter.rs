use std::fmt;

use serde::{Deserialize, Serialize};

/// Display-only predicate over rendered habit cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
}

impl Filter {
    pub const ALL: &[Filter] = &[Filter::All, Filter::Completed, Filter::Pending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Pending => "pending",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Completed => "Completed",
            Filter::Pending => "Pending",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Filter::All),
            "completed" => Some(Filter::Completed),
            "pending" => Some(Filter::Pending),
            _ => None,
        }
    }

    /// The tag a card carries for a given completion state. Never `All`.
    pub fn tag_for(completed: bool) -> Self {
        if completed {
            Filter::Completed
        } else {
            Filter::Pending
        }
    }

    pub fn matches(&self, tag: Filter) -> bool {
        *self == Filter::All || *self == tag
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
