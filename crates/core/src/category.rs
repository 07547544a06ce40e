use serde::{Deserialize, Serialize};

/// Category assigned to records that no rule matches. Configured categories
/// and rules may not use this name.
pub const FALLBACK_CATEGORY: &str = "_default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// CSS colour string, passed through to the presentation layer untouched.
    pub color: String,
}

impl Category {
    pub fn new(name: &str, color: &str) -> Self {
        Category {
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

pub fn is_reserved(name: &str) -> bool {
    name == FALLBACK_CATEGORY
}
