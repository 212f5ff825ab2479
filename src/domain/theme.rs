use serde::{Deserialize, Serialize};

/// Theme names the presentation layer knows how to apply.
pub const THEME_NAMES: &[&str] = &["light", "dark", "gradient", "custom"];

/// Color theme settings. Pure presentation data; the core only loads
/// and saves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "gradient".to_string(),
            color: "#2d70fd".to_string(),
        }
    }
}

impl Theme {
    /// Effective theme name; unknown names fall back to the default
    /// gradient.
    pub fn effective_name(&self) -> &str {
        if THEME_NAMES.contains(&self.name.as_str()) {
            &self.name
        } else {
            "gradient"
        }
    }
}
