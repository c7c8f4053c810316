use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_CATEGORY_ICON: &str = "📌";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Rows created with an explicit `null` icon come back as `null`.
    #[serde(default = "default_icon", deserialize_with = "icon_or_default")]
    pub icon: String,
    #[serde(default)]
    pub color: Option<String>,
}

fn default_icon() -> String {
    DEFAULT_CATEGORY_ICON.to_string()
}

fn icon_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_icon))
}

/// Body for `POST /categories`. Unset fields are left out so the backend
/// applies its own defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
