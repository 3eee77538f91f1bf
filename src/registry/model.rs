use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::system::os::PlatformTag;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformAction>,
}

impl AppEntry {
    /// Action record for `platform`, falling back to the `web` record.
    pub fn action_for(&self, platform: PlatformTag) -> Option<&PlatformAction> {
        self.platforms
            .get(platform.as_str())
            .or_else(|| self.platforms.get(PlatformTag::Web.as_str()))
    }
}

/// Optional URL-shaped capabilities for one platform. Presence is the only
/// signal; empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playstore_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_store_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_link: Option<String>,
}

impl PlatformAction {
    pub fn installer_url(&self) -> Option<&str> {
        present(&self.installer_url)
    }

    pub fn playstore_url(&self) -> Option<&str> {
        present(&self.playstore_url)
    }

    pub fn app_store_url(&self) -> Option<&str> {
        present(&self.app_store_url)
    }

    pub fn url(&self) -> Option<&str> {
        present(&self.url)
    }

    pub fn deep_link(&self) -> Option<&str> {
        present(&self.deep_link)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    match field.as_deref() {
        Some(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_entry_parses() {
        let json = r#"[{"id":"a1","name":"Demo","platforms":{"android":{"playstore_url":"https://play/x"}}}]"#;
        let entries: Vec<AppEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "");
        assert_eq!(entries[0].size_bytes, None);
        let action = entries[0].action_for(PlatformTag::Android).unwrap();
        assert_eq!(action.playstore_url(), Some("https://play/x"));
    }

    #[test]
    fn test_unknown_platform_keys_tolerated() {
        let json = r#"{"id":"a","name":"A","platforms":{"linux":{"url":"https://a"},"web":{"url":"https://w"}}}"#;
        let entry: AppEntry = serde_json::from_str(json).unwrap();
        assert_eq!(
            entry.action_for(PlatformTag::Windows).and_then(|a| a.url()),
            Some("https://w")
        );
    }

    #[test]
    fn test_action_for_without_web_is_none() {
        let json = r#"{"id":"a","name":"A","platforms":{"ios":{"app_store_url":"https://apps.apple.com/app/1"}}}"#;
        let entry: AppEntry = serde_json::from_str(json).unwrap();
        assert!(entry.action_for(PlatformTag::Android).is_none());
        assert!(entry.action_for(PlatformTag::Ios).is_some());
    }

    #[test]
    fn test_blank_fields_are_absent() {
        let action = PlatformAction {
            url: Some("  ".into()),
            deep_link: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(action.url(), None);
        assert_eq!(action.deep_link(), None);
    }
}
