use crate::error::LaunchError;
use crate::registry::model::{AppEntry, PlatformAction};
use crate::system::os::PlatformTag;

const WEB_STOREFRONT_PREFIXES: [&str; 2] = ["https://apps.apple.com", "http://apps.apple.com"];
const NATIVE_STOREFRONT_PREFIX: &str = "itms-apps://apps.apple.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchAction {
    Open(String),
    DeepLink {
        link: String,
        fallback: Option<String>,
    },
}

impl LaunchAction {
    pub fn describe(&self) -> String {
        match self {
            LaunchAction::Open(url) => url.clone(),
            LaunchAction::DeepLink { link, fallback } => match fallback {
                Some(fallback) => format!("{link} (fallback {fallback})"),
                None => link.clone(),
            },
        }
    }
}

pub fn resolve_install(entry: &AppEntry, platform: PlatformTag) -> Result<LaunchAction, LaunchError> {
    let action = entry
        .action_for(platform)
        .ok_or(LaunchError::NoActionAvailable { platform })?;
    install_url(action, platform)
        .map(LaunchAction::Open)
        .ok_or(LaunchError::NoActionAvailable { platform })
}

pub fn resolve_open(entry: &AppEntry, platform: PlatformTag) -> Result<LaunchAction, LaunchError> {
    let action = entry
        .action_for(platform)
        .ok_or(LaunchError::NoActionAvailable { platform })?;
    open_action(action).ok_or(LaunchError::NoActionAvailable { platform })
}

pub fn install_url(action: &PlatformAction, platform: PlatformTag) -> Option<String> {
    match platform {
        PlatformTag::Android => action
            .playstore_url()
            .or_else(|| action.installer_url())
            .map(str::to_string),
        PlatformTag::Ios => action.app_store_url().map(native_store_url),
        PlatformTag::Windows | PlatformTag::Mac | PlatformTag::Web => action
            .installer_url()
            .or_else(|| action.url())
            .map(str::to_string),
    }
}

pub fn open_action(action: &PlatformAction) -> Option<LaunchAction> {
    if let Some(link) = action.deep_link() {
        return Some(LaunchAction::DeepLink {
            link: link.to_string(),
            fallback: deep_link_fallback(action),
        });
    }
    action
        .url()
        .or_else(|| action.playstore_url())
        .or_else(|| action.app_store_url())
        .map(|url| LaunchAction::Open(url.to_string()))
}

/// Store first, then web, for when a deep link goes unanswered.
pub fn deep_link_fallback(action: &PlatformAction) -> Option<String> {
    action
        .playstore_url()
        .or_else(|| action.app_store_url())
        .or_else(|| action.url())
        .map(str::to_string)
}

/// Points an App Store web link at the native store app. Path and query are
/// kept; anything not on the storefront host passes through unchanged.
pub fn native_store_url(url: &str) -> String {
    WEB_STOREFRONT_PREFIXES
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))
        .map(|rest| format!("{NATIVE_STOREFRONT_PREFIX}{rest}"))
        .unwrap_or_else(|| url.to_string())
}
