use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlatformTag {
    Android,
    Ios,
    Windows,
    Mac,
    Web,
}

impl PlatformTag {
    pub const ALL: [PlatformTag; 5] = [
        PlatformTag::Android,
        PlatformTag::Ios,
        PlatformTag::Windows,
        PlatformTag::Mac,
        PlatformTag::Web,
    ];

    /// Key used for this platform in the catalog's `platforms` map.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformTag::Android => "android",
            PlatformTag::Ios => "ios",
            PlatformTag::Windows => "windows",
            PlatformTag::Mac => "mac",
            PlatformTag::Web => "web",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlatformTag::Android => "Android",
            PlatformTag::Ios => "iOS",
            PlatformTag::Windows => "Windows",
            PlatformTag::Mac => "macOS",
            PlatformTag::Web => "Web",
        }
    }

    pub fn detect(signals: &EnvironmentSignals) -> Self {
        let agent = signals.agent.to_ascii_lowercase();
        if agent.contains("android") {
            return Self::Android;
        }
        if IOS_MARKERS.iter().any(|marker| agent.contains(marker)) && !signals.legacy_ios_shim {
            return Self::Ios;
        }
        if agent.contains("win") {
            return Self::Windows;
        }
        if agent.contains("mac") {
            return Self::Mac;
        }
        Self::Web
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const IOS_MARKERS: [&str; 3] = ["ipad", "iphone", "ipod"];

/// What the detector gets to look at. `legacy_ios_shim` is the old
/// platform property whose presence rules out an iOS classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSignals {
    pub agent: String,
    pub legacy_ios_shim: bool,
}

impl EnvironmentSignals {
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            legacy_ios_shim: false,
        }
    }

    /// Signals for the running host, unless an explicit agent string is configured.
    pub fn from_host(agent_override: Option<&str>) -> Self {
        match agent_override {
            Some(agent) if !agent.trim().is_empty() => Self::new(agent),
            _ => Self::new(host_agent(std::env::consts::OS)),
        }
    }
}

fn host_agent(os: &str) -> String {
    match os {
        "windows" => "Windows NT".to_string(),
        "macos" => "Macintosh".to_string(),
        "android" => "Android".to_string(),
        "ios" => "iPhone".to_string(),
        "linux" => "X11; Linux".to_string(),
        other => other.to_string(),
    }
}
