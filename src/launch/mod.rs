pub mod deep_link;
pub mod resolver;

pub use deep_link::{
    AttemptId, AttemptReport, AttemptState, Clock, DeepLinkEngine, ManualClock, Resolution,
    SystemClock, FALLBACK_DELAY_MS, HANDOFF_THRESHOLD_MS,
};
pub use resolver::{native_store_url, resolve_install, resolve_open, LaunchAction};

use tracing::info;

use crate::error::LaunchError;
use crate::registry::model::AppEntry;
use crate::system::navigator::{Navigator, Prober};
use crate::system::os::PlatformTag;

/// Resolves install/open clicks and carries them out through the injected
/// navigator. Deep links go through the fallback engine.
pub struct Launcher<N, C: Clock> {
    navigator: N,
    engine: DeepLinkEngine<C>,
}

impl<N: Navigator + Prober, C: Clock> Launcher<N, C> {
    pub fn new(navigator: N, clock: C) -> Self {
        Self {
            navigator,
            engine: DeepLinkEngine::new(clock),
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn engine(&self) -> &DeepLinkEngine<C> {
        &self.engine
    }

    pub fn install(
        &mut self,
        entry: &AppEntry,
        platform: PlatformTag,
    ) -> Result<LaunchAction, LaunchError> {
        let action = resolve_install(entry, platform)?;
        self.execute(&action)?;
        info!(app = %entry.id, %platform, action = %action.describe(), "install started");
        Ok(action)
    }

    pub fn open(
        &mut self,
        entry: &AppEntry,
        platform: PlatformTag,
    ) -> Result<LaunchAction, LaunchError> {
        let action = resolve_open(entry, platform)?;
        self.execute(&action)?;
        info!(app = %entry.id, %platform, action = %action.describe(), "open started");
        Ok(action)
    }

    /// Drives pending deep-link checks. Call from the event loop.
    pub fn poll(&mut self) -> Vec<AttemptReport> {
        self.engine.poll(&mut self.navigator)
    }

    fn execute(&mut self, action: &LaunchAction) -> Result<(), LaunchError> {
        match action {
            LaunchAction::Open(url) => self.navigator.open_external(url),
            LaunchAction::DeepLink { link, fallback } => {
                self.engine.begin(link, fallback.clone(), &mut self.navigator);
                Ok(())
            }
        }
    }
}
