use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use applaunch::app::{request_catalog, run, App, Services};
use applaunch::cache::{CacheStore, NetTransport, OfflineCache};
use applaunch::config::LauncherConfig;
use applaunch::launch::{Launcher, SystemClock};
use applaunch::system::{DisabledIdentity, EnvironmentSignals, PlatformTag, SystemOpener};
use applaunch::utils::logging::init_logging;

fn main() -> Result<()> {
    let cli_arg = std::env::args().nth(1);
    let config_path = LauncherConfig::resolve_path(cli_arg.as_deref());
    let config = LauncherConfig::load(&config_path).context("failed to load config")?;
    init_logging(&config.log_dir()).context("failed to init logging")?;

    let platform = PlatformTag::detect(&EnvironmentSignals::from_host(config.user_agent.as_deref()));
    info!(%platform, catalog = %config.catalog_url, "launcher starting");

    let store = match CacheStore::open(&config.cache_dir, config.cache_generation.clone()) {
        Ok(store) => store,
        Err(e) => {
            warn!(error = %e, "cache directory unusable, falling back to memory");
            CacheStore::in_memory(config.cache_generation.clone())
        }
    };
    let transport = NetTransport::new().context("failed to build http client")?;
    let cache = Arc::new(OfflineCache::new(
        store,
        Arc::new(transport),
        config.precache_urls(),
    ));

    let launcher = Launcher::new(SystemOpener, SystemClock);
    let mut services = Services::new(
        launcher,
        Box::new(DisabledIdentity),
        cache,
        config.catalog_url.clone(),
    );

    let mut app = App::new(platform);
    request_catalog(&mut app, &services, true);
    if !SystemOpener::is_available() {
        app.set_status("No URL handler found on PATH, install and open will fail");
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("failed to enter alt screen")?;

    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("failed to init terminal")?;

    run(&mut app, &mut services, &mut terminal)
}
