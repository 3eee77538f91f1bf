use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

use super::state::{App, CatalogStatus, LogLevel};
use crate::cache::OfflineCache;
use crate::error::{CatalogFetchError, LaunchError};
use crate::launch::{AttemptReport, Clock, LaunchAction, Launcher, Resolution};
use crate::registry::loader::{load_catalog, LoadedCatalog};
use crate::system::identity::{IdentityProvider, Session};
use crate::system::navigator::{Navigator, Prober};

/// Results delivered to the event loop from worker threads and the identity
/// provider.
#[derive(Debug)]
pub enum AppEvent {
    CatalogLoaded(Result<LoadedCatalog, CatalogFetchError>),
    SessionChanged(Option<Session>),
}

/// Everything the controller talks to besides the app state itself.
pub struct Services<N, C: Clock> {
    pub launcher: Launcher<N, C>,
    pub identity: Box<dyn IdentityProvider>,
    pub cache: Arc<OfflineCache>,
    pub catalog_url: String,
    events_tx: Sender<AppEvent>,
    events_rx: Receiver<AppEvent>,
}

impl<N: Navigator + Prober, C: Clock> Services<N, C> {
    pub fn new(
        launcher: Launcher<N, C>,
        mut identity: Box<dyn IdentityProvider>,
        cache: Arc<OfflineCache>,
        catalog_url: impl Into<String>,
    ) -> Self {
        let (events_tx, events_rx) = unbounded();

        identity.initialize();
        let session_tx = events_tx.clone();
        identity.on_state_changed(Box::new(move |session| {
            let _ = session_tx.send(AppEvent::SessionChanged(session));
        }));

        Self {
            launcher,
            identity,
            cache,
            catalog_url: catalog_url.into(),
            events_tx,
            events_rx,
        }
    }

    pub fn events(&self) -> &Receiver<AppEvent> {
        &self.events_rx
    }
}

/// Loads the catalog on a worker thread. With `bootstrap`, an empty cache is
/// first precached and stale cache generations are purged.
pub fn request_catalog<N, C: Clock>(app: &mut App, services: &Services<N, C>, bootstrap: bool) {
    app.catalog_status = CatalogStatus::Loading;
    app.set_status("Loading catalog...");

    let cache = Arc::clone(&services.cache);
    let url = services.catalog_url.clone();
    let tx = services.events_tx.clone();
    let spawned = std::thread::Builder::new()
        .name("catalog-load".into())
        .spawn(move || {
            if bootstrap {
                bootstrap_cache(&cache);
            }
            let _ = tx.send(AppEvent::CatalogLoaded(load_catalog(&cache, &url)));
        });

    if let Err(e) = spawned {
        warn!(error = %e, "could not start catalog worker");
        app.catalog_failed(format!("Could not start catalog loader: {e}"));
    }
}

fn bootstrap_cache(cache: &OfflineCache) {
    if cache.store().is_empty() {
        match cache.install() {
            Ok(count) => info!(count, "offline cache installed"),
            Err(e) => warn!(error = %e, "offline cache install failed"),
        }
    }
    match cache.activate() {
        Ok(removed) if !removed.is_empty() => info!(?removed, "old cache generations removed"),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "cache activation failed"),
    }
}

pub fn drain_events<N, C: Clock>(app: &mut App, services: &Services<N, C>) {
    for event in services.events_rx.try_iter() {
        apply_event(app, event);
    }
}

pub fn apply_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::CatalogLoaded(Ok(loaded)) => {
            app.replace_catalog(loaded.entries, loaded.source);
        }
        AppEvent::CatalogLoaded(Err(e)) => {
            warn!(error = %e, "catalog load failed");
            app.log(format!("Error: {e}"), LogLevel::Error);
            app.catalog_failed(e.user_message());
        }
        AppEvent::SessionChanged(session) => {
            match &session {
                Some(s) => app.set_status(format!("Signed in as {}", s.label())),
                None if app.session.is_some() => app.set_status("Signed out."),
                None => {}
            }
            app.session = session;
        }
    }
}

pub fn install_focused<N: Navigator + Prober, C: Clock>(app: &mut App, services: &mut Services<N, C>) {
    match app.current_id() {
        Some(id) => install_by_id(app, services, &id),
        None => app.set_status("No app focused to install."),
    }
}

pub fn open_focused<N: Navigator + Prober, C: Clock>(app: &mut App, services: &mut Services<N, C>) {
    match app.current_id() {
        Some(id) => open_by_id(app, services, &id),
        None => app.set_status("No app focused to open."),
    }
}

pub fn install_by_id<N: Navigator + Prober, C: Clock>(
    app: &mut App,
    services: &mut Services<N, C>,
    id: &str,
) {
    let Some(entry) = app.catalog.find(id).cloned() else {
        debug!(id, "install requested for unknown app");
        return;
    };
    let result = services.launcher.install(&entry, app.platform);
    report_launch(app, &entry.name, "Installing", result);
}

pub fn open_by_id<N: Navigator + Prober, C: Clock>(
    app: &mut App,
    services: &mut Services<N, C>,
    id: &str,
) {
    let Some(entry) = app.catalog.find(id).cloned() else {
        debug!(id, "open requested for unknown app");
        return;
    };
    let result = services.launcher.open(&entry, app.platform);
    report_launch(app, &entry.name, "Opening", result);
}

fn report_launch(
    app: &mut App,
    name: &str,
    verb: &str,
    result: Result<LaunchAction, LaunchError>,
) {
    match result {
        Ok(LaunchAction::Open(url)) => {
            app.log(format!("{verb} {name}"), LogLevel::Success);
            app.set_status(format!("{verb} {name}: {url}"));
        }
        Ok(LaunchAction::DeepLink { link, .. }) => {
            app.log(format!("Trying {link}"), LogLevel::Info);
            app.set_status(format!("{verb} {name} via {link}..."));
        }
        Err(e) => {
            warn!(app = name, error = %e, "launch failed");
            app.show_alert("Action unavailable", e.user_message());
        }
    }
}

pub fn poll_launches<N: Navigator + Prober, C: Clock>(app: &mut App, services: &mut Services<N, C>) {
    for report in services.launcher.poll() {
        apply_attempt_report(app, &report);
    }
}

fn apply_attempt_report(app: &mut App, report: &AttemptReport) {
    match &report.resolution {
        Resolution::HandedOff { .. } => {
            app.log(format!("Handed off to {}", report.link), LogLevel::Success);
        }
        Resolution::Superseded => {}
        Resolution::FallbackOpened { url, .. } => {
            app.log("App not installed, opening store".to_string(), LogLevel::Info);
            app.set_status(format!("Opened fallback {url}"));
        }
        Resolution::NoFallback { .. } => {
            app.log(format!("Nothing answered {}", report.link), LogLevel::Error);
        }
        Resolution::FallbackFailed { url, error } => {
            app.log(format!("Error: {error}"), LogLevel::Error);
            app.set_status(format!("Could not open {url}"));
        }
    }
}

pub fn submit_login<N, C: Clock>(app: &mut App, services: &mut Services<N, C>) {
    let Some(form) = app.login.clone() else {
        return;
    };
    match services
        .identity
        .sign_in_with_email_password(&form.email, &form.password)
    {
        Ok(session) => {
            info!(user = session.label(), "signed in");
            app.login = None;
        }
        Err(e) => {
            warn!(error = %e, "email sign-in failed");
            app.show_alert("Sign-in failed", format!("Error signing in: {e}"));
        }
    }
}

pub fn popup_login<N, C: Clock>(app: &mut App, services: &mut Services<N, C>) {
    match services.identity.sign_in_with_popup() {
        Ok(session) => {
            info!(user = session.label(), "signed in with provider");
            app.login = None;
        }
        Err(e) => {
            warn!(error = %e, "provider sign-in failed");
            app.show_alert("Sign-in failed", format!("Error signing in with provider: {e}"));
        }
    }
}

pub fn sign_out<N, C: Clock>(app: &mut App, services: &mut Services<N, C>) {
    if app.session.is_none() {
        app.set_status("Not signed in.");
        return;
    }
    if let Err(e) = services.identity.sign_out() {
        warn!(error = %e, "sign-out failed");
        app.show_alert("Sign-out failed", e.to_string());
    }
}
