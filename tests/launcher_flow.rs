use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use applaunch::error::LaunchError;
use applaunch::launch::{
    resolve_install, resolve_open, AttemptState, LaunchAction, Launcher, ManualClock, Resolution,
    FALLBACK_DELAY_MS, HANDOFF_THRESHOLD_MS,
};
use applaunch::registry::loader::parse_entries;
use applaunch::registry::{AppEntry, PlatformAction};
use applaunch::system::{Navigator, ProbeHandle, Prober, PlatformTag};

#[derive(Clone, Default)]
struct RecordingNav {
    opened: Rc<RefCell<Vec<String>>>,
    probes: Rc<RefCell<Vec<String>>>,
}

struct NoopProbe;

impl ProbeHandle for NoopProbe {
    fn teardown(self: Box<Self>) {}
}

impl Navigator for RecordingNav {
    fn open_external(&mut self, url: &str) -> Result<(), LaunchError> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

impl Prober for RecordingNav {
    fn start_probe(&mut self, link: &str) -> std::io::Result<Box<dyn ProbeHandle>> {
        self.probes.borrow_mut().push(link.to_string());
        Ok(Box::new(NoopProbe))
    }
}

fn entry(platforms: BTreeMap<String, PlatformAction>) -> AppEntry {
    AppEntry {
        id: "a1".into(),
        name: "Demo".into(),
        description: String::new(),
        category: String::new(),
        tags: Default::default(),
        icon: None,
        size_bytes: None,
        platforms,
    }
}

fn deep_link_only() -> AppEntry {
    let mut platforms = BTreeMap::new();
    platforms.insert(
        "android".to_string(),
        PlatformAction {
            deep_link: Some("demo://open".into()),
            playstore_url: Some("https://play/demo".into()),
            url: Some("https://demo.example".into()),
            ..Default::default()
        },
    );
    entry(platforms)
}

#[test]
fn test_android_install_opens_play_store_url() {
    let catalog =
        br#"[{"id":"a1","name":"Demo","platforms":{"android":{"playstore_url":"https://play/x"}}}]"#;
    let entries = parse_entries(catalog).unwrap();

    let nav = RecordingNav::default();
    let mut launcher = Launcher::new(nav.clone(), ManualClock::default());
    launcher.install(&entries[0], PlatformTag::Android).unwrap();

    assert_eq!(*nav.opened.borrow(), vec!["https://play/x".to_string()]);
}

#[test]
fn test_ios_install_uses_native_store_prefix() {
    let mut platforms = BTreeMap::new();
    platforms.insert(
        "ios".to_string(),
        PlatformAction {
            app_store_url: Some("https://apps.apple.com/app/123".into()),
            ..Default::default()
        },
    );
    let nav = RecordingNav::default();
    let mut launcher = Launcher::new(nav.clone(), ManualClock::default());
    launcher.install(&entry(platforms), PlatformTag::Ios).unwrap();

    let opened = nav.opened.borrow();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].starts_with("itms-apps://apps.apple.com"));
    assert!(opened[0].ends_with("/app/123"));
}

#[test]
fn test_deep_link_fallback_fires_inside_window() {
    let nav = RecordingNav::default();
    let clock = ManualClock::default();
    let mut launcher = Launcher::new(nav.clone(), clock.clone());

    launcher.open(&deep_link_only(), PlatformTag::Android).unwrap();
    assert_eq!(*nav.probes.borrow(), vec!["demo://open".to_string()]);
    assert!(nav.opened.borrow().is_empty());

    clock.advance_ms(FALLBACK_DELAY_MS - 1);
    assert!(launcher.poll().is_empty());
    assert!(nav.opened.borrow().is_empty());

    clock.advance_ms(HANDOFF_THRESHOLD_MS - FALLBACK_DELAY_MS);
    let reports = launcher.poll();
    assert_eq!(reports.len(), 1);
    assert!(matches!(
        reports[0].resolution,
        Resolution::FallbackOpened { ref url, .. } if url == "https://play/demo"
    ));
    assert_eq!(launcher.engine().state(reports[0].id), AttemptState::FallbackFired);
    assert_eq!(*nav.opened.borrow(), vec!["https://play/demo".to_string()]);
}

#[test]
fn test_late_check_assumes_hand_off() {
    let nav = RecordingNav::default();
    let clock = ManualClock::default();
    let mut launcher = Launcher::new(nav.clone(), clock.clone());

    launcher.open(&deep_link_only(), PlatformTag::Android).unwrap();
    clock.advance_ms(HANDOFF_THRESHOLD_MS);
    let reports = launcher.poll();

    assert_eq!(reports.len(), 1);
    assert!(matches!(reports[0].resolution, Resolution::HandedOff { .. }));
    assert_eq!(launcher.engine().state(reports[0].id), AttemptState::Settled);
    assert!(nav.opened.borrow().is_empty());
}

#[test]
fn test_double_click_keeps_only_latest_attempt() {
    let nav = RecordingNav::default();
    let clock = ManualClock::default();
    let mut launcher = Launcher::new(nav.clone(), clock.clone());

    launcher.open(&deep_link_only(), PlatformTag::Android).unwrap();
    clock.advance_ms(200);
    launcher.open(&deep_link_only(), PlatformTag::Android).unwrap();
    assert_eq!(launcher.engine().pending_count(), 1);

    clock.advance_ms(FALLBACK_DELAY_MS);
    let reports = launcher.poll();
    let superseded = reports
        .iter()
        .filter(|r| r.resolution == Resolution::Superseded)
        .count();
    assert_eq!(superseded, 1);
    assert_eq!(nav.opened.borrow().len(), 1);
}

#[test]
fn test_unusable_records_never_navigate() {
    let mut platforms = BTreeMap::new();
    platforms.insert(
        "windows".to_string(),
        PlatformAction {
            playstore_url: Some("https://play/only".into()),
            ..Default::default()
        },
    );
    platforms.insert(
        "web".to_string(),
        PlatformAction {
            url: Some("   ".into()),
            ..Default::default()
        },
    );
    let unusable = entry(platforms);

    let nav = RecordingNav::default();
    let mut launcher = Launcher::new(nav.clone(), ManualClock::default());
    for platform in [PlatformTag::Windows, PlatformTag::Mac, PlatformTag::Ios] {
        let err = launcher.install(&unusable, platform).unwrap_err();
        assert!(matches!(err, LaunchError::NoActionAvailable { .. }));
    }
    assert!(matches!(
        launcher.open(&entry(BTreeMap::new()), PlatformTag::Web),
        Err(LaunchError::NoActionAvailable { .. })
    ));
    assert!(nav.opened.borrow().is_empty());
    assert!(nav.probes.borrow().is_empty());
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn field() -> impl Strategy<Value = Option<String>> {
        prop::option::of("https://[a-z]{1,8}\\.example/[a-z0-9]{0,6}")
    }

    fn action() -> impl Strategy<Value = PlatformAction> {
        (field(), field(), field(), field(), prop::option::of("[a-z]{1,6}://[a-z]{1,6}")).prop_map(
            |(installer_url, playstore_url, app_store_url, url, deep_link)| PlatformAction {
                installer_url,
                playstore_url,
                app_store_url,
                url,
                deep_link,
            },
        )
    }

    fn platform() -> impl Strategy<Value = PlatformTag> {
        prop::sample::select(PlatformTag::ALL.to_vec())
    }

    fn outcome(result: Result<LaunchAction, LaunchError>) -> Option<LaunchAction> {
        result.ok()
    }

    proptest! {
        /// A missing platform record resolves exactly like the web record.
        #[test]
        fn missing_record_behaves_like_web(web in action(), platform in platform()) {
            let mut only_web = BTreeMap::new();
            only_web.insert("web".to_string(), web.clone());
            let fallback_entry = entry(only_web);

            let mut explicit = BTreeMap::new();
            explicit.insert(platform.as_str().to_string(), web);
            let explicit_entry = entry(explicit);

            prop_assert_eq!(
                outcome(resolve_install(&fallback_entry, platform)),
                outcome(resolve_install(&explicit_entry, platform))
            );
            prop_assert_eq!(
                outcome(resolve_open(&fallback_entry, platform)),
                outcome(resolve_open(&explicit_entry, platform))
            );
        }

        /// A record with a deep link never opens anything before the check runs.
        #[test]
        fn deep_link_opens_nothing_synchronously(mut record in action(), platform in platform()) {
            record.deep_link = Some("demo://open".into());
            let mut platforms = BTreeMap::new();
            platforms.insert(platform.as_str().to_string(), record);

            let nav = RecordingNav::default();
            let mut launcher = Launcher::new(nav.clone(), ManualClock::default());
            let action = launcher.open(&entry(platforms), platform).unwrap();

            let is_deep_link = matches!(action, LaunchAction::DeepLink { .. });
            prop_assert!(is_deep_link);
            prop_assert!(nav.opened.borrow().is_empty());
        }
    }
}
