use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use applaunch::cache::{CacheStore, FetchSource, OfflineCache, Request, Response, Transport};
use applaunch::error::CacheError;
use applaunch::registry::load_catalog;

const MANIFEST_URL: &str = "https://launcher.example/apps.json";
const MANIFEST: &str = r#"[{"id":"a1","name":"Demo","platforms":{"android":{"playstore_url":"https://play/x"}}}]"#;

/// Serves the manifest until switched off, then fails like a dropped network.
#[derive(Default)]
struct Switchable {
    offline: AtomicBool,
}

impl Switchable {
    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

impl Transport for Switchable {
    fn send(&self, request: &Request) -> Result<Response, CacheError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CacheError::Transport {
                url: request.url.clone(),
                message: "network unreachable".into(),
            });
        }
        Ok(Response::ok(MANIFEST.as_bytes().to_vec()))
    }
}

#[test]
fn test_cached_manifest_loads_while_offline() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(Switchable::default());

    let cache = OfflineCache::new(
        CacheStore::open(dir.path(), "launcher-v1").unwrap(),
        transport.clone(),
        vec![MANIFEST_URL.to_string()],
    );
    assert_eq!(cache.install().unwrap(), 1);
    drop(cache);

    transport.go_offline();
    let reopened = OfflineCache::new(
        CacheStore::open(dir.path(), "launcher-v1").unwrap(),
        transport,
        Vec::new(),
    );

    let loaded = load_catalog(&reopened, MANIFEST_URL).unwrap();
    assert_eq!(loaded.source, FetchSource::Cache);
    assert_eq!(loaded.entries.len(), 1);
    assert_eq!(loaded.entries[0].id, "a1");
}

#[test]
fn test_repeated_writes_leave_one_entry() {
    let dir = tempfile::tempdir().unwrap();
    let cache = OfflineCache::new(
        CacheStore::open(dir.path(), "launcher-v1").unwrap(),
        Arc::new(Switchable::default()),
        Vec::new(),
    );
    let request = Request::get(MANIFEST_URL);

    cache.store_response(&request, Response::ok(b"first".to_vec())).unwrap();
    cache.store_response(&request, Response::ok(b"second".to_vec())).unwrap();
    assert_eq!(cache.store().len(), 1);

    let reopened = CacheStore::open(dir.path(), "launcher-v1").unwrap();
    assert_eq!(reopened.len(), 1);
    let entry = reopened.get(&request.identity()).unwrap();
    assert_eq!(entry.response.body, b"second".to_vec());
}

#[test]
fn test_activation_drops_old_generations() {
    let dir = tempfile::tempdir().unwrap();
    let old = CacheStore::open(dir.path(), "launcher-v0").unwrap();
    old.put("GET https://old", Response::ok(b"stale".to_vec())).unwrap();

    let cache = OfflineCache::new(
        CacheStore::open(dir.path(), "launcher-v1").unwrap(),
        Arc::new(Switchable::default()),
        Vec::new(),
    );
    assert_eq!(cache.activate().unwrap(), vec!["launcher-v0".to_string()]);
    assert!(!dir.path().join("launcher-v0").exists());
    assert!(dir.path().join("launcher-v1").exists());
}

#[test]
fn test_activation_keeps_unrelated_directories() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src").join("main.rs"), b"fn main() {}").unwrap();
    std::fs::create_dir_all(dir.path().join("Documents")).unwrap();

    let cache = OfflineCache::new(
        CacheStore::open(dir.path(), "launcher-v1").unwrap(),
        Arc::new(Switchable::default()),
        Vec::new(),
    );
    assert!(cache.activate().unwrap().is_empty());
    assert!(dir.path().join("src").join("main.rs").exists());
    assert!(dir.path().join("Documents").exists());
}
