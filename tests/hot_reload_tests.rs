use radixroute::hot_reload::{reload_manifest, watch_manifest};
use radixroute::{RouteManifest, Router, RouterConfig, SharedRouter};
use http::Method;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const MANIFEST_V1: &str = r#"routes:
  - method: GET
    path: /foo
    handler: foo_one
"#;

const MANIFEST_V2: &str = r#"routes:
  - method: GET
    path: /foo
    handler: foo_two
  - method: GET
    path: /bar/:id
    handler: bar
"#;

fn resolve(name: &str) -> Option<String> {
    Some(name.to_string())
}

fn temp_manifest(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("radixroute_manifest_")
        .suffix(".yaml")
        .tempfile()
        .expect("temp file");
    file.write_all(content.as_bytes()).expect("write manifest");
    file.flush().expect("flush manifest");
    file
}

fn shared_from(path: &std::path::Path) -> Arc<SharedRouter<String>> {
    let manifest = RouteManifest::load(path).unwrap();
    let router = Router::from_manifest(&manifest, RouterConfig::default(), resolve).unwrap();
    Arc::new(SharedRouter::new(router))
}

#[test]
fn test_watch_manifest_reload() {
    let file = temp_manifest(MANIFEST_V1);
    let shared = shared_from(file.path());

    let updates: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let updates_clone = updates.clone();

    let watcher = watch_manifest(
        file.path(),
        Arc::clone(&shared),
        RouterConfig::default(),
        resolve,
        move |router| {
            let names = router
                .routes()
                .iter()
                .map(|r| r.handler_name.to_string())
                .collect();
            updates_clone.lock().unwrap().push(names);
        },
    )
    .expect("watch_manifest");

    // allow watcher thread to start
    std::thread::sleep(Duration::from_millis(100));

    std::fs::write(file.path(), MANIFEST_V2).unwrap();

    // wait for callback to receive update
    for _ in 0..40 {
        {
            let ups = updates.lock().unwrap();
            if ups.iter().any(|v| v.contains(&"foo_two".to_string())) {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    let ups = updates.lock().unwrap();
    assert!(ups.iter().any(|v| v.contains(&"foo_two".to_string())));

    let router = shared.load();
    assert_eq!(router.route(&Method::GET, "/foo").unwrap().handler, "foo_two");
    assert_eq!(
        router.route(&Method::GET, "/bar/9").unwrap().get_path_param("id"),
        Some("9")
    );

    drop(watcher);
}

#[test]
fn test_reload_swaps_router() {
    let file = temp_manifest(MANIFEST_V1);
    let shared = shared_from(file.path());
    let before = shared.load_full();

    std::fs::write(file.path(), MANIFEST_V2).unwrap();
    let after = reload_manifest(file.path(), &shared, RouterConfig::default(), resolve)
        .expect("reload succeeds");

    assert_eq!(after.routes().len(), 2);
    assert!(Arc::ptr_eq(&after, &shared.load_full()));
    // Readers holding the old snapshot keep it intact.
    assert_eq!(before.route(&Method::GET, "/foo").unwrap().handler, "foo_one");
}

#[test]
fn test_invalid_manifest_keeps_previous_router() {
    let file = temp_manifest(MANIFEST_V1);
    let shared = shared_from(file.path());

    std::fs::write(file.path(), "routes: [ this is not a route").unwrap();
    assert!(reload_manifest(file.path(), &shared, RouterConfig::default(), resolve).is_none());

    std::fs::write(
        file.path(),
        "routes:\n  - method: GET\n    path: /files/*/x\n    handler: bad\n",
    )
    .unwrap();
    assert!(reload_manifest(file.path(), &shared, RouterConfig::default(), resolve).is_none());

    let router = shared.load();
    assert_eq!(router.route(&Method::GET, "/foo").unwrap().handler, "foo_one");
}

#[test]
fn test_unresolved_handler_keeps_previous_router() {
    let file = temp_manifest(MANIFEST_V1);
    let shared = shared_from(file.path());

    std::fs::write(file.path(), MANIFEST_V2).unwrap();
    let only_foo = |name: &str| (name != "bar").then(|| name.to_string());
    assert!(reload_manifest(file.path(), &shared, RouterConfig::default(), only_foo).is_none());
    assert_eq!(shared.load().routes().len(), 1);
}
