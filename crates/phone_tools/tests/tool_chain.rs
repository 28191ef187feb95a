//! Identifier chaining through the tool facade

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use phone_tools::{session_key, DataPaths, DeviceTools, Discovery, Swipe, MULTIPLE_DEVICES_PROMPT};
use rstest::rstest;
use tempfile::{tempdir, TempDir};

use common::{sample_recognition, FakeSdk, Script};

fn tools_with(script: &Arc<Script>) -> (DeviceTools, TempDir) {
    let data = tempdir().unwrap();
    let tools = DeviceTools::new(FakeSdk::new(Arc::clone(script)), DataPaths::new(data.path()));
    (tools, data)
}

fn bundle_dir() -> TempDir {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("model").join("ocr")).unwrap();
    dir
}

async fn connected(tools: &DeviceTools) -> String {
    tools.find_endpoints().await;
    tools.connect("emulator-5554").await.unwrap()
}

#[rstest]
#[case::none(&[], Discovery::Empty)]
#[case::one(&["emulator-5554"], Discovery::Single("emulator-5554".to_string()))]
#[case::two(
    &["emulator-5554", "192.168.1.20:5555"],
    Discovery::Multiple {
        candidates: vec!["emulator-5554".to_string(), "192.168.1.20:5555".to_string()],
        prompt: MULTIPLE_DEVICES_PROMPT.to_string(),
    }
)]
#[tokio::test]
async fn test_find_endpoints_shapes(#[case] devices: &[&str], #[case] expected: Discovery) {
    let script = Script::with_devices(devices);
    let (tools, _data) = tools_with(&script);

    assert_eq!(tools.find_endpoints().await, expected);
    assert_eq!(tools.registry().count(), devices.len());
    for name in devices {
        assert!(tools.registry().exists(name));
    }
}

#[tokio::test]
async fn test_find_endpoints_discovery_failure_is_empty() {
    let script = Script::with_devices(&["emulator-5554"]);
    script.discover_fails.store(true, Ordering::SeqCst);
    let (tools, _data) = tools_with(&script);

    assert_eq!(tools.find_endpoints().await, Discovery::Empty);
}

#[tokio::test]
async fn test_rediscovery_overwrites_by_name() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);

    tools.find_endpoints().await;
    tools.find_endpoints().await;
    assert_eq!(tools.registry().count(), 1);
}

#[tokio::test]
async fn test_connect_unknown_name() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);

    // Not discovered yet
    assert_eq!(tools.connect("emulator-5554").await, None);
    assert_eq!(tools.connect("nonexistent").await, None);
}

#[tokio::test]
async fn test_connect_failure() {
    let script = Script::with_devices(&["emulator-5554"]);
    script.connect_fails.store(true, Ordering::SeqCst);
    let (tools, _data) = tools_with(&script);

    tools.find_endpoints().await;
    assert_eq!(tools.connect("emulator-5554").await, None);
    assert_eq!(tools.registry().count(), 1);
}

#[tokio::test]
async fn test_connect_rejects_wrong_kind() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);
    let bundle = bundle_dir();

    let resource = tools.load_resource(bundle.path()).await.unwrap();
    assert_eq!(tools.connect(&resource).await, None);
}

#[tokio::test]
async fn test_load_resource() {
    let script = Script::with_devices(&[]);
    let (tools, _data) = tools_with(&script);
    let bundle = bundle_dir();

    let id = tools.load_resource(bundle.path()).await.unwrap();
    assert!(tools.registry().exists(&id));

    let missing = bundle.path().join("missing");
    assert_eq!(tools.load_resource(&missing).await, None);

    // Exists on disk but the backend rejects it
    let empty = tempdir().unwrap();
    assert_eq!(tools.load_resource(empty.path()).await, None);
}

#[tokio::test]
async fn test_create_session_reuses_pair() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);
    let bundle = bundle_dir();

    let controller = connected(&tools).await;
    let resource = tools.load_resource(bundle.path()).await.unwrap();

    let first = tools.create_session(&controller, &resource).await.unwrap();
    let second = tools.create_session(&controller, &resource).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, session_key(&controller, &resource));
    assert_eq!(script.binds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_create_session_distinct_pairs() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);
    let bundle = bundle_dir();

    let controller = connected(&tools).await;
    let first_resource = tools.load_resource(bundle.path()).await.unwrap();
    let second_resource = tools.load_resource(bundle.path()).await.unwrap();

    let a = tools.create_session(&controller, &first_resource).await.unwrap();
    let b = tools.create_session(&controller, &second_resource).await.unwrap();
    assert_ne!(a, b);
    assert_eq!(script.binds.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_create_session_unresolved_ids() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);
    let bundle = bundle_dir();

    let controller = connected(&tools).await;
    let resource = tools.load_resource(bundle.path()).await.unwrap();

    assert_eq!(tools.create_session("nope", &resource).await, None);
    assert_eq!(tools.create_session(&controller, "nope").await, None);
    // Arguments swapped: kinds do not match
    assert_eq!(tools.create_session(&resource, &controller).await, None);
    assert_eq!(script.binds.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_create_session_bind_failure() {
    let script = Script::with_devices(&["emulator-5554"]);
    script.bind_fails.store(true, Ordering::SeqCst);
    let (tools, _data) = tools_with(&script);
    let bundle = bundle_dir();

    let controller = connected(&tools).await;
    let resource = tools.load_resource(bundle.path()).await.unwrap();

    assert_eq!(tools.create_session(&controller, &resource).await, None);
    assert!(!tools.registry().exists(&session_key(&controller, &resource)));
}

#[tokio::test]
async fn test_release_controller_drops_sessions() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);
    let bundle = bundle_dir();

    let controller = connected(&tools).await;
    let resource = tools.load_resource(bundle.path()).await.unwrap();
    let session = tools.create_session(&controller, &resource).await.unwrap();

    assert!(tools.release(&controller));
    assert!(!tools.release(&controller));
    assert!(!tools.registry().exists(&session));

    assert_eq!(tools.recognize(&session).await, None);
    assert_eq!(tools.create_session(&controller, &resource).await, None);
}

#[tokio::test]
async fn test_stale_cached_session_is_not_reused() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);
    let bundle = bundle_dir();

    let controller = connected(&tools).await;
    let resource = tools.load_resource(bundle.path()).await.unwrap();
    let session = tools.create_session(&controller, &resource).await.unwrap();

    // Bypass release so the cached session survives its resource
    assert!(tools.registry().unregister(&resource));
    assert_eq!(tools.create_session(&controller, &resource).await, None);
    assert!(!tools.registry().exists(&session));
}

#[tokio::test]
async fn test_release_session_rebinds() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);
    let bundle = bundle_dir();

    let controller = connected(&tools).await;
    let resource = tools.load_resource(bundle.path()).await.unwrap();
    let session = tools.create_session(&controller, &resource).await.unwrap();

    assert!(tools.release(&session));
    assert!(tools.registry().exists(&controller));

    let again = tools.create_session(&controller, &resource).await.unwrap();
    assert_eq!(again, session);
    assert_eq!(script.binds.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_click_and_swipe() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);
    let controller = connected(&tools).await;

    assert!(tools.click(&controller, 540, 1200).await);
    let gesture = Swipe {
        start_x: 540,
        start_y: 1800,
        end_x: 540,
        end_y: 600,
        duration_ms: 300,
    };
    assert!(tools.swipe(&controller, gesture).await);
    assert!(tools.input_text(&controller, "hello").await);

    assert_eq!(
        script.actions(),
        vec!["click 540 1200", "swipe 540 1800 540 600 300", "text hello"]
    );
}

#[tokio::test]
async fn test_actions_with_unknown_controller() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);
    tools.find_endpoints().await;

    let gesture = Swipe {
        start_x: 0,
        start_y: 0,
        end_x: 10,
        end_y: 10,
        duration_ms: 100,
    };
    assert!(!tools.click("unknown", 1, 2).await);
    assert!(!tools.swipe("unknown", gesture).await);
    assert!(!tools.input_text("unknown", "x").await);
    // An endpoint name is not a controller id
    assert!(!tools.click("emulator-5554", 1, 2).await);
    assert!(script.actions().is_empty());
}

#[tokio::test]
async fn test_action_device_failure() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);
    let controller = connected(&tools).await;

    script.input_fails.store(true, Ordering::SeqCst);
    assert!(!tools.click(&controller, 1, 2).await);
}

#[tokio::test]
async fn test_screencap_writes_png() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, data) = tools_with(&script);
    let controller = connected(&tools).await;

    let path = tools.screencap(&controller).await.unwrap();
    assert!(path.starts_with(data.path().join("debug").join("screenshots")));

    let saved = image::open(&path).unwrap();
    assert_eq!((saved.width(), saved.height()), (4, 8));

    script.capture_fails.store(true, Ordering::SeqCst);
    assert_eq!(tools.screencap(&controller).await, None);
    assert_eq!(tools.screencap("unknown").await, None);
}

#[tokio::test]
async fn test_end_to_end_workflow() {
    let script = Script::with_devices(&["deviceA"]);
    let (tools, _data) = tools_with(&script);
    let bundle = bundle_dir();

    let name = match tools.find_endpoints().await {
        Discovery::Single(name) => name,
        other => panic!("unexpected discovery: {:?}", other),
    };
    let controller = tools.connect(&name).await.unwrap();
    let resource = tools.load_resource(bundle.path()).await.unwrap();
    let session = tools.create_session(&controller, &resource).await.unwrap();

    let result = tools.recognize(&session).await.unwrap();
    assert_eq!(result, sample_recognition());

    let (x, y) = result[0].bbox.center();
    assert!(tools.click(&controller, x, y).await);

    script.capture_fails.store(true, Ordering::SeqCst);
    assert_eq!(tools.recognize(&session).await, None);

    // Device, controller, resource, session
    assert_eq!(tools.registry().count(), 4);
}

#[tokio::test]
async fn test_recognize_unknown_session() {
    let script = Script::with_devices(&["emulator-5554"]);
    let (tools, _data) = tools_with(&script);
    let controller = connected(&tools).await;

    assert_eq!(tools.recognize("unknown").await, None);
    assert_eq!(tools.recognize(&controller).await, None);
}
