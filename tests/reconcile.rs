mod support;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use greencart::{
    LineItem, NoticeKind, ProbeError, ReconcileWorker, Reconciler,
};
use support::{pending_report, report, stores, ScriptedProbe, Stores};

fn seed(stores: &Stores) {
    stores
        .cart
        .add(LineItem {
            id: "P1".to_string(),
            name: "Bamboo Tumbler".to_string(),
            price: 50000.0,
            image: String::new(),
            quantity: 1,
        })
        .unwrap();
    stores.sessions.begin("tok-1", "ORDER-1").unwrap();
}

fn reconciler(stores: &Stores) -> Arc<Reconciler<greencart::MemoryStorage>> {
    Arc::new(Reconciler::new(
        Arc::clone(&stores.cart),
        Arc::clone(&stores.sessions),
        Arc::clone(&stores.notices),
    ))
}

fn worker(
    stores: &Stores,
    fast: Arc<ScriptedProbe>,
    slow: Arc<ScriptedProbe>,
) -> ReconcileWorker<greencart::MemoryStorage, Arc<ScriptedProbe>, Arc<ScriptedProbe>> {
    ReconcileWorker::new(reconciler(stores), fast, slow)
        .with_fast_interval(Duration::from_millis(10))
        .with_slow_interval(Duration::from_secs(60))
        .with_tick(Duration::from_millis(5))
}

#[test]
fn settlement_on_the_fast_probe_clears_cart_and_session() {
    let stores = stores();
    seed(&stores);

    let fast = Arc::new(ScriptedProbe::new());
    fast.push(Ok(report("settlement", "ORDER-1")));
    let slow = Arc::new(ScriptedProbe::new());

    let handle = worker(&stores, fast, slow).spawn();
    thread::sleep(Duration::from_millis(200));
    let stats = handle.stop();

    assert!(stores.cart.is_empty().unwrap());
    assert!(!stores.sessions.is_payment_in_progress().unwrap());
    assert_eq!(stats.fast_polls, 1);
    assert_eq!(stats.resolutions, 1);
    assert_eq!(stats.slow_polls, 0);

    let notices = stores.notices.take_all();
    assert!(notices
        .iter()
        .any(|notice| notice.kind == NoticeKind::Success));
}

#[test]
fn expiry_on_the_fast_probe_clears_session_but_keeps_cart() {
    let stores = stores();
    seed(&stores);

    let fast = Arc::new(ScriptedProbe::new());
    fast.push(Ok(report("expire", "ORDER-1")));

    let handle = worker(&stores, fast, Arc::new(ScriptedProbe::new())).spawn();
    thread::sleep(Duration::from_millis(200));
    let stats = handle.stop();

    assert_eq!(stores.cart.len().unwrap(), 1);
    assert!(!stores.sessions.is_payment_in_progress().unwrap());
    assert_eq!(stats.resolutions, 1);

    let notices = stores.notices.take_all();
    assert!(notices[0].message.contains("expired"));
}

#[test]
fn three_probe_errors_stop_the_fast_cadence_and_leave_the_session() {
    let stores = stores();
    seed(&stores);

    let fast = Arc::new(ScriptedProbe::new());
    for _ in 0..3 {
        fast.push(Err(ProbeError::Network("timeout".to_string())));
    }

    let handle = worker(&stores, Arc::clone(&fast), Arc::new(ScriptedProbe::new())).spawn();
    thread::sleep(Duration::from_millis(300));
    let stats = handle.stop();

    // fast cadence disabled itself after the third failure
    assert_eq!(stats.fast_polls, 3);
    assert_eq!(stats.probe_errors, 3);
    assert_eq!(stats.resolutions, 0);

    // the session is untouched; the failure was in the check
    let session = stores.sessions.current().unwrap().unwrap();
    assert_eq!(session.token, "tok-1");
    assert_eq!(stores.cart.len().unwrap(), 1);

    let notices = stores.notices.take_all();
    assert!(notices
        .iter()
        .any(|notice| notice.kind == NoticeKind::Warning && notice.message.contains("refresh")));
}

#[test]
fn a_successful_read_resets_the_retry_counter() {
    let stores = stores();
    seed(&stores);

    let fast = Arc::new(ScriptedProbe::new());
    fast.push(Err(ProbeError::Network("timeout".to_string())));
    fast.push(Err(ProbeError::Network("timeout".to_string())));
    fast.push(Ok(pending_report("ORDER-1")));
    fast.push(Err(ProbeError::Network("timeout".to_string())));
    fast.push(Err(ProbeError::Network("timeout".to_string())));
    // five polls: two errors, a good read, two more errors; never three in a row

    let handle = worker(&stores, Arc::clone(&fast), Arc::new(ScriptedProbe::new())).spawn();
    thread::sleep(Duration::from_millis(200));
    let stats = handle.stop();

    assert!(stats.fast_polls >= 5);
    assert!(stores.sessions.is_payment_in_progress().unwrap());
    assert!(!stores
        .notices
        .take_all()
        .iter()
        .any(|notice| notice.message.contains("refresh")));
}

#[test]
fn the_slow_probe_is_a_backstop_when_the_fast_one_is_down() {
    let stores = stores();
    seed(&stores);

    let fast = Arc::new(ScriptedProbe::new());
    for _ in 0..3 {
        fast.push(Err(ProbeError::Network("timeout".to_string())));
    }
    let slow = Arc::new(ScriptedProbe::new());
    slow.push(Ok(report("cancel", "ORDER-1")));

    let handle = ReconcileWorker::new(reconciler(&stores), fast, slow)
        .with_fast_interval(Duration::from_millis(10))
        .with_slow_interval(Duration::from_millis(80))
        .with_tick(Duration::from_millis(5))
        .spawn();
    thread::sleep(Duration::from_millis(400));
    let stats = handle.stop();

    assert!(stats.slow_polls >= 1);
    assert_eq!(stats.resolutions, 1);
    assert!(!stores.sessions.is_payment_in_progress().unwrap());
    assert_eq!(stores.cart.len().unwrap(), 1);
}

#[test]
fn slow_probe_errors_are_ignored() {
    let stores = stores();
    seed(&stores);

    let fast = Arc::new(ScriptedProbe::new());
    let slow = Arc::new(ScriptedProbe::new());
    for _ in 0..10 {
        slow.push(Err(ProbeError::Network("proxy down".to_string())));
    }

    let handle = ReconcileWorker::new(reconciler(&stores), fast, slow)
        .with_fast_interval(Duration::from_millis(10))
        .with_slow_interval(Duration::from_millis(20))
        .with_tick(Duration::from_millis(5))
        .spawn();
    thread::sleep(Duration::from_millis(200));
    let stats = handle.stop();

    // still polling, session still live, no refresh warning
    assert!(stats.slow_polls >= 2);
    assert!(stores.sessions.is_payment_in_progress().unwrap());
    assert!(!stores
        .notices
        .take_all()
        .iter()
        .any(|notice| notice.message.contains("refresh")));
}

#[test]
fn worker_exits_when_there_is_nothing_to_watch() {
    let stores = stores();
    // session but empty cart
    stores.sessions.begin("tok-1", "ORDER-1").unwrap();

    let handle = worker(
        &stores,
        Arc::new(ScriptedProbe::new()),
        Arc::new(ScriptedProbe::new()),
    )
    .spawn();
    thread::sleep(Duration::from_millis(100));
    let stats = handle.stop();

    assert_eq!(stats.fast_polls, 0);
    assert_eq!(stats.slow_polls, 0);
}

#[test]
fn dropping_the_handle_stops_the_worker() {
    let stores = stores();
    seed(&stores);

    let handle = worker(
        &stores,
        Arc::new(ScriptedProbe::new()),
        Arc::new(ScriptedProbe::new()),
    )
    .spawn();
    thread::sleep(Duration::from_millis(50));
    drop(handle);

    // the session was never resolved; polling just stopped
    assert!(stores.sessions.is_payment_in_progress().unwrap());
}
