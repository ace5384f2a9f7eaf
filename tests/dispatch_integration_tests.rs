//! Integration tests for the request round trip
//!
//! These tests drive a real Coordinator (host thread included) and verify:
//! - Initial builds the catalog files and fills the primary list
//! - ChangeSelection fills the secondary list for the chosen group
//! - Requests are refused while one is in flight
//! - The host loop survives failing and panicking dispatches
//! - Shutdown stays available while a dispatch hangs

use paramgroups::host::{Attribute, AttributeDefinition, HostError, Item, ItemId, ItemKind};
use paramgroups::models::{AttributeId, Category};
use paramgroups::services::CatalogStore;
use paramgroups::{
    Coordinator, HostDocument, InMemoryDocument, RequestCode, RequestError, ViewChange,
};
use std::fs;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use tempfile::TempDir;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

fn attribute(category: &str, id: &str) -> Attribute {
    Attribute {
        name: id.to_uppercase(),
        shared: false,
        definition: Some(AttributeDefinition {
            category: Some(Category::new(category)),
            identifier: AttributeId::new(id),
        }),
    }
}

/// I1 carries p1 (Text) and p2 (Geometry); T1 carries p1 again.
fn two_item_document() -> InMemoryDocument {
    InMemoryDocument::new(vec![
        Item {
            id: ItemId(1),
            kind: ItemKind::Instance,
            attributes: vec![attribute("Text", "p1"), attribute("Geometry", "p2")],
        },
        Item {
            id: ItemId(2),
            kind: ItemKind::Type,
            attributes: vec![attribute("Text", "p1")],
        },
    ])
}

fn store_in(temp_dir: &TempDir) -> CatalogStore {
    let dir = temp_dir.path().to_str().unwrap();
    CatalogStore::new(
        format!("{}/ParameterGroups.txt", dir),
        format!("{}/ParameterGroups2.txt", dir),
    )
}

/// Collect view changes until the controls are re-armed.
async fn until_armed(rx: &mut broadcast::Receiver<ViewChange>) -> Vec<ViewChange> {
    let mut seen = Vec::new();
    loop {
        let change = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("Timeout waiting for re-arm")
            .expect("Channel closed");
        let armed = change == ViewChange::ControlsArmed;
        seen.push(change);
        if armed {
            return seen;
        }
    }
}

#[tokio::test]
async fn test_initial_builds_catalog_and_primary_list() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    let catalog_path = store.catalog_path().to_owned();
    let index_path = store.index_path().to_owned();

    let coordinator = Coordinator::start(two_item_document(), store).unwrap();
    let mut rx = coordinator.view().subscribe();

    coordinator.make_request(RequestCode::Initial).unwrap();
    let changes = until_armed(&mut rx).await;

    assert_eq!(
        changes.first(),
        Some(&ViewChange::ControlsDisabled {
            request: RequestCode::Initial
        })
    );
    assert!(changes.contains(&ViewChange::GroupsLoaded {
        titles: vec!["1. Text".to_string(), "2. Geometry".to_string()],
    }));

    assert_eq!(
        fs::read_to_string(&catalog_path).unwrap(),
        "1. Text\n        p1\n2. Geometry\n        p2\n"
    );
    assert_eq!(
        fs::read_to_string(&index_path).unwrap(),
        "1 - p1\n2 - p2\n"
    );

    let view = coordinator.view().snapshot();
    assert!(view.controls_enabled);
    assert!(view.shown_on_top);
    assert_eq!(
        coordinator
            .metrics()
            .initial_requests
            .load(Ordering::Relaxed),
        1
    );

    coordinator.shutdown();
}

#[tokio::test]
async fn test_change_selection_fills_secondary_list() {
    let temp_dir = TempDir::new().unwrap();
    let coordinator = Coordinator::start(two_item_document(), store_in(&temp_dir)).unwrap();
    let mut rx = coordinator.view().subscribe();

    coordinator.make_request(RequestCode::Initial).unwrap();
    until_armed(&mut rx).await;

    let title = coordinator.select_group(2).unwrap();
    assert_eq!(title, "2. Geometry");
    let changes = until_armed(&mut rx).await;

    assert!(changes.contains(&ViewChange::AttributesLoaded {
        attributes: vec![AttributeId::new("p2")],
    }));

    coordinator.select_group(1).unwrap();
    until_armed(&mut rx).await;
    assert_eq!(
        coordinator.view().snapshot().attributes,
        vec![AttributeId::new("p1")]
    );

    assert_eq!(
        coordinator.select_group(3),
        Err(RequestError::NoSuchGroup(3))
    );
}

/// Blocks inside the first host query until the test lets it go.
struct GatedDocument {
    gate: Mutex<mpsc::Receiver<()>>,
    inner: InMemoryDocument,
}

impl HostDocument for GatedDocument {
    fn collect_instances(&self) -> Result<Vec<Item>, HostError> {
        let _ = self.gate.lock().unwrap().recv();
        self.inner.collect_instances()
    }

    fn collect_type_definitions(&self) -> Result<Vec<Item>, HostError> {
        self.inner.collect_type_definitions()
    }
}

#[tokio::test]
async fn test_request_refused_while_in_flight() {
    let temp_dir = TempDir::new().unwrap();
    let (release, gate) = mpsc::channel();
    let document = GatedDocument {
        gate: Mutex::new(gate),
        inner: two_item_document(),
    };

    let coordinator = Coordinator::start(document, store_in(&temp_dir)).unwrap();
    let mut rx = coordinator.view().subscribe();

    coordinator.make_request(RequestCode::Initial).unwrap();

    assert_eq!(
        coordinator.make_request(RequestCode::ChangeSelection),
        Err(RequestError::Busy(RequestCode::Initial))
    );
    assert_eq!(
        coordinator.select_group(1),
        Err(RequestError::Busy(RequestCode::Initial))
    );
    assert!(coordinator.view().snapshot().is_busy());

    release.send(()).unwrap();
    until_armed(&mut rx).await;

    assert!(!coordinator.view().snapshot().is_busy());
    assert_eq!(coordinator.view().snapshot().group_titles.len(), 2);
}

/// Fails or panics on the first query, then behaves.
struct FlakyDocument {
    tripped: AtomicBool,
    panic: bool,
    inner: InMemoryDocument,
}

impl FlakyDocument {
    fn new(panic: bool) -> Self {
        Self {
            tripped: AtomicBool::new(false),
            panic,
            inner: two_item_document(),
        }
    }
}

impl HostDocument for FlakyDocument {
    fn collect_instances(&self) -> Result<Vec<Item>, HostError> {
        if !self.tripped.swap(true, Ordering::SeqCst) {
            if self.panic {
                panic!("host query blew up");
            }
            return Err(HostError::QueryFailed("document is locked".to_string()));
        }
        self.inner.collect_instances()
    }

    fn collect_type_definitions(&self) -> Result<Vec<Item>, HostError> {
        self.inner.collect_type_definitions()
    }
}

#[tokio::test]
async fn test_failed_dispatch_rearms_and_loop_continues() {
    let temp_dir = TempDir::new().unwrap();
    let coordinator = Coordinator::start(FlakyDocument::new(false), store_in(&temp_dir)).unwrap();
    let mut rx = coordinator.view().subscribe();

    coordinator.make_request(RequestCode::Initial).unwrap();
    until_armed(&mut rx).await;
    assert!(coordinator.view().snapshot().group_titles.is_empty());
    assert_eq!(
        coordinator
            .metrics()
            .failed_dispatches
            .load(Ordering::Relaxed),
        1
    );

    coordinator.make_request(RequestCode::Initial).unwrap();
    until_armed(&mut rx).await;
    assert_eq!(coordinator.view().snapshot().group_titles.len(), 2);
}

#[tokio::test]
async fn test_panicking_dispatch_rearms_and_loop_continues() {
    let temp_dir = TempDir::new().unwrap();
    let coordinator = Coordinator::start(FlakyDocument::new(true), store_in(&temp_dir)).unwrap();
    let mut rx = coordinator.view().subscribe();

    coordinator.make_request(RequestCode::Initial).unwrap();
    until_armed(&mut rx).await;

    coordinator.make_request(RequestCode::Initial).unwrap();
    until_armed(&mut rx).await;
    assert_eq!(coordinator.view().snapshot().group_titles.len(), 2);
}

#[tokio::test]
async fn test_selection_before_initial_gives_empty_list() {
    let temp_dir = TempDir::new().unwrap();
    let coordinator = Coordinator::start(two_item_document(), store_in(&temp_dir)).unwrap();
    let mut rx = coordinator.view().subscribe();

    coordinator.make_request(RequestCode::ChangeSelection).unwrap();
    until_armed(&mut rx).await;

    let view = coordinator.view().snapshot();
    assert!(view.attributes.is_empty());
    assert!(view.controls_enabled);
}

#[test]
fn test_shutdown_returns_while_dispatch_hangs() {
    let temp_dir = TempDir::new().unwrap();
    let (release, gate) = mpsc::channel();
    let document = GatedDocument {
        gate: Mutex::new(gate),
        inner: two_item_document(),
    };

    let coordinator = Coordinator::start(document, store_in(&temp_dir)).unwrap();
    coordinator.make_request(RequestCode::Initial).unwrap();
    let view = coordinator.view().clone();

    let (done_tx, done_rx) = mpsc::channel();
    std::thread::spawn(move || {
        coordinator.shutdown_within(std::time::Duration::from_millis(100));
        let _ = done_tx.send(());
    });

    assert!(
        done_rx
            .recv_timeout(std::time::Duration::from_secs(3))
            .is_ok(),
        "shutdown blocked behind a hung dispatch"
    );
    assert!(view.snapshot().is_busy());

    // Let the detached dispatch finish
    release.send(()).unwrap();
}

#[test]
fn test_shutdown_joins_host_thread() {
    let temp_dir = TempDir::new().unwrap();
    let coordinator = Coordinator::start(two_item_document(), store_in(&temp_dir)).unwrap();

    coordinator.make_request(RequestCode::Initial).unwrap();
    let view = coordinator.view().clone();
    coordinator.shutdown();

    // The queued request ran before the thread exited
    assert_eq!(view.snapshot().group_titles.len(), 2);
    assert!(view.snapshot().controls_enabled);
}
