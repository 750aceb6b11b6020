//! Shared and persisted layouts across groups and documents.
//!
//! Two `MemoryDom`s over clones of one `MemoryStorage` stand in for two tabs
//! of the same origin.

use flexpanels_layout::Orientation;
use flexpanels_store::{GroupId, MemoryStorage, SnapshotStore, StorageBackend, StoreConfig};
use flexpanels_web::{
    DomHost, GroupBinding, MemoryDom, NodeId, PanelOptions, PointerPosition, ResizeController,
    hydrate_group,
};
use pretty_assertions::assert_eq;

const STORED: &str = r#"{"flexValues":{"p-p1-1":"0 0 54.7%","p-p1-2":"1"}}"#;

/// Render a two-panel `p:p1` group; returns `(group, first panel, resizer)`.
fn render(dom: &mut MemoryDom, store: &SnapshotStore) -> (NodeId, NodeId, NodeId) {
    let id = GroupId::persistent("p1");
    let snapshot = store.get_snapshot(id.as_str()).unwrap();
    let group = dom.create_group(dom.body(), &id, Orientation::Horizontal, snapshot.as_ref());
    dom.set_size(group, 1000.0, 300.0);
    let first = dom.create_panel(group, PanelOptions::default());
    let resizer = dom.create_resizer(group);
    dom.create_panel(group, PanelOptions::default());
    (group, first, resizer)
}

fn width(dom: &MemoryDom, node: NodeId) -> f64 {
    dom.offset_size(&node, Orientation::Horizontal)
}

#[test]
fn groups_sharing_an_id_follow_each_other_after_commit() {
    let storage = MemoryStorage::new();
    let store = SnapshotStore::new(storage.clone());
    let mut dom = MemoryDom::new();

    let (group_a, first_a, resizer_a) = render(&mut dom, &store);
    let (group_b, first_b, _) = render(&mut dom, &store);
    let binding_a = GroupBinding::bind(&store, "p:p1", group_a);
    let binding_b = GroupBinding::bind(&store, "p:p1", group_b);
    assert_eq!(store.subscriber_count("p:p1"), 2);

    let mut controller = ResizeController::default();
    controller
        .pointer_down(&mut dom, &resizer_a, PointerPosition::new(500.0, 0.0), 0, true)
        .unwrap();
    controller
        .pointer_move(&mut dom, &store, PointerPosition::new(550.0, 0.0))
        .unwrap();
    assert_eq!(width(&dom, first_a), 547.0);
    assert_eq!(width(&dom, first_b), 497.0);
    assert!(!binding_b.is_stale());

    controller
        .pointer_up(&mut dom, &store, PointerPosition::new(550.0, 0.0))
        .unwrap();
    assert!(binding_b.is_stale());
    assert_eq!(width(&dom, first_b), 497.0);

    assert!(binding_a.sync(&mut dom).unwrap());
    assert!(binding_b.sync(&mut dom).unwrap());
    assert_eq!(width(&dom, first_b), 547.0);
    assert_eq!(storage.get_item("--fp-p:p1").unwrap().as_deref(), Some(STORED));
}

#[test]
fn reload_renders_the_persisted_layout() {
    let storage = MemoryStorage::new();
    storage.set_item("--fp-p:p1", STORED).unwrap();

    let store = SnapshotStore::new(storage);
    let mut dom = MemoryDom::new();
    let (group, first, _) = render(&mut dom, &store);

    assert_eq!(width(&dom, first), 547.0);
    assert_eq!(dom.attribute(&group, "data-dirty").as_deref(), Some("true"));
}

#[test]
fn server_rendered_markup_is_hydrated_from_storage() {
    let storage = MemoryStorage::new();
    storage.set_item("--fp-p:p1", STORED).unwrap();

    // Rendered without access to storage, then hydrated before paint.
    let mut dom = MemoryDom::new();
    let (group, first, _) = render(&mut dom, &SnapshotStore::without_storage());
    assert_eq!(width(&dom, first), 497.0);

    assert!(hydrate_group(&mut dom, &storage, &StoreConfig::default(), &group).unwrap());
    assert_eq!(width(&dom, first), 547.0);
}

#[test]
fn storage_events_update_other_documents() {
    let storage = MemoryStorage::new();
    let store_one = SnapshotStore::new(storage.clone());
    let store_two = SnapshotStore::new(storage.clone());

    let mut dom_one = MemoryDom::new();
    let mut dom_two = MemoryDom::new();
    let (_, _, resizer_one) = render(&mut dom_one, &store_one);
    let (group_two, first_two, _) = render(&mut dom_two, &store_two);
    let binding_two = GroupBinding::bind(&store_two, "p:p1", group_two);

    let mut controller = ResizeController::default();
    controller
        .pointer_down(&mut dom_one, &resizer_one, PointerPosition::new(500.0, 0.0), 0, true)
        .unwrap();
    controller
        .pointer_up(&mut dom_one, &store_one, PointerPosition::new(550.0, 0.0))
        .unwrap();
    assert!(!binding_two.is_stale());

    let raw = storage.get_item("--fp-p:p1").unwrap();
    assert!(
        store_two
            .handle_storage_event("--fp-p:p1", raw.as_deref())
            .unwrap()
    );
    assert!(binding_two.sync(&mut dom_two).unwrap());
    assert_eq!(width(&dom_two, first_two), 547.0);

    // Foreign keys and removals are not ours to apply.
    assert!(!store_two.handle_storage_event("theme", Some("dark")).unwrap());
    assert!(!store_two.handle_storage_event("--fp-p:p1", None).unwrap());
}
