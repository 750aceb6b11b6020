//! End-to-end gestures over a `MemoryDom` document.

use flexpanels_layout::Orientation;
use flexpanels_store::{GroupId, SnapshotStore};
use flexpanels_web::{
    DomHost, GroupObserver, KeyModifiers, ListenerCommand, ListenerSet, MemoryDom, NodeId,
    PanelOptions, PointerPosition, ResizeController, ResizeEffect, handle_group_changes,
};
use pretty_assertions::assert_eq;

struct Row {
    dom: MemoryDom,
    store: SnapshotStore,
    group: NodeId,
    left: NodeId,
    resizer: NodeId,
    right: NodeId,
}

fn row(id: &str) -> Row {
    let mut dom = MemoryDom::new();
    let group = dom.create_group(
        dom.body(),
        &GroupId::generated(id),
        Orientation::Horizontal,
        None,
    );
    dom.set_size(group, 1000.0, 400.0);
    let left = dom.create_panel(group, PanelOptions::default());
    let resizer = dom.create_resizer(group);
    let right = dom.create_panel(group, PanelOptions::default());
    dom.freeze_child_ids(group);
    Row {
        dom,
        store: SnapshotStore::without_storage(),
        group,
        left,
        resizer,
        right,
    }
}

impl Row {
    fn width(&self, node: NodeId) -> f64 {
        self.dom.offset_size(&node, Orientation::Horizontal)
    }

    fn aria(&self, name: &str) -> Option<String> {
        self.dom.attribute(&self.resizer, name)
    }
}

fn at(x: f64) -> PointerPosition {
    PointerPosition::new(x, 200.0)
}

#[test]
fn drag_moves_the_resizer_and_updates_aria() {
    let mut row = row("drag");
    let mut controller = ResizeController::default();

    handle_group_changes(&mut row.dom, &row.store, &row.group).unwrap();
    assert_eq!(row.aria("aria-valuenow").as_deref(), Some("497"));
    assert_eq!(row.aria("aria-valuemin").as_deref(), Some("0"));
    assert_eq!(row.aria("aria-valuemax").as_deref(), Some("994"));

    let down = controller
        .pointer_down(&mut row.dom, &row.resizer, at(500.0), 0, true)
        .unwrap();
    assert_eq!(
        down.listeners,
        Some(ListenerCommand::Attach(ListenerSet::Pointer))
    );
    assert!(row.dom.body_has_class("fp-resizing"));
    assert!(row.dom.body_has_class("fp-horizontal"));

    controller
        .pointer_move(&mut row.dom, &row.store, at(530.0))
        .unwrap();
    assert_eq!(row.width(row.left), 527.0);
    assert_eq!(row.aria("aria-valuenow").as_deref(), Some("497"));

    let up = controller
        .pointer_up(&mut row.dom, &row.store, at(550.0))
        .unwrap();
    assert!(matches!(up.effect, Some(ResizeEffect::Committed(_))));
    assert_eq!(
        up.listeners,
        Some(ListenerCommand::Detach(ListenerSet::Pointer))
    );
    assert_eq!(row.width(row.left), 547.0);
    assert_eq!(row.width(row.right), 447.0);
    assert_eq!(row.aria("aria-valuenow").as_deref(), Some("547"));
    assert!(!row.dom.body_has_class("fp-resizing"));
    assert!(!controller.is_dragging());

    let snapshot = row.store.get_snapshot("g:drag").unwrap().unwrap();
    assert_eq!(snapshot.flex_value("g-drag-1"), Some("0 0 54.7%"));
    assert_eq!(snapshot.flex_value("g-drag-2"), Some("1"));
}

#[test]
fn right_to_left_groups_mirror_pointer_offsets() {
    let mut row = row("rtl");
    row.dom.set_computed_style(row.group, "direction", "rtl");
    let mut controller = ResizeController::default();

    controller
        .pointer_down(&mut row.dom, &row.resizer, at(500.0), 0, true)
        .unwrap();
    let up = controller
        .pointer_up(&mut row.dom, &row.store, at(550.0))
        .unwrap();

    assert_eq!(up.log.offset, Some(-50.0));
    assert_eq!(row.width(row.left), 447.0);
    assert_eq!(row.width(row.right), 547.0);
}

#[test]
fn keyboard_steps_follow_modifiers() {
    let mut row = row("keys");
    let mut controller = ResizeController::default();
    let resizer = row.resizer;

    controller
        .key_down(&mut row.dom, &row.store, &resizer, "ArrowRight", KeyModifiers::NONE)
        .unwrap();
    assert_eq!(row.width(row.left), 507.0);

    controller
        .key_down(&mut row.dom, &row.store, &resizer, "ArrowRight", KeyModifiers::SHIFT)
        .unwrap();
    assert_eq!(row.width(row.left), 557.0);

    let fine = controller
        .key_down(&mut row.dom, &row.store, &resizer, "ArrowLeft", KeyModifiers::CTRL)
        .unwrap();
    assert!(fine.prevent_default);
    assert_eq!(row.width(row.left), 556.0);
    assert_eq!(row.aria("aria-valuenow").as_deref(), Some("556"));

    let ignored = controller
        .key_down(&mut row.dom, &row.store, &resizer, "ArrowUp", KeyModifiers::NONE)
        .unwrap();
    assert!(ignored.is_ignored());
    assert!(!ignored.prevent_default);
}

#[test]
fn cancelling_a_drag_restores_the_last_commit() {
    let mut row = row("cancel");
    let mut controller = ResizeController::default();

    controller
        .pointer_down(&mut row.dom, &row.resizer, at(500.0), 0, true)
        .unwrap();
    controller
        .pointer_up(&mut row.dom, &row.store, at(550.0))
        .unwrap();

    controller
        .pointer_down(&mut row.dom, &row.resizer, at(550.0), 0, true)
        .unwrap();
    controller
        .pointer_move(&mut row.dom, &row.store, at(700.0))
        .unwrap();
    assert_eq!(row.width(row.left), 697.0);

    let cancelled = controller
        .pointer_cancel(&mut row.dom, &row.store)
        .unwrap();
    assert_eq!(cancelled.effect, Some(ResizeEffect::Cancelled));
    assert_eq!(row.width(row.left), 547.0);
    assert!(!controller.is_dragging());
}

#[test]
fn removing_a_panel_rebalances_a_resized_group() {
    let mut row = row("cond");
    let mut controller = ResizeController::default();
    let mut observer = GroupObserver::new();
    assert!(observer.observe(row.group));

    controller
        .pointer_down(&mut row.dom, &row.resizer, at(500.0), 0, true)
        .unwrap();
    controller
        .pointer_up(&mut row.dom, &row.store, at(550.0))
        .unwrap();
    assert_eq!(row.width(row.left), 547.0);

    row.dom.remove(row.resizer);
    row.dom.remove(row.right);
    observer.record(&row.group);
    assert_eq!(observer.flush(&mut row.dom, &row.store).unwrap(), 1);

    assert_eq!(row.width(row.left), 1000.0);
    let snapshot = row.store.get_snapshot("g:cond").unwrap().unwrap();
    assert_eq!(snapshot.flex_value("g-cond-1"), Some("1"));
    assert_eq!(snapshot.flex_value("g-cond-2"), None);
}

#[test]
fn touch_and_pointer_gestures_do_not_mix() {
    let mut row = row("touch");
    let mut controller = ResizeController::default();

    let start = controller
        .touch_start(&mut row.dom, &row.resizer, at(500.0))
        .unwrap();
    assert_eq!(
        start.listeners,
        Some(ListenerCommand::Attach(ListenerSet::Touch))
    );
    let second = controller
        .pointer_down(&mut row.dom, &row.resizer, at(500.0), 0, true)
        .unwrap();
    assert!(second.is_ignored());
    assert!(
        controller
            .pointer_up(&mut row.dom, &row.store, at(600.0))
            .unwrap()
            .is_ignored()
    );

    controller
        .touch_end(&mut row.dom, &row.store, at(480.0))
        .unwrap();
    assert_eq!(row.width(row.left), 477.0);
    assert_eq!(row.width(row.right), 517.0);
}
