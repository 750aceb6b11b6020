//! End-to-end resize scenarios over realistic group shapes.

use flexpanels_layout::{
    ConstraintHit, GroupState, Orientation, PanelEntry, calculate_new_layout,
    convert_group_state_to_layout, resize_group, resolve_max_length, resolve_min_length,
};

/// Two auto-sized panels sharing a 1000px row with a 6px resizer.
fn two_panels() -> GroupState {
    GroupState::new("g:two", 1000.0, Orientation::Horizontal)
        .with_panel(PanelEntry::new("left", 497.0).with_flex(true))
        .with_resizer(6.0)
        .with_panel(PanelEntry::new("right", 497.0).with_flex(true))
}

fn panel_sizes(group: &GroupState) -> Vec<f64> {
    group.panels().map(|panel| panel.size).collect()
}

#[test]
fn basic_two_panel_drag() {
    let resized = resize_group(&two_panels(), 1, 50.0).unwrap();
    assert_eq!(panel_sizes(&resized.state), [547.0, 447.0]);
    assert_eq!(resized.constraint, None);

    let layout = calculate_new_layout(&two_panels(), 1, 50.0).unwrap();
    let left = layout.panel("left").unwrap();
    let right = layout.panel("right").unwrap();
    assert!(!left.flex);
    assert!(right.flex);
    assert_eq!(left.flex_value(), "0 0 54.7%");
    assert_eq!(right.flex_value(), "1");
    assert_eq!(left.aria_now, 547.0);
}

#[test]
fn drag_is_symmetric_in_direction() {
    let forward = resize_group(&two_panels(), 1, 50.0).unwrap();
    let backward = resize_group(&two_panels(), 1, -50.0).unwrap();
    let forward = panel_sizes(&forward.state);
    let backward = panel_sizes(&backward.state);
    assert_eq!(forward, [547.0, 447.0]);
    assert_eq!(backward, [447.0, 547.0]);
}

#[test]
fn min_max_clamp_lands_exactly_on_bound() {
    let container = 1000.0;
    let group = GroupState::new("g:clamp", container, Orientation::Horizontal)
        .with_panel(
            PanelEntry::new("sidebar", 300.0)
                .with_min_size(resolve_min_length("20%", container))
                .with_max_size(resolve_max_length("40%", container)),
        )
        .with_resizer(6.0)
        .with_panel(PanelEntry::new("content", 694.0).with_flex(true));

    let resized = resize_group(&group, 1, 300.0).unwrap();
    assert_eq!(panel_sizes(&resized.state), [400.0, 594.0]);
    assert_eq!(resized.constraint, Some(ConstraintHit::Max));

    let layout = calculate_new_layout(&group, 1, 300.0).unwrap();
    assert_eq!(layout.constraint, Some(ConstraintHit::Max));
    assert_eq!(layout.panels["sidebar"].percentage, 40.0);
}

#[test]
fn shrinking_below_min_reports_min() {
    let group = GroupState::new("g:min", 1000.0, Orientation::Vertical)
        .with_panel(PanelEntry::new("top", 300.0).with_min_size(200.0))
        .with_resizer(6.0)
        .with_panel(PanelEntry::new("bottom", 694.0));
    let resized = resize_group(&group, 1, -250.0).unwrap();
    assert_eq!(panel_sizes(&resized.state), [200.0, 794.0]);
    assert_eq!(resized.constraint, Some(ConstraintHit::Min));
}

#[test]
fn fully_pinned_group_does_not_move() {
    let group = GroupState::new("g:pinned", 406.0, Orientation::Horizontal)
        .with_panel(
            PanelEntry::new("a", 200.0)
                .with_min_size(200.0)
                .with_max_size(200.0),
        )
        .with_resizer(6.0)
        .with_panel(
            PanelEntry::new("b", 200.0)
                .with_min_size(200.0)
                .with_max_size(200.0),
        );
    let resized = resize_group(&group, 1, 80.0).unwrap();
    assert_eq!(panel_sizes(&resized.state), [200.0, 200.0]);
    assert_eq!(resized.constraint, Some(ConstraintHit::Max));
}

#[test]
fn movement_ripples_past_exhausted_neighbour() {
    // Growing the first panel drains b down to its minimum, then c.
    let group = GroupState::new("g:ripple", 912.0, Orientation::Horizontal)
        .with_panel(PanelEntry::new("a", 300.0))
        .with_resizer(6.0)
        .with_panel(PanelEntry::new("b", 300.0).with_min_size(250.0))
        .with_resizer(6.0)
        .with_panel(PanelEntry::new("c", 300.0).with_min_size(100.0));
    let resized = resize_group(&group, 1, 120.0).unwrap();
    assert_eq!(panel_sizes(&resized.state), [420.0, 250.0, 230.0]);
    assert_eq!(resized.constraint, None);

    let flexible: Vec<_> = resized
        .state
        .panels()
        .filter(|panel| panel.flex)
        .map(|panel| panel.child_id.as_str())
        .collect();
    assert_eq!(flexible, ["c"]);
}

#[test]
fn aria_ranges_for_every_resizer() {
    let group = GroupState::new("g:aria", 912.0, Orientation::Horizontal)
        .with_panel(PanelEntry::new("a", 300.0).with_min_size(100.0))
        .with_resizer(6.0)
        .with_panel(PanelEntry::new("b", 300.0).with_min_size(250.0))
        .with_resizer(6.0)
        .with_panel(PanelEntry::new("c", 300.0).with_min_size(100.0));
    let layout = convert_group_state_to_layout(&group);

    let a = layout.panels["a"];
    assert_eq!(a.aria_now, 300.0);
    assert_eq!(a.aria_min, 100.0);
    // b can give 50 and c can give 200.
    assert_eq!(a.aria_max, 550.0);

    let b = layout.panels["b"];
    assert_eq!(b.aria_now, 606.0);
    assert_eq!(b.aria_min, 356.0);
    assert_eq!(b.aria_max, 806.0);
}
