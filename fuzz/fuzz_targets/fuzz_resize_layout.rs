#![no_main]

use arbitrary::Arbitrary;
use flexpanels_layout::{GroupState, Orientation, PanelEntry, resize_group};
use libfuzzer_sys::fuzz_target;

const EPSILON: f64 = 1e-6;

#[derive(Debug, Arbitrary)]
struct FuzzPanel {
    size: u16,
    min: u16,
    /// 0 means unbounded.
    max_extra: u16,
    flex: bool,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    panels: Vec<FuzzPanel>,
    resizer_size: u8,
    resizer: u8,
    offset: i32,
}

fuzz_target!(|input: FuzzInput| {
    if input.panels.len() < 2 || input.panels.len() > 32 {
        return;
    }

    let mut group = GroupState::new("g:fuzz", 0.0, Orientation::Horizontal);
    for (i, panel) in input.panels.iter().enumerate() {
        if i > 0 {
            group = group.with_resizer(f64::from(input.resizer_size % 16));
        }
        // Keep min <= size <= max so the starting state is valid.
        let min = f64::from(panel.min % 512);
        let size = min + f64::from(panel.size % 1024);
        let max = if panel.max_extra == 0 {
            f64::INFINITY
        } else {
            size + f64::from(panel.max_extra % 1024)
        };
        group = group.with_panel(
            PanelEntry::new(format!("p{i}"), size)
                .with_min_size(min)
                .with_max_size(max)
                .with_flex(panel.flex),
        );
    }
    group.size = group.total_size();

    let resizer_count = input.panels.len() - 1;
    let resizer = 2 * (usize::from(input.resizer) % resizer_count) + 1;
    let offset = f64::from(input.offset) / 16.0;

    let resized = resize_group(&group, resizer, offset).expect("valid resizer index");

    // Post-conditions that must always hold:
    let total = resized.state.total_size();
    assert!(
        (total - group.size).abs() < EPSILON * group.size.max(1.0),
        "total size drifted from {} to {total}",
        group.size
    );
    for panel in resized.state.panels() {
        assert!(panel.size >= panel.min_size - EPSILON, "{} below min", panel.child_id);
        assert!(panel.size <= panel.max_size + EPSILON, "{} above max", panel.child_id);
    }
    let flexible = resized.state.panels().filter(|panel| panel.flex).count();
    assert_eq!(flexible, 1, "exactly one flexible panel");
});
