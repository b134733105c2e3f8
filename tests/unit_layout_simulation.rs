mod common;

use pretty_assertions::assert_eq;

use chainscope::graph::build_graph;
use chainscope::layout::LayoutEngine;
use chainscope::model::GraphFilter;
use chainscope::model::TxKind;
use chainscope::store::SeedAddressSet;

use common::native;

fn engine() -> LayoutEngine {
    LayoutEngine::new(1000.0, 800.0)
}

fn view_of(pairs: &[(&str, &str)]) -> chainscope::graph::GraphView {
    let txns: Vec<_> = pairs.iter().map(|(f, t)| native(f, t, 10.0)).collect();
    build_graph(&txns, &GraphFilter::for_kind(TxKind::Native), &SeedAddressSet::new())
}

#[test]
fn new_nodes_spawn_near_viewport_center() {
    let mut layout = engine();
    layout.sync(&view_of(&[("A", "B")]));

    for node in layout.nodes() {
        assert!((node.x - 500.0).abs() <= 50.0, "x spawned outside jitter window");
        assert!((node.y - 400.0).abs() <= 50.0, "y spawned outside jitter window");
        assert_eq!(node.vx, 0.0);
        assert_eq!(node.vy, 0.0);
        assert!(!node.is_pinned());
    }
}

/// Rebuilding with an unchanged id carries position, velocity and pin
/// state over exactly.
#[test]
fn rebuild_preserves_state_for_surviving_ids() {
    let mut layout = engine();
    layout.sync(&view_of(&[("A", "B")]));

    for _ in 0..5 {
        layout.tick();
    }
    layout.pin("A", 123.0, 456.0);

    let before: Vec<_> = layout
        .nodes()
        .iter()
        .map(|n| (n.id.clone(), n.x, n.y, n.vx, n.vy, n.fx, n.fy))
        .collect();

    // Same ids plus a newcomer.
    layout.sync(&view_of(&[("A", "B"), ("B", "C")]));

    for (id, x, y, vx, vy, fx, fy) in before {
        let node = layout.get(&id).expect("surviving node");
        assert_eq!(node.x, x);
        assert_eq!(node.y, y);
        assert_eq!(node.vx, vx);
        assert_eq!(node.vy, vy);
        assert_eq!(node.fx, fx);
        assert_eq!(node.fy, fy);
    }
    assert!(layout.get("C").is_some());
}

#[test]
fn stale_ids_are_dropped() {
    let mut layout = engine();
    layout.sync(&view_of(&[("A", "B"), ("B", "C")]));
    assert_eq!(layout.nodes().len(), 3);

    layout.sync(&view_of(&[("A", "B")]));
    assert_eq!(layout.nodes().len(), 2);
    assert!(layout.get("C").is_none());
}

#[test]
fn pinned_nodes_hold_position_through_ticks() {
    let mut layout = engine();
    layout.sync(&view_of(&[("A", "B"), ("B", "C")]));

    layout.pin("B", 300.0, 300.0);
    for _ in 0..20 {
        layout.tick();
    }

    let b = layout.get("B").unwrap();
    assert_eq!(b.x, 300.0);
    assert_eq!(b.y, 300.0);
    assert_eq!(b.vx, 0.0);
}

#[test]
fn release_clears_pin_and_reheats() {
    let mut layout = engine();
    layout.sync(&view_of(&[("A", "B")]));
    layout.pin("A", 10.0, 10.0);

    // Cool the simulation down, then release.
    layout.settle(400);
    assert!(layout.is_settled());

    assert!(layout.release("A"));
    assert!(!layout.get("A").unwrap().is_pinned());
    assert!(layout.alpha() >= 0.3, "release should nudge simulation energy");
    assert!(!layout.is_settled());
}

#[test]
fn overlapping_nodes_separate() {
    let mut layout = engine();
    layout.sync(&view_of(&[("A", "B")]));

    // Force both nodes onto the same spot.
    layout.pin("A", 500.0, 400.0);
    layout.pin("B", 500.0, 400.0);
    layout.release("A");
    layout.release("B");

    layout.settle(400);

    let a = layout.get("A").unwrap();
    let b = layout.get("B").unwrap();
    let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
    assert!(dist > 1.0, "coincident nodes did not separate, dist = {dist}");
}

#[test]
fn sync_restarts_cooling() {
    let mut layout = engine();
    layout.sync(&view_of(&[("A", "B")]));
    layout.settle(500);
    assert!(layout.is_settled());

    layout.sync(&view_of(&[("A", "B"), ("B", "C")]));
    assert!(!layout.is_settled());
}

#[test]
fn unknown_ids_are_rejected() {
    let mut layout = engine();
    layout.sync(&view_of(&[("A", "B")]));
    assert!(!layout.pin("nope", 0.0, 0.0));
    assert!(!layout.release("nope"));
    assert!(layout.get("nope").is_none());
}
