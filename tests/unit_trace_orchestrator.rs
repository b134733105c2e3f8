mod common;

use std::collections::HashSet;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tokio_test::assert_ok;

use chainscope::config::GraphConfig;
use chainscope::config::TraceConfig;
use chainscope::engine::Session;
use chainscope::error::TraceError;
use chainscope::model::TxKind;
use chainscope::store::VisitedSet;
use chainscope::trace::TraceDirection;
use chainscope::trace::TraceOrchestrator;
use chainscope::trace::TracePhase;
use chainscope::trace::TraceRequest;

use common::MockHistoryProvider;
use common::native;
use common::transfer;
use common::transfer_with_hash;

fn fast_config() -> TraceConfig {
    TraceConfig {
        batch_size: 2,
        inter_batch_delay_ms: 0,
        max_hops: 10,
    }
}

fn request(targets: &[&str], hops: usize) -> TraceRequest {
    TraceRequest {
        network: "1".to_string(),
        targets: targets.iter().map(|t| t.to_string()).collect(),
        hops,
        direction: TraceDirection::Both,
        include_native: true,
        include_erc20: true,
        range: None,
    }
}

#[tokio::test]
async fn two_hop_chain_discovers_both_layers() {
    // X <-> Y discovered at layer 0, Y <-> Z at layer 1; Z stays frontier
    // when the hop count runs out.
    let provider = Arc::new(
        MockHistoryProvider::new()
            .with_history("x", vec![native("X", "Y", 1.0)])
            .with_history("y", vec![native("X", "Y", 1.0), native("Y", "Z", 2.0)]),
    );
    let orchestrator = TraceOrchestrator::new(provider.clone(), fast_config());

    let outcome = orchestrator.run(request(&["X"], 2), &VisitedSet::new()).await.unwrap();

    assert!(outcome.visited.contains("x"));
    assert!(outcome.visited.contains("y"));
    assert_eq!(outcome.completed_hops, 2);
    assert!(!outcome.aborted);
    assert!(outcome.transactions.iter().any(|t| t.to == "Y"));
    assert!(outcome.transactions.iter().any(|t| t.to == "Z"));
    assert_eq!(provider.call_log(), vec!["x".to_string(), "y".to_string()]);
    assert_eq!(orchestrator.phase(), TracePhase::Completed);
}

#[tokio::test]
async fn visited_addresses_are_never_requeried() {
    // X's neighbors are P (already visited) and Q; only Q may be queried
    // on the next layer.
    let provider = Arc::new(
        MockHistoryProvider::new()
            .with_history("x", vec![native("X", "P", 1.0), native("X", "Q", 1.0)])
            .with_history("q", vec![]),
    );
    let orchestrator = TraceOrchestrator::new(provider.clone(), fast_config());

    let mut visited = VisitedSet::new();
    visited.commit(["P"]);

    let outcome = orchestrator.run(request(&["X"], 3), &visited).await.unwrap();

    let log = provider.call_log();
    assert!(!log.contains(&"p".to_string()), "pre-visited address was re-queried");
    let unique: HashSet<&String> = log.iter().collect();
    assert_eq!(unique.len(), log.len(), "an address was queried twice");
    assert!(outcome.visited.contains("p"));
    assert!(outcome.visited.contains("q"));
}

#[tokio::test]
async fn cycles_terminate_via_visited_set() {
    let provider = Arc::new(
        MockHistoryProvider::new()
            .with_history("x", vec![native("X", "Y", 1.0)])
            .with_history("y", vec![native("Y", "X", 1.0)]),
    );
    let orchestrator = TraceOrchestrator::new(provider.clone(), fast_config());

    let outcome = orchestrator.run(request(&["X"], 5), &VisitedSet::new()).await.unwrap();

    // Layer 2 finds an empty frontier and stops early.
    assert_eq!(provider.call_log(), vec!["x".to_string(), "y".to_string()]);
    assert_eq!(outcome.completed_hops, 2);
}

#[rstest]
#[case(TraceDirection::Both, vec!["B", "C"])]
#[case(TraceDirection::From, vec!["B"])]
#[case(TraceDirection::To, vec!["C"])]
#[tokio::test]
async fn direction_filters_neighbor_discovery(
    #[case] direction: TraceDirection,
    #[case] expected_neighbors: Vec<&str>,
) {
    // A -> B (A is sender), C -> A (A is receiver).
    let provider = Arc::new(
        MockHistoryProvider::new()
            .with_history("a", vec![native("A", "B", 1.0), native("C", "A", 2.0)])
            .with_history("b", vec![])
            .with_history("c", vec![]),
    );
    let orchestrator = TraceOrchestrator::new(provider.clone(), fast_config());

    let outcome = orchestrator
        .run(
            TraceRequest {
                direction,
                ..request(&["A"], 2)
            },
            &VisitedSet::new(),
        )
        .await
        .unwrap();

    for neighbor in &expected_neighbors {
        let key = neighbor.to_lowercase();
        assert!(outcome.visited.contains(&key), "{neighbor} should have been crawled");
    }
    assert_eq!(outcome.transactions.len(), expected_neighbors.len());
}

#[tokio::test]
async fn kind_filters_skip_excluded_records() {
    let provider = Arc::new(MockHistoryProvider::new().with_history(
        "a",
        vec![native("A", "B", 1.0), transfer("A", "C", 1.0, TxKind::Erc20)],
    ));
    let orchestrator = TraceOrchestrator::new(provider, fast_config());

    let outcome = orchestrator
        .run(
            TraceRequest {
                include_native: false,
                ..request(&["A"], 1)
            },
            &VisitedSet::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.transactions.len(), 1);
    assert_eq!(outcome.transactions[0].kind, TxKind::Erc20);
}

#[tokio::test]
async fn one_failing_address_degrades_not_cancels() {
    let provider = Arc::new(
        MockHistoryProvider::new()
            .with_history("good", vec![native("good", "N", 3.0)])
            .with_failure("bad"),
    );
    let orchestrator = TraceOrchestrator::new(provider.clone(), fast_config());

    let outcome = orchestrator.run(request(&["good", "bad"], 1), &VisitedSet::new()).await.unwrap();

    assert_eq!(outcome.transactions.len(), 1);
    assert_eq!(outcome.failed_addresses, vec!["bad".to_string()]);
    // Failed addresses still count as visited so they are not retried.
    assert!(outcome.visited.contains("bad"));
    assert_eq!(provider.call_log().len(), 2);
}

#[tokio::test]
async fn total_failure_reports_zero_discoveries() {
    let provider =
        Arc::new(MockHistoryProvider::new().with_failure("a").with_failure("b"));
    let orchestrator = TraceOrchestrator::new(provider, fast_config());

    let outcome = orchestrator.run(request(&["a", "b"], 2), &VisitedSet::new()).await.unwrap();

    assert!(outcome.transactions.is_empty());
    assert_eq!(outcome.failed_addresses.len(), 2);
    assert!(outcome.visited.contains("a"));
    assert!(outcome.visited.contains("b"));
}

#[tokio::test]
async fn duplicate_targets_are_queried_once() {
    let provider = Arc::new(MockHistoryProvider::new().with_history("x", vec![]));
    let orchestrator = TraceOrchestrator::new(provider.clone(), fast_config());

    assert_ok!(orchestrator.run(request(&["X", "x", " X "], 1), &VisitedSet::new()).await);

    assert_eq!(provider.call_log(), vec!["x".to_string()]);
}

mod validation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn empty_target_set_rejects_synchronously() {
        let provider = Arc::new(MockHistoryProvider::new());
        let orchestrator = TraceOrchestrator::new(provider.clone(), fast_config());

        let err = orchestrator.run(request(&[], 1), &VisitedSet::new()).await.unwrap_err();
        assert!(matches!(err, TraceError::NoTargets));
        assert!(provider.call_log().is_empty());
        assert_eq!(orchestrator.phase(), TracePhase::Idle);
    }

    #[tokio::test]
    async fn malformed_address_rejects_synchronously() {
        let provider = Arc::new(MockHistoryProvider::new());
        let orchestrator = TraceOrchestrator::new(provider.clone(), fast_config());

        let err = orchestrator.run(request(&["0xok", "has space"], 1), &VisitedSet::new()).await.unwrap_err();
        assert!(matches!(err, TraceError::InvalidAddress(_)));
        assert!(provider.call_log().is_empty());
    }

    #[rstest]
    #[case(0)]
    #[case(99)]
    #[tokio::test]
    async fn hop_count_is_bounded(#[case] hops: usize) {
        let provider = Arc::new(MockHistoryProvider::new());
        let orchestrator = TraceOrchestrator::new(provider, fast_config());

        let err = orchestrator.run(request(&["x"], hops), &VisitedSet::new()).await.unwrap_err();
        assert!(matches!(err, TraceError::TooManyHops { .. }));
    }
}

#[tokio::test]
async fn cancellation_stops_before_next_hop() {
    let provider = Arc::new(MockHistoryProvider::new().with_history("x", vec![native("X", "Y", 1.0)]));
    let orchestrator = TraceOrchestrator::new(provider.clone(), fast_config());

    orchestrator.cancellation_token().cancel();
    let outcome = orchestrator.run(request(&["X"], 3), &VisitedSet::new()).await.unwrap();

    assert!(outcome.aborted);
    assert!(provider.call_log().is_empty());
    assert_eq!(orchestrator.phase(), TracePhase::Aborted);
}

mod session_commit {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn discoveries_merge_into_store_and_visited() {
        let provider = Arc::new(MockHistoryProvider::new().with_history("x", vec![native("X", "Y", 1.0)]));
        let orchestrator = TraceOrchestrator::new(provider, fast_config());
        let mut session = Session::new(&GraphConfig::default());

        let outcome = session.run_trace(&orchestrator, request(&["X"], 1)).await.unwrap();

        assert_eq!(outcome.transactions.len(), 1);
        assert_eq!(session.store().len(), 1);
        assert!(session.visited().contains("x"));
        assert!(session.visited().contains("y"));
        // The rebuild ran: both endpoints are in the view.
        assert_eq!(session.view().nodes.len(), 2);
    }

    #[tokio::test]
    async fn zero_discoveries_commit_targets_only() {
        let provider = Arc::new(MockHistoryProvider::new().with_history("x", vec![]));
        let orchestrator = TraceOrchestrator::new(provider, fast_config());
        let mut session = Session::new(&GraphConfig::default());

        let outcome = session.run_trace(&orchestrator, request(&["X"], 1)).await.unwrap();

        assert!(outcome.transactions.is_empty());
        assert_eq!(session.store().len(), 0);
        assert!(session.visited().contains("x"));
    }

    #[tokio::test]
    async fn store_append_dedups_rediscovered_hashes() {
        let known = transfer_with_hash("X", "Y", 1.0, TxKind::Native, "0xsamehash");
        let rediscovered = transfer_with_hash("X", "Y", 1.0, TxKind::Native, "0xsamehash");

        let provider = Arc::new(MockHistoryProvider::new().with_history(
            "x",
            vec![rediscovered, native("X", "Z", 2.0)],
        ));
        let orchestrator = TraceOrchestrator::new(provider, fast_config());
        let mut session = Session::new(&GraphConfig::default());
        session.replace_transactions(vec![known]);

        session.run_trace(&orchestrator, request(&["X"], 1)).await.unwrap();

        // One record deduped by hash, one genuinely new.
        assert_eq!(session.store().len(), 2);
    }
}
