use scorecard_core::aggregate::{summarize, PASS_THRESHOLD};
use scorecard_core::model::{EvaluatorResult, OutputItem};

fn scored_item(scores: &[(&str, f64)]) -> OutputItem {
    OutputItem {
        status: Some("completed".to_string()),
        error: None,
        evaluator_outputs: scores
            .iter()
            .map(|(name, score)| EvaluatorResult {
                name: name.to_string(),
                score: Some(*score),
            })
            .collect(),
    }
}

fn errored_item(detail: &str) -> OutputItem {
    OutputItem {
        status: Some("error".to_string()),
        error: Some(detail.to_string()),
        evaluator_outputs: vec![],
    }
}

fn metric_names() -> Vec<String> {
    ["intent_resolution", "relevance", "groundedness"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn known_scores_produce_expected_means_and_pass_rates() {
    // intent_resolution: [2,3,4,5], relevance: [5,5,5], groundedness: []
    let items = vec![
        scored_item(&[("intent_resolution", 2.0), ("relevance", 5.0)]),
        scored_item(&[("intent_resolution", 3.0), ("relevance", 5.0)]),
        scored_item(&[("intent_resolution", 4.0), ("relevance", 5.0)]),
        scored_item(&[("intent_resolution", 5.0)]),
    ];

    let summary = summarize(&items, &metric_names());
    assert_eq!(summary.total, 4);
    assert_eq!(summary.errored, 0);
    assert_eq!(summary.scored, 4);

    let intent = summary.metric("intent_resolution").unwrap();
    assert_eq!(intent.n(), 4);
    assert!((intent.mean().unwrap() - 3.5).abs() < 1e-9);
    // 3 of 4 scores are >= 3
    assert!((intent.pass_rate(PASS_THRESHOLD).unwrap() - 0.75).abs() < 1e-9);

    let relevance = summary.metric("relevance").unwrap();
    assert!((relevance.mean().unwrap() - 5.0).abs() < 1e-9);
    assert!((relevance.pass_rate(PASS_THRESHOLD).unwrap() - 1.0).abs() < 1e-9);

    let groundedness = summary.metric("groundedness").unwrap();
    assert_eq!(groundedness.n(), 0);
    assert!(groundedness.mean().is_none());
    assert!(groundedness.pass_rate(PASS_THRESHOLD).is_none());
}

#[test]
fn errored_items_are_counted_but_never_scored() {
    let mut items: Vec<OutputItem> = (0..8)
        .map(|_| scored_item(&[("relevance", 4.0)]))
        .collect();
    items.push(errored_item("judge deployment throttled"));
    items.push(errored_item("timeout"));

    let summary = summarize(&items, &metric_names());
    assert_eq!(summary.total, 10);
    assert_eq!(summary.errored, 2);
    assert_eq!(summary.scored, 8);
    assert_eq!(summary.metric("relevance").unwrap().n(), 8);
    assert_eq!(
        summary.first_error.as_deref(),
        Some("judge deployment throttled")
    );
}

#[test]
fn scores_for_unrequested_metrics_are_ignored() {
    let items = vec![scored_item(&[("relevance", 5.0), ("coherence", 1.0)])];
    let summary = summarize(&items, &metric_names());
    assert_eq!(summary.metric("relevance").unwrap().n(), 1);
    assert!(summary.metric("coherence").is_none());
}

#[test]
fn missing_score_field_is_skipped() {
    let item = OutputItem {
        status: None,
        error: None,
        evaluator_outputs: vec![EvaluatorResult {
            name: "relevance".to_string(),
            score: None,
        }],
    };
    let summary = summarize(&[item], &metric_names());
    assert_eq!(summary.scored, 1);
    assert_eq!(summary.metric("relevance").unwrap().n(), 0);
    assert!(!summary.any_scores());
}
