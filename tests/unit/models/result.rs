//! Unit tests for scan summaries and result helpers

use equiscan::models::result::{AuxMetrics, ScanSummary, ScreenResult, SkipReason};

#[test]
fn test_summary_display_groups_skip_reasons() {
    let mut summary = ScanSummary {
        scanned: 10,
        matched: 2,
        ..ScanSummary::default()
    };
    summary.record_skip(SkipReason::InsufficientHistory);
    summary.record_skip(SkipReason::Timeout);
    summary.record_skip(SkipReason::InsufficientHistory);

    assert_eq!(summary.total_skipped(), 3);
    assert_eq!(summary.skipped_for(SkipReason::InsufficientHistory), 2);
    assert_eq!(summary.skipped_for(SkipReason::Filtered), 0);
    assert_eq!(
        summary.to_string(),
        "scanned 10 | matched 2 | skipped 3 (timeout=1, insufficient_history=2)"
    );

    summary.not_attempted = 4;
    assert!(summary.to_string().ends_with("| not attempted 4"));
}

#[test]
fn test_skip_reason_labels_are_unique() {
    let mut labels: Vec<&str> = SkipReason::ALL.iter().map(SkipReason::as_str).collect();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), SkipReason::ALL.len());
}

#[test]
fn test_ratio_label_and_risk_reward() {
    let result = ScreenResult {
        symbol: "ABC".to_string(),
        instrument_key: "NSE_EQ|ABC".to_string(),
        conditions_met: 9,
        total_conditions: 14,
        entry_price: 100.0,
        stop_loss: 95.0,
        target: 115.0,
        atr_is_proxy: false,
        aux: AuxMetrics::default(),
    };
    assert_eq!(result.ratio_label(), "9/14");
    assert_eq!(result.risk_reward(), Some(3.0));
}
