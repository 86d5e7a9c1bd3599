//! Custom Test Assertions
//!
//! Assertion helpers for aggregates and scores that give more meaningful
//! failure messages than a bare `assert!`.

use domain_fund::{ExpenseAnalysis, RelationshipProfile};
use rust_decimal::Decimal;
use serde_json::Value;

/// Asserts that two decimals differ by no more than `tolerance`
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Decimals differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that `parts` sum exactly to `total`
pub fn assert_sums_to(parts: impl IntoIterator<Item = Decimal>, total: Decimal) {
    let sum: Decimal = parts.into_iter().sum();
    assert_eq!(sum, total, "Parts sum to {}, expected {}", sum, total);
}

/// Asserts the internal consistency of an expense analysis
pub fn assert_expense_analysis_consistent(analysis: &ExpenseAnalysis) {
    assert_sums_to(
        analysis.expenses_by_category.values().copied(),
        analysis.total_expenses,
    );
    let counted = analysis.expenses_by_status.pending
        + analysis.expenses_by_status.approved
        + analysis.expenses_by_status.paid;
    assert!(
        analysis.recent_expenses.len() <= counted,
        "Recent sample larger than the {} analyzed expenses",
        counted
    );
    assert!(
        analysis.recent_expenses.len() <= domain_fund::analytics::RECENT_EXPENSE_LIMIT,
        "Recent sample has {} expenses",
        analysis.recent_expenses.len()
    );
}

/// Asserts that a score lies in `[0, 100]`
pub fn assert_score_in_range(name: &str, score: Decimal) {
    assert!(
        score >= Decimal::ZERO && score <= Decimal::ONE_HUNDRED,
        "{} score {} outside [0, 100]",
        name,
        score
    );
}

/// Asserts every bounded score on a relationship profile
pub fn assert_profile_scores_bounded(profile: &RelationshipProfile) {
    assert_score_in_range("health", profile.health_score);
    assert_score_in_range("risk", profile.risk_score);
    assert_score_in_range("confidence", profile.next_commitment.confidence);
    assert_score_in_range("percentile", profile.benchmark.percentile);
}

/// Asserts a `{success: true, data}` envelope and returns `data`
pub fn assert_success_envelope(body: &Value) -> &Value {
    assert_eq!(body["success"], Value::Bool(true), "Expected success envelope, got {}", body);
    body.get("data")
        .unwrap_or_else(|| panic!("Success envelope without data: {}", body))
}

/// Asserts a `{success: false, error}` envelope and returns the error message
pub fn assert_error_envelope(body: &Value) -> &str {
    assert_eq!(body["success"], Value::Bool(false), "Expected error envelope, got {}", body);
    body["error"]
        .as_str()
        .unwrap_or_else(|| panic!("Error envelope without message: {}", body))
}
