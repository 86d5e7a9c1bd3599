//! Service-level tests for fund operations
//!
//! Runs reads and commands through `FundOperationsService` over the bundled
//! dataset, in both command modes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use core_kernel::FundId;
use domain_fund::analytics::analyze_expenses;
use domain_fund::relationship::{self, InvestorSnapshot};
use domain_fund::{
    CapitalCallStatus, CommandRecord, ExpenseStatus, InMemoryFundStore, NavReportStatus,
    QueryKind, QueryResult, MAX_AMOUNT,
};
use test_utils::{
    assert_expense_analysis_consistent, assert_profile_scores_bounded, commitments_strategy,
    expenses_strategy, DatasetFixtures, IdFixtures, TemporalFixtures, TestDatasetBuilder,
    TestFundBuilder, TotalsFixtures,
};

// ============================================================================
// Query Tests
// ============================================================================

mod query_tests {
    use super::*;

    #[test]
    fn test_query_kind_from_param() {
        assert_eq!(QueryKind::from_param(Some("capital-calls")), QueryKind::CapitalCalls);
        assert_eq!(QueryKind::from_param(Some("nav-reports")), QueryKind::NavReports);
        assert_eq!(QueryKind::from_param(Some("bogus")), QueryKind::All);
        assert_eq!(QueryKind::from_param(None), QueryKind::All);
    }

    #[tokio::test]
    async fn test_funds_filter_returns_only_matching_fund() {
        let service = DatasetFixtures::persisting_service();

        let result = service.query(QueryKind::Funds, Some(&IdFixtures::fund_2())).await.unwrap();
        let QueryResult::Funds(funds) = result else {
            panic!("expected funds");
        };
        assert_eq!(funds.len(), 1);
        assert_eq!(funds[0].id, IdFixtures::fund_2());

        let result = service
            .query(QueryKind::Funds, Some(&IdFixtures::unknown_fund()))
            .await
            .unwrap();
        assert_eq!(result, QueryResult::Funds(Vec::new()));
    }

    #[tokio::test]
    async fn test_overview_ignores_fund_filter() {
        let service = DatasetFixtures::persisting_service();
        let QueryResult::Overview(overview) = service
            .query(QueryKind::Overview, Some(&IdFixtures::fund_1()))
            .await
            .unwrap()
        else {
            panic!("expected overview");
        };

        assert_eq!(overview.funds.len(), TotalsFixtures::fund_count());
        assert_eq!(overview.summary.total_commitments, TotalsFixtures::total_commitments());
        assert_eq!(overview.summary.active_funds, TotalsFixtures::active_funds());
    }

    #[tokio::test]
    async fn test_fund_performance_requires_known_fund() {
        let service = DatasetFixtures::persisting_service();

        let err = service
            .query(QueryKind::FundPerformance, Some(&IdFixtures::unknown_fund()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = service.query(QueryKind::FundPerformance, None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unfiltered_all_query() {
        let service = DatasetFixtures::persisting_service();
        let result = service
            .query(QueryKind::All, Some(&IdFixtures::fund_1()))
            .await
            .unwrap();
        assert_eq!(result, QueryResult::All(DatasetFixtures::bundled()));

        let json = serde_json::to_value(&result).unwrap();
        for key in ["funds", "commitments", "capitalCalls", "distributions", "expenses", "navReports"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[tokio::test]
    async fn test_expense_analysis_for_fund() {
        let service = DatasetFixtures::persisting_service();
        let QueryResult::ExpenseAnalysis(analysis) = service
            .query(QueryKind::ExpenseAnalysis, Some(&IdFixtures::fund_1()))
            .await
            .unwrap()
        else {
            panic!("expected expense analysis");
        };

        assert_eq!(analysis.total_expenses, TotalsFixtures::fund_1_expenses());
        assert_expense_analysis_consistent(&analysis);
    }
}

// ============================================================================
// Command Tests
// ============================================================================

mod command_tests {
    use super::*;

    fn capital_call_payload() -> serde_json::Value {
        json!({
            "fundId": "fund-1",
            "callNumber": 4,
            "amount": 18500000,
            "dueDate": TemporalFixtures::due_date(),
            "purpose": "Follow-on investment"
        })
    }

    #[tokio::test]
    async fn test_create_capital_call_persists() {
        let service = DatasetFixtures::persisting_service();
        let receipt = service
            .execute("create_capital_call", capital_call_payload())
            .await
            .unwrap();

        assert_eq!(receipt.message(), "Capital call created successfully");
        assert!(receipt.acknowledgment.persisted);
        let CommandRecord::CapitalCall(call) = &receipt.acknowledgment.record else {
            panic!("expected a capital call");
        };
        assert_eq!(call.status, CapitalCallStatus::Issued);

        let QueryResult::CapitalCalls(calls) = service
            .query(QueryKind::CapitalCalls, Some(&IdFixtures::fund_1()))
            .await
            .unwrap()
        else {
            panic!("expected capital calls");
        };
        assert!(calls.iter().any(|c| c.id == call.id));
    }

    #[tokio::test]
    async fn test_acknowledge_mode_does_not_persist() {
        let service = DatasetFixtures::acknowledging_service();
        let receipt = service
            .execute("create_capital_call", capital_call_payload())
            .await
            .unwrap();
        assert!(!receipt.acknowledgment.persisted);

        let result = service
            .query(QueryKind::CapitalCalls, Some(&IdFixtures::fund_1()))
            .await
            .unwrap();
        let expected = DatasetFixtures::bundled()
            .capital_calls
            .into_iter()
            .filter(|c| c.fund_id == IdFixtures::fund_1())
            .collect();
        assert_eq!(result, QueryResult::CapitalCalls(expected));
    }

    #[tokio::test]
    async fn test_generated_ids_are_unique() {
        let service = DatasetFixtures::persisting_service();
        let first = service
            .execute("create_capital_call", capital_call_payload())
            .await
            .unwrap();
        let second = service
            .execute("create_capital_call", capital_call_payload())
            .await
            .unwrap();
        assert_ne!(first.acknowledgment.record.id(), second.acknowledgment.record.id());
    }

    #[tokio::test]
    async fn test_unknown_action_is_validation_error() {
        let service = DatasetFixtures::persisting_service();
        let err = service.execute("close_fund", json!({})).await.unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("Invalid action"));
    }

    #[tokio::test]
    async fn test_command_against_unknown_fund_is_not_found() {
        let service = DatasetFixtures::persisting_service();
        let err = service
            .execute(
                "generate_nav",
                json!({
                    "fundId": IdFixtures::unknown_fund(),
                    "reportingPeriod": "Q1 2024",
                    "asOfDate": TemporalFixtures::quarter_end(),
                    "totalAssets": 100,
                    "totalLiabilities": 10
                }),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_generate_nav_computes_total() {
        let service = DatasetFixtures::persisting_service();
        let receipt = service
            .execute(
                "generate_nav",
                json!({
                    "fundId": "fund-2",
                    "reportingPeriod": "Q1 2024",
                    "asOfDate": TemporalFixtures::quarter_end(),
                    "totalAssets": 940000000,
                    "totalLiabilities": 12500000
                }),
            )
            .await
            .unwrap();

        let CommandRecord::NavReport(report) = receipt.acknowledgment.record else {
            panic!("expected a NAV report");
        };
        assert_eq!(report.total_nav, dec!(927500000));
        assert_eq!(report.status, NavReportStatus::Draft);
    }

    #[tokio::test]
    async fn test_add_commitment_shows_in_relationship_profile() {
        let service = DatasetFixtures::persisting_service();
        let investor = IdFixtures::troubled_investor();
        let before = service.relationship_profile(&investor).await.unwrap();

        service
            .execute(
                "add_commitment",
                json!({
                    "fundId": "fund-3",
                    "investorId": investor,
                    "investorName": "Harbor Family Office",
                    "investorType": "FAMILY_OFFICE",
                    "commitmentAmount": 5000000
                }),
            )
            .await
            .unwrap();

        let after = service.relationship_profile(&investor).await.unwrap();
        assert_eq!(after.total_committed - before.total_committed, dec!(5000000));
        assert_eq!(after.fund_count, before.fund_count + 1);
    }

    fn expense_payload(amount: serde_json::Value) -> serde_json::Value {
        json!({
            "fundId": "fund-1",
            "category": "LEGAL",
            "amount": amount,
            "description": "Portfolio litigation reserve"
        })
    }

    #[tokio::test]
    async fn test_maximum_expenses_keep_analysis_available() {
        let service = DatasetFixtures::persisting_service();
        let fund_1 = IdFixtures::fund_1();
        let QueryResult::ExpenseAnalysis(before) =
            service.query(QueryKind::ExpenseAnalysis, Some(&fund_1)).await.unwrap()
        else {
            panic!("expected expense analysis");
        };

        for _ in 0..2 {
            service
                .execute("record_expense", expense_payload(json!(MAX_AMOUNT)))
                .await
                .unwrap();
        }

        let QueryResult::ExpenseAnalysis(after) =
            service.query(QueryKind::ExpenseAnalysis, Some(&fund_1)).await.unwrap()
        else {
            panic!("expected expense analysis");
        };
        assert_eq!(after.total_expenses, before.total_expenses + MAX_AMOUNT * Decimal::TWO);
        assert_expense_analysis_consistent(&after);
    }

    #[tokio::test]
    async fn test_amount_above_maximum_is_rejected() {
        let service = DatasetFixtures::persisting_service();
        let err = service
            .execute("record_expense", expense_payload(json!(7e28)))
            .await
            .unwrap_err();
        assert!(err.is_client_error());

        let err = service
            .execute(
                "add_commitment",
                json!({
                    "fundId": "fund-1",
                    "investorId": "investor-42",
                    "investorName": "Oversized LP",
                    "commitmentAmount": 7e28
                }),
            )
            .await
            .unwrap_err();
        assert!(err.is_client_error());

        let QueryResult::Expenses(expenses) = service
            .query(QueryKind::Expenses, None)
            .await
            .unwrap()
        else {
            panic!("expected expenses");
        };
        assert!(expenses.iter().all(|e| e.amount <= MAX_AMOUNT));
    }

    #[tokio::test]
    async fn test_overflowing_distribution_components_are_rejected() {
        let service = DatasetFixtures::persisting_service();
        let err = service
            .execute(
                "process_distribution",
                json!({
                    "fundId": "fund-2",
                    "distributionNumber": 14,
                    "amount": 1,
                    "distributionDate": TemporalFixtures::quarter_end(),
                    "returnOfCapital": 5e28,
                    "capitalGains": 5e28
                }),
            )
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }
}

// ============================================================================
// Status Transition Tests
// ============================================================================

mod transition_tests {
    use super::*;

    #[tokio::test]
    async fn test_approve_expense_moves_status_count() {
        let service = DatasetFixtures::persisting_service();
        let fund_1 = IdFixtures::fund_1();

        let QueryResult::ExpenseAnalysis(before) =
            service.query(QueryKind::ExpenseAnalysis, Some(&fund_1)).await.unwrap()
        else {
            panic!("expected expense analysis");
        };

        let receipt = service
            .execute(
                "approve_expense",
                json!({ "expenseId": IdFixtures::pending_expense(), "approvedBy": "cfo@summit.example" }),
            )
            .await
            .unwrap();
        let CommandRecord::Expense(expense) = &receipt.acknowledgment.record else {
            panic!("expected an expense");
        };
        assert_eq!(expense.status, ExpenseStatus::Approved);
        assert_eq!(expense.approved_by.as_deref(), Some("cfo@summit.example"));

        let QueryResult::ExpenseAnalysis(after) =
            service.query(QueryKind::ExpenseAnalysis, Some(&fund_1)).await.unwrap()
        else {
            panic!("expected expense analysis");
        };
        assert_eq!(after.expenses_by_status.pending, before.expenses_by_status.pending - 1);
        assert_eq!(after.expenses_by_status.approved, before.expenses_by_status.approved + 1);
        assert_eq!(after.total_expenses, before.total_expenses);
    }

    #[tokio::test]
    async fn test_approving_paid_expense_is_rejected() {
        let service = DatasetFixtures::persisting_service();
        let err = service
            .execute("approve_expense", json!({ "expenseId": IdFixtures::paid_expense() }))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("PAID -> APPROVED"));
    }

    #[tokio::test]
    async fn test_fund_capital_call_once() {
        let service = DatasetFixtures::persisting_service();
        let payload = json!({ "capitalCallId": IdFixtures::partially_funded_call() });

        let receipt = service.execute("fund_capital_call", payload.clone()).await.unwrap();
        let CommandRecord::CapitalCall(call) = &receipt.acknowledgment.record else {
            panic!("expected a capital call");
        };
        assert_eq!(call.status, CapitalCallStatus::Funded);
        assert_eq!(call.total_outstanding, Decimal::ZERO);
        assert!(call.funded_at.is_some());

        assert!(service.execute("fund_capital_call", payload).await.is_err());
    }

    #[tokio::test]
    async fn test_publish_nav_once() {
        let service = DatasetFixtures::persisting_service();
        let receipt = service
            .execute("publish_nav", json!({ "navReportId": IdFixtures::draft_nav_report() }))
            .await
            .unwrap();
        assert!(matches!(
            receipt.acknowledgment.record,
            CommandRecord::NavReport(ref r) if r.status == NavReportStatus::Published
        ));

        let err = service
            .execute("publish_nav", json!({ "navReportId": IdFixtures::published_nav_report() }))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_unknown_record_is_not_found() {
        let service = DatasetFixtures::persisting_service();
        let err = service
            .execute("publish_nav", json!({ "navReportId": "nav-missing" }))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

// ============================================================================
// Store Tests
// ============================================================================

mod store_tests {
    use super::*;
    use core_kernel::{AdapterHealth, HealthCheckable};
    use domain_fund::{CommandMode, FundOperationsService};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_service_over_custom_dataset() {
        let dataset = TestDatasetBuilder::new()
            .with_fund(TestFundBuilder::new().with_id("fund-a").with_net_irr(dec!(0.15)).build())
            .with_fund(TestFundBuilder::new().with_id("fund-b").build())
            .build();
        let service = FundOperationsService::new(
            Arc::new(InMemoryFundStore::new(dataset)),
            CommandMode::Persist,
        );

        let QueryResult::Overview(overview) = service.query(QueryKind::Overview, None).await.unwrap()
        else {
            panic!("expected overview");
        };
        assert_eq!(overview.summary.total_funds, 2);
        assert_eq!(overview.summary.avg_net_irr, dec!(0.075));
    }

    #[tokio::test]
    async fn test_store_with_broken_dataset_is_unhealthy() {
        let mut dataset = DatasetFixtures::bundled();
        dataset.expenses[0].fund_id = FundId::new("fund-gone");
        let store = InMemoryFundStore::new(dataset);

        assert_eq!(store.health_check().await.status, AdapterHealth::Unhealthy);
    }

    #[tokio::test]
    async fn test_concurrent_commands_all_land() {
        let service = DatasetFixtures::persisting_service();
        let mut handles = Vec::new();
        for n in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .execute(
                        "record_expense",
                        json!({
                            "fundId": "fund-2",
                            "category": "LEGAL",
                            "amount": 1000 + n,
                            "description": format!("Counsel invoice {}", n)
                        }),
                    )
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let QueryResult::Expenses(expenses) = service
            .query(QueryKind::Expenses, Some(&IdFixtures::fund_2()))
            .await
            .unwrap()
        else {
            panic!("expected expenses");
        };
        let seeded = DatasetFixtures::bundled()
            .expenses
            .iter()
            .filter(|e| e.fund_id == IdFixtures::fund_2())
            .count();
        assert_eq!(expenses.len(), seeded + 16);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn expense_totals_match_category_sums(expenses in expenses_strategy(40)) {
            let analysis = analyze_expenses(&expenses);
            let by_category: Decimal = analysis.expenses_by_category.values().copied().sum();
            let by_record: Decimal = expenses.iter().map(|e| e.amount).sum();

            prop_assert_eq!(analysis.total_expenses, by_record);
            prop_assert_eq!(by_category, by_record);
            prop_assert_eq!(
                analysis.expenses_by_status.pending
                    + analysis.expenses_by_status.approved
                    + analysis.expenses_by_status.paid,
                expenses.len()
            );
            prop_assert!(analysis.recent_expenses.len() <= 5);
        }

        #[test]
        fn relationship_scores_are_bounded_and_deterministic(commitments in commitments_strategy(24)) {
            let first = relationship::profiles(&commitments);
            let second = relationship::profiles(&commitments);
            prop_assert_eq!(&first, &second);

            for profile in &first {
                assert_profile_scores_bounded(profile);
            }
        }

        #[test]
        fn health_and_risk_stay_in_range(commitments in commitments_strategy(12)) {
            for snapshot in InvestorSnapshot::group(&commitments) {
                let health = relationship::health_score(&snapshot);
                let risk = relationship::risk_score(&snapshot);
                prop_assert!(health >= Decimal::ZERO && health <= dec!(100));
                prop_assert!(risk >= Decimal::ZERO && risk <= dec!(100));
            }
        }
    }
}
