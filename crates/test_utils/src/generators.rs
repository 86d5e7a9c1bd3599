//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating records that satisfy the
//! domain invariants.

use core_kernel::{ExpenseId, FundId, InvestorId};
use domain_fund::{CommitmentStatus, ExpenseCategory, ExpenseStatus, FundCommitment, FundExpense};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::{TestCommitmentBuilder, TestExpenseBuilder};

/// Strategy for positive amounts with cent precision, up to 10M
pub fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

pub fn expense_category_strategy() -> impl Strategy<Value = ExpenseCategory> {
    prop_oneof![
        Just(ExpenseCategory::ManagementFee),
        Just(ExpenseCategory::FundAdministration),
        Just(ExpenseCategory::Legal),
        Just(ExpenseCategory::AuditAndTax),
        Just(ExpenseCategory::DueDiligence),
        Just(ExpenseCategory::Organizational),
        Just(ExpenseCategory::Other),
    ]
}

pub fn expense_status_strategy() -> impl Strategy<Value = ExpenseStatus> {
    prop_oneof![
        Just(ExpenseStatus::Pending),
        Just(ExpenseStatus::Approved),
        Just(ExpenseStatus::Paid),
    ]
}

pub fn commitment_status_strategy() -> impl Strategy<Value = CommitmentStatus> {
    prop_oneof![
        4 => Just(CommitmentStatus::Active),
        1 => Just(CommitmentStatus::Pending),
        1 => Just(CommitmentStatus::Transferred),
        1 => Just(CommitmentStatus::Defaulted),
    ]
}

/// Strategy for a valid expense in `fund-1`
pub fn expense_strategy() -> impl Strategy<Value = FundExpense> {
    (expense_category_strategy(), expense_status_strategy(), positive_amount_strategy()).prop_map(
        |(category, status, amount)| {
            TestExpenseBuilder::new()
                .with_category(category)
                .with_status(status)
                .with_amount(amount)
                .build()
        },
    )
}

/// Strategy for expenses with distinct ids
pub fn expenses_strategy(max: usize) -> impl Strategy<Value = Vec<FundExpense>> {
    proptest::collection::vec(expense_strategy(), 0..=max).prop_map(|expenses| {
        expenses
            .into_iter()
            .enumerate()
            .map(|(i, mut e)| {
                e.id = ExpenseId::new(format!("exp-gen-{}", i));
                e
            })
            .collect()
    })
}

/// Strategy for a valid commitment: called never exceeds committed
pub fn commitment_strategy() -> impl Strategy<Value = FundCommitment> {
    (
        0usize..4,
        0usize..3,
        positive_amount_strategy(),
        0u32..=100,
        0u32..=300,
        0u32..=200,
        commitment_status_strategy(),
    )
        .prop_map(|(fund, investor, committed, called_pct, dist_pct, nav_pct, status)| {
            let called = (committed * Decimal::from(called_pct) / Decimal::ONE_HUNDRED).round_dp(2);
            TestCommitmentBuilder::new()
                .for_fund(FundId::new(format!("fund-{}", fund + 1)))
                .for_investor(
                    InvestorId::new(format!("investor-{}", investor + 1)),
                    "Generated LP",
                )
                .with_amounts(committed, called)
                .with_value(
                    called * Decimal::from(dist_pct) / Decimal::ONE_HUNDRED,
                    called * Decimal::from(nav_pct) / Decimal::ONE_HUNDRED,
                )
                .with_status(status)
                .build()
        })
}

pub fn commitments_strategy(max: usize) -> impl Strategy<Value = Vec<FundCommitment>> {
    proptest::collection::vec(commitment_strategy(), 1..=max)
}
