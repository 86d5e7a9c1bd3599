//! Test Data Builders
//!
//! Builder patterns for constructing records with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the rest.

use chrono::NaiveDate;
use core_kernel::{CommitmentId, ExpenseId, FundId, InvestorId};
use domain_fund::{
    CommitmentStatus, ExpenseCategory, ExpenseStatus, ExpenseType, Fund, FundCommitment,
    FundExpense, FundOperationsDataset, FundStatus, FundType, InvestorType,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::IdFixtures;

/// Builder for constructing test funds
pub struct TestFundBuilder {
    fund: Fund,
}

impl Default for TestFundBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFundBuilder {
    /// Creates a new builder for an investing growth fund
    pub fn new() -> Self {
        Self {
            fund: Fund {
                id: IdFixtures::fund_1(),
                fund_name: "Test Growth Fund I".to_string(),
                fund_number: 1,
                fund_type: FundType::GrowthEquity,
                status: FundStatus::Investing,
                vintage: 2022,
                currency: "USD".to_string(),
                target_size: dec!(200000000),
                hard_cap: dec!(250000000),
                minimum_size: dec!(100000000),
                management_fee: dec!(0.02),
                carried_interest: dec!(0.20),
                hurdle_rate: dec!(0.08),
                first_close: NaiveDate::from_ymd_opt(2022, 1, 15).unwrap(),
                final_close: None,
                investment_period_end: NaiveDate::from_ymd_opt(2027, 1, 15).unwrap(),
                maturity_date: NaiveDate::from_ymd_opt(2032, 1, 15).unwrap(),
                total_commitments: dec!(200000000),
                total_called: dec!(80000000),
                total_distributed: Decimal::ZERO,
                current_nav: dec!(86000000),
                gross_irr: None,
                net_irr: None,
                gross_moic: None,
                net_moic: None,
                dpi: None,
                rvpi: None,
                tvpi: None,
            },
        }
    }

    pub fn with_id(mut self, id: impl Into<FundId>) -> Self {
        self.fund.id = id.into();
        self
    }

    pub fn with_status(mut self, status: FundStatus) -> Self {
        self.fund.status = status;
        self
    }

    /// Sets committed and called capital
    pub fn with_capital(mut self, committed: Decimal, called: Decimal) -> Self {
        self.fund.total_commitments = committed;
        self.fund.total_called = called;
        self
    }

    pub fn with_nav(mut self, nav: Decimal) -> Self {
        self.fund.current_nav = nav;
        self
    }

    pub fn with_net_irr(mut self, irr: Decimal) -> Self {
        self.fund.net_irr = Some(irr);
        self
    }

    pub fn build(self) -> Fund {
        self.fund
    }
}

/// Builder for constructing test commitments
pub struct TestCommitmentBuilder {
    commitment: FundCommitment,
}

impl Default for TestCommitmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCommitmentBuilder {
    pub fn new() -> Self {
        Self {
            commitment: FundCommitment {
                id: CommitmentId::generate(),
                fund_id: IdFixtures::fund_1(),
                investor_id: IdFixtures::anchor_investor(),
                investor_name: "Test Pension Plan".to_string(),
                investor_type: InvestorType::PensionFund,
                commitment_amount: dec!(10000000),
                commitment_date: NaiveDate::from_ymd_opt(2022, 1, 15).unwrap(),
                called_amount: dec!(4000000),
                distributed_amount: Decimal::ZERO,
                current_nav: dec!(4200000),
                status: CommitmentStatus::Active,
            },
        }
    }

    pub fn for_fund(mut self, fund_id: impl Into<FundId>) -> Self {
        self.commitment.fund_id = fund_id.into();
        self
    }

    pub fn for_investor(mut self, investor_id: impl Into<InvestorId>, name: &str) -> Self {
        self.commitment.investor_id = investor_id.into();
        self.commitment.investor_name = name.to_string();
        self
    }

    /// Sets committed and called amounts
    pub fn with_amounts(mut self, committed: Decimal, called: Decimal) -> Self {
        self.commitment.commitment_amount = committed;
        self.commitment.called_amount = called;
        self
    }

    /// Sets distributions received and remaining NAV
    pub fn with_value(mut self, distributed: Decimal, nav: Decimal) -> Self {
        self.commitment.distributed_amount = distributed;
        self.commitment.current_nav = nav;
        self
    }

    pub fn with_status(mut self, status: CommitmentStatus) -> Self {
        self.commitment.status = status;
        self
    }

    pub fn build(self) -> FundCommitment {
        self.commitment
    }
}

/// Builder for constructing test expenses
pub struct TestExpenseBuilder {
    expense: FundExpense,
}

impl Default for TestExpenseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestExpenseBuilder {
    pub fn new() -> Self {
        Self {
            expense: FundExpense {
                id: ExpenseId::generate(),
                fund_id: IdFixtures::fund_1(),
                expense_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                category: ExpenseCategory::FundAdministration,
                expense_type: ExpenseType::FundExpense,
                amount: dec!(25000),
                description: "Quarterly administration fee".to_string(),
                vendor: None,
                status: ExpenseStatus::Pending,
                approved_by: None,
                approved_at: None,
            },
        }
    }

    pub fn with_id(mut self, id: impl Into<ExpenseId>) -> Self {
        self.expense.id = id.into();
        self
    }

    pub fn for_fund(mut self, fund_id: impl Into<FundId>) -> Self {
        self.expense.fund_id = fund_id.into();
        self
    }

    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.expense.category = category;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.expense.amount = amount;
        self
    }

    pub fn with_status(mut self, status: ExpenseStatus) -> Self {
        self.expense.status = status;
        self
    }

    pub fn build(self) -> FundExpense {
        self.expense
    }
}

/// Builder for small hand-made datasets
#[derive(Default)]
pub struct TestDatasetBuilder {
    dataset: FundOperationsDataset,
}

impl TestDatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fund(mut self, fund: Fund) -> Self {
        self.dataset.funds.push(fund);
        self
    }

    pub fn with_commitment(mut self, commitment: FundCommitment) -> Self {
        self.dataset.commitments.push(commitment);
        self
    }

    pub fn with_expense(mut self, expense: FundExpense) -> Self {
        self.dataset.expenses.push(expense);
        self
    }

    pub fn with_expenses(mut self, expenses: impl IntoIterator<Item = FundExpense>) -> Self {
        self.dataset.expenses.extend(expenses);
        self
    }

    pub fn build(self) -> FundOperationsDataset {
        self.dataset
    }
}
