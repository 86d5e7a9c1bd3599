//! Pre-built Test Fixtures
//!
//! Ready-to-use data for tests across the workspace. Everything here is
//! derived from the bundled dataset, so ids and totals are stable.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{CapitalCallId, ExpenseId, FundId, InvestorId, NavReportId};
use domain_fund::{CommandMode, FundOperationsDataset, FundOperationsService, InMemoryFundStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Fixture for the bundled dataset and the stores built on it
pub struct DatasetFixtures;

impl DatasetFixtures {
    /// The dataset shipped with `domain_fund`
    pub fn bundled() -> FundOperationsDataset {
        FundOperationsDataset::bundled().expect("bundled dataset must load")
    }

    /// A fresh in-memory store seeded with the bundled dataset
    pub fn store() -> InMemoryFundStore {
        InMemoryFundStore::new(Self::bundled())
    }

    /// A service over a fresh store
    pub fn service(mode: CommandMode) -> FundOperationsService {
        FundOperationsService::new(Arc::new(Self::store()), mode)
    }

    /// A service that commits commands
    pub fn persisting_service() -> FundOperationsService {
        Self::service(CommandMode::Persist)
    }

    /// A service that only acknowledges commands
    pub fn acknowledging_service() -> FundOperationsService {
        Self::service(CommandMode::Acknowledge)
    }
}

/// Well-known identifiers from the bundled dataset
pub struct IdFixtures;

impl IdFixtures {
    /// Investing fund with calls in several states
    pub fn fund_1() -> FundId {
        FundId::new("fund-1")
    }

    /// Harvesting fund with full performance metrics
    pub fn fund_2() -> FundId {
        FundId::new("fund-2")
    }

    /// Fundraising fund without performance metrics
    pub fn fund_3() -> FundId {
        FundId::new("fund-3")
    }

    /// Liquidating fund, closed to new commitments
    pub fn fund_4() -> FundId {
        FundId::new("fund-4")
    }

    /// A fund id not present in the dataset
    pub fn unknown_fund() -> FundId {
        FundId::new("fund-999")
    }

    pub fn pending_expense() -> ExpenseId {
        ExpenseId::new("exp-3")
    }

    pub fn paid_expense() -> ExpenseId {
        ExpenseId::new("exp-2")
    }

    pub fn partially_funded_call() -> CapitalCallId {
        CapitalCallId::new("call-2")
    }

    pub fn funded_call() -> CapitalCallId {
        CapitalCallId::new("call-1")
    }

    pub fn draft_nav_report() -> NavReportId {
        NavReportId::new("nav-2")
    }

    pub fn published_nav_report() -> NavReportId {
        NavReportId::new("nav-1")
    }

    /// Investor with only active commitments in three funds
    pub fn anchor_investor() -> InvestorId {
        InvestorId::new("investor-1")
    }

    /// Investor with a defaulted and a transferred commitment
    pub fn troubled_investor() -> InvestorId {
        InvestorId::new("investor-5")
    }
}

/// Known totals of the bundled dataset
pub struct TotalsFixtures;

impl TotalsFixtures {
    pub fn fund_count() -> usize {
        4
    }

    pub fn total_commitments() -> Decimal {
        dec!(1915000000)
    }

    pub fn active_funds() -> usize {
        2
    }

    /// Sum of fund-1 expenses
    pub fn fund_1_expenses() -> Decimal {
        dec!(3105500)
    }
}

/// Fixture for dates and timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A fixed processing time
    pub fn processed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 15, 12, 0, 0).unwrap()
    }

    pub fn quarter_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    pub fn due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }
}
