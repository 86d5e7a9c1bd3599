//! Read-side aggregates over the fund operations collections
//!
//! Every function here is pure: it takes the records it needs and returns a
//! serializable view. Nothing reaches back into the store.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use core_kernel::FundId;

use crate::expense::{ExpenseCategory, ExpenseStatus, FundExpense};
use crate::fund::{Fund, FundStatus};

/// Number of expenses returned as the recent sample of an expense analysis
pub const RECENT_EXPENSE_LIMIT: usize = 5;

/// Portfolio-wide totals shown on the overview
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSummary {
    pub total_funds: usize,
    pub total_commitments: Decimal,
    pub total_called: Decimal,
    #[serde(rename = "totalNAV")]
    pub total_nav: Decimal,
    /// Mean net IRR, funds without one count as zero
    #[serde(rename = "avgNetIRR")]
    pub avg_net_irr: Decimal,
    pub active_funds: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundOverview {
    pub funds: Vec<Fund>,
    pub summary: FundSummary,
}

pub fn summarize_funds(funds: &[Fund]) -> FundSummary {
    let total_net_irr: Decimal = funds.iter().map(|f| f.net_irr.unwrap_or_default()).sum();
    let avg_net_irr = if funds.is_empty() {
        Decimal::ZERO
    } else {
        total_net_irr / Decimal::from(funds.len())
    };

    FundSummary {
        total_funds: funds.len(),
        total_commitments: funds.iter().map(|f| f.total_commitments).sum(),
        total_called: funds.iter().map(|f| f.total_called).sum(),
        total_nav: funds.iter().map(|f| f.current_nav).sum(),
        avg_net_irr,
        active_funds: funds.iter().filter(|f| f.status.is_active()).count(),
    }
}

pub fn overview(funds: Vec<Fund>) -> FundOverview {
    let summary = summarize_funds(&funds);
    FundOverview { funds, summary }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    #[serde(rename = "grossIRR")]
    pub gross_irr: Option<Decimal>,
    #[serde(rename = "netIRR")]
    pub net_irr: Option<Decimal>,
    #[serde(rename = "grossMOIC")]
    pub gross_moic: Option<Decimal>,
    #[serde(rename = "netMOIC")]
    pub net_moic: Option<Decimal>,
    pub dpi: Option<Decimal>,
    pub rvpi: Option<Decimal>,
    pub tvpi: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSummary {
    pub total_commitments: Decimal,
    pub total_called: Decimal,
    pub total_distributed: Decimal,
    #[serde(rename = "currentNAV")]
    pub current_nav: Decimal,
    pub uncalled_capital: Decimal,
}

/// Performance view of a single fund
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundPerformance {
    pub fund_id: FundId,
    pub fund_name: String,
    pub status: FundStatus,
    pub vintage: i32,
    pub performance: PerformanceMetrics,
    pub cash_flows: CashFlowSummary,
}

impl From<&Fund> for FundPerformance {
    fn from(fund: &Fund) -> Self {
        Self {
            fund_id: fund.id.clone(),
            fund_name: fund.fund_name.clone(),
            status: fund.status,
            vintage: fund.vintage,
            performance: PerformanceMetrics {
                gross_irr: fund.gross_irr,
                net_irr: fund.net_irr,
                gross_moic: fund.gross_moic,
                net_moic: fund.net_moic,
                dpi: fund.dpi,
                rvpi: fund.rvpi,
                tvpi: fund.tvpi,
            },
            cash_flows: CashFlowSummary {
                total_commitments: fund.total_commitments,
                total_called: fund.total_called,
                total_distributed: fund.total_distributed,
                current_nav: fund.current_nav,
                uncalled_capital: fund.uncalled_capital(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpenseStatusCounts {
    pub pending: usize,
    pub approved: usize,
    pub paid: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseAnalysis {
    pub total_expenses: Decimal,
    pub expenses_by_category: BTreeMap<ExpenseCategory, Decimal>,
    pub expenses_by_status: ExpenseStatusCounts,
    /// First expenses in collection order, not sorted by date
    pub recent_expenses: Vec<FundExpense>,
}

pub fn analyze_expenses(expenses: &[FundExpense]) -> ExpenseAnalysis {
    let mut by_category: BTreeMap<ExpenseCategory, Decimal> = BTreeMap::new();
    let mut by_status = ExpenseStatusCounts::default();

    for expense in expenses {
        *by_category.entry(expense.category).or_default() += expense.amount;
        match expense.status {
            ExpenseStatus::Pending => by_status.pending += 1,
            ExpenseStatus::Approved => by_status.approved += 1,
            ExpenseStatus::Paid => by_status.paid += 1,
        }
    }

    ExpenseAnalysis {
        total_expenses: expenses.iter().map(|e| e.amount).sum(),
        expenses_by_category: by_category,
        expenses_by_status: by_status,
        recent_expenses: expenses.iter().take(RECENT_EXPENSE_LIMIT).cloned().collect(),
    }
}
