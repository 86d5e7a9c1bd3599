//! Fund expenses and their approval workflow (`PENDING -> APPROVED -> PAID`)

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{ExpenseId, FundId};

use crate::error::FundError;
use crate::MAX_AMOUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    ManagementFee,
    FundAdministration,
    Legal,
    AuditAndTax,
    DueDiligence,
    Organizational,
    Other,
}

/// Who bears the expense under the LPA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseType {
    FundExpense,
    ManagementCompany,
    Partnership,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Paid,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "PENDING",
            ExpenseStatus::Approved => "APPROVED",
            ExpenseStatus::Paid => "PAID",
        }
    }

    pub fn can_transition_to(&self, next: ExpenseStatus) -> bool {
        matches!(
            (self, next),
            (ExpenseStatus::Pending, ExpenseStatus::Approved)
                | (ExpenseStatus::Approved, ExpenseStatus::Paid)
        )
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundExpense {
    pub id: ExpenseId,
    pub fund_id: FundId,
    pub expense_date: NaiveDate,
    pub category: ExpenseCategory,
    pub expense_type: ExpenseType,
    pub amount: Decimal,
    pub description: String,
    #[serde(default)]
    pub vendor: Option<String>,
    pub status: ExpenseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl FundExpense {
    fn transition(&mut self, next: ExpenseStatus) -> Result<(), FundError> {
        if !self.status.can_transition_to(next) {
            return Err(FundError::InvalidTransition {
                entity: "Expense",
                id: self.id.to_string(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Approves a pending expense
    pub fn approve(&mut self, approver: Option<String>, at: DateTime<Utc>) -> Result<(), FundError> {
        self.transition(ExpenseStatus::Approved)?;
        self.approved_by = approver;
        self.approved_at = Some(at);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), FundError> {
        if self.amount <= Decimal::ZERO {
            return Err(FundError::invariant(format!(
                "expense {} must have a positive amount",
                self.id
            )));
        }
        if self.amount > MAX_AMOUNT {
            return Err(FundError::invariant(format!(
                "expense {} exceeds the maximum amount",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pending_expense() -> FundExpense {
        FundExpense {
            id: ExpenseId::new("exp-1"),
            fund_id: FundId::new("fund-1"),
            expense_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            category: ExpenseCategory::Legal,
            expense_type: ExpenseType::FundExpense,
            amount: dec!(185000),
            description: "Add-on acquisition counsel".to_string(),
            vendor: Some("Hale & Whitford LLP".to_string()),
            status: ExpenseStatus::Pending,
            approved_by: None,
            approved_at: None,
        }
    }

    #[test]
    fn test_approve_records_approver() {
        let mut expense = pending_expense();
        expense.approve(Some("cfo".to_string()), Utc::now()).unwrap();
        assert_eq!(expense.status, ExpenseStatus::Approved);
        assert_eq!(expense.approved_by.as_deref(), Some("cfo"));
        assert!(expense.approved_at.is_some());
    }

    #[test]
    fn test_cannot_pay_pending_expense() {
        assert!(!ExpenseStatus::Pending.can_transition_to(ExpenseStatus::Paid));
        assert!(ExpenseStatus::Approved.can_transition_to(ExpenseStatus::Paid));
    }

    #[test]
    fn test_oversized_amount_is_invalid() {
        let mut expense = pending_expense();
        expense.amount = MAX_AMOUNT + dec!(1);
        assert!(expense.validate().is_err());
        expense.amount = MAX_AMOUNT;
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_cannot_reapprove() {
        let mut expense = pending_expense();
        expense.approve(None, Utc::now()).unwrap();
        let err = expense.approve(None, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("APPROVED -> APPROVED"));
    }
}
